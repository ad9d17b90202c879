//! Overlay band rendering
//!
//! This module handles:
//! - The template/field data model (template.rs)
//! - CSS-style color literal parsing (color.rs)
//! - The embedded bitmap font (font.rs)
//! - The compositor that burns resolved fields onto a frame (compositor.rs)

pub mod color;
pub mod compositor;
pub mod font;
pub mod template;

pub use compositor::{composite, encode, render, resolve_lines, BAND_HEIGHT};
pub use template::{FieldKind, Layout, LogoPosition, OverlayField, OverlayTemplate};
