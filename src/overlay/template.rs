//! Overlay template data model
//!
//! A template describes which fields get burned onto a captured photo
//! and how the band is styled. Templates are operator-editable records;
//! the store serializes the field list to JSON (see `db::sqlite`).

use serde::{Deserialize, Serialize};

/// Arrangement hint for the overlay band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Horizontal,
    Vertical,
    Grid,
}

/// Horizontal placement of the logo text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoPosition {
    Left,
    Right,
    Center,
}

/// How a field's display value is resolved at capture time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Coordinate,
    Datetime,
    Custom,
}

/// One line of the overlay band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayField {
    pub id: String,
    pub label: String,
    /// Static fallback value for text/custom fields
    pub value: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub visible: bool,
    /// Draw sequence, ascending; ties keep their original position
    pub order: i32,
}

impl OverlayField {
    pub fn new(id: &str, label: &str, kind: FieldKind, order: i32) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value: String::new(),
            kind,
            visible: true,
            order,
        }
    }
}

/// Operator-editable description of the overlay band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayTemplate {
    pub id: String,
    pub name: String,
    pub fields: Vec<OverlayField>,
    pub layout: Layout,
    pub background_color: String,
    pub text_color: String,
    pub font_size: u32,
    pub show_logo: bool,
    pub logo_position: Option<LogoPosition>,
}

impl OverlayTemplate {
    /// The template seeded on first-ever store initialization:
    /// latitude, longitude and timestamp over a translucent black band.
    pub fn default_template() -> Self {
        Self {
            id: "default".into(),
            name: "Default GPS Overlay".into(),
            fields: vec![
                OverlayField::new("lat", "Lat", FieldKind::Coordinate, 1),
                OverlayField::new("lng", "Lng", FieldKind::Coordinate, 2),
                OverlayField::new("timestamp", "Time", FieldKind::Datetime, 3),
            ],
            layout: Layout::Horizontal,
            background_color: "rgba(0, 0, 0, 0.7)".into(),
            text_color: "#ffffff".into(),
            font_size: 14,
            show_logo: true,
            logo_position: Some(LogoPosition::Right),
        }
    }

    /// Visible fields in draw order: ascending by `order`, stable for ties
    pub fn sorted_visible_fields(&self) -> Vec<&OverlayField> {
        let mut fields: Vec<&OverlayField> =
            self.fields.iter().filter(|f| f.visible).collect();
        fields.sort_by_key(|f| f.order);
        fields
    }

    /// Serialize the field list for database storage
    pub fn fields_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.fields)
    }

    /// Parse a field list from database storage
    pub fn fields_from_json(json: &str) -> Result<Vec<OverlayField>, serde_json::Error> {
        serde_json::from_str(json)
    }
}
