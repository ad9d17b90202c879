//! Document-blob record store
//!
//! Fallback backend holding each record type as one serialized JSON
//! array on disk, rewritten whole on every mutation (last write wins).
//! It uses its own files and never touches the sqlite database, so a
//! fallback session cannot damage prior native-store contents.

use std::path::{Path, PathBuf};

use crate::error::{GpsCamError, Result};
use crate::gps::SavedLocation;
use crate::overlay::template::OverlayTemplate;

const LOCATIONS_FILE: &str = "saved_locations.json";
const TEMPLATES_FILE: &str = "overlay_templates.json";

pub struct BlobStore {
    locations_path: PathBuf,
    templates_path: PathBuf,
    locations: Vec<SavedLocation>,
    templates: Vec<OverlayTemplate>,
}

fn load_array<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

impl BlobStore {
    /// Open the document store under the given directory
    pub fn open(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;

        let locations_path = dir.join(LOCATIONS_FILE);
        let templates_path = dir.join(TEMPLATES_FILE);

        Ok(Self {
            locations: load_array(&locations_path)?,
            templates: load_array(&templates_path)?,
            locations_path,
            templates_path,
        })
    }

    fn persist_locations(&self) -> Result<()> {
        std::fs::write(&self.locations_path, serde_json::to_string(&self.locations)?)?;
        Ok(())
    }

    fn persist_templates(&self) -> Result<()> {
        std::fs::write(&self.templates_path, serde_json::to_string(&self.templates)?)?;
        Ok(())
    }

    // ==================== Saved locations ====================

    pub fn insert_location(&mut self, location: &SavedLocation) -> Result<()> {
        // Newest records sit at the head of the document
        self.locations.insert(0, location.clone());
        self.persist_locations()
    }

    pub fn update_location(&mut self, location: &SavedLocation) -> Result<()> {
        match self.locations.iter_mut().find(|l| l.id == location.id) {
            Some(existing) => {
                *existing = location.clone();
                self.persist_locations()
            }
            None => Err(GpsCamError::NotFound(location.id.clone())),
        }
    }

    /// All saved locations, most recently updated first
    pub fn list_locations(&self) -> Result<Vec<SavedLocation>> {
        let mut locations = self.locations.clone();
        locations.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(locations)
    }

    /// Delete by id. Deleting a missing id is not an error.
    pub fn delete_location(&mut self, id: &str) -> Result<()> {
        self.locations.retain(|l| l.id != id);
        self.persist_locations()
    }

    // ==================== Overlay templates ====================

    pub fn insert_template(&mut self, template: &OverlayTemplate) -> Result<()> {
        self.templates.insert(0, template.clone());
        self.persist_templates()
    }

    pub fn update_template(&mut self, template: &OverlayTemplate) -> Result<()> {
        match self.templates.iter_mut().find(|t| t.id == template.id) {
            Some(existing) => {
                *existing = template.clone();
                self.persist_templates()
            }
            None => Err(GpsCamError::NotFound(template.id.clone())),
        }
    }

    /// All templates, ordered by name
    pub fn list_templates(&self) -> Result<Vec<OverlayTemplate>> {
        let mut templates = self.templates.clone();
        templates.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(templates)
    }

    /// Delete by id. Deleting a missing id is not an error.
    pub fn delete_template(&mut self, id: &str) -> Result<()> {
        self.templates.retain(|t| t.id != id);
        self.persist_templates()
    }

    pub fn template_count(&self) -> Result<i64> {
        Ok(self.templates.len() as i64)
    }
}
