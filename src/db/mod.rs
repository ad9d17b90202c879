//! Saved location / overlay template store
//!
//! One facade over two interchangeable backends: the sqlite store when
//! it opens, a JSON document store otherwise. The backend is picked
//! once at startup and never changes during a session; the fallback is
//! logged and leaves any prior sqlite contents untouched. Both backends
//! expose identical create/read/update/delete semantics.

mod blob;
mod sqlite;

use std::path::Path;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

pub use blob::BlobStore;
pub use sqlite::SqliteStore;

use crate::error::{GpsCamError, Result};
use crate::gps::{CoordinateReading, SavedLocation};
use crate::overlay::template::OverlayTemplate;

const DB_FILENAME: &str = "gps_cam.db";

/// Input for creating a saved location; id and timestamps are assigned
/// by the store
#[derive(Debug, Clone)]
pub struct NewLocation {
    pub name: String,
    pub coordinates: CoordinateReading,
    pub address: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

enum Backend {
    Sqlite(SqliteStore),
    Blob(BlobStore),
}

pub struct Database {
    backend: Backend,
}

impl Database {
    /// Open the store under a data directory, preferring sqlite and
    /// falling back permanently to the document store for this session
    /// if sqlite fails to initialize. Seeds the default template on
    /// first-ever initialization.
    pub fn open(data_dir: &Path) -> Result<Self> {
        let backend = match SqliteStore::open(&data_dir.join(DB_FILENAME)) {
            Ok(store) => {
                info!(path = %store.path().display(), "record store opened");
                Backend::Sqlite(store)
            }
            Err(e) => {
                warn!(error = %e, "sqlite unavailable, using document store for this session");
                Backend::Blob(BlobStore::open(data_dir)?)
            }
        };

        let mut db = Self { backend };
        db.seed_default_template()?;
        Ok(db)
    }

    /// Open under the user's data directory (`gps-cam/`)
    pub fn open_default() -> Result<Self> {
        let mut dir = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| GpsCamError::DeviceUnsupported("no user data directory".into()))?;
        dir.push("gps-cam");
        Self::open(&dir)
    }

    /// Whether records survive in the native structured store
    pub fn is_persistent(&self) -> bool {
        matches!(self.backend, Backend::Sqlite(_))
    }

    fn seed_default_template(&mut self) -> Result<()> {
        let count = match &self.backend {
            Backend::Sqlite(store) => store.template_count()?,
            Backend::Blob(store) => store.template_count()?,
        };

        if count == 0 {
            let template = OverlayTemplate::default_template();
            match &mut self.backend {
                Backend::Sqlite(store) => store.insert_template(&template)?,
                Backend::Blob(store) => store.insert_template(&template)?,
            }
            info!("seeded default overlay template");
        }

        Ok(())
    }

    // ==================== Saved locations ====================

    /// Create a saved location with a fresh id and both timestamps set
    pub fn create_location(&mut self, new: NewLocation) -> Result<SavedLocation> {
        let now = Utc::now();
        let location = SavedLocation {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            coordinates: new.coordinates,
            address: new.address,
            description: new.description,
            tags: new.tags,
            created_at: now,
            updated_at: now,
        };

        match &mut self.backend {
            Backend::Sqlite(store) => store.insert_location(&location)?,
            Backend::Blob(store) => store.insert_location(&location)?,
        }
        Ok(location)
    }

    /// Update an existing location, refreshing `updated_at`. Fails with
    /// `NotFound` if the id was never created.
    pub fn update_location(&mut self, location: &SavedLocation) -> Result<SavedLocation> {
        let mut updated = location.clone();
        updated.updated_at = Utc::now();

        match &mut self.backend {
            Backend::Sqlite(store) => store.update_location(&updated)?,
            Backend::Blob(store) => store.update_location(&updated)?,
        }
        Ok(updated)
    }

    /// All saved locations, most recently updated first
    pub fn list_locations(&self) -> Result<Vec<SavedLocation>> {
        match &self.backend {
            Backend::Sqlite(store) => store.list_locations(),
            Backend::Blob(store) => store.list_locations(),
        }
    }

    /// Look a location up by id
    pub fn find_location(&self, id: &str) -> Result<Option<SavedLocation>> {
        Ok(self.list_locations()?.into_iter().find(|l| l.id == id))
    }

    /// Delete by id; deleting a missing id is not an error
    pub fn delete_location(&mut self, id: &str) -> Result<()> {
        match &mut self.backend {
            Backend::Sqlite(store) => store.delete_location(id),
            Backend::Blob(store) => store.delete_location(id),
        }
    }

    // ==================== Overlay templates ====================

    /// Create a template under a fresh id
    pub fn create_template(&mut self, mut template: OverlayTemplate) -> Result<OverlayTemplate> {
        template.id = Uuid::new_v4().to_string();

        match &mut self.backend {
            Backend::Sqlite(store) => store.insert_template(&template)?,
            Backend::Blob(store) => store.insert_template(&template)?,
        }
        Ok(template)
    }

    /// Update an existing template; `NotFound` if the id was never
    /// created
    pub fn update_template(&mut self, template: &OverlayTemplate) -> Result<()> {
        match &mut self.backend {
            Backend::Sqlite(store) => store.update_template(template),
            Backend::Blob(store) => store.update_template(template),
        }
    }

    /// All templates, ordered by name
    pub fn list_templates(&self) -> Result<Vec<OverlayTemplate>> {
        match &self.backend {
            Backend::Sqlite(store) => store.list_templates(),
            Backend::Blob(store) => store.list_templates(),
        }
    }

    /// Delete by id; deleting a missing id is not an error
    pub fn delete_template(&mut self, id: &str) -> Result<()> {
        match &mut self.backend {
            Backend::Sqlite(store) => store.delete_template(id),
            Backend::Blob(store) => store.delete_template(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn coordinates(latitude: f64, longitude: f64) -> CoordinateReading {
        CoordinateReading {
            latitude,
            longitude,
            altitude: None,
            accuracy: Some(5.0),
            captured_at: Utc::now(),
        }
    }

    fn new_location(name: &str) -> NewLocation {
        NewLocation {
            name: name.into(),
            coordinates: coordinates(37.7749, -122.4194),
            address: None,
            description: None,
            tags: vec!["survey".into()],
        }
    }

    fn open_db(dir: &TempDir) -> Database {
        Database::open(dir.path()).unwrap()
    }

    #[test]
    fn seeds_default_template_once() {
        let dir = TempDir::new().unwrap();

        let db = open_db(&dir);
        let templates = db.list_templates().unwrap();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].id, "default");
        drop(db);

        // Reopening the same store does not reseed
        let db = open_db(&dir);
        assert_eq!(db.list_templates().unwrap().len(), 1);
    }

    #[test]
    fn create_assigns_id_and_timestamps() {
        let dir = TempDir::new().unwrap();
        let mut db = open_db(&dir);

        let location = db.create_location(new_location("Dock")).unwrap();
        assert!(!location.id.is_empty());
        assert_eq!(location.created_at, location.updated_at);
        assert_eq!(location.tags, vec!["survey".to_string()]);

        let listed = db.list_locations().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Dock");
        assert_eq!(listed[0].tags, vec!["survey".to_string()]);
    }

    #[test]
    fn locations_list_most_recently_updated_first() {
        let dir = TempDir::new().unwrap();
        let mut db = open_db(&dir);

        let first = db.create_location(new_location("First")).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        db.create_location(new_location("Second")).unwrap();

        let names: Vec<String> = db
            .list_locations()
            .unwrap()
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["Second", "First"]);

        // Updating bumps a record back to the head
        std::thread::sleep(std::time::Duration::from_millis(5));
        db.update_location(&first).unwrap();

        let names: Vec<String> = db
            .list_locations()
            .unwrap()
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[test]
    fn update_missing_location_fails_without_side_effects() {
        let dir = TempDir::new().unwrap();
        let mut db = open_db(&dir);

        db.create_location(new_location("Dock")).unwrap();

        let mut ghost = db.list_locations().unwrap().remove(0);
        ghost.id = "never-created".into();
        ghost.name = "Ghost".into();

        match db.update_location(&ghost) {
            Err(GpsCamError::NotFound(id)) => assert_eq!(id, "never-created"),
            other => panic!("expected NotFound, got {other:?}"),
        }

        let listed = db.list_locations().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Dock");
    }

    #[test]
    fn delete_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut db = open_db(&dir);

        let location = db.create_location(new_location("Dock")).unwrap();
        db.delete_location(&location.id).unwrap();
        assert!(db.list_locations().unwrap().is_empty());

        // Second delete of the same id is fine and changes nothing
        db.delete_location(&location.id).unwrap();
        assert!(db.list_locations().unwrap().is_empty());
    }

    #[test]
    fn templates_list_by_name() {
        let dir = TempDir::new().unwrap();
        let mut db = open_db(&dir);

        let mut zebra = OverlayTemplate::default_template();
        zebra.name = "Zebra".into();
        db.create_template(zebra).unwrap();

        let mut alpha = OverlayTemplate::default_template();
        alpha.name = "Alpha".into();
        db.create_template(alpha).unwrap();

        let names: Vec<String> = db
            .list_templates()
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "Default GPS Overlay", "Zebra"]);
    }

    #[test]
    fn template_update_and_not_found() {
        let dir = TempDir::new().unwrap();
        let mut db = open_db(&dir);

        let mut template = db.list_templates().unwrap().remove(0);
        template.font_size = 18;
        db.update_template(&template).unwrap();
        assert_eq!(db.list_templates().unwrap()[0].font_size, 18);

        template.id = "missing".into();
        assert!(matches!(
            db.update_template(&template),
            Err(GpsCamError::NotFound(_))
        ));
    }

    #[test]
    fn falls_back_to_document_store_when_sqlite_cannot_open() {
        let dir = TempDir::new().unwrap();

        // Occupy the database path with a directory so sqlite cannot open it
        std::fs::create_dir_all(dir.path().join(DB_FILENAME)).unwrap();

        let mut db = Database::open(dir.path()).unwrap();
        assert!(!db.is_persistent());

        // The fallback store still has full CRUD semantics
        let location = db.create_location(new_location("Dock")).unwrap();
        assert_eq!(db.list_locations().unwrap().len(), 1);
        db.delete_location(&location.id).unwrap();
        db.delete_location(&location.id).unwrap();
        assert_eq!(db.list_templates().unwrap().len(), 1);
    }

    #[test]
    fn blob_store_matches_sqlite_semantics() {
        let dir = TempDir::new().unwrap();
        let mut store = BlobStore::open(dir.path()).unwrap();

        let now = Utc::now();
        let location = SavedLocation {
            id: "loc-1".into(),
            name: "Dock".into(),
            coordinates: coordinates(37.7749, -122.4194),
            address: None,
            description: None,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        store.insert_location(&location).unwrap();
        assert_eq!(store.list_locations().unwrap().len(), 1);

        let mut missing = location.clone();
        missing.id = "loc-2".into();
        assert!(matches!(
            store.update_location(&missing),
            Err(GpsCamError::NotFound(_))
        ));

        store.delete_location("loc-1").unwrap();
        store.delete_location("loc-1").unwrap();
        assert!(store.list_locations().unwrap().is_empty());

        // Documents survive a reopen
        store.insert_location(&location).unwrap();
        let reopened = BlobStore::open(dir.path()).unwrap();
        assert_eq!(reopened.list_locations().unwrap().len(), 1);
    }
}
