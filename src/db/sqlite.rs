//! SQLite record store
//!
//! The native backend for saved locations and overlay templates. One
//! connection per store, schema created on open. Template fields and
//! location tags are stored as JSON text; timestamps as ISO-8601 text.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};

use crate::error::{GpsCamError, Result};
use crate::gps::{CoordinateReading, SavedLocation};
use crate::overlay::template::{Layout, LogoPosition, OverlayTemplate};

pub struct SqliteStore {
    conn: Connection,
    db_path: PathBuf,
}

fn to_iso(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn from_iso(raw: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc))
}

fn layout_to_str(layout: Layout) -> &'static str {
    match layout {
        Layout::Horizontal => "horizontal",
        Layout::Vertical => "vertical",
        Layout::Grid => "grid",
    }
}

fn layout_from_str(raw: &str) -> Layout {
    match raw {
        "vertical" => Layout::Vertical,
        "grid" => Layout::Grid,
        _ => Layout::Horizontal,
    }
}

fn logo_position_to_str(position: LogoPosition) -> &'static str {
    match position {
        LogoPosition::Left => "left",
        LogoPosition::Right => "right",
        LogoPosition::Center => "center",
    }
}

fn logo_position_from_str(raw: &str) -> Option<LogoPosition> {
    match raw {
        "left" => Some(LogoPosition::Left),
        "right" => Some(LogoPosition::Right),
        "center" => Some(LogoPosition::Center),
        _ => None,
    }
}

impl SqliteStore {
    /// Open or create the database at the given path
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        let store = SqliteStore {
            conn,
            db_path: db_path.to_path_buf(),
        };
        store.init_schema()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS saved_locations (
                id          TEXT PRIMARY KEY,
                name        TEXT NOT NULL,
                latitude    REAL NOT NULL,
                longitude   REAL NOT NULL,
                altitude    REAL,
                accuracy    REAL,
                address     TEXT,
                description TEXT,
                tags        TEXT,
                created_at  TEXT NOT NULL,
                updated_at  TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS overlay_templates (
                id               TEXT PRIMARY KEY,
                name             TEXT NOT NULL,
                fields           TEXT NOT NULL,
                layout           TEXT NOT NULL,
                background_color TEXT NOT NULL,
                text_color       TEXT NOT NULL,
                font_size        INTEGER NOT NULL,
                logo_position    TEXT,
                show_logo        INTEGER NOT NULL,
                created_at       TEXT NOT NULL,
                updated_at       TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_saved_locations_updated_at
             ON saved_locations(updated_at DESC)",
            [],
        )?;

        Ok(())
    }

    // ==================== Saved locations ====================

    pub fn insert_location(&self, location: &SavedLocation) -> Result<()> {
        let tags = if location.tags.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&location.tags)?)
        };

        self.conn.execute(
            "INSERT INTO saved_locations
             (id, name, latitude, longitude, altitude, accuracy, address, description, tags, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                location.id,
                location.name,
                location.coordinates.latitude,
                location.coordinates.longitude,
                location.coordinates.altitude,
                location.coordinates.accuracy,
                location.address,
                location.description,
                tags,
                to_iso(location.created_at),
                to_iso(location.updated_at),
            ],
        )?;
        Ok(())
    }

    pub fn update_location(&self, location: &SavedLocation) -> Result<()> {
        let tags = if location.tags.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&location.tags)?)
        };

        let changed = self.conn.execute(
            "UPDATE saved_locations
             SET name = ?2, latitude = ?3, longitude = ?4, altitude = ?5, accuracy = ?6,
                 address = ?7, description = ?8, tags = ?9, updated_at = ?10
             WHERE id = ?1",
            params![
                location.id,
                location.name,
                location.coordinates.latitude,
                location.coordinates.longitude,
                location.coordinates.altitude,
                location.coordinates.accuracy,
                location.address,
                location.description,
                tags,
                to_iso(location.updated_at),
            ],
        )?;

        if changed == 0 {
            return Err(GpsCamError::NotFound(location.id.clone()));
        }
        Ok(())
    }

    /// All saved locations, most recently updated first
    pub fn list_locations(&self) -> Result<Vec<SavedLocation>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, latitude, longitude, altitude, accuracy, address, description, tags, created_at, updated_at
             FROM saved_locations ORDER BY updated_at DESC",
        )?;

        type LocationRow = (
            String,
            String,
            f64,
            f64,
            Option<f64>,
            Option<f64>,
            Option<String>,
            Option<String>,
            Option<String>,
            String,
            String,
        );

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
                row.get(7)?,
                row.get(8)?,
                row.get(9)?,
                row.get(10)?,
            ))
        })?;

        let mut locations = Vec::new();
        for row in rows {
            let (id, name, latitude, longitude, altitude, accuracy, address, description, tags, created_at, updated_at): LocationRow = row?;
            let created_at = from_iso(&created_at)?;
            locations.push(SavedLocation {
                id,
                name,
                coordinates: CoordinateReading {
                    latitude,
                    longitude,
                    altitude,
                    accuracy,
                    // The sample timestamp is not stored separately;
                    // it is reconstructed from the record's creation time
                    captured_at: created_at,
                },
                address,
                description,
                tags: match tags {
                    Some(json) => serde_json::from_str(&json)?,
                    None => Vec::new(),
                },
                created_at,
                updated_at: from_iso(&updated_at)?,
            });
        }

        Ok(locations)
    }

    /// Delete by id. Deleting a missing id is not an error.
    pub fn delete_location(&self, id: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM saved_locations WHERE id = ?1", params![id])?;
        Ok(())
    }

    // ==================== Overlay templates ====================

    pub fn insert_template(&self, template: &OverlayTemplate) -> Result<()> {
        let now = to_iso(Utc::now());
        self.conn.execute(
            "INSERT INTO overlay_templates
             (id, name, fields, layout, background_color, text_color, font_size, logo_position, show_logo, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                template.id,
                template.name,
                template.fields_json()?,
                layout_to_str(template.layout),
                template.background_color,
                template.text_color,
                template.font_size,
                template.logo_position.map(logo_position_to_str),
                template.show_logo as i32,
                now,
                now,
            ],
        )?;
        Ok(())
    }

    pub fn update_template(&self, template: &OverlayTemplate) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE overlay_templates
             SET name = ?2, fields = ?3, layout = ?4, background_color = ?5, text_color = ?6,
                 font_size = ?7, logo_position = ?8, show_logo = ?9, updated_at = ?10
             WHERE id = ?1",
            params![
                template.id,
                template.name,
                template.fields_json()?,
                layout_to_str(template.layout),
                template.background_color,
                template.text_color,
                template.font_size,
                template.logo_position.map(logo_position_to_str),
                template.show_logo as i32,
                to_iso(Utc::now()),
            ],
        )?;

        if changed == 0 {
            return Err(GpsCamError::NotFound(template.id.clone()));
        }
        Ok(())
    }

    /// All templates, ordered by name
    pub fn list_templates(&self) -> Result<Vec<OverlayTemplate>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, fields, layout, background_color, text_color, font_size, logo_position, show_logo
             FROM overlay_templates ORDER BY name",
        )?;

        type TemplateRow = (
            String,
            String,
            String,
            String,
            String,
            String,
            u32,
            Option<String>,
            i32,
        );

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
                row.get(7)?,
                row.get(8)?,
            ))
        })?;

        let mut templates = Vec::new();
        for row in rows {
            let (id, name, fields, layout, background_color, text_color, font_size, logo_position, show_logo): TemplateRow = row?;
            templates.push(OverlayTemplate {
                id,
                name,
                fields: OverlayTemplate::fields_from_json(&fields)?,
                layout: layout_from_str(&layout),
                background_color,
                text_color,
                font_size,
                show_logo: show_logo != 0,
                logo_position: logo_position.as_deref().and_then(logo_position_from_str),
            });
        }

        Ok(templates)
    }

    /// Delete by id. Deleting a missing id is not an error.
    pub fn delete_template(&self, id: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM overlay_templates WHERE id = ?1", params![id])?;
        Ok(())
    }

    pub fn template_count(&self) -> Result<i64> {
        let count =
            self.conn
                .query_row("SELECT COUNT(*) FROM overlay_templates", [], |row| {
                    row.get(0)
                })?;
        Ok(count)
    }
}
