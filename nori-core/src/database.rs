//! SQLite store of the services the user has configured.
use std::path::Path;

use nori_clients::settings::{Settings, FLICKR_API_ENDPOINT};
use nori_common::{log::debug, tokio::sync::broadcast, ApiType};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::CoreError;

const EVENT_CAPACITY: usize = 16;

/// Broadcast after every write that changed a row. Carries the row id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseEvent {
    Inserted(i64),
    Updated(i64),
    Deleted(i64),
}

type RawRow = (i64, i64, String, String, Option<String>, Option<String>);

pub struct ServiceDatabase {
    conn: Connection,
    events: broadcast::Sender<DatabaseEvent>,
}

impl ServiceDatabase {
    /// Opens (or creates) the database file at `path`.
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        debug!("Opening service database at {}", path.display());
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, CoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, CoreError> {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'search_clients')",
            [],
            |row| row.get(0),
        )?;

        if !exists {
            conn.execute(
                "CREATE TABLE search_clients (
                    id       INTEGER PRIMARY KEY AUTOINCREMENT,
                    type     INTEGER NOT NULL,
                    name     TEXT NOT NULL,
                    endpoint TEXT NOT NULL,
                    username TEXT,
                    password TEXT
                )",
                [],
            )?;

            // A fresh install starts with Flickr, which works without an account.
            conn.execute(
                "INSERT INTO search_clients (type, name, endpoint) VALUES (?1, ?2, ?3)",
                params![ApiType::Flickr as u8, "Flickr", FLICKR_API_ENDPOINT],
            )?;
            debug!("Created search_clients table");
        }

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(Self { conn, events })
    }

    /// Receives an event for every insert, update and delete made through this handle.
    pub fn subscribe(&self) -> broadcast::Receiver<DatabaseEvent> {
        self.events.subscribe()
    }

    fn notify(&self, event: DatabaseEvent) {
        debug!("Service database event: {event:?}");
        // No receivers is fine.
        let _ = self.events.send(event);
    }

    /// Every stored service, ordered by id.
    pub fn get_all(&self) -> Result<Vec<(i64, Settings)>, CoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, type, name, endpoint, username, password FROM search_clients ORDER BY id",
        )?;

        let rows = stmt
            .query_map([], read_row)?
            .collect::<Result<Vec<RawRow>, _>>()?;

        rows.into_iter()
            .map(|row| {
                let id = row.0;
                Ok((id, to_settings(row)?))
            })
            .collect()
    }

    pub fn get(&self, id: i64) -> Result<Option<Settings>, CoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, type, name, endpoint, username, password FROM search_clients WHERE id = ?1",
                params![id],
                read_row,
            )
            .optional()?;

        row.map(to_settings).transpose()
    }

    /// Stores a new service and returns its id.
    pub fn insert(&self, settings: &Settings) -> Result<i64, CoreError> {
        self.conn.execute(
            "INSERT INTO search_clients (type, name, endpoint, username, password)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                settings.api_type as u8,
                settings.name,
                settings.endpoint,
                settings.username,
                settings.password
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.notify(DatabaseEvent::Inserted(id));
        Ok(id)
    }

    /// Returns the number of rows changed.
    pub fn update(&self, id: i64, settings: &Settings) -> Result<usize, CoreError> {
        let changed = self.conn.execute(
            "UPDATE search_clients
             SET type = ?1, name = ?2, endpoint = ?3, username = ?4, password = ?5
             WHERE id = ?6",
            params![
                settings.api_type as u8,
                settings.name,
                settings.endpoint,
                settings.username,
                settings.password,
                id
            ],
        )?;

        if changed > 0 {
            self.notify(DatabaseEvent::Updated(id));
        }
        Ok(changed)
    }

    /// Returns the number of rows removed.
    pub fn delete(&self, id: i64) -> Result<usize, CoreError> {
        let changed = self
            .conn
            .execute("DELETE FROM search_clients WHERE id = ?1", params![id])?;

        if changed > 0 {
            self.notify(DatabaseEvent::Deleted(id));
        }
        Ok(changed)
    }
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn to_settings(row: RawRow) -> Result<Settings, CoreError> {
    let (id, api_id, name, endpoint, username, password) = row;

    let api_type = u8::try_from(api_id)
        .ok()
        .and_then(ApiType::from_id)
        .ok_or(CoreError::UnknownApiType { id: api_id, row: id })?;

    Ok(Settings::new(
        api_type,
        &name,
        &endpoint,
        username.as_deref(),
        password.as_deref(),
    ))
}
