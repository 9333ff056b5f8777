//! Recently searched queries, newest first.
use std::path::Path;

use nori_common::{
    bincode::{deserialize, serialize},
    chrono::{serde::ts_seconds, DateTime, Utc},
    log::debug,
    serde::{self, Deserialize, Serialize},
    tokio::fs::{create_dir_all, read, write},
    zstd::{decode_all, encode_all},
};

use crate::error::CoreError;

pub const HISTORY_FILE: &str = "history.bin";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(crate = "self::serde")]
pub struct HistoryEntry {
    pub service: String,
    pub query: String,
    #[serde(with = "ts_seconds")]
    pub searched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(crate = "self::serde")]
pub struct SearchHistory {
    entries: Vec<HistoryEntry>,
    capacity: usize,
}

impl SearchHistory {
    pub const fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Reads the history at `path`. A missing file yields an empty history.
    ///
    /// `capacity` replaces whatever limit the file was written with.
    pub async fn load(path: &Path, capacity: usize) -> Result<Self, CoreError> {
        if !path.exists() {
            return Ok(Self::new(capacity));
        }

        let raw_data = read(path).await?;
        let mut history = match deserialize::<Self>(&decode_all(&*raw_data)?) {
            Ok(history) => history,
            Err(err) => {
                return Err(CoreError::HistoryDeserializeFail {
                    error: err.to_string(),
                })
            }
        };

        history.capacity = capacity;
        history.entries.truncate(capacity);
        debug!("Loaded {} history entries", history.entries.len());
        Ok(history)
    }

    pub async fn save(&self, path: &Path) -> Result<(), CoreError> {
        if let Some(parent) = path.parent() {
            create_dir_all(parent).await?;
        }
        write(path, self.to_bincode()?).await?;
        Ok(())
    }

    #[inline]
    fn to_bincode(&self) -> Result<Vec<u8>, CoreError> {
        match serialize(&self) {
            Ok(data) => Ok(encode_all(&*data, 9)?),
            Err(err) => Err(CoreError::HistorySerializeFail {
                error: err.to_string(),
            }),
        }
    }

    /// Records a search. Searching the same query on the same service again moves it to the
    /// front instead of adding a duplicate.
    pub fn push(&mut self, service: &str, query: &str) {
        let query = query.trim();
        self.entries
            .retain(|e| !(e.service == service && e.query == query));

        self.entries.insert(
            0,
            HistoryEntry {
                service: service.to_string(),
                query: query.to_string(),
                searched_at: Utc::now(),
            },
        );
        self.entries.truncate(self.capacity);
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
