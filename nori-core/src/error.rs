use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Service database error: {source}")]
    DatabaseError {
        #[from]
        source: rusqlite::Error,
    },

    #[error("Failed to access file: {source}")]
    IOError {
        #[from]
        source: io::Error,
    },

    #[error("Failed to read preferences: {source}")]
    PreferencesDeserializeFail {
        #[from]
        source: toml::de::Error,
    },

    #[error("Failed to write preferences: {source}")]
    PreferencesSerializeFail {
        #[from]
        source: toml::ser::Error,
    },

    #[error("Failed to serialize search history: {error}")]
    HistorySerializeFail { error: String },

    #[error("Failed to deserialize search history: {error}")]
    HistoryDeserializeFail { error: String },

    #[error("Unknown API type id {id} stored in service {row}")]
    UnknownApiType { id: i64, row: i64 },
}
