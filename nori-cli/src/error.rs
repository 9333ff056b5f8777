use std::io;

use nori_clients::error::{ClientError, DetectionError};
use nori_core::CoreError;
use thiserror::Error;

#[allow(clippy::enum_variant_names)]
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Search failed: {source}")]
    ClientError {
        #[from]
        source: ClientError,
    },

    #[error("Service detection failed: {source}")]
    DetectionError {
        #[from]
        source: DetectionError,
    },

    #[error("{source}")]
    CoreError {
        #[from]
        source: CoreError,
    },

    #[error("Failed to write input to console: {source}")]
    DialoguerIOFail {
        #[from]
        source: dialoguer::Error,
    },

    #[error("Failed to access file: {source}")]
    IOError {
        #[from]
        source: io::Error,
    },

    #[error("Failed to print results as JSON: {source}")]
    JsonSerializeFail {
        #[from]
        source: nori_common::serde_json::Error,
    },

    #[error("Service {id} does not exist.")]
    ServiceNotExists { id: i64 },

    #[error("No services configured. Add one with `nori services add` or `nori services detect`.")]
    NoServicesConfigured,
}
