use nori_common::reqwest::StatusCode;
use thiserror::Error;
use tokio::task::JoinError;

/// Every way a search can fail.
///
/// Network, HTTP and decoding problems from all backends are normalized into this type so
/// callers only ever have to deal with a single error signal.
#[derive(Error, Debug)]
pub enum ClientError {
    /// An error occurred during a network request (e.g., connection timeout, DNS resolution failure).
    #[error("Connection Error: {0}")]
    ConnectionError(#[from] nori_common::reqwest::Error),

    /// The server answered, but not with a success code.
    #[error("Server returned HTTP {status} for {url}")]
    ServerStatus { status: StatusCode, url: String },

    #[error("Error while deserializing JSON: {0}")]
    JsonDeserializeFail(#[from] serde_json::Error),

    #[error("Error while deserializing XML: {0}")]
    XmlDeserializeFail(#[from] quick_xml::DeError),

    /// Flickr reports API failures in the body of a `200 OK` response.
    #[error("Flickr API error {code}: {message}")]
    FlickrApi { code: i64, message: String },

    /// The backend can't be used without a credential that isn't configured.
    #[error("Missing credential: {field}")]
    MissingCredentials { field: String },

    #[error("Invalid endpoint URL: {url}")]
    InvalidEndpoint { url: String },

    /// The settings describe a different API than the adapter they were given to.
    #[error("Invalid API type for this client: {api}")]
    InvalidApiType { api: String },

    /// A background search task panicked or was cancelled.
    #[error("Search task failed: {0}")]
    TaskFailed(#[from] JoinError),
}

/// Failures of [`detect_service`](crate::detect::detect_service).
#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("Not a valid URL: {url}")]
    InvalidUrl { url: String },

    /// Every probe came back negative.
    #[error("No supported API found at {url}")]
    NoApiDetected { url: String },

    #[error("Failed to build HTTP client: {0}")]
    ClientBuildFail(#[from] nori_common::reqwest::Error),
}
