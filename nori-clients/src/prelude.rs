pub use crate::apis::prelude::*;
pub use crate::client::caps::{AuthenticationType, SearchThreadHandle, ServiceFeatures};
pub use crate::client::dispatch::ServiceClient;
pub use crate::client::{SearchClient, SiteApi};
pub use crate::detect::{detect_service, DetectedService, DEFAULT_DETECTION_TIMEOUT};
pub use crate::error::{ClientError, DetectionError};
pub use crate::settings::{Settings, DEFAULT_SERVICES};
