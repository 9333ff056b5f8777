//! Figures out which API a website speaks.
//!
//! Flickr URLs are recognised by their shape alone. Everything else is probed over HTTP, one
//! API at a time, until a probe succeeds.
use nori_common::{
    log::{debug, info},
    reqwest::{
        header::{HeaderMap, HeaderValue, CACHE_CONTROL},
        redirect::Policy,
        Client, StatusCode,
    },
    serde_json::{self, Value},
    ApiType,
};
use std::time::Duration;
use url::Url;

use crate::apis::flickr::FlickrUserApi;
use crate::error::DetectionError;
use crate::settings::FLICKR_API_ENDPOINT;

pub const DEFAULT_DETECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome of a successful detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedService {
    pub api_type: ApiType,
    /// Endpoint to store in the service settings.
    pub endpoint: String,
}

#[derive(Debug, Clone, Copy)]
enum Expect {
    /// A `200 OK` is enough.
    Ok,
    /// A `200 OK` with a JSON object containing a `posts` field.
    JsonPosts,
}

#[derive(Debug, Clone, Copy)]
struct Probe {
    api_type: ApiType,
    path: &'static str,
    expect: Expect,
}

/// E621 must go before Danbooru, both answer on `/posts.json`.
const PROBES: [Probe; 5] = [
    Probe {
        api_type: ApiType::E621,
        path: "/posts.json",
        expect: Expect::JsonPosts,
    },
    Probe {
        api_type: ApiType::Danbooru,
        path: "/posts.json",
        expect: Expect::Ok,
    },
    Probe {
        api_type: ApiType::DanbooruLegacy,
        path: "/post/index.xml",
        expect: Expect::Ok,
    },
    Probe {
        api_type: ApiType::Gelbooru,
        path: "/index.php?page=dapi&s=post&q=index",
        expect: Expect::Ok,
    },
    Probe {
        api_type: ApiType::Shimmie,
        path: "/api/danbooru/find_posts/index.xml",
        expect: Expect::Ok,
    },
];

/// Adds `https://` when no scheme is given and drops any query or fragment.
pub fn normalize_url(url: &str) -> Result<Url, DetectionError> {
    let invalid = || DetectionError::InvalidUrl {
        url: url.to_string(),
    };

    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(invalid());
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let parsed = Url::parse(&with_scheme).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(invalid());
    }
    Ok(parsed)
}

/// Recognises Flickr URLs without touching the network.
fn detect_flickr(url: &Url) -> Option<DetectedService> {
    if let Some(user) = FlickrUserApi::user_id(url.as_str()) {
        return Some(DetectedService {
            api_type: ApiType::FlickrUser,
            endpoint: format!("https://www.flickr.com/photos/{user}"),
        });
    }

    let host = url.host_str()?;
    if host == "flickr.com" || host.ends_with(".flickr.com") {
        return Some(DetectedService {
            api_type: ApiType::Flickr,
            endpoint: FLICKR_API_ENDPOINT.to_string(),
        });
    }
    None
}

async fn run_probe(client: &Client, endpoint: &str, probe: Probe) -> bool {
    let url = format!("{endpoint}{}", probe.path);
    debug!("Probing {} at {url}", probe.api_type);

    let response = match client.get(&url).send().await {
        Ok(response) => response,
        Err(error) => {
            debug!("Probe failed: {error}");
            return false;
        }
    };

    if response.status() != StatusCode::OK {
        debug!("Probe got HTTP {}", response.status());
        return false;
    }

    match probe.expect {
        Expect::Ok => true,
        Expect::JsonPosts => match response.text().await {
            Ok(body) => serde_json::from_str::<Value>(&body)
                .is_ok_and(|json| json.as_object().is_some_and(|o| o.contains_key("posts"))),
            Err(_) => false,
        },
    }
}

/// Detects the API exposed at `url`.
///
/// Every HTTP probe is bounded by `timeout` and never follows redirects. Failed probes count as
/// a negative answer.
pub async fn detect_service(
    url: &str,
    timeout: Duration,
) -> Result<DetectedService, DetectionError> {
    let mut parsed = normalize_url(url)?;

    if let Some(service) = detect_flickr(&parsed) {
        info!("Detected {} from the URL", service.api_type.pretty_name());
        return Ok(service);
    }

    parsed.set_query(None);
    parsed.set_fragment(None);
    let endpoint = parsed.as_str().trim_end_matches('/').to_string();

    let mut headers = HeaderMap::new();
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    let client = Client::builder()
        .user_agent(ApiType::Danbooru.user_agent())
        .default_headers(headers)
        .redirect(Policy::none())
        .timeout(timeout)
        .build()?;

    for probe in PROBES {
        if run_probe(&client, &endpoint, probe).await {
            info!("Detected {} at {endpoint}", probe.api_type.pretty_name());
            return Ok(DetectedService {
                api_type: probe.api_type,
                endpoint,
            });
        }
    }

    Err(DetectionError::NoApiDetected { url: endpoint })
}
