//! Parsing helpers shared by the API modules.
use chrono::{DateTime, NaiveDateTime, Utc};
use nori_common::{
    log::debug,
    serde::{self, Deserialize, Deserializer},
    Rating,
};
use std::borrow::Cow;

/// Percent-encodes a space-separated tag query for use in a URL.
pub fn encode_tags(tags: &str) -> Cow<'_, str> {
    let encoded = urlencoding::encode(tags.trim());
    debug!("Tag query: {encoded}");
    encoded
}

/// Number that some APIs send as a JSON number, some as a string and some as a boolean.
#[derive(Debug, Clone, Deserialize)]
#[serde(crate = "self::serde", untagged)]
pub enum LenientNumber {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl LenientNumber {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Float(f) => Some(*f as i64),
            Self::Bool(b) => Some(i64::from(*b)),
            Self::Str(s) => s.trim().parse().ok(),
        }
    }

    pub fn as_bool(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Str(s) => matches!(s.trim(), "true" | "1"),
            _ => self.as_i64().is_some_and(|i| i != 0),
        }
    }

    /// Textual form, used for IDs.
    pub fn to_id(&self) -> Option<String> {
        match self {
            Self::Str(s) if s.trim().is_empty() => None,
            Self::Str(s) => Some(s.trim().to_string()),
            Self::Bool(_) => None,
            _ => self.as_i64().map(|i| i.to_string()),
        }
    }
}

/// Deserializes an optional [`LenientNumber`], turning malformed values into `None` instead of
/// failing the whole page.
pub fn lenient<'de, D>(deserializer: D) -> Result<Option<LenientNumber>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<LenientNumber>::deserialize(deserializer).unwrap_or(None))
}

/// Treats an explicit `null` like a missing field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Converts an optional lenient number into an unsigned size, defaulting to zero.
pub fn to_u32(value: Option<&LenientNumber>) -> u32 {
    value
        .and_then(LenientNumber::as_i64)
        .and_then(|i| u32::try_from(i).ok())
        .unwrap_or_default()
}

/// Parses an unsigned size from a string attribute, defaulting to zero.
pub fn parse_u32(value: Option<&str>) -> u32 {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or_default()
}

/// Parent IDs of `0` or empty strings mean "no parent".
pub fn parent_id(value: Option<String>) -> Option<String> {
    value.filter(|id| !id.is_empty() && id != "0")
}

/// Empty strings are as good as a missing value.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Rating schemes that use `g`eneral and `s`ensitive on top of the usual three.
pub fn rating_with_general(rating: &str) -> Rating {
    match rating.trim().to_lowercase().as_str() {
        "g" | "general" => Rating::Safe,
        "s" | "sensitive" => Rating::Questionable,
        other => Rating::from_rating_str(other),
    }
}

/// ISO 8601 timestamp, with or without a time zone.
pub fn parse_iso8601(date: &str) -> Option<DateTime<Utc>> {
    let date = date.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(date) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Format used by Gelbooru and older Danbooru versions, e.g. `Sat Jun 15 20:51:33 -0500 2024`.
pub fn parse_ctime(date: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(date.trim(), "%a %b %d %H:%M:%S %z %Y")
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

/// Seconds since the Unix epoch.
pub fn parse_unix(date: &str) -> Option<DateTime<Utc>> {
    let secs: i64 = date.trim().parse().ok()?;
    DateTime::from_timestamp(secs, 0)
}

/// `yyyy-MM-dd HH:mm:ss`, assumed to be UTC.
pub fn parse_sql_datetime(date: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(date.trim(), "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Tries every date format known to be used by the supported APIs.
pub fn parse_date(date: &str) -> Option<DateTime<Utc>> {
    if date.trim().is_empty() {
        return None;
    }

    let parsed = parse_unix(date)
        .or_else(|| parse_iso8601(date))
        .or_else(|| parse_ctime(date))
        .or_else(|| parse_sql_datetime(date));

    if parsed.is_none() {
        debug!("Unrecognised date format: {date}");
    }
    parsed
}
