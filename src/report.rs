//! Request/response reports
//!
//! A [`Report`] describes one completed request/response cycle. Hosts hand
//! the logger either a ready-made `Report` or its JSON wire form
//! ([`RawReport`]), which is validated on conversion.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ReportError;

/// Response header naming the exit (outcome) that produced the response
pub const HEADER_EXIT: &str = "x-exit";
/// Response header overriding the humanized exit name
pub const HEADER_EXIT_FRIENDLY_NAME: &str = "x-exit-friendly-name";
/// Response header with a one-line exit description
pub const HEADER_EXIT_DESCRIPTION: &str = "x-exit-description";
/// Response header with a longer exit description
pub const HEADER_EXIT_EXTENDED_DESCRIPTION: &str = "x-exit-extended-description";
/// Response header pointing at further documentation for the exit
pub const HEADER_EXIT_MORE_INFO_URL: &str = "x-exit-more-info-url";
/// Response header naming the view template that was rendered
pub const HEADER_EXIT_VIEW_TEMPLATE_PATH: &str = "x-exit-view-template-path";

/// Where a request was headed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// The resolved route path
    Path(String),
    /// No route matched; only the raw request url is known
    Unmatched {
        /// Raw request url
        url: String,
    },
}

impl Location {
    /// The text shown in the log line and used for alignment
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Path(path) => path,
            Self::Unmatched { url } => url,
        }
    }
}

/// What handled the request
///
/// Any present field means the request reached application code rather
/// than a static asset handler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Action identity, e.g. `user/create`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Controller name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<String>,
    /// View name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    /// Model identity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl Target {
    /// Returns true if none of the fields carry a non-empty value
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [&self.action, &self.controller, &self.view, &self.model]
            .iter()
            .all(|field| field.as_deref().unwrap_or_default().is_empty())
    }
}

/// Exit metadata carried in the response headers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExitHeaders {
    /// Raw exit identifier (`x-exit`); the block renders only when set
    pub exit: Option<String>,
    /// `x-exit-friendly-name`
    pub friendly_name: Option<String>,
    /// `x-exit-description`
    pub description: Option<String>,
    /// `x-exit-extended-description`
    pub extended_description: Option<String>,
    /// `x-exit-more-info-url`
    pub more_info_url: Option<String>,
    /// `x-exit-view-template-path`
    pub view_template_path: Option<String>,
}

impl ExitHeaders {
    /// Pick the exit headers out of a header map.
    ///
    /// Header names are matched case-insensitively. Only string values are
    /// used; other headers may hold any JSON value and are ignored.
    #[must_use]
    pub fn from_headers(headers: &BTreeMap<String, Value>) -> Self {
        let lowered: BTreeMap<String, &str> = headers
            .iter()
            .filter_map(|(name, value)| Some((name.to_ascii_lowercase(), value.as_str()?)))
            .collect();
        let get = |name: &str| lowered.get(name).map(|value| (*value).to_string());

        Self {
            exit: get(HEADER_EXIT),
            friendly_name: get(HEADER_EXIT_FRIENDLY_NAME),
            description: get(HEADER_EXIT_DESCRIPTION),
            extended_description: get(HEADER_EXIT_EXTENDED_DESCRIPTION),
            more_info_url: get(HEADER_EXIT_MORE_INFO_URL),
            view_template_path: get(HEADER_EXIT_VIEW_TEMPLATE_PATH),
        }
    }
}

/// One completed request/response cycle
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Uppercase HTTP verb
    pub method: String,
    /// Resolved path, or the raw url when nothing matched
    pub location: Location,
    /// HTTP status code
    pub status_code: u16,
    /// Elapsed time in milliseconds
    pub response_time: u64,
    /// What handled the request
    pub target: Target,
    /// Exit metadata from the response headers
    pub exit: ExitHeaders,
    /// Request parameters; redacted on dispatch, never rendered
    pub params: Option<Value>,
}

impl Report {
    /// Create a report with an empty target and no exit metadata
    #[must_use]
    pub fn new(method: &str, location: Location, status_code: u16, response_time: u64) -> Self {
        Self {
            method: method.to_string(),
            location,
            status_code,
            response_time,
            target: Target::default(),
            exit: ExitHeaders::default(),
            params: None,
        }
    }

    /// Decode and validate a report from its JSON text
    pub fn from_json(json: &str) -> Result<Self, ReportError> {
        let raw: RawReport = serde_json::from_str(json)?;
        Self::try_from(raw)
    }

    /// Decode and validate a report from an already parsed JSON value
    pub fn from_value(value: Value) -> Result<Self, ReportError> {
        let raw: RawReport = serde_json::from_value(value)?;
        Self::try_from(raw)
    }
}

/// Diagnostic fallback used when no route matched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Raw request url
    #[serde(default)]
    pub url: Option<String>,
}

/// Wire form of a report as produced by the host framework
///
/// Every field is optional here; [`Report::try_from`] decides what is
/// actually required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReport {
    /// HTTP verb
    #[serde(default)]
    pub method: Option<String>,
    /// Resolved route path
    #[serde(default)]
    pub path: Option<String>,
    /// Fallback descriptor when `path` is absent
    #[serde(default)]
    pub diagnostic: Option<Diagnostic>,
    /// HTTP status code
    #[serde(default)]
    pub status_code: Option<u16>,
    /// Elapsed milliseconds
    #[serde(default)]
    pub response_time: Option<u64>,
    /// What handled the request
    #[serde(default, deserialize_with = "null_as_default")]
    pub target: Target,
    /// Response headers; values are left as raw JSON
    #[serde(default, deserialize_with = "null_as_default")]
    pub response_headers: BTreeMap<String, Value>,
    /// Request parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// Treat an explicit `null` like an absent field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl TryFrom<RawReport> for Report {
    type Error = ReportError;

    fn try_from(raw: RawReport) -> Result<Self, Self::Error> {
        let method = raw.method.ok_or(ReportError::MissingField("method"))?;
        if method.trim().is_empty() {
            return Err(ReportError::InvalidField {
                field: "method",
                reason: "must not be empty".to_string(),
            });
        }

        let location = match (raw.path, raw.diagnostic.and_then(|d| d.url)) {
            (Some(path), _) => Location::Path(path),
            (None, Some(url)) => Location::Unmatched { url },
            (None, None) => return Err(ReportError::MissingField("diagnostic.url")),
        };

        let status_code = raw.status_code.ok_or(ReportError::MissingField("statusCode"))?;
        let response_time = raw
            .response_time
            .ok_or(ReportError::MissingField("responseTime"))?;

        Ok(Self {
            method,
            location,
            status_code,
            response_time,
            target: raw.target,
            exit: ExitHeaders::from_headers(&raw.response_headers),
            params: raw.params,
        })
    }
}
