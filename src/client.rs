//! Lookup data source for academic years.
//!
//! The backend wraps every listing in an envelope:
//!
//! ```text
//! { "success": true,  "data": [ { "id": ..., "label": "2024-2025", "startMonth": 6 } ] }
//! { "success": false, "message": "Session expired" }
//! ```
//!
//! `data` entries are decoded one by one so a single malformed entry never
//! costs the whole list.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::Value;

use crate::config::LookupConfig;
use crate::consts::{API_KEY_HEADER, APP_VERSION_HEADER, FETCH_FAILED_MESSAGE};
use crate::record::AcademicYearRecord;
use crate::token::TokenError;

/// Error type for fetching the academic-year list.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// No bearer token was available.
    #[error(transparent)]
    Auth(#[from] TokenError),

    /// The request could not be sent or the body could not be read.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("server returned {status}")]
    Status { status: u16, message: Option<String> },

    /// The server answered `success: false`.
    #[error("server rejected the request: {}", message.as_deref().unwrap_or("no message"))]
    Rejected { message: Option<String> },

    /// The body was not a listing envelope.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// A header value could not be built from the configuration or token.
    #[error("invalid header {name}")]
    InvalidHeader { name: &'static str },
}

impl FetchError {
    /// Text shown to the user: the server's message verbatim, else a fallback.
    ///
    /// A blank server message counts as no message.
    pub fn user_message(&self) -> &str {
        let message = match self {
            Self::Status { message, .. } | Self::Rejected { message } => message.as_deref(),
            _ => None,
        };
        message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(FETCH_FAILED_MESSAGE)
    }
}

/// Source of configured academic years.
#[async_trait]
pub trait LookupSource: Send + Sync {
    /// Lists every configured academic year.
    ///
    /// # Errors
    /// Returns `FetchError` on transport, status or envelope failures.
    async fn academic_years(&self, token: &str) -> Result<Vec<AcademicYearRecord>, FetchError>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

/// HTTP client for the lookup endpoint.
#[derive(Debug, Clone)]
pub struct LookupClient {
    client: reqwest::Client,
    endpoint: String,
    headers: HeaderMap,
}

impl LookupClient {
    /// Builds a client from configuration.
    ///
    /// # Errors
    /// Returns `FetchError::InvalidHeader` if the API key or version cannot be
    /// sent as a header, or `FetchError::Transport` if the client cannot be built.
    pub fn new(config: &LookupConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, header_value(API_KEY_HEADER, &config.api_key)?);
        headers.insert(
            APP_VERSION_HEADER,
            header_value(APP_VERSION_HEADER, &config.app_version)?,
        );

        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint(),
            headers,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue, FetchError> {
    HeaderValue::from_str(value).map_err(|_| FetchError::InvalidHeader { name })
}

#[async_trait]
impl LookupSource for LookupClient {
    async fn academic_years(&self, token: &str) -> Result<Vec<AcademicYearRecord>, FetchError> {
        let mut bearer = header_value("authorization", &format!("Bearer {token}"))?;
        bearer.set_sensitive(true);

        tracing::debug!(endpoint = %self.endpoint, "fetching academic years");

        let response = self
            .client
            .get(&self.endpoint)
            .headers(self.headers.clone())
            .header(AUTHORIZATION, bearer)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|error| error.message);
            tracing::debug!(status = status.as_u16(), "academic year listing failed");
            return Err(FetchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Envelope = serde_json::from_slice(&body)
            .map_err(|e| FetchError::Malformed(format!("not a listing envelope: {e}")))?;
        decode_envelope(envelope)
    }
}

fn decode_envelope(envelope: Envelope) -> Result<Vec<AcademicYearRecord>, FetchError> {
    if !envelope.success {
        return Err(FetchError::Rejected {
            message: envelope.message,
        });
    }

    let entries = match envelope.data {
        Some(Value::Array(entries)) => entries,
        Some(Value::Null) | None => {
            return Err(FetchError::Malformed("missing `data` array".to_owned()));
        }
        Some(other) => {
            return Err(FetchError::Malformed(format!(
                "expected `data` to be an array, found {}",
                json_kind(&other)
            )));
        }
    };

    let total = entries.len();
    let records: Vec<AcademicYearRecord> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let record = AcademicYearRecord::from_value(entry);
            if record.is_none() {
                tracing::warn!(index, "skipping academic year entry without id or label");
            }
            record
        })
        .collect();

    tracing::debug!(total, kept = records.len(), "academic years decoded");
    Ok(records)
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
