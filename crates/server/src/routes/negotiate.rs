//! JSON/TOML payload negotiation via the `?type=` query parameter.
//! JSON is the default for an absent or unrecognized value.

use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct FormatQuery {
    #[serde(rename = "type")]
    pub format: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayloadFormat {
    Json,
    Toml,
}

impl PayloadFormat {
    pub fn from_query(q: &FormatQuery) -> Self {
        match q.format.as_deref() {
            Some("toml") => Self::Toml,
            _ => Self::Json,
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Toml => "application/toml",
        }
    }
}

/// Encode `value` in the negotiated format with the matching content type.
pub fn encode<T: Serialize>(format: PayloadFormat, value: &T) -> Result<Response, ApiError> {
    let body = match format {
        PayloadFormat::Json => serde_json::to_string(value)
            .map_err(|e| ApiError::internal(format!("failed to encode response: {}", e)))?,
        PayloadFormat::Toml => toml::to_string(value)
            .map_err(|e| ApiError::internal(format!("failed to encode response: {}", e)))?,
    };
    Ok(([(header::CONTENT_TYPE, format.content_type())], body).into_response())
}

/// Decode a request body in the negotiated format. Undecodable bodies are the
/// caller's fault, not the server's.
pub fn decode<T: DeserializeOwned>(format: PayloadFormat, bytes: &[u8]) -> Result<T, ApiError> {
    match format {
        PayloadFormat::Json => serde_json::from_slice(bytes)
            .map_err(|e| ApiError::bad_request(format!("failed to decode request body: {}", e))),
        PayloadFormat::Toml => {
            let text = std::str::from_utf8(bytes)
                .map_err(|e| ApiError::bad_request(format!("failed to decode request body: {}", e)))?;
            toml::from_str(text)
                .map_err(|e| ApiError::bad_request(format!("failed to decode request body: {}", e)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_is_the_default_format() {
        assert_eq!(PayloadFormat::from_query(&FormatQuery { format: None }), PayloadFormat::Json);
        assert_eq!(
            PayloadFormat::from_query(&FormatQuery { format: Some("yaml".into()) }),
            PayloadFormat::Json
        );
        assert_eq!(
            PayloadFormat::from_query(&FormatQuery { format: Some("toml".into()) }),
            PayloadFormat::Toml
        );
    }

    #[test]
    fn decode_rejects_garbage_with_bad_request() {
        let err = decode::<models::Configuration>(PayloadFormat::Json, b"{oops").unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    }
}
