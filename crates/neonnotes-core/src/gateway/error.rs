//! Normalization of backend failures into a single display message.

use serde_json::{Map, Value};
use thiserror::Error;

/// Shown whenever no better message can be extracted.
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred.";

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// A failed backend call. Every variant displays as its normalized message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No response was received.
    #[error("{message}")]
    Network { message: String },

    /// The backend rejected specific fields, e.g. `{"username": ["Required."]}`.
    #[error("{message}")]
    Validation {
        status: u16,
        /// Field name to messages, in body order.
        fields: Vec<(String, Vec<String>)>,
        message: String,
    },

    /// Any other failure, including undecodable success bodies.
    #[error("{message}")]
    Failure { status: Option<u16>, message: String },
}

impl ApiError {
    pub(crate) fn network(error: &reqwest::Error) -> Self {
        tracing::warn!("Request failed before a response was received: {}", error);
        Self::Network {
            message: GENERIC_ERROR_MESSAGE.to_string(),
        }
    }

    /// A 2xx response whose body did not have the expected shape.
    pub(crate) fn undecodable(status: u16, error: &reqwest::Error) -> Self {
        tracing::warn!("Failed to decode response body (HTTP {}): {}", status, error);
        Self::Failure {
            status: Some(status),
            message: GENERIC_ERROR_MESSAGE.to_string(),
        }
    }

    /// A 2xx response that decoded but cannot be used.
    pub(crate) fn malformed(status: u16, reason: &str) -> Self {
        tracing::warn!("Unusable response body (HTTP {}): {}", status, reason);
        Self::Failure {
            status: Some(status),
            message: GENERIC_ERROR_MESSAGE.to_string(),
        }
    }

    /// Classify a non-2xx response from its status and raw body.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = extract_error_message(body);
        let Ok(Value::Object(object)) = serde_json::from_str::<Value>(body) else {
            return Self::Failure {
                status: Some(status),
                message,
            };
        };

        if detail_message(&object).is_some() {
            return Self::Failure {
                status: Some(status),
                message,
            };
        }

        let fields = field_errors(&object);
        if fields.is_empty() {
            Self::Failure {
                status: Some(status),
                message,
            }
        } else {
            Self::Validation {
                status,
                fields,
                message,
            }
        }
    }

    /// The normalized, never-empty display string.
    pub fn message(&self) -> &str {
        match self {
            Self::Network { message }
            | Self::Validation { message, .. }
            | Self::Failure { message, .. } => message,
        }
    }

    /// HTTP status, when a response was received.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Network { .. } => None,
            Self::Validation { status, .. } => Some(*status),
            Self::Failure { status, .. } => *status,
        }
    }

    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Messages reported for one field, if any.
    pub fn field_messages(&self, field: &str) -> Option<&[String]> {
        match self {
            Self::Validation { fields, .. } => fields
                .iter()
                .find(|(name, _)| name == field)
                .map(|(_, messages)| messages.as_slice()),
            _ => None,
        }
    }
}

/// Map any error body to one human-readable line.
///
/// Checks, in order: a top-level `detail` string, then the first message of
/// the first field carrying errors, then falls back to
/// [`GENERIC_ERROR_MESSAGE`]. A top-level list, as DRF sends for a view-level
/// `ValidationError`, yields its first message. Never panics and never
/// returns an empty string.
pub fn extract_error_message(body: &str) -> String {
    let message = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(object)) => {
            detail_message(&object).or_else(|| object.values().find_map(first_message))
        }
        Ok(Value::Array(items)) => items.first().and_then(first_message),
        _ => None,
    };
    message.unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string())
}

fn detail_message(object: &Map<String, Value>) -> Option<String> {
    object.get("detail").and_then(first_message)
}

// DRF nests errors for related serializers, so lists and objects recurse.
fn first_message(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Array(items) => items.first().and_then(first_message),
        Value::Object(object) => object.values().find_map(first_message),
        _ => None,
    }
}

fn field_errors(object: &Map<String, Value>) -> Vec<(String, Vec<String>)> {
    object
        .iter()
        .filter_map(|(field, value)| {
            let messages = match value {
                Value::String(_) => first_message(value).into_iter().collect(),
                Value::Array(items) => items.iter().filter_map(first_message).collect(),
                _ => Vec::new(),
            };
            (!messages.is_empty()).then(|| (field.clone(), messages))
        })
        .collect()
}
