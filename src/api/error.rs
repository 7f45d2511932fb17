//! Client-side error handling for SwiftHire API calls.
//!
//! Every failure a request can produce is a [`ClientError`]. Views show
//! [`ClientError::user_message`] inline and leave their prior state untouched.

use crate::session::StorageError;
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Field name to the messages that field failed with
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: FieldErrors,
}

impl ValidationErrors {
    pub fn fields(&self) -> &FieldErrors {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&[String]> {
        self.fields.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.fields.len() == 1 {
            let message = self
                .fields
                .values()
                .next()
                .and_then(|v| v.first())
                .map(String::as_str)
                .unwrap_or("Validation failed");
            f.write_str(message)
        } else {
            write!(f, "Validation failed for {} fields", self.fields.len())
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Network failure or timeout
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Non-2xx response
    #[error("[{status}] {detail}")]
    Status { status: StatusCode, detail: String },

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("could not persist session: {0}")]
    Storage(#[from] StorageError),

    #[error("no user is signed in")]
    NotSignedIn,
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err)
        }
    }
}

impl From<ValidationErrors> for ClientError {
    fn from(err: ValidationErrors) -> Self {
        ClientError::Validation(err)
    }
}

/// FastAPI-style error envelope
#[derive(Debug, Deserialize)]
struct DetailBody {
    detail: serde_json::Value,
}

impl ClientError {
    /// Build a status error from a response body, preferring its `detail` field
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let detail = match serde_json::from_str::<DetailBody>(body) {
            Ok(DetailBody {
                detail: serde_json::Value::String(s),
            }) => s,
            Ok(DetailBody { detail }) => detail.to_string(),
            Err(_) if body.trim().is_empty() => status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string(),
            Err(_) => body.trim().to_string(),
        };
        ClientError::Status { status, detail }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Transport(err) => err.status(),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }

    /// Short message suitable for showing next to the form that failed
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Transport(err) if err.is_timeout() => {
                "The server took too long to respond. Please try again.".to_string()
            }
            ClientError::Transport(_) => {
                "Could not reach the server. Please check your connection.".to_string()
            }
            ClientError::Status { detail, .. } => detail.clone(),
            ClientError::Decode(_) => "The server sent an unexpected response.".to_string(),
            ClientError::Validation(errors) => errors.to_string(),
            ClientError::Storage(_) => "Could not save your session locally.".to_string(),
            ClientError::NotSignedIn => "Please sign in first.".to_string(),
        }
    }
}

/// Builder for collecting multiple validation errors
#[derive(Debug, Default)]
pub struct ValidationErrorBuilder {
    errors: FieldErrors,
}

impl ValidationErrorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a validation error for a field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) -> &mut Self {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
        self
    }

    /// Record the error of a `Result<(), String>` validator, if any
    pub fn check(&mut self, field: &str, result: Result<(), String>) -> &mut Self {
        if let Err(message) = result {
            self.add(field, message);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn build(self) -> Option<ValidationErrors> {
        if self.errors.is_empty() {
            None
        } else {
            Some(ValidationErrors {
                fields: self.errors,
            })
        }
    }

    /// Ok if nothing was recorded
    pub fn finish(self) -> Result<(), ClientError> {
        match self.build() {
            Some(err) => Err(ClientError::Validation(err)),
            None => Ok(()),
        }
    }
}
