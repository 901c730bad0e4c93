use std::collections::BTreeMap;

/// One rejected input field with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self { field, message: message.into() }
    }
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{}: {}", f.field, f.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Client-side error taxonomy for the FlipDocs core.
///
/// `Validation` and `ConfirmationMismatch` are resolved entirely client-side
/// and must never reach the network layer. The remaining variants surface to
/// the user as-is; none are retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to decode token: {0}")]
    Decode(String),

    #[error("request failed{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Fetch { status: Option<u16>, message: String },

    #[error("unexpected response shape: {0}")]
    Format(String),

    #[error("validation failed: {}", join_fields(.0))]
    Validation(Vec<FieldError>),

    #[error("{message}")]
    Submission { status: u16, message: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("confirmation text does not match the project name")]
    ConfirmationMismatch,
}

impl Error {
    pub fn fetch(message: impl Into<String>) -> Self {
        Error::Fetch { status: None, message: message.into() }
    }

    pub fn fetch_status(status: u16, message: impl Into<String>) -> Self {
        Error::Fetch { status: Some(status), message: message.into() }
    }

    /// Collect the failing field names, for error displays that highlight inputs.
    pub fn field_errors(&self) -> BTreeMap<&'static str, &str> {
        match self {
            Error::Validation(fields) => fields
                .iter()
                .map(|f| (f.field, f.message.as_str()))
                .collect(),
            _ => BTreeMap::new(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
