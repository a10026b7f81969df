//! @ai:module:intent Error type for record store operations
//! @ai:module:layer domain
//! @ai:module:public_api StoreError
//! @ai:module:stateless true

use thiserror::Error;

/// @ai:intent Failure talking to, or interpreting a reply from, a record store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Store returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Store rejected {action} on sheet {sheet}: {message}")]
    Rejected {
        action: &'static str,
        sheet: &'static str,
        message: String,
    },

    #[error("Unexpected response from store: {0}")]
    UnexpectedResponse(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("No store URL configured (set store.api_url or SHEETS_API_URL)")]
    NotConfigured,

    #[error("Record index {index} out of range for sheet {sheet} ({len} records)")]
    IndexOutOfRange {
        sheet: &'static str,
        index: usize,
        len: usize,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl StoreError {
    /// @ai:intent Whether the failure is an outage worth retrying later, as opposed to a bad request
    /// @ai:effects pure
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Http(_) | StoreError::Unavailable(_) => true,
            StoreError::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(StoreError::Unavailable("down".to_string()).is_transient());
        assert!(StoreError::Status { status: 503, body: String::new() }.is_transient());
        assert!(StoreError::Status { status: 429, body: String::new() }.is_transient());
        assert!(!StoreError::Status { status: 404, body: String::new() }.is_transient());
        assert!(!StoreError::NotConfigured.is_transient());
        assert!(!StoreError::IndexOutOfRange { sheet: "Issues", index: 3, len: 1 }.is_transient());
    }
}
