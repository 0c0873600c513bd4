//! Error types for the catalog client.

use thiserror::Error;

/// Errors that can occur while querying the course catalog.
#[derive(Debug, Error, Clone)]
pub enum CatalogError {
    /// Transport failed or the service answered with a non-success status.
    #[error("catalog unavailable: {message}")]
    Unavailable { message: String },

    /// The service answered, but the body was missing the expected shape.
    #[error("catalog response malformed: {message}")]
    Malformed { message: String },

    /// A request URL could not be built from the configured base endpoint.
    #[error("catalog URL error: {message}")]
    Url { message: String },
}

impl CatalogError {
    /// Shorthand for a malformed-response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        CatalogError::Malformed {
            message: message.into(),
        }
    }

    /// Returns true if the failure came from transport or URL construction
    /// rather than a decoded-but-wrong body. Both read the same to the user
    /// (the session cannot continue), but logs distinguish them.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            CatalogError::Unavailable { .. } | CatalogError::Url { .. }
        )
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        CatalogError::Unavailable {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for CatalogError {
    fn from(err: url::ParseError) -> Self {
        CatalogError::Url {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Malformed {
            message: err.to_string(),
        }
    }
}
