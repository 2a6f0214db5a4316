//! Error types for the query layer.

use qbxml_xml::XmlError;

/// Failure reported by the transport collaborator.
#[derive(Debug, thiserror::Error)]
#[error("transport failure: {message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    /// Create a transport error from a description of what went wrong.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The failure description.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Query layer error type.
///
/// Business-level failures (`statusSeverity="Error"`) are not represented
/// here; they travel as data on the decoded envelope.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// Encoding or decoding failed.
    #[error(transparent)]
    Xml(#[from] XmlError),

    /// The response does not contain the section this query expects.
    #[error("response has no <{expected}> section (found <{found}>)")]
    MissingResponseSection {
        /// Response element the query expected.
        expected: String,
        /// Response element actually present.
        found: String,
    },

    /// No query adapter is registered under this identifier.
    #[error("no query adapter for request kind {0:?}")]
    UnknownRequestKind(String),

    /// The configured item category pattern is not a valid regex.
    #[error("invalid item category pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// The transport collaborator failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Convenience result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;
