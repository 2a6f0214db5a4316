//! Codec error types.

use std::io;

/// Errors that can occur while encoding or decoding QBXML.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// An I/O error during XML writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The request body contains a value that has no XML rendering.
    #[error("malformed value at <{key}>: {reason}")]
    MalformedValue {
        /// Element name where the problem was found.
        key: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The response bytes are not well-formed XML.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The document parsed but lacks the expected envelope structure.
    #[error("unexpected response schema: {0}")]
    UnexpectedSchema(String),
}

impl XmlError {
    pub(crate) fn malformed_value(key: &str, reason: impl Into<String>) -> Self {
        Self::MalformedValue {
            key: key.to_owned(),
            reason: reason.into(),
        }
    }
}

impl From<quick_xml::Error> for XmlError {
    fn from(e: quick_xml::Error) -> Self {
        Self::MalformedResponse(e.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for XmlError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        Self::MalformedResponse(e.to_string())
    }
}
