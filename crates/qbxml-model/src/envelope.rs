//! Request and response envelopes.
//!
//! Every QBXML message has the same three-level wrapping:
//!
//! ```xml
//! <?xml version="1.0"?>
//! <?qbxml version="13.0"?>
//! <QBXML>
//!   <QBXMLMsgsRq onError="stopOnError">
//!     <CheckQueryRq>...</CheckQueryRq>
//!   </QBXMLMsgsRq>
//! </QBXML>
//! ```
//!
//! Responses use `QBXMLMsgsRs` and carry `statusCode`, `statusSeverity` and
//! `statusMessage` attributes on the response element.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::value::OrderedStruct;

/// Document root element.
pub const DOCUMENT_ROOT: &str = "QBXML";
/// Message container wrapping a request element.
pub const REQUEST_CONTAINER: &str = "QBXMLMsgsRq";
/// Message container wrapping a response element.
pub const RESPONSE_CONTAINER: &str = "QBXMLMsgsRs";
/// Attribute on the request container selecting the error-handling mode.
pub const ON_ERROR_ATTRIBUTE: &str = "onError";
/// Default protocol version declared in the `<?qbxml?>` instruction.
pub const DEFAULT_PROTOCOL_VERSION: &str = "13.0";
/// Prefix distinguishing decoded attributes from child elements.
pub const ATTRIBUTE_PREFIX: char = '@';
/// Key holding text content of an element that also has attributes or children.
pub const TEXT_KEY: &str = "#text";

/// How the application should react to a failing request in a message set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ErrorMode {
    /// Abort the remaining requests at the first error.
    #[default]
    #[serde(rename = "stopOnError")]
    StopOnError,
    /// Keep processing after an error.
    #[serde(rename = "continueOnError")]
    ContinueOnError,
}

impl ErrorMode {
    /// Returns the wire value of this mode.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StopOnError => "stopOnError",
            Self::ContinueOnError => "continueOnError",
        }
    }
}

impl fmt::Display for ErrorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stopOnError" => Ok(Self::StopOnError),
            "continueOnError" => Ok(Self::ContinueOnError),
            other => Err(format!("unknown onError mode: {other}")),
        }
    }
}

/// A request ready for encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestEnvelope {
    /// Request element name, e.g. `CheckQueryRq`.
    pub request_type: String,
    /// Ordered request body.
    pub body: OrderedStruct,
    /// Value of the container's `onError` attribute.
    pub error_mode: ErrorMode,
    /// Protocol version declared in the `<?qbxml?>` instruction.
    pub protocol_version: String,
}

impl RequestEnvelope {
    /// Create an envelope with the default error mode and protocol version.
    #[must_use]
    pub fn new(request_type: impl Into<String>, body: OrderedStruct) -> Self {
        Self {
            request_type: request_type.into(),
            body,
            error_mode: ErrorMode::default(),
            protocol_version: DEFAULT_PROTOCOL_VERSION.to_owned(),
        }
    }

    /// Override the error mode.
    #[must_use]
    pub fn error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Override the protocol version.
    #[must_use]
    pub fn protocol_version(mut self, version: impl Into<String>) -> Self {
        self.protocol_version = version.into();
        self
    }
}

/// Status attributes of a response element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Status {
    /// `statusCode`, e.g. `0` or `3120`.
    pub code: Option<String>,
    /// `statusSeverity`: `Info`, `Warn` or `Error`.
    pub severity: Option<String>,
    /// `statusMessage`.
    pub message: Option<String>,
}

impl Status {
    /// Returns `true` if the severity signals a failed request.
    ///
    /// Empty severities and the neutral `Info`/`Warn` codes are not errors.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity.as_deref().is_some_and(|s| {
            let s = s.trim();
            !s.is_empty() && !s.eq_ignore_ascii_case("info") && !s.eq_ignore_ascii_case("warn")
        })
    }
}

/// A request the application rejected.
///
/// This is data, not a fault: decoding succeeds and the caller decides how to
/// react.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusinessError {
    /// Response element the status came from.
    pub response_type: String,
    /// `statusCode`, if present.
    pub code: Option<String>,
    /// `statusSeverity`.
    pub severity: String,
    /// `statusMessage`, if present.
    pub message: Option<String>,
}

impl fmt::Display for BusinessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} returned {} (code {}): {}",
            self.response_type,
            self.severity,
            self.code.as_deref().unwrap_or("-"),
            self.message.as_deref().unwrap_or("")
        )
    }
}

/// A decoded response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseEnvelope {
    /// Response element name, e.g. `CheckQueryRs`.
    pub response_type: String,
    /// Decoded response element, attributes included under `@` keys.
    pub body: OrderedStruct,
    /// Status attributes of the response element.
    pub status: Status,
}

impl ResponseEnvelope {
    /// Returns the business-level error carried by this response, if any.
    #[must_use]
    pub fn business_error(&self) -> Option<BusinessError> {
        if !self.status.is_error() {
            return None;
        }
        Some(BusinessError {
            response_type: self.response_type.clone(),
            code: self.status.code.clone(),
            severity: self.status.severity.clone().unwrap_or_default(),
            message: self.status.message.clone(),
        })
    }

    /// The response section stored under `response_type`, if the names match.
    #[must_use]
    pub fn section(&self, response_type: &str) -> Option<&OrderedStruct> {
        (self.response_type == response_type).then_some(&self.body)
    }
}
