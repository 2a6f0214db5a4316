//! QBXML serialization/deserialization.
//!
//! This crate is the codec between [`qbxml_model`] structures and the QBXML
//! wire format understood by the desktop bookkeeping application.
//!
//! # Key components
//!
//! - [`encode`] / [`encode_request`]: turn an ordered request body into a complete,
//!   indented QBXML document
//! - [`decode`]: parse a response document into a [`ResponseEnvelope`](qbxml_model::ResponseEnvelope)
//! - [`read_document`]: parse any XML document into a nested ordered structure
//!
//! # QBXML conventions
//!
//! - Declaration: `<?xml version="1.0"?>` followed by `<?qbxml version="13.0"?>`
//! - Sibling order is significant and is never changed by the codec
//! - Repeated lookups are repeated sibling elements with the same tag
//! - Dates: `YYYY-MM-DD`; booleans: `true`/`false`

pub mod deserialize;
pub mod error;
pub mod serialize;

pub use deserialize::{decode, read_document};
pub use error::XmlError;
pub use serialize::{encode, encode_request};
