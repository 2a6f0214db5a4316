//! Data model for the QBXML request/response codec.
//!
//! This crate holds the types shared by the encoder/decoder (`qbxml-xml`) and
//! the query layer (`qbxml-core`):
//!
//! - [`Value`] and [`OrderedStruct`]: order-preserving structures with
//!   repeatable keys, mirroring QBXML's order-sensitive element layout
//! - [`RequestEnvelope`] / [`ResponseEnvelope`]: the fixed document wrapping
//! - [`FilterSpec`]: query-narrowing parameters
//! - [`NormalizedRecord`]: flattened entities handed back to callers

pub mod envelope;
pub mod filter;
pub mod record;
pub mod value;

pub use envelope::{
    ATTRIBUTE_PREFIX, BusinessError, DEFAULT_PROTOCOL_VERSION, DOCUMENT_ROOT, ErrorMode,
    ON_ERROR_ATTRIBUTE, REQUEST_CONTAINER, RESPONSE_CONTAINER, RequestEnvelope, ResponseEnvelope,
    Status, TEXT_KEY,
};
pub use filter::FilterSpec;
pub use record::{CATEGORY_KEY, LINE_ITEMS_KEY, NormalizedRecord};
pub use value::{OrderedStruct, Value};
