//! Query layer over the QBXML codec.
//!
//! This crate turns caller intent into request bodies and decoded responses
//! into flat records:
//!
//! - [`FilterBuilder`]: [`FilterSpec`](qbxml_model::FilterSpec) to request body,
//!   with lookup precedence and date arithmetic
//! - [`RequestKind`] / [`QueryStrategy`]: per-entity request shape and
//!   response post-processing
//! - [`QueryClient`]: encode, hand off to a [`Transport`], decode and
//!   normalize
//! - [`QbxmlConfig`]: environment-driven settings

pub mod client;
pub mod config;
pub mod dump;
pub mod entities;
pub mod error;
pub mod filter;
pub mod kind;
pub mod normalize;

pub use client::{QueryClient, Transport, format_request};
pub use config::QbxmlConfig;
pub use dump::{DumpPart, DumpStem, DumpTarget};
pub use entities::{CheckQuery, GenericQuery, ItemQuery, PurchaseOrderQuery};
pub use error::{QueryError, QueryResult, TransportError};
pub use filter::{FilterBuilder, LOOKUP_RULES, LookupRule};
pub use kind::{DateRangeLayout, QueryStrategy, Records, RequestKind};
pub use normalize::pluralize;
