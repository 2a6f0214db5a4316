//! Request kinds and the per-kind query strategy contract.

use std::fmt;
use std::str::FromStr;

use qbxml_model::{FilterSpec, NormalizedRecord, ResponseEnvelope};

use crate::config::QbxmlConfig;
use crate::entities::{CheckQuery, GenericQuery, ItemQuery, PurchaseOrderQuery};
use crate::error::{QueryError, QueryResult};
use crate::normalize;

/// Lazily produced normalized records borrowing the decoded envelope.
pub type Records<'a> = Box<dyn Iterator<Item = NormalizedRecord> + 'a>;

/// How the modified-date range is laid out in a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRangeLayout {
    /// A single `ModifiedDateRangeFilter` element wrapping the dates.
    Nested,
    /// Bare `FromModifiedDate`/`ToModifiedDate` entries in the body itself.
    Flat,
}

/// Entity-specific request shape and response post-processing.
///
/// The defaults describe a plain query: nested date range, line items
/// honored, and a pass-through normalizer that unwraps the response section
/// and pluralizes the entity element.
pub trait QueryStrategy: fmt::Debug + Send + Sync {
    /// Request element name, e.g. `CheckQueryRq`.
    fn request_type(&self) -> &str;

    /// Response element name, e.g. `CheckQueryRs`.
    fn response_type(&self) -> &str;

    /// Repeating entity element inside the response, e.g. `CheckRet`.
    ///
    /// `None` means every non-attribute child of the response is an entity.
    fn element_label(&self) -> Option<&str> {
        None
    }

    /// Layout of the modified-date range filter.
    fn date_range_layout(&self) -> DateRangeLayout {
        DateRangeLayout::Nested
    }

    /// Whether `IncludeLineItems` means anything for this entity.
    fn includes_line_items(&self) -> bool {
        true
    }

    /// Adjust the caller's filter before the request body is built.
    fn prepare(&self, spec: FilterSpec) -> FilterSpec {
        spec
    }

    /// Turn a decoded response into normalized records.
    fn normalize<'a>(&'a self, envelope: &'a ResponseEnvelope) -> QueryResult<Records<'a>> {
        normalize::pass_through(self.response_type(), self.element_label(), envelope)
    }
}

/// The closed set of query kinds understood by the query layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    /// Check transactions against the distributor bonus accounts.
    Check,
    /// Catalog items of every category.
    Item,
    /// Purchase orders with consolidated line items.
    PurchaseOrder,
    /// Any other query, with no entity-specific post-processing.
    Generic(GenericQuery),
}

impl RequestKind {
    /// Identifier used on the command line and in task payloads.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Check => "check",
            Self::Item => "item",
            Self::PurchaseOrder => "purchase_order",
            Self::Generic(_) => "generic",
        }
    }

    /// Build the strategy for this kind from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidPattern`] if the item category pattern
    /// does not compile.
    pub fn strategy(&self, config: &QbxmlConfig) -> QueryResult<Box<dyn QueryStrategy>> {
        Ok(match self {
            Self::Check => Box::new(CheckQuery::new(config.distributor_accounts.clone())),
            Self::Item => Box::new(ItemQuery::new(&config.item_category_pattern)?),
            Self::PurchaseOrder => Box::new(PurchaseOrderQuery::new(
                config.purchase_order_classes.clone(),
            )),
            Self::Generic(query) => Box::new(query.clone()),
        })
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generic(query) => {
                let request = query.request_type();
                write!(f, "generic:{}", request.strip_suffix("Rq").unwrap_or(request))
            }
            other => f.write_str(other.as_str()),
        }
    }
}

impl FromStr for RequestKind {
    type Err = QueryError;

    /// Parse `check`, `item`, `purchase_order`, or `generic:<Base>` where
    /// `<Base>` is the request name without its `Rq` suffix
    /// (e.g. `generic:PreferencesQuery`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "check" => Ok(Self::Check),
            "item" => Ok(Self::Item),
            "purchase_order" => Ok(Self::PurchaseOrder),
            other => match other.strip_prefix("generic:") {
                Some(base) if !base.is_empty() => Ok(Self::Generic(GenericQuery::from_base(base))),
                _ => Err(QueryError::UnknownRequestKind(other.to_owned())),
            },
        }
    }
}
