//! Catalog item queries.

use qbxml_model::{NormalizedRecord, ResponseEnvelope};
use regex::Regex;

use crate::error::QueryResult;
use crate::kind::{DateRangeLayout, QueryStrategy, Records};
use crate::normalize::{child_elements, pluralize, section};

/// Catalog items. One response carries several item categories
/// (`ItemInventoryRet`, `ItemServiceRet`, ...) side by side.
#[derive(Debug, Clone)]
pub struct ItemQuery {
    category: Regex,
}

impl ItemQuery {
    /// Create an item query whose categories are the response keys matching
    /// `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::QueryError::InvalidPattern`] if `pattern` is not a
    /// valid regex.
    pub fn new(pattern: &str) -> QueryResult<Self> {
        Ok(Self {
            category: Regex::new(pattern)?,
        })
    }
}

impl QueryStrategy for ItemQuery {
    fn request_type(&self) -> &str {
        "ItemQueryRq"
    }

    fn response_type(&self) -> &str {
        "ItemQueryRs"
    }

    fn date_range_layout(&self) -> DateRangeLayout {
        DateRangeLayout::Flat
    }

    fn includes_line_items(&self) -> bool {
        false
    }

    fn normalize<'a>(&'a self, envelope: &'a ResponseEnvelope) -> QueryResult<Records<'a>> {
        let body = section(envelope, self.response_type())?;
        Ok(Box::new(
            child_elements(body)
                .filter(|(key, _)| self.category.is_match(key))
                .flat_map(|(key, value)| {
                    pluralize(Some(value))
                        .map(move |item| NormalizedRecord::new(item.clone()).with_category(key))
                }),
        ))
    }
}
