//! Normalized business records.

use serde::Serialize;

use crate::value::{OrderedStruct, Value};

/// Key under which the originating response key is stamped.
pub const CATEGORY_KEY: &str = "category";
/// Key under which consolidated purchase-order lines are attached.
pub const LINE_ITEMS_KEY: &str = "po_lines";

/// One business entity extracted from a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NormalizedRecord {
    fields: OrderedStruct,
}

impl NormalizedRecord {
    /// Wrap decoded fields.
    #[must_use]
    pub fn new(fields: OrderedStruct) -> Self {
        Self { fields }
    }

    /// Stamp the response key this record came from.
    #[must_use]
    pub fn with_category(mut self, category: &str) -> Self {
        self.fields.set(CATEGORY_KEY, category);
        self
    }

    /// Attach a consolidated line-item sequence.
    #[must_use]
    pub fn with_line_items(mut self, lines: Vec<OrderedStruct>) -> Self {
        self.fields.set(
            LINE_ITEMS_KEY,
            Value::List(lines.into_iter().map(Value::Struct).collect()),
        );
        self
    }

    /// The category stamp, if any.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.fields.get_str(CATEGORY_KEY)
    }

    /// Consolidated line items; empty when none were attached.
    pub fn line_items(&self) -> impl Iterator<Item = &OrderedStruct> {
        self.fields
            .get(LINE_ITEMS_KEY)
            .and_then(Value::as_list)
            .unwrap_or_default()
            .iter()
            .filter_map(Value::as_struct)
    }

    /// First field value under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Borrow all fields.
    #[must_use]
    pub fn fields(&self) -> &OrderedStruct {
        &self.fields
    }

    /// Take ownership of the fields.
    #[must_use]
    pub fn into_fields(self) -> OrderedStruct {
        self.fields
    }
}
