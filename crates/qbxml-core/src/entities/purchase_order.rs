//! Purchase order queries.

use qbxml_model::{NormalizedRecord, OrderedStruct, ResponseEnvelope, Value};

use crate::error::QueryResult;
use crate::kind::{QueryStrategy, Records};
use crate::normalize::{pluralize, section};

const PURCHASE_ORDER_RET: &str = "PurchaseOrderRet";
const LINE_RET: &str = "PurchaseOrderLineRet";
const LINE_GROUP_RET: &str = "PurchaseOrderLineGroupRet";
const CLASS_PATH: [&str; 2] = ["ClassRef", "FullName"];

/// Purchase orders of the admitted classes, with their line items
/// consolidated under `po_lines`.
///
/// Orders without any line items are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseOrderQuery {
    classes: Vec<String>,
}

impl PurchaseOrderQuery {
    /// Create a purchase-order query admitting the given class full names.
    #[must_use]
    pub fn new(classes: Vec<String>) -> Self {
        Self { classes }
    }

    fn admits(&self, order: &OrderedStruct) -> bool {
        order
            .get_path(&CLASS_PATH)
            .and_then(Value::as_str)
            .is_some_and(|class| self.classes.iter().any(|c| c == class))
    }
}

impl QueryStrategy for PurchaseOrderQuery {
    fn request_type(&self) -> &str {
        "PurchaseOrderQueryRq"
    }

    fn response_type(&self) -> &str {
        "PurchaseOrderQueryRs"
    }

    fn element_label(&self) -> Option<&str> {
        Some(PURCHASE_ORDER_RET)
    }

    fn normalize<'a>(&'a self, envelope: &'a ResponseEnvelope) -> QueryResult<Records<'a>> {
        let body = section(envelope, self.response_type())?;
        Ok(Box::new(
            pluralize(body.get(PURCHASE_ORDER_RET))
                .filter(|order| self.admits(order))
                .filter_map(|order| {
                    let lines = consolidate_lines(order);
                    (!lines.is_empty())
                        .then(|| NormalizedRecord::new(order.clone()).with_line_items(lines))
                }),
        ))
    }
}

/// Direct line items first, then the lines of each line group in group
/// order.
#[must_use]
pub fn consolidate_lines(order: &OrderedStruct) -> Vec<OrderedStruct> {
    pluralize(order.get(LINE_RET))
        .chain(pluralize(order.get(LINE_GROUP_RET)).flat_map(|group| pluralize(group.get(LINE_RET))))
        .cloned()
        .collect()
}
