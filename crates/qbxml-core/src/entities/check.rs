//! Check transaction queries.

use qbxml_model::FilterSpec;

use crate::kind::QueryStrategy;

/// Check transactions, always narrowed to the distributor bonus accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckQuery {
    accounts: Vec<String>,
}

impl CheckQuery {
    /// Create a check query forcing the given account full names.
    #[must_use]
    pub fn new(accounts: Vec<String>) -> Self {
        Self { accounts }
    }
}

impl QueryStrategy for CheckQuery {
    fn request_type(&self) -> &str {
        "CheckQueryRq"
    }

    fn response_type(&self) -> &str {
        "CheckQueryRs"
    }

    fn element_label(&self) -> Option<&str> {
        Some("CheckRet")
    }

    fn prepare(&self, mut spec: FilterSpec) -> FilterSpec {
        spec.account_list_ids.clear();
        spec.account_names.clone_from(&self.accounts);
        spec
    }
}
