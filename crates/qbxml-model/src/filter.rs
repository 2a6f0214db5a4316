//! Query-narrowing parameters.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Recognized lookup parameters for a query request.
///
/// At most one of `txn_ids`, `ref_numbers`, `list_ids` and `full_names` is
/// applied to a query; the first non-empty one in that order wins. When none
/// is present the query falls back to a modified-date range plus an optional
/// account filter.
///
/// # Examples
///
/// ```
/// use qbxml_model::FilterSpec;
///
/// let spec = FilterSpec::builder().days(20).build();
/// assert_eq!(spec.days, Some(20));
/// assert!(spec.include_line_items);
/// assert!(!spec.has_lookup());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(default, deny_unknown_fields)]
pub struct FilterSpec {
    /// Transaction ids to look up.
    #[builder(default, setter(into))]
    pub txn_ids: Vec<String>,

    /// Reference numbers to look up.
    #[builder(default, setter(into))]
    pub ref_numbers: Vec<String>,

    /// List ids to look up.
    #[builder(default, setter(into))]
    pub list_ids: Vec<String>,

    /// Full names to look up.
    #[builder(default, setter(into))]
    pub full_names: Vec<String>,

    /// Account list ids. Preferred over `account_names` when both are set.
    #[builder(default, setter(into))]
    pub account_list_ids: Vec<String>,

    /// Account full names.
    #[builder(default, setter(into))]
    pub account_names: Vec<String>,

    /// Explicit start of the modified-date range.
    #[builder(default, setter(strip_option))]
    pub start_date: Option<NaiveDate>,

    /// Explicit end of the modified-date range.
    #[builder(default, setter(strip_option))]
    pub end_date: Option<NaiveDate>,

    /// Lookback in days, used when `start_date` is absent.
    #[builder(default, setter(strip_option))]
    pub days: Option<u32>,

    /// Full history load: no date range at all.
    #[builder(default)]
    pub initial: bool,

    /// Ask for line items on transactions.
    #[builder(default = true)]
    pub include_line_items: bool,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            txn_ids: Vec::new(),
            ref_numbers: Vec::new(),
            list_ids: Vec::new(),
            full_names: Vec::new(),
            account_list_ids: Vec::new(),
            account_names: Vec::new(),
            start_date: None,
            end_date: None,
            days: None,
            initial: false,
            include_line_items: true,
        }
    }
}

impl FilterSpec {
    /// Returns `true` if any id/number/name lookup list is non-empty.
    #[must_use]
    pub fn has_lookup(&self) -> bool {
        !(self.txn_ids.is_empty()
            && self.ref_numbers.is_empty()
            && self.list_ids.is_empty()
            && self.full_names.is_empty())
    }
}
