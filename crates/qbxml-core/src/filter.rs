//! Request body construction from a [`FilterSpec`].
//!
//! Lookups by id, reference number or name are mutually exclusive and are
//! resolved through [`LOOKUP_RULES`] in table order. When no lookup applies,
//! the body narrows by modified date and account instead.

use chrono::{Days, Local, NaiveDate};
use qbxml_model::{FilterSpec, OrderedStruct, Value};
use tracing::debug;

use crate::config::QbxmlConfig;
use crate::kind::{DateRangeLayout, QueryStrategy};

/// Element wrapping a nested modified-date range.
pub const DATE_RANGE_FILTER: &str = "ModifiedDateRangeFilter";
/// Start of the modified-date range.
pub const FROM_MODIFIED_DATE: &str = "FromModifiedDate";
/// End of the modified-date range.
pub const TO_MODIFIED_DATE: &str = "ToModifiedDate";
/// Element wrapping the account filter.
pub const ACCOUNT_FILTER: &str = "AccountFilter";
/// Trailing line-item flag.
pub const INCLUDE_LINE_ITEMS: &str = "IncludeLineItems";

/// One entry of the lookup precedence chain.
#[derive(Debug, Clone, Copy)]
pub struct LookupRule {
    /// Element emitted once per selected value.
    pub tag: &'static str,
    /// Picks the values this rule applies to out of a filter.
    pub select: fn(&FilterSpec) -> &[String],
}

impl LookupRule {
    /// The values this rule would emit, if any.
    #[must_use]
    pub fn values<'a>(&self, spec: &'a FilterSpec) -> Option<&'a [String]> {
        let values = (self.select)(spec);
        (!values.is_empty()).then_some(values)
    }
}

/// Lookup precedence, highest first. The first rule with values wins and the
/// rest of the filter is ignored.
pub const LOOKUP_RULES: [LookupRule; 4] = [
    LookupRule {
        tag: "TxnID",
        select: txn_ids,
    },
    LookupRule {
        tag: "RefNumber",
        select: ref_numbers,
    },
    LookupRule {
        tag: "ListID",
        select: list_ids,
    },
    LookupRule {
        tag: "FullName",
        select: full_names,
    },
];

fn txn_ids(spec: &FilterSpec) -> &[String] {
    &spec.txn_ids
}

fn ref_numbers(spec: &FilterSpec) -> &[String] {
    &spec.ref_numbers
}

fn list_ids(spec: &FilterSpec) -> &[String] {
    &spec.list_ids
}

fn full_names(spec: &FilterSpec) -> &[String] {
    &spec.full_names
}

/// Builds request bodies relative to "today".
///
/// Unless pinned with [`with_today`](Self::with_today), "today" is the local
/// calendar date at the moment a body is built.
#[derive(Debug, Clone, Copy)]
pub struct FilterBuilder {
    today: Option<NaiveDate>,
    default_lookback_days: u32,
}

impl FilterBuilder {
    /// Create a builder following the local calendar date.
    #[must_use]
    pub fn new(config: &QbxmlConfig) -> Self {
        Self {
            today: None,
            default_lookback_days: config.default_lookback_days,
        }
    }

    /// Pin "today" to a known date.
    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// The date day-counts are subtracted from.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Build the request body for `strategy` from `spec`.
    ///
    /// Never fails: an empty filter yields the default lookback range.
    #[must_use]
    pub fn build(&self, strategy: &dyn QueryStrategy, spec: FilterSpec) -> OrderedStruct {
        let spec = strategy.prepare(spec);
        let mut body = OrderedStruct::new();

        if let Some((rule, values)) = LOOKUP_RULES
            .iter()
            .find_map(|rule| rule.values(&spec).map(|values| (rule, values)))
        {
            body.push(rule.tag, values.to_vec());
        } else {
            self.push_date_range(&mut body, &spec, strategy.date_range_layout());
            push_account_filter(&mut body, &spec);
        }

        if spec.include_line_items && strategy.includes_line_items() {
            body.push(INCLUDE_LINE_ITEMS, true);
        }

        debug!(
            request_type = strategy.request_type(),
            entries = body.len(),
            "built query body"
        );
        body
    }

    /// Start of the modified-date range, or `None` for a full history load.
    ///
    /// A zero or missing day count falls back to the configured lookback.
    #[must_use]
    pub fn start_date(&self, spec: &FilterSpec) -> Option<NaiveDate> {
        if spec.initial {
            return None;
        }
        if let Some(start) = spec.start_date {
            return Some(start);
        }
        let days = spec
            .days
            .filter(|d| *d > 0)
            .unwrap_or(self.default_lookback_days);
        Some(
            self.today()
                .checked_sub_days(Days::new(u64::from(days)))
                .unwrap_or(NaiveDate::MIN),
        )
    }

    fn push_date_range(&self, body: &mut OrderedStruct, spec: &FilterSpec, layout: DateRangeLayout) {
        let Some(from) = self.start_date(spec) else {
            return;
        };

        let mut range = OrderedStruct::new().with(FROM_MODIFIED_DATE, from);
        if let Some(to) = spec.end_date {
            range.push(TO_MODIFIED_DATE, to);
        }

        match layout {
            DateRangeLayout::Nested => body.push(DATE_RANGE_FILTER, range),
            DateRangeLayout::Flat => body.extend(range),
        }
    }
}

fn push_account_filter(body: &mut OrderedStruct, spec: &FilterSpec) {
    let (tag, values) = if !spec.account_list_ids.is_empty() {
        ("ListID", &spec.account_list_ids)
    } else if !spec.account_names.is_empty() {
        ("FullName", &spec.account_names)
    } else {
        return;
    };
    body.push(
        ACCOUNT_FILTER,
        OrderedStruct::new().with(tag, Value::from(values.clone())),
    );
}
