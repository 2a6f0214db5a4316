//! QBXML query configuration.
//!
//! Provides [`QbxmlConfig`] for the query layer. Values are loaded from
//! environment variables and fall back to the defaults the integration has
//! always used.

use std::path::PathBuf;

use qbxml_model::{DEFAULT_PROTOCOL_VERSION, ErrorMode};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Separator for list-valued environment variables.
const LIST_SEPARATOR: char = ';';

/// Distributor bonus accounts every check query is narrowed to.
pub const DEFAULT_DISTRIBUTOR_ACCOUNTS: [&str; 3] = [
    "SOC Distributor Bonus Account:SOC Bonus Uncleared",
    "SOC Bonus Uncleared",
    "SOC Distributor Bonus Account:SOC Bonus Cleared",
];

/// Bookkeeping classes whose purchase orders are kept.
pub const DEFAULT_PURCHASE_ORDER_CLASSES: [&str; 1] = ["Gifting"];

/// Query layer configuration.
///
/// # Examples
///
/// ```
/// use qbxml_core::QbxmlConfig;
///
/// let config = QbxmlConfig::default();
/// assert_eq!(config.qbxml_version, "13.0");
/// assert_eq!(config.default_lookback_days, 30);
/// assert!(config.dump_dir.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct QbxmlConfig {
    /// Protocol version declared in every request.
    #[builder(default = String::from(DEFAULT_PROTOCOL_VERSION))]
    pub qbxml_version: String,

    /// `onError` mode of the request container.
    #[builder(default)]
    pub on_error: ErrorMode,

    /// Lookback used when a query names neither a start date nor a day count.
    #[builder(default = 30)]
    pub default_lookback_days: u32,

    /// Account names forced onto every check query.
    #[builder(default = to_strings(&DEFAULT_DISTRIBUTOR_ACCOUNTS))]
    pub distributor_accounts: Vec<String>,

    /// Classes (`ClassRef/FullName`) admitted for purchase orders.
    #[builder(default = to_strings(&DEFAULT_PURCHASE_ORDER_CLASSES))]
    pub purchase_order_classes: Vec<String>,

    /// Regex selecting the item category keys of an item query response.
    #[builder(default = String::from("Item"))]
    pub item_category_pattern: String,

    /// Directory for diagnostic request/response dumps; disabled when unset.
    #[builder(default, setter(strip_option, into))]
    pub dump_dir: Option<PathBuf>,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for QbxmlConfig {
    fn default() -> Self {
        Self {
            qbxml_version: String::from(DEFAULT_PROTOCOL_VERSION),
            on_error: ErrorMode::default(),
            default_lookback_days: 30,
            distributor_accounts: to_strings(&DEFAULT_DISTRIBUTOR_ACCOUNTS),
            purchase_order_classes: to_strings(&DEFAULT_PURCHASE_ORDER_CLASSES),
            item_category_pattern: String::from("Item"),
            dump_dir: None,
            log_level: String::from("info"),
        }
    }
}

impl QbxmlConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables (falling back to defaults):
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `QBXML_VERSION` | `13.0` |
    /// | `QBXML_ON_ERROR` | `stopOnError` |
    /// | `QBXML_DEFAULT_LOOKBACK_DAYS` | `30` |
    /// | `QBXML_DISTRIBUTOR_ACCOUNTS` | the three SOC bonus accounts (`;`-separated) |
    /// | `QBXML_PURCHASE_ORDER_CLASSES` | `Gifting` (`;`-separated) |
    /// | `QBXML_ITEM_CATEGORY_PATTERN` | `Item` |
    /// | `QBXML_DUMP_DIR` | *(unset)* |
    /// | `LOG_LEVEL` | `info` |
    ///
    /// Unparsable values are ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("QBXML_VERSION") {
            config.qbxml_version = v;
        }
        if let Ok(v) = std::env::var("QBXML_ON_ERROR") {
            if let Ok(mode) = v.parse() {
                config.on_error = mode;
            }
        }
        if let Ok(v) = std::env::var("QBXML_DEFAULT_LOOKBACK_DAYS") {
            if let Ok(n) = v.parse::<u32>() {
                config.default_lookback_days = n;
            }
        }
        if let Ok(v) = std::env::var("QBXML_DISTRIBUTOR_ACCOUNTS") {
            config.distributor_accounts = parse_list(&v);
        }
        if let Ok(v) = std::env::var("QBXML_PURCHASE_ORDER_CLASSES") {
            config.purchase_order_classes = parse_list(&v);
        }
        if let Ok(v) = std::env::var("QBXML_ITEM_CATEGORY_PATTERN") {
            config.item_category_pattern = v;
        }
        if let Ok(v) = std::env::var("QBXML_DUMP_DIR") {
            if !v.is_empty() {
                config.dump_dir = Some(PathBuf::from(v));
            }
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

/// Split a `;`-separated list, dropping blank entries.
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
