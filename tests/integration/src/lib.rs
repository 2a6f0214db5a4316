//! End-to-end tests for the QBXML codec and query layer.
//!
//! Responses are replayed from the XML documents under `fixtures/` by a
//! [`FixtureTransport`], which also records every request it receives.
//!
//! Run them with:
//! ```text
//! cargo test -p qbxml-integration
//! ```

use std::path::PathBuf;
use std::sync::{Mutex, Once};

use chrono::NaiveDate;
use qbxml_core::{QbxmlConfig, QueryClient, Transport, TransportError};

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Path of a file under `fixtures/`.
#[must_use]
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

/// Contents of a file under `fixtures/`.
#[must_use]
pub fn fixture(name: &str) -> Vec<u8> {
    std::fs::read(fixture_path(name))
        .unwrap_or_else(|e| panic!("failed to read fixture {name}: {e}"))
}

/// The fixed "today" every scenario runs against.
#[must_use]
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).expect("valid date")
}

/// Replays one canned response and keeps the requests it was sent.
#[derive(Debug)]
pub struct FixtureTransport {
    response: Vec<u8>,
    requests: Mutex<Vec<String>>,
}

impl FixtureTransport {
    /// Reply with the contents of fixture `name`.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            response: fixture(name),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, as text.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl Transport for FixtureTransport {
    fn process_request(&self, request: &[u8]) -> Result<Vec<u8>, TransportError> {
        let text = std::str::from_utf8(request)
            .map_err(|e| TransportError::new(format!("request is not UTF-8: {e}")))?;
        self.requests
            .lock()
            .map_err(|_| TransportError::new("request log poisoned"))?
            .push(text.to_owned());
        Ok(self.response.clone())
    }
}

/// A client replaying fixture `name`, with default configuration and the
/// fixed [`today`].
#[must_use]
pub fn fixture_client(name: &str) -> QueryClient<FixtureTransport> {
    fixture_client_with(QbxmlConfig::default(), name)
}

/// Like [`fixture_client`] with explicit configuration.
#[must_use]
pub fn fixture_client_with(config: QbxmlConfig, name: &str) -> QueryClient<FixtureTransport> {
    init_tracing();
    QueryClient::new(config, FixtureTransport::new(name)).with_today(today())
}

mod test_checks;
mod test_codec;
mod test_errors;
mod test_items;
mod test_purchase_orders;
