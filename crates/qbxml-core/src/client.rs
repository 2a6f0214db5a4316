//! Query facade over an external request processor.

use bytes::Bytes;
use chrono::NaiveDate;
use qbxml_model::{FilterSpec, NormalizedRecord, OrderedStruct, ResponseEnvelope};
use tracing::{debug, error};

use crate::config::QbxmlConfig;
use crate::dump::{DumpPart, DumpStem, DumpTarget};
use crate::entities::GenericQuery;
use crate::error::{QueryResult, TransportError};
use crate::filter::FilterBuilder;
use crate::kind::{QueryStrategy, RequestKind};

/// Something that hands an encoded request to the accounting application and
/// returns its raw response.
///
/// Session handling belongs to the implementation.
pub trait Transport {
    /// Process one request document.
    fn process_request(&self, request: &[u8]) -> Result<Vec<u8>, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn process_request(&self, request: &[u8]) -> Result<Vec<u8>, TransportError> {
        (**self).process_request(request)
    }
}

/// Encode a request with the configured error mode and protocol version.
///
/// # Errors
///
/// Returns [`crate::QueryError::Xml`] if the body cannot be encoded.
pub fn format_request(
    config: &QbxmlConfig,
    request_type: &str,
    body: &OrderedStruct,
) -> QueryResult<Bytes> {
    Ok(qbxml_xml::encode_request(
        request_type,
        body,
        config.on_error,
        &config.qbxml_version,
    )?)
}

/// Builds, sends and normalizes queries.
#[derive(Debug)]
pub struct QueryClient<T> {
    config: QbxmlConfig,
    transport: T,
    filters: FilterBuilder,
    dump: Option<DumpTarget>,
}

impl<T: Transport> QueryClient<T> {
    /// Create a client; dumping is enabled when `config.dump_dir` is set.
    pub fn new(config: QbxmlConfig, transport: T) -> Self {
        let filters = FilterBuilder::new(&config);
        let dump = config.dump_dir.clone().map(DumpTarget::new);
        Self {
            config,
            transport,
            filters,
            dump,
        }
    }

    /// Pin the date day-count filters are computed from.
    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.filters = self.filters.with_today(today);
        self
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &QbxmlConfig {
        &self.config
    }

    /// The underlying transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Encode a request, dumping it when enabled.
    pub fn format_request(&self, request_type: &str, body: &OrderedStruct) -> QueryResult<Bytes> {
        self.encode(request_type, body).map(|(request, _)| request)
    }

    /// Send one request and decode the response.
    ///
    /// A business-level failure is logged and returned inside the envelope.
    pub fn call(&self, request_type: &str, body: &OrderedStruct) -> QueryResult<ResponseEnvelope> {
        let (request, stem) = self.encode(request_type, body)?;
        let response = self.transport.process_request(&request)?;
        if let (Some(dump), Some(stem)) = (&self.dump, &stem) {
            dump.write(stem, DumpPart::Response, &response);
        }

        let envelope = qbxml_xml::decode(&response)?;
        if let Some(failure) = envelope.business_error() {
            error!(
                request_type,
                code = failure.code.as_deref().unwrap_or_default(),
                message = failure.message.as_deref().unwrap_or_default(),
                "request rejected"
            );
        }
        Ok(envelope)
    }

    /// Run a query of `kind` narrowed by `spec`.
    pub fn query(&self, kind: &RequestKind, spec: FilterSpec) -> QueryResult<Vec<NormalizedRecord>> {
        let strategy = kind.strategy(&self.config)?;
        self.query_with(strategy.as_ref(), spec)
    }

    /// Run a query through an explicit strategy.
    pub fn query_with(
        &self,
        strategy: &dyn QueryStrategy,
        spec: FilterSpec,
    ) -> QueryResult<Vec<NormalizedRecord>> {
        let body = self.filters.build(strategy, spec);
        let envelope = self.call(strategy.request_type(), &body)?;
        let records: Vec<_> = strategy.normalize(&envelope)?.collect();
        debug!(
            request_type = strategy.request_type(),
            records = records.len(),
            "normalized query response"
        );
        Ok(records)
    }

    /// Fetch company preferences.
    pub fn preferences(&self) -> QueryResult<Option<NormalizedRecord>> {
        let query = GenericQuery::from_base("PreferencesQuery").with_element_label("PreferencesRet");
        let envelope = self.call(query.request_type(), &OrderedStruct::new())?;
        Ok(query.normalize(&envelope)?.next())
    }

    fn encode(
        &self,
        request_type: &str,
        body: &OrderedStruct,
    ) -> QueryResult<(Bytes, Option<DumpStem>)> {
        let request = format_request(&self.config, request_type, body)?;
        let stem = self.dump.as_ref().map(|dump| {
            let stem = DumpStem::new(request_type);
            dump.write(&stem, DumpPart::Request, &request);
            stem
        });
        Ok((request, stem))
    }
}
