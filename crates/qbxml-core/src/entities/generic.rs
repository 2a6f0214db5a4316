//! Queries without entity-specific handling.

use crate::kind::QueryStrategy;

/// A query with no entity-specific handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericQuery {
    request_type: String,
    response_type: String,
    element_label: Option<String>,
}

impl GenericQuery {
    /// Describe a query by its request and response element names.
    pub fn new(request_type: impl Into<String>, response_type: impl Into<String>) -> Self {
        Self {
            request_type: request_type.into(),
            response_type: response_type.into(),
            element_label: None,
        }
    }

    /// Derive `<base>Rq`/`<base>Rs` from a base name such as `InvoiceQuery`.
    #[must_use]
    pub fn from_base(base: &str) -> Self {
        Self::new(format!("{base}Rq"), format!("{base}Rs"))
    }

    /// Restrict normalization to one repeating child element.
    #[must_use]
    pub fn with_element_label(mut self, label: impl Into<String>) -> Self {
        self.element_label = Some(label.into());
        self
    }
}

impl QueryStrategy for GenericQuery {
    fn request_type(&self) -> &str {
        &self.request_type
    }

    fn response_type(&self) -> &str {
        &self.response_type
    }

    fn element_label(&self) -> Option<&str> {
        self.element_label.as_deref()
    }
}
