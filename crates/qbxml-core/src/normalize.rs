//! Shared helpers for turning decoded responses into records.

use std::slice;

use qbxml_model::{ATTRIBUTE_PREFIX, NormalizedRecord, OrderedStruct, ResponseEnvelope, Value};

use crate::error::{QueryError, QueryResult};
use crate::kind::Records;

/// Iterate a repeating element whether the wire carried one or many.
///
/// A single struct yields itself, a list yields its struct items, and
/// anything else (absent, empty text) yields nothing.
pub fn pluralize(value: Option<&Value>) -> impl Iterator<Item = &OrderedStruct> {
    let items: &[Value] = match value {
        Some(Value::List(items)) => items,
        Some(one @ Value::Struct(_)) => slice::from_ref(one),
        _ => &[],
    };
    items.iter().filter_map(Value::as_struct)
}

/// Child elements of a decoded element, attributes excluded.
pub fn child_elements(element: &OrderedStruct) -> impl Iterator<Item = (&str, &Value)> {
    element
        .iter()
        .filter(|(key, _)| !key.starts_with(ATTRIBUTE_PREFIX))
        .map(|(key, value)| (key.as_str(), value))
}

/// The response element the query expects.
///
/// # Errors
///
/// Returns [`QueryError::MissingResponseSection`] when the envelope carries a
/// different response.
pub fn section<'a>(
    envelope: &'a ResponseEnvelope,
    response_type: &str,
) -> QueryResult<&'a OrderedStruct> {
    envelope
        .section(response_type)
        .ok_or_else(|| QueryError::MissingResponseSection {
            expected: response_type.to_owned(),
            found: envelope.response_type.clone(),
        })
}

/// Default normalizer: every `element_label` child of the response, or every
/// child element when no label is given.
pub fn pass_through<'a>(
    response_type: &str,
    element_label: Option<&'a str>,
    envelope: &'a ResponseEnvelope,
) -> QueryResult<Records<'a>> {
    let body = section(envelope, response_type)?;
    let records: Records<'a> = match element_label {
        Some(label) => Box::new(pluralize(body.get(label)).cloned().map(NormalizedRecord::new)),
        None => Box::new(
            child_elements(body)
                .flat_map(|(_, value)| pluralize(Some(value)))
                .cloned()
                .map(NormalizedRecord::new),
        ),
    };
    Ok(records)
}
