//! QBXML decoding: parsing response documents into ordered structures.
//!
//! Elements are mapped the same way for every response type:
//!
//! - attributes become entries keyed `@name`
//! - a leaf element with no attributes becomes a [`Value::Text`]
//! - any other element becomes a [`Value::Struct`], with text content (if any)
//!   stored under `#text`
//! - repeated sibling elements fold into a [`Value::List`] at the position of
//!   the first occurrence
//!
//! Business-level failures reported through `statusSeverity` are returned as
//! data on the envelope. Only unparsable bytes or a broken envelope are errors.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use qbxml_model::{
    ATTRIBUTE_PREFIX, DOCUMENT_ROOT, OrderedStruct, REQUEST_CONTAINER, RESPONSE_CONTAINER,
    ResponseEnvelope, Status, TEXT_KEY, Value,
};

use crate::error::XmlError;

/// Decode a QBXML response document.
///
/// # Errors
///
/// Returns [`XmlError::MalformedResponse`] if the bytes are not well-formed
/// XML, and [`XmlError::UnexpectedSchema`] if the document lacks the
/// `QBXML` → message container → response element shape.
pub fn decode(xml: &[u8]) -> Result<ResponseEnvelope, XmlError> {
    let (root_name, root) = read_document(xml)?;
    if root_name != DOCUMENT_ROOT {
        return Err(XmlError::UnexpectedSchema(format!(
            "expected <{DOCUMENT_ROOT}> root, found <{root_name}>"
        )));
    }

    let container = [RESPONSE_CONTAINER, REQUEST_CONTAINER]
        .iter()
        .find_map(|name| root.get(name))
        .ok_or_else(|| {
            XmlError::UnexpectedSchema(format!(
                "<{DOCUMENT_ROOT}> has no <{RESPONSE_CONTAINER}> message container"
            ))
        })?;
    let Value::Struct(container) = container else {
        return Err(XmlError::UnexpectedSchema(format!(
            "message container is a {} instead of a single element",
            container.kind()
        )));
    };

    let mut elements = container
        .iter()
        .filter(|(key, _)| !key.starts_with(ATTRIBUTE_PREFIX));
    let Some((response_type, value)) = elements.next() else {
        return Err(XmlError::UnexpectedSchema(
            "message container holds no response element".to_owned(),
        ));
    };
    let surplus = elements.count();
    if surplus > 0 {
        tracing::warn!(
            response_type = %response_type,
            surplus,
            "message container holds more than one response element; using the first"
        );
    }

    let body = match value {
        Value::Struct(body) => body.clone(),
        Value::List(items) => {
            tracing::warn!(
                response_type = %response_type,
                count = items.len(),
                "repeated response element; using the first"
            );
            items
                .first()
                .and_then(Value::as_struct)
                .cloned()
                .unwrap_or_default()
        }
        _ => OrderedStruct::new(),
    };

    let status = Status {
        code: attribute(&body, "statusCode"),
        severity: attribute(&body, "statusSeverity"),
        message: attribute(&body, "statusMessage"),
    };

    let envelope = ResponseEnvelope {
        response_type: response_type.clone(),
        body,
        status,
    };

    if let Some(err) = envelope.business_error() {
        tracing::error!(
            response_type = %err.response_type,
            code = err.code.as_deref().unwrap_or_default(),
            message = err.message.as_deref().unwrap_or_default(),
            "qbxml request failed"
        );
    } else {
        tracing::debug!(
            response_type = %envelope.response_type,
            entries = envelope.body.len(),
            "decoded qbxml response"
        );
    }

    Ok(envelope)
}

/// Parse any XML document into its root element name and contents.
///
/// The root is always returned as a struct, even when it holds only text.
///
/// # Errors
///
/// Returns [`XmlError::MalformedResponse`] if the document is empty or not
/// well-formed.
pub fn read_document(xml: &[u8]) -> Result<(String, OrderedStruct), XmlError> {
    let mut reader = Reader::from_reader(xml);

    // Skip the declaration, processing instructions and comments.
    let (name, value) = loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = element_name(&e)?;
                let value = read_element(&mut reader, &e, &name)?;
                break (name, value);
            }
            Event::Empty(e) => {
                let name = element_name(&e)?;
                let value = read_empty_element(&reader, &e)?;
                break (name, value);
            }
            Event::Eof => {
                return Err(XmlError::MalformedResponse(
                    "document has no root element".to_owned(),
                ));
            }
            _ => {}
        }
    };

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => {
                return Err(XmlError::MalformedResponse(format!(
                    "unexpected element <{}> after the root element",
                    element_name(&e)?
                )));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let root = match value {
        Value::Struct(s) => s,
        Value::Text(text) if text.is_empty() => OrderedStruct::new(),
        other => OrderedStruct::new().with(TEXT_KEY, other),
    };
    Ok((name, root))
}

// ---------------------------------------------------------------------------
// Helper functions for reading elements
// ---------------------------------------------------------------------------

fn element_name(e: &BytesStart<'_>) -> Result<String, XmlError> {
    std::str::from_utf8(e.name().as_ref())
        .map(ToOwned::to_owned)
        .map_err(|err| XmlError::MalformedResponse(err.to_string()))
}

/// Collect the attributes of a start tag as `@name` entries.
fn read_attributes(reader: &Reader<&[u8]>, e: &BytesStart<'_>) -> Result<OrderedStruct, XmlError> {
    let mut fields = OrderedStruct::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|err| XmlError::MalformedResponse(err.to_string()))?;
        let value = attr.decode_and_unescape_value(reader.decoder())?;
        fields.push(format!("{ATTRIBUTE_PREFIX}{key}"), value.into_owned());
    }
    Ok(fields)
}

fn read_empty_element(reader: &Reader<&[u8]>, e: &BytesStart<'_>) -> Result<Value, XmlError> {
    let fields = read_attributes(reader, e)?;
    Ok(if fields.is_empty() {
        Value::Text(String::new())
    } else {
        Value::Struct(fields)
    })
}

/// Read the contents of an element whose start tag was just consumed,
/// through its matching end tag.
fn read_element(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart<'_>,
    name: &str,
) -> Result<Value, XmlError> {
    let mut fields = read_attributes(reader, start)?;
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let child = element_name(&e)?;
                let value = read_element(reader, &e, &child)?;
                fields.merge_child(child, value);
            }
            Event::Empty(e) => {
                let child = element_name(&e)?;
                let value = read_empty_element(reader, &e)?;
                fields.merge_child(child, value);
            }
            Event::Text(e) => {
                let decoded = e
                    .decode()
                    .map_err(|err| XmlError::MalformedResponse(err.to_string()))?;
                text.push_str(&decoded);
            }
            Event::CData(e) => {
                let raw = std::str::from_utf8(&e)
                    .map_err(|err| XmlError::MalformedResponse(err.to_string()))?;
                text.push_str(raw);
            }
            Event::GeneralRef(e) => {
                let resolved = e
                    .resolve_char_ref()
                    .map_err(|err| XmlError::MalformedResponse(err.to_string()))?;
                if let Some(c) = resolved {
                    text.push(c);
                } else {
                    let entity = e
                        .decode()
                        .map_err(|err| XmlError::MalformedResponse(err.to_string()))?;
                    let Some(replacement) = quick_xml::escape::resolve_predefined_entity(&entity)
                    else {
                        return Err(XmlError::MalformedResponse(format!(
                            "unknown entity &{entity}; in <{name}>"
                        )));
                    };
                    text.push_str(replacement);
                }
            }
            Event::End(_) => break,
            Event::Eof => {
                return Err(XmlError::MalformedResponse(format!(
                    "unexpected EOF inside <{name}>"
                )));
            }
            _ => {}
        }
    }

    let text = text.trim();
    if fields.is_empty() {
        return Ok(Value::Text(text.to_owned()));
    }
    if !text.is_empty() {
        fields.push(TEXT_KEY, text);
    }
    Ok(Value::Struct(fields))
}

fn attribute(body: &OrderedStruct, name: &str) -> Option<String> {
    body.get(&format!("{ATTRIBUTE_PREFIX}{name}"))
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
}
