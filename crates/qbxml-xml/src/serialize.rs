//! QBXML encoding: converting ordered request bodies to wire documents.
//!
//! Encoding rules for each `(key, value)` entry of a body:
//!
//! - scalar: `<key>text</key>`
//! - struct: `<key>` wrapping the struct's entries, or `<key/>` when empty
//! - list: one `<key>` sibling per item, each rendered with the rules above
//!
//! The body is validated in full before anything is written, so a malformed
//! value never yields a partial document.

use std::io::{self, Write};

use bytes::Bytes;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesPI, BytesText, Event};

use qbxml_model::{
    DOCUMENT_ROOT, ErrorMode, ON_ERROR_ATTRIBUTE, OrderedStruct, REQUEST_CONTAINER,
    RequestEnvelope, Value,
};

use crate::error::XmlError;

/// Indentation used for every encoded document.
const INDENT_WIDTH: usize = 2;

/// Encode a [`RequestEnvelope`] as a complete QBXML document.
///
/// # Errors
///
/// Returns [`XmlError::MalformedValue`] if the body contains a value with no
/// XML rendering.
pub fn encode(request: &RequestEnvelope) -> Result<Bytes, XmlError> {
    encode_request(
        &request.request_type,
        &request.body,
        request.error_mode,
        &request.protocol_version,
    )
}

/// Encode a request element and body as a complete QBXML document.
///
/// # Example output
///
/// ```xml
/// <?xml version="1.0"?>
/// <?qbxml version="13.0"?>
/// <QBXML>
///   <QBXMLMsgsRq onError="stopOnError">
///     <ItemQueryRq>
///       <ListID>8000380C-1459355152</ListID>
///       <ListID>80002EDE-1426787483</ListID>
///     </ItemQueryRq>
///   </QBXMLMsgsRq>
/// </QBXML>
/// ```
///
/// # Errors
///
/// Returns [`XmlError::MalformedValue`] for invalid element names, lists
/// nested directly inside lists, text XML cannot carry, or an invalid
/// protocol version.
pub fn encode_request(
    request_type: &str,
    body: &OrderedStruct,
    error_mode: ErrorMode,
    protocol_version: &str,
) -> Result<Bytes, XmlError> {
    validate_name(request_type)?;
    validate_version(protocol_version)?;
    validate_struct(body)?;

    let mut buf = Vec::with_capacity(512);
    {
        let mut writer = Writer::new_with_indent(&mut buf, b' ', INDENT_WIDTH);

        writer.write_event(Event::Decl(BytesDecl::new("1.0", None, None)))?;
        writer.write_event(Event::PI(BytesPI::new(format!(
            "qbxml version=\"{protocol_version}\""
        ))))?;

        writer
            .create_element(DOCUMENT_ROOT)
            .write_inner_content(|w| {
                w.create_element(REQUEST_CONTAINER)
                    .with_attribute((ON_ERROR_ATTRIBUTE, error_mode.as_str()))
                    .write_inner_content(|w| write_element(w, request_type, body))?;
                Ok(())
            })?;
    }
    buf.push(b'\n');

    tracing::debug!(
        request_type,
        entries = body.len(),
        bytes = buf.len(),
        "encoded qbxml request"
    );

    Ok(Bytes::from(buf))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_struct(body: &OrderedStruct) -> Result<(), XmlError> {
    for (key, value) in body {
        validate_name(key)?;
        validate_value(key, value)?;
    }
    Ok(())
}

fn validate_value(key: &str, value: &Value) -> Result<(), XmlError> {
    match value {
        Value::Struct(inner) => validate_struct(inner),
        Value::List(items) => {
            for item in items {
                if let Value::List(_) = item {
                    return Err(XmlError::malformed_value(
                        key,
                        "list nested directly inside a list",
                    ));
                }
                validate_value(key, item)?;
            }
            Ok(())
        }
        Value::Text(text) => {
            if let Some(c) = text.chars().find(|c| !is_xml_char(*c)) {
                return Err(XmlError::malformed_value(
                    key,
                    format!("character U+{:04X} cannot appear in XML text", u32::from(c)),
                ));
            }
            Ok(())
        }
        Value::Integer(_) | Value::Bool(_) | Value::Date(_) => Ok(()),
    }
}

/// Check an element name against the XML `Name` production (ASCII-leaning).
fn validate_name(name: &str) -> Result<(), XmlError> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(XmlError::malformed_value(name, "empty element name"));
    };
    if !(first.is_alphabetic() || first == '_') {
        return Err(XmlError::malformed_value(
            name,
            "element name must start with a letter or underscore",
        ));
    }
    if let Some(c) = chars.find(|c| !(c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))) {
        return Err(XmlError::malformed_value(
            name,
            format!("invalid character {c:?} in element name"),
        ));
    }
    Ok(())
}

fn validate_version(version: &str) -> Result<(), XmlError> {
    if version.is_empty() || !version.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(XmlError::malformed_value(
            "qbxml",
            format!("invalid protocol version {version:?}"),
        ));
    }
    Ok(())
}

/// Characters allowed by the XML 1.0 `Char` production.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r')
        || ('\u{20}'..='\u{D7FF}').contains(&c)
        || ('\u{E000}'..='\u{FFFD}').contains(&c)
        || c >= '\u{10000}'
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Write `<tag>` wrapping the struct's entries, or `<tag/>` if it has none.
fn write_element<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    body: &OrderedStruct,
) -> io::Result<()> {
    if body.is_empty() {
        writer.create_element(tag).write_empty()?;
    } else {
        writer
            .create_element(tag)
            .write_inner_content(|w| write_entries(w, body))?;
    }
    Ok(())
}

fn write_entries<W: Write>(writer: &mut Writer<W>, body: &OrderedStruct) -> io::Result<()> {
    for (key, value) in body {
        write_entry(writer, key, value)?;
    }
    Ok(())
}

fn write_entry<W: Write>(writer: &mut Writer<W>, key: &str, value: &Value) -> io::Result<()> {
    match value {
        Value::Struct(inner) => write_element(writer, key, inner),
        Value::List(items) => {
            for item in items {
                write_entry(writer, key, item)?;
            }
            Ok(())
        }
        scalar => write_text_element(writer, key, &scalar.as_text().unwrap_or_default()),
    }
}

/// Write a simple `<tag>text</tag>` element.
fn write_text_element<W: Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> io::Result<()> {
    writer
        .create_element(tag)
        .write_text_content(BytesText::new(text))?;
    Ok(())
}
