//! Ordered key/value structures exchanged with the QBXML codec.
//!
//! QBXML is order-sensitive: the receiving application rejects requests whose
//! sibling elements are out of schema order, and repeated lookups are expressed
//! as repeated sibling elements with the same tag. A plain map can express
//! neither, so structures are kept as an explicit list of `(key, value)` pairs.

use std::fmt;

use chrono::NaiveDate;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// A single value inside an [`OrderedStruct`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Text content, emitted verbatim (escaped) as element text.
    Text(String),
    /// Integer content.
    Integer(i64),
    /// Boolean content, emitted as `true`/`false`.
    Bool(bool),
    /// Calendar date, emitted as `YYYY-MM-DD`.
    Date(NaiveDate),
    /// Nested element whose children are the struct's entries.
    Struct(OrderedStruct),
    /// Repeated sibling elements sharing the owning key as their tag.
    List(Vec<Value>),
}

impl Value {
    /// Returns `true` for text, integer, boolean and date values.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Self::Struct(_) | Self::List(_))
    }

    /// Canonical text form of a scalar, `None` for structs and lists.
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Integer(n) => Some(n.to_string()),
            Self::Bool(b) => Some(if *b { "true" } else { "false" }.to_owned()),
            Self::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            Self::Struct(_) | Self::List(_) => None,
        }
    }

    /// Borrow the string if this is a `Text` value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the nested struct if this is a `Struct` value.
    #[must_use]
    pub fn as_struct(&self) -> Option<&OrderedStruct> {
        match self {
            Self::Struct(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the items if this is a `List` value.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Integer(_) => "integer",
            Self::Bool(_) => "bool",
            Self::Date(_) => "date",
            Self::Struct(_) => "struct",
            Self::List(_) => "list",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Struct(s) => write!(f, "{{struct: {} entries}}", s.len()),
            Self::List(items) => write!(f, "{{list: {} items}}", items.len()),
            scalar => f.write_str(&scalar.as_text().unwrap_or_default()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<OrderedStruct> for Value {
    fn from(s: OrderedStruct) -> Self {
        Self::Struct(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

/// Insertion-ordered sequence of `(key, value)` pairs.
///
/// Keys may repeat. Lookups return the first match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedStruct {
    entries: Vec<(String, Value)>,
}

impl OrderedStruct {
    /// Create an empty struct.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, keeping any existing entry with the same key.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Builder-style [`push`](Self::push).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(key, value);
        self
    }

    /// Append a child, folding repeats of an existing key into a `List`.
    ///
    /// The merged list stays at the position of the first occurrence. This is
    /// how the decoder turns repeated sibling elements into one entry.
    pub fn merge_child(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, Value::List(items))) => items.push(value),
            Some((_, existing)) => {
                let first = std::mem::replace(existing, Value::List(Vec::with_capacity(2)));
                if let Value::List(items) = existing {
                    items.push(first);
                    items.push(value);
                }
            }
            None => self.entries.push((key, value)),
        }
    }

    /// Insert or replace the first entry with the given key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// First value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Every value stored under `key`, in insertion order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.entries
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Text of the first `Text` value stored under `key`.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Follow a path of nested struct keys, e.g. `["ClassRef", "FullName"]`.
    #[must_use]
    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        let (last, parents) = path.split_last()?;
        let mut current = self;
        for key in parents {
            current = current.get(key)?.as_struct()?;
        }
        current.get(last)
    }

    /// Returns `true` if any entry uses `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Keys in insertion order (repeats included).
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, (String, Value)> {
        self.entries.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for OrderedStruct {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for OrderedStruct {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.entries
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

impl IntoIterator for OrderedStruct {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a OrderedStruct {
    type Item = &'a (String, Value);
    type IntoIter = std::slice::Iter<'a, (String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(s) => serializer.serialize_str(s),
            Self::Integer(n) => serializer.serialize_i64(*n),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Date(d) => serializer.collect_str(&d.format("%Y-%m-%d")),
            Self::Struct(s) => s.serialize(serializer),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl Serialize for OrderedStruct {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_render_canonical_text() {
        let date = NaiveDate::from_ymd_opt(2016, 9, 27).expect("valid date");
        assert_eq!(Value::Date(date).as_text().as_deref(), Some("2016-09-27"));
        assert_eq!(Value::Bool(true).as_text().as_deref(), Some("true"));
        assert_eq!(Value::Integer(-4).as_text().as_deref(), Some("-4"));
        assert_eq!(Value::from("abc").as_text().as_deref(), Some("abc"));
        assert!(Value::Struct(OrderedStruct::new()).as_text().is_none());
    }

    #[test]
    fn test_should_preserve_insertion_order() {
        let s = OrderedStruct::new()
            .with("C", "3")
            .with("A", "1")
            .with("B", "2");
        assert_eq!(s.keys().collect::<Vec<_>>(), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_should_fold_repeated_children_into_list() {
        let mut s = OrderedStruct::new();
        s.merge_child("Ret", Value::from("a"));
        s.merge_child("Other", Value::from("x"));
        s.merge_child("Ret", Value::from("b"));
        s.merge_child("Ret", Value::from("c"));

        assert_eq!(s.len(), 2);
        assert_eq!(s.keys().collect::<Vec<_>>(), vec!["Ret", "Other"]);
        let items = s.get("Ret").and_then(Value::as_list).expect("list");
        assert_eq!(items.len(), 3);
        assert_eq!(items[2].as_str(), Some("c"));
    }

    #[test]
    fn test_should_follow_nested_path() {
        let s = OrderedStruct::new().with(
            "ClassRef",
            OrderedStruct::new()
                .with("ListID", "80000001")
                .with("FullName", "Gifting"),
        );
        assert_eq!(
            s.get_path(&["ClassRef", "FullName"]).and_then(Value::as_str),
            Some("Gifting")
        );
        assert!(s.get_path(&["ClassRef", "Missing"]).is_none());
        assert!(s.get_path(&[]).is_none());
    }

    #[test]
    fn test_should_replace_with_set() {
        let mut s = OrderedStruct::new().with("A", "1").with("B", "2");
        s.set("A", "9");
        s.set("C", "3");
        assert_eq!(s.get_str("A"), Some("9"));
        assert_eq!(s.keys().collect::<Vec<_>>(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_should_serialize_as_ordered_json() {
        let s = OrderedStruct::new()
            .with("Zeta", "z")
            .with("Alpha", vec!["1", "2"])
            .with("Flag", true);
        let json = serde_json::to_string(&s).expect("test serialization");
        assert_eq!(json, r#"{"Zeta":"z","Alpha":["1","2"],"Flag":true}"#);
    }
}
