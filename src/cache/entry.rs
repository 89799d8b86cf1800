//! Cache entries and the payload codec.
//!
//! An [`Entry`] maps string keys to polymorphic [`CacheValue`]s. Entries are
//! created transiently around a single `set`/`get` call, serialized into a
//! self-describing byte payload, and discarded. The codec is JSON, so every
//! value carries its own type and `decode` reconstructs it without an
//! external schema.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cache::error::CacheError;

/// A caller-supplied mapping of string keys to polymorphic values.
///
/// Keys within one entry are unique; insertion order is irrelevant.
pub type Entry = BTreeMap<String, CacheValue>;

/// A dynamically typed cache value.
///
/// Covers the payload types the cache can round-trip: strings, integers,
/// floats, booleans, sequences and nested maps. Untagged serialization
/// keeps the wire form plain JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CacheValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Seq(Vec<CacheValue>),
    Map(BTreeMap<String, CacheValue>),
}

impl CacheValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CacheValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CacheValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CacheValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CacheValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[CacheValue]> {
        match self {
            CacheValue::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, CacheValue>> {
        match self {
            CacheValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<bool> for CacheValue {
    fn from(value: bool) -> Self {
        CacheValue::Bool(value)
    }
}

impl From<i64> for CacheValue {
    fn from(value: i64) -> Self {
        CacheValue::Int(value)
    }
}

impl From<i32> for CacheValue {
    fn from(value: i32) -> Self {
        CacheValue::Int(value as i64)
    }
}

impl From<f64> for CacheValue {
    fn from(value: f64) -> Self {
        CacheValue::Float(value)
    }
}

impl From<&str> for CacheValue {
    fn from(value: &str) -> Self {
        CacheValue::Str(value.to_string())
    }
}

impl From<String> for CacheValue {
    fn from(value: String) -> Self {
        CacheValue::Str(value)
    }
}

impl From<Vec<CacheValue>> for CacheValue {
    fn from(value: Vec<CacheValue>) -> Self {
        CacheValue::Seq(value)
    }
}

impl From<BTreeMap<String, CacheValue>> for CacheValue {
    fn from(value: BTreeMap<String, CacheValue>) -> Self {
        CacheValue::Map(value)
    }
}

/// Serialize an entry into a self-describing byte payload.
///
/// Non-finite floats have no JSON representation and are rejected here
/// rather than silently rewritten by the serializer.
pub fn encode(entry: &Entry) -> Result<Vec<u8>, CacheError> {
    for value in entry.values() {
        ensure_encodable(value)?;
    }
    serde_json::to_vec(entry).map_err(|e| CacheError::Codec(e.to_string()))
}

/// Deserialize a payload produced by [`encode`].
pub fn decode(payload: &[u8]) -> Result<Entry, CacheError> {
    serde_json::from_slice(payload).map_err(|e| CacheError::Codec(e.to_string()))
}

fn ensure_encodable(value: &CacheValue) -> Result<(), CacheError> {
    match value {
        CacheValue::Float(f) if !f.is_finite() => Err(CacheError::Codec(format!(
            "non-finite float {} is not representable",
            f
        ))),
        CacheValue::Seq(items) => items.iter().try_for_each(ensure_encodable),
        CacheValue::Map(map) => map.values().try_for_each(ensure_encodable),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_value() -> impl Strategy<Value = CacheValue> {
        let leaf = prop_oneof![
            any::<bool>().prop_map(CacheValue::Bool),
            any::<i64>().prop_map(CacheValue::Int),
            (-1.0e12f64..1.0e12f64).prop_map(CacheValue::Float),
            ".{0,12}".prop_map(CacheValue::Str),
        ];
        leaf.prop_recursive(4, 32, 4, |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..4).prop_map(CacheValue::Seq),
                proptest::collection::btree_map("[a-z]{1,8}", inner, 0..4)
                    .prop_map(CacheValue::Map),
            ]
        })
    }

    fn arb_entry() -> impl Strategy<Value = Entry> {
        proptest::collection::btree_map("[a-zA-Z0-9:_-]{1,16}", arb_value(), 0..6)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// decode(encode(e)) == e for every representable entry.
        #[test]
        fn prop_entry_round_trip(entry in arb_entry()) {
            let payload = encode(&entry).expect("entry should encode");
            let restored = decode(&payload).expect("payload should decode");
            prop_assert_eq!(entry, restored);
        }
    }

    #[test]
    fn test_round_trip_string_field() {
        let mut entry = Entry::new();
        entry.insert("foo".to_string(), CacheValue::from("bar"));

        let payload = encode(&entry).expect("should encode");
        let restored = decode(&payload).expect("should decode");

        assert_eq!(entry, restored);
        assert_eq!(restored["foo"].as_str(), Some("bar"));
    }

    #[test]
    fn test_round_trip_preserves_types() {
        let mut nested = BTreeMap::new();
        nested.insert("count".to_string(), CacheValue::Int(42));
        nested.insert("ratio".to_string(), CacheValue::Float(0.5));

        let mut entry = Entry::new();
        entry.insert("name".to_string(), CacheValue::from("session"));
        entry.insert("active".to_string(), CacheValue::Bool(true));
        entry.insert(
            "tags".to_string(),
            CacheValue::Seq(vec![CacheValue::from("a"), CacheValue::from("b")]),
        );
        entry.insert("stats".to_string(), CacheValue::Map(nested));

        let restored = decode(&encode(&entry).unwrap()).unwrap();

        assert_eq!(restored["name"], CacheValue::Str("session".to_string()));
        assert_eq!(restored["active"], CacheValue::Bool(true));
        assert_eq!(restored["tags"].as_seq().unwrap().len(), 2);
        assert_eq!(
            restored["stats"].as_map().unwrap()["count"],
            CacheValue::Int(42)
        );
        assert_eq!(
            restored["stats"].as_map().unwrap()["ratio"],
            CacheValue::Float(0.5)
        );
    }

    #[test]
    fn test_integers_stay_integers() {
        let mut entry = Entry::new();
        entry.insert("n".to_string(), CacheValue::Int(7));
        let restored = decode(&encode(&entry).unwrap()).unwrap();
        // 7 must come back as an integer, not 7.0
        assert_eq!(restored["n"], CacheValue::Int(7));

        let mut entry = Entry::new();
        entry.insert("f".to_string(), CacheValue::Float(7.0));
        let restored = decode(&encode(&entry).unwrap()).unwrap();
        assert_eq!(restored["f"], CacheValue::Float(7.0));
    }

    #[test]
    fn test_decode_rejects_malformed_payload() {
        let err = decode(b"not json at all").unwrap_err();
        assert!(matches!(err, CacheError::Codec(_)));

        // Valid JSON, but not an entry
        let err = decode(b"[1, 2, 3]").unwrap_err();
        assert!(matches!(err, CacheError::Codec(_)));
    }

    #[test]
    fn test_decode_rejects_unsupported_values() {
        // null has no CacheValue case
        let err = decode(br#"{"k": null}"#).unwrap_err();
        assert!(matches!(err, CacheError::Codec(_)));
    }

    #[test]
    fn test_encode_rejects_non_finite_floats() {
        let mut entry = Entry::new();
        entry.insert("bad".to_string(), CacheValue::Float(f64::NAN));
        let err = encode(&entry).unwrap_err();
        assert!(matches!(err, CacheError::Codec(_)));

        let mut entry = Entry::new();
        entry.insert(
            "nested".to_string(),
            CacheValue::Seq(vec![CacheValue::Float(f64::INFINITY)]),
        );
        assert!(encode(&entry).is_err());
    }

    #[test]
    fn test_from_conversions() {
        assert_eq!(CacheValue::from("x"), CacheValue::Str("x".to_string()));
        assert_eq!(CacheValue::from(5i64), CacheValue::Int(5));
        assert_eq!(CacheValue::from(5i32), CacheValue::Int(5));
        assert_eq!(CacheValue::from(1.5), CacheValue::Float(1.5));
        assert_eq!(CacheValue::from(true), CacheValue::Bool(true));
    }
}
