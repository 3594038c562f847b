//! Property-based tests for the encoder and the document model.
//!
//! These cover the guarantees that must hold for every input rather than a
//! handful of fixed ones: primitive round trips, length prefixes, determinism
//! and key uniqueness.

use bison::{to_vec, BytesReader, BytesWriter, Document, Value};
use proptest::prelude::*;
use std::collections::HashMap;

fn leaf_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<f64>().prop_map(Value::Double),
        "[a-z ]{0,12}".prop_map(Value::String),
        any::<bool>().prop_map(Value::Boolean),
        any::<i32>().prop_map(Value::Int32),
        any::<i64>().prop_map(Value::Int64),
        Just(Value::Null),
        Just(Value::MinKey),
        Just(Value::MaxKey),
    ]
}

fn value_tree() -> impl Strategy<Value = Value> {
    leaf_value().prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec(("[a-z]{1,4}", inner), 0..4).prop_map(|pairs| {
                let mut doc = Document::new();
                for (key, value) in pairs {
                    doc.insert(key, value).unwrap();
                }
                Value::Document(doc)
            }),
        ]
    })
}

fn document() -> impl Strategy<Value = Document> {
    prop::collection::vec(("[a-z]{1,6}", value_tree()), 0..8).prop_map(|pairs| {
        let mut doc = Document::new();
        for (key, value) in pairs {
            doc.insert(key, value).unwrap();
        }
        doc
    })
}

fn declared_len(bytes: &[u8]) -> usize {
    BytesReader::new(bytes).read_i32().unwrap() as usize
}

proptest! {
    #[test]
    fn prop_i32_round_trip(n in any::<i32>()) {
        let mut w = BytesWriter::new();
        w.push_i32(n);
        let buf = w.finalize();
        prop_assert_eq!(BytesReader::new(&buf).read_i32().unwrap(), n);
    }

    #[test]
    fn prop_i64_round_trip(n in any::<i64>()) {
        let mut w = BytesWriter::new();
        w.push_i64(n);
        let buf = w.finalize();
        prop_assert_eq!(BytesReader::new(&buf).read_i64().unwrap(), n);
    }

    #[test]
    fn prop_u64_round_trip(n in any::<u64>()) {
        let mut w = BytesWriter::new();
        w.push_u64(n);
        let buf = w.finalize();
        prop_assert_eq!(BytesReader::new(&buf).read_u64().unwrap(), n);
    }

    #[test]
    fn prop_f64_round_trip_bits(x in any::<f64>()) {
        let mut w = BytesWriter::new();
        w.push_f64(x);
        let buf = w.finalize();
        prop_assert_eq!(BytesReader::new(&buf).read_f64().unwrap().to_bits(), x.to_bits());
    }

    #[test]
    fn prop_bool_round_trip(b in any::<bool>()) {
        let mut w = BytesWriter::new();
        w.push_bool(b);
        let buf = w.finalize();
        prop_assert_eq!(BytesReader::new(&buf).read_bool().unwrap(), b);
    }

    #[test]
    fn prop_length_prefix_matches(doc in document()) {
        let bytes = to_vec(&doc);
        prop_assert_eq!(declared_len(&bytes), bytes.len());
        prop_assert_eq!(bytes.last().copied(), Some(0u8));
    }

    #[test]
    fn prop_encoding_is_deterministic(doc in document()) {
        let copy = doc.clone();
        prop_assert_eq!(to_vec(&doc), to_vec(&doc));
        prop_assert_eq!(to_vec(&doc), to_vec(&copy));
    }

    #[test]
    fn prop_keys_stay_unique(ops in prop::collection::vec(("[a-d]", any::<i32>()), 0..40)) {
        let mut doc = Document::new();
        let mut last: HashMap<String, i32> = HashMap::new();
        let mut first_seen: Vec<String> = Vec::new();

        for (key, n) in ops {
            doc.insert(key.clone(), n).unwrap();
            if last.insert(key.clone(), n).is_none() {
                first_seen.push(key);
            }
        }

        prop_assert_eq!(doc.len(), last.len());
        let keys: Vec<String> = doc.iter().map(|(k, _)| k.to_string()).collect();
        prop_assert_eq!(keys, first_seen);
        for (key, n) in &last {
            prop_assert_eq!(doc.get_i32(key), Some(*n));
        }
    }

    #[test]
    fn prop_copies_are_isolated(doc in document(), key in "[a-z]{1,6}", n in any::<i64>()) {
        let before = to_vec(&doc);
        let mut copy = doc.clone();
        copy.insert(key.clone(), n).unwrap();

        prop_assert_eq!(to_vec(&doc), before);
        prop_assert_eq!(copy.get_i64(&key), Some(n));
    }
}
