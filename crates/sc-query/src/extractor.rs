use std::borrow::Cow;
use std::fmt;

use sc_core::{MapItem, Record, Value};

pub trait Extractor: fmt::Display {
    fn extract<'v>(&self, value: &'v Value) -> Option<Cow<'v, Value>>;
}

/// Sees through any number of non-null indirections.
pub fn elem(mut value: &Value) -> &Value {
    while let Value::Ref(Some(inner)) = value {
        value = inner;
    }
    value
}

pub fn extract<'v>(value: &'v Value, key: &str) -> Option<Cow<'v, Value>> {
    Key::new(key).extract(value)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    key: String,
}

impl Key {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn extract_item<'v>(&self, item: &'v MapItem) -> Option<Cow<'v, Value>> {
        if item.key.to_string() == self.key {
            return Some(Cow::Borrowed(&item.value));
        }
        None
    }

    fn extract_record<'v>(&self, record: &'v Record) -> Option<Cow<'v, Value>> {
        let table = record.schema().field_table();
        for (index, name) in &table.direct {
            if *name == self.key {
                return record.field(*index).map(Cow::Borrowed);
            }
        }
        // Inlined fields only after every direct field missed.
        table
            .inline
            .iter()
            .filter_map(|index| record.field(*index))
            .find_map(|inline| self.extract(inline))
    }
}

impl Extractor for Key {
    fn extract<'v>(&self, value: &'v Value) -> Option<Cow<'v, Value>> {
        match elem(value) {
            Value::Object(object) => object.extract_by_key(&self.key).map(Cow::Owned),
            Value::Map(entries) => entries
                .iter()
                .find(|(key, _)| elem(key).to_string() == self.key)
                .map(|(_, value)| Cow::Borrowed(value)),
            Value::MapItem(item) => self.extract_item(item),
            Value::Record(record) => self.extract_record(record),
            Value::MapSlice(items) => items
                .iter()
                .filter(|item| !item.key.is_nil())
                .find_map(|item| self.extract_item(item)),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Index {
    index: usize,
}

impl Index {
    pub fn new(index: usize) -> Self {
        Self { index }
    }
}

impl Extractor for Index {
    fn extract<'v>(&self, value: &'v Value) -> Option<Cow<'v, Value>> {
        match elem(value) {
            Value::Seq(values) => values.get(self.index).map(Cow::Borrowed),
            _ => None,
        }
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.index)
    }
}

#[cfg(test)]
mod extractor_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sc_core::{Extractable, RecordSchema};
    use std::sync::Arc;

    #[derive(Debug)]
    struct Headers;

    impl Extractable for Headers {
        fn extract_by_key(&self, key: &str) -> Option<Value> {
            (key == "content-type").then(|| Value::from("application/json"))
        }
    }

    fn found(value: &Value, key: &str) -> Option<Value> {
        extract(value, key).map(Cow::into_owned)
    }

    #[test]
    fn map_lookup_matches_key_print_form() {
        let map = Value::map([("a", 1i64)]);
        assert_eq!(found(&map, "a"), Some(Value::from(1i64)));
        assert_eq!(found(&map, "b"), None);

        let numeric_keys = Value::map([(Value::from(1i64), Value::from("one"))]);
        assert_eq!(found(&numeric_keys, "1"), Some(Value::from("one")));

        let pointer_keys = Value::map([(Value::ptr("k"), Value::from(true))]);
        assert_eq!(found(&pointer_keys, "k"), Some(Value::Bool(true)));
    }

    #[test]
    fn found_nil_is_distinct_from_missing() {
        let map = Value::map([("a", Value::Nil)]);
        assert_eq!(found(&map, "a"), Some(Value::Nil));
        assert_eq!(found(&map, "b"), None);
    }

    #[test]
    fn indirections_are_unwrapped() {
        let nested = Value::ptr(Value::ptr(Value::map([("a", 1i64)])));
        assert_eq!(found(&nested, "a"), Some(Value::from(1i64)));
        assert_eq!(found(&Value::null_ptr(), "a"), None);
    }

    #[test]
    fn map_slice_scans_in_order() {
        let pairs = Value::map_slice([("a", 1i64), ("b", 2i64)]);
        assert_eq!(found(&pairs, "b"), Some(Value::from(2i64)));

        let duplicates = Value::map_slice([("a", 1i64), ("a", 2i64)]);
        assert_eq!(found(&duplicates, "a"), Some(Value::from(1i64)));

        let with_empty = Value::MapSlice(vec![
            MapItem::new(Value::Nil, 0i64),
            MapItem::new("<nil>", 9i64),
        ]);
        assert_eq!(found(&with_empty, "<nil>"), Some(Value::from(9i64)));
    }

    #[test]
    fn single_map_item_matches_its_key() {
        let item = Value::from(MapItem::new(7i64, "seven"));
        assert_eq!(found(&item, "7"), Some(Value::from("seven")));
        assert_eq!(found(&item, "value"), None);
    }

    #[test]
    fn record_fields_use_derived_names() {
        let schema = RecordSchema::builder("User")
            .field("Name")
            .tagged_field("EmailAddress", "email")
            .private_field("password")
            .build();
        let record = Record::new(
            &schema,
            vec![Value::from("alice"), Value::from("a@b"), Value::from("secret")],
        )
        .expect("record");
        let value = Value::Record(record);

        assert_eq!(found(&value, "name"), Some(Value::from("alice")));
        assert_eq!(found(&value, "Name"), None);
        assert_eq!(found(&value, "email"), Some(Value::from("a@b")));
        assert_eq!(found(&value, "emailaddress"), None);
        assert_eq!(found(&value, "password"), None);
    }

    #[test]
    fn direct_fields_win_over_inlined_ones() {
        let inner_schema = RecordSchema::builder("Meta")
            .field("ID")
            .field("Owner")
            .build();
        let inner = Record::new(&inner_schema, vec![Value::from("inner-id"), Value::from("bob")])
            .expect("inner record");

        let outer_schema = RecordSchema::builder("Resource")
            .tagged_field("Meta", ",inline")
            .field("ID")
            .build();
        let outer = Record::new(
            &outer_schema,
            vec![Value::Record(inner), Value::from("outer-id")],
        )
        .expect("outer record");
        let value = Value::Record(outer);

        assert_eq!(found(&value, "id"), Some(Value::from("outer-id")));
        assert_eq!(found(&value, "owner"), Some(Value::from("bob")));
        assert_eq!(found(&value, "missing"), None);
    }

    #[test]
    fn inlined_maps_and_pointers_are_searched() {
        let schema = RecordSchema::builder("Envelope")
            .tagged_field("Extra", "extra,inline")
            .build();
        let record = Record::new(&schema, vec![Value::ptr(Value::map([("k", "v")]))])
            .expect("record");
        let value = Value::Record(record);
        assert_eq!(found(&value, "k"), Some(Value::from("v")));
        assert!(found(&value, "extra").is_some());
    }

    #[test]
    fn self_describing_values_take_priority() {
        let value = Value::Object(Arc::new(Headers));
        assert_eq!(
            found(&value, "content-type"),
            Some(Value::from("application/json"))
        );
        assert_eq!(found(&value, "accept"), None);
        assert_eq!(
            found(&Value::ptr(value.clone()), "content-type"),
            Some(Value::from("application/json"))
        );
    }

    #[test]
    fn scalars_are_never_searched() {
        assert_eq!(found(&Value::from("abc"), "a"), None);
        assert_eq!(found(&Value::from(1i64), "a"), None);
        assert_eq!(found(&Value::Seq(vec![Value::from(1i64)]), "0"), None);
    }

    #[test]
    fn index_reads_sequences_only() {
        let seq = Value::ptr(Value::Seq(vec![Value::from("a"), Value::from("b")]));
        assert_eq!(
            Index::new(1).extract(&seq).map(Cow::into_owned),
            Some(Value::from("b"))
        );
        assert!(Index::new(2).extract(&seq).is_none());
        assert!(Index::new(0).extract(&Value::map([("0", 1i64)])).is_none());
    }

    #[test]
    fn extractors_display_as_path_steps() {
        assert_eq!(Key::new("name").to_string(), ".name");
        assert_eq!(Index::new(3).to_string(), "[3]");
    }
}
