use std::collections::HashMap;

use crate::models::Record;

/// In-memory collection of records keyed by `<Class>.<id>`.
///
/// Iteration follows insertion order, which is also the order records are
/// listed by `all` and written to the JSON file.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    order: Vec<String>,
    records: HashMap<String, Record>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record under its key, replacing any record already there.
    /// A replaced record keeps its original position.
    pub fn register(&mut self, record: Record) {
        let key = record.key();
        if self.records.insert(key.clone(), record).is_none() {
            self.order.push(key);
        }
    }

    /// Every `(key, record)` pair in insertion order.
    pub fn all(&self) -> impl Iterator<Item = (&str, &Record)> {
        self.order
            .iter()
            .filter_map(|key| self.records.get(key).map(|r| (key.as_str(), r)))
    }

    /// Records whose key starts with `<class>.`.
    pub fn all_of<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a Record> + 'a {
        self.all()
            .filter(move |(key, _)| class_segment(key) == class)
            .map(|(_, record)| record)
    }

    pub fn get(&self, key: &str) -> Option<&Record> {
        self.records.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Record> {
        self.records.get_mut(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Record> {
        let removed = self.records.remove(key)?;
        self.order.retain(|k| k != key);
        Some(removed)
    }

    /// Number of keys whose class segment equals `class`. Unknown class
    /// names simply count zero.
    pub fn count_class(&self, class: &str) -> usize {
        self.order
            .iter()
            .filter(|key| class_segment(key) == class)
            .count()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

fn class_segment(key: &str) -> &str {
    key.split_once('.').map(|(class, _)| class).unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AttrValue, ClassName};

    #[test]
    fn register_makes_record_reachable_by_key() {
        let mut registry = Registry::new();
        let record = Record::new(ClassName::User);
        let key = format!("User.{}", record.id);
        registry.register(record.clone());

        assert_eq!(registry.get(&key), Some(&record));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn overwrite_keeps_position_and_replaces_value() {
        let mut registry = Registry::new();
        let first = Record::new(ClassName::State);
        let second = Record::new(ClassName::City);
        registry.register(first.clone());
        registry.register(second.clone());

        let mut changed = first.clone();
        changed.set("name", AttrValue::from("Texas"));
        registry.register(changed);

        let keys: Vec<&str> = registry.all().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![first.key(), second.key()]);
        assert_eq!(
            registry.get(&first.key()).and_then(|r| r.get("name")),
            Some(&AttrValue::from("Texas"))
        );
    }

    #[test]
    fn remove_drops_key_from_listing() {
        let mut registry = Registry::new();
        let record = Record::new(ClassName::Amenity);
        registry.register(record.clone());

        assert!(registry.remove(&record.key()).is_some());
        assert!(registry.is_empty());
        assert_eq!(registry.all().count(), 0);
        assert!(registry.remove(&record.key()).is_none());
    }

    #[test]
    fn count_and_filter_by_class_segment() {
        let mut registry = Registry::new();
        registry.register(Record::new(ClassName::User));
        registry.register(Record::new(ClassName::Place));
        registry.register(Record::new(ClassName::User));

        assert_eq!(registry.count_class("User"), 2);
        assert_eq!(registry.count_class("Place"), 1);
        assert_eq!(registry.count_class("Nope"), 0);
        assert!(registry.all_of("User").all(|r| r.class == ClassName::User));
    }
}
