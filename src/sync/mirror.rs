use crate::models::{ConversationSummary, Notebook, NoteSummary, SourceFile};

/// Records that can live in a [`Mirror`], addressed by their stable
/// server-side identifier.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for SourceFile {
    fn key(&self) -> &str {
        &self.public_id
    }
}

impl Keyed for NoteSummary {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for ConversationSummary {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Notebook {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Local copy of a server collection, kept in mutation-recency order:
/// created and updated records move to the front, removed records are
/// filtered out by key. No other ordering is ever applied, so the
/// server's seed order is preserved for untouched records.
#[derive(Debug, Clone, Default)]
pub struct Mirror<T> {
    items: Vec<T>,
}

impl<T: Keyed> Mirror<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.items.iter().find(|item| item.key() == key)
    }

    pub fn prepend(&mut self, item: T) {
        self.items.insert(0, item);
    }

    /// Prepend a batch, keeping the batch's own order at the front.
    pub fn prepend_all(&mut self, items: Vec<T>) {
        self.items.splice(0..0, items);
    }

    /// Replace a record with a fresh copy and move it to the front.
    pub fn promote(&mut self, item: T) {
        self.items.retain(|existing| existing.key() != item.key());
        self.items.insert(0, item);
    }

    /// Edit a record in place without changing its position. Returns
    /// false when the key is unknown.
    pub fn patch(&mut self, key: &str, edit: impl FnOnce(&mut T)) -> bool {
        match self.items.iter_mut().find(|item| item.key() == key) {
            Some(item) => {
                edit(item);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.key() != key);
        self.items.len() != before
    }

    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        id: String,
        label: String,
    }

    impl Keyed for Entry {
        fn key(&self) -> &str {
            &self.id
        }
    }

    fn entry(id: &str, label: &str) -> Entry {
        Entry {
            id: id.to_string(),
            label: label.to_string(),
        }
    }

    fn keys(mirror: &Mirror<Entry>) -> Vec<&str> {
        mirror.items().iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn created_records_go_to_the_front() {
        let mut mirror = Mirror::new(vec![entry("a", "one"), entry("b", "two")]);
        mirror.prepend(entry("c", "three"));
        assert_eq!(keys(&mirror), ["c", "a", "b"]);
    }

    #[test]
    fn batch_prepend_keeps_batch_order() {
        let mut mirror = Mirror::new(vec![entry("a", "one")]);
        mirror.prepend_all(vec![entry("x", "x"), entry("y", "y")]);
        assert_eq!(keys(&mirror), ["x", "y", "a"]);
    }

    #[test]
    fn promoted_records_move_to_the_front_without_duplicating() {
        let mut mirror = Mirror::new(vec![entry("a", "one"), entry("b", "two"), entry("c", "3")]);
        mirror.promote(entry("b", "updated"));
        assert_eq!(keys(&mirror), ["b", "a", "c"]);
        assert_eq!(mirror.get("b").unwrap().label, "updated");
        assert_eq!(mirror.len(), 3);
    }

    #[test]
    fn patch_edits_in_place_and_preserves_order() {
        let mut mirror = Mirror::new(vec![entry("a", "one"), entry("b", "two")]);
        assert!(mirror.patch("b", |e| e.label = "patched".to_string()));
        assert_eq!(keys(&mirror), ["a", "b"]);
        assert_eq!(mirror.get("b").unwrap().label, "patched");
        assert!(!mirror.patch("zz", |e| e.label.clear()));
    }

    #[test]
    fn removal_filters_by_key() {
        let mut mirror = Mirror::new(vec![entry("a", "one"), entry("b", "two")]);
        assert!(mirror.remove("a"));
        assert_eq!(keys(&mirror), ["b"]);
        assert!(!mirror.remove("a"));
    }
}
