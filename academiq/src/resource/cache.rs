//! Client-side record cache.

use std::fmt::Debug;

/// A record with a stable identity
pub trait Resource: Clone {
    type Key: Copy + PartialEq + Debug;

    fn key(&self) -> Self::Key;
}

/// Records in server order, keyed by [`Resource::key`].
///
/// The cache never invents records: it only holds what the backend returned
/// or confirmed.
#[derive(Debug, Clone)]
pub struct ResourceCache<T> {
    items: Vec<T>,
}

impl<T> Default for ResourceCache<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Resource> ResourceCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection
    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
    }

    /// Replace the record with the same key, or append it
    pub fn upsert(&mut self, item: T) {
        match self.items.iter_mut().find(|i| i.key() == item.key()) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }

    pub fn remove(&mut self, key: T::Key) -> Option<T> {
        let index = self.items.iter().position(|i| i.key() == key)?;
        Some(self.items.remove(index))
    }

    pub fn get(&self, key: T::Key) -> Option<&T> {
        self.items.iter().find(|i| i.key() == key)
    }

    pub fn contains(&self, key: T::Key) -> bool {
        self.get(key).is_some()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn sort_by(&mut self, compare: impl FnMut(&T, &T) -> std::cmp::Ordering) {
        self.items.sort_by(compare);
    }
}
