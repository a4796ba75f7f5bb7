//! Ordered, validated collections.
//!
//! A collection is an insertion-ordered map from [`Key`] to item. Items are
//! checked when they are written, never when they are read: the item type
//! must implement [`CollectionItem`], and the collection kind's
//! [`CollectionKind::is_entity_valid`] must accept it.
//!
//! Iteration is cursor-based and the cursor lives in the collection itself,
//! so two interleaved walks over one instance interfere with each other.
//! [`Collection::iter`] borrows instead and has no such coupling.

use crate::container::DataContainer;
use crate::entity::{Entity, EntityClass};
use crate::fields::Fields;
use basis_types::{Error, Key, Result};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fmt;
use std::marker::PhantomData;
use tracing::trace;

/// Capability required of anything stored in a [`Collection`].
pub trait CollectionItem {
    fn to_array(&self) -> Result<Map<String, Value>>;
}

impl<T: EntityClass> CollectionItem for Entity<T> {
    fn to_array(&self) -> Result<Map<String, Value>> {
        Entity::to_array(self)
    }
}

impl<F: Fields> CollectionItem for DataContainer<F> {
    fn to_array(&self) -> Result<Map<String, Value>> {
        DataContainer::to_array(self)
    }
}

/// A concrete collection: its item type and the semantic gate for items.
pub trait CollectionKind {
    type Item: CollectionItem;

    /// Type name used in error messages.
    const NAME: &'static str;

    fn is_entity_valid(item: &Self::Item) -> bool;
}

pub struct Collection<K: CollectionKind> {
    items: IndexMap<Key, K::Item>,
    position: usize,
    /// Next append offset; `None` once `i64::MAX` has been used.
    next_index: Option<i64>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: CollectionKind> Default for Collection<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: CollectionKind> Collection<K> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: IndexMap::new(),
            position: 0,
            next_index: Some(0),
            _kind: PhantomData,
        }
    }

    // ── Cursor ───────────────────────────────────────────────────

    #[must_use]
    pub fn current(&self) -> Option<&K::Item> {
        self.items.get_index(self.position).map(|(_, item)| item)
    }

    #[must_use]
    pub fn current_key(&self) -> Option<&Key> {
        self.items.get_index(self.position).map(|(key, _)| key)
    }

    pub fn advance(&mut self) {
        if self.position < self.items.len() {
            self.position += 1;
        }
    }

    /// False once the cursor has run past the last item.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.position < self.items.len()
    }

    pub fn rewind(&mut self) {
        self.position = 0;
    }

    // ── Offsets ──────────────────────────────────────────────────

    #[must_use]
    pub fn has(&self, key: &Key) -> bool {
        self.items.contains_key(key)
    }

    #[must_use]
    pub fn get(&self, key: &Key) -> Option<&K::Item> {
        self.items.get(key)
    }

    pub fn get_mut(&mut self, key: &Key) -> Option<&mut K::Item> {
        self.items.get_mut(key)
    }

    /// Stores `item` at `key`, or appends it when no key is given.
    ///
    /// Rejected items leave the collection untouched.
    pub fn set(&mut self, key: Option<Key>, item: K::Item) -> Result<()> {
        if !K::is_entity_valid(&item) {
            return Err(Error::InvalidInput(format!(
                "item rejected by `{}::is_entity_valid()`",
                K::NAME
            )));
        }

        let key = match key {
            Some(key) => key,
            None => Key::int(self.next_index.ok_or_else(|| {
                Error::InvalidInput("cannot append: the next integer offset is out of range".into())
            })?),
        };
        if let Some(i) = key.as_int() {
            self.next_index = match (self.next_index, i.checked_add(1)) {
                (Some(next), Some(after)) => Some(next.max(after)),
                _ => None,
            };
        }

        trace!(collection = K::NAME, %key, "storing item");
        self.items.insert(key, item);
        Ok(())
    }

    /// Appends `item` at the next integer offset.
    pub fn push(&mut self, item: K::Item) -> Result<()> {
        self.set(None, item)
    }

    /// Removes the item at `key`; absent keys are ignored.
    pub fn unset(&mut self, key: &Key) -> Option<K::Item> {
        let (index, _, item) = self.items.shift_remove_full(key)?;
        if index < self.position {
            self.position -= 1;
        }
        Some(item)
    }

    /// Reads an offset given as a dynamic value.
    pub fn offset_get(&self, offset: &Value) -> Result<Option<&K::Item>> {
        let key = Key::from_value(offset)?;
        Ok(self.items.get(&key))
    }

    /// Writes at an offset given as a dynamic value; `null` appends.
    pub fn offset_set(&mut self, offset: &Value, item: K::Item) -> Result<()> {
        let key = match offset {
            Value::Null => None,
            other => Some(Key::from_value(other)?),
        };
        self.set(key, item)
    }

    pub fn offset_exists(&self, offset: &Value) -> Result<bool> {
        Ok(self.items.contains_key(&Key::from_value(offset)?))
    }

    pub fn offset_unset(&mut self, offset: &Value) -> Result<Option<K::Item>> {
        let key = Key::from_value(offset)?;
        Ok(self.unset(&key))
    }

    // ── Counting & snapshots ─────────────────────────────────────

    #[must_use]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.items.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &K::Item)> {
        self.items.iter()
    }

    /// Each item's own snapshot, keyed by its offset.
    pub fn to_array(&self) -> Result<Map<String, Value>> {
        let mut out = Map::new();
        for (key, item) in &self.items {
            out.insert(key.to_string(), Value::Object(item.to_array()?));
        }
        Ok(out)
    }
}

impl<'a, K: CollectionKind> IntoIterator for &'a Collection<K> {
    type Item = (&'a Key, &'a K::Item);
    type IntoIter = indexmap::map::Iter<'a, Key, K::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<K: CollectionKind> fmt::Debug for Collection<K>
where
    K::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("kind", &K::NAME)
            .field("items", &self.items)
            .field("position", &self.position)
            .finish()
    }
}
