//! Identity-keyed cache with weak keys.
//!
//! Normalized component options are cached per definition object, not per
//! name. The cache only holds [`Weak`] references to its keys, so an entry
//! never extends the life of the definition it describes. Entries whose key
//! has been dropped are pruned on the next insertion.

use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

/// Map from the identity of an `Rc<K>` to a shared value.
///
/// The address of a live `Rc` allocation is unique, and a stored [`Weak`]
/// keeps the allocation (not the value) reserved, so an address cannot be
/// reused by another key while its entry exists.
pub struct IdentityCache<K, V> {
    entries: HashMap<usize, (Weak<K>, Rc<V>)>,
}

impl<K, V> IdentityCache<K, V> {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    fn address(key: &Rc<K>) -> usize {
        Rc::as_ptr(key).cast::<()>() as usize
    }

    /// Returns the cached value for `key`, if its entry is still live.
    #[must_use]
    pub fn get(&self, key: &Rc<K>) -> Option<Rc<V>> {
        self.entries
            .get(&Self::address(key))
            .filter(|(weak, _)| weak.strong_count() > 0)
            .map(|(_, value)| Rc::clone(value))
    }

    /// Stores `value` for `key`, replacing any previous entry, and returns it.
    pub fn insert(&mut self, key: &Rc<K>, value: V) -> Rc<V> {
        self.prune();
        let value = Rc::new(value);
        self.entries
            .insert(Self::address(key), (Rc::downgrade(key), Rc::clone(&value)));
        value
    }

    /// Number of entries whose key is still alive.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .values()
            .filter(|(weak, _)| weak.strong_count() > 0)
            .count()
    }

    /// Returns `true` if no live entries remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops entries whose key has been reclaimed.
    pub fn prune(&mut self) {
        self.entries.retain(|_, (weak, _)| weak.strong_count() > 0);
    }
}

impl<K, V> Default for IdentityCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for IdentityCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityCache")
            .field("entries", &self.entries.len())
            .field("live", &self.len())
            .finish()
    }
}
