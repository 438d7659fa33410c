//! Value deduplication for a single encode or decode pass.
//!
//! Values are assigned small integer ids in first-seen order, starting at 0.
//! Entries are never removed. The encoder uses `intern` to decide between a
//! literal write and a back-reference; the decoder mirrors it with `push`,
//! appending every literal it reads so that ids line up with the encoder's.
//! Only `intern` maintains the value index; a decoding dictionary resolves
//! ids alone.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// Handle to a dictionary entry.
///
/// Ids are ordered by insertion, not by value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct EntryId(u32);

impl EntryId {
    /// Raw index for the wire.
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    /// Create an id from a raw index read off the wire.
    #[inline]
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }
}

/// Insertion-ordered value table.
#[derive(Debug, Clone)]
pub struct Dictionary<T> {
    /// Map from value to its first id.
    map: HashMap<T, EntryId>,
    /// Storage indexed by `EntryId`.
    entries: Vec<T>,
}

impl<T> Default for Dictionary<T> {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<T: Eq + Hash + Clone> Dictionary<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a value.
    ///
    /// Returns the id and whether the value was newly inserted. A `false`
    /// second element means the caller should emit a back-reference.
    pub fn intern<Q>(&mut self, value: &Q) -> (EntryId, bool)
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = T> + ?Sized,
    {
        if let Some(&id) = self.map.get(value) {
            return (id, false);
        }
        let id = self.push(value.to_owned());
        self.map.insert(value.to_owned(), id);
        (id, true)
    }

    /// Append a value at the next id without indexing it.
    pub fn push(&mut self, value: T) -> EntryId {
        let id = EntryId(self.entries.len() as u32);
        self.entries.push(value);
        id
    }

    /// Resolve an id, returning `None` if it was never assigned.
    #[inline]
    pub fn get(&self, id: EntryId) -> Option<&T> {
        self.entries.get(id.0 as usize)
    }

    /// Number of assigned ids.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
