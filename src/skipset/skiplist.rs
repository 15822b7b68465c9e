use crate::Result;

pub trait SkipList<Key: Ord> {
    /// Inserts a key into the list.
    /// Returns false, leaving the list untouched, if an equal key is already present.
    fn insert(&mut self, key: Key) -> bool;

    /// Removes the entry that compares equal to `key`.
    /// Returns false if there was no such entry.
    fn remove(&mut self, key: &Key) -> bool;

    /// Returns true if an entry that compares equal to `key` is in the list.
    fn contains(&self, key: &Key) -> bool;

    /// Returns the number of entries in the list.
    fn size(&self) -> usize;

    /// Same as `size`.
    fn length(&self) -> usize {
        self.size()
    }

    /// Returns the entry at 0-based ascending rank `index`.
    fn get(&self, index: usize) -> Result<&Key>;
}

pub trait SkipListCursor<Key> {
    /// Returns true if the cursor is positioned at an entry.
    fn valid(&self) -> bool;

    /// Returns the key at the current position.
    /// Fails with `Error::Exhausted` if the cursor is not valid.
    fn key(&self) -> Result<&Key>;

    /// Advances to the next position.
    /// Fails with `Error::Exhausted` if the cursor is not valid.
    fn advance(&mut self) -> Result<()>;

    /// Advance to the first entry with a key >= target.
    fn seek(&mut self, target: &Key);

    /// Position at the first entry in list.
    /// Final state of cursor is valid iff list is not empty.
    fn seek_to_first(&mut self);

    /// Position at the last entry in list.
    /// Final state of cursor is valid iff list is not empty.
    fn seek_to_last(&mut self);
}
