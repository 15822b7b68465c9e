use std::cmp::max;
use std::fmt;
use std::iter::FusedIterator;

use tracing::{debug, trace};

use crate::error::Error;
use crate::skipset::arena::{Link, NodeArena, NodeId};
use crate::skipset::config::SkipSetConfig;
use crate::skipset::cursor::Cursor;
use crate::skipset::skiplist::SkipList;
use crate::{ensure, Result};

pub const DEFAULT_MAX_LEVEL: usize = 20;

/// A set of unique, ordered values kept in a skip list.
///
/// Every forward link records its span (how many level-0 steps it covers),
/// which makes rank queries (`get`, `rank_of`) expected O(log n) as well.
#[derive(Clone)]
pub struct OrderedSkipSet<T, const MAX_LEVEL: usize = DEFAULT_MAX_LEVEL> {
    arena: NodeArena<T>,
    rng: fastrand::Rng,
    probability: f64,
    // number of levels in use, i.e. the height of the tallest node
    current_height: usize,
    current_size: usize,
}

/// Rightmost node before the search key at every level, and its rank
/// (head = 0, first element = 1).
struct SearchPath<const MAX_LEVEL: usize> {
    preds: [NodeId; MAX_LEVEL],
    ranks: [usize; MAX_LEVEL],
}

impl<T: Ord> OrderedSkipSet<T> {
    pub fn new() -> Self {
        Self::from_config(SkipSetConfig::default())
    }
}

impl<T: Ord> Default for OrderedSkipSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord, const MAX_LEVEL: usize> OrderedSkipSet<T, MAX_LEVEL> {
    pub fn with_config(config: SkipSetConfig) -> Result<Self> {
        config.validate(MAX_LEVEL)?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: SkipSetConfig) -> Self {
        debug!(
            max_level = MAX_LEVEL,
            probability = config.probability,
            seeded = config.seed.is_some(),
            "creating skip set"
        );
        Self {
            arena: NodeArena::new(MAX_LEVEL),
            rng: config.rng(),
            probability: config.probability,
            current_height: 0,
            current_size: 0,
        }
    }

    #[inline(always)]
    fn random_level(&mut self) -> usize {
        let mut level = 1;
        while level < MAX_LEVEL && self.rng.f64() < self.probability {
            level += 1
        }
        level
    }

    /// True if `id` holds an element strictly less than `value`.
    /// Sentinels never precede anything.
    #[inline(always)]
    fn precedes(&self, id: NodeId, value: &T) -> bool {
        matches!(self.arena.value(id), Some(v) if v < value)
    }

    fn search(&self, value: &T) -> SearchPath<MAX_LEVEL> {
        let mut path = SearchPath {
            preds: [NodeId::HEAD; MAX_LEVEL],
            ranks: [0; MAX_LEVEL],
        };
        let mut current = NodeId::HEAD;
        let mut traversed = 0;
        for level in (0..self.current_height).rev() {
            loop {
                let link = self.arena.link(current, level);
                if !self.precedes(link.next, value) {
                    break;
                }
                traversed += link.span;
                current = link.next;
            }
            path.preds[level] = current;
            path.ranks[level] = traversed;
        }
        path
    }

    /// Walks down to level 0 and returns the rank of the last node before
    /// `value` together with the node that follows it.
    fn find_greater_or_equal(&self, value: &T) -> (usize, NodeId) {
        let mut current = NodeId::HEAD;
        let mut traversed = 0;
        for level in (0..self.current_height).rev() {
            loop {
                let link = self.arena.link(current, level);
                if !self.precedes(link.next, value) {
                    break;
                }
                traversed += link.span;
                current = link.next;
            }
        }
        (traversed, self.arena.link(current, 0).next)
    }

    pub(crate) fn seek_node(&self, value: &T) -> NodeId {
        self.find_greater_or_equal(value).1
    }

    pub(crate) fn first_node(&self) -> NodeId {
        self.arena.link(NodeId::HEAD, 0).next
    }

    pub(crate) fn last_node(&self) -> NodeId {
        let mut current = NodeId::HEAD;
        for level in (0..self.current_height).rev() {
            loop {
                let next = self.arena.link(current, level).next;
                if next == NodeId::TAIL {
                    break;
                }
                current = next;
            }
        }
        if current == NodeId::HEAD {
            NodeId::TAIL
        } else {
            current
        }
    }

    pub(crate) fn arena(&self) -> &NodeArena<T> {
        &self.arena
    }

    /// Adds `value` to the set. Returns false if an equal value was already present,
    /// in which case the set is left untouched.
    pub fn insert(&mut self, value: T) -> bool {
        let path = self.search(&value);
        let next = self.arena.link(path.preds[0], 0).next;
        if self.arena.value(next) == Some(&value) {
            return false;
        }

        let height = self.random_level();
        // Levels coming into use start as a single head -> tail link.
        for level in self.current_height..height {
            self.arena.link_mut(NodeId::HEAD, level).span = self.current_size + 1;
        }

        let node = self.arena.alloc(value, height);
        let rank = path.ranks[0];
        for level in 0..height {
            let pred = path.preds[level];
            let before = rank - path.ranks[level];
            let old = self.arena.link(pred, level);
            *self.arena.link_mut(node, level) = Link {
                next: old.next,
                span: old.span - before,
            };
            *self.arena.link_mut(pred, level) = Link {
                next: node,
                span: before + 1,
            };
        }
        for level in height..self.current_height {
            self.arena.link_mut(path.preds[level], level).span += 1;
        }

        if height > self.current_height {
            trace!(from = self.current_height, to = height, "raising height");
        }
        self.current_height = max(self.current_height, height);
        self.current_size += 1;
        trace!(height, rank, size = self.current_size, "inserted");
        true
    }

    /// Removes `value` from the set. Returns false if it was not present.
    pub fn remove(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    /// Removes the element equal to `value` and returns it.
    pub fn take(&mut self, value: &T) -> Option<T> {
        let path = self.search(value);
        let target = self.arena.link(path.preds[0], 0).next;
        if self.arena.value(target) != Some(value) {
            return None;
        }
        self.unlink(&path.preds, target)
    }

    /// Removes and returns the smallest element.
    pub fn pop_first(&mut self) -> Option<T> {
        let target = self.first_node();
        if target == NodeId::TAIL {
            return None;
        }
        self.unlink(&[NodeId::HEAD; MAX_LEVEL], target)
    }

    /// Splices `target` out of every level. `preds[level]` must be the last
    /// node before `target` at each level in use.
    fn unlink(&mut self, preds: &[NodeId; MAX_LEVEL], target: NodeId) -> Option<T> {
        let height = self.arena.get(target).height();
        for level in 0..self.current_height {
            let pred = preds[level];
            if level < height {
                let removed = self.arena.link(target, level);
                let link = self.arena.link_mut(pred, level);
                debug_assert!(link.next == target);
                link.span += removed.span - 1;
                link.next = removed.next;
            } else {
                self.arena.link_mut(pred, level).span -= 1;
            }
        }

        while self.current_height > 0
            && self.arena.link(NodeId::HEAD, self.current_height - 1).next == NodeId::TAIL
        {
            self.current_height -= 1;
            trace!(to = self.current_height, "lowering height");
        }
        self.current_size -= 1;
        trace!(height, size = self.current_size, "removed");
        self.arena.free(target)
    }

    pub fn contains(&self, value: &T) -> bool {
        let (_, next) = self.find_greater_or_equal(value);
        self.arena.value(next) == Some(value)
    }

    /// 0-based rank of `value`, or `None` if it is not in the set.
    pub fn rank_of(&self, value: &T) -> Option<usize> {
        let (rank, next) = self.find_greater_or_equal(value);
        if self.arena.value(next) == Some(value) {
            Some(rank)
        } else {
            None
        }
    }

    /// Returns the element at 0-based ascending rank `index`.
    pub fn get(&self, index: usize) -> Result<&T> {
        let out_of_bounds = Error::IndexOutOfBounds {
            index,
            len: self.current_size,
        };
        ensure!(index < self.current_size, out_of_bounds);

        let target = index + 1;
        let mut current = NodeId::HEAD;
        let mut traversed = 0;
        for level in (0..self.current_height).rev() {
            loop {
                let link = self.arena.link(current, level);
                if link.next == NodeId::TAIL || traversed + link.span > target {
                    break;
                }
                traversed += link.span;
                current = link.next;
            }
            if traversed == target {
                break;
            }
        }
        self.arena.value(current).ok_or(out_of_bounds)
    }

    pub fn first(&self) -> Option<&T> {
        self.arena.value(self.first_node())
    }

    pub fn last(&self) -> Option<&T> {
        self.arena.value(self.last_node())
    }

    pub fn size(&self) -> usize {
        self.current_size
    }

    /// Same as `size`.
    pub fn length(&self) -> usize {
        self.current_size
    }

    pub fn len(&self) -> usize {
        self.current_size
    }

    pub fn is_empty(&self) -> bool {
        self.current_size == 0
    }

    /// Number of levels currently in use.
    pub fn height(&self) -> usize {
        self.current_height
    }

    pub fn clear(&mut self) {
        debug!(size = self.current_size, "clearing skip set");
        self.arena = NodeArena::new(MAX_LEVEL);
        self.current_height = 0;
        self.current_size = 0;
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            arena: &self.arena,
            next: self.first_node(),
            remaining: self.current_size,
        }
    }

    /// A cursor positioned at the smallest element.
    pub fn cursor(&self) -> Cursor<'_, T, MAX_LEVEL> {
        Cursor::new(self)
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        use std::collections::HashMap;

        let mut ranks = HashMap::new();
        ranks.insert(NodeId::HEAD, 0);
        let mut tallest = 0;
        let mut previous: Option<&T> = None;
        let mut current = self.first_node();
        let mut count = 0;
        while current != NodeId::TAIL {
            count += 1;
            ranks.insert(current, count);
            let value = self.arena.value(current).expect("element node without value");
            if let Some(previous) = previous {
                assert!(previous < value, "level 0 is not strictly increasing");
            }
            previous = Some(value);
            tallest = max(tallest, self.arena.get(current).height());
            current = self.arena.link(current, 0).next;
        }
        ranks.insert(NodeId::TAIL, count + 1);
        assert_eq!(count, self.current_size, "size does not match level 0");
        assert_eq!(tallest, self.current_height, "height is not the tallest node");

        for level in 0..self.current_height {
            let mut current = NodeId::HEAD;
            let mut members = 0;
            while current != NodeId::TAIL {
                let link = self.arena.link(current, level);
                assert_eq!(
                    link.span,
                    ranks[&link.next] - ranks[&current],
                    "bad span at level {level}"
                );
                if link.next != NodeId::TAIL {
                    assert!(self.arena.get(link.next).height() > level);
                    members += 1;
                }
                current = link.next;
            }
            let expected = ranks
                .keys()
                .filter(|&&id| id != NodeId::HEAD && id != NodeId::TAIL)
                .filter(|&&id| self.arena.get(id).height() > level)
                .count();
            assert_eq!(members, expected, "level {level} is missing nodes");
        }
    }
}

impl<T: Ord, const MAX_LEVEL: usize> SkipList<T> for OrderedSkipSet<T, MAX_LEVEL> {
    fn insert(&mut self, key: T) -> bool {
        OrderedSkipSet::insert(self, key)
    }

    fn remove(&mut self, key: &T) -> bool {
        OrderedSkipSet::remove(self, key)
    }

    fn contains(&self, key: &T) -> bool {
        OrderedSkipSet::contains(self, key)
    }

    fn size(&self) -> usize {
        self.current_size
    }

    fn get(&self, index: usize) -> Result<&T> {
        OrderedSkipSet::get(self, index)
    }
}

pub struct Iter<'a, T> {
    arena: &'a NodeArena<T>,
    next: NodeId,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next == NodeId::TAIL {
            return None;
        }
        let current = self.next;
        self.next = self.arena.link(current, 0).next;
        self.remaining -= 1;
        self.arena.value(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

pub struct IntoIter<T, const MAX_LEVEL: usize> {
    set: OrderedSkipSet<T, MAX_LEVEL>,
}

impl<T: Ord, const MAX_LEVEL: usize> Iterator for IntoIter<T, MAX_LEVEL> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.set.pop_first()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.set.len(), Some(self.set.len()))
    }
}

impl<T: Ord, const MAX_LEVEL: usize> ExactSizeIterator for IntoIter<T, MAX_LEVEL> {}

impl<T: Ord, const MAX_LEVEL: usize> IntoIterator for OrderedSkipSet<T, MAX_LEVEL> {
    type Item = T;
    type IntoIter = IntoIter<T, MAX_LEVEL>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { set: self }
    }
}

impl<'a, T: Ord, const MAX_LEVEL: usize> IntoIterator for &'a OrderedSkipSet<T, MAX_LEVEL> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Ord, const MAX_LEVEL: usize> Extend<T> for OrderedSkipSet<T, MAX_LEVEL> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Ord> FromIterator<T> for OrderedSkipSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T: Ord + fmt::Debug, const MAX_LEVEL: usize> fmt::Debug for OrderedSkipSet<T, MAX_LEVEL> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Draws every level in use, top level first.
impl<T: Ord + fmt::Display, const MAX_LEVEL: usize> fmt::Display for OrderedSkipSet<T, MAX_LEVEL> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for level in (0..self.current_height).rev() {
            write!(f, "L{level}: head")?;
            let mut next = self.arena.link(NodeId::HEAD, level).next;
            while let Some(value) = self.arena.value(next) {
                write!(f, " -> [ {value} ]")?;
                next = self.arena.link(next, level).next;
            }
            writeln!(f, " -> tail")?;
        }
        Ok(())
    }
}
