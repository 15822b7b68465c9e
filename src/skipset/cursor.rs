use crate::error::Error;
use crate::skipset::arena::NodeId;
use crate::skipset::ordered_skipset::OrderedSkipSet;
use crate::skipset::skiplist::SkipListCursor;
use crate::{ensure, Result};

/// A positioned, forward-only view into an `OrderedSkipSet`.
///
/// Once the cursor moves past the last element it is exhausted: `key` and
/// `advance` fail with `Error::Exhausted` until it is repositioned by one of
/// the `seek` methods.
pub struct Cursor<'a, T, const MAX_LEVEL: usize> {
    set: &'a OrderedSkipSet<T, MAX_LEVEL>,
    node: NodeId,
}

impl<'a, T: Ord, const MAX_LEVEL: usize> Cursor<'a, T, MAX_LEVEL> {
    pub(crate) fn new(set: &'a OrderedSkipSet<T, MAX_LEVEL>) -> Self {
        Self {
            set,
            node: set.first_node(),
        }
    }
}

impl<'a, T: Ord, const MAX_LEVEL: usize> SkipListCursor<T> for Cursor<'a, T, MAX_LEVEL> {
    fn valid(&self) -> bool {
        self.node != NodeId::TAIL
    }

    fn key(&self) -> Result<&T> {
        self.set.arena().value(self.node).ok_or(Error::Exhausted)
    }

    fn advance(&mut self) -> Result<()> {
        ensure!(self.valid(), Error::Exhausted);
        self.node = self.set.arena().link(self.node, 0).next;
        Ok(())
    }

    fn seek(&mut self, target: &T) {
        self.node = self.set.seek_node(target);
    }

    fn seek_to_first(&mut self) {
        self.node = self.set.first_node();
    }

    fn seek_to_last(&mut self) {
        self.node = self.set.last_node();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skipset::config::SkipSetConfig;

    fn sample() -> OrderedSkipSet<i32> {
        let mut set = OrderedSkipSet::new();
        set.extend([10, 20, 30, 40]);
        set
    }

    #[test]
    fn test_walks_in_order_then_exhausts() {
        let set = sample();
        let mut cursor = set.cursor();
        let mut seen = Vec::new();
        while cursor.valid() {
            seen.push(*cursor.key().unwrap());
            cursor.advance().unwrap();
        }
        assert_eq!(seen, vec![10, 20, 30, 40]);
        assert_eq!(cursor.key(), Err(Error::Exhausted));
        assert_eq!(cursor.advance(), Err(Error::Exhausted));
    }

    #[test]
    fn test_empty_set_cursor_is_invalid() {
        let set: OrderedSkipSet<i32> = OrderedSkipSet::new();
        let mut cursor = set.cursor();
        assert!(!cursor.valid());
        cursor.seek_to_last();
        assert!(!cursor.valid());
        assert_eq!(cursor.advance(), Err(Error::Exhausted));
    }

    #[test]
    fn test_seek() {
        let set = sample();
        let mut cursor = set.cursor();

        cursor.seek(&20);
        assert_eq!(cursor.key(), Ok(&20));
        cursor.seek(&25);
        assert_eq!(cursor.key(), Ok(&30));
        cursor.seek(&i32::MIN);
        assert_eq!(cursor.key(), Ok(&10));
        cursor.seek(&41);
        assert!(!cursor.valid());
    }

    #[test]
    fn test_seek_to_first_and_last() {
        let set = sample();
        let mut cursor = set.cursor();
        cursor.seek_to_last();
        assert_eq!(cursor.key(), Ok(&40));
        cursor.advance().unwrap();
        assert!(!cursor.valid());

        cursor.seek_to_first();
        assert_eq!(cursor.key(), Ok(&10));
    }

    #[test]
    fn test_seek_on_tall_set() {
        let mut set: OrderedSkipSet<i32, 12> =
            OrderedSkipSet::with_config(SkipSetConfig::default().with_seed(77)).unwrap();
        set.extend((0..500).map(|i| i * 2));
        let mut cursor = set.cursor();
        for target in [1, 99, 500, 997] {
            cursor.seek(&target);
            assert_eq!(cursor.key(), Ok(&(target + 1)));
        }
        cursor.seek_to_last();
        assert_eq!(cursor.key(), Ok(&998));
    }
}
