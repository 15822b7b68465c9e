//! Index-addressed node storage for the skip set.
//!
//! Forward links are `NodeId`s resolved through the arena rather than
//! pointers, so the set owns every node through a single `Vec`. Slots of
//! removed nodes go on a free list and are handed out again by `alloc`.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

impl NodeId {
    pub(crate) const HEAD: NodeId = NodeId(0);
    pub(crate) const TAIL: NodeId = NodeId(1);
}

/// A forward link at one level.
///
/// `span` is the number of level-0 steps the link covers: the count of
/// element nodes strictly between the two ends, plus one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Link {
    pub(crate) next: NodeId,
    pub(crate) span: usize,
}

#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    /// `None` only for the head and tail sentinels and for freed slots.
    pub(crate) value: Option<T>,
    pub(crate) links: Vec<Link>,
}

impl<T> Node<T> {
    fn new(value: T, height: usize) -> Self {
        Self {
            value: Some(value),
            links: vec![
                Link {
                    next: NodeId::TAIL,
                    span: 0
                };
                height
            ],
        }
    }

    fn sentinel(height: usize) -> Self {
        Self {
            value: None,
            links: vec![
                Link {
                    next: NodeId::TAIL,
                    span: 1
                };
                height
            ],
        }
    }

    #[inline(always)]
    pub(crate) fn height(&self) -> usize {
        self.links.len()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct NodeArena<T> {
    nodes: Vec<Node<T>>,
    free_list: Vec<NodeId>,
}

impl<T> NodeArena<T> {
    /// Creates an arena holding only the head and tail sentinels, with every
    /// one of the head's `max_level` links pointing at the tail.
    pub(crate) fn new(max_level: usize) -> Self {
        Self {
            nodes: vec![Node::sentinel(max_level), Node::sentinel(0)],
            free_list: Vec::new(),
        }
    }

    pub(crate) fn alloc(&mut self, value: T, height: usize) -> NodeId {
        let node = Node::new(value, height);
        if let Some(id) = self.free_list.pop() {
            self.nodes[id.0] = node;
            id
        } else {
            let id = NodeId(self.nodes.len());
            self.nodes.push(node);
            id
        }
    }

    /// Releases the slot and hands back the value it held.
    pub(crate) fn free(&mut self, id: NodeId) -> Option<T> {
        debug_assert!(id != NodeId::HEAD && id != NodeId::TAIL);
        let node = &mut self.nodes[id.0];
        node.links = Vec::new();
        let value = node.value.take();
        self.free_list.push(id);
        value
    }

    #[inline(always)]
    pub(crate) fn get(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.0]
    }

    #[inline(always)]
    pub(crate) fn link(&self, id: NodeId, level: usize) -> Link {
        debug_assert!(level < self.get(id).height());
        self.nodes[id.0].links[level]
    }

    #[inline(always)]
    pub(crate) fn link_mut(&mut self, id: NodeId, level: usize) -> &mut Link {
        &mut self.nodes[id.0].links[level]
    }

    #[inline(always)]
    pub(crate) fn value(&self, id: NodeId) -> Option<&T> {
        self.nodes[id.0].value.as_ref()
    }

    /// Number of slots ever allocated, sentinels included.
    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_links_head_to_tail() {
        let arena: NodeArena<i32> = NodeArena::new(4);
        let head = arena.get(NodeId::HEAD);
        assert_eq!(head.height(), 4);
        assert!(head.value.is_none());
        for level in 0..4 {
            assert_eq!(arena.link(NodeId::HEAD, level).next, NodeId::TAIL);
        }
        assert_eq!(arena.get(NodeId::TAIL).height(), 0);
    }

    #[test]
    fn test_free_slot_is_reused() {
        let mut arena = NodeArena::new(4);
        let a = arena.alloc(10, 2);
        let b = arena.alloc(20, 1);
        assert_ne!(a, b);
        assert_eq!(arena.free(a), Some(10));
        assert_eq!(arena.value(a), None);

        let c = arena.alloc(30, 3);
        assert_eq!(c, a);
        assert_eq!(arena.value(c), Some(&30));
        assert_eq!(arena.get(c).height(), 3);
        assert_eq!(arena.capacity(), 4);
    }
}
