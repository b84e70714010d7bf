//! Intrusive circular lists over slotmap arenas.
//!
//! The `next`/`previous` pointers of a ring live inside the elements
//! themselves (see [`Link`]); a [`Ring`] only remembers its first element and
//! its length. Every element is a member of at most one ring at a time, so
//! insertion and removal are O(1) and never touch the rest of the arena.

use slotmap::{Key, SlotMap};

/// Ring membership stored inside an element.
///
/// A detached element links to itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link<K> {
    pub(crate) next: K,
    pub(crate) previous: K,
}

impl<K: Key> Link<K> {
    pub fn detached(key: K) -> Self {
        Self {
            next: key,
            previous: key,
        }
    }

    pub fn next(&self) -> K {
        self.next
    }

    pub fn previous(&self) -> K {
        self.previous
    }
}

/// An arena element that can be threaded into a [`Ring`].
pub trait Linked<K: Key> {
    fn link(&self) -> &Link<K>;
    fn link_mut(&mut self) -> &mut Link<K>;
}

/// Handle to a circular list whose elements live in a `SlotMap<K, T>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ring<K> {
    head: Option<K>,
    len: usize,
}

impl<K> Default for Ring<K> {
    fn default() -> Self {
        Self { head: None, len: 0 }
    }
}

impl<K: Key> Ring<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn front(&self) -> Option<K> {
        self.head
    }

    pub fn back<T: Linked<K>>(&self, arena: &SlotMap<K, T>) -> Option<K> {
        self.head.map(|head| arena[head].link().previous)
    }

    /// Make `key`, which must already be a member, the first element.
    pub fn set_front(&mut self, key: K) {
        debug_assert!(self.head.is_some());
        self.head = Some(key);
    }

    /// Insert a detached element at the end of the ring.
    pub fn append<T: Linked<K>>(&mut self, arena: &mut SlotMap<K, T>, key: K) {
        match self.head {
            None => {
                *arena[key].link_mut() = Link::detached(key);
                self.head = Some(key);
            }
            Some(head) => {
                let last = arena[head].link().previous;
                splice(arena, last, key, head);
            }
        }
        self.len += 1;
    }

    /// Insert a detached element directly after `anchor`.
    pub fn insert_after<T: Linked<K>>(&mut self, arena: &mut SlotMap<K, T>, anchor: K, key: K) {
        debug_assert!(self.head.is_some());
        let next = arena[anchor].link().next;
        splice(arena, anchor, key, next);
        self.len += 1;
    }

    /// Unlink `key` from the ring. The element stays in the arena, detached.
    pub fn remove<T: Linked<K>>(&mut self, arena: &mut SlotMap<K, T>, key: K) {
        let Link { next, previous } = *arena[key].link();
        if next == key {
            self.head = None;
        } else {
            arena[previous].link_mut().next = next;
            arena[next].link_mut().previous = previous;
            if self.head == Some(key) {
                self.head = Some(next);
            }
        }
        *arena[key].link_mut() = Link::detached(key);
        self.len -= 1;
    }

    /// Forget all members without touching the arena.
    ///
    /// Used when the members have been removed from the arena or are about
    /// to be re-threaded with [`Ring::append`].
    pub fn clear(&mut self) {
        self.head = None;
        self.len = 0;
    }

    /// Reverse the traversal direction, keeping the first element.
    pub fn reverse<T: Linked<K>>(&mut self, arena: &mut SlotMap<K, T>) {
        for key in self.keys(arena) {
            let link = arena[key].link_mut();
            std::mem::swap(&mut link.next, &mut link.previous);
        }
    }

    pub fn contains<T: Linked<K>>(&self, arena: &SlotMap<K, T>, key: K) -> bool {
        self.iter(arena).any(|(k, _)| k == key)
    }

    /// Member keys in ring order, starting at the front.
    pub fn keys<T: Linked<K>>(&self, arena: &SlotMap<K, T>) -> Vec<K> {
        self.iter(arena).map(|(k, _)| k).collect()
    }

    pub fn iter<'a, T: Linked<K>>(&self, arena: &'a SlotMap<K, T>) -> RingIter<'a, K, T> {
        RingIter {
            arena,
            current: self.head,
            remaining: self.len,
        }
    }
}

fn splice<K: Key, T: Linked<K>>(arena: &mut SlotMap<K, T>, previous: K, key: K, next: K) {
    *arena[key].link_mut() = Link { next, previous };
    arena[previous].link_mut().next = key;
    arena[next].link_mut().previous = key;
}

/// Walks a ring once, front to back.
pub struct RingIter<'a, K: Key, T> {
    arena: &'a SlotMap<K, T>,
    current: Option<K>,
    remaining: usize,
}

impl<'a, K: Key, T: Linked<K>> Iterator for RingIter<'a, K, T> {
    type Item = (K, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let key = self.current?;
        let element = self.arena.get(key)?;
        self.current = Some(element.link().next);
        self.remaining -= 1;
        Some((key, element))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}
