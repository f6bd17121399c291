//! Threaded binary search tree.
//!
//! Nodes live in an arena and refer to each other by index. A child slot
//! is either a real child or a thread to the in-order neighbour on that
//! side, which lets traversal step to the successor or predecessor without
//! a stack or recursion.

use std::cmp::Ordering;

use tracing::trace;

use crate::compare::{Comparator, NaturalOrder};
use crate::error::TreeError;
use crate::ordered::OrderedContainer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Link {
    Child(usize),
    /// In-order neighbour, `None` past either end of the tree.
    Thread(Option<usize>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone)]
struct Node<T> {
    value: T,
    left: Link,
    right: Link,
}

/// Stable handle to an element of a [`ThreadedSearchTree`].
///
/// A handle stays valid until its own element is removed. Removing any
/// other element never moves values between nodes. A freed slot may later
/// be reused by another insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub struct ThreadedSearchTree<T, C = NaturalOrder> {
    nodes: Vec<Option<Node<T>>>,
    free: Vec<usize>,
    root: Option<usize>,
    size: usize,
    cmp: C,
}

impl<T: Ord> ThreadedSearchTree<T> {
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<T, C: Comparator<T>> ThreadedSearchTree<T, C> {
    pub fn with_comparator(cmp: C) -> Self {
        ThreadedSearchTree {
            nodes: Vec::new(),
            free: Vec::new(),
            root: None,
            size: 0,
            cmp,
        }
    }

    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.root = None;
        self.size = 0;
    }

    /// Inserts `value` without recursion. The new node takes over the
    /// thread it replaces on its outward side and threads back to its
    /// parent on the inward side.
    pub fn insert(&mut self, value: T) -> bool {
        let Some(mut parent) = self.root else {
            let id = self.alloc(Node {
                value,
                left: Link::Thread(None),
                right: Link::Thread(None),
            });
            self.root = Some(id);
            self.size += 1;
            return true;
        };

        loop {
            let Some(p) = self.node(parent) else {
                return false;
            };
            let (left, right) = (p.left, p.right);
            match self.cmp.compare(&value, &p.value) {
                Ordering::Less => match left {
                    Link::Child(l) => parent = l,
                    Link::Thread(pred) => {
                        let id = self.alloc(Node {
                            value,
                            left: Link::Thread(pred),
                            right: Link::Thread(Some(parent)),
                        });
                        if let Some(p) = self.node_mut(parent) {
                            p.left = Link::Child(id);
                        }
                        break;
                    }
                },
                Ordering::Greater => match right {
                    Link::Child(r) => parent = r,
                    Link::Thread(succ) => {
                        let id = self.alloc(Node {
                            value,
                            left: Link::Thread(Some(parent)),
                            right: Link::Thread(succ),
                        });
                        if let Some(p) = self.node_mut(parent) {
                            p.right = Link::Child(id);
                        }
                        break;
                    }
                },
                Ordering::Equal => return false,
            }
        }

        self.size += 1;
        true
    }

    pub fn remove(&mut self, value: &T) -> bool {
        let Some((target, parent)) = self.locate(value) else {
            return false;
        };
        let Some(node) = self.node(target) else {
            return false;
        };

        match (node.left, node.right) {
            (Link::Child(_), Link::Child(right)) => {
                // successor splice: the leftmost node of the right subtree
                // is detached and relinked into the target's position
                let (successor, successor_parent) = self.leftmost_with_parent(right, (target, Side::Right));
                self.detach(successor, Some(successor_parent));
                self.transplant(target, parent, successor);
                self.release(target);
            }
            _ => self.unlink(target, parent),
        }

        self.size -= 1;
        true
    }

    pub fn contains(&self, value: &T) -> bool {
        self.locate(value).is_some()
    }

    pub fn find(&self, value: &T) -> Result<&T, TreeError> {
        self.locate(value)
            .and_then(|(id, _)| self.node(id))
            .map(|n| &n.value)
            .ok_or(TreeError::NotFound)
    }

    pub fn find_min(&self) -> Result<&T, TreeError> {
        self.first().and_then(|id| self.get(id)).ok_or(TreeError::EmptyTree)
    }

    pub fn find_max(&self) -> Result<&T, TreeError> {
        self.last().and_then(|id| self.get(id)).ok_or(TreeError::EmptyTree)
    }

    pub fn first(&self) -> Option<NodeId> {
        self.root.map(|r| NodeId(self.leftmost(r)))
    }

    pub fn last(&self) -> Option<NodeId> {
        self.root.map(|r| NodeId(self.rightmost(r)))
    }

    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.node(id.0).map(|n| &n.value)
    }

    /// In-order successor of `id`, reached through a thread or by one
    /// descent down the left spine of the right subtree.
    pub fn successor(&self, id: NodeId) -> Option<NodeId> {
        self.successor_of(id.0).map(NodeId)
    }

    pub fn predecessor(&self, id: NodeId) -> Option<NodeId> {
        self.predecessor_of(id.0).map(NodeId)
    }

    pub fn traverse<F: FnMut(&T)>(&self, mut visit: F) {
        let mut current = self.root.map(|r| self.leftmost(r));
        while let Some(i) = current {
            let Some(n) = self.node(i) else {
                return;
            };
            visit(&n.value);
            current = self.successor_of(i);
        }
    }

    pub fn iter(&self) -> Iter<'_, T, C> {
        Iter {
            tree: self,
            front: self.first().map(|id| id.0),
            back: self.last().map(|id| id.0),
            remaining: self.size,
        }
    }

    pub fn in_order(&self) -> Vec<&T> {
        self.iter().collect()
    }

    /// Values in root-left-right order, following real children only.
    pub fn pre_order(&self) -> Vec<&T> {
        let mut result = Vec::with_capacity(self.size);
        let mut stack: Vec<usize> = self.root.into_iter().collect();
        while let Some(i) = stack.pop() {
            let Some(n) = self.node(i) else {
                continue;
            };
            result.push(&n.value);
            if let Link::Child(r) = n.right {
                stack.push(r);
            }
            if let Link::Child(l) = n.left {
                stack.push(l);
            }
        }
        result
    }

    pub fn show_height(&self) -> i32 {
        self.root.map_or(-1, |r| self.height_of(r))
    }

    fn height_of(&self, i: usize) -> i32 {
        let mut deepest = -1;
        let mut stack = vec![(i, 0)];
        while let Some((j, depth)) = stack.pop() {
            let Some(n) = self.node(j) else {
                continue;
            };
            deepest = deepest.max(depth);
            for link in [n.left, n.right] {
                if let Link::Child(c) = link {
                    stack.push((c, depth + 1));
                }
            }
        }
        deepest
    }

    fn node(&self, i: usize) -> Option<&Node<T>> {
        self.nodes.get(i).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, i: usize) -> Option<&mut Node<T>> {
        self.nodes.get_mut(i).and_then(Option::as_mut)
    }

    fn alloc(&mut self, node: Node<T>) -> usize {
        match self.free.pop() {
            Some(i) => {
                self.nodes[i] = Some(node);
                i
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        }
    }

    fn release(&mut self, i: usize) {
        if let Some(slot) = self.nodes.get_mut(i) {
            *slot = None;
            self.free.push(i);
        }
    }

    /// Finds the node holding `value` and the link it hangs from.
    fn locate(&self, value: &T) -> Option<(usize, Option<(usize, Side)>)> {
        let mut current = self.root?;
        let mut parent = None;
        loop {
            let n = self.node(current)?;
            let (next, side) = match self.cmp.compare(value, &n.value) {
                Ordering::Less => (n.left, Side::Left),
                Ordering::Greater => (n.right, Side::Right),
                Ordering::Equal => return Some((current, parent)),
            };
            match next {
                Link::Child(c) => {
                    parent = Some((current, side));
                    current = c;
                }
                Link::Thread(_) => return None,
            }
        }
    }

    fn leftmost(&self, mut i: usize) -> usize {
        while let Some(Link::Child(l)) = self.node(i).map(|n| n.left) {
            i = l;
        }
        i
    }

    fn rightmost(&self, mut i: usize) -> usize {
        while let Some(Link::Child(r)) = self.node(i).map(|n| n.right) {
            i = r;
        }
        i
    }

    fn leftmost_with_parent(&self, start: usize, start_parent: (usize, Side)) -> (usize, (usize, Side)) {
        let mut current = start;
        let mut parent = start_parent;
        while let Some(Link::Child(l)) = self.node(current).map(|n| n.left) {
            parent = (current, Side::Left);
            current = l;
        }
        (current, parent)
    }

    fn successor_of(&self, i: usize) -> Option<usize> {
        match self.node(i)?.right {
            Link::Thread(next) => next,
            Link::Child(r) => Some(self.leftmost(r)),
        }
    }

    fn predecessor_of(&self, i: usize) -> Option<usize> {
        match self.node(i)?.left {
            Link::Thread(prev) => prev,
            Link::Child(l) => Some(self.rightmost(l)),
        }
    }

    /// Physically removes node `d`, which has at most one real child.
    fn unlink(&mut self, d: usize, parent: Option<(usize, Side)>) {
        self.detach(d, parent);
        self.release(d);
        if self.root.is_none() {
            self.nodes.clear();
            self.free.clear();
        }
    }

    /// Takes node `d`, which has at most one real child, out of the tree
    /// while keeping its slot allocated.
    fn detach(&mut self, d: usize, parent: Option<(usize, Side)>) {
        let Some(node) = self.node(d) else {
            return;
        };
        let (left, right) = (node.left, node.right);
        let pred = self.predecessor_of(d);
        let succ = self.successor_of(d);

        // only the extreme descendants of d's subtrees can thread up to d
        if let Link::Child(l) = left {
            let last = self.rightmost(l);
            if let Some(n) = self.node_mut(last) {
                n.right = Link::Thread(succ);
            }
            trace!(node = last, "threaded: redirected successor thread");
        }
        if let Link::Child(r) = right {
            let first = self.leftmost(r);
            if let Some(n) = self.node_mut(first) {
                n.left = Link::Thread(pred);
            }
            trace!(node = first, "threaded: redirected predecessor thread");
        }

        let replacement = match (left, right) {
            (Link::Child(c), _) | (_, Link::Child(c)) => Link::Child(c),
            _ => match parent {
                Some((_, Side::Left)) => Link::Thread(pred),
                _ => Link::Thread(succ),
            },
        };

        self.set_link(parent, replacement);
    }

    /// Puts the detached node `new` where `old` hangs, taking over its links
    /// and every thread that pointed at `old`.
    fn transplant(&mut self, old: usize, parent: Option<(usize, Side)>, new: usize) {
        let Some(node) = self.node(old) else {
            return;
        };
        let (left, right) = (node.left, node.right);
        if let Some(n) = self.node_mut(new) {
            n.left = left;
            n.right = right;
        }

        if let Link::Child(l) = left {
            let last = self.rightmost(l);
            if let Some(n) = self.node_mut(last) {
                n.right = Link::Thread(Some(new));
            }
        }
        if let Link::Child(r) = right {
            let first = self.leftmost(r);
            if let Some(n) = self.node_mut(first) {
                n.left = Link::Thread(Some(new));
            }
        }
        trace!(from = old, to = new, "threaded: transplanted node");

        self.set_link(parent, Link::Child(new));
    }

    fn set_link(&mut self, parent: Option<(usize, Side)>, link: Link) {
        match parent {
            None => {
                self.root = match link {
                    Link::Child(c) => Some(c),
                    Link::Thread(_) => None,
                };
            }
            Some((p, side)) => {
                if let Some(pn) = self.node_mut(p) {
                    match side {
                        Side::Left => pn.left = link,
                        Side::Right => pn.right = link,
                    }
                }
            }
        }
    }
}

impl<T, C: Comparator<T> + Default> Default for ThreadedSearchTree<T, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T, C: Comparator<T>> OrderedContainer<T> for ThreadedSearchTree<T, C> {
    fn insert(&mut self, value: T) -> bool {
        ThreadedSearchTree::insert(self, value)
    }

    fn remove(&mut self, value: &T) -> bool {
        ThreadedSearchTree::remove(self, value)
    }

    fn contains(&self, value: &T) -> bool {
        ThreadedSearchTree::contains(self, value)
    }

    fn find(&self, value: &T) -> Result<&T, TreeError> {
        ThreadedSearchTree::find(self, value)
    }

    fn find_min(&self) -> Result<&T, TreeError> {
        ThreadedSearchTree::find_min(self)
    }

    fn find_max(&self) -> Result<&T, TreeError> {
        ThreadedSearchTree::find_max(self)
    }

    fn traverse<F: FnMut(&T)>(&self, visit: F) {
        ThreadedSearchTree::traverse(self, visit)
    }

    fn size(&self) -> usize {
        self.size
    }

    fn clear(&mut self) {
        ThreadedSearchTree::clear(self)
    }

    fn show_height(&self) -> i32 {
        ThreadedSearchTree::show_height(self)
    }
}

/// Double-ended in-order iterator that steps along threads.
pub struct Iter<'a, T, C> {
    tree: &'a ThreadedSearchTree<T, C>,
    front: Option<usize>,
    back: Option<usize>,
    remaining: usize,
}

impl<'a, T, C: Comparator<T>> Iterator for Iter<'a, T, C> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let i = self.front?;
        self.front = self.tree.successor_of(i);
        self.remaining -= 1;
        self.tree.node(i).map(|n| &n.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, C: Comparator<T>> DoubleEndedIterator for Iter<'_, T, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let i = self.back?;
        self.back = self.tree.predecessor_of(i);
        self.remaining -= 1;
        self.tree.node(i).map(|n| &n.value)
    }
}

impl<T, C: Comparator<T>> ExactSizeIterator for Iter<'_, T, C> {}

impl<'a, T, C: Comparator<T>> IntoIterator for &'a ThreadedSearchTree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Ord> FromIterator<T> for ThreadedSearchTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = ThreadedSearchTree::new();
        tree.extend(iter);
        tree
    }
}

impl<T, C: Comparator<T>> Extend<T> for ThreadedSearchTree<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}
