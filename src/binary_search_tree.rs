use std::cmp::Ordering;
use std::fmt;

use crate::compare::{Comparator, NaturalOrder};
use crate::error::TreeError;
use crate::node::{self, BinaryNode, InOrder};
use crate::ordered::OrderedContainer;

type Link<T> = Option<Box<Node<T>>>;

#[derive(Debug)]
struct Node<T> {
    value: T,
    left: Link<T>,
    right: Link<T>,
}

impl<T> Node<T> {
    fn new(value: T) -> Self {
        Node {
            value,
            left: None,
            right: None,
        }
    }
}

impl<T> BinaryNode for Node<T> {
    type Value = T;

    fn value(&self) -> &T {
        &self.value
    }

    fn left(&self) -> Option<&Self> {
        self.left.as_deref()
    }

    fn right(&self) -> Option<&Self> {
        self.right.as_deref()
    }
}

/// Unbalanced binary search tree.
///
/// Elements are ordered by the comparator `C`; equivalent elements are
/// rejected on insert. `Clone` produces a structural copy with the same
/// shape.
///
/// Sorted input degenerates the tree into a path, so every walk, the
/// destructor and `Clone` run without recursion.
pub struct BinarySearchTree<T, C = NaturalOrder> {
    root: Link<T>,
    size: usize,
    cmp: C,
}

impl<T: Ord> BinarySearchTree<T> {
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<T, C: Comparator<T>> BinarySearchTree<T, C> {
    pub fn with_comparator(cmp: C) -> Self {
        BinarySearchTree {
            root: None,
            size: 0,
            cmp,
        }
    }

    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    pub fn insert(&mut self, value: T) -> bool {
        let inserted = Self::insert_node(&mut self.root, value, &self.cmp);
        if inserted {
            self.size += 1;
        }
        inserted
    }

    pub fn remove(&mut self, value: &T) -> bool {
        let removed = Self::remove_node(&mut self.root, value, &self.cmp);
        if removed {
            self.size -= 1;
        }
        removed
    }

    pub fn contains(&self, value: &T) -> bool {
        node::find(self.root.as_deref(), value, &self.cmp).is_some()
    }

    pub fn find(&self, value: &T) -> Result<&T, TreeError> {
        node::find(self.root.as_deref(), value, &self.cmp)
            .map(|n| &n.value)
            .ok_or(TreeError::NotFound)
    }

    pub fn find_min(&self) -> Result<&T, TreeError> {
        self.min().ok_or(TreeError::EmptyTree)
    }

    pub fn find_max(&self) -> Result<&T, TreeError> {
        self.max().ok_or(TreeError::EmptyTree)
    }

    pub fn min(&self) -> Option<&T> {
        self.root.as_deref().map(|n| &node::leftmost(n).value)
    }

    pub fn max(&self) -> Option<&T> {
        self.root.as_deref().map(|n| &node::rightmost(n).value)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn clear(&mut self) {
        dismantle(self.root.take());
        self.size = 0;
    }

    pub fn show_height(&self) -> i32 {
        node::height(self.root.as_deref())
    }

    pub fn traverse<F: FnMut(&T)>(&self, mut visit: F) {
        node::in_order(self.root.as_deref(), &mut |v| visit(v));
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: InOrder::new(self.root.as_deref(), self.size),
        }
    }

    pub fn in_order(&self) -> Vec<&T> {
        let mut result = Vec::with_capacity(self.size);
        node::in_order(self.root.as_deref(), &mut |v| result.push(v));
        result
    }

    pub fn pre_order(&self) -> Vec<&T> {
        let mut result = Vec::with_capacity(self.size);
        node::pre_order(self.root.as_deref(), &mut |v| result.push(v));
        result
    }

    pub fn post_order(&self) -> Vec<&T> {
        let mut result = Vec::with_capacity(self.size);
        node::post_order(self.root.as_deref(), &mut |v| result.push(v));
        result
    }

    fn insert_node(mut slot: &mut Link<T>, value: T, cmp: &C) -> bool {
        while let Some(n) = slot {
            slot = match cmp.compare(&value, &n.value) {
                Ordering::Less => &mut n.left,
                Ordering::Greater => &mut n.right,
                Ordering::Equal => return false,
            };
        }
        *slot = Some(Box::new(Node::new(value)));
        true
    }

    fn remove_node(mut slot: &mut Link<T>, value: &T, cmp: &C) -> bool {
        loop {
            let order = match slot.as_deref() {
                None => return false,
                Some(n) => cmp.compare(value, &n.value),
            };
            if order == Ordering::Equal {
                break;
            }
            let Some(n) = slot else {
                return false;
            };
            slot = if order == Ordering::Less { &mut n.left } else { &mut n.right };
        }

        let Some(n) = slot.as_mut() else {
            return false;
        };
        if n.left.is_some() && n.right.is_some() {
            if let Some(successor) = Self::remove_min(&mut n.right) {
                n.value = successor;
            }
        } else {
            let child = n.left.take().or_else(|| n.right.take());
            *slot = child;
        }
        true
    }

    /// Detaches the leftmost node of `slot` and returns its value.
    fn remove_min(mut slot: &mut Link<T>) -> Option<T> {
        while slot.as_deref().is_some_and(|n| n.left.is_some()) {
            let Some(n) = slot else {
                return None;
            };
            slot = &mut n.left;
        }
        let mut min = slot.take()?;
        *slot = min.right.take();
        Some(min.value)
    }
}

/// Frees a subtree one node at a time.
fn dismantle<T>(root: Link<T>) {
    let mut stack: Vec<Box<Node<T>>> = root.into_iter().collect();
    while let Some(mut n) = stack.pop() {
        stack.extend(n.left.take());
        stack.extend(n.right.take());
    }
}

impl<T, C> Drop for BinarySearchTree<T, C> {
    fn drop(&mut self) {
        dismantle(self.root.take());
    }
}

impl<T: Clone, C: Clone> Clone for BinarySearchTree<T, C> {
    fn clone(&self) -> Self {
        // children come out of the walk before their parent
        let mut built: Vec<Box<Node<T>>> = Vec::new();
        node::post_order_nodes(self.root.as_deref(), &mut |n: &Node<T>| {
            let right = if n.right.is_some() { built.pop() } else { None };
            let left = if n.left.is_some() { built.pop() } else { None };
            built.push(Box::new(Node {
                value: n.value.clone(),
                left,
                right,
            }));
        });
        BinarySearchTree {
            root: built.pop(),
            size: self.size,
            cmp: self.cmp.clone(),
        }
    }
}

impl<T: fmt::Debug, C: fmt::Debug> fmt::Debug for BinarySearchTree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut values = Vec::with_capacity(self.size);
        node::in_order(self.root.as_deref(), &mut |v| values.push(v));
        f.debug_struct("BinarySearchTree")
            .field("size", &self.size)
            .field("cmp", &self.cmp)
            .field("values", &values)
            .finish()
    }
}

impl<T, C: Comparator<T> + Default> Default for BinarySearchTree<T, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T, C: Comparator<T>> OrderedContainer<T> for BinarySearchTree<T, C> {
    fn insert(&mut self, value: T) -> bool {
        BinarySearchTree::insert(self, value)
    }

    fn remove(&mut self, value: &T) -> bool {
        BinarySearchTree::remove(self, value)
    }

    fn contains(&self, value: &T) -> bool {
        BinarySearchTree::contains(self, value)
    }

    fn find(&self, value: &T) -> Result<&T, TreeError> {
        BinarySearchTree::find(self, value)
    }

    fn find_min(&self) -> Result<&T, TreeError> {
        BinarySearchTree::find_min(self)
    }

    fn find_max(&self) -> Result<&T, TreeError> {
        BinarySearchTree::find_max(self)
    }

    fn traverse<F: FnMut(&T)>(&self, visit: F) {
        BinarySearchTree::traverse(self, visit)
    }

    fn size(&self) -> usize {
        self.size
    }

    fn clear(&mut self) {
        BinarySearchTree::clear(self)
    }

    fn show_height(&self) -> i32 {
        BinarySearchTree::show_height(self)
    }
}

/// Borrowing in-order iterator over a [`BinarySearchTree`].
pub struct Iter<'a, T> {
    inner: InOrder<'a, Node<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, T, C: Comparator<T>> IntoIterator for &'a BinarySearchTree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, C> IntoIterator for BinarySearchTree<T, C> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(mut self) -> Self::IntoIter {
        let mut values = Vec::with_capacity(self.size);
        let mut stack: Vec<Box<Node<T>>> = Vec::new();
        let mut current = self.root.take();
        loop {
            while let Some(mut n) = current {
                current = n.left.take();
                stack.push(n);
            }
            let Some(mut n) = stack.pop() else {
                break;
            };
            current = n.right.take();
            values.push(n.value);
        }
        values.into_iter()
    }
}

impl<T: Ord> FromIterator<T> for BinarySearchTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = BinarySearchTree::new();
        tree.extend(iter);
        tree
    }
}

impl<T, C: Comparator<T>> Extend<T> for BinarySearchTree<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}
