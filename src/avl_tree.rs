use std::cmp::Ordering;

use tracing::trace;

use crate::compare::{Comparator, NaturalOrder};
use crate::error::TreeError;
use crate::node::{self, BinaryNode, InOrder};
use crate::ordered::OrderedContainer;

type Link<T> = Option<Box<Node<T>>>;

#[derive(Debug, Clone)]
struct Node<T> {
    value: T,
    left: Link<T>,
    right: Link<T>,
    height: i32,
}

impl<T> Node<T> {
    fn new(value: T) -> Self {
        Node {
            value,
            left: None,
            right: None,
            height: 0,
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

/// Height-balanced binary search tree.
///
/// Every node caches the height of its subtree (a leaf has height 0, an
/// absent child -1). After each insert or remove the ancestors on the
/// modified path are rotated back into balance, so the heights of sibling
/// subtrees never differ by more than one.
///
/// `Clone` copies the cached heights along with the shape.
#[derive(Debug, Clone)]
pub struct AVLTree<T, C = NaturalOrder> {
    root: Link<T>,
    size: usize,
    cmp: C,
}

impl<T: Ord> AVLTree<T> {
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<T, C: Comparator<T>> AVLTree<T, C> {
    pub fn with_comparator(cmp: C) -> Self {
        AVLTree {
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
        self.root = None;
        self.size = 0;
    }

    /// Cached height of the root, `-1` for an empty tree.
    pub fn show_height(&self) -> i32 {
        Self::height_of(&self.root)
    }

    /// Checks the balance condition and that every cached height matches
    /// the height of its subtree.
    pub fn is_balanced(&self) -> bool {
        Self::check_balance(&self.root)
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

    fn height_of(node: &Link<T>) -> i32 {
        node.as_ref().map_or(-1, |n| n.height)
    }

    fn update_height(node: &mut Node<T>) {
        node.height = 1 + Self::height_of(&node.left).max(Self::height_of(&node.right));
    }

    /// Promotes the left child of `k2` into its slot.
    fn rotate_right(k2: &mut Box<Node<T>>) {
        let Some(mut k1) = k2.left.take() else {
            return;
        };
        k2.left = k1.right.take();
        Self::update_height(k2);
        std::mem::swap(k2, &mut k1);
        k2.right = Some(k1);
        Self::update_height(k2);
        trace!(height = k2.height, "avl: rotated right");
    }

    /// Promotes the right child of `k2` into its slot.
    fn rotate_left(k2: &mut Box<Node<T>>) {
        let Some(mut k1) = k2.right.take() else {
            return;
        };
        k2.right = k1.left.take();
        Self::update_height(k2);
        std::mem::swap(k2, &mut k1);
        k2.left = Some(k1);
        Self::update_height(k2);
        trace!(height = k2.height, "avl: rotated left");
    }

    fn double_rotate_right(k3: &mut Box<Node<T>>) {
        if let Some(left) = k3.left.as_mut() {
            Self::rotate_left(left);
        }
        Self::rotate_right(k3);
    }

    fn double_rotate_left(k3: &mut Box<Node<T>>) {
        if let Some(right) = k3.right.as_mut() {
            Self::rotate_right(right);
        }
        Self::rotate_left(k3);
    }

    /// Restores the balance condition at `node` once its children are
    /// balanced, then refreshes its cached height.
    ///
    /// The taller grandchild under the heavy child picks the rotation: the
    /// outer one (or a tie) takes a single rotation, the inner one a double.
    fn rebalance(node: &mut Box<Node<T>>) {
        let left = Self::height_of(&node.left);
        let right = Self::height_of(&node.right);

        if left - right == 2 {
            let inner_taller = node
                .left
                .as_deref()
                .is_some_and(|c| Self::height_of(&c.left) < Self::height_of(&c.right));
            if inner_taller {
                Self::double_rotate_right(node);
            } else {
                Self::rotate_right(node);
            }
        } else if right - left == 2 {
            let inner_taller = node
                .right
                .as_deref()
                .is_some_and(|c| Self::height_of(&c.right) < Self::height_of(&c.left));
            if inner_taller {
                Self::double_rotate_left(node);
            } else {
                Self::rotate_left(node);
            }
        }

        Self::update_height(node);
    }

    fn insert_node(slot: &mut Link<T>, value: T, cmp: &C) -> bool {
        let Some(n) = slot else {
            *slot = Some(Box::new(Node::new(value)));
            return true;
        };
        let inserted = match cmp.compare(&value, &n.value) {
            Ordering::Less => Self::insert_node(&mut n.left, value, cmp),
            Ordering::Greater => Self::insert_node(&mut n.right, value, cmp),
            Ordering::Equal => false,
        };
        if inserted {
            Self::rebalance(n);
        }
        inserted
    }

    fn remove_node(slot: &mut Link<T>, value: &T, cmp: &C) -> bool {
        let Some(n) = slot else {
            return false;
        };
        match cmp.compare(value, &n.value) {
            Ordering::Less => {
                if !Self::remove_node(&mut n.left, value, cmp) {
                    return false;
                }
            }
            Ordering::Greater => {
                if !Self::remove_node(&mut n.right, value, cmp) {
                    return false;
                }
            }
            Ordering::Equal => {
                if n.left.is_none() || n.right.is_none() {
                    // at most one child: it takes this node's place as is
                    let child = n.left.take().or_else(|| n.right.take());
                    *slot = child;
                    return true;
                }
                if let Some(successor) = Self::remove_min(&mut n.right) {
                    n.value = successor;
                }
            }
        }
        Self::rebalance(n);
        true
    }

    /// Detaches the leftmost node of `slot`, rebalancing on the way back up.
    fn remove_min(slot: &mut Link<T>) -> Option<T> {
        let n = slot.as_mut()?;
        if n.left.is_some() {
            let min = Self::remove_min(&mut n.left);
            Self::rebalance(n);
            return min;
        }
        let mut min = slot.take()?;
        *slot = min.right.take();
        Some(min.value)
    }

    fn check_balance(node: &Link<T>) -> bool {
        match node {
            None => true,
            Some(n) => {
                let left = Self::height_of(&n.left);
                let right = Self::height_of(&n.right);
                (left - right).abs() <= 1
                    && n.height == 1 + left.max(right)
                    && Self::check_balance(&n.left)
                    && Self::check_balance(&n.right)
            }
        }
    }
}

impl<T, C: Comparator<T> + Default> Default for AVLTree<T, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T, C: Comparator<T>> OrderedContainer<T> for AVLTree<T, C> {
    fn insert(&mut self, value: T) -> bool {
        AVLTree::insert(self, value)
    }

    fn remove(&mut self, value: &T) -> bool {
        AVLTree::remove(self, value)
    }

    fn contains(&self, value: &T) -> bool {
        AVLTree::contains(self, value)
    }

    fn find(&self, value: &T) -> Result<&T, TreeError> {
        AVLTree::find(self, value)
    }

    fn find_min(&self) -> Result<&T, TreeError> {
        AVLTree::find_min(self)
    }

    fn find_max(&self) -> Result<&T, TreeError> {
        AVLTree::find_max(self)
    }

    fn traverse<F: FnMut(&T)>(&self, visit: F) {
        AVLTree::traverse(self, visit)
    }

    fn size(&self) -> usize {
        self.size
    }

    fn clear(&mut self) {
        AVLTree::clear(self)
    }

    fn show_height(&self) -> i32 {
        AVLTree::show_height(self)
    }
}

/// Borrowing in-order iterator over an [`AVLTree`].
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

impl<'a, T, C: Comparator<T>> IntoIterator for &'a AVLTree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, C> IntoIterator for AVLTree<T, C> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        fn collect_in_order<T>(node: Link<T>, result: &mut Vec<T>) {
            if let Some(n) = node {
                collect_in_order(n.left, result);
                result.push(n.value);
                collect_in_order(n.right, result);
            }
        }
        let mut values = Vec::with_capacity(self.size);
        collect_in_order(self.root, &mut values);
        values.into_iter()
    }
}

impl<T: Ord> FromIterator<T> for AVLTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = AVLTree::new();
        tree.extend(iter);
        tree
    }
}

impl<T, C: Comparator<T>> Extend<T> for AVLTree<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}
