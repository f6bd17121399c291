//! Read-only walks shared by the boxed-node trees.

use std::cmp::Ordering;

use crate::compare::Comparator;

pub(crate) trait BinaryNode: Sized {
    type Value;

    fn value(&self) -> &Self::Value;
    fn left(&self) -> Option<&Self>;
    fn right(&self) -> Option<&Self>;
}

pub(crate) fn find<'a, N, C>(root: Option<&'a N>, value: &N::Value, cmp: &C) -> Option<&'a N>
where
    N: BinaryNode,
    C: Comparator<N::Value>,
{
    let mut current = root;
    while let Some(n) = current {
        match cmp.compare(value, n.value()) {
            Ordering::Less => current = n.left(),
            Ordering::Greater => current = n.right(),
            Ordering::Equal => return Some(n),
        }
    }
    None
}

pub(crate) fn leftmost<N: BinaryNode>(node: &N) -> &N {
    let mut current = node;
    while let Some(left) = current.left() {
        current = left;
    }
    current
}

pub(crate) fn rightmost<N: BinaryNode>(node: &N) -> &N {
    let mut current = node;
    while let Some(right) = current.right() {
        current = right;
    }
    current
}

/// Height recomputed from scratch, `-1` for an absent node.
pub(crate) fn height<N: BinaryNode>(node: Option<&N>) -> i32 {
    let mut deepest = -1;
    let mut stack: Vec<(&N, i32)> = node.map(|n| (n, 0)).into_iter().collect();
    while let Some((n, depth)) = stack.pop() {
        deepest = deepest.max(depth);
        stack.extend(n.left().map(|c| (c, depth + 1)));
        stack.extend(n.right().map(|c| (c, depth + 1)));
    }
    deepest
}

pub(crate) fn in_order<'a, N: BinaryNode>(node: Option<&'a N>, visit: &mut impl FnMut(&'a N::Value)) {
    for value in InOrder::new(node, 0) {
        visit(value);
    }
}

pub(crate) fn pre_order<'a, N: BinaryNode>(node: Option<&'a N>, visit: &mut impl FnMut(&'a N::Value)) {
    let mut stack: Vec<&N> = node.into_iter().collect();
    while let Some(n) = stack.pop() {
        visit(n.value());
        stack.extend(n.right());
        stack.extend(n.left());
    }
}

pub(crate) fn post_order<'a, N: BinaryNode>(node: Option<&'a N>, visit: &mut impl FnMut(&'a N::Value)) {
    post_order_nodes(node, &mut |n: &'a N| visit(n.value()));
}

/// Visits whole nodes children first, without recursion.
pub(crate) fn post_order_nodes<'a, N: BinaryNode>(node: Option<&'a N>, visit: &mut impl FnMut(&'a N)) {
    let mut stack: Vec<&N> = node.into_iter().collect();
    let mut reversed = Vec::new();
    while let Some(n) = stack.pop() {
        reversed.push(n);
        stack.extend(n.left());
        stack.extend(n.right());
    }
    for n in reversed.into_iter().rev() {
        visit(n);
    }
}

/// Stack-driven in-order walk over borrowed nodes.
pub(crate) struct InOrder<'a, N> {
    stack: Vec<&'a N>,
    remaining: usize,
}

impl<'a, N: BinaryNode> InOrder<'a, N> {
    pub(crate) fn new(root: Option<&'a N>, len: usize) -> Self {
        let mut walk = InOrder {
            stack: Vec::new(),
            remaining: len,
        };
        walk.push_left_spine(root);
        walk
    }

    fn push_left_spine(&mut self, mut node: Option<&'a N>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left();
        }
    }
}

impl<'a, N: BinaryNode> Iterator for InOrder<'a, N> {
    type Item = &'a N::Value;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right());
        self.remaining = self.remaining.saturating_sub(1);
        Some(node.value())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
