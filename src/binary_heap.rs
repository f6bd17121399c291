use std::cmp::Ordering;

use crate::compare::{Comparator, NaturalOrder};

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    seq: u64,
}

/// Array-backed min-heap ordered by a comparator.
///
/// Elements that compare equal leave the heap in the order they entered it.
#[derive(Debug, Clone)]
pub struct BinaryHeap<T, C = NaturalOrder> {
    data: Vec<Entry<T>>,
    next_seq: u64,
    cmp: C,
}

impl<T: Ord> BinaryHeap<T> {
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }

    pub fn from_vec(vec: Vec<T>) -> Self {
        Self::from_vec_with_comparator(vec, NaturalOrder)
    }
}

impl<T, C: Comparator<T>> BinaryHeap<T, C> {
    pub fn with_comparator(cmp: C) -> Self {
        BinaryHeap {
            data: Vec::new(),
            next_seq: 0,
            cmp,
        }
    }

    pub fn from_vec_with_comparator(vec: Vec<T>, cmp: C) -> Self {
        let data: Vec<Entry<T>> = vec
            .into_iter()
            .zip(0u64..)
            .map(|(value, seq)| Entry { value, seq })
            .collect();
        let next_seq = data.len() as u64;
        let mut heap = BinaryHeap { data, next_seq, cmp };
        heap.heapify();
        heap
    }

    pub fn push(&mut self, value: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.data.push(Entry { value, seq });
        self.sift_up(self.data.len() - 1);
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.data.is_empty() {
            return None;
        }
        let last_idx = self.data.len() - 1;
        self.data.swap(0, last_idx);
        let min = self.data.pop();
        if !self.data.is_empty() {
            self.sift_down(0);
        }
        min.map(|e| e.value)
    }

    pub fn peek(&self) -> Option<&T> {
        self.data.first().map(|e| &e.value)
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.next_seq = 0;
    }

    fn less(&self, a: usize, b: usize) -> bool {
        let (x, y) = (&self.data[a], &self.data[b]);
        match self.cmp.compare(&x.value, &y.value) {
            Ordering::Equal => x.seq < y.seq,
            order => order == Ordering::Less,
        }
    }

    fn heapify(&mut self) {
        if self.data.len() <= 1 {
            return;
        }
        let last_parent = (self.data.len() - 2) / 2;
        for i in (0..=last_parent).rev() {
            self.sift_down(i);
        }
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if self.less(idx, parent) {
                self.data.swap(idx, parent);
                idx = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        loop {
            let left = 2 * idx + 1;
            let right = 2 * idx + 2;
            let mut smallest = idx;

            if left < self.data.len() && self.less(left, smallest) {
                smallest = left;
            }
            if right < self.data.len() && self.less(right, smallest) {
                smallest = right;
            }

            if smallest != idx {
                self.data.swap(idx, smallest);
                idx = smallest;
            } else {
                break;
            }
        }
    }
}

impl<T, C: Comparator<T> + Default> Default for BinaryHeap<T, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T: Ord> FromIterator<T> for BinaryHeap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let vec: Vec<T> = iter.into_iter().collect();
        BinaryHeap::from_vec(vec)
    }
}

impl<T, C: Comparator<T>> Extend<T> for BinaryHeap<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_valid_heap<T, C: Comparator<T>>(heap: &BinaryHeap<T, C>) -> bool {
        (1..heap.data.len()).all(|i| !heap.less(i, (i - 1) / 2))
    }

    fn drain<T, C: Comparator<T>>(heap: &mut BinaryHeap<T, C>) -> Vec<T> {
        let mut out = Vec::new();
        while let Some(v) = heap.pop() {
            out.push(v);
        }
        out
    }

    #[test]
    fn new_heap_is_empty() {
        let mut heap: BinaryHeap<i32> = BinaryHeap::new();
        assert_eq!(heap.size(), 0);
        assert!(heap.peek().is_none());
        assert!(heap.pop().is_none());
    }

    #[test]
    fn push_keeps_minimum_on_top() {
        let mut heap = BinaryHeap::new();
        for v in [5, 3, 8, 1, 9, 2, 7, 4, 6] {
            heap.push(v);
            assert!(is_valid_heap(&heap));
        }
        assert_eq!(heap.peek(), Some(&1));
    }

    #[test]
    fn pop_all_yields_sorted_order() {
        let mut heap: BinaryHeap<i32> = [5, 3, 8, 1, 9, 2, 7, 4, 6].into_iter().collect();
        assert_eq!(drain(&mut heap), vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn from_vec_builds_heap() {
        let heap = BinaryHeap::from_vec(vec![100, 50, 200, 25, 75]);
        assert!(is_valid_heap(&heap));
        assert_eq!(heap.peek(), Some(&25));
    }

    #[test]
    fn equal_keys_pop_in_insertion_order() {
        let by_cost = |a: &(u32, char), b: &(u32, char)| a.0.cmp(&b.0);
        let mut heap = BinaryHeap::with_comparator(by_cost);
        for item in [(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd'), (2, 'e'), (1, 'f')] {
            heap.push(item);
        }
        let order: Vec<char> = drain(&mut heap).into_iter().map(|(_, c)| c).collect();
        assert_eq!(order, vec!['b', 'd', 'f', 'a', 'c', 'e']);
    }

    #[test]
    fn heapify_breaks_ties_by_position() {
        let by_cost = |a: &(u32, char), b: &(u32, char)| a.0.cmp(&b.0);
        let mut heap = BinaryHeap::from_vec_with_comparator(vec![(3, 'x'), (1, 'a'), (1, 'b'), (1, 'c')], by_cost);
        let order: Vec<char> = drain(&mut heap).into_iter().map(|(_, c)| c).collect();
        assert_eq!(order, vec!['a', 'b', 'c', 'x']);
    }

    #[test]
    fn clear_makes_heap_empty() {
        let mut heap = BinaryHeap::new();
        heap.extend([1, 2, 3]);
        heap.clear();
        assert!(heap.is_empty());
        heap.push(7);
        assert_eq!(heap.pop(), Some(7));
    }

    #[test]
    fn heap_property_after_operations() {
        let mut heap = BinaryHeap::new();
        for i in [5, 3, 8, 1, 9, 2, 7, 4, 6] {
            heap.push(i);
        }
        for _ in 0..5 {
            heap.pop();
            assert!(is_valid_heap(&heap));
        }
        assert_eq!(heap.size(), 4);
    }
}
