//! Comparison strategies for the ordered containers.
//!
//! A tree is parameterized by a [`Comparator`] instead of relying on the
//! element's `Ord` alone, so the same record type can be ordered by
//! different fields in different containers.

use std::cmp::Ordering;

pub trait Comparator<T: ?Sized> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// Orders elements by their `Ord` implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<T: Ord + ?Sized> Comparator<T> for NaturalOrder {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Inverts another comparator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reversed<C>(pub C);

impl<T: ?Sized, C: Comparator<T>> Comparator<T> for Reversed<C> {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0.compare(b, a)
    }
}

impl<T: ?Sized, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// Builds a comparator that orders elements by a derived key.
pub fn by_key<T, K, F>(key: F) -> impl Fn(&T, &T) -> Ordering + Clone
where
    K: Ord,
    F: Fn(&T) -> K + Clone,
{
    move |a: &T, b: &T| key(a).cmp(&key(b))
}
