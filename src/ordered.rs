use crate::error::TreeError;

/// Contract shared by every search tree in this crate.
///
/// Elements are unique under the container's comparator; inserting an
/// equivalent element is rejected. Lookups that cannot produce a value
/// report a [`TreeError`] instead of panicking.
pub trait OrderedContainer<T> {
    /// Inserts `value`. Returns `false` if an equivalent element is present.
    fn insert(&mut self, value: T) -> bool;

    /// Removes the element equivalent to `value`. Returns `false` if absent.
    fn remove(&mut self, value: &T) -> bool;

    fn contains(&self, value: &T) -> bool;

    /// Returns the stored element equivalent to `value`.
    fn find(&self, value: &T) -> Result<&T, TreeError>;

    fn find_min(&self) -> Result<&T, TreeError>;

    fn find_max(&self) -> Result<&T, TreeError>;

    /// Calls `visit` on every element in ascending order.
    fn traverse<F: FnMut(&T)>(&self, visit: F);

    fn size(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn clear(&mut self);

    /// Number of edges on the longest root-to-leaf path, `-1` when empty.
    fn show_height(&self) -> i32;
}
