//! # Growable array
//!
//! A small, contiguous, order-preserving store for auxiliary runtime state
//! that event emission needs to track (e.g. per-thread status snapshots —
//! the domain logic lives outside this core, only the storage lives here).
//!
//! The failure policy is deliberately asymmetric to the chunked buffer's:
//! failing to grow is **fatal** (diagnostic, then abort) because silently
//! losing in-flight emission state would corrupt every subsequent record,
//! whereas the buffer's overflow drops already-complete records as an
//! explicit availability trade-off.

use log::error;

/// Contiguous, reallocating store of elements, preserving insertion order.
///
/// Any reference obtained from the array is invalid across a `push` that
/// may reallocate; the borrow checker enforces this at compile time.
#[derive(Debug)]
pub struct GrowableArray<T> {
    items: Vec<T>,
}

impl<T> GrowableArray<T> {
    #[must_use]
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Append one element, growing the backing storage (at least doubling)
    /// when full.
    ///
    /// Allocation failure terminates the process with a diagnostic: tracing
    /// infrastructure is not allowed to continue in a corrupted state.
    pub fn push(&mut self, value: T) {
        if self.items.len() == self.items.capacity() {
            // Doubling keeps push amortized O(1).
            let additional = self.items.len().max(1);
            if let Err(err) = self.items.try_reserve(additional) {
                error!(
                    "eventlog: failed to grow array from {} to {} elements: {err}",
                    self.items.capacity(),
                    self.items.capacity() + additional,
                );
                std::process::abort();
            }
        }
        self.items.push(value);
    }

    /// Remove the element at `index`, shifting subsequent elements left to
    /// preserve relative order. Out-of-range indices are a silent no-op.
    pub fn remove_at(&mut self, index: usize) {
        if index >= self.items.len() {
            return;
        }
        if index == self.items.len() - 1 {
            self.items.pop();
        } else {
            self.items.remove(index);
        }
    }

    /// Bounds-checked read; `None` when out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Bounds-checked mutable read; `None` when out of range.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// Best-effort release of excess capacity. Failure to shrink is
    /// non-fatal; the larger capacity is simply retained.
    pub fn shrink_to_fit(&mut self) {
        self.items.shrink_to_fit();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> Default for GrowableArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a GrowableArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_grows_and_preserves_order() {
        // Starting capacity 2, three 4-byte elements: one reallocation to
        // capacity >= 3, reads come back in insertion order.
        let mut arr: GrowableArray<[u8; 4]> = GrowableArray::with_capacity(2);
        arr.push(*b"E0__");
        arr.push(*b"E1__");
        arr.push(*b"E2__");

        assert!(arr.capacity() >= 3);
        assert_eq!(arr.len(), 3);
        assert_eq!(arr.get(0), Some(&*b"E0__"));
        assert_eq!(arr.get(1), Some(&*b"E1__"));
        assert_eq!(arr.get(2), Some(&*b"E2__"));
    }

    #[test]
    fn test_remove_middle_shifts_left() {
        let mut arr: GrowableArray<[u8; 4]> = GrowableArray::with_capacity(2);
        arr.push(*b"E0__");
        arr.push(*b"E1__");
        arr.push(*b"E2__");

        arr.remove_at(1);
        assert_eq!(arr.len(), 2);
        assert_eq!(arr.get(1), Some(&*b"E2__"));
        assert_eq!(arr.get(2), None);
    }

    #[test]
    fn test_remove_last_just_shrinks() {
        let mut arr = GrowableArray::new();
        arr.push(1u32);
        arr.push(2);
        arr.remove_at(1);
        assert_eq!(arr.len(), 1);
        assert_eq!(arr.get(0), Some(&1));
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let mut arr = GrowableArray::new();
        arr.push('a');
        arr.remove_at(7);
        assert_eq!(arr.len(), 1);

        let mut empty: GrowableArray<char> = GrowableArray::new();
        empty.remove_at(0);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_get_out_of_range_is_absent() {
        let arr: GrowableArray<u8> = GrowableArray::new();
        assert_eq!(arr.get(0), None);
    }

    #[test]
    fn test_shrink_to_fit_keeps_contents() {
        let mut arr = GrowableArray::with_capacity(64);
        for i in 0u32..5 {
            arr.push(i);
        }
        arr.shrink_to_fit();
        assert_eq!(arr.len(), 5);
        assert!(arr.capacity() >= 5);
        assert_eq!(arr.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
    }
}
