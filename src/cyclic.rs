//! Round-robin selection over an ordered collection
//!
//! A `CyclicSelector` never runs dry: after the last element it starts over
//! from the first. It also implements `Iterator`, always returning `Some`.

use crate::error::{HarnessError, Result};

/// Endless round-robin cursor
///
/// Owned by a single assembly loop; there is no internal synchronization.
#[derive(Debug, Clone)]
pub struct CyclicSelector<T> {
    items: Vec<T>,
    cursor: usize,
}

impl<T> CyclicSelector<T> {
    /// Fails with [`HarnessError::EmptyCollection`] when `items` is empty
    pub fn new(items: impl IntoIterator<Item = T>) -> Result<Self> {
        let items: Vec<T> = items.into_iter().collect();
        if items.is_empty() {
            return Err(HarnessError::EmptyCollection);
        }
        Ok(Self { items, cursor: 0 })
    }

    /// Borrow the next element and advance by one
    pub fn next_ref(&mut self) -> &T {
        let index = self.cursor;
        self.cursor = (self.cursor + 1) % self.items.len();
        &self.items[index]
    }

    /// Index of the element the next call will return
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false; an empty selector cannot be constructed
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Removal through a cyclic view is not supported
    pub fn remove(&mut self) -> Result<T> {
        Err(HarnessError::UnsupportedOperation(
            "cannot remove from a cyclic selector",
        ))
    }
}

impl<T: Clone> Iterator for CyclicSelector<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        Some(self.next_ref().clone())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}
