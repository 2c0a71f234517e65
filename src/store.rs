use crate::error::{Error, Result};

/// Owned contiguous element storage.
///
/// Every access is bounds-checked and reports violations as [`Error`] values;
/// the store never exposes an unchecked path. Reallocation follows the
/// stdlib's growth policy, which the rest of the crate never depends on:
/// cursors address logical positions, not memory.
#[derive(Debug)]
pub(crate) struct Store<T> {
    items: Vec<T>,
}

impl<T> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Store<T> {
    pub(crate) fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub(crate) fn from_vec(items: Vec<T>) -> Self {
        Self { items }
    }

    pub(crate) fn into_vec(self) -> Vec<T> {
        self.items
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.items.capacity()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub(crate) fn get(&self, index: usize) -> Result<&T> {
        self.items.get(index).ok_or(Error::OutOfBounds {
            index,
            len: self.items.len(),
        })
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.items.len();
        self.items.get_mut(index).ok_or(Error::OutOfBounds { index, len })
    }

    pub(crate) fn front(&self) -> Result<&T> {
        self.items.first().ok_or(Error::EmptyContainer)
    }

    pub(crate) fn back(&self) -> Result<&T> {
        self.items.last().ok_or(Error::EmptyContainer)
    }

    pub(crate) fn push(&mut self, value: T) {
        self.items.push(value);
    }

    pub(crate) fn pop(&mut self) -> Result<T> {
        self.items.pop().ok_or(Error::EmptyContainer)
    }

    /// Inserts at `index`; `index == len` appends.
    pub(crate) fn insert(&mut self, index: usize, value: T) -> Result<()> {
        if index > self.items.len() {
            return Err(Error::OutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        self.items.insert(index, value);
        Ok(())
    }

    pub(crate) fn remove(&mut self, index: usize) -> Result<T> {
        if index >= self.items.len() {
            return Err(Error::OutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    /// Removes `[start, end)`. A zero-length range is a no-op but is still
    /// validated.
    pub(crate) fn remove_range(&mut self, start: usize, end: usize) -> Result<()> {
        if start > end {
            return Err(Error::InvalidRange { start, end });
        }
        if end > self.items.len() {
            return Err(Error::OutOfBounds {
                index: end,
                len: self.items.len(),
            });
        }
        self.items.drain(start..end);
        Ok(())
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.items.reserve(additional);
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        self.items.shrink_to_fit();
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T: Clone> Store<T> {
    pub(crate) fn with_len(len: usize, fill: T) -> Self {
        Self {
            items: vec![fill; len],
        }
    }

    /// Inserts all of `values` before `index`; `index == len` appends.
    pub(crate) fn insert_slice(&mut self, index: usize, values: &[T]) -> Result<()> {
        if index > self.items.len() {
            return Err(Error::OutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        self.items.splice(index..index, values.iter().cloned());
        Ok(())
    }

    pub(crate) fn resize(&mut self, new_len: usize, fill: T) {
        self.items.resize(new_len, fill);
    }

    pub(crate) fn assign_from_slice(&mut self, values: &[T]) {
        self.items.clear();
        self.items.extend_from_slice(values);
    }

    pub(crate) fn assign_fill(&mut self, count: usize, value: T) {
        self.items.clear();
        self.items.resize(count, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_checked_access() {
        let mut store = Store::from_vec(vec![10, 20, 30]);

        assert_eq!(store.get(0), Ok(&10));
        assert_eq!(store.get(2), Ok(&30));
        assert_eq!(store.get(3), Err(Error::OutOfBounds { index: 3, len: 3 }));

        *store.get_mut(1).unwrap() = 21;
        assert_eq!(store.get(1), Ok(&21));
    }

    #[test]
    fn test_empty_front_back() {
        let store: Store<i32> = Store::new();
        assert_eq!(store.front(), Err(Error::EmptyContainer));
        assert_eq!(store.back(), Err(Error::EmptyContainer));
    }

    #[test]
    fn test_insert_at_end_appends() {
        let mut store = Store::from_vec(vec![1, 2]);
        store.insert(2, 3).unwrap();
        assert_eq!(store.as_slice(), &[1, 2, 3]);
        assert_eq!(
            store.insert(5, 4),
            Err(Error::OutOfBounds { index: 5, len: 3 })
        );
    }

    #[test]
    fn test_remove_range_validation() {
        let mut store = Store::from_vec(vec![1, 2, 3, 4, 5]);

        assert_eq!(
            store.remove_range(3, 2),
            Err(Error::InvalidRange { start: 3, end: 2 })
        );
        assert_eq!(
            store.remove_range(0, 6),
            Err(Error::OutOfBounds { index: 6, len: 5 })
        );

        // Zero-length range validates but removes nothing
        store.remove_range(2, 2).unwrap();
        assert_eq!(store.len(), 5);

        store.remove_range(1, 4).unwrap();
        assert_eq!(store.as_slice(), &[1, 5]);
    }

    #[test]
    fn test_assign_replaces_contents() {
        let mut store = Store::from_vec(vec![1, 2, 3]);
        store.assign_from_slice(&[7, 8]);
        assert_eq!(store.as_slice(), &[7, 8]);
        store.assign_fill(3, 0);
        assert_eq!(store.as_slice(), &[0, 0, 0]);
    }
}
