use std::ops::Deref;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};

use crate::error::{Error, Result};
use crate::store::Store;

/// Capability tag: instances of the implementing type may be referenced from
/// multiple threads.
///
/// This is an explicit opt-in marker, not an inference: [`SharedTrackVec`]
/// only accepts element types that carry it. Implement it for your own types
/// once they are genuinely safe to share:
///
/// ```
/// use trackvec::AsyncShareable;
///
/// #[derive(Clone)]
/// struct Reading {
///     channel: u8,
///     value: f64,
/// }
///
/// impl AsyncShareable for Reading {}
/// ```
pub trait AsyncShareable {}

macro_rules! impl_async_shareable {
    ($($ty:ty),* $(,)?) => {
        $(impl AsyncShareable for $ty {})*
    };
}

impl_async_shareable!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, bool, char, String,
    &'static str,
);

impl AsyncShareable for () {}
impl<T: AsyncShareable> AsyncShareable for Option<T> {}
impl<T: AsyncShareable> AsyncShareable for Vec<T> {}
impl<T: AsyncShareable, const N: usize> AsyncShareable for [T; N] {}
impl<A: AsyncShareable, B: AsyncShareable> AsyncShareable for (A, B) {}
impl<A: AsyncShareable, B: AsyncShareable, C: AsyncShareable> AsyncShareable for (A, B, C) {}

/// The thread-shareable sibling of [`crate::TrackVec`].
///
/// Clones are cheap handles onto the same underlying vector. Every operation
/// acquires the internal reader/writer lock with `try_read`/`try_write` and
/// fails immediately with [`Error::StructureLocked`] on conflict — nothing
/// ever blocks. There are no registered cursors on this variant; access is
/// index-addressed, and scoped direct-slice access goes through
/// [`SharedTrackVec::lock_structure`].
///
/// Element types must opt in to cross-thread sharing via [`AsyncShareable`];
/// a vector of a non-marked type cannot be constructed, which is the
/// compile-time capability check.
pub struct SharedTrackVec<T> {
    inner: Arc<RwLock<Store<T>>>,
}

impl<T: AsyncShareable + Send + Sync> SharedTrackVec<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Store::new())),
        }
    }

    #[must_use]
    pub fn from_vec(items: Vec<T>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Store::from_vec(items))),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Store<T>>> {
        self.inner.try_read().ok_or(Error::StructureLocked)
    }

    fn write(&self) -> Result<parking_lot::RwLockWriteGuard<'_, Store<T>>> {
        self.inner.try_write().ok_or(Error::StructureLocked)
    }

    /// # Errors
    ///
    /// `StructureLocked` if a writer currently holds the lock.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    /// # Errors
    ///
    /// `StructureLocked` if a writer currently holds the lock.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.is_empty())
    }

    /// # Errors
    ///
    /// `StructureLocked` if a writer currently holds the lock.
    pub fn capacity(&self) -> Result<usize> {
        Ok(self.read()?.capacity())
    }

    /// Appends an element.
    ///
    /// # Errors
    ///
    /// `StructureLocked` if any structure-lock guard or concurrent writer
    /// holds the lock.
    pub fn push_back(&self, value: T) -> Result<()> {
        self.write()?.push(value);
        Ok(())
    }

    /// Removes and returns the last element.
    ///
    /// # Errors
    ///
    /// `StructureLocked` on lock conflict; `EmptyContainer` when empty.
    pub fn pop_back(&self) -> Result<T> {
        self.write()?.pop()
    }

    /// Inserts `value` before position `index`.
    ///
    /// # Errors
    ///
    /// `StructureLocked` on lock conflict; `OutOfBounds` if `index > len`.
    pub fn insert(&self, index: usize, value: T) -> Result<()> {
        self.write()?.insert(index, value)
    }

    /// Removes the element at `index` and returns it.
    ///
    /// # Errors
    ///
    /// `StructureLocked` on lock conflict; `OutOfBounds` if `index >= len`.
    pub fn remove(&self, index: usize) -> Result<T> {
        self.write()?.remove(index)
    }

    /// Replaces the element at `index`.
    ///
    /// # Errors
    ///
    /// `StructureLocked` on lock conflict; `OutOfBounds` if `index >= len`.
    pub fn set(&self, index: usize, value: T) -> Result<()> {
        *self.write()?.get_mut(index)? = value;
        Ok(())
    }

    /// Reserves capacity for at least `additional` more elements.
    ///
    /// # Errors
    ///
    /// `StructureLocked` on lock conflict.
    pub fn reserve(&self, additional: usize) -> Result<()> {
        self.write()?.reserve(additional);
        Ok(())
    }

    /// Removes every element.
    ///
    /// # Errors
    ///
    /// `StructureLocked` on lock conflict.
    pub fn clear(&self) -> Result<()> {
        self.write()?.clear();
        Ok(())
    }

    /// Takes a shared structure lock. While any guard is alive the structure
    /// cannot change, and the guard dereferences straight to the element
    /// slice — the zero-overhead access path.
    ///
    /// # Errors
    ///
    /// `StructureLocked` if a writer currently holds the lock. Shared guards
    /// never conflict with each other.
    pub fn lock_structure(&self) -> Result<SharedStructureLockGuard<'_, T>> {
        Ok(SharedStructureLockGuard {
            guard: self.read()?,
        })
    }
}

impl<T: AsyncShareable + Send + Sync + Clone> SharedTrackVec<T> {
    /// A vector of `len` copies of `fill`.
    #[must_use]
    pub fn with_len(len: usize, fill: T) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Store::with_len(len, fill))),
        }
    }

    /// A copy of the element at `index`.
    ///
    /// # Errors
    ///
    /// `StructureLocked` on lock conflict; `OutOfBounds` if `index >= len`.
    pub fn get(&self, index: usize) -> Result<T> {
        Ok(self.read()?.get(index)?.clone())
    }

    /// A copy of the first element.
    ///
    /// # Errors
    ///
    /// `StructureLocked` on lock conflict; `EmptyContainer` when empty.
    pub fn front(&self) -> Result<T> {
        Ok(self.read()?.front()?.clone())
    }

    /// A copy of the last element.
    ///
    /// # Errors
    ///
    /// `StructureLocked` on lock conflict; `EmptyContainer` when empty.
    pub fn back(&self) -> Result<T> {
        Ok(self.read()?.back()?.clone())
    }

    /// Grows or shrinks to `new_len`, filling new slots with `fill`.
    ///
    /// # Errors
    ///
    /// `StructureLocked` on lock conflict.
    pub fn resize(&self, new_len: usize, fill: T) -> Result<()> {
        self.write()?.resize(new_len, fill);
        Ok(())
    }

    /// A plain `Vec` copy of the contents.
    ///
    /// # Errors
    ///
    /// `StructureLocked` on lock conflict.
    pub fn to_vec(&self) -> Result<Vec<T>> {
        Ok(self.read()?.as_slice().to_vec())
    }
}

impl<T: AsyncShareable + Send + Sync> Default for SharedTrackVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for SharedTrackVec<T> {
    /// Another handle onto the same shared vector.
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for SharedTrackVec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.inner.try_read() {
            Some(store) => f.debug_list().entries(store.as_slice()).finish(),
            None => f.write_str("SharedTrackVec(<locked>)"),
        }
    }
}

/// Structure lock for [`SharedTrackVec`]: holds the reader half of the
/// vector's lock, so the buffer cannot move or resize while the guard is
/// alive, and dereferences directly to the element slice.
pub struct SharedStructureLockGuard<'a, T> {
    guard: RwLockReadGuard<'a, Store<T>>,
}

impl<T> SharedStructureLockGuard<'_, T> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.guard.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.guard.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        self.guard.as_slice()
    }
}

impl<T> Deref for SharedStructureLockGuard<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.guard.as_slice()
    }
}
