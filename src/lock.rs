use std::rc::Rc;

use crate::error::Result;
use crate::vec::Core;

/// A scoped guarantee that the container's size, capacity, and storage
/// address stay fixed for the guard's lifetime.
///
/// Guards are shared ("reader") locks: any number may coexist, and cloning a
/// guard nests another count on the same container. While at least one guard
/// is alive, every size- or capacity-changing operation on the container
/// fails with [`crate::Error::StructureLocked`] instead of mutating. Element
/// *values* may still change; only the structure is pinned.
///
/// Because the structure cannot move while the guard lives, the guard hands
/// out direct slice access without any per-access registration cost.
pub struct StructureLockGuard<T> {
    core: Rc<Core<T>>,
}

impl<T> StructureLockGuard<T> {
    pub(crate) fn acquire(core: Rc<Core<T>>) -> Self {
        core.lock_count.set(core.lock_count.get() + 1);
        Self { core }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.core.store.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.core.store.borrow().is_empty()
    }

    /// Runs `f` on the whole element slice.
    ///
    /// The closure must not call back into the container.
    pub fn with_slice<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(self.core.store.borrow().as_slice())
    }

    /// Runs `f` on the element at `index`.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if `index >= len`.
    pub fn with_item<R>(&self, index: usize, f: impl FnOnce(&T) -> R) -> Result<R> {
        Ok(f(self.core.store.borrow().get(index)?))
    }

    /// Runs `f` on the element at `index` with mutable access. The structure
    /// stays pinned; only the element value changes.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if `index >= len`.
    pub fn with_item_mut<R>(&self, index: usize, f: impl FnOnce(&mut T) -> R) -> Result<R> {
        Ok(f(self.core.store.borrow_mut().get_mut(index)?))
    }
}

impl<T: Clone> StructureLockGuard<T> {
    /// A copy of the element at `index`.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if `index >= len`.
    pub fn get(&self, index: usize) -> Result<T> {
        Ok(self.core.store.borrow().get(index)?.clone())
    }

    /// Replaces the element at `index`.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if `index >= len`.
    pub fn set(&self, index: usize, value: T) -> Result<()> {
        *self.core.store.borrow_mut().get_mut(index)? = value;
        Ok(())
    }
}

impl<T> Clone for StructureLockGuard<T> {
    fn clone(&self) -> Self {
        Self::acquire(Rc::clone(&self.core))
    }
}

impl<T> Drop for StructureLockGuard<T> {
    fn drop(&mut self) {
        self.core.lock_count.set(self.core.lock_count.get() - 1);
    }
}

impl<T> std::fmt::Debug for StructureLockGuard<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructureLockGuard")
            .field("len", &self.len())
            .field("guards", &self.core.lock_count.get())
            .finish()
    }
}
