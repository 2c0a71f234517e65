use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::rc::Rc;

use crate::cursor::{ConstCursor, Cursor};
use crate::error::{Error, Result};
use crate::lock::StructureLockGuard;
use crate::registry::CursorRegistry;
use crate::store::Store;

/// Shared state behind one `TrackVec`: the buffer, the registry of live
/// cursors into it, and the structure-lock count. Cursors hold `Weak`
/// references to this, guards hold strong ones.
pub(crate) struct Core<T> {
    pub(crate) store: RefCell<Store<T>>,
    pub(crate) registry: RefCell<CursorRegistry>,
    pub(crate) lock_count: Cell<usize>,
}

impl<T> Core<T> {
    fn new(store: Store<T>) -> Rc<Self> {
        Rc::new(Self {
            store: RefCell::new(store),
            registry: RefCell::new(CursorRegistry::new()),
            lock_count: Cell::new(0),
        })
    }
}

/// A growable vector whose cursors stay valid across mutations.
///
/// Every live [`Cursor`]/[`ConstCursor`] is registered with the vector, and
/// every size-changing operation walks the registrations to keep each cursor
/// addressing the same logical element: insertions shift later cursors up,
/// erasures shift them down and reset cursors into the erased span to the end
/// marker. Because cursors store indices rather than addresses, reallocation
/// never invalidates them.
///
/// All access is bounds-checked; every contract violation is a returned
/// [`Error`], never undefined behavior. [`TrackVec::lock_structure`] pins the
/// structure for a scope and makes direct slice access available.
///
/// `TrackVec` is single-threaded by construction (it is not `Send`). The
/// thread-shareable sibling is [`crate::SharedTrackVec`].
///
/// ```
/// use trackvec::TrackVec;
///
/// let mut v: TrackVec<i32> = [1, 4, 9, 16, 25, 36].into_iter().collect();
/// let mut c = v.begin();
/// c.advance(2)?;
/// assert_eq!(c.get()?, 9);
///
/// v.remove(0)?; // the cursor follows its logical element
/// assert_eq!(c.index(), 1);
/// assert_eq!(c.get()?, 9);
/// # Ok::<(), trackvec::Error>(())
/// ```
pub struct TrackVec<T> {
    core: Rc<Core<T>>,
}

impl<T> TrackVec<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            core: Core::new(Store::new()),
        }
    }

    #[must_use]
    pub fn from_vec(items: Vec<T>) -> Self {
        Self {
            core: Core::new(Store::from_vec(items)),
        }
    }

    pub(crate) fn from_core(core: Rc<Core<T>>) -> Self {
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

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.core.store.borrow().capacity()
    }

    /// Number of live registered cursors.
    #[must_use]
    pub fn cursor_count(&self) -> usize {
        self.core.registry.borrow().len()
    }

    /// Number of live structure-lock guards.
    #[must_use]
    pub fn lock_count(&self) -> usize {
        self.core.lock_count.get()
    }

    fn check_unlocked(&self) -> Result<()> {
        if self.core.lock_count.get() > 0 {
            Err(Error::StructureLocked)
        } else {
            Ok(())
        }
    }

    /// Owner check plus position extraction for cursor-addressed operations.
    fn cursor_position(&self, cursor: &Cursor<T>) -> Result<usize> {
        if cursor.raw().is_owned_by(&self.core) {
            Ok(cursor.index())
        } else {
            Err(Error::OwnerMismatch)
        }
    }

    /// Runs `f` on the element at `index`.
    ///
    /// The closure must not call back into this vector.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if `index >= len`.
    pub fn with_item<R>(&self, index: usize, f: impl FnOnce(&T) -> R) -> Result<R> {
        Ok(f(self.core.store.borrow().get(index)?))
    }

    /// Runs `f` on the element at `index` with mutable access.
    ///
    /// The closure must not call back into this vector.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if `index >= len`.
    pub fn with_item_mut<R>(&mut self, index: usize, f: impl FnOnce(&mut T) -> R) -> Result<R> {
        Ok(f(self.core.store.borrow_mut().get_mut(index)?))
    }

    /// Runs `f` on every element in order.
    pub fn for_each(&self, mut f: impl FnMut(&T)) {
        for item in self.core.store.borrow().as_slice() {
            f(item);
        }
    }

    /// Replaces the element at `index`.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if `index >= len`.
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        *self.core.store.borrow_mut().get_mut(index)? = value;
        Ok(())
    }

    /// Appends an element.
    ///
    /// End-marker cursors ride forward so they remain end markers.
    ///
    /// # Errors
    ///
    /// `StructureLocked` while a structure-lock guard is alive.
    pub fn push_back(&mut self, value: T) -> Result<()> {
        self.check_unlocked()?;
        let original_len = {
            let mut store = self.core.store.borrow_mut();
            let len = store.len();
            store.push(value);
            len
        };
        let registry = self.core.registry.borrow();
        if !registry.is_empty() {
            registry.shift_inclusive_range(original_len, original_len, 1);
        }
        Ok(())
    }

    /// Removes and returns the last element. Cursors on it reset to the new
    /// end marker.
    ///
    /// # Errors
    ///
    /// `StructureLocked` while a guard is alive; `EmptyContainer` when
    /// empty.
    pub fn pop_back(&mut self) -> Result<T> {
        self.check_unlocked()?;
        let (value, original_len) = {
            let mut store = self.core.store.borrow_mut();
            let len = store.len();
            (store.pop()?, len)
        };
        let registry = self.core.registry.borrow();
        if !registry.is_empty() {
            registry.erase_update(original_len - 1, original_len - 1, original_len);
        }
        Ok(value)
    }

    /// Inserts `value` before position `index` (`index == len` appends) and
    /// returns a cursor at the inserted element.
    ///
    /// Cursors at or after `index` shift up by one.
    ///
    /// # Errors
    ///
    /// `StructureLocked` while a guard is alive; `OutOfBounds` if
    /// `index > len`.
    pub fn insert(&mut self, index: usize, value: T) -> Result<Cursor<T>> {
        self.check_unlocked()?;
        let original_len = {
            let mut store = self.core.store.borrow_mut();
            let len = store.len();
            store.insert(index, value)?;
            len
        };
        let registry = self.core.registry.borrow();
        if !registry.is_empty() {
            registry.shift_inclusive_range(index, original_len, 1);
        }
        drop(registry);
        Ok(Cursor::new_at(&self.core, index))
    }

    /// Inserts `value` before the cursor's position.
    ///
    /// # Errors
    ///
    /// `OwnerMismatch` if the cursor belongs to another vector; otherwise as
    /// [`TrackVec::insert`].
    pub fn insert_at(&mut self, at: &Cursor<T>, value: T) -> Result<Cursor<T>> {
        let index = self.cursor_position(at)?;
        self.insert(index, value)
    }

    /// Removes the element at `index` and returns it.
    ///
    /// Cursors on the removed element reset to the end marker; cursors after
    /// it shift down by one.
    ///
    /// # Errors
    ///
    /// `StructureLocked` while a guard is alive; `OutOfBounds` if
    /// `index >= len`.
    pub fn remove(&mut self, index: usize) -> Result<T> {
        self.check_unlocked()?;
        let (value, original_len) = {
            let mut store = self.core.store.borrow_mut();
            let len = store.len();
            (store.remove(index)?, len)
        };
        let registry = self.core.registry.borrow();
        if !registry.is_empty() {
            registry.erase_update(index, index, original_len);
        }
        Ok(value)
    }

    /// Removes the cursor's element and returns a cursor at the following
    /// position.
    ///
    /// # Errors
    ///
    /// `OwnerMismatch` for a foreign cursor; `EndDereference` when the
    /// cursor sits at the end marker (there is nothing to erase); otherwise
    /// as [`TrackVec::remove`].
    pub fn erase_at(&mut self, at: &Cursor<T>) -> Result<Cursor<T>> {
        let index = self.cursor_position(at)?;
        if index >= self.len() {
            return Err(Error::EndDereference);
        }
        self.remove(index)?;
        Ok(Cursor::new_at(&self.core, index))
    }

    /// Removes `[start, end)`. A zero-length range is a no-op but is still
    /// validated.
    ///
    /// # Errors
    ///
    /// `StructureLocked` while a guard is alive; `InvalidRange` if
    /// `start > end`; `OutOfBounds` if `end > len`.
    pub fn erase_range(&mut self, start: usize, end: usize) -> Result<()> {
        self.check_unlocked()?;
        let original_len = {
            let mut store = self.core.store.borrow_mut();
            let len = store.len();
            store.remove_range(start, end)?;
            len
        };
        if end > start {
            let registry = self.core.registry.borrow();
            if !registry.is_empty() {
                registry.erase_update(start, end - 1, original_len);
            }
        }
        Ok(())
    }

    /// Removes the elements between two cursors (`[first, last)`) and
    /// returns a cursor at the position that followed the erased span.
    ///
    /// # Errors
    ///
    /// `OwnerMismatch` for foreign cursors; otherwise as
    /// [`TrackVec::erase_range`].
    pub fn erase_range_at(&mut self, first: &Cursor<T>, last: &Cursor<T>) -> Result<Cursor<T>> {
        let start = self.cursor_position(first)?;
        let end = self.cursor_position(last)?;
        self.erase_range(start, end)?;
        Ok(Cursor::new_at(&self.core, start))
    }

    /// Reserves capacity for at least `additional` more elements. Cursor
    /// indices are untouched; index-based cursors are immune to
    /// reallocation.
    ///
    /// # Errors
    ///
    /// `StructureLocked` while a guard is alive.
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        self.check_unlocked()?;
        self.core.store.borrow_mut().reserve(additional);
        Ok(())
    }

    /// Drops excess capacity.
    ///
    /// # Errors
    ///
    /// `StructureLocked` while a guard is alive.
    pub fn shrink_to_fit(&mut self) -> Result<()> {
        self.check_unlocked()?;
        self.core.store.borrow_mut().shrink_to_fit();
        Ok(())
    }

    /// Removes every element. All cursors reset to the end marker (position
    /// 0 of the now-empty vector).
    ///
    /// # Errors
    ///
    /// `StructureLocked` while a guard is alive.
    pub fn clear(&mut self) -> Result<()> {
        self.check_unlocked()?;
        let original_len = {
            let mut store = self.core.store.borrow_mut();
            let len = store.len();
            store.clear();
            len
        };
        self.core
            .registry
            .borrow()
            .invalidate_inclusive_range(0, original_len, 0);
        Ok(())
    }

    /// Exchanges contents with `other`. Cursors stay with their own vector;
    /// a cursor whose index exceeds the incoming length resets to the new
    /// end marker.
    ///
    /// # Errors
    ///
    /// `StructureLocked` if either vector has a live guard.
    pub fn swap(&mut self, other: &mut TrackVec<T>) -> Result<()> {
        self.check_unlocked()?;
        other.check_unlocked()?;
        if Rc::ptr_eq(&self.core, &other.core) {
            return Ok(());
        }
        {
            let mut ours = self.core.store.borrow_mut();
            let mut theirs = other.core.store.borrow_mut();
            std::mem::swap(&mut *ours, &mut *theirs);
        }
        for core in [&self.core, &other.core] {
            let new_len = core.store.borrow().len();
            core.registry
                .borrow()
                .invalidate_inclusive_range(new_len, usize::MAX, new_len);
        }
        Ok(())
    }

    /// Moves the contents out, leaving the vector empty. All cursors reset
    /// to the end marker of the now-empty vector.
    ///
    /// # Errors
    ///
    /// `StructureLocked` while a guard is alive — a locked structure must
    /// not be moved from. The vector is untouched on failure.
    pub fn take_contents(&mut self) -> Result<Vec<T>> {
        self.check_unlocked()?;
        let store = std::mem::take(&mut *self.core.store.borrow_mut());
        self.core
            .registry
            .borrow()
            .invalidate_inclusive_range(0, usize::MAX, 0);
        Ok(store.into_vec())
    }

    /// A read-write cursor at position 0 (the end marker when empty).
    #[must_use]
    pub fn begin(&self) -> Cursor<T> {
        Cursor::new_at(&self.core, 0)
    }

    /// A read-write cursor at the end marker.
    #[must_use]
    pub fn end(&self) -> Cursor<T> {
        Cursor::new_at(&self.core, self.len())
    }

    /// A read-only cursor at position 0.
    #[must_use]
    pub fn cbegin(&self) -> ConstCursor<T> {
        ConstCursor::new_at(&self.core, 0)
    }

    /// A read-only cursor at the end marker.
    #[must_use]
    pub fn cend(&self) -> ConstCursor<T> {
        ConstCursor::new_at(&self.core, self.len())
    }

    /// A read-write cursor at an explicit position (`index == len` gives the
    /// end marker).
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if `index > len`.
    pub fn cursor_at(&self, index: usize) -> Result<Cursor<T>> {
        let len = self.len();
        if index > len {
            return Err(Error::OutOfBounds { index, len });
        }
        Ok(Cursor::new_at(&self.core, index))
    }

    /// A read-only cursor at an explicit position.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if `index > len`.
    pub fn const_cursor_at(&self, index: usize) -> Result<ConstCursor<T>> {
        let len = self.len();
        if index > len {
            return Err(Error::OutOfBounds { index, len });
        }
        Ok(ConstCursor::new_at(&self.core, index))
    }

    /// Pins the structure: until every guard (clones included) is dropped,
    /// size- and capacity-changing operations fail with `StructureLocked`.
    ///
    /// Acquisition itself always succeeds; guards are shared locks and never
    /// conflict with each other.
    #[must_use]
    pub fn lock_structure(&self) -> StructureLockGuard<T> {
        StructureLockGuard::acquire(Rc::clone(&self.core))
    }
}

impl<T: Clone> TrackVec<T> {
    /// A vector of `len` copies of `fill`.
    #[must_use]
    pub fn with_len(len: usize, fill: T) -> Self {
        Self {
            core: Core::new(Store::with_len(len, fill)),
        }
    }

    #[must_use]
    pub fn from_slice(items: &[T]) -> Self {
        Self::from_vec(items.to_vec())
    }

    /// A copy of the element at `index`.
    ///
    /// There is no unchecked indexing in this library; this is the
    /// `operator[]` substitute.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if `index >= len`.
    pub fn get(&self, index: usize) -> Result<T> {
        Ok(self.core.store.borrow().get(index)?.clone())
    }

    /// Bounds-checked element read; alias of [`TrackVec::get`].
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if `index >= len`.
    pub fn at(&self, index: usize) -> Result<T> {
        self.get(index)
    }

    /// A copy of the first element.
    ///
    /// # Errors
    ///
    /// `EmptyContainer` when empty.
    pub fn front(&self) -> Result<T> {
        Ok(self.core.store.borrow().front()?.clone())
    }

    /// A copy of the last element.
    ///
    /// # Errors
    ///
    /// `EmptyContainer` when empty.
    pub fn back(&self) -> Result<T> {
        Ok(self.core.store.borrow().back()?.clone())
    }

    /// A plain `Vec` copy of the contents.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.core.store.borrow().as_slice().to_vec()
    }

    /// Inserts all of `values` before position `index` and returns a cursor
    /// at the first inserted element (or at `index` when `values` is empty).
    ///
    /// # Errors
    ///
    /// `StructureLocked` while a guard is alive; `OutOfBounds` if
    /// `index > len`.
    pub fn insert_slice(&mut self, index: usize, values: &[T]) -> Result<Cursor<T>> {
        self.check_unlocked()?;
        let original_len = {
            let mut store = self.core.store.borrow_mut();
            let len = store.len();
            store.insert_slice(index, values)?;
            len
        };
        if !values.is_empty() {
            let registry = self.core.registry.borrow();
            if !registry.is_empty() {
                registry.shift_inclusive_range(index, original_len, values.len() as isize);
            }
        }
        Ok(Cursor::new_at(&self.core, index))
    }

    /// Inserts all of `values` before the cursor's position.
    ///
    /// # Errors
    ///
    /// `OwnerMismatch` for a foreign cursor; otherwise as
    /// [`TrackVec::insert_slice`].
    pub fn insert_slice_at(&mut self, at: &Cursor<T>, values: &[T]) -> Result<Cursor<T>> {
        let index = self.cursor_position(at)?;
        self.insert_slice(index, values)
    }

    /// Grows or shrinks to `new_len`, filling new slots with `fill`.
    ///
    /// Shrinking resets cursors in the truncated tail to the new end marker;
    /// growing moves end-marker cursors to the new end.
    ///
    /// # Errors
    ///
    /// `StructureLocked` while a guard is alive.
    pub fn resize(&mut self, new_len: usize, fill: T) -> Result<()> {
        self.check_unlocked()?;
        let original_len = {
            let mut store = self.core.store.borrow_mut();
            let len = store.len();
            store.resize(new_len, fill);
            len
        };
        let registry = self.core.registry.borrow();
        if !registry.is_empty() {
            match new_len.cmp(&original_len) {
                Ordering::Less => {
                    registry.invalidate_inclusive_range(new_len, original_len, new_len);
                }
                Ordering::Greater => {
                    registry.shift_inclusive_range(
                        original_len,
                        original_len,
                        (new_len - original_len) as isize,
                    );
                }
                Ordering::Equal => {}
            }
        }
        Ok(())
    }

    /// Replaces the contents with a copy of `values`. Every cursor resets to
    /// the new end marker.
    ///
    /// # Errors
    ///
    /// `StructureLocked` while a guard is alive.
    pub fn assign(&mut self, values: &[T]) -> Result<()> {
        self.check_unlocked()?;
        self.core.store.borrow_mut().assign_from_slice(values);
        self.core
            .registry
            .borrow()
            .invalidate_inclusive_range(0, usize::MAX, values.len());
        Ok(())
    }

    /// Replaces the contents with `count` copies of `value`.
    ///
    /// # Errors
    ///
    /// `StructureLocked` while a guard is alive.
    pub fn assign_fill(&mut self, count: usize, value: T) -> Result<()> {
        self.check_unlocked()?;
        self.core.store.borrow_mut().assign_fill(count, value);
        self.core
            .registry
            .borrow()
            .invalidate_inclusive_range(0, usize::MAX, count);
        Ok(())
    }
}

impl<T> Default for TrackVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for TrackVec<T> {
    /// A deep copy with its own (empty) cursor registry.
    fn clone(&self) -> Self {
        Self::from_vec(self.to_vec())
    }
}

impl<T> From<Vec<T>> for TrackVec<T> {
    fn from(items: Vec<T>) -> Self {
        Self::from_vec(items)
    }
}

impl<T> FromIterator<T> for TrackVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T: PartialEq> PartialEq for TrackVec<T> {
    fn eq(&self, other: &Self) -> bool {
        if Rc::ptr_eq(&self.core, &other.core) {
            return true;
        }
        *self.core.store.borrow().as_slice() == *other.core.store.borrow().as_slice()
    }
}

impl<T: Eq> Eq for TrackVec<T> {}

impl<T: PartialOrd> PartialOrd for TrackVec<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if Rc::ptr_eq(&self.core, &other.core) {
            return Some(Ordering::Equal);
        }
        self.core
            .store
            .borrow()
            .as_slice()
            .partial_cmp(other.core.store.borrow().as_slice())
    }
}

impl<T: Ord> Ord for TrackVec<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        if Rc::ptr_eq(&self.core, &other.core) {
            return Ordering::Equal;
        }
        self.core
            .store
            .borrow()
            .as_slice()
            .cmp(other.core.store.borrow().as_slice())
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for TrackVec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.core.store.borrow().as_slice())
            .finish()
    }
}
