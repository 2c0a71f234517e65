use std::cell::Cell;
use std::cmp::Ordering;
use std::rc::{Rc, Weak};

use crate::error::{Error, Result};
use crate::registry::{CursorKey, CursorState, StateCell};
use crate::vec::{Core, TrackVec};

/// Index-tracking cursor internals shared by [`Cursor`] and [`ConstCursor`].
///
/// A cursor stores a logical index plus a weak back-reference to its owner,
/// never a raw address, which is what makes it immune to reallocation. The
/// state cell is shared with the owner's registry: container mutations update
/// it in bulk, navigation updates it directly.
///
/// Valid positions are `0..=len`; `index == len` is the end marker, which
/// doubles as the reset state for invalidated cursors.
pub(crate) struct RawCursor<T> {
    owner: Weak<Core<T>>,
    key: Option<CursorKey>,
    state: StateCell,
}

impl<T> RawCursor<T> {
    pub(crate) fn new_at(core: &Rc<Core<T>>, index: usize) -> Self {
        let (key, state) = core.registry.borrow_mut().register(index);
        Self {
            owner: Rc::downgrade(core),
            key: Some(key),
            state,
        }
    }

    fn core(&self) -> Result<Rc<Core<T>>> {
        self.owner.upgrade().ok_or(Error::ContainerDropped)
    }

    fn len(&self) -> Result<usize> {
        Ok(self.core()?.store.borrow().len())
    }

    pub(crate) fn is_owned_by(&self, core: &Rc<Core<T>>) -> bool {
        self.owner
            .upgrade()
            .map_or(false, |owner| Rc::ptr_eq(&owner, core))
    }

    pub(crate) fn index(&self) -> usize {
        self.state.get().index
    }

    fn set_index(&self, index: usize) {
        self.state.set(CursorState { index });
    }

    fn points_to_an_item(&self) -> bool {
        self.len().map_or(false, |len| self.index() < len)
    }

    fn points_to_end_marker(&self) -> bool {
        self.len().map_or(false, |len| self.index() == len)
    }

    fn has_previous(&self) -> bool {
        self.owner.upgrade().is_some() && self.index() > 0
    }

    fn set_to_beginning(&self) {
        self.set_index(0);
    }

    fn set_to_end_marker(&self) -> Result<()> {
        let len = self.len()?;
        self.set_index(len);
        Ok(())
    }

    fn set_to_next(&self) -> Result<()> {
        let len = self.len()?;
        let index = self.index();
        if index >= len {
            return Err(Error::CursorRange {
                index,
                delta: 1,
                len,
            });
        }
        self.set_index(index + 1);
        Ok(())
    }

    fn set_to_previous(&self) -> Result<()> {
        let len = self.len()?;
        let index = self.index();
        if index == 0 {
            return Err(Error::CursorRange {
                index,
                delta: -1,
                len,
            });
        }
        self.set_index(index - 1);
        Ok(())
    }

    fn advance(&self, delta: isize) -> Result<()> {
        let len = self.len()?;
        let index = self.index();
        let target = index as isize + delta;
        if target < 0 || target as usize > len {
            return Err(Error::CursorRange { index, delta, len });
        }
        self.set_index(target as usize);
        Ok(())
    }

    fn require_same_owner(&self, other: &Self) -> Result<()> {
        let ours = self.core()?;
        let theirs = other.core()?;
        if Rc::ptr_eq(&ours, &theirs) {
            Ok(())
        } else {
            Err(Error::OwnerMismatch)
        }
    }

    fn try_eq(&self, other: &Self) -> Result<bool> {
        self.require_same_owner(other)?;
        Ok(self.index() == other.index())
    }

    fn try_cmp(&self, other: &Self) -> Result<Ordering> {
        self.require_same_owner(other)?;
        Ok(self.index().cmp(&other.index()))
    }

    fn offset_from(&self, other: &Self) -> Result<isize> {
        self.require_same_owner(other)?;
        Ok(self.index() as isize - other.index() as isize)
    }

    fn with<R>(&self, f: impl FnOnce(&T) -> R) -> Result<R> {
        let core = self.core()?;
        let store = core.store.borrow();
        let index = self.index();
        if index >= store.len() {
            return Err(Error::EndDereference);
        }
        Ok(f(store.get(index)?))
    }

    fn with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R> {
        let core = self.core()?;
        let mut store = core.store.borrow_mut();
        let index = self.index();
        if index >= store.len() {
            return Err(Error::EndDereference);
        }
        Ok(f(store.get_mut(index)?))
    }

    fn with_previous<R>(&self, f: impl FnOnce(&T) -> R) -> Result<R> {
        let core = self.core()?;
        let store = core.store.borrow();
        let index = self.index();
        if index == 0 {
            return Err(Error::CursorRange {
                index,
                delta: -1,
                len: store.len(),
            });
        }
        Ok(f(store.get(index - 1)?))
    }

    fn container(&self) -> Option<TrackVec<T>> {
        self.owner.upgrade().map(TrackVec::from_core)
    }
}

impl<T> Clone for RawCursor<T> {
    /// An independent registration at the same position. The two cursors'
    /// lifetimes are decoupled from this point on.
    fn clone(&self) -> Self {
        match self.owner.upgrade() {
            Some(core) => {
                let (key, state) = core.registry.borrow_mut().register(self.index());
                Self {
                    owner: self.owner.clone(),
                    key: Some(key),
                    state,
                }
            }
            None => Self {
                owner: self.owner.clone(),
                key: None,
                state: Rc::new(Cell::new(self.state.get())),
            },
        }
    }
}

impl<T> Drop for RawCursor<T> {
    fn drop(&mut self) {
        if let (Some(core), Some(key)) = (self.owner.upgrade(), self.key) {
            core.registry.borrow_mut().release(key);
        }
    }
}

macro_rules! shared_cursor_api {
    () => {
        /// The cursor's logical position. `index() == len` is the end marker.
        #[must_use]
        pub fn index(&self) -> usize {
            self.raw.index()
        }

        /// True when the cursor addresses an element (`index < len`).
        /// False on the end marker or once the container is gone.
        #[must_use]
        pub fn points_to_an_item(&self) -> bool {
            self.raw.points_to_an_item()
        }

        /// True when the cursor sits at the end marker (`index == len`).
        #[must_use]
        pub fn points_to_end_marker(&self) -> bool {
            self.raw.points_to_end_marker()
        }

        /// True when the cursor addresses the first element.
        #[must_use]
        pub fn points_to_beginning(&self) -> bool {
            self.raw.points_to_an_item() && self.raw.index() == 0
        }

        /// True when `set_to_next` would succeed.
        #[must_use]
        pub fn has_next(&self) -> bool {
            self.raw.points_to_an_item()
        }

        /// True when `set_to_previous` would succeed.
        #[must_use]
        pub fn has_previous(&self) -> bool {
            self.raw.has_previous()
        }

        /// Moves to position 0 (the end marker on an empty container).
        pub fn set_to_beginning(&mut self) {
            self.raw.set_to_beginning();
        }

        /// Moves to the end marker.
        ///
        /// # Errors
        ///
        /// `ContainerDropped` if the owning container no longer exists.
        pub fn set_to_end_marker(&mut self) -> Result<()> {
            self.raw.set_to_end_marker()
        }

        /// Resets the cursor, which is the same as moving to the end marker.
        ///
        /// # Errors
        ///
        /// `ContainerDropped` if the owning container no longer exists.
        pub fn reset(&mut self) -> Result<()> {
            self.raw.set_to_end_marker()
        }

        /// Steps forward one position; stepping past the last element lands
        /// on the end marker.
        ///
        /// # Errors
        ///
        /// `CursorRange` when called on the end marker; `ContainerDropped`
        /// if the owning container no longer exists.
        pub fn set_to_next(&mut self) -> Result<()> {
            self.raw.set_to_next()
        }

        /// Steps back one position (from the end marker onto the last
        /// element, or from an element to its predecessor).
        ///
        /// # Errors
        ///
        /// `CursorRange` when already at position 0; `ContainerDropped` if
        /// the owning container no longer exists.
        pub fn set_to_previous(&mut self) -> Result<()> {
            self.raw.set_to_previous()
        }

        /// Moves by `delta` positions (negative moves backward). The target
        /// must land in `[0, len]`.
        ///
        /// # Errors
        ///
        /// `CursorRange` when the target is outside the valid position
        /// range; `ContainerDropped` if the owning container no longer
        /// exists.
        pub fn advance(&mut self, delta: isize) -> Result<()> {
            self.raw.advance(delta)
        }

        /// Moves backward by `delta` positions; `regress(n)` is
        /// `advance(-n)`.
        ///
        /// # Errors
        ///
        /// Same as [`Self::advance`].
        pub fn regress(&mut self, delta: isize) -> Result<()> {
            self.raw.advance(-delta)
        }

        /// Positional equality. Both cursors must belong to the same
        /// container.
        ///
        /// # Errors
        ///
        /// `OwnerMismatch` for cursors of different containers, even when
        /// their indices coincide; `ContainerDropped` if either owner is
        /// gone.
        pub fn try_eq(&self, other: &Self) -> Result<bool> {
            self.raw.try_eq(&other.raw)
        }

        /// Positional ordering. Both cursors must belong to the same
        /// container.
        ///
        /// # Errors
        ///
        /// Same as [`Self::try_eq`].
        pub fn try_cmp(&self, other: &Self) -> Result<core::cmp::Ordering> {
            self.raw.try_cmp(&other.raw)
        }

        /// Signed index distance `self - other`. Both cursors must belong to
        /// the same container.
        ///
        /// # Errors
        ///
        /// Same as [`Self::try_eq`].
        pub fn offset_from(&self, other: &Self) -> Result<isize> {
            self.raw.offset_from(&other.raw)
        }

        /// Runs `f` on the addressed element.
        ///
        /// The closure must not call back into the container.
        ///
        /// # Errors
        ///
        /// `EndDereference` on the end marker; `ContainerDropped` if the
        /// owning container no longer exists.
        pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> Result<R> {
            self.raw.with(f)
        }

        /// The owning container, or `None` once it has been dropped.
        ///
        /// The returned handle shares the container; it is not a copy.
        #[must_use]
        pub fn container(&self) -> Option<TrackVec<T>> {
            self.raw.container()
        }
    };
}

/// A read-write cursor handle.
///
/// Construction registers the cursor with its container's registry and
/// destruction releases the registration, so the container always knows the
/// exact set of live cursors. Cloning allocates an independent registration.
///
/// Cursors survive reallocation and follow their logical element across
/// insertions and erasures; a cursor whose element is erased is reset to the
/// end marker.
pub struct Cursor<T> {
    raw: RawCursor<T>,
}

impl<T> Cursor<T> {
    pub(crate) fn new_at(core: &Rc<Core<T>>, index: usize) -> Self {
        Self {
            raw: RawCursor::new_at(core, index),
        }
    }

    pub(crate) fn raw(&self) -> &RawCursor<T> {
        &self.raw
    }

    shared_cursor_api!();

    /// Runs `f` on the addressed element with mutable access.
    ///
    /// The closure must not call back into the container.
    ///
    /// # Errors
    ///
    /// `EndDereference` on the end marker; `ContainerDropped` if the owning
    /// container no longer exists.
    pub fn with_mut<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> Result<R> {
        self.raw.with_mut(f)
    }

    /// Demotes this cursor to read-only without a new registration.
    #[must_use]
    pub fn into_const(self) -> ConstCursor<T> {
        ConstCursor { raw: self.raw }
    }

    /// A read-only cursor at the same position, independently registered.
    #[must_use]
    pub fn to_const(&self) -> ConstCursor<T> {
        ConstCursor {
            raw: self.raw.clone(),
        }
    }
}

impl<T: Clone> Cursor<T> {
    /// A copy of the addressed element.
    ///
    /// # Errors
    ///
    /// `EndDereference` on the end marker; `ContainerDropped` if the owning
    /// container no longer exists.
    pub fn get(&self) -> Result<T> {
        self.raw.with(T::clone)
    }

    /// A copy of the element just before the cursor. Valid from the end
    /// marker as well.
    ///
    /// # Errors
    ///
    /// `CursorRange` at position 0; `ContainerDropped` if the owning
    /// container no longer exists.
    pub fn previous_item(&self) -> Result<T> {
        self.raw.with_previous(T::clone)
    }

    /// Replaces the addressed element.
    ///
    /// # Errors
    ///
    /// `EndDereference` on the end marker; `ContainerDropped` if the owning
    /// container no longer exists.
    pub fn set(&mut self, value: T) -> Result<()> {
        self.raw.with_mut(|item| *item = value)
    }
}

impl<T> Clone for Cursor<T> {
    fn clone(&self) -> Self {
        Self {
            raw: self.raw.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Cursor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("index", &self.index())
            .field("points_to_an_item", &self.points_to_an_item())
            .finish()
    }
}

/// A read-only cursor handle.
///
/// Same registration lifecycle and navigation surface as [`Cursor`], without
/// element mutation. A `Cursor` converts into a `ConstCursor`; there is no
/// conversion back.
pub struct ConstCursor<T> {
    raw: RawCursor<T>,
}

impl<T> ConstCursor<T> {
    pub(crate) fn new_at(core: &Rc<Core<T>>, index: usize) -> Self {
        Self {
            raw: RawCursor::new_at(core, index),
        }
    }

    shared_cursor_api!();
}

impl<T: Clone> ConstCursor<T> {
    /// A copy of the addressed element.
    ///
    /// # Errors
    ///
    /// `EndDereference` on the end marker; `ContainerDropped` if the owning
    /// container no longer exists.
    pub fn get(&self) -> Result<T> {
        self.raw.with(T::clone)
    }

    /// A copy of the element just before the cursor. Valid from the end
    /// marker as well.
    ///
    /// # Errors
    ///
    /// `CursorRange` at position 0; `ContainerDropped` if the owning
    /// container no longer exists.
    pub fn previous_item(&self) -> Result<T> {
        self.raw.with_previous(T::clone)
    }
}

impl<T> Clone for ConstCursor<T> {
    fn clone(&self) -> Self {
        Self {
            raw: self.raw.clone(),
        }
    }
}

impl<T> std::fmt::Debug for ConstCursor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstCursor")
            .field("index", &self.index())
            .field("points_to_an_item", &self.points_to_an_item())
            .finish()
    }
}
