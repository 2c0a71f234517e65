use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

/// Registrations kept in the inline array before spilling to a map.
pub(crate) const INLINE_CURSOR_LIMIT: usize = 6;

/// Position of one tracked cursor.
///
/// The end-marker state and the "reset" state are the same state:
/// `index == len`. An invalidated cursor is simply forced to the
/// post-mutation end marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CursorState {
    pub(crate) index: usize,
}

/// Opaque registration key, unique and monotonically increasing per
/// container instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct CursorKey(u64);

pub(crate) type StateCell = Rc<Cell<CursorState>>;

#[derive(Debug)]
struct Entry {
    key: CursorKey,
    state: StateCell,
}

/// Small-size-optimized entry storage: a fixed inline array scanned
/// linearly, replaced by a hash map once more than `INLINE_CURSOR_LIMIT`
/// cursors are live at once. Behavior is identical in both modes; only the
/// walk cost differs. Once spilled, the registry stays in map mode.
#[derive(Debug)]
enum Slots {
    Inline {
        entries: [Option<Entry>; INLINE_CURSOR_LIMIT],
        len: usize,
    },
    Spilled(HashMap<CursorKey, StateCell>),
}

/// The set of live cursors registered against one container.
///
/// State cells are shared with the cursor handles, so bulk updates made here
/// are observed by the handles immediately, and handle navigation is
/// observed by later bulk updates.
#[derive(Debug)]
pub(crate) struct CursorRegistry {
    slots: Slots,
    next_key: u64,
}

impl CursorRegistry {
    pub(crate) fn new() -> Self {
        Self {
            slots: Slots::Inline {
                entries: std::array::from_fn(|_| None),
                len: 0,
            },
            next_key: 0,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        match &self.slots {
            Slots::Inline { len, .. } => *len == 0,
            Slots::Spilled(map) => map.is_empty(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        match &self.slots {
            Slots::Inline { len, .. } => *len,
            Slots::Spilled(map) => map.len(),
        }
    }

    /// Registers a new cursor at `index` and returns its key and shared
    /// state cell.
    pub(crate) fn register(&mut self, index: usize) -> (CursorKey, StateCell) {
        let key = CursorKey(self.next_key);
        self.next_key += 1;
        let state: StateCell = Rc::new(Cell::new(CursorState { index }));

        match &mut self.slots {
            Slots::Inline { entries, len } => {
                if let Some(slot) = entries.iter_mut().find(|slot| slot.is_none()) {
                    *slot = Some(Entry {
                        key,
                        state: Rc::clone(&state),
                    });
                    *len += 1;
                } else {
                    // Seventh live cursor: move everything to the map
                    let mut map = HashMap::with_capacity(INLINE_CURSOR_LIMIT + 1);
                    for entry in entries.iter_mut().filter_map(Option::take) {
                        map.insert(entry.key, entry.state);
                    }
                    map.insert(key, Rc::clone(&state));
                    self.slots = Slots::Spilled(map);
                }
            }
            Slots::Spilled(map) => {
                map.insert(key, Rc::clone(&state));
            }
        }
        (key, state)
    }

    /// Removes the registration for `key`. Called exactly once per
    /// `register`, from the handle's `Drop`; unknown keys are ignored.
    pub(crate) fn release(&mut self, key: CursorKey) {
        match &mut self.slots {
            Slots::Inline { entries, len } => {
                for slot in entries.iter_mut() {
                    if slot.as_ref().is_some_and(|entry| entry.key == key) {
                        *slot = None;
                        *len -= 1;
                        return;
                    }
                }
            }
            Slots::Spilled(map) => {
                map.remove(&key);
            }
        }
    }

    fn for_each_state(&self, mut f: impl FnMut(&Cell<CursorState>)) {
        match &self.slots {
            Slots::Inline { entries, .. } => {
                for entry in entries.iter().flatten() {
                    f(&entry.state);
                }
            }
            Slots::Spilled(map) => {
                for state in map.values() {
                    f(state);
                }
            }
        }
    }

    /// Forces every cursor whose index falls in `[first, last]` to
    /// `end_index`, the post-mutation end marker.
    pub(crate) fn invalidate_inclusive_range(&self, first: usize, last: usize, end_index: usize) {
        self.for_each_state(|cell| {
            let state = cell.get();
            if state.index >= first && state.index <= last {
                cell.set(CursorState { index: end_index });
            }
        });
    }

    /// Adjusts every cursor whose index falls in `[first, last]` by `delta`,
    /// so surviving cursors keep addressing the same logical element.
    pub(crate) fn shift_inclusive_range(&self, first: usize, last: usize, delta: isize) {
        self.for_each_state(|cell| {
            let state = cell.get();
            if state.index >= first && state.index <= last {
                let shifted = (state.index as isize + delta) as usize;
                cell.set(CursorState { index: shifted });
            }
        });
    }

    /// Combined update for erasing `[first, last]` from a container that had
    /// `original_len` elements: cursors inside the erased span are forced to
    /// the new end marker, cursors above it shift down. One walk, so a
    /// shifted survivor can never be mistaken for an invalidated cursor.
    pub(crate) fn erase_update(&self, first: usize, last: usize, original_len: usize) {
        let removed = last - first + 1;
        let new_end = original_len - removed;
        self.for_each_state(|cell| {
            let state = cell.get();
            if state.index >= first && state.index <= last {
                cell.set(CursorState { index: new_end });
            } else if state.index > last {
                cell.set(CursorState {
                    index: state.index - removed,
                });
            }
        });
    }
}
