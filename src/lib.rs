//! `trackvec`: a bounds-checked vector whose iterators survive mutation.
//!
//! A [`TrackVec`] pairs a growable buffer with a registry of every live
//! cursor into it. Cursors ([`Cursor`]/[`ConstCursor`]) store a logical
//! *index* plus a back-reference to their owner — never a raw address — so
//! reallocation cannot dangle them, and each insert/erase/resize walks the
//! registry to keep every surviving cursor on the same logical element.
//! Cursors whose element is erased are reset to the end marker.
//!
//! Every bounds violation, end-marker dereference, cross-container cursor
//! comparison, and structure-change-while-locked is reported as a typed
//! [`Error`] instead of being undefined behavior.
//!
//! # Cursors follow their element
//!
//! ```
//! use trackvec::TrackVec;
//!
//! let mut v: TrackVec<i32> = [1, 4, 9, 16, 25, 36].into_iter().collect();
//!
//! let mut c = v.begin();
//! c.advance(2)?;
//! assert_eq!(c.get()?, 9);
//!
//! v.remove(0)?;
//! assert_eq!(c.index(), 1); // shifted down, same logical element
//! assert_eq!(c.get()?, 9);
//!
//! v.insert(0, 1)?;
//! assert_eq!(c.index(), 2);
//! assert_eq!(c.get()?, 9);
//! # Ok::<(), trackvec::Error>(())
//! ```
//!
//! # Structure locks
//!
//! A [`StructureLockGuard`] pins the vector's size, capacity, and storage
//! address for its lifetime, which licenses direct slice access; any attempt
//! to change the structure while a guard is alive fails:
//!
//! ```
//! use trackvec::{Error, TrackVec};
//!
//! let mut v = TrackVec::from_vec(vec![10, 20, 30]);
//!
//! let guard = v.lock_structure();
//! let total: i32 = guard.with_slice(|items| items.iter().sum());
//! assert_eq!(total, 60);
//! assert_eq!(v.push_back(40), Err(Error::StructureLocked));
//!
//! drop(guard);
//! v.push_back(40)?;
//! # Ok::<(), trackvec::Error>(())
//! ```
//!
//! # Sharing across threads
//!
//! [`TrackVec`] is single-threaded (it is not `Send`). The opt-in sibling
//! [`SharedTrackVec`] may be shared across threads, but only for element
//! types carrying the [`AsyncShareable`] capability tag; its lock is
//! acquired with try-semantics only, so no operation ever blocks.

mod cursor;
mod error;
mod lock;
mod registry;
mod shared;
mod store;
mod vec;

pub use cursor::{ConstCursor, Cursor};
pub use error::{Error, ErrorKind, Result};
pub use lock::StructureLockGuard;
pub use shared::{AsyncShareable, SharedStructureLockGuard, SharedTrackVec};
pub use vec::TrackVec;
