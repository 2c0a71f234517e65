use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// Broad classes of contract violation.
///
/// Every [`Error`] variant belongs to exactly one kind; see [`Error::kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Out-of-bounds access, end-marker dereference, cross-container
    /// comparison or arithmetic, invalid ranges.
    Range,
    /// A structure change (resize, reallocation, move-out) was attempted
    /// while a structure-lock guard is alive.
    StructureLock,
    /// Access through a cursor whose owning container no longer exists.
    NullDereference,
}

/// Error type for `trackvec` operations.
///
/// These are programming-contract violations, not transient faults: there is
/// no retry policy, and a rejected operation leaves the container untouched.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum Error {
    /// Index is beyond the current container length
    #[error("index {index} out of bounds for length {len}")]
    OutOfBounds {
        /// Index that was accessed
        index: usize,
        /// Current length of the container
        len: usize,
    },
    /// `front()`/`back()`/`pop_back()` on an empty container
    #[error("operation on empty container")]
    EmptyContainer,
    /// Dereference of a cursor in the end-marker (reset) state
    #[error("dereference of an end-marker cursor")]
    EndDereference,
    /// A cursor movement would leave the valid position range `[0, len]`
    #[error("cursor cannot move by {delta} from position {index} in container of length {len}")]
    CursorRange {
        /// Position the cursor was at
        index: usize,
        /// Requested movement
        delta: isize,
        /// Current length of the container
        len: usize,
    },
    /// Comparison, difference, or positional use of cursors from different containers
    #[error("cursors belong to different containers")]
    OwnerMismatch,
    /// Range order violation (`start > end`) or range end beyond the container
    #[error("invalid range: start {start} is greater than end {end}")]
    InvalidRange {
        /// Start of the rejected range
        start: usize,
        /// End of the rejected range
        end: usize,
    },
    /// A size- or capacity-changing operation was attempted while a
    /// structure-lock guard is alive
    #[error("structure change rejected: a structure-lock guard is alive")]
    StructureLocked,
    /// The cursor's owning container has been dropped
    #[error("the owning container no longer exists")]
    ContainerDropped,
}

impl Error {
    /// Maps a concrete violation to its place in the error taxonomy.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::OutOfBounds { .. }
            | Error::EmptyContainer
            | Error::EndDereference
            | Error::CursorRange { .. }
            | Error::OwnerMismatch
            | Error::InvalidRange { .. } => ErrorKind::Range,
            Error::StructureLocked => ErrorKind::StructureLock,
            Error::ContainerDropped => ErrorKind::NullDereference,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(Error::OutOfBounds { index: 3, len: 2 }.kind(), ErrorKind::Range);
        assert_eq!(Error::EmptyContainer.kind(), ErrorKind::Range);
        assert_eq!(Error::OwnerMismatch.kind(), ErrorKind::Range);
        assert_eq!(Error::StructureLocked.kind(), ErrorKind::StructureLock);
        assert_eq!(Error::ContainerDropped.kind(), ErrorKind::NullDereference);
    }

    #[test]
    fn test_display_includes_positions() {
        let message = Error::OutOfBounds { index: 7, len: 3 }.to_string();
        assert!(message.contains('7'));
        assert!(message.contains('3'));
    }
}
