//! Filesystem error types.

use std::io;
use thiserror::Error;

/// Error type for path algebra, tree mutations and channel I/O.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsError {
    /// File or directory not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Path already exists.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// A path segment that must be a directory names a file.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// Expected a file.
    #[error("is a directory: {0}")]
    IsADirectory(String),

    /// Directory not empty.
    #[error("directory not empty: {0}")]
    DirectoryNotEmpty(String),

    /// Argument rejected before anything was touched.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Segment index outside the path.
    #[error("index out of range: {index} (path has {len} segments)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Absolute and relative paths were mixed where that has no meaning.
    #[error("incompatible paths: {0} and {1}")]
    IncompatiblePath(String, String),

    /// The filesystem instance has been closed.
    #[error("filesystem is closed: {0}")]
    ClosedInstance(String),

    /// The channel has been closed.
    #[error("channel is closed")]
    ClosedChannel,

    /// Mutation attempted on a read-only filesystem.
    #[error("filesystem is read-only: {0}")]
    ReadOnlyViolation(String),
}

impl FsError {
    /// Create a NotFound error.
    pub fn not_found(path: impl ToString) -> Self {
        Self::NotFound(path.to_string())
    }

    /// Create an AlreadyExists error.
    pub fn already_exists(path: impl ToString) -> Self {
        Self::AlreadyExists(path.to_string())
    }

    /// Create a NotADirectory error.
    pub fn not_a_directory(path: impl ToString) -> Self {
        Self::NotADirectory(path.to_string())
    }

    /// Create an IsADirectory error.
    pub fn is_a_directory(path: impl ToString) -> Self {
        Self::IsADirectory(path.to_string())
    }

    /// Create a DirectoryNotEmpty error.
    pub fn directory_not_empty(path: impl ToString) -> Self {
        Self::DirectoryNotEmpty(path.to_string())
    }

    /// Create an InvalidArgument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create an IncompatiblePath error.
    pub fn incompatible(a: impl ToString, b: impl ToString) -> Self {
        Self::IncompatiblePath(a.to_string(), b.to_string())
    }
}

/// Convert FsError to std::io::Error so channels can implement `Read`/`Write`.
impl From<FsError> for io::Error {
    fn from(e: FsError) -> Self {
        let kind = match &e {
            FsError::NotFound(_) => io::ErrorKind::NotFound,
            FsError::AlreadyExists(_) => io::ErrorKind::AlreadyExists,
            FsError::NotADirectory(_) => io::ErrorKind::NotADirectory,
            FsError::IsADirectory(_) => io::ErrorKind::IsADirectory,
            FsError::DirectoryNotEmpty(_) => io::ErrorKind::DirectoryNotEmpty,
            FsError::InvalidArgument(_)
            | FsError::IndexOutOfRange { .. }
            | FsError::IncompatiblePath(..) => io::ErrorKind::InvalidInput,
            FsError::ClosedInstance(_) | FsError::ClosedChannel => io::ErrorKind::BrokenPipe,
            FsError::ReadOnlyViolation(_) => io::ErrorKind::ReadOnlyFilesystem,
        };
        io::Error::new(kind, e)
    }
}

/// Filesystem result type.
pub type FsResult<T> = Result<T, FsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_kinds() {
        let e: io::Error = FsError::not_found("/a").into();
        assert_eq!(e.kind(), io::ErrorKind::NotFound);

        let e: io::Error = FsError::ReadOnlyViolation("mem".into()).into();
        assert_eq!(e.kind(), io::ErrorKind::ReadOnlyFilesystem);

        let e: io::Error = FsError::IndexOutOfRange { index: 3, len: 1 }.into();
        assert_eq!(e.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_display_carries_path() {
        assert_eq!(
            FsError::directory_not_empty("/a").to_string(),
            "directory not empty: /a"
        );
    }
}
