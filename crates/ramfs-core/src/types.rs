//! Core filesystem types.
//!
//! Attribute and listing types are serializable so a host adapter can ship
//! them across whatever boundary it lives behind.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use strum::{Display, EnumString};

use crate::error::{FsError, FsResult};

/// Node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum FileType {
    /// Regular file.
    File,
    /// Directory.
    Directory,
}

impl FileType {
    /// Returns true if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, FileType::File)
    }

    /// Returns true if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, FileType::Directory)
    }
}

/// Basic file attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttr {
    /// Size in bytes (0 for directories).
    pub size: u64,
    /// Node type.
    pub kind: FileType,
    /// Creation time.
    pub created: SystemTime,
    /// Last modification time.
    pub modified: SystemTime,
}

impl FileAttr {
    /// Returns true if this is a regular file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// Returns true if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }
}

/// Directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    /// Entry name as spelled at creation (not full path).
    pub name: String,
    /// Entry type.
    pub kind: FileType,
}

impl DirEntry {
    /// Create a new directory entry.
    pub fn new(name: impl Into<String>, kind: FileType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Access being checked by `RamFs::check_access`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum AccessMode {
    Read,
    Write,
}

/// Options for opening a channel.
///
/// Mirrors the usual host open options. Nothing set means read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpenOptions {
    /// Read access requested.
    pub read: bool,
    /// Write access requested.
    pub write: bool,
    /// Every write goes to the end of the file.
    pub append: bool,
    /// Create if missing.
    pub create: bool,
    /// Create, failing if the file exists.
    pub create_new: bool,
    /// Truncate an existing file to zero length on open.
    pub truncate: bool,
    /// Delete the file when the channel is closed.
    pub delete_on_close: bool,
}

impl OpenOptions {
    /// Read-only access.
    pub fn read() -> Self {
        Self {
            read: true,
            ..Default::default()
        }
    }

    /// Write access to an existing file.
    pub fn write() -> Self {
        Self {
            write: true,
            ..Default::default()
        }
    }

    /// Create (or truncate) for writing.
    pub fn create_truncate() -> Self {
        Self {
            write: true,
            create: true,
            truncate: true,
            ..Default::default()
        }
    }

    /// Create exclusively (fail if exists).
    pub fn create_new() -> Self {
        Self {
            write: true,
            create_new: true,
            ..Default::default()
        }
    }

    /// Create if missing, append otherwise.
    pub fn append() -> Self {
        Self {
            append: true,
            create: true,
            ..Default::default()
        }
    }

    pub fn with_read(mut self) -> Self {
        self.read = true;
        self
    }

    pub fn with_create(mut self) -> Self {
        self.create = true;
        self
    }

    pub fn with_delete_on_close(mut self) -> Self {
        self.delete_on_close = true;
        self
    }

    /// Whether the channel may write.
    pub fn writable(&self) -> bool {
        self.write || self.append
    }

    /// Whether the channel may read. With no access flag at all, read.
    pub fn readable(&self) -> bool {
        self.read || !self.writable()
    }

    /// Whether opening may create the file.
    pub fn creates(&self) -> bool {
        self.writable() && (self.create || self.create_new)
    }

    /// Reject combinations that have no meaning.
    pub fn validate(&self) -> FsResult<()> {
        if self.read && self.append {
            return Err(FsError::invalid_argument("read and append are exclusive"));
        }
        if self.append && self.truncate {
            return Err(FsError::invalid_argument("append and truncate are exclusive"));
        }
        Ok(())
    }
}
