//! # ramfs-core
//!
//! Named, in-memory, case-insensitive hierarchical filesystems.
//!
//! - A [`Registry`] maps identifiers (case-insensitive) to live [`RamFs`]
//!   instances
//! - Each instance owns a tree of directories and files rooted at `/`
//! - [`FsPath`] is a pure value: parse, normalize, resolve, relativize
//!   without touching any tree
//! - Files are read and written through seekable [`Channel`]s that share
//!   the file's buffer
//!
//! Names keep the spelling they were created with but compare without
//! regard to case, so `/Docs/A.TXT` and `/docs/a.txt` are the same node.

pub mod channel;
pub mod config;
pub mod content;
pub mod error;
pub mod fs;
pub mod path;
pub mod registry;
pub mod tree;
pub mod types;

pub use channel::Channel;
pub use config::{ConfigError, FsConfig, NamespaceConfig, RegistryConfig};
pub use content::{ContentHash, ContentStore};
pub use error::{FsError, FsResult};
pub use fs::{RamFs, ReadDir};
pub use path::{CiString, FsPath, PathToken, SEPARATOR};
pub use registry::Registry;
pub use tree::{DirectoryTree, Node};
pub use types::{AccessMode, DirEntry, FileAttr, FileType, OpenOptions};
