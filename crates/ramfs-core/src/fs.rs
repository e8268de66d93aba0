//! Filesystem instances.
//!
//! A [`RamFs`] owns one [`DirectoryTree`] behind a read-write lock. Lookups,
//! listings and stats share the lock; structural mutations hold it
//! exclusively for their whole duration, so readers never see a half-done
//! move. File bytes live behind per-file locks (see
//! [`ContentStore`](crate::ContentStore)) and are read and written without
//! the tree lock.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug_span, info, warn};

use crate::channel::Channel;
use crate::config::FsConfig;
use crate::content::ContentHash;
use crate::error::{FsError, FsResult};
use crate::path::{FsPath, SEPARATOR};
use crate::tree::DirectoryTree;
use crate::types::{AccessMode, DirEntry, FileAttr, OpenOptions};

/// State shared between an instance and the channels it opened.
pub(crate) struct FsState {
    pub(crate) name: String,
    pub(crate) tree: RwLock<DirectoryTree>,
    closed: AtomicBool,
    read_only: AtomicBool,
}

impl FsState {
    pub(crate) fn is_open(&self) -> bool {
        !self.closed.load(Ordering::Acquire)
    }

    pub(crate) fn is_read_only(&self) -> bool {
        self.read_only.load(Ordering::Acquire)
    }

    pub(crate) fn ensure_open(&self) -> FsResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            warn!(fs = %self.name, "operation on closed filesystem");
            Err(FsError::ClosedInstance(self.name.clone()))
        }
    }

    pub(crate) fn ensure_writable(&self) -> FsResult<()> {
        self.ensure_open()?;
        if self.is_read_only() {
            warn!(fs = %self.name, "write rejected on read-only filesystem");
            return Err(FsError::ReadOnlyViolation(self.name.clone()));
        }
        Ok(())
    }

    /// Shared tree guard, taken before the open check so a close that
    /// returned earlier is always observed.
    pub(crate) fn read_tree(&self) -> FsResult<RwLockReadGuard<'_, DirectoryTree>> {
        let tree = self.tree.read();
        self.ensure_open()?;
        Ok(tree)
    }

    /// Exclusive tree guard for a mutation. The closed and read-only flags
    /// only change under this lock, so they hold for the guard's lifetime.
    pub(crate) fn write_tree(&self) -> FsResult<RwLockWriteGuard<'_, DirectoryTree>> {
        let tree = self.tree.write();
        self.ensure_writable()?;
        Ok(tree)
    }
}

/// Listing snapshot returned by [`RamFs::list`].
///
/// Yields each child once, in token order; it cannot be rewound.
#[derive(Debug)]
pub struct ReadDir {
    entries: std::vec::IntoIter<DirEntry>,
}

impl Iterator for ReadDir {
    type Item = DirEntry;

    fn next(&mut self) -> Option<DirEntry> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl ExactSizeIterator for ReadDir {}

/// One named in-memory filesystem.
///
/// All path arguments are brought to their real form (normalized, anchored
/// at `/`) before they touch the tree, so `a/../b` and `/B` address the same
/// node.
pub struct RamFs {
    state: Arc<FsState>,
}

impl std::fmt::Debug for RamFs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RamFs")
            .field("name", &self.state.name)
            .field("open", &self.is_open())
            .field("read_only", &self.is_read_only())
            .finish()
    }
}

impl RamFs {
    /// Create a standalone instance holding only `/`.
    ///
    /// Most callers go through [`Registry::register`](crate::Registry::register).
    pub fn new(name: impl Into<String>, config: FsConfig) -> Self {
        Self {
            state: Arc::new(FsState {
                name: name.into(),
                tree: RwLock::new(DirectoryTree::new()),
                closed: AtomicBool::new(false),
                read_only: AtomicBool::new(config.read_only),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.state.name
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn is_read_only(&self) -> bool {
        self.state.is_read_only()
    }

    /// Flip read-only mode. Waits for any running mutation to finish.
    pub fn set_read_only(&self, read_only: bool) -> FsResult<()> {
        let _tree = self.state.tree.write();
        self.state.ensure_open()?;
        self.state.read_only.store(read_only, Ordering::Release);
        info!(fs = %self.state.name, read_only, "read-only mode changed");
        Ok(())
    }

    /// Close the instance. Idempotent and irreversible; every later call,
    /// including on channels it opened, fails `ClosedInstance`.
    ///
    /// Waits for any running mutation to finish, so none commits after
    /// `close` returns.
    pub fn close(&self) {
        let _tree = self.state.tree.write();
        if !self.state.closed.swap(true, Ordering::AcqRel) {
            info!(fs = %self.state.name, "filesystem closed");
        }
    }

    pub fn separator(&self) -> char {
        SEPARATOR
    }

    pub fn root_directories(&self) -> Vec<FsPath> {
        vec![FsPath::root()]
    }

    pub fn supported_attribute_views(&self) -> &'static [&'static str] {
        &["basic"]
    }

    /// Parse raw strings into a path.
    pub fn path(&self, first: &str, more: &[&str]) -> FsPath {
        FsPath::parse(first, more)
    }

    fn span(&self, op: &'static str) -> tracing::span::EnteredSpan {
        debug_span!("ramfs", fs = %self.state.name, op).entered()
    }

    /// Attributes of the node at `path`.
    pub fn stat(&self, path: impl Into<FsPath>) -> FsResult<FileAttr> {
        let _span = self.span("stat");
        let path = path.into().to_real();
        self.state.read_tree()?.stat(&path)
    }

    pub fn exists(&self, path: impl Into<FsPath>) -> bool {
        self.stat(path).is_ok()
    }

    /// Snapshot of the children of the directory at `path`.
    pub fn list(&self, path: impl Into<FsPath>) -> FsResult<ReadDir> {
        let _span = self.span("list");
        let path = path.into().to_real();
        let entries = self.state.read_tree()?.list(&path)?;
        Ok(ReadDir {
            entries: entries.into_iter(),
        })
    }

    pub fn create_directory(&self, path: impl Into<FsPath>) -> FsResult<()> {
        let _span = self.span("create_directory");
        let path = path.into().to_real();
        self.state.write_tree()?.create_directory(&path)
    }

    /// Create an empty file.
    ///
    /// Fails `AlreadyExists` if something is there, unless `overwrite` is set
    /// and it is a file: that file is then emptied in place, and channels
    /// already open on it see the truncation.
    pub fn create_file(&self, path: impl Into<FsPath>, overwrite: bool) -> FsResult<()> {
        let _span = self.span("create_file");
        let path = path.into().to_real();
        self.state.write_tree()?.create_file(&path, overwrite).map(drop)
    }

    /// Delete a file or empty directory.
    pub fn delete(&self, path: impl Into<FsPath>) -> FsResult<()> {
        let _span = self.span("delete");
        let path = path.into().to_real();
        self.state.write_tree()?.delete(&path)
    }

    /// Move `src` (and its subtree) to `dst`.
    pub fn rename(
        &self,
        src: impl Into<FsPath>,
        dst: impl Into<FsPath>,
        overwrite: bool,
    ) -> FsResult<()> {
        let _span = self.span("rename");
        let (src, dst) = (src.into().to_real(), dst.into().to_real());
        self.state.write_tree()?.rename(&src, &dst, overwrite)
    }

    /// Copy a file, or create an empty copy of a directory.
    pub fn copy(
        &self,
        src: impl Into<FsPath>,
        dst: impl Into<FsPath>,
        overwrite: bool,
    ) -> FsResult<()> {
        let _span = self.span("copy");
        let (src, dst) = (src.into().to_real(), dst.into().to_real());
        self.state.write_tree()?.copy(&src, &dst, overwrite)
    }

    /// Open a channel on the file at `path`.
    ///
    /// The tree lock is taken only here, exclusively when the open may
    /// create or truncate and shared otherwise. Reads and writes through the
    /// channel use the file's own lock.
    pub fn open_channel(&self, path: impl Into<FsPath>, options: OpenOptions) -> FsResult<Channel> {
        let _span = self.span("open_channel");
        options.validate()?;
        let path = path.into().to_real();

        let structural = options.creates() || (options.truncate && options.writable());
        let content = if structural {
            let mut tree = self.state.write_tree()?;
            let content = if options.create_new && options.writable() {
                tree.create_file(&path, false)?
            } else {
                match tree.content(&path) {
                    Ok(content) => content,
                    Err(FsError::NotFound(_)) if options.creates() => {
                        tree.create_file(&path, false)?
                    }
                    Err(e) => return Err(e),
                }
            };
            if options.truncate && options.writable() {
                content.truncate(0);
            }
            content
        } else {
            let tree = self.state.read_tree()?;
            if options.writable() || options.delete_on_close {
                self.state.ensure_writable()?;
            }
            tree.content(&path)?
        };

        Ok(Channel::new(Arc::clone(&self.state), path, content, options))
    }

    /// Whole body of the file at `path`.
    pub fn read_all(&self, path: impl Into<FsPath>) -> FsResult<Vec<u8>> {
        let _span = self.span("read_all");
        let path = path.into().to_real();
        let content = self.state.read_tree()?.content(&path)?;
        Ok(content.to_vec())
    }

    /// Replace the body of the file at `path`, creating it if needed.
    pub fn write_all(&self, path: impl Into<FsPath>, data: &[u8]) -> FsResult<()> {
        let mut channel = self.open_channel(path, OpenOptions::create_truncate())?;
        channel.write(data)?;
        channel.close();
        Ok(())
    }

    /// BLAKE3 digest of the file at `path`.
    pub fn digest(&self, path: impl Into<FsPath>) -> FsResult<ContentHash> {
        let _span = self.span("digest");
        let path = path.into().to_real();
        let content = self.state.read_tree()?.content(&path)?;
        Ok(content.digest())
    }

    /// Whether two paths address the same node.
    ///
    /// Nodes are identified by position, so this compares real paths after
    /// checking that both exist.
    pub fn is_same_file(&self, a: impl Into<FsPath>, b: impl Into<FsPath>) -> FsResult<bool> {
        let _span = self.span("is_same_file");
        let (a, b) = (a.into().to_real(), b.into().to_real());
        let tree = self.state.read_tree()?;
        tree.lookup(&a)?;
        tree.lookup(&b)?;
        Ok(a == b)
    }

    /// Dot-files are hidden.
    pub fn is_hidden(&self, path: impl Into<FsPath>) -> bool {
        path.into()
            .to_real()
            .last_token()
            .is_some_and(|name| name.as_str().starts_with('.'))
    }

    /// Check that `path` exists and that `modes` are permitted.
    pub fn check_access(&self, path: impl Into<FsPath>, modes: &[AccessMode]) -> FsResult<()> {
        let _span = self.span("check_access");
        let path = path.into().to_real();
        let tree = self.state.read_tree()?;
        tree.lookup(&path)?;
        if modes.contains(&AccessMode::Write) {
            self.state.ensure_writable()?;
        }
        Ok(())
    }
}
