//! In-memory directory tree.
//!
//! Every directory owns its children outright, keyed by case-insensitive
//! token, so a node's identity is its position in the tree. The tree itself
//! does no locking; [`RamFs`](crate::RamFs) wraps it in a read-write lock and
//! hands it real (normalized, absolute) paths.

use std::collections::BTreeMap;
use std::time::SystemTime;

use tracing::debug;

use crate::content::ContentStore;
use crate::error::{FsError, FsResult};
use crate::path::{FsPath, PathToken};
use crate::types::{DirEntry, FileAttr, FileType};

/// A directory: ordered children plus timestamps.
#[derive(Debug)]
pub struct Directory {
    children: BTreeMap<PathToken, Node>,
    created: SystemTime,
    modified: SystemTime,
}

impl Directory {
    fn new() -> Self {
        let now = SystemTime::now();
        Self {
            children: BTreeMap::new(),
            created: now,
            modified: now,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    fn touch(&mut self) {
        self.modified = SystemTime::now();
    }

    /// Insert under `name`, replacing any entry that compares equal.
    ///
    /// The old key is removed first so the new spelling wins.
    fn put(&mut self, name: PathToken, node: Node) {
        self.children.remove(&name);
        self.children.insert(name, node);
        self.touch();
    }

    fn take(&mut self, name: &PathToken) -> Option<Node> {
        let node = self.children.remove(name);
        if node.is_some() {
            self.touch();
        }
        node
    }
}

/// A regular file.
#[derive(Debug)]
pub struct FileNode {
    content: ContentStore,
    created: SystemTime,
}

impl FileNode {
    fn new(content: ContentStore) -> Self {
        Self {
            content,
            created: SystemTime::now(),
        }
    }

    pub fn content(&self) -> &ContentStore {
        &self.content
    }
}

/// Entry in the tree.
#[derive(Debug)]
pub enum Node {
    Directory(Directory),
    File(FileNode),
}

impl Node {
    pub fn kind(&self) -> FileType {
        match self {
            Node::Directory(_) => FileType::Directory,
            Node::File(_) => FileType::File,
        }
    }

    pub fn attr(&self) -> FileAttr {
        match self {
            Node::Directory(dir) => FileAttr {
                size: 0,
                kind: FileType::Directory,
                created: dir.created,
                modified: dir.modified,
            },
            Node::File(file) => FileAttr {
                size: file.content.len(),
                kind: FileType::File,
                created: file.created,
                modified: file.content.modified(),
            },
        }
    }
}

/// The first `n` segments of `path`, for error messages.
fn prefix(path: &FsPath, n: usize) -> FsPath {
    FsPath::from_segments(path.tokens().take(n).cloned(), path.is_absolute())
}

fn parent_of(path: &FsPath) -> FsResult<FsPath> {
    path.parent()
        .ok_or_else(|| FsError::invalid_argument(format!("{path} has no parent")))
}

fn name_of(path: &FsPath) -> FsResult<PathToken> {
    path.last_token()
        .cloned()
        .ok_or_else(|| FsError::invalid_argument(format!("{path} has no file name")))
}

/// Hierarchical node storage rooted at one directory.
#[derive(Debug)]
pub struct DirectoryTree {
    root: Node,
}

impl Default for DirectoryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectoryTree {
    /// A tree holding only the root directory.
    pub fn new() -> Self {
        Self {
            root: Node::Directory(Directory::new()),
        }
    }

    /// Find the node at `path`.
    ///
    /// Fails `NotADirectory` when a file sits where a directory is needed to
    /// keep walking.
    pub fn lookup(&self, path: &FsPath) -> FsResult<&Node> {
        debug_assert!(path.is_absolute(), "tree paths are absolute: {path}");
        let mut node = &self.root;
        for (depth, token) in path.tokens().enumerate() {
            node = match node {
                Node::Directory(dir) => dir
                    .children
                    .get(token)
                    .ok_or_else(|| FsError::not_found(prefix(path, depth + 1)))?,
                Node::File(_) => return Err(FsError::not_a_directory(prefix(path, depth))),
            };
        }
        Ok(node)
    }

    fn lookup_mut(&mut self, path: &FsPath) -> FsResult<&mut Node> {
        let mut node = &mut self.root;
        for (depth, token) in path.tokens().enumerate() {
            node = match node {
                Node::Directory(dir) => dir
                    .children
                    .get_mut(token)
                    .ok_or_else(|| FsError::not_found(prefix(path, depth + 1)))?,
                Node::File(_) => return Err(FsError::not_a_directory(prefix(path, depth))),
            };
        }
        Ok(node)
    }

    fn dir_mut(&mut self, path: &FsPath) -> FsResult<&mut Directory> {
        match self.lookup_mut(path)? {
            Node::Directory(dir) => Ok(dir),
            Node::File(_) => Err(FsError::not_a_directory(path)),
        }
    }

    fn dir(&self, path: &FsPath) -> FsResult<&Directory> {
        match self.lookup(path)? {
            Node::Directory(dir) => Ok(dir),
            Node::File(_) => Err(FsError::not_a_directory(path)),
        }
    }

    pub fn stat(&self, path: &FsPath) -> FsResult<FileAttr> {
        self.lookup(path).map(Node::attr)
    }

    /// Snapshot of a directory's children, in token order.
    pub fn list(&self, path: &FsPath) -> FsResult<Vec<DirEntry>> {
        let dir = self.dir(path)?;
        Ok(dir
            .children
            .iter()
            .map(|(name, node)| DirEntry::new(name.as_str(), node.kind()))
            .collect())
    }

    /// The body of the file at `path`.
    pub fn content(&self, path: &FsPath) -> FsResult<ContentStore> {
        match self.lookup(path)? {
            Node::File(file) => Ok(file.content.clone()),
            Node::Directory(_) => Err(FsError::is_a_directory(path)),
        }
    }

    pub fn create_directory(&mut self, path: &FsPath) -> FsResult<()> {
        if path.is_root() {
            return Err(FsError::already_exists(path));
        }
        let name = name_of(path)?;
        let parent = self.dir_mut(&parent_of(path)?)?;
        if parent.children.contains_key(&name) {
            return Err(FsError::already_exists(path));
        }
        parent.put(name, Node::Directory(Directory::new()));
        debug!(%path, "created directory");
        Ok(())
    }

    /// Create an empty file and return its body.
    ///
    /// With `overwrite`, an existing file is emptied in place (open channels
    /// see the truncation). An existing directory always fails.
    pub fn create_file(&mut self, path: &FsPath, overwrite: bool) -> FsResult<ContentStore> {
        if path.is_root() {
            return Err(FsError::already_exists(path));
        }
        let name = name_of(path)?;
        let parent = self.dir_mut(&parent_of(path)?)?;
        match parent.children.get(&name) {
            Some(Node::File(file)) if overwrite => {
                file.content.truncate(0);
                debug!(%path, "truncated existing file");
                Ok(file.content.clone())
            }
            Some(_) => Err(FsError::already_exists(path)),
            None => {
                let content = ContentStore::new();
                parent.put(name, Node::File(FileNode::new(content.clone())));
                debug!(%path, "created file");
                Ok(content)
            }
        }
    }

    /// Remove a file or an empty directory.
    pub fn delete(&mut self, path: &FsPath) -> FsResult<()> {
        if path.is_root() {
            return Err(FsError::invalid_argument("cannot delete the root directory"));
        }
        let name = name_of(path)?;
        let parent = self.dir_mut(&parent_of(path)?)?;
        match parent.children.get(&name) {
            None => return Err(FsError::not_found(path)),
            Some(Node::Directory(dir)) if !dir.is_empty() => {
                return Err(FsError::directory_not_empty(path));
            }
            Some(_) => {}
        }
        parent.take(&name);
        debug!(%path, "deleted");
        Ok(())
    }

    /// Remove the file at `path` only if it still holds `content`.
    ///
    /// Used for delete-on-close, where the file may have been replaced or
    /// moved since the channel opened it.
    pub fn delete_file_if(&mut self, path: &FsPath, content: &ContentStore) -> bool {
        let matches = matches!(
            self.lookup(path),
            Ok(Node::File(file)) if file.content.same_as(content)
        );
        if matches {
            if let (Ok(parent), Ok(name)) = (parent_of(path), name_of(path)) {
                if let Ok(dir) = self.dir_mut(&parent) {
                    dir.take(&name);
                    debug!(%path, "deleted on close");
                    return true;
                }
            }
        }
        false
    }

    /// Check that `dst` may receive an entry.
    fn check_target(&self, dst: &FsPath, overwrite: bool) -> FsResult<()> {
        if dst.is_root() {
            return Err(FsError::invalid_argument("cannot replace the root directory"));
        }
        self.dir(&parent_of(dst)?)?;
        match self.lookup(dst) {
            Ok(_) if !overwrite => Err(FsError::already_exists(dst)),
            Ok(Node::Directory(dir)) if !dir.is_empty() => Err(FsError::directory_not_empty(dst)),
            Ok(_) | Err(FsError::NotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Move the entry at `src` (with its whole subtree) to `dst`.
    ///
    /// The entry takes the spelling of `dst`'s last segment, so moving `/a`
    /// to `/A` renames it in place.
    pub fn rename(&mut self, src: &FsPath, dst: &FsPath, overwrite: bool) -> FsResult<()> {
        if src.is_root() {
            return Err(FsError::invalid_argument("cannot move the root directory"));
        }
        self.lookup(src)?;
        let src_parent = parent_of(src)?;
        let src_name = name_of(src)?;
        let dst_name = name_of(dst)?;

        if src == dst {
            let dir = self
                .dir_mut(&src_parent)
                .expect("source parent was just looked up");
            let node = dir.take(&src_name).expect("source was just looked up");
            dir.put(dst_name, node);
            return Ok(());
        }
        if dst.starts_with(src) {
            return Err(FsError::invalid_argument(format!(
                "cannot move {src} into its own subtree {dst}"
            )));
        }
        self.check_target(dst, overwrite)?;

        let node = self
            .dir_mut(&src_parent)
            .expect("source parent was just looked up")
            .take(&src_name)
            .expect("source was just looked up");
        // dst is not under src, so its parent survived the removal.
        self.dir_mut(&parent_of(dst)?)
            .expect("destination parent was checked")
            .put(dst_name, node);
        debug!(%src, %dst, "moved");
        Ok(())
    }

    /// Copy the entry at `src` to `dst`.
    ///
    /// Files get an independent copy of their bytes. Directories are copied
    /// shallow: the result is a new, empty directory.
    pub fn copy(&mut self, src: &FsPath, dst: &FsPath, overwrite: bool) -> FsResult<()> {
        let copied = match self.lookup(src)? {
            Node::File(file) => Node::File(FileNode::new(file.content.duplicate())),
            Node::Directory(_) => Node::Directory(Directory::new()),
        };
        if src == dst {
            return Ok(());
        }
        self.check_target(dst, overwrite)?;
        let dst_name = name_of(dst)?;
        self.dir_mut(&parent_of(dst)?)
            .expect("destination parent was checked")
            .put(dst_name, copied);
        debug!(%src, %dst, "copied");
        Ok(())
    }
}
