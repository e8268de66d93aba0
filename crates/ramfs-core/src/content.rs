//! File bodies.
//!
//! Each file node owns one [`ContentStore`]: a byte buffer behind its own
//! lock. Channels clone the handle, so every channel open on a file sees the
//! same bytes, and byte I/O never touches the tree lock.

use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{FsError, FsResult};

/// BLAKE3 digest of a file body.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hash a byte slice.
    pub fn of(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// The raw 32 bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex, 64 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from 64 hex characters.
    pub fn from_hex(s: &str) -> FsResult<Self> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| FsError::invalid_argument(format!("bad content hash {s:?}: {e}")))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", &self.to_hex()[..12])
    }
}

struct Content {
    data: Vec<u8>,
    modified: SystemTime,
}

/// Shared handle to one file's bytes.
#[derive(Clone)]
pub struct ContentStore {
    inner: Arc<RwLock<Content>>,
}

impl fmt::Debug for ContentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentStore")
            .field("len", &self.len())
            .finish()
    }
}

impl Default for ContentStore {
    fn default() -> Self {
        Self::new()
    }
}

fn to_index(offset: u64) -> FsResult<usize> {
    usize::try_from(offset)
        .map_err(|_| FsError::invalid_argument(format!("offset {offset} does not fit in memory")))
}

impl ContentStore {
    /// Empty body.
    pub fn new() -> Self {
        Self::from_bytes(Vec::new())
    }

    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Content {
                data,
                modified: SystemTime::now(),
            })),
        }
    }

    pub fn len(&self) -> u64 {
        self.inner.read().data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().data.is_empty()
    }

    pub fn modified(&self) -> SystemTime {
        self.inner.read().modified
    }

    /// True when both handles point at the same body.
    pub fn same_as(&self, other: &ContentStore) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Copy up to `buf.len()` bytes starting at `offset`.
    ///
    /// Returns 0 at or past the end.
    pub fn read_at(&self, offset: u64, buf: &mut [u8]) -> usize {
        let content = self.inner.read();
        let Ok(start) = usize::try_from(offset) else {
            return 0;
        };
        if start >= content.data.len() {
            return 0;
        }
        let n = buf.len().min(content.data.len() - start);
        buf[..n].copy_from_slice(&content.data[start..start + n]);
        n
    }

    /// Write `data` at `offset`, growing the buffer and zero-filling any gap.
    ///
    /// An empty write never grows the body. Growth that cannot be allocated
    /// fails `InvalidArgument` and leaves the body unchanged.
    pub fn write_at(&self, offset: u64, data: &[u8]) -> FsResult<usize> {
        if data.is_empty() {
            return Ok(0);
        }
        let start = to_index(offset)?;
        let end = start
            .checked_add(data.len())
            .ok_or_else(|| FsError::invalid_argument("write past addressable range"))?;
        let mut content = self.inner.write();
        let len = content.data.len();
        if end > len {
            content.data.try_reserve(end - len).map_err(|e| {
                FsError::invalid_argument(format!("cannot grow file to {end} bytes: {e}"))
            })?;
            content.data.resize(end, 0);
        }
        content.data[start..end].copy_from_slice(data);
        content.modified = SystemTime::now();
        Ok(data.len())
    }

    /// Append `data`, returning the new length.
    pub fn append(&self, data: &[u8]) -> u64 {
        let mut content = self.inner.write();
        content.data.extend_from_slice(data);
        content.modified = SystemTime::now();
        content.data.len() as u64
    }

    /// Shrink to `size` bytes. Larger sizes leave the body untouched.
    pub fn truncate(&self, size: u64) {
        let mut content = self.inner.write();
        if let Ok(size) = usize::try_from(size) {
            if size < content.data.len() {
                content.data.truncate(size);
                content.modified = SystemTime::now();
            }
        }
    }

    /// Copy of the whole body.
    pub fn to_vec(&self) -> Vec<u8> {
        self.inner.read().data.clone()
    }

    /// Independent store holding a copy of these bytes.
    pub fn duplicate(&self) -> ContentStore {
        ContentStore::from_bytes(self.to_vec())
    }

    pub fn digest(&self) -> ContentHash {
        ContentHash::of(&self.inner.read().data)
    }
}
