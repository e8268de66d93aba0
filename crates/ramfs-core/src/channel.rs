//! Seekable byte channels over file bodies.

use std::io::{self, Read, Seek, SeekFrom, Write};
use std::sync::Arc;

use tracing::debug;

use crate::content::ContentStore;
use crate::error::{FsError, FsResult};
use crate::fs::FsState;
use crate::path::FsPath;
use crate::types::OpenOptions;

/// A cursor over one file's bytes, returned by
/// [`RamFs::open_channel`](crate::RamFs::open_channel).
///
/// Channels on the same file share its buffer. Byte I/O only takes the
/// file's own lock. Dropping a channel closes it.
pub struct Channel {
    fs: Arc<FsState>,
    path: FsPath,
    content: ContentStore,
    options: OpenOptions,
    position: u64,
    open: bool,
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("fs", &self.fs.name)
            .field("path", &self.path)
            .field("position", &self.position)
            .field("open", &self.open)
            .finish()
    }
}

impl Channel {
    pub(crate) fn new(
        fs: Arc<FsState>,
        path: FsPath,
        content: ContentStore,
        options: OpenOptions,
    ) -> Self {
        Self {
            fs,
            path,
            content,
            options,
            position: 0,
            open: true,
        }
    }

    /// Real path the channel was opened on.
    pub fn path(&self) -> &FsPath {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.open && self.fs.is_open()
    }

    fn check_open(&self) -> FsResult<()> {
        if !self.open {
            return Err(FsError::ClosedChannel);
        }
        self.fs.ensure_open()
    }

    fn check_readable(&self) -> FsResult<()> {
        self.check_open()?;
        if !self.options.readable() {
            return Err(FsError::invalid_argument("channel not opened for reading"));
        }
        Ok(())
    }

    fn check_writable(&self) -> FsResult<()> {
        self.check_open()?;
        if !self.options.writable() {
            return Err(FsError::invalid_argument("channel not opened for writing"));
        }
        self.fs.ensure_writable()
    }

    pub fn position(&self) -> FsResult<u64> {
        self.check_open()?;
        Ok(self.position)
    }

    /// Move the cursor. Positions past the end are allowed; a later write
    /// there zero-fills the gap.
    pub fn set_position(&mut self, position: u64) -> FsResult<()> {
        self.check_open()?;
        self.position = position;
        Ok(())
    }

    /// Current size of the file.
    pub fn size(&self) -> FsResult<u64> {
        self.check_open()?;
        Ok(self.content.len())
    }

    /// Read at the cursor and advance it. Returns 0 at end of file.
    pub fn read(&mut self, buf: &mut [u8]) -> FsResult<usize> {
        self.check_readable()?;
        let n = self.content.read_at(self.position, buf);
        self.position += n as u64;
        Ok(n)
    }

    /// Write at the cursor (or at the end, in append mode) and advance it.
    pub fn write(&mut self, data: &[u8]) -> FsResult<usize> {
        self.check_writable()?;
        if self.options.append {
            self.position = self.content.append(data);
            return Ok(data.len());
        }
        let n = self.content.write_at(self.position, data)?;
        self.position += n as u64;
        Ok(n)
    }

    /// Read at `offset` without moving the cursor.
    pub fn read_at(&self, offset: u64, buf: &mut [u8]) -> FsResult<usize> {
        self.check_readable()?;
        Ok(self.content.read_at(offset, buf))
    }

    /// Write at `offset` without moving the cursor.
    pub fn write_at(&self, offset: u64, data: &[u8]) -> FsResult<usize> {
        self.check_writable()?;
        self.content.write_at(offset, data)
    }

    /// Shrink the file to `size` bytes. Larger sizes leave it unchanged.
    /// The cursor is pulled back if it sat past the new end.
    pub fn truncate(&mut self, size: u64) -> FsResult<()> {
        self.check_writable()?;
        self.content.truncate(size);
        self.position = self.position.min(size);
        Ok(())
    }

    /// Close the channel. Idempotent.
    ///
    /// With `delete_on_close`, the file is removed if it is still the one
    /// this channel opened; that is the only point after opening where the
    /// tree lock is taken.
    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        if self.options.delete_on_close {
            let mut tree = self.fs.tree.write();
            if self.fs.is_open() && !self.fs.is_read_only() {
                let removed = tree.delete_file_if(&self.path, &self.content);
                debug!(fs = %self.fs.name, path = %self.path, removed, "delete on close");
            }
        }
    }
}

impl Drop for Channel {
    fn drop(&mut self) {
        self.close();
    }
}

impl Read for Channel {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(Channel::read(self, buf)?)
    }
}

impl Write for Channel {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(Channel::write(self, buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(self.check_open()?)
    }
}

impl Seek for Channel {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.check_open()?;
        let target = match pos {
            SeekFrom::Start(n) => Some(n),
            SeekFrom::End(delta) => self.content.len().checked_add_signed(delta),
            SeekFrom::Current(delta) => self.position.checked_add_signed(delta),
        };
        let target = target.ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "seek to a negative position")
        })?;
        self.position = target;
        Ok(target)
    }
}
