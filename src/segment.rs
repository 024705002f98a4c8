//! Physical segment files backing a virtual stream

use crate::error::{Result, SpanError};
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Open mode applied uniformly to every segment of a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Open existing files for reading only
    Read,
    /// Open existing files for reading and writing
    ReadWrite,
    /// Like `ReadWrite`, but create files that do not exist yet.
    /// Existing file content is never truncated.
    Create,
}

impl OpenMode {
    fn options(self) -> OpenOptions {
        let mut options = OpenOptions::new();
        match self {
            OpenMode::Read => {
                options.read(true);
            }
            OpenMode::ReadWrite => {
                options.read(true).write(true);
            }
            OpenMode::Create => {
                options.read(true).write(true).create(true);
            }
        }
        options
    }
}

/// One physical file and its declared contribution to the virtual stream
///
/// The declared size governs addressing only; it is independent of the
/// file's actual on-disk length. Immutable after construction.
#[derive(Debug)]
pub struct SegmentFile {
    path: PathBuf,
    declared_size: u64,
    file: File,
}

impl SegmentFile {
    /// Open the file at `path`, holding the handle for the stream's lifetime
    pub(crate) fn open(path: PathBuf, declared_size: u64, mode: OpenMode) -> Result<Self> {
        let file = mode.options().open(&path).map_err(|source| SpanError::Open {
            path: path.clone(),
            source,
        })?;

        debug!(
            "Opened segment {:?} (declared {} bytes, mode {:?})",
            path, declared_size, mode
        );

        Ok(Self {
            path,
            declared_size,
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn declared_size(&self) -> u64 {
        self.declared_size
    }

    /// Read up to `buf.len()` bytes starting at `offset`.
    ///
    /// Returns the number of bytes the file actually held there; short when
    /// the physical file is shorter than its declared size. Never errors on
    /// plain end-of-file.
    pub(crate) fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        self.file.seek(SeekFrom::Start(offset))?;

        let mut filled = 0;
        while filled < buf.len() {
            match self.file.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(filled)
    }

    /// Write all of `buf` starting at `offset`
    pub(crate) fn write_at(&mut self, offset: u64, buf: &[u8]) -> Result<()> {
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(buf)?;
        Ok(())
    }
}
