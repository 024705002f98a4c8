//! The virtual stream: cursor, spanning reads and writes, facade operations

use crate::error::{Result, SpanError};
use crate::layout::SegmentLayout;
use crate::segment::{OpenMode, SegmentFile};
use std::io::SeekFrom;
use std::path::PathBuf;
use tracing::{debug, trace};

/// An ordered collection of segment files presented as one contiguous
/// byte-addressable stream
///
/// A single cursor serves both reads and writes. Requests that span the
/// boundary between backing files are resolved into per-segment I/O
/// transparently. The stream's total length is fixed at construction:
/// the sum of the declared sizes, independent of on-disk file lengths.
///
/// No internal locking: sharing one stream across threads requires
/// external synchronization by the caller.
#[derive(Debug)]
pub struct VirtualStream {
    segments: Vec<SegmentFile>,
    layout: SegmentLayout,
    position: u64,
}

impl VirtualStream {
    /// Open every listed file in `mode` and assemble the stream.
    ///
    /// All-or-nothing: if any open fails, the handles already acquired are
    /// released (the partially built table drops) and no stream is returned.
    pub fn open<I, P>(mode: OpenMode, parts: I) -> Result<Self>
    where
        I: IntoIterator<Item = (P, u64)>,
        P: Into<PathBuf>,
    {
        let mut segments = Vec::new();
        for (path, declared_size) in parts {
            segments.push(SegmentFile::open(path.into(), declared_size, mode)?);
        }

        let layout = SegmentLayout::new(segments.iter().map(|s| s.declared_size()).collect());
        debug!(
            "Opened virtual stream: {} segments, {} bytes total",
            segments.len(),
            layout.total_len()
        );

        Ok(Self {
            segments,
            layout,
            position: 0,
        })
    }

    /// Total length of the virtual address space
    pub fn total_len(&self) -> u64 {
        self.layout.total_len()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// The physical file table, in stream order
    pub fn segments(&self) -> &[SegmentFile] {
        &self.segments
    }

    /// Current cursor position (the `tell` operation)
    pub fn position(&self) -> u64 {
        self.position
    }

    /// True exactly when the cursor sits on the EOF boundary
    pub fn eof(&self) -> bool {
        self.position == self.layout.total_len()
    }

    /// Move the cursor. `Start`/`Current`/`End` carry the conventional
    /// whence-0/1/2 meanings.
    ///
    /// A negative resulting position fails and leaves the cursor unchanged.
    /// There is no upper clamp: seeking past the end is legal and lands the
    /// cursor where every read returns 0 bytes and every write fails.
    pub fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => offset as i128,
            SeekFrom::Current(offset) => self.position as i128 + offset as i128,
            SeekFrom::End(offset) => self.layout.total_len() as i128 + offset as i128,
        };

        if target < 0 {
            return Err(SpanError::NegativeSeek(target as i64));
        }

        self.position = target as u64;
        Ok(self.position)
    }

    /// Spanning read at the cursor.
    ///
    /// Fills `buf` by iterating across segments, zero-padding wherever a
    /// physical file is shorter than its declared size. Returns the
    /// meaningful count `min(buf.len(), total_len - position)` — a request
    /// that runs past the end of the stream still fills the whole buffer
    /// (the tail with zeros) but only counts the bytes inside the address
    /// space. The cursor advances by exactly the returned count, clipping
    /// at the total length. Already at or past EOF: the buffer is cleared
    /// and 0 is returned, cursor untouched. No read ever modifies a file.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let total = self.layout.total_len();
        if self.position >= total {
            buf.fill(0);
            return Ok(0);
        }

        let mut filled = 0;
        while filled < buf.len() {
            if self.position >= total {
                // Boundary guard: never look up a position past the end.
                // The remainder reads as padding, same as a short file.
                buf[filled..].fill(0);
                break;
            }

            let loc = self.layout.locate(self.position);
            let segment_rem = self.layout.remaining_in_segment(loc);
            let want = ((buf.len() - filled) as u64).min(segment_rem) as usize;

            let chunk = &mut buf[filled..filled + want];
            let got = self.segments[loc.segment].read_at(loc.local, chunk)?;
            if got < want {
                // Physical file shorter than declared: pad the declared tail.
                chunk[got..].fill(0);
            }

            trace!(
                "read segment {} local {} want {} got {}",
                loc.segment, loc.local, want, got
            );

            self.position += want as u64;
            filled += want;
        }

        Ok(filled)
    }

    /// Spanning write at the cursor.
    ///
    /// Zero-length writes succeed regardless of position. Otherwise a write
    /// at or past the EOF boundary fails with [`SpanError::WriteBeyondEnd`]
    /// before touching any file; a request that overruns the boundary
    /// mid-call fails the same way after the earlier segments have been
    /// written — completed segment writes are never rolled back.
    pub fn write(&mut self, buf: &[u8]) -> Result<()> {
        if buf.is_empty() {
            return Ok(());
        }

        let total = self.layout.total_len();
        let mut consumed = 0;
        while consumed < buf.len() {
            if self.position >= total {
                return Err(SpanError::WriteBeyondEnd {
                    position: self.position,
                    total_len: total,
                });
            }

            let loc = self.layout.locate(self.position);
            let segment_rem = self.layout.remaining_in_segment(loc);
            let take = ((buf.len() - consumed) as u64).min(segment_rem) as usize;

            self.segments[loc.segment].write_at(loc.local, &buf[consumed..consumed + take])?;

            trace!(
                "wrote {} bytes to segment {} at local {}",
                take, loc.segment, loc.local
            );

            self.position += take as u64;
            consumed += take;
        }

        Ok(())
    }

    /// Read a single byte; `None` once the cursor is at or past EOF
    pub fn get_char(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        if self.read(&mut byte)? == 0 {
            Ok(None)
        } else {
            Ok(Some(byte[0]))
        }
    }

    /// Join `fields` with `join` and perform one spanning write
    pub fn print<I>(&mut self, fields: I, join: &[u8]) -> Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        let mut out = Vec::new();
        for (i, field) in fields.into_iter().enumerate() {
            if i > 0 {
                out.extend_from_slice(join);
            }
            out.extend_from_slice(field.as_ref());
        }
        self.write(&out)
    }

    /// Format, then perform one spanning write. Callers build the
    /// arguments with `format_args!`.
    pub fn print_fmt(&mut self, args: std::fmt::Arguments<'_>) -> Result<()> {
        self.write(args.to_string().as_bytes())
    }

    /// Release every segment handle, in table order.
    ///
    /// Consumes the stream, so use after close does not compile. Dropping
    /// the stream without calling this releases the handles all the same.
    pub fn close(self) -> Result<()> {
        debug!("Closing virtual stream ({} segments)", self.segments.len());
        for segment in self.segments {
            drop(segment);
        }
        Ok(())
    }
}
