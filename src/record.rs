//! Separator-driven record extraction on top of spanning reads

use crate::error::Result;
use crate::stream::VirtualStream;
use std::io::SeekFrom;
use tracing::trace;

/// Chunk size used while scanning for a delimiter
const SCAN_CHUNK: usize = 1024;

/// How [`VirtualStream::read_record`] decides where one record ends
///
/// A policy is a plain value passed per call; nothing about it is ambient
/// or stream-global.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeparatorPolicy {
    /// Consume everything from the cursor to the end of the stream
    Slurp,
    /// Consume exactly this many bytes as one record
    FixedLength(usize),
    /// Consume bytes until this token has been seen, inclusive
    Delimiter(Vec<u8>),
}

impl VirtualStream {
    /// Read one record according to `policy`.
    ///
    /// `Slurp` returns the remainder of the stream in a single read.
    /// `FixedLength(n)` returns `n` bytes verbatim, zero padding included;
    /// at EOF it returns an empty record instead. `Delimiter(token)` returns
    /// the bytes up to and including the first occurrence of the token, or
    /// whatever remains if the stream ends first; a subsequent call
    /// continues immediately after the token with no duplicated or skipped
    /// bytes.
    pub fn read_record(&mut self, policy: &SeparatorPolicy) -> Result<Vec<u8>> {
        match policy {
            SeparatorPolicy::Slurp => {
                let remaining = self.total_len().saturating_sub(self.position()) as usize;
                let mut buf = vec![0u8; remaining];
                self.read(&mut buf)?;
                Ok(buf)
            }
            SeparatorPolicy::FixedLength(n) => {
                let mut buf = vec![0u8; *n];
                if self.read(&mut buf)? == 0 {
                    buf.clear();
                }
                Ok(buf)
            }
            SeparatorPolicy::Delimiter(token) => self.read_delimited(token),
        }
    }

    fn read_delimited(&mut self, token: &[u8]) -> Result<Vec<u8>> {
        if token.is_empty() {
            return Ok(Vec::new());
        }

        let start = self.position();
        let mut buf: Vec<u8> = Vec::new();
        loop {
            let old_len = buf.len();
            buf.resize(old_len + SCAN_CHUNK, 0);
            let got = self.read(&mut buf[old_len..])?;
            buf.truncate(old_len + got);

            if got == 0 {
                // Stream exhausted without the token: everything accumulated
                // is the record, and nothing was over-read.
                trace!("delimiter not found before EOF, record {} bytes", buf.len());
                return Ok(buf);
            }

            // Rescan only the window where a new match could start, so a
            // token straddling two chunks is still found.
            let from = old_len.saturating_sub(token.len() - 1);
            if let Some(i) = find_token(&buf[from..], token) {
                let record_len = from + i + token.len();
                buf.truncate(record_len);
                // The scan over-read past the token; the corrected position
                // is derived purely from the retained length.
                self.seek(SeekFrom::Start(start + record_len as u64))?;
                trace!("delimiter found, record {} bytes", record_len);
                return Ok(buf);
            }
        }
    }
}

/// Offset of the first occurrence of `token` in `haystack`
fn find_token(haystack: &[u8], token: &[u8]) -> Option<usize> {
    haystack.windows(token.len()).position(|window| window == token)
}
