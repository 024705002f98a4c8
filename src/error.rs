//! Error types for virtual stream operations

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpanError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to open segment {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("write at position {position} exceeds stream capacity {total_len}")]
    WriteBeyondEnd { position: u64, total_len: u64 },

    #[error("seek resolves to negative position {0}")]
    NegativeSeek(i64),
}

pub type Result<T> = std::result::Result<T, SpanError>;
