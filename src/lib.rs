//! Virtual concatenated file streams
//!
//! Presents an ordered collection of files, each with a declared logical
//! size, as one contiguous byte-addressable stream. Position-based reads
//! and writes may span the boundary between backing files; files shorter
//! than their declared size read as zero-padded within their declared
//! range, and bytes beyond a declared size are never addressed or altered.
//!
//! The primary use case is fixed-width records (protocol chunks and the
//! like) that do not align to physical file boundaries.

pub mod error;
pub mod layout;
pub mod record;
pub mod segment;
pub mod stream;

pub use error::{Result, SpanError};
pub use layout::{Location, SegmentLayout};
pub use record::SeparatorPolicy;
pub use segment::{OpenMode, SegmentFile};
pub use stream::VirtualStream;
