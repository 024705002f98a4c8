//! Virtual address space over ordered declared sizes

/// Position of a global stream offset within the segment table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// Index into the segment table
    pub segment: usize,
    /// Byte offset within that segment's declared range
    pub local: u64,
}

/// Maps global stream offsets onto (segment, local offset) pairs
///
/// Built once from the declared sizes at construction; the total length and
/// segment order never change afterwards.
#[derive(Debug, Clone)]
pub struct SegmentLayout {
    sizes: Vec<u64>,
    /// ends[i] is the first global offset past segment i; monotonic,
    /// so lookups are a binary search.
    ends: Vec<u64>,
    total_len: u64,
}

impl SegmentLayout {
    pub fn new(sizes: Vec<u64>) -> Self {
        let mut ends = Vec::with_capacity(sizes.len());
        let mut total = 0u64;
        for &size in &sizes {
            total += size;
            ends.push(total);
        }
        Self {
            sizes,
            ends,
            total_len: total,
        }
    }

    /// Sum of all declared sizes
    pub fn total_len(&self) -> u64 {
        self.total_len
    }

    pub fn segment_count(&self) -> usize {
        self.sizes.len()
    }

    /// Locate `global` in the segment table.
    ///
    /// Zero-sized segments are never returned: the search lands on the first
    /// segment whose end lies past `global`, and an empty segment shares its
    /// end with its predecessor.
    ///
    /// Precondition: `global < total_len()`. Callers must exclude the EOF
    /// boundary before looking up a position.
    pub fn locate(&self, global: u64) -> Location {
        debug_assert!(
            global < self.total_len,
            "locate({global}) called at or past total length {}",
            self.total_len
        );

        let segment = self.ends.partition_point(|&end| end <= global);
        let start = self.ends[segment] - self.sizes[segment];
        Location {
            segment,
            local: global - start,
        }
    }

    /// Declared bytes from `loc` to the end of its segment
    pub fn remaining_in_segment(&self, loc: Location) -> u64 {
        self.sizes[loc.segment] - loc.local
    }
}
