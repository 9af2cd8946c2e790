//! Splitting an object into copy ranges.

/// The most parts a multipart upload may have.
pub const MAX_PARTS: u64 = 10_000;

/// One contiguous byte range of the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartPlan {
    /// 1-based part number.
    pub part_number: u32,
    /// First byte.
    pub offset: u64,
    /// Number of bytes; never zero.
    pub length: u64,
}

impl PartPlan {
    /// Last byte, inclusive.
    #[must_use]
    pub fn last_byte(&self) -> u64 {
        self.offset + self.length - 1
    }

    /// The range as an HTTP `Range` value, e.g. `bytes=0-1023`.
    #[must_use]
    pub fn range(&self) -> String {
        format!("bytes={}-{}", self.offset, self.last_byte())
    }
}

/// Computes part layouts for a minimum part size.
///
/// The effective part size grows past the minimum when the object would
/// otherwise need more than [`MAX_PARTS`] parts.
///
/// # Examples
///
/// ```
/// use ferrosdk_s3_transfer::partition::CopyPartitioner;
///
/// let parts = CopyPartitioner::new(1024).plan(4000);
/// let ranges: Vec<_> = parts.iter().map(|p| p.range()).collect();
/// assert_eq!(ranges, ["bytes=0-1023", "bytes=1024-2047", "bytes=2048-3071", "bytes=3072-3999"]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyPartitioner {
    part_size: u64,
}

impl CopyPartitioner {
    /// A partitioner with the given minimum part size. Zero is treated as one.
    #[must_use]
    pub fn new(part_size: u64) -> Self {
        Self {
            part_size: part_size.max(1),
        }
    }

    /// Minimum part size.
    #[must_use]
    pub fn part_size(&self) -> u64 {
        self.part_size
    }

    /// Part size actually used for an object of `size` bytes.
    #[must_use]
    pub fn optimal_part_size(&self, size: u64) -> u64 {
        self.part_size.max(size.div_ceil(MAX_PARTS))
    }

    /// Number of parts for an object of `size` bytes.
    #[must_use]
    pub fn part_count(&self, size: u64) -> u64 {
        size.div_ceil(self.optimal_part_size(size))
    }

    /// Lays out an object of `size` bytes as contiguous parts covering every
    /// byte exactly once.
    #[must_use]
    pub fn plan(&self, size: u64) -> Vec<PartPlan> {
        let part_size = self.optimal_part_size(size);
        let mut parts = Vec::new();
        let mut offset = 0;
        let mut part_number = 1;
        while offset < size {
            let length = part_size.min(size - offset);
            parts.push(PartPlan {
                part_number,
                offset,
                length,
            });
            offset += length;
            part_number += 1;
        }
        parts
    }
}
