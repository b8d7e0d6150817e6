//! Per-row size tracking with estimate-then-measure semantics.
//!
//! Every row starts at a configured default estimate and may later be
//! overwritten by a measured size reported from the presentation layer.
//! Offsets are prefix sums over the current sizes, maintained incrementally
//! in a [`FenwickTree`] so scroll-driven recomputation stays O(log n).

use crate::fenwick::FenwickTree;

/// Default row size estimate, matching a typical list row in scalar units.
pub const DEFAULT_ESTIMATE: u32 = 50;

/// Tracks estimated and measured sizes for each row index.
///
/// Measured entries are set via [`SizeTable::record`] and are never silently
/// overwritten by an estimate; growth only appends estimated slots.
#[derive(Debug, Clone)]
pub struct SizeTable {
    /// Current size per row (estimate or measurement).
    sizes: Vec<u32>,
    /// Whether the corresponding row has been measured.
    measured: Vec<bool>,
    /// Incremental prefix sums over `sizes`.
    sums: FenwickTree,
    /// Size assigned to rows that have not been measured yet.
    default_estimate: u32,
}

impl Default for SizeTable {
    fn default() -> Self {
        Self::new(DEFAULT_ESTIMATE)
    }
}

impl SizeTable {
    /// Create an empty table with the given default estimate.
    ///
    /// A zero estimate would make unmeasured rows invisible to offset
    /// queries, so it is bumped to one.
    #[must_use]
    pub fn new(default_estimate: u32) -> Self {
        Self {
            sizes: Vec::new(),
            measured: Vec::new(),
            sums: FenwickTree::new(0),
            default_estimate: default_estimate.max(1),
        }
    }

    /// Number of rows tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Whether no rows are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// The default estimate for unmeasured rows.
    #[must_use]
    pub fn default_estimate(&self) -> u32 {
        self.default_estimate
    }

    /// Current size for `index`: the measurement if present, else the
    /// estimate. Out-of-range indices report the default estimate.
    #[must_use]
    pub fn estimate(&self, index: usize) -> u32 {
        self.sizes
            .get(index)
            .copied()
            .unwrap_or(self.default_estimate)
    }

    /// Whether `index` holds a measured size.
    #[must_use]
    pub fn is_measured(&self, index: usize) -> bool {
        self.measured.get(index).copied().unwrap_or(false)
    }

    /// Store a measured size for `index`, replacing any prior estimate or
    /// measurement. Out-of-range indices are ignored; rows must be grown
    /// into existence first.
    pub fn record(&mut self, index: usize, size: u32) {
        let Some(slot) = self.sizes.get_mut(index) else {
            return;
        };
        let prev = *slot;
        *slot = size;
        self.measured[index] = true;
        if size != prev {
            self.sums
                .update(index, i64::from(size) - i64::from(prev));
        }
    }

    /// Append rows at the default estimate until `new_len` rows are tracked.
    /// Never shrinks.
    pub fn grow(&mut self, new_len: usize) {
        let old_len = self.sizes.len();
        if new_len <= old_len {
            return;
        }
        self.sizes.resize(new_len, self.default_estimate);
        self.measured.resize(new_len, false);
        self.sums.resize(new_len);
        for i in old_len..new_len {
            self.sums.update(i, i64::from(self.default_estimate));
        }
    }

    /// Drop rows from the end until at most `new_len` rows are tracked,
    /// keeping measurements for the survivors. No-op when already shorter.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.sizes.len() {
            return;
        }
        self.sizes.truncate(new_len);
        self.measured.truncate(new_len);
        self.sums.resize(new_len);
    }

    /// Offset of the top edge of `index`: sum of sizes of all rows before it.
    /// Indices past the end return the total extent.
    #[must_use]
    pub fn offset_of(&self, index: usize) -> u64 {
        if index == 0 || self.sizes.is_empty() {
            return 0;
        }
        self.sums.prefix(index.min(self.sizes.len()) - 1)
    }

    /// Index of the row whose `[offset_of(i), offset_of(i) + size)` interval
    /// contains `offset`, clamped to the last row for offsets past the end.
    #[must_use]
    pub fn index_at_offset(&self, offset: u64) -> usize {
        if self.sizes.is_empty() {
            return 0;
        }
        // find_prefix yields the count of rows wholly above `offset`.
        let consumed = match self.sums.find_prefix(offset) {
            Some(i) => i + 1,
            None => 0,
        };
        consumed.min(self.sizes.len() - 1)
    }

    /// Total extent of all tracked rows.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.sums.total()
    }
}
