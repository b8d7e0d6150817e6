//! Visible-window computation: maps scroll geometry to the minimal row set.
//!
//! Given a total row count, viewport size, and scroll offset, the calculator
//! resolves the contiguous index range whose intervals intersect the viewport,
//! expands it by the overscan allowance, and emits one positioned slot per
//! row. All offset math goes through the size table's prefix sums, so a
//! recomputation costs O(log n + window).

use crate::size_table::SizeTable;

/// Extra rows materialized beyond the strictly visible range, to reduce
/// pop-in during fast scrolling.
pub const DEFAULT_OVERSCAN: usize = 5;

/// A single row to materialize: index plus its absolute position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSlot {
    /// Global row index.
    pub index: usize,
    /// Offset of the row's top edge from the start of the list.
    pub start: u64,
    /// Row extent in the same scalar unit as the scroll offset.
    pub size: u32,
}

impl RowSlot {
    /// Offset just past the row's bottom edge.
    #[must_use]
    pub fn end(&self) -> u64 {
        self.start + u64::from(self.size)
    }
}

/// The set of rows to materialize for one scroll state.
///
/// Purely derived output: recomputed on every relevant input change, never
/// mutated in place. Indices `start..end` are contiguous ascending and their
/// intervals tile without gap or overlap.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VisibleWindow {
    /// First materialized index.
    pub start: usize,
    /// One past the last materialized index.
    pub end: usize,
    /// Positioned slots for `start..end`.
    pub rows: Vec<RowSlot>,
}

impl VisibleWindow {
    /// Whether no rows are materialized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Index of the last materialized row, if any.
    #[must_use]
    pub fn last_index(&self) -> Option<usize> {
        (!self.is_empty()).then(|| self.end - 1)
    }
}

/// Computes [`VisibleWindow`]s from scroll geometry and a [`SizeTable`].
#[derive(Debug, Clone, Copy)]
pub struct WindowCalculator {
    overscan: usize,
}

impl Default for WindowCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_OVERSCAN)
    }
}

impl WindowCalculator {
    /// Create a calculator with the given overscan allowance.
    #[must_use]
    pub fn new(overscan: usize) -> Self {
        Self { overscan }
    }

    /// The configured overscan allowance.
    #[must_use]
    pub fn overscan(&self) -> usize {
        self.overscan
    }

    /// Compute the window for `total_count` rows under the given geometry.
    ///
    /// The scroll offset is clamped to the scrollable extent before range
    /// resolution; out-of-range requests therefore degrade to the last
    /// window rather than failing. An empty list or zero-sized viewport
    /// yields an empty window. Indices the table does not track yet lay
    /// out at its default estimate, matching the estimator's behavior for
    /// out-of-range queries.
    #[must_use]
    pub fn compute(
        &self,
        total_count: usize,
        viewport_size: u32,
        scroll_offset: u64,
        sizes: &SizeTable,
    ) -> VisibleWindow {
        if total_count == 0 || viewport_size == 0 {
            return VisibleWindow::default();
        }

        let covered = total_count.min(sizes.len());
        let estimate = u64::from(sizes.default_estimate());
        let tail_start = sizes.offset_of(covered);
        let offset_of = |index: usize| -> u64 {
            if index <= covered {
                sizes.offset_of(index)
            } else {
                tail_start + (index - covered) as u64 * estimate
            }
        };
        let index_at = |offset: u64| -> usize {
            if offset < tail_start || covered == total_count {
                sizes.index_at_offset(offset).min(total_count - 1)
            } else {
                let tail = (offset - tail_start) / estimate;
                covered.saturating_add(tail as usize).min(total_count - 1)
            }
        };

        let total_size = offset_of(total_count);
        let max_scroll = total_size.saturating_sub(u64::from(viewport_size));
        let offset = scroll_offset.min(max_scroll);
        let view_end = offset.saturating_add(u64::from(viewport_size));

        let first_visible = index_at(offset);
        // view_end is exclusive; query the last covered unit.
        let last_visible = index_at(view_end.saturating_sub(1).max(offset));

        let start = first_visible.saturating_sub(self.overscan);
        let end = last_visible
            .saturating_add(self.overscan)
            .saturating_add(1)
            .min(total_count);

        tracing::trace!(
            total_count,
            viewport_size,
            scroll_offset = offset,
            start,
            end,
            "window recomputed"
        );

        let mut rows = Vec::with_capacity(end - start);
        let mut cursor = offset_of(start);
        for index in start..end {
            let size = sizes.estimate(index);
            rows.push(RowSlot {
                index,
                start: cursor,
                size,
            });
            cursor += u64::from(size);
        }

        VisibleWindow { start, end, rows }
    }
}
