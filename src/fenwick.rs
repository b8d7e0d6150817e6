//! Fenwick tree (binary indexed tree) over row sizes.
//!
//! Backs the size table's prefix-sum queries so that offset computation stays
//! O(log n) per call instead of rescanning all rows on every scroll event.
//!
//! # Operations
//!
//! | Operation | Time |
//! |-----------|------|
//! | `update` | O(log n) |
//! | `prefix` | O(log n) |
//! | `find_prefix` | O(log n) |
//! | `total` | O(1) amortized |
//! | `resize` | O(k log n) for k new slots |
//!
//! # Invariants
//!
//! 1. `prefix(i)` == sum of values `[0..=i]`.
//! 2. `find_prefix(t)` returns the largest `i` where `prefix(i) <= t`.
//! 3. Sums are `u64`; individual values are `u32` widened on insert, so the
//!    cumulative extent of very long lists cannot overflow.

/// Fenwick tree with `u64` sums and signed deltas.
#[derive(Debug, Clone, Default)]
pub struct FenwickTree {
    /// 1-based internal array; `tree[0]` is unused.
    tree: Vec<u64>,
    len: usize,
}

impl FenwickTree {
    /// Create a tree of `len` zero-valued slots.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            tree: vec![0; len + 1],
            len,
        }
    }

    /// Build from initial values in O(n).
    #[must_use]
    pub fn from_values(values: &[u32]) -> Self {
        let len = values.len();
        let mut tree = vec![0u64; len + 1];
        for (i, &v) in values.iter().enumerate() {
            let pos = i + 1;
            tree[pos] += u64::from(v);
            let parent = pos + (pos & pos.wrapping_neg());
            if parent <= len {
                let carried = tree[pos];
                tree[parent] += carried;
            }
        }
        Self { tree, len }
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Add `delta` to the value at `idx`. Out-of-range indices are ignored.
    ///
    /// The caller guarantees the stored value never goes negative; deltas are
    /// applied with wrapping arithmetic on the unsigned sums.
    pub fn update(&mut self, idx: usize, delta: i64) {
        if idx >= self.len {
            return;
        }
        let mut pos = idx + 1;
        while pos <= self.len {
            self.tree[pos] = self.tree[pos].wrapping_add_signed(delta);
            pos += pos & pos.wrapping_neg();
        }
    }

    /// Inclusive prefix sum of values `[0..=idx]`, clamped to the last slot.
    #[must_use]
    pub fn prefix(&self, idx: usize) -> u64 {
        if self.len == 0 {
            return 0;
        }
        let mut pos = (idx + 1).min(self.len);
        let mut sum = 0u64;
        while pos > 0 {
            sum += self.tree[pos];
            pos -= pos & pos.wrapping_neg();
        }
        sum
    }

    /// Sum of all values.
    #[must_use]
    pub fn total(&self) -> u64 {
        if self.len == 0 { 0 } else { self.prefix(self.len - 1) }
    }

    /// Largest index `i` where `prefix(i) <= target`, or `None` when even the
    /// first slot's sum exceeds `target`.
    #[must_use]
    pub fn find_prefix(&self, target: u64) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let mut idx = 0usize;
        let mut remaining = target;
        let mut step = self.len.next_power_of_two();
        // next_power_of_two can exceed len; the bounds check below covers it.
        while step > 0 {
            let next = idx + step;
            if next <= self.len && self.tree[next] <= remaining {
                remaining -= self.tree[next];
                idx = next;
            }
            step >>= 1;
        }
        // idx is the count of leading slots whose sum fits in target.
        if idx == 0 { None } else { Some(idx - 1) }
    }

    /// Grow or shrink to `new_len` slots; new slots start at zero.
    pub fn resize(&mut self, new_len: usize) {
        if new_len == self.len {
            return;
        }
        let mut values: Vec<u32> = (0..self.len.min(new_len)).map(|i| self.value_at(i)).collect();
        values.resize(new_len, 0);
        *self = Self::from_values(&values);
    }

    fn value_at(&self, idx: usize) -> u32 {
        let above = self.prefix(idx);
        let below = if idx == 0 { 0 } else { self.prefix(idx - 1) };
        u32::try_from(above - below).unwrap_or(u32::MAX)
    }
}
