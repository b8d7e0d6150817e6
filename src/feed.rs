//! The assembled infinite list: window engine wired to incremental fetching.
//!
//! [`InfiniteList`] owns the page cache, size table, window calculator, and
//! pagination controller, and exposes three external surfaces: the
//! scroll/viewport bridge (synchronous setters that recompute the window),
//! the measurement bridge, and the async fetch boundary.
//!
//! Control flow per event:
//!
//! 1. A scroll, resize, measurement, or fetch completion arrives.
//! 2. The caller reads the recomputed [`VisibleWindow`].
//! 3. The caller asks [`InfiniteList::wants_fetch`] and, when true, awaits
//!    [`InfiniteList::fetch_more`], the only suspension point.
//!
//! This replaces reactive dependency-diffing with an explicit ask: every
//! window-affecting change is followed by a synchronous trigger evaluation.

use crate::controller::PaginationController;
use crate::fetch::{FetchError, PageFetcher};
use crate::page_cache::{Page, PageCache, PageToken};
use crate::size_table::SizeTable;
use crate::window::{VisibleWindow, WindowCalculator};

/// What occupies a row index in the render output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowContent<'a, T> {
    /// A loaded item.
    Item(&'a T),
    /// The synthetic loader row past the last loaded item.
    Loader,
}

/// Configuration for an [`InfiniteList`].
#[derive(Debug, Clone, Copy)]
pub struct ListConfig {
    /// Size assigned to rows before they are measured.
    pub estimate: u32,
    /// Extra rows materialized beyond the visible range.
    pub overscan: usize,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            estimate: crate::size_table::DEFAULT_ESTIMATE,
            overscan: crate::window::DEFAULT_OVERSCAN,
        }
    }
}

/// A windowed view over a paginated remote list.
#[derive(Debug)]
pub struct InfiniteList<T, F> {
    fetcher: F,
    cache: PageCache<T>,
    sizes: SizeTable,
    calculator: WindowCalculator,
    controller: PaginationController,
    viewport_size: u32,
    scroll_offset: u64,
    last_error: Option<FetchError>,
}

impl<T, F: PageFetcher<T>> InfiniteList<T, F> {
    /// Create a list that will fetch its first page with `first_token`.
    #[must_use]
    pub fn new(fetcher: F, first_token: PageToken, config: ListConfig) -> Self {
        let mut list = Self {
            fetcher,
            cache: PageCache::new(first_token),
            sizes: SizeTable::new(config.estimate),
            calculator: WindowCalculator::new(config.overscan),
            controller: PaginationController::new(),
            viewport_size: 0,
            scroll_offset: 0,
            last_error: None,
        };
        list.sync_sizes();
        list
    }

    /// Update the scroll offset reported by the host's scroll bridge.
    pub fn set_scroll_offset(&mut self, offset: u64) {
        self.scroll_offset = offset;
    }

    /// Update the viewport size reported by the host's scroll bridge.
    pub fn set_viewport(&mut self, size: u32) {
        self.viewport_size = size;
    }

    /// Current scroll offset (as last reported, unclamped).
    #[must_use]
    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    /// Position `index` at the top of the viewport, clamping both the index
    /// and the resulting offset to the scrollable extent.
    pub fn scroll_to(&mut self, index: usize) {
        let total = self.total_count();
        if total == 0 {
            self.scroll_offset = 0;
            return;
        }
        let target = self.sizes.offset_of(index.min(total - 1));
        let max_scroll = self
            .sizes
            .total_size()
            .saturating_sub(u64::from(self.viewport_size));
        self.scroll_offset = target.min(max_scroll);
    }

    /// Store a measured size for a loaded row. Measurements for the loader
    /// sentinel or beyond are ignored.
    pub fn record_measured(&mut self, index: usize, size: u32) {
        if index >= self.cache.total_loaded() {
            return;
        }
        self.sizes.record(index, size);
    }

    /// Number of renderable rows: the loaded items plus the loader sentinel
    /// while more data may exist.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.cache.total_loaded() + usize::from(self.cache.has_more())
    }

    /// Number of items fetched so far.
    #[must_use]
    pub fn total_loaded(&self) -> usize {
        self.cache.total_loaded()
    }

    /// Whether more data may exist beyond the loaded pages.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.cache.has_more()
    }

    /// Total extent of all renderable rows, for the host's spacer element.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.sizes.total_size()
    }

    /// The most recent fetch failure, until a fetch succeeds. Recoverable:
    /// the host can show a retry affordance and keep scrolling.
    #[must_use]
    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    /// The owned fetch collaborator.
    #[must_use]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Compute the window for the current geometry.
    #[must_use]
    pub fn window(&self) -> VisibleWindow {
        self.calculator.compute(
            self.total_count(),
            self.viewport_size,
            self.scroll_offset,
            &self.sizes,
        )
    }

    /// What to render at `index`: the item, or the loader sentinel for
    /// indices at or past the loaded frontier.
    #[must_use]
    pub fn content(&self, index: usize) -> Option<RowContent<'_, T>> {
        match self.cache.item(index) {
            Some(item) => Some(RowContent::Item(item)),
            None if index < self.total_count() => Some(RowContent::Loader),
            None => None,
        }
    }

    /// Whether the current window warrants fetching the next page.
    #[must_use]
    pub fn wants_fetch(&self) -> bool {
        self.controller
            .should_fetch(&self.window(), self.cache.total_loaded(), self.cache.has_more())
    }

    /// Fetch the next page if the trigger rule fires; otherwise return
    /// `Ok(0)` without suspending.
    ///
    /// On success the page is appended (strictly in request order, since at
    /// most one fetch is ever in flight), the size table grows to cover the
    /// new rows, and the number of appended items is returned. On failure the
    /// error is stored for [`InfiniteList::last_error`] and propagated; no
    /// state is appended, and the same window state will re-trigger a retry.
    pub async fn fetch_more(&mut self) -> Result<usize, FetchError> {
        if !self.wants_fetch() {
            return Ok(0);
        }
        // next_token is present whenever has_more() held above.
        let Some(token) = self.cache.next_token().cloned() else {
            return Ok(0);
        };
        if !self.controller.begin() {
            return Ok(0);
        }
        tracing::debug!(token = %token, loaded = self.cache.total_loaded(), "fetching next page");

        match self.fetcher.fetch_page(&token).await {
            Ok(fetched) => {
                let appended = fetched.items.len();
                let has_more = fetched.next.is_some();
                self.cache
                    .append(Page::new(token, fetched.items, fetched.next));
                self.sync_sizes();
                self.controller.complete(has_more);
                self.last_error = None;
                tracing::debug!(
                    appended,
                    loaded = self.cache.total_loaded(),
                    has_more,
                    "page appended"
                );
                Ok(appended)
            }
            Err(err) => {
                self.controller.fail();
                tracing::warn!(token = %token, error = %err, "page fetch failed");
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Reconcile the size table with the renderable row count: grow to cover
    /// new rows and the loader sentinel, and drop the sentinel slot once the
    /// source is exhausted.
    fn sync_sizes(&mut self) {
        let count = self.total_count();
        self.sizes.grow(count);
        self.sizes.truncate(count);
    }
}
