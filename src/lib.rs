#![forbid(unsafe_code)]

//! Headless windowed-list virtualization with incremental page fetching.
//!
//! This crate renders an effectively unbounded list through a fixed-height
//! viewport by materializing only the rows that intersect the viewport (plus
//! an overscan buffer), while fetching data page by page from an async
//! source exactly when the render window reaches the frontier of loaded
//! data. It is UI-agnostic: the host supplies scroll offsets, viewport
//! sizes, and row measurements, and consumes positioned row slots.
//!
//! # Core types
//!
//! - [`InfiniteList`] - the assembled driver: scroll bridge in, row slots out
//! - [`WindowCalculator`] / [`VisibleWindow`] - scroll geometry to row range
//! - [`SizeTable`] - estimate-then-measure row sizes with O(log n) offsets
//! - [`PageCache`] - ordered fetched pages with flattened item access
//! - [`PaginationController`] - level-triggered fetch rule, at most one in
//!   flight
//! - [`PageFetcher`] - the async boundary to the remote source
//!
//! # Example
//!
//! ```ignore
//! use windowed_list::{InfiniteList, ListConfig, PageToken, RowContent};
//!
//! let mut list = InfiniteList::new(fetcher, PageToken::from(0), ListConfig::default());
//! list.set_viewport(400);
//! list.set_scroll_offset(0);
//!
//! if list.wants_fetch() {
//!     list.fetch_more().await?;
//! }
//! for slot in &list.window().rows {
//!     match list.content(slot.index) {
//!         Some(RowContent::Item(item)) => draw_row(slot, item),
//!         Some(RowContent::Loader) => draw_spinner(slot),
//!         None => {}
//!     }
//! }
//! ```

pub mod controller;
pub mod feed;
pub mod fenwick;
pub mod fetch;
pub mod page_cache;
pub mod size_table;
pub mod window;

pub use controller::{FetchState, PaginationController};
pub use feed::{InfiniteList, ListConfig, RowContent};
pub use fetch::{FetchError, FetchedPage, PageFetcher};
pub use page_cache::{Page, PageCache, PageToken};
pub use size_table::{DEFAULT_ESTIMATE, SizeTable};
pub use window::{DEFAULT_OVERSCAN, RowSlot, VisibleWindow, WindowCalculator};
