//! Ordered page storage with flattened item access.
//!
//! Pages arrive strictly in fetch order (the controller permits only one
//! fetch in flight), are immutable once appended, and are never evicted.
//! Global item lookup resolves through a cumulative-length prefix array so
//! it stays O(log pages) regardless of item count.

use ahash::AHashMap;

/// Opaque cursor identifying which page to fetch next.
///
/// Offset-based backends can encode a page number as its decimal string;
/// cursor-based backends pass the server cursor through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageToken(Box<str>);

impl PageToken {
    /// Wrap a server-issued cursor.
    #[must_use]
    pub fn new(cursor: impl Into<Box<str>>) -> Self {
        Self(cursor.into())
    }

    /// The raw cursor string, as handed to the fetch collaborator.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PageToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for PageToken {
    fn from(page_index: u64) -> Self {
        Self::new(page_index.to_string())
    }
}

/// One fetched page: the token it was fetched with, its items, and the
/// cursor for the page after it (`None` marks the end of the data set).
#[derive(Debug, Clone)]
pub struct Page<T> {
    token: PageToken,
    items: Vec<T>,
    next: Option<PageToken>,
}

impl<T> Page<T> {
    /// Build a page from a fetch result.
    #[must_use]
    pub fn new(token: PageToken, items: Vec<T>, next: Option<PageToken>) -> Self {
        Self { token, items, next }
    }

    /// Token this page was fetched with.
    #[must_use]
    pub fn token(&self) -> &PageToken {
        &self.token
    }

    /// Items in page order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Cursor for the following page, if any.
    #[must_use]
    pub fn next(&self) -> Option<&PageToken> {
        self.next.as_ref()
    }
}

/// Ordered collection of fetched pages with flat item access.
#[derive(Debug, Clone)]
pub struct PageCache<T> {
    pages: Vec<Page<T>>,
    /// `ends[i]` is the global index one past the last item of page `i`.
    ends: Vec<usize>,
    /// Token → page position, for duplicate-append detection.
    by_token: AHashMap<PageToken, usize>,
    /// Cursor for the very first page, used before anything is fetched.
    first_token: PageToken,
}

impl<T> PageCache<T> {
    /// Create an empty cache; `first_token` identifies the initial page.
    #[must_use]
    pub fn new(first_token: PageToken) -> Self {
        Self {
            pages: Vec::new(),
            ends: Vec::new(),
            by_token: AHashMap::new(),
            first_token,
        }
    }

    /// Append the logically-next page.
    ///
    /// Token continuity is the caller's responsibility; the cache only
    /// rejects a token it has already stored, which would otherwise
    /// duplicate items in the flattened view.
    pub fn append(&mut self, page: Page<T>) {
        if self.by_token.contains_key(&page.token) {
            tracing::warn!(token = %page.token, "duplicate page append ignored");
            return;
        }
        let end = self.total_loaded() + page.items.len();
        self.by_token.insert(page.token.clone(), self.pages.len());
        self.ends.push(end);
        self.pages.push(page);
    }

    /// Item at `global_index` across the concatenation of pages in arrival
    /// order.
    #[must_use]
    pub fn item(&self, global_index: usize) -> Option<&T> {
        if global_index >= self.total_loaded() {
            return None;
        }
        let page_idx = self.ends.partition_point(|&end| end <= global_index);
        let page = &self.pages[page_idx];
        let page_start = self.ends[page_idx] - page.items.len();
        page.items.get(global_index - page_start)
    }

    /// Total number of items across all fetched pages.
    #[must_use]
    pub fn total_loaded(&self) -> usize {
        self.ends.last().copied().unwrap_or(0)
    }

    /// Number of fetched pages.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Whether more data may exist: `true` until a fetched page reports no
    /// next cursor.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.pages.last().is_none_or(|p| p.next.is_some())
    }

    /// Cursor for the next fetch: the first-page token before anything is
    /// fetched, then the last page's `next`. `None` once exhausted.
    #[must_use]
    pub fn next_token(&self) -> Option<&PageToken> {
        match self.pages.last() {
            None => Some(&self.first_token),
            Some(page) => page.next.as_ref(),
        }
    }
}
