//! The external fetch collaborator boundary.
//!
//! Transport, retries-with-backoff, and timeouts all live behind
//! [`PageFetcher`]; the core only sees a page result or a recoverable
//! failure. The fetch is the sole suspension point in the whole crate.

use thiserror::Error;

use crate::page_cache::PageToken;

/// One page of data as returned by the remote source.
#[derive(Debug, Clone)]
pub struct FetchedPage<T> {
    /// Items in page order.
    pub items: Vec<T>,
    /// Cursor for the page after this one; `None` when the data set ends.
    pub next: Option<PageToken>,
}

/// Why a page fetch produced no page.
///
/// No variant is fatal: the in-flight flag is cleared, no page is appended,
/// and the next window recomputation that still satisfies the trigger rule
/// retries naturally.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The transport failed (network error, server error status).
    #[error("page fetch failed: {message}")]
    Transport {
        /// Human-readable description from the transport layer.
        message: String,
    },
    /// The response arrived but could not be interpreted as a page.
    #[error("malformed page: {reason}")]
    MalformedPage {
        /// What was missing or unparseable.
        reason: String,
    },
}

impl FetchError {
    /// Transport failure with the given description.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Undecodable response with the given description.
    #[must_use]
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedPage {
            reason: reason.into(),
        }
    }
}

/// Asynchronous source of pages.
///
/// Implementations own their transport; `&mut self` lets test fetchers keep
/// call counters and scripted responses without interior mutability.
pub trait PageFetcher<T> {
    /// Fetch the page identified by `token`.
    fn fetch_page(
        &mut self,
        token: &PageToken,
    ) -> impl Future<Output = Result<FetchedPage<T>, FetchError>>;
}
