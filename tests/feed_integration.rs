#![forbid(unsafe_code)]

//! End-to-end behavior of the windowed list driver.
//!
//! Proves that:
//! 1. An empty list yields an empty window and never fetches.
//! 2. A 400-unit viewport over 50-unit estimates materializes rows 0..=7
//!    plus 5 overscan rows.
//! 3. Reaching the loaded frontier triggers exactly one fetch, even when the
//!    trigger is re-evaluated while the fetch is suspended.
//! 4. A rejected fetch leaves the list unchanged and retryable; the same
//!    window state then triggers exactly one retry.
//! 5. Flattened item order is stable across pages and recomputations.
//! 6. Exhaustion (`next = None`) suppresses fetching for all later windows
//!    and reclaims the loader row's extent.
//! 7. Measurements reshape offsets for subsequent windows.
//!
//! Run:
//!   cargo test --test feed_integration

use std::collections::VecDeque;
use std::pin::pin;
use std::task::{Context, Poll, Waker};

use windowed_list::{
    FetchError, FetchedPage, InfiniteList, ListConfig, PageFetcher, PageToken,
    PaginationController, RowContent, SizeTable, WindowCalculator,
};

/// Replays a script of fetch outcomes and counts invocations.
struct ScriptedFetcher {
    script: VecDeque<Result<FetchedPage<String>, FetchError>>,
    calls: usize,
    tokens_seen: Vec<PageToken>,
}

impl ScriptedFetcher {
    fn new(script: Vec<Result<FetchedPage<String>, FetchError>>) -> Self {
        Self {
            script: script.into(),
            calls: 0,
            tokens_seen: Vec::new(),
        }
    }
}

impl PageFetcher<String> for ScriptedFetcher {
    async fn fetch_page(&mut self, token: &PageToken) -> Result<FetchedPage<String>, FetchError> {
        self.calls += 1;
        self.tokens_seen.push(token.clone());
        self.script
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::transport("script exhausted")))
    }
}

fn page_of(prefix: &str, count: usize, next: Option<u64>) -> Result<FetchedPage<String>, FetchError> {
    Ok(FetchedPage {
        items: (0..count).map(|i| format!("{prefix}-{i}")).collect(),
        next: next.map(PageToken::from),
    })
}

fn new_list(script: Vec<Result<FetchedPage<String>, FetchError>>) -> InfiniteList<String, ScriptedFetcher> {
    InfiniteList::new(
        ScriptedFetcher::new(script),
        PageToken::from(0),
        ListConfig::default(),
    )
}

// ============================================================================
// 1. Empty list
// ============================================================================

#[test]
fn empty_total_count_yields_empty_window_and_no_trigger() {
    let calc = WindowCalculator::default();
    let sizes = SizeTable::default();
    let window = calc.compute(0, 400, 0, &sizes);
    assert!(window.is_empty());

    let ctl = PaginationController::new();
    assert!(!ctl.should_fetch(&window, 0, true));
}

// ============================================================================
// 2. Window shape: viewport 400, estimate 50, overscan 5
// ============================================================================

#[tokio::test]
async fn viewport_400_materializes_rows_0_through_12() {
    let mut list = new_list(vec![page_of("a", 100, Some(1))]);
    list.set_viewport(400);
    list.fetch_more().await.expect("initial fetch");

    let window = list.window();
    assert_eq!(window.start, 0);
    assert_eq!(window.end, 13);
    assert_eq!(window.rows.len(), 13);
    assert_eq!(window.rows[7].start, 350);
    assert!(matches!(list.content(0), Some(RowContent::Item(s)) if s == "a-0"));
}

// ============================================================================
// 3. Frontier trigger fires exactly once
// ============================================================================

#[tokio::test]
async fn reaching_the_frontier_fetches_exactly_one_page() {
    let mut list = new_list(vec![page_of("a", 10, Some(1)), page_of("b", 10, Some(2))]);
    list.set_viewport(400);
    list.fetch_more().await.expect("initial fetch");
    assert_eq!(list.total_loaded(), 10);

    // 10 loaded rows + loader sentinel: the 400-unit window reaches the
    // frontier immediately.
    assert!(list.wants_fetch());
    let appended = list.fetch_more().await.expect("second fetch");
    assert_eq!(appended, 10);
    assert_eq!(list.total_loaded(), 20);
    assert_eq!(list.fetcher().calls, 2);

    // Away from the frontier the rule stops firing.
    list.set_scroll_offset(0);
    assert!(!list.wants_fetch());
    assert_eq!(list.fetch_more().await.expect("no-op"), 0);
    assert_eq!(list.fetcher().calls, 2);
}

/// While a fetch is suspended, re-polling the same call must not reach the
/// fetcher again; one `fetch_more` resolves to one `fetch_page`.
#[test]
fn suspended_fetch_is_not_reissued_across_polls() {
    struct YieldOnce {
        yielded: bool,
        calls: usize,
    }

    impl PageFetcher<String> for YieldOnce {
        fn fetch_page(
            &mut self,
            _token: &PageToken,
        ) -> impl Future<Output = Result<FetchedPage<String>, FetchError>> {
            self.calls += 1;
            let first = !self.yielded;
            self.yielded = true;
            async move {
                if first {
                    // Suspend once before resolving.
                    let mut pending_once = false;
                    std::future::poll_fn(|cx| {
                        if pending_once {
                            Poll::Ready(())
                        } else {
                            pending_once = true;
                            cx.waker().wake_by_ref();
                            Poll::Pending
                        }
                    })
                    .await;
                }
                page_of("a", 3, Some(1))
            }
        }
    }

    let mut list = InfiniteList::new(
        YieldOnce {
            yielded: false,
            calls: 0,
        },
        PageToken::from(0),
        ListConfig::default(),
    );
    list.set_viewport(400);

    let waker = Waker::noop();
    let mut cx = Context::from_waker(waker);
    {
        let mut fut = pin!(list.fetch_more());
        assert!(matches!(fut.as_mut().poll(&mut cx), Poll::Pending));
        match fut.as_mut().poll(&mut cx) {
            Poll::Ready(Ok(appended)) => assert_eq!(appended, 3),
            other => panic!("fetch did not resolve: {other:?}"),
        }
    }
    assert_eq!(list.total_loaded(), 3);
    assert_eq!(list.fetcher().calls, 1);
}

// ============================================================================
// 4. Failure is recoverable
// ============================================================================

#[tokio::test]
async fn failed_fetch_leaves_state_retryable() {
    let mut list = new_list(vec![
        Err(FetchError::transport("503")),
        page_of("a", 5, None),
    ]);
    list.set_viewport(400);

    let err = list.fetch_more().await.expect_err("scripted failure");
    assert_eq!(err, FetchError::transport("503"));
    assert_eq!(list.total_loaded(), 0);
    assert!(list.has_more());
    assert_eq!(list.last_error(), Some(&err));

    // Same window state: exactly one retry, which succeeds.
    assert!(list.wants_fetch());
    let appended = list.fetch_more().await.expect("retry");
    assert_eq!(appended, 5);
    assert_eq!(list.fetcher().calls, 2);
    assert!(list.last_error().is_none());
}

#[tokio::test]
async fn malformed_page_takes_the_failure_path() {
    let mut list = new_list(vec![
        Err(FetchError::malformed("items not a sequence")),
        page_of("a", 2, None),
    ]);
    list.set_viewport(100);

    assert!(list.fetch_more().await.is_err());
    assert_eq!(list.total_loaded(), 0);
    assert!(list.wants_fetch());
    list.fetch_more().await.expect("retry");
    assert_eq!(list.total_loaded(), 2);
}

// ============================================================================
// 5. Flattened order across pages
// ============================================================================

#[tokio::test]
async fn flattened_items_keep_arrival_order() {
    let mut list = new_list(vec![
        page_of("p0", 4, Some(1)),
        page_of("p1", 4, Some(2)),
        page_of("p2", 4, None),
    ]);
    list.set_viewport(400);

    while list.wants_fetch() {
        list.fetch_more().await.expect("scripted pages");
        // Interleave recomputations between fetches.
        list.set_scroll_offset(list.total_size() / 2);
        let _ = list.window();
        list.set_scroll_offset(u64::MAX);
    }

    assert_eq!(list.total_loaded(), 12);
    let expected: Vec<String> = ["p0", "p1", "p2"]
        .iter()
        .flat_map(|p| (0..4).map(move |i| format!("{p}-{i}")))
        .collect();
    for (k, want) in expected.iter().enumerate() {
        match list.content(k) {
            Some(RowContent::Item(got)) => assert_eq!(got, want, "index {k}"),
            other => panic!("index {k}: {other:?}"),
        }
    }
    // Tokens were requested in page order.
    assert_eq!(
        list.fetcher().tokens_seen,
        &[PageToken::from(0), PageToken::from(1), PageToken::from(2)]
    );
}

// ============================================================================
// 6. Exhaustion
// ============================================================================

#[tokio::test]
async fn exhausted_source_never_fetches_again() {
    let mut list = new_list(vec![page_of("a", 6, None)]);
    list.set_viewport(200);
    list.fetch_more().await.expect("only page");

    assert!(!list.has_more());
    assert_eq!(list.total_count(), 6);
    assert!(list.content(6).is_none());

    for offset in [0u64, 100, 250, u64::MAX] {
        list.set_scroll_offset(offset);
        assert!(!list.wants_fetch(), "offset {offset}");
        assert_eq!(list.fetch_more().await.expect("no-op"), 0);
    }
    assert_eq!(list.fetcher().calls, 1);
}

#[tokio::test]
async fn empty_terminal_page_reclaims_the_loader_slot() {
    let mut list = new_list(vec![
        page_of("a", 10, Some(1)),
        Ok(FetchedPage {
            items: Vec::new(),
            next: None,
        }),
    ]);
    list.set_viewport(400);

    list.fetch_more().await.expect("first page");
    // 10 items plus the loader sentinel.
    assert_eq!(list.total_size(), 550);

    list.fetch_more().await.expect("terminal page");
    assert_eq!(list.total_count(), 10);
    assert_eq!(list.total_size(), 500);

    // No blank space survives past the last row.
    list.set_scroll_offset(u64::MAX);
    let window = list.window();
    assert_eq!(window.last_index(), Some(9));
    assert_eq!(window.rows.last().map(|r| r.end()), Some(500));
}

// ============================================================================
// 7. Measurement reshapes the window
// ============================================================================

#[tokio::test]
async fn measurements_shift_offsets_in_the_next_window() {
    let mut list = new_list(vec![page_of("a", 30, None)]);
    list.set_viewport(200);
    list.fetch_more().await.expect("only page");

    let before = list.window();
    assert_eq!(before.rows[1].start, 50);

    list.record_measured(0, 120);
    let after = list.window();
    assert_eq!(after.rows[0].size, 120);
    assert_eq!(after.rows[1].start, 120);
    assert_eq!(list.total_size(), 120 + 29 * 50);

    // Identical inputs after the change still recompute identically.
    assert_eq!(list.window(), after);
}

