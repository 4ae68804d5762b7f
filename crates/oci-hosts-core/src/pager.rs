//! Cursor-driven pagination
//!
//! Every OCI listing returns at most one page per call together with an
//! opaque `opc-next-page` cursor. [`Pager`] owns that loop once for all four
//! resource kinds: the first call is made with no cursor, each following call
//! with the cursor of the previous page, and the listing ends on the first
//! page without one.
//!
//! A fetch error ends the pager immediately. The items of the failing page
//! are never yielded and no further calls are made.
//!
//! ```rust,ignore
//! let mut pager = Pager::new(|cursor| async move {
//!     inventory.list_vcns(compartment_id, cursor.as_deref()).await
//! });
//!
//! while let Some(vcns) = pager.next_page().await? {
//!     for vcn in vcns {
//!         // ...
//!     }
//! }
//! ```

use crate::error::Result;
use crate::traits::Page;
use std::future::Future;

/// Counters for one paginated listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageStats {
    /// Fetch calls that returned a page
    pub pages: usize,
    /// Items across all returned pages
    pub items: usize,
}

/// Drives a page-fetching closure until the provider stops returning cursors
pub struct Pager<F> {
    fetch: F,
    cursor: Option<String>,
    done: bool,
    stats: PageStats,
}

impl<T, F, Fut> Pager<F>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    /// Create a pager over a fetch closure
    ///
    /// The closure receives `None` on the first call and the previous page's
    /// cursor afterwards.
    pub fn new(fetch: F) -> Self {
        Self {
            fetch,
            cursor: None,
            done: false,
            stats: PageStats::default(),
        }
    }

    /// Fetch the next page
    ///
    /// # Returns
    ///
    /// - `Ok(Some(items))`: The items of the next page
    /// - `Ok(None)`: The previous page was the last one
    /// - `Err(Error)`: The fetch failed; the pager is exhausted
    pub async fn next_page(&mut self) -> Result<Option<Vec<T>>> {
        if self.done {
            return Ok(None);
        }

        let page = match (self.fetch)(self.cursor.take()).await {
            Ok(page) => page,
            Err(e) => {
                self.done = true;
                return Err(e);
            }
        };

        let next = page.next_cursor().map(str::to_owned);
        self.stats.pages += 1;
        self.stats.items += page.items.len();

        match next {
            Some(cursor) => self.cursor = Some(cursor),
            None => self.done = true,
        }

        Ok(Some(page.items))
    }

    /// Counters so far
    pub fn stats(&self) -> PageStats {
        self.stats
    }
}

/// Feed every item of every page to `visitor`
///
/// Propagates the first fetch error without visiting that page.
pub async fn paginate<T, F, Fut>(fetch: F, mut visitor: impl FnMut(T)) -> Result<PageStats>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut pager = Pager::new(fetch);
    while let Some(items) = pager.next_page().await? {
        items.into_iter().for_each(&mut visitor);
    }
    Ok(pager.stats())
}

/// Collect every item of every page
pub async fn collect_all<T, F, Fut>(fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut all = Vec::new();
    paginate(fetch, |item| all.push(item)).await?;
    Ok(all)
}
