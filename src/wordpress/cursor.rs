//! Forward-only cursor over one plugin's reviews.
//!
//! The reviews listing has no API, only HTML pages of [`REVIEWS_PER_PAGE`]
//! topics. The cursor maps a 1-based global review index onto a listing
//! page and a position inside it, fetching each listing page once and each
//! review page when it is consumed.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::constants::REVIEWS_PER_PAGE;
use crate::error::Result;
use crate::wordpress::client::WordpressClient;
use crate::wordpress::listing::{load_page, ReviewListPage};
use crate::wordpress::review::Review;

/// Outcome of [`ReviewCursor::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::large_enum_variant)]
pub enum Advance {
    /// The next review, already loaded.
    Review(Review),
    /// No review exists at the current index. Every later call returns
    /// this as well.
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    Idle,
    PageLoaded(usize),
    Exhausted,
}

/// Listing page holding the review with global index `index` (1-based).
#[must_use]
pub fn page_for_index(index: usize) -> usize {
    index.div_ceil(REVIEWS_PER_PAGE)
}

/// Position of review `index` inside `page`, given the page's real size.
///
/// The offset is counted back from the end of the page. A page shorter than
/// a full page is assumed to be the last one and the offset is shifted by
/// the missing count; a positive offset means no review exists there.
#[must_use]
pub fn position_in_page(index: usize, page: usize, page_len: usize) -> Option<usize> {
    let mut offset = index as i64 - (page * REVIEWS_PER_PAGE) as i64;
    if page_len < REVIEWS_PER_PAGE {
        offset += (REVIEWS_PER_PAGE - page_len) as i64;
    }
    if offset > 0 {
        return None;
    }
    usize::try_from(page_len as i64 + offset - 1).ok()
}

/// Lazy cursor over the reviews of a single plugin.
#[derive(Debug)]
pub struct ReviewCursor {
    client: WordpressClient,
    plugin: String,
    next_index: usize,
    pages: HashMap<usize, ReviewListPage>,
    state: CursorState,
}

impl ReviewCursor {
    #[must_use]
    pub fn new(client: WordpressClient, plugin: impl Into<String>) -> Self {
        Self {
            client,
            plugin: plugin.into(),
            next_index: 1,
            pages: HashMap::new(),
            state: CursorState::Idle,
        }
    }

    #[must_use]
    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    /// Global index of the review the next [`advance`](Self::advance) returns.
    #[must_use]
    pub fn next_index(&self) -> usize {
        self.next_index
    }

    #[must_use]
    pub fn state(&self) -> CursorState {
        self.state
    }

    /// Number of listing pages fetched so far.
    #[must_use]
    pub fn cached_pages(&self) -> usize {
        self.pages.len()
    }

    /// Load and return the next review, or report exhaustion.
    ///
    /// # Errors
    ///
    /// Any failed fetch or fatal parse error is returned as is; the cursor
    /// does not retry.
    pub async fn advance(&mut self) -> Result<Advance> {
        if self.state == CursorState::Exhausted {
            return Ok(Advance::Exhausted);
        }

        let index = self.next_index;
        let page = page_for_index(index);

        if !self.pages.contains_key(&page) {
            let listing = load_page(&self.client, &self.plugin, page).await?;
            self.pages.insert(page, listing);
            self.state = CursorState::PageLoaded(page);
        }

        let Some(listing) = self.pages.get(&page) else {
            return Ok(self.exhaust(index));
        };
        let Some(position) = position_in_page(index, page, listing.len()) else {
            return Ok(self.exhaust(index));
        };
        let Some(entry) = listing.reviews.get(position) else {
            return Ok(self.exhaust(index));
        };

        let mut review = entry.clone();
        review.load(&self.client).await?;
        self.next_index += 1;

        debug!(plugin = %self.plugin, index, page, position, "Advanced review cursor");
        Ok(Advance::Review(review))
    }

    fn exhaust(&mut self, index: usize) -> Advance {
        info!(plugin = %self.plugin, index, "No more reviews");
        self.state = CursorState::Exhausted;
        Advance::Exhausted
    }
}
