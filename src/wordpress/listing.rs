use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::wordpress::client::WordpressClient;
use crate::wordpress::review::Review;

static TOPIC: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("ul.topic").expect("Invalid selector"));
static TOPIC_PERMALINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.bbp-topic-permalink").expect("Invalid selector"));
static NEXT_PAGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.next.page-numbers").expect("Invalid selector"));

/// One page of a plugin's reviews listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewListPage {
    /// Unloaded reviews in listing order.
    pub reviews: Vec<Review>,
    /// Whether the listing links to a following page.
    pub has_more_pages: bool,
}

impl ReviewListPage {
    #[must_use]
    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }
}

/// Path of the reviews listing page for `plugin`. Pages are 1-based.
#[must_use]
pub fn listing_path(plugin: &str, page: usize) -> String {
    if page == 1 {
        format!("/support/plugin/{plugin}/reviews/")
    } else {
        format!("/support/plugin/{plugin}/reviews/page/{page}/")
    }
}

/// Parse a listing page into unloaded reviews.
///
/// # Errors
///
/// Returns [`Error::InvalidPermalink`] if a topic has no permalink.
pub fn parse_listing(html: &str) -> Result<ReviewListPage> {
    let document = Html::parse_document(html);

    let reviews = document
        .select(&TOPIC)
        .map(|topic| {
            let href = topic
                .select(&TOPIC_PERMALINK)
                .next()
                .and_then(|link| link.value().attr("href"))
                .ok_or_else(|| Error::InvalidPermalink {
                    href: String::new(),
                })?;
            Review::from_url(href)
        })
        .collect::<Result<Vec<_>>>()?;

    let has_more_pages = document.select(&NEXT_PAGE).next().is_some();

    Ok(ReviewListPage {
        reviews,
        has_more_pages,
    })
}

/// Fetch and parse one listing page.
///
/// # Errors
///
/// Returns [`Error::Connection`] for a non-200 response.
pub async fn load_page(
    client: &WordpressClient,
    plugin: &str,
    page: usize,
) -> Result<ReviewListPage> {
    let path = listing_path(plugin, page);
    info!(plugin, page, path = %path, "Loading reviews page");

    let html = client.get_html(&path).await?;
    let listing = parse_listing(&html)?;

    debug!(
        plugin,
        page,
        reviews = listing.len(),
        has_more_pages = listing.has_more_pages,
        "Loaded reviews page"
    );
    Ok(listing)
}
