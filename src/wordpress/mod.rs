//! WordPress.org support-forum scraping: listing pages, review pages and
//! the cursor that walks them.

pub mod client;
pub mod cursor;
pub mod extract;
pub mod listing;
pub mod review;
pub mod reviews;

pub use client::WordpressClient;
pub use cursor::{Advance, CursorState, ReviewCursor};
pub use extract::{extract_review, parse_post_date, ReviewFields};
pub use listing::{listing_path, load_page, parse_listing, ReviewListPage};
pub use review::{Reply, Review};
pub use reviews::WordpressReviews;
