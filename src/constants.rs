//! Shared constants used across the application.

/// Default origin for every WordPress.org request.
pub const WORDPRESS_BASE_URL: &str = "https://wordpress.org";

/// Number of topics shown on one reviews listing page.
pub const REVIEWS_PER_PAGE: usize = 30;

/// Default number of reviews pulled per plugin.
pub const DEFAULT_REVIEWS_NUMBER: usize = 30;

/// Format of the `title` attribute on post permalinks,
/// e.g. `April 3, 2024 at 10:15 am`.
pub const POST_DATE_FORMAT: &str = "%B %d, %Y at %I:%M %p";

/// Name of the only stream this tap produces.
pub const REVIEWS_STREAM: &str = "reviews";
