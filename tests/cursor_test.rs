//! Integration tests for the review cursor against a mock WordPress.org.

mod common;

use common::{client_for, mount_listing, mount_reviews, requested_paths, topic_paths};
use tap_wordpress_reviews::wordpress::{listing_path, Advance, CursorState, ReviewCursor};
use tap_wordpress_reviews::Error;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn expect_review(cursor: &mut ReviewCursor) -> String {
    match cursor.advance().await.expect("advance failed") {
        Advance::Review(review) => {
            assert!(review.is_loaded());
            review.path().to_string()
        }
        Advance::Exhausted => panic!("cursor exhausted at index {}", cursor.next_index()),
    }
}

#[tokio::test]
async fn test_full_first_page_in_listing_order() {
    let server = MockServer::start().await;
    let paths = topic_paths("akismet", 1..=30);
    mount_listing(&server, "akismet", 1, &paths, true, 1).await;
    mount_reviews(&server, &paths).await;

    let mut cursor = ReviewCursor::new(client_for(&server), "akismet");
    assert_eq!(cursor.state(), CursorState::Idle);

    let mut seen = Vec::new();
    for _ in 0..30 {
        seen.push(expect_review(&mut cursor).await);
    }

    assert_eq!(seen, paths);
    assert_eq!(cursor.next_index(), 31);
    assert_eq!(cursor.cached_pages(), 1);
    assert_eq!(cursor.state(), CursorState::PageLoaded(1));
}

#[tokio::test]
async fn test_loaded_review_fields() {
    let server = MockServer::start().await;
    let paths = topic_paths("akismet", 1..=1);
    mount_listing(&server, "akismet", 1, &paths, false, 1).await;
    mount_reviews(&server, &paths).await;

    let mut cursor = ReviewCursor::new(client_for(&server), "akismet");
    let Advance::Review(review) = cursor.advance().await.unwrap() else {
        panic!("expected a review");
    };

    assert_eq!(review.title.as_deref(), Some("/support/topic/akismet-review-1/"));
    assert_eq!(review.date.as_deref(), Some("2024-04-01T10:15:00+00:00"));
    assert_eq!(review.tag(1), Some("great"));
    assert_eq!(review.rating, Some(4));
    assert_eq!(review.author.as_deref(), Some("reviewer"));
    assert_eq!(review.replies, Some(1));
    assert_eq!(review.participants, Some(2));
    assert_eq!(review.support.as_deref(), Some("support"));
    assert_eq!(review.support_comment.as_deref(), Some("Thanks for the review"));
    assert_eq!(review.comments.len(), 1);
}

#[tokio::test]
async fn test_short_last_page_boundary() {
    let server = MockServer::start().await;
    let first = topic_paths("akismet", 1..=30);
    let last = topic_paths("akismet", 31..=35);
    mount_listing(&server, "akismet", 1, &first, true, 1).await;
    mount_listing(&server, "akismet", 2, &last, false, 1).await;
    mount_listing(&server, "akismet", 3, &[], false, 0).await;
    mount_reviews(&server, &first).await;
    mount_reviews(&server, &last).await;

    let mut cursor = ReviewCursor::new(client_for(&server), "akismet");
    let mut seen = Vec::new();
    for _ in 0..35 {
        seen.push(expect_review(&mut cursor).await);
    }

    assert_eq!(seen[30..], last[..]);
    assert_eq!(cursor.next_index(), 36);
    assert_eq!(cursor.advance().await.unwrap(), Advance::Exhausted);
    assert_eq!(cursor.state(), CursorState::Exhausted);
}

#[tokio::test]
async fn test_exhaustion_is_stable() {
    let server = MockServer::start().await;
    let paths = topic_paths("tiny", 1..=2);
    mount_listing(&server, "tiny", 1, &paths, false, 1).await;
    mount_reviews(&server, &paths).await;

    let mut cursor = ReviewCursor::new(client_for(&server), "tiny");
    expect_review(&mut cursor).await;
    expect_review(&mut cursor).await;

    for _ in 0..5 {
        assert_eq!(cursor.advance().await.unwrap(), Advance::Exhausted);
    }
    assert_eq!(cursor.next_index(), 3);

    let requests = requested_paths(&server).await;
    assert_eq!(
        requests,
        vec![
            listing_path("tiny", 1),
            paths[0].clone(),
            paths[1].clone(),
        ]
    );
}

#[tokio::test]
async fn test_full_last_page_fetches_following_page() {
    let server = MockServer::start().await;
    let paths = topic_paths("exact", 1..=30);
    mount_listing(&server, "exact", 1, &paths, false, 1).await;
    mount_listing(&server, "exact", 2, &[], false, 1).await;
    mount_reviews(&server, &paths).await;

    let mut cursor = ReviewCursor::new(client_for(&server), "exact");
    for _ in 0..30 {
        expect_review(&mut cursor).await;
    }

    // Index 31 on an empty page 2: offset 31 - 60 + 30 = 1.
    assert_eq!(cursor.advance().await.unwrap(), Advance::Exhausted);
    assert_eq!(cursor.cached_pages(), 2);
    assert_eq!(cursor.advance().await.unwrap(), Advance::Exhausted);

    let requests = requested_paths(&server).await;
    assert_eq!(requests.last(), Some(&listing_path("exact", 2)));
    assert_eq!(requests.len(), 32);
}

#[tokio::test]
async fn test_full_last_page_then_missing_page_is_connection_error() {
    let server = MockServer::start().await;
    let paths = topic_paths("exact", 1..=30);
    mount_listing(&server, "exact", 1, &paths, false, 1).await;
    mount_reviews(&server, &paths).await;
    Mock::given(method("GET"))
        .and(path(listing_path("exact", 2)))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let mut cursor = ReviewCursor::new(client_for(&server), "exact");
    for _ in 0..30 {
        expect_review(&mut cursor).await;
    }

    let err = cursor.advance().await.unwrap_err();
    assert!(matches!(err, Error::Connection { status: 404, .. }));
    assert_eq!(cursor.next_index(), 31);
}

#[tokio::test]
async fn test_empty_listing_is_exhausted() {
    let server = MockServer::start().await;
    mount_listing(&server, "nothing", 1, &[], false, 1).await;

    let mut cursor = ReviewCursor::new(client_for(&server), "nothing");
    assert_eq!(cursor.advance().await.unwrap(), Advance::Exhausted);
    assert_eq!(cursor.advance().await.unwrap(), Advance::Exhausted);
    assert_eq!(cursor.next_index(), 1);
}

#[tokio::test]
async fn test_listing_not_found_is_connection_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/support/plugin/missing/reviews/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut cursor = ReviewCursor::new(client_for(&server), "missing");
    let err = cursor.advance().await.unwrap_err();

    assert!(err.is_connection());
    assert!(matches!(err, Error::Connection { status: 404, .. }));
}

#[tokio::test]
async fn test_review_page_error_is_fatal() {
    let server = MockServer::start().await;
    let paths = topic_paths("broken", 1..=2);
    mount_listing(&server, "broken", 1, &paths, false, 1).await;
    Mock::given(method("GET"))
        .and(path(paths[0].as_str()))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut cursor = ReviewCursor::new(client_for(&server), "broken");
    let err = cursor.advance().await.unwrap_err();

    assert!(matches!(err, Error::Connection { status: 503, .. }));
    assert_eq!(cursor.next_index(), 1);
}

#[tokio::test]
async fn test_review_without_content_block_is_fatal() {
    let server = MockServer::start().await;
    let paths = topic_paths("bare", 1..=1);
    mount_listing(&server, "bare", 1, &paths, false, 1).await;
    Mock::given(method("GET"))
        .and(path(paths[0].as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<html><body><h1 class="page-title">Gone</h1></body></html>"#,
            "text/html",
        ))
        .mount(&server)
        .await;

    let mut cursor = ReviewCursor::new(client_for(&server), "bare");
    let err = cursor.advance().await.unwrap_err();

    match err {
        Error::MissingContent { path } => assert_eq!(path, paths[0]),
        other => panic!("unexpected error: {other}"),
    }
}
