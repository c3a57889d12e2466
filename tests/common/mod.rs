//! Fixtures for WordPress.org listing and review pages served by wiremock.

#![allow(dead_code)]

use tap_wordpress_reviews::wordpress::{listing_path, WordpressClient};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Topic paths `/support/topic/{plugin}-review-{n}/` for `n` in `range`.
pub fn topic_paths(plugin: &str, range: std::ops::RangeInclusive<usize>) -> Vec<String> {
    range
        .map(|n| format!("/support/topic/{plugin}-review-{n}/"))
        .collect()
}

/// A reviews listing page linking to `paths`, optionally with a next-page link.
pub fn listing_html(paths: &[String], has_next: bool) -> String {
    let topics: String = paths
        .iter()
        .map(|p| {
            format!(
                r#"<ul class="topic odd"><li class="bbp-topic-title"><a class="bbp-topic-permalink" href="https://wordpress.org{p}">Review</a></li></ul>"#
            )
        })
        .collect();
    let next = if has_next {
        r#"<a class="next page-numbers" href="page/next/">&rarr;</a>"#
    } else {
        ""
    };
    format!(
        r#"<!DOCTYPE html><html><body><div class="bbp-topics">{topics}</div><div class="bbp-pagination">{next}</div></body></html>"#
    )
}

/// A review page titled `title`, posted on the given day of April 2024.
pub fn review_html(title: &str, day: u32) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<body>
  <h1 class="page-title">{title}</h1>
  <ul class="topic-tags"><li><a href="/tags/great">great</a></li></ul>
  <ul class="topic-info">
    <li class="reply-count">1 reply</li>
    <li class="voice-count">2 participants</li>
  </ul>
  <div class="topic">
    <a class="bbp-topic-permalink" href="/x/" title="April {day}, 2024 at 10:15 am">#</a>
    <span class="bbp-author-name">reviewer</span>
    <div class="wporg-ratings" title="4 out of 5 stars"></div>
    <div class="bbp-topic-content"><p>{title} body</p></div>
  </div>
  <div class="reply by-plugin-support-rep">
    <span class="bbp-author-name">support</span>
    <p class="bbp-reply-post-date"><a href="/r/" title="April {day}, 2024 at 11:00 am">#</a></p>
    <div class="bbp-reply-content"><p>Thanks for the review</p></div>
  </div>
</body>
</html>"#
    )
}

pub async fn mount_listing(
    server: &MockServer,
    plugin: &str,
    page: usize,
    paths: &[String],
    has_next: bool,
    expected_calls: u64,
) {
    Mock::given(method("GET"))
        .and(path(listing_path(plugin, page)))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(listing_html(paths, has_next), "text/html"),
        )
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// Serve a review page for every path; day of month cycles 1..=28.
pub async fn mount_reviews(server: &MockServer, paths: &[String]) {
    for (i, p) in paths.iter().enumerate() {
        let day = (i % 28) as u32 + 1;
        Mock::given(method("GET"))
            .and(path(p.as_str()))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(review_html(p, day), "text/html"),
            )
            .mount(server)
            .await;
    }
}

pub fn client_for(server: &MockServer) -> WordpressClient {
    WordpressClient::new(&server.uri()).expect("Failed to build client")
}

/// Paths of every request the server received, in order.
pub async fn requested_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect()
}
