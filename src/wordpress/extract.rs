//! Field extraction from a single WordPress.org review (support topic) page.
//!
//! Every field is looked up independently by CSS class. A missing fragment
//! leaves its field empty; the only hard failure is a page without the
//! topic content block, which callers surface as a fatal error.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

use crate::constants::POST_DATE_FORMAT;
use crate::wordpress::review::Reply;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("Invalid selector")
}

static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("h1.page-title"));
static PERMALINK: LazyLock<Selector> = LazyLock::new(|| selector("a.bbp-topic-permalink"));
static TAG_LIST: LazyLock<Selector> = LazyLock::new(|| selector("ul.topic-tags"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a"));
static RATINGS: LazyLock<Selector> = LazyLock::new(|| selector("div.wporg-ratings"));
static AUTHOR_NAME: LazyLock<Selector> = LazyLock::new(|| selector("span.bbp-author-name"));
static TOPIC_CONTENT: LazyLock<Selector> = LazyLock::new(|| selector("div.bbp-topic-content"));
static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| selector("p"));
static REPLY_COUNT: LazyLock<Selector> = LazyLock::new(|| selector("li.reply-count"));
static VOICE_COUNT: LazyLock<Selector> = LazyLock::new(|| selector("li.voice-count"));
static REPLY: LazyLock<Selector> = LazyLock::new(|| selector("div.reply"));
static REPLY_CONTENT: LazyLock<Selector> = LazyLock::new(|| selector("div.bbp-reply-content"));
static REPLY_POST_DATE: LazyLock<Selector> = LazyLock::new(|| selector("p.bbp-reply-post-date"));
static SUPPORT_REP: LazyLock<Selector> = LazyLock::new(|| selector("div.by-plugin-support-rep"));

/// The page has no `div.bbp-topic-content` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("topic content block not found")]
pub struct MissingTopicContent;

/// Fields extracted from one review page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewFields {
    pub title: Option<String>,
    pub date: Option<String>,
    pub tags: Option<Vec<String>>,
    pub rating: Option<u8>,
    pub author: Option<String>,
    pub text: Option<String>,
    pub replies: Option<u32>,
    pub participants: Option<u32>,
    pub comments: Option<Vec<Reply>>,
    pub support: Option<String>,
    pub support_comment: Option<String>,
}

/// Extract all review fields from a review page.
///
/// # Errors
///
/// Returns [`MissingTopicContent`] if the page has no topic content block.
pub fn extract_review(html: &str) -> Result<ReviewFields, MissingTopicContent> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    Ok(ReviewFields {
        title: first_text(root, &TITLE),
        date: find_date(root),
        tags: find_tags(root),
        rating: find_rating(root),
        author: first_text(root, &AUTHOR_NAME),
        text: find_text(root)?,
        replies: leading_number(root, &REPLY_COUNT),
        participants: leading_number(root, &VOICE_COUNT),
        comments: find_replies(root),
        support: find_support(root),
        support_comment: find_support_comment(root),
    })
}

/// Parse a permalink `title` such as `April 3, 2024 at 10:15 am` into an
/// RFC 3339 UTC timestamp. Returns `None` if the text does not match.
#[must_use]
pub fn parse_post_date(text: &str) -> Option<String> {
    NaiveDateTime::parse_from_str(text.trim(), POST_DATE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc().to_rfc3339())
}

/// Concatenated text of an element and its descendants.
fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Paragraph texts inside `block`, in document order.
fn paragraphs(block: ElementRef<'_>) -> Vec<String> {
    block.select(&PARAGRAPH).map(element_text).collect()
}

fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope.select(selector).next().map(element_text)
}

fn find_date(root: ElementRef<'_>) -> Option<String> {
    let permalink = root.select(&PERMALINK).next()?;
    parse_post_date(permalink.value().attr("title").unwrap_or_default())
}

fn find_tags(root: ElementRef<'_>) -> Option<Vec<String>> {
    let list = root.select(&TAG_LIST).next()?;
    Some(list.select(&ANCHOR).map(element_text).collect())
}

/// Only the first character of the widget title counts, so
/// `"5 out of 5 stars"` yields 5.
fn find_rating(root: ElementRef<'_>) -> Option<u8> {
    let widget = root.select(&RATINGS).next()?;
    let title = widget.value().attr("title")?;
    let digit = title.chars().next()?.to_digit(10)?;
    u8::try_from(digit).ok()
}

fn find_text(root: ElementRef<'_>) -> Result<Option<String>, MissingTopicContent> {
    let content = root.select(&TOPIC_CONTENT).next().ok_or(MissingTopicContent)?;
    let texts = paragraphs(content);
    if texts.is_empty() {
        return Ok(None);
    }
    Ok(Some(texts.join("\n")))
}

/// Leading integer of a counter such as `<li class="reply-count">3 replies</li>`.
fn leading_number(root: ElementRef<'_>, selector: &Selector) -> Option<u32> {
    let text = first_text(root, selector)?;
    let trimmed = text.trim();
    let token = trimmed.split_once(' ').map_or(trimmed, |(head, _)| head);
    token.parse().ok()
}

fn find_replies(root: ElementRef<'_>) -> Option<Vec<Reply>> {
    let replies: Vec<Reply> = root.select(&REPLY).map(parse_reply).collect();
    if replies.is_empty() {
        None
    } else {
        Some(replies)
    }
}

fn parse_reply(block: ElementRef<'_>) -> Reply {
    let author = first_text(block, &AUTHOR_NAME);
    let comment = block
        .select(&REPLY_CONTENT)
        .next()
        .map(|content| paragraphs(content).join("\n"));

    // A date anchor with an unreadable title still produces a `date: null` entry.
    let date = block
        .select(&REPLY_POST_DATE)
        .next()
        .and_then(|post_date| post_date.select(&ANCHOR).next())
        .map(|anchor| parse_post_date(anchor.value().attr("title").unwrap_or_default()));

    Reply {
        author,
        comment,
        date,
    }
}

fn find_support(root: ElementRef<'_>) -> Option<String> {
    let support = root.select(&SUPPORT_REP).next()?;
    first_text(support, &AUTHOR_NAME)
}

fn find_support_comment(root: ElementRef<'_>) -> Option<String> {
    let support = root.select(&SUPPORT_REP).next()?;
    let content = support.select(&REPLY_CONTENT).next()?;
    Some(paragraphs(content).join("\n"))
}
