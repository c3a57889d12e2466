use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};
use url::Url;

use crate::constants::WORDPRESS_BASE_URL;
use crate::error::{Error, Result};
use crate::wordpress::client::WordpressClient;
use crate::wordpress::extract::{extract_review, ReviewFields};

/// A reply posted in a review thread.
///
/// Keys whose source element is missing are left out of the serialized
/// form entirely. `date` is `Some(None)` when the date anchor exists but
/// its text could not be parsed, which serializes as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reply {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<Option<String>>,
}

/// A single plugin review, identified by the path of its support topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Review {
    path: String,
    #[serde(skip)]
    loaded: bool,
    pub title: Option<String>,
    pub date: Option<String>,
    pub tags: Vec<String>,
    pub rating: Option<u8>,
    pub author: Option<String>,
    pub text: Option<String>,
    pub replies: Option<u32>,
    pub participants: Option<u32>,
    pub comments: Vec<Reply>,
    pub support: Option<String>,
    pub support_comment: Option<String>,
}

impl Review {
    /// Create an unloaded review for a topic path such as
    /// `/support/topic/great-plugin/`.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            loaded: false,
            title: None,
            date: None,
            tags: Vec::new(),
            rating: None,
            author: None,
            text: None,
            replies: None,
            participants: None,
            comments: Vec::new(),
            support: None,
            support_comment: None,
        }
    }

    /// Create an unloaded review from a permalink, keeping only its path.
    ///
    /// Relative permalinks are resolved against WordPress.org.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPermalink`] if `href` is not a usable URL.
    pub fn from_url(href: &str) -> Result<Self> {
        let invalid = || Error::InvalidPermalink {
            href: href.to_string(),
        };
        let base = Url::parse(WORDPRESS_BASE_URL).map_err(|_| invalid())?;
        let url = base.join(href).map_err(|_| invalid())?;
        Ok(Self::new(url.path()))
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Fetch the review page and fill in every extracted field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] for a non-200 response and
    /// [`Error::MissingContent`] if the page has no topic content block.
    pub async fn load(&mut self, client: &WordpressClient) -> Result<()> {
        info!(path = %self.path, "Loading review");

        let html = client.get_html(&self.path).await?;
        let fields = extract_review(&html).map_err(|_| Error::MissingContent {
            path: self.path.clone(),
        })?;
        self.apply(fields);
        self.loaded = true;

        debug!(path = %self.path, "Loaded review");
        Ok(())
    }

    fn apply(&mut self, fields: ReviewFields) {
        self.title = fields.title;
        self.date = fields.date;
        self.tags = fields.tags.unwrap_or_default();
        self.rating = fields.rating;
        self.author = fields.author;
        self.text = fields.text;
        self.replies = fields.replies;
        self.participants = fields.participants;
        self.comments = fields.comments.unwrap_or_default();
        self.support = fields.support;
        self.support_comment = fields.support_comment;
    }

    /// Serialize the review into a flat record.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_map(&self) -> Result<Map<String, Value>> {
        into_record(serde_json::to_value(self)?)
    }

    /// The 1-based `number`th tag, if there is one.
    #[must_use]
    pub fn tag(&self, number: usize) -> Option<&str> {
        let index = number.checked_sub(1)?;
        self.tags.get(index).map(String::as_str)
    }
}

fn or_none<T: fmt::Display>(value: Option<&T>) -> String {
    value.map_or_else(|| "None".to_string(), ToString::to_string)
}

impl fmt::Display for Review {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.path)?;
        writeln!(f, "{}", or_none(self.title.as_ref()))?;
        writeln!(f, "{}", or_none(self.date.as_ref()))?;
        writeln!(f, "Tags: {}", self.tags.join(", "))?;
        writeln!(f, "{} stars", or_none(self.rating.as_ref()))?;
        writeln!(f, "by {}", or_none(self.author.as_ref()))?;
        writeln!(f, "{}", or_none(self.text.as_ref()))?;
        writeln!(f, "Replies: {}", or_none(self.replies.as_ref()))?;
        writeln!(f, "Participants: {}", or_none(self.participants.as_ref()))?;
        writeln!(f, "Support: {}", or_none(self.support.as_ref()))?;
        write!(
            f,
            "Support comment: {}",
            or_none(self.support_comment.as_ref())
        )
    }
}

fn into_record(value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::Json(serde::ser::Error::custom(format!(
            "review serialized to a non-object: {other}"
        )))),
    }
}
