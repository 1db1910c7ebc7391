//! Mapping from stored post records to the view model every read path serves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{PostRecord, PostStatus};

/// Shown when a post has no stored read time.
pub const DEFAULT_READ_TIME_LABEL: &str = "5 min read";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturedImage {
    pub url: String,
    pub alt: String,
}

/// Flattened post as rendered by the site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    /// Publication time, or creation time for posts never published.
    pub date: DateTime<Utc>,
    pub author: String,
    pub featured_image: Option<FeaturedImage>,
    /// Category slugs.
    pub categories: Vec<String>,
    /// Tag slugs.
    pub tags: Vec<String>,
    pub read_time: String,
    pub views: i64,
}

impl PostView {
    pub fn in_category(&self, category_slug: &str) -> bool {
        self.categories.iter().any(|c| c == category_slug)
    }
}

impl From<PostRecord> for PostView {
    fn from(record: PostRecord) -> Self {
        let PostRecord {
            post,
            categories,
            tags,
        } = record;

        let featured_image = post.featured_image_url.map(|url| FeaturedImage {
            url,
            alt: post
                .featured_image_alt
                .unwrap_or_else(|| post.title.clone()),
        });

        Self {
            id: post.id,
            slug: post.slug,
            excerpt: post.excerpt.unwrap_or_default(),
            content: post.content,
            date: post.published_at.unwrap_or(post.created_at),
            author: post.author_name,
            featured_image,
            categories: categories.into_iter().map(|c| c.slug).collect(),
            tags: tags.into_iter().map(|t| t.slug).collect(),
            read_time: post
                .read_time
                .map(|minutes| format!("{minutes} min read"))
                .unwrap_or_else(|| DEFAULT_READ_TIME_LABEL.to_string()),
            views: post.views,
            title: post.title,
        }
    }
}

/// Admin listing row: the public view plus the publication state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminPostSummary {
    #[serde(flatten)]
    pub view: PostView,
    pub status: PostStatus,
}

impl From<PostRecord> for AdminPostSummary {
    fn from(record: PostRecord) -> Self {
        let status = record.post.status;
        Self {
            view: record.into(),
            status,
        }
    }
}
