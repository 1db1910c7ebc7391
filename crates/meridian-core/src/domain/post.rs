use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Author shown when a post is saved without one.
pub const DEFAULT_AUTHOR: &str = "Meridian Team";

/// Publication state of a post.
///
/// `Archived` exists in the schema but no workflow moves a post into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
            PostStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            "archived" => Ok(PostStatus::Archived),
            other => Err(format!("unknown post status '{other}'")),
        }
    }
}

/// Post entity - a blog article as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    /// Author-controlled HTML, rendered as-is.
    pub content: String,
    pub featured_image_url: Option<String>,
    pub featured_image_alt: Option<String>,
    pub status: PostStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub author_name: String,
    /// Estimated minutes, at least 1 when set.
    pub read_time: Option<u32>,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new unsaved draft with generated ID and timestamps.
    pub fn new(title: String, slug: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            slug,
            excerpt: None,
            content,
            featured_image_url: None,
            featured_image_alt: None,
            status: PostStatus::Draft,
            published_at: None,
            author_name: DEFAULT_AUTHOR.to_string(),
            read_time: None,
            views: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }
}

/// A category or tag row as joined onto a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyTerm {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// A stored post together with its resolved categories and tags.
#[derive(Debug, Clone, PartialEq)]
pub struct PostRecord {
    pub post: Post,
    pub categories: Vec<TaxonomyTerm>,
    pub tags: Vec<TaxonomyTerm>,
}

impl PostRecord {
    pub fn bare(post: Post) -> Self {
        Self {
            post,
            categories: Vec::new(),
            tags: Vec::new(),
        }
    }
}
