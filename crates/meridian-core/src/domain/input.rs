//! Write-side payloads and the typed values they parse into.
//!
//! Handlers deserialize a loosely typed [`PostSubmission`] and must turn it
//! into a [`PostInput`] before anything reaches the store.

use serde::Deserialize;
use uuid::Uuid;

use super::post::{Post, PostStatus};
use crate::content::derive::is_valid_slug;
use crate::error::DomainError;

/// Post body as sent by the admin editor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostSubmission {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub featured_image_url: Option<String>,
    pub featured_image_alt: Option<String>,
    pub status: Option<String>,
    pub author_name: Option<String>,
    pub read_time: Option<u32>,
    pub categories: Option<Vec<String>>,
}

/// Validated post fields for create and update.
#[derive(Debug, Clone, PartialEq)]
pub struct PostInput {
    pub title: String,
    /// Manual slug override; derived from the title when absent.
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: String,
    pub featured_image_url: Option<String>,
    pub featured_image_alt: Option<String>,
    pub status: PostStatus,
    pub author_name: Option<String>,
    pub read_time: Option<u32>,
    /// `None` and `Some(vec![])` both leave associations alone on update.
    pub categories: Option<Vec<Uuid>>,
}

impl PostInput {
    /// Minimal input, mostly for tests and internal resubmission.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slug: None,
            excerpt: None,
            content: content.into(),
            featured_image_url: None,
            featured_image_alt: None,
            status: PostStatus::Draft,
            author_name: None,
            read_time: None,
            categories: None,
        }
    }

    pub fn with_status(mut self, status: PostStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_categories(mut self, categories: Vec<Uuid>) -> Self {
        self.categories = Some(categories);
        self
    }

    /// Rebuild an input that reproduces a stored post.
    pub fn from_post(post: &Post, categories: Vec<Uuid>) -> Self {
        Self {
            title: post.title.clone(),
            slug: Some(post.slug.clone()),
            excerpt: post.excerpt.clone(),
            content: post.content.clone(),
            featured_image_url: post.featured_image_url.clone(),
            featured_image_alt: post.featured_image_alt.clone(),
            status: post.status,
            author_name: Some(post.author_name.clone()),
            read_time: post.read_time,
            categories: Some(categories),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl TryFrom<PostSubmission> for PostInput {
    type Error = DomainError;

    fn try_from(raw: PostSubmission) -> Result<Self, Self::Error> {
        let title =
            non_blank(raw.title).ok_or_else(|| DomainError::validation("Title is required"))?;
        let content = raw
            .content
            .ok_or_else(|| DomainError::validation("Content is required"))?;

        let slug = non_blank(raw.slug);
        if let Some(slug) = &slug {
            if !is_valid_slug(slug) {
                return Err(DomainError::validation(
                    "Slug must contain only lowercase letters, numbers, and hyphens",
                ));
            }
        }

        let status = match non_blank(raw.status) {
            Some(s) => s.parse::<PostStatus>().map_err(DomainError::Validation)?,
            None => PostStatus::Draft,
        };

        if raw.read_time == Some(0) {
            return Err(DomainError::validation("Read time must be at least 1 minute"));
        }

        let categories = raw
            .categories
            .map(|ids| {
                ids.iter()
                    .map(|id| {
                        Uuid::parse_str(id.trim()).map_err(|_| {
                            DomainError::Validation(format!("Invalid category id '{id}'"))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        Ok(Self {
            title,
            slug,
            excerpt: non_blank(raw.excerpt),
            content,
            featured_image_url: non_blank(raw.featured_image_url),
            featured_image_alt: non_blank(raw.featured_image_alt),
            status,
            author_name: non_blank(raw.author_name),
            read_time: raw.read_time,
            categories,
        })
    }
}

/// Identifies a post for deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostLocator {
    Id(Uuid),
    Slug(String),
}

impl std::fmt::Display for PostLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostLocator::Id(id) => write!(f, "id {id}"),
            PostLocator::Slug(slug) => write!(f, "slug {slug}"),
        }
    }
}
