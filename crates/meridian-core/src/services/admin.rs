//! Admin write workflow: create, update, publish and delete posts.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::content::AdminPostSummary;
use crate::content::derive::{
    DEFAULT_EXCERPT_LENGTH, DEFAULT_WORDS_PER_MINUTE, calculate_read_time, generate_excerpt,
    generate_slug,
};
use crate::domain::{DEFAULT_AUTHOR, Post, PostInput, PostLocator, PostRecord, PostStatus};
use crate::error::{DomainError, RepoError};
use crate::ports::AdminStore;

/// A post as loaded into the editor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminPostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub categories: Vec<Uuid>,
}

impl From<PostRecord> for AdminPostDetail {
    fn from(record: PostRecord) -> Self {
        Self {
            categories: record.categories.iter().map(|c| c.id).collect(),
            post: record.post,
        }
    }
}

fn write_error(err: RepoError) -> DomainError {
    match err {
        RepoError::Constraint(_) => {
            DomainError::Duplicate("A post with this slug already exists".to_string())
        }
        other => DomainError::Storage(other),
    }
}

/// Fields every save derives the same way.
struct Derived {
    slug: String,
    excerpt: Option<String>,
    read_time: u32,
    author_name: String,
}

fn derive_fields(input: &PostInput) -> Result<Derived, DomainError> {
    let slug = match &input.slug {
        Some(slug) => slug.clone(),
        None => generate_slug(&input.title),
    };
    if slug.is_empty() {
        return Err(DomainError::validation(
            "Title must contain letters or numbers to derive a slug",
        ));
    }

    let excerpt = input
        .excerpt
        .clone()
        .unwrap_or_else(|| generate_excerpt(&input.content, DEFAULT_EXCERPT_LENGTH));

    Ok(Derived {
        slug,
        excerpt: Some(excerpt).filter(|e| !e.is_empty()),
        read_time: input
            .read_time
            .unwrap_or_else(|| calculate_read_time(&input.content, DEFAULT_WORDS_PER_MINUTE)),
        author_name: input
            .author_name
            .clone()
            .unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
    })
}

/// Admin-side post management.
#[derive(Clone)]
pub struct AdminWorkflow {
    store: Arc<dyn AdminStore>,
}

impl AdminWorkflow {
    pub fn new(store: Arc<dyn AdminStore>) -> Self {
        Self { store }
    }

    /// Every post, drafts included, in listing form.
    pub async fn list_posts(&self) -> Result<Vec<AdminPostSummary>, DomainError> {
        let records = self.store.list_all_posts().await?;
        Ok(records.into_iter().map(AdminPostSummary::from).collect())
    }

    /// Every post as stored, for the cleanup screen.
    pub async fn list_all_posts(&self) -> Result<Vec<Post>, DomainError> {
        let records = self.store.list_all_posts().await?;
        Ok(records.into_iter().map(|r| r.post).collect())
    }

    pub async fn get_post(&self, id: Uuid) -> Result<AdminPostDetail, DomainError> {
        self.store
            .find_post(id)
            .await?
            .map(AdminPostDetail::from)
            .ok_or_else(|| DomainError::not_found("post", id))
    }

    pub async fn create_post(&self, input: PostInput) -> Result<Post, DomainError> {
        let derived = derive_fields(&input)?;

        let mut post = Post::new(input.title, derived.slug, input.content);
        post.excerpt = derived.excerpt;
        post.featured_image_url = input.featured_image_url;
        post.featured_image_alt = input.featured_image_alt;
        post.status = input.status;
        post.published_at = (input.status == PostStatus::Published).then_some(post.created_at);
        post.author_name = derived.author_name;
        post.read_time = Some(derived.read_time);

        let saved = self.store.insert_post(post).await.map_err(write_error)?;

        if let Some(category_ids) = input.categories.filter(|ids| !ids.is_empty()) {
            self.store
                .replace_post_categories(saved.id, &category_ids)
                .await?;
        }

        tracing::info!(
            post_id = %saved.id,
            slug = %saved.slug,
            status = %saved.status,
            "Post created"
        );
        Ok(saved)
    }

    /// Full replace of the post's fields.
    ///
    /// A non-empty category list replaces the associations; an empty or
    /// missing one leaves them as they are.
    pub async fn update_post(&self, id: Uuid, input: PostInput) -> Result<Post, DomainError> {
        self.apply_update(id, input, None).await
    }

    /// Quick-publish: resubmit the stored post as published, stamped now.
    pub async fn publish(&self, id: Uuid) -> Result<Post, DomainError> {
        let record = self
            .store
            .find_post(id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", id))?;
        let categories = record.categories.iter().map(|c| c.id).collect();
        let input =
            PostInput::from_post(&record.post, categories).with_status(PostStatus::Published);

        self.apply_update(id, input, Some(Utc::now())).await
    }

    pub async fn delete_post(&self, locator: PostLocator) -> Result<(), DomainError> {
        match self.store.delete_post(&locator).await {
            Ok(()) => {
                tracing::info!(post = %locator, "Post deleted");
                Ok(())
            }
            Err(RepoError::NotFound) => Err(DomainError::not_found("post", &locator)),
            Err(e) => Err(e.into()),
        }
    }

    async fn apply_update(
        &self,
        id: Uuid,
        input: PostInput,
        published_at_override: Option<DateTime<Utc>>,
    ) -> Result<Post, DomainError> {
        let existing = self
            .store
            .find_post(id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", id))?
            .post;

        let derived = derive_fields(&input)?;
        let now = Utc::now();

        let published_at = match input.status {
            PostStatus::Published => published_at_override
                .or(existing.published_at.filter(|_| existing.is_published()))
                .or(Some(now)),
            PostStatus::Draft | PostStatus::Archived => None,
        };

        let post = Post {
            id,
            title: input.title,
            slug: derived.slug,
            excerpt: derived.excerpt,
            content: input.content,
            featured_image_url: input.featured_image_url,
            featured_image_alt: input.featured_image_alt,
            status: input.status,
            published_at,
            author_name: derived.author_name,
            read_time: Some(derived.read_time),
            views: existing.views,
            created_at: existing.created_at,
            updated_at: now,
        };

        let saved = self.store.update_post(post).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("post", id),
            other => write_error(other),
        })?;

        if let Some(category_ids) = input.categories.filter(|ids| !ids.is_empty()) {
            self.store.replace_post_categories(id, &category_ids).await?;
        }

        tracing::info!(post_id = %id, status = %saved.status, "Post updated");
        Ok(saved)
    }
}
