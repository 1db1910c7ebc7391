use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, Post, PostLocator, PostRecord};
use crate::error::RepoError;

/// Store-level filter for published listings.
///
/// Category filtering is deliberately absent: it happens after the fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishedQuery {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    /// Case-insensitive substring matched against title or content.
    pub search: Option<String>,
}

/// Read access to blog content, as used by the public site.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Published posts, newest publication first. Posts without a
    /// publication time are never returned.
    async fn list_published(&self, query: &PublishedQuery) -> Result<Vec<PostRecord>, RepoError>;

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError>;

    /// Bump the view counter of the post with this slug.
    async fn increment_views(&self, slug: &str) -> Result<(), RepoError>;

    /// All categories with the number of join rows pointing at each.
    async fn list_categories(&self) -> Result<Vec<Category>, RepoError>;

    async fn list_published_slugs(&self) -> Result<Vec<String>, RepoError>;

    async fn category_ids_for_post(&self, post_id: Uuid) -> Result<Vec<Uuid>, RepoError>;

    /// Published posts in any of `category_ids`, excluding `exclude`, in
    /// whatever order the store yields them.
    async fn list_published_in_categories(
        &self,
        category_ids: &[Uuid],
        exclude: Uuid,
        limit: u64,
    ) -> Result<Vec<PostRecord>, RepoError>;
}

/// Write access for the admin dashboard. Implementations may connect with
/// elevated credentials.
#[async_trait]
pub trait AdminStore: Send + Sync {
    /// Every post regardless of status, newest first.
    async fn list_all_posts(&self) -> Result<Vec<PostRecord>, RepoError>;

    async fn find_post(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError>;

    async fn insert_post(&self, post: Post) -> Result<Post, RepoError>;

    /// Replace every mutable field of an existing post. `views` and
    /// `created_at` are left as stored.
    async fn update_post(&self, post: Post) -> Result<Post, RepoError>;

    /// Atomically make `category_ids` the complete association set of the
    /// post. Duplicate ids collapse to one row.
    async fn replace_post_categories(
        &self,
        post_id: Uuid,
        category_ids: &[Uuid],
    ) -> Result<(), RepoError>;

    /// Hard delete. Returns [`RepoError::NotFound`] when nothing matched.
    async fn delete_post(&self, locator: &PostLocator) -> Result<(), RepoError>;
}
