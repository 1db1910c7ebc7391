//! Public read operations over the content store.

use std::sync::Arc;

use uuid::Uuid;

use crate::content::PostView;
use crate::domain::Category;
use crate::error::FetchError;
use crate::ports::{ContentStore, PublishedQuery};

/// Default number of related posts shown under an article.
pub const DEFAULT_RELATED_LIMIT: u64 = 3;

/// Filters accepted by [`ContentRepository::list_published`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPublishedParams {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    /// Category slug, matched against the transformed posts.
    pub category: Option<String>,
    pub search: Option<String>,
}

/// Read-only view of the blog used by the public site.
#[derive(Clone)]
pub struct ContentRepository {
    store: Arc<dyn ContentStore>,
}

impl ContentRepository {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Published posts, newest first.
    ///
    /// `limit` and `offset` apply at the store; the category filter runs on
    /// the page that comes back, so a category page can come up short or
    /// empty even when matching posts exist further down.
    pub async fn list_published(
        &self,
        params: &ListPublishedParams,
    ) -> Result<Vec<PostView>, FetchError> {
        let query = PublishedQuery {
            limit: params.limit,
            offset: params.offset,
            search: params
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        };

        let records = self
            .store
            .list_published(&query)
            .await
            .map_err(|e| FetchError::new("list published posts", e))?;

        let views = records.into_iter().map(PostView::from);
        Ok(match params.category.as_deref() {
            Some(category) => views.filter(|v| v.in_category(category)).collect(),
            None => views.collect(),
        })
    }

    /// One published post. Counts a view as a side effect; a failed count
    /// never fails the read.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<PostView>, FetchError> {
        let Some(record) = self
            .store
            .find_published_by_slug(slug)
            .await
            .map_err(|e| FetchError::new("load post", e))?
        else {
            return Ok(None);
        };

        if let Err(e) = self.store.increment_views(slug).await {
            tracing::warn!(slug = %slug, error = %e, "Failed to record post view");
        }

        Ok(Some(record.into()))
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, FetchError> {
        self.store
            .list_categories()
            .await
            .map_err(|e| FetchError::new("list categories", e))
    }

    pub async fn list_all_slugs(&self) -> Result<Vec<String>, FetchError> {
        self.store
            .list_published_slugs()
            .await
            .map_err(|e| FetchError::new("list post slugs", e))
    }

    /// Posts sharing a category with `post_id`, or the latest posts when
    /// there is nothing related.
    pub async fn get_related(&self, post_id: Uuid, limit: u64) -> Result<Vec<PostView>, FetchError> {
        let category_ids = self
            .store
            .category_ids_for_post(post_id)
            .await
            .map_err(|e| FetchError::new("load post categories", e))?;

        if !category_ids.is_empty() {
            let related = self
                .store
                .list_published_in_categories(&category_ids, post_id, limit)
                .await
                .map_err(|e| FetchError::new("load related posts", e))?;
            if !related.is_empty() {
                return Ok(related.into_iter().map(PostView::from).collect());
            }
        }

        tracing::debug!(post_id = %post_id, "No related posts, falling back to latest");
        self.recent_excluding(post_id, limit).await
    }

    async fn recent_excluding(&self, post_id: Uuid, limit: u64) -> Result<Vec<PostView>, FetchError> {
        let query = PublishedQuery {
            limit: Some(limit + 1),
            ..Default::default()
        };
        let records = self
            .store
            .list_published(&query)
            .await
            .map_err(|e| FetchError::new("load recent posts", e))?;

        Ok(records
            .into_iter()
            .filter(|r| r.post.id != post_id)
            .take(limit as usize)
            .map(PostView::from)
            .collect())
    }
}
