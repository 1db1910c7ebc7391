//! In-memory content store - used when no database is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use meridian_core::domain::{
    Category, DEFAULT_CATEGORIES, Post, PostLocator, PostRecord, TaxonomyTerm,
};
use meridian_core::error::RepoError;
use meridian_core::ports::{AdminStore, ContentStore, PublishedQuery};

#[derive(Default)]
struct MemoryState {
    posts: HashMap<Uuid, Post>,
    categories: Vec<TaxonomyTerm>,
    tags: Vec<TaxonomyTerm>,
    post_categories: Vec<(Uuid, Uuid)>,
    post_tags: Vec<(Uuid, Uuid)>,
}

impl MemoryState {
    fn record(&self, post: &Post) -> PostRecord {
        let categories = self
            .post_categories
            .iter()
            .filter(|(post_id, _)| *post_id == post.id)
            .filter_map(|(_, id)| self.categories.iter().find(|c| c.id == *id).cloned())
            .collect();
        let tags = self
            .post_tags
            .iter()
            .filter(|(post_id, _)| *post_id == post.id)
            .filter_map(|(_, id)| self.tags.iter().find(|t| t.id == *id).cloned())
            .collect();
        PostRecord {
            post: post.clone(),
            categories,
            tags,
        }
    }

    fn published_newest_first(&self) -> Vec<&Post> {
        let mut posts: Vec<&Post> = self
            .posts
            .values()
            .filter(|p| p.is_published() && p.published_at.is_some())
            .collect();
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        posts
    }

    fn slug_taken(&self, slug: &str, except: Uuid) -> bool {
        self.posts.values().any(|p| p.slug == slug && p.id != except)
    }
}

/// Process-local store implementing both store ports.
///
/// Data is lost on restart. Enforces the same slug uniqueness and cascade
/// rules as the database schema.
pub struct InMemoryContentStore {
    state: RwLock<MemoryState>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState::default()),
        }
    }

    /// Store pre-populated with [`DEFAULT_CATEGORIES`].
    pub fn with_default_categories() -> Self {
        let state = MemoryState {
            categories: DEFAULT_CATEGORIES
                .iter()
                .map(|(name, slug)| TaxonomyTerm {
                    id: Uuid::new_v4(),
                    name: name.to_string(),
                    slug: slug.to_string(),
                })
                .collect(),
            ..Default::default()
        };
        Self {
            state: RwLock::new(state),
        }
    }

    pub async fn add_category(&self, name: &str, slug: &str) -> TaxonomyTerm {
        let term = TaxonomyTerm {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: slug.to_string(),
        };
        self.state.write().await.categories.push(term.clone());
        term
    }

    pub async fn add_tag(&self, name: &str, slug: &str) -> TaxonomyTerm {
        let term = TaxonomyTerm {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: slug.to_string(),
        };
        self.state.write().await.tags.push(term.clone());
        term
    }

    /// Attach a tag. Tags have no admin workflow; they are managed directly.
    pub async fn tag_post(&self, post_id: Uuid, tag_id: Uuid) -> Result<(), RepoError> {
        let mut state = self.state.write().await;
        if !state.posts.contains_key(&post_id) || !state.tags.iter().any(|t| t.id == tag_id) {
            return Err(RepoError::Constraint(format!(
                "post {post_id} or tag {tag_id} does not exist"
            )));
        }
        if !state.post_tags.contains(&(post_id, tag_id)) {
            state.post_tags.push((post_id, tag_id));
        }
        Ok(())
    }
}

impl Default for InMemoryContentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn list_published(&self, query: &PublishedQuery) -> Result<Vec<PostRecord>, RepoError> {
        let state = self.state.read().await;
        let needle = query.search.as_ref().map(|s| s.to_lowercase());

        Ok(state
            .published_newest_first()
            .into_iter()
            .filter(|p| match &needle {
                Some(n) => p.title.to_lowercase().contains(n) || p.content.to_lowercase().contains(n),
                None => true,
            })
            .skip(query.offset.unwrap_or(0) as usize)
            .take(query.limit.map_or(usize::MAX, |l| l as usize))
            .map(|p| state.record(p))
            .collect())
    }

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        let state = self.state.read().await;
        Ok(state
            .published_newest_first()
            .into_iter()
            .find(|p| p.slug == slug)
            .map(|p| state.record(p)))
    }

    async fn increment_views(&self, slug: &str) -> Result<(), RepoError> {
        let mut state = self.state.write().await;
        if let Some(post) = state.posts.values_mut().find(|p| p.slug == slug) {
            post.views += 1;
        }
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, RepoError> {
        let state = self.state.read().await;
        let mut categories: Vec<Category> = state
            .categories
            .iter()
            .map(|c| Category {
                id: c.id,
                name: c.name.clone(),
                slug: c.slug.clone(),
                count: state
                    .post_categories
                    .iter()
                    .filter(|(_, id)| *id == c.id)
                    .count() as u64,
            })
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn list_published_slugs(&self) -> Result<Vec<String>, RepoError> {
        let state = self.state.read().await;
        Ok(state
            .published_newest_first()
            .into_iter()
            .map(|p| p.slug.clone())
            .collect())
    }

    async fn category_ids_for_post(&self, post_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        let state = self.state.read().await;
        Ok(state
            .post_categories
            .iter()
            .filter(|(id, _)| *id == post_id)
            .map(|(_, category_id)| *category_id)
            .collect())
    }

    async fn list_published_in_categories(
        &self,
        category_ids: &[Uuid],
        exclude: Uuid,
        limit: u64,
    ) -> Result<Vec<PostRecord>, RepoError> {
        let state = self.state.read().await;
        Ok(state
            .published_newest_first()
            .into_iter()
            .filter(|p| p.id != exclude)
            .filter(|p| {
                state
                    .post_categories
                    .iter()
                    .any(|(post_id, c)| *post_id == p.id && category_ids.contains(c))
            })
            .take(limit as usize)
            .map(|p| state.record(p))
            .collect())
    }
}

#[async_trait]
impl AdminStore for InMemoryContentStore {
    async fn list_all_posts(&self) -> Result<Vec<PostRecord>, RepoError> {
        let state = self.state.read().await;
        let mut posts: Vec<&Post> = state.posts.values().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts.into_iter().map(|p| state.record(p)).collect())
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError> {
        let state = self.state.read().await;
        Ok(state.posts.get(&id).map(|p| state.record(p)))
    }

    async fn insert_post(&self, post: Post) -> Result<Post, RepoError> {
        let mut state = self.state.write().await;
        if state.posts.contains_key(&post.id) || state.slug_taken(&post.slug, post.id) {
            return Err(RepoError::Constraint(format!(
                "duplicate key value: slug {}",
                post.slug
            )));
        }
        state.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update_post(&self, post: Post) -> Result<Post, RepoError> {
        let mut state = self.state.write().await;
        if state.slug_taken(&post.slug, post.id) {
            return Err(RepoError::Constraint(format!(
                "duplicate key value: slug {}",
                post.slug
            )));
        }
        let stored = state.posts.get_mut(&post.id).ok_or(RepoError::NotFound)?;
        *stored = Post {
            views: stored.views,
            created_at: stored.created_at,
            ..post
        };
        Ok(stored.clone())
    }

    async fn replace_post_categories(
        &self,
        post_id: Uuid,
        category_ids: &[Uuid],
    ) -> Result<(), RepoError> {
        let mut state = self.state.write().await;
        if let Some(missing) = category_ids
            .iter()
            .find(|id| !state.categories.iter().any(|c| c.id == **id))
        {
            return Err(RepoError::Constraint(format!(
                "category {missing} does not exist"
            )));
        }

        state.post_categories.retain(|(id, _)| *id != post_id);
        for category_id in category_ids {
            if !state.post_categories.contains(&(post_id, *category_id)) {
                state.post_categories.push((post_id, *category_id));
            }
        }
        Ok(())
    }

    async fn delete_post(&self, locator: &PostLocator) -> Result<(), RepoError> {
        let mut state = self.state.write().await;
        let id = match locator {
            PostLocator::Id(id) => state.posts.contains_key(id).then_some(*id),
            PostLocator::Slug(slug) => state.posts.values().find(|p| &p.slug == slug).map(|p| p.id),
        }
        .ok_or(RepoError::NotFound)?;

        state.posts.remove(&id);
        state.post_categories.retain(|(post_id, _)| *post_id != id);
        state.post_tags.retain(|(post_id, _)| *post_id != id);
        Ok(())
    }
}
