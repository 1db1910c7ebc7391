//! PostgreSQL content store.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbConn, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, QueryTrait, Select, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use meridian_core::domain::{Category, Post, PostLocator, PostRecord, TaxonomyTerm};
use meridian_core::error::RepoError;
use meridian_core::ports::{AdminStore, ContentStore, PublishedQuery};

use super::entity::blog_post::{self, Entity as PostEntity, Status};
use super::entity::{blog_category, blog_tag, post_category, post_tag};

fn query_err(err: DbErr) -> RepoError {
    match err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => RepoError::Connection(err.to_string()),
        other => RepoError::Query(other.to_string()),
    }
}

fn write_err(err: DbErr) -> RepoError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg))
        | Some(SqlErr::ForeignKeyConstraintViolation(msg)) => RepoError::Constraint(msg),
        _ => query_err(err),
    }
}

/// `%search%` with LIKE wildcards in the search text escaped, so the
/// pattern matches a plain substring.
fn contains_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for ch in search.to_lowercase().chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// SeaORM-backed implementation of both store ports.
///
/// Construct one per connection: the public pool for [`ContentStore`], the
/// admin pool for [`AdminStore`].
#[derive(Clone)]
pub struct PostgresContentStore {
    db: DbConn,
}

impl PostgresContentStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    fn published() -> Select<PostEntity> {
        PostEntity::find()
            .filter(blog_post::Column::Status.eq(Status::Published))
            .filter(blog_post::Column::PublishedAt.is_not_null())
    }

    /// Resolve categories and tags for a page of posts, preserving order.
    async fn attach_terms(
        &self,
        posts: Vec<blog_post::Model>,
    ) -> Result<Vec<PostRecord>, RepoError> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }
        let post_ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();

        let category_links = post_category::Entity::find()
            .filter(post_category::Column::PostId.is_in(post_ids.clone()))
            .all(&self.db)
            .await
            .map_err(query_err)?;
        let tag_links = post_tag::Entity::find()
            .filter(post_tag::Column::PostId.is_in(post_ids))
            .all(&self.db)
            .await
            .map_err(query_err)?;

        let categories: HashMap<Uuid, TaxonomyTerm> = if category_links.is_empty() {
            HashMap::new()
        } else {
            blog_category::Entity::find()
                .filter(
                    blog_category::Column::Id.is_in(category_links.iter().map(|l| l.category_id)),
                )
                .all(&self.db)
                .await
                .map_err(query_err)?
                .into_iter()
                .map(|m| (m.id, m.into()))
                .collect()
        };
        let tags: HashMap<Uuid, TaxonomyTerm> = if tag_links.is_empty() {
            HashMap::new()
        } else {
            blog_tag::Entity::find()
                .filter(blog_tag::Column::Id.is_in(tag_links.iter().map(|l| l.tag_id)))
                .all(&self.db)
                .await
                .map_err(query_err)?
                .into_iter()
                .map(|m| (m.id, m.into()))
                .collect()
        };

        Ok(posts
            .into_iter()
            .map(|model| {
                let post: Post = model.into();
                let categories = category_links
                    .iter()
                    .filter(|l| l.post_id == post.id)
                    .filter_map(|l| categories.get(&l.category_id).cloned())
                    .collect();
                let tags = tag_links
                    .iter()
                    .filter(|l| l.post_id == post.id)
                    .filter_map(|l| tags.get(&l.tag_id).cloned())
                    .collect();
                PostRecord {
                    post,
                    categories,
                    tags,
                }
            })
            .collect())
    }

    async fn attach_one(
        &self,
        model: Option<blog_post::Model>,
    ) -> Result<Option<PostRecord>, RepoError> {
        match model {
            Some(model) => Ok(self.attach_terms(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ContentStore for PostgresContentStore {
    async fn list_published(&self, query: &PublishedQuery) -> Result<Vec<PostRecord>, RepoError> {
        let mut select = Self::published();

        if let Some(search) = &query.search {
            let pattern = contains_pattern(search);
            let like = || LikeExpr::new(pattern.clone()).escape('\\');
            select = select.filter(
                Condition::any()
                    .add(Expr::expr(Func::lower(Expr::col(blog_post::Column::Title))).like(like()))
                    .add(Expr::expr(Func::lower(Expr::col(blog_post::Column::Content))).like(like())),
            );
        }

        let posts = select
            .order_by_desc(blog_post::Column::PublishedAt)
            .limit(query.limit)
            .offset(query.offset)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        self.attach_terms(posts).await
    }

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        tracing::debug!(slug = %slug, "Finding published post by slug");

        let model = Self::published()
            .filter(blog_post::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        self.attach_one(model).await
    }

    async fn increment_views(&self, slug: &str) -> Result<(), RepoError> {
        PostEntity::update_many()
            .col_expr(
                blog_post::Column::Views,
                Expr::col(blog_post::Column::Views).add(1),
            )
            .filter(blog_post::Column::Slug.eq(slug))
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, RepoError> {
        let categories = blog_category::Entity::find()
            .order_by_asc(blog_category::Column::Name)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        let counts: HashMap<Uuid, i64> = post_category::Entity::find()
            .select_only()
            .column(post_category::Column::CategoryId)
            .column_as(Expr::col(post_category::Column::PostId).count(), "post_count")
            .group_by(post_category::Column::CategoryId)
            .into_tuple::<(Uuid, i64)>()
            .all(&self.db)
            .await
            .map_err(query_err)?
            .into_iter()
            .collect();

        Ok(categories
            .into_iter()
            .map(|c| Category {
                count: counts.get(&c.id).copied().unwrap_or(0).max(0) as u64,
                id: c.id,
                name: c.name,
                slug: c.slug,
            })
            .collect())
    }

    async fn list_published_slugs(&self) -> Result<Vec<String>, RepoError> {
        Self::published()
            .select_only()
            .column(blog_post::Column::Slug)
            .order_by_desc(blog_post::Column::PublishedAt)
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(query_err)
    }

    async fn category_ids_for_post(&self, post_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        let links = post_category::Entity::find()
            .filter(post_category::Column::PostId.eq(post_id))
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(links.into_iter().map(|l| l.category_id).collect())
    }

    async fn list_published_in_categories(
        &self,
        category_ids: &[Uuid],
        exclude: Uuid,
        limit: u64,
    ) -> Result<Vec<PostRecord>, RepoError> {
        if category_ids.is_empty() {
            return Ok(Vec::new());
        }

        let linked = post_category::Entity::find()
            .select_only()
            .column(post_category::Column::PostId)
            .filter(post_category::Column::CategoryId.is_in(category_ids.iter().copied()))
            .into_query();

        let posts = Self::published()
            .filter(blog_post::Column::Id.in_subquery(linked))
            .filter(blog_post::Column::Id.ne(exclude))
            .order_by_desc(blog_post::Column::PublishedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        self.attach_terms(posts).await
    }
}

#[async_trait]
impl AdminStore for PostgresContentStore {
    async fn list_all_posts(&self) -> Result<Vec<PostRecord>, RepoError> {
        let posts = PostEntity::find()
            .order_by_desc(blog_post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        self.attach_terms(posts).await
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError> {
        let model = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;

        self.attach_one(model).await
    }

    async fn insert_post(&self, post: Post) -> Result<Post, RepoError> {
        let model = blog_post::ActiveModel::from(post)
            .insert(&self.db)
            .await
            .map_err(write_err)?;
        Ok(model.into())
    }

    async fn update_post(&self, post: Post) -> Result<Post, RepoError> {
        let model = blog_post::editable_fields(post)
            .update(&self.db)
            .await
            .map_err(|e| match e {
                DbErr::RecordNotUpdated => RepoError::NotFound,
                other => write_err(other),
            })?;
        Ok(model.into())
    }

    async fn replace_post_categories(
        &self,
        post_id: Uuid,
        category_ids: &[Uuid],
    ) -> Result<(), RepoError> {
        let mut ids = category_ids.to_vec();
        ids.sort();
        ids.dedup();

        let txn = self.db.begin().await.map_err(query_err)?;

        post_category::Entity::delete_many()
            .filter(post_category::Column::PostId.eq(post_id))
            .exec(&txn)
            .await
            .map_err(write_err)?;

        if !ids.is_empty() {
            post_category::Entity::insert_many(ids.into_iter().map(|category_id| {
                post_category::ActiveModel {
                    post_id: Set(post_id),
                    category_id: Set(category_id),
                }
            }))
            .exec_without_returning(&txn)
            .await
            .map_err(write_err)?;
        }

        txn.commit().await.map_err(query_err)?;
        Ok(())
    }

    async fn delete_post(&self, locator: &PostLocator) -> Result<(), RepoError> {
        let condition = match locator {
            PostLocator::Id(id) => blog_post::Column::Id.eq(*id),
            PostLocator::Slug(slug) => blog_post::Column::Slug.eq(slug.as_str()),
        };

        let result = PostEntity::delete_many()
            .filter(condition)
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::contains_pattern;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("Cloud"), "%cloud%");
        assert_eq!(contains_pattern("100%_off"), r"%100\%\_off%");
        assert_eq!(contains_pattern(r"C:\"), r"%c:\\%");
    }
}
