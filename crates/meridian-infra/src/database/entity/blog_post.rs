//! Blog post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use meridian_core::domain::{Post, PostStatus};

/// `blog_posts.status` column values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Status {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "published")]
    Published,
    #[sea_orm(string_value = "archived")]
    Archived,
}

impl From<Status> for PostStatus {
    fn from(status: Status) -> Self {
        match status {
            Status::Draft => PostStatus::Draft,
            Status::Published => PostStatus::Published,
            Status::Archived => PostStatus::Archived,
        }
    }
}

impl From<PostStatus> for Status {
    fn from(status: PostStatus) -> Self {
        match status {
            PostStatus::Draft => Status::Draft,
            PostStatus::Published => Status::Published,
            PostStatus::Archived => Status::Archived,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "blog_posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub excerpt: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub featured_image_url: Option<String>,
    pub featured_image_alt: Option<String>,
    pub status: Status,
    pub published_at: Option<DateTimeWithTimeZone>,
    pub author_name: String,
    pub read_time: Option<i32>,
    pub views: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn read_time_column(minutes: Option<u32>) -> Option<i32> {
    minutes.map(|m| i32::try_from(m).unwrap_or(i32::MAX))
}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            slug: model.slug,
            excerpt: model.excerpt,
            content: model.content,
            featured_image_url: model.featured_image_url,
            featured_image_alt: model.featured_image_alt,
            status: model.status.into(),
            published_at: model.published_at.map(Into::into),
            author_name: model.author_name,
            read_time: model.read_time.and_then(|m| u32::try_from(m).ok()),
            views: model.views,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from Domain Post to a fully set ActiveModel, for inserts.
impl From<Post> for ActiveModel {
    fn from(post: Post) -> Self {
        Self {
            id: Set(post.id),
            title: Set(post.title),
            slug: Set(post.slug),
            excerpt: Set(post.excerpt),
            content: Set(post.content),
            featured_image_url: Set(post.featured_image_url),
            featured_image_alt: Set(post.featured_image_alt),
            status: Set(post.status.into()),
            published_at: Set(post.published_at.map(Into::into)),
            author_name: Set(post.author_name),
            read_time: Set(read_time_column(post.read_time)),
            views: Set(post.views),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
        }
    }
}

/// ActiveModel that rewrites the editable columns only. The view counter and
/// creation time stay as stored.
pub fn editable_fields(post: Post) -> ActiveModel {
    ActiveModel {
        views: sea_orm::NotSet,
        created_at: sea_orm::NotSet,
        ..post.into()
    }
}
