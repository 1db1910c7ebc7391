//! Public blog endpoints.
//!
//! A failing store never fails these pages: the error is logged and the
//! response carries empty data instead.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use meridian_core::FetchError;
use meridian_core::services::{DEFAULT_RELATED_LIMIT, ListPublishedParams};
use meridian_shared::dto::{ListQuery, RelatedQuery};
use meridian_shared::{CategoriesEnvelope, PostEnvelope, PostsEnvelope, SlugsEnvelope};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Most related posts one request may ask for.
const MAX_RELATED_LIMIT: u64 = 12;

pub(super) fn degrade<T: Default>(result: Result<T, FetchError>) -> T {
    result.unwrap_or_else(|e| {
        tracing::error!(operation = e.operation, error = %e.source, "Content read failed, serving empty result");
        T::default()
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// GET /api/blog/posts
pub async fn list_posts(state: web::Data<AppState>, query: web::Query<ListQuery>) -> HttpResponse {
    let query = query.into_inner();
    let params = ListPublishedParams {
        limit: query.limit,
        offset: query.offset,
        category: non_blank(query.category),
        search: non_blank(query.search),
    };

    let posts = degrade(state.content.list_published(&params).await);
    HttpResponse::Ok().json(PostsEnvelope { posts })
}

/// GET /api/blog/posts/{slug}
pub async fn get_post(
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> AppResult<HttpResponse> {
    let slug = slug.into_inner();
    match degrade(state.content.get_by_slug(&slug).await) {
        Some(post) => Ok(HttpResponse::Ok().json(PostEnvelope { post })),
        None => Err(AppError::NotFound(format!("No published post with slug '{slug}'"))),
    }
}

/// GET /api/blog/related/{id}
pub async fn related_posts(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    query: web::Query<RelatedQuery>,
) -> HttpResponse {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_RELATED_LIMIT)
        .clamp(1, MAX_RELATED_LIMIT);

    let posts = degrade(state.content.get_related(id.into_inner(), limit).await);
    HttpResponse::Ok().json(PostsEnvelope { posts })
}

/// GET /api/blog/categories
pub async fn list_categories(state: web::Data<AppState>) -> HttpResponse {
    let categories = degrade(state.content.list_categories().await);
    HttpResponse::Ok().json(CategoriesEnvelope { categories })
}

/// GET /api/blog/slugs
pub async fn list_slugs(state: web::Data<AppState>) -> HttpResponse {
    let slugs = degrade(state.content.list_all_slugs().await);
    HttpResponse::Ok().json(SlugsEnvelope { slugs })
}
