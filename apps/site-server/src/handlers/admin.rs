//! Admin dashboard endpoints. Every handler requires [`AdminAccess`].

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use meridian_core::domain::{PostInput, PostLocator, PostSubmission};
use meridian_shared::dto::CleanupQuery;
use meridian_shared::{
    CategoriesEnvelope, CleanupListing, CreatedResponse, PostEnvelope, PostsEnvelope,
    SuccessResponse,
};

use crate::middleware::admin::AdminAccess;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/admin/categories
pub async fn list_categories(
    _admin: AdminAccess,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let categories = state.content.list_categories().await?;
    Ok(HttpResponse::Ok().json(CategoriesEnvelope { categories }))
}

/// GET /api/admin/posts
pub async fn list_posts(_admin: AdminAccess, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.admin.list_posts().await?;
    Ok(HttpResponse::Ok().json(PostsEnvelope { posts }))
}

/// POST /api/admin/posts/create
pub async fn create_post(
    _admin: AdminAccess,
    state: web::Data<AppState>,
    body: web::Json<PostSubmission>,
) -> AppResult<HttpResponse> {
    let input = PostInput::try_from(body.into_inner())?;
    let post = state.admin.create_post(input).await?;
    Ok(HttpResponse::Ok().json(CreatedResponse::new(post)))
}

/// GET /api/admin/posts/{id}
pub async fn get_post(
    _admin: AdminAccess,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state.admin.get_post(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(PostEnvelope { post }))
}

/// PUT /api/admin/posts/{id}
pub async fn update_post(
    _admin: AdminAccess,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    body: web::Json<PostSubmission>,
) -> AppResult<HttpResponse> {
    let input = PostInput::try_from(body.into_inner())?;
    state.admin.update_post(id.into_inner(), input).await?;
    Ok(HttpResponse::Ok().json(SuccessResponse::ok()))
}

/// DELETE /api/admin/posts/{id}
pub async fn delete_post(
    _admin: AdminAccess,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .admin
        .delete_post(PostLocator::Id(id.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(SuccessResponse::ok()))
}

/// POST /api/admin/posts/{id}/publish
pub async fn publish_post(
    _admin: AdminAccess,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state.admin.publish(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(CreatedResponse::new(post)))
}

/// GET /api/admin/cleanup
pub async fn cleanup_list(
    _admin: AdminAccess,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let posts = state.admin.list_all_posts().await?;
    Ok(HttpResponse::Ok().json(CleanupListing::new(posts)))
}

fn cleanup_target(query: CleanupQuery) -> AppResult<PostLocator> {
    let id = query.id.filter(|v| !v.trim().is_empty());
    let slug = query.slug.filter(|v| !v.trim().is_empty());

    match (id, slug) {
        (Some(id), _) => Uuid::parse_str(id.trim())
            .map(PostLocator::Id)
            .map_err(|_| AppError::BadRequest(format!("Invalid post id '{id}'"))),
        (None, Some(slug)) => Ok(PostLocator::Slug(slug.trim().to_string())),
        (None, None) => Err(AppError::BadRequest(
            "Post id or slug is required".to_string(),
        )),
    }
}

/// DELETE /api/admin/cleanup?id=|slug=
pub async fn cleanup_delete(
    _admin: AdminAccess,
    state: web::Data<AppState>,
    query: web::Query<CleanupQuery>,
) -> AppResult<HttpResponse> {
    let locator = cleanup_target(query.into_inner())?;
    let message = format!("Deleted post with {locator}");

    state.admin.delete_post(locator).await?;
    Ok(HttpResponse::Ok().json(SuccessResponse::with_message(message)))
}
