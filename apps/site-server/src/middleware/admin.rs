//! Admin access extractor.

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};

use crate::middleware::error::AppError;
use crate::state::AppState;

/// Proof that the request may use the admin API.
///
/// Add it as a handler argument to guard the route:
/// ```ignore
/// async fn list_posts(_admin: AdminAccess, state: web::Data<AppState>) -> AppResult<HttpResponse>
/// ```
/// When no admin token is configured every request passes.
#[derive(Debug, Clone, Copy)]
pub struct AdminAccess;

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

impl FromRequest for AdminAccess {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            tracing::error!("AppState not found in app data");
            return ready(Err(AppError::Internal(
                "Server configuration error".to_string(),
            )));
        };

        let Some(expected) = state.admin_token.as_deref() else {
            return ready(Ok(AdminAccess));
        };

        match bearer_token(req) {
            Some(token) if token == expected => ready(Ok(AdminAccess)),
            Some(_) => {
                tracing::warn!(path = %req.path(), "Rejected admin request with wrong token");
                ready(Err(AppError::Unauthorized))
            }
            None => ready(Err(AppError::Unauthorized)),
        }
    }
}
