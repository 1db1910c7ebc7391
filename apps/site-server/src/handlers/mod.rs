//! HTTP handlers and route configuration.

mod admin;
mod blog;
mod health;
mod leads;
mod sitemap;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use actix_web::web;
use meridian_core::ports::RateLimiter;

use crate::middleware::error::AppError;
use crate::middleware::rate_limit::RateLimitMiddleware;

/// Malformed bodies, query strings and path segments all answer 400 with
/// the standard error body.
fn extractor_configs(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    );
}

/// Configure all application routes. `lead_limiter` throttles lead
/// submissions only.
pub fn configure_routes(cfg: &mut web::ServiceConfig, lead_limiter: Option<Arc<dyn RateLimiter>>) {
    extractor_configs(cfg);

    cfg.route("/sitemap.xml", web::get().to(sitemap::sitemap))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(health::health_check))
                .service(
                    web::resource("/leads")
                        .wrap(RateLimitMiddleware::new(lead_limiter))
                        .route(web::post().to(leads::submit_lead)),
                )
                // Public blog
                .service(
                    web::scope("/blog")
                        .route("/posts", web::get().to(blog::list_posts))
                        .route("/posts/{slug}", web::get().to(blog::get_post))
                        .route("/related/{id}", web::get().to(blog::related_posts))
                        .route("/categories", web::get().to(blog::list_categories))
                        .route("/slugs", web::get().to(blog::list_slugs)),
                )
                // Admin dashboard
                .service(
                    web::scope("/admin")
                        .route("/categories", web::get().to(admin::list_categories))
                        .route("/posts", web::get().to(admin::list_posts))
                        .route("/posts/create", web::post().to(admin::create_post))
                        .service(
                            web::resource("/posts/{id}")
                                .route(web::get().to(admin::get_post))
                                .route(web::put().to(admin::update_post))
                                .route(web::delete().to(admin::delete_post)),
                        )
                        .route("/posts/{id}/publish", web::post().to(admin::publish_post))
                        .service(
                            web::resource("/cleanup")
                                .route(web::get().to(admin::cleanup_list))
                                .route(web::delete().to(admin::cleanup_delete)),
                        ),
                ),
        );
}
