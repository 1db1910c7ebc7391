use std::sync::{Arc, Mutex};

use actix_web::{App, http::StatusCode, test, web};
use async_trait::async_trait;
use serde_json::{Value, json};

use meridian_core::domain::{Category, PostInput, PostRecord, PostStatus};
use meridian_core::error::RepoError;
use meridian_core::ports::{ContentStore, EmailMessage, MailError, Mailer, PublishedQuery};
use meridian_core::services::NotificationAddresses;
use meridian_infra::InMemoryContentStore;
use uuid::Uuid;

use crate::state::{AppState, StoreMode};

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Content store whose every read fails, as when the database is down.
struct UnavailableStore;

fn unavailable<T>() -> Result<T, RepoError> {
    Err(RepoError::Connection("connection refused".to_string()))
}

#[async_trait]
impl ContentStore for UnavailableStore {
    async fn list_published(&self, _: &PublishedQuery) -> Result<Vec<PostRecord>, RepoError> {
        unavailable()
    }

    async fn find_published_by_slug(&self, _: &str) -> Result<Option<PostRecord>, RepoError> {
        unavailable()
    }

    async fn increment_views(&self, _: &str) -> Result<(), RepoError> {
        unavailable()
    }

    async fn list_categories(&self) -> Result<Vec<Category>, RepoError> {
        unavailable()
    }

    async fn list_published_slugs(&self) -> Result<Vec<String>, RepoError> {
        unavailable()
    }

    async fn category_ids_for_post(&self, _: Uuid) -> Result<Vec<Uuid>, RepoError> {
        unavailable()
    }

    async fn list_published_in_categories(
        &self,
        _: &[Uuid],
        _: Uuid,
        _: u64,
    ) -> Result<Vec<PostRecord>, RepoError> {
        unavailable()
    }
}

fn state() -> (AppState, Arc<InMemoryContentStore>, Arc<RecordingMailer>) {
    let store = Arc::new(InMemoryContentStore::new());
    let mailer = Arc::new(RecordingMailer::default());
    (AppState::in_memory(store.clone(), mailer.clone()), store, mailer)
}

macro_rules! app {
    ($state:expr) => {
        app!($state, None)
    };
    ($state:expr, $limiter:expr) => {
        test::init_service(
            App::new()
                .wrap(crate::observability::RequestIdMiddleware)
                .app_data(web::Data::new($state))
                .configure(|cfg| super::configure_routes(cfg, $limiter)),
        )
        .await
    };
}

fn lead(consent: Option<bool>) -> Value {
    json!({
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "company": "Analytical Engines",
        "interest": "data-analytics",
        "message": "We need a pipeline.",
        "consent": consent,
    })
}

#[actix_web::test]
async fn test_health_reports_store_mode() {
    let (state, _, _) = state();
    let app = app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");
    assert_eq!(body["email_enabled"], true);
}

#[actix_web::test]
async fn test_request_id_is_echoed() {
    let (state, _, _) = state();
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/health")
        .insert_header(("X-Request-ID", "abc-123"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.headers().get("x-request-id").unwrap(), "abc-123");
}

#[actix_web::test]
async fn test_lead_without_consent_is_rejected_without_email() {
    let (state, _, mailer) = state();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/leads")
        .set_json(lead(Some(false)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 400);
    assert!(body["error"].as_str().unwrap().contains("Consent"));
    assert!(mailer.sent.lock().unwrap().is_empty());
}

#[actix_web::test]
async fn test_valid_lead_sends_notification() {
    let (state, _, mailer) = state();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/leads")
        .set_json(lead(Some(true)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);

    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].reply_to.as_deref(), Some("ada@example.com"));
}

#[actix_web::test]
async fn test_malformed_json_is_bad_request() {
    let (state, _, _) = state();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/leads")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 400);
}

#[cfg(feature = "rate-limit")]
#[actix_web::test]
async fn test_lead_rate_limit_returns_429() {
    use meridian_core::ports::RateLimiter;
    use meridian_infra::{InMemoryRateLimiter, RateLimitConfig};

    let (state, _, _) = state();
    let limiter: Arc<dyn RateLimiter> = Arc::new(InMemoryRateLimiter::new(RateLimitConfig {
        max_requests: 1,
        window: std::time::Duration::from_secs(60),
    }));
    let app = app!(state, Some(limiter));

    let submit = || {
        test::TestRequest::post()
            .uri("/api/leads")
            .set_json(lead(Some(true)))
            .to_request()
    };

    assert_eq!(test::call_service(&app, submit()).await.status(), StatusCode::OK);

    let resp = test::call_service(&app, submit()).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(resp.headers().contains_key("retry-after"));

    // Other routes are not throttled.
    let health = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;
    assert_eq!(health.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_blog_lists_only_published_posts() {
    let (state, _, _) = state();
    state
        .admin
        .create_post(PostInput::new("Live Post", "<p>Hello &amp; welcome</p>").with_status(PostStatus::Published))
        .await
        .unwrap();
    state
        .admin
        .create_post(PostInput::new("Hidden Draft", "draft"))
        .await
        .unwrap();
    let app = app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/blog/posts").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;

    let posts = body["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["slug"], "live-post");
    assert_eq!(posts[0]["excerpt"], "Hello & welcome");
    assert_eq!(posts[0]["featuredImage"], Value::Null);
    assert_eq!(posts[0]["readTime"], "1 min read");

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/blog/posts/hidden-draft").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_related_rejects_malformed_id() {
    let (state, _, _) = state();
    let app = app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/blog/related/not-a-uuid").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_admin_create_publish_and_cleanup() {
    let (state, store, _) = state();
    let category = store.add_category("Cloud", "cloud").await;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/admin/posts/create")
        .set_json(json!({
            "title": "Migrating to the Cloud",
            "content": "<p>Plan first.</p>",
            "categories": [category.id.to_string()],
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["post"]["slug"], "migrating-to-the-cloud");
    assert_eq!(body["post"]["status"], "draft");
    let id = body["post"]["id"].as_str().unwrap().to_string();

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/admin/posts/{id}/publish"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["post"]["status"], "published");

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/admin/posts/{id}"))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["post"]["categories"], json!([category.id.to_string()]));

    let resp = test::call_service(&app, test::TestRequest::get().uri("/sitemap.xml").to_request()).await;
    let xml = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(xml.contains("/blog/migrating-to-the-cloud</loc>"));

    let resp = test::call_service(
        &app,
        test::TestRequest::delete().uri("/api/admin/cleanup").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/api/admin/cleanup?slug=migrating-to-the-cloud")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/admin/cleanup").to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["count"], 0);
}

#[actix_web::test]
async fn test_admin_create_requires_title() {
    let (state, _, _) = state();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/admin/posts/create")
        .set_json(json!({"title": "  ", "content": "body"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Title is required");
}

#[actix_web::test]
async fn test_admin_token_is_enforced_when_configured() {
    let (mut state, _, _) = state();
    state.admin_token = Some("s3cret".to_string());
    let app = app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/admin/posts").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/admin/posts")
        .insert_header(("Authorization", "Bearer s3cret"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Public routes stay open.
    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/blog/slugs").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_admin_delete_unknown_post_is_not_found() {
    let (state, _, _) = state();
    let app = app!(state);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/admin/posts/{}", Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_public_reads_degrade_when_store_is_down() {
    let state = AppState::assemble(
        Arc::new(UnavailableStore),
        Arc::new(InMemoryContentStore::new()),
        Arc::new(RecordingMailer::default()),
        NotificationAddresses {
            from: "site@localhost".to_string(),
            to: Vec::new(),
        },
        StoreMode::Postgres,
    );
    let app = app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/blog/posts").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["posts"], json!([]));

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/blog/posts/cloud-costs").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/blog/related/{}", Uuid::new_v4()))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/blog/categories").to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["categories"], json!([]));

    let resp = test::call_service(&app, test::TestRequest::get().uri("/sitemap.xml").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let xml = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(xml.contains("<loc>http://localhost:3000/contact</loc>"));
    assert!(xml.contains("<loc>http://localhost:3000/blog</loc>"));
    assert!(!xml.contains("/blog/"));
}
