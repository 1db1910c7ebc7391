//! XML sitemap of the public pages and every published post.

use actix_web::{HttpResponse, web};

use crate::handlers::blog::degrade;
use crate::state::AppState;

const STATIC_PATHS: &[&str] = &["", "/services", "/about", "/contact", "/blog"];

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn render(site_url: &str, slugs: &[String]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    let post_paths = slugs.iter().map(|slug| format!("/blog/{slug}"));
    for path in STATIC_PATHS.iter().map(|p| p.to_string()).chain(post_paths) {
        let loc = escape_xml(&format!("{site_url}{path}"));
        xml.push_str(&format!("  <url><loc>{loc}</loc></url>\n"));
    }

    xml.push_str("</urlset>\n");
    xml
}

/// GET /sitemap.xml
pub async fn sitemap(state: web::Data<AppState>) -> HttpResponse {
    let slugs = degrade(state.content.list_all_slugs().await);

    HttpResponse::Ok()
        .content_type("application/xml; charset=utf-8")
        .body(render(&state.site_url, &slugs))
}
