//! `robots.txt` responder.

use crate::config::SecurityConfig;
use crate::web::Response;

/// Paths crawlers must not index: signed-in areas, account flows and the API.
pub const DISALLOWED_PATHS: [&str; 7] = [
    "/mathlab",
    "/mathlab/history",
    "/settings",
    "/admin",
    "/verify-email",
    "/check-email",
    "/api/",
];

/// Cache lifetime of the response, one day.
pub const CACHE_MAX_AGE_SECS: u32 = 86_400;

/// Renders the robots directives for a site rooted at `site_url`.
///
/// # Examples
///
/// ```
/// let body = session_integrity::robots::render("https://learn.example.com/");
///
/// assert!(body.contains("Disallow: /admin\n"));
/// assert!(body.ends_with("Sitemap: https://learn.example.com/sitemap.xml\n"));
/// ```
pub fn render(site_url: &str) -> String {
    let mut body = String::from("User-agent: *\nAllow: /\n");

    for path in DISALLOWED_PATHS {
        body.push_str("Disallow: ");
        body.push_str(path);
        body.push('\n');
    }

    body.push_str("Crawl-delay: 1\n\n");
    body.push_str(&format!(
        "Sitemap: {}/sitemap.xml\n",
        site_url.trim_end_matches('/')
    ));

    body
}

/// Serves `robots.txt` as cacheable plain text.
pub fn respond(config: &SecurityConfig) -> Response {
    Response::text(200, render(&config.site_url)).with_header(
        "Cache-Control",
        format!("public, max-age={}", CACHE_MAX_AGE_SECS),
    )
}
