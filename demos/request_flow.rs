//! Server-side request flow demonstration.
//!
//! This example shows the integrity stack in front of an API handler:
//! 1. Load configuration once at startup
//! 2. Wrap the handler with the CSRF guard and security headers
//! 3. Send a read, a genuine write and a forged write through it
//!
//! Run with: `ADMIN_EMAIL=admin@example.com cargo run --example request_flow`

use session_integrity::web::{protect, Handler, HttpMethod, Request, Response};
use session_integrity::SecurityConfig;

/// Per-request context a framework would hand to the handler
struct LessonContext {
    learner: &'static str,
}

fn save_progress(request: &Request, ctx: &LessonContext) -> Response {
    Response::json(
        200,
        &serde_json::json!({
            "learner": ctx.learner,
            "path": request.path(),
            "bytes": request.body().len(),
        }),
    )
}

fn show(label: &str, response: &Response) {
    println!("\n=== {} ===", label);
    println!("   Status: {}", response.status());
    println!("   Body:   {}", String::from_utf8_lossy(response.body()));
    println!(
        "   CSP:    {}",
        response.header("content-security-policy").unwrap_or("<none>")
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let config = SecurityConfig::from_env()?;
    let handler = protect(save_progress, &config);
    let ctx = LessonContext { learner: "u-ada" };

    let read = Request::new("req-1", HttpMethod::Get, "/api/mathlab/progress");
    show("GET without tokens", &handler.call(&read, &ctx));

    let write = Request::new("req-2", HttpMethod::Post, "/api/mathlab/progress")
        .with_header("x-csrf-token", "3f9a")
        .with_header("x-session-token", "3f9a")
        .with_body(br#"{"lesson":4,"score":9}"#.to_vec());
    show("POST with matching tokens", &handler.call(&write, &ctx));

    let forged = Request::new("req-3", HttpMethod::Post, "/api/mathlab/progress")
        .with_header("x-csrf-token", "3f9a")
        .with_header("x-session-token", "attacker");
    show("POST with forged token", &handler.call(&forged, &ctx));

    println!("\n=== robots.txt ===");
    print!("{}", session_integrity::robots::render(&config.site_url));

    Ok(())
}
