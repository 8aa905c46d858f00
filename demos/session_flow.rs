//! Client-side session flow demonstration.
//!
//! This example drives a session guard through a typical page load:
//! 1. The provider starts out loading (no redirect)
//! 2. It resolves to a signed-in but unverified user (verify-email redirect)
//! 3. Verification completes (the protected view renders)
//!
//! Run with: `cargo run --example session_flow`

use std::rc::Rc;

use session_integrity::session::{
    AuthState, AuthStateChannel, GuardOptions, Identity, RedirectTarget, SessionGuard,
};

fn report(step: &str, guard: &SessionGuard) {
    let view = guard.view();
    println!("\n=== {} ===", step);
    println!("   State:         {}", guard.state());
    println!("   Authenticated: {}", view.is_authenticated);
    println!("   Loading:       {}", view.is_loading);
    println!("   Verified:      {}", view.is_email_verified);
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let provider = AuthStateChannel::new();
    let router = Rc::new(|target: &RedirectTarget| println!("   -> navigate to {}", target.href()));

    let guard = SessionGuard::attach(
        &provider,
        router,
        GuardOptions::new("/mathlab").require_email_verification(),
    );
    report("Page load", &guard);

    let ada = Identity::new("u-ada", "ada@example.com");
    provider.publish(AuthState::signed_in(ada.clone(), false));
    report("Signed in, unverified", &guard);

    provider.publish(AuthState::signed_in(ada, true));
    report("Verified", &guard);

    provider.publish(AuthState::signed_out());
    report("Signed out", &guard);
}
