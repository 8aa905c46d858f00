//! Integration tests for the client-side session guard.
//!
//! An `AuthStateChannel` stands in for the identity provider and a
//! `RecordingNavigator` for the router.

use std::rc::Rc;

use session_integrity::session::{
    AuthState, AuthStateChannel, GuardOptions, GuardState, Identity, Navigator,
    RecordingNavigator, RedirectTarget, SessionGuard,
};
use session_integrity::AdminConfig;

fn ada() -> Identity {
    Identity::new("u-ada", "ada@example.com")
}

#[test]
fn token_refresh_sequence_ends_authorized() {
    let channel = AuthStateChannel::new();
    let navigator = Rc::new(RecordingNavigator::new());
    let guard = SessionGuard::attach(
        &channel,
        navigator.clone(),
        GuardOptions::new("/mathlab").require_email_verification(),
    );

    // Provider stays loading while the token refresh completes.
    channel.publish(AuthState::loading());
    assert_eq!(navigator.redirect_count(), 0);

    channel.publish(AuthState::signed_in(ada(), true));

    assert_eq!(guard.state(), GuardState::Authorized);
    assert!(guard.view().is_authenticated);
    assert_eq!(navigator.redirect_count(), 0);
}

#[test]
fn failed_token_refresh_redirects_again() {
    let channel = AuthStateChannel::new();
    let navigator = Rc::new(RecordingNavigator::new());
    let guard = SessionGuard::attach(&channel, navigator.clone(), GuardOptions::new("/mathlab"));

    channel.publish(AuthState::signed_out());
    assert_eq!(navigator.redirect_count(), 1);

    // The provider retries the refresh, then resolves signed out again.
    channel.publish(AuthState::loading());
    assert_eq!(navigator.redirect_count(), 1);
    channel.publish(AuthState::signed_out());

    assert_eq!(guard.state(), GuardState::Unauthenticated);
    assert!(!guard.may_render());
    assert_eq!(
        navigator.hrefs(),
        vec![
            "/login?redirectTo=%2Fmathlab".to_string(),
            "/login?redirectTo=%2Fmathlab".to_string(),
        ]
    );
}

#[test]
fn sign_out_redirects_to_login_with_return_path() {
    let channel = AuthStateChannel::with_state(AuthState::signed_in(ada(), true));
    let navigator = Rc::new(RecordingNavigator::new());
    let guard = SessionGuard::attach(&channel, navigator.clone(), GuardOptions::new("/mathlab/history"));
    assert!(guard.may_render());

    channel.publish(AuthState::signed_out());

    assert_eq!(guard.state(), GuardState::Unauthenticated);
    assert!(!guard.view().is_authenticated);
    assert_eq!(
        navigator.hrefs(),
        vec!["/login?redirectTo=%2Fmathlab%2Fhistory".to_string()]
    );
}

#[test]
fn verification_completes_after_redirect() {
    let channel = AuthStateChannel::new();
    let navigator = Rc::new(RecordingNavigator::new());
    let guard = SessionGuard::attach(
        &channel,
        navigator.clone(),
        GuardOptions::new("/mathlab").require_email_verification(),
    );

    channel.publish(AuthState::signed_in(ada(), false));
    assert_eq!(navigator.hrefs(), vec!["/verify-email".to_string()]);

    channel.publish(AuthState::signed_in(ada(), true));
    assert!(guard.may_render());
    assert_eq!(navigator.redirect_count(), 1);
}

/// A router that reports the navigation back to the provider, as a real
/// client does when the login view resets the session.
struct EchoingRouter {
    channel: AuthStateChannel,
    log: RecordingNavigator,
}

impl Navigator for EchoingRouter {
    fn navigate(&self, target: &RedirectTarget) {
        self.log.navigate(target);
        self.channel.publish(AuthState::loading());
    }
}

#[test]
fn overlapping_notification_from_redirect_is_tolerated() {
    let channel = AuthStateChannel::new();
    let router = Rc::new(EchoingRouter {
        channel: channel.clone(),
        log: RecordingNavigator::new(),
    });
    let guard = SessionGuard::attach(&channel, router.clone(), GuardOptions::new("/settings"));

    channel.publish(AuthState::signed_out());

    // The loading snapshot published during the redirect supersedes the
    // signed-out one; no duplicate redirect is issued while loading.
    assert_eq!(router.log.redirect_count(), 1);
    assert_eq!(guard.state(), GuardState::Loading);
    assert!(guard.view().is_loading);
}

#[test]
fn several_guards_share_one_provider() {
    let channel = AuthStateChannel::new();
    let navigator = Rc::new(RecordingNavigator::new());
    let lab = SessionGuard::attach(
        &channel,
        navigator.clone(),
        GuardOptions::new("/mathlab").require_email_verification(),
    );
    let settings = SessionGuard::attach(&channel, navigator.clone(), GuardOptions::new("/settings"));

    channel.publish(AuthState::signed_in(ada(), false));

    assert_eq!(lab.state(), GuardState::Unverified);
    assert_eq!(settings.state(), GuardState::Authorized);
    assert_eq!(navigator.hrefs(), vec!["/verify-email".to_string()]);
}

#[test]
fn admin_identity_combines_with_session_view() {
    let admin = AdminConfig::new("ada@example.com");
    let channel = AuthStateChannel::with_state(AuthState::signed_in(ada(), true));
    let guard = SessionGuard::attach(
        &channel,
        Rc::new(RecordingNavigator::new()),
        GuardOptions::new("/admin"),
    );

    let view = guard.view();
    let email = view
        .user
        .as_ref()
        .and_then(|u| u.email.as_deref())
        .unwrap_or_default();

    assert!(view.is_authenticated);
    assert!(admin.is_admin(email));
    assert!(!admin.is_admin("other@example.com"));
    assert!(!admin.is_admin(""));
}
