use std::cell::RefCell;
use std::rc::Rc;

use super::{
    evaluate, AuthState, AuthStateSource, GuardOptions, GuardRoutes, GuardState, Identity,
    Navigator, RedirectTarget, Subscription, UserData,
};

/// Derived session state exposed to the protected view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    /// Resolved with a signed-in user
    pub is_authenticated: bool,
    /// The provider is still resolving
    pub is_loading: bool,
    /// Signed-in identity
    pub user: Option<Identity>,
    /// Profile record
    pub user_data: Option<UserData>,
    /// Whether the email is verified
    pub is_email_verified: bool,
}

impl SessionView {
    fn from_snapshot(snapshot: &AuthState) -> Self {
        Self {
            is_authenticated: !snapshot.loading && snapshot.user.is_some(),
            is_loading: snapshot.loading,
            user: snapshot.user.clone(),
            user_data: snapshot.user_data.clone(),
            is_email_verified: snapshot.is_email_verified,
        }
    }
}

#[derive(Debug)]
struct GuardCore {
    options: GuardOptions,
    routes: GuardRoutes,
    snapshot: AuthState,
    state: GuardState,
    // Redirect issued for the current redirecting state; cleared as soon as
    // the state stops redirecting (including a return to loading).
    issued: Option<RedirectTarget>,
}

impl GuardCore {
    fn observe(&mut self, snapshot: &AuthState) -> Option<RedirectTarget> {
        self.snapshot = snapshot.clone();
        self.reevaluate()
    }

    fn reevaluate(&mut self) -> Option<RedirectTarget> {
        let next = evaluate(&self.snapshot, &self.options);

        if next != self.state {
            tracing::debug!(
                from = %self.state,
                to = %next,
                path = %self.options.redirect_path,
                "session state changed"
            );
        }
        self.state = next;

        match RedirectTarget::for_state(next, &self.routes, &self.options) {
            Some(target) if self.issued.as_ref() != Some(&target) => {
                let reason = next.violation().map(|v| v.kind.as_str()).unwrap_or_default();
                tracing::info!(
                    state = %next,
                    reason,
                    href = %target.href(),
                    "redirecting away from protected view"
                );
                self.issued = Some(target.clone());
                Some(target)
            }
            Some(_) => None,
            None => {
                self.issued = None;
                None
            }
        }
    }
}

/// Client-side gate in front of a protected view.
///
/// The guard subscribes to an [`AuthStateSource`] and re-evaluates on every
/// snapshot and on every change of its [`GuardOptions`]. Each evaluation
/// recomputes from the latest snapshot only. A redirect is issued once per
/// transition into a redirecting state (or change of target), never while
/// the provider is loading.
///
/// Dropping the guard unsubscribes it.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use session_integrity::session::{
///     AuthState, AuthStateChannel, GuardOptions, GuardState, RecordingNavigator, SessionGuard,
/// };
///
/// let channel = AuthStateChannel::new();
/// let navigator = Rc::new(RecordingNavigator::new());
/// let guard = SessionGuard::attach(&channel, navigator.clone(), GuardOptions::new("/mathlab"));
///
/// assert_eq!(guard.state(), GuardState::Loading);
/// assert_eq!(navigator.redirect_count(), 0);
///
/// channel.publish(AuthState::signed_out());
/// assert_eq!(navigator.hrefs(), vec!["/login?redirectTo=%2Fmathlab".to_string()]);
/// ```
pub struct SessionGuard {
    core: Rc<RefCell<GuardCore>>,
    navigator: Rc<dyn Navigator>,
    _subscription: Subscription,
}

impl SessionGuard {
    /// Attaches a guard using the default login and verification routes.
    pub fn attach<S>(source: &S, navigator: Rc<dyn Navigator>, options: GuardOptions) -> Self
    where
        S: AuthStateSource + ?Sized,
    {
        Self::attach_with_routes(source, navigator, options, GuardRoutes::default())
    }

    /// Attaches a guard redirecting to `routes`.
    pub fn attach_with_routes<S>(
        source: &S,
        navigator: Rc<dyn Navigator>,
        options: GuardOptions,
        routes: GuardRoutes,
    ) -> Self
    where
        S: AuthStateSource + ?Sized,
    {
        let core = Rc::new(RefCell::new(GuardCore {
            options,
            routes,
            snapshot: AuthState::loading(),
            state: GuardState::Loading,
            issued: None,
        }));

        let weak = Rc::downgrade(&core);
        let listener_navigator = navigator.clone();
        let subscription = source.subscribe(Box::new(move |snapshot: &AuthState| {
            let Some(core) = weak.upgrade() else {
                return;
            };
            let redirect = core.borrow_mut().observe(snapshot);
            if let Some(target) = redirect {
                listener_navigator.navigate(&target);
            }
        }));

        Self {
            core,
            navigator,
            _subscription: subscription,
        }
    }

    /// Current decision.
    pub fn state(&self) -> GuardState {
        self.core.borrow().state
    }

    /// Returns `true` if the protected view may render.
    pub fn may_render(&self) -> bool {
        self.state() == GuardState::Authorized
    }

    /// Derived session state, recomputed from the latest snapshot.
    pub fn view(&self) -> SessionView {
        SessionView::from_snapshot(&self.core.borrow().snapshot)
    }

    /// Current options.
    pub fn options(&self) -> GuardOptions {
        self.core.borrow().options.clone()
    }

    /// Replaces the options and re-evaluates.
    pub fn set_options(&self, options: GuardOptions) {
        let redirect = {
            let mut core = self.core.borrow_mut();
            if core.options == options {
                return;
            }
            core.options = options;
            core.reevaluate()
        };

        if let Some(target) = redirect {
            self.navigator.navigate(&target);
        }
    }

    /// Changes the path carried to the login view.
    pub fn set_redirect_path(&self, redirect_path: impl Into<String>) {
        let mut options = self.options();
        options.redirect_path = redirect_path.into();
        self.set_options(options);
    }

    /// Turns the email verification requirement on or off.
    pub fn set_require_email_verification(&self, required: bool) {
        let mut options = self.options();
        options.require_email_verification = required;
        self.set_options(options);
    }
}

impl std::fmt::Debug for SessionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGuard")
            .field("core", &*self.core.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{AuthStateChannel, RecordingNavigator};

    fn user() -> Identity {
        Identity::new("u1", "ada@example.com")
    }

    fn setup(options: GuardOptions) -> (AuthStateChannel, Rc<RecordingNavigator>, SessionGuard) {
        let channel = AuthStateChannel::new();
        let navigator = Rc::new(RecordingNavigator::new());
        let guard = SessionGuard::attach(&channel, navigator.clone(), options);
        (channel, navigator, guard)
    }

    #[test]
    fn no_redirect_while_loading() {
        let (channel, navigator, guard) = setup(GuardOptions::new("/mathlab"));

        channel.publish(AuthState::loading());
        channel.publish(AuthState::loading());

        assert_eq!(guard.state(), GuardState::Loading);
        assert!(!guard.may_render());
        assert!(guard.view().is_loading);
        assert_eq!(navigator.redirect_count(), 0);
    }

    #[test]
    fn signed_out_redirects_to_login_once() {
        let (channel, navigator, guard) = setup(GuardOptions::new("/mathlab"));

        channel.publish(AuthState::signed_out());
        channel.publish(AuthState::signed_out());

        assert_eq!(guard.state(), GuardState::Unauthenticated);
        assert_eq!(navigator.redirect_count(), 1);
        let target = navigator.last().unwrap();
        assert_eq!(target.path, "/login");
        assert_eq!(target.return_to.as_deref(), Some("/mathlab"));
    }

    #[test]
    fn unverified_redirects_to_verify_email() {
        let (channel, navigator, guard) =
            setup(GuardOptions::new("/mathlab").require_email_verification());

        channel.publish(AuthState::signed_in(user(), false));

        assert_eq!(guard.state(), GuardState::Unverified);
        assert_eq!(navigator.hrefs(), vec!["/verify-email".to_string()]);
        assert!(guard.view().is_authenticated);
        assert!(!guard.may_render());
    }

    #[test]
    fn authorized_renders_without_redirect() {
        let (channel, navigator, guard) =
            setup(GuardOptions::new("/mathlab").require_email_verification());

        channel.publish(AuthState::signed_in(user(), true).with_user_data(UserData {
            display_name: Some("Ada".to_string()),
            ..UserData::default()
        }));

        assert!(guard.may_render());
        assert_eq!(navigator.redirect_count(), 0);

        let view = guard.view();
        assert!(view.is_authenticated);
        assert!(!view.is_loading);
        assert!(view.is_email_verified);
        assert_eq!(view.user, Some(user()));
        assert_eq!(
            view.user_data.and_then(|d| d.display_name).as_deref(),
            Some("Ada")
        );
    }

    #[test]
    fn verification_not_required_ignores_flag() {
        let (channel, navigator, guard) = setup(GuardOptions::new("/settings"));

        channel.publish(AuthState::signed_in(user(), false));

        assert!(guard.may_render());
        assert_eq!(navigator.redirect_count(), 0);
    }

    #[test]
    fn turning_on_verification_reevaluates() {
        let (channel, navigator, guard) = setup(GuardOptions::new("/settings"));
        channel.publish(AuthState::signed_in(user(), false));
        assert!(guard.may_render());

        guard.set_require_email_verification(true);

        assert_eq!(guard.state(), GuardState::Unverified);
        assert_eq!(navigator.hrefs(), vec!["/verify-email".to_string()]);
    }

    #[test]
    fn changing_redirect_path_reissues_login() {
        let (channel, navigator, guard) = setup(GuardOptions::new("/mathlab"));
        channel.publish(AuthState::signed_out());

        guard.set_redirect_path("/mathlab/history");
        guard.set_redirect_path("/mathlab/history");

        assert_eq!(
            navigator.hrefs(),
            vec![
                "/login?redirectTo=%2Fmathlab".to_string(),
                "/login?redirectTo=%2Fmathlab%2Fhistory".to_string(),
            ]
        );
    }

    #[test]
    fn sign_in_then_out_redirects_again() {
        let (channel, navigator, _guard) = setup(GuardOptions::new("/mathlab"));

        channel.publish(AuthState::signed_out());
        channel.publish(AuthState::signed_in(user(), true));
        channel.publish(AuthState::signed_out());

        assert_eq!(navigator.redirect_count(), 2);
    }

    #[test]
    fn loading_gap_reissues_login() {
        let (channel, navigator, guard) = setup(GuardOptions::new("/mathlab"));

        channel.publish(AuthState::signed_out());
        channel.publish(AuthState::loading());
        assert_eq!(navigator.redirect_count(), 1);

        channel.publish(AuthState::signed_out());

        assert_eq!(guard.state(), GuardState::Unauthenticated);
        assert_eq!(
            navigator.hrefs(),
            vec![
                "/login?redirectTo=%2Fmathlab".to_string(),
                "/login?redirectTo=%2Fmathlab".to_string(),
            ]
        );
    }

    #[test]
    fn loading_gap_reissues_verify_email() {
        let (channel, navigator, guard) =
            setup(GuardOptions::new("/mathlab").require_email_verification());

        channel.publish(AuthState::signed_in(user(), false));
        channel.publish(AuthState::loading());
        channel.publish(AuthState::signed_in(user(), false));

        assert_eq!(guard.state(), GuardState::Unverified);
        assert_eq!(navigator.redirect_count(), 2);
    }

    #[test]
    fn repeated_snapshot_without_gap_does_not_duplicate() {
        let (channel, navigator, _guard) =
            setup(GuardOptions::new("/mathlab").require_email_verification());

        channel.publish(AuthState::signed_in(user(), false));
        channel.publish(AuthState::signed_in(user(), false));
        channel.publish(AuthState::signed_in(user(), false).with_user_data(UserData::default()));

        assert_eq!(navigator.redirect_count(), 1);
    }

    #[test]
    fn custom_routes() {
        let channel = AuthStateChannel::with_state(AuthState::signed_out());
        let navigator = Rc::new(RecordingNavigator::new());
        let routes = GuardRoutes {
            login: "/auth/sign-in".to_string(),
            verify_email: "/auth/verify".to_string(),
        };

        let _guard = SessionGuard::attach_with_routes(
            &channel,
            navigator.clone(),
            GuardOptions::new("/admin"),
            routes,
        );

        assert_eq!(
            navigator.hrefs(),
            vec!["/auth/sign-in?redirectTo=%2Fadmin".to_string()]
        );
    }

    #[test]
    fn dropped_guard_stops_listening() {
        let (channel, navigator, guard) = setup(GuardOptions::new("/mathlab"));
        drop(guard);

        channel.publish(AuthState::signed_out());

        assert_eq!(channel.listener_count(), 0);
        assert_eq!(navigator.redirect_count(), 0);
    }

    #[test]
    fn closure_navigator() {
        let channel = AuthStateChannel::new();
        let hrefs = Rc::new(RefCell::new(Vec::new()));
        let sink = hrefs.clone();
        let navigator: Rc<dyn Navigator> =
            Rc::new(move |target: &RedirectTarget| sink.borrow_mut().push(target.href()));

        let _guard = SessionGuard::attach(&channel, navigator, GuardOptions::new("/admin"));
        channel.publish(AuthState::signed_out());

        assert_eq!(*hrefs.borrow(), vec!["/login?redirectTo=%2Fadmin".to_string()]);
    }
}
