//! Property tests for the integrity layer.
//!
//! These validate the decision invariants over generated inputs: token
//! pairs, directive tables and auth-state sequences.

use std::cell::Cell;
use std::rc::Rc;

use proptest::prelude::*;
use session_integrity::session::{
    evaluate, AuthState, AuthStateChannel, GuardOptions, GuardState, Identity, RecordingNavigator,
    SessionGuard,
};
use session_integrity::web::{CsrfGuard, Handler, HttpMethod, Layer, Request, Response};
use session_integrity::{build_policy, is_valid, CspDirectiveTable, Token};

// Strategy: token-ish strings, including the empty string
fn arb_token() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[A-Za-z0-9_-]{1,32}"]
}

fn arb_method() -> impl Strategy<Value = HttpMethod> {
    prop_oneof![
        Just(HttpMethod::Get),
        Just(HttpMethod::Head),
        Just(HttpMethod::Post),
        Just(HttpMethod::Put),
        Just(HttpMethod::Patch),
        Just(HttpMethod::Delete),
        Just(HttpMethod::Options),
    ]
}

// Strategy: any snapshot the provider could publish
fn arb_auth_state() -> impl Strategy<Value = AuthState> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(loading, has_user, verified)| {
        AuthState {
            user: has_user.then(|| Identity::new("u1", "u1@example.com")),
            user_data: None,
            is_email_verified: verified,
            loading,
        }
    })
}

fn arb_path() -> impl Strategy<Value = String> {
    "/[a-z]{1,10}(/[a-z]{1,10})?"
}

proptest! {
    /// Property: a pair with an absent or empty half never validates
    #[test]
    fn proptest_incomplete_pairs_are_invalid(token in arb_token()) {
        let t = Token::new(token.clone());
        prop_assert!(!is_valid(Some(&t), None));
        prop_assert!(!is_valid(None, Some(&t)));
        prop_assert!(!is_valid(Some(&Token::new("")), Some(&t)));
        prop_assert!(!is_valid(Some(&t), Some(&Token::new(""))));
    }

    /// Property: validity is exactly "both non-empty and equal"
    #[test]
    fn proptest_validity_matches_equality(a in arb_token(), b in arb_token()) {
        let expected = !a.is_empty() && !b.is_empty() && a == b;
        prop_assert_eq!(is_valid(Some(&Token::new(a)), Some(&Token::new(b))), expected);
    }

    /// Property: the guard forwards iff GET or the pair validates, and
    /// rejections always carry the fixed JSON body
    #[test]
    fn proptest_guard_forwards_only_valid_or_get(
        method in arb_method(),
        csrf in prop::option::of(arb_token()),
        session in prop::option::of(arb_token()),
    ) {
        let calls = Cell::new(0);
        let guarded = CsrfGuard::new().wrap(|_: &Request, _: &()| {
            calls.set(calls.get() + 1);
            Response::new(200)
        });

        let mut request = Request::new("req-prop", method, "/api/x");
        if let Some(c) = &csrf {
            request = request.with_header("x-csrf-token", c.clone());
        }
        if let Some(s) = &session {
            request = request.with_header("x-session-token", s.clone());
        }

        let response = guarded.call(&request, &());

        let pair_ok = matches!((&csrf, &session), (Some(c), Some(s)) if !c.is_empty() && c == s);
        if method == HttpMethod::Get || pair_ok {
            prop_assert_eq!(calls.get(), 1);
            prop_assert_eq!(response.status(), 200);
        } else {
            prop_assert_eq!(calls.get(), 0);
            prop_assert_eq!(response.status(), 403);
            prop_assert_eq!(response.body(), br#"{"error":"Invalid CSRF token"}"#.as_slice());
        }
    }

    /// Property: bare directives render as their name, others as "name v1 v2",
    /// joined with "; " in insertion order
    #[test]
    fn proptest_policy_rendering(
        entries in prop::collection::vec(
            ("[a-z]{3,8}(-[a-z]{2,6})?", prop::collection::vec("'?[a-z]{2,8}'?", 0..4)),
            1..6,
        )
    ) {
        let mut table = CspDirectiveTable::new();
        let mut expected: Vec<(String, Vec<String>)> = Vec::new();
        for (name, sources) in entries {
            table = table.with(name.clone(), sources.clone());
            match expected.iter_mut().find(|(n, _)| *n == name) {
                Some((_, s)) => *s = sources,
                None => expected.push((name, sources)),
            }
        }

        let rendered = build_policy(&table);
        let fragments: Vec<&str> = rendered.split("; ").collect();
        prop_assert_eq!(fragments.len(), expected.len());

        for (fragment, (name, sources)) in fragments.iter().zip(&expected) {
            if sources.is_empty() {
                prop_assert_eq!(*fragment, name.as_str());
            } else {
                prop_assert_eq!(fragment.to_string(), format!("{} {}", name, sources.join(" ")));
            }
        }
    }

    /// Property: the guard's terminal decision depends only on the last snapshot,
    /// every entry into a redirecting state redirects once, and no redirect
    /// is ever issued for a sequence of loading snapshots
    #[test]
    fn proptest_session_terminal_decision(
        sequence in prop::collection::vec(arb_auth_state(), 1..8),
        require_verification in any::<bool>(),
        path in arb_path(),
    ) {
        let mut options = GuardOptions::new(path.clone());
        options.require_email_verification = require_verification;

        let channel = AuthStateChannel::new();
        let navigator = Rc::new(RecordingNavigator::new());
        let guard = SessionGuard::attach(&channel, navigator.clone(), options.clone());

        let (last, earlier) = sequence.split_last().unwrap();
        for snapshot in earlier {
            channel.publish(snapshot.clone());
        }
        let previous = guard.state();
        let redirects_before = navigator.redirect_count();

        channel.publish(last.clone());

        let terminal = evaluate(last, &options);
        prop_assert_eq!(guard.state(), terminal);

        // Entering a redirecting state issues exactly one redirect; staying
        // in it or leaving it issues none.
        let redirecting = matches!(terminal, GuardState::Unauthenticated | GuardState::Unverified);
        let expected = usize::from(redirecting && previous != terminal);
        prop_assert_eq!(navigator.redirect_count() - redirects_before, expected);

        if sequence.iter().all(|s| s.loading) {
            prop_assert_eq!(navigator.redirect_count(), 0);
        }

        match terminal {
            GuardState::Unauthenticated => {
                let target = navigator.last().expect("login redirect issued");
                prop_assert_eq!(target.path.as_str(), "/login");
                prop_assert_eq!(target.return_to.as_deref(), Some(path.as_str()));
            }
            GuardState::Unverified => {
                let target = navigator.last().expect("verify redirect issued");
                prop_assert_eq!(target.path.as_str(), "/verify-email");
            }
            GuardState::Authorized => {
                prop_assert!(guard.view().is_authenticated);
                prop_assert!(guard.may_render());
            }
            GuardState::Loading => {
                prop_assert!(guard.view().is_loading);
                prop_assert!(!guard.may_render());
            }
        }
    }
}
