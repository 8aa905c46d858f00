//! Client-side session gating.
//!
//! A [`SessionGuard`] sits in front of a protected view. It observes the
//! identity provider through an [`AuthStateSource`] and, on every change,
//! decides between four states:
//!
//! ```text
//! loading ──────────────────────────────> (wait, no redirect)
//! resolved, no user ────────────────────> unauthenticated → /login?redirectTo=<path>
//! user, verification required, unverified > unverified    → /verify-email
//! user, (not required | verified) ──────> authorized      (render)
//! ```
//!
//! The decision itself is the pure function [`evaluate`]; the guard adds
//! subscription, redirect de-duplication and the [`SessionView`] query
//! surface.

mod auth_state;
mod channel;
mod decision;
mod guard;
mod navigator;

pub use auth_state::{AuthState, Identity, UserData, UserRole};
pub use channel::{AuthStateChannel, AuthStateSource, Listener, Subscription};
pub use decision::{evaluate, GuardOptions, GuardRoutes, GuardState, RedirectTarget};
pub use guard::{SessionGuard, SessionView};
pub use navigator::{Navigator, RecordingNavigator};
