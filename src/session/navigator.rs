use std::cell::RefCell;

use super::RedirectTarget;

/// The router the session guard issues redirects to.
pub trait Navigator {
    /// Navigates to `target`.
    fn navigate(&self, target: &RedirectTarget);
}

impl<F> Navigator for F
where
    F: Fn(&RedirectTarget),
{
    fn navigate(&self, target: &RedirectTarget) {
        self(target)
    }
}

/// A [`Navigator`] that records redirects instead of performing them.
///
/// Useful for tests and server-side rendering, where the caller decides
/// what to do with the recorded targets.
///
/// # Examples
///
/// ```
/// use session_integrity::session::{GuardRoutes, Navigator, RecordingNavigator, RedirectTarget};
///
/// let navigator = RecordingNavigator::new();
/// navigator.navigate(&RedirectTarget::verify_email(&GuardRoutes::default()));
///
/// assert_eq!(navigator.redirect_count(), 1);
/// assert_eq!(navigator.hrefs(), vec!["/verify-email".to_string()]);
/// ```
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    redirects: RefCell<Vec<RedirectTarget>>,
}

impl RecordingNavigator {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded redirects.
    pub fn redirect_count(&self) -> usize {
        self.redirects.borrow().len()
    }

    /// Snapshot of all recorded redirects.
    pub fn redirects(&self) -> Vec<RedirectTarget> {
        self.redirects.borrow().clone()
    }

    /// Rendered URLs of all recorded redirects.
    pub fn hrefs(&self) -> Vec<String> {
        self.redirects.borrow().iter().map(RedirectTarget::href).collect()
    }

    /// The most recent redirect, if any.
    pub fn last(&self) -> Option<RedirectTarget> {
        self.redirects.borrow().last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, target: &RedirectTarget) {
        self.redirects.borrow_mut().push(target.clone());
    }
}
