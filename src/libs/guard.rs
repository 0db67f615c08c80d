//! Auth redirect guard.
//!
//! Keeps a view's idea of "who is signed in" in step with the auth provider.
//! The guard subscribes on [`AuthGuard::attach`] and unsubscribes when it is
//! dropped. A notification without a session clears the held session and
//! sends the user to the login view; a notification with a session replaces
//! the held one.

use crate::api::AuthProvider;
use crate::libs::messages::Message;
use crate::libs::session::{Session, Subscription};
use crate::msg_warning;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Where the guard sends an unauthenticated user.
pub trait Navigator: Send + Sync {
    fn redirect_to_login(&self);
}

/// Terminal navigator: prints the hint and raises a flag the interactive
/// loop polls to switch to the login prompt.
#[derive(Debug, Default)]
pub struct ConsoleNavigator {
    pending: AtomicBool,
}

impl ConsoleNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether a redirect was requested since the last call.
    pub fn take_redirect(&self) -> bool {
        self.pending.swap(false, Ordering::SeqCst)
    }
}

impl Navigator for ConsoleNavigator {
    fn redirect_to_login(&self) {
        msg_warning!(Message::RedirectToLogin);
        self.pending.store(true, Ordering::SeqCst);
    }
}

#[derive(Default)]
struct GuardState {
    session: Option<Session>,
    /// Set once a redirect was issued for the current signed-out period.
    redirected: bool,
}

pub struct AuthGuard {
    state: Arc<Mutex<GuardState>>,
    navigator: Arc<dyn Navigator>,
    _subscription: Subscription,
}

impl AuthGuard {
    pub fn attach<A: AuthProvider>(auth: &A, navigator: Arc<dyn Navigator>) -> Self {
        let state = Arc::new(Mutex::new(GuardState::default()));

        let subscription = {
            let state = state.clone();
            let navigator = navigator.clone();
            auth.subscribe(move |session| Self::on_session_change(&state, navigator.as_ref(), session))
        };

        Self {
            state,
            navigator,
            _subscription: subscription,
        }
    }

    fn on_session_change(state: &Mutex<GuardState>, navigator: &dyn Navigator, session: Option<&Session>) {
        match session {
            Some(session) => {
                let mut state = state.lock();
                state.session = Some(session.clone());
                state.redirected = false;
            }
            None => {
                {
                    let mut state = state.lock();
                    state.session = None;
                    state.redirected = true;
                }
                tracing::debug!("session ended, redirecting to login");
                navigator.redirect_to_login();
            }
        }
    }

    pub fn session(&self) -> Option<Session> {
        self.state.lock().session.clone()
    }

    /// Records a session obtained outside the notification stream, such as
    /// the initial session check.
    pub fn hold(&self, session: Session) {
        let mut state = self.state.lock();
        state.session = Some(session);
        state.redirected = false;
    }

    /// Redirects unless a notification already did so for this signed-out
    /// period.
    pub fn require_login(&self) {
        let should_redirect = {
            let mut state = self.state.lock();
            state.session = None;
            !std::mem::replace(&mut state.redirected, true)
        };
        if should_redirect {
            self.navigator.redirect_to_login();
        }
    }
}
