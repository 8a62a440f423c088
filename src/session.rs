// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Current-user state and the auth guard for dashboard views.
//!
//! [`SessionWatch`] carries the identity provider's current-user signal.
//! It starts out loading and settles once the provider reports either a
//! user or nobody. [`AuthGuard`] turns a [`SessionContext`] snapshot into
//! what the view should show.

use crate::middleware::session_gate::SIGN_IN_PATH;
use crate::services::identity::VerifiedUser;
use serde::Serialize;
use tokio::sync::watch;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Signed-in user as seen by views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionUser {
    pub uid: String,
    pub email: Option<String>,
}

impl From<VerifiedUser> for SessionUser {
    fn from(user: VerifiedUser) -> Self {
        Self {
            uid: user.uid,
            email: user.email,
        }
    }
}

/// Snapshot of the current-user signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub user: Option<SessionUser>,
    /// True until the provider has reported for the first time.
    pub loading: bool,
}

impl SessionContext {
    pub fn loading() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }

    pub fn signed_in(user: SessionUser) -> Self {
        Self {
            user: Some(user),
            loading: false,
        }
    }

    pub fn signed_out() -> Self {
        Self {
            user: None,
            loading: false,
        }
    }
}

/// Publish/subscribe handle for the current-user signal.
#[derive(Debug, Clone)]
pub struct SessionWatch {
    tx: watch::Sender<SessionContext>,
}

impl Default for SessionWatch {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionWatch {
    /// New signal in the loading state.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionContext::loading());
        Self { tx }
    }

    /// Replace the current context and notify subscribers.
    pub fn publish(&self, ctx: SessionContext) {
        self.tx.send_replace(ctx);
    }

    pub fn current(&self) -> SessionContext {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionContext> {
        self.tx.subscribe()
    }

    /// Wait for the first context that is no longer loading.
    pub async fn resolved(&self) -> SessionContext {
        let mut rx = self.tx.subscribe();
        let ctx = match rx.wait_for(|ctx| !ctx.loading).await {
            Ok(ctx) => ctx.clone(),
            // Sender lives in self, so the channel cannot close while we wait
            Err(_) => SessionContext::signed_out(),
        };
        ctx
    }
}

/// What a guarded view should do for a given context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Placeholder,
    /// Navigate to the sign-in page; the placeholder stays on screen meanwhile.
    RedirectToSignIn,
    Render(SessionUser),
}

/// A view wrapped by the guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum GuardedView<T> {
    Placeholder,
    Redirect { location: String },
    Ready(T),
}

impl<T> GuardedView<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, GuardedView::Ready(_))
    }
}

/// Gate for views that need a signed-in user.
#[derive(Debug, Clone)]
pub struct AuthGuard {
    sign_in_path: String,
}

impl Default for AuthGuard {
    fn default() -> Self {
        Self {
            sign_in_path: SIGN_IN_PATH.to_string(),
        }
    }
}

impl AuthGuard {
    pub fn new(sign_in_path: impl Into<String>) -> Self {
        Self {
            sign_in_path: sign_in_path.into(),
        }
    }

    pub fn sign_in_path(&self) -> &str {
        &self.sign_in_path
    }

    pub fn check(&self, ctx: &SessionContext) -> GuardOutcome {
        if ctx.loading {
            return GuardOutcome::Placeholder;
        }
        match &ctx.user {
            Some(user) => GuardOutcome::Render(user.clone()),
            None => GuardOutcome::RedirectToSignIn,
        }
    }

    /// Run `view` only when a user is signed in.
    pub fn render<T, F>(&self, ctx: &SessionContext, view: F) -> GuardedView<T>
    where
        F: FnOnce(&SessionUser) -> T,
    {
        match self.check(ctx) {
            GuardOutcome::Placeholder => GuardedView::Placeholder,
            GuardOutcome::RedirectToSignIn => GuardedView::Redirect {
                location: self.sign_in_path.clone(),
            },
            GuardOutcome::Render(user) => GuardedView::Ready(view(&user)),
        }
    }
}
