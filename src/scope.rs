//! Lifetime scope for a mounted view.
//!
//! Work started on behalf of a view runs through [`ViewScope::run`]. Once the
//! view is disposed, pending results resolve to `None` and are never applied.

use std::future::Future;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Default)]
pub struct ViewScope {
    token: CancellationToken,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Await `fut` unless the scope is disposed first
    pub async fn run<F>(&self, fut: F) -> Option<F::Output>
    where
        F: Future,
    {
        if self.token.is_cancelled() {
            return None;
        }
        tokio::select! {
            biased;
            _ = self.token.cancelled() => None,
            output = fut => {
                if self.token.is_cancelled() {
                    None
                } else {
                    Some(output)
                }
            }
        }
    }

    /// Handle that disposes this scope from elsewhere, e.g. a navigation handler
    pub fn disposer(&self) -> ScopeDisposer {
        ScopeDisposer {
            token: self.token.clone(),
        }
    }

    /// Token for background tasks owned by this view
    pub fn child_token(&self) -> CancellationToken {
        self.token.child_token()
    }

    pub fn dispose(&self) {
        if !self.token.is_cancelled() {
            tracing::trace!("View scope disposed");
        }
        self.token.cancel();
    }

    pub fn is_disposed(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[derive(Debug, Clone)]
pub struct ScopeDisposer {
    token: CancellationToken,
}

impl ScopeDisposer {
    pub fn dispose(&self) {
        self.token.cancel();
    }
}
