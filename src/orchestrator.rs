// File: src/orchestrator.rs
use crate::client::{DuckSource, FetchError};
use crate::model::DuckRecord;
use log::{debug, error, info};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq)]
pub enum InitialOutcome {
    Mounted(DuckRecord),
    Failed(FetchError),
    /// The screen stopped being visible before the answer came back.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Fetched(Result<DuckRecord, FetchError>),
    Cancelled,
}

/// Cancellation scopes for one screen instance.
///
/// The visible scope is a child of the screen scope: destroying the screen
/// also abandons anything bound to visibility.
#[derive(Debug)]
pub struct Lifecycle {
    screen: CancellationToken,
    visible: CancellationToken,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        let screen = CancellationToken::new();
        let visible = screen.child_token();
        Self { screen, visible }
    }

    pub fn screen_scope(&self) -> CancellationToken {
        self.screen.clone()
    }

    pub fn visible_scope(&self) -> CancellationToken {
        self.visible.clone()
    }

    /// Starts a new visible window. Returns the scope for work bound to it.
    pub fn show(&mut self) -> CancellationToken {
        if self.visible.is_cancelled() {
            self.visible = self.screen.child_token();
        }
        self.visible.clone()
    }

    pub fn hide(&self) {
        self.visible.cancel();
    }

    pub fn destroy(&self) {
        self.screen.cancel();
    }

    pub fn is_destroyed(&self) -> bool {
        self.screen.is_cancelled()
    }
}

/// Drives the two call sites of the duck API and reports outcomes; state
/// changes are left to whoever owns the `ScreenState`.
pub struct FetchOrchestrator<S: ?Sized> {
    source: Arc<S>,
}

impl<S: ?Sized> Clone for FetchOrchestrator<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
        }
    }
}

impl<S: DuckSource + ?Sized> FetchOrchestrator<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    pub async fn initial(&self, visible: CancellationToken) -> InitialOutcome {
        tokio::select! {
            biased;
            _ = visible.cancelled() => {
                debug!("initial fetch abandoned: screen no longer visible");
                InitialOutcome::Cancelled
            }
            res = self.source.fetch_duck() => match res {
                Ok(duck) => InitialOutcome::Mounted(duck),
                Err(e) => {
                    log_failure("initial", &e);
                    InitialOutcome::Failed(e)
                }
            }
        }
    }

    pub async fn refresh(&self, screen: CancellationToken) -> RefreshOutcome {
        tokio::select! {
            biased;
            _ = screen.cancelled() => {
                debug!("refresh abandoned: screen destroyed");
                RefreshOutcome::Cancelled
            }
            res = self.source.fetch_duck() => {
                match &res {
                    Ok(duck) => info!("refreshed duck: {}", duck.url),
                    Err(e) => log_failure("refresh", e),
                }
                RefreshOutcome::Fetched(res)
            }
        }
    }
}

fn log_failure(which: &str, e: &FetchError) {
    match e {
        FetchError::Transport(reason) => {
            error!("{} fetch: you might not have an internet connection ({})", which, reason)
        }
        FetchError::Protocol(reason) => {
            error!("{} fetch: unexpected response ({})", which, reason)
        }
    }
}
