//! Keeps a `DashboardView` current while filter state changes.
//!
//! Party and platform changes recompute right away. Search-term changes are
//! keystroke-paced, so they wait until typing pauses for the debounce period;
//! a newer state arriving during the wait supersedes the pending one. Callers
//! echo their own input immediately and never wait on recomputation.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::Config;
use crate::dashboard::{Dashboard, DashboardView};
use crate::filter::FilterState;

/// Handle to a background task publishing views for the latest filter state
pub struct LiveDashboard {
    input: watch::Sender<FilterState>,
    output: watch::Receiver<Arc<DashboardView>>,
    debounce: Duration,
    task: JoinHandle<()>,
}

impl LiveDashboard {
    /// Start publishing views, beginning with `initial`
    ///
    /// Must be called inside a tokio runtime.
    pub fn spawn(dashboard: Arc<Dashboard>, initial: FilterState, debounce: Duration) -> Self {
        let first = Arc::new(dashboard.view(&initial));
        let (input, input_rx) = watch::channel(initial);
        let (output_tx, output) = watch::channel(first);
        let task = tokio::spawn(run(dashboard, input_rx, output_tx, debounce));
        Self {
            input,
            output,
            debounce,
            task,
        }
    }

    /// Start publishing views with the configured search debounce
    pub fn from_config(dashboard: Arc<Dashboard>, initial: FilterState, config: &Config) -> Self {
        Self::spawn(dashboard, initial, config.search_debounce)
    }

    /// How long typing must pause before a search is applied
    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Latest committed filter state
    pub fn state(&self) -> FilterState {
        self.input.borrow().clone()
    }

    /// Commit a new filter state; returns without waiting for recomputation
    pub fn update(&self, state: FilterState) {
        self.input.send_replace(state);
    }

    /// Derive the next state from the current one and commit it
    pub fn modify(&self, f: impl FnOnce(&FilterState) -> FilterState) {
        let next = f(&self.input.borrow());
        self.update(next);
    }

    /// Most recently published view
    pub fn view(&self) -> Arc<DashboardView> {
        self.output.borrow().clone()
    }

    /// Receiver that is notified whenever a new view is published
    pub fn subscribe(&self) -> watch::Receiver<Arc<DashboardView>> {
        self.output.clone()
    }

    /// Stop the background task
    pub fn shutdown(self) {
        self.task.abort();
    }
}

async fn run(
    dashboard: Arc<Dashboard>,
    mut input: watch::Receiver<FilterState>,
    output: watch::Sender<Arc<DashboardView>>,
    debounce: Duration,
) {
    let mut applied = input.borrow_and_update().clone();

    while input.changed().await.is_ok() {
        let mut next = input.borrow_and_update().clone();

        while next.only_search_differs(&applied) {
            tokio::select! {
                _ = tokio::time::sleep(debounce) => break,
                changed = input.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    next = input.borrow_and_update().clone();
                }
            }
        }

        if next == applied {
            continue;
        }

        debug!(
            search = %next.search_term,
            party = ?next.selected_party,
            platform = %next.active_platform,
            "recomputing dashboard view"
        );
        let view = Arc::new(dashboard.view(&next));
        applied = next;
        if output.send(view).is_err() {
            break;
        }
    }
}
