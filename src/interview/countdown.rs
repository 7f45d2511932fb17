//! Live countdown for upcoming interviews.

use super::{evaluate, Application, Evaluation};
use crate::scope::ViewScope;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Whole seconds left until a target, never negative
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Countdown {
    remaining_secs: i64,
}

impl Countdown {
    pub fn until(target: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let millis = (target - now).num_milliseconds();
        Self {
            remaining_secs: if millis <= 0 { 0 } else { millis / 1000 },
        }
    }

    pub fn remaining_secs(&self) -> i64 {
        self.remaining_secs
    }

    pub fn is_zero(&self) -> bool {
        self.remaining_secs == 0
    }
}

/// `HH:MM:SS`; hours keep growing past 24
impl std::fmt::Display for Countdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hours = self.remaining_secs / 3600;
        let minutes = (self.remaining_secs % 3600) / 60;
        let seconds = self.remaining_secs % 60;
        write!(f, "{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

/// Shortest period the ticker accepts
pub const MIN_TICK: Duration = Duration::from_millis(1);
/// Longest period that still refreshes the countdown every second
pub const MAX_TICK: Duration = Duration::from_secs(1);

/// Re-evaluates one application on a fixed period until cancelled, dropped,
/// or the interview reaches a terminal state. Nothing is published after
/// cancellation.
#[derive(Debug)]
pub struct CountdownTicker {
    rx: watch::Receiver<Evaluation>,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl CountdownTicker {
    /// Tick against the wall clock
    pub fn start(application: Application, period: Duration) -> Self {
        Self::spawn(application, period, Utc::now, CancellationToken::new())
    }

    /// Tick until `scope` is disposed or the ticker is dropped
    pub fn start_in(scope: &ViewScope, application: Application, period: Duration) -> Self {
        Self::spawn(application, period, Utc::now, scope.child_token())
    }

    pub fn start_with_clock<C>(application: Application, period: Duration, clock: C) -> Self
    where
        C: Fn() -> DateTime<Utc> + Send + 'static,
    {
        Self::spawn(application, period, clock, CancellationToken::new())
    }

    fn spawn<C>(
        application: Application,
        period: Duration,
        clock: C,
        cancel: CancellationToken,
    ) -> Self
    where
        C: Fn() -> DateTime<Utc> + Send + 'static,
    {
        let period = period.clamp(MIN_TICK, MAX_TICK);
        let initial = evaluate(&application, clock());
        let (tx, rx) = watch::channel(initial);
        let token = cancel.clone();
        let application_id = application.application_id;

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        tracing::trace!(application_id, "Countdown cancelled");
                        break;
                    }
                    _ = interval.tick() => {
                        let evaluation = evaluate(&application, clock());
                        let terminal = evaluation.state.is_terminal();
                        if token.is_cancelled() || tx.send(evaluation).is_err() {
                            break;
                        }
                        if terminal {
                            tracing::debug!(application_id, "Countdown reached terminal state");
                            break;
                        }
                    }
                }
            }
        });

        Self { rx, cancel, handle }
    }

    /// Latest published evaluation
    pub fn current(&self) -> Evaluation {
        self.rx.borrow().clone()
    }

    /// Wait for the next tick. `None` once the ticker has stopped.
    pub async fn changed(&mut self) -> Option<Evaluation> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for CountdownTicker {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
