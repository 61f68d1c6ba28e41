use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use backend_application::commands::{playtime_commands, public_ip_commands};
use backend_application::AppState;

/// Handles of the periodic jobs started at boot.
pub struct BackgroundJobs {
    playtime: JoinHandle<()>,
    reconcile: JoinHandle<()>,
}

impl BackgroundJobs {
    pub fn spawn(state: AppState) -> Self {
        let playtime_state = state.clone();
        let playtime = spawn_periodic(
            "playtime",
            Duration::from_secs(state.config.playtime_interval_seconds),
            move || {
                let state = playtime_state.clone();
                async move {
                    // Failures are already journaled by the command.
                    let _ = playtime_commands::record_playtime_tick(&state).await;
                }
            },
        );

        let reconcile_state = state.clone();
        let reconcile = spawn_periodic(
            "ip-reconcile",
            Duration::from_secs(state.config.reconcile_interval_seconds),
            move || {
                let state = reconcile_state.clone();
                async move {
                    let _ = public_ip_commands::reconcile_public_ip(&state).await;
                }
            },
        );

        info!(
            playtime_secs = state.config.playtime_interval_seconds,
            reconcile_secs = state.config.reconcile_interval_seconds,
            "background jobs started"
        );
        Self { playtime, reconcile }
    }

    pub fn abort(&self) {
        self.playtime.abort();
        self.reconcile.abort();
    }
}

/// Runs `task` now and then once per `period`. Ticks missed while a run is
/// still in progress are skipped rather than queued.
pub fn spawn_periodic<F, Fut>(name: &'static str, period: Duration, task: F) -> JoinHandle<()>
where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            debug!(job = name, "tick");
            task().await;
        }
    })
}
