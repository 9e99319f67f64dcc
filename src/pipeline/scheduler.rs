//! Refresh scheduler driving periodic pipeline re-evaluation
//!
//! One task per dashboard session. Timer ticks and region changes are
//! handled by the same loop, so evaluations against the shared alert log
//! never overlap within a session.

use {
    super::engine::DashboardEngine,
    crate::source::current_timestamp,
    crate::state::DashboardState,
    std::sync::Arc,
    tokio::{
        sync::{mpsc, Mutex, RwLock},
        time::{interval, Duration},
    },
};

/// Message sent through the channel from the UI to the scheduler
#[derive(Debug, Clone)]
pub enum RefreshMessage {
    SelectRegion(String),
    Shutdown,
}

/// Periodically re-run the pipeline and publish the result.
///
/// Runs until a `Shutdown` message arrives or the channel closes. A tick
/// that takes longer than the interval simply delays the next one; missed
/// ticks are not retried, the next evaluation uses a fresh "now".
pub async fn refresh_scheduler_task(
    engine: Arc<Mutex<DashboardEngine>>,
    state: Arc<RwLock<DashboardState>>,
    mut receiver: mpsc::Receiver<RefreshMessage>,
    refresh_interval: Duration,
) {
    log::info!(
        "Refresh scheduler started (interval: {}ms)",
        refresh_interval.as_millis()
    );

    let mut timer = interval(refresh_interval);
    let mut region = { state.read().await.region.clone() };

    loop {
        tokio::select! {
            _ = timer.tick() => {
                refresh_once(&engine, &state, &region).await;
            }
            message = receiver.recv() => match message {
                Some(RefreshMessage::SelectRegion(next)) => {
                    log::info!("Region selection changed to {}", next);
                    region = next;
                    refresh_once(&engine, &state, &region).await;
                }
                Some(RefreshMessage::Shutdown) | None => {
                    log::info!("Refresh scheduler stopped");
                    break;
                }
            }
        }
    }
}

async fn refresh_once(
    engine: &Arc<Mutex<DashboardEngine>>,
    state: &Arc<RwLock<DashboardState>>,
    region: &str,
) {
    let (snapshot, alerts) = {
        let mut engine = engine.lock().await;
        let snapshot = engine.evaluate(region, current_timestamp()).await;
        (snapshot, engine.get_alert_log())
    };

    let mut state = state.write().await;
    state.region = region.to_string();
    state.snapshot = Some(snapshot);
    state.alerts = alerts;
}
