//! Integration tests for the refresh scheduler driving the pipeline
//!
//! Tests verify the full session wiring: scheduler task, engine, shared
//! dashboard state and the process-wide alert log, including region
//! switching through the message channel.

#[cfg(test)]
mod scheduler_integration_tests {
    use pesaflow::aggregator_core::{AlertLog, ALERT_CAPACITY};
    use pesaflow::pipeline::{refresh_scheduler_task, DashboardEngine, RefreshMessage};
    use pesaflow::source::{PaymentType, Sector, StaticEventSource, TransactionEvent};
    use pesaflow::state::DashboardState;
    use std::sync::{Arc, Mutex as StdMutex};
    use tokio::sync::{mpsc, Mutex, RwLock};
    use tokio::time::Duration;

    fn spike_events(region: &str, base: i64) -> Vec<TransactionEvent> {
        let mut events = Vec::new();
        for minute in 0..9 {
            for _ in 0..10 {
                events.push(TransactionEvent {
                    timestamp: base + minute * 60,
                    region: region.to_string(),
                    payment_type: PaymentType::MobileWallet,
                    sector: Sector::Retail,
                });
            }
        }
        for _ in 0..100 {
            events.push(TransactionEvent {
                timestamp: base + 9 * 60,
                region: region.to_string(),
                payment_type: PaymentType::MobileWallet,
                sector: Sector::Retail,
            });
        }
        events
    }

    #[tokio::test]
    async fn test_session_publishes_and_switches_region() {
        let alerts = Arc::new(StdMutex::new(AlertLog::with_default_capacity()));
        let engine = Arc::new(Mutex::new(DashboardEngine::new(
            Box::new(StaticEventSource::empty()),
            alerts,
            7,
        )));
        let state = Arc::new(RwLock::new(DashboardState::new("Nairobi")));
        let (tx, rx) = mpsc::channel(8);

        let task = tokio::spawn(refresh_scheduler_task(
            engine,
            state.clone(),
            rx,
            Duration::from_millis(20),
        ));

        tokio::time::sleep(Duration::from_millis(100)).await;
        {
            let state = state.read().await;
            let snapshot = state.snapshot.as_ref().expect("published after tick");
            assert_eq!(snapshot.region, "Nairobi");
            assert_eq!(snapshot.series.window_series.len(), 60);
        }

        tx.send(RefreshMessage::SelectRegion("Eldoret".to_string()))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        {
            let state = state.read().await;
            assert_eq!(state.region, "Eldoret");
            assert_eq!(state.snapshot.as_ref().unwrap().region, "Eldoret");
        }

        tx.send(RefreshMessage::Shutdown).await.unwrap();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_two_sessions_share_one_alert_log() {
        let alerts = Arc::new(StdMutex::new(AlertLog::with_default_capacity()));
        let base = 1_700_000_040;

        let mut handles = Vec::new();
        for region in ["Nairobi", "Mombasa"] {
            let engine = Arc::new(Mutex::new(DashboardEngine::new(
                Box::new(StaticEventSource::new(spike_events(region, base))),
                alerts.clone(),
                3,
            )));
            let state = Arc::new(RwLock::new(DashboardState::new(region)));
            let (tx, rx) = mpsc::channel(8);

            handles.push((
                tx,
                tokio::spawn(refresh_scheduler_task(
                    engine,
                    state,
                    rx,
                    Duration::from_millis(15),
                )),
            ));
        }

        // Let both sessions tick a few times against the shared log
        tokio::time::sleep(Duration::from_millis(120)).await;
        for (tx, task) in handles {
            tx.send(RefreshMessage::Shutdown).await.unwrap();
            task.await.unwrap();
        }

        let log = alerts.lock().unwrap().snapshot();
        assert!(!log.is_empty());
        assert!(log.len() <= ALERT_CAPACITY);
        // Both sessions contributed spikes against the shared history
        let regions: std::collections::HashSet<&str> =
            log.iter().map(|a| a.region.as_str()).collect();
        assert!(regions.contains("Nairobi") || regions.contains("Mombasa"));
    }
}
