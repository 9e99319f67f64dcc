
pub mod aggregator_core;
pub mod config;
pub mod gateway;
pub mod pipeline;
pub mod registry;
pub mod source;
pub mod state;
mod ui;

use {
    aggregator_core::AlertLog,
    config::Config,
    gateway::{GatewayConfig, MpesaGateway},
    pipeline::{engine::DashboardEngine, scheduler::refresh_scheduler_task, RefreshMessage},
    source::{current_timestamp, GatewayEventSource},
    state::DashboardState,
    std::sync::{Arc, Mutex},
    tokio::sync::{mpsc, Mutex as AsyncMutex, RwLock},
    tokio::time::Duration,
};

#[tokio::main]
pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = Config::from_env();

    // Write logs to stderr (suppressed once the UI enters the alternate screen)
    let mut builder = if config.rust_log.is_some() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
    } else {
        env_logger::Builder::from_default_env()
    };
    builder.target(env_logger::Target::Stderr).init();

    log::info!("Starting PesaFlow...");
    log::info!("Configuration:");
    log::info!("   Region: {}", config.default_region);
    log::info!("   Refresh interval: {}ms", config.refresh_interval_ms);
    log::info!("   Gateway: {}", config.mpesa_base_url);
    log::info!("   Users file: {}", config.users_file);

    // Process-wide alert log, shared by every dashboard session
    let alerts = Arc::new(Mutex::new(AlertLog::with_default_capacity()));

    let seed = config
        .rng_seed
        .unwrap_or_else(|| current_timestamp() as u64);
    let gateway = MpesaGateway::new(GatewayConfig::from_config(&config))?;
    let engine = Arc::new(AsyncMutex::new(DashboardEngine::new(
        Box::new(GatewayEventSource::new(gateway)),
        alerts.clone(),
        seed,
    )));

    let state = Arc::new(RwLock::new(DashboardState::new(&config.default_region)));
    let (tx, rx) = mpsc::channel::<RefreshMessage>(16);

    // Spawn background scheduler task
    let scheduler_handle = tokio::spawn(refresh_scheduler_task(
        engine.clone(),
        state.clone(),
        rx,
        Duration::from_millis(config.refresh_interval_ms),
    ));

    // Spawn UI task (needed for terminal interface)
    let state_for_ui = state.clone();
    let ui_handle = tokio::spawn(async move {
        if let Err(e) = ui::run_ui(state_for_ui, tx).await {
            log::error!("UI error: {}", e);
        }
    });

    tokio::select! {
        _ = ui_handle => {
            log::info!("UI exited");
        }
        _ = scheduler_handle => {
            log::info!("Scheduler exited");
        }
    }

    Ok(())
}
