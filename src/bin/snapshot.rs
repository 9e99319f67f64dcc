//! Snapshot Binary - headless one-shot pipeline evaluation
//!
//! Runs the full aggregation pipeline once for a region and prints the
//! resulting snapshot as JSON. Useful for piping into other tools and for
//! eyeballing the series without the TUI.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin snapshot -- Nairobi
//! ```
//!
//! ## Environment Variables
//!
//! - DEFAULT_REGION - Region when no argument is given (default: Nairobi)
//! - RNG_SEED - Seed for the synthetic data draws (default: current time)
//! - RUST_LOG - Logging level (optional)

use pesaflow::aggregator_core::AlertLog;
use pesaflow::pipeline::engine::DashboardEngine;
use pesaflow::source::{current_timestamp, StaticEventSource};
use std::env;
use std::sync::{Arc, Mutex};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    dotenv::dotenv().ok();

    let region = env::args()
        .nth(1)
        .or_else(|| env::var("DEFAULT_REGION").ok())
        .unwrap_or_else(|| "Nairobi".to_string());
    let seed = env::var("RNG_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| current_timestamp() as u64);

    log::info!("Evaluating pipeline for {} (seed {})", region, seed);

    let alerts = Arc::new(Mutex::new(AlertLog::with_default_capacity()));
    let mut engine = DashboardEngine::new(Box::new(StaticEventSource::empty()), alerts, seed);

    let snapshot = engine.evaluate(&region, current_timestamp()).await;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    Ok(())
}
