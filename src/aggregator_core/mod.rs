//! Aggregation core - windowing, derived series, trend classification, alerts
//!
//! # Architecture
//!
//! ```text
//! EventSource → window::build_series (1-minute buckets, synthetic fallback)
//!     ↓
//! breakdown (payment / sector allocations, hourly heatmap, top regions)
//!     ↓
//! TrendClassifier (SPIKE, DROP, STABLE thresholds)
//!     ↓
//! AlertLog (bounded FIFO, process-wide)
//! ```

pub mod alert_log;
pub mod breakdown;
pub mod classifier;
pub mod window;

pub use alert_log::{AlertEntry, AlertLog, ALERT_CAPACITY};
pub use breakdown::{
    allocate_series, hourly_heatmap, top_regions, AllocationStrategy, FixedAllocation,
    SimplexAllocation, WindowAllocation,
};
pub use classifier::{TrendClassifier, TrendReading, TrendSignal};
pub use window::{build_series, synthetic_series, WindowBucket, SERIES_LEN, WINDOW_SECS};
