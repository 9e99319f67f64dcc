//! Dashboard pipeline - engine and refresh scheduling
//!
//! The engine performs one evaluation (events → windows → derived series
//! → classification → alert); the scheduler re-runs it on a fixed cadence
//! and on region changes, publishing each result into the shared
//! dashboard state.

pub mod engine;
pub mod scheduler;

pub use engine::{
    DashboardEngine, DashboardSnapshot, RegionStats, SeriesBundle, AVG_TRANSACTION_VALUE_KES,
};
pub use scheduler::{refresh_scheduler_task, RefreshMessage};
