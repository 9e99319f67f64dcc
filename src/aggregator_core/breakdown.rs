//! Derived series: category allocations, hourly heatmap, region ranking

use super::window::WindowBucket;
use crate::source::REGIONS;
use chrono::{DateTime, Timelike, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Share of each window's count attributed to
/// MobileWallet / CarrierMoney / BankTransfer, in [`crate::source::PaymentType::all`] order.
/// Illustrative weights, not measured.
pub const PAYMENT_WEIGHTS: [f64; 3] = [0.70, 0.20, 0.10];

/// How many regions the ranking keeps.
pub const TOP_REGION_LIMIT: usize = 5;

/// Synthetic per-region totals, upper bound exclusive.
const REGION_TOTAL_MIN: u64 = 1000;
const REGION_TOTAL_MAX: u64 = 5000;

/// One window's count split across a fixed category set. `values` sum to
/// the window's count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowAllocation {
    pub window_start: i64,
    pub values: Vec<f64>,
}

/// How a window's count gets distributed across categories.
///
/// Swappable so the simulated splits can later be replaced by real
/// per-category ingestion without touching the pipeline control flow.
pub trait AllocationStrategy: Send {
    /// Split `total` across `buckets` categories; the result sums to `total`.
    fn allocate(&mut self, total: u64, buckets: usize) -> Vec<f64>;

    /// Get strategy name for logging
    fn strategy_name(&self) -> &'static str;
}

/// Proportional split with fixed weights.
pub struct FixedAllocation {
    weights: Vec<f64>,
}

impl FixedAllocation {
    pub fn new(weights: Vec<f64>) -> Self {
        Self { weights }
    }

    /// The payment-type split used by the dashboard.
    pub fn payment_split() -> Self {
        Self::new(PAYMENT_WEIGHTS.to_vec())
    }
}

impl AllocationStrategy for FixedAllocation {
    fn allocate(&mut self, total: u64, buckets: usize) -> Vec<f64> {
        debug_assert_eq!(buckets, self.weights.len());
        self.weights.iter().map(|w| w * total as f64).collect()
    }

    fn strategy_name(&self) -> &'static str {
        "fixed"
    }
}

/// Uniform-simplex split: one fresh draw per window, coefficients sum to 1.
/// No temporal continuity between windows.
pub struct SimplexAllocation {
    rng: StdRng,
}

impl SimplexAllocation {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl AllocationStrategy for SimplexAllocation {
    fn allocate(&mut self, total: u64, buckets: usize) -> Vec<f64> {
        // Exponential draws normalized to sum 1 sample the simplex uniformly
        let draws: Vec<f64> = (0..buckets)
            .map(|_| -(1.0 - self.rng.gen::<f64>()).ln())
            .collect();
        let sum: f64 = draws.iter().sum();
        if sum <= 0.0 {
            return vec![total as f64 / buckets as f64; buckets];
        }
        draws.iter().map(|d| d / sum * total as f64).collect()
    }

    fn strategy_name(&self) -> &'static str {
        "simplex"
    }
}

/// Apply an allocation strategy to every window of a series.
pub fn allocate_series(
    series: &[WindowBucket],
    strategy: &mut dyn AllocationStrategy,
    buckets: usize,
) -> Vec<WindowAllocation> {
    series
        .iter()
        .map(|bucket| WindowAllocation {
            window_start: bucket.window_start,
            values: strategy.allocate(bucket.count, buckets),
        })
        .collect()
}

/// Sum window counts by hour of day, ascending by hour.
pub fn hourly_heatmap(series: &[WindowBucket]) -> Vec<(u32, u64)> {
    let mut by_hour: BTreeMap<u32, u64> = BTreeMap::new();
    for bucket in series {
        if let Some(dt) = DateTime::<Utc>::from_timestamp(bucket.window_start, 0) {
            *by_hour.entry(dt.hour()).or_insert(0) += bucket.count;
        }
    }
    by_hour.into_iter().collect()
}

/// Rank regions by a synthetic total, descending, top
/// [`TOP_REGION_LIMIT`] retained. Placeholder pending region-level
/// ingestion.
pub fn top_regions(rng: &mut StdRng) -> Vec<(String, u64)> {
    let mut totals: Vec<(String, u64)> = REGIONS
        .iter()
        .map(|region| {
            (
                region.to_string(),
                rng.gen_range(REGION_TOTAL_MIN..REGION_TOTAL_MAX),
            )
        })
        .collect();
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals.truncate(TOP_REGION_LIMIT);
    totals
}
