//! Trend classification with configurable deviation thresholds

use super::window::WindowBucket;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendSignal {
    Spike,
    Drop,
    Stable,
}

impl TrendSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendSignal::Spike => "SPIKE",
            TrendSignal::Drop => "DROP",
            TrendSignal::Stable => "STABLE",
        }
    }
}

/// One classification outcome over a window series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendReading {
    pub rolling_average: f64,
    pub deviation_pct: f64,
    pub signal: TrendSignal,
}

pub struct TrendClassifier {
    spike_threshold: f64,
    drop_threshold: f64,
    lookback: usize,
}

impl TrendClassifier {
    pub fn new(spike_threshold: f64, drop_threshold: f64, lookback: usize) -> Self {
        Self {
            spike_threshold,
            drop_threshold,
            lookback,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(50.0, -50.0, 10)
    }

    /// Trailing mean over the most recent `min(lookback, len)` windows.
    ///
    /// Short series are averaged over whatever history exists
    /// (minimum-period trailing mean), so readings taken before a full
    /// lookback of history should be treated as unreliable.
    pub fn rolling_average(&self, series: &[WindowBucket]) -> f64 {
        if series.is_empty() {
            return 0.0;
        }
        let tail = &series[series.len().saturating_sub(self.lookback)..];
        tail.iter().map(|b| b.count as f64).sum::<f64>() / tail.len() as f64
    }

    /// Classify the latest window's deviation from the rolling average
    ///
    /// # Signals
    /// - **SPIKE**: deviation above `spike_threshold` percent
    /// - **DROP**: deviation below `drop_threshold` percent
    /// - **STABLE**: everything else, including a zero rolling average
    ///
    /// Pure and deterministic: the same series always yields the same
    /// reading. An empty series degrades to a zeroed STABLE reading.
    pub fn classify(&self, series: &[WindowBucket]) -> TrendReading {
        let rolling_average = self.rolling_average(series);
        let latest = series.last().map(|b| b.count as f64).unwrap_or(0.0);

        let deviation_pct = if rolling_average > 0.0 {
            (latest - rolling_average) / rolling_average * 100.0
        } else {
            0.0
        };

        let signal = if deviation_pct > self.spike_threshold {
            TrendSignal::Spike
        } else if deviation_pct < self.drop_threshold {
            TrendSignal::Drop
        } else {
            TrendSignal::Stable
        };

        TrendReading {
            rolling_average,
            deviation_pct,
            signal,
        }
    }
}
