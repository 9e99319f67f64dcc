//! Fixed one-minute window aggregation over a trailing hour

use crate::source::TransactionEvent;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Width of one aggregation window in seconds.
pub const WINDOW_SECS: i64 = 60;

/// Number of windows in a synthetic series (one trailing hour).
pub const SERIES_LEN: usize = 60;

/// Synthetic per-minute volume range, upper bound exclusive.
pub const SYNTH_TPM_MIN: u64 = 200;
pub const SYNTH_TPM_MAX: u64 = 1200;

/// One minute of transaction volume. `window_start` is minute-aligned
/// Unix seconds; consecutive buckets in a series differ by exactly
/// [`WINDOW_SECS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowBucket {
    pub window_start: i64,
    pub count: u64,
}

/// Truncate a timestamp to the start of its minute.
pub fn align_to_minute(timestamp: i64) -> i64 {
    timestamp - timestamp.rem_euclid(WINDOW_SECS)
}

/// Build the per-minute series for one region.
///
/// With no events the series is synthesized (the live feed is not wired
/// up yet and the dashboard must stay usable without it). With events,
/// counts are grouped per minute and minutes with no events between the
/// observed extremes are zero-filled so the series stays contiguous.
pub fn build_series(
    events: &[TransactionEvent],
    now: i64,
    rng: &mut StdRng,
) -> Vec<WindowBucket> {
    if events.is_empty() {
        return synthetic_series(now, rng);
    }

    let mut counts: BTreeMap<i64, u64> = BTreeMap::new();
    for event in events {
        *counts.entry(align_to_minute(event.timestamp)).or_insert(0) += 1;
    }

    // BTreeMap keys are ordered, so first/last give the observed extremes
    let first = *counts.keys().next().unwrap();
    let last = *counts.keys().next_back().unwrap();

    let mut series = Vec::with_capacity(((last - first) / WINDOW_SECS + 1) as usize);
    let mut window_start = first;
    while window_start <= last {
        series.push(WindowBucket {
            window_start,
            count: counts.get(&window_start).copied().unwrap_or(0),
        });
        window_start += WINDOW_SECS;
    }
    series
}

/// Synthesize [`SERIES_LEN`] consecutive one-minute windows ending at the
/// minute containing `now`, each count drawn uniformly from
/// [[`SYNTH_TPM_MIN`], [`SYNTH_TPM_MAX`]).
pub fn synthetic_series(now: i64, rng: &mut StdRng) -> Vec<WindowBucket> {
    let end = align_to_minute(now);
    (0..SERIES_LEN)
        .map(|i| WindowBucket {
            window_start: end - ((SERIES_LEN - 1 - i) as i64) * WINDOW_SECS,
            count: rng.gen_range(SYNTH_TPM_MIN..SYNTH_TPM_MAX),
        })
        .collect()
}
