use {
    crate::aggregator_core::AlertEntry,
    crate::pipeline::engine::DashboardSnapshot,
    crate::source::REGIONS,
};

/// Shared view the UI renders from.
///
/// Written only by the refresh scheduler, read by the UI loop; callers
/// hold it behind `Arc<tokio::sync::RwLock<...>>`.
#[derive(Debug)]
pub struct DashboardState {
    /// Currently selected region
    pub region: String,
    /// Latest published pipeline evaluation, `None` until the first tick
    pub snapshot: Option<DashboardSnapshot>,
    /// Alert history snapshot, most recent last
    pub alerts: Vec<AlertEntry>,
}

impl DashboardState {
    pub fn new(region: &str) -> Self {
        Self {
            region: region.to_string(),
            snapshot: None,
            alerts: Vec::new(),
        }
    }

    /// Index of the selected region in [`REGIONS`], 0 when unknown.
    pub fn region_index(&self) -> usize {
        REGIONS
            .iter()
            .position(|r| *r == self.region)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_has_no_snapshot() {
        let state = DashboardState::new("Nairobi");
        assert!(state.snapshot.is_none());
        assert!(state.alerts.is_empty());
        assert_eq!(state.region_index(), 0);
    }

    #[test]
    fn test_region_index_falls_back_to_zero() {
        let state = DashboardState::new("Atlantis");
        assert_eq!(state.region_index(), 0);
    }
}
