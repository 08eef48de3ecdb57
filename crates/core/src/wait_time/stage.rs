use serde::{Deserialize, Serialize};

/// Occupancy band that sets the base share of average dining time
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccupancyStage {
    /// Below 60% full
    Open,
    /// 60% to under 80%
    Filling,
    /// 80% to under 95%
    Busy,
    /// 95% and above
    Full,
}

impl OccupancyStage {
    pub fn classify(ratio: f64) -> Self {
        if ratio >= 0.95 {
            OccupancyStage::Full
        } else if ratio >= 0.80 {
            OccupancyStage::Busy
        } else if ratio >= 0.60 {
            OccupancyStage::Filling
        } else {
            OccupancyStage::Open
        }
    }

    /// Fraction of the average dining time a new guest waits
    pub fn dining_time_share(&self) -> f64 {
        match self {
            OccupancyStage::Full => 0.8,
            OccupancyStage::Busy => 0.5,
            OccupancyStage::Filling => 0.2,
            OccupancyStage::Open => 0.0,
        }
    }

    pub fn base_wait_minutes(&self, average_dining_minutes: f64) -> f64 {
        self.dining_time_share() * average_dining_minutes
    }
}

#[cfg(test)]
mod tests {
    use super::OccupancyStage;

    #[test]
    fn classification_boundaries() {
        assert_eq!(OccupancyStage::classify(0.0), OccupancyStage::Open);
        assert_eq!(OccupancyStage::classify(0.59), OccupancyStage::Open);
        assert_eq!(OccupancyStage::classify(0.60), OccupancyStage::Filling);
        assert_eq!(OccupancyStage::classify(0.80), OccupancyStage::Busy);
        assert_eq!(OccupancyStage::classify(0.949), OccupancyStage::Busy);
        assert_eq!(OccupancyStage::classify(0.95), OccupancyStage::Full);
        assert_eq!(OccupancyStage::classify(1.0), OccupancyStage::Full);
    }

    #[test]
    fn base_wait_grows_with_stage() {
        let stages =
            [OccupancyStage::Open, OccupancyStage::Filling, OccupancyStage::Busy, OccupancyStage::Full];
        for pair in stages.windows(2) {
            assert!(pair[0].base_wait_minutes(60.0) <= pair[1].base_wait_minutes(60.0));
        }
        assert_eq!(OccupancyStage::Full.base_wait_minutes(60.0), 48.0);
    }
}
