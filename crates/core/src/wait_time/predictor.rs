use tracing::debug;

use super::stage::OccupancyStage;
use super::temporal::temporal_multiplier;
use super::{
    OccupancySnapshot, PredictionResult, WaitStatus, WaitTimePrediction, BASE_CONFIDENCE,
    MAX_CONFIDENCE, OCCUPANCY_CONFIDENCE_BONUS, OCCUPANCY_CONFIDENCE_RATIO, PEAK_CONFIDENCE_BONUS,
};
use crate::random::RandomSource;

/// Tunable parameters of the wait-time model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaitTimeConfig {
    pub weekend_multiplier: f64,
    pub peak_multiplier: f64,
    /// Total width of the jitter band around 1.0 (0.15 gives 0.925..1.075)
    pub jitter_span: f64,
    /// Optional ceiling on the reported wait; unset by default
    pub max_wait_minutes: Option<u32>,
}

impl Default for WaitTimeConfig {
    fn default() -> Self {
        Self { weekend_multiplier: 1.3, peak_multiplier: 1.5, jitter_span: 0.15, max_wait_minutes: None }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WaitTimePredictor {
    config: WaitTimeConfig,
}

impl WaitTimePredictor {
    pub fn new() -> Self {
        Self { config: WaitTimeConfig::default() }
    }

    pub fn with_config(config: WaitTimeConfig) -> Self {
        Self { config }
    }

    /// Wait in minutes before jitter and rounding.
    pub fn expected_wait_minutes(&self, snapshot: &OccupancySnapshot) -> PredictionResult<f64> {
        snapshot.validate()?;
        Ok(self.expected_validated(snapshot))
    }

    fn expected_validated(&self, snapshot: &OccupancySnapshot) -> f64 {
        let stage = OccupancyStage::classify(snapshot.occupancy_ratio());
        stage.base_wait_minutes(snapshot.average_dining_minutes)
            * temporal_multiplier(
                snapshot.is_weekend,
                snapshot.is_peak_hour,
                self.config.weekend_multiplier,
                self.config.peak_multiplier,
            )
    }

    pub fn confidence(&self, snapshot: &OccupancySnapshot) -> f64 {
        let mut confidence = BASE_CONFIDENCE;
        if snapshot.occupancy_ratio() > OCCUPANCY_CONFIDENCE_RATIO {
            confidence += OCCUPANCY_CONFIDENCE_BONUS;
        }
        if snapshot.is_peak_hour {
            confidence += PEAK_CONFIDENCE_BONUS;
        }
        confidence.min(MAX_CONFIDENCE)
    }

    pub fn predict<R: RandomSource>(
        &self,
        snapshot: &OccupancySnapshot,
        rng: &mut R,
    ) -> PredictionResult<WaitTimePrediction> {
        snapshot.validate()?;

        let ratio = snapshot.occupancy_ratio();
        let stage = OccupancyStage::classify(ratio);
        let expected = self.expected_validated(snapshot);
        let jitter = 1.0 + (rng.next_unit() - 0.5) * self.config.jitter_span;

        let mut minutes = (expected * jitter).round().max(0.0) as u32;
        if let Some(ceiling) = self.config.max_wait_minutes {
            minutes = minutes.min(ceiling);
        }

        let status = WaitStatus::from_minutes(minutes);
        let prediction = WaitTimePrediction {
            venue_id: snapshot.venue_id.clone(),
            estimated_wait_minutes: minutes,
            confidence: self.confidence(snapshot),
            status,
            message: status.message(minutes),
            stage,
            occupancy_ratio: ratio,
        };

        debug!(
            event_name = "wait_time.predicted",
            venue_id = %prediction.venue_id,
            occupancy_ratio = ratio,
            expected_minutes = expected,
            minutes,
            status = ?status,
            "wait time predicted"
        );

        Ok(prediction)
    }
}
