//! Wait-time prediction from live occupancy
//!
//! A pure model: occupancy stage sets a base share of the average dining
//! time, weekend and peak-hour multipliers stretch it, and a bounded jitter
//! from the caller's [`RandomSource`](crate::random::RandomSource) keeps the
//! estimate from looking mechanical. [`WaitTimeMonitor`] re-runs the model on
//! a polling interval.

mod monitor;
mod predictor;
mod stage;
mod temporal;

pub use monitor::{MonitorHandle, OccupancyFeed, WaitTimeMonitor};
pub use predictor::{WaitTimeConfig, WaitTimePredictor};
pub use stage::OccupancyStage;
pub use temporal::{is_peak_hour, is_weekend_day, temporal_multiplier, PEAK_HOURS};

use chrono::{DateTime, Datelike, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Result type for prediction operations
pub type PredictionResult<T> = Result<T, DomainError>;

/// Default polling cadence for live predictions
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

pub const BASE_CONFIDENCE: f64 = 0.8;
/// Added when the room is more than [`OCCUPANCY_CONFIDENCE_RATIO`] full
pub const OCCUPANCY_CONFIDENCE_BONUS: f64 = 0.1;
pub const OCCUPANCY_CONFIDENCE_RATIO: f64 = 0.3;
pub const PEAK_CONFIDENCE_BONUS: f64 = 0.05;
/// Predictions never claim full certainty
pub const MAX_CONFIDENCE: f64 = 0.95;

/// Live occupancy reading for one venue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupancySnapshot {
    pub venue_id: String,
    pub seated: u32,
    pub capacity: u32,
    pub average_dining_minutes: f64,
    pub hour: u8,
    /// 0 = Sunday .. 6 = Saturday
    pub day_of_week: u8,
    pub is_weekend: bool,
    pub is_peak_hour: bool,
}

impl OccupancySnapshot {
    /// Build a snapshot, deriving weekend and peak flags from day and hour.
    pub fn new(
        venue_id: impl Into<String>,
        seated: u32,
        capacity: u32,
        average_dining_minutes: f64,
        hour: u8,
        day_of_week: u8,
    ) -> Self {
        Self {
            venue_id: venue_id.into(),
            seated,
            capacity,
            average_dining_minutes,
            hour,
            day_of_week,
            is_weekend: is_weekend_day(day_of_week),
            is_peak_hour: is_peak_hour(hour),
        }
    }

    /// Build a snapshot stamped with the local hour and weekday of `at`.
    pub fn at<Tz: TimeZone>(
        venue_id: impl Into<String>,
        seated: u32,
        capacity: u32,
        average_dining_minutes: f64,
        at: &DateTime<Tz>,
    ) -> Self {
        Self::new(
            venue_id,
            seated,
            capacity,
            average_dining_minutes,
            at.hour() as u8,
            at.weekday().num_days_from_sunday() as u8,
        )
    }

    /// Seated guests over capacity. Assumes a validated snapshot.
    pub fn occupancy_ratio(&self) -> f64 {
        f64::from(self.seated) / f64::from(self.capacity)
    }

    pub fn validate(&self) -> PredictionResult<()> {
        if self.capacity == 0 {
            return Err(DomainError::invalid(format!(
                "venue `{}` reported zero capacity",
                self.venue_id
            )));
        }
        if self.seated > self.capacity {
            return Err(DomainError::invalid(format!(
                "venue `{}` reported {} seated guests over capacity {}",
                self.venue_id, self.seated, self.capacity
            )));
        }
        if !self.average_dining_minutes.is_finite() || self.average_dining_minutes <= 0.0 {
            return Err(DomainError::invalid(format!(
                "average dining time must be positive, got {}",
                self.average_dining_minutes
            )));
        }
        if self.hour > 23 {
            return Err(DomainError::invalid(format!("hour must be 0-23, got {}", self.hour)));
        }
        if self.day_of_week > 6 {
            return Err(DomainError::invalid(format!(
                "day of week must be 0-6, got {}",
                self.day_of_week
            )));
        }
        Ok(())
    }
}

/// Wait bucket shown to guests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitStatus {
    AvailableNow,
    ShortWait,
    ModerateWait,
    LongWait,
}

impl WaitStatus {
    pub fn from_minutes(minutes: u32) -> Self {
        match minutes {
            0..=5 => WaitStatus::AvailableNow,
            6..=15 => WaitStatus::ShortWait,
            16..=30 => WaitStatus::ModerateWait,
            _ => WaitStatus::LongWait,
        }
    }

    pub fn message(&self, minutes: u32) -> String {
        match self {
            WaitStatus::AvailableNow => "Table available now! 🎉".to_owned(),
            WaitStatus::ShortWait => format!("Short wait: about {minutes} minutes"),
            WaitStatus::ModerateWait => format!("Moderate wait: about {minutes} minutes"),
            WaitStatus::LongWait => {
                format!("Long wait: about {minutes} minutes. Consider booking ahead")
            }
        }
    }
}

/// Predicted seating delay for one venue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitTimePrediction {
    pub venue_id: String,
    pub estimated_wait_minutes: u32,
    /// In `[0.8, 0.95]`
    pub confidence: f64,
    pub status: WaitStatus,
    pub message: String,
    pub stage: OccupancyStage,
    pub occupancy_ratio: f64,
}
