pub mod config;
pub mod errors;
pub mod numeric;
pub mod random;
pub mod recommendations;
pub mod wait_time;

pub use errors::{ApplicationError, DomainError};
pub use random::{RandomSource, SeededRandom, ThreadRandom};
pub use recommendations::{
    BudgetRange, Candidate, DiningStyle, PreferenceProfile, PriceTier, Recommendation,
    RecommendationContext, RecommendationRanker, ScoreBreakdown, ScoreCalculator, ScoringConfig,
    ScoringWeights, VenueRecord,
};
pub use wait_time::{
    MonitorHandle, OccupancyFeed, OccupancySnapshot, OccupancyStage, WaitStatus,
    WaitTimeConfig, WaitTimeMonitor, WaitTimePrediction, WaitTimePredictor,
};
