//! Venue Recommendation Engine
//!
//! Scores candidate venues against a user's preference profile using cuisine,
//! budget, location and dining-style factors, then ranks them with a short
//! narrative and optional decorative extras.

mod engine;
mod scoring;
mod similarity;
mod types;

pub use engine::RecommendationRanker;
pub use scoring::{
    ScoreCalculator, ScoringConfig, ScoringWeights, REASON_BUDGET, REASON_CUISINE,
    REASON_LOCATION, REASON_NEW_EXPERIENCE, REASON_SPECIAL_OCCASION, REASON_STYLE,
};
pub use similarity::resolve as resolve_cuisine_similarity;
pub use types::*;

use crate::errors::DomainError;

/// Result type for recommendation operations
pub type RecommendationResult<T> = Result<T, DomainError>;

/// Default factor weights
pub const DEFAULT_WEIGHTS: ScoringWeights =
    ScoringWeights { cuisine: 0.30, budget: 0.25, location: 0.20, style: 0.15 };

/// Default weights, bonuses and thresholds
pub const DEFAULT_SCORING: ScoringConfig = ScoringConfig {
    weights: DEFAULT_WEIGHTS,
    special_occasion_bonus: 0.10,
    group_capacity_bonus: 0.05,
    novelty_penalty: 0.8,
    notable_threshold: 0.8,
};

/// Default number of recommendations returned
pub const DEFAULT_TOP_N: usize = 10;

/// Rating assumed when a listing has none
pub const DEFAULT_RATING: f64 = 4.2;

/// Name used when a listing has none
pub const UNNAMED_VENUE: &str = "Unnamed venue";

/// Exclusive upper bound of the decorative wait estimate, in minutes
pub const SYNTHETIC_WAIT_CEILING: u32 = 30;

/// Promotional offers sampled for decorative extras
pub const OFFER_POOL: &[&str] = &[
    "10% off your first booking",
    "Complimentary dessert with every main course",
    "Free welcome drink for the table",
    "Happy hour pricing from 4 PM to 7 PM",
    "Chef's tasting menu at a special price",
];
