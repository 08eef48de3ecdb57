//! Scoring algorithms for venue recommendations

use super::similarity;
use super::types::*;
use super::RecommendationResult;
use crate::numeric::{clamp_unit, range_overlap, within};

/// Weights for the four factor scores
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    /// Weight for cuisine fit (default: 0.30)
    pub cuisine: f64,
    /// Weight for budget overlap (default: 0.25)
    pub budget: f64,
    /// Weight for location proximity (default: 0.20)
    pub location: f64,
    /// Weight for dining style fit (default: 0.15)
    pub style: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        super::DEFAULT_WEIGHTS
    }
}

/// Full scoring configuration: weights, bonuses and thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringConfig {
    pub weights: ScoringWeights,
    /// Added for special occasions at venues that host them
    pub special_occasion_bonus: f64,
    /// Added when the venue seats the whole group
    pub group_capacity_bonus: f64,
    /// Multiplier applied to venues the user has booked before
    pub novelty_penalty: f64,
    /// Factor score above which a reason is reported
    pub notable_threshold: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        super::DEFAULT_SCORING
    }
}

pub const REASON_CUISINE: &str = "Matches your favorite cuisine";
pub const REASON_BUDGET: &str = "Perfect for your budget";
pub const REASON_LOCATION: &str = "In your preferred area";
pub const REASON_STYLE: &str = "Fits your dining style";
pub const REASON_SPECIAL_OCCASION: &str = "Can arrange decorations for your special occasion";
pub const REASON_NEW_EXPERIENCE: &str = "A new experience for you";

const BUDGET_FLOOR: f64 = 0.2;
const LOCATION_MATCH: f64 = 1.0;
const LOCATION_NEUTRAL: f64 = 0.5;
const LOCATION_MISS: f64 = 0.3;
const STYLE_MATCH: f64 = 0.9;
const STYLE_NEUTRAL: f64 = 0.5;

/// Score calculator for venue candidates
#[derive(Debug, Clone, Default)]
pub struct ScoreCalculator {
    config: ScoringConfig,
}

impl ScoreCalculator {
    /// Create a new score calculator with default configuration
    pub fn new() -> Self {
        Self { config: ScoringConfig::default() }
    }

    /// Create with custom configuration
    pub fn with_config(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Cuisine fit, see [`similarity::resolve`]
    pub fn cuisine_score(&self, candidate: &Candidate, profile: &PreferenceProfile) -> f64 {
        similarity::resolve(&candidate.cuisine, &profile.cuisine_preferences)
    }

    /// Share of the user's budget range covered by the venue's price tier
    pub fn budget_score(&self, tier: PriceTier, budget: &BudgetRange) -> f64 {
        let tier_range = tier.price_range();

        if budget.is_point() {
            return if within(budget.min, tier_range) { 1.0 } else { BUDGET_FLOOR };
        }

        let overlap = range_overlap(budget.bounds(), tier_range);
        if overlap > 0.0 {
            (overlap / (budget.max - budget.min)).min(1.0)
        } else {
            BUDGET_FLOOR
        }
    }

    /// Whether the venue sits in one of the preferred areas
    pub fn location_score<S: AsRef<str>>(&self, location: &str, preferred_areas: &[S]) -> f64 {
        let areas: Vec<String> = preferred_areas
            .iter()
            .map(|area| area.as_ref().trim().to_lowercase())
            .filter(|area| !area.is_empty())
            .collect();

        if areas.is_empty() {
            return LOCATION_NEUTRAL;
        }

        let location = location.to_lowercase();
        if areas.iter().any(|area| location.contains(area.as_str())) {
            LOCATION_MATCH
        } else {
            LOCATION_MISS
        }
    }

    /// Keyword match of the venue description against the requested style
    pub fn style_score(&self, description: Option<&str>, style: DiningStyle) -> f64 {
        let Some(description) = description.filter(|text| !text.trim().is_empty()) else {
            return STYLE_NEUTRAL;
        };

        let description = description.to_lowercase();
        if style.keywords().iter().any(|keyword| description.contains(keyword)) {
            STYLE_MATCH
        } else {
            STYLE_NEUTRAL
        }
    }

    /// Individual factor scores for a candidate
    pub fn factor_scores(&self, candidate: &Candidate, profile: &PreferenceProfile) -> FactorScores {
        FactorScores {
            cuisine: self.cuisine_score(candidate, profile),
            budget: self.budget_score(candidate.price_tier, &profile.budget_range),
            location: self.location_score(&candidate.location, &profile.location_preferences),
            style: self.style_score(candidate.description.as_deref(), profile.dining_style),
        }
    }

    /// Weighted sum of factor scores, before bonuses
    pub fn weighted_total(&self, factors: &FactorScores) -> f64 {
        let weights = &self.config.weights;
        factors.cuisine * weights.cuisine
            + factors.budget * weights.budget
            + factors.location * weights.location
            + factors.style * weights.style
    }

    /// Score a candidate against a profile and context
    pub fn score(
        &self,
        candidate: &Candidate,
        profile: &PreferenceProfile,
        context: &RecommendationContext,
    ) -> RecommendationResult<ScoreBreakdown> {
        profile.validate()?;
        context.validate()?;
        Ok(self.score_validated(candidate, profile, context))
    }

    pub(crate) fn score_validated(
        &self,
        candidate: &Candidate,
        profile: &PreferenceProfile,
        context: &RecommendationContext,
    ) -> ScoreBreakdown {
        let factors = self.factor_scores(candidate, profile);
        let mut reasons = self.factor_reasons(&factors);
        let mut composite = self.weighted_total(&factors);

        if context.is_special_occasion && candidate.hosts_occasions() {
            composite += self.config.special_occasion_bonus;
            reasons.push(REASON_SPECIAL_OCCASION.to_owned());
        }

        if candidate.capacity.is_some_and(|capacity| capacity >= context.group_size) {
            composite += self.config.group_capacity_bonus;
            reasons.push(format!("Has room for your group of {}", context.group_size));
        }

        let previously_visited = profile.has_visited(&candidate.id);
        if previously_visited {
            composite *= self.config.novelty_penalty;
        } else {
            reasons.push(REASON_NEW_EXPERIENCE.to_owned());
        }

        ScoreBreakdown {
            composite: clamp_unit(composite),
            unclamped: composite,
            factors,
            reasons,
            previously_visited,
        }
    }

    fn factor_reasons(&self, factors: &FactorScores) -> Vec<String> {
        let threshold = self.config.notable_threshold;
        [
            (factors.cuisine, REASON_CUISINE),
            (factors.budget, REASON_BUDGET),
            (factors.location, REASON_LOCATION),
            (factors.style, REASON_STYLE),
        ]
        .into_iter()
        .filter(|(score, _)| *score > threshold)
        .map(|(_, reason)| reason.to_owned())
        .collect()
    }
}
