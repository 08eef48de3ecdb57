//! Types for the recommendation engine

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::wait_time::WaitTimePrediction;

use super::{DEFAULT_RATING, UNNAMED_VENUE};

/// Dining style a user is looking for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiningStyle {
    #[default]
    Casual,
    FineDining,
    Family,
    Romantic,
    Business,
}

impl DiningStyle {
    /// Description keywords that signal a venue suits this style
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            DiningStyle::Casual => &["casual", "relaxed", "cafe"],
            DiningStyle::FineDining => &["fine", "elegant", "upscale"],
            DiningStyle::Family => &["family", "kids", "spacious"],
            DiningStyle::Romantic => &["romantic", "intimate", "fine"],
            DiningStyle::Business => &["business", "quiet", "professional"],
        }
    }
}

/// Price tier of a venue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTier {
    Budget,
    #[default]
    Moderate,
    Premium,
    Luxury,
}

impl PriceTier {
    /// Spend range covered by the tier, in the same units as [`BudgetRange`]
    pub fn price_range(&self) -> (f64, f64) {
        match self {
            PriceTier::Budget => (0.0, 500.0),
            PriceTier::Moderate => (500.0, 1500.0),
            PriceTier::Premium => (1500.0, 3000.0),
            PriceTier::Luxury => (3000.0, 10000.0),
        }
    }

    /// Parse a free-text tier label. Missing or unrecognized labels fall back to moderate.
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
            Some("budget") => PriceTier::Budget,
            Some("premium") => PriceTier::Premium,
            Some("luxury") => PriceTier::Luxury,
            _ => PriceTier::Moderate,
        }
    }
}

/// Inclusive spend range a user is comfortable with
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetRange {
    pub min: f64,
    pub max: f64,
}

impl BudgetRange {
    pub fn new(min: f64, max: f64) -> Result<Self, DomainError> {
        let range = Self { min, max };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(DomainError::invalid("budget range bounds must be finite"));
        }
        if self.min < 0.0 {
            return Err(DomainError::invalid(format!(
                "budget range minimum must be non-negative, got {}",
                self.min
            )));
        }
        if self.min > self.max {
            return Err(DomainError::invalid(format!(
                "budget range minimum {} exceeds maximum {}",
                self.min, self.max
            )));
        }
        Ok(())
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    pub fn is_point(&self) -> bool {
        self.min == self.max
    }
}

impl Default for BudgetRange {
    fn default() -> Self {
        let (min, _) = PriceTier::Budget.price_range();
        let (_, max) = PriceTier::Luxury.price_range();
        Self { min, max }
    }
}

/// User preferences that drive scoring
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferenceProfile {
    #[serde(default)]
    pub cuisine_preferences: Vec<String>,
    #[serde(default)]
    pub budget_range: BudgetRange,
    #[serde(default)]
    pub location_preferences: Vec<String>,
    #[serde(default)]
    pub dining_style: DiningStyle,
    /// Venues the user has booked before (novelty penalty only)
    #[serde(default)]
    pub previous_bookings: HashSet<String>,
    /// Informational; not used by scoring
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
}

impl PreferenceProfile {
    pub fn new(budget_range: BudgetRange) -> Self {
        Self { budget_range, ..Self::default() }
    }

    pub fn with_cuisines<I, S>(mut self, cuisines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cuisine_preferences = cuisines.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_locations<I, S>(mut self, locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.location_preferences = locations.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_dining_style(mut self, style: DiningStyle) -> Self {
        self.dining_style = style;
        self
    }

    pub fn with_previous_bookings<I, S>(mut self, venue_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.previous_bookings = venue_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn has_visited(&self, venue_id: &str) -> bool {
        self.previous_bookings.contains(venue_id)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        self.budget_range.validate()
    }
}

/// Situational context for one recommendation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationContext {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub is_special_occasion: bool,
    pub group_size: u32,
}

impl RecommendationContext {
    pub fn now(group_size: u32) -> Self {
        Self { timestamp: Utc::now(), is_special_occasion: false, group_size }
    }

    pub fn special_occasion(mut self, is_special_occasion: bool) -> Self {
        self.is_special_occasion = is_special_occasion;
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.group_size == 0 {
            return Err(DomainError::invalid("group size must be at least 1"));
        }
        Ok(())
    }
}

/// Venue record as supplied by the listing layer, before normalization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VenueRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub price_range: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub supports_decoration: Option<bool>,
    #[serde(default)]
    pub supports_events: Option<bool>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Normalized venue under evaluation in a single ranking pass
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub cuisine: String,
    pub price_tier: PriceTier,
    pub rating: f64,
    pub location: String,
    pub description: Option<String>,
    /// Seating capacity; `None` when the listing does not publish it
    pub capacity: Option<u32>,
    pub supports_decoration: bool,
    pub supports_events: bool,
    pub image_url: Option<String>,
}

impl Candidate {
    pub fn from_record(record: &VenueRecord) -> Result<Self, DomainError> {
        let id = record.id.trim();
        if id.is_empty() {
            return Err(DomainError::invalid("venue record is missing an id"));
        }

        Ok(Self {
            id: id.to_owned(),
            name: record
                .name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .unwrap_or(UNNAMED_VENUE)
                .to_owned(),
            cuisine: record.cuisine.clone().unwrap_or_default(),
            price_tier: PriceTier::from_label(record.price_range.as_deref()),
            rating: record.rating.filter(|rating| rating.is_finite()).unwrap_or(DEFAULT_RATING),
            location: record.location.clone().unwrap_or_default(),
            description: record.description.clone(),
            capacity: record.capacity,
            supports_decoration: record.supports_decoration.unwrap_or(false),
            supports_events: record.supports_events.unwrap_or(false),
            image_url: record.image_url.clone(),
        })
    }

    /// Whether the venue can stage decorations or private events
    pub fn hosts_occasions(&self) -> bool {
        self.supports_decoration || self.supports_events
    }

    pub fn summary(&self) -> VenueSummary {
        VenueSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            cuisine: self.cuisine.clone(),
            price_tier: self.price_tier,
            rating: self.rating,
            location: self.location.clone(),
            image_url: self.image_url.clone(),
        }
    }
}

/// Individual factor scores, each in `[0, 1]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FactorScores {
    pub cuisine: f64,
    pub budget: f64,
    pub location: f64,
    pub style: f64,
}

/// Output of scoring one candidate
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    /// Weighted composite after bonuses and novelty penalty, clamped to `[0, 1]`
    pub composite: f64,
    /// Composite before clamping
    pub unclamped: f64,
    pub factors: FactorScores,
    pub reasons: Vec<String>,
    pub previously_visited: bool,
}

/// Venue fields carried on a recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueSummary {
    pub id: String,
    pub name: String,
    pub cuisine: String,
    pub price_tier: PriceTier,
    pub rating: f64,
    pub location: String,
    pub image_url: Option<String>,
}

/// Narrative band derived from the composite score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightBand {
    ExcellentMatch,
    GoodChoice,
    WorthTrying,
    DifferentExperience,
}

impl InsightBand {
    pub fn from_score(score: f64) -> Self {
        if score > 0.8 {
            InsightBand::ExcellentMatch
        } else if score > 0.6 {
            InsightBand::GoodChoice
        } else if score > 0.4 {
            InsightBand::WorthTrying
        } else {
            InsightBand::DifferentExperience
        }
    }

    /// One-line narrative for a venue in this band
    pub fn narrate(&self, venue_name: &str) -> String {
        match self {
            InsightBand::ExcellentMatch => {
                format!("{venue_name} is an excellent match for your preferences")
            }
            InsightBand::GoodChoice => format!("{venue_name} is a good choice for your next meal"),
            InsightBand::WorthTrying => format!("{venue_name} is worth trying"),
            InsightBand::DifferentExperience => {
                format!("{venue_name} offers a different experience from your usual picks")
            }
        }
    }
}

/// A ranked venue with scoring and explanation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub venue: VenueSummary,
    /// Composite score (0.0 - 1.0)
    pub score: f64,
    pub factors: FactorScores,
    pub reasons: Vec<String>,
    pub band: InsightBand,
    pub insight: String,
    /// Decorative wait estimate, not derived from occupancy
    pub estimated_wait_minutes: Option<u32>,
    /// Decorative promotional offers
    pub offers: Vec<String>,
    /// Occupancy-based prediction merged in by the caller
    pub live_wait: Option<WaitTimePrediction>,
}

impl Recommendation {
    /// Attach a wait-time prediction for the same venue, superseding the synthetic estimate.
    pub fn with_live_wait(mut self, prediction: WaitTimePrediction) -> Result<Self, DomainError> {
        if prediction.venue_id != self.venue.id {
            return Err(DomainError::invalid(format!(
                "wait-time prediction for `{}` cannot be merged into recommendation for `{}`",
                prediction.venue_id, self.venue.id
            )));
        }

        self.estimated_wait_minutes = Some(prediction.estimated_wait_minutes);
        self.live_wait = Some(prediction);
        Ok(self)
    }
}
