//! Recommendation ranker

use tracing::debug;

use super::scoring::{ScoreCalculator, ScoringConfig};
use super::types::*;
use super::{RecommendationResult, DEFAULT_TOP_N, OFFER_POOL, SYNTHETIC_WAIT_CEILING};
use crate::random::RandomSource;

/// Ranks candidate venues for a preference profile.
///
/// Holds no state across calls; one instance can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct RecommendationRanker {
    calculator: ScoreCalculator,
    default_top_n: usize,
    synthetic_extras: bool,
}

impl RecommendationRanker {
    /// Create a ranker with default scoring and decorative extras enabled
    pub fn new() -> Self {
        Self {
            calculator: ScoreCalculator::new(),
            default_top_n: DEFAULT_TOP_N,
            synthetic_extras: true,
        }
    }

    /// Create with a custom scoring configuration
    pub fn with_scoring(config: ScoringConfig) -> Self {
        Self { calculator: ScoreCalculator::with_config(config), ..Self::new() }
    }

    pub fn with_default_top_n(mut self, top_n: usize) -> Self {
        self.default_top_n = top_n;
        self
    }

    /// Toggle the decorative wait estimate and offers
    pub fn with_synthetic_extras(mut self, enabled: bool) -> Self {
        self.synthetic_extras = enabled;
        self
    }

    pub fn default_top_n(&self) -> usize {
        self.default_top_n
    }

    /// Rank raw venue records and return the best `top_n` (or the default when `None`).
    ///
    /// Equal scores keep their input order. Any malformed record rejects the whole call.
    pub fn rank<R: RandomSource>(
        &self,
        profile: &PreferenceProfile,
        records: &[VenueRecord],
        context: &RecommendationContext,
        top_n: Option<usize>,
        rng: &mut R,
    ) -> RecommendationResult<Vec<Recommendation>> {
        let candidates =
            records.iter().map(Candidate::from_record).collect::<Result<Vec<_>, _>>()?;
        self.rank_candidates(profile, candidates, context, top_n, rng)
    }

    /// Rank already-normalized candidates
    pub fn rank_candidates<R: RandomSource>(
        &self,
        profile: &PreferenceProfile,
        candidates: Vec<Candidate>,
        context: &RecommendationContext,
        top_n: Option<usize>,
        rng: &mut R,
    ) -> RecommendationResult<Vec<Recommendation>> {
        profile.validate()?;
        context.validate()?;

        let top_n = top_n.unwrap_or(self.default_top_n);
        let candidate_count = candidates.len();

        let mut scored: Vec<(Candidate, ScoreBreakdown)> = candidates
            .into_iter()
            .map(|candidate| {
                let breakdown = self.calculator.score_validated(&candidate, profile, context);
                (candidate, breakdown)
            })
            .collect();

        // Stable sort: ties keep input order.
        scored.sort_by(|a, b| b.1.composite.total_cmp(&a.1.composite));
        scored.truncate(top_n);

        let recommendations: Vec<Recommendation> = scored
            .into_iter()
            .map(|(candidate, breakdown)| self.build_recommendation(&candidate, breakdown, rng))
            .collect();

        debug!(
            event_name = "recommendation.rank.completed",
            candidate_count,
            returned = recommendations.len(),
            top_n,
            top_score = recommendations.first().map(|item| item.score).unwrap_or(0.0),
            "ranked venue candidates"
        );

        Ok(recommendations)
    }

    fn build_recommendation<R: RandomSource>(
        &self,
        candidate: &Candidate,
        breakdown: ScoreBreakdown,
        rng: &mut R,
    ) -> Recommendation {
        let band = InsightBand::from_score(breakdown.composite);
        let (estimated_wait_minutes, offers) = if self.synthetic_extras {
            (Some(rng.next_below(SYNTHETIC_WAIT_CEILING)), draw_offers(rng))
        } else {
            (None, Vec::new())
        };

        Recommendation {
            venue: candidate.summary(),
            score: breakdown.composite,
            factors: breakdown.factors,
            reasons: breakdown.reasons,
            band,
            insight: band.narrate(&candidate.name),
            estimated_wait_minutes,
            offers,
            live_wait: None,
        }
    }
}

impl Default for RecommendationRanker {
    fn default() -> Self {
        Self::new()
    }
}

/// One or two distinct offers from the pool
fn draw_offers<R: RandomSource>(rng: &mut R) -> Vec<String> {
    let pool_len = OFFER_POOL.len() as u32;
    let count = 1 + rng.next_below(2);
    let mut picked: Vec<usize> = Vec::with_capacity(count as usize);

    for _ in 0..count {
        let mut index = rng.next_below(pool_len) as usize;
        while picked.contains(&index) {
            index = (index + 1) % OFFER_POOL.len();
        }
        picked.push(index);
    }

    picked.into_iter().map(|index| OFFER_POOL[index].to_owned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DomainError;
    use crate::random::testing::ScriptedRandom;
    use crate::random::SeededRandom;
    use crate::wait_time::{OccupancySnapshot, WaitTimePredictor};

    fn record(id: &str, cuisine: &str, price: &str, location: &str) -> VenueRecord {
        VenueRecord {
            id: id.to_owned(),
            name: Some(format!("Venue {id}")),
            cuisine: Some(cuisine.to_owned()),
            price_range: Some(price.to_owned()),
            location: Some(location.to_owned()),
            ..VenueRecord::default()
        }
    }

    fn profile() -> PreferenceProfile {
        PreferenceProfile::new(BudgetRange { min: 500.0, max: 1500.0 })
            .with_cuisines(["italian"])
            .with_locations(["bandra"])
    }

    fn records() -> Vec<VenueRecord> {
        vec![
            record("a", "ethiopian", "luxury", "Colaba"),
            record("b", "italian", "moderate", "Bandra West"),
            record("c", "pizza", "moderate", "Juhu"),
            record("d", "italian", "premium", "Bandra"),
            record("e", "thai", "budget", "Andheri"),
        ]
    }

    #[test]
    fn results_are_sorted_descending() {
        let ranker = RecommendationRanker::new();
        let results = ranker
            .rank(&profile(), &records(), &RecommendationContext::now(2), None, &mut SeededRandom::new(1))
            .expect("valid inputs");

        assert_eq!(results.len(), 5);
        assert_eq!(results[0].venue.id, "b");
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn results_are_truncated_to_top_n() {
        let ranker = RecommendationRanker::new();
        let context = RecommendationContext::now(2);
        let mut rng = SeededRandom::new(3);

        for top_n in [0, 1, 3, 5, 12] {
            let results = ranker
                .rank(&profile(), &records(), &context, Some(top_n), &mut rng)
                .expect("valid inputs");
            assert_eq!(results.len(), top_n.min(5));
        }
    }

    #[test]
    fn empty_candidate_list_yields_empty_result() {
        let ranker = RecommendationRanker::new();
        let results = ranker
            .rank(&profile(), &[], &RecommendationContext::now(2), Some(10), &mut SeededRandom::new(1))
            .expect("empty input is not an error");

        assert!(results.is_empty());
    }

    #[test]
    fn ties_keep_input_order() {
        let ranker = RecommendationRanker::new().with_synthetic_extras(false);
        let tied = vec![
            record("first", "italian", "moderate", "Bandra"),
            record("second", "italian", "moderate", "Bandra"),
            record("third", "italian", "moderate", "Bandra"),
        ];
        let results = ranker
            .rank(&profile(), &tied, &RecommendationContext::now(2), None, &mut SeededRandom::new(9))
            .expect("valid inputs");

        let ids: Vec<&str> = results.iter().map(|item| item.venue.id.as_str()).collect();
        assert_eq!(ids, ["first", "second", "third"]);
    }

    #[test]
    fn malformed_record_rejects_whole_call() {
        let ranker = RecommendationRanker::new();
        let mut input = records();
        input.push(VenueRecord::default());

        let result =
            ranker.rank(&profile(), &input, &RecommendationContext::now(2), None, &mut SeededRandom::new(1));
        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn extras_come_from_random_source() {
        let ranker = RecommendationRanker::new();
        let mut rng = ScriptedRandom::new(vec![0.5, 0.9, 0.2, 0.2]);
        let results = ranker
            .rank(&profile(), &records()[1..2], &RecommendationContext::now(2), None, &mut rng)
            .expect("valid inputs");

        let top = &results[0];
        assert_eq!(top.estimated_wait_minutes, Some(15));
        assert_eq!(top.offers.len(), 2);
        assert_eq!(top.offers[0], OFFER_POOL[1]);
        // Duplicate draw is bumped to the next pool entry.
        assert_eq!(top.offers[1], OFFER_POOL[2]);
    }

    #[test]
    fn extras_can_be_disabled() {
        let ranker = RecommendationRanker::new().with_synthetic_extras(false);
        let results = ranker
            .rank(&profile(), &records(), &RecommendationContext::now(2), None, &mut SeededRandom::new(5))
            .expect("valid inputs");

        for item in results {
            assert_eq!(item.estimated_wait_minutes, None);
            assert!(item.offers.is_empty());
        }
    }

    #[test]
    fn insight_follows_score_band() {
        let ranker = RecommendationRanker::new();
        let results = ranker
            .rank(&profile(), &records(), &RecommendationContext::now(2), None, &mut SeededRandom::new(2))
            .expect("valid inputs");

        for item in results {
            assert_eq!(item.band, InsightBand::from_score(item.score));
            assert!(item.insight.starts_with(&item.venue.name));
        }
    }

    #[test]
    fn live_wait_merges_only_for_same_venue() {
        let ranker = RecommendationRanker::new();
        let mut rng = SeededRandom::new(4);
        let results = ranker
            .rank(&profile(), &records(), &RecommendationContext::now(2), Some(1), &mut rng)
            .expect("valid inputs");
        let top = results.into_iter().next().expect("one result");

        let predictor = WaitTimePredictor::new();
        let snapshot = OccupancySnapshot::new(&top.venue.id, 20, 100, 60.0, 15, 2);
        let prediction = predictor.predict(&snapshot, &mut rng).expect("valid snapshot");
        let merged = top.clone().with_live_wait(prediction.clone()).expect("same venue");
        assert_eq!(merged.estimated_wait_minutes, Some(prediction.estimated_wait_minutes));
        assert_eq!(merged.live_wait, Some(prediction));

        let other = OccupancySnapshot::new("elsewhere", 20, 100, 60.0, 15, 2);
        let foreign = predictor.predict(&other, &mut rng).expect("valid snapshot");
        assert!(matches!(top.with_live_wait(foreign), Err(DomainError::InvalidInput(_))));
    }
}
