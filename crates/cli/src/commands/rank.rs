use std::path::PathBuf;

use clap::Args;
use tablewise_core::config::AppConfig;
use tablewise_core::{
    ApplicationError, PreferenceProfile, RecommendationContext, SeededRandom, ThreadRandom,
    VenueRecord,
};
use tracing::info;

use crate::commands::{read_json, CommandResult};

#[derive(Debug, Clone, Args)]
pub struct RankArgs {
    #[arg(long, help = "JSON file with the preference profile")]
    pub profile: PathBuf,
    #[arg(long, help = "JSON file with an array of venue records")]
    pub venues: PathBuf,
    #[arg(long, help = "Maximum number of recommendations (defaults to ranking.default_top_n)")]
    pub top_n: Option<usize>,
    #[arg(long, default_value_t = 2, help = "Number of guests")]
    pub group_size: u32,
    #[arg(long, help = "Treat the booking as a special occasion")]
    pub special_occasion: bool,
    #[arg(long, help = "Seed for reproducible decorative extras")]
    pub seed: Option<u64>,
    #[arg(long, help = "Omit decorative wait estimates and offers")]
    pub no_extras: bool,
}

pub fn run(config: &AppConfig, args: &RankArgs) -> CommandResult {
    let profile: PreferenceProfile = match read_json(&args.profile) {
        Ok(profile) => profile,
        Err(error) => return CommandResult::input_failure("rank", &error),
    };
    let venues: Vec<VenueRecord> = match read_json(&args.venues) {
        Ok(venues) => venues,
        Err(error) => return CommandResult::input_failure("rank", &error),
    };

    let mut ranker = config.ranker();
    if args.no_extras {
        ranker = ranker.with_synthetic_extras(false);
    }
    let context =
        RecommendationContext::now(args.group_size).special_occasion(args.special_occasion);

    let ranked = match args.seed {
        Some(seed) => {
            ranker.rank(&profile, &venues, &context, args.top_n, &mut SeededRandom::new(seed))
        }
        None => ranker.rank(&profile, &venues, &context, args.top_n, &mut ThreadRandom),
    };

    let recommendations = match ranked {
        Ok(recommendations) => recommendations,
        Err(error) => return CommandResult::rejected("rank", ApplicationError::from(error)),
    };

    info!(
        event_name = "cli.rank.completed",
        venues = venues.len(),
        returned = recommendations.len(),
        "ranking finished"
    );

    let data = match serde_json::to_value(&recommendations) {
        Ok(data) => data,
        Err(error) => {
            return CommandResult::failure("rank", "serialization", error.to_string(), 1);
        }
    };

    CommandResult::success_with_data(
        "rank",
        format!("ranked {} of {} venues", recommendations.len(), venues.len()),
        Some(data),
    )
}
