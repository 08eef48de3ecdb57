use chrono::{Datelike, Local, Timelike};
use clap::Args;
use tablewise_core::config::AppConfig;
use tablewise_core::{ApplicationError, OccupancySnapshot, SeededRandom, ThreadRandom};

use crate::commands::CommandResult;

#[derive(Debug, Clone, Args)]
pub struct PredictArgs {
    #[arg(long, default_value = "venue", help = "Venue identifier echoed in the prediction")]
    pub venue_id: String,
    #[arg(long, help = "Guests currently seated")]
    pub seated: u32,
    #[arg(long, help = "Total seating capacity")]
    pub capacity: u32,
    #[arg(long, help = "Average dining duration in minutes")]
    pub dining_minutes: f64,
    #[arg(long, help = "Hour of day 0-23 (defaults to the local clock)")]
    pub hour: Option<u8>,
    #[arg(long, help = "Day of week 0-6 with 0 = Sunday (defaults to the local clock)")]
    pub day: Option<u8>,
    #[arg(long, help = "Seed for reproducible jitter")]
    pub seed: Option<u64>,
}

pub fn run(config: &AppConfig, args: &PredictArgs) -> CommandResult {
    let now = Local::now();
    let snapshot = OccupancySnapshot::new(
        args.venue_id.clone(),
        args.seated,
        args.capacity,
        args.dining_minutes,
        args.hour.unwrap_or(now.hour() as u8),
        args.day.unwrap_or(now.weekday().num_days_from_sunday() as u8),
    );

    let predictor = config.predictor();
    let predicted = match args.seed {
        Some(seed) => predictor.predict(&snapshot, &mut SeededRandom::new(seed)),
        None => predictor.predict(&snapshot, &mut ThreadRandom),
    };

    let prediction = match predicted {
        Ok(prediction) => prediction,
        Err(error) => return CommandResult::rejected("predict", ApplicationError::from(error)),
    };

    let data = match serde_json::to_value(&prediction) {
        Ok(data) => data,
        Err(error) => {
            return CommandResult::failure("predict", "serialization", error.to_string(), 1);
        }
    };

    CommandResult::success_with_data("predict", prediction.message.clone(), Some(data))
}
