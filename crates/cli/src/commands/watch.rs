use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use clap::Args;
use tablewise_core::config::AppConfig;
use tablewise_core::{
    ApplicationError, MonitorHandle, OccupancyFeed, OccupancySnapshot, SeededRandom, ThreadRandom,
};
use tracing::info;

use crate::commands::CommandResult;

#[derive(Debug, Clone, Args)]
pub struct WatchArgs {
    #[arg(long, help = "JSON file holding the latest occupancy snapshot; re-read on every poll")]
    pub snapshot: PathBuf,
    #[arg(long, help = "Stop after this many predictions (runs until Ctrl-C when omitted)")]
    pub ticks: Option<u32>,
    #[arg(long, help = "Poll interval in milliseconds (defaults to wait_time.poll_interval_secs)")]
    pub interval_ms: Option<u64>,
    #[arg(long, help = "Seed for reproducible jitter")]
    pub seed: Option<u64>,
}

/// Occupancy feed backed by a JSON file that an external process keeps current
struct FileOccupancyFeed {
    path: PathBuf,
}

#[async_trait]
impl OccupancyFeed for FileOccupancyFeed {
    async fn snapshot(&self, venue_id: &str) -> Result<OccupancySnapshot, ApplicationError> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|error| {
            ApplicationError::Integration(format!(
                "could not read `{}`: {error}",
                self.path.display()
            ))
        })?;
        let snapshot: OccupancySnapshot = serde_json::from_str(&raw).map_err(|error| {
            ApplicationError::Integration(format!(
                "could not parse `{}`: {error}",
                self.path.display()
            ))
        })?;

        if snapshot.venue_id != venue_id {
            return Err(ApplicationError::Integration(format!(
                "snapshot file switched venue from `{venue_id}` to `{}`",
                snapshot.venue_id
            )));
        }
        Ok(snapshot)
    }
}

/// Poll the snapshot file and emit each prediction as a JSON line.
pub fn run(config: &AppConfig, args: &WatchArgs, mut emit: impl FnMut(&str)) -> CommandResult {
    let initial: OccupancySnapshot = match crate::commands::read_json(&args.snapshot) {
        Ok(snapshot) => snapshot,
        Err(error) => return CommandResult::input_failure("watch", &error),
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "watch",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let emitted = runtime.block_on(async {
        let mut monitor = config.monitor();
        if let Some(interval_ms) = args.interval_ms {
            monitor = monitor.with_poll_interval(Duration::from_millis(interval_ms));
        }

        let feed = Arc::new(FileOccupancyFeed { path: args.snapshot.clone() });
        let handle = match args.seed {
            Some(seed) => monitor.spawn(initial.venue_id.clone(), feed, SeededRandom::new(seed)),
            None => monitor.spawn(initial.venue_id.clone(), feed, ThreadRandom),
        };

        let emitted = pump(handle, args.ticks, &mut emit).await?;
        info!(
            event_name = "cli.watch.completed",
            venue_id = %initial.venue_id,
            emitted,
            "watch finished"
        );
        Ok::<u32, ApplicationError>(emitted)
    });

    match emitted {
        Ok(emitted) => CommandResult::success(
            "watch",
            format!("emitted {emitted} predictions for `{}`", initial.venue_id),
        ),
        Err(error) => CommandResult::failure("watch", error.error_class(), error.to_string(), 3),
    }
}

async fn pump(
    mut handle: MonitorHandle,
    ticks: Option<u32>,
    emit: &mut impl FnMut(&str),
) -> Result<u32, ApplicationError> {
    let mut emitted = 0u32;

    loop {
        if ticks.is_some_and(|limit| emitted >= limit) {
            break;
        }

        let next = tokio::select! {
            prediction = handle.next() => prediction,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(prediction) = next else {
            break;
        };

        let line = serde_json::to_string(&prediction).map_err(|error| {
            ApplicationError::Integration(format!("could not serialize prediction: {error}"))
        })?;
        emit(&line);
        emitted += 1;
    }

    handle.stop().await?;
    Ok(emitted)
}
