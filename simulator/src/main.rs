use anyhow::Context;
use clap::Parser;
use generator::profile::build_sensor_stream;
use report::leaderboard::JsonLinesLeaderboard;
use report::model::DrillReport;
use shotcore::scoring::{LeaderboardBackend, LeaderboardEntry};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::DrillConfig;
use workflow::cues::TerminalBell;
use workflow::runner::Runner;

mod generator;
mod report;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Replays synthetic drills through the shot-detection core")]
struct Args {
    /// Load a drill definition from YAML
    #[arg(long)]
    drill: Option<PathBuf>,
    #[arg(long, default_value_t = 6)]
    rounds: u32,
    /// Par time in seconds
    #[arg(long)]
    par: Option<f64>,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Replay samples on the wall clock with start and par cues
    #[arg(long, default_value_t = false)]
    live: bool,
    /// Write a JSON report of the run
    #[arg(long)]
    report: Option<PathBuf>,
    /// Append the result to a JSON-lines leaderboard file
    #[arg(long)]
    leaderboard: Option<PathBuf>,
    #[arg(long, default_value = "anonymous")]
    shooter: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let drill_config = if let Some(path) = args.drill {
        DrillConfig::load(path)?
    } else {
        DrillConfig::from_args(args.rounds, args.par, args.seed)
    };

    let stream = build_sensor_stream(&drill_config.generator)?;
    let runner = Runner::new(drill_config.clone());

    let outcome = if args.live {
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for live replay")?;
        runtime.block_on(async {
            tokio::select! {
                outcome = runner.execute_live(&stream, Arc::new(TerminalBell)) => outcome,
                interrupted = signal::ctrl_c() => {
                    interrupted.context("awaiting Ctrl+C")?;
                    anyhow::bail!("drill interrupted")
                }
            }
        })?
    } else {
        runner.execute(&stream)?
    };

    let report = DrillReport::new(&drill_config.name, stream.shot_times.len(), &outcome);
    println!("{}", report.summary());

    if let Some(path) = args.report {
        report.write_json(&path)?;
        println!("report written to {}", path.display());
    }

    if let Some(path) = args.leaderboard {
        let board = JsonLinesLeaderboard::new(path);
        let recorded_at_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or_default();
        let entry = LeaderboardEntry {
            shooter: args.shooter,
            drill: drill_config.name.clone(),
            result: outcome.result,
            total_time: outcome.run.total_time,
            recorded_at_ms,
        };
        board
            .submit(&entry)
            .with_context(|| format!("submitting to leaderboard {}", board.path().display()))?;

        for (rank, entry) in board.top(&drill_config.name, 5)?.iter().enumerate() {
            println!(
                "#{} {:<16} {:>6.2} HF  {}",
                rank + 1,
                entry.shooter,
                entry.result.hit_factor,
                entry.result.classification
            );
        }
    }

    Ok(())
}
