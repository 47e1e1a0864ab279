use crate::workflow::runner::DrillOutcome;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use shotcore::scoring::{DrillRun, ScoreResult, SplitSummary};
use shotcore::sensor::ShotRecord;
use shotcore::telemetry::MetricsSnapshot;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

/// Everything recorded about one drill, as written to the JSON report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrillReport {
    pub drill: String,
    /// Shots fired in the replayed recording.
    pub generated_shots: usize,
    pub shots: Vec<ShotRecord>,
    pub run: DrillRun,
    pub result: ScoreResult,
    pub splits: Option<SplitSummary>,
    pub metrics: MetricsSnapshot,
}

impl DrillReport {
    pub fn new(drill: &str, generated_shots: usize, outcome: &DrillOutcome) -> Self {
        Self {
            drill: drill.to_string(),
            generated_shots,
            shots: outcome.shots.clone(),
            run: outcome.run.clone(),
            result: outcome.result,
            splits: outcome.run.split_summary(),
            metrics: outcome.metrics,
        }
    }

    pub fn summary(&self) -> String {
        let mut lines = vec![format!(
            "{} -> {} shots in {:.2}s, score {}, hit factor {:.2}, {}",
            self.drill,
            self.run.shot_count,
            self.run.total_time,
            self.result.score,
            self.result.hit_factor,
            self.result.classification
        )];
        if let Some(splits) = &self.splits {
            lines.push(format!(
                "splits: fastest {:.2}s, slowest {:.2}s, average {:.2}s",
                splits.fastest, splits.slowest, splits.average
            ));
        }
        lines.push(format!(
            "detected {} of {} fired shots",
            self.shots.len(),
            self.generated_shots
        ));
        lines.push(format!(
            "flinches: {}, samples: {} audio / {} gyro ({} rejected)",
            self.run.flinch_count,
            self.metrics.audio_samples,
            self.metrics.gyro_samples,
            self.metrics.rejected_samples
        ));
        lines.join("\n")
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path_ref = path.as_ref();
        if let Some(parent) = path_ref.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating report directory {}", parent.display()))?;
        }
        let file = File::create(path_ref)
            .with_context(|| format!("creating report {}", path_ref.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .with_context(|| format!("writing report {}", path_ref.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::profile::build_sensor_stream;
    use crate::workflow::config::DrillConfig;
    use crate::workflow::runner::Runner;

    #[test]
    fn report_round_trips_through_json_file() {
        let cfg = DrillConfig::from_args(4, Some(3.0), 2);
        let stream = build_sensor_stream(&cfg.generator).unwrap();
        let outcome = Runner::new(cfg.clone()).execute(&stream).unwrap();
        let report = DrillReport::new(&cfg.name, stream.shot_times.len(), &outcome);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("drill.json");
        report.write_json(&path).unwrap();

        let parsed: DrillReport =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.run, report.run);
        assert_eq!(parsed.shots.len(), 4);
        assert_eq!(parsed.generated_shots, 4);
        let summary = report.summary();
        assert!(summary.starts_with("4-round drill -> 4 shots"));
        assert!(summary.contains("detected 4 of 4 fired shots"));
    }
}
