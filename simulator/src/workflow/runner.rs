use crate::generator::profile::SensorStream;
use crate::workflow::config::DrillConfig;
use anyhow::Context;
use log::info;
use shotcore::detection::DrillSession;
use shotcore::scoring::{DrillRun, ScoreResult, ScoringEngine, TargetAnalysisProvider};
use shotcore::sensor::ShotRecord;
use shotcore::telemetry::MetricsSnapshot;
use shotcore::timer::{CuePlayer, ParTimer};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

pub struct DrillOutcome {
    pub run: DrillRun,
    pub result: ScoreResult,
    pub shots: Vec<ShotRecord>,
    pub metrics: MetricsSnapshot,
}

#[derive(Clone)]
pub struct Runner {
    config: DrillConfig,
    engine: ScoringEngine,
}

impl Runner {
    pub fn new(config: DrillConfig) -> Self {
        Self {
            config,
            engine: ScoringEngine::new(),
        }
    }

    /// Replays the stream as fast as possible.
    pub fn execute(&self, stream: &SensorStream) -> anyhow::Result<DrillOutcome> {
        let mut session = self.open_session()?;
        session.start(0);
        for sample in &stream.samples {
            session.ingest(sample);
        }
        Ok(self.finish(session, stream.duration_ms))
    }

    /// Replays the stream on the wall clock with start and par cues.
    pub async fn execute_live(
        &self,
        stream: &SensorStream,
        cues: Arc<dyn CuePlayer>,
    ) -> anyhow::Result<DrillOutcome> {
        let mut session = self.open_session()?;
        let mut timer = ParTimer::new(cues);

        timer.play_start_beep();
        if let Some(par) = self.config.par_time_s {
            timer
                .start_par_timer(par, move || info!("par time {:.2}s reached", par))
                .context("arming par timer")?;
        }

        let started = Instant::now();
        session.start(0);
        for sample in &stream.samples {
            tokio::time::sleep_until(started + Duration::from_millis(sample.timestamp)).await;
            if let Some(shot) = session.ingest(sample) {
                println!(
                    "shot {:>2} at {:>6.2}s{}{}",
                    session.shots().len(),
                    shot.event.timestamp as f64 / 1000.0,
                    shot.split_s
                        .map(|split| format!("  split {:.2}s", split))
                        .unwrap_or_default(),
                    if shot.flinch { "  FLINCH" } else { "" }
                );
            }
        }
        timer.cleanup();

        Ok(self.finish(session, stream.duration_ms))
    }

    fn open_session(&self) -> anyhow::Result<DrillSession> {
        DrillSession::new(self.config.session.clone()).context("building drill session")
    }

    fn finish(&self, mut session: DrillSession, stop_ms: u64) -> DrillOutcome {
        let rounds = self.config.expected_rounds;
        let tally = self
            .config
            .target
            .as_ref()
            .and_then(|target| target.tally().analyze(target.target_type, rounds));

        let run = session.stop(stop_ms, rounds, self.config.par_time_s, tally);
        let result = self.engine.score(&run);
        info!(
            "{}: score {} hit factor {:.2} ({})",
            self.config.name, result.score, result.hit_factor, result.classification
        );

        DrillOutcome {
            result,
            shots: session.shots().to_vec(),
            metrics: session.metrics(),
            run,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::profile::{build_sensor_stream, GeneratorConfig};
    use crate::workflow::config::TargetConfig;
    use shotcore::detection::FusionPolicy;
    use shotcore::scoring::{Classification, TargetType};
    use shotcore::sensor::DetectionMethod;
    use shotcore::timer::LogCuePlayer;

    fn assert_matches_ground_truth(outcome: &DrillOutcome, stream: &SensorStream) {
        assert_eq!(outcome.shots.len(), stream.shot_times.len());
        for (shot, &truth) in outcome.shots.iter().zip(&stream.shot_times) {
            assert!(shot.event.timestamp >= truth && shot.event.timestamp - truth < 50);
        }
        assert!(outcome.run.is_consistent());
    }

    #[test]
    fn runner_detects_every_generated_shot() {
        let cfg = DrillConfig::from_args(6, Some(5.0), 3);
        let stream = build_sensor_stream(&cfg.generator).unwrap();
        let outcome = Runner::new(cfg).execute(&stream).unwrap();

        assert_matches_ground_truth(&outcome, &stream);
        assert_eq!(outcome.run.flinch_count, 0);
        assert_eq!(outcome.result.score, 100);
        assert_eq!(outcome.result.classification, Classification::GrandMaster);
    }

    #[test]
    fn runner_flags_configured_flinches() {
        let mut cfg = DrillConfig::from_args(5, None, 11);
        cfg.generator.flinch_shots = vec![1, 3];
        let stream = build_sensor_stream(&cfg.generator).unwrap();
        let outcome = Runner::new(cfg).execute(&stream).unwrap();

        let flagged: Vec<bool> = outcome.shots.iter().map(|shot| shot.flinch).collect();
        assert_eq!(flagged, vec![false, true, false, true, false]);
        assert_eq!(outcome.result.score, 94);
    }

    #[test]
    fn single_channel_streams_still_detect_shots() {
        for (audio, gyro) in [(true, false), (false, true)] {
            let mut cfg = DrillConfig::from_args(4, None, 5);
            cfg.generator.audio_enabled = audio;
            cfg.generator.gyro_enabled = gyro;
            let stream = build_sensor_stream(&cfg.generator).unwrap();
            let outcome = Runner::new(cfg).execute(&stream).unwrap();
            assert_matches_ground_truth(&outcome, &stream);
        }
    }

    #[test]
    fn correlated_fusion_reports_combined_shots() {
        let mut cfg = DrillConfig::from_args(3, None, 9);
        cfg.session.fusion = FusionPolicy::Correlated { window_ms: 60 };
        let stream = build_sensor_stream(&cfg.generator).unwrap();
        let outcome = Runner::new(cfg).execute(&stream).unwrap();

        assert_eq!(outcome.shots.len(), 3);
        assert!(outcome
            .shots
            .iter()
            .all(|shot| shot.event.method == DetectionMethod::Combined));
    }

    #[test]
    fn target_tally_drives_score() {
        let mut cfg = DrillConfig::from_args(5, None, 1);
        cfg.target = Some(TargetConfig {
            target_type: TargetType::Uspsa,
            alpha: 4,
            charlie: 1,
            delta: 0,
        });
        let stream = build_sensor_stream(&cfg.generator).unwrap();
        let outcome = Runner::new(cfg).execute(&stream).unwrap();
        assert_eq!(outcome.result.score, 92);
        assert!(outcome.run.target_zone_tally.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn live_replay_matches_offline_replay() {
        let cfg = DrillConfig::from_args(3, Some(1.5), 21);
        let stream = build_sensor_stream(&cfg.generator).unwrap();
        let runner = Runner::new(cfg);

        let offline = runner.execute(&stream).unwrap();
        let live = runner
            .execute_live(&stream, Arc::new(LogCuePlayer))
            .await
            .unwrap();
        assert_eq!(live.run, offline.run);
        assert_eq!(live.result, offline.result);
    }
}
