use crate::generator::profile::GeneratorConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use shotcore::detection::SessionConfig;
use shotcore::scoring::{FixedTally, TargetType};
use std::fs;
use std::path::Path;

/// Hit counts read off the target after the run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetConfig {
    #[serde(rename = "type")]
    pub target_type: TargetType,
    #[serde(default)]
    pub alpha: u32,
    #[serde(default)]
    pub charlie: u32,
    #[serde(default)]
    pub delta: u32,
}

impl TargetConfig {
    pub fn tally(&self) -> FixedTally {
        FixedTally {
            alpha_hits: self.alpha,
            charlie_hits: self.charlie,
            delta_hits: self.delta,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DrillConfig {
    pub name: String,
    pub expected_rounds: u32,
    #[serde(default)]
    pub par_time_s: Option<f64>,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub target: Option<TargetConfig>,
    #[serde(default)]
    pub generator: GeneratorConfig,
}

impl DrillConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading drill config {}", path_ref.display()))?;
        let config: DrillConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing drill config {}", path_ref.display()))?;
        config
            .session
            .validate()
            .with_context(|| format!("validating drill config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(rounds: u32, par_time_s: Option<f64>, seed: u64) -> Self {
        Self {
            name: format!("{}-round drill", rounds),
            expected_rounds: rounds,
            par_time_s,
            session: SessionConfig::default(),
            target: None,
            generator: GeneratorConfig {
                shots: rounds,
                seed,
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shotcore::detection::FusionPolicy;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_fires_every_round() {
        let cfg = DrillConfig::from_args(6, Some(5.0), 7);
        assert_eq!(cfg.generator.shots, 6);
        assert_eq!(cfg.generator.seed, 7);
        assert_eq!(cfg.session, SessionConfig::default());
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"name: bill drill\n\
              expected_rounds: 5\n\
              par_time_s: 3.5\n\
              session:\n  fusion:\n    mode: correlated\n    window_ms: 60\n\
              target:\n  type: uspsa\n  alpha: 4\n  charlie: 1\n\
              generator:\n  shots: 5\n  flinch_shots: [2]\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = DrillConfig::load(&path).unwrap();
        assert_eq!(cfg.expected_rounds, 5);
        assert_eq!(cfg.session.fusion, FusionPolicy::Correlated { window_ms: 60 });
        assert_eq!(cfg.session.detector.debounce_ms, 100);
        let target = cfg.target.unwrap();
        assert_eq!(target.target_type, TargetType::Uspsa);
        assert_eq!(target.delta, 0);
        assert_eq!(cfg.generator.flinch_shots, vec![2]);
    }

    #[test]
    fn shipped_drills_parse() {
        let drills = Path::new(env!("CARGO_MANIFEST_DIR")).join("drills");
        let bill = DrillConfig::load(drills.join("bill_drill.yaml")).unwrap();
        assert_eq!(bill.generator.flinch_shots, vec![4]);
        assert_eq!(bill.session.flinch.history, 30);

        let idpa = DrillConfig::load(drills.join("idpa_correlated.yaml")).unwrap();
        assert_eq!(idpa.target.map(|t| t.target_type), Some(TargetType::Idpa));
        assert_eq!(idpa.session.fusion, FusionPolicy::Correlated { window_ms: 60 });
    }

    #[test]
    fn config_load_rejects_invalid_detector_settings() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"name: broken\nexpected_rounds: 2\nsession:\n  detector:\n    baseline_window: 0\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let err = DrillConfig::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("baseline_window"));
    }
}
