use crate::generator::template::decay_envelope;
use anyhow::Context;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use shotcore::sensor::SensorSample;

/// Shortest split the generator will produce, so recoil tails stay clear of the next shot.
const MIN_SPLIT_MS: u64 = 250;
const RECOIL_SAMPLES: usize = 3;
const FLINCH_LEAD_MS: u64 = 200;
const FLINCH_RATE: f32 = 2.0;

/// Configuration for generating a synthetic drill recording.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub shots: u32,
    /// Delay from the start signal to the first shot.
    pub start_delay_ms: u64,
    pub split_ms: u64,
    pub split_jitter_ms: u64,
    /// Recording continues this long after the last shot.
    pub tail_ms: u64,
    pub audio_interval_ms: u64,
    pub gyro_interval_ms: u64,
    pub noise_floor: f32,
    pub gyro_noise: f32,
    pub shot_level: f32,
    pub recoil_peak: f32,
    /// Zero-based shot indices preceded by bracing movement.
    pub flinch_shots: Vec<u32>,
    pub audio_enabled: bool,
    pub gyro_enabled: bool,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            shots: 6,
            start_delay_ms: 1200,
            split_ms: 300,
            split_jitter_ms: 40,
            tail_ms: 800,
            audio_interval_ms: 50,
            gyro_interval_ms: 16,
            noise_floor: 0.12,
            gyro_noise: 0.2,
            shot_level: 0.95,
            recoil_peak: 4.5,
            flinch_shots: Vec::new(),
            audio_enabled: true,
            gyro_enabled: true,
            seed: 0,
        }
    }
}

/// Time-ordered samples plus the ground truth they were built from.
#[derive(Debug, Clone)]
pub struct SensorStream {
    pub samples: Vec<SensorSample>,
    pub shot_times: Vec<u64>,
    pub duration_ms: u64,
}

fn shot_schedule(config: &GeneratorConfig, rng: &mut StdRng) -> Vec<u64> {
    let jitter = config.split_jitter_ms as i64;
    let mut times = Vec::with_capacity(config.shots as usize);
    let mut next = config.start_delay_ms;
    for _ in 0..config.shots {
        times.push(next);
        let offset = if jitter > 0 { rng.gen_range(-jitter..=jitter) } else { 0 };
        let split = (config.split_ms as i64 + offset).max(MIN_SPLIT_MS as i64) as u64;
        next += split;
    }
    times
}

fn audio_samples(
    config: &GeneratorConfig,
    shots: &[u64],
    duration: u64,
    rng: &mut StdRng,
) -> Vec<SensorSample> {
    let interval = config.audio_interval_ms.max(1);
    (0..=duration)
        .step_by(interval as usize)
        .map(|timestamp| {
            let bang = shots
                .iter()
                .any(|&shot| timestamp >= shot && timestamp - shot < interval);
            let level = if bang {
                config.shot_level - rng.gen_range(0.0..0.05)
            } else {
                rng.gen_range(0.0..=config.noise_floor.abs())
            };
            SensorSample::audio(timestamp, level.clamp(0.0, 1.0))
        })
        .collect()
}

fn gyro_samples(
    config: &GeneratorConfig,
    shots: &[u64],
    duration: u64,
    rng: &mut StdRng,
) -> Vec<SensorSample> {
    let interval = config.gyro_interval_ms.max(1);
    let recoil = decay_envelope(RECOIL_SAMPLES, config.recoil_peak);
    let noise = config.gyro_noise.abs();
    let flinching: Vec<u64> = config
        .flinch_shots
        .iter()
        .filter_map(|&index| shots.get(index as usize).copied())
        .collect();

    (0..=duration)
        .step_by(interval as usize)
        .map(|timestamp| {
            let mut x = rng.gen_range(-noise..=noise);
            let y = rng.gen_range(-noise..=noise);
            let z = rng.gen_range(-noise..=noise);

            for &shot in shots {
                if timestamp >= shot {
                    let index = ((timestamp - shot) / interval) as usize;
                    if let Some(&pulse) = recoil.get(index) {
                        x += pulse;
                    }
                }
            }
            if flinching
                .iter()
                .any(|&shot| timestamp < shot && shot - timestamp < FLINCH_LEAD_MS)
            {
                x += FLINCH_RATE;
            }
            SensorSample::gyro(timestamp, x, y, z)
        })
        .collect()
}

pub fn build_sensor_stream(config: &GeneratorConfig) -> anyhow::Result<SensorStream> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let shot_times = shot_schedule(config, &mut rng);
    let duration_ms = shot_times
        .last()
        .copied()
        .unwrap_or(config.start_delay_ms)
        .checked_add(config.tail_ms)
        .context("overflow computing drill duration")?;

    let mut samples = Vec::new();
    if config.audio_enabled {
        samples.extend(audio_samples(config, &shot_times, duration_ms, &mut rng));
    }
    if config.gyro_enabled {
        samples.extend(gyro_samples(config, &shot_times, duration_ms, &mut rng));
    }
    samples.sort_by_key(|sample| sample.timestamp);

    Ok(SensorStream {
        samples,
        shot_times,
        duration_ms,
    })
}
