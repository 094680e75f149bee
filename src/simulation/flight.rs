use std::str::FromStr;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use serde::Deserialize;

use super::Trace;
use crate::constants::LOOP_PERIOD_MS;
use crate::error::{Result, VarioError};

/// Sea-level standard pressure, Pa
pub const STANDARD_PRESSURE_PA: f32 = 101_325.0;

/// A stretch of constant vertical speed
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Segment {
    /// Climb rate in m/s, negative when sinking
    pub vario_ms: f32,
    pub duration_s: f32,
}

impl FromStr for Segment {
    type Err = String;

    /// `<vario_ms>:<duration_s>`, e.g. `2.5:30`
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (vario, duration) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| format!("expected '<vario_ms>:<duration_s>', got '{}'", s))?;
        let vario_ms = vario
            .trim()
            .parse()
            .map_err(|_| format!("invalid climb rate: {}", vario))?;
        let duration_s: f32 = duration
            .trim()
            .parse()
            .map_err(|_| format!("invalid duration: {}", duration))?;
        if duration_s.is_nan() || duration_s < 0.0 {
            return Err(format!("duration must be non-negative: {}", duration));
        }
        Ok(Segment {
            vario_ms,
            duration_s,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    /// Pressure at the start altitude
    pub base_pressure_pa: f32,
    pub start_altitude_m: f32,
    pub period_ms: u32,
    /// Sensor noise, one standard deviation
    pub noise_std_pa: f32,
    pub seed: Option<u64>,
    pub segments: Vec<Segment>,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            base_pressure_pa: STANDARD_PRESSURE_PA,
            start_altitude_m: 0.0,
            period_ms: LOOP_PERIOD_MS,
            noise_std_pa: 0.0,
            seed: None,
            segments: Vec::new(),
        }
    }
}

impl FlightConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_noise(mut self, noise_std_pa: f32) -> Self {
        self.noise_std_pa = noise_std_pa;
        self
    }

    pub fn then(mut self, vario_ms: f32, duration_s: f32) -> Self {
        self.segments.push(Segment {
            vario_ms,
            duration_s,
        });
        self
    }
}

/// Standard-atmosphere pressure at `altitude_m` above the `base_pa` level
pub fn altitude_to_pressure(base_pa: f32, altitude_m: f32) -> f32 {
    base_pa * (1.0 - 2.255_77e-5 * altitude_m).powf(5.255_88)
}

fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => rand::make_rng(),
    }
}

/// Sample a flight profile into a pressure trace, one sample per period
pub fn generate_flight(config: &FlightConfig) -> Result<Trace> {
    if config.period_ms == 0 {
        return Err(VarioError::Config("period_ms must be positive".into()));
    }
    let normal = Normal::new(0.0, config.noise_std_pa as f64)
        .map_err(|e| VarioError::Config(format!("noise_std_pa: {}", e)))?;
    let mut rng = create_rng(config.seed);

    let dt = config.period_ms as f32 / 1000.0;
    let mut altitude = config.start_altitude_m;
    let mut samples = Vec::new();

    for segment in &config.segments {
        let count = (segment.duration_s / dt).round() as usize;
        for _ in 0..count {
            let clean = altitude_to_pressure(config.base_pressure_pa, altitude);
            samples.push(clean + normal.sample(&mut rng) as f32);
            altitude += segment.vario_ms * dt;
        }
    }

    log::debug!(
        "Generated {} samples, final altitude {:.1} m",
        samples.len(),
        altitude
    );
    Ok(Trace::new(samples))
}
