//! Sensor jitter for STANCE scenarios
//!
//! Simulates a noisy depth sensor:
//! - Positional noise on every joint
//! - Joints dropping to inferred tracking
//! - Single-frame spikes on one joint
//! - Whole frames never delivered

use std::collections::HashMap;

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stance_core::{FrameSnapshot, Joint, Position3D, TrackingConfidence};

/// Per-axis noise distribution (metres)
#[derive(Clone, Debug, PartialEq)]
pub enum JitterDistribution {
    /// No noise
    None,
    /// Uniform in [-amplitude, amplitude]
    Uniform { amplitude: f32 },
    /// Zero-mean normal
    Normal { stddev: f32 },
}

impl JitterDistribution {
    /// Sample one offset
    pub fn sample(&self, rng: &mut StdRng) -> f32 {
        match self {
            JitterDistribution::None => 0.0,
            JitterDistribution::Uniform { amplitude } => {
                if *amplitude <= 0.0 {
                    return 0.0;
                }
                Uniform::new_inclusive(-amplitude, *amplitude).sample(rng)
            }
            JitterDistribution::Normal { stddev } => {
                // Box-Muller transform
                let u1: f64 = rng.gen::<f64>().max(f64::MIN_POSITIVE);
                let u2: f64 = rng.gen();
                let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
                (*stddev as f64 * z) as f32
            }
        }
    }
}

/// Sensor jitter configuration
#[derive(Clone, Debug)]
pub struct JitterConfig {
    /// Noise added to each axis of each joint
    pub noise: JitterDistribution,
    /// Probability a joint is reported as inferred
    pub inferred_prob: f64,
    /// Probability a frame carries a spike on one joint
    pub spike_prob: f64,
    /// Vertical size of a spike
    pub spike_amplitude: f32,
    /// Probability a frame is never delivered
    pub drop_prob: f64,
}

impl Default for JitterConfig {
    fn default() -> Self {
        Self::mild()
    }
}

impl JitterConfig {
    /// Perfect sensor
    pub fn none() -> Self {
        JitterConfig {
            noise: JitterDistribution::None,
            inferred_prob: 0.0,
            spike_prob: 0.0,
            spike_amplitude: 0.0,
            drop_prob: 0.0,
        }
    }

    /// Well-lit room, user facing the sensor
    pub fn mild() -> Self {
        JitterConfig {
            noise: JitterDistribution::Normal { stddev: 0.01 },
            inferred_prob: 0.01,
            spike_prob: 0.0,
            spike_amplitude: 0.0,
            drop_prob: 0.01,
        }
    }

    /// Cluttered scene with occasional tracking glitches
    pub fn noisy() -> Self {
        JitterConfig {
            noise: JitterDistribution::Uniform { amplitude: 0.02 },
            inferred_prob: 0.05,
            spike_prob: 0.02,
            spike_amplitude: 0.5,
            drop_prob: 0.05,
        }
    }

    /// Only spikes, no background noise
    pub fn spikes(probability: f64, amplitude: f32) -> Self {
        JitterConfig {
            spike_prob: probability,
            spike_amplitude: amplitude,
            ..Self::none()
        }
    }
}

/// Jitter statistics
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JitterStats {
    pub frames_seen: u64,
    pub frames_dropped: u64,
    pub joints_inferred: u64,
    pub spikes: u64,
}

impl JitterStats {
    pub fn drop_rate(&self) -> f64 {
        if self.frames_seen == 0 {
            0.0
        } else {
            self.frames_dropped as f64 / self.frames_seen as f64
        }
    }
}

/// Seeded sensor noise source
pub struct SensorJitter {
    config: JitterConfig,
    rng: StdRng,
    stats: JitterStats,
}

impl SensorJitter {
    /// Create with a fixed seed so runs are reproducible
    pub fn new(config: JitterConfig, seed: u64) -> Self {
        SensorJitter {
            config,
            rng: StdRng::seed_from_u64(seed),
            stats: JitterStats::default(),
        }
    }

    pub fn config(&self) -> &JitterConfig {
        &self.config
    }

    /// Pass a clean frame through the sensor. `None` means it was dropped.
    pub fn apply(&mut self, frame: &FrameSnapshot) -> Option<FrameSnapshot> {
        self.stats.frames_seen += 1;

        if self.config.drop_prob > 0.0 && self.rng.gen_bool(self.config.drop_prob.min(1.0)) {
            self.stats.frames_dropped += 1;
            return None;
        }

        let spiked = if self.config.spike_prob > 0.0
            && self.rng.gen_bool(self.config.spike_prob.min(1.0))
            && !frame.is_empty()
        {
            self.stats.spikes += 1;
            Some(frame.samples()[self.rng.gen_range(0..frame.len())].joint)
        } else {
            None
        };

        let mut joints = HashMap::with_capacity(frame.len());
        for sample in frame.samples() {
            let mut position = sample.position.offset(
                self.config.noise.sample(&mut self.rng),
                self.config.noise.sample(&mut self.rng),
                self.config.noise.sample(&mut self.rng),
            );
            if spiked == Some(sample.joint) {
                let sign = if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
                position = position.raised(sign * self.config.spike_amplitude);
            }

            let mut confidence = sample.confidence;
            if confidence == TrackingConfidence::Tracked
                && self.config.inferred_prob > 0.0
                && self.rng.gen_bool(self.config.inferred_prob.min(1.0))
            {
                confidence = TrackingConfidence::Inferred;
                self.stats.joints_inferred += 1;
            }

            joints.insert(sample.joint, (position, confidence));
        }

        Some(FrameSnapshot::from_joint_map(frame.index(), &joints))
    }

    /// Displace one joint of a frame by `dy` for exactly that frame
    pub fn spike(frame: &FrameSnapshot, joint: Joint, dy: f32) -> FrameSnapshot {
        let joints: HashMap<Joint, (Position3D, TrackingConfidence)> = frame
            .samples()
            .iter()
            .map(|s| {
                let position = if s.joint == joint {
                    s.position.raised(dy)
                } else {
                    s.position
                };
                (s.joint, (position, s.confidence))
            })
            .collect();
        FrameSnapshot::from_joint_map(frame.index(), &joints)
    }

    pub fn stats(&self) -> &JitterStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = JitterStats::default();
    }
}
