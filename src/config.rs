use std::fmt;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Tuning surface for the trip-pooling pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Spatiotemporal tradeoff in minutes per mile. A larger value makes the
    /// clusterer more tolerant of pickup-time separation relative to distance.
    pub time_scale: f64,
    /// Minimum van occupancy (seats, not trips) required to form a cluster.
    #[serde(default = "default_min_cluster_size")]
    pub min_cluster_size: usize,
    /// Reject merged clusters whose pooled passenger count exceeds this
    /// ceiling. `None` disables the pass.
    #[serde(default = "default_max_cluster_size")]
    pub max_cluster_size: Option<u32>,
    /// Hour of day at which each 24h window starts.
    #[serde(default = "default_start_time")]
    pub start_time: f64,
    /// Optional seeded downsampling applied before windowing.
    #[serde(default)]
    pub sample: Option<SampleConfig>,
    /// Log each window's bin index and pickup-time span.
    #[serde(default)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SampleConfig {
    /// Fraction of trips to keep, in (0, 1].
    pub frac: f64,
    /// Explicit seed so downsampled runs stay reproducible.
    pub seed: u64,
}

fn default_min_cluster_size() -> usize {
    6
}

fn default_max_cluster_size() -> Option<u32> {
    Some(120)
}

fn default_start_time() -> f64 {
    6.0
}

impl ClusterConfig {
    /// Config with the given time/distance tradeoff and defaults everywhere
    /// else: van capacity 6, supercluster ceiling 120, windows starting at
    /// 06:00.
    pub fn new(time_scale: f64) -> Self {
        Self {
            time_scale,
            min_cluster_size: default_min_cluster_size(),
            max_cluster_size: default_max_cluster_size(),
            start_time: default_start_time(),
            sample: None,
            verbose: false,
        }
    }

    /// Reject malformed configurations before any window is processed.
    pub fn validate(&self) -> Result<(), InvalidConfigError> {
        if !self.time_scale.is_finite() || self.time_scale <= 0.0 {
            return Err(InvalidConfigError::NonPositiveTimeScale(self.time_scale));
        }
        if self.min_cluster_size < 1 {
            return Err(InvalidConfigError::ZeroMinClusterSize);
        }
        if self.max_cluster_size == Some(0) {
            return Err(InvalidConfigError::ZeroMaxClusterSize);
        }
        if !self.start_time.is_finite() || self.start_time < 0.0 || self.start_time >= 24.0 {
            return Err(InvalidConfigError::StartTimeOutOfRange(self.start_time));
        }
        if let Some(sample) = &self.sample {
            if !sample.frac.is_finite() || sample.frac <= 0.0 || sample.frac > 1.0 {
                return Err(InvalidConfigError::SampleFracOutOfRange(sample.frac));
            }
        }
        Ok(())
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum InvalidConfigError {
    NonPositiveTimeScale(f64),
    ZeroMinClusterSize,
    ZeroMaxClusterSize,
    StartTimeOutOfRange(f64),
    SampleFracOutOfRange(f64),
}

impl Display for InvalidConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InvalidConfigError::NonPositiveTimeScale(value) => {
                write!(f, "time_scale must be a positive number of minutes per mile, got {}", value)
            }
            InvalidConfigError::ZeroMinClusterSize => {
                write!(f, "min_cluster_size must be at least 1")
            }
            InvalidConfigError::ZeroMaxClusterSize => {
                write!(f, "max_cluster_size must be at least 1 when set")
            }
            InvalidConfigError::StartTimeOutOfRange(value) => {
                write!(f, "start_time must be an hour of day in [0, 24), got {}", value)
            }
            InvalidConfigError::SampleFracOutOfRange(value) => {
                write!(f, "sample.frac must be in (0, 1], got {}", value)
            }
        }
    }
}
