pub mod capacity;
pub mod clustering;
pub mod config;
pub mod features;
pub mod harmonize;
pub mod pipeline;
pub mod relabel;
pub mod schema;
pub mod stats;
pub mod windows;
pub(crate) mod util;

pub use clustering::{DbscanClusterer, DensityClusterer};
pub use config::{ClusterConfig, SampleConfig};
pub use pipeline::{cluster_trips, ClusterTripsError};
pub use stats::{cluster_stats, ClusterStats};
