use std::fmt;
use std::fmt::Display;

use log::info;
use polars::prelude::*;

use crate::capacity::remove_superclusters;
use crate::clustering::{ClusterError, DensityClusterer};
use crate::config::{ClusterConfig, InvalidConfigError};
use crate::features::build_features;
use crate::harmonize::harmonize_labels;
use crate::relabel::relabel_clusters;
use crate::schema::{self, SchemaError};
use crate::util::df::expand_by_passengers;
use crate::windows::assign_windows;

pub type ClusterTripsResult = Result<DataFrame, ClusterTripsError>;

#[derive(thiserror::Error, Debug)]
pub enum ClusterTripsError {
    Polars(#[from] PolarsError),
    Clustering(#[from] ClusterError),
    InvalidConfig(#[from] InvalidConfigError),
    Schema(#[from] SchemaError),
}

impl Display for ClusterTripsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let err: &dyn Display = match self {
            ClusterTripsError::Polars(err) => err,
            ClusterTripsError::Clustering(err) => err,
            ClusterTripsError::InvalidConfig(err) => err,
            ClusterTripsError::Schema(err) => err,
        };
        write!(f, "{}", err)
    }
}

/// Group taxi trips into shared-van pools with windowed density clustering.
///
/// The table is split into day windows, each window's passenger-expanded rows
/// are clustered in the joint space/time feature space, per-trip labels are
/// harmonized and merged, oversized clusters are rejected and the survivors
/// renumbered densely. Returns the trip table with `datetime_bin` and
/// `cluster_label` columns added; -1 marks unclustered trips.
pub fn cluster_trips(
    trips: DataFrame,
    config: &ClusterConfig,
    clusterer: &impl DensityClusterer,
) -> ClusterTripsResult {
    config.validate()?;
    let trips = schema::validate(trips)?;

    let trips = match &config.sample {
        Some(sample) => trips.sample_frac(
            &Series::new("frac".into(), vec![sample.frac]),
            false,
            false,
            Some(sample.seed),
        )?,
        None => trips,
    };

    let trips = assign_windows(trips.lazy(), config.start_time)
        .with_column(lit(-1i32).alias("cluster_label"))
        .collect()?;

    // Windows run strictly in ascending bin order: the raw-label offset is an
    // accumulator threaded through the loop, so labels committed by earlier
    // windows can never collide with later ones.
    let mut windows = trips.partition_by_stable(["datetime_bin"], true)?;
    windows.sort_by_key(window_bin);

    let mut next_label = 0i32;
    let mut trip_ids: Vec<u32> = Vec::with_capacity(trips.height());
    let mut trip_labels: Vec<i32> = Vec::with_capacity(trips.height());

    for window in &windows {
        let labels = cluster_window(window, config, clusterer, &mut next_label)?;
        let ids = window.column("trip_id")?.u32()?;
        trip_ids.extend(ids.into_no_null_iter());
        trip_labels.extend(labels);
    }

    let harmonized = df![
        "trip_id" => trip_ids,
        "harmonized_label" => trip_labels,
    ]?;

    let trips = trips
        .lazy()
        .left_join(harmonized.lazy(), col("trip_id"), col("trip_id"))
        .with_column(
            col("harmonized_label")
                .fill_null(lit(-1i32))
                .alias("cluster_label"),
        )
        .drop(["harmonized_label"]);

    let trips = match config.max_cluster_size {
        Some(max_cluster_size) => remove_superclusters(trips, max_cluster_size),
        None => trips,
    };

    Ok(relabel_clusters(trips.collect()?)?)
}

/// Cluster one window's trips and return one harmonized label per trip, in
/// the window's row order.
fn cluster_window(
    window: &DataFrame,
    config: &ClusterConfig,
    clusterer: &impl DensityClusterer,
    next_label: &mut i32,
) -> Result<Vec<i32>, ClusterTripsError> {
    if config.verbose {
        let pickups = window.column("pickup_datetime")?.as_materialized_series();
        let first = pickups.min_reduce()?;
        let last = pickups.max_reduce()?;
        info!(
            target: "clustering",
            "window {}: {} to {} ({} trips)",
            window_bin(window), first.value(), last.value(), window.height()
        );
    }

    let expanded = expand_by_passengers(window)?;
    if expanded.height() < config.min_cluster_size {
        // Too few seats requested to fill a single van; nothing to cluster.
        return Ok(vec![-1; window.height()]);
    }

    let features = build_features(&expanded, config.time_scale)?;
    let features = features.as_standard_layout();
    let mut raw_labels = clusterer.cluster(features.view(), config.min_cluster_size)?;

    // Offset this window's raw labels past everything committed so far. The
    // offset is computed once per window, not per row.
    let mut max_label = -1i32;
    for label in raw_labels.iter_mut() {
        if *label > -1 {
            *label += *next_label;
            max_label = max_label.max(*label);
        }
    }
    if max_label > -1 {
        *next_label = max_label + 1;
    }

    let passenger_counts: Vec<u32> = window
        .column("passenger_count")?
        .u32()?
        .into_no_null_iter()
        .collect();

    Ok(harmonize_labels(&raw_labels, &passenger_counts))
}

fn window_bin(window: &DataFrame) -> i64 {
    window
        .column("datetime_bin")
        .ok()
        .and_then(|column| column.i64().ok())
        .and_then(|bins| bins.get(0))
        .unwrap_or(0)
}
