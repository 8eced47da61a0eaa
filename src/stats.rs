use polars::prelude::*;

use crate::features::FEET_PER_MILE;
use crate::util::df::expand_by_passengers;

const MS_PER_MINUTE: f64 = 60_000.0;

/// Cluster-quality summary for a labeled trip table.
#[derive(Debug, Clone)]
pub struct ClusterStats {
    /// Fraction of all passengers (not trips) that ended up in any cluster.
    /// Defined as 0 when the table holds no passengers at all.
    pub frac_clus: f64,
    /// Per-cluster metrics keyed by `cluster_label`, sorted ascending:
    /// `clus_size` (passenger count), `rmsd_xy0`/`rmsd_xy1` (RMS deviation of
    /// pickup/dropoff coordinates from the cluster centroid, miles) and
    /// `std_t0`/`std_t1` (sample std of pickup/dropoff timestamps, minutes;
    /// null for single-passenger clusters).
    pub per_cluster: DataFrame,
}

/// Describe the clusters of a labeled trip table.
///
/// Trips are expanded by passenger count exactly as clustering saw them, then
/// restricted to rows with a non-negative label. Purely descriptive: the trip
/// table is not touched, and an all-unclustered table yields empty per-cluster
/// columns with `frac_clus == 0`.
pub fn cluster_stats(trips: &DataFrame) -> PolarsResult<ClusterStats> {
    let expanded = expand_by_passengers(trips)?;
    let total_passengers = expanded.height();

    let clustered = expanded
        .lazy()
        .filter(col("cluster_label").gt(lit(-1)))
        .collect()?;

    let frac_clus = if total_passengers == 0 {
        0.0
    } else {
        clustered.height() as f64 / total_passengers as f64
    };

    let per_cluster = clustered
        .lazy()
        .with_columns([
            (col("pickup_x") / lit(FEET_PER_MILE)).alias("x0"),
            (col("pickup_y") / lit(FEET_PER_MILE)).alias("y0"),
            (col("dropoff_x") / lit(FEET_PER_MILE)).alias("x1"),
            (col("dropoff_y") / lit(FEET_PER_MILE)).alias("y1"),
            col("pickup_datetime")
                .dt()
                .timestamp(TimeUnit::Milliseconds)
                .alias("t0"),
            col("dropoff_datetime")
                .dt()
                .timestamp(TimeUnit::Milliseconds)
                .alias("t1"),
        ])
        .group_by([col("cluster_label")])
        .agg([
            len().alias("clus_size"),
            centred_square_sum("x0", "y0").mean().sqrt().alias("rmsd_xy0"),
            centred_square_sum("x1", "y1").mean().sqrt().alias("rmsd_xy1"),
            (col("t0").std(1) / lit(MS_PER_MINUTE)).alias("std_t0"),
            (col("t1").std(1) / lit(MS_PER_MINUTE)).alias("std_t1"),
        ])
        .sort(["cluster_label"], SortMultipleOptions::default())
        .collect()?;

    Ok(ClusterStats {
        frac_clus,
        per_cluster,
    })
}

/// Squared distance of each point from its cluster centroid.
fn centred_square_sum(x: &str, y: &str) -> Expr {
    let dx = col(x) - col(x).mean();
    let dy = col(y) - col(y).mean();
    dx.clone() * dx + dy.clone() * dy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::datetime;

    fn labeled_trips() -> DataFrame {
        // 10 passengers in total; the 6 in cluster 0 share one pickup corner.
        df![
            "trip_id" => [0u32, 1, 2, 3],
            "pickup_x" => [0.0f64, 0.0, 52800.0, 52800.0],
            "pickup_y" => [0.0f64, 0.0, 0.0, 52800.0],
            "dropoff_x" => [5280.0f64, 5280.0, 0.0, 0.0],
            "dropoff_y" => [5280.0f64, 5280.0, 52800.0, 0.0],
            "pickup_datetime" => [
                datetime(1, 8, 0),
                datetime(1, 8, 2),
                datetime(1, 9, 0),
                datetime(1, 23, 0),
            ],
            "dropoff_datetime" => [
                datetime(1, 8, 20),
                datetime(1, 8, 22),
                datetime(1, 9, 30),
                datetime(1, 23, 30),
            ],
            "passenger_count" => [3u32, 3, 3, 1],
            "cluster_label" => [0i32, 0, -1, -1],
        ]
        .unwrap()
    }

    #[test]
    fn frac_clus_counts_passengers_not_trips() {
        let stats = cluster_stats(&labeled_trips()).unwrap();
        // 6 of 10 passengers are clustered even though 2 of 4 trips are
        assert_eq!(stats.frac_clus, 0.6);
    }

    #[test]
    fn clus_size_is_the_pooled_passenger_count() {
        let stats = cluster_stats(&labeled_trips()).unwrap();
        let sizes: Vec<u32> = stats
            .per_cluster
            .column("clus_size")
            .unwrap()
            .u32()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(sizes, vec![6]);
    }

    #[test]
    fn coincident_pickups_have_zero_dispersion() {
        let stats = cluster_stats(&labeled_trips()).unwrap();
        let rmsd = stats
            .per_cluster
            .column("rmsd_xy0")
            .unwrap()
            .f64()
            .unwrap()
            .get(0)
            .unwrap();
        assert_eq!(rmsd, 0.0);
    }

    #[test]
    fn timing_std_is_in_minutes() {
        let stats = cluster_stats(&labeled_trips()).unwrap();
        let std_t0 = stats
            .per_cluster
            .column("std_t0")
            .unwrap()
            .f64()
            .unwrap()
            .get(0)
            .unwrap();
        // three copies at 08:00 and three at 08:02: sample std = sqrt(6/5)
        assert!((std_t0 - (6.0f64 / 5.0).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn all_unclustered_table_yields_empty_stats() {
        let trips = labeled_trips()
            .lazy()
            .with_column(lit(-1i32).alias("cluster_label"))
            .collect()
            .unwrap();

        let stats = cluster_stats(&trips).unwrap();
        assert_eq!(stats.frac_clus, 0.0);
        assert_eq!(stats.per_cluster.height(), 0);
    }

    #[test]
    fn spread_pickups_report_their_rms_distance() {
        // two single-passenger trips two miles apart in x, same cluster
        let trips = df![
            "trip_id" => [0u32, 1],
            "pickup_x" => [0.0f64, 10560.0],
            "pickup_y" => [0.0f64, 0.0],
            "dropoff_x" => [0.0f64, 0.0],
            "dropoff_y" => [0.0f64, 0.0],
            "pickup_datetime" => [datetime(1, 8, 0), datetime(1, 8, 0)],
            "dropoff_datetime" => [datetime(1, 8, 30), datetime(1, 8, 30)],
            "passenger_count" => [1u32, 1],
            "cluster_label" => [0i32, 0],
        ]
        .unwrap();

        let stats = cluster_stats(&trips).unwrap();
        let rmsd = stats
            .per_cluster
            .column("rmsd_xy0")
            .unwrap()
            .f64()
            .unwrap()
            .get(0)
            .unwrap();
        // centroid sits one mile from each pickup
        assert!((rmsd - 1.0).abs() < 1e-12);
    }
}
