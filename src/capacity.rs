use polars::prelude::*;

/// Reject clusters whose pooled passenger count exceeds the van ceiling.
///
/// Runs once over the fully merged table: a cluster that looked fine inside
/// its own window can still outgrow the seat limit when trips are pooled, and
/// partial admission would need a seat-assignment decision this pipeline does
/// not make. Every member of an oversized cluster goes back to -1.
pub fn remove_superclusters(trips: LazyFrame, max_cluster_size: u32) -> LazyFrame {
    trips
        .with_column(
            col("passenger_count")
                .sum()
                .over([col("cluster_label")])
                .alias("pooled_passengers"),
        )
        .with_column(
            when(
                col("cluster_label")
                    .gt(lit(-1))
                    .and(col("pooled_passengers").gt(lit(max_cluster_size))),
            )
            .then(lit(-1i32))
            .otherwise(col("cluster_label"))
            .alias("cluster_label"),
        )
        .drop(["pooled_passengers"])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(trips: DataFrame, max_cluster_size: u32) -> Vec<i32> {
        remove_superclusters(trips.lazy(), max_cluster_size)
            .collect()
            .unwrap()
            .column("cluster_label")
            .unwrap()
            .i32()
            .unwrap()
            .into_no_null_iter()
            .collect()
    }

    #[test]
    fn oversized_cluster_is_rejected_whole() {
        let trips = df![
            "cluster_label" => [0i32, 0, 0, 1, 1, -1],
            "passenger_count" => [4u32, 4, 4, 2, 3, 9],
        ]
        .unwrap();

        // cluster 0 pools 12 passengers, cluster 1 pools 5
        assert_eq!(labels(trips, 10), vec![-1, -1, -1, 1, 1, -1]);
    }

    #[test]
    fn cluster_at_exactly_the_ceiling_survives() {
        let trips = df![
            "cluster_label" => [0i32, 0],
            "passenger_count" => [5u32, 5],
        ]
        .unwrap();

        assert_eq!(labels(trips, 10), vec![0, 0]);
    }

    #[test]
    fn noise_rows_never_count_against_a_cluster() {
        let trips = df![
            "cluster_label" => [-1i32, -1, -1],
            "passenger_count" => [50u32, 50, 50],
        ]
        .unwrap();

        assert_eq!(labels(trips, 10), vec![-1, -1, -1]);
    }
}
