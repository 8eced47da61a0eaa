use hashbrown::HashMap;
use itertools::Itertools;
use polars::prelude::*;

/// Renumber surviving cluster labels to a dense zero-based sequence ordered
/// by ascending original value. Noise rows stay -1, so downstream joins and
/// reports always see labels in 0..k with no gaps. Running this on an
/// already-dense labeling is a no-op.
pub fn relabel_clusters(mut trips: DataFrame) -> PolarsResult<DataFrame> {
    let labels = trips.column("cluster_label")?.i32()?;

    let dense: HashMap<i32, i32> = labels
        .into_iter()
        .flatten()
        .filter(|&label| label > -1)
        .unique()
        .sorted()
        .enumerate()
        .map(|(new, old)| (old, new as i32))
        .collect();

    let relabeled: Vec<i32> = labels
        .into_iter()
        .map(|label| {
            label
                .and_then(|label| dense.get(&label).copied())
                .unwrap_or(-1)
        })
        .collect();

    trips.replace(
        "cluster_label",
        Int32Chunked::from_vec("cluster_label".into(), relabeled).into_series(),
    )?;
    Ok(trips)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(trips: DataFrame) -> Vec<i32> {
        relabel_clusters(trips)
            .unwrap()
            .column("cluster_label")
            .unwrap()
            .i32()
            .unwrap()
            .into_no_null_iter()
            .collect()
    }

    #[test]
    fn gaps_are_closed_in_ascending_label_order() {
        let trips = df![
            "cluster_label" => [-1i32, 7, 3, 7, 12],
        ]
        .unwrap();

        assert_eq!(labels(trips), vec![-1, 1, 0, 1, 2]);
    }

    #[test]
    fn dense_labeling_is_a_fixed_point() {
        let trips = df![
            "cluster_label" => [0i32, 1, -1, 2, 1],
        ]
        .unwrap();

        let once = relabel_clusters(trips).unwrap();
        let twice = relabel_clusters(once.clone()).unwrap();
        assert!(once.equals(&twice));
        assert_eq!(labels(twice), vec![0, 1, -1, 2, 1]);
    }

    #[test]
    fn all_noise_table_is_untouched() {
        let trips = df![
            "cluster_label" => [-1i32, -1],
        ]
        .unwrap();

        assert_eq!(labels(trips), vec![-1, -1]);
    }
}
