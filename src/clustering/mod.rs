use std::fmt;
use std::fmt::Display;

use ndarray::ArrayView2;

pub mod dbscan;
pub use dbscan::DbscanClusterer;

/// The external density-clustering capability.
///
/// Given one window's feature matrix, return one label per row; -1 means
/// noise. Implementations must tolerate small or degenerate inputs without
/// raising, since a window with too few trips to fill a van is an expected
/// outcome.
pub trait DensityClusterer {
    fn cluster(
        &self,
        features: ArrayView2<f64>,
        min_cluster_size: usize,
    ) -> Result<Vec<i32>, ClusterError>;
}

#[derive(thiserror::Error, Debug)]
pub enum ClusterError {
    Dbscan(#[from] linfa_clustering::DbscanParamsError),
}

impl Display for ClusterError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let err: &dyn Display = match self {
            ClusterError::Dbscan(err) => err,
        };
        write!(f, "{}", err)
    }
}
