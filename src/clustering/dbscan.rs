use linfa::traits::Transformer;
use linfa_clustering::Dbscan;
use ndarray::ArrayView2;

use super::{ClusterError, DensityClusterer};

/// Default neighbourhood radius in feature units, i.e. miles in space and
/// `time_scale`-scaled minutes in time.
const DEFAULT_TOLERANCE: f64 = 0.5;

/// DBSCAN over the joint spatiotemporal feature space. `min_cluster_size`
/// maps onto the minimum number of points within `tolerance` required to
/// seed a cluster, so a cluster can only form where a whole van-load of
/// seats is requested close together.
#[derive(Debug, Clone)]
pub struct DbscanClusterer {
    pub tolerance: f64,
}

impl Default for DbscanClusterer {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl DbscanClusterer {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }
}

impl DensityClusterer for DbscanClusterer {
    fn cluster(
        &self,
        features: ArrayView2<f64>,
        min_cluster_size: usize,
    ) -> Result<Vec<i32>, ClusterError> {
        let labels = Dbscan::params(min_cluster_size)
            .tolerance(self.tolerance)
            .transform(&features)?;

        Ok(labels
            .into_iter()
            .map(|label| match label {
                Some(label) => label as i32,
                None => -1,
            })
            .collect())
    }
}
