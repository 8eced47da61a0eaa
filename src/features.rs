use ndarray::Array2;
use polars::prelude::*;

/// The trip table carries planar coordinates in feet; features and statistics
/// work in miles.
pub(crate) const FEET_PER_MILE: f64 = 5280.0;
const MS_PER_MINUTE: f64 = 60_000.0;

/// Build the joint spatiotemporal feature matrix for one window's
/// (passenger-expanded) rows.
///
/// Five columns: pickup x/y and dropoff x/y in miles, plus pickup time as
/// minutes since the window's earliest pickup divided by `time_scale`. That
/// division is the single knob trading spatial against temporal proximity
/// under the Euclidean metric. Dropoff time is excluded on purpose: only
/// pickup alignment matters for van boarding.
pub fn build_features(window: &DataFrame, time_scale: f64) -> PolarsResult<Array2<f64>> {
    let pickup_ms = col("pickup_datetime").dt().timestamp(TimeUnit::Milliseconds);
    window
        .clone()
        .lazy()
        .select([
            (col("pickup_x") / lit(FEET_PER_MILE)).alias("x0"),
            (col("pickup_y") / lit(FEET_PER_MILE)).alias("y0"),
            (col("dropoff_x") / lit(FEET_PER_MILE)).alias("x1"),
            (col("dropoff_y") / lit(FEET_PER_MILE)).alias("y1"),
            ((pickup_ms.clone() - pickup_ms.min()).cast(DataType::Float64)
                / lit(MS_PER_MINUTE * time_scale))
            .alias("t"),
        ])
        .collect()?
        .to_ndarray::<Float64Type>(IndexOrder::default())
}
