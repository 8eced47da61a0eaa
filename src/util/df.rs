use polars::prelude::*;

/// Repeat each trip row `passenger_count` times, producing one row per
/// requested seat. Clustering and statistics both work on this expansion so
/// that van capacity is expressed in passengers rather than trips; the
/// expanded frame is never written back to the trip table.
pub fn expand_by_passengers(trips: &DataFrame) -> PolarsResult<DataFrame> {
    let counts = trips.column("passenger_count")?.u32()?;

    let mut indices: Vec<IdxSize> = Vec::with_capacity(trips.height());
    for (row, count) in counts.into_iter().enumerate() {
        for _ in 0..count.unwrap_or(0) {
            indices.push(row as IdxSize);
        }
    }

    trips.take(&IdxCa::from_vec("idx".into(), indices))
}
