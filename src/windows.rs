use polars::prelude::*;

const MS_PER_HOUR: f64 = 3_600_000.0;
const MS_PER_DAY: i64 = 86_400_000;

/// Assign each trip to a day-granularity window offset by `start_time` hours,
/// so that e.g. a 06:00 start groups late-night trips with the previous
/// service day.
///
/// The day value is floored before the table-wide minimum is subtracted, so a
/// trip before the first full window still resolves to bin 0 rather than a
/// negative index. Bins come out as consecutive non-negative integers in a
/// `datetime_bin` column.
pub fn assign_windows(trips: LazyFrame, start_time: f64) -> LazyFrame {
    let offset_ms = (start_time * MS_PER_HOUR) as i64;
    trips
        .with_column(
            (col("pickup_datetime").dt().timestamp(TimeUnit::Milliseconds) - lit(offset_ms))
                .floor_div(lit(MS_PER_DAY))
                .alias("datetime_bin"),
        )
        .with_column((col("datetime_bin") - col("datetime_bin").min()).alias("datetime_bin"))
}
