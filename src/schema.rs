use std::fmt;
use std::fmt::Display;

use polars::prelude::*;

/// Columns every trip table must carry before entering the pipeline.
/// Coordinates are planar (feet), `trip_id` is a caller-assigned stable
/// identifier and must be unique.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "trip_id",
    "pickup_x",
    "pickup_y",
    "dropoff_x",
    "dropoff_y",
    "pickup_datetime",
    "dropoff_datetime",
    "passenger_count",
];

#[derive(thiserror::Error, Debug)]
pub enum SchemaError {
    MissingColumns(Vec<String>),
    NotDatetime(String),
    NullTripIds,
    DuplicateTripIds,
    NonPositivePassengerCount,
    Polars(#[from] PolarsError),
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SchemaError::MissingColumns(columns) => {
                write!(f, "Trip table is missing required columns: {}", columns.join(", "))
            }
            SchemaError::NotDatetime(column) => {
                write!(f, "Column {} must have a Datetime dtype", column)
            }
            SchemaError::NullTripIds => write!(f, "trip_id contains null or non-castable values"),
            SchemaError::DuplicateTripIds => write!(f, "trip_id values must be unique"),
            SchemaError::NonPositivePassengerCount => {
                write!(f, "passenger_count must be a positive integer for every trip")
            }
            SchemaError::Polars(err) => write!(f, "{}", err),
        }
    }
}

/// Check the trip table up front and normalize the dtypes the rest of the
/// pipeline relies on. All missing columns are reported at once so callers
/// can fix their table in one go.
pub fn validate(trips: DataFrame) -> Result<DataFrame, SchemaError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|&&name| trips.column(name).is_err())
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(SchemaError::MissingColumns(missing));
    }

    for name in ["pickup_datetime", "dropoff_datetime"] {
        if !matches!(trips.column(name)?.dtype(), DataType::Datetime(_, _)) {
            return Err(SchemaError::NotDatetime(name.to_string()));
        }
    }

    let trips = trips
        .lazy()
        .with_columns([
            col("trip_id").cast(DataType::UInt32),
            col("pickup_x").cast(DataType::Float64),
            col("pickup_y").cast(DataType::Float64),
            col("dropoff_x").cast(DataType::Float64),
            col("dropoff_y").cast(DataType::Float64),
            col("passenger_count").cast(DataType::UInt32),
        ])
        .collect()?;

    let trip_ids = trips.column("trip_id")?;
    if trip_ids.null_count() > 0 {
        return Err(SchemaError::NullTripIds);
    }
    if trip_ids.as_materialized_series().n_unique()? != trips.height() {
        return Err(SchemaError::DuplicateTripIds);
    }

    let passengers = trips.column("passenger_count")?.u32()?;
    if passengers.null_count() > 0 || passengers.min() == Some(0) {
        return Err(SchemaError::NonPositivePassengerCount);
    }

    Ok(trips)
}
