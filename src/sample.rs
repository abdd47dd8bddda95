//! Struct `Sample` holds the feature table and the label column
//! an estimator is trained on.
//!
//! A `Sample` is built once from a `polars::DataFrame` and
//! a `polars::Series`.
//! Column dtypes are resolved at that point:
//! every feature becomes a dense `f64` column
//! and the target becomes a column of integer class codes.

// Provides feature struct.
pub(crate) mod feature_struct;
// Provides target struct and helpers over label slices.
pub(crate) mod target;
// Provides sample struct.
pub(crate) mod sample_struct;


pub use feature_struct::Feature;
pub use target::{
    Target,
    is_homogeneous,
    count_equal,
    value_counts,
    majority,
};
pub use sample_struct::Sample;

use polars::prelude::*;

use crate::Result;


/// Returns `true` if a column of dtype `dtype` can be used as a feature.
/// Booleans count as numeric (`false = 0`, `true = 1`).
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Boolean
            | DataType::UInt8 | DataType::UInt16
            | DataType::UInt32 | DataType::UInt64
            | DataType::Int8 | DataType::Int16
            | DataType::Int32 | DataType::Int64
            | DataType::Float32 | DataType::Float64
    )
}


/// Returns `true` if a column of dtype `dtype` holds class codes.
pub fn is_integer_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Boolean
            | DataType::UInt8 | DataType::UInt16
            | DataType::UInt32 | DataType::UInt64
            | DataType::Int8 | DataType::Int16
            | DataType::Int32 | DataType::Int64
    )
}


/// Converts every column of `data` into a [`Feature`].
pub(crate) fn dense_features(data: &DataFrame) -> Result<Vec<Feature>> {
    data.get_columns()
        .iter()
        .map(Feature::from_series)
        .collect()
}


/// Returns the rows of `data` in row-major order.
pub(crate) fn dense_rows(data: &DataFrame) -> Result<Vec<Vec<f64>>> {
    let features = dense_features(data)?;
    let n_sample = data.height();

    let rows = (0..n_sample).map(|i| {
            features.iter()
                .map(|feature| feature[i])
                .collect::<Vec<_>>()
        })
        .collect();
    Ok(rows)
}
