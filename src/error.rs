//! Errors returned by this crate.
use polars::prelude::PolarsError;

/// Errors returned by the estimators and the sample layer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when a criterion name is not one of the known criteria.
    #[error("criterion must be one of [\"gini\", \"entropy\"], got {name:?}")]
    InvalidCriterion {
        /// The rejected name.
        name: String,
    },

    /// Returned when `max_depth` is `Some(0)`.
    #[error("max_depth must be at least 1 or unlimited, got {max_depth}")]
    InvalidMaxDepth {
        /// The rejected depth.
        max_depth: usize,
    },

    /// Returned when a parameter is changed on a fitted estimator.
    #[error("cannot set {parameter} after fit")]
    AlreadyFitted {
        /// Name of the parameter the caller tried to change.
        parameter: &'static str,
    },

    /// Returned by `predict`-like methods before `fit`.
    #[error("the model must be fitted before use")]
    NotFitted,

    /// Returned when the feature table and the target differ in length.
    #[error("number of samples {n_sample} and number of targets {n_target} must be equal")]
    ShapeMismatch {
        /// Rows in the feature table.
        n_sample: usize,
        /// Length of the target.
        n_target: usize,
    },

    /// Returned when the training table has no rows.
    #[error("training data has zero samples")]
    EmptySample,

    /// Returned when the training table has no columns.
    #[error("training data has zero feature columns")]
    ZeroFeatures,

    /// Returned when a feature column is not numeric.
    #[error("cannot fit with non-numeric column {name:?} of dtype {dtype}")]
    NonNumericFeature {
        /// Column name.
        name: String,
        /// Display form of the column dtype.
        dtype: String,
    },

    /// Returned when a column contains a null.
    #[error("column {name:?} contains null values")]
    NullValue {
        /// Column name.
        name: String,
    },

    /// Returned when a feature value is NaN or infinite.
    #[error("non-finite value in column {name:?} at row {row}")]
    NonFiniteValue {
        /// Column name.
        name: String,
        /// Zero-based row of the offending value.
        row: usize,
    },

    /// Returned when the target cannot be used by the estimator.
    #[error("invalid target {name:?}: {reason}")]
    InvalidTarget {
        /// Target name.
        name: String,
        /// Why the target was rejected.
        reason: String,
    },

    /// Returned when a column is looked up by a name that does not exist.
    #[error("column {name:?} not found")]
    FeatureNotFound {
        /// The missing name.
        name: String,
    },

    /// Returned when the prediction input does not match the fitted columns.
    #[error("columns {got:?} do not match the fitted columns {expected:?}")]
    FeatureMismatch {
        /// Column names seen at fit time.
        expected: Vec<String>,
        /// Column names of the prediction input.
        got: Vec<String>,
    },

    /// Returned when a branch refers to a feature the row does not have.
    #[error("malformed tree: branch splits on axis {axis}, but the row has {n_feature} features")]
    MalformedTree {
        /// Axis of the offending branch.
        axis: usize,
        /// Length of the row being traversed.
        n_feature: usize,
    },

    /// Returned when an encoder would emit two columns with the same name.
    #[error("encoded column {name:?} is produced twice")]
    DuplicateColumn {
        /// The repeated output name.
        name: String,
    },

    /// Returned when a split criterion is evaluated on an empty side.
    #[error("split criterion evaluated on an empty partition")]
    EmptyPartition,

    /// Returned when a split criterion produced NaN.
    #[error("split criterion returned a non-comparable score {score}")]
    InvalidScore {
        /// The offending score.
        score: f64,
    },

    /// Returned when a strategy name is unknown.
    #[error("strategy must be one of {expected:?}, got {name:?}")]
    InvalidStrategy {
        /// The rejected name.
        name: String,
        /// Accepted names.
        expected: &'static [&'static str],
    },

    /// Returned when a quantile is outside of `[0, 1]`.
    #[error("quantile must be in [0, 1], got {quantile}")]
    InvalidQuantile {
        /// The rejected quantile.
        quantile: f64,
    },

    /// Returned when a numeric hyper-parameter is out of range.
    #[error("invalid value {value} for {name}: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The rejected value.
        value: f64,
        /// Accepted range.
        reason: &'static str,
    },

    /// Errors raised by polars.
    #[error(transparent)]
    Polars(#[from] PolarsError),

    /// Errors raised while (de)serialising a tree.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Errors raised while writing files.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
