//! Defines the traits shared by every estimator in this crate.
//!
//! An estimator is trained on a feature table (`polars::DataFrame`)
//! and a target column (`polars::Series`),
//! then predicts a target column for new feature tables
//! that carry the same columns in the same order.
use polars::prelude::*;

use crate::Result;


/// A trait that defines the common interface of the estimators.
pub trait Model {
    /// Trains the estimator on `data` and `target`.
    /// Refitting replaces the previous fit.
    fn fit(&mut self, data: &DataFrame, target: &Series) -> Result<()>;


    /// Predicts the target for every row of `data`.
    /// The returned series is named after the target seen at fit time.
    fn predict(&self, data: &DataFrame) -> Result<Series>;


    /// Returns `true` if the estimator predicts class labels.
    fn is_classifier(&self) -> bool;


    /// Returns `true` if the estimator predicts real values.
    fn is_regressor(&self) -> bool {
        !self.is_classifier()
    }
}


/// A classifier that can also report class probabilities.
pub trait ProbabilisticClassifier: Model {
    /// Returns one `f64` column per class, named `<target>_<class>`,
    /// holding the probability of that class for every row of `data`.
    fn predict_proba(&self, data: &DataFrame) -> Result<DataFrame>;
}
