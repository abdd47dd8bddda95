//! Exports the estimators and traits.
//!
pub use crate::model::{
    // Estimator traits
    Model,
    ProbabilisticClassifier,
};


pub use crate::tree::{
    // Decision tree ----------------------------
    DecisionTreeClassifier,
    DecisionTreeBuilder,
    DecisionTree,
    Criterion,
};


pub use crate::dummy::{
    // Baselines --------------------------------
    DummyClassifier,
    DummyRegressor,
    ClassifierStrategy,
    RegressorStrategy,
};


pub use crate::linear::{
    LogisticRegression,
    Penalty,
};


pub use crate::preprocessing::{
    Encoder,
    OneHotEncoder,
};


pub use crate::sample::Sample;
