#![warn(missing_docs)]

//!
//! A crate that provides tabular estimators on top of `polars`.
//!
//! The centre of the crate is a CART-style decision tree classifier.
//! The tree is grown greedily:
//! every node scans each feature in sorted order
//! and takes the binary split minimizing the weighted impurity.
//!
//! - Decision tree
//!     [`DecisionTreeClassifier`] is configured directly
//!     or through [`DecisionTreeBuilder`],
//!     splits by Gini impurity, entropy or a user-supplied cost,
//!     and renders the fitted tree as text, Graphviz or JSON.
//!
//!
//! - Baselines and companions
//!     [`DummyClassifier`] and [`DummyRegressor`] ignore the features.
//!     [`LogisticRegression`] is a binary linear classifier.
//!     [`OneHotEncoder`] turns categorical columns into indicator columns.
//!
//! Every estimator implements [`Model`]:
//! it is fitted on a `polars::DataFrame` and a target `polars::Series`
//! and predicts a `polars::Series` named after the target.
//!
//! ```no_run
//! use minilearn::prelude::*;
//! use polars::prelude::*;
//!
//! let data = DataFrame::new(vec![
//!     Series::new("x1", &[0.12, 0.66, 0.45, 0.46]),
//!     Series::new("x2", &[0.25, 0.88, 0.18, 0.60]),
//! ]).unwrap();
//! let target = Series::new("class", &[1_i64, 0, 1, 1]);
//!
//! let mut model = DecisionTreeBuilder::new()
//!     .criterion(Criterion::Entropy)
//!     .build()
//!     .unwrap();
//! model.fit(&data, &target).unwrap();
//! println!("{model}");
//! ```

pub mod error;
pub mod model;
pub mod sample;
pub mod tree;
pub mod dummy;
pub mod linear;
pub mod preprocessing;
pub mod prelude;

mod common;


pub use error::{Error, Result};
pub use model::{Model, ProbabilisticClassifier};
pub use sample::{Sample, Feature, Target};

pub use tree::{
    Criterion,
    CustomCriterion,
    DecisionTree,
    DecisionTreeBuilder,
    DecisionTreeClassifier,
};

pub use dummy::{
    DummyClassifier,
    DummyRegressor,
    ClassifierStrategy,
    RegressorStrategy,
};

pub use linear::{LogisticRegression, Penalty};
pub use preprocessing::{Encoder, OneHotEncoder};
