//! Defines the decision tree classifier.

/// Splitting criteria.
pub mod criterion;
/// Defines the estimator.
pub mod classifier;
/// Defines the builder of the estimator.
pub mod builder;
/// Defines the fitted tree.
pub mod dtree;
/// Defines the nodes of a fitted tree.
pub mod node;
/// Defines the rule that routes a row at a branch.
pub mod split_rule;

mod split;


pub use criterion::{Criterion, CustomCriterion, gini_impurity, entropy};
pub use classifier::DecisionTreeClassifier;
pub use builder::DecisionTreeBuilder;
pub use dtree::DecisionTree;
pub use node::Node;
pub use split_rule::{Splitter, LeftRight};
