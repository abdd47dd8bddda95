use polars::prelude::*;
use tracing::{info, instrument};

use crate::{Error, Result};
use crate::model::Model;
use crate::common::checker;
use crate::sample::{Sample, dense_rows};
use super::criterion::Criterion;
use super::dtree::DecisionTree;

use std::fmt;


/// A decision tree classifier over integer class codes.
///
/// The tree is grown greedily: every node takes the split that
/// minimizes the weighted impurity given by the [`Criterion`].
/// A row goes to the left child iff `x[axis] < threshold`.
///
/// Default parameters:
/// ```text
/// criterion: Criterion::Gini,
/// max_depth: None (grow until every leaf is pure),
/// ```
///
/// Parameters are frozen once the model is fitted;
/// the setters then return [`Error::AlreadyFitted`].
///
/// # Example
/// ```no_run
/// use minilearn::prelude::*;
/// use polars::prelude::*;
///
/// let data = DataFrame::new(vec![
///     Series::new("x1", &[0.1, 0.9, 0.4, 0.7]),
///     Series::new("x2", &[0.5, 0.2, 0.8, 0.1]),
/// ]).unwrap();
/// let target = Series::new("class", &[0_i64, 1, 0, 1]);
///
/// let mut model = DecisionTreeClassifier::new();
/// model.set_criterion(Criterion::Entropy).unwrap();
/// model.fit(&data, &target).unwrap();
///
/// let predictions = model.predict(&data).unwrap();
/// println!("{model}");
/// ```
#[derive(Debug, Clone, Default)]
pub struct DecisionTreeClassifier {
    criterion: Criterion,
    max_depth: Option<usize>,
    tree: Option<DecisionTree>,
}


impl DecisionTreeClassifier {
    /// Construct an unfitted classifier with the default parameters.
    pub fn new() -> Self {
        Self::default()
    }


    pub(crate) fn from_parameters(
        criterion: Criterion,
        max_depth: Option<usize>,
    ) -> Self
    {
        Self { criterion, max_depth, tree: None, }
    }


    #[inline(always)]
    fn check_unfitted(&self, parameter: &'static str) -> Result<()> {
        if self.is_fitted() {
            return Err(Error::AlreadyFitted { parameter });
        }
        Ok(())
    }


    /// Set the node splitting rule.
    pub fn set_criterion(&mut self, criterion: Criterion) -> Result<()> {
        self.check_unfitted("criterion")?;
        self.criterion = criterion;
        Ok(())
    }


    /// Set the node splitting rule by name, `"gini"` or `"entropy"`.
    pub fn set_criterion_by_name(&mut self, name: &str) -> Result<()> {
        self.check_unfitted("criterion")?;
        self.criterion = name.parse()?;
        Ok(())
    }


    /// Use `cost` as the node splitting rule.
    /// `cost` receives the labels of both sides of a candidate split
    /// and returns a cost; the smallest cost wins.
    pub fn set_custom_criterion<S, F>(&mut self, name: S, cost: F)
        -> Result<()>
        where S: ToString,
              F: Fn(&[i64], &[i64]) -> f64 + Send + Sync + 'static,
    {
        self.check_unfitted("criterion")?;
        self.criterion = Criterion::custom(name, cost);
        Ok(())
    }


    /// Specify the maximal depth of the tree.
    /// The root counts as depth `1`; `None` grows the tree
    /// until the leaves are pure or cannot be split.
    pub fn set_max_depth(&mut self, max_depth: Option<usize>) -> Result<()> {
        self.check_unfitted("max_depth")?;
        if max_depth == Some(0) {
            return Err(Error::InvalidMaxDepth { max_depth: 0 });
        }
        self.max_depth = max_depth;
        Ok(())
    }


    /// Returns the node splitting rule.
    pub fn criterion(&self) -> &Criterion {
        &self.criterion
    }


    /// Returns the maximal depth.
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }


    /// Returns the fitted tree, if any.
    pub fn tree(&self) -> Option<&DecisionTree> {
        self.tree.as_ref()
    }


    /// Returns `true` once `fit` has succeeded.
    pub fn is_fitted(&self) -> bool {
        self.tree.is_some()
    }


    fn fitted_tree(&self) -> Result<&DecisionTree> {
        self.tree.as_ref().ok_or(Error::NotFitted)
    }
}


impl Model for DecisionTreeClassifier {
    #[instrument(
        skip_all,
        fields(criterion = %self.criterion, max_depth = ?self.max_depth)
    )]
    fn fit(&mut self, data: &DataFrame, target: &Series) -> Result<()> {
        let sample = Sample::from_dataframe(data, target)?;
        let (n_sample, n_feature) = sample.shape();

        let tree = DecisionTree::fit(&sample, &self.criterion, self.max_depth)?;

        info!(
            n_sample,
            n_feature,
            n_leaves = tree.n_leaves(),
            depth = tree.depth(),
            "fitted decision tree"
        );

        self.tree = Some(tree);
        Ok(())
    }


    fn predict(&self, data: &DataFrame) -> Result<Series> {
        let tree = self.fitted_tree()?;
        checker::check_feature_names(tree.feature_names(), data)?;

        let rows = dense_rows(data)?;
        let predictions = tree.predict_rows(&rows)?;

        Ok(Series::new(tree.target_name(), predictions))
    }


    fn is_classifier(&self) -> bool {
        true
    }
}


impl fmt::Display for DecisionTreeClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tree {
            Some(tree) => write!(f, "{tree}"),
            None => write!(f, "Empty Decision Tree"),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn toy() -> (DataFrame, Series) {
        let data = DataFrame::new(vec![
            Series::new("x", &[0.1, 0.9, 0.4, 0.7]),
        ]).unwrap();
        let target = Series::new("y", &[0_i64, 1, 0, 1]);
        (data, target)
    }


    #[test]
    fn unfitted_model() {
        let model = DecisionTreeClassifier::new();
        assert!(!model.is_fitted());
        assert_eq!(model.to_string(), "Empty Decision Tree");

        let (data, _) = toy();
        assert!(matches!(model.predict(&data), Err(Error::NotFitted)));
    }


    #[test]
    fn parameters_freeze_after_fit() {
        let (data, target) = toy();
        let mut model = DecisionTreeClassifier::new();
        model.set_criterion_by_name("entropy").unwrap();
        model.set_max_depth(Some(3)).unwrap();
        model.fit(&data, &target).unwrap();

        assert!(matches!(
            model.set_max_depth(None),
            Err(Error::AlreadyFitted { parameter: "max_depth" })
        ));
        assert!(matches!(
            model.set_criterion(Criterion::Gini),
            Err(Error::AlreadyFitted { parameter: "criterion" })
        ));
        assert_eq!(model.criterion(), &Criterion::Entropy);
        assert_eq!(model.max_depth(), Some(3));
    }


    #[test]
    fn zero_depth_is_rejected() {
        let mut model = DecisionTreeClassifier::new();
        assert!(matches!(
            model.set_max_depth(Some(0)),
            Err(Error::InvalidMaxDepth { max_depth: 0 })
        ));
        assert!(matches!(
            model.set_criterion_by_name("mse"),
            Err(Error::InvalidCriterion { .. })
        ));
    }


    #[test]
    fn predictions_carry_the_target_name() {
        let (data, target) = toy();
        let mut model = DecisionTreeClassifier::new();
        model.fit(&data, &target).unwrap();

        let predicted = model.predict(&data).unwrap();
        assert_eq!(predicted.name(), "y");
        let predicted = predicted.i64().unwrap()
            .into_no_null_iter()
            .collect::<Vec<_>>();
        assert_eq!(predicted, vec![0, 1, 0, 1]);
        assert!(model.is_classifier());
        assert!(!model.is_regressor());
    }
}
