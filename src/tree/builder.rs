use crate::{Error, Result};
use super::criterion::Criterion;
use super::classifier::DecisionTreeClassifier;


/// A struct that builds [`DecisionTreeClassifier`].
/// `DecisionTreeBuilder` keeps parameters for constructing
/// the classifier and validates them in [`DecisionTreeBuilder::build`].
///
/// # Example
///
/// ```no_run
/// use minilearn::prelude::*;
///
/// let model = DecisionTreeBuilder::new()
///     .max_depth(3)
///     .criterion(Criterion::Entropy)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct DecisionTreeBuilder {
    criterion: Criterion,
    max_depth: Option<usize>,
}


impl DecisionTreeBuilder {
    /// Construct a new instance of [`DecisionTreeBuilder`].
    /// By default, the parameters are
    /// ```text
    /// criterion: Criterion::Gini,
    /// max_depth: None,
    /// ```
    pub fn new() -> Self {
        Self::default()
    }


    /// Set the node splitting rule.
    /// See [`Criterion`] for the available rules.
    #[inline]
    pub fn criterion(mut self, criterion: Criterion) -> Self {
        self.criterion = criterion;
        self
    }


    /// Use `cost` as the node splitting rule.
    pub fn custom_criterion<S, F>(mut self, name: S, cost: F) -> Self
        where S: ToString,
              F: Fn(&[i64], &[i64]) -> f64 + Send + Sync + 'static,
    {
        self.criterion = Criterion::custom(name, cost);
        self
    }


    /// Specify the maximal depth of the tree.
    /// The root counts as depth `1`.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }


    /// Grow the tree until every leaf is pure. This is the default.
    pub fn unlimited_depth(mut self) -> Self {
        self.max_depth = None;
        self
    }


    /// Build an unfitted [`DecisionTreeClassifier`].
    /// This method consumes `self`.
    pub fn build(self) -> Result<DecisionTreeClassifier> {
        if self.max_depth == Some(0) {
            return Err(Error::InvalidMaxDepth { max_depth: 0 });
        }

        let model = DecisionTreeClassifier::from_parameters(
            self.criterion, self.max_depth
        );
        Ok(model)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_with_parameters() {
        let model = DecisionTreeBuilder::new()
            .criterion(Criterion::Entropy)
            .max_depth(4)
            .build()
            .unwrap();
        assert_eq!(model.criterion(), &Criterion::Entropy);
        assert_eq!(model.max_depth(), Some(4));
        assert!(!model.is_fitted());

        let model = DecisionTreeBuilder::new()
            .max_depth(4)
            .unlimited_depth()
            .build()
            .unwrap();
        assert_eq!(model.max_depth(), None);
        assert_eq!(model.criterion(), &Criterion::Gini);
    }


    #[test]
    fn zero_depth_fails_at_build() {
        let result = DecisionTreeBuilder::new().max_depth(0).build();
        assert!(matches!(result, Err(Error::InvalidMaxDepth { .. })));
    }
}
