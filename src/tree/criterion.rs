//! Splitting criteria for growing decision tree.
//!
//! A criterion maps a proposed partition `(left, right)` of the labels
//! on a node to a cost. The split search minimizes this cost.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::{Error, Result};
use crate::sample::value_counts;


/// Signature of a user-supplied split cost.
/// It receives the labels of the left and right side of a candidate split
/// (both non-empty) and returns a cost; lower is better.
pub type CriterionFn = dyn Fn(&[i64], &[i64]) -> f64 + Send + Sync;


/// A named, user-supplied split cost.
#[derive(Clone)]
pub struct CustomCriterion {
    name: String,
    cost: Arc<CriterionFn>,
}


impl CustomCriterion {
    /// Wrap the function `cost` under the name `name`.
    pub fn new<S, F>(name: S, cost: F) -> Self
        where S: ToString,
              F: Fn(&[i64], &[i64]) -> f64 + Send + Sync + 'static,
    {
        Self { name: name.to_string(), cost: Arc::new(cost), }
    }


    /// Returns the name given at construction.
    pub fn name(&self) -> &str {
        &self.name
    }
}


impl fmt::Debug for CustomCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomCriterion")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}


/// Splitting criteria for growing decision tree.
/// * `Criterion::Gini` minimizes the weighted Gini impurity.
/// * `Criterion::Entropy` minimizes the weighted entropy,
///     which maximizes the information gain.
/// * `Criterion::Custom` minimizes a user-supplied cost.
#[derive(Debug, Clone, Default)]
pub enum Criterion {
    /// Gini index.
    #[default]
    Gini,
    /// Entropy in bits.
    Entropy,
    /// User-supplied split cost.
    Custom(CustomCriterion),
}


impl Criterion {
    /// Wraps `cost` as a [`Criterion::Custom`].
    pub fn custom<S, F>(name: S, cost: F) -> Self
        where S: ToString,
              F: Fn(&[i64], &[i64]) -> f64 + Send + Sync + 'static,
    {
        Self::Custom(CustomCriterion::new(name, cost))
    }


    /// Returns the cost of splitting a node into `left` and `right`.
    ///
    /// For Gini and entropy the cost is
    /// `(|L| / n) * impurity(L) + (|R| / n) * impurity(R)`.
    /// Fails if either side is empty or the cost is NaN.
    pub fn split_cost(&self, left: &[i64], right: &[i64]) -> Result<f64> {
        if left.is_empty() || right.is_empty() {
            return Err(Error::EmptyPartition);
        }

        let score = match self {
            Self::Gini => weighted(left, right, gini_impurity),
            Self::Entropy => weighted(left, right, entropy),
            Self::Custom(custom) => (custom.cost)(left, right),
        };

        if score.is_nan() {
            return Err(Error::InvalidScore { score });
        }
        Ok(score)
    }


    /// Returns the cost of a split from the class counts of both sides,
    /// or `None` for a custom criterion, which needs the labels themselves.
    /// Agrees exactly with [`Criterion::split_cost`] on the same partition.
    pub(crate) fn split_cost_from_counts(
        &self,
        left: &ClassCounts,
        right: &ClassCounts,
    ) -> Option<Result<f64>>
    {
        let impurity: fn(&ClassCounts) -> f64 = match self {
            Self::Gini => ClassCounts::gini_impurity,
            Self::Entropy => ClassCounts::entropy,
            Self::Custom(_) => return None,
        };

        if left.total() == 0 || right.total() == 0 {
            return Some(Err(Error::EmptyPartition));
        }

        let score = weighted_by_size(
            left.total(), impurity(left), right.total(), impurity(right)
        );
        if score.is_nan() {
            return Some(Err(Error::InvalidScore { score }));
        }
        Some(Ok(score))
    }
}


impl PartialEq for Criterion {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Gini, Self::Gini) => true,
            (Self::Entropy, Self::Entropy) => true,
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(&a.cost, &b.cost),
            _ => false,
        }
    }
}


impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gini => write!(f, "gini"),
            Self::Entropy => write!(f, "entropy"),
            Self::Custom(custom) => write!(f, "custom ({})", custom.name),
        }
    }
}


impl FromStr for Criterion {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "gini" => Ok(Self::Gini),
            "entropy" => Ok(Self::Entropy),
            _ => Err(Error::InvalidCriterion { name: name.to_string() }),
        }
    }
}


#[inline(always)]
fn weighted<F>(left: &[i64], right: &[i64], impurity: F) -> f64
    where F: Fn(&[i64]) -> f64
{
    weighted_by_size(left.len(), impurity(left), right.len(), impurity(right))
}


#[inline(always)]
fn weighted_by_size(
    n_left: usize,
    left_impurity: f64,
    n_right: usize,
    right_impurity: f64,
) -> f64
{
    let n_left = n_left as f64;
    let n_right = n_right as f64;
    let n_total = n_left + n_right;

    (n_left / n_total) * left_impurity + (n_right / n_total) * right_impurity
}


/// Returns the Gini impurity `1 - Σ p_k²` of `labels`.
/// A homogeneous or empty slice has impurity `0`.
pub fn gini_impurity(labels: &[i64]) -> f64 {
    ClassCounts::from_labels(labels).gini_impurity()
}


/// Returns the entropy `-Σ p_k log2(p_k)` of `labels` in bits.
/// A homogeneous or empty slice has entropy `0`.
pub fn entropy(labels: &[i64]) -> f64 {
    ClassCounts::from_labels(labels).entropy()
}


/// Number of occurrences of each class on one side of a split,
/// kept in ascending class order.
/// Classes with zero occurrences are not stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ClassCounts {
    counts: BTreeMap<i64, usize>,
    total: usize,
}


impl ClassCounts {
    pub(crate) fn from_labels(labels: &[i64]) -> Self {
        Self { counts: value_counts(labels), total: labels.len(), }
    }


    pub(crate) fn total(&self) -> usize {
        self.total
    }


    pub(crate) fn insert(&mut self, label: i64) {
        *self.counts.entry(label).or_insert(0) += 1;
        self.total += 1;
    }


    /// Removes one occurrence of `label`, if any.
    pub(crate) fn remove(&mut self, label: i64) {
        if let Some(count) = self.counts.get_mut(&label) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(&label);
            }
            self.total -= 1;
        }
    }


    pub(crate) fn gini_impurity(&self) -> f64 {
        if self.counts.len() <= 1 { return 0f64; }

        let total = self.total as f64;
        let correct = self.counts.values()
            .map(|&c| (c as f64 / total).powi(2))
            .sum::<f64>();

        (1f64 - correct).max(0f64)
    }


    pub(crate) fn entropy(&self) -> f64 {
        if self.counts.len() <= 1 { return 0f64; }

        let total = self.total as f64;
        self.counts.values()
            .map(|&c| {
                let p = c as f64 / total;
                if p <= 0f64 { 0f64 } else { -p * p.log2() }
            })
            .sum::<f64>()
    }
}
