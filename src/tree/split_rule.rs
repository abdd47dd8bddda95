//! This file defines split rules for decision tree.
use serde::{Serialize, Deserialize};

use crate::{Error, Result};


/// The output of the function `split` of `Splitter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeftRight {
    /// The row goes to the left child.
    Left,
    /// The row goes to the right child.
    Right,
}


/// A rule `x[axis] < threshold` attached to a branch node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Splitter {
    pub(crate) axis: usize,
    pub(crate) threshold: f64,
}


impl Splitter {
    #[inline]
    pub(crate) fn new(axis: usize, threshold: f64) -> Self {
        Self { axis, threshold, }
    }


    /// Index of the feature this rule reads.
    pub fn axis(&self) -> usize {
        self.axis
    }


    /// The smallest value sent to the right child.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }


    /// Defines the splitting of a single value.
    #[inline]
    pub fn split_value(&self, value: f64) -> LeftRight {
        if value < self.threshold {
            LeftRight::Left
        } else {
            LeftRight::Right
        }
    }


    /// Defines the splitting of a feature vector.
    /// Fails if `row` has no feature at `self.axis`.
    #[inline]
    pub fn split(&self, row: &[f64]) -> Result<LeftRight> {
        let value = row.get(self.axis)
            .ok_or(Error::MalformedTree {
                axis: self.axis,
                n_feature: row.len(),
            })?;

        Ok(self.split_value(*value))
    }
}
