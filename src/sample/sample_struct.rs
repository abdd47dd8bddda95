use std::collections::HashMap;
use std::ops::Index;

use polars::prelude::*;
use rayon::prelude::*;

use crate::{Error, Result};
use crate::common::checker;
use super::feature_struct::*;
use super::target::*;


/// Struct `Sample` holds a feature table together with its label column.
/// Row `i` of every feature corresponds to label `i` of the target;
/// the copying operations below always move both together.
#[derive(Debug, Clone)]
pub struct Sample {
    pub(super) name_to_index: HashMap<String, usize>,
    pub(super) features: Vec<Feature>,
    pub(super) target: Target,
    pub(super) n_sample: usize,
    pub(super) n_feature: usize,
}


impl Sample {
    /// Convert `polars::DataFrame` and `polars::Series` into `Sample`.
    ///
    /// Fails if `data` has no columns or no rows,
    /// if the row counts differ,
    /// if a feature is not numeric, null-free and finite,
    /// or if the target is not a null-free integer column.
    pub fn from_dataframe(data: &DataFrame, target: &Series)
        -> Result<Self>
    {
        checker::check_shape(data, target)?;

        let (n_sample, n_feature) = data.shape();
        let features = data.get_columns()
            .par_iter()
            .map(Feature::from_series)
            .collect::<Result<Vec<_>>>()?;
        let target = Target::from_series(target)?;

        Ok(Self::from_parts(features, target, n_sample, n_feature))
    }


    fn from_parts(
        features: Vec<Feature>,
        target: Target,
        n_sample: usize,
        n_feature: usize,
    ) -> Self
    {
        let name_to_index = features.iter()
            .enumerate()
            .map(|(i, f)| (f.name().to_string(), i))
            .collect::<HashMap<_, _>>();

        Self { name_to_index, features, target, n_sample, n_feature, }
    }


    /// Returns the pair of the number of examples and
    /// the number of features
    pub fn shape(&self) -> (usize, usize) {
        (self.n_sample, self.n_feature)
    }


    /// Returns a slice of type `Feature`.
    pub fn features(&self) -> &[Feature] {
        &self.features[..]
    }


    /// Returns the feature named `name`.
    pub fn feature(&self, name: &str) -> Result<&Feature> {
        self.name_to_index.get(name)
            .map(|&k| &self.features[k])
            .ok_or_else(|| Error::FeatureNotFound { name: name.to_string() })
    }


    /// Returns the feature names in column order.
    pub fn feature_names(&self) -> Vec<String> {
        self.features.iter()
            .map(|feature| feature.name().to_string())
            .collect()
    }


    /// Returns the target column.
    pub fn target(&self) -> &Target {
        &self.target
    }


    /// Returns the value of feature `col` at row `row`.
    pub fn value_at(&self, row: usize, col: usize) -> f64 {
        self.features[col][row]
    }


    /// Returns the feature vector of the `idx`-th example.
    pub fn row(&self, idx: usize) -> Vec<f64> {
        self.features.iter()
            .map(|feat| feat[idx])
            .collect()
    }


    /// Returns a copy of this sample with the rows permuted:
    /// row `k` of the result is row `permutation[k]` of `self`.
    /// Features and target are permuted together.
    ///
    /// # Panics
    /// Panics if `permutation` refers to a row out of range.
    pub fn reordered_by(&self, permutation: &[usize]) -> Self {
        let features = self.features.iter()
            .map(|feature| feature.reordered_by(permutation))
            .collect();
        let target = self.target.reordered_by(permutation);

        Self::from_parts(features, target, permutation.len(), self.n_feature)
    }


    /// Returns a copy of the rows `from..to`.
    ///
    /// # Panics
    /// Panics if `from > to` or `to > n_sample`.
    pub fn slice_rows(&self, from: usize, to: usize) -> Self {
        let features = self.features.iter()
            .map(|feature| feature.slice(from, to))
            .collect();
        let target = self.target.slice(from, to);

        Self::from_parts(features, target, to - from, self.n_feature)
    }
}


impl<S> Index<S> for Sample
    where S: AsRef<str>
{
    type Output = Feature;


    fn index(&self, name: S) -> &Self::Output {
        let name: &str = name.as_ref();
        let k = *self.name_to_index.get(name)
            .unwrap_or_else(|| panic!("The feature named `{name}` does not exist"));
        &self.features[k]
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn toy() -> Sample {
        let x = Series::new("x", &[3.0, 1.0, 2.0, 0.5]);
        let z = Series::new("z", &[10_i64, 20, 30, 40]);
        let y = Series::new("y", &[1_i64, 0, 1, 0]);
        let data = DataFrame::new(vec![x, z]).unwrap();
        Sample::from_dataframe(&data, &y).unwrap()
    }


    #[test]
    fn reorder_keeps_rows_in_lockstep() {
        let sample = toy();
        let order = sample["x"].sorted_indices();
        let sorted = sample.reordered_by(&order);

        assert_eq!(sorted["x"].values(), &[0.5, 1.0, 2.0, 3.0]);
        assert_eq!(sorted["z"].values(), &[40.0, 20.0, 30.0, 10.0]);
        assert_eq!(sorted.target().labels(), &[0, 0, 1, 1]);

        let again = sorted["x"].sorted_indices();
        assert_eq!(sorted.reordered_by(&again).row(2), sorted.row(2));
    }


    #[test]
    fn slice_rows_is_half_open() {
        let sample = toy().slice_rows(1, 3);
        assert_eq!(sample.shape(), (2, 2));
        assert_eq!(sample.row(0), vec![1.0, 20.0]);
        assert_eq!(sample.target().labels(), &[0, 1]);
    }


    #[test]
    fn lookup_by_name() {
        let sample = toy();
        assert_eq!(sample.feature("z").unwrap().name(), "z");
        assert_eq!(sample.value_at(2, 1), 30.0);
        assert!(matches!(
            sample.feature("w"),
            Err(Error::FeatureNotFound { .. })
        ));
    }


    #[test]
    fn shape_mismatch_is_rejected() {
        let x = Series::new("x", &[1.0, 2.0, 3.0]);
        let y = Series::new("y", &[1_i64, 0]);
        let data = DataFrame::new(vec![x]).unwrap();

        assert!(matches!(
            Sample::from_dataframe(&data, &y),
            Err(Error::ShapeMismatch { n_sample: 3, n_target: 2 })
        ));
    }
}
