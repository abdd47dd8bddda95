use polars::prelude::*;

use std::collections::BTreeMap;
use std::ops::Index;

use crate::{Error, Result};
use super::is_integer_dtype;


/// A named column of integer class codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub(super) name: String,
    pub(super) labels: Vec<i64>,
}


impl Target {
    /// Construct a target named `name` from raw class codes.
    pub fn new<T: ToString>(name: T, labels: Vec<i64>) -> Self {
        Self { name: name.to_string(), labels, }
    }


    /// Convert `polars::Series` into `Target`.
    /// The series must have an integer (or boolean) dtype
    /// and contain no nulls.
    pub fn from_series(series: &Series) -> Result<Self> {
        let name = series.name().to_string();
        let dtype = series.dtype();
        if !is_integer_dtype(dtype) {
            let reason = format!(
                "dtype {dtype} is not an integer class code; \
                 encode the classes as integers first"
            );
            return Err(Error::InvalidTarget { name, reason });
        }

        let labels = series.cast(&DataType::Int64)?;
        let labels = labels.i64()?
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| Error::NullValue { name: name.clone() })?;

        Ok(Self { name, labels, })
    }


    /// Get the target name.
    pub fn name(&self) -> &str {
        &self.name
    }


    /// Returns the class codes.
    pub fn labels(&self) -> &[i64] {
        &self.labels[..]
    }


    /// Returns the number of labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }


    /// Returns `true` if there are no labels.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }


    /// Returns `true` if every label is equal.
    pub fn is_homogeneous(&self) -> bool {
        is_homogeneous(&self.labels)
    }


    /// Returns the number of labels equal to `value`.
    pub fn count_equal(&self, value: i64) -> usize {
        count_equal(&self.labels, value)
    }


    /// Returns the number of occurrences of each class,
    /// in ascending class order.
    pub fn value_counts(&self) -> BTreeMap<i64, usize> {
        value_counts(&self.labels)
    }


    /// Returns the distinct classes in ascending order.
    pub fn classes(&self) -> Vec<i64> {
        self.value_counts().into_keys().collect()
    }


    /// Returns the most frequent class.
    /// See [`majority`].
    pub fn majority(&self) -> Option<i64> {
        majority(&self.labels)
    }


    /// Returns a copy whose `k`-th label is `self[permutation[k]]`.
    ///
    /// # Panics
    /// Panics if `permutation` refers to a row out of range.
    pub fn reordered_by(&self, permutation: &[usize]) -> Self {
        let labels = permutation.iter()
            .map(|&i| self.labels[i])
            .collect();
        Self { name: self.name.clone(), labels, }
    }


    /// Returns a copy of the rows `from..to`.
    ///
    /// # Panics
    /// Panics if `from > to` or `to > self.len()`.
    pub fn slice(&self, from: usize, to: usize) -> Self {
        let labels = self.labels[from..to].to_vec();
        Self { name: self.name.clone(), labels, }
    }
}


impl Index<usize> for Target {
    type Output = i64;
    fn index(&self, idx: usize) -> &Self::Output {
        &self.labels[idx]
    }
}


/// Returns `true` if every element of `labels` is equal.
/// An empty slice is homogeneous.
pub fn is_homogeneous(labels: &[i64]) -> bool {
    match labels.split_first() {
        Some((head, tail)) => tail.iter().all(|y| y == head),
        None => true,
    }
}


/// Returns the number of elements of `labels` equal to `value`.
pub fn count_equal(labels: &[i64], value: i64) -> usize {
    labels.iter()
        .filter(|&&y| y == value)
        .count()
}


/// Returns the number of occurrences of each class,
/// in ascending class order.
pub fn value_counts(labels: &[i64]) -> BTreeMap<i64, usize> {
    let mut counter = BTreeMap::new();
    for &y in labels {
        *counter.entry(y).or_insert(0_usize) += 1;
    }
    counter
}


/// Returns the most frequent class of `labels`.
/// Ties are broken by the smallest class code.
/// Returns `None` for an empty slice.
pub fn majority(labels: &[i64]) -> Option<i64> {
    let mut best: Option<(i64, usize)> = None;
    for (y, count) in value_counts(labels) {
        match best {
            Some((_, c)) if c >= count => {},
            _ => { best = Some((y, count)); },
        }
    }
    best.map(|(y, _)| y)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn homogeneity() {
        assert!(is_homogeneous(&[]));
        assert!(is_homogeneous(&[3, 3, 3]));
        assert!(!is_homogeneous(&[3, 3, 1]));
    }


    #[test]
    fn majority_prefers_smallest_code_on_ties() {
        assert_eq!(majority(&[2, 1, 2, 1]), Some(1));
        assert_eq!(majority(&[0, 2, 2, 1]), Some(2));
        assert_eq!(majority(&[]), None);
    }


    #[test]
    fn counts() {
        let target = Target::new("y", vec![1, 0, 1, 1, 2]);
        assert_eq!(target.count_equal(1), 3);
        assert_eq!(target.count_equal(5), 0);

        let counts = target.value_counts();
        assert_eq!(counts.into_iter().collect::<Vec<_>>(), vec![(0, 1), (1, 3), (2, 1)]);
        assert_eq!(target.classes(), vec![0, 1, 2]);
    }


    #[test]
    fn from_series_rejects_floats_and_nulls() {
        let floats = Series::new("y", &[0.0_f64, 1.0]);
        assert!(matches!(
            Target::from_series(&floats),
            Err(Error::InvalidTarget { .. })
        ));

        let nulls = Series::new("y", &[Some(1_i64), None]);
        assert!(matches!(
            Target::from_series(&nulls),
            Err(Error::NullValue { .. })
        ));

        let bools = Series::new("y", &[true, false]);
        assert_eq!(Target::from_series(&bools).unwrap().labels(), &[1, 0]);
    }
}
