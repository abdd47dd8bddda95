use polars::prelude::*;

use std::ops::Index;
use std::slice::Iter;

use crate::{Error, Result};
use super::is_numeric_dtype;


/// A named, dense, numeric feature column.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub(super) name: String,
    pub(super) values: Vec<f64>,
}


impl Feature {
    /// Construct a feature named `name` from raw values.
    pub fn new<T: ToString>(name: T, values: Vec<f64>) -> Self {
        Self { name: name.to_string(), values, }
    }


    /// Convert `polars::Series` into `Feature`.
    /// The series must be numeric (or boolean), null-free and finite.
    pub fn from_series(series: &Series) -> Result<Self> {
        let name = series.name().to_string();
        let dtype = series.dtype();
        if !is_numeric_dtype(dtype) {
            return Err(Error::NonNumericFeature {
                name,
                dtype: dtype.to_string(),
            });
        }

        let values = series.cast(&DataType::Float64)?;
        let values = values.f64()?
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| Error::NullValue { name: name.clone() })?;

        if let Some(row) = values.iter().position(|x| !x.is_finite()) {
            return Err(Error::NonFiniteValue { name, row });
        }

        Ok(Self { name, values, })
    }


    /// Get the feature name.
    pub fn name(&self) -> &str {
        &self.name
    }


    /// Returns the values of this feature.
    pub fn values(&self) -> &[f64] {
        &self.values[..]
    }


    /// Returns an iterator over the values.
    pub fn iter(&self) -> Iter<'_, f64> {
        self.values.iter()
    }


    /// Returns the number of items in this feature.
    pub fn len(&self) -> usize {
        self.values.len()
    }


    /// Returns `true` if this feature has no items.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }


    /// Returns the permutation that sorts this feature ascending.
    /// Equal values keep their original row order.
    pub fn sorted_indices(&self) -> Vec<usize> {
        let mut indices = (0..self.len()).collect::<Vec<_>>();
        self.sort_rows(&mut indices[..]);
        indices
    }


    /// Sorts the row indices `rows` by the value of this feature.
    /// Equal values are ordered by row index,
    /// so the result does not depend on the order of `rows`.
    pub fn sort_rows(&self, rows: &mut [usize]) {
        rows.sort_by(|&i, &j| {
            self.values[i].total_cmp(&self.values[j])
                .then(i.cmp(&j))
        });
    }


    /// Returns a copy of this feature whose `k`-th value is
    /// `self[permutation[k]]`.
    ///
    /// # Panics
    /// Panics if `permutation` refers to a row out of range.
    pub fn reordered_by(&self, permutation: &[usize]) -> Self {
        let values = permutation.iter()
            .map(|&i| self.values[i])
            .collect();
        Self { name: self.name.clone(), values, }
    }


    /// Returns a copy of the rows `from..to`.
    ///
    /// # Panics
    /// Panics if `from > to` or `to > self.len()`.
    pub fn slice(&self, from: usize, to: usize) -> Self {
        let values = self.values[from..to].to_vec();
        Self { name: self.name.clone(), values, }
    }
}


impl Index<usize> for Feature {
    type Output = f64;
    fn index(&self, idx: usize) -> &Self::Output {
        &self.values[idx]
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorted_indices_are_stable_on_ties() {
        let feature = Feature::new("x", vec![0.5, 0.1, 0.5, 0.1, 0.3]);
        assert_eq!(feature.sorted_indices(), vec![1, 3, 4, 0, 2]);
    }


    #[test]
    fn sorting_twice_is_identity() {
        let feature = Feature::new("x", vec![3.0, 1.0, 2.0, 1.0]);
        let sorted = feature.reordered_by(&feature.sorted_indices());

        let again = sorted.sorted_indices();
        assert_eq!(again, (0..sorted.len()).collect::<Vec<_>>());
        assert_eq!(sorted.reordered_by(&again), sorted);
    }


    #[test]
    fn sort_rows_ignores_input_order() {
        let feature = Feature::new("x", vec![2.0, 1.0, 2.0, 0.0]);
        let mut a = vec![0, 1, 2, 3];
        let mut b = vec![3, 2, 1, 0];
        feature.sort_rows(&mut a);
        feature.sort_rows(&mut b);
        assert_eq!(a, b);
        assert_eq!(a, vec![3, 1, 0, 2]);
    }


    #[test]
    fn from_series_casts_integers_and_booleans() {
        let ints = Series::new("i", &[1_i32, 2, 3]);
        let bools = Series::new("b", &[true, false, true]);

        assert_eq!(Feature::from_series(&ints).unwrap().values(), &[1.0, 2.0, 3.0]);
        assert_eq!(Feature::from_series(&bools).unwrap().values(), &[1.0, 0.0, 1.0]);
    }


    #[test]
    fn from_series_rejects_strings_nulls_and_nan() {
        let strings = Series::new("s", &["a", "b"]);
        assert!(matches!(
            Feature::from_series(&strings),
            Err(Error::NonNumericFeature { .. })
        ));

        let nulls = Series::new("n", &[Some(1.0_f64), None]);
        assert!(matches!(
            Feature::from_series(&nulls),
            Err(Error::NullValue { .. })
        ));

        let nan = Series::new("f", &[1.0_f64, f64::NAN]);
        assert!(matches!(
            Feature::from_series(&nan),
            Err(Error::NonFiniteValue { row: 1, .. })
        ));
    }


    #[test]
    fn slice_is_half_open() {
        let feature = Feature::new("x", vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(feature.slice(1, 3).values(), &[2.0, 3.0]);
        assert!(feature.slice(2, 2).is_empty());
    }
}
