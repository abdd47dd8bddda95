//! This file defines some functions that checks some pre-conditions
//! E.g., Shape of data

use polars::prelude::*;

use crate::{Error, Result};


/// Check whether the training pair `(data, target)` is valid or not.
#[inline(always)]
pub(crate) fn check_shape(data: &DataFrame, target: &Series) -> Result<()> {
    let (n_sample, n_feature) = data.shape();

    // `data` must have a feature.
    if n_feature == 0 {
        return Err(Error::ZeroFeatures);
    }


    let n_target = target.len();
    if n_sample != n_target {
        return Err(Error::ShapeMismatch { n_sample, n_target });
    }


    // Since the previous check guarantees `n_sample == n_target`,
    // we only need to check `n_sample`.
    if n_sample == 0 {
        return Err(Error::EmptySample);
    }
    Ok(())
}


/// Returns the column names of `data`.
#[inline(always)]
pub(crate) fn column_names(data: &DataFrame) -> Vec<String> {
    data.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}


/// Check whether `data` has exactly the columns seen at fit time,
/// in the same order.
#[inline(always)]
pub(crate) fn check_feature_names(expected: &[String], data: &DataFrame)
    -> Result<()>
{
    let got = column_names(data);
    if got != expected {
        return Err(Error::FeatureMismatch {
            expected: expected.to_vec(),
            got,
        });
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_features_are_reported_before_shape() {
        let data = DataFrame::new(Vec::<Series>::new()).unwrap();
        let target = Series::new("y", &[1_i64, 0]);
        assert!(matches!(check_shape(&data, &target), Err(Error::ZeroFeatures)));
    }


    #[test]
    fn empty_sample() {
        let data = DataFrame::new(vec![Series::new("x", Vec::<f64>::new())]).unwrap();
        let target = Series::new("y", Vec::<i64>::new());
        assert!(matches!(check_shape(&data, &target), Err(Error::EmptySample)));
    }


    #[test]
    fn feature_names_must_match_in_order() {
        let data = DataFrame::new(vec![
            Series::new("b", &[1.0]),
            Series::new("a", &[1.0]),
        ]).unwrap();
        let expected = vec!["a".to_string(), "b".to_string()];
        assert!(matches!(
            check_feature_names(&expected, &data),
            Err(Error::FeatureMismatch { .. })
        ));

        let expected = vec!["b".to_string(), "a".to_string()];
        assert!(check_feature_names(&expected, &data).is_ok());
    }
}
