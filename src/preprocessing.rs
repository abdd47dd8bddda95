//! Encoders that turn categorical columns into numeric ones.
use polars::prelude::*;
use tracing::{info, instrument};

use crate::{Error, Result};
use crate::common::checker;

use std::collections::HashSet;


/// A trait that defines the interface of column encoders.
pub trait Encoder {
    /// Learns the encoding from the columns of `data`.
    fn fit(&mut self, data: &DataFrame) -> Result<()>;


    /// Encodes `data`, which must contain every fitted column.
    fn transform(&self, data: &DataFrame) -> Result<DataFrame>;


    /// Fits on `data` and encodes it.
    fn fit_transform(&mut self, data: &DataFrame) -> Result<DataFrame> {
        self.fit(data)?;
        self.transform(data)
    }


    /// Maps encoded columns back to the original ones.
    fn inverse_transform(&self, data: &DataFrame) -> Result<DataFrame>;


    /// Returns the names of the columns seen at fit time.
    fn feature_names(&self) -> Result<&[String]>;
}


/// Categories of one input column.
#[derive(Debug, Clone)]
struct Categories {
    column: String,
    values: Vec<String>,
}


impl Categories {
    fn output_name(&self, value: &str) -> String {
        format!("{}_{value}", self.column)
    }
}


/// One-hot encoder.
///
/// Each fitted column `c` with categories `v_1, ..., v_k`
/// (its distinct non-null values, compared as strings,
/// in order of first appearance)
/// becomes `k` `Int64` columns `c_v_1, ..., c_v_k` holding `0` or `1`.
/// Values not seen at fit time and nulls are encoded as all zeros.
///
/// # Example
/// ```no_run
/// use minilearn::prelude::*;
/// use polars::prelude::*;
///
/// let data = DataFrame::new(vec![
///     Series::new("color", &["red", "green", "red"]),
/// ]).unwrap();
///
/// let mut encoder = OneHotEncoder::new();
/// let encoded = encoder.fit_transform(&data).unwrap();
/// assert_eq!(encoded.get_column_names(), &["color_red", "color_green"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct OneHotEncoder {
    feature_names: Vec<String>,
    categories: Option<Vec<Categories>>,
}


impl OneHotEncoder {
    /// Construct an unfitted encoder.
    pub fn new() -> Self {
        Self::default()
    }


    fn fitted(&self) -> Result<&[Categories]> {
        self.categories.as_deref().ok_or(Error::NotFitted)
    }


    /// Returns the names of the encoded columns.
    pub fn output_names(&self) -> Result<Vec<String>> {
        let names = self.fitted()?
            .iter()
            .flat_map(|categories| {
                categories.values.iter()
                    .map(|value| categories.output_name(value))
            })
            .collect();
        Ok(names)
    }
}


impl Encoder for OneHotEncoder {
    #[instrument(skip_all)]
    fn fit(&mut self, data: &DataFrame) -> Result<()> {
        let categories = data.get_columns()
            .iter()
            .map(|series| {
                let strings = &as_strings(series)?;
                let mut seen = HashSet::new();
                let mut values: Vec<String> = Vec::new();
                for value in strings.into_iter().flatten() {
                    if seen.insert(value) {
                        values.push(value.to_string());
                    }
                }
                Ok(Categories { column: series.name().to_string(), values, })
            })
            .collect::<Result<Vec<_>>>()?;

        // `a` with `b_c` and `a_b` with `c` both give `a_b_c`.
        let mut outputs = HashSet::new();
        for categories in categories.iter() {
            for value in categories.values.iter() {
                let name = categories.output_name(value);
                if !outputs.insert(name.clone()) {
                    return Err(Error::DuplicateColumn { name });
                }
            }
        }

        let n_output = categories.iter()
            .map(|c| c.values.len())
            .sum::<usize>();
        info!(n_column = categories.len(), n_output, "fitted one-hot encoder");

        self.feature_names = checker::column_names(data);
        self.categories = Some(categories);
        Ok(())
    }


    fn transform(&self, data: &DataFrame) -> Result<DataFrame> {
        let fitted = self.fitted()?;

        let mut columns = Vec::new();
        for categories in fitted {
            let series = column(data, &categories.column)?;
            let strings = &as_strings(series)?;

            for value in categories.values.iter() {
                let indicator = strings.into_iter()
                    .map(|s| i64::from(s == Some(value.as_str())))
                    .collect::<Vec<_>>();
                let name = categories.output_name(value);
                columns.push(Series::new(&name, indicator));
            }
        }

        let df = DataFrame::new(columns)?;
        Ok(df)
    }


    fn inverse_transform(&self, data: &DataFrame) -> Result<DataFrame> {
        let fitted = self.fitted()?;
        let n_sample = data.height();

        let mut columns = Vec::with_capacity(fitted.len());
        for categories in fitted {
            let mut decoded: Vec<Option<&str>> = vec![None; n_sample];

            for value in categories.values.iter() {
                let name = categories.output_name(value);
                let indicator = column(data, &name)?.cast(&DataType::Int64)?;
                let indicator = indicator.i64()?;

                for (row, flag) in indicator.into_iter().enumerate() {
                    if decoded[row].is_none() && flag == Some(1) {
                        decoded[row] = Some(value.as_str());
                    }
                }
            }
            columns.push(Series::new(&categories.column, decoded));
        }

        let df = DataFrame::new(columns)?;
        Ok(df)
    }


    fn feature_names(&self) -> Result<&[String]> {
        self.fitted()?;
        Ok(&self.feature_names[..])
    }
}


fn column<'a>(data: &'a DataFrame, name: &str) -> Result<&'a Series> {
    data.column(name)
        .map_err(|_| Error::FeatureNotFound { name: name.to_string() })
}


/// Casts `series` to strings so that categories of any dtype compare alike.
fn as_strings(series: &Series) -> Result<Utf8Chunked> {
    let strings = series.cast(&DataType::Utf8)?;
    let strings = strings.utf8()?.clone();
    Ok(strings)
}


#[cfg(test)]
mod tests {
    use super::*;

    fn toy() -> DataFrame {
        DataFrame::new(vec![
            Series::new("color", &[Some("red"), Some("green"), Some("red"), None]),
            Series::new("size", &[3_i64, 1, 1, 3]),
        ]).unwrap()
    }


    fn ints(df: &DataFrame, name: &str) -> Vec<i64> {
        df.column(name).unwrap()
            .i64().unwrap()
            .into_no_null_iter()
            .collect()
    }


    #[test]
    fn categories_follow_first_appearance() {
        let mut encoder = OneHotEncoder::new();
        let encoded = encoder.fit_transform(&toy()).unwrap();

        assert_eq!(
            encoded.get_column_names(),
            &["color_red", "color_green", "size_3", "size_1"]
        );
        assert_eq!(ints(&encoded, "color_red"), vec![1, 0, 1, 0]);
        assert_eq!(ints(&encoded, "color_green"), vec![0, 1, 0, 0]);
        assert_eq!(ints(&encoded, "size_1"), vec![0, 1, 1, 0]);
        assert_eq!(encoder.feature_names().unwrap(), &["color", "size"]);
        assert_eq!(encoder.output_names().unwrap().len(), 4);
    }


    #[test]
    fn unknown_values_encode_to_zeros_and_invert_to_null() {
        let mut encoder = OneHotEncoder::new();
        encoder.fit(&toy()).unwrap();

        let unseen = DataFrame::new(vec![
            Series::new("color", &["blue", "green"]),
            Series::new("size", &[1_i64, 7]),
        ]).unwrap();
        let encoded = encoder.transform(&unseen).unwrap();
        assert_eq!(ints(&encoded, "color_red"), vec![0, 0]);
        assert_eq!(ints(&encoded, "color_green"), vec![0, 1]);

        let decoded = encoder.inverse_transform(&encoded).unwrap();
        let color = decoded.column("color").unwrap().utf8().unwrap();
        assert_eq!(color.get(0), None);
        assert_eq!(color.get(1), Some("green"));
        let size = decoded.column("size").unwrap().utf8().unwrap();
        assert_eq!(size.get(0), Some("1"));
        assert_eq!(size.get(1), None);
    }


    #[test]
    fn misuse_is_reported() {
        let encoder = OneHotEncoder::new();
        assert!(matches!(encoder.transform(&toy()), Err(Error::NotFitted)));
        assert!(matches!(encoder.feature_names(), Err(Error::NotFitted)));

        let mut encoder = OneHotEncoder::new();
        encoder.fit(&toy()).unwrap();
        let partial = DataFrame::new(vec![Series::new("size", &[1_i64])]).unwrap();
        assert!(matches!(
            encoder.transform(&partial),
            Err(Error::FeatureNotFound { .. })
        ));
    }


    #[test]
    fn colliding_output_names_are_rejected() {
        let data = DataFrame::new(vec![
            Series::new("a", &["b_c", "d", "b_c"]),
            Series::new("a_b", &["c", "c", "e"]),
        ]).unwrap();

        let mut encoder = OneHotEncoder::new();
        assert!(matches!(
            encoder.fit(&data),
            Err(Error::DuplicateColumn { name }) if name == "a_b_c"
        ));
        assert!(matches!(encoder.output_names(), Err(Error::NotFitted)));
    }


    #[test]
    fn repeated_values_are_kept_once() {
        let values = (0..1000)
            .map(|i| ["x", "y", "z"][i % 3])
            .collect::<Vec<_>>();
        let data = DataFrame::new(vec![Series::new("k", values)]).unwrap();

        let mut encoder = OneHotEncoder::new();
        encoder.fit(&data).unwrap();
        assert_eq!(encoder.output_names().unwrap(), vec!["k_x", "k_y", "k_z"]);
    }
}
