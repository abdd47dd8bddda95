//! Linear models.
use polars::prelude::*;
use rayon::prelude::*;
use tracing::{debug, info, instrument};

use crate::{Error, Result};
use crate::model::{Model, ProbabilisticClassifier};
use crate::common::checker;
use crate::sample::{Feature, Target, dense_features};


/// Regularization term of [`LogisticRegression`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Penalty {
    /// `||w||² / (2 C n)`. The intercept is not penalized.
    #[default]
    L2,
    /// No regularization.
    None,
}


#[derive(Debug, Clone)]
struct Fitted {
    weights: Vec<f64>,
    intercept: f64,
    classes: [i64; 2],
    n_iter: usize,
    converged: bool,
    features: Vec<String>,
    target: String,
}


/// Binary logistic regression trained by batch gradient descent.
///
/// The two classes of the target are mapped to `0` and `1`
/// in ascending order.
/// The objective is the mean log-loss plus the penalty;
/// training stops once every gradient component is below `tol`
/// or after `max_iter` steps.
///
/// Default parameters:
/// ```text
/// penalty: Penalty::L2,
/// c: 1.0,
/// learning_rate: 0.1,
/// max_iter: 1000,
/// tol: 1e-6,
/// ```
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    penalty: Penalty,
    c: f64,
    learning_rate: f64,
    max_iter: usize,
    tol: f64,
    fitted: Option<Fitted>,
}


impl Default for LogisticRegression {
    fn default() -> Self {
        Self {
            penalty: Penalty::L2,
            c: 1.0,
            learning_rate: 0.1,
            max_iter: 1000,
            tol: 1e-6,
            fitted: None,
        }
    }
}


impl LogisticRegression {
    /// Construct an unfitted model with the default parameters.
    pub fn new() -> Self {
        Self::default()
    }


    #[inline(always)]
    fn check_unfitted(&self, parameter: &'static str) -> Result<()> {
        if self.fitted.is_some() {
            return Err(Error::AlreadyFitted { parameter });
        }
        Ok(())
    }


    /// Set the regularization term.
    pub fn set_penalty(&mut self, penalty: Penalty) -> Result<()> {
        self.check_unfitted("penalty")?;
        self.penalty = penalty;
        Ok(())
    }


    /// Set the inverse regularization strength. Must be positive.
    pub fn set_c(&mut self, c: f64) -> Result<()> {
        self.check_unfitted("c")?;
        if !(c > 0f64 && c.is_finite()) {
            return Err(Error::InvalidParameter {
                name: "c", value: c, reason: "must be positive and finite",
            });
        }
        self.c = c;
        Ok(())
    }


    /// Set the step size of gradient descent. Must be positive.
    pub fn set_learning_rate(&mut self, learning_rate: f64) -> Result<()> {
        self.check_unfitted("learning_rate")?;
        if !(learning_rate > 0f64 && learning_rate.is_finite()) {
            return Err(Error::InvalidParameter {
                name: "learning_rate",
                value: learning_rate,
                reason: "must be positive and finite",
            });
        }
        self.learning_rate = learning_rate;
        Ok(())
    }


    /// Set the maximal number of gradient steps. Must be positive.
    pub fn set_max_iter(&mut self, max_iter: usize) -> Result<()> {
        self.check_unfitted("max_iter")?;
        if max_iter == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iter", value: 0f64, reason: "must be positive",
            });
        }
        self.max_iter = max_iter;
        Ok(())
    }


    /// Set the stopping tolerance on the gradient. Must be non-negative.
    pub fn set_tol(&mut self, tol: f64) -> Result<()> {
        self.check_unfitted("tol")?;
        if !(tol >= 0f64) {
            return Err(Error::InvalidParameter {
                name: "tol", value: tol, reason: "must be non-negative",
            });
        }
        self.tol = tol;
        Ok(())
    }


    fn fitted(&self) -> Result<&Fitted> {
        self.fitted.as_ref().ok_or(Error::NotFitted)
    }


    /// Returns the feature weights.
    pub fn coefficients(&self) -> Result<&[f64]> {
        Ok(&self.fitted()?.weights[..])
    }


    /// Returns the intercept.
    pub fn intercept(&self) -> Result<f64> {
        Ok(self.fitted()?.intercept)
    }


    /// Returns the two classes, the negative one first.
    pub fn classes(&self) -> Result<[i64; 2]> {
        Ok(self.fitted()?.classes)
    }


    /// Returns the number of gradient steps taken.
    pub fn n_iter(&self) -> Result<usize> {
        Ok(self.fitted()?.n_iter)
    }


    /// Returns `true` if training stopped on the tolerance.
    pub fn converged(&self) -> Result<bool> {
        Ok(self.fitted()?.converged)
    }


    /// Returns the probability of the positive class for each row.
    fn positive_proba(&self, data: &DataFrame) -> Result<(&Fitted, Vec<f64>)> {
        let fitted = self.fitted()?;
        checker::check_feature_names(&fitted.features, data)?;

        let features = dense_features(data)?;
        let proba = (0..data.height()).into_par_iter()
            .map(|i| {
                let z = linear_score(&features, &fitted.weights, fitted.intercept, i);
                sigmoid(z)
            })
            .collect();
        Ok((fitted, proba))
    }
}


impl Model for LogisticRegression {
    #[instrument(
        skip_all,
        fields(penalty = ?self.penalty, c = self.c, max_iter = self.max_iter)
    )]
    fn fit(&mut self, data: &DataFrame, target: &Series) -> Result<()> {
        checker::check_shape(data, target)?;
        let features = dense_features(data)?;
        let target = Target::from_series(target)?;

        let classes = target.classes();
        let classes = match classes.as_slice() {
            &[negative, positive] => [negative, positive],
            other => {
                return Err(Error::InvalidTarget {
                    name: target.name().to_string(),
                    reason: format!(
                        "expected exactly two classes, got {}", other.len()
                    ),
                });
            },
        };
        let y = target.labels()
            .iter()
            .map(|&label| if label == classes[1] { 1f64 } else { 0f64 })
            .collect::<Vec<_>>();

        let n_sample = y.len() as f64;
        let l2 = match self.penalty {
            Penalty::L2 => 1f64 / (self.c * n_sample),
            Penalty::None => 0f64,
        };

        let mut weights = vec![0f64; features.len()];
        let mut intercept = 0f64;
        let mut n_iter = 0;
        let mut converged = false;

        while n_iter < self.max_iter {
            let errors = (0..y.len()).into_par_iter()
                .map(|i| {
                    let z = linear_score(&features, &weights, intercept, i);
                    sigmoid(z) - y[i]
                })
                .collect::<Vec<_>>();

            let grad_w = features.par_iter()
                .zip(&weights)
                .map(|(feature, &w)| {
                    let dot = feature.iter()
                        .zip(&errors)
                        .map(|(x, e)| x * e)
                        .sum::<f64>();
                    dot / n_sample + l2 * w
                })
                .collect::<Vec<_>>();
            let grad_b = errors.iter().sum::<f64>() / n_sample;

            let max_grad = grad_w.iter()
                .fold(grad_b.abs(), |acc, g| acc.max(g.abs()));
            if max_grad < self.tol {
                converged = true;
                break;
            }

            weights.iter_mut()
                .zip(grad_w)
                .for_each(|(w, g)| { *w -= self.learning_rate * g; });
            intercept -= self.learning_rate * grad_b;
            n_iter += 1;
        }

        if !converged {
            debug!(n_iter, "gradient descent stopped at max_iter");
        }
        info!(
            n_sample = y.len(),
            n_feature = features.len(),
            n_iter,
            converged,
            "fitted logistic regression"
        );

        self.fitted = Some(Fitted {
            weights,
            intercept,
            classes,
            n_iter,
            converged,
            features: checker::column_names(data),
            target: target.name().to_string(),
        });
        Ok(())
    }


    /// Predicts the positive class when its probability exceeds `0.5`.
    fn predict(&self, data: &DataFrame) -> Result<Series> {
        let (fitted, proba) = self.positive_proba(data)?;
        let [negative, positive] = fitted.classes;

        let predictions = proba.into_iter()
            .map(|p| if p > 0.5 { positive } else { negative })
            .collect::<Vec<_>>();
        Ok(Series::new(&fitted.target, predictions))
    }


    fn is_classifier(&self) -> bool {
        true
    }
}


impl ProbabilisticClassifier for LogisticRegression {
    fn predict_proba(&self, data: &DataFrame) -> Result<DataFrame> {
        let (fitted, proba) = self.positive_proba(data)?;
        let [negative, positive] = fitted.classes;

        let complement = proba.iter()
            .map(|p| 1f64 - p)
            .collect::<Vec<_>>();

        let df = DataFrame::new(vec![
            Series::new(&format!("{}_{negative}", fitted.target), complement),
            Series::new(&format!("{}_{positive}", fitted.target), proba),
        ])?;
        Ok(df)
    }
}


#[inline(always)]
fn linear_score(features: &[Feature], weights: &[f64], intercept: f64, row: usize)
    -> f64
{
    features.iter()
        .zip(weights)
        .map(|(feature, w)| w * feature[row])
        .sum::<f64>()
        + intercept
}


#[inline(always)]
fn sigmoid(z: f64) -> f64 {
    if z >= 0f64 {
        1f64 / (1f64 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1f64 + e)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn labels(series: &Series) -> Vec<i64> {
        series.i64().unwrap().into_no_null_iter().collect()
    }


    #[test]
    fn separates_a_line() {
        let data = DataFrame::new(vec![
            Series::new("x", &[0.0, 1.0, 2.0, 3.0]),
        ]).unwrap();
        let target = Series::new("y", &[3_i64, 3, 5, 5]);

        let mut model = LogisticRegression::new();
        model.fit(&data, &target).unwrap();

        assert_eq!(model.classes().unwrap(), [3, 5]);
        assert!(model.coefficients().unwrap()[0] > 0.0);
        assert_eq!(labels(&model.predict(&data).unwrap()), vec![3, 3, 5, 5]);

        let proba = model.predict_proba(&data).unwrap();
        assert_eq!(proba.get_column_names(), &["y_3", "y_5"]);
        let p3 = proba.column("y_3").unwrap().f64().unwrap().get(0).unwrap();
        let p5 = proba.column("y_5").unwrap().f64().unwrap().get(0).unwrap();
        assert_abs_diff_eq!(p3 + p5, 1.0, epsilon = 1e-12);
        assert!(p3 > 0.5);
    }


    #[test]
    fn stops_on_tolerance() {
        let data = DataFrame::new(vec![
            Series::new("a", &[0.1, 0.9, 0.4, 0.7, 0.2, 0.8]),
            Series::new("b", &[0.5, 0.2, 0.8, 0.1, 0.3, 0.9]),
        ]).unwrap();
        let target = Series::new("y", &[0_i64, 1, 0, 1, 0, 1]);

        let mut model = LogisticRegression::new();
        model.set_learning_rate(1.0).unwrap();
        model.set_max_iter(5000).unwrap();
        model.fit(&data, &target).unwrap();

        assert!(model.converged().unwrap());
        assert!(model.n_iter().unwrap() < 5000);
        assert_eq!(labels(&model.predict(&data).unwrap()), vec![0, 1, 0, 1, 0, 1]);
    }


    #[test]
    fn rejects_bad_parameters_and_targets() {
        let mut model = LogisticRegression::new();
        assert!(matches!(model.set_c(0.0), Err(Error::InvalidParameter { name: "c", .. })));
        assert!(matches!(model.set_tol(-1.0), Err(Error::InvalidParameter { .. })));
        assert!(matches!(model.set_max_iter(0), Err(Error::InvalidParameter { .. })));

        let data = DataFrame::new(vec![Series::new("x", &[0.0, 1.0, 2.0])]).unwrap();
        let target = Series::new("y", &[0_i64, 1, 2]);
        assert!(matches!(
            model.fit(&data, &target),
            Err(Error::InvalidTarget { .. })
        ));
        assert!(matches!(model.intercept(), Err(Error::NotFitted)));
    }
}
