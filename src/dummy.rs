//! Baseline estimators that ignore the features.
//!
//! They are useful to check that a real model learns something
//! beyond the distribution of the target.
use polars::prelude::*;
use rand::prelude::*;
use rand::distributions::WeightedIndex;
use rand::rngs::StdRng;
use tracing::{info, instrument};

use crate::{Error, Result};
use crate::model::{Model, ProbabilisticClassifier};
use crate::common::checker;
use crate::sample::Feature;

use std::collections::HashMap;
use std::str::FromStr;


/// Prediction rule of [`DummyClassifier`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ClassifierStrategy {
    /// Always predicts the most frequent class.
    #[default]
    MostFrequent,
    /// Predicts the most frequent class;
    /// `predict_proba` returns the class priors.
    Prior,
    /// Draws each prediction from the class priors.
    Stratified {
        /// Seed of the random generator.
        seed: u64,
    },
    /// Draws each prediction uniformly from the observed classes.
    Uniform {
        /// Seed of the random generator.
        seed: u64,
    },
    /// Always predicts the given class,
    /// cast to the dtype of the target.
    Constant(i64),
}


const CLASSIFIER_STRATEGIES: &[&str] = &[
    "most_frequent", "prior", "stratified", "uniform",
];


impl FromStr for ClassifierStrategy {
    type Err = Error;

    /// Parses a strategy name. Random strategies get the seed `0`.
    fn from_str(name: &str) -> Result<Self> {
        match name {
            "most_frequent" => Ok(Self::MostFrequent),
            "prior" => Ok(Self::Prior),
            "stratified" => Ok(Self::Stratified { seed: 0 }),
            "uniform" => Ok(Self::Uniform { seed: 0 }),
            _ => Err(Error::InvalidStrategy {
                name: name.to_string(),
                expected: CLASSIFIER_STRATEGIES,
            }),
        }
    }
}


/// What [`DummyClassifier`] learns at fit time.
#[derive(Debug, Clone)]
struct ClassPriors {
    /// Distinct target values in ascending order, in the target dtype.
    classes: Series,
    /// `classes` rendered as strings.
    names: Vec<String>,
    counts: Vec<usize>,
    n_sample: usize,
    features: Vec<String>,
    target: String,
}


impl ClassPriors {
    fn from_target(target: &Series, features: Vec<String>) -> Result<Self> {
        let name = target.name().to_string();
        let dtype = target.dtype();
        let supported = dtype.is_numeric()
            || matches!(dtype, DataType::Boolean | DataType::Utf8);
        if !supported {
            let reason = format!("unsupported dtype `{dtype}`");
            return Err(Error::InvalidTarget { name, reason });
        }
        if target.is_empty() {
            let reason = "no sample".to_string();
            return Err(Error::InvalidTarget { name, reason });
        }
        if target.null_count() > 0 {
            return Err(Error::NullValue { name });
        }

        let classes = target.unique()?.sort(false);
        let names = as_names(&classes)?;

        let index = names.iter()
            .enumerate()
            .map(|(k, name)| (name.as_str(), k))
            .collect::<HashMap<_, _>>();
        let mut counts = vec![0_usize; names.len()];
        for value in as_names(target)? {
            if let Some(&k) = index.get(value.as_str()) {
                counts[k] += 1;
            }
        }

        Ok(Self {
            classes,
            names,
            counts,
            n_sample: target.len(),
            features,
            target: name,
        })
    }


    fn priors(&self) -> Vec<f64> {
        let total = self.n_sample as f64;
        self.counts.iter()
            .map(|&c| c as f64 / total)
            .collect()
    }


    /// Index of the most frequent class, ties to the smallest class.
    fn mode(&self) -> usize {
        let mut best = 0;
        for (k, &count) in self.counts.iter().enumerate() {
            if count > self.counts[best] { best = k; }
        }
        best
    }


    /// `n_sample` copies of `label` in the dtype of the target.
    fn constant(&self, label: i64, n_sample: usize) -> Result<Series> {
        let series = Series::new(&self.target, vec![label; n_sample])
            .cast(self.classes.dtype())?;
        Ok(series)
    }
}


/// Renders every value of `series` as a string.
fn as_names(series: &Series) -> Result<Vec<String>> {
    let strings = series.cast(&DataType::Utf8)?;
    let names = strings.utf8()?
        .into_iter()
        .map(|value| value.unwrap_or_default().to_string())
        .collect();
    Ok(names)
}


/// A classifier that predicts from the target distribution only.
///
/// # Example
/// ```no_run
/// use minilearn::prelude::*;
/// use polars::prelude::*;
///
/// let data = DataFrame::new(vec![Series::new("x", &[1.0, 2.0, 3.0])]).unwrap();
/// let target = Series::new("y", &[1_i64, 0, 1]);
///
/// let mut model = DummyClassifier::new();
/// model.fit(&data, &target).unwrap();
/// let predictions = model.predict(&data).unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct DummyClassifier {
    strategy: ClassifierStrategy,
    fitted: Option<ClassPriors>,
}


impl DummyClassifier {
    /// Construct an unfitted classifier
    /// using [`ClassifierStrategy::MostFrequent`].
    pub fn new() -> Self {
        Self::default()
    }


    /// Set the prediction rule.
    pub fn set_strategy(&mut self, strategy: ClassifierStrategy) -> Result<()> {
        if self.fitted.is_some() {
            return Err(Error::AlreadyFitted { parameter: "strategy" });
        }
        self.strategy = strategy;
        Ok(())
    }


    /// Returns the prediction rule.
    pub fn strategy(&self) -> ClassifierStrategy {
        self.strategy
    }


    /// Returns the classes seen at fit time in ascending order,
    /// in the dtype of the target.
    pub fn classes(&self) -> Result<&Series> {
        self.fitted.as_ref()
            .map(|fitted| &fitted.classes)
            .ok_or(Error::NotFitted)
    }


    fn fitted_for(&self, data: &DataFrame) -> Result<&ClassPriors> {
        let fitted = self.fitted.as_ref().ok_or(Error::NotFitted)?;
        checker::check_feature_names(&fitted.features, data)?;
        Ok(fitted)
    }
}


impl Model for DummyClassifier {
    #[instrument(skip_all, fields(strategy = ?self.strategy))]
    fn fit(&mut self, data: &DataFrame, target: &Series) -> Result<()> {
        checker::check_shape(data, target)?;
        let fitted = ClassPriors::from_target(
            target, checker::column_names(data)
        )?;
        info!(
            n_sample = fitted.n_sample,
            n_class = fitted.names.len(),
            dtype = %fitted.classes.dtype(),
            "fitted dummy classifier"
        );

        self.fitted = Some(fitted);
        Ok(())
    }


    fn predict(&self, data: &DataFrame) -> Result<Series> {
        let fitted = self.fitted_for(data)?;
        let n_sample = data.height();

        let indices: Vec<IdxSize> = match self.strategy {
            ClassifierStrategy::MostFrequent | ClassifierStrategy::Prior => {
                vec![fitted.mode() as IdxSize; n_sample]
            },
            ClassifierStrategy::Constant(label) => {
                return fitted.constant(label, n_sample);
            },
            ClassifierStrategy::Stratified { seed } => {
                let mut rng = StdRng::seed_from_u64(seed);
                let dist = WeightedIndex::new(&fitted.counts)
                    .map_err(|e| Error::InvalidTarget {
                        name: fitted.target.clone(),
                        reason: e.to_string(),
                    })?;
                (0..n_sample)
                    .map(|_| dist.sample(&mut rng) as IdxSize)
                    .collect()
            },
            ClassifierStrategy::Uniform { seed } => {
                let mut rng = StdRng::seed_from_u64(seed);
                let n_class = fitted.names.len();
                (0..n_sample)
                    .map(|_| rng.gen_range(0..n_class) as IdxSize)
                    .collect()
            },
        };

        let indices = IdxCa::from_vec("", indices);
        let mut predictions = fitted.classes.take(&indices)?;
        predictions.rename(&fitted.target);
        Ok(predictions)
    }


    fn is_classifier(&self) -> bool {
        true
    }
}


impl ProbabilisticClassifier for DummyClassifier {
    fn predict_proba(&self, data: &DataFrame) -> Result<DataFrame> {
        let fitted = self.fitted_for(data)?;
        let n_sample = data.height();
        let n_class = fitted.names.len();

        let proba = match self.strategy {
            ClassifierStrategy::Uniform { .. } => {
                vec![1f64 / n_class as f64; n_class]
            },
            ClassifierStrategy::Constant(label) => {
                let constant = as_names(&fitted.constant(label, 1)?)?;
                fitted.names.iter()
                    .map(|c| if constant.contains(c) { 1f64 } else { 0f64 })
                    .collect()
            },
            _ => fitted.priors(),
        };

        let columns = fitted.names.iter()
            .zip(proba)
            .map(|(class, p)| {
                let name = format!("{}_{class}", fitted.target);
                Series::new(&name, vec![p; n_sample])
            })
            .collect::<Vec<_>>();

        let df = DataFrame::new(columns)?;
        Ok(df)
    }
}


/// Prediction rule of [`DummyRegressor`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RegressorStrategy {
    /// Predicts the mean of the target.
    #[default]
    Mean,
    /// Predicts the median of the target.
    Median,
    /// Predicts the given quantile of the target, in `[0, 1]`.
    Quantile(f64),
    /// Always predicts the given value.
    Constant(f64),
}


const REGRESSOR_STRATEGIES: &[&str] = &["mean", "median", "quantile"];


impl FromStr for RegressorStrategy {
    type Err = Error;

    /// Parses a strategy name. `"quantile"` defaults to the median.
    fn from_str(name: &str) -> Result<Self> {
        match name {
            "mean" => Ok(Self::Mean),
            "median" => Ok(Self::Median),
            "quantile" => Ok(Self::Quantile(0.5)),
            _ => Err(Error::InvalidStrategy {
                name: name.to_string(),
                expected: REGRESSOR_STRATEGIES,
            }),
        }
    }
}


#[derive(Debug, Clone)]
struct Fitted {
    value: f64,
    features: Vec<String>,
    target: String,
}


/// A regressor that predicts a single statistic of the target.
#[derive(Debug, Clone, Default)]
pub struct DummyRegressor {
    strategy: RegressorStrategy,
    fitted: Option<Fitted>,
}


impl DummyRegressor {
    /// Construct an unfitted regressor using [`RegressorStrategy::Mean`].
    pub fn new() -> Self {
        Self::default()
    }


    /// Set the prediction rule.
    pub fn set_strategy(&mut self, strategy: RegressorStrategy) -> Result<()> {
        if self.fitted.is_some() {
            return Err(Error::AlreadyFitted { parameter: "strategy" });
        }
        if let RegressorStrategy::Quantile(quantile) = strategy {
            if !(0f64..=1f64).contains(&quantile) {
                return Err(Error::InvalidQuantile { quantile });
            }
        }
        self.strategy = strategy;
        Ok(())
    }


    /// Predict the `quantile`-th quantile of the target.
    pub fn set_quantile(&mut self, quantile: f64) -> Result<()> {
        self.set_strategy(RegressorStrategy::Quantile(quantile))
    }


    /// Returns the prediction rule.
    pub fn strategy(&self) -> RegressorStrategy {
        self.strategy
    }


    /// Returns the value predicted for every row.
    pub fn constant(&self) -> Result<f64> {
        self.fitted.as_ref()
            .map(|fitted| fitted.value)
            .ok_or(Error::NotFitted)
    }
}


impl Model for DummyRegressor {
    #[instrument(skip_all, fields(strategy = ?self.strategy))]
    fn fit(&mut self, data: &DataFrame, target: &Series) -> Result<()> {
        checker::check_shape(data, target)?;
        let target = Feature::from_series(target)?;

        let value = match self.strategy {
            RegressorStrategy::Mean => {
                target.iter().sum::<f64>() / target.len() as f64
            },
            RegressorStrategy::Median => quantile(target.values(), 0.5),
            RegressorStrategy::Quantile(q) => quantile(target.values(), q),
            RegressorStrategy::Constant(value) => value,
        };
        info!(n_sample = target.len(), value, "fitted dummy regressor");

        self.fitted = Some(Fitted {
            value,
            features: checker::column_names(data),
            target: target.name().to_string(),
        });
        Ok(())
    }


    fn predict(&self, data: &DataFrame) -> Result<Series> {
        let fitted = self.fitted.as_ref().ok_or(Error::NotFitted)?;
        checker::check_feature_names(&fitted.features, data)?;

        let predictions = vec![fitted.value; data.height()];
        Ok(Series::new(&fitted.target, predictions))
    }


    fn is_classifier(&self) -> bool {
        false
    }
}


/// Returns the `q`-th quantile of `values`
/// interpolating linearly between order statistics.
/// `values` must be non-empty.
fn quantile(values: &[f64], q: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;

    sorted[lo] + (pos - lo as f64) * (sorted[hi] - sorted[lo])
}
