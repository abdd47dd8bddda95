//! Greedy search for the best binary split of a node.
use rayon::prelude::*;

use crate::Result;
use crate::sample::{Feature, Sample};
use super::criterion::{ClassCounts, Criterion};


/// The best split found for a node.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Split {
    /// Index of the feature to split on.
    pub(crate) axis: usize,
    /// Number of rows sent to the left child.
    pub(crate) position: usize,
    /// Feature value of the first row sent to the right child.
    pub(crate) threshold: f64,
    /// Cost of the split under the criterion.
    pub(crate) score: f64,
    /// The node's rows sorted by the feature at `axis`.
    /// `order[..position]` goes left, `order[position..]` goes right.
    pub(crate) order: Vec<usize>,
}


impl Split {
    /// Consumes the split and returns the row indices of
    /// the left and right children.
    pub(crate) fn into_partition(self) -> (Vec<usize>, Vec<usize>) {
        let mut left = self.order;
        let right = left.split_off(self.position);
        (left, right)
    }
}


/// Returns the split of `rows` minimizing `criterion`
/// over every feature and every admissible position,
/// or `None` if no position separates the rows
/// (every feature is constant on `rows`).
///
/// Each feature sorts `rows` on its own,
/// so the result does not depend on the feature order.
/// Ties go to the smaller axis, then to the smaller position.
pub(crate) fn best_split(
    sample: &Sample,
    rows: &[usize],
    criterion: &Criterion,
) -> Result<Option<Split>>
{
    let target = sample.target().labels();

    let candidates = sample.features()
        .par_iter()
        .enumerate()
        .map(|(axis, feature)| {
            best_split_on_axis(axis, feature, target, rows, criterion)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut best: Option<Split> = None;
    for split in candidates.into_iter().flatten() {
        let improves = best.as_ref()
            .map_or(true, |current| split.score < current.score);
        if improves {
            best = Some(split);
        }
    }
    Ok(best)
}


/// Scans every position of `rows` sorted by `feature`.
/// A position between two equal values is skipped,
/// since no threshold could separate those rows.
fn best_split_on_axis(
    axis: usize,
    feature: &Feature,
    target: &[i64],
    rows: &[usize],
    criterion: &Criterion,
) -> Result<Option<Split>>
{
    let mut order = rows.to_vec();
    feature.sort_rows(&mut order[..]);

    let labels = order.iter()
        .map(|&i| target[i])
        .collect::<Vec<_>>();

    // Class counts move from right to left as the scan advances.
    let mut left = ClassCounts::default();
    let mut right = ClassCounts::from_labels(&labels);

    let mut best: Option<(usize, f64)> = None;
    for position in 1..order.len() {
        let moved = labels[position - 1];
        right.remove(moved);
        left.insert(moved);

        let prev = feature[order[position - 1]];
        let next = feature[order[position]];
        if prev == next { continue; }

        let score = match criterion.split_cost_from_counts(&left, &right) {
            Some(score) => score?,
            None => criterion.split_cost(
                &labels[..position], &labels[position..]
            )?,
        };

        if best.map_or(true, |(_, s)| score < s) {
            best = Some((position, score));
        }
    }

    let split = best.map(|(position, score)| {
        let threshold = feature[order[position]];
        Split { axis, position, threshold, score, order, }
    });
    Ok(split)
}


#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn sample(columns: Vec<Series>, target: &[i64]) -> Sample {
        let data = DataFrame::new(columns).unwrap();
        let target = Series::new("y", target);
        Sample::from_dataframe(&data, &target).unwrap()
    }


    #[test]
    fn finds_the_separating_threshold() {
        let sample = sample(
            vec![Series::new("x", &[0.9, 0.1, 0.7, 0.3])],
            &[1, 0, 1, 0],
        );
        let split = best_split(&sample, &[0, 1, 2, 3], &Criterion::Gini)
            .unwrap()
            .unwrap();

        assert_eq!(split.axis, 0);
        assert_eq!(split.position, 2);
        assert_eq!(split.threshold, 0.7);
        assert_eq!(split.score, 0.0);
        assert_eq!(split.into_partition(), (vec![1, 3], vec![2, 0]));
    }


    #[test]
    fn first_axis_wins_ties() {
        // Both features induce the same label order.
        let sample = sample(
            vec![
                Series::new("a", &[1.0, 2.0, 3.0, 4.0]),
                Series::new("b", &[10.0, 20.0, 30.0, 40.0]),
            ],
            &[0, 0, 1, 1],
        );
        let split = best_split(&sample, &[0, 1, 2, 3], &Criterion::Entropy)
            .unwrap()
            .unwrap();
        assert_eq!(split.axis, 0);
        assert_eq!(split.threshold, 3.0);
    }


    #[test]
    fn result_does_not_depend_on_row_order() {
        let sample = sample(
            vec![
                Series::new("a", &[0.3, 0.8, 0.1, 0.5, 0.9, 0.2]),
                Series::new("b", &[0.6, 0.1, 0.4, 0.2, 0.7, 0.9]),
            ],
            &[0, 1, 0, 1, 1, 0],
        );
        let forward = best_split(&sample, &[0, 1, 2, 3, 4, 5], &Criterion::Gini)
            .unwrap()
            .unwrap();
        let backward = best_split(&sample, &[5, 4, 3, 2, 1, 0], &Criterion::Gini)
            .unwrap()
            .unwrap();
        assert_eq!(forward, backward);
    }


    #[test]
    fn ties_in_values_are_never_cut() {
        let sample = sample(
            vec![Series::new("x", &[1.0, 1.0, 1.0, 2.0])],
            &[0, 1, 0, 1],
        );
        let split = best_split(&sample, &[0, 1, 2, 3], &Criterion::Gini)
            .unwrap()
            .unwrap();
        assert_eq!(split.position, 3);
        assert_eq!(split.threshold, 2.0);
    }


    #[test]
    fn custom_cost_matching_gini_picks_the_same_split() {
        let sample = sample(
            vec![
                Series::new("a", &[0.3, 0.8, 0.1, 0.5, 0.9, 0.2, 0.4]),
                Series::new("b", &[0.6, 0.1, 0.4, 0.2, 0.7, 0.9, 0.3]),
            ],
            &[0, 1, 2, 1, 1, 0, 2],
        );
        let rows = [0, 1, 2, 3, 4, 5, 6];
        let custom = Criterion::custom("gini", |left: &[i64], right: &[i64]| {
            Criterion::Gini.split_cost(left, right).unwrap()
        });
        let by_counts = best_split(&sample, &rows, &Criterion::Gini)
            .unwrap();
        let by_slices = best_split(&sample, &rows, &custom)
            .unwrap();
        assert_eq!(by_counts, by_slices);
    }


    #[test]
    fn constant_features_have_no_split() {
        let sample = sample(
            vec![Series::new("x", &[0.5, 0.5, 0.5])],
            &[0, 1, 0],
        );
        let split = best_split(&sample, &[0, 1, 2], &Criterion::Gini).unwrap();
        assert!(split.is_none());
    }
}
