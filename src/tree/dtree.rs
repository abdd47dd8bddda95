use serde::{Serialize, Deserialize};
use tracing::{debug, trace};

use crate::{Error, Result};
use crate::sample::{Sample, is_homogeneous, majority};
use super::{
    criterion::Criterion,
    node::Node,
    split::best_split,
    split_rule::Splitter,
};

use std::fmt;
use std::fs::File;
use std::io::prelude::*;
use std::path::Path;


/// A fitted decision tree.
///
/// The tree remembers the feature names and the target name
/// it was trained with, so that predictions can be checked
/// against the input columns and named after the target.
///
/// # Example
/// ```no_run
/// use minilearn::prelude::*;
/// use polars::prelude::*;
///
/// let data = DataFrame::new(vec![
///     Series::new("x", &[0.1, 0.4, 0.6, 0.9]),
/// ]).unwrap();
/// let target = Series::new("class", &[0_i64, 0, 1, 1]);
///
/// let mut model = DecisionTreeClassifier::new();
/// model.fit(&data, &target).unwrap();
///
/// let tree = model.tree().unwrap();
/// println!("{tree}");
/// assert_eq!(tree.predict_row(&[0.2]).unwrap(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    root: Node,
    feature_names: Vec<String>,
    target_name: String,
}


impl DecisionTree {
    /// Grows a tree on `sample`.
    pub(crate) fn fit(
        sample: &Sample,
        criterion: &Criterion,
        max_depth: Option<usize>,
    ) -> Result<Self>
    {
        let n_sample = sample.shape().0;
        let grower = Grower { sample, criterion, max_depth, };

        let rows = (0..n_sample).collect::<Vec<_>>();
        let root = grower.grow(rows, 1)?;

        Ok(Self {
            root: *root,
            feature_names: sample.feature_names(),
            target_name: sample.target().name().to_string(),
        })
    }


    /// Returns the root node.
    pub fn root(&self) -> &Node {
        &self.root
    }


    /// Returns the number of leaves.
    pub fn n_leaves(&self) -> usize {
        self.root.n_leaves()
    }


    /// Returns the number of levels; a single leaf has depth `1`.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }


    /// Returns the feature names seen at fit time.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names[..]
    }


    /// Returns the target name seen at fit time.
    pub fn target_name(&self) -> &str {
        &self.target_name
    }


    /// Predicts the label of a single feature vector.
    pub fn predict_row(&self, row: &[f64]) -> Result<i64> {
        self.root.predict(row)
    }


    /// Predicts the labels of the given feature vectors.
    pub fn predict_rows<R>(&self, rows: &[R]) -> Result<Vec<i64>>
        where R: AsRef<[f64]>
    {
        rows.iter()
            .map(|row| self.predict_row(row.as_ref()))
            .collect()
    }


    /// Write the current decision tree to dot file.
    #[inline]
    pub fn to_dot_file<P>(&self, path: P) -> Result<()>
        where P: AsRef<Path>
    {
        let mut f = File::create(path)?;
        f.write_all(b"graph DecisionTree {\n")?;

        let info = self.root.to_dot_info(0, &self.feature_names).0;
        for row in info {
            f.write_all(row.as_bytes())?;
        }

        f.write_all(b"}\n")?;

        Ok(())
    }


    /// Serializes this tree to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        let json = serde_json::to_string(self)?;
        Ok(json)
    }


    /// Restores a tree written by [`DecisionTree::to_json`].
    pub fn from_json(json: &str) -> Result<Self> {
        let tree = serde_json::from_str(json)?;
        Ok(tree)
    }
}


impl fmt::Display for DecisionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Leafs: {}, Depth: {}", self.n_leaves(), self.depth())?;
        self.root.write_preorder(f, 0)
    }
}


/// Holds what stays fixed while growing one tree.
struct Grower<'a> {
    sample: &'a Sample,
    criterion: &'a Criterion,
    max_depth: Option<usize>,
}


impl Grower<'_> {
    /// Construct the sub-tree over the rows `rows`,
    /// whose root sits at level `depth` (the root of the tree is `1`).
    fn grow(&self, rows: Vec<usize>, depth: usize) -> Result<Box<Node>> {
        if rows.is_empty() {
            return Err(Error::EmptyPartition);
        }

        let target = self.sample.target();
        let labels = rows.iter()
            .map(|&i| target[i])
            .collect::<Vec<_>>();

        // All examples on this node share the label.
        if is_homogeneous(&labels) {
            return Ok(Box::new(Node::leaf(labels[0])));
        }

        let label = majority(&labels).ok_or(Error::EmptyPartition)?;

        if self.max_depth.is_some_and(|max_depth| depth >= max_depth) {
            debug!(depth, n_rows = rows.len(), label, "depth limit reached");
            return Ok(Box::new(Node::leaf(label)));
        }

        // Find the best pair of feature and threshold
        // based on the `criterion`.
        let split = match best_split(self.sample, &rows, self.criterion)? {
            Some(split) => split,
            None => {
                debug!(depth, n_rows = rows.len(), label, "no separating split");
                return Ok(Box::new(Node::leaf(label)));
            },
        };

        trace!(
            depth,
            axis = split.axis,
            threshold = split.threshold,
            score = split.score,
            n_left = split.position,
            n_right = rows.len() - split.position,
            "split node"
        );

        let splitter = Splitter::new(split.axis, split.threshold);
        let (lrows, rrows) = split.into_partition();

        let left  = self.grow(lrows, depth + 1)?;
        let right = self.grow(rrows, depth + 1)?;

        Ok(Box::new(Node::branch(splitter, left, right)))
    }
}
