//! A node struct used in the decision tree algorithm.
use serde::{Serialize, Deserialize};
use std::fmt;

use crate::Result;
use super::split_rule::*;


/// A node of a fitted decision tree.
/// A branch always owns exactly two children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// A node that have two childrens.
    Branch {
        /// The rule routing a row to `left` or `right`.
        splitter: Splitter,
        /// Subtree for rows with `x[axis] < threshold`.
        left: Box<Node>,
        /// Subtree for the other rows.
        right: Box<Node>,
    },
    /// A node that have no child.
    Leaf {
        /// The predicted class.
        label: i64,
    },
}


impl Node {
    pub(crate) fn branch(
        splitter: Splitter,
        left: Box<Node>,
        right: Box<Node>,
    ) -> Self
    {
        Self::Branch { splitter, left, right, }
    }


    pub(crate) fn leaf(label: i64) -> Self {
        Self::Leaf { label, }
    }


    /// Returns `true` if this node has no child.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }


    /// Returns the number of leaves of this sub-tree.
    pub fn n_leaves(&self) -> usize {
        match self {
            Self::Branch { left, right, .. } => {
                left.n_leaves() + right.n_leaves()
            },
            Self::Leaf { .. } => 1,
        }
    }


    /// Returns the number of levels of this sub-tree.
    /// A single leaf has depth `1`.
    pub fn depth(&self) -> usize {
        match self {
            Self::Branch { left, right, .. } => {
                1 + left.depth().max(right.depth())
            },
            Self::Leaf { .. } => 1,
        }
    }


    /// Descends from this node following `row` and
    /// returns the label of the leaf reached.
    pub fn predict(&self, row: &[f64]) -> Result<i64> {
        let mut node = self;
        loop {
            match node {
                Self::Branch { splitter, left, right } => {
                    node = match splitter.split(row)? {
                        LeftRight::Left  => &**left,
                        LeftRight::Right => &**right,
                    };
                },
                Self::Leaf { label } => {
                    return Ok(*label);
                },
            }
        }
    }


    /// Writes this sub-tree in pre-order,
    /// indenting each level by four spaces.
    pub(crate) fn write_preorder(
        &self,
        f: &mut fmt::Formatter<'_>,
        level: usize,
    ) -> fmt::Result
    {
        let indent = "    ".repeat(level);
        match self {
            Self::Branch { splitter, left, right } => {
                writeln!(
                    f,
                    "{indent}Axis: {axis}, Value: {value}",
                    axis = splitter.axis,
                    value = format_threshold(splitter.threshold),
                )?;
                left.write_preorder(f, level + 1)?;
                right.write_preorder(f, level + 1)
            },
            Self::Leaf { label } => {
                writeln!(f, "{indent}Leaf: {label}")
            },
        }
    }


    pub(crate) fn to_dot_info(
        &self,
        id: usize,
        names: &[String],
    ) -> (Vec<String>, usize)
    {
        match self {
            Self::Branch { splitter, left, right } => {
                let feat = names.get(splitter.axis)
                    .cloned()
                    .unwrap_or_else(|| format!("x[{}]", splitter.axis));
                let splitter = format!(
                    "\tnode_{id} [ label = \"{feat} < {thr} ?\" ];\n",
                    thr = format_threshold(splitter.threshold),
                );

                let left_id = id + 1;
                let (     left,  right_id) = left.to_dot_info(left_id, names);
                let (mut right, return_id) = right.to_dot_info(right_id, names);

                let mut info = left;
                info.push(splitter);
                info.append(&mut right);

                let left_edge = format!(
                    "\tnode_{id} -- node_{left_id} [ label = \"Yes\" ];\n",
                );
                info.push(left_edge);
                let right_edge = format!(
                    "\tnode_{id} -- node_{right_id} [ label = \"No\" ];\n",
                );
                info.push(right_edge);

                (info, return_id)
            },
            Self::Leaf { label } => {
                let info = format!(
                    "\tnode_{id} [ label = \"{label}\", shape = box ];\n",
                );

                (vec![info], id + 1)
            }
        }
    }
}


/// Formats a threshold with the fewest digits that read back exactly.
/// Decimal exponents below `-4` or from `6` on switch to
/// exponent notation with a signed, two-digit exponent,
/// e.g. `2e-07`, `1.5e+06`.
fn format_threshold(value: f64) -> String {
    let sci = format!("{value:e}");
    let parts = sci.split_once('e')
        .and_then(|(mantissa, exp)| {
            exp.parse::<i32>().ok().map(|exp| (mantissa, exp))
        });

    match parts {
        Some((mantissa, exp)) if value != 0f64 && (exp < -4 || exp >= 6) => {
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exp.abs())
        },
        _ => format!("{value}"),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn stump() -> Node {
        Node::branch(
            Splitter::new(0, 0.5),
            Box::new(Node::leaf(1)),
            Box::new(Node::branch(
                Splitter::new(1, 2.0),
                Box::new(Node::leaf(0)),
                Box::new(Node::leaf(2)),
            )),
        )
    }


    #[test]
    fn shape_of_the_tree() {
        let tree = stump();
        assert_eq!(tree.n_leaves(), 3);
        assert_eq!(tree.depth(), 3);
        assert!(!tree.is_leaf());
        assert!(Node::leaf(4).is_leaf());
    }


    #[test]
    fn traversal() {
        let tree = stump();
        assert_eq!(tree.predict(&[0.1, 9.0]).unwrap(), 1);
        assert_eq!(tree.predict(&[0.5, 1.0]).unwrap(), 0);
        assert_eq!(tree.predict(&[0.7, 2.0]).unwrap(), 2);
    }


    #[test]
    fn short_rows_are_reported() {
        let tree = stump();
        assert!(matches!(
            tree.predict(&[0.9]),
            Err(Error::MalformedTree { axis: 1, n_feature: 1 })
        ));
        // The left leaf is reached before axis 1 is read.
        assert_eq!(tree.predict(&[0.1]).unwrap(), 1);
    }


    #[test]
    fn dot_info_numbers_nodes_in_preorder() {
        let names = vec!["a".to_string(), "b".to_string()];
        let (info, next) = stump().to_dot_info(0, &names);
        assert_eq!(next, 5);
        assert!(info.iter().any(|line| line.contains("node_0 [ label = \"a < 0.5 ?\" ]")));
        assert!(info.iter().any(|line| line.contains("node_2 [ label = \"b < 2 ?\" ]")));
        assert!(info.iter().any(|line| line.contains("node_0 -- node_2")));
    }


    #[test]
    fn thresholds_switch_to_exponent_notation() {
        assert_eq!(format_threshold(0.5978), "0.5978");
        assert_eq!(format_threshold(0.0001), "0.0001");
        assert_eq!(format_threshold(123456.0), "123456");
        assert_eq!(format_threshold(0.0), "0");
        assert_eq!(format_threshold(2e-7), "2e-07");
        assert_eq!(format_threshold(-1.25e-5), "-1.25e-05");
        assert_eq!(format_threshold(1e6), "1e+06");
        assert_eq!(format_threshold(3e21), "3e+21");
        assert_eq!(format_threshold(1.5e300), "1.5e+300");
    }


    #[test]
    fn preorder_uses_the_threshold_format() {
        struct Render(Node);
        impl fmt::Display for Render {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.write_preorder(f, 0)
            }
        }

        let tree = Node::branch(
            Splitter::new(0, 2e-7),
            Box::new(Node::leaf(0)),
            Box::new(Node::leaf(1)),
        );
        assert_eq!(
            Render(tree).to_string(),
            "Axis: 0, Value: 2e-07\n    Leaf: 0\n    Leaf: 1\n"
        );
    }
}
