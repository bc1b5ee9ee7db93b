// ============================================================
// Layer 3 — PartitionedRecord Domain Type
// ============================================================
// One side (train or test) of a split UniformRecord, laid out in
// fixed-size instance groups:
//
//   t, yf, ycf, aux   [groups, group_size]
//   x                 [groups, features, group_size]
//
// Element [g, j] of t, yf, ycf and aux is source instance
// groups[g] * group_size + j. x[g] holds the covariate rows of
// the same instances in row-major memory order, so reshaping x to
// [groups * group_size, features] lines its rows up with t.
//
// Reference: Rust Book §5 (Structs)

use std::collections::BTreeMap;

use ndarray::{Array2, Array3};

/// A train or test partition in grouped batch layout.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionedRecord {
    /// Leading-axis group indices of the source record, in layout order
    pub groups: Vec<usize>,

    /// Instances per group (trailing dimension of every field)
    pub group_size: usize,

    pub t:   Array2<i64>,
    pub yf:  Array2<f64>,
    pub ycf: Array2<f64>,
    pub x:   Array3<f64>,

    /// Auxiliary fields (e.g. y0, y1), grouped like `yf`
    pub aux: BTreeMap<String, Array2<f64>>,
}

impl PartitionedRecord {
    /// Number of groups in this partition
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of individual instances (groups × group_size)
    pub fn instance_count(&self) -> usize {
        self.groups.len() * self.group_size
    }

    /// `(name, shape)` for every field, in archive order.
    pub fn field_shapes(&self) -> Vec<(String, Vec<usize>)> {
        let mut shapes = vec![
            ("t".to_string(),   self.t.shape().to_vec()),
            ("yf".to_string(),  self.yf.shape().to_vec()),
            ("ycf".to_string(), self.ycf.shape().to_vec()),
            ("x".to_string(),   self.x.shape().to_vec()),
        ];
        shapes.extend(
            self.aux
                .iter()
                .map(|(name, values)| (name.clone(), values.shape().to_vec())),
        );
        shapes
    }
}

/// Source-record row of every instance of `groups`, in layout order.
pub fn instance_rows(groups: &[usize], group_size: usize) -> Vec<usize> {
    groups
        .iter()
        .flat_map(|&g| (0..group_size).map(move |j| g * group_size + j))
        .collect()
}
