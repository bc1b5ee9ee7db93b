// ============================================================
// Layer 3 — UniformRecord Domain Type
// ============================================================
// The canonical shape every benchmark dataset is normalised into:
//
//   t    [n]      treatment indicator, 0 or 1
//   yf   [n]      factual outcome (observed under t)
//   ycf  [n]      counterfactual outcome (under 1 - t)
//   x    [n, d]   covariates, one row per instance
//   aux  name → [n]   dataset-specific extras (IHDP: y0, y1)
//
// A record can only be built through `new` (plus the consuming
// `with_aux` builder), which checks that every field has one value
// per covariate row. There are no setters: once a parser hands a
// record back it is read-only.
//
// Reference: Rust Book §5 (Structs), §8 (Collections)

use std::collections::BTreeMap;

use ndarray::{Array1, Array2};

use crate::domain::error::DatasetError;

/// A loaded benchmark dataset in the uniform {t, yf, ycf, x} layout.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformRecord {
    source: String,
    t:      Array1<i64>,
    yf:     Array1<f64>,
    ycf:    Array1<f64>,
    x:      Array2<f64>,
    aux:    BTreeMap<String, Array1<f64>>,
}

impl UniformRecord {
    /// Build a record, checking lengths and the treatment domain.
    pub fn new(
        source: impl Into<String>,
        t:      Array1<i64>,
        yf:     Array1<f64>,
        ycf:    Array1<f64>,
        x:      Array2<f64>,
    ) -> Result<Self, DatasetError> {
        let rows = x.nrows();
        for (name, len) in [("t", t.len()), ("yf", yf.len()), ("ycf", ycf.len())] {
            if len != rows {
                return Err(DatasetError::ShapeMismatch(format!(
                    "field '{name}' has {len} values but x has {rows} rows"
                )));
            }
        }

        let source = source.into();
        if let Some((i, bad)) = t.iter().enumerate().find(|(_, &v)| v != 0 && v != 1) {
            return Err(DatasetError::malformed(
                &source,
                format!("treatment at instance {i} is {bad}, expected 0 or 1"),
            ));
        }

        Ok(Self {
            source,
            t,
            yf,
            ycf,
            x,
            aux: BTreeMap::new(),
        })
    }

    /// Attach a named per-instance auxiliary field.
    pub fn with_aux(mut self, name: impl Into<String>, values: Array1<f64>) -> Result<Self, DatasetError> {
        let name = name.into();
        if values.len() != self.len() {
            return Err(DatasetError::ShapeMismatch(format!(
                "auxiliary field '{name}' has {} values but x has {} rows",
                values.len(),
                self.len()
            )));
        }
        self.aux.insert(name, values);
        Ok(self)
    }

    /// Canonical (upper-case) dataset name this record came from
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn t(&self) -> &Array1<i64> {
        &self.t
    }

    pub fn yf(&self) -> &Array1<f64> {
        &self.yf
    }

    pub fn ycf(&self) -> &Array1<f64> {
        &self.ycf
    }

    pub fn x(&self) -> &Array2<f64> {
        &self.x
    }

    /// Auxiliary fields in name order
    pub fn aux(&self) -> &BTreeMap<String, Array1<f64>> {
        &self.aux
    }

    /// Number of instances (covariate rows)
    pub fn len(&self) -> usize {
        self.x.nrows()
    }

    pub fn feature_count(&self) -> usize {
        self.x.ncols()
    }

    /// Number of treated instances (t == 1)
    pub fn treated_count(&self) -> usize {
        self.t.iter().filter(|&&v| v == 1).count()
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
