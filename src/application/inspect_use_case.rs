// ============================================================
// Layer 2 — InspectUseCase
// ============================================================
// Opens a previously written .npz archive and reports the name,
// element type and shape of every array inside it, or the values
// of one array, so a prepared partition can be checked without
// loading it into Python.
//
// Reference: Rust Book §9 (Error Handling)

use anyhow::{bail, Context, Result};
use ndarray::ArrayD;
use std::path::PathBuf;

use crate::infra::archive::{
    read_archive_info, read_f64_array, read_i64_array, ArrayInfo, ArrayKind,
};

/// Values of one stored array, in its stored element type.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValues {
    Float64(ArrayD<f64>),
    Int64(ArrayD<i64>),
}

pub struct InspectUseCase {
    archive: PathBuf,
}

impl InspectUseCase {
    pub fn new(archive: impl Into<PathBuf>) -> Self {
        Self { archive: archive.into() }
    }

    /// List the arrays stored in the archive, in stored order.
    pub fn execute(&self) -> Result<Vec<ArrayInfo>> {
        if !self.archive.is_file() {
            bail!("Archive '{}' does not exist", self.archive.display());
        }

        let infos = read_archive_info(&self.archive)?;
        tracing::info!(
            "'{}' holds {} arrays",
            self.archive.display(),
            infos.len()
        );
        Ok(infos)
    }

    /// Read the array stored under `name` (without the .npy suffix).
    pub fn field(&self, name: &str) -> Result<FieldValues> {
        let infos = self.execute()?;
        let info  = infos
            .iter()
            .find(|i| i.name == name)
            .with_context(|| {
                let known: Vec<&str> = infos.iter().map(|i| i.name.as_str()).collect();
                format!("No array '{name}' in archive (has: {})", known.join(", "))
            })?;

        match info.kind {
            ArrayKind::Float64 => Ok(FieldValues::Float64(read_f64_array(&self.archive, name)?)),
            ArrayKind::Int64   => Ok(FieldValues::Int64(read_i64_array(&self.archive, name)?)),
        }
    }
}
