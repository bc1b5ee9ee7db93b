// ============================================================
// Layer 6 — Archive Writer
// ============================================================
// Persists train/test partitions as NumPy .npz archives using
// ndarray-npy, plus a JSON manifest describing the run.
//
// What gets written per prepare run:
//   1. <stem>_train.npz   — t, yf, ycf, x, aux fields
//   2. <stem>_test.npz    — same keys, test groups
//   3. <stem>_manifest.json — config, seed, group indices, shapes
//
// Archives are uncompressed and the arrays are stored in the
// order t, yf, ycf, x, then aux fields by name, the same layout
// `np.savez(path, **fields)` produces, so they load directly with
// `np.load("twins_train.npz")`.
//
// File naming convention:
//   datasets/TWINS/
//     twins_train.npz
//     twins_test.npz
//     twins_manifest.json
//
// Reference: ndarray-npy crate documentation
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use ndarray::{ArrayD, IxDyn, OwnedRepr};
use ndarray_npy::{NpzReader, NpzWriter};
use serde::Serialize;
use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

use crate::domain::partition::PartitionedRecord;

/// Suffix ndarray-npy / NumPy use for the members of an .npz file
const NPY_SUFFIX: &str = ".npy";

/// Writes partitions and manifests into one output directory.
pub struct ArchiveWriter {
    /// Directory where archives are stored
    dir: PathBuf,
}

impl ArchiveWriter {
    /// Create a writer, creating the output directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create output directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    /// Write one partition to `{dir}/{stem}.npz` and return the path.
    pub fn save_partition(&self, stem: &str, part: &PartitionedRecord) -> Result<PathBuf> {
        let path = self.dir.join(format!("{stem}.npz"));
        let file = File::create(&path)
            .with_context(|| format!("Cannot create archive '{}'", path.display()))?;

        let mut npz = NpzWriter::new(file);
        let write_err = || format!("Failed to write array into '{}'", path.display());

        npz.add_array("t", &part.t).with_context(write_err)?;
        npz.add_array("yf", &part.yf).with_context(write_err)?;
        npz.add_array("ycf", &part.ycf).with_context(write_err)?;
        npz.add_array("x", &part.x).with_context(write_err)?;
        for (name, values) in &part.aux {
            npz.add_array(name.as_str(), values).with_context(write_err)?;
        }
        npz.finish().with_context(write_err)?;

        tracing::debug!(
            "Saved {} groups to '{}'",
            part.group_count(),
            path.display()
        );
        Ok(path)
    }

    /// Write any serialisable manifest to `{dir}/{stem}.json`.
    pub fn save_manifest<T: Serialize>(&self, stem: &str, manifest: &T) -> Result<PathBuf> {
        let path = self.dir.join(format!("{stem}.json"));

        // serde_json::to_string_pretty adds indentation for readability
        let json = serde_json::to_string_pretty(manifest)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write manifest to '{}'", path.display()))?;

        tracing::debug!("Saved run manifest to '{}'", path.display());
        Ok(path)
    }
}

// ─── Reading archives back ────────────────────────────────────────────────────

/// Element type of an array stored in an archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayKind {
    Float64,
    Int64,
}

/// Name, element type and shape of one array in an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayInfo {
    pub name:  String,
    pub kind:  ArrayKind,
    pub shape: Vec<usize>,
}

fn open_npz(path: &Path) -> Result<NpzReader<File>> {
    let file = File::open(path)
        .with_context(|| format!("Cannot open archive '{}'", path.display()))?;
    NpzReader::new(file).with_context(|| format!("'{}' is not a valid .npz archive", path.display()))
}

/// List every array in an archive, in stored order.
pub fn read_archive_info(path: &Path) -> Result<Vec<ArrayInfo>> {
    let mut npz = open_npz(path)?;
    let members = npz.names()?;

    let mut infos = Vec::with_capacity(members.len());
    for member in members {
        let name = member.strip_suffix(NPY_SUFFIX).unwrap_or(&member).to_string();

        let (kind, shape) = match npz.by_name::<OwnedRepr<f64>, IxDyn>(&member) {
            Ok(arr) => (ArrayKind::Float64, arr.shape().to_vec()),
            Err(_) => {
                let arr = npz
                    .by_name::<OwnedRepr<i64>, IxDyn>(&member)
                    .with_context(|| format!("Unsupported array '{name}' in '{}'", path.display()))?;
                (ArrayKind::Int64, arr.shape().to_vec())
            }
        };
        infos.push(ArrayInfo { name, kind, shape });
    }
    Ok(infos)
}

/// Read one float64 array by key (without the .npy suffix).
pub fn read_f64_array(path: &Path, key: &str) -> Result<ArrayD<f64>> {
    let mut npz = open_npz(path)?;
    let member = find_member(&mut npz, key, path)?;
    npz.by_name(&member)
        .with_context(|| format!("Cannot read '{key}' from '{}'", path.display()))
}

/// Read one int64 array by key (without the .npy suffix).
pub fn read_i64_array(path: &Path, key: &str) -> Result<ArrayD<i64>> {
    let mut npz = open_npz(path)?;
    let member = find_member(&mut npz, key, path)?;
    npz.by_name(&member)
        .with_context(|| format!("Cannot read '{key}' from '{}'", path.display()))
}

fn find_member(npz: &mut NpzReader<File>, key: &str, path: &Path) -> Result<String> {
    npz.names()?
        .into_iter()
        .find(|m| m.strip_suffix(NPY_SUFFIX).unwrap_or(m) == key)
        .with_context(|| format!("Archive '{}' has no array named '{key}'", path.display()))
}
