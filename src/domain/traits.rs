// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// Each benchmark dataset has its own on-disk layout and its own
// rules for deriving {t, yf, ycf, x}. A DatasetParser hides one
// such layout behind a single `parse` call so the loader can keep
// them in a registry keyed by name:
//
//   TwinsParser → Twin_data.csv + simulated treatment assignment
//   IhdpParser  → csv/ihdp_npci_{1..10}.csv
//   JobsParser  → placeholder, not implemented
//
// Randomness is passed in by the caller so a seeded generator
// reproduces the same record.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)
//            Rust Book §17 (Trait Objects)

use std::path::Path;

use rand::RngCore;

use crate::domain::error::DatasetError;
use crate::domain::record::UniformRecord;

// ─── DatasetParser ────────────────────────────────────────────────────────────
/// Turns one dataset's raw files into a UniformRecord.
pub trait DatasetParser {
    /// Canonical upper-case dataset name, used as the registry key
    /// and as the sub-directory under the data root.
    fn name(&self) -> &'static str;

    /// Parse the dataset stored in `dir`.
    fn parse(&self, dir: &Path, rng: &mut dyn RngCore) -> Result<UniformRecord, DatasetError>;
}
