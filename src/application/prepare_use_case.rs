// ============================================================
// Layer 2 — PrepareUseCase
// ============================================================
// Orchestrates one full dataset preparation run in order:
//
//   Step 1: Resolve the seed and build the run's generator
//   Step 2: Validate the partition settings
//   Step 3: Load the dataset into a UniformRecord   (Layer 4)
//   Step 4: Split into grouped train/test partitions (Layer 4)
//   Step 5: Write both .npz archives                (Layer 6)
//   Step 6: Write the run manifest                  (Layer 6)
//
// A single StdRng drives both the TWINS treatment simulation and
// the group permutation. When no seed is configured one is drawn
// up front and recorded in the manifest, so any run can be
// replayed with `--seed`.
//
// Reference: Rust Book §13 (Iterators and Closures)

use anyhow::Result;
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::{
    partitioner::BatchPartitioner,
    registry::DatasetLoader,
    twins::TwinsParser,
};
use crate::infra::archive::ArchiveWriter;

// ─── Preparation Configuration ───────────────────────────────────────────────
// All parameters of a preparation run. Serialisable so the exact
// settings are stored next to the archives they produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepareConfig {
    /// Dataset name, case-insensitive (TWINS, IHDP, JOBS)
    pub dataset:        String,
    /// Directory holding one sub-directory per dataset
    pub data_root:      String,
    /// Where archives go; defaults to <data_root>/<NAME>
    pub output_dir:     Option<String>,
    /// Expected number of groups; derived from the row count when None
    pub instance_count: Option<usize>,
    pub train_fraction: f64,
    pub group_size:     usize,
    pub seed:           Option<u64>,
    /// TWINS: coefficients are drawn from [-coef_bound, coef_bound)
    pub coef_bound:     f64,
    /// TWINS: std of the Gaussian noise added to the propensity score
    pub noise_std:      f64,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            dataset:        "TWINS".to_string(),
            data_root:      "../datasets".to_string(),
            output_dir:     None,
            instance_count: None,
            train_fraction: 0.9,
            group_size:     10,
            seed:           None,
            coef_bound:     0.01,
            noise_std:      0.01,
        }
    }
}

// ─── Run Manifest ─────────────────────────────────────────────────────────────
/// Everything needed to reproduce or audit a run, saved as JSON.
#[derive(Debug, Serialize)]
pub struct RunManifest<'a> {
    pub dataset:      &'a str,
    pub seed:         u64,
    pub config:       &'a PrepareConfig,
    pub instances:    usize,
    pub features:     usize,
    pub train_groups: &'a [usize],
    pub test_groups:  &'a [usize],
    pub train_fields: Vec<(String, Vec<usize>)>,
    pub test_fields:  Vec<(String, Vec<usize>)>,
}

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct PrepareReport {
    pub dataset:       String,
    pub seed:          u64,
    pub train_groups:  usize,
    pub test_groups:   usize,
    pub train_path:    PathBuf,
    pub test_path:     PathBuf,
    pub manifest_path: PathBuf,
}

/// Names of every dataset the loader knows about.
pub fn supported_datasets() -> Vec<&'static str> {
    DatasetLoader::new(".").names()
}

// ─── PrepareUseCase ───────────────────────────────────────────────────────────
// Owns the config and runs the full preparation pipeline.
pub struct PrepareUseCase {
    config: PrepareConfig,
}

impl PrepareUseCase {
    /// Create a new PrepareUseCase with the given configuration
    pub fn new(config: PrepareConfig) -> Self {
        Self { config }
    }

    /// Execute the full preparation pipeline end to end
    pub fn execute(&self) -> Result<PrepareReport> {
        let cfg = &self.config;

        // ── Step 1: Seed ──────────────────────────────────────────────────────
        let seed = cfg.seed.unwrap_or_else(rand::random);
        if cfg.seed.is_none() {
            tracing::info!("No seed given; drew seed {}", seed);
        }
        let mut rng = StdRng::seed_from_u64(seed);

        // ── Step 2: Partition settings ────────────────────────────────────────
        // Checked before loading so a bad fraction fails fast
        let partitioner = BatchPartitioner::new(cfg.train_fraction, cfg.group_size)?;

        // ── Step 3: Load ──────────────────────────────────────────────────────
        let twins = TwinsParser::new()
            .with_coef_bound(cfg.coef_bound)
            .with_noise_std(cfg.noise_std);
        let loader  = DatasetLoader::with_twins(&cfg.data_root, twins);
        let dataset = loader.resolve(&cfg.dataset)?;
        let record  = loader.load(dataset, &mut rng)?;

        for (name, shape) in record.field_shapes() {
            tracing::info!("{} {} {:?}", record.source(), name, shape);
        }

        // ── Step 4: Partition ─────────────────────────────────────────────────
        let (train, test) = partitioner.partition(&record, cfg.instance_count, &mut rng)?;
        for (name, shape) in train.field_shapes() {
            tracing::debug!("train {} {:?}", name, shape);
        }
        for (name, shape) in test.field_shapes() {
            tracing::debug!("test {} {:?}", name, shape);
        }

        // ── Step 5: Archives ──────────────────────────────────────────────────
        let out_dir = cfg
            .output_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| loader.dataset_dir(dataset));
        let writer = ArchiveWriter::new(out_dir)?;
        let stem   = dataset.to_lowercase();

        let train_path = writer.save_partition(&format!("{stem}_train"), &train)?;
        let test_path  = writer.save_partition(&format!("{stem}_test"), &test)?;

        // ── Step 6: Manifest ──────────────────────────────────────────────────
        let manifest = RunManifest {
            dataset,
            seed,
            config:       cfg,
            instances:    record.len(),
            features:     record.feature_count(),
            train_groups: &train.groups,
            test_groups:  &test.groups,
            train_fields: train.field_shapes(),
            test_fields:  test.field_shapes(),
        };
        let manifest_path = writer.save_manifest(&format!("{stem}_manifest"), &manifest)?;

        tracing::info!(
            "Wrote '{}' and '{}'",
            train_path.display(),
            test_path.display()
        );

        Ok(PrepareReport {
            dataset: dataset.to_string(),
            seed,
            train_groups: train.group_count(),
            test_groups:  test.group_count(),
            train_path,
            test_path,
            manifest_path,
        })
    }
}
