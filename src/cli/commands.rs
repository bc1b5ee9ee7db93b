// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the subcommands `prepare`, `inspect` and `list` with
// all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use crate::application::prepare_use_case::PrepareConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load a benchmark dataset and write grouped train/test archives
    Prepare(PrepareArgs),

    /// Print the arrays stored in an .npz archive, or one array's values
    Inspect(InspectArgs),

    /// List the datasets that can be prepared
    List,
}

/// All arguments for the `prepare` command.
#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// Dataset name (TWINS, IHDP, JOBS), case-insensitive
    #[arg(long, default_value = "TWINS")]
    pub dataset: String,

    /// Directory holding one sub-directory per dataset
    #[arg(long, default_value = "../datasets")]
    pub data_root: String,

    /// Where to write the archives (default: <data-root>/<DATASET>)
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Expected number of groups; the run fails if the data disagrees
    /// (derived from the row count when omitted)
    #[arg(long)]
    pub instance_count: Option<usize>,

    /// Fraction of groups that go to the training set
    #[arg(long, default_value_t = 0.9)]
    pub train_fraction: f64,

    /// Instances per group
    #[arg(long, default_value_t = 10)]
    pub group_size: usize,

    /// Seed for treatment simulation and the split (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// TWINS: bound of the uniform coefficient draw
    #[arg(long, default_value_t = 0.01)]
    pub coef_bound: f64,

    /// TWINS: std of the noise added to the propensity score
    #[arg(long, default_value_t = 0.01)]
    pub noise_std: f64,
}

/// Convert CLI PrepareArgs into the application-layer PrepareConfig.
/// The application layer never sees clap types.
impl From<PrepareArgs> for PrepareConfig {
    fn from(a: PrepareArgs) -> Self {
        PrepareConfig {
            dataset:        a.dataset,
            data_root:      a.data_root,
            output_dir:     a.output_dir,
            instance_count: a.instance_count,
            train_fraction: a.train_fraction,
            group_size:     a.group_size,
            seed:           a.seed,
            coef_bound:     a.coef_bound,
            noise_std:      a.noise_std,
        }
    }
}

/// All arguments for the `inspect` command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Path to an .npz archive written by `prepare`
    #[arg(long)]
    pub archive: String,

    /// Print the values of this array instead of the summary
    #[arg(long)]
    pub field: Option<String>,
}
