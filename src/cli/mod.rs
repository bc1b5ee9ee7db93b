// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Three commands are supported:
//   1. `prepare` — load a dataset, split it, write .npz archives
//   2. `inspect` — list the arrays inside an .npz archive, or print one
//   3. `list`    — show the dataset names the loader accepts
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, InspectArgs, PrepareArgs};

/// The main CLI struct; clap generates the parsing code from it.
#[derive(Parser, Debug)]
#[command(
    name = "causal-bench-prep",
    version = "0.1.0",
    about = "Prepare TWINS / IHDP causal-inference benchmarks as grouped train/test .npz archives."
)]
pub struct Cli {
    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Prepare(args) => Self::run_prepare(args),
            Commands::Inspect(args) => Self::run_inspect(args),
            Commands::List          => Self::run_list(),
        }
    }

    /// Handles the `prepare` subcommand.
    fn run_prepare(args: PrepareArgs) -> Result<()> {
        use crate::application::prepare_use_case::PrepareUseCase;

        tracing::info!("Preparing {} from: {}", args.dataset, args.data_root);

        // CLI args → application config
        let report = PrepareUseCase::new(args.into()).execute()?;

        println!(
            "{}: {} train groups, {} test groups (seed {})",
            report.dataset, report.train_groups, report.test_groups, report.seed
        );
        println!("  train    → {}", report.train_path.display());
        println!("  test     → {}", report.test_path.display());
        println!("  manifest → {}", report.manifest_path.display());
        Ok(())
    }

    /// Handles the `inspect` subcommand.
    fn run_inspect(args: InspectArgs) -> Result<()> {
        use crate::application::inspect_use_case::{FieldValues, InspectUseCase};

        let use_case = InspectUseCase::new(&args.archive);

        if let Some(name) = &args.field {
            match use_case.field(name)? {
                FieldValues::Float64(values) => println!("{name} =\n{values}"),
                FieldValues::Int64(values)   => println!("{name} =\n{values}"),
            }
            return Ok(());
        }

        for info in use_case.execute()? {
            println!("{:<6} {:?} {:?}", info.name, info.kind, info.shape);
        }
        Ok(())
    }

    /// Handles the `list` subcommand.
    fn run_list() -> Result<()> {
        use crate::application::prepare_use_case::supported_datasets;

        for name in supported_datasets() {
            println!("{name}");
        }
        Ok(())
    }
}
