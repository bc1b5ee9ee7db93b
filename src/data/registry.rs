// ============================================================
// Layer 4 — Dataset Loader (parser registry)
// ============================================================
// Maps a dataset name to the parser that understands its files.
//
//   "twins" / "TWINS" / " Twins "  →  TwinsParser
//   "ihdp"                         →  IhdpParser
//   "jobs"                         →  JobsParser (not implemented)
//
// Names are matched case-insensitively. Each parser reads from
// <data_root>/<NAME>/. New datasets are added with `register`;
// nothing else in the loader changes.
//
// Reference: Rust Book §8 (Hash Maps), §17 (Trait Objects)

use std::collections::BTreeMap;
use std::path::PathBuf;

use rand::RngCore;

use crate::data::ihdp::IhdpParser;
use crate::data::jobs::JobsParser;
use crate::data::twins::TwinsParser;
use crate::domain::error::DatasetError;
use crate::domain::record::UniformRecord;
use crate::domain::traits::DatasetParser;

/// Loads any registered benchmark dataset into a UniformRecord.
pub struct DatasetLoader {
    /// Directory holding one sub-directory per dataset
    root: PathBuf,

    /// Parsers keyed by their upper-case name
    parsers: BTreeMap<&'static str, Box<dyn DatasetParser>>,
}

impl DatasetLoader {
    /// Loader with the built-in TWINS, IHDP and JOBS parsers.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_twins(root, TwinsParser::default())
    }

    /// Built-in parsers, with custom TWINS simulation settings.
    pub fn with_twins(root: impl Into<PathBuf>, twins: TwinsParser) -> Self {
        let mut loader = Self::empty(root);
        loader.register(twins);
        loader.register(IhdpParser::default());
        loader.register(JobsParser);
        loader
    }

    /// Loader with no parsers registered.
    pub fn empty(root: impl Into<PathBuf>) -> Self {
        Self {
            root:    root.into(),
            parsers: BTreeMap::new(),
        }
    }

    /// Add a parser, replacing any parser already registered under its name.
    pub fn register<P: DatasetParser + 'static>(&mut self, parser: P) -> &mut Self {
        self.parsers.insert(parser.name(), Box::new(parser));
        self
    }

    /// Registered dataset names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        self.parsers.keys().copied().collect()
    }

    /// Directory a dataset's files are read from
    pub fn dataset_dir(&self, canonical: &str) -> PathBuf {
        self.root.join(canonical)
    }

    /// Resolve a user-supplied name to its registered canonical form.
    pub fn resolve(&self, dataset_name: &str) -> Result<&'static str, DatasetError> {
        let wanted = dataset_name.trim().to_uppercase();
        self.parsers
            .get_key_value(wanted.as_str())
            .map(|(&name, _)| name)
            .ok_or_else(|| DatasetError::UnsupportedDataset {
                name:  dataset_name.to_string(),
                known: self.names().join(", "),
            })
    }

    /// Load a dataset by (case-insensitive) name.
    pub fn load(&self, dataset_name: &str, rng: &mut dyn RngCore) -> Result<UniformRecord, DatasetError> {
        let name = self.resolve(dataset_name)?;
        let dir  = self.dataset_dir(name);

        tracing::info!("Loading {} from '{}'", name, dir.display());
        let record = self.parsers[name].parse(&dir, rng)?;

        tracing::info!(
            "Loaded {}: {} instances x {} covariates",
            name,
            record.len(),
            record.feature_count()
        );
        Ok(record)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::twins::{TWINS_COVARIATES, TWINS_FILE};
    use ndarray::{array, Array2};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::fs;
    use std::path::Path;

    /// Always returns the same one-row record; lets tests check dispatch.
    struct FixedParser;

    impl DatasetParser for FixedParser {
        fn name(&self) -> &'static str {
            "ACIC"
        }

        fn parse(&self, _dir: &Path, _rng: &mut dyn RngCore) -> Result<UniformRecord, DatasetError> {
            UniformRecord::new("ACIC", array![1], array![0.5], array![0.25], Array2::zeros((1, 2)))
        }
    }

    #[test]
    fn test_builtin_names() {
        let loader = DatasetLoader::new("datasets");
        assert_eq!(loader.names(), vec!["IHDP", "JOBS", "TWINS"]);
    }

    #[test]
    fn test_names_match_case_insensitively() {
        let loader = DatasetLoader::new("datasets");
        assert_eq!(loader.resolve("twins").unwrap(), "TWINS");
        assert_eq!(loader.resolve(" Ihdp ").unwrap(), "IHDP");
    }

    #[test]
    fn test_unknown_dataset_is_unsupported() {
        let loader = DatasetLoader::new("datasets");
        let err = loader
            .load("acic", &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        match err {
            DatasetError::UnsupportedDataset { name, known } => {
                assert_eq!(name, "acic");
                assert_eq!(known, "IHDP, JOBS, TWINS");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_jobs_dispatches_to_not_implemented() {
        let loader = DatasetLoader::new("datasets");
        let err = loader.load("Jobs", &mut StdRng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, DatasetError::NotImplemented(_)));
    }

    #[test]
    fn test_registered_parser_is_dispatched() {
        let mut loader = DatasetLoader::new("datasets");
        loader.register(FixedParser);

        let rec = loader.load("acic", &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(rec.source(), "ACIC");
        assert_eq!(loader.names().len(), 4);
    }

    #[test]
    fn test_twins_loads_from_dataset_directory() {
        let root = tempfile::tempdir().unwrap();
        let dir  = root.path().join("TWINS");
        fs::create_dir_all(&dir).unwrap();

        let row = |outcomes: &str| format!("{}{outcomes}\n", "1,".repeat(TWINS_COVARIATES));
        let mut content = format!("{}y0,y1\n", "c,".repeat(TWINS_COVARIATES));
        content.push_str(&row("9999,3"));
        content.push_str(&row("6,9999"));
        fs::write(dir.join(TWINS_FILE), content).unwrap();

        let loader = DatasetLoader::new(root.path());
        let rec = loader.load("twins", &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(rec.len(), 2);
        assert_eq!(rec.feature_count(), TWINS_COVARIATES);
        assert_eq!(rec.source(), "TWINS");
    }
}
