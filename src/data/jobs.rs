// ============================================================
// Layer 4 — JOBS Parser (placeholder)
// ============================================================
// JOBS is part of the supported dataset set, but its raw file
// layout has never been wired up. The parser is registered so
// `--dataset jobs` is recognised, and it fails loudly instead of
// returning an empty record.

use std::path::Path;

use rand::RngCore;

use crate::domain::error::DatasetError;
use crate::domain::record::UniformRecord;
use crate::domain::traits::DatasetParser;

#[derive(Debug, Clone, Default)]
pub struct JobsParser;

impl DatasetParser for JobsParser {
    fn name(&self) -> &'static str {
        "JOBS"
    }

    fn parse(&self, dir: &Path, _rng: &mut dyn RngCore) -> Result<UniformRecord, DatasetError> {
        tracing::warn!("JOBS requested from '{}' but has no parser", dir.display());
        Err(DatasetError::NotImplemented(self.name().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_jobs_reports_not_implemented() {
        let err = JobsParser
            .parse(Path::new("datasets/JOBS"), &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(err, DatasetError::NotImplemented(ref name) if name == "JOBS"));
    }
}
