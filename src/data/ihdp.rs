// ============================================================
// Layer 4 — IHDP Parser
// ============================================================
// The IHDP benchmark ships as ten simulated replications,
// csv/ihdp_npci_1.csv … csv/ihdp_npci_10.csv, each headerless with
// the same 30 columns:
//
//   0 treatment   1 y_factual   2 y_cfactual   3 mu0   4 mu1
//   5..30 x1..x25
//
// The replications are stacked row-wise in file order. Treatment
// and outcomes are real here (no simulation), so the parser only
// copies columns and derives the potential outcomes:
//
//   t == 0  →  y0 = y_factual,   y1 = y_cfactual
//   t == 1  →  y0 = y_cfactual,  y1 = y_factual
//
// Reference: ndarray documentation (concatenate, Zip)

use std::path::{Path, PathBuf};

use ndarray::{concatenate, s, Array1, Array2, Axis, Zip};
use rand::RngCore;

use crate::data::table::read_numeric_table;
use crate::domain::error::DatasetError;
use crate::domain::record::UniformRecord;
use crate::domain::traits::DatasetParser;

/// Columns per IHDP replication file
pub const IHDP_COLUMNS: usize = 30;

/// First covariate column (x1)
const COVARIATE_START: usize = 5;

/// Parser for the IHDP replications.
#[derive(Debug, Clone)]
pub struct IhdpParser {
    replications: usize,
}

impl Default for IhdpParser {
    fn default() -> Self {
        Self { replications: 10 }
    }
}

impl IhdpParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths of the replication files under a dataset directory, in load order.
    pub fn replication_paths(&self, dir: &Path) -> Vec<PathBuf> {
        (1..=self.replications)
            .map(|i| dir.join("csv").join(format!("ihdp_npci_{i}.csv")))
            .collect()
    }

    /// Row-stack the given files (in order) and derive the record.
    pub fn load_files(&self, paths: &[PathBuf]) -> Result<UniformRecord, DatasetError> {
        if paths.is_empty() {
            return Err(DatasetError::InvalidConfig(
                "IHDP needs at least one replication file".to_string(),
            ));
        }

        let mut tables = Vec::with_capacity(paths.len());
        for path in paths {
            let table = read_numeric_table(path, false)?;
            if table.ncols() != IHDP_COLUMNS {
                return Err(DatasetError::malformed(
                    path,
                    format!("expected {IHDP_COLUMNS} columns, found {}", table.ncols()),
                ));
            }
            tracing::debug!("IHDP: '{}' has {} rows", path.display(), table.nrows());
            tables.push(table);
        }

        let views: Vec<_> = tables.iter().map(|t| t.view()).collect();
        let stacked = concatenate(Axis(0), &views)
            .map_err(|e| DatasetError::ShapeMismatch(e.to_string()))?;

        let source = paths[0].parent().unwrap_or(Path::new("."));
        from_table(&stacked, source)
    }
}

impl DatasetParser for IhdpParser {
    fn name(&self) -> &'static str {
        "IHDP"
    }

    // IHDP has no random component; the generator is unused
    fn parse(&self, dir: &Path, _rng: &mut dyn RngCore) -> Result<UniformRecord, DatasetError> {
        let paths  = self.replication_paths(dir);
        let record = self.load_files(&paths)?;
        tracing::info!(
            "IHDP: {} replications, {} instances, {} treated",
            paths.len(),
            record.len(),
            record.treated_count()
        );
        Ok(record)
    }
}

/// Build a record from a stacked [n, 30] IHDP table.
pub fn from_table(table: &Array2<f64>, source: &Path) -> Result<UniformRecord, DatasetError> {
    let raw_t = table.column(0);
    if let Some((i, bad)) = raw_t.iter().enumerate().find(|(_, &v)| v != 0.0 && v != 1.0) {
        return Err(DatasetError::malformed(
            source,
            format!("treatment in row {} is {bad}, expected 0 or 1", i + 1),
        ));
    }

    let t: Array1<i64> = raw_t.mapv(|v| v as i64);
    let yf  = table.column(1).to_owned();
    let ycf = table.column(2).to_owned();
    let x   = table.slice(s![.., COVARIATE_START..]).to_owned();

    let (y0, y1) = potential_outcomes(&t, &yf, &ycf);

    UniformRecord::new("IHDP", t, yf, ycf, x)?
        .with_aux("y0", y0)?
        .with_aux("y1", y1)
}

/// Map factual/counterfactual outcomes back to (y0, y1) using `t` as a mask.
pub fn potential_outcomes(
    t:   &Array1<i64>,
    yf:  &Array1<f64>,
    ycf: &Array1<f64>,
) -> (Array1<f64>, Array1<f64>) {
    let y0 = Zip::from(t)
        .and(yf)
        .and(ycf)
        .map_collect(|&ti, &f, &cf| if ti == 0 { f } else { cf });
    let y1 = Zip::from(t)
        .and(yf)
        .and(ycf)
        .map_collect(|&ti, &f, &cf| if ti == 0 { cf } else { f });
    (y0, y1)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::fs;

    /// Write `count` replication files with `rows` rows each under `dir/csv/`.
    fn write_replications(dir: &Path, count: usize, rows: usize) {
        let csv_dir = dir.join("csv");
        fs::create_dir_all(&csv_dir).unwrap();
        let mut rng = StdRng::seed_from_u64(5);

        for file in 1..=count {
            let mut content = String::new();
            for _ in 0..rows {
                let t: u8 = rng.gen_range(0..2);
                let mut cols = vec![t.to_string()];
                for _ in 1..IHDP_COLUMNS {
                    cols.push(format!("{:.6}", rng.gen_range(-3.0..3.0)));
                }
                content.push_str(&cols.join(","));
                content.push('\n');
            }
            fs::write(csv_dir.join(format!("ihdp_npci_{file}.csv")), content).unwrap();
        }
    }

    #[test]
    fn test_parse_reads_all_replications() {
        let dir = tempfile::tempdir().unwrap();
        write_replications(dir.path(), 10, 7);

        let rec = IhdpParser::new()
            .parse(dir.path(), &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert_eq!(rec.len(), 70);
        assert_eq!(rec.feature_count(), 25);
        assert_eq!(rec.source(), "IHDP");
        assert_eq!(rec.aux().keys().collect::<Vec<_>>(), vec!["y0", "y1"]);
    }

    #[test]
    fn test_batch_load_equals_concatenated_single_loads() {
        let dir = tempfile::tempdir().unwrap();
        write_replications(dir.path(), 10, 4);

        let parser = IhdpParser::new();
        let paths  = parser.replication_paths(dir.path());
        let batch  = parser.load_files(&paths).unwrap();

        let singles: Vec<UniformRecord> = paths
            .iter()
            .map(|p| parser.load_files(std::slice::from_ref(p)).unwrap())
            .collect();

        let t: Vec<i64>  = singles.iter().flat_map(|r| r.t().to_vec()).collect();
        let yf: Vec<f64> = singles.iter().flat_map(|r| r.yf().to_vec()).collect();
        let y1: Vec<f64> = singles.iter().flat_map(|r| r.aux()["y1"].to_vec()).collect();
        let x_views: Vec<_> = singles.iter().map(|r| r.x().view()).collect();
        let x = concatenate(Axis(0), &x_views).unwrap();

        assert_eq!(batch.t().to_vec(), t);
        assert_eq!(batch.yf().to_vec(), yf);
        assert_eq!(batch.aux()["y1"].to_vec(), y1);
        assert_eq!(batch.x(), &x);
    }

    #[test]
    fn test_potential_outcomes_follow_treatment() {
        let dir = tempfile::tempdir().unwrap();
        write_replications(dir.path(), 2, 25);

        let parser = IhdpParser { replications: 2 };
        let rec    = parser.load_files(&parser.replication_paths(dir.path())).unwrap();
        let y0     = &rec.aux()["y0"];
        let y1     = &rec.aux()["y1"];

        for i in 0..rec.len() {
            if rec.t()[i] == 0 {
                assert_eq!(y0[i], rec.yf()[i]);
                assert_eq!(y1[i], rec.ycf()[i]);
            } else {
                assert_eq!(y0[i], rec.ycf()[i]);
                assert_eq!(y1[i], rec.yf()[i]);
            }
        }
    }

    #[test]
    fn test_columns_are_mapped() {
        let mut row = vec![1.0, 4.0, 2.0, 0.5, 0.7];
        row.extend((1..=25).map(|v| v as f64));
        let table = Array2::from_shape_vec((1, IHDP_COLUMNS), row).unwrap();

        let rec = from_table(&table, Path::new("ihdp")).unwrap();
        assert_eq!(rec.t(), &array![1]);
        assert_eq!(rec.yf(), &array![4.0]);
        assert_eq!(rec.ycf(), &array![2.0]);
        assert_eq!(rec.x()[[0, 0]], 1.0);
        assert_eq!(rec.x()[[0, 24]], 25.0);
        assert_eq!(rec.aux()["y0"], array![2.0]);
        assert_eq!(rec.aux()["y1"], array![4.0]);
    }

    #[test]
    fn test_bad_width_and_treatment_are_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let csv_dir = dir.path().join("csv");
        fs::create_dir_all(&csv_dir).unwrap();
        let path = csv_dir.join("ihdp_npci_1.csv");
        fs::write(&path, "1,2,3\n").unwrap();

        let err = IhdpParser::new().load_files(&[path]).unwrap_err();
        assert!(matches!(err, DatasetError::MalformedInput { .. }));

        let table = Array2::from_elem((2, IHDP_COLUMNS), 0.5);
        let err = from_table(&table, Path::new("ihdp")).unwrap_err();
        assert!(err.to_string().contains("expected 0 or 1"));
    }

    #[test]
    fn test_missing_replication_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        write_replications(dir.path(), 3, 2);

        let err = IhdpParser::new()
            .parse(dir.path(), &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
    }
}
