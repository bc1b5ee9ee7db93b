// ============================================================
// Layer 4 — Batch Partitioner (train/test split)
// ============================================================
// Groups a UniformRecord into fixed-size instance groups, shuffles
// the groups, and splits them into a training and a test set:
//
//   rows = groups × group_size            (must divide evenly)
//   perm = shuffle(0..groups)
//   train = perm[..floor(fraction × groups)]
//   test  = perm[floor(fraction × groups)..]
//
// Each side gathers the rows of its groups and reshapes them
// row-major, the way numpy's reshape does:
//   t, yf, ycf, aux   [n]     →  [groups, group_size]
//   x                 [n, d]  →  [groups, d, group_size]
//
// x[g] is the d × group_size block holding the covariates of
// group g's rows in memory order; flattening x back to [_, d]
// gives those rows unchanged.
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom on the
// caller's generator, so a seeded run reproduces the same split.
//
// Reference: Rust Book §8 (Vectors)
//            ndarray documentation (select, from_shape_vec)

use std::collections::BTreeMap;

use ndarray::{Array1, Array2, Array3, Axis};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::error::DatasetError;
use crate::domain::partition::{instance_rows, PartitionedRecord};
use crate::domain::record::UniformRecord;

/// Splits records into grouped train/test partitions.
#[derive(Debug, Clone, Copy)]
pub struct BatchPartitioner {
    train_fraction: f64,
    group_size:     usize,
}

impl BatchPartitioner {
    /// `train_fraction` must be in (0, 1) and `group_size` at least 1.
    pub fn new(train_fraction: f64, group_size: usize) -> Result<Self, DatasetError> {
        if !(train_fraction > 0.0 && train_fraction < 1.0) {
            return Err(DatasetError::InvalidConfig(format!(
                "train_fraction must be strictly between 0 and 1, got {train_fraction}"
            )));
        }
        if group_size == 0 {
            return Err(DatasetError::InvalidConfig(
                "group_size must be at least 1".to_string(),
            ));
        }
        Ok(Self { train_fraction, group_size })
    }

    /// Number of groups a record of `rows` instances splits into.
    ///
    /// `instance_count`, when given, is the expected number of groups.
    pub fn group_count(&self, rows: usize, instance_count: Option<usize>) -> Result<usize, DatasetError> {
        if rows % self.group_size != 0 {
            return Err(DatasetError::ShapeMismatch(format!(
                "{rows} instances cannot be grouped evenly into groups of {}",
                self.group_size
            )));
        }

        let groups = rows / self.group_size;
        match instance_count {
            Some(expected) if expected != groups => Err(DatasetError::ShapeMismatch(format!(
                "instance_count is {expected} but {rows} rows / group size {} gives {groups} groups",
                self.group_size
            ))),
            _ => Ok(groups),
        }
    }

    /// Shuffle and split `record` into `(train, test)`.
    pub fn partition<R: Rng + ?Sized>(
        &self,
        record:         &UniformRecord,
        instance_count: Option<usize>,
        rng:            &mut R,
    ) -> Result<(PartitionedRecord, PartitionedRecord), DatasetError> {
        let groups = self.group_count(record.len(), instance_count)?;
        let (train_idx, test_idx) = split_indices(groups, self.train_fraction, rng);

        let train = gather(record, train_idx, self.group_size)?;
        let test  = gather(record, test_idx, self.group_size)?;

        tracing::info!(
            "Partitioned {} groups of {}: {} train ({} instances), {} test ({} instances)",
            groups,
            self.group_size,
            train.group_count(),
            train.instance_count(),
            test.group_count(),
            test.instance_count()
        );
        Ok((train, test))
    }
}

/// Randomly permute `0..count` and split it into (train, test) index sets.
///
/// The split point is `floor(count × train_fraction)`.
pub fn split_indices<R: Rng + ?Sized>(
    count:          usize,
    train_fraction: f64,
    rng:            &mut R,
) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..count).collect();

    // Fisher-Yates shuffle — every permutation is equally likely
    indices.shuffle(rng);

    let split_at = ((count as f64) * train_fraction).floor() as usize;
    let split_at = split_at.min(count);

    // split_off(n) leaves [0..n] in `indices` and returns [n..count]
    let test = indices.split_off(split_at);

    tracing::debug!(
        "Index split: {} train, {} test ({}% / {}%)",
        indices.len(),
        test.len(),
        (indices.len() * 100) / count.max(1),
        (test.len()    * 100) / count.max(1),
    );

    (indices, test)
}

/// Select the rows of `groups` from `record` and lay them out in groups.
fn gather(
    record:     &UniformRecord,
    groups:     Vec<usize>,
    group_size: usize,
) -> Result<PartitionedRecord, DatasetError> {
    let rows = instance_rows(&groups, group_size);
    let k    = groups.len();

    let t   = group_values(record.t(), &rows, k, group_size)?;
    let yf  = group_values(record.yf(), &rows, k, group_size)?;
    let ycf = group_values(record.ycf(), &rows, k, group_size)?;

    let selected = record.x().select(Axis(0), &rows);
    let x = Array3::from_shape_vec(
        (k, record.feature_count(), group_size),
        selected.iter().copied().collect(),
    )
    .map_err(|e| DatasetError::ShapeMismatch(e.to_string()))?;

    let mut aux = BTreeMap::new();
    for (name, values) in record.aux() {
        aux.insert(name.clone(), group_values(values, &rows, k, group_size)?);
    }

    Ok(PartitionedRecord { groups, group_size, t, yf, ycf, x, aux })
}

/// values[rows] → [k, group_size], row-major.
fn group_values<T: Copy>(
    values:     &Array1<T>,
    rows:       &[usize],
    k:          usize,
    group_size: usize,
) -> Result<Array2<T>, DatasetError> {
    Array2::from_shape_vec((k, group_size), rows.iter().map(|&r| values[r]).collect())
        .map_err(|e| DatasetError::ShapeMismatch(e.to_string()))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    /// Record whose values encode their own row index, so any
    /// reshuffling mistake shows up as a wrong number.
    fn indexed_record(rows: usize, features: usize) -> UniformRecord {
        let t   = Array1::from_shape_fn(rows, |i| (i % 2) as i64);
        let yf  = Array1::from_shape_fn(rows, |i| i as f64);
        let ycf = Array1::from_shape_fn(rows, |i| -(i as f64));
        let x   = Array2::from_shape_fn((rows, features), |(i, f)| (i * 100 + f) as f64);
        UniformRecord::new("TWINS", t, yf, ycf, x)
            .unwrap()
            .with_aux("y0", Array1::from_shape_fn(rows, |i| i as f64 + 0.5))
            .unwrap()
    }

    #[test]
    fn test_split_sizes_use_floor() {
        let mut rng = StdRng::seed_from_u64(1);
        let (train, test) = split_indices(1140, 0.9, &mut rng);
        assert_eq!(train.len(), 1026);
        assert_eq!(test.len(), 114);

        let (train, test) = split_indices(7, 0.5, &mut rng);
        assert_eq!(train.len(), 3);
        assert_eq!(test.len(), 4);
    }

    #[test]
    fn test_split_is_disjoint_and_complete() {
        let mut rng = StdRng::seed_from_u64(2);
        let (train, test) = split_indices(50, 0.7, &mut rng);

        let train_set: HashSet<usize> = train.iter().copied().collect();
        let test_set:  HashSet<usize> = test.iter().copied().collect();
        assert!(train_set.is_disjoint(&test_set));

        let mut all: Vec<usize> = train.into_iter().chain(test).collect();
        all.sort_unstable();
        assert_eq!(all, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_partition_shapes() {
        let record = indexed_record(200, 3);
        let partitioner = BatchPartitioner::new(0.9, 10).unwrap();
        let (train, test) = partitioner
            .partition(&record, Some(20), &mut StdRng::seed_from_u64(3))
            .unwrap();

        assert_eq!(train.t.dim(), (18, 10));
        assert_eq!(test.yf.dim(), (2, 10));
        assert_eq!(train.x.dim(), (18, 3, 10));
        assert_eq!(test.x.dim(), (2, 3, 10));
        assert_eq!(train.aux["y0"].dim(), (18, 10));
        assert_eq!(train.instance_count() + test.instance_count(), 200);
    }

    #[test]
    fn test_reshape_round_trip_recovers_selected_rows() {
        let record = indexed_record(60, 4);
        let partitioner = BatchPartitioner::new(0.5, 6).unwrap();
        let (train, test) = partitioner
            .partition(&record, None, &mut StdRng::seed_from_u64(4))
            .unwrap();

        for part in [&train, &test] {
            let rows = instance_rows(&part.groups, part.group_size);
            let n    = part.instance_count();

            let flat_x = part.x.clone().into_shape((n, 4)).unwrap();
            assert_eq!(flat_x, record.x().select(Axis(0), &rows));

            let flat_t = part.t.clone().into_shape(n).unwrap();
            assert_eq!(flat_t, record.t().select(Axis(0), &rows));

            let flat_ycf = part.ycf.clone().into_shape(n).unwrap();
            assert_eq!(flat_ycf, record.ycf().select(Axis(0), &rows));

            let flat_y0 = part.aux["y0"].clone().into_shape(n).unwrap();
            assert_eq!(flat_y0, record.aux()["y0"].select(Axis(0), &rows));
        }
    }

    #[test]
    fn test_covariate_block_is_row_major() {
        // x[i, f] = i·100 + f, one group of 5 rows with 3 features
        let record = indexed_record(20, 3);
        let partitioner = BatchPartitioner::new(0.5, 5).unwrap();
        let (train, _) = partitioner
            .partition(&record, None, &mut StdRng::seed_from_u64(8))
            .unwrap();

        let g     = train.groups[0];
        let block = train.x.index_axis(Axis(0), 0);
        assert_eq!(block.dim(), (3, 5));

        // Memory order of the block is rows g·5 .. g·5 + 5, one after another
        let expected: Vec<f64> = (g * 5..g * 5 + 5)
            .flat_map(|i| (0..3).map(move |f| (i * 100 + f) as f64))
            .collect();
        assert_eq!(block.iter().copied().collect::<Vec<_>>(), expected);
        assert_eq!(block[[0, 1]], (g * 5 * 100 + 1) as f64);
        assert_eq!(block[[0, 3]], ((g * 5 + 1) * 100) as f64);
    }

    #[test]
    fn test_seeded_partition_is_reproducible() {
        let record = indexed_record(100, 2);
        let partitioner = BatchPartitioner::new(0.8, 5).unwrap();

        let a = partitioner.partition(&record, None, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = partitioner.partition(&record, None, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_indivisible_group_size_is_shape_mismatch() {
        let record = indexed_record(25, 2);
        let partitioner = BatchPartitioner::new(0.9, 10).unwrap();
        let err = partitioner
            .partition(&record, None, &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(err, DatasetError::ShapeMismatch(_)));
    }

    #[test]
    fn test_wrong_instance_count_is_shape_mismatch() {
        let record = indexed_record(30, 2);
        let partitioner = BatchPartitioner::new(0.9, 10).unwrap();
        assert!(matches!(
            partitioner.group_count(record.len(), Some(30)),
            Err(DatasetError::ShapeMismatch(_))
        ));
        assert_eq!(partitioner.group_count(record.len(), Some(3)).unwrap(), 3);
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        assert!(matches!(BatchPartitioner::new(0.0, 10), Err(DatasetError::InvalidConfig(_))));
        assert!(matches!(BatchPartitioner::new(1.0, 10), Err(DatasetError::InvalidConfig(_))));
        assert!(matches!(BatchPartitioner::new(0.5, 0), Err(DatasetError::InvalidConfig(_))));
    }
}
