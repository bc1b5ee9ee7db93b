// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from raw benchmark files to grouped train/test
// partitions:
//
//   <root>/<NAME>/*.csv
//       │
//       ▼
//   read_numeric_table  → numeric [rows, cols] matrix
//       │
//       ▼
//   DatasetLoader       → picks the parser registered for NAME
//       │                  (TwinsParser / IhdpParser / JobsParser)
//       ▼
//   UniformRecord       → {t, yf, ycf, x, aux}
//       │
//       ▼
//   BatchPartitioner    → (train, test) PartitionedRecord
//
// Reference: Rust Book §7 (Modules)

/// Reads numeric CSV tables into ndarray matrices
pub mod table;

/// TWINS parser and treatment-assignment simulation
pub mod twins;

/// IHDP parser (ten stacked replications)
pub mod ihdp;

/// JOBS placeholder parser
pub mod jobs;

/// Name → parser registry used to load any dataset
pub mod registry;

/// Shuffles instance groups into train/test partitions
pub mod partitioner;
