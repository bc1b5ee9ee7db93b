// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain structs, errors and traits describing what a normalised
// benchmark dataset IS. No file I/O and no sampling happen here.
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Errors shared by the data and application layers
pub mod error;

// The uniform {t, yf, ycf, x} record returned by every parser
pub mod record;

// Train/test partitions in grouped batch layout
pub mod partition;

// The parser abstraction the loader's registry is built on
pub mod traits;
