// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Output persistence shared by the use cases:
//
//   archive.rs — writes train/test partitions as .npz archives
//                (ndarray-npy) and the run manifest as JSON;
//                reads archives back for `inspect`.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// .npz archive writing / reading and JSON manifests
pub mod archive;
