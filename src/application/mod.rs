// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates the other layers to accomplish one
// user goal (preparing a dataset or inspecting an archive).
//
// Rules for this layer:
//   - No parsing or array math here (that's Layer 4)
//   - No printing here (that's Layer 1)
//   - No direct file writes (that's Layer 6)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Load → partition → archive workflow
pub mod prepare_use_case;

// Archive inspection
pub mod inspect_use_case;
