//! Semantic reconstruction engine for Fallout: New Vegas (Xbox 360)
//! memory-dump artifacts.
//!
//! Turns a [`scan_result::ScanResult`] — the flat, low-confidence output of
//! an external raw scanner — into typed, cross-referenced game objects:
//! NPCs, quests, dialogue trees, weapons, world cells, and the rest of the
//! kinds [`records::RecordKind`] enumerates. Reconstruction never panics
//! and never fails outright; [`orchestrator::reconstruct_all`] always
//! returns a [`result::SemanticReconstructionResult`], falling back to
//! scan-result-only stubs wherever deeper data isn't available.

pub mod capabilities;
pub mod config;
pub mod correlation;
pub mod dialogue;
pub mod enrichment;
pub mod error;
pub mod form_type;
pub mod heuristics;
pub mod logging;
pub mod orchestrator;
pub mod primitives;
pub mod records;
pub mod result;
pub mod scan_result;
pub mod subrecord;
pub mod types;

pub use self::config::ReconstructionConfig;
pub use self::error::Error;
pub use self::orchestrator::reconstruct_all;
pub use self::result::SemanticReconstructionResult;
pub use self::scan_result::ScanResult;
pub use self::types::{EditorId, FormId};
