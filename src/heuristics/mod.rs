//! Heuristic subrecord parsers (spec §4.2).
//!
//! `ACBS` and `CTDA` subrecords sometimes turn up in free memory without
//! their parent main record's 24-byte header — the accessor has nothing to
//! anchor a normal per-type walk to. These parsers scan a standalone
//! 6-byte-header-plus-payload window, try both endiannesses, and apply a
//! range policy to reject values that are syntactically well-formed but
//! semantically implausible (garbage interleaving).

pub mod acbs;
pub mod ctda;

pub use acbs::{parse_acbs, Acbs};
pub use ctda::{parse_ctda, Ctda};
