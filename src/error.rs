use std::{error, fmt};

/// Errors surfaced by the low-level binary-reading layer (primitives,
/// subrecord iteration, heuristic parsers).
///
/// None of these ever escape [`crate::orchestrator::reconstruct_all`]: every
/// call site that can produce one catches it, logs a one-line summary
/// through the [`crate::capabilities::Logger`] sink, and falls back to the
/// next-best data source (see spec §4.9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A fixed-width read ran past the end of the slice.
    ShortBuffer,
    /// A subrecord declared a length that does not fit in the remaining
    /// buffer.
    InvalidSubrecordLength,
    /// A NUL-terminated string read found no NUL and truncated at the
    /// end of the buffer, or decoding produced invalid UTF-8.
    InvalidUtf8,
    /// A heuristic validator (ACBS, CTDA) rejected the payload under its
    /// range policy.
    ValidationRejected,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ShortBuffer => "short buffer",
            Self::InvalidSubrecordLength => "invalid subrecord length",
            Self::InvalidUtf8 => "invalid or truncated utf-8 string",
            Self::ValidationRejected => "heuristic validation rejected payload",
        })
    }
}

impl error::Error for Error {}
