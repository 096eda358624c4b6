//! Per-file error taxonomy
//!
//! Every condition here is scoped to a single file: the walker records
//! it against the identifier and moves on. Only transport faults abort
//! a walk, and those travel separately as
//! [`TransportError`](crate::transport::TransportError).

use thiserror::Error;

use crate::apdu::SW;
use crate::fci::ClassifyError;
use crate::transport::TransportError;

/// Why one file could not be read or written.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FileError {
    /// SELECT answered 6A82.
    #[error("file not found")]
    NotFound,

    /// SELECT or read answered 6982. CHV verification is never
    /// attempted automatically; unlocking the card is the caller's
    /// decision.
    #[error("access condition not satisfied")]
    AccessDenied,

    /// SELECT answered something other than 9000/6A82/6982.
    #[error("select failed: {} ({sw:04x})", SW::describe(*.sw))]
    SelectFailed { sw: u16 },

    /// The FCI did not describe a structure we recognize.
    #[error("unrecognized file structure: {0}")]
    UnrecognizedStructure(#[from] ClassifyError),

    /// A binary or record read failed after a successful SELECT. Any
    /// partially accumulated content is discarded.
    #[error("read failed: {} ({sw:04x})", SW::describe(*.sw))]
    ReadFailed { sw: u16 },

    /// The card answered 9000 but returned fewer bytes than the FCI
    /// declared. Partial content is discarded.
    #[error("short read at offset {offset}: wanted {wanted} bytes, got {got}")]
    ShortRead {
        offset: usize,
        wanted: usize,
        got: usize,
    },

    /// CREATE FILE, re-SELECT or an update failed during replay.
    #[error("write failed: {} ({sw:04x})", SW::describe(*.sw))]
    WriteFailed { sw: u16 },

    /// The re-created destination file does not match the source
    /// descriptor's geometry. Writing would truncate or pad, so this
    /// is a hard per-file error.
    #[error("destination geometry mismatch: {0}")]
    GeometryMismatch(String),

    /// A verification read-back after UPDATE RECORD returned
    /// different bytes than were written.
    #[error("record {index} verification mismatch")]
    VerifyMismatch { index: u8 },
}

/// Outcome of processing one file: either a per-file condition the
/// walk records and survives, or a transport fault that kills it.
#[derive(Debug, Error)]
pub(crate) enum StepError {
    #[error(transparent)]
    File(#[from] FileError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl From<ClassifyError> for StepError {
    fn from(e: ClassifyError) -> Self {
        StepError::File(FileError::UnrecognizedStructure(e))
    }
}
