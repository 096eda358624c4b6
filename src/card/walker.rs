//! Directory walker
//!
//! Selects a parent directory once, then visits an ordered list of
//! child identifiers: SELECT, classify the FCI, read the content with
//! the structure-appropriate pattern. Every per-file condition is
//! recorded against its identifier and the walk continues; only a
//! transport fault aborts.

use log::{debug, info, warn};
use thiserror::Error;

use crate::apdu::{ins, select, Response, SW};
use crate::card::descriptor::{FileContent, FileDescriptor, FileId};
use crate::card::error::{FileError, StepError};
use crate::card::reader;
use crate::fci::{self, FileCharacteristics};
use crate::transport::{SimTransport, TransportError};

/// How to select the parent directory of a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// The Master File.
    Mf,
    /// One file identifier, relative to the current directory.
    Id(FileId),
    /// A chain of identifiers selected in sequence (absolute path when
    /// it starts at the MF).
    Path(Vec<FileId>),
    /// An application DF, selected by AID.
    Aid(Vec<u8>),
}

/// A file the walk could not read, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedFile {
    pub id: FileId,
    pub error: FileError,
}

/// Outcome of one directory walk.
///
/// `succeeded` and `failed` partition the requested identifiers:
/// every identifier lands in exactly one of the two, in request order.
#[derive(Debug, Default)]
pub struct DirectoryResult {
    pub succeeded: Vec<FileDescriptor>,
    pub failed: Vec<FailedFile>,
}

impl DirectoryResult {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

/// A fault that aborts the walk as a whole.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The parent directory itself could not be selected; nothing
    /// under it is reachable.
    #[error("parent select failed: {} ({sw:04x})", SW::describe(*.sw))]
    ParentSelectFailed { sw: u16 },

    /// CREATE FILE for a directory failed; nothing can be replayed
    /// under it.
    #[error("directory create failed: {} ({sw:04x})", SW::describe(*.sw))]
    DirectoryCreateFailed { sw: u16 },
}

/// Select a file or directory according to `selector`.
pub(crate) fn select_parent(
    tp: &mut dyn SimTransport,
    selector: &Selector,
) -> Result<(), WalkError> {
    match selector {
        Selector::Mf => select_step(tp, FileId::MF),
        Selector::Id(id) => select_step(tp, *id),
        Selector::Path(ids) => {
            for id in ids {
                select_step(tp, *id)?;
            }
            Ok(())
        }
        Selector::Aid(aid) => {
            let resp = tp.send_apdu(ins::SELECT, select::BY_DF_NAME, select::RETURN_FCP, aid)?;
            if resp.is_success() {
                Ok(())
            } else {
                Err(WalkError::ParentSelectFailed { sw: resp.sw })
            }
        }
    }
}

fn select_step(tp: &mut dyn SimTransport, id: FileId) -> Result<(), WalkError> {
    let resp = select_file(tp, id)?;
    if resp.is_success() {
        Ok(())
    } else {
        Err(WalkError::ParentSelectFailed { sw: resp.sw })
    }
}

/// SELECT by file identifier, requesting the FCP template back.
pub(crate) fn select_file(
    tp: &mut dyn SimTransport,
    id: FileId,
) -> Result<Response, TransportError> {
    tp.send_apdu(
        ins::SELECT,
        select::BY_FILE_ID,
        select::RETURN_FCP,
        &id.to_bytes(),
    )
}

/// Map a SELECT status word onto the per-file taxonomy.
pub(crate) fn check_select(resp: &Response) -> Result<(), FileError> {
    match resp.sw {
        SW::SUCCESS => Ok(()),
        SW::FILE_NOT_FOUND => Err(FileError::NotFound),
        SW::SECURITY_STATUS_NOT_SATISFIED => Err(FileError::AccessDenied),
        sw => Err(FileError::SelectFailed { sw }),
    }
}

/// Select, classify and fully read one file.
fn process_file(tp: &mut dyn SimTransport, id: FileId) -> Result<FileDescriptor, StepError> {
    let resp = select_file(tp, id)?;
    check_select(&resp)?;
    let fci = resp.data;

    let content = match fci::classify(&fci)? {
        FileCharacteristics::Transparent { size } => {
            FileContent::Transparent(reader::read_transparent(tp, size)?)
        }
        FileCharacteristics::LinearFixed {
            record_len,
            record_count,
        } => FileContent::LinearFixed(reader::read_records(tp, record_count, record_len)?),
        FileCharacteristics::Cyclic {
            record_len,
            record_count,
        } => FileContent::Cyclic(reader::read_records(tp, record_count, record_len)?),
    };

    debug!("read {id}: {}", content.structure());
    Ok(FileDescriptor::new(id, fci, content))
}

/// Walk `ids` under the directory named by `parent`, accumulating
/// into `result`.
///
/// The parent is selected exactly once; each identifier is then
/// selected relative to it, in the given order with no deduplication.
/// On a transport fault the walk aborts, but everything already pushed
/// into `result` stays there, so the caller keeps the files completed
/// before the fault.
pub fn walk(
    tp: &mut dyn SimTransport,
    parent: &Selector,
    ids: &[FileId],
    result: &mut DirectoryResult,
) -> Result<(), WalkError> {
    select_parent(tp, parent)?;

    for &id in ids {
        match process_file(tp, id) {
            Ok(descriptor) => result.succeeded.push(descriptor),
            Err(StepError::File(error)) => {
                warn!("{id}: {error}");
                result.failed.push(FailedFile { id, error });
            }
            Err(StepError::Transport(e)) => return Err(e.into()),
        }
    }

    info!(
        "walk finished: {} read, {} failed of {}",
        result.succeeded.len(),
        result.failed.len(),
        ids.len()
    );
    Ok(())
}
