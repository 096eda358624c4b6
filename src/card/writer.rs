//! Profile replay
//!
//! Recreates previously captured files on a blank card: CREATE FILE
//! from the stored FCI, re-select, check that the card provisioned the
//! geometry the content needs, then update binary content or records.
//! Records that are entirely 0xFF are the erased state and are never
//! written.

use log::{debug, info, warn};

use crate::apdu::{ins, RECORD_ABSOLUTE, SW};
use crate::card::descriptor::{FileContent, FileDescriptor, FileId};
use crate::card::error::{FileError, StepError};
use crate::card::reader;
use crate::card::walker::{self, FailedFile, Selector, WalkError};
use crate::fci::{self, FileCharacteristics};
use crate::transport::SimTransport;

/// Largest body a single short UPDATE BINARY can carry.
const WRITE_CHUNK: usize = 255;

/// Outcome of replaying one directory's files.
///
/// `written` and `failed` partition the input descriptors in order.
#[derive(Debug, Default)]
pub struct WriteReport {
    pub written: Vec<FileId>,
    pub failed: Vec<FailedFile>,
}

impl WriteReport {
    pub fn total(&self) -> usize {
        self.written.len() + self.failed.len()
    }
}

/// Replay `files` under the directory named by `parent`.
///
/// The parent is selected once. Per-file failures are recorded and the
/// replay continues; a transport fault aborts. With `verify` set, each
/// written file is read back and compared.
pub fn replay(
    tp: &mut dyn SimTransport,
    parent: &Selector,
    files: &[FileDescriptor],
    verify: bool,
) -> Result<WriteReport, WalkError> {
    walker::select_parent(tp, parent)?;

    let mut report = WriteReport::default();
    for file in files {
        match write_file(tp, file, verify) {
            Ok(()) => report.written.push(file.id()),
            Err(StepError::File(error)) => {
                warn!("{}: {error}", file.id());
                report.failed.push(FailedFile {
                    id: file.id(),
                    error,
                });
            }
            Err(StepError::Transport(e)) => return Err(e.into()),
        }
    }

    info!(
        "replay finished: {} written, {} failed of {}",
        report.written.len(),
        report.failed.len(),
        files.len()
    );
    Ok(report)
}

/// CREATE FILE for a directory under `parent`. A card that already
/// carries the DF answers 6A89; that counts as provisioned.
pub fn create_directory(
    tp: &mut dyn SimTransport,
    parent: &Selector,
    fci: &[u8],
) -> Result<(), WalkError> {
    walker::select_parent(tp, parent)?;
    let resp = tp.send_apdu(ins::CREATE_FILE, 0x00, 0x00, fci)?;
    match resp.sw {
        SW::SUCCESS | SW::FILE_ALREADY_EXISTS => Ok(()),
        sw => Err(WalkError::DirectoryCreateFailed { sw }),
    }
}

fn write_file(
    tp: &mut dyn SimTransport,
    file: &FileDescriptor,
    verify: bool,
) -> Result<(), StepError> {
    let resp = tp.send_apdu(ins::CREATE_FILE, 0x00, 0x00, file.fci())?;
    if !matches!(resp.sw, SW::SUCCESS | SW::FILE_ALREADY_EXISTS) {
        return Err(FileError::WriteFailed { sw: resp.sw }.into());
    }

    // The card may have provisioned different geometry than the FCI
    // asked for, so classify what it actually created.
    let resp = walker::select_file(tp, file.id())?;
    walker::check_select(&resp)?;
    let destination = fci::classify(&resp.data)?;

    match file.content() {
        FileContent::Transparent(data) => {
            check_transparent_fit(&destination, data.len())?;
            write_transparent(tp, data)?;
            if verify {
                verify_transparent(tp, data)?;
            }
        }
        FileContent::LinearFixed(records) => {
            check_record_fit(&destination, records)?;
            let written = write_records(tp, records)?;
            if verify {
                verify_records(tp, records, &written)?;
            }
        }
        FileContent::Cyclic(_) => {
            // Cyclic record order depends on write history the card
            // keeps internally; replaying contents would scramble it.
            // The file itself is created above.
            warn!("{}: cyclic file created, content not replayed", file.id());
        }
    }

    debug!("wrote {}", file.id());
    Ok(())
}

fn check_transparent_fit(
    destination: &FileCharacteristics,
    content_len: usize,
) -> Result<(), FileError> {
    match *destination {
        FileCharacteristics::Transparent { size } if size >= content_len => Ok(()),
        FileCharacteristics::Transparent { size } => Err(FileError::GeometryMismatch(format!(
            "destination holds {size} bytes, content has {content_len}"
        ))),
        _ => Err(FileError::GeometryMismatch(
            "destination is not transparent".into(),
        )),
    }
}

fn check_record_fit(
    destination: &FileCharacteristics,
    records: &[Vec<u8>],
) -> Result<(), FileError> {
    match *destination {
        FileCharacteristics::LinearFixed {
            record_len,
            record_count,
        } => {
            // Check all records: hand-edited profiles can be ragged
            for (i, record) in records.iter().enumerate() {
                if record.len() != record_len as usize {
                    return Err(FileError::GeometryMismatch(format!(
                        "record {} is {} bytes, destination takes {record_len}",
                        i + 1,
                        record.len()
                    )));
                }
            }
            if (record_count as usize) < records.len() {
                return Err(FileError::GeometryMismatch(format!(
                    "destination holds {record_count} records, content has {}",
                    records.len()
                )));
            }
            Ok(())
        }
        _ => Err(FileError::GeometryMismatch(
            "destination is not linear fixed".into(),
        )),
    }
}

fn write_transparent(tp: &mut dyn SimTransport, data: &[u8]) -> Result<(), StepError> {
    let mut offset = 0usize;
    for chunk in data.chunks(WRITE_CHUNK) {
        let resp = tp.send_apdu(ins::UPDATE_BINARY, (offset >> 8) as u8, offset as u8, chunk)?;
        if !resp.is_success() {
            return Err(FileError::WriteFailed { sw: resp.sw }.into());
        }
        offset += chunk.len();
    }
    Ok(())
}

/// True for a record still in its erased state.
fn is_erased(record: &[u8]) -> bool {
    record.iter().all(|&b| b == 0xFF)
}

/// Update the non-erased records, index 1 first. Returns the indices
/// actually written.
fn write_records(tp: &mut dyn SimTransport, records: &[Vec<u8>]) -> Result<Vec<u8>, StepError> {
    let mut written = Vec::new();
    for (i, record) in records.iter().enumerate() {
        let index = (i + 1) as u8;
        if is_erased(record) {
            debug!("skipping erased record {index}");
            continue;
        }
        let resp = tp.send_apdu(ins::UPDATE_RECORD, index, RECORD_ABSOLUTE, record)?;
        if !resp.is_success() {
            return Err(FileError::WriteFailed { sw: resp.sw }.into());
        }
        written.push(index);
    }
    Ok(written)
}

fn verify_transparent(tp: &mut dyn SimTransport, data: &[u8]) -> Result<(), StepError> {
    let back = reader::read_transparent(tp, data.len())?;
    if back != data {
        return Err(FileError::VerifyMismatch { index: 0 }.into());
    }
    Ok(())
}

fn verify_records(
    tp: &mut dyn SimTransport,
    records: &[Vec<u8>],
    written: &[u8],
) -> Result<(), StepError> {
    for &index in written {
        let record = &records[index as usize - 1];
        let resp = tp.send_apdu_le(ins::READ_RECORD, index, RECORD_ABSOLUTE, record.len() as u8)?;
        if !resp.is_success() {
            return Err(FileError::ReadFailed { sw: resp.sw }.into());
        }
        if resp.data != *record {
            return Err(FileError::VerifyMismatch { index }.into());
        }
    }
    Ok(())
}
