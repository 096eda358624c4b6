//! Record and byte reads
//!
//! Projects the selected file's card state into memory. Transparent
//! files are read with READ BINARY, chunked at 256 bytes with the
//! offset in P1/P2; record files with one READ RECORD per index,
//! ascending from 1. A failed read discards everything accumulated
//! for the file.

use crate::apdu::{ins, RECORD_ABSOLUTE};
use crate::card::error::{FileError, StepError};
use crate::transport::SimTransport;

/// Largest body a single short READ BINARY can return (Le=0).
const READ_CHUNK: usize = 256;

/// Read a transparent file of `size` declared bytes from offset 0.
pub(crate) fn read_transparent(
    tp: &mut dyn SimTransport,
    size: usize,
) -> Result<Vec<u8>, StepError> {
    let mut content = Vec::with_capacity(size);
    let mut offset = 0usize;

    while offset < size {
        let want = (size - offset).min(READ_CHUNK);
        let le = if want == READ_CHUNK { 0 } else { want as u8 };
        let resp = tp.send_apdu_le(ins::READ_BINARY, (offset >> 8) as u8, offset as u8, le)?;
        if !resp.is_success() {
            return Err(FileError::ReadFailed { sw: resp.sw }.into());
        }
        if resp.data.len() != want {
            return Err(FileError::ShortRead {
                offset,
                wanted: want,
                got: resp.data.len(),
            }
            .into());
        }
        content.extend_from_slice(&resp.data);
        offset += want;
    }

    Ok(content)
}

/// Read `record_count` records of `record_len` bytes, index 1 first.
///
/// Any non-success status word aborts the remaining reads; the file
/// is failed as a whole rather than stored partially populated.
pub(crate) fn read_records(
    tp: &mut dyn SimTransport,
    record_count: u8,
    record_len: u8,
) -> Result<Vec<Vec<u8>>, StepError> {
    let mut records = Vec::with_capacity(record_count as usize);

    for index in 1..=record_count {
        let resp = tp.send_apdu_le(ins::READ_RECORD, index, RECORD_ABSOLUTE, record_len)?;
        if !resp.is_success() {
            return Err(FileError::ReadFailed { sw: resp.sw }.into());
        }
        records.push(resp.data);
    }

    Ok(records)
}
