//! FCI classification
//!
//! A successful SELECT returns File Control Information: an FCP
//! template whose tag 82 data object carries the file descriptor byte
//! and, for record-structured files, the record geometry. Tag 80
//! carries the declared size of transparent files. [`classify`] turns
//! that raw byte string into a structured [`FileCharacteristics`] so
//! the reader knows which access pattern to use.

use thiserror::Error;

use crate::tlv::{self, TlvError};

/// FCP template tag wrapping the SELECT response body.
pub const TAG_FCP_TEMPLATE: u32 = 0x62;
/// File descriptor data object.
pub const TAG_FILE_DESCRIPTOR: u32 = 0x82;
/// File size data object (transparent files).
pub const TAG_FILE_SIZE: u32 = 0x80;

const DESC_TRANSPARENT: u8 = 0x41;
const DESC_LINEAR_FIXED: u8 = 0x42;
const DESC_CYCLIC: u8 = 0x46;

/// Why an FCI byte string could not be classified.
///
/// All variants map to the per-file "unrecognized file structure"
/// condition: the walker records the file as failed and moves on.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("malformed FCI: {0}")]
    Tlv(#[from] TlvError),

    #[error("FCI has no file descriptor (tag 82)")]
    MissingFileDescriptor,

    #[error("file descriptor is empty")]
    EmptyFileDescriptor,

    #[error("unknown file descriptor byte {0:#04x}")]
    UnknownDescriptorByte(u8),

    #[error("file descriptor too short for record geometry")]
    TruncatedGeometry,

    #[error("record length {0} does not fit a short read")]
    RecordLengthTooLarge(u16),

    #[error("transparent file has no size (tag 80)")]
    MissingFileSize,

    #[error("file size field is {0} bytes long")]
    OversizedFileSize(usize),
}

/// Structural type and geometry extracted from an FCI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCharacteristics {
    /// Byte-addressed file of `size` bytes.
    Transparent { size: usize },
    /// Fixed-length records, read and written by 1-based index.
    LinearFixed { record_len: u8, record_count: u8 },
    /// Fixed-length records in a ring; read like linear-fixed.
    Cyclic { record_len: u8, record_count: u8 },
}

/// Classify a raw FCI byte string.
///
/// Accepts either the full SELECT response (outer tag 62 template) or
/// the bare list of FCP data objects.
pub fn classify(fci: &[u8]) -> Result<FileCharacteristics, ClassifyError> {
    let mut tlvs = tlv::read_all(fci)?;

    // Unwrap the FCP template when the card returned one
    if let [only] = tlvs.as_slice() {
        if only.tag == TAG_FCP_TEMPLATE {
            tlvs = tlv::read_all(&only.value)?;
        }
    }

    let desc = tlv::find(&tlvs, TAG_FILE_DESCRIPTOR)
        .ok_or(ClassifyError::MissingFileDescriptor)?;
    let desc_byte = *desc
        .value
        .first()
        .ok_or(ClassifyError::EmptyFileDescriptor)?;

    match desc_byte {
        DESC_TRANSPARENT => {
            let size_tlv =
                tlv::find(&tlvs, TAG_FILE_SIZE).ok_or(ClassifyError::MissingFileSize)?;
            Ok(FileCharacteristics::Transparent {
                size: decode_size(&size_tlv.value)?,
            })
        }
        DESC_LINEAR_FIXED | DESC_CYCLIC => {
            // Descriptor layout: type, data coding byte, record length
            // (2 bytes big-endian), record count
            if desc.value.len() < 5 {
                return Err(ClassifyError::TruncatedGeometry);
            }
            let record_len = ((desc.value[2] as u16) << 8) | desc.value[3] as u16;
            if record_len > 0xFF {
                return Err(ClassifyError::RecordLengthTooLarge(record_len));
            }
            let record_len = record_len as u8;
            let record_count = desc.value[4];

            if desc_byte == DESC_LINEAR_FIXED {
                Ok(FileCharacteristics::LinearFixed {
                    record_len,
                    record_count,
                })
            } else {
                Ok(FileCharacteristics::Cyclic {
                    record_len,
                    record_count,
                })
            }
        }
        other => Err(ClassifyError::UnknownDescriptorByte(other)),
    }
}

fn decode_size(value: &[u8]) -> Result<usize, ClassifyError> {
    if value.len() > 4 {
        return Err(ClassifyError::OversizedFileSize(value.len()));
    }
    Ok(value.iter().fold(0usize, |acc, &b| (acc << 8) | b as usize))
}
