//! File descriptors
//!
//! A [`FileDescriptor`] is the immutable result of selecting,
//! classifying and fully reading one elementary file. Content shape
//! and structural type cannot disagree: the structure is derived from
//! the content variant, so a transparent descriptor can never hold
//! records.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A 2-byte card file identifier (e.g. `6F38`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub u16);

impl FileId {
    /// The Master File, root of every card filesystem.
    pub const MF: FileId = FileId(0x3F00);
    /// DF.GSM per TS 51.011.
    pub const DF_GSM: FileId = FileId(0x7F20);
    /// DF.Telecom per TS 51.011.
    pub const DF_TELECOM: FileId = FileId(0x7F10);
    /// Alias for the currently active ADF per TS 102.221.
    pub const ADF: FileId = FileId(0x7FFF);

    /// Big-endian wire form, as carried in SELECT data.
    pub fn to_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid file identifier {0:?}, expected 4 hex characters")]
pub struct ParseFileIdError(String);

impl FromStr for FileId {
    type Err = ParseFileIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != 4 {
            return Err(ParseFileIdError(s.to_string()));
        }
        u16::from_str_radix(s, 16)
            .map(FileId)
            .map_err(|_| ParseFileIdError(s.to_string()))
    }
}

/// Structural type of an elementary file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStructure {
    Transparent,
    LinearFixed,
    Cyclic,
}

impl FileStructure {
    /// Token used in the persisted profile forms.
    pub fn as_str(self) -> &'static str {
        match self {
            FileStructure::Transparent => "transparent",
            FileStructure::LinearFixed => "linear",
            FileStructure::Cyclic => "cyclic",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown file structure {0:?}")]
pub struct ParseStructureError(String);

impl FromStr for FileStructure {
    type Err = ParseStructureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "transparent" => Ok(FileStructure::Transparent),
            "linear" => Ok(FileStructure::LinearFixed),
            "cyclic" => Ok(FileStructure::Cyclic),
            other => Err(ParseStructureError(other.to_string())),
        }
    }
}

impl fmt::Display for FileStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File content, shaped by the structural type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    /// One opaque byte string.
    Transparent(Vec<u8>),
    /// Ordered fixed-length records, index 1 first.
    LinearFixed(Vec<Vec<u8>>),
    /// Ordered fixed-length records of a cyclic file.
    Cyclic(Vec<Vec<u8>>),
}

impl FileContent {
    pub fn structure(&self) -> FileStructure {
        match self {
            FileContent::Transparent(_) => FileStructure::Transparent,
            FileContent::LinearFixed(_) => FileStructure::LinearFixed,
            FileContent::Cyclic(_) => FileStructure::Cyclic,
        }
    }

    /// Record list for record-structured content.
    pub fn records(&self) -> Option<&[Vec<u8>]> {
        match self {
            FileContent::Transparent(_) => None,
            FileContent::LinearFixed(r) | FileContent::Cyclic(r) => Some(r),
        }
    }
}

/// A fully read elementary file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    id: FileId,
    fci: Vec<u8>,
    content: FileContent,
}

impl FileDescriptor {
    pub fn new(id: FileId, fci: Vec<u8>, content: FileContent) -> Self {
        Self { id, fci, content }
    }

    pub fn id(&self) -> FileId {
        self.id
    }

    /// Raw FCI bytes from the SELECT response.
    pub fn fci(&self) -> &[u8] {
        &self.fci
    }

    pub fn structure(&self) -> FileStructure {
        self.content.structure()
    }

    pub fn content(&self) -> &FileContent {
        &self.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_id_display_and_parse() {
        let id: FileId = "6f38".parse().unwrap();
        assert_eq!(id, FileId(0x6F38));
        assert_eq!(id.to_string(), "6F38");
        assert_eq!(id.to_bytes(), [0x6F, 0x38]);
    }

    #[test]
    fn test_file_id_rejects_garbage() {
        assert!("6F3".parse::<FileId>().is_err());
        assert!("6F388".parse::<FileId>().is_err());
        assert!("xyzw".parse::<FileId>().is_err());
    }

    #[test]
    fn test_structure_round_trip() {
        for s in [
            FileStructure::Transparent,
            FileStructure::LinearFixed,
            FileStructure::Cyclic,
        ] {
            assert_eq!(s.as_str().parse::<FileStructure>().unwrap(), s);
        }
        assert!("records".parse::<FileStructure>().is_err());
    }

    #[test]
    fn test_content_shape_matches_structure() {
        let t = FileContent::Transparent(vec![1, 2, 3]);
        assert_eq!(t.structure(), FileStructure::Transparent);
        assert!(t.records().is_none());

        let l = FileContent::LinearFixed(vec![vec![1], vec![2]]);
        assert_eq!(l.structure(), FileStructure::LinearFixed);
        assert_eq!(l.records().unwrap().len(), 2);
    }
}
