//! Captured card profiles
//!
//! A profile is the portable form of everything a walk read: for each
//! file its identifier, structural type, raw FCI and content, grouped
//! into the four standard sections. The canonical persisted form is
//! versioned JSON with hex-string payloads; a line-oriented text form
//! exists alongside it for inspection and hand edits, and both forms
//! round-trip exactly.

pub mod storage;
pub mod text;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::card::descriptor::{FileContent, FileDescriptor, FileId, FileStructure};

/// Bumped when the persisted layout changes shape.
pub const PROFILE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("bad profile JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("profile version {0} is not supported")]
    UnsupportedVersion(u32),

    #[error("bad file identifier {0:?}")]
    BadFileId(String),

    #[error("unknown file type {0:?}")]
    BadStructure(String),

    #[error("bad hex in {field} of {name}: {source}")]
    BadHex {
        name: String,
        field: &'static str,
        source: hex::FromHexError,
    },

    #[error("file {0}: type and data shape disagree")]
    ShapeMismatch(String),

    #[error("text profile line {line}: {message}")]
    Text { line: usize, message: String },
}

/// The four directories a profile covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Mf,
    Gsm,
    Telecom,
    Adf,
}

impl Section {
    pub const ALL: [Section; 4] = [Section::Mf, Section::Gsm, Section::Telecom, Section::Adf];

    /// Stem of the section's files on disk.
    pub fn as_str(self) -> &'static str {
        match self {
            Section::Mf => "mf",
            Section::Gsm => "gsm",
            Section::Telecom => "telecom",
            Section::Adf => "adf",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content payload of one profile entry. Untagged: a transparent file
/// persists as one hex string, record files as an array of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryData {
    Transparent(String),
    Records(Vec<String>),
}

/// One file as persisted: everything hex-encoded, lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub structure: String,
    pub fci: String,
    pub data: EntryData,
}

impl FileEntry {
    pub fn from_descriptor(file: &FileDescriptor) -> Self {
        let data = match file.content() {
            FileContent::Transparent(bytes) => EntryData::Transparent(hex::encode(bytes)),
            FileContent::LinearFixed(records) | FileContent::Cyclic(records) => {
                EntryData::Records(records.iter().map(hex::encode).collect())
            }
        };
        FileEntry {
            name: file.id().to_string(),
            structure: file.structure().as_str().to_string(),
            fci: hex::encode(file.fci()),
            data,
        }
    }

    pub fn to_descriptor(&self) -> Result<FileDescriptor, ProfileError> {
        let id: FileId = self
            .name
            .parse()
            .map_err(|_| ProfileError::BadFileId(self.name.clone()))?;
        let structure: FileStructure = self
            .structure
            .parse()
            .map_err(|_| ProfileError::BadStructure(self.structure.clone()))?;
        let fci = self.decode_hex(&self.fci, "fci")?;

        let content = match (&self.data, structure) {
            (EntryData::Transparent(s), FileStructure::Transparent) => {
                FileContent::Transparent(self.decode_hex(s, "data")?)
            }
            (EntryData::Records(records), FileStructure::LinearFixed) => FileContent::LinearFixed(
                records
                    .iter()
                    .map(|r| self.decode_hex(r, "data"))
                    .collect::<Result<_, _>>()?,
            ),
            (EntryData::Records(records), FileStructure::Cyclic) => FileContent::Cyclic(
                records
                    .iter()
                    .map(|r| self.decode_hex(r, "data"))
                    .collect::<Result<_, _>>()?,
            ),
            _ => return Err(ProfileError::ShapeMismatch(self.name.clone())),
        };

        Ok(FileDescriptor::new(id, fci, content))
    }

    fn decode_hex(&self, s: &str, field: &'static str) -> Result<Vec<u8>, ProfileError> {
        hex::decode(s).map_err(|source| ProfileError::BadHex {
            name: self.name.clone(),
            field,
            source,
        })
    }
}

/// A full capture: one entry list per section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub mf: Vec<FileEntry>,
    pub gsm: Vec<FileEntry>,
    pub telecom: Vec<FileEntry>,
    pub adf: Vec<FileEntry>,
}

impl Profile {
    pub fn section(&self, section: Section) -> &[FileEntry] {
        match section {
            Section::Mf => &self.mf,
            Section::Gsm => &self.gsm,
            Section::Telecom => &self.telecom,
            Section::Adf => &self.adf,
        }
    }

    pub fn section_mut(&mut self, section: Section) -> &mut Vec<FileEntry> {
        match section {
            Section::Mf => &mut self.mf,
            Section::Gsm => &mut self.gsm,
            Section::Telecom => &mut self.telecom,
            Section::Adf => &mut self.adf,
        }
    }

    /// Record the files a walk produced into `section`.
    pub fn set_section(&mut self, section: Section, files: &[FileDescriptor]) {
        *self.section_mut(section) = files.iter().map(FileEntry::from_descriptor).collect();
    }

    /// Decode a section back into descriptors ready to replay.
    pub fn descriptors(&self, section: Section) -> Result<Vec<FileDescriptor>, ProfileError> {
        self.section(section)
            .iter()
            .map(FileEntry::to_descriptor)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        Section::ALL.iter().all(|&s| self.section(s).is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transparent_file() -> FileDescriptor {
        FileDescriptor::new(
            FileId(0x6F38),
            vec![0x62, 0x04, 0x82, 0x02, 0x41, 0x21],
            FileContent::Transparent(vec![0x00, 0x10, 0xFF]),
        )
    }

    fn linear_file() -> FileDescriptor {
        FileDescriptor::new(
            FileId(0x6F3B),
            vec![0x62, 0x04, 0x82, 0x02, 0x42, 0x21],
            FileContent::LinearFixed(vec![vec![0x01, 0x02], vec![0xFF, 0xFF]]),
        )
    }

    #[test]
    fn test_entry_round_trip() {
        for file in [transparent_file(), linear_file()] {
            let entry = FileEntry::from_descriptor(&file);
            assert_eq!(entry.to_descriptor().unwrap(), file);
        }
    }

    #[test]
    fn test_entry_hex_is_lowercase() {
        let entry = FileEntry::from_descriptor(&transparent_file());
        assert_eq!(entry.fci, "620482024121");
        assert_eq!(entry.data, EntryData::Transparent("0010ff".into()));
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let entry = FileEntry {
            name: "6F38".into(),
            structure: "transparent".into(),
            fci: "6200".into(),
            data: EntryData::Records(vec!["0102".into()]),
        };
        assert!(matches!(
            entry.to_descriptor(),
            Err(ProfileError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_bad_hex_names_the_file() {
        let entry = FileEntry {
            name: "6F38".into(),
            structure: "transparent".into(),
            fci: "zz".into(),
            data: EntryData::Transparent(String::new()),
        };
        match entry.to_descriptor() {
            Err(ProfileError::BadHex { name, field, .. }) => {
                assert_eq!(name, "6F38");
                assert_eq!(field, "fci");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_json_entry_shape() {
        let entry = FileEntry::from_descriptor(&linear_file());
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["name"], "6F3B");
        assert_eq!(json["type"], "linear");
        assert!(json["data"].is_array());

        let back: FileEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_profile_sections() {
        let mut profile = Profile::default();
        assert!(profile.is_empty());
        profile.set_section(Section::Gsm, &[transparent_file()]);
        assert!(!profile.is_empty());
        assert_eq!(profile.descriptors(Section::Gsm).unwrap().len(), 1);
        assert!(profile.descriptors(Section::Mf).unwrap().is_empty());
    }
}
