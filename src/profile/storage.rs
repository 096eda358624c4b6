//! Profile persistence
//!
//! Each section is stored twice under the profile directory: a
//! versioned JSON document (`mf.json`) as the canonical form and the
//! text form (`mf.txt`) next to it. Loading prefers the JSON file and
//! falls back to the text file; a section with neither is empty.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::{text, FileEntry, Profile, ProfileError, Section, PROFILE_VERSION};

/// On-disk shape of one section's JSON file.
#[derive(Debug, Serialize, Deserialize)]
struct SectionDoc {
    version: u32,
    files: Vec<FileEntry>,
}

pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn json_path(&self, section: Section) -> PathBuf {
        self.dir.join(format!("{section}.json"))
    }

    fn text_path(&self, section: Section) -> PathBuf {
        self.dir.join(format!("{section}.txt"))
    }

    /// Write every section of `profile`, creating the directory if
    /// needed. Empty sections are written too, so a later load sees
    /// the capture as a whole.
    pub fn save(&self, profile: &Profile) -> Result<(), ProfileError> {
        fs::create_dir_all(&self.dir)?;
        for section in Section::ALL {
            let entries = profile.section(section);
            let doc = SectionDoc {
                version: PROFILE_VERSION,
                files: entries.to_vec(),
            };
            fs::write(self.json_path(section), serde_json::to_string_pretty(&doc)?)?;
            fs::write(self.text_path(section), text::render(entries))?;
            debug!("saved {} files to {}.json", entries.len(), section);
        }
        info!("profile saved to {:?}", self.dir);
        Ok(())
    }

    pub fn load(&self) -> Result<Profile, ProfileError> {
        let mut profile = Profile::default();
        for section in Section::ALL {
            *profile.section_mut(section) = self.load_section(section)?;
        }
        Ok(profile)
    }

    fn load_section(&self, section: Section) -> Result<Vec<FileEntry>, ProfileError> {
        let json_path = self.json_path(section);
        if json_path.exists() {
            let doc: SectionDoc = serde_json::from_str(&fs::read_to_string(&json_path)?)?;
            if doc.version != PROFILE_VERSION {
                return Err(ProfileError::UnsupportedVersion(doc.version));
            }
            return Ok(doc.files);
        }

        let text_path = self.text_path(section);
        if text_path.exists() {
            debug!("no {section}.json, falling back to {section}.txt");
            return text::parse(&fs::read_to_string(&text_path)?);
        }

        warn!("no stored data for section {section}");
        Ok(Vec::new())
    }
}
