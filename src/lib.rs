//! simprof - SIM/USIM filesystem profile reader/writer
//!
//! This crate walks the filesystem of a SIM/USIM card (Master File,
//! Dedicated Files, Elementary Files) over the ISO 7816-4 APDU command
//! set, classifies each file from its File Control Information, reads
//! (or replays) the file content with the access pattern matching its
//! structure, and persists the result as a card profile that can be
//! written back to a blank card.
//!
//! The card session itself is reached through the [`transport`]
//! capability trait; serial, OsmocomBB socket and (optionally) PC/SC
//! backends are provided.

pub mod apdu;
pub mod card;
pub mod fci;
pub mod profile;
pub mod tlv;
pub mod transport;

pub use card::descriptor::{FileContent, FileDescriptor, FileId, FileStructure};
pub use card::walker::{DirectoryResult, Selector};
pub use profile::Profile;
