//! Card filesystem engine
//!
//! The directory walker drives SELECT over an ordered list of file
//! identifiers, classifies each file from its FCI, and reads or
//! replays content with the access pattern its structure requires.

pub mod descriptor;
pub mod error;
pub mod provision;
pub mod reader;
pub mod walker;
pub mod writer;

pub use descriptor::{FileContent, FileDescriptor, FileId, FileStructure};
pub use error::FileError;
pub use walker::{walk, DirectoryResult, FailedFile, Selector, WalkError};
pub use writer::{create_directory, replay, WriteReport};
