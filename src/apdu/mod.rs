//! APDU vocabulary for the SIM filesystem command set
//!
//! Only the small ISO 7816-4 subset needed to walk and provision a
//! SIM/USIM filesystem lives here: the instruction bytes, the
//! parameter conventions for SELECT and record access, and the
//! [`Response`] value a transport hands back.

mod response;
mod status;

pub use response::Response;
pub use status::SW;

/// Class byte for UICC (TS 102.221) commands.
pub const CLA_UICC: u8 = 0x00;

/// Instruction bytes used by the filesystem walker and writer.
pub mod ins {
    pub const SELECT: u8 = 0xA4;
    pub const READ_BINARY: u8 = 0xB0;
    pub const UPDATE_BINARY: u8 = 0xD6;
    pub const READ_RECORD: u8 = 0xB2;
    pub const UPDATE_RECORD: u8 = 0xDC;
    pub const CREATE_FILE: u8 = 0xE0;
    pub const GET_RESPONSE: u8 = 0xC0;
}

/// SELECT parameter conventions (TS 102.221 clause 11.1.1).
pub mod select {
    /// P1: select by 2-byte file identifier.
    pub const BY_FILE_ID: u8 = 0x00;
    /// P1: select by DF name (application AID).
    pub const BY_DF_NAME: u8 = 0x04;
    /// P2: request the FCP template in the response.
    pub const RETURN_FCP: u8 = 0x04;
}

/// P2 mode for READ RECORD / UPDATE RECORD: absolute record number in P1.
pub const RECORD_ABSOLUTE: u8 = 0x04;
