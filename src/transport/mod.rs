//! Card transport capability
//!
//! The filesystem engine never builds raw frames; it hands a transport
//! an instruction byte, two parameters and a data payload and gets a
//! [`Response`] back. Three backends are provided: a serial T=0 link,
//! an OsmocomBB/Calypso socket link, and (behind the `pcsc` feature) a
//! PC/SC reader.
//!
//! A card session is half-duplex with one command in flight, so the
//! trait takes `&mut self` and implementations are strictly blocking.
//! The transport must be held exclusively for a whole walk or write
//! pass.

pub mod osmocon;
pub mod serial;

#[cfg(feature = "pcsc")]
pub mod pcsc;

#[cfg(test)]
pub(crate) mod mock;

use std::io;

use thiserror::Error;

use crate::apdu::Response;

/// A fault in the card session itself.
///
/// Unlike per-file status word conditions, a transport error leaves
/// the session state unknown and aborts the walk in progress.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[cfg(feature = "pcsc")]
    #[error("PC/SC error: {0}")]
    Pcsc(#[from] ::pcsc::Error),

    #[cfg(feature = "pcsc")]
    #[error("no PC/SC reader at index {0}")]
    NoSuchReader(usize),

    #[error("response too short to carry a status word ({0} bytes)")]
    ShortResponse(usize),

    #[error("unexpected procedure byte {0:#04x}")]
    BadProcedureByte(u8),

    #[error("card did not answer to reset")]
    NoAnswerToReset,
}

/// Blocking command channel to one smart card.
pub trait SimTransport {
    /// Send a command carrying `data`, returning body and status word.
    fn send_apdu(
        &mut self,
        ins: u8,
        p1: u8,
        p2: u8,
        data: &[u8],
    ) -> Result<Response, TransportError>;

    /// Send a command expecting `le` response bytes (0 means 256).
    ///
    /// Used for binary and record reads, where the card itself reports
    /// the response length.
    fn send_apdu_le(&mut self, ins: u8, p1: u8, p2: u8, le: u8)
        -> Result<Response, TransportError>;
}

/// Build a case-3 T=0 TPDU: header plus outgoing data, P3 = Lc.
pub(crate) fn tpdu_with_data(cla: u8, ins: u8, p1: u8, p2: u8, data: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(5 + data.len());
    frame.extend_from_slice(&[cla, ins, p1, p2, data.len() as u8]);
    frame.extend_from_slice(data);
    frame
}

/// Build a case-2 T=0 TPDU: header only, P3 = Le.
pub(crate) fn tpdu_with_le(cla: u8, ins: u8, p1: u8, p2: u8, le: u8) -> [u8; 5] {
    [cla, ins, p1, p2, le]
}
