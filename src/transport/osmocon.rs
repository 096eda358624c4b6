//! OsmocomBB/Calypso socket card link
//!
//! An OsmocomBB-flashed Calypso phone (e.g. Motorola C1XX) can act as
//! a SIM reader; the layer1 firmware bridge exposes the card over a
//! Unix domain socket. Frames are length-prefixed (2 bytes big-endian)
//! raw APDUs, and each response frame is body plus SW1/SW2.

use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::Path;

use log::debug;

use crate::apdu::Response;
use crate::transport::{self, SimTransport, TransportError};

/// Card link through an OsmocomBB layer1 socket.
pub struct OsmoconSimLink {
    stream: UnixStream,
    cla: u8,
}

impl OsmoconSimLink {
    /// Connect to the layer1 bridge socket.
    pub fn connect<P: AsRef<Path>>(sock_path: P, cla: u8) -> Result<Self, TransportError> {
        let stream = UnixStream::connect(sock_path)?;
        Ok(Self { stream, cla })
    }

    fn exchange(&mut self, frame: &[u8]) -> Result<Response, TransportError> {
        let len = (frame.len() as u16).to_be_bytes();
        self.stream.write_all(&len)?;
        self.stream.write_all(frame)?;

        let mut len_buf = [0u8; 2];
        self.stream.read_exact(&mut len_buf)?;
        let resp_len = u16::from_be_bytes(len_buf) as usize;

        let mut raw = vec![0u8; resp_len];
        self.stream.read_exact(&mut raw)?;
        debug!("osmocon exchange: {} -> {}", hex::encode(frame), hex::encode(&raw));

        Response::from_raw(&raw).ok_or(TransportError::ShortResponse(resp_len))
    }
}

impl SimTransport for OsmoconSimLink {
    fn send_apdu(
        &mut self,
        ins: u8,
        p1: u8,
        p2: u8,
        data: &[u8],
    ) -> Result<Response, TransportError> {
        let frame = transport::tpdu_with_data(self.cla, ins, p1, p2, data);
        self.exchange(&frame)
    }

    fn send_apdu_le(
        &mut self,
        ins: u8,
        p1: u8,
        p2: u8,
        le: u8,
    ) -> Result<Response, TransportError> {
        let frame = transport::tpdu_with_le(self.cla, ins, p1, p2, le);
        self.exchange(&frame)
    }
}
