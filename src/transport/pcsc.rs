//! PC/SC card link
//!
//! Reaches the card through a PC/SC reader slot via the `pcsc` crate.
//! Selected by reader index; the connection is shared-mode with any
//! protocol the reader negotiates. 61xx/6Cxx response chaining is
//! handled here since PC/SC hands back raw status words.

use log::{debug, info};
use pcsc::{Card, Context, Protocols, Scope, ShareMode};

use crate::apdu::{ins, Response, SW};
use crate::transport::{self, SimTransport, TransportError};

const RECV_BUFFER_SIZE: usize = 258;

/// Card link through a PC/SC reader.
pub struct PcscSimLink {
    card: Card,
    cla: u8,
}

impl PcscSimLink {
    /// Connect to the PC/SC reader at `index`.
    pub fn open(index: usize, cla: u8) -> Result<Self, TransportError> {
        let ctx = Context::establish(Scope::User)?;
        let mut readers_buf = [0u8; 2048];
        let reader = ctx
            .list_readers(&mut readers_buf)?
            .nth(index)
            .ok_or(TransportError::NoSuchReader(index))?
            .to_owned();
        info!("using PC/SC reader {}", reader.to_string_lossy());

        let card = ctx.connect(&reader, ShareMode::Shared, Protocols::ANY)?;
        Ok(Self { card, cla })
    }

    fn transmit(&mut self, frame: &[u8]) -> Result<Response, TransportError> {
        let mut recv = [0u8; RECV_BUFFER_SIZE];
        let raw = self.card.transmit(frame, &mut recv)?;
        debug!("pcsc exchange: {} -> {}", hex::encode(frame), hex::encode(raw));
        Response::from_raw(raw).ok_or(TransportError::ShortResponse(raw.len()))
    }

    /// Follow up 61xx (response available) and 6Cxx (wrong Le).
    fn transmit_chained(&mut self, frame: &[u8]) -> Result<Response, TransportError> {
        let mut resp = self.transmit(frame)?;

        if SW::is_wrong_le(resp.sw) && frame.len() == 5 {
            let mut retry = [0u8; 5];
            retry.copy_from_slice(frame);
            retry[4] = resp.sw2();
            resp = self.transmit(&retry)?;
        }

        while SW::is_more_data(resp.sw) {
            let get = [self.cla, ins::GET_RESPONSE, 0x00, 0x00, resp.sw2()];
            let more = self.transmit(&get)?;
            let mut data = resp.data;
            data.extend_from_slice(&more.data);
            resp = Response::new(data, more.sw);
        }
        Ok(resp)
    }
}

impl SimTransport for PcscSimLink {
    fn send_apdu(
        &mut self,
        ins: u8,
        p1: u8,
        p2: u8,
        data: &[u8],
    ) -> Result<Response, TransportError> {
        let frame = transport::tpdu_with_data(self.cla, ins, p1, p2, data);
        self.transmit_chained(&frame)
    }

    fn send_apdu_le(
        &mut self,
        ins: u8,
        p1: u8,
        p2: u8,
        le: u8,
    ) -> Result<Response, TransportError> {
        let frame = transport::tpdu_with_le(self.cla, ins, p1, p2, le);
        self.transmit_chained(&frame)
    }
}
