//! Serial T=0 card link
//!
//! Talks to a phoenix-style serial SIM reader: 9600 baud, 8 data
//! bits, even parity, 2 stop bits, with the card clocked from the
//! adapter. Implements the T=0 procedure byte protocol: NULL (60)
//! bytes are wait requests, an ACK echoing the instruction byte gates
//! the data transfer, and SW1/SW2 closes the exchange.

use std::io::{Read, Write};
use std::time::Duration;

use log::{debug, info};
use serialport::{DataBits, Parity, SerialPort, StopBits};

use crate::apdu::{ins, Response, SW};
use crate::transport::{SimTransport, TransportError};

const READ_TIMEOUT: Duration = Duration::from_secs(3);

/// T=0 link over a serial SIM reader.
pub struct SerialSimLink {
    port: Box<dyn SerialPort>,
    cla: u8,
}

impl SerialSimLink {
    /// Open the serial device and reset the card.
    pub fn open(path: &str, baudrate: u32, cla: u8) -> Result<Self, TransportError> {
        let port = serialport::new(path, baudrate)
            .data_bits(DataBits::Eight)
            .parity(Parity::Even)
            .stop_bits(StopBits::Two)
            .timeout(READ_TIMEOUT)
            .open()?;

        let mut link = Self { port, cla };
        let atr = link.reset()?;
        info!("card ATR: {}", hex::encode(&atr));
        Ok(link)
    }

    /// Reset the card via DTR/RTS and collect the ATR.
    fn reset(&mut self) -> Result<Vec<u8>, TransportError> {
        self.port.write_data_terminal_ready(true)?;
        self.port.write_request_to_send(true)?;
        std::thread::sleep(Duration::from_millis(100));
        self.port.write_data_terminal_ready(false)?;
        self.port.write_request_to_send(false)?;

        let mut atr = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            match self.port.read(&mut byte) {
                Ok(1) => atr.push(byte[0]),
                Ok(_) => break,
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => break,
                Err(e) => return Err(e.into()),
            }
        }

        match atr.first() {
            Some(0x3B) | Some(0x3F) => Ok(atr),
            _ => Err(TransportError::NoAnswerToReset),
        }
    }

    fn read_byte(&mut self) -> Result<u8, TransportError> {
        let mut byte = [0u8; 1];
        self.port.read_exact(&mut byte)?;
        Ok(byte[0])
    }

    /// Run one T=0 exchange. `tx` is outgoing command data; `rx_len`
    /// is the expected response body length for incoming transfers.
    fn exchange(
        &mut self,
        header: [u8; 5],
        tx: Option<&[u8]>,
        rx_len: usize,
    ) -> Result<Response, TransportError> {
        self.port.write_all(&header)?;

        let mut body = Vec::with_capacity(rx_len);
        loop {
            let proc_byte = self.read_byte()?;
            match proc_byte {
                // NULL: card asks for more time
                0x60 => continue,
                b if b == header[1] => {
                    if let Some(data) = tx {
                        self.port.write_all(data)?;
                    } else {
                        for _ in 0..rx_len {
                            body.push(self.read_byte()?);
                        }
                    }
                }
                b if (b & 0xF0) == 0x60 || (b & 0xF0) == 0x90 => {
                    let sw2 = self.read_byte()?;
                    let sw = ((b as u16) << 8) | sw2 as u16;
                    debug!("serial exchange done, sw={sw:04x}");
                    return Ok(Response::new(body, sw));
                }
                other => return Err(TransportError::BadProcedureByte(other)),
            }
        }
    }

    /// Fetch response bytes signalled by a 61xx status word.
    fn get_response(&mut self, first: Response) -> Result<Response, TransportError> {
        let mut resp = first;
        while SW::is_more_data(resp.sw) {
            let le = resp.sw2();
            let header = [self.cla, ins::GET_RESPONSE, 0x00, 0x00, le];
            let expected = if le == 0 { 256 } else { le as usize };
            let more = self.exchange(header, None, expected)?;
            let mut data = resp.data;
            data.extend_from_slice(&more.data);
            resp = Response::new(data, more.sw);
        }
        Ok(resp)
    }
}

impl SimTransport for SerialSimLink {
    fn send_apdu(
        &mut self,
        ins: u8,
        p1: u8,
        p2: u8,
        data: &[u8],
    ) -> Result<Response, TransportError> {
        let header = [self.cla, ins, p1, p2, data.len() as u8];
        let tx = (!data.is_empty()).then_some(data);
        let resp = self.exchange(header, tx, 0)?;
        self.get_response(resp)
    }

    fn send_apdu_le(
        &mut self,
        ins: u8,
        p1: u8,
        p2: u8,
        le: u8,
    ) -> Result<Response, TransportError> {
        let expected = if le == 0 { 256 } else { le as usize };
        let header = [self.cla, ins, p1, p2, le];
        let resp = self.exchange(header, None, expected)?;

        // 6Cxx: wrong Le, the card tells us the right one
        if SW::is_wrong_le(resp.sw) {
            let le = resp.sw2();
            let expected = if le == 0 { 256 } else { le as usize };
            let header = [self.cla, ins, p1, p2, le];
            let resp = self.exchange(header, None, expected)?;
            return self.get_response(resp);
        }
        self.get_response(resp)
    }
}
