//! APDU response handling
//!
//! A [`Response`] is what every transport round trip yields: the
//! response body (possibly empty) plus the 2-byte status word.

use super::status::SW;

/// A card response: body bytes and the combined status word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Response body (without status words).
    pub data: Vec<u8>,
    /// Combined status word (SW1 << 8 | SW2).
    pub sw: u16,
}

impl Response {
    /// Create a response from body and status word.
    pub fn new(data: Vec<u8>, sw: u16) -> Self {
        Self { data, sw }
    }

    /// Split a raw transport buffer (body + SW1 + SW2) into a response.
    ///
    /// Returns `None` when the buffer is too short to carry a status
    /// word; the caller treats that as a transport fault.
    pub fn from_raw(raw: &[u8]) -> Option<Self> {
        if raw.len() < 2 {
            return None;
        }
        let (body, sw) = raw.split_at(raw.len() - 2);
        Some(Self {
            data: body.to_vec(),
            sw: ((sw[0] as u16) << 8) | sw[1] as u16,
        })
    }

    /// Status word low byte (SW2).
    pub fn sw2(&self) -> u8 {
        self.sw as u8
    }

    /// True when the command completed with 9000.
    pub fn is_success(&self) -> bool {
        SW::is_success(self.sw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_splits_status_word() {
        let resp = Response::from_raw(&[0xDE, 0xAD, 0x90, 0x00]).unwrap();
        assert_eq!(resp.data, vec![0xDE, 0xAD]);
        assert_eq!(resp.sw, 0x9000);
        assert!(resp.is_success());
    }

    #[test]
    fn test_from_raw_status_only() {
        let resp = Response::from_raw(&[0x6A, 0x82]).unwrap();
        assert!(resp.data.is_empty());
        assert_eq!(resp.sw, SW::FILE_NOT_FOUND);
        assert!(!resp.is_success());
    }

    #[test]
    fn test_from_raw_too_short() {
        assert!(Response::from_raw(&[0x90]).is_none());
        assert!(Response::from_raw(&[]).is_none());
    }

    #[test]
    fn test_sw2_is_the_low_byte() {
        let resp = Response::new(Vec::new(), 0x6109);
        assert_eq!(resp.sw2(), 0x09);
    }
}
