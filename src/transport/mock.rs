//! Scripted in-memory card for unit tests
//!
//! Behaves like a minimal UICC: SELECT by identifier or AID, binary
//! and record reads against the currently selected file, update and
//! create commands that are logged for assertions, and injectable
//! status word failures.

use std::collections::HashMap;

use crate::apdu::{ins, select, Response, SW};
use crate::transport::{SimTransport, TransportError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    Data { ins: u8, p1: u8, p2: u8, data: Vec<u8> },
    Le { ins: u8, p1: u8, p2: u8, le: u8 },
}

#[derive(Debug, Clone)]
pub enum MockContent {
    None,
    Transparent(Vec<u8>),
    Records(Vec<Vec<u8>>),
}

#[derive(Debug, Clone)]
pub struct MockFile {
    pub fci: Vec<u8>,
    pub select_sw: u16,
    pub content: MockContent,
}

#[derive(Default)]
pub struct MockCard {
    files: HashMap<u16, MockFile>,
    aids: HashMap<Vec<u8>, MockFile>,
    selected: Option<u16>,
    /// (file id, record index or 0 for binary, sw) read failure
    fail_read: Option<(u16, u8, u16)>,
    /// command count after which the link dies
    fault_after: Option<usize>,
    pub create_sw: u16,
    pub update_sw: u16,
    /// every command seen, in order
    pub log: Vec<Cmd>,
    /// FCI payloads passed to CREATE FILE
    pub created: Vec<Vec<u8>>,
    /// (record index, data) passed to UPDATE RECORD
    pub record_updates: Vec<(u8, Vec<u8>)>,
    /// (offset, data) passed to UPDATE BINARY
    pub binary_updates: Vec<(usize, Vec<u8>)>,
}

impl MockCard {
    pub fn new() -> Self {
        Self {
            create_sw: SW::SUCCESS,
            update_sw: SW::SUCCESS,
            ..Self::default()
        }
    }

    pub fn add_transparent(&mut self, id: u16, fci: Vec<u8>, data: Vec<u8>) {
        self.files.insert(
            id,
            MockFile {
                fci,
                select_sw: SW::SUCCESS,
                content: MockContent::Transparent(data),
            },
        );
    }

    pub fn add_records(&mut self, id: u16, fci: Vec<u8>, records: Vec<Vec<u8>>) {
        self.files.insert(
            id,
            MockFile {
                fci,
                select_sw: SW::SUCCESS,
                content: MockContent::Records(records),
            },
        );
    }

    /// A directory node: selectable, no readable content.
    pub fn add_df(&mut self, id: u16) {
        self.files.insert(
            id,
            MockFile {
                fci: vec![0x62, 0x04, 0x82, 0x02, 0x78, 0x21],
                select_sw: SW::SUCCESS,
                content: MockContent::None,
            },
        );
    }

    /// A file whose SELECT answers with the given status word.
    pub fn add_with_select_sw(&mut self, id: u16, select_sw: u16) {
        self.files.insert(
            id,
            MockFile {
                fci: Vec::new(),
                select_sw,
                content: MockContent::None,
            },
        );
    }

    /// A selectable file with an arbitrary FCI and no content.
    pub fn add_with_fci(&mut self, id: u16, fci: Vec<u8>) {
        self.files.insert(
            id,
            MockFile {
                fci,
                select_sw: SW::SUCCESS,
                content: MockContent::None,
            },
        );
    }

    pub fn add_aid(&mut self, aid: Vec<u8>, fci: Vec<u8>) {
        self.aids.insert(
            aid,
            MockFile {
                fci,
                select_sw: SW::SUCCESS,
                content: MockContent::None,
            },
        );
    }

    /// Make the given read (record index, or 0 for binary) of `id` fail.
    pub fn fail_read(&mut self, id: u16, record: u8, sw: u16) {
        self.fail_read = Some((id, record, sw));
    }

    /// Kill the link after `commands` successful commands: the next
    /// one returns a transport fault instead of reaching the card.
    pub fn fail_after(&mut self, commands: usize) {
        self.fault_after = Some(commands);
    }

    fn check_link(&self) -> Result<(), TransportError> {
        match self.fault_after {
            Some(limit) if self.log.len() >= limit => Err(TransportError::Io(
                std::io::Error::new(std::io::ErrorKind::ConnectionAborted, "link lost"),
            )),
            _ => Ok(()),
        }
    }

    pub fn select_count(&self, id: u16) -> usize {
        let id_bytes = id.to_be_bytes().to_vec();
        self.log
            .iter()
            .filter(|cmd| {
                matches!(cmd, Cmd::Data { ins: i, p1, data, .. }
                    if *i == ins::SELECT && *p1 == select::BY_FILE_ID && *data == id_bytes)
            })
            .count()
    }

    fn do_select(&mut self, p1: u8, data: &[u8]) -> Response {
        if p1 == select::BY_DF_NAME {
            return match self.aids.get(data) {
                Some(f) => {
                    self.selected = None;
                    Response::new(f.fci.clone(), f.select_sw)
                }
                None => Response::new(Vec::new(), SW::FILE_NOT_FOUND),
            };
        }
        if data.len() != 2 {
            return Response::new(Vec::new(), SW::INCORRECT_P1_P2);
        }
        let id = u16::from_be_bytes([data[0], data[1]]);
        match self.files.get(&id) {
            Some(f) if f.select_sw == SW::SUCCESS => {
                self.selected = Some(id);
                Response::new(f.fci.clone(), SW::SUCCESS)
            }
            Some(f) => Response::new(Vec::new(), f.select_sw),
            None => Response::new(Vec::new(), SW::FILE_NOT_FOUND),
        }
    }

    fn read_failure_for(&self, record: u8) -> Option<u16> {
        match (self.selected, self.fail_read) {
            (Some(id), Some((fail_id, fail_rec, sw))) if id == fail_id && record == fail_rec => {
                Some(sw)
            }
            _ => None,
        }
    }

    fn do_read_binary(&mut self, p1: u8, p2: u8, le: u8) -> Response {
        if let Some(sw) = self.read_failure_for(0) {
            return Response::new(Vec::new(), sw);
        }
        let Some(file) = self.selected.and_then(|id| self.files.get(&id)) else {
            return Response::new(Vec::new(), SW::CONDITIONS_NOT_SATISFIED);
        };
        let MockContent::Transparent(ref data) = file.content else {
            return Response::new(Vec::new(), SW::CONDITIONS_NOT_SATISFIED);
        };
        let offset = ((p1 as usize) << 8) | p2 as usize;
        let want = if le == 0 { 256 } else { le as usize };
        let end = (offset + want).min(data.len());
        if offset > data.len() {
            return Response::new(Vec::new(), SW::INCORRECT_P1_P2);
        }
        Response::new(data[offset..end].to_vec(), SW::SUCCESS)
    }

    fn do_read_record(&mut self, index: u8) -> Response {
        if let Some(sw) = self.read_failure_for(index) {
            return Response::new(Vec::new(), sw);
        }
        let Some(file) = self.selected.and_then(|id| self.files.get(&id)) else {
            return Response::new(Vec::new(), SW::CONDITIONS_NOT_SATISFIED);
        };
        let MockContent::Records(ref records) = file.content else {
            return Response::new(Vec::new(), SW::CONDITIONS_NOT_SATISFIED);
        };
        match records.get(index as usize - 1) {
            Some(rec) => Response::new(rec.clone(), SW::SUCCESS),
            None => Response::new(Vec::new(), SW::RECORD_NOT_FOUND),
        }
    }
}

impl SimTransport for MockCard {
    fn send_apdu(
        &mut self,
        ins_byte: u8,
        p1: u8,
        p2: u8,
        data: &[u8],
    ) -> Result<Response, TransportError> {
        self.check_link()?;
        self.log.push(Cmd::Data {
            ins: ins_byte,
            p1,
            p2,
            data: data.to_vec(),
        });
        let resp = match ins_byte {
            ins::SELECT => self.do_select(p1, data),
            ins::CREATE_FILE => {
                self.created.push(data.to_vec());
                Response::new(Vec::new(), self.create_sw)
            }
            ins::UPDATE_RECORD => {
                self.record_updates.push((p1, data.to_vec()));
                Response::new(Vec::new(), self.update_sw)
            }
            ins::UPDATE_BINARY => {
                let offset = ((p1 as usize) << 8) | p2 as usize;
                self.binary_updates.push((offset, data.to_vec()));
                Response::new(Vec::new(), self.update_sw)
            }
            _ => Response::new(Vec::new(), SW::INS_NOT_SUPPORTED),
        };
        Ok(resp)
    }

    fn send_apdu_le(
        &mut self,
        ins_byte: u8,
        p1: u8,
        p2: u8,
        le: u8,
    ) -> Result<Response, TransportError> {
        self.check_link()?;
        self.log.push(Cmd::Le {
            ins: ins_byte,
            p1,
            p2,
            le,
        });
        let resp = match ins_byte {
            ins::READ_BINARY => self.do_read_binary(p1, p2, le),
            ins::READ_RECORD => self.do_read_record(p1),
            _ => Response::new(Vec::new(), SW::INS_NOT_SUPPORTED),
        };
        Ok(resp)
    }
}

/// FCP for a transparent file of `size` bytes.
pub fn fci_transparent(size: u16) -> Vec<u8> {
    let [hi, lo] = size.to_be_bytes();
    vec![0x62, 0x08, 0x82, 0x02, 0x41, 0x21, 0x80, 0x02, hi, lo]
}

/// FCP for a linear-fixed file.
pub fn fci_linear(record_len: u8, record_count: u8) -> Vec<u8> {
    vec![0x62, 0x07, 0x82, 0x05, 0x42, 0x21, 0x00, record_len, record_count]
}

/// FCP for a cyclic file.
pub fn fci_cyclic(record_len: u8, record_count: u8) -> Vec<u8> {
    vec![0x62, 0x07, 0x82, 0x05, 0x46, 0x21, 0x00, record_len, record_count]
}
