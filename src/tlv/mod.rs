//! Minimal BER-TLV reader for FCP/FCI templates
//!
//! SELECT responses carry a File Control Parameters template (tag 62)
//! whose children are primitive data objects. This module reads such a
//! flat TLV list; it deliberately does not recurse into constructed
//! tags other than letting the caller unwrap the outer template, since
//! the classifier only needs tags 82 and 80.

use thiserror::Error;

/// Errors that can occur while reading a TLV list.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TlvError {
    #[error("unexpected end of data while reading tag")]
    TruncatedTag,

    #[error("unexpected end of data while reading length")]
    TruncatedLength,

    #[error("value of tag {tag:#x} runs past end of data")]
    TruncatedValue { tag: u32 },

    #[error("unsupported length encoding ({0} length bytes)")]
    LengthTooLong(usize),
}

/// One tag/length/value triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tlv {
    /// Tag, 1-2 bytes packed big-endian.
    pub tag: u32,
    /// Raw value bytes.
    pub value: Vec<u8>,
}

/// Read every TLV in `data`, skipping 00/FF filler bytes between objects.
pub fn read_all(data: &[u8]) -> Result<Vec<Tlv>, TlvError> {
    let mut out = Vec::new();
    let mut rest = data;

    while let Some(&first) = rest.first() {
        // Cards pad FCI templates with 00 or FF
        if first == 0x00 || first == 0xFF {
            rest = &rest[1..];
            continue;
        }
        let (tlv, remaining) = read_single(rest)?;
        out.push(tlv);
        rest = remaining;
    }

    Ok(out)
}

/// Find the first TLV with the given tag.
pub fn find(tlvs: &[Tlv], tag: u32) -> Option<&Tlv> {
    tlvs.iter().find(|t| t.tag == tag)
}

/// Read one TLV from the front of `data`, returning it and the rest.
pub fn read_single(data: &[u8]) -> Result<(Tlv, &[u8]), TlvError> {
    let (tag, tag_len) = read_tag(data)?;
    let (len, len_len) = read_length(&data[tag_len..])?;

    let value_start = tag_len + len_len;
    if value_start + len > data.len() {
        return Err(TlvError::TruncatedValue { tag });
    }
    let value = data[value_start..value_start + len].to_vec();

    Ok((Tlv { tag, value }, &data[value_start + len..]))
}

fn read_tag(data: &[u8]) -> Result<(u32, usize), TlvError> {
    let first = *data.first().ok_or(TlvError::TruncatedTag)?;

    // Low 5 bits all set means the tag continues into the next byte
    if (first & 0x1F) != 0x1F {
        return Ok((first as u32, 1));
    }
    let second = *data.get(1).ok_or(TlvError::TruncatedTag)?;
    Ok((((first as u32) << 8) | second as u32, 2))
}

fn read_length(data: &[u8]) -> Result<(usize, usize), TlvError> {
    let first = *data.first().ok_or(TlvError::TruncatedLength)?;

    // Short form
    if (first & 0x80) == 0 {
        return Ok((first as usize, 1));
    }

    let num_bytes = (first & 0x7F) as usize;
    if num_bytes == 0 || num_bytes > 2 {
        return Err(TlvError::LengthTooLong(num_bytes));
    }
    if data.len() < 1 + num_bytes {
        return Err(TlvError::TruncatedLength);
    }

    let mut len = 0usize;
    for &b in &data[1..1 + num_bytes] {
        len = (len << 8) | b as usize;
    }
    Ok((len, 1 + num_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_single_primitive() {
        let (tlv, rest) = read_single(&[0x82, 0x02, 0x41, 0x21]).unwrap();
        assert_eq!(tlv.tag, 0x82);
        assert_eq!(tlv.value, vec![0x41, 0x21]);
        assert!(rest.is_empty());
    }

    #[test]
    fn test_read_all_list() {
        let data = [0x82, 0x02, 0x41, 0x21, 0x80, 0x02, 0x00, 0x09];
        let tlvs = read_all(&data).unwrap();
        assert_eq!(tlvs.len(), 2);
        assert_eq!(find(&tlvs, 0x80).unwrap().value, vec![0x00, 0x09]);
        assert!(find(&tlvs, 0x83).is_none());
    }

    #[test]
    fn test_skips_filler_bytes() {
        let data = [0x00, 0x82, 0x01, 0x41, 0xFF, 0xFF];
        let tlvs = read_all(&data).unwrap();
        assert_eq!(tlvs.len(), 1);
        assert_eq!(tlvs[0].tag, 0x82);
    }

    #[test]
    fn test_long_form_length() {
        let mut data = vec![0x62, 0x81, 0x80];
        data.extend(std::iter::repeat(0xAB).take(0x80));
        let (tlv, rest) = read_single(&data).unwrap();
        assert_eq!(tlv.tag, 0x62);
        assert_eq!(tlv.value.len(), 0x80);
        assert!(rest.is_empty());
    }

    #[test]
    fn test_two_byte_tag() {
        let (tlv, _) = read_single(&[0x5F, 0x52, 0x01, 0x42]).unwrap();
        assert_eq!(tlv.tag, 0x5F52);
        assert_eq!(tlv.value, vec![0x42]);
    }

    #[test]
    fn test_truncated_value() {
        assert_eq!(
            read_single(&[0x82, 0x05, 0x41]),
            Err(TlvError::TruncatedValue { tag: 0x82 })
        );
    }

    #[test]
    fn test_truncated_length() {
        assert_eq!(read_single(&[0x82]), Err(TlvError::TruncatedLength));
    }
}
