//! Directory provisioning templates and standard file lists
//!
//! The FCP templates here recreate DF.GSM, DF.Telecom and ADF.USIM on
//! a blank card before their files are replayed. The file lists name
//! the elementary files worth capturing under each directory, per
//! TS 51.011 and TS 31.102; identifiers a given card does not carry
//! simply come back 6A82 during the walk.

use crate::card::descriptor::FileId;

/// AID of ADF.USIM (3GPP RID, USIM application code).
pub const ADF_USIM_AID: [u8; 16] = [
    0xA0, 0x00, 0x00, 0x00, 0x87, 0x10, 0x02, 0xFF, 0xFF, 0xFF, 0xFF, 0x89, 0x07, 0x09, 0x00,
    0x00,
];

/// FCP template creating DF.GSM (7F20).
pub const DF_GSM_FCI: [u8; 50] = [
    0x62, 0x30, // FCP template
    0x82, 0x02, 0x78, 0x21, // file descriptor: DF, shareable
    0x83, 0x02, 0x7F, 0x20, // file identifier
    0xA5, 0x16, // proprietary info
    0x83, 0x02, 0x7F, 0xFF, 0xCB, 0x0D, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0xCA, 0x01, 0x82, // clock stop allowed
    0x8A, 0x01, 0x05, // life cycle: operational, activated
    0x8B, 0x03, 0x2F, 0x06, 0x01, // security attributes by reference
    0xC6, 0x06, 0x90, 0x01, 0x00, 0x83, 0x01, 0x01, // PIN status
];

/// FCP template creating DF.Telecom (7F10).
pub const DF_TELECOM_FCI: [u8; 50] = [
    0x62, 0x30, //
    0x82, 0x02, 0x78, 0x21, //
    0x83, 0x02, 0x7F, 0x10, //
    0xA5, 0x16, //
    0x83, 0x02, 0x7F, 0xFF, 0xCB, 0x0D, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0xCA, 0x01, 0x82, //
    0x8A, 0x01, 0x05, //
    0x8B, 0x03, 0x2F, 0x06, 0x01, //
    0xC6, 0x06, 0x90, 0x01, 0x00, 0x83, 0x01, 0x01,
];

/// FCP template creating ADF.USIM, DF name carried in tag 84.
pub const ADF_USIM_FCI: [u8; 89] = [
    0x62, 0x57, //
    0x82, 0x02, 0x78, 0x21, //
    0x83, 0x02, 0x7F, 0xFF, //
    0x84, 0x10, // DF name
    0xA0, 0x00, 0x00, 0x00, 0x87, 0x10, 0x02, 0xFF, 0xFF, 0xFF, 0xFF, 0x89, 0x07, 0x09, 0x00,
    0x00, //
    0xA5, 0x16, //
    0x83, 0x02, 0x7F, 0xFF, 0xCB, 0x0D, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0xCA, 0x01, 0x80, //
    0x8A, 0x01, 0x05, //
    0xAB, 0x15, // security attributes, expanded
    0x80, 0x01, 0x01, 0xA4, 0x06, 0x83, 0x01, 0x0A, 0x95, 0x01, 0x08, 0x80, 0x01, 0x40, 0x97,
    0x00, 0x80, 0x01, 0x06, 0x90, 0x00, //
    0xC6, 0x09, // PIN status
    0x90, 0x01, 0x40, 0x83, 0x01, 0x01, 0x83, 0x01, 0x81,
];

/// Files directly under the MF.
pub const MF_FILES: &[FileId] = &[
    FileId(0x2F00),
    FileId(0x2F05),
    FileId(0x2F06),
    FileId(0x2FE2),
    FileId(0x2F08),
];

/// Files under DF.GSM (7F20).
pub const GSM_FILES: &[FileId] = &[
    FileId(0x6F05),
    FileId(0x6F07),
    FileId(0x6F20),
    FileId(0x6F2C),
    FileId(0x6F30),
    FileId(0x6F31),
    FileId(0x6F32),
    FileId(0x6F37),
    FileId(0x6F38),
    FileId(0x6F39),
    FileId(0x6F3E),
    FileId(0x6F3F),
    FileId(0x6F41),
    FileId(0x6F45),
    FileId(0x6F46),
    FileId(0x6F48),
    FileId(0x6F74),
    FileId(0x6F78),
    FileId(0x6F7B),
    FileId(0x6F7E),
    FileId(0x6FAD),
    FileId(0x6FAE),
    FileId(0x6FB1),
    FileId(0x6FB2),
    FileId(0x6FB3),
    FileId(0x6FB4),
    FileId(0x6FB5),
    FileId(0x6FB6),
    FileId(0x6FB7),
    FileId(0x6F50),
    FileId(0x6F51),
    FileId(0x6F52),
    FileId(0x6F53),
    FileId(0x6F54),
    FileId(0x6F60),
    FileId(0x6F61),
    FileId(0x6F62),
    FileId(0x6F63),
    FileId(0x6F64),
    FileId(0x6FC5),
    FileId(0x6FC6),
    FileId(0x6FC7),
    FileId(0x6FC8),
    FileId(0x6FC9),
    FileId(0x6FCA),
    FileId(0x6FCB),
    FileId(0x6FCC),
];

/// Files under DF.Telecom (7F10).
pub const TELECOM_FILES: &[FileId] = &[
    FileId(0x6F06),
    FileId(0x6F3A),
    FileId(0x6F3B),
    FileId(0x6F3C),
    FileId(0x6F40),
    FileId(0x6F42),
    FileId(0x6F43),
    FileId(0x6F44),
    FileId(0x6F47),
    FileId(0x6F49),
    FileId(0x6F4A),
    FileId(0x6F4B),
    FileId(0x6F4C),
    FileId(0x6F4D),
    FileId(0x6F4E),
    FileId(0x6F4F),
    FileId(0x6F53),
    FileId(0x6F54),
    FileId(0x6FE0),
    FileId(0x6FE1),
    FileId(0x6FE5),
];

/// Files under ADF.USIM.
pub const ADF_FILES: &[FileId] = &[
    FileId(0x6F05),
    FileId(0x6F06),
    FileId(0x6F07),
    FileId(0x6F08),
    FileId(0x6F09),
    FileId(0x6F2C),
    FileId(0x6F31),
    FileId(0x6F32),
    FileId(0x6F37),
    FileId(0x6F38),
    FileId(0x6F39),
    FileId(0x6F3B),
    FileId(0x6F3C),
    FileId(0x6F3E),
    FileId(0x6F3F),
    FileId(0x6F40),
    FileId(0x6F41),
    FileId(0x6F42),
    FileId(0x6F43),
    FileId(0x6F45),
    FileId(0x6F46),
    FileId(0x6F47),
    FileId(0x6F48),
    FileId(0x6F49),
    FileId(0x6F4B),
    FileId(0x6F4C),
    FileId(0x6F4D),
    FileId(0x6F4E),
    FileId(0x6F4F),
    FileId(0x6F50),
    FileId(0x6F55),
    FileId(0x6F56),
    FileId(0x6F57),
    FileId(0x6F58),
    FileId(0x6F5B),
    FileId(0x6F5C),
    FileId(0x6F60),
    FileId(0x6F61),
    FileId(0x6F62),
    FileId(0x6F73),
    FileId(0x6F78),
    FileId(0x6F7B),
    FileId(0x6F7E),
    FileId(0x6F80),
    FileId(0x6F81),
    FileId(0x6F82),
    FileId(0x6F83),
    FileId(0x6FAD),
    FileId(0x6FB1),
    FileId(0x6FB2),
    FileId(0x6FB3),
    FileId(0x6FB4),
    FileId(0x6FB5),
    FileId(0x6FB6),
    FileId(0x6FB7),
    FileId(0x6FC3),
    FileId(0x6FC4),
    FileId(0x6FC5),
    FileId(0x6FC6),
    FileId(0x6FC7),
    FileId(0x6FC8),
    FileId(0x6FC9),
    FileId(0x6FCA),
    FileId(0x6FCB),
    FileId(0x6FCC),
    FileId(0x6FCD),
    FileId(0x6FCE),
    FileId(0x6FCF),
    FileId(0x6FD0),
    FileId(0x6FD1),
    FileId(0x6FD2),
    FileId(0x6FD3),
    FileId(0x6FD4),
    FileId(0x6FD5),
    FileId(0x6FD6),
    FileId(0x6FD7),
    FileId(0x6FD8),
    FileId(0x6FD9),
    FileId(0x6FDA),
    FileId(0x6FDB),
    FileId(0x6FDC),
    FileId(0x6FDD),
    FileId(0x6FDE),
    FileId(0x6FDF),
    FileId(0x6FE2),
    FileId(0x6FE3),
    FileId(0x6FE4),
    FileId(0x6FE6),
    FileId(0x6FE7),
    FileId(0x6FE8),
    FileId(0x6FEC),
    FileId(0x6FED),
    FileId(0x6FEE),
    FileId(0x6FEF),
    FileId(0x6FF0),
    FileId(0x6FF1),
    FileId(0x6FF2),
    FileId(0x6FF3),
    FileId(0x6FF4),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tlv;

    fn template_children(fcp: &[u8]) -> Vec<tlv::Tlv> {
        let (outer, rest) = tlv::read_single(fcp).unwrap();
        assert_eq!(outer.tag, 0x62);
        assert!(rest.is_empty());
        tlv::read_all(&outer.value).unwrap()
    }

    #[test]
    fn test_df_templates_carry_their_identifier() {
        for (fcp, id) in [(&DF_GSM_FCI[..], 0x7F20u16), (&DF_TELECOM_FCI[..], 0x7F10)] {
            let children = template_children(fcp);
            let fid = children.iter().find(|t| t.tag == 0x83).unwrap();
            assert_eq!(fid.value, id.to_be_bytes());
        }
    }

    #[test]
    fn test_adf_template_carries_the_aid() {
        let children = template_children(&ADF_USIM_FCI);
        let name = children.iter().find(|t| t.tag == 0x84).unwrap();
        assert_eq!(name.value, ADF_USIM_AID);
    }

    #[test]
    fn test_lists_have_no_duplicates() {
        for list in [MF_FILES, GSM_FILES, TELECOM_FILES, ADF_FILES] {
            let mut sorted: Vec<_> = list.to_vec();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), list.len());
        }
    }

    #[test]
    fn test_mf_children_live_in_the_2f_range() {
        for id in MF_FILES {
            assert_eq!(id.0 >> 8, 0x2F);
        }
    }
}
