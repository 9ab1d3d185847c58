//! Decoding of the descriptor header (`DTHD` chunk payload).
//!
//! # Layout
//!
//! | Offset | Type | Field                                  |
//! |--------|------|----------------------------------------|
//! | 0      | u32  | Offset of the display name             |
//! | 4      | u32  | Offset of the base name                |
//! | 8      | u32  | Offset of the file name pattern, 0: none |
//! | 12     | u32  | Offset of the mask words, 0: none      |
//! | 16     | u32  | Group code                             |
//! | 20     | u32  | Type code                              |
//! | 24     | i16  | Number of mask words                   |
//! | 26     | u16  | Padding                                |
//! | 28     | u16  | Flags                                  |
//! | 30     | u16  | Priority                               |

use super::{c_string_at, decode_text, HeaderError};
use crate::model::GroupId;
use bitfield::bitfield;
use datatype_query_iff::ChunkId;
use endian_writer::{BigEndianReader, EndianReader};

/// Size of the fixed header prefix.
pub const HEADER_PREFIX_SIZE: usize = 32;

/// Header chunks larger than this are rejected without being read.
pub const MAX_HEADER_CHUNK_SIZE: u32 = 4096;

/// Mask words with this bit set match any byte.
pub const MASK_ANY_BYTE: u16 = 0x8000;

/// How the contents of a file of this type are recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum FileKind {
    /// No content check
    #[default]
    Binary = 0,
    /// Content must look like text
    Ascii = 1,
    /// Content must be an IFF `FORM`
    Iff = 2,
    /// No content check
    Misc = 3,
}

impl FileKind {
    /// Decode the 4 bit kind field. Unassigned values are treated as [`FileKind::Misc`].
    pub const fn from_raw(value: u8) -> Self {
        match value & 0x0F {
            0 => Self::Binary,
            1 => Self::Ascii,
            2 => Self::Iff,
            _ => Self::Misc,
        }
    }
}

bitfield! {
    /// The header flags word.
    ///
    /// - Bits 0-3: File kind
    /// - Bit 4: Mask comparison is case sensitive
    /// - Bit 12: System type, only used as a fallback
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct HeaderFlags(u16);
    impl Debug;
    u16;

    /// File kind (4 bits)
    pub kind_raw, set_kind_raw: 3, 0;
    /// Mask comparison is case sensitive
    pub case_sensitive, set_case_sensitive: 4;
    /// System type
    pub system, set_system: 12;
}

impl HeaderFlags {
    /// Wrap a stored flags word.
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// The stored flags word.
    pub const fn bits(&self) -> u16 {
        self.0
    }

    /// The decoded file kind.
    pub fn kind(&self) -> FileKind {
        FileKind::from_raw(self.kind_raw() as u8)
    }
}

/// A decoded descriptor header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorHeader {
    pub name: String,
    pub base_name: String,
    /// File name pattern, AmigaDOS syntax.
    pub pattern: Option<String>,
    /// Leading byte mask. See [`DescriptorHeader::mask_matches`].
    pub mask: Vec<u16>,
    pub group: GroupId,
    pub type_id: ChunkId,
    pub flags: HeaderFlags,
    /// Higher priorities are tried first during classification.
    pub priority: u16,
}

impl DescriptorHeader {
    /// Decode a `DTHD` payload.
    pub fn parse(payload: &[u8]) -> Result<Self, HeaderError> {
        if payload.len() < HEADER_PREFIX_SIZE {
            return Err(HeaderError::TooShort(payload.len()));
        }
        if payload.len() > MAX_HEADER_CHUNK_SIZE as usize {
            return Err(HeaderError::TooLarge(payload.len()));
        }

        // SAFETY: `payload` holds at least HEADER_PREFIX_SIZE (32) bytes, all reads end at
        // or before byte 32.
        let mut reader = unsafe { BigEndianReader::new(payload.as_ptr()) };
        let (name_offset, base_offset, pattern_offset, mask_offset, group, type_id) = unsafe {
            (
                reader.read_u32_at(0),
                reader.read_u32_at(4),
                reader.read_u32_at(8),
                reader.read_u32_at(12),
                reader.read_u32_at(16),
                reader.read_u32_at(20),
            )
        };
        // Mask length and pad share a word, flags and priority share the last one.
        let (mask_word, flags_word) = unsafe { (reader.read_u32_at(24), reader.read_u32_at(28)) };
        let mask_len = (mask_word >> 16) as u16 as i16;
        let flags = (flags_word >> 16) as u16;
        let priority = flags_word as u16;

        let name = required_string(payload, "name", name_offset)?;
        let base_name = required_string(payload, "base_name", base_offset)?;
        let pattern = optional_string(payload, pattern_offset);
        let mask = read_mask(payload, mask_offset, mask_len)?;

        Ok(Self {
            name,
            base_name,
            pattern,
            mask,
            group: GroupId::from_id(ChunkId::from_u32(group)),
            type_id: ChunkId::from_u32(type_id),
            flags: HeaderFlags::from_bits(flags),
            priority,
        })
    }

    pub fn kind(&self) -> FileKind {
        self.flags.kind()
    }

    pub fn is_system(&self) -> bool {
        self.flags.system()
    }

    /// Whether the header carries a pattern that restricts file names.
    ///
    /// `#?` and `*` match every name and count as no pattern.
    pub fn has_pattern(&self) -> bool {
        self.pattern
            .as_deref()
            .is_some_and(|pattern| !matches!(pattern, "" | "#?" | "*"))
    }

    /// Compare the mask against the leading bytes of a file.
    ///
    /// An empty mask matches anything. Data shorter than the mask never matches.
    pub fn mask_matches(&self, data: &[u8]) -> bool {
        if data.len() < self.mask.len() {
            return false;
        }

        let case_sensitive = self.flags.case_sensitive();
        self.mask.iter().zip(data).all(|(&word, &byte)| {
            if word & MASK_ANY_BYTE != 0 {
                return true;
            }
            let expected = (word & 0xFF) as u8;
            if case_sensitive {
                expected == byte
            } else {
                expected.eq_ignore_ascii_case(&byte)
            }
        })
    }
}

fn required_string(
    payload: &[u8],
    field: &'static str,
    offset: u32,
) -> Result<String, HeaderError> {
    let bytes = (offset != 0)
        .then(|| c_string_at(payload, offset as usize))
        .flatten()
        .ok_or(HeaderError::StringOutOfBounds {
            field,
            offset,
            len: payload.len(),
        })?;
    if bytes.is_empty() {
        return Err(HeaderError::EmptyString(field));
    }
    Ok(decode_text(bytes))
}

fn optional_string(payload: &[u8], offset: u32) -> Option<String> {
    if offset == 0 {
        return None;
    }
    c_string_at(payload, offset as usize).map(decode_text)
}

fn read_mask(payload: &[u8], offset: u32, words: i16) -> Result<Vec<u16>, HeaderError> {
    if words < 0 {
        return Err(HeaderError::NegativeMaskLength(words));
    }
    if offset == 0 || words == 0 {
        return Ok(Vec::new());
    }

    let words = words as usize;
    let bytes = payload
        .get(offset as usize..)
        .and_then(|tail| tail.get(..words * 2))
        .ok_or(HeaderError::MaskOutOfBounds {
            offset,
            words,
            len: payload.len(),
        })?;
    Ok(bytes
        .chunks_exact(2)
        .map(|word| u16::from_be_bytes([word[0], word[1]]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[test]
    fn parses_all_fields() {
        let payload = HeaderFixture::new("ILBM", "ilbm")
            .group(*b"pict")
            .type_id(*b"ILBM")
            .pattern("#?.iff")
            .mask(&[b'F' as u16, b'O' as u16, b'R' as u16, b'M' as u16])
            .flags(0x0002)
            .priority(5)
            .to_bytes();

        let header = DescriptorHeader::parse(&payload).unwrap();
        assert_eq!(header.name, "ILBM");
        assert_eq!(header.base_name, "ilbm");
        assert_eq!(header.pattern.as_deref(), Some("#?.iff"));
        assert_eq!(header.mask, vec![0x46, 0x4F, 0x52, 0x4D]);
        assert_eq!(header.group, GroupId::Picture);
        assert_eq!(header.type_id, ChunkId::from_bytes(*b"ILBM"));
        assert_eq!(header.kind(), FileKind::Iff);
        assert_eq!(header.priority, 5);
        assert!(!header.is_system());
        assert!(header.has_pattern());
    }

    #[test]
    fn absent_pattern_and_mask() {
        let payload = HeaderFixture::new("Binary", "binary")
            .group(*b"syst")
            .flags(0x1000)
            .to_bytes();

        let header = DescriptorHeader::parse(&payload).unwrap();
        assert_eq!(header.pattern, None);
        assert!(header.mask.is_empty());
        assert!(header.is_system());
        assert!(!header.has_pattern());
        assert!(header.mask_matches(b""));
    }

    #[rstest]
    #[case(31, HeaderError::TooShort(31))]
    #[case(4097, HeaderError::TooLarge(4097))]
    fn size_limits(#[case] len: usize, #[case] expected: HeaderError) {
        assert_eq!(DescriptorHeader::parse(&vec![0u8; len]), Err(expected));
    }

    #[test]
    fn missing_name_is_rejected() {
        let mut payload = HeaderFixture::new("Name", "base").to_bytes();
        payload[0..4].copy_from_slice(&0u32.to_be_bytes());
        assert!(matches!(
            DescriptorHeader::parse(&payload),
            Err(HeaderError::StringOutOfBounds { field: "name", .. })
        ));
    }

    #[test]
    fn base_name_offset_past_end_is_rejected() {
        let mut payload = HeaderFixture::new("Name", "base").to_bytes();
        let len = payload.len() as u32;
        payload[4..8].copy_from_slice(&len.to_be_bytes());
        assert!(matches!(
            DescriptorHeader::parse(&payload),
            Err(HeaderError::StringOutOfBounds {
                field: "base_name",
                ..
            })
        ));
    }

    #[test]
    fn mask_past_end_is_rejected() {
        let mut payload = HeaderFixture::new("Name", "base").mask(&[0x46]).to_bytes();
        // Claim far more mask words than the payload holds.
        payload[24..26].copy_from_slice(&200i16.to_be_bytes());
        assert!(matches!(
            DescriptorHeader::parse(&payload),
            Err(HeaderError::MaskOutOfBounds { words: 200, .. })
        ));
    }

    #[test]
    fn negative_mask_length_is_rejected() {
        let mut payload = HeaderFixture::new("Name", "base").mask(&[0x46]).to_bytes();
        payload[24..26].copy_from_slice(&(-1i16).to_be_bytes());
        assert_eq!(
            DescriptorHeader::parse(&payload),
            Err(HeaderError::NegativeMaskLength(-1))
        );
    }

    #[rstest]
    #[case::exact(0x0000, b"FORM....", true)]
    #[case::folded(0x0000, b"form....", true)]
    #[case::case_sensitive(0x0010, b"form....", false)]
    #[case::too_short(0x0000, b"FO", false)]
    #[case::different(0x0000, b"LIST....", false)]
    fn mask_comparison(#[case] flags: u16, #[case] data: &[u8], #[case] expected: bool) {
        let payload = HeaderFixture::new("Name", "base")
            .mask(&[b'F' as u16, b'O' as u16, b'R' as u16, b'M' as u16])
            .flags(flags)
            .to_bytes();
        let header = DescriptorHeader::parse(&payload).unwrap();
        assert_eq!(header.mask_matches(data), expected);
    }

    #[test]
    fn wildcard_mask_words_match_any_byte() {
        let payload = HeaderFixture::new("Name", "base")
            .mask(&[0x00FF, MASK_ANY_BYTE, 0x00D8])
            .to_bytes();
        let header = DescriptorHeader::parse(&payload).unwrap();
        assert!(header.mask_matches(&[0xFF, 0x12, 0xD8, 0x00]));
        assert!(header.mask_matches(&[0xFF, 0xAB, 0xD8]));
        assert!(!header.mask_matches(&[0xFF, 0xAB, 0xD9]));
    }

    #[rstest]
    #[case(Some("#?"), false)]
    #[case(Some("*"), false)]
    #[case(Some(""), false)]
    #[case(Some("#?.(jpg|jpeg)"), true)]
    #[case(None, false)]
    fn trivial_patterns(#[case] pattern: Option<&str>, #[case] expected: bool) {
        let mut fixture = HeaderFixture::new("Name", "base");
        if let Some(pattern) = pattern {
            fixture = fixture.pattern(pattern);
        }
        let header = DescriptorHeader::parse(&fixture.to_bytes()).unwrap();
        assert_eq!(header.has_pattern(), expected);
    }
}
