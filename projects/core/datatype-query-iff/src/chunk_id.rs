//! Four character chunk identifiers.

use core::fmt;

/// A four character IFF identifier, stored as the big-endian [`u32`] of its bytes.
///
/// Used both for chunk IDs (`DTHD`) and for container types (`DTYP`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ChunkId(u32);

/// Outer container tag of every file this crate reads.
pub const ID_FORM: ChunkId = ChunkId::from_bytes(*b"FORM");

impl ChunkId {
    /// Create an identifier from its four characters.
    #[inline]
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(bytes))
    }

    /// Create an identifier from its raw big-endian value.
    #[inline]
    pub const fn from_u32(value: u32) -> Self {
        Self(value)
    }

    /// The four characters of this identifier.
    #[inline]
    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    /// The raw value, as stored in the file.
    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.to_bytes() {
            // Non printable bytes show up in corrupt files; keep the output on one line.
            let c = if byte.is_ascii_graphic() || byte == b' ' {
                byte as char
            } else {
                '?'
            };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkId('{self}')")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[test]
    fn from_bytes_is_big_endian() {
        assert_eq!(ID_FORM.as_u32(), 0x464F524D);
        assert_eq!(ID_FORM.to_bytes(), *b"FORM");
    }

    #[rstest]
    #[case(*b"DTYP", "DTYP")]
    #[case(*b"CAT ", "CAT ")]
    #[case([b'A', 0x00, b'B', 0xFF], "A?B?")]
    fn display_renders_printable_characters(#[case] bytes: [u8; 4], #[case] expected: &str) {
        assert_eq!(ChunkId::from_bytes(bytes).to_string(), expected);
    }
}
