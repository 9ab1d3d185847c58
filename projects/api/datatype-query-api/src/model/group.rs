//! Datatype group categories.

use core::fmt;
use datatype_query_iff::ChunkId;

/// The category a datatype belongs to, stored as a four character code.
///
/// Unknown codes are preserved in [`GroupId::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupId {
    System,
    Text,
    Document,
    Sound,
    Instrument,
    Music,
    Picture,
    Animation,
    Movie,
    Other(ChunkId),
}

impl GroupId {
    /// Map a stored group code.
    pub fn from_id(id: ChunkId) -> Self {
        match &id.to_bytes() {
            b"syst" => Self::System,
            b"text" => Self::Text,
            b"docu" => Self::Document,
            b"soun" => Self::Sound,
            b"inst" => Self::Instrument,
            b"musi" => Self::Music,
            b"pict" => Self::Picture,
            b"anim" => Self::Animation,
            b"movi" => Self::Movie,
            _ => Self::Other(id),
        }
    }

    /// The stored group code.
    pub const fn id(self) -> ChunkId {
        match self {
            Self::System => ChunkId::from_bytes(*b"syst"),
            Self::Text => ChunkId::from_bytes(*b"text"),
            Self::Document => ChunkId::from_bytes(*b"docu"),
            Self::Sound => ChunkId::from_bytes(*b"soun"),
            Self::Instrument => ChunkId::from_bytes(*b"inst"),
            Self::Music => ChunkId::from_bytes(*b"musi"),
            Self::Picture => ChunkId::from_bytes(*b"pict"),
            Self::Animation => ChunkId::from_bytes(*b"anim"),
            Self::Movie => ChunkId::from_bytes(*b"movi"),
            Self::Other(id) => id,
        }
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::System => "System",
            Self::Text => "Text",
            Self::Document => "Document",
            Self::Sound => "Sound",
            Self::Instrument => "Instrument",
            Self::Music => "Music",
            Self::Picture => "Picture",
            Self::Animation => "Animation",
            Self::Movie => "Movie",
            Self::Other(id) => return write!(f, "{id}"),
        };
        f.write_str(name)
    }
}
