#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![warn(missing_docs)]

pub mod chunk_id;
pub mod error;
pub mod reader;

#[cfg(any(test, feature = "builder"))]
pub mod builder;

#[cfg(test)]
pub(crate) mod test_prelude;

pub use chunk_id::{ChunkId, ID_FORM};
pub use error::{ChunkError, ChunkResult};
pub use reader::{ChunkInfo, ChunkReader, CHUNK_HEADER_SIZE, FORM_HEADER_SIZE};

#[cfg(any(test, feature = "builder"))]
pub use builder::FormBuilder;
