//! Streaming reader for a single IFF `FORM` container.
//!
//! The reader never seeks. Chunks that do not match a registered stop point are
//! read and discarded, so any [`Read`] implementation works, including pipes.

use crate::error::{map_eof, ChunkError, ChunkResult};
use crate::{ChunkId, ID_FORM};
use endian_writer::{BigEndianReader, EndianReader};
use std::io::{self, Read};
use tracing::trace;

/// Size of a chunk header: 4 byte ID followed by a 4 byte payload size.
pub const CHUNK_HEADER_SIZE: usize = 8;

/// Size of a `FORM` header: `FORM`, 4 byte size, 4 byte container type.
pub const FORM_HEADER_SIZE: usize = 12;

/// A chunk the reader stopped at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkInfo {
    /// Type of the container holding the chunk, e.g. `DTYP`.
    pub container: ChunkId,
    /// Chunk identifier, e.g. `DTHD`.
    pub id: ChunkId,
    /// Payload size in bytes, excluding the pad byte.
    pub size: u32,
}

#[derive(Debug, Clone, Copy)]
struct FormContext {
    form_type: ChunkId,
    /// Container body bytes not consumed yet.
    remaining: u32,
}

#[derive(Debug, Clone, Copy)]
struct CurrentChunk {
    info: ChunkInfo,
    /// Unread payload bytes.
    remaining: u32,
    /// Pad byte still to discard, 0 or 1.
    pad: u32,
}

/// Walks the chunks of an IFF `FORM`, halting at registered stop chunks.
///
/// # Usage
///
/// 1. Register one or more stop points with [`ChunkReader::stop_at`].
///    The first call reads and validates the container header.
/// 2. Call [`ChunkReader::advance`] to move to the next stop chunk.
/// 3. Read its payload with [`ChunkReader::read_bytes`] (optional).
/// 4. Release it with [`ChunkReader::pop_chunk`] before advancing again.
///
/// Nested containers (`FORM`, `LIST`, `CAT `) inside the outer `FORM` are treated
/// as opaque chunks.
///
/// Any error leaves the stream at an unknown position; the reader should be
/// dropped afterwards.
#[derive(Debug)]
pub struct ChunkReader<R> {
    stream: R,
    form: Option<FormContext>,
    stops: Vec<(ChunkId, ChunkId)>,
    current: Option<CurrentChunk>,
}

impl<R: Read> ChunkReader<R> {
    /// Wrap a stream positioned at the start of a `FORM`.
    ///
    /// Nothing is read until the first [`stop_at`](Self::stop_at) or [`advance`](Self::advance).
    pub fn new(stream: R) -> Self {
        Self {
            stream,
            form: None,
            stops: Vec::new(),
            current: None,
        }
    }

    /// Register a stop point: [`advance`](Self::advance) halts at chunks with ID `id`
    /// inside a container of type `container`.
    ///
    /// Stop points accumulate; registering the same one twice is a no-op.
    ///
    /// # Errors
    ///
    /// - [`ChunkError::NotAContainer`] if the stream does not start with `FORM`.
    /// - [`ChunkError::ContainerMismatch`] if the `FORM` is not of type `container`.
    /// - I/O and truncation errors while reading the container header.
    pub fn stop_at(&mut self, container: ChunkId, id: ChunkId) -> ChunkResult<()> {
        let form = self.open()?;
        if form.form_type != container {
            return Err(ChunkError::ContainerMismatch {
                expected: container,
                found: form.form_type,
            });
        }

        if !self.stops.contains(&(container, id)) {
            self.stops.push((container, id));
        }
        Ok(())
    }

    /// Type of the outer container, reading its header if needed.
    pub fn container_type(&mut self) -> ChunkResult<ChunkId> {
        Ok(self.open()?.form_type)
    }

    /// Move to the next chunk matching a registered stop point.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(info))` when a stop chunk was reached. It stays current until
    ///   [`pop_chunk`](Self::pop_chunk) is called.
    /// - `Ok(None)` at the end of the container.
    ///
    /// # Errors
    ///
    /// - [`ChunkError::ChunkNotPopped`] if the previous stop chunk was not popped.
    /// - Framing errors ([`ChunkError::ChunkOverrunsContainer`], [`ChunkError::TrailingBytes`]).
    /// - [`ChunkError::Truncated`] if the stream ends early.
    pub fn advance(&mut self) -> ChunkResult<Option<ChunkInfo>> {
        if let Some(current) = &self.current {
            return Err(ChunkError::ChunkNotPopped(current.info.id));
        }
        let form_type = self.open()?.form_type;

        loop {
            let remaining = self.form_remaining();
            if remaining == 0 {
                return Ok(None);
            }
            if remaining < CHUNK_HEADER_SIZE as u32 {
                return Err(ChunkError::TrailingBytes(remaining));
            }

            let (id, size) = self.read_chunk_header()?;
            let remaining = remaining - CHUNK_HEADER_SIZE as u32;
            if size > remaining {
                return Err(ChunkError::ChunkOverrunsContainer {
                    id,
                    size,
                    remaining,
                });
            }

            // Odd sized chunks are padded to even length. Some writers omit the pad after the
            // last chunk.
            let pad = (size & 1).min(remaining - size);
            self.set_form_remaining(remaining - size - pad);

            let info = ChunkInfo {
                container: form_type,
                id,
                size,
            };
            if self.stops.contains(&(form_type, id)) {
                trace!(container = %form_type, chunk = %id, size, "stopped at chunk");
                self.current = Some(CurrentChunk {
                    info,
                    remaining: size,
                    pad,
                });
                return Ok(Some(info));
            }

            trace!(container = %form_type, chunk = %id, size, "skipping chunk");
            self.skip(u64::from(size) + u64::from(pad))?;
        }
    }

    /// The chunk the reader is currently stopped at, if any.
    pub fn current_chunk(&self) -> Option<ChunkInfo> {
        self.current.map(|current| current.info)
    }

    /// Number of payload bytes of the current chunk not read yet.
    pub fn remaining_in_chunk(&self) -> Option<u32> {
        self.current.map(|current| current.remaining)
    }

    /// Fill `buf` with the next bytes of the current chunk's payload.
    ///
    /// # Errors
    ///
    /// - [`ChunkError::NoCurrentChunk`] if the reader is not stopped at a chunk.
    /// - [`ChunkError::ShortRead`] if fewer than `buf.len()` bytes remain in the chunk.
    ///   Nothing is consumed in that case.
    /// - [`ChunkError::Truncated`] if the stream ends early.
    pub fn read_chunk_bytes(&mut self, buf: &mut [u8]) -> ChunkResult<()> {
        let current = self.current.as_mut().ok_or(ChunkError::NoCurrentChunk)?;
        if buf.len() > current.remaining as usize {
            return Err(ChunkError::ShortRead {
                requested: buf.len(),
                available: current.remaining as usize,
            });
        }

        self.stream.read_exact(buf).map_err(map_eof)?;
        current.remaining -= buf.len() as u32;
        Ok(())
    }

    /// Read exactly `count` bytes of the current chunk's payload into a new buffer.
    ///
    /// The size is validated against the chunk before anything is allocated.
    /// See [`read_chunk_bytes`](Self::read_chunk_bytes) for errors.
    pub fn read_bytes(&mut self, count: usize) -> ChunkResult<Vec<u8>> {
        let available = self
            .current
            .as_ref()
            .ok_or(ChunkError::NoCurrentChunk)?
            .remaining as usize;
        if count > available {
            return Err(ChunkError::ShortRead {
                requested: count,
                available,
            });
        }

        let mut buf = vec![0u8; count];
        self.read_chunk_bytes(&mut buf)?;
        Ok(buf)
    }

    /// Leave the current chunk, discarding its unread payload and pad byte.
    pub fn pop_chunk(&mut self) -> ChunkResult<()> {
        let current = self.current.take().ok_or(ChunkError::NoCurrentChunk)?;
        self.skip(u64::from(current.remaining) + u64::from(current.pad))
    }

    /// Give back the underlying stream.
    pub fn into_inner(self) -> R {
        self.stream
    }

    fn open(&mut self) -> ChunkResult<FormContext> {
        if let Some(form) = self.form {
            return Ok(form);
        }

        let mut header = [0u8; FORM_HEADER_SIZE];
        self.stream.read_exact(&mut header).map_err(map_eof)?;

        // SAFETY: `header` is FORM_HEADER_SIZE (12) bytes, every read below ends at or
        // before byte 12.
        let mut reader = unsafe { BigEndianReader::new(header.as_ptr()) };
        let tag = ChunkId::from_u32(unsafe { reader.read_u32_at(0) });
        let size = unsafe { reader.read_u32_at(4) };
        let form_type = ChunkId::from_u32(unsafe { reader.read_u32_at(8) });

        if tag != ID_FORM {
            return Err(ChunkError::NotAContainer { found: tag });
        }
        // The size covers the type field plus all chunks.
        if size < 4 {
            return Err(ChunkError::InvalidContainerSize(size));
        }

        let form = FormContext {
            form_type,
            remaining: size - 4,
        };
        trace!(container = %form_type, size, "opened container");
        self.form = Some(form);
        Ok(form)
    }

    fn read_chunk_header(&mut self) -> ChunkResult<(ChunkId, u32)> {
        let mut header = [0u8; CHUNK_HEADER_SIZE];
        self.stream.read_exact(&mut header).map_err(map_eof)?;

        // SAFETY: `header` is CHUNK_HEADER_SIZE (8) bytes, both reads end at or before byte 8.
        let mut reader = unsafe { BigEndianReader::new(header.as_ptr()) };
        let id = ChunkId::from_u32(unsafe { reader.read_u32_at(0) });
        let size = unsafe { reader.read_u32_at(4) };
        Ok((id, size))
    }

    fn skip(&mut self, count: u64) -> ChunkResult<()> {
        if count == 0 {
            return Ok(());
        }

        let skipped = io::copy(&mut (&mut self.stream).take(count), &mut io::sink())?;
        if skipped < count {
            return Err(ChunkError::Truncated);
        }
        Ok(())
    }

    fn form_remaining(&self) -> u32 {
        self.form.map_or(0, |form| form.remaining)
    }

    fn set_form_remaining(&mut self, remaining: u32) {
        if let Some(form) = self.form.as_mut() {
            form.remaining = remaining;
        }
    }
}
