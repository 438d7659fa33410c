//! Byte storage for one message: a primary stream plus block regions.
//!
//! Layout after `compact()`:
//!
//! ```text
//! [primary stream][block 0][block 1]...[block k]
//! ```
//!
//! While writing, blocks live in side buffers and every reference to one is an
//! 8-byte placeholder in the primary stream. `compact()` appends the blocks in
//! handle order and patches each placeholder with the block's absolute offset
//! and length. A write buffer must be compacted exactly once before it is read
//! or handed out as bytes.

use crate::varint::{self, VarIntError};

/// Size of a block reference in the primary stream: `u32` offset + `u32` length.
pub const BLOCK_REF_SIZE: usize = 8;

/// Misuse of the buffer or a read past what the bytes can satisfy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    #[error("unexpected end of buffer: needed {needed} bytes at offset {offset}, {available} available")]
    UnexpectedEnd {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("varint at offset {0} does not fit in 64 bits")]
    VarIntOverflow(usize),

    #[error("block reference {offset}+{len} lies outside the {size}-byte buffer")]
    BlockOutOfRange { offset: u32, len: u32, size: usize },

    #[error("unknown block handle {0}")]
    UnknownBlock(usize),

    #[error("buffer is already compacted")]
    AlreadyCompacted,

    #[error("buffer must be compacted before it is read")]
    NotCompacted,

    #[error("buffer of {0} bytes exceeds the range of block references")]
    TooLarge(usize),
}

/// Handle to a block region opened with `begin_block`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockHandle(usize);

/// A resolved `(offset, length)` reference read from the primary stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockRef {
    pub offset: u32,
    pub len: u32,
}

impl BlockRef {
    pub fn range(self) -> std::ops::Range<usize> {
        let start = self.offset as usize;
        start..start + self.len as usize
    }
}

/// Placeholder awaiting its final offset.
#[derive(Clone, Copy, Debug)]
struct PendingRef {
    /// Position of the 8 placeholder bytes in `data`.
    at: usize,
    block: BlockHandle,
}

/// Growable message buffer with a cursor.
///
/// A buffer created with `new` is in write mode until `compact`; a buffer
/// created with `from_bytes` is already compacted and only read.
#[derive(Debug, Clone, Default)]
pub struct ByteBuffer {
    data: Vec<u8>,
    position: usize,
    blocks: Vec<Vec<u8>>,
    pending: Vec<PendingRef>,
    compacted: bool,
}

impl ByteBuffer {
    /// Empty buffer in write mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap finished message bytes for reading.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            data: bytes,
            compacted: true,
            ..Self::default()
        }
    }

    pub fn is_compacted(&self) -> bool {
        self.compacted
    }

    /// Bytes written so far to the primary stream (all bytes once compacted).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Size the message will have after compaction.
    pub fn total_len(&self) -> usize {
        self.data.len() + self.blocks.iter().map(Vec::len).sum::<usize>()
    }

    // ---------------------------------------------------------------------
    // Write side
    // ---------------------------------------------------------------------

    fn assert_writable(&self) {
        assert!(!self.compacted, "ByteBuffer: write after compact");
    }

    pub fn write_varint(&mut self, n: i64) {
        self.assert_writable();
        varint::write_varint(&mut self.data, n);
    }

    pub fn write_raw_bytes(&mut self, bytes: &[u8]) {
        self.assert_writable();
        self.data.extend_from_slice(bytes);
    }

    /// Open a new, empty block region.
    pub fn begin_block(&mut self) -> BlockHandle {
        self.assert_writable();
        self.blocks.push(Vec::new());
        BlockHandle(self.blocks.len() - 1)
    }

    /// Append bytes to an open block region.
    pub fn write_to_block(&mut self, handle: BlockHandle, bytes: &[u8]) -> Result<(), BufferError> {
        if self.compacted {
            return Err(BufferError::AlreadyCompacted);
        }
        let block = self
            .blocks
            .get_mut(handle.0)
            .ok_or(BufferError::UnknownBlock(handle.0))?;
        block.extend_from_slice(bytes);
        Ok(())
    }

    /// Emit a placeholder reference to `handle` into the primary stream.
    pub fn write_block_ref(&mut self, handle: BlockHandle) -> Result<(), BufferError> {
        if self.compacted {
            return Err(BufferError::AlreadyCompacted);
        }
        if handle.0 >= self.blocks.len() {
            return Err(BufferError::UnknownBlock(handle.0));
        }
        self.pending.push(PendingRef {
            at: self.data.len(),
            block: handle,
        });
        self.data.extend_from_slice(&[0u8; BLOCK_REF_SIZE]);
        Ok(())
    }

    /// Lay out all blocks after the primary stream and patch references.
    ///
    /// Rewinds the cursor to the start of the buffer.
    pub fn compact(&mut self) -> Result<(), BufferError> {
        if self.compacted {
            return Err(BufferError::AlreadyCompacted);
        }
        let total = self.total_len();
        if total > u32::MAX as usize {
            return Err(BufferError::TooLarge(total));
        }

        let mut starts = Vec::with_capacity(self.blocks.len());
        let mut offset = self.data.len();
        for block in &self.blocks {
            starts.push(offset);
            offset += block.len();
        }

        for pending in &self.pending {
            let start = starts[pending.block.0] as u32;
            let len = self.blocks[pending.block.0].len() as u32;
            self.data[pending.at..pending.at + 4].copy_from_slice(&start.to_le_bytes());
            self.data[pending.at + 4..pending.at + 8].copy_from_slice(&len.to_le_bytes());
        }

        tracing::trace!(
            primary = self.data.len(),
            blocks = self.blocks.len(),
            total,
            "compacted buffer"
        );

        for block in self.blocks.drain(..) {
            self.data.extend_from_slice(&block);
        }
        self.pending.clear();
        self.compacted = true;
        self.position = 0;
        Ok(())
    }

    /// Finished message bytes.
    pub fn as_bytes(&self) -> Result<&[u8], BufferError> {
        if !self.compacted {
            return Err(BufferError::NotCompacted);
        }
        Ok(&self.data)
    }

    pub fn into_bytes(self) -> Result<Vec<u8>, BufferError> {
        if !self.compacted {
            return Err(BufferError::NotCompacted);
        }
        Ok(self.data)
    }

    // ---------------------------------------------------------------------
    // Read side
    // ---------------------------------------------------------------------

    /// Rewind the read cursor to the start of the message.
    pub fn reset_position(&mut self) {
        self.position = 0;
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes left after the cursor.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    fn readable(&self) -> Result<&[u8], BufferError> {
        if !self.compacted {
            return Err(BufferError::NotCompacted);
        }
        Ok(&self.data[self.position.min(self.data.len())..])
    }

    /// Decode the varint at the cursor without consuming it.
    pub fn peek_varint(&self) -> Result<i64, BufferError> {
        let bytes = self.readable()?;
        match varint::read_varint(bytes) {
            Ok((n, _)) => Ok(n),
            Err(e) => Err(self.varint_error(e, bytes.len())),
        }
    }

    pub fn read_varint(&mut self) -> Result<i64, BufferError> {
        let bytes = self.readable()?;
        match varint::read_varint(bytes) {
            Ok((n, used)) => {
                self.position += used;
                Ok(n)
            }
            Err(e) => Err(self.varint_error(e, bytes.len())),
        }
    }

    fn varint_error(&self, e: VarIntError, available: usize) -> BufferError {
        match e {
            VarIntError::Truncated => BufferError::UnexpectedEnd {
                offset: self.position,
                needed: available + 1,
                available,
            },
            VarIntError::Overflow => BufferError::VarIntOverflow(self.position),
        }
    }

    pub fn read_raw_bytes(&mut self, n: usize) -> Result<&[u8], BufferError> {
        let available = self.readable()?.len();
        if n > available {
            return Err(BufferError::UnexpectedEnd {
                offset: self.position,
                needed: n,
                available,
            });
        }
        let start = self.position;
        self.position += n;
        Ok(&self.data[start..start + n])
    }

    /// Read a reference emitted by `write_block_ref` and check its range.
    pub fn read_block_ref(&mut self) -> Result<BlockRef, BufferError> {
        let raw = self.read_raw_bytes(BLOCK_REF_SIZE)?;
        let offset = u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]);
        let len = u32::from_le_bytes([raw[4], raw[5], raw[6], raw[7]]);
        let block = BlockRef { offset, len };
        if block.range().end > self.data.len() {
            return Err(BufferError::BlockOutOfRange {
                offset,
                len,
                size: self.data.len(),
            });
        }
        Ok(block)
    }

    /// Bytes of a block returned by `read_block_ref`.
    pub fn block(&self, block: BlockRef) -> Result<&[u8], BufferError> {
        self.data.get(block.range()).ok_or(BufferError::BlockOutOfRange {
            offset: block.offset,
            len: block.len,
            size: self.data.len(),
        })
    }
}
