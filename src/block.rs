use byteorder::{ByteOrder, LittleEndian};

/// Default block size in bytes, matching spec.md §6's on-disk default.
pub const DEFAULT_BLOCK_SIZE: usize = 4096;

/// A fixed-capacity byte container holding a prefix of complete, framed
/// records.
///
/// Bytes in `[0, used)` are a concatenation of `[u32 size][payload]` frames;
/// bytes in `[used, capacity)` are undefined padding. `capacity` never
/// changes after construction.
#[derive(Debug, Clone)]
pub struct Block {
    data: Vec<u8>,
    capacity: usize,
    used: usize,
}

impl Block {
    pub fn new(capacity: usize) -> Block {
        Block {
            data: vec![0u8; capacity],
            capacity,
            used: 0,
        }
    }

    /// Appends a length-prefixed frame `[u32 len][payload]` at the current
    /// watermark. Returns `false` without modifying the block if the frame
    /// does not fit in the remaining free space.
    pub fn append(&mut self, payload: &[u8]) -> bool {
        let frame_size = 4 + payload.len();
        if self.full_for(frame_size) {
            return false;
        }
        LittleEndian::write_u32(
            &mut self.data[self.used..self.used + 4],
            payload.len() as u32,
        );
        self.data[self.used + 4..self.used + frame_size].copy_from_slice(payload);
        self.used += frame_size;
        true
    }

    pub fn clear(&mut self) {
        self.used = 0;
    }

    /// Sets the used watermark directly. Used only by readers pouring raw
    /// block-sized bytes in from disk.
    pub fn set_used(&mut self, n: usize) {
        debug_assert!(n <= self.capacity);
        self.used = n.min(self.capacity);
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn used(&self) -> usize {
        self.used
    }

    pub fn free(&self) -> usize {
        self.capacity - self.used
    }

    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    pub fn full_for(&self, n: usize) -> bool {
        self.free() < n
    }
}

/// A forward-only cursor over the framed records in a block's used prefix.
///
/// `has_next` tolerates trailing unused/padding bytes and treats a garbled
/// record-size field as end-of-records for the block rather than a fatal
/// error, per spec.md §4.3 and §4.2.
pub struct RecordCursor<'a> {
    block: &'a Block,
    offset: usize,
}

impl<'a> RecordCursor<'a> {
    pub fn new(block: &'a Block) -> RecordCursor<'a> {
        RecordCursor { block, offset: 0 }
    }

    pub fn has_next(&self) -> bool {
        let data = self.block.data();
        let used = self.block.used();
        if self.offset + 4 > used {
            return false;
        }
        let record_size = LittleEndian::read_u32(&data[self.offset..self.offset + 4]) as usize;
        if record_size == 0 || record_size > self.block.capacity() {
            return false;
        }
        self.offset + 4 + record_size <= used
    }

    /// Advances past the next frame and returns its raw payload bytes.
    /// Panics if `has_next()` is false — callers must check first, matching
    /// the original `RecordReader::readNext` contract.
    pub fn read_next_payload(&mut self) -> &'a [u8] {
        assert!(self.has_next(), "read_next_payload called with no frame available");
        let data = self.block.data();
        let record_size = LittleEndian::read_u32(&data[self.offset..self.offset + 4]) as usize;
        let start = self.offset + 4;
        let end = start + record_size;
        self.offset = end;
        &data[start..end]
    }
}
