use crate::block::Block;
use crate::error::Error;

/// Owns a fixed-size pool of identically-sized blocks, addressed by index.
///
/// `N >= 1` is required at construction; BNLJ additionally requires `N >= 2`
/// (one outer slot plus the inner slot), enforced by the join executor.
pub struct BufferManager {
    blocks: Vec<Block>,
    block_size: usize,
}

impl BufferManager {
    pub fn new(n: usize, block_size: usize) -> Result<BufferManager, Error> {
        if n == 0 {
            return Err(Error::InvalidBufferSize(n));
        }
        if block_size == 0 {
            return Err(Error::InvalidBlockSize(block_size));
        }
        let blocks = (0..n).map(|_| Block::new(block_size)).collect();
        Ok(BufferManager { blocks, block_size })
    }

    pub fn get(&self, idx: usize) -> &Block {
        &self.blocks[idx]
    }

    pub fn get_mut(&mut self, idx: usize) -> &mut Block {
        &mut self.blocks[idx]
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn clear_all(&mut self) {
        for block in &mut self.blocks {
            block.clear();
        }
    }

    pub fn memory_usage(&self) -> usize {
        self.blocks.len() * self.block_size
    }
}
