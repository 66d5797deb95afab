use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::block::Block;
use crate::error::Error;
use crate::stats::SharedStats;

/// Streams raw block-sized chunks from a block file. Does not interpret
/// block contents; `read_block` pours opaque bytes into the caller's block.
pub struct TableReader {
    path: PathBuf,
    file: File,
    stats: SharedStats,
}

impl TableReader {
    pub fn open(path: impl AsRef<Path>, stats: SharedStats) -> Result<TableReader, Error> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)
            .map_err(|err| Error::OpenFile(path.display().to_string(), err))?;
        Ok(TableReader { path, file, stats })
    }

    /// Clears `block`, attempts to read exactly `block.capacity()` bytes,
    /// and sets `block.used()` to however many bytes were actually read. A
    /// short read at EOF is a successful final block, not an error.
    /// Returns `true` iff any bytes were read.
    pub fn read_block(&mut self, block: &mut Block) -> Result<bool, Error> {
        block.clear();
        let mut total_read = 0;
        let capacity = block.capacity();
        {
            let buf = block.data_mut();
            loop {
                match self.file.read(&mut buf[total_read..capacity]) {
                    Ok(0) => break,
                    Ok(n) => {
                        total_read += n;
                        if total_read == capacity {
                            break;
                        }
                    }
                    Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                    Err(err) => return Err(err.into()),
                }
            }
        }
        block.set_used(total_read);
        if total_read > 0 {
            self.stats.borrow_mut().block_reads += 1;
        }
        Ok(total_read > 0)
    }

    /// Seeks back to the start of the file, required by BNLJ to rescan the
    /// inner table once per outer chunk.
    pub fn reset(&mut self) -> Result<(), Error> {
        self.file.seek(SeekFrom::Start(0))?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Writes raw block-sized chunks to a truncated output file, counting
/// flushed blocks into the shared statistics.
pub struct TableWriter {
    file: File,
    stats: SharedStats,
}

impl TableWriter {
    pub fn create(path: impl AsRef<Path>, stats: SharedStats) -> Result<TableWriter, Error> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|err| Error::OpenFile(path.display().to_string(), err))?;
        Ok(TableWriter { file, stats })
    }

    /// Writes exactly `block.used()` bytes — NOT the full capacity. Writing
    /// an empty block is a no-op that returns `false`. Only the last block
    /// of a file may be short; flushing a non-full intermediate block
    /// produces an irregular layout (spec.md §4.6).
    pub fn write_block(&mut self, block: &Block) -> Result<bool, Error> {
        if block.is_empty() {
            return Ok(false);
        }
        self.file.write_all(&block.data()[..block.used()])?;
        self.stats.borrow_mut().block_writes += 1;
        Ok(true)
    }
}
