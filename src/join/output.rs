use std::path::Path;

use crate::block::Block;
use crate::error::Error;
use crate::record::{write_record, ToRecord};
use crate::schema::JoinResult;
use crate::stats::SharedStats;
use crate::table::TableWriter;

/// The block-buffered output path shared by BNLJ and Hash Join: append each
/// emitted `JoinResult`, flushing and retrying once the current block is
/// full; a second failure means the result record cannot fit any empty
/// block at the configured block size, which is fatal (spec.md §4.8 step 4).
pub struct ResultSink {
    writer: TableWriter,
    block: Block,
    stats: SharedStats,
}

impl ResultSink {
    pub fn new(
        output_path: impl AsRef<Path>,
        stats: SharedStats,
        block_size: usize,
    ) -> Result<ResultSink, Error> {
        let writer = TableWriter::create(output_path, stats.clone())?;
        Ok(ResultSink {
            writer,
            block: Block::new(block_size),
            stats,
        })
    }

    pub fn emit(&mut self, result: &JoinResult) -> Result<(), Error> {
        let record = result.to_record();
        if !write_record(&mut self.block, &record) {
            self.writer.write_block(&self.block)?;
            self.block.clear();
            if !write_record(&mut self.block, &record) {
                return Err(Error::OversizedRecord {
                    record_size: record.serialised_payload_size(),
                    block_size: self.block.capacity(),
                });
            }
        }
        self.stats.borrow_mut().output_records += 1;
        Ok(())
    }

    /// Flushes the final, possibly partial, output block. Must be called
    /// once after the last `emit`.
    pub fn finish(mut self) -> Result<(), Error> {
        if !self.block.is_empty() {
            self.writer.write_block(&self.block)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{PartRecord, PartSuppRecord};
    use crate::stats::new_shared_stats;
    use crate::table::TableReader;

    fn sample_result(partkey: i32) -> JoinResult {
        JoinResult {
            part: PartRecord {
                partkey,
                name: "n".into(),
                mfgr: "m".into(),
                brand: "b".into(),
                type_: "t".into(),
                size: 1,
                container: "c".into(),
                retailprice: 1.0,
                comment: "cm".into(),
            },
            partsupp: PartSuppRecord {
                partkey,
                suppkey: 1,
                availqty: 1,
                supplycost: 1.0,
                comment: "cm".into(),
            },
        }
    }

    #[test]
    fn finish_flushes_a_nonempty_final_block() {
        let mut path = std::env::temp_dir();
        path.push(format!("blockjoin-sink-test-{}", std::process::id()));

        let stats = new_shared_stats();
        let mut sink = ResultSink::new(&path, stats.clone(), 4096).unwrap();
        sink.emit(&sample_result(1)).unwrap();
        sink.emit(&sample_result(2)).unwrap();
        sink.finish().unwrap();

        assert_eq!(stats.borrow().output_records, 2);

        let mut reader = TableReader::open(&path, new_shared_stats()).unwrap();
        let mut block = Block::new(4096);
        let mut count = 0;
        while reader.read_block(&mut block).unwrap() {
            let mut cursor = crate::block::RecordCursor::new(&block);
            while cursor.has_next() {
                cursor.read_next_payload();
                count += 1;
            }
        }
        assert_eq!(count, 2);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn emit_is_fatal_when_record_cannot_fit_any_empty_block() {
        let mut path = std::env::temp_dir();
        path.push(format!("blockjoin-sink-oversize-{}", std::process::id()));
        let mut sink = ResultSink::new(&path, new_shared_stats(), 16).unwrap();
        assert!(sink.emit(&sample_result(1)).is_err());
        let _ = std::fs::remove_file(&path);
    }
}
