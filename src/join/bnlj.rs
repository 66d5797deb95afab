use std::path::{Path, PathBuf};
use std::time::Instant;

use itertools::Itertools;

use super::output::ResultSink;
use super::{decode_typed, validate_schema_pair, JoinOutcome, TypedRecord};
use crate::block::{Block, RecordCursor};
use crate::buffer::BufferManager;
use crate::error::Error;
use crate::record::Record;
use crate::schema::{JoinResult, TableType};
use crate::stats::new_shared_stats;
use crate::table::TableReader;

/// Block Nested Loops Join: the primary algorithm (spec.md §4.8).
///
/// Buffer partition: `outer_slots = B - 1`, `inner_slots = 1`. Maximising
/// the outer chunk size minimises the number of full inner passes.
pub struct BlockNestedLoopsJoin {
    outer_path: PathBuf,
    inner_path: PathBuf,
    output_path: PathBuf,
    outer_type: TableType,
    inner_type: TableType,
    buffer_size: usize,
    block_size: usize,
}

impl BlockNestedLoopsJoin {
    pub fn new(
        outer_path: impl AsRef<Path>,
        inner_path: impl AsRef<Path>,
        output_path: impl AsRef<Path>,
        outer_type: TableType,
        inner_type: TableType,
        buffer_size: usize,
        block_size: usize,
    ) -> Result<BlockNestedLoopsJoin, Error> {
        if buffer_size < 2 {
            return Err(Error::InvalidBufferSize(buffer_size));
        }
        validate_schema_pair(outer_type, inner_type)?;
        Ok(BlockNestedLoopsJoin {
            outer_path: outer_path.as_ref().to_path_buf(),
            inner_path: inner_path.as_ref().to_path_buf(),
            output_path: output_path.as_ref().to_path_buf(),
            outer_type,
            inner_type,
            buffer_size,
            block_size,
        })
    }

    pub fn execute(&self) -> JoinOutcome {
        self.execute_logging(|_| {})
    }

    /// Runs the join, routing per-record decode diagnostics through
    /// `on_skip` instead of discarding them.
    pub fn execute_logging(&self, mut on_skip: impl FnMut(&str)) -> JoinOutcome {
        let started_at = Instant::now();
        let stats = new_shared_stats();

        let mut outer_reader = TableReader::open(&self.outer_path, stats.clone())?;
        let mut inner_reader = TableReader::open(&self.inner_path, stats.clone())?;
        let mut sink = ResultSink::new(&self.output_path, stats.clone(), self.block_size)?;

        let mut buffers = BufferManager::new(self.buffer_size, self.block_size)?;
        let outer_slots = self.buffer_size - 1;
        let inner_slot = self.buffer_size - 1;

        loop {
            // Load the outer chunk: up to `outer_slots` blocks, decoded and
            // stashed into memory before the inner scan begins. The inner
            // scan reuses slot `inner_slot`, aliasing whatever block last
            // occupied it during outer loading — correctness depends on
            // having already decoded everything out of the buffer slots.
            let mut outer_records: Vec<Record> = Vec::new();
            let mut loaded = 0;
            for slot in 0..outer_slots {
                let block = buffers.get_mut(slot);
                if !outer_reader.read_block(block)? {
                    break;
                }
                loaded += 1;
                decode_block_records(block, &mut outer_records, &mut on_skip);
            }
            if loaded == 0 {
                break;
            }

            let outer_typed: Vec<TypedRecord> = outer_records
                .iter()
                .filter_map(|r| match decode_typed(r, self.outer_type) {
                    Ok(typed) => Some(typed),
                    Err(err) => {
                        on_skip(&format!("skipping outer record: {}", err));
                        None
                    }
                })
                .collect();

            inner_reader.reset()?;
            loop {
                let block = buffers.get_mut(inner_slot);
                if !inner_reader.read_block(block)? {
                    break;
                }
                let mut inner_records: Vec<Record> = Vec::new();
                decode_block_records(block, &mut inner_records, &mut on_skip);
                let inner_typed: Vec<TypedRecord> = inner_records
                    .iter()
                    .filter_map(|r| match decode_typed(r, self.inner_type) {
                        Ok(typed) => Some(typed),
                        Err(err) => {
                            on_skip(&format!("skipping inner record: {}", err));
                            None
                        }
                    })
                    .collect();

                for (outer, inner) in outer_typed.iter().cartesian_product(inner_typed.iter()) {
                    if outer.partkey() == inner.partkey() {
                        sink.emit(&join_result(outer, inner))?;
                    }
                }
            }
        }

        sink.finish()?;

        let mut final_stats = stats.borrow().clone();
        final_stats.memory_usage = self.buffer_size * self.block_size;
        final_stats.elapsed_time = started_at.elapsed();
        Ok(final_stats)
    }
}

fn decode_block_records(
    block: &Block,
    out: &mut Vec<Record>,
    on_skip: &mut impl FnMut(&str),
) {
    let mut cursor = RecordCursor::new(block);
    while cursor.has_next() {
        let payload = cursor.read_next_payload();
        match Record::deserialise_payload(payload) {
            Ok(record) => out.push(record),
            Err(err) => on_skip(&format!("skipping malformed frame: {}", err)),
        }
    }
}

/// Builds a `JoinResult` that always carries PART in the "part" slot and
/// PARTSUPP in the "partsupp" slot, regardless of which side was outer.
fn join_result(a: &TypedRecord, b: &TypedRecord) -> JoinResult {
    match (a, b) {
        (TypedRecord::Part(part), TypedRecord::PartSupp(partsupp)) => JoinResult {
            part: part.clone(),
            partsupp: partsupp.clone(),
        },
        (TypedRecord::PartSupp(partsupp), TypedRecord::Part(part)) => JoinResult {
            part: part.clone(),
            partsupp: partsupp.clone(),
        },
        // `validate_schema_pair` rejects same-schema pairs at construction,
        // so this arm is unreachable in practice.
        _ => unreachable!("BNLJ matched two records of the same schema"),
    }
}
