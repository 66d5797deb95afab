use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::block::{Block, DEFAULT_BLOCK_SIZE};
use crate::error::Error;
use crate::record::write_record;
use crate::schema::{parse_csv_line, TableType};
use crate::stats::new_shared_stats;
use crate::table::TableWriter;

/// Streams a pipe-delimited text ingest file into a block file, per
/// spec.md §4.7:
///
/// 1. Read lines, skipping empty ones.
/// 2. Parse each line into `table_type`; on failure, log and skip the line.
/// 3. Serialise to a `Record` and append to the current output block.
/// 4. On a full block, flush it and retry the append; a second failure
///    means the record cannot fit any empty block at this block size.
/// 5. At EOF, flush the non-empty current block.
///
/// Returns the count of successfully converted records.
pub fn convert_csv_to_blocks(
    csv_path: impl AsRef<Path>,
    block_path: impl AsRef<Path>,
    table_type: TableType,
    block_size: usize,
) -> Result<usize, Error> {
    convert_csv_to_blocks_with(csv_path, block_path, table_type, block_size, |_| {})
}

/// Same as `convert_csv_to_blocks`, but calls `on_skip(message)` for every
/// line that fails to parse instead of silently discarding the diagnostic.
/// The CLI uses this to route skipped lines through its `error!` macro.
pub fn convert_csv_to_blocks_with(
    csv_path: impl AsRef<Path>,
    block_path: impl AsRef<Path>,
    table_type: TableType,
    block_size: usize,
    mut on_skip: impl FnMut(&str),
) -> Result<usize, Error> {
    let csv_path = csv_path.as_ref();
    let input = File::open(csv_path)
        .map_err(|err| Error::OpenFile(csv_path.display().to_string(), err))?;
    let reader = BufReader::new(input);

    let mut writer = TableWriter::create(block_path, new_shared_stats())?;
    let mut block = Block::new(block_size);

    let mut record_count = 0;
    for line in reader.lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }

        let record = match parse_csv_line(&line, table_type) {
            Ok(record) => record,
            Err(err) => {
                on_skip(&format!("skipping malformed line '{}': {}", line, err));
                continue;
            }
        };

        if !write_record(&mut block, &record) {
            writer.write_block(&block)?;
            block.clear();
            if !write_record(&mut block, &record) {
                return Err(Error::OversizedRecord {
                    record_size: record.serialised_payload_size(),
                    block_size,
                });
            }
        }
        record_count += 1;
    }

    if !block.is_empty() {
        writer.write_block(&block)?;
    }

    Ok(record_count)
}

pub const DEFAULT_CONVERT_BLOCK_SIZE: usize = DEFAULT_BLOCK_SIZE;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::PartRecord;
    use crate::stats::new_shared_stats;
    use crate::table::TableReader;
    use std::io::Write;

    fn scratch_path(tag: &str) -> std::path::PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!(
            "blockjoin-convert-test-{}-{}",
            tag,
            std::process::id()
        ));
        p
    }

    #[test]
    fn good_records_survive_a_malformed_sibling_line() {
        let csv_path = scratch_path("part-csv");
        let block_path = scratch_path("part-blocks");
        {
            let mut f = File::create(&csv_path).unwrap();
            writeln!(f, "1|A|m|b|t|7|box|12.5|c").unwrap();
            writeln!(f, "notanumber|A|m|b|t|7|box|12.5|c").unwrap();
            writeln!(f).unwrap(); // empty line, skipped silently
            writeln!(f, "2|B|m|b|t|8|box|9.0|c").unwrap();
        }

        let mut skipped = Vec::new();
        let count = convert_csv_to_blocks_with(
            &csv_path,
            &block_path,
            TableType::Part,
            DEFAULT_CONVERT_BLOCK_SIZE,
            |msg| skipped.push(msg.to_string()),
        )
        .unwrap();

        assert_eq!(count, 2);
        assert_eq!(skipped.len(), 1);

        let mut reader = TableReader::open(&block_path, new_shared_stats()).unwrap();
        let mut block = Block::new(DEFAULT_CONVERT_BLOCK_SIZE);
        let mut decoded = Vec::new();
        while reader.read_block(&mut block).unwrap() {
            let mut cursor = crate::block::RecordCursor::new(&block);
            while cursor.has_next() {
                let payload = cursor.read_next_payload();
                let record = crate::record::Record::deserialise_payload(payload).unwrap();
                decoded.push(PartRecord::from_record(&record).unwrap().partkey);
            }
        }
        assert_eq!(decoded, vec![1, 2]);

        let _ = std::fs::remove_file(&csv_path);
        let _ = std::fs::remove_file(&block_path);
    }

    #[test]
    fn oversized_record_is_fatal() {
        let csv_path = scratch_path("oversized-csv");
        let block_path = scratch_path("oversized-blocks");
        {
            let mut f = File::create(&csv_path).unwrap();
            writeln!(f, "1|{}|m|b|t|7|box|12.5|c", "x".repeat(100)).unwrap();
        }
        let result = convert_csv_to_blocks(&csv_path, &block_path, TableType::Part, 32);
        assert!(result.is_err());
        let _ = std::fs::remove_file(&csv_path);
        let _ = std::fs::remove_file(&block_path);
    }
}
