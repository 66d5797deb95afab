use byteorder::{ByteOrder, LittleEndian};

use crate::block::Block;
use crate::error::Error;

/// An ordered sequence of byte-string fields — the payload of a framed
/// record. The storage layer knows only `Record`; typed interpretation
/// (PART, PARTSUPP, JoinResult) lives in `schema`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    fields: Vec<Vec<u8>>,
}

impl Record {
    pub fn new() -> Record {
        Record { fields: Vec::new() }
    }

    pub fn from_fields(fields: Vec<Vec<u8>>) -> Record {
        Record { fields }
    }

    pub fn add_field(&mut self, field: impl Into<Vec<u8>>) {
        self.fields.push(field.into());
    }

    pub fn field(&self, idx: usize) -> &[u8] {
        &self.fields[idx]
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn fields(&self) -> &[Vec<u8>] {
        &self.fields
    }

    /// `Σ(2 + field_len)` over every field — the serialised payload size,
    /// used for capacity arithmetic before appending to a block.
    pub fn serialised_payload_size(&self) -> usize {
        self.fields.iter().map(|f| 2 + f.len()).sum()
    }

    /// Concatenates `[u16 len][bytes]` per field. Does not include the
    /// outer `u32 record_size` — that is the block framer's job.
    pub fn serialise_payload(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.serialised_payload_size());
        for field in &self.fields {
            let mut len_bytes = [0u8; 2];
            LittleEndian::write_u16(&mut len_bytes, field.len() as u16);
            buf.extend_from_slice(&len_bytes);
            buf.extend_from_slice(field);
        }
        buf
    }

    /// Decodes a `Record` from a frame's payload bytes (the bytes between
    /// the `u32 record_size` and the end of the frame — the caller has
    /// already consumed the size field via `RecordCursor`).
    pub fn deserialise_payload(payload: &[u8]) -> Result<Record, Error> {
        let mut fields = Vec::new();
        let mut offset = 0;
        while offset < payload.len() {
            if offset + 2 > payload.len() {
                return Err(Error::MalformedFrame(
                    "truncated field length".to_string(),
                ));
            }
            let field_len = LittleEndian::read_u16(&payload[offset..offset + 2]) as usize;
            offset += 2;
            if offset + field_len > payload.len() {
                return Err(Error::MalformedFrame("truncated field data".to_string()));
            }
            fields.push(payload[offset..offset + field_len].to_vec());
            offset += field_len;
        }
        Ok(Record { fields })
    }
}

/// Appends `record`'s serialised payload to `block` as a single framed
/// record. Mirrors the original `RecordWriter::writeRecord`.
pub fn write_record(block: &mut Block, record: &Record) -> bool {
    block.append(&record.serialise_payload())
}

/// A typed projection of a `Record`'s fields in positional order, with no
/// type tag stored on disk — the schema is supplied by the caller.
pub trait ToRecord {
    fn to_record(&self) -> Record;
}

/// The inverse of `ToRecord`: interprets a `Record`'s fields as a typed
/// schema instance. Implementations must tolerate excess fields (ignored)
/// but fail if the record has fewer fields than the schema requires.
pub trait FromRecord: Sized {
    fn from_record(record: &Record) -> Result<Self, Error>;
}

/// Trims ASCII whitespace and parses the result as an `i32`, failing (per
/// spec.md §3) on empty or non-numeric content.
pub fn parse_i32(raw: &[u8], field: &'static str) -> Result<i32, Error> {
    let text = std::str::from_utf8(raw)
        .map_err(|_| malformed(field, raw))?
        .trim();
    text.parse::<i32>().map_err(|_| malformed(field, raw))
}

/// Trims ASCII whitespace and parses the result as an `f32`, failing on
/// empty or non-numeric content.
pub fn parse_f32(raw: &[u8], field: &'static str) -> Result<f32, Error> {
    let text = std::str::from_utf8(raw)
        .map_err(|_| malformed(field, raw))?
        .trim();
    text.parse::<f32>().map_err(|_| malformed(field, raw))
}

fn malformed(field: &'static str, raw: &[u8]) -> Error {
    Error::MalformedField {
        field,
        value: String::from_utf8_lossy(raw).trim().to_string(),
    }
}
