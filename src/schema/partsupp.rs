use crate::error::Error;
use crate::record::{parse_f32, parse_i32, FromRecord, Record, ToRecord};

/// The TPC-H `PARTSUPP` table schema: 5 positional fields.
#[derive(Debug, Clone, PartialEq)]
pub struct PartSuppRecord {
    pub partkey: i32,
    pub suppkey: i32,
    pub availqty: i32,
    pub supplycost: f32,
    pub comment: String,
}

impl ToRecord for PartSuppRecord {
    fn to_record(&self) -> Record {
        Record::from_fields(vec![
            self.partkey.to_string().into_bytes(),
            self.suppkey.to_string().into_bytes(),
            self.availqty.to_string().into_bytes(),
            self.supplycost.to_string().into_bytes(),
            self.comment.clone().into_bytes(),
        ])
    }
}

impl FromRecord for PartSuppRecord {
    fn from_record(record: &Record) -> Result<Self, Error> {
        if record.field_count() < 5 {
            return Err(Error::MalformedFrame(format!(
                "PARTSUPP record expects 5 fields, got {}",
                record.field_count()
            )));
        }
        Ok(PartSuppRecord {
            partkey: parse_i32(record.field(0), "PARTSUPP.partkey")?,
            suppkey: parse_i32(record.field(1), "PARTSUPP.suppkey")?,
            availqty: parse_i32(record.field(2), "PARTSUPP.availqty")?,
            supplycost: parse_f32(record.field(3), "PARTSUPP.supplycost")?,
            comment: String::from_utf8_lossy(record.field(4)).into_owned(),
        })
    }
}
