mod part;
mod partsupp;

pub use part::PartRecord;
pub use partsupp::PartSuppRecord;

use crate::error::Error;
use crate::record::{Record, ToRecord};

/// Which of the two fixed TPC-H schemas a block file holds. No type tag is
/// stored on disk — the schema is always supplied by the caller (CLI flag
/// or join configuration).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableType {
    Part,
    PartSupp,
}

impl std::str::FromStr for TableType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PART" => Ok(TableType::Part),
            "PARTSUPP" => Ok(TableType::PartSupp),
            other => Err(Error::UnknownTableType(other.to_string())),
        }
    }
}

impl std::fmt::Display for TableType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableType::Part => write!(f, "PART"),
            TableType::PartSupp => write!(f, "PARTSUPP"),
        }
    }
}

/// The join's output schema: the nine PART fields followed by the five
/// PARTSUPP fields, always in that order regardless of which side of the
/// join PART appeared on.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinResult {
    pub part: PartRecord,
    pub partsupp: PartSuppRecord,
}

impl ToRecord for JoinResult {
    fn to_record(&self) -> Record {
        let mut fields = self.part.to_record().fields().to_vec();
        fields.extend(self.partsupp.to_record().fields().iter().cloned());
        Record::from_fields(fields)
    }
}

/// Parses one pipe-delimited text line into a `Record` matching the
/// positional field order of `table_type`. A trailing empty field after the
/// last `|` is tolerated because `split('|')` yields it as an empty string,
/// which is a legal (possibly empty) field value.
pub fn parse_csv_line(line: &str, table_type: TableType) -> Result<Record, Error> {
    let record = Record::from_fields(line.split('|').map(|s| s.as_bytes().to_vec()).collect());
    match table_type {
        TableType::Part => Ok(PartRecord::from_record(&record)?.to_record()),
        TableType::PartSupp => Ok(PartSuppRecord::from_record(&record)?.to_record()),
    }
}
