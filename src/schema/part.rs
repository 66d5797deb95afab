use crate::error::Error;
use crate::record::{parse_f32, parse_i32, FromRecord, Record, ToRecord};

/// The TPC-H `PART` table schema: 9 positional fields.
#[derive(Debug, Clone, PartialEq)]
pub struct PartRecord {
    pub partkey: i32,
    pub name: String,
    pub mfgr: String,
    pub brand: String,
    pub type_: String,
    pub size: i32,
    pub container: String,
    pub retailprice: f32,
    pub comment: String,
}

impl ToRecord for PartRecord {
    fn to_record(&self) -> Record {
        Record::from_fields(vec![
            self.partkey.to_string().into_bytes(),
            self.name.clone().into_bytes(),
            self.mfgr.clone().into_bytes(),
            self.brand.clone().into_bytes(),
            self.type_.clone().into_bytes(),
            self.size.to_string().into_bytes(),
            self.container.clone().into_bytes(),
            self.retailprice.to_string().into_bytes(),
            self.comment.clone().into_bytes(),
        ])
    }
}

impl FromRecord for PartRecord {
    fn from_record(record: &Record) -> Result<Self, Error> {
        if record.field_count() < 9 {
            return Err(Error::MalformedFrame(format!(
                "PART record expects 9 fields, got {}",
                record.field_count()
            )));
        }
        Ok(PartRecord {
            partkey: parse_i32(record.field(0), "PART.partkey")?,
            name: text(record.field(1)),
            mfgr: text(record.field(2)),
            brand: text(record.field(3)),
            type_: text(record.field(4)),
            size: parse_i32(record.field(5), "PART.size")?,
            container: text(record.field(6)),
            retailprice: parse_f32(record.field(7), "PART.retailprice")?,
            comment: text(record.field(8)),
        })
    }
}

fn text(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PartRecord {
        PartRecord {
            partkey: 1,
            name: "A".to_string(),
            mfgr: "m".to_string(),
            brand: "b".to_string(),
            type_: "t".to_string(),
            size: 7,
            container: "box".to_string(),
            retailprice: 12.5,
            comment: "c".to_string(),
        }
    }

    #[test]
    fn round_trips_through_record() {
        let part = sample();
        let decoded = PartRecord::from_record(&part.to_record()).unwrap();
        assert_eq!(part, decoded);
    }

    #[test]
    fn from_record_tolerates_excess_fields() {
        let mut record = sample().to_record();
        record.add_field(b"extra".to_vec());
        assert!(PartRecord::from_record(&record).is_ok());
    }

    #[test]
    fn from_record_rejects_too_few_fields() {
        let record = Record::from_fields(vec![b"1".to_vec()]);
        assert!(PartRecord::from_record(&record).is_err());
    }
}
