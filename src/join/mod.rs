mod bnlj;
mod hash;
mod output;

pub use bnlj::BlockNestedLoopsJoin;
pub use hash::HashJoin;

use crate::error::Error;
use crate::record::Record;
use crate::schema::{PartRecord, PartSuppRecord, TableType};
use crate::stats::Statistics;

/// The four algorithm names exposed at the CLI boundary (spec.md §4.10).
/// `Multithreaded` and `Prefetching` are accepted values that construct and
/// run a `BlockNestedLoopsJoin` and report its statistics verbatim — they
/// are not distinct code paths, only a forward-compatible API surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinAlgorithm {
    Bnlj,
    Hash,
    Multithreaded,
    Prefetching,
}

impl std::str::FromStr for JoinAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bnlj" => Ok(JoinAlgorithm::Bnlj),
            "hash" => Ok(JoinAlgorithm::Hash),
            "multithreaded" => Ok(JoinAlgorithm::Multithreaded),
            "prefetching" => Ok(JoinAlgorithm::Prefetching),
            other => Err(Error::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// A `Record` decoded under its schema's typed interpretation, tagged so the
/// join executors can extract PARTKEY and route PART vs PARTSUPP into the
/// right `JoinResult` slot regardless of which side of the join it came
/// from.
pub enum TypedRecord {
    Part(PartRecord),
    PartSupp(PartSuppRecord),
}

impl TypedRecord {
    pub fn partkey(&self) -> i32 {
        match self {
            TypedRecord::Part(p) => p.partkey,
            TypedRecord::PartSupp(p) => p.partkey,
        }
    }
}

pub fn decode_typed(record: &Record, table_type: TableType) -> Result<TypedRecord, Error> {
    match table_type {
        TableType::Part => Ok(TypedRecord::Part(PartRecord::from_record(record)?)),
        TableType::PartSupp => Ok(TypedRecord::PartSupp(PartSuppRecord::from_record(record)?)),
    }
}

/// Validates that `(outer, inner)` is one of the two supported orientations
/// of `{PART, PARTSUPP}`. Any other combination (including PART/PART or
/// PARTSUPP/PARTSUPP) fails immediately, per spec.md §4.8.
pub fn validate_schema_pair(outer: TableType, inner: TableType) -> Result<(), Error> {
    match (outer, inner) {
        (TableType::Part, TableType::PartSupp) | (TableType::PartSupp, TableType::Part) => Ok(()),
        _ => Err(Error::UnsupportedSchemaPair(
            outer.to_string(),
            inner.to_string(),
        )),
    }
}

/// Common shape every join executor returns: the populated `Statistics` for
/// the run. `memory_usage` and `elapsed_time` are filled in by the caller
/// per spec.md §4.8/§4.9 (BNLJ: `B * block_size`; hash join: a diagnostic
/// estimate of the build-side footprint).
pub type JoinOutcome = Result<Statistics, Error>;
