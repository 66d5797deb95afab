use clap::{Parser, Subcommand};
use colored::{Color, Colorize};
use std::path::PathBuf;

use blockjoin::join::JoinAlgorithm;
use blockjoin::schema::TableType;

mod headings {
    pub const CONVERT_OPTIONS: &str = "Conversion Options";
    pub const JOIN_OPTIONS: &str = "Join Options";
}

/// Block-nested-loops and hash join engine over a TPC-H PART/PARTSUPP
/// block file format.
#[derive(Parser)]
#[command(version, about, long_about)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Verbosity level for logging/debugging
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a pipe-delimited text ingest file into a block file.
    #[command(arg_required_else_help = true)]
    ConvertCsv {
        /// Input CSV (pipe-delimited) file path
        #[arg(long, value_name = "FILE", help_heading = headings::CONVERT_OPTIONS)]
        csv_file: PathBuf,

        /// Output block file path
        #[arg(long, value_name = "FILE", help_heading = headings::CONVERT_OPTIONS)]
        block_file: PathBuf,

        /// Table schema the CSV lines follow
        #[arg(long, value_enum, help_heading = headings::CONVERT_OPTIONS)]
        table_type: TableTypeArg,

        /// Block size in bytes
        #[arg(long, default_value_t = 4096, help_heading = headings::CONVERT_OPTIONS)]
        block_size: usize,
    },

    /// Perform an equi-join on PARTKEY between a PART and a PARTSUPP block file.
    #[command(arg_required_else_help = true)]
    Join {
        /// Outer table file (block format)
        #[arg(long, value_name = "FILE", help_heading = headings::JOIN_OPTIONS)]
        outer_table: PathBuf,

        /// Inner table file (block format)
        #[arg(long, value_name = "FILE", help_heading = headings::JOIN_OPTIONS)]
        inner_table: PathBuf,

        /// Outer table schema
        #[arg(long, value_enum, help_heading = headings::JOIN_OPTIONS)]
        outer_type: TableTypeArg,

        /// Inner table schema
        #[arg(long, value_enum, help_heading = headings::JOIN_OPTIONS)]
        inner_type: TableTypeArg,

        /// Output file path
        #[arg(long, value_name = "FILE", help_heading = headings::JOIN_OPTIONS)]
        output: PathBuf,

        /// Number of buffer blocks (ignored by the hash join)
        #[arg(long, default_value_t = 10, help_heading = headings::JOIN_OPTIONS)]
        buffer_size: usize,

        /// Block size in bytes
        #[arg(long, default_value_t = 4096, help_heading = headings::JOIN_OPTIONS)]
        block_size: usize,

        /// Join algorithm to use
        #[arg(long, value_enum, default_value_t = AlgorithmArg::Bnlj, help_heading = headings::JOIN_OPTIONS)]
        algorithm: AlgorithmArg,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableTypeArg {
    Part,
    Partsupp,
}

impl From<TableTypeArg> for TableType {
    fn from(value: TableTypeArg) -> Self {
        match value {
            TableTypeArg::Part => TableType::Part,
            TableTypeArg::Partsupp => TableType::PartSupp,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlgorithmArg {
    Bnlj,
    Hash,
    Multithreaded,
    Prefetching,
}

impl From<AlgorithmArg> for JoinAlgorithm {
    fn from(value: AlgorithmArg) -> Self {
        match value {
            AlgorithmArg::Bnlj => JoinAlgorithm::Bnlj,
            AlgorithmArg::Hash => JoinAlgorithm::Hash,
            AlgorithmArg::Multithreaded => JoinAlgorithm::Multithreaded,
            AlgorithmArg::Prefetching => JoinAlgorithm::Prefetching,
        }
    }
}

/// Macro for printing debug messages with formatting, only above a
/// verbosity threshold.
macro_rules! debug {
    ($cli:expr, $msg:expr) => {
        if $cli.verbose > 0 {
            println!("{}{}", "D : ".bold().color(Color::BrightBlack), $msg.color(Color::BrightBlack));
        }
    };
}

/// Macro for printing error messages with formatting, unconditionally.
macro_rules! error {
    ($msg:expr) => {
        println!("{}{}", "E : ".bold().red(), $msg.red());
    };
}

pub(crate) use debug;
pub(crate) use error;
