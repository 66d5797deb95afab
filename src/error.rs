use std::io;

#[derive(Debug)]
pub enum Error {
    OpenFile(String, io::Error),
    OversizedRecord { record_size: usize, block_size: usize },
    UnsupportedSchemaPair(String, String),
    InvalidBufferSize(usize),
    InvalidBlockSize(usize),
    MalformedFrame(String),
    MalformedField { field: &'static str, value: String },
    UnknownTableType(String),
    UnknownAlgorithm(String),
    IOError(io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::OpenFile(path, err) => write!(f, "failed to open '{}': {}", path, err),
            Error::OversizedRecord { record_size, block_size } => write!(
                f,
                "record of {} bytes does not fit in an empty block of {} bytes",
                record_size, block_size
            ),
            Error::UnsupportedSchemaPair(a, b) => {
                write!(f, "unsupported schema pair: {} / {}", a, b)
            }
            Error::InvalidBufferSize(b) => write!(f, "invalid buffer size: {} (must be >= 2)", b),
            Error::InvalidBlockSize(n) => write!(f, "invalid block size: {} (must be >= 1)", n),
            Error::MalformedFrame(msg) => write!(f, "malformed frame: {}", msg),
            Error::MalformedField { field, value } => {
                write!(f, "malformed field '{}': '{}'", field, value)
            }
            Error::UnknownTableType(t) => write!(f, "unknown table type: {}", t),
            Error::UnknownAlgorithm(a) => write!(f, "unknown join algorithm: {}", a),
            Error::IOError(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::IOError(err)
    }
}
