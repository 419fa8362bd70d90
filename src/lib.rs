pub mod safe_int;
pub mod ym2612;
pub mod instrument;
pub mod bank;
pub mod gyb;
pub mod config;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for loading and building instrument banks.
#[derive(Error, Debug)]
pub enum Error {
    #[error("GYB file does not exist: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    #[error("Instrument data size does not match included size: length {actual:#06X} != total size {declared:#06X}")]
    SizeMismatch { declared: usize, actual: usize },

    #[error("{0} not yet supported")]
    Unsupported(String),

    #[error("Failed to add {kind} with ID {id}")]
    IdCollision { kind: &'static str, id: u16 },

    #[error("No free {0} IDs left")]
    IdsExhausted(&'static str),

    #[error("No bank with ID {0}")]
    UnknownBank(u16),

    #[error("I/O error: {0}")]
    Io(io::Error),
}

impl Error {
    pub fn invalid_format(reason: impl Into<String>) -> Self {
        Error::InvalidFormat(reason.into())
    }

    pub fn unsupported(what: impl Into<String>) -> Self {
        Error::Unsupported(what.into())
    }

    /// True for data that is corrupt or not GYB at all.
    pub fn is_format_error(&self) -> bool {
        matches!(self, Error::InvalidFormat(_) | Error::SizeMismatch { .. })
    }

    /// True for data that is valid but uses something this crate cannot interpret yet.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Error::Unsupported(_))
    }
}

// Running off the end of a buffer means the data is malformed,
// so the byte readers never surface it as a plain I/O error.
impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => Error::InvalidFormat(String::from("unexpected end of data")),
            _ => Error::Io(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
