use std::fmt;

/// Errors that can occur when configuring a generator or decoding foreign data.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Error {
    /// The alphabet has fewer than two symbols.
    AlphabetTooShort,
    /// The alphabet contains the same symbol more than once.
    DuplicateSymbol(char),
    /// The worker id is larger than [`MAX_WORKER_ID`](crate::MAX_WORKER_ID).
    WorkerIdOutOfRange(u16),
    /// The datacenter id is larger than [`MAX_DATACENTER_ID`](crate::MAX_DATACENTER_ID).
    DatacenterIdOutOfRange(u8),
    /// The string contains a character which is not part of the alphabet.
    InvalidChar,
    /// The decoded value does not fit into 128 bits.
    Overflow,
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    /// Formats the error message for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::AlphabetTooShort => write!(f, "alphabet must contain at least 2 symbols"),
            Self::DuplicateSymbol(c) => write!(f, "alphabet contains symbol {c:?} more than once"),
            Self::WorkerIdOutOfRange(id) => write!(f, "worker id {id} is not between 0 and 1023"),
            Self::DatacenterIdOutOfRange(id) => write!(f, "datacenter id {id} is not between 0 and 31"),
            Self::InvalidChar => write!(f, "string contains an invalid character"),
            Self::Overflow => write!(f, "value is too large"),
        }
    }
}
