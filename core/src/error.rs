/// Error type shared by the record codecs.
///
/// Every error is terminal for the call that raised it; no partial output is
/// ever returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The caller handed over data violating a wire-format contract.
    InvalidInput(&'static str),
    /// The settings record carries a version byte this codec does not read.
    UnsupportedVersion { expected: u8, actual: u8 },
    /// The record trailer does not match the recomputed payload checksum.
    ChecksumMismatch { expected: u16, actual: u16 },
    /// A required image was not supplied.
    MissingInput(&'static str),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::InvalidInput(what) => write!(f, "invalid input: {what}"),
            Error::UnsupportedVersion { expected, actual } => {
                write!(f, "unsupported record version {actual} (expected {expected})")
            }
            Error::ChecksumMismatch { expected, actual } => {
                write!(f, "checksum mismatch: record says {expected:#06x}, payload is {actual:#06x}")
            }
            Error::MissingInput(what) => write!(f, "missing input: {what}"),
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
