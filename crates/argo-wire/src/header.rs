//! Message header.
//!
//! Layout (4 bytes):
//! - magic: `b"AR"`
//! - version: u8
//! - flags: u8
//!
//! Flag bits beyond the known set are rejected so that a newer writer's
//! messages fail loudly instead of decoding wrong.

/// Magic bytes identifying an encoded result.
pub const MAGIC: [u8; 2] = *b"AR";

/// Format version.
pub const VERSION: u8 = 1;

pub const HEADER_SIZE: usize = 4;

/// Header flag bits.
pub mod flags {
    /// Body is a self-describing value, not typed by a query.
    pub const SELF_DESCRIBING: u8 = 1 << 0;
    /// A detached error section follows the root value.
    pub const HAS_ERRORS: u8 = 1 << 1;
    /// Writer did not deduplicate strings or bytes.
    pub const NO_DEDUP: u8 = 1 << 2;
    /// An extensions block reference follows the errors.
    pub const HAS_EXTENSIONS: u8 = 1 << 3;

    pub const ALL: u8 = SELF_DESCRIBING | HAS_ERRORS | NO_DEDUP | HAS_EXTENSIONS;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeaderError {
    #[error("message too short for header: {0} bytes")]
    TooShort(usize),

    #[error("invalid magic: {0:02x?}")]
    BadMagic([u8; 2]),

    #[error("unsupported format version {0} (expected {VERSION})")]
    UnsupportedVersion(u8),

    #[error("unknown header flags {0:#010b}")]
    UnknownFlags(u8),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Header {
    pub self_describing: bool,
    pub has_errors: bool,
    pub no_dedup: bool,
    pub has_extensions: bool,
}

impl Header {
    pub fn flags(&self) -> u8 {
        let mut f = 0;
        if self.self_describing {
            f |= flags::SELF_DESCRIBING;
        }
        if self.has_errors {
            f |= flags::HAS_ERRORS;
        }
        if self.no_dedup {
            f |= flags::NO_DEDUP;
        }
        if self.has_extensions {
            f |= flags::HAS_EXTENSIONS;
        }
        f
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        [MAGIC[0], MAGIC[1], VERSION, self.flags()]
    }

    /// Parse and validate the header at the start of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HeaderError> {
        if bytes.len() < HEADER_SIZE {
            return Err(HeaderError::TooShort(bytes.len()));
        }
        let magic = [bytes[0], bytes[1]];
        if magic != MAGIC {
            return Err(HeaderError::BadMagic(magic));
        }
        if bytes[2] != VERSION {
            return Err(HeaderError::UnsupportedVersion(bytes[2]));
        }
        let f = bytes[3];
        if f & !flags::ALL != 0 {
            return Err(HeaderError::UnknownFlags(f));
        }
        Ok(Self {
            self_describing: f & flags::SELF_DESCRIBING != 0,
            has_errors: f & flags::HAS_ERRORS != 0,
            no_dedup: f & flags::NO_DEDUP != 0,
            has_extensions: f & flags::HAS_EXTENSIONS != 0,
        })
    }
}
