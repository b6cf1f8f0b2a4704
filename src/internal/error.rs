use thiserror::Error;

/// Unified error type for the BSER codec.
#[derive(Error, Debug)]
pub enum Error {
    /// The encoder was handed a value it has no wire form for.
    #[error("Unsupported value type: {0}")]
    UnsupportedValue(String),

    /// An encode buffer or decoded container could not be allocated.
    #[error("Out of memory: failed to allocate {requested} bytes")]
    OutOfMemory { requested: usize },

    /// The magic/version prefix did not match.
    #[error("invalid bser header: {found:02x?}")]
    InvalidHeader { found: Vec<u8> },

    /// A byte in opcode position is not an opcode valid at that point.
    #[error("invalid bser opcode 0x{opcode:02x} at offset {offset} (expected {expected})")]
    InvalidOpcode {
        opcode: u8,
        offset: usize,
        expected: &'static str,
    },

    /// Fewer bytes remain than the current item requires.
    #[error("input buffer too small: needed {needed} bytes at offset {offset}, {available} available")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// The header length disagrees with the number of payload bytes.
    #[error("bser data len {actual} != header len {declared}")]
    LengthMismatch { declared: i64, actual: usize },

    /// The opcode after a TEMPLATE marker was not ARRAY.
    #[error("expected ARRAY to follow TEMPLATE, found 0x{found:02x}")]
    MalformedTemplate { found: u8 },

    /// A count or length field decoded to a negative number.
    #[error("invalid {what} length {value}")]
    InvalidLength { what: &'static str, value: i64 },

    /// An integer cannot be represented as a signed 64-bit value.
    #[error("Integer out of range: {0}")]
    IntegerOutOfRange(String),

    /// The encoded payload does not fit the int32 header length field.
    #[error("Encoded payload of {len} bytes exceeds the header length field")]
    PayloadTooLarge { len: usize },

    /// Containers nested deeper than the configured limit.
    #[error("Maximum nesting depth ({limit}) exceeded")]
    NestingTooDeep { limit: usize },
}

impl Error {
    /// Returns true when the failure only means the input ended early.
    ///
    /// A stream consumer can keep reading after such an error; any other
    /// variant is a protocol violation.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Error::TruncatedInput { .. })
    }
}

/// A specialized `Result` type for BSER operations.
pub type Result<T> = std::result::Result<T, Error>;
