//! Protocol error types

use thiserror::Error;

/// Errors raised while encoding, decoding or dispatching frames
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A read asked for more bytes than the buffer still holds
    #[error("buffer underrun: need {needed} bytes, {remaining} remaining")]
    Underrun {
        /// Bytes the read required
        needed: usize,
        /// Bytes left in the buffer
        remaining: usize,
    },

    /// No decoder is registered for the leading opcode
    #[error("unknown opcode: {opcode:#04x}")]
    UnknownOpcode {
        /// Opcode byte found at the cursor
        opcode: u8,
    },

    /// Frame was structurally complete but failed a content check
    #[error("malformed message (opcode {opcode:#04x}): {reason}")]
    MalformedMessage {
        /// Opcode byte of the offending frame
        opcode: u8,
        /// What the check rejected
        reason: String,
    },

    /// An opcode was registered twice on the same registry
    #[error("opcode {opcode:#04x} is already registered")]
    DuplicateOpcode {
        /// Opcode that was already taken
        opcode: u8,
    },

    /// A factory was registered under an opcode its messages do not carry
    #[error("factory for opcode {opcode:#04x} produces opcode {produced:#04x}")]
    OpcodeMismatch {
        /// Opcode the factory was registered under
        opcode: u8,
        /// Opcode of the messages the factory builds
        produced: u8,
    },
}

impl Error {
    /// Shorthand for a [`Error::MalformedMessage`]
    pub(crate) fn malformed(opcode: u8, reason: impl Into<String>) -> Self {
        Self::MalformedMessage {
            opcode,
            reason: reason.into(),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
