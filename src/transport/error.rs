//! Transport-level error types covering adapter, framing and decode failures.

use core::fmt;

use crate::protocol::Error;

/// Unified error type for transport adapter operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Frame encoding/decoding failure.
    Protocol(Error),
    /// A single frame cannot fit in one datagram.
    FrameTooLarge {
        /// Size of the frame, plus any per-datagram header.
        len: usize,
        /// Maximum datagram size supported by the endpoint.
        max: usize,
    },
    /// The in-memory queue is at capacity.
    QueueFull {
        /// Configured maximum number of queued datagrams.
        capacity: usize,
    },
    /// The transport failed partway through a multi-datagram batch.
    PartialBatch {
        /// Datagrams accepted before the failure.
        delivered: usize,
        /// Datagrams the send attempt started with.
        total: usize,
        /// Error that interrupted the send.
        cause: Box<TransportError>,
    },
    /// The peer end is gone.
    Closed,
    /// Endpoint configuration was rejected.
    InvalidConfig(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Protocol(err) => write!(f, "protocol error: {err}"),
            Self::FrameTooLarge { len, max } => {
                write!(f, "frame too large: {len} bytes (max datagram {max})")
            }
            Self::QueueFull { capacity } => {
                write!(f, "datagram queue full (capacity {capacity})")
            }
            Self::PartialBatch {
                delivered,
                total,
                cause,
            } => write!(f, "batch interrupted after {delivered}/{total} datagrams: {cause}"),
            Self::Closed => write!(f, "transport closed"),
            Self::InvalidConfig(reason) => write!(f, "invalid endpoint config: {reason}"),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Protocol(err) => Some(err),
            Self::PartialBatch { cause, .. } => Some(cause.as_ref()),
            _ => None,
        }
    }
}

impl From<Error> for TransportError {
    fn from(err: Error) -> Self {
        Self::Protocol(err)
    }
}
