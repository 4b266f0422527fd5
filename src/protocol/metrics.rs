use std::sync::atomic::{AtomicU64, Ordering};

use super::{Error, Opcode};

/// Decode counters owned by a single [`Registry`](super::Registry).
///
/// Counters are relaxed atomics so a shared registry can be read from many
/// decode calls at once.
pub(crate) struct Metrics {
    decoded: AtomicU64,
    decoded_bytes: AtomicU64,
    unknown_opcode: AtomicU64,
    underrun: AtomicU64,
    malformed: AtomicU64,
    by_opcode: [AtomicU64; 256],
}

impl Metrics {
    pub(crate) fn new() -> Self {
        Self {
            decoded: AtomicU64::new(0),
            decoded_bytes: AtomicU64::new(0),
            unknown_opcode: AtomicU64::new(0),
            underrun: AtomicU64::new(0),
            malformed: AtomicU64::new(0),
            by_opcode: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }

    #[inline]
    pub(crate) fn record_decoded(&self, opcode: Opcode, bytes: usize) {
        self.decoded.fetch_add(1, Ordering::Relaxed);
        self.decoded_bytes
            .fetch_add(bytes as u64, Ordering::Relaxed);
        self.by_opcode[usize::from(opcode.as_u8())].fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_error(&self, err: &Error) {
        let counter = match err {
            Error::UnknownOpcode { .. } => &self.unknown_opcode,
            Error::Underrun { .. } => &self.underrun,
            Error::MalformedMessage { .. } => &self.malformed,
            // Raised at registration time only.
            Error::DuplicateOpcode { .. } | Error::OpcodeMismatch { .. } => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn decoded_for(&self, opcode: Opcode) -> u64 {
        self.by_opcode[usize::from(opcode.as_u8())].load(Ordering::Relaxed)
    }

    pub(crate) fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            decoded: self.decoded.load(Ordering::Relaxed),
            decoded_bytes: self.decoded_bytes.load(Ordering::Relaxed),
            unknown_opcode: self.unknown_opcode.load(Ordering::Relaxed),
            underrun: self.underrun.load(Ordering::Relaxed),
            malformed: self.malformed.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of a registry's decode counters.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Frames decoded successfully
    pub decoded: u64,
    /// Bytes consumed by successful decodes
    pub decoded_bytes: u64,
    /// Decodes rejected for an unregistered opcode
    pub unknown_opcode: u64,
    /// Decodes rejected for a truncated frame
    pub underrun: u64,
    /// Decodes rejected by a content check
    pub malformed: u64,
}

impl MetricsSnapshot {
    /// Sum of all failure counters.
    #[must_use]
    pub const fn total_errors(&self) -> u64 {
        self.unknown_opcode + self.underrun + self.malformed
    }

    /// Average successful frame size in bytes.
    #[must_use]
    pub fn avg_frame_size(&self) -> Option<u64> {
        if self.decoded == 0 {
            return None;
        }
        Some(self.decoded_bytes / self.decoded)
    }
}
