//! Frame packing and demultiplexing over a [`Transport`].

use std::collections::VecDeque;
use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, instrument, trace, warn};

use crate::protocol::{Buffer, FrameHeader, Message, OPCODE_SIZE, Registry};

use super::{Transport, TransportError};

/// Default datagram budget: Ethernet MTU minus IPv4 and UDP headers.
pub const DEFAULT_MAX_DATAGRAM_SIZE: usize = 1472;

/// Endpoint configuration options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    /// Upper bound on the size of each outbound datagram.
    pub max_datagram_size: usize,
    /// Lead every outbound datagram with a [`FrameHeader`] carrying the
    /// batch counter.
    pub stamp_frame_header: bool,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            max_datagram_size: DEFAULT_MAX_DATAGRAM_SIZE,
            stamp_frame_header: false,
        }
    }
}

impl EndpointConfig {
    /// Bytes reserved at the start of each datagram.
    #[must_use]
    pub const fn overhead(&self) -> usize {
        if self.stamp_frame_header {
            FrameHeader::WIRE_SIZE
        } else {
            0
        }
    }

    /// Reject budgets too small to carry any frame.
    pub fn validate(&self) -> Result<(), TransportError> {
        let minimum = self.overhead() + OPCODE_SIZE;
        if self.max_datagram_size < minimum {
            return Err(TransportError::InvalidConfig(format!(
                "max_datagram_size {} is below the minimum of {minimum}",
                self.max_datagram_size
            )));
        }
        Ok(())
    }
}

/// Protocol endpoint bound to one transport and one registry.
///
/// Outbound, messages are packed back to back into as few datagrams as the
/// size budget allows. Inbound, every frame of a datagram is decoded in
/// order; the first bad frame is logged and the rest of that datagram is
/// discarded.
///
/// A batch is encoded in full before anything is handed to the transport.
/// If the transport fails after some of its datagrams went out, the rest are
/// held back and [`Endpoint::flush_unsent`] resumes where it stopped.
#[derive(Debug)]
pub struct Endpoint<T> {
    transport: T,
    registry: Arc<Registry>,
    config: EndpointConfig,
    frame_number: u32,
    discarded_bytes: u64,
    unsent: VecDeque<Bytes>,
}

impl<T: Transport> Endpoint<T> {
    /// Bind a transport to a registry.
    pub fn new(
        transport: T,
        registry: Arc<Registry>,
        config: EndpointConfig,
    ) -> Result<Self, TransportError> {
        config.validate()?;
        Ok(Self {
            transport,
            registry,
            config,
            frame_number: 0,
            discarded_bytes: 0,
            unsent: VecDeque::new(),
        })
    }

    /// Registry used for inbound decoding.
    #[must_use]
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &EndpointConfig {
        &self.config
    }

    /// Number of batches fully sent so far.
    ///
    /// Also the frame number stamped on the next batch.
    #[must_use]
    pub const fn frame_number(&self) -> u32 {
        self.frame_number
    }

    /// Inbound bytes dropped after decode failures.
    #[must_use]
    pub const fn discarded_bytes(&self) -> u64 {
        self.discarded_bytes
    }

    /// Datagrams of a partially sent batch still waiting for the transport.
    #[must_use]
    pub fn unsent_datagrams(&self) -> usize {
        self.unsent.len()
    }

    /// Mutable access to the underlying transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Release the underlying transport.
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Send a single message in its own datagram.
    pub fn send(&mut self, message: &dyn Message) -> Result<usize, TransportError> {
        self.send_batch(&[message])
    }

    /// Pack messages into datagrams and send them, returning bytes sent.
    ///
    /// Nothing is sent if any message cannot fit in a datagram on its own,
    /// and an empty batch sends nothing. Datagrams left over from an earlier
    /// partial send go out first.
    ///
    /// # Errors
    ///
    /// If the transport fails before the first datagram of the batch is
    /// accepted, the batch is dropped and the transport error is returned
    /// as is. If it fails later, [`TransportError::PartialBatch`] reports
    /// how many datagrams were delivered and the rest stay queued for
    /// [`Endpoint::flush_unsent`].
    #[instrument(level = "trace", skip(self, messages), fields(count = messages.len()))]
    pub fn send_batch(&mut self, messages: &[&dyn Message]) -> Result<usize, TransportError> {
        if messages.is_empty() {
            return Ok(0);
        }

        let max = self.config.max_datagram_size;
        let overhead = self.config.overhead();
        if let Some(oversized) = messages
            .iter()
            .find(|message| overhead + message.wire_size() > max)
        {
            return Err(TransportError::FrameTooLarge {
                len: overhead + oversized.wire_size(),
                max,
            });
        }

        let mut sent = self.flush_unsent()?;

        let frame_number = self.frame_number;
        let datagrams = self.pack(messages);
        let total = datagrams.len();
        self.unsent.extend(datagrams);
        match self.drain_unsent() {
            Ok(bytes) => sent += bytes,
            Err((0, cause)) => {
                self.unsent.clear();
                return Err(cause);
            }
            Err((delivered, cause)) => {
                return Err(TransportError::PartialBatch {
                    delivered,
                    total,
                    cause: Box::new(cause),
                });
            }
        }

        debug!(frame_number, datagrams = total, sent, "sent batch");
        Ok(sent)
    }

    /// Resume a partially sent batch, returning bytes sent.
    ///
    /// Returns `Ok(0)` when nothing is held back.
    ///
    /// # Errors
    ///
    /// [`TransportError::PartialBatch`] if the transport fails again; the
    /// datagrams it did not accept stay queued.
    pub fn flush_unsent(&mut self) -> Result<usize, TransportError> {
        if self.unsent.is_empty() {
            return Ok(0);
        }
        let total = self.unsent.len();
        self.drain_unsent().map_err(|(delivered, cause)| TransportError::PartialBatch {
            delivered,
            total,
            cause: Box::new(cause),
        })
    }

    fn pack(&self, messages: &[&dyn Message]) -> Vec<Bytes> {
        let max = self.config.max_datagram_size;
        let overhead = self.config.overhead();

        let mut datagrams = Vec::new();
        let mut buf = Buffer::with_capacity(max);
        self.begin_datagram(&mut buf);
        for message in messages {
            if buf.len() + message.wire_size() > max {
                datagrams.push(buf.freeze());
                buf = Buffer::with_capacity(max);
                self.begin_datagram(&mut buf);
            }
            message.write(&mut buf);
        }
        if buf.len() > overhead {
            datagrams.push(buf.freeze());
        }
        datagrams
    }

    fn begin_datagram(&self, buf: &mut Buffer) {
        if self.config.stamp_frame_header {
            FrameHeader::new(self.frame_number).write(buf);
        }
    }

    /// Hand queued datagrams to the transport in order. On failure, returns
    /// how many were accepted in this call along with the error.
    fn drain_unsent(&mut self) -> Result<usize, (usize, TransportError)> {
        let mut sent = 0;
        let mut delivered = 0;
        while let Some(datagram) = self.unsent.front() {
            match self.transport.send(datagram) {
                Ok(len) => {
                    trace!(len, "flushed datagram");
                    sent += len;
                    delivered += 1;
                    self.unsent.pop_front();
                }
                Err(err) => {
                    warn!(
                        error = %err,
                        delivered,
                        held = self.unsent.len(),
                        "batch interrupted"
                    );
                    return Err((delivered, err));
                }
            }
        }
        self.frame_number = self.frame_number.wrapping_add(1);
        Ok(sent)
    }

    /// Receive one datagram and decode every frame in it.
    ///
    /// Returns `Ok(None)` when nothing is pending. A decode failure does not
    /// fail the poll: frames before the bad one are returned and the rest of
    /// the datagram is dropped.
    #[instrument(level = "trace", skip(self))]
    pub fn poll(&mut self) -> Result<Option<Vec<Box<dyn Message>>>, TransportError> {
        let Some(datagram) = self.transport.recv()? else {
            return Ok(None);
        };

        let mut buf = Buffer::from(datagram);
        let mut messages = Vec::new();
        while buf.remaining() > 0 {
            match self.registry.decode(&mut buf) {
                Ok((message, _)) => messages.push(message),
                Err(err) => {
                    let discarded = buf.remaining();
                    warn!(
                        error = %err,
                        offset = buf.position(),
                        discarded,
                        "discarding rest of datagram"
                    );
                    self.discarded_bytes += discarded as u64;
                    break;
                }
            }
        }

        trace!(frames = messages.len(), len = buf.len(), "polled datagram");
        Ok(Some(messages))
    }
}
