//! Polymorphic message contract
//!
//! Every frame is `[opcode][fields...]`. Implementors only describe their
//! fields through [`Message::write_fields`] and [`Message::read_fields`]; the
//! provided [`Message::write`] and [`Message::read`] handle the opcode byte,
//! length accounting and cursor restoration.

use std::any::Any;
use std::fmt;

use bytes::Bytes;
use tracing::trace;

use super::{Buffer, Error, Opcode, Result};

/// A concrete protocol message kind
pub trait Message: fmt::Debug + Send + Sync + Any {
    /// Opcode identifying this kind on the wire
    fn opcode(&self) -> Opcode;

    /// Full frame size in bytes, opcode included
    fn wire_size(&self) -> usize;

    /// Append the fields (without the opcode) in declared order
    fn write_fields(&self, buf: &mut Buffer);

    /// Consume the fields (without the opcode) in declared order
    ///
    /// Implementations must decode into locals and assign to `self` only once
    /// every field has been read and checked.
    fn read_fields(&mut self, buf: &mut Buffer) -> Result<()>;

    /// Borrow as [`Any`] for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Convert into a boxed [`Any`] for downcasting
    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Encode the frame, returning the number of bytes appended
    fn write(&self, buf: &mut Buffer) -> usize {
        let start = buf.len();
        buf.write_u8(self.opcode().as_u8());
        self.write_fields(buf);
        let written = buf.len() - start;
        debug_assert_eq!(
            written,
            self.wire_size(),
            "{} wrote wrong size",
            self.opcode()
        );
        trace!(opcode = %self.opcode(), written, "encoded frame");
        written
    }

    /// Decode the frame at the cursor, returning the number of bytes consumed
    ///
    /// On failure the cursor is restored to the start of the frame and `self`
    /// is left untouched.
    fn read(&mut self, buf: &mut Buffer) -> Result<usize> {
        let start = buf.position();
        let result = read_frame(self, buf);
        match result {
            Ok(()) => {
                let consumed = buf.position() - start;
                trace!(opcode = %self.opcode(), consumed, "decoded frame");
                Ok(consumed)
            }
            Err(err) => {
                buf.rewind_to(start);
                Err(err)
            }
        }
    }
}

fn read_frame<M: Message + ?Sized>(message: &mut M, buf: &mut Buffer) -> Result<()> {
    buf.ensure(message.wire_size())?;

    let expected = message.opcode();
    let found = buf.read_u8()?;
    if found != expected.as_u8() {
        return Err(Error::malformed(
            found,
            format!("expected opcode {expected} ({:#04x})", expected.as_u8()),
        ));
    }

    message.read_fields(buf)
}

impl dyn Message {
    /// Borrow as a concrete message kind
    #[must_use]
    pub fn downcast_ref<T: Message>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Check whether this message is of kind `T`
    #[must_use]
    pub fn is<T: Message>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Convert into a concrete message kind, `None` on mismatch
    #[must_use]
    pub fn downcast<T: Message>(self: Box<Self>) -> Option<Box<T>> {
        self.into_any().downcast::<T>().ok()
    }
}

/// Encode a single message into a fresh, exactly-sized byte string
#[must_use]
pub fn encode(message: &dyn Message) -> Bytes {
    let mut buf = Buffer::with_capacity(message.wire_size());
    message.write(&mut buf);
    buf.freeze()
}

/// Decode a frame of a statically known kind from the cursor
pub fn decode_as<T: Message + Default>(buf: &mut Buffer) -> Result<T> {
    let mut message = T::default();
    message.read(buf)?;
    Ok(message)
}
