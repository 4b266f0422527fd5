//! Opcode registry and frame dispatcher
//!
//! A [`Registry`] maps opcode bytes to factories producing empty messages.
//! Decoding peeks the opcode, builds the matching message and lets it read
//! itself. Registries are plain values: build one per protocol instance,
//! fill it at startup, then share it read-only.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace};

use super::metrics::{Metrics, MetricsSnapshot};
use super::{
    Buffer, Camera, Command, EntityState, Error, FrameHeader, HotRequest, HotResponse, LosRequest,
    LosResponse, Message, Opcode, Result,
};

type Factory = Box<dyn Fn() -> Box<dyn Message> + Send + Sync>;

fn factory_of<T: Message + Default>() -> (Opcode, Factory) {
    let opcode = T::default().opcode();
    let factory: Factory = Box::new(|| -> Box<dyn Message> { Box::new(T::default()) });
    (opcode, factory)
}

/// Opcode-to-decoder table
pub struct Registry {
    factories: HashMap<Opcode, Factory>,
    metrics: Metrics,
}

impl Registry {
    /// Create a registry with no kinds registered
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
            metrics: Metrics::new(),
        }
    }

    /// Create a registry holding every built-in message kind
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.install_builtin();
        registry
    }

    fn install_builtin(&mut self) {
        let builtin = [
            factory_of::<FrameHeader>(),
            factory_of::<EntityState>(),
            factory_of::<Camera>(),
            factory_of::<HotRequest>(),
            factory_of::<HotResponse>(),
            factory_of::<LosRequest>(),
            factory_of::<LosResponse>(),
            factory_of::<Command>(),
        ];
        for (opcode, factory) in builtin {
            self.factories.insert(opcode, factory);
        }
    }

    /// Register a factory for `opcode`
    ///
    /// The factory is called once here to check that its messages carry
    /// `opcode`.
    ///
    /// # Errors
    ///
    /// - [`Error::DuplicateOpcode`] if the opcode is already taken; the
    ///   existing factory stays in place
    /// - [`Error::OpcodeMismatch`] if the factory builds another kind
    pub fn register<F>(&mut self, opcode: impl Into<Opcode>, factory: F) -> Result<()>
    where
        F: Fn() -> Box<dyn Message> + Send + Sync + 'static,
    {
        let opcode = opcode.into();
        if self.factories.contains_key(&opcode) {
            return Err(Error::DuplicateOpcode {
                opcode: opcode.as_u8(),
            });
        }
        let produced = factory().opcode();
        if produced != opcode {
            return Err(Error::OpcodeMismatch {
                opcode: opcode.as_u8(),
                produced: produced.as_u8(),
            });
        }
        debug!(%opcode, "registered message kind");
        self.factories.insert(opcode, Box::new(factory));
        Ok(())
    }

    /// Register kind `T` under the opcode reported by `T::default()`
    pub fn register_kind<T: Message + Default>(&mut self) -> Result<()> {
        let opcode = T::default().opcode();
        self.register(opcode, || Box::new(T::default()))
    }

    /// Check whether `opcode` has a factory
    #[must_use]
    pub fn contains(&self, opcode: impl Into<Opcode>) -> bool {
        self.factories.contains_key(&opcode.into())
    }

    /// Number of registered kinds
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Check whether no kind is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Registered opcodes in ascending order
    #[must_use]
    pub fn opcodes(&self) -> Vec<Opcode> {
        let mut opcodes: Vec<Opcode> = self.factories.keys().copied().collect();
        opcodes.sort_unstable();
        opcodes
    }

    /// Decode the frame at the cursor
    ///
    /// Returns the populated message and the number of bytes consumed.
    ///
    /// # Errors
    ///
    /// - [`Error::Underrun`] if the buffer is empty or the frame is truncated
    /// - [`Error::UnknownOpcode`] if no factory matches the leading byte
    /// - [`Error::MalformedMessage`] if the frame fails a content check
    ///
    /// The cursor is left at the start of the frame on every error.
    pub fn decode(&self, buf: &mut Buffer) -> Result<(Box<dyn Message>, usize)> {
        let result = self.decode_frame(buf);
        match &result {
            Ok((message, consumed)) => self.metrics.record_decoded(message.opcode(), *consumed),
            Err(err) => self.metrics.record_error(err),
        }
        result
    }

    fn decode_frame(&self, buf: &mut Buffer) -> Result<(Box<dyn Message>, usize)> {
        let opcode = Opcode::new(buf.peek_u8()?);
        let Some(factory) = self.factories.get(&opcode) else {
            debug!(
                opcode = opcode.as_u8(),
                position = buf.position(),
                "no decoder for opcode"
            );
            return Err(Error::UnknownOpcode {
                opcode: opcode.as_u8(),
            });
        };

        let mut message = factory();
        let consumed = message.read(buf)?;
        trace!(%opcode, consumed, "dispatched frame");
        Ok((message, consumed))
    }

    /// Decode consecutive frames until the buffer is exhausted
    ///
    /// # Errors
    ///
    /// Stops at the first failing frame and returns its error; the cursor is
    /// left at the start of that frame so the caller can locate it.
    pub fn decode_all(&self, buf: &mut Buffer) -> Result<Vec<Box<dyn Message>>> {
        let mut messages = Vec::new();
        while buf.remaining() > 0 {
            let (message, _) = self.decode(buf)?;
            messages.push(message);
        }
        Ok(messages)
    }

    /// Snapshot of this registry's decode counters
    #[must_use]
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Frames of `opcode` decoded successfully so far
    #[must_use]
    pub fn decoded_count(&self, opcode: impl Into<Opcode>) -> u64 {
        self.metrics.decoded_for(opcode.into())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("opcodes", &self.opcodes())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Vec3d, Vec3f, encode};

    #[test]
    fn test_builtin_kinds() {
        let registry = Registry::with_builtin();
        assert_eq!(registry.len(), 8);
        assert_eq!(
            registry.opcodes().first().copied(),
            Some(Opcode::FRAME_HEADER)
        );
        assert!(registry.contains(Opcode::LOS_RESPONSE));
        assert!(!registry.contains(0x7Fu8));
    }

    #[test]
    fn test_decode_dispatches_to_matching_type() {
        let registry = Registry::with_builtin();
        let original =
            LosResponse::new(42, Vec3d::new(100.0, 200.0, 5.0), Vec3f::new(0.0, 0.0, 1.0));
        let mut buf = Buffer::from(encode(&original));

        let (message, consumed) = registry.decode(&mut buf).unwrap();

        assert_eq!(consumed, 41);
        assert_eq!(message.opcode(), Opcode::LOS_RESPONSE);
        assert_eq!(message.downcast_ref::<LosResponse>(), Some(&original));
        assert!(!message.is::<LosRequest>());
    }

    #[test]
    fn test_unknown_opcode_does_not_consume() {
        let registry = Registry::with_builtin();
        let mut buf = Buffer::from(vec![0xEEu8, 1, 2, 3]);

        let err = registry.decode(&mut buf).unwrap_err();

        assert_eq!(err, Error::UnknownOpcode { opcode: 0xEE });
        assert_eq!(buf.position(), 0);
        assert_eq!(registry.metrics().unknown_opcode, 1);
    }

    #[test]
    fn test_truncated_frame_is_underrun() {
        let registry = Registry::with_builtin();
        let mut buf = Buffer::from(vec![Opcode::LOS_RESPONSE.as_u8(), 42, 0, 0, 0]);

        let err = registry.decode(&mut buf).unwrap_err();

        assert_eq!(
            err,
            Error::Underrun {
                needed: 41,
                remaining: 5
            }
        );
        assert_eq!(buf.position(), 0);
        assert_eq!(registry.metrics().underrun, 1);
    }

    #[test]
    fn test_empty_buffer_is_underrun() {
        let registry = Registry::with_builtin();
        let err = registry.decode(&mut Buffer::new()).unwrap_err();
        assert_eq!(
            err,
            Error::Underrun {
                needed: 1,
                remaining: 0
            }
        );
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = Registry::new();
        registry
            .register(Opcode::LOS_RESPONSE, || Box::new(LosResponse::default()))
            .unwrap();

        let err = registry
            .register(Opcode::LOS_RESPONSE, || Box::new(LosRequest::default()))
            .unwrap_err();

        assert_eq!(err, Error::DuplicateOpcode { opcode: 0x07 });
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_kind_over_builtin_rejected() {
        let mut registry = Registry::with_builtin();
        let err = registry.register_kind::<Camera>().unwrap_err();
        assert_eq!(err, Error::DuplicateOpcode { opcode: 0x03 });
    }

    #[test]
    fn test_mismatched_factory_rejected_at_registration() {
        let mut registry = Registry::new();

        let err = registry
            .register(Opcode::LOS_REQUEST, || Box::new(LosResponse::default()))
            .unwrap_err();

        assert_eq!(
            err,
            Error::OpcodeMismatch {
                opcode: 0x06,
                produced: 0x07
            }
        );
        assert!(registry.is_empty());
        assert_eq!(registry.metrics().total_errors(), 0);
    }

    #[test]
    fn test_decode_all_stops_at_first_error() {
        let registry = Registry::with_builtin();
        let mut buf = Buffer::new();
        FrameHeader::new(1).write(&mut buf);
        Command::new(1, 2, 3, 4.0).write(&mut buf);
        let bad_at = buf.len();
        buf.write_u8(0xEE);

        let err = registry.decode_all(&mut buf).unwrap_err();

        assert_eq!(err, Error::UnknownOpcode { opcode: 0xEE });
        assert_eq!(buf.position(), bad_at);
        assert_eq!(registry.decoded_count(Opcode::COMMAND), 1);
        assert_eq!(registry.metrics().decoded, 2);
    }

    #[test]
    fn test_registries_are_independent() {
        let mut a = Registry::new();
        let b = Registry::new();
        a.register_kind::<Command>().unwrap();

        assert!(a.contains(Opcode::COMMAND));
        assert!(!b.contains(Opcode::COMMAND));
    }

    #[test]
    fn test_registry_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Registry>();
    }
}
