//! IG wire protocol - binary messages between a host simulation and an image generator
//!
//! This library implements the fixed-opcode frame format exchanged between a
//! simulation host and a networked rendering node: a cursor-based byte
//! buffer, a polymorphic message contract, the built-in message kinds and an
//! opcode registry that dispatches inbound frames to the right decoder.
//!
//! # Quick Start
//!
//! ```rust
//! use igproto::{Buffer, LosResponse, Message, Registry, Vec3d, Vec3f};
//!
//! // Build and encode a message
//! let response = LosResponse::new(42, Vec3d::new(100.0, 200.0, 5.0), Vec3f::new(0.0, 0.0, 1.0));
//! let mut buf = Buffer::new();
//! assert_eq!(response.write(&mut buf), 41);
//!
//! // Decode without knowing the kind in advance
//! let registry = Registry::with_builtin();
//! let (message, consumed) = registry.decode(&mut buf)?;
//! assert_eq!(consumed, 41);
//! assert_eq!(message.downcast_ref::<LosResponse>(), Some(&response));
//! # Ok::<(), igproto::Error>(())
//! ```
//!
//! # Wire Format
//!
//! ```text
//! [OPCODE (1 byte)] [FIELDS (fixed width, little-endian, declared order)]
//! ```
//!
//! Framing beyond the opcode, reliability and socket I/O belong to the
//! transport; see the [`transport`] module for the seam.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod protocol;
pub mod transport;

pub use protocol::{
    Buffer, Camera, Command, EntityState, Error, FrameHeader, HotRequest, HotResponse, LosRequest,
    LosResponse, Message, Opcode, Registry, Result, Vec3, Vec3d, Vec3f,
};
pub use transport::{Endpoint, EndpointConfig, Loopback, Transport, TransportError};

/// Protocol revision implemented by this crate
pub const VERSION: &str = "1.0";
