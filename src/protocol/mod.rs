//! IG protocol core implementation
//!
//! This module provides the byte buffer, the message contract, the built-in
//! message kinds and the opcode registry.

mod buffer;
mod error;
mod message;
mod messages;
mod metrics;
mod registry;
mod types;

pub use buffer::Buffer;
pub use error::{Error, Result};
pub use message::{Message, decode_as, encode};
pub use messages::{
    Camera, Command, EntityState, FRAME_MAGIC, FrameHeader, HotRequest, HotResponse, LosRequest,
    LosResponse,
};
pub use metrics::MetricsSnapshot;
pub use registry::Registry;
pub use types::{Opcode, Vec3, Vec3d, Vec3f};

/// Size of the opcode tag leading every frame
pub const OPCODE_SIZE: usize = 1;

/// Largest built-in frame ([`LosRequest`])
pub const MAX_BUILTIN_FRAME_SIZE: usize = LosRequest::WIRE_SIZE;
