//! Transport adapter seam
//!
//! Socket I/O, retransmission and connection lifecycle live outside this
//! crate. This module defines the [`Transport`] trait they plug into, an
//! in-memory [`Loopback`] implementation and the [`Endpoint`] that packs and
//! unpacks frames.

mod endpoint;
mod error;
mod loopback;
mod transport;

pub use endpoint::{DEFAULT_MAX_DATAGRAM_SIZE, Endpoint, EndpointConfig};
pub use error::TransportError;
pub use loopback::{DEFAULT_LOOPBACK_QUEUE, Loopback};
pub use transport::Transport;
