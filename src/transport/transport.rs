//! Datagram transport seam.

use bytes::Bytes;

use super::error::TransportError;

/// Raw datagram carrier.
///
/// Implementations own reliability, addressing and connection lifecycle;
/// the protocol layer only hands over and takes back whole datagrams.
pub trait Transport {
    /// Send one datagram, returning the number of bytes accepted.
    fn send(&mut self, datagram: &[u8]) -> Result<usize, TransportError>;

    /// Take the next inbound datagram, `None` if nothing is pending.
    fn recv(&mut self) -> Result<Option<Bytes>, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, datagram: &[u8]) -> Result<usize, TransportError> {
        (**self).send(datagram)
    }

    fn recv(&mut self) -> Result<Option<Bytes>, TransportError> {
        (**self).recv()
    }
}
