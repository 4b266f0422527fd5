//! In-memory datagram link for tests and demos.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Weak};

use bytes::Bytes;

use super::{Transport, TransportError};

/// Default maximum number of queued datagrams per direction.
pub const DEFAULT_LOOPBACK_QUEUE: usize = 256;

type Queue = Mutex<VecDeque<Bytes>>;

/// One end of an in-memory datagram link.
///
/// Datagrams sent on one end are received, in order, on the other. Once an
/// end is dropped, sending from its peer fails with [`TransportError::Closed`].
#[derive(Debug)]
pub struct Loopback {
    inbox: Arc<Queue>,
    peer: Weak<Queue>,
    capacity: usize,
}

impl Loopback {
    /// Create two connected ends with the default queue capacity.
    #[must_use]
    pub fn pair() -> (Self, Self) {
        Self::pair_with_capacity(DEFAULT_LOOPBACK_QUEUE)
    }

    /// Create two connected ends holding at most `capacity` datagrams each way.
    #[must_use]
    pub fn pair_with_capacity(capacity: usize) -> (Self, Self) {
        let a = Arc::new(Mutex::new(VecDeque::new()));
        let b = Arc::new(Mutex::new(VecDeque::new()));
        let left = Self {
            peer: Arc::downgrade(&b),
            inbox: a,
            capacity,
        };
        let right = Self {
            peer: Arc::downgrade(&left.inbox),
            inbox: b,
            capacity,
        };
        (left, right)
    }

    /// Queue raw bytes as if the peer had sent them.
    pub fn inject(&self, datagram: impl Into<Bytes>) -> Result<(), TransportError> {
        push(&self.inbox, datagram.into(), self.capacity)
    }

    /// Number of datagrams waiting to be received on this end.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inbox.lock().map_or(0, |queue| queue.len())
    }
}

fn push(queue: &Queue, datagram: Bytes, capacity: usize) -> Result<(), TransportError> {
    let mut guard = queue.lock().map_err(|_| TransportError::Closed)?;
    if guard.len() >= capacity {
        return Err(TransportError::QueueFull { capacity });
    }
    guard.push_back(datagram);
    Ok(())
}

impl Transport for Loopback {
    fn send(&mut self, datagram: &[u8]) -> Result<usize, TransportError> {
        let peer = self.peer.upgrade().ok_or(TransportError::Closed)?;
        push(&peer, Bytes::copy_from_slice(datagram), self.capacity)?;
        Ok(datagram.len())
    }

    fn recv(&mut self) -> Result<Option<Bytes>, TransportError> {
        let mut guard = self.inbox.lock().map_err(|_| TransportError::Closed)?;
        Ok(guard.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivers_in_order() {
        let (mut a, mut b) = Loopback::pair();
        assert_eq!(a.send(&[1, 2]).unwrap(), 2);
        a.send(&[3]).unwrap();

        assert_eq!(b.pending(), 2);
        assert_eq!(b.recv().unwrap().unwrap().as_ref(), &[1, 2]);
        assert_eq!(b.recv().unwrap().unwrap().as_ref(), &[3]);
        assert!(b.recv().unwrap().is_none());
        assert!(a.recv().unwrap().is_none());
    }

    #[test]
    fn enqueue_respects_capacity() {
        let (mut a, _b) = Loopback::pair_with_capacity(1);
        a.send(&[0]).unwrap();
        assert_eq!(a.send(&[1]), Err(TransportError::QueueFull { capacity: 1 }));
    }

    #[test]
    fn send_after_peer_dropped_fails() {
        let (mut a, b) = Loopback::pair();
        drop(b);
        assert_eq!(a.send(&[0]), Err(TransportError::Closed));
    }

    #[test]
    fn inject_feeds_own_inbox() {
        let (mut a, _b) = Loopback::pair();
        a.inject(vec![9u8]).unwrap();
        assert_eq!(a.recv().unwrap().unwrap().as_ref(), &[9]);
    }
}
