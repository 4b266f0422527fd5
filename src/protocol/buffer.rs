//! Cursor-based binary buffer
//!
//! All multi-byte values use little-endian byte order, protocol-wide. Writes
//! append at the end; reads consume from an independent read cursor. A read
//! that cannot be satisfied fails with [`Error::Underrun`] and leaves the
//! cursor where it was.

use bytes::{BufMut, Bytes, BytesMut};

use super::{Error, Result, Vec3d, Vec3f};

/// Growable byte buffer with sequential typed access
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buffer {
    data: BytesMut,
    cursor: usize,
}

macro_rules! primitive {
    ($ty:ty, $write:ident, $read:ident) => {
        #[doc = concat!("Append a `", stringify!($ty), "` in protocol byte order")]
        pub fn $write(&mut self, value: $ty) -> &mut Self {
            self.data.put_slice(&value.to_le_bytes());
            self
        }

        #[doc = concat!("Consume a `", stringify!($ty), "` in protocol byte order")]
        pub fn $read(&mut self) -> Result<$ty> {
            Ok(<$ty>::from_le_bytes(self.take()?))
        }
    };
}

impl Buffer {
    /// Create an empty buffer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer with room for `capacity` bytes
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: BytesMut::with_capacity(capacity),
            cursor: 0,
        }
    }

    /// Total bytes held, read or not
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check whether the buffer holds no bytes at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes left between the read cursor and the end
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    /// Current read cursor
    #[must_use]
    pub const fn position(&self) -> usize {
        self.cursor
    }

    /// Move the read cursor back to a checkpoint taken with [`Buffer::position`]
    ///
    /// Positions past the end are clamped to [`Buffer::len`].
    pub fn rewind_to(&mut self, position: usize) {
        self.cursor = position.min(self.data.len());
    }

    /// Every byte held, including already-consumed ones
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Bytes not yet consumed
    #[must_use]
    pub fn unread(&self) -> &[u8] {
        &self.data[self.cursor..]
    }

    /// Drop all content and reset the cursor, keeping the allocation
    pub fn clear(&mut self) {
        self.data.clear();
        self.cursor = 0;
    }

    /// Convert the written bytes into an immutable [`Bytes`]
    #[must_use]
    pub fn freeze(self) -> Bytes {
        self.data.freeze()
    }

    /// Look at the next byte without consuming it
    pub fn peek_u8(&self) -> Result<u8> {
        self.data.get(self.cursor).copied().ok_or(Error::Underrun {
            needed: 1,
            remaining: 0,
        })
    }

    /// Fail with [`Error::Underrun`] unless `needed` bytes remain
    pub fn ensure(&self, needed: usize) -> Result<()> {
        let remaining = self.remaining();
        if remaining < needed {
            return Err(Error::Underrun { needed, remaining });
        }
        Ok(())
    }

    /// Append raw bytes
    pub fn write_slice(&mut self, bytes: &[u8]) -> &mut Self {
        self.data.put_slice(bytes);
        self
    }

    primitive!(u8, write_u8, read_u8);
    primitive!(i8, write_i8, read_i8);
    primitive!(u16, write_u16, read_u16);
    primitive!(i16, write_i16, read_i16);
    primitive!(u32, write_u32, read_u32);
    primitive!(i32, write_i32, read_i32);
    primitive!(u64, write_u64, read_u64);
    primitive!(i64, write_i64, read_i64);
    primitive!(f32, write_f32, read_f32);
    primitive!(f64, write_f64, read_f64);

    /// Append a double-precision vector as `x, y, z`
    pub fn write_vec3d(&mut self, value: Vec3d) -> &mut Self {
        self.write_f64(value.x)
            .write_f64(value.y)
            .write_f64(value.z)
    }

    /// Consume a double-precision vector; all-or-nothing
    pub fn read_vec3d(&mut self) -> Result<Vec3d> {
        self.ensure(Vec3d::WIRE_SIZE)?;
        Ok(Vec3d::new(self.read_f64()?, self.read_f64()?, self.read_f64()?))
    }

    /// Append a single-precision vector as `x, y, z`
    pub fn write_vec3f(&mut self, value: Vec3f) -> &mut Self {
        self.write_f32(value.x)
            .write_f32(value.y)
            .write_f32(value.z)
    }

    /// Consume a single-precision vector; all-or-nothing
    pub fn read_vec3f(&mut self) -> Result<Vec3f> {
        self.ensure(Vec3f::WIRE_SIZE)?;
        Ok(Vec3f::new(self.read_f32()?, self.read_f32()?, self.read_f32()?))
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.ensure(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.cursor..self.cursor + N]);
        self.cursor += N;
        Ok(out)
    }
}

impl From<&[u8]> for Buffer {
    fn from(bytes: &[u8]) -> Self {
        Self {
            data: BytesMut::from(bytes),
            cursor: 0,
        }
    }
}

impl From<Vec<u8>> for Buffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self {
            data: BytesMut::from(&bytes[..]),
            cursor: 0,
        }
    }
}

impl From<Bytes> for Buffer {
    fn from(bytes: Bytes) -> Self {
        Self {
            data: BytesMut::from(&bytes[..]),
            cursor: 0,
        }
    }
}

impl AsRef<[u8]> for Buffer {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitives_little_endian() {
        let mut buf = Buffer::new();
        buf.write_u16(0x0102).write_u32(0x0304_0506).write_i8(-1);

        assert_eq!(buf.as_slice(), &[0x02, 0x01, 0x06, 0x05, 0x04, 0x03, 0xFF]);
        assert_eq!(buf.len(), 7);
    }

    #[test]
    fn test_sequential_reads() {
        let mut buf = Buffer::new();
        buf.write_u8(7)
            .write_i16(-300)
            .write_i32(-70_000)
            .write_u64(u64::MAX)
            .write_f32(1.5)
            .write_f64(-2.25);

        assert_eq!(buf.read_u8().unwrap(), 7);
        assert_eq!(buf.read_i16().unwrap(), -300);
        assert_eq!(buf.read_i32().unwrap(), -70_000);
        assert_eq!(buf.read_u64().unwrap(), u64::MAX);
        assert_eq!(buf.read_f32().unwrap().to_bits(), 1.5f32.to_bits());
        assert_eq!(buf.read_f64().unwrap().to_bits(), (-2.25f64).to_bits());
        assert_eq!(buf.remaining(), 0);
    }

    #[test]
    fn test_underrun_does_not_advance() {
        let mut buf = Buffer::from(&[1u8, 2, 3][..]);
        let err = buf.read_u32().unwrap_err();

        assert_eq!(
            err,
            Error::Underrun {
                needed: 4,
                remaining: 3
            }
        );
        assert_eq!(buf.position(), 0);
        assert_eq!(buf.read_u16().unwrap(), 0x0201);
    }

    #[test]
    fn test_vec3_read_is_all_or_nothing() {
        let mut buf = Buffer::new();
        buf.write_f64(1.0).write_f64(2.0);

        assert!(matches!(
            buf.read_vec3d(),
            Err(Error::Underrun {
                needed: 24,
                remaining: 16
            })
        ));
        assert_eq!(buf.position(), 0);
    }

    #[test]
    fn test_peek_is_non_consuming() {
        let mut buf = Buffer::new();
        assert!(buf.peek_u8().is_err());

        buf.write_u8(0x07).write_u8(0x08);
        assert_eq!(buf.peek_u8().unwrap(), 0x07);
        assert_eq!(buf.peek_u8().unwrap(), 0x07);
        assert_eq!(buf.remaining(), 2);
    }

    #[test]
    fn test_rewind_clamps_to_len() {
        let mut buf = Buffer::from(vec![1u8, 2, 3, 4]);
        buf.read_u16().unwrap();
        buf.rewind_to(0);
        assert_eq!(buf.position(), 0);

        buf.rewind_to(100);
        assert_eq!(buf.remaining(), 0);
    }

    #[test]
    fn test_clear_and_freeze() {
        let mut buf = Buffer::with_capacity(16);
        buf.write_u32(9);
        buf.read_u8().unwrap();
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.position(), 0);

        buf.write_u8(1).write_slice(&[2, 3]);
        assert_eq!(buf.unread(), &[1, 2, 3]);
        assert_eq!(buf.freeze().as_ref(), &[1, 2, 3]);
    }
}
