//! Height-of-terrain query and answer

use crate::protocol::{Buffer, Error, Message, Opcode, Result, Vec3f};

/// Ask for the terrain height under `(x, y)`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HotRequest {
    /// Correlation id echoed by the matching [`HotResponse`]
    pub id: u32,
    /// Database x coordinate
    pub x: f64,
    /// Database y coordinate
    pub y: f64,
}

impl HotRequest {
    /// Opcode of this kind
    pub const OPCODE: Opcode = Opcode::HOT_REQUEST;
    /// Frame size in bytes
    pub const WIRE_SIZE: usize = 1 + 4 + 8 + 8;

    /// Build a request
    #[must_use]
    pub const fn new(id: u32, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }
}

impl Message for HotRequest {
    fn opcode(&self) -> Opcode {
        Self::OPCODE
    }

    fn wire_size(&self) -> usize {
        Self::WIRE_SIZE
    }

    fn write_fields(&self, buf: &mut Buffer) {
        buf.write_u32(self.id).write_f64(self.x).write_f64(self.y);
    }

    fn read_fields(&mut self, buf: &mut Buffer) -> Result<()> {
        let id = buf.read_u32()?;
        let x = buf.read_f64()?;
        let y = buf.read_f64()?;
        *self = Self { id, x, y };
        Ok(())
    }

    message_any!();
}

/// Terrain height reported for a [`HotRequest`]
///
/// `valid` is `false` when the point lies outside the loaded database; the
/// height and normal are then meaningless. On the wire it is a single byte
/// that must be `0` or `1`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HotResponse {
    /// Correlation id of the originating request
    pub id: u32,
    /// Whether terrain was found under the point
    pub valid: bool,
    /// Terrain height
    pub height: f64,
    /// Terrain normal
    pub normal: Vec3f,
}

impl HotResponse {
    /// Opcode of this kind
    pub const OPCODE: Opcode = Opcode::HOT_RESPONSE;
    /// Frame size in bytes
    pub const WIRE_SIZE: usize = 1 + 4 + 1 + 8 + Vec3f::WIRE_SIZE;

    /// Build a response for a point with terrain
    #[must_use]
    pub const fn hit(id: u32, height: f64, normal: Vec3f) -> Self {
        Self {
            id,
            valid: true,
            height,
            normal,
        }
    }

    /// Build a response for a point without terrain
    #[must_use]
    pub fn miss(id: u32) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}

impl Message for HotResponse {
    fn opcode(&self) -> Opcode {
        Self::OPCODE
    }

    fn wire_size(&self) -> usize {
        Self::WIRE_SIZE
    }

    fn write_fields(&self, buf: &mut Buffer) {
        buf.write_u32(self.id)
            .write_u8(u8::from(self.valid))
            .write_f64(self.height)
            .write_vec3f(self.normal);
    }

    fn read_fields(&mut self, buf: &mut Buffer) -> Result<()> {
        let id = buf.read_u32()?;
        let valid = match buf.read_u8()? {
            0 => false,
            1 => true,
            other => {
                return Err(Error::malformed(
                    Self::OPCODE.as_u8(),
                    format!("invalid boolean byte {other:#04x}"),
                ));
            }
        };
        let height = buf.read_f64()?;
        let normal = buf.read_vec3f()?;
        *self = Self {
            id,
            valid,
            height,
            normal,
        };
        Ok(())
    }

    message_any!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{decode_as, encode};

    #[test]
    fn test_request_roundtrip() {
        let original = HotRequest::new(11, 1024.5, -77.125);
        let mut buf = Buffer::new();
        assert_eq!(original.write(&mut buf), 21);

        let decoded: HotRequest = decode_as(&mut buf).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_response_roundtrip() {
        for original in [
            HotResponse::hit(11, 312.75, Vec3f::new(0.0, 0.1, 0.99)),
            HotResponse::miss(12),
        ] {
            let mut buf = Buffer::new();
            assert_eq!(original.write(&mut buf), 26);

            let decoded: HotResponse = decode_as(&mut buf).unwrap();
            assert_eq!(decoded, original);
        }
    }

    #[test]
    fn test_invalid_boolean_rejected() {
        let mut bytes = encode(&HotResponse::hit(1, 2.0, Vec3f::default())).to_vec();
        bytes[5] = 2;
        let mut buf = Buffer::from(bytes);

        let mut target = HotResponse::miss(99);
        let err = target.read(&mut buf).unwrap_err();

        assert!(matches!(err, Error::MalformedMessage { opcode: 0x05, .. }));
        assert_eq!(target, HotResponse::miss(99));
        assert_eq!(buf.position(), 0);
    }
}
