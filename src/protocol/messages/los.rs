//! Line-of-sight query and answer

use crate::protocol::{Buffer, Message, Opcode, Result, Vec3d, Vec3f};

/// Ask the IG whether the segment `start..end` hits scene geometry
///
/// # Wire Format
///
/// ```text
/// offset  bytes  field
/// 0       1      opcode (0x06)
/// 1       4      id (u32)
/// 5       24     start x, y, z (f64)
/// 29      24     end x, y, z (f64)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LosRequest {
    /// Correlation id echoed by the matching [`LosResponse`]
    pub id: u32,
    /// Segment start in database coordinates
    pub start: Vec3d,
    /// Segment end in database coordinates
    pub end: Vec3d,
}

impl LosRequest {
    /// Opcode of this kind
    pub const OPCODE: Opcode = Opcode::LOS_REQUEST;
    /// Frame size in bytes
    pub const WIRE_SIZE: usize = 1 + 4 + Vec3d::WIRE_SIZE * 2;

    /// Build a request
    #[must_use]
    pub const fn new(id: u32, start: Vec3d, end: Vec3d) -> Self {
        Self { id, start, end }
    }
}

impl Message for LosRequest {
    fn opcode(&self) -> Opcode {
        Self::OPCODE
    }

    fn wire_size(&self) -> usize {
        Self::WIRE_SIZE
    }

    fn write_fields(&self, buf: &mut Buffer) {
        buf.write_u32(self.id)
            .write_vec3d(self.start)
            .write_vec3d(self.end);
    }

    fn read_fields(&mut self, buf: &mut Buffer) -> Result<()> {
        let id = buf.read_u32()?;
        let start = buf.read_vec3d()?;
        let end = buf.read_vec3d()?;
        *self = Self { id, start, end };
        Ok(())
    }

    message_any!();
}

/// Intersection reported for a [`LosRequest`]
///
/// # Wire Format
///
/// ```text
/// offset  bytes  field
/// 0       1      opcode (0x07)
/// 1       4      id (u32)
/// 5       24     position x, y, z (f64)
/// 29      12     normal x, y, z (f32)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LosResponse {
    /// Correlation id of the originating request
    pub id: u32,
    /// Hit position in database coordinates
    pub position: Vec3d,
    /// Surface normal at the hit
    pub normal: Vec3f,
}

impl LosResponse {
    /// Opcode of this kind
    pub const OPCODE: Opcode = Opcode::LOS_RESPONSE;
    /// Frame size in bytes
    pub const WIRE_SIZE: usize = 1 + 4 + Vec3d::WIRE_SIZE + Vec3f::WIRE_SIZE;

    /// Build a response
    #[must_use]
    pub const fn new(id: u32, position: Vec3d, normal: Vec3f) -> Self {
        Self {
            id,
            position,
            normal,
        }
    }
}

impl Message for LosResponse {
    fn opcode(&self) -> Opcode {
        Self::OPCODE
    }

    fn wire_size(&self) -> usize {
        Self::WIRE_SIZE
    }

    fn write_fields(&self, buf: &mut Buffer) {
        buf.write_u32(self.id)
            .write_vec3d(self.position)
            .write_vec3f(self.normal);
    }

    fn read_fields(&mut self, buf: &mut Buffer) -> Result<()> {
        let id = buf.read_u32()?;
        let position = buf.read_vec3d()?;
        let normal = buf.read_vec3f()?;
        *self = Self {
            id,
            position,
            normal,
        };
        Ok(())
    }

    message_any!();
}
