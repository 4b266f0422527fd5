//! Scene state updates sent by the host

use crate::protocol::{Buffer, Message, Opcode, Result, Vec3d, Vec3f};

/// Position and attitude of a scene entity
///
/// Attitude is `(heading, pitch, roll)` in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityState {
    /// Entity identifier
    pub id: u32,
    /// Position in database coordinates
    pub position: Vec3d,
    /// Heading, pitch, roll in degrees
    pub attitude: Vec3f,
}

impl EntityState {
    /// Opcode of this kind
    pub const OPCODE: Opcode = Opcode::ENTITY_STATE;
    /// Frame size in bytes
    pub const WIRE_SIZE: usize = 1 + 4 + Vec3d::WIRE_SIZE + Vec3f::WIRE_SIZE;

    /// Build an entity update
    #[must_use]
    pub const fn new(id: u32, position: Vec3d, attitude: Vec3f) -> Self {
        Self {
            id,
            position,
            attitude,
        }
    }
}

impl Message for EntityState {
    fn opcode(&self) -> Opcode {
        Self::OPCODE
    }

    fn wire_size(&self) -> usize {
        Self::WIRE_SIZE
    }

    fn write_fields(&self, buf: &mut Buffer) {
        buf.write_u32(self.id)
            .write_vec3d(self.position)
            .write_vec3f(self.attitude);
    }

    fn read_fields(&mut self, buf: &mut Buffer) -> Result<()> {
        let id = buf.read_u32()?;
        let position = buf.read_vec3d()?;
        let attitude = buf.read_vec3f()?;
        *self = Self {
            id,
            position,
            attitude,
        };
        Ok(())
    }

    message_any!();
}

/// Eye-point update
///
/// `bound_to_entity` is the id of the entity the camera rides on, or
/// [`Camera::UNBOUND`] for a free camera. When bound, position and attitude
/// are offsets relative to that entity.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Camera {
    /// Eye position
    pub position: Vec3d,
    /// Heading, pitch, roll in degrees
    pub attitude: Vec3f,
    /// Entity the camera is attached to, or [`Camera::UNBOUND`]
    pub bound_to_entity: u32,
}

impl Camera {
    /// Opcode of this kind
    pub const OPCODE: Opcode = Opcode::CAMERA;
    /// Frame size in bytes
    pub const WIRE_SIZE: usize = 1 + Vec3d::WIRE_SIZE + Vec3f::WIRE_SIZE + 4;
    /// Marker for a camera not attached to any entity
    ///
    /// Entity id `u32::MAX` is reserved for it, so every other id can be bound.
    pub const UNBOUND: u32 = u32::MAX;

    /// Build a free camera
    #[must_use]
    pub const fn free(position: Vec3d, attitude: Vec3f) -> Self {
        Self {
            position,
            attitude,
            bound_to_entity: Self::UNBOUND,
        }
    }

    /// Build a camera attached to an entity
    #[must_use]
    pub const fn bound(entity: u32, offset: Vec3d, attitude: Vec3f) -> Self {
        Self {
            position: offset,
            attitude,
            bound_to_entity: entity,
        }
    }

    /// Check whether the camera rides on an entity
    #[must_use]
    pub const fn is_bound(&self) -> bool {
        self.bound_to_entity != Self::UNBOUND
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::free(Vec3d::default(), Vec3f::default())
    }
}

impl Message for Camera {
    fn opcode(&self) -> Opcode {
        Self::OPCODE
    }

    fn wire_size(&self) -> usize {
        Self::WIRE_SIZE
    }

    fn write_fields(&self, buf: &mut Buffer) {
        buf.write_vec3d(self.position)
            .write_vec3f(self.attitude)
            .write_u32(self.bound_to_entity);
    }

    fn read_fields(&mut self, buf: &mut Buffer) -> Result<()> {
        let position = buf.read_vec3d()?;
        let attitude = buf.read_vec3f()?;
        let bound_to_entity = buf.read_u32()?;
        *self = Self {
            position,
            attitude,
            bound_to_entity,
        };
        Ok(())
    }

    message_any!();
}
