//! Opcodes and shared field types

use std::fmt;

/// Leading byte of every frame, identifying the message kind
///
/// Built-in kinds are exposed as associated constants. Any other value may be
/// claimed by an application through [`Registry::register`](super::Registry::register).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Opcode(u8);

impl Opcode {
    /// Per-datagram frame header
    pub const FRAME_HEADER: Self = Self(0x01);
    /// Entity position and attitude update
    pub const ENTITY_STATE: Self = Self(0x02);
    /// Eye-point update
    pub const CAMERA: Self = Self(0x03);
    /// Height-of-terrain query
    pub const HOT_REQUEST: Self = Self(0x04);
    /// Height-of-terrain answer
    pub const HOT_RESPONSE: Self = Self(0x05);
    /// Line-of-sight query
    pub const LOS_REQUEST: Self = Self(0x06);
    /// Line-of-sight answer
    pub const LOS_RESPONSE: Self = Self(0x07);
    /// Numeric IG command
    pub const COMMAND: Self = Self(0x08);

    /// Wrap a raw byte
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Convert to byte
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// Name of a built-in opcode, `None` for application-defined values
    #[must_use]
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0x01 => Some("FrameHeader"),
            0x02 => Some("EntityState"),
            0x03 => Some("Camera"),
            0x04 => Some("HotRequest"),
            0x05 => Some("HotResponse"),
            0x06 => Some("LosRequest"),
            0x07 => Some("LosResponse"),
            0x08 => Some("Command"),
            _ => None,
        }
    }
}

impl From<u8> for Opcode {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl From<Opcode> for u8 {
    fn from(opcode: Opcode) -> Self {
        opcode.0
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "Opcode({:#04x})", self.0),
        }
    }
}

/// Three-component vector carried on the wire as consecutive scalars
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3<T> {
    /// X component
    pub x: T,
    /// Y component
    pub y: T,
    /// Z component
    pub z: T,
}

/// Double-precision vector (positions)
pub type Vec3d = Vec3<f64>;

/// Single-precision vector (normals, attitudes)
pub type Vec3f = Vec3<f32>;

impl<T> Vec3<T> {
    /// Build a vector from its components
    #[must_use]
    pub const fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }
}

impl<T> From<[T; 3]> for Vec3<T> {
    fn from([x, y, z]: [T; 3]) -> Self {
        Self { x, y, z }
    }
}

impl Vec3d {
    /// Encoded width in bytes
    pub const WIRE_SIZE: usize = 3 * 8;

    /// Bitwise equality, treating `NaN` payloads and signed zeros as distinct
    #[must_use]
    pub fn bits_eq(&self, other: &Self) -> bool {
        self.x.to_bits() == other.x.to_bits()
            && self.y.to_bits() == other.y.to_bits()
            && self.z.to_bits() == other.z.to_bits()
    }
}

impl Vec3f {
    /// Encoded width in bytes
    pub const WIRE_SIZE: usize = 3 * 4;

    /// Bitwise equality, treating `NaN` payloads and signed zeros as distinct
    #[must_use]
    pub fn bits_eq(&self, other: &Self) -> bool {
        self.x.to_bits() == other.x.to_bits()
            && self.y.to_bits() == other.y.to_bits()
            && self.z.to_bits() == other.z.to_bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_roundtrip() {
        let opcodes = [
            Opcode::FRAME_HEADER,
            Opcode::LOS_REQUEST,
            Opcode::LOS_RESPONSE,
        ];

        for opcode in opcodes {
            let byte = opcode.as_u8();
            assert_eq!(Opcode::from(byte), opcode);
        }
    }

    #[test]
    fn test_opcode_display() {
        assert_eq!(Opcode::LOS_RESPONSE.to_string(), "LosResponse");
        assert_eq!(Opcode::new(0xC8).to_string(), "Opcode(0xc8)");
    }

    #[test]
    fn test_vec3_bits_eq() {
        let a = Vec3f::new(0.0, 0.0, 1.0);
        let b = Vec3f::new(-0.0, 0.0, 1.0);
        assert_eq!(a, b);
        assert!(!a.bits_eq(&b));
        assert!(a.bits_eq(&Vec3f::from([0.0, 0.0, 1.0])));
    }
}
