//! Per-datagram header and numeric IG commands

use crate::protocol::{Buffer, Error, Message, Opcode, Result};

/// Magic carried by every [`FrameHeader`]: "IGP1" in ASCII
pub const FRAME_MAGIC: u32 = 0x4947_5031;

/// Leads a datagram and stamps it with the host frame counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameHeader {
    /// Always [`FRAME_MAGIC`] on a valid frame
    pub magic: u32,
    /// Host simulation frame counter
    pub frame_number: u32,
}

impl FrameHeader {
    /// Opcode of this kind
    pub const OPCODE: Opcode = Opcode::FRAME_HEADER;
    /// Frame size in bytes
    pub const WIRE_SIZE: usize = 1 + 4 + 4;

    /// Build a header for the given host frame
    #[must_use]
    pub const fn new(frame_number: u32) -> Self {
        Self {
            magic: FRAME_MAGIC,
            frame_number,
        }
    }
}

impl Default for FrameHeader {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Message for FrameHeader {
    fn opcode(&self) -> Opcode {
        Self::OPCODE
    }

    fn wire_size(&self) -> usize {
        Self::WIRE_SIZE
    }

    fn write_fields(&self, buf: &mut Buffer) {
        buf.write_u32(self.magic).write_u32(self.frame_number);
    }

    fn read_fields(&mut self, buf: &mut Buffer) -> Result<()> {
        let magic = buf.read_u32()?;
        if magic != FRAME_MAGIC {
            return Err(Error::malformed(
                Self::OPCODE.as_u8(),
                format!("invalid magic number: expected {FRAME_MAGIC:#x}, got {magic:#x}"),
            ));
        }
        let frame_number = buf.read_u32()?;
        *self = Self {
            magic,
            frame_number,
        };
        Ok(())
    }

    message_any!();
}

/// Numeric command addressed to the IG
///
/// The meaning of `arg0`, `arg1` and `value` depends on `code`; the IG owns
/// the command table.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Command {
    /// Command identifier
    pub code: u16,
    /// First integer argument
    pub arg0: i32,
    /// Second integer argument
    pub arg1: i32,
    /// Scalar argument
    pub value: f32,
}

impl Command {
    /// Opcode of this kind
    pub const OPCODE: Opcode = Opcode::COMMAND;
    /// Frame size in bytes
    pub const WIRE_SIZE: usize = 1 + 2 + 4 + 4 + 4;

    /// Build a command
    #[must_use]
    pub const fn new(code: u16, arg0: i32, arg1: i32, value: f32) -> Self {
        Self {
            code,
            arg0,
            arg1,
            value,
        }
    }
}

impl Message for Command {
    fn opcode(&self) -> Opcode {
        Self::OPCODE
    }

    fn wire_size(&self) -> usize {
        Self::WIRE_SIZE
    }

    fn write_fields(&self, buf: &mut Buffer) {
        buf.write_u16(self.code)
            .write_i32(self.arg0)
            .write_i32(self.arg1)
            .write_f32(self.value);
    }

    fn read_fields(&mut self, buf: &mut Buffer) -> Result<()> {
        let code = buf.read_u16()?;
        let arg0 = buf.read_i32()?;
        let arg1 = buf.read_i32()?;
        let value = buf.read_f32()?;
        *self = Self {
            code,
            arg0,
            arg1,
            value,
        };
        Ok(())
    }

    message_any!();
}
