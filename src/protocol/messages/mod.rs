//! Built-in message kinds
//!
//! | kind | opcode | frame bytes |
//! |---|---|---|
//! | [`FrameHeader`] | `0x01` | 9 |
//! | [`EntityState`] | `0x02` | 41 |
//! | [`Camera`] | `0x03` | 41 |
//! | [`HotRequest`] | `0x04` | 21 |
//! | [`HotResponse`] | `0x05` | 26 |
//! | [`LosRequest`] | `0x06` | 53 |
//! | [`LosResponse`] | `0x07` | 41 |
//! | [`Command`] | `0x08` | 15 |

/// Expands to the downcast plumbing every [`Message`](super::Message) impl needs.
macro_rules! message_any {
    () => {
        fn as_any(&self) -> &dyn std::any::Any {
            self
        }

        fn into_any(self: Box<Self>) -> Box<dyn std::any::Any> {
            self
        }
    };
}

mod control;
mod entity;
mod hot;
mod los;

pub use control::{Command, FRAME_MAGIC, FrameHeader};
pub use entity::{Camera, EntityState};
pub use hot::{HotRequest, HotResponse};
pub use los::{LosRequest, LosResponse};
