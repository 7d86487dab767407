//! Wire layer for the Unreal MCP bridge
//!
//! This crate provides:
//! - Newline-delimited JSON framing with a frame size limit
//! - Transport abstractions (AsyncReader/AsyncWriter traits)
//! - TCP stream wrappers shared by the server and the client

pub mod protocol;
pub mod tcp;
pub mod transport;

pub use protocol::{DEFAULT_MAX_FRAME_BYTES, decode_response, encode, preview};
pub use transport::{AsyncReader, AsyncWriter, LineReader, LineWriter};
