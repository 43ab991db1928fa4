//! Discord IPC transport
//!
//! Frames are an 8-byte little-endian header (opcode, length) followed by a
//! JSON body. Unix-like systems talk over a domain socket, Windows over a
//! named pipe.

mod client;
mod connection;
pub mod protocol;

pub use client::IpcClient;
pub use connection::{socket_candidates, IpcStream};
pub use protocol::{constants, Command, HandshakePayload, IpcMessage, Opcode};
