use bytes::{BufMut, BytesMut};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{DiscordIpcError, Result};

/// Discord IPC Opcodes
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Handshake = 0,
    Frame = 1,
    Close = 2,
    Ping = 3,
    Pong = 4,
}

impl TryFrom<u32> for Opcode {
    type Error = DiscordIpcError;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            0 => Ok(Opcode::Handshake),
            1 => Ok(Opcode::Frame),
            2 => Ok(Opcode::Close),
            3 => Ok(Opcode::Ping),
            4 => Ok(Opcode::Pong),
            other => Err(DiscordIpcError::InvalidOpcode(other)),
        }
    }
}

impl From<Opcode> for u32 {
    fn from(opcode: Opcode) -> Self {
        opcode as u32
    }
}

/// Discord IPC Commands
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    SetActivity,
}

/// Discord IPC Message structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcMessage {
    pub cmd: Command,
    pub args: Value,
    pub nonce: String,
}

/// Handshake payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandshakePayload {
    pub v: u32,
    pub client_id: String,
}

/// Constants for the Discord IPC protocol
pub mod constants {
    /// Protocol version sent in the handshake
    pub const IPC_VERSION: u32 = 1;

    /// Discord numbers its sockets `discord-ipc-0` through `discord-ipc-9`
    pub const MAX_IPC_SOCKETS: u8 = 10;

    pub const IPC_SOCKET_PREFIX: &str = "discord-ipc-";

    /// Upper bound on an incoming payload (16 MB)
    pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

    /// 4 bytes opcode + 4 bytes length, both little-endian
    pub const IPC_HEADER_SIZE: usize = 8;

    /// How long to wait for Discord to answer a request
    pub const RESPONSE_TIMEOUT_MS: u64 = 10_000;
}

/// Encode a frame: little-endian opcode, little-endian length, JSON body
pub fn encode_frame(opcode: Opcode, payload: &Value) -> Result<BytesMut> {
    let raw = serde_json::to_vec(payload)?;
    let mut buf = BytesMut::with_capacity(constants::IPC_HEADER_SIZE + raw.len());
    buf.put_u32_le(opcode.into());
    buf.put_u32_le(raw.len() as u32);
    buf.extend_from_slice(&raw);
    Ok(buf)
}

/// Read one frame from `reader`
///
/// A stream that ends or fails mid-frame is reported as
/// [`DiscordIpcError::SocketClosed`].
pub async fn read_frame<R>(reader: &mut R) -> Result<(Opcode, Value)>
where
    R: AsyncRead + Unpin,
{
    let opcode_raw = reader
        .read_u32_le()
        .await
        .map_err(|_| DiscordIpcError::SocketClosed)?;
    let length = reader
        .read_u32_le()
        .await
        .map_err(|_| DiscordIpcError::SocketClosed)?;

    if length > constants::MAX_PAYLOAD_SIZE {
        return Err(DiscordIpcError::PayloadTooLarge {
            size: length,
            max: constants::MAX_PAYLOAD_SIZE,
        });
    }

    let opcode = Opcode::try_from(opcode_raw)?;

    let mut data = vec![0u8; length as usize];
    reader
        .read_exact(&mut data)
        .await
        .map_err(|_| DiscordIpcError::SocketClosed)?;

    let value: Value = serde_json::from_slice(&data)?;
    Ok((opcode, value))
}

/// Extract the error Discord reports in a response frame, if any
///
/// Failed commands come back as `evt: "ERROR"` with the code and message under
/// `data`.
pub fn response_error(value: &Value) -> Option<DiscordIpcError> {
    let body = if value.get("evt").and_then(Value::as_str) == Some("ERROR") {
        value.get("data")?
    } else if let Some(err) = value.get("error") {
        err
    } else {
        return None;
    };

    let code = body.get("code").and_then(Value::as_i64).unwrap_or(0) as i32;
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("unknown error");
    Some(DiscordIpcError::discord_error(code, message))
}
