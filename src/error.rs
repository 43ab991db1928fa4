use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while talking to the Discord client over IPC
#[derive(Error, Debug)]
pub enum DiscordIpcError {
    #[error("Failed to connect to Discord IPC socket: {0}")]
    ConnectionFailed(#[from] io::Error),

    #[error("No Discord IPC socket found (is Discord running?)")]
    NoValidSocket,

    #[error("Failed to serialize JSON payload: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Handshake failed: {0}")]
    HandshakeFailed(String),

    #[error("Socket connection was closed")]
    SocketClosed,

    #[error("Invalid opcode: {0}")]
    InvalidOpcode(u32),

    #[error("Payload of {size} bytes exceeds the {max} byte limit")]
    PayloadTooLarge { size: u32, max: u32 },

    #[error("Discord returned error {code}: {message}")]
    DiscordError { code: i32, message: String },

    #[error("Timed out after {0} ms waiting for Discord")]
    ResponseTimeout(u64),

    #[error("RPC client is not logged in")]
    NotConnected,
}

impl DiscordIpcError {
    pub fn discord_error(code: i32, message: impl Into<String>) -> Self {
        Self::DiscordError {
            code,
            message: message.into(),
        }
    }
}

/// Result type for Discord IPC operations
pub type Result<T = ()> = std::result::Result<T, DiscordIpcError>;

/// Errors raised by the file-backed persistence layer
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{} did not exist and was created; add your clients to it and run again", .0.display())]
    CredentialsCreated(PathBuf),

    #[error("the clients list in {} is empty; add your clients to it and run again", .0.display())]
    NoCredentials(PathBuf),

    #[error("failed to parse {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("a file name is required")]
    MissingName,

    #[error("'{0}' is not a plain file name")]
    InvalidName(String),

    #[error("'{name}' holds {count} buttons; at most 2 are allowed")]
    TooManyButtons { name: String, count: usize },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize presence state: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Rejections produced while decoding or applying a shell command
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}'; type \"help\" or \"help:<command>\" for help")]
    Unknown(String),

    #[error("invalid timestamp '{0}'; expected milliseconds as a base-10 integer")]
    InvalidTimestamp(String),

    #[error("invalid image link '{0}' (only jpg, jpeg, png, gif and webp are supported)")]
    InvalidImageUrl(String),

    #[error("invalid button URL '{0}'")]
    InvalidButtonUrl(String),

    #[error("at most 2 buttons can be added")]
    TooManyButtons,

    #[error("invalid status type '{0}' (expected playing, listening, watching or streaming)")]
    InvalidActivityKind(String),
}

/// Conditions that end the program before the shell starts
#[derive(Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid selection '{0}', exiting")]
    InvalidSelection(String),

    #[error("failed to read from stdin: {0}")]
    Stdin(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discord_errors_carry_code_and_message() {
        let error = DiscordIpcError::discord_error(4000, "Invalid Client ID");
        assert!(matches!(error, DiscordIpcError::DiscordError { code: 4000, .. }));
        assert_eq!(error.to_string(), "Discord returned error 4000: Invalid Client ID");
    }

    #[test]
    fn oversized_payload_names_both_sizes() {
        let error = DiscordIpcError::PayloadTooLarge { size: 20, max: 10 };
        assert_eq!(error.to_string(), "Payload of 20 bytes exceeds the 10 byte limit");
    }
}
