//! # presence-shell
//!
//! An interactive shell for Discord Rich Presence.
//!
//! The user picks one of the applications listed in `clientIds.json`, the
//! shell logs in to the local Discord client over IPC, and every command typed
//! afterwards edits the presence and sends it to Discord:
//!
//! ```text
//! details:Writing a parser
//! largeImage:https://example.com/cover.png || Cover art
//! addButton:Source || https://github.com/
//! save:parser.json
//! ```
//!
//! Presences can be saved to and loaded from `saves/`, and each update that
//! reaches Discord is prepended to `history.log`.

pub mod activity;
pub mod command;
pub mod config;
pub mod console;
pub mod error;
pub mod interpreter;
pub mod ipc;
pub mod nonce;
pub mod presence;
pub mod retry;
pub mod session;
pub mod shell;
pub mod store;
pub mod validate;

pub use activity::{Activity, ActivityBuilder};
pub use command::Command;
pub use error::{CommandError, DiscordIpcError, Result, StartupError, StoreError};
pub use interpreter::{Flow, Interpreter};
pub use presence::{ActivityKind, Button, PresenceState};
pub use session::{
    ConnectionState, PresenceConnection, PresenceTransport, RpcSession, SessionEvent,
};
pub use store::Store;
