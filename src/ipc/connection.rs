use std::io;
use std::path::PathBuf;
use std::pin::Pin;
use std::task::{Context, Poll};

use log::debug;
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

#[cfg(unix)]
use tokio::net::UnixStream;

#[cfg(windows)]
use tokio::net::windows::named_pipe::{ClientOptions, NamedPipeClient};

use crate::error::{DiscordIpcError, Result};
use crate::ipc::protocol::constants;

/// A socket (Unix) or named pipe (Windows) connected to a Discord client
#[derive(Debug)]
pub enum IpcStream {
    #[cfg(unix)]
    Unix(UnixStream),

    #[cfg(windows)]
    Windows(NamedPipeClient),
}

impl IpcStream {
    /// Connect to the first Discord IPC endpoint that accepts
    pub async fn connect() -> Result<Self> {
        let mut last_error = None;

        for path in socket_candidates() {
            match Self::open(&path).await {
                Ok(stream) => {
                    debug!("Connected to Discord IPC at {}", path.display());
                    return Ok(stream);
                }
                Err(err) => last_error = Some(err),
            }
        }

        match last_error {
            Some(err) if err.kind() == io::ErrorKind::PermissionDenied => {
                Err(DiscordIpcError::ConnectionFailed(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    "Permission denied when connecting to Discord IPC socket. Check file permissions.",
                )))
            }
            Some(err) if err.kind() != io::ErrorKind::NotFound => {
                Err(DiscordIpcError::ConnectionFailed(err))
            }
            _ => Err(DiscordIpcError::NoValidSocket),
        }
    }

    #[cfg(unix)]
    async fn open(path: &std::path::Path) -> io::Result<Self> {
        UnixStream::connect(path).await.map(Self::Unix)
    }

    #[cfg(windows)]
    async fn open(path: &std::path::Path) -> io::Result<Self> {
        ClientOptions::new().open(path).map(Self::Windows)
    }
}

/// Every path Discord might be listening on, in the order they are tried
#[cfg(unix)]
pub fn socket_candidates() -> Vec<PathBuf> {
    let mut directories: Vec<PathBuf> = ["XDG_RUNTIME_DIR", "TMPDIR", "TMP", "TEMP"]
        .iter()
        .filter_map(|key| std::env::var_os(key))
        .map(PathBuf::from)
        .collect();

    if directories.is_empty() {
        // SAFETY: getuid has no preconditions and cannot fail
        directories.push(PathBuf::from(format!("/run/user/{}", unsafe {
            libc::getuid()
        })));
    }
    directories.push(PathBuf::from("/tmp"));
    directories.dedup();

    // Flatpak and Snap builds of Discord put their socket one level down
    let sandboxed: Vec<PathBuf> = directories
        .iter()
        .flat_map(|dir| {
            [
                dir.join("app/com.discordapp.Discord"),
                dir.join("snap.discord"),
            ]
        })
        .collect();
    directories.extend(sandboxed);

    directories
        .iter()
        .flat_map(|dir| {
            (0..constants::MAX_IPC_SOCKETS)
                .map(move |i| dir.join(format!("{}{}", constants::IPC_SOCKET_PREFIX, i)))
        })
        .collect()
}

#[cfg(windows)]
pub fn socket_candidates() -> Vec<PathBuf> {
    (0..constants::MAX_IPC_SOCKETS)
        .map(|i| PathBuf::from(format!(r"\\.\pipe\{}{}", constants::IPC_SOCKET_PREFIX, i)))
        .collect()
}

impl AsyncRead for IpcStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            #[cfg(unix)]
            Self::Unix(stream) => Pin::new(stream).poll_read(cx, buf),

            #[cfg(windows)]
            Self::Windows(pipe) => Pin::new(pipe).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for IpcStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            #[cfg(unix)]
            Self::Unix(stream) => Pin::new(stream).poll_write(cx, buf),

            #[cfg(windows)]
            Self::Windows(pipe) => Pin::new(pipe).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            #[cfg(unix)]
            Self::Unix(stream) => Pin::new(stream).poll_flush(cx),

            #[cfg(windows)]
            Self::Windows(pipe) => Pin::new(pipe).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            #[cfg(unix)]
            Self::Unix(stream) => Pin::new(stream).poll_shutdown(cx),

            #[cfg(windows)]
            Self::Windows(pipe) => Pin::new(pipe).poll_shutdown(cx),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn candidates_cover_every_socket_number() {
        let candidates = socket_candidates();
        let names: Vec<_> = candidates
            .iter()
            .filter_map(|p| p.file_name())
            .filter_map(|n| n.to_str())
            .collect();
        assert!(names.contains(&"discord-ipc-0"));
        assert!(names.contains(&"discord-ipc-9"));
        assert!(candidates.iter().any(|p| p.starts_with("/tmp")));
    }
}
