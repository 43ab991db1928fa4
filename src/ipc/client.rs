use std::process;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use serde_json::{json, Value};
use tokio::io::{split, AsyncRead, AsyncWrite, AsyncWriteExt, ReadHalf, WriteHalf};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use crate::activity::Activity;
use crate::error::{DiscordIpcError, Result};
use crate::ipc::connection::IpcStream;
use crate::ipc::protocol::{
    constants, encode_frame, read_frame, response_error, Command, HandshakePayload, IpcMessage,
    Opcode,
};
use crate::nonce::generate_nonce;

/// Logged-in Discord IPC client
///
/// A background task owns the read half of the stream. It answers pings,
/// forwards response frames to the client and runs the `on_close` callback
/// once the stream ends.
pub struct IpcClient<S = IpcStream> {
    writer: Arc<Mutex<WriteHalf<S>>>,
    responses: mpsc::UnboundedReceiver<(Opcode, Value)>,
    reader: JoinHandle<()>,
    response_timeout: Duration,
}

impl IpcClient<IpcStream> {
    /// Discover the local Discord socket and log in as `client_id`
    pub async fn connect<F>(client_id: &str, on_close: F) -> Result<Self>
    where
        F: FnOnce() + Send + 'static,
    {
        let stream = IpcStream::connect().await?;
        Self::handshake(stream, client_id, on_close).await
    }
}

impl<S> IpcClient<S>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    /// Perform the handshake over an already-open stream
    ///
    /// Returns once Discord has sent its `READY` dispatch.
    pub async fn handshake<F>(stream: S, client_id: &str, on_close: F) -> Result<Self>
    where
        F: FnOnce() + Send + 'static,
    {
        let timeout = Duration::from_millis(constants::RESPONSE_TIMEOUT_MS);
        Self::handshake_with_timeout(stream, client_id, timeout, on_close).await
    }

    /// Like [`handshake`](Self::handshake), failing with `ResponseTimeout` if
    /// `READY` does not arrive within `timeout`. The same limit then applies
    /// to every request.
    pub async fn handshake_with_timeout<F>(
        stream: S,
        client_id: &str,
        timeout: Duration,
        on_close: F,
    ) -> Result<Self>
    where
        F: FnOnce() + Send + 'static,
    {
        let (mut read_half, mut write_half) = split(stream);

        let handshake = HandshakePayload {
            v: constants::IPC_VERSION,
            client_id: client_id.to_string(),
        };
        let frame = encode_frame(Opcode::Handshake, &serde_json::to_value(handshake)?)?;
        write_half.write_all(&frame).await?;
        write_half.flush().await?;

        let (opcode, response) = tokio::time::timeout(timeout, read_frame(&mut read_half))
            .await
            .map_err(|_| DiscordIpcError::ResponseTimeout(timeout.as_millis() as u64))??;
        debug!("Handshake response: {}", response);

        match opcode {
            Opcode::Close => {
                let code = response.get("code").and_then(Value::as_i64).unwrap_or(0) as i32;
                let message = response
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("connection closed during handshake");
                return Err(DiscordIpcError::discord_error(code, message));
            }
            Opcode::Frame => {}
            other => {
                return Err(DiscordIpcError::HandshakeFailed(format!(
                    "Expected handshake response frame, got {:?}",
                    other
                )))
            }
        }

        if let Some(err) = response_error(&response) {
            return Err(err);
        }
        if response.get("evt").and_then(Value::as_str) != Some("READY") {
            return Err(DiscordIpcError::HandshakeFailed(format!(
                "Expected READY event, got {}",
                response
            )));
        }

        let writer = Arc::new(Mutex::new(write_half));
        let (tx, responses) = mpsc::unbounded_channel();
        let reader = tokio::spawn(read_loop(read_half, Arc::clone(&writer), tx, on_close));

        Ok(Self {
            writer,
            responses,
            reader,
            response_timeout: timeout,
        })
    }

    /// Set the Rich Presence activity for this process
    pub async fn set_activity(&mut self, activity: &Activity) -> Result<()> {
        let nonce = generate_nonce("set-activity");

        let message = IpcMessage {
            cmd: Command::SetActivity,
            args: json!({
                "pid": process::id(),
                "activity": activity
            }),
            nonce: nonce.clone(),
        };

        self.send(Opcode::Frame, &serde_json::to_value(message)?)
            .await?;
        let response = self.recv_for_nonce(&nonce).await?;

        match response_error(&response) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn send(&self, opcode: Opcode, payload: &Value) -> Result<()> {
        let frame = encode_frame(opcode, payload)?;
        let mut writer = self.writer.lock().await;
        writer.write_all(&frame).await?;
        writer.flush().await?;
        Ok(())
    }

    async fn recv_for_nonce(&mut self, expected_nonce: &str) -> Result<Value> {
        let timeout = self.response_timeout;
        let wait = async {
            while let Some((opcode, response)) = self.responses.recv().await {
                if has_nonce(&response, expected_nonce) {
                    return Ok(response);
                }
                debug!("Skipping unrelated {:?} frame: {}", opcode, response);
            }
            Err(DiscordIpcError::SocketClosed)
        };

        tokio::time::timeout(timeout, wait)
            .await
            .map_err(|_| DiscordIpcError::ResponseTimeout(timeout.as_millis() as u64))?
    }
}

impl<S> Drop for IpcClient<S> {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

fn has_nonce(value: &Value, expected: &str) -> bool {
    value.get("nonce").and_then(Value::as_str) == Some(expected)
}

async fn read_loop<S, F>(
    mut reader: ReadHalf<S>,
    writer: Arc<Mutex<WriteHalf<S>>>,
    responses: mpsc::UnboundedSender<(Opcode, Value)>,
    on_close: F,
) where
    S: AsyncRead + AsyncWrite,
    F: FnOnce(),
{
    loop {
        match read_frame(&mut reader).await {
            Ok((Opcode::Ping, payload)) => {
                let pong = match encode_frame(Opcode::Pong, &payload) {
                    Ok(frame) => frame,
                    Err(err) => {
                        warn!("Failed to encode pong: {}", err);
                        continue;
                    }
                };
                let mut writer = writer.lock().await;
                if let Err(err) = writer.write_all(&pong).await {
                    debug!("Failed to answer ping: {}", err);
                    break;
                }
            }
            Ok((Opcode::Close, payload)) => {
                debug!("Discord closed the connection: {}", payload);
                break;
            }
            Ok(frame) => {
                if responses.send(frame).is_err() {
                    // client is gone, nobody to tell
                    return;
                }
            }
            Err(err) => {
                debug!("IPC reader stopped: {}", err);
                break;
            }
        }
    }
    on_close();
}
