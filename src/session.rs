//! Login state and reconnect handling around the presence transport

use std::future::Future;
use std::time::Duration;

use log::{debug, info};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;

use crate::activity::Activity;
use crate::console;
use crate::error::{DiscordIpcError, Result};
use crate::ipc::IpcClient;
use crate::presence::PresenceState;
use crate::retry::RetryPolicy;

/// Where the session is in its login lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Events delivered to the shell loop from timers, login tasks and the
/// transport
#[derive(Debug)]
pub enum SessionEvent<C> {
    /// The reconnect delay has elapsed
    Reconnect,
    /// Login number `generation` finished
    LoginFinished { generation: u64, result: Result<C> },
    /// The connection from login number `generation` went away
    Disconnected { generation: u64 },
}

/// Handed to the transport at login; fires once when that connection drops
pub struct DisconnectNotifier<C> {
    events: mpsc::UnboundedSender<SessionEvent<C>>,
    generation: u64,
}

impl<C> DisconnectNotifier<C> {
    pub fn notify(self) {
        // a closed channel means the shell is already shutting down
        let _ = self.events.send(SessionEvent::Disconnected {
            generation: self.generation,
        });
    }
}

/// A logged-in connection that can set the activity
pub trait PresenceConnection {
    fn set_activity(&mut self, activity: &Activity) -> impl Future<Output = Result<()>>;
}

/// Something that can log in to Discord
pub trait PresenceTransport {
    type Connection: PresenceConnection + Send + 'static;

    /// Log in as `client_id`
    ///
    /// The returned future is driven on its own task, so it must not borrow
    /// the transport.
    fn login(
        &self,
        client_id: String,
        notifier: DisconnectNotifier<Self::Connection>,
    ) -> impl Future<Output = Result<Self::Connection>> + Send + 'static;
}

/// Transport backed by the local Discord IPC socket
#[derive(Debug, Default, Clone, Copy)]
pub struct IpcTransport;

impl PresenceTransport for IpcTransport {
    type Connection = IpcClient;

    fn login(
        &self,
        client_id: String,
        notifier: DisconnectNotifier<IpcClient>,
    ) -> impl Future<Output = Result<IpcClient>> + Send + 'static {
        async move { IpcClient::connect(&client_id, move || notifier.notify()).await }
    }
}

impl<S> PresenceConnection for IpcClient<S>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    async fn set_activity(&mut self, activity: &Activity) -> Result<()> {
        IpcClient::set_activity(self, activity).await
    }
}

/// RPC session: one client ID, one transport, retried logins
pub struct RpcSession<T: PresenceTransport> {
    transport: T,
    connection: Option<T::Connection>,
    client_id: String,
    policy: RetryPolicy,
    state: ConnectionState,
    events: mpsc::UnboundedSender<SessionEvent<T::Connection>>,
    generation: u64,
    retry_pending: bool,
}

impl<T: PresenceTransport> RpcSession<T> {
    /// Create a session and the receiver its events arrive on
    pub fn new(
        transport: T,
        client_id: impl Into<String>,
        policy: RetryPolicy,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent<T::Connection>>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let session = Self {
            transport,
            connection: None,
            client_id: client_id.into(),
            policy,
            state: ConnectionState::Disconnected,
            events,
            generation: 0,
            retry_pending: false,
        };
        (session, receiver)
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Start a login attempt in the background
    ///
    /// Any previous connection is dropped first. The outcome arrives as
    /// [`SessionEvent::LoginFinished`].
    pub fn connect(&mut self) {
        self.connection = None;
        self.state = ConnectionState::Connecting;
        self.generation += 1;
        let generation = self.generation;

        console::info("Logging in to Discord RPC...");
        let notifier = DisconnectNotifier {
            events: self.events.clone(),
            generation,
        };
        let login = self.transport.login(self.client_id.clone(), notifier);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = login.await;
            let _ = events.send(SessionEvent::LoginFinished { generation, result });
        });
    }

    /// React to an event from the loop
    ///
    /// Returns true when the event completed a login.
    pub fn handle_event(&mut self, event: SessionEvent<T::Connection>) -> bool {
        match event {
            SessionEvent::Reconnect => {
                self.retry_pending = false;
                self.connect();
                false
            }
            SessionEvent::LoginFinished { generation, result } => {
                if generation != self.generation {
                    debug!("Discarding outcome of superseded login #{}", generation);
                    return false;
                }
                match result {
                    Ok(connection) => {
                        self.connection = Some(connection);
                        self.state = ConnectionState::Connected;
                        info!("Logged in as client {}", self.client_id);
                        console::success("Logged in to the RPC client.");
                        true
                    }
                    Err(err) => {
                        console::error(format!("Login failed: {}", err));
                        self.schedule_retry();
                        false
                    }
                }
            }
            SessionEvent::Disconnected { generation } => {
                if generation != self.generation || self.retry_pending {
                    debug!("Ignoring disconnect from login #{}", generation);
                    return false;
                }
                // a login outcome still in flight belongs to the dead connection
                self.generation += 1;
                self.connection = None;
                self.state = ConnectionState::Connecting;
                console::warning(reconnect_notice(self.policy.delay));
                self.schedule_retry();
                false
            }
        }
    }

    /// Send `presence` as the current activity
    pub async fn push(&mut self, presence: &PresenceState) -> Result<()> {
        match self.connection.as_mut() {
            Some(connection) => connection.set_activity(&Activity::from(presence)).await,
            None => Err(DiscordIpcError::NotConnected),
        }
    }

    fn schedule_retry(&mut self) {
        self.state = ConnectionState::Connecting;
        if self.retry_pending {
            return;
        }
        self.retry_pending = true;

        let delay = self.policy.delay;
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(SessionEvent::Reconnect);
        });
    }
}

fn reconnect_notice(delay: Duration) -> String {
    format!("RPC connection lost. Reconnecting in {:?}...", delay)
}
