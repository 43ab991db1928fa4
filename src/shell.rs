//! Startup sequence and the interactive loop

use chrono::Local;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::sync::mpsc;

use crate::config::Config;
use crate::console;
use crate::error::StartupError;
use crate::interpreter::{print_all_commands, Flow, Interpreter};
use crate::presence::{local_midnight_millis, PresenceState};
use crate::retry::RetryPolicy;
use crate::session::{IpcTransport, PresenceTransport, RpcSession, SessionEvent};
use crate::store::{history_entry, ClientCredential, Store};

/// Load clients, let the user pick one, then run the shell on stdin
pub async fn run(config: Config) -> Result<(), StartupError> {
    let store = Store::new(&config.data_dir);
    let clients = store.load_client_credentials().await?;
    console::success(format!("Loaded {} client ID(s).", clients.len()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let client = select_client(&clients, &mut lines).await?;
    console::success(format!("Selected client: {}", client.name));

    let (session, events) = RpcSession::new(
        IpcTransport,
        client.client_id.clone(),
        RetryPolicy::fixed(config.retry_delay()),
    );
    let interpreter = Interpreter::new(store, PresenceState::initial(local_midnight_millis()));

    let mut shell = Shell::new(interpreter, session, events);
    shell.run(lines).await.map_err(StartupError::Stdin)
}

/// Show the numbered client menu and read a 1-based choice
pub async fn select_client<'a, R>(
    clients: &'a [ClientCredential],
    lines: &mut Lines<R>,
) -> Result<&'a ClientCredential, StartupError>
where
    R: AsyncBufRead + Unpin,
{
    console::separator();
    console::info("Select the client to use:");
    for (index, client) in clients.iter().enumerate() {
        console::plain(format!("  [{}] {}", index + 1, client.name));
    }
    console::separator();

    console::prompt("Enter number: ")?;

    let answer = lines.next_line().await?.unwrap_or_default();
    answer
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|choice| choice.checked_sub(1))
        .and_then(|index| clients.get(index))
        .ok_or_else(|| StartupError::InvalidSelection(answer.trim().to_string()))
}

/// The running shell: one interpreter, one RPC session
pub struct Shell<T: PresenceTransport> {
    interpreter: Interpreter,
    session: RpcSession<T>,
    events: mpsc::UnboundedReceiver<SessionEvent<T::Connection>>,
}

impl<T: PresenceTransport> Shell<T> {
    pub fn new(
        interpreter: Interpreter,
        session: RpcSession<T>,
        events: mpsc::UnboundedReceiver<SessionEvent<T::Connection>>,
    ) -> Self {
        Self {
            interpreter,
            session,
            events,
        }
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    pub fn session(&self) -> &RpcSession<T> {
        &self.session
    }

    /// Start logging in, then process input lines and session events one at
    /// a time until `exit` or end of input
    ///
    /// Input keeps being handled while a login is in flight; pushes made
    /// before it completes report that the client is not logged in.
    pub async fn run<R>(&mut self, mut lines: Lines<R>) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        self.session.connect();

        loop {
            tokio::select! {
                line = lines.next_line() => match line? {
                    Some(line) => {
                        if self.handle_line(&line).await == Flow::Exit {
                            return Ok(());
                        }
                    }
                    None => {
                        console::info("Input closed, exiting.");
                        return Ok(());
                    }
                },
                Some(event) = self.events.recv() => {
                    if self.session.handle_event(event) {
                        self.on_login().await;
                    }
                }
            }
        }
    }

    /// Run one line and push the presence if it changed
    pub async fn handle_line(&mut self, line: &str) -> Flow {
        let flow = self.interpreter.handle_line(line).await;
        if flow == Flow::Push {
            self.push().await;
        }
        flow
    }

    async fn on_login(&mut self) {
        print_all_commands();
        self.push().await;
    }

    async fn push(&mut self) {
        let presence = self.interpreter.presence();
        if let Err(err) = self.session.push(presence).await {
            console::error(format!("Failed to update RPC status: {}", err));
            return;
        }
        console::success("RPC status updated.");

        let entry = match history_entry(presence, Local::now()) {
            Ok(entry) => entry,
            Err(err) => {
                console::error(format!("Failed to serialize history entry: {}", err));
                return;
            }
        };
        match self.interpreter.store().prepend_history(&entry).await {
            Ok(()) => console::success("History entry recorded."),
            Err(err) => console::error(format!("Failed to record history: {}", err)),
        }
    }
}
