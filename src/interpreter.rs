//! Applies decoded commands to the presence record

use crate::command::{help_for, Command, COMMANDS};
use crate::console;
use crate::presence::PresenceState;
use crate::store::{LoadOutcome, SaveOutcome, Store};

/// What the shell should do after a command ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// The presence may have changed and should be sent to Discord
    Push,
    /// Nothing to send
    Idle,
    /// Leave the shell
    Exit,
}

/// Owns the presence being edited and the store used by `save`/`load`
pub struct Interpreter {
    presence: PresenceState,
    default: PresenceState,
    store: Store,
}

impl Interpreter {
    /// `default` is both the starting presence and what `reset` restores
    pub fn new(store: Store, default: PresenceState) -> Self {
        Self {
            presence: default.clone(),
            default,
            store,
        }
    }

    pub fn presence(&self) -> &PresenceState {
        &self.presence
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Parse and run one input line. Rejected input is reported and never
    /// changes the presence.
    pub async fn handle_line(&mut self, line: &str) -> Flow {
        match Command::parse(line) {
            Ok(Some(command)) => self.execute(command).await,
            Ok(None) => Flow::Idle,
            Err(err) => {
                console::warning(err);
                Flow::Idle
            }
        }
    }

    pub async fn execute(&mut self, command: Command) -> Flow {
        let presence = &mut self.presence;

        match command {
            Command::Details(details) => presence.details = details,
            Command::State(state) => presence.state = state,
            Command::Timestamp(timestamp) => presence.start_timestamp = timestamp,
            Command::LargeImage(image) => {
                presence.large_image_key = image.key;
                presence.large_image_text = image.text;
            }
            Command::SmallImage(image) => {
                presence.small_image_key = Some(image.key);
                presence.small_image_text = Some(image.text);
            }
            Command::AddButton(button) => {
                if let Err(err) = presence.push_button(button) {
                    console::warning(err);
                    return Flow::Idle;
                }
            }
            Command::ClearButtons => {
                presence.buttons.clear();
                console::success("All buttons removed.");
            }
            Command::SetStateType(kind) => {
                presence.kind = kind;
                console::success(format!("Status type set to '{}'.", kind));
            }
            Command::Save(name) => {
                self.save(&name).await;
                return Flow::Idle;
            }
            Command::Load(name) => {
                self.load(&name).await;
                // even a failed load re-sends the current presence
                return Flow::Push;
            }
            Command::Reset => {
                *presence = self.default.clone();
                console::success("Presence reset to defaults.");
            }
            Command::Help(None) => {
                print_all_commands();
                return Flow::Idle;
            }
            Command::Help(Some(name)) => {
                print_command_help(&name);
                return Flow::Idle;
            }
            Command::Exit => {
                console::info("Goodbye!");
                return Flow::Exit;
            }
        }

        Flow::Push
    }

    async fn save(&self, name: &str) {
        match self.store.save_state(name, &self.presence).await {
            Ok(SaveOutcome::Saved(_)) => {
                console::success(format!("Presence saved to '{}'.", name));
            }
            Ok(SaveOutcome::AlreadySaved) => {
                console::warning(format!("The current presence is already saved in '{}'.", name));
            }
            Ok(SaveOutcome::NameInUse) => {
                console::warning(format!(
                    "The name '{}' is already in use. Please pick another.",
                    name
                ));
            }
            Err(err) => console::error(format!("Failed to save presence: {}", err)),
        }
    }

    async fn load(&mut self, name: &str) {
        match self.store.load_state(name).await {
            Ok(LoadOutcome::Loaded(state)) => {
                self.presence = state;
                console::success(format!("Presence loaded from '{}'.", name));
            }
            Ok(LoadOutcome::NotFound) => {
                console::warning(format!("'{}' does not exist.", name));
            }
            Err(err) => console::error(format!("Failed to load presence: {}", err)),
        }
    }
}

pub fn print_all_commands() {
    console::separator();
    console::info("Available commands:");
    for help in COMMANDS {
        console::plain(format!("  {} - {}", help.name, help.description));
    }
    console::separator();
    console::info("For details: help:<command> or ?:<command>");
}

pub fn print_command_help(name: &str) {
    match help_for(name) {
        Some(help) => {
            console::separator();
            console::info(format!("Command: {}", help.name));
            console::plain(format!("Description: {}", help.description));
            console::plain(format!("Usage: {}", help.usage));
            console::separator();
        }
        None => console::warning(format!("No help available for '{}'.", name)),
    }
}
