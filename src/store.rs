//! File-backed persistence: client list, saved presences and the history log

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Local};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use tokio::fs;

use crate::error::StoreError;
use crate::presence::{PresenceState, MAX_BUTTONS};

pub const CREDENTIALS_FILE: &str = "clientIds.json";
pub const SAVES_DIR: &str = "saves";
pub const HISTORY_FILE: &str = "history.log";

/// A Discord application the user can present as
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientCredential {
    pub name: String,
    pub client_id: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialsFile {
    #[serde(default)]
    clients: Vec<ClientCredential>,
}

/// What `save_state` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(PathBuf),
    /// The file exists and already holds exactly this state
    AlreadySaved,
    /// The file exists with different content and was left alone
    NameInUse,
}

/// What `load_state` found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(PresenceState),
    NotFound,
}

/// Locations of the files the shell reads and writes
#[derive(Debug, Clone)]
pub struct Store {
    credentials_path: PathBuf,
    saves_dir: PathBuf,
    history_path: PathBuf,
}

impl Store {
    /// Keep every file under `data_dir`
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            credentials_path: data_dir.join(CREDENTIALS_FILE),
            saves_dir: data_dir.join(SAVES_DIR),
            history_path: data_dir.join(HISTORY_FILE),
        }
    }

    pub fn credentials_path(&self) -> &Path {
        &self.credentials_path
    }

    pub fn saves_dir(&self) -> &Path {
        &self.saves_dir
    }

    pub fn history_path(&self) -> &Path {
        &self.history_path
    }

    /// Read the client list
    ///
    /// A missing file is created with an empty list and reported as an error,
    /// so the user knows where to add their clients.
    pub async fn load_client_credentials(&self) -> Result<Vec<ClientCredential>, StoreError> {
        let path = &self.credentials_path;

        let raw = match fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                let empty = to_pretty_json(&CredentialsFile::default())?;
                fs::write(path, empty)
                    .await
                    .map_err(|e| StoreError::io(path, e))?;
                info!("Created empty client list at {}", path.display());
                return Err(StoreError::CredentialsCreated(path.clone()));
            }
            Err(err) => return Err(StoreError::io(path, err)),
        };

        let file: CredentialsFile =
            serde_json::from_str(&raw).map_err(|source| StoreError::Malformed {
                path: path.clone(),
                source,
            })?;

        if file.clients.is_empty() {
            return Err(StoreError::NoCredentials(path.clone()));
        }

        info!("Loaded {} client(s) from {}", file.clients.len(), path.display());
        Ok(file.clients)
    }

    /// Write `state` to `saves/<name>`, never overwriting an existing file
    pub async fn save_state(
        &self,
        name: &str,
        state: &PresenceState,
    ) -> Result<SaveOutcome, StoreError> {
        let path = self.save_path(name)?;
        let content = to_pretty_json(state)?;

        fs::create_dir_all(&self.saves_dir)
            .await
            .map_err(|e| StoreError::io(&self.saves_dir, e))?;

        match fs::read_to_string(&path).await {
            Ok(existing) if existing == content => return Ok(SaveOutcome::AlreadySaved),
            Ok(_) => return Ok(SaveOutcome::NameInUse),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(StoreError::io(&path, err)),
        }

        fs::write(&path, content)
            .await
            .map_err(|e| StoreError::io(&path, e))?;
        debug!("Saved presence to {}", path.display());
        Ok(SaveOutcome::Saved(path))
    }

    /// Read a presence previously written by [`Store::save_state`]
    ///
    /// Missing fields take their defaults. A file whose fields have the wrong
    /// JSON type is `Malformed`, and one holding more than two buttons is
    /// `TooManyButtons`; either way the caller keeps its current presence.
    pub async fn load_state(&self, name: &str) -> Result<LoadOutcome, StoreError> {
        let path = self.save_path(name)?;

        let raw = match fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(LoadOutcome::NotFound),
            Err(err) => return Err(StoreError::io(&path, err)),
        };

        let state: PresenceState =
            serde_json::from_str(&raw).map_err(|source| StoreError::Malformed {
                path: path.clone(),
                source,
            })?;

        if state.buttons.len() > MAX_BUTTONS {
            return Err(StoreError::TooManyButtons {
                name: name.to_string(),
                count: state.buttons.len(),
            });
        }

        Ok(LoadOutcome::Loaded(state))
    }

    /// Put `entry` on the first line of the history log
    pub async fn prepend_history(&self, entry: &str) -> Result<(), StoreError> {
        let path = &self.history_path;
        let previous = match fs::read_to_string(path).await {
            Ok(previous) => previous,
            Err(err) if err.kind() == ErrorKind::NotFound => String::new(),
            Err(err) => return Err(StoreError::io(path, err)),
        };

        fs::write(path, format!("{}\n{}", entry, previous))
            .await
            .map_err(|e| StoreError::io(path, e))
    }

    fn save_path(&self, name: &str) -> Result<PathBuf, StoreError> {
        if name.is_empty() {
            return Err(StoreError::MissingName);
        }

        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) if !name.contains(['/', '\\']) => {
                Ok(self.saves_dir.join(name))
            }
            _ => Err(StoreError::InvalidName(name.to_string())),
        }
    }
}

/// Pretty JSON with four-space indentation, the format of every file we write
pub fn to_pretty_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    // serde_json only ever emits valid UTF-8
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// One history line: `[<local time>] <compact JSON>`
pub fn history_entry(state: &PresenceState, at: DateTime<Local>) -> serde_json::Result<String> {
    Ok(format!(
        "[{}] {}",
        at.format("%Y-%m-%d %H:%M:%S"),
        state.to_compact_json()?
    ))
}
