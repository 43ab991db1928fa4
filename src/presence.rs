//! The presence record edited by the shell

use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CommandError;

/// Maximum number of buttons Discord shows on a presence
pub const MAX_BUTTONS: usize = 2;

/// Kind of activity shown in front of the presence text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    #[default]
    Playing,
    Listening,
    Watching,
    Streaming,
}

impl ActivityKind {
    pub const ALL: [ActivityKind; 4] = [
        ActivityKind::Playing,
        ActivityKind::Listening,
        ActivityKind::Watching,
        ActivityKind::Streaming,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityKind::Playing => "playing",
            ActivityKind::Listening => "listening",
            ActivityKind::Watching => "watching",
            ActivityKind::Streaming => "streaming",
        }
    }

    /// Numeric activity type used on the wire
    pub fn code(self) -> u8 {
        match self {
            ActivityKind::Playing => 0,
            ActivityKind::Streaming => 1,
            ActivityKind::Listening => 2,
            ActivityKind::Watching => 3,
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityKind {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CommandError::InvalidActivityKind(s.to_string()))
    }
}

/// Presence button
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    pub url: String,
}

/// Current Rich Presence payload, serialized with the keys used by save files
/// and history entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PresenceState {
    pub details: String,
    pub start_timestamp: i64,
    pub buttons: Vec<Button>,
    pub state: String,
    pub large_image_key: String,
    pub large_image_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub small_image_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub small_image_text: Option<String>,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
}

impl Default for PresenceState {
    fn default() -> Self {
        Self {
            details: String::new(),
            start_timestamp: 0,
            buttons: Vec::new(),
            state: String::new(),
            large_image_key: String::new(),
            large_image_text: String::new(),
            small_image_key: None,
            small_image_text: None,
            kind: ActivityKind::Playing,
        }
    }
}

impl PresenceState {
    /// The presence shown right after startup and restored by `reset`
    pub fn initial(start_timestamp: i64) -> Self {
        Self {
            details: "Default details".to_string(),
            start_timestamp,
            buttons: vec![Button {
                label: "Default Button (View Repository)".to_string(),
                url: "https://github.com/".to_string(),
            }],
            state: "Default state".to_string(),
            ..Self::default()
        }
    }

    /// Appends a button unless the limit is already reached
    pub fn push_button(&mut self, button: Button) -> Result<(), CommandError> {
        if self.buttons.len() >= MAX_BUTTONS {
            return Err(CommandError::TooManyButtons);
        }
        self.buttons.push(button);
        Ok(())
    }

    /// Compact single-line JSON, as written to the history log
    pub fn to_compact_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Milliseconds since the epoch at local midnight today
pub fn local_midnight_millis() -> i64 {
    let now = Local::now();
    now.date_naive()
        .and_hms_opt(0, 0, 0)
        .and_then(|midnight| Local.from_local_datetime(&midnight).earliest())
        .map(|midnight| midnight.timestamp_millis())
        .unwrap_or_else(|| now.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_has_one_button() {
        let state = PresenceState::initial(1);
        assert_eq!(state.buttons.len(), 1);
        assert_eq!(state.kind, ActivityKind::Playing);
        assert_eq!(state.start_timestamp, 1);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let state = PresenceState::initial(1_700_000_000_000);
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["startTimestamp"], 1_700_000_000_000_i64);
        assert_eq!(value["largeImageKey"], "");
        assert_eq!(value["type"], "playing");
        assert!(value.get("smallImageKey").is_none());
    }

    #[test]
    fn json_key_order_is_stable() {
        let json = PresenceState::initial(0).to_compact_json().unwrap();
        let details = json.find("\"details\"").unwrap();
        let buttons = json.find("\"buttons\"").unwrap();
        let kind = json.find("\"type\"").unwrap();
        assert!(details < buttons && buttons < kind);
    }

    #[test]
    fn third_button_is_refused() {
        let mut state = PresenceState::initial(0);
        let button = Button {
            label: "L".into(),
            url: "https://x.com".into(),
        };
        state.push_button(button.clone()).unwrap();
        assert_eq!(state.push_button(button), Err(CommandError::TooManyButtons));
        assert_eq!(state.buttons.len(), MAX_BUTTONS);
    }

    #[test]
    fn activity_kind_parses_only_known_values() {
        assert_eq!("listening".parse::<ActivityKind>(), Ok(ActivityKind::Listening));
        assert!("dancing".parse::<ActivityKind>().is_err());
        assert!("Playing".parse::<ActivityKind>().is_err());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let state: PresenceState = serde_json::from_str(r#"{"details":"only"}"#).unwrap();
        assert_eq!(state.details, "only");
        assert!(state.buttons.is_empty());
        assert_eq!(state.kind, ActivityKind::Playing);
    }
}
