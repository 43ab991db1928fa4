use crate::activity::types::{Activity, ActivityAssets, ActivityTimestamps};
use crate::presence::{ActivityKind, Button, PresenceState};

/// Builder for the wire-level activity
///
/// Setters taking text ignore empty strings, since Discord rejects
/// zero-length fields and the shell uses "" to mean "unset".
#[derive(Debug, Default)]
pub struct ActivityBuilder {
    activity: Activity,
}

impl ActivityBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the secondary status line
    pub fn state<S: Into<String>>(mut self, state: S) -> Self {
        self.activity.state = non_empty(state);
        self
    }

    /// Set the primary status line
    pub fn details<S: Into<String>>(mut self, details: S) -> Self {
        self.activity.details = non_empty(details);
        self
    }

    /// Set the start timestamp in milliseconds
    pub fn start_timestamp(mut self, timestamp: i64) -> Self {
        self.activity
            .timestamps
            .get_or_insert_with(ActivityTimestamps::default)
            .start = Some(timestamp);
        self
    }

    pub fn large_image<S: Into<String>>(mut self, key: S) -> Self {
        let key = non_empty(key);
        if key.is_some() {
            self.assets().large_image = key;
        }
        self
    }

    pub fn large_text<S: Into<String>>(mut self, text: S) -> Self {
        let text = non_empty(text);
        if text.is_some() {
            self.assets().large_text = text;
        }
        self
    }

    pub fn small_image<S: Into<String>>(mut self, key: S) -> Self {
        let key = non_empty(key);
        if key.is_some() {
            self.assets().small_image = key;
        }
        self
    }

    pub fn small_text<S: Into<String>>(mut self, text: S) -> Self {
        let text = non_empty(text);
        if text.is_some() {
            self.assets().small_text = text;
        }
        self
    }

    pub fn button(mut self, button: Button) -> Self {
        self.activity
            .buttons
            .get_or_insert_with(Vec::new)
            .push(button);
        self
    }

    pub fn kind(mut self, kind: ActivityKind) -> Self {
        self.activity.kind = Some(kind.code());
        self
    }

    /// Build the activity
    pub fn build(self) -> Activity {
        self.activity
    }

    fn assets(&mut self) -> &mut ActivityAssets {
        self.activity
            .assets
            .get_or_insert_with(ActivityAssets::default)
    }
}

fn non_empty<S: Into<String>>(value: S) -> Option<String> {
    Some(value.into()).filter(|s| !s.is_empty())
}

impl From<&PresenceState> for Activity {
    fn from(presence: &PresenceState) -> Self {
        let mut builder = ActivityBuilder::new()
            .details(presence.details.as_str())
            .state(presence.state.as_str())
            .start_timestamp(presence.start_timestamp)
            .large_image(presence.large_image_key.as_str())
            .large_text(presence.large_image_text.as_str())
            .small_image(presence.small_image_key.clone().unwrap_or_default())
            .small_text(presence.small_image_text.clone().unwrap_or_default())
            .kind(presence.kind);

        for button in &presence.buttons {
            builder = builder.button(button.clone());
        }

        builder.build()
    }
}
