//! Shell command language
//!
//! A line is `command` or `command:argument`. Everything after the first `:`
//! is the argument, trimmed, so URLs keep their own colons.

use crate::error::CommandError;
use crate::presence::{ActivityKind, Button};
use crate::validate::{is_valid_image_url, is_valid_url};

/// Separator between the two halves of an image or button argument
pub const FIELD_SEPARATOR: &str = " || ";

/// Image key plus hover text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub key: String,
    pub text: String,
}

/// A decoded and validated shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Details(String),
    State(String),
    Timestamp(i64),
    LargeImage(ImageAsset),
    SmallImage(ImageAsset),
    AddButton(Button),
    ClearButtons,
    SetStateType(ActivityKind),
    Save(String),
    Load(String),
    Reset,
    /// `help` or `?`, optionally naming one command
    Help(Option<String>),
    Exit,
}

impl Command {
    /// Decode one input line
    ///
    /// Returns `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        let (name, value) = match line.split_once(':') {
            Some((name, value)) => (name.trim(), value.trim()),
            None => (line.trim(), ""),
        };

        if name.is_empty() && value.is_empty() {
            return Ok(None);
        }

        let command = match name {
            "details" => Command::Details(value.to_string()),
            "state" => Command::State(value.to_string()),
            "timestamp" => Command::Timestamp(
                value
                    .parse()
                    .map_err(|_| CommandError::InvalidTimestamp(value.to_string()))?,
            ),
            "largeImage" => Command::LargeImage(parse_image(value)?),
            "smallImage" => Command::SmallImage(parse_image(value)?),
            "addButton" => Command::AddButton(parse_button(value)?),
            "clearButtons" => Command::ClearButtons,
            "setStateType" => Command::SetStateType(value.parse()?),
            "save" => Command::Save(value.to_string()),
            "load" => Command::Load(value.to_string()),
            "reset" => Command::Reset,
            "help" | "?" => Command::Help(Some(value.to_string()).filter(|v| !v.is_empty())),
            "exit" => Command::Exit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        Ok(Some(command))
    }
}

/// `key || text`. A key that looks like a URL has to point at an image.
fn parse_image(value: &str) -> Result<ImageAsset, CommandError> {
    let (key, text) = value.split_once(FIELD_SEPARATOR).unwrap_or((value, ""));

    if is_valid_url(key) && !is_valid_image_url(key) {
        return Err(CommandError::InvalidImageUrl(key.to_string()));
    }

    Ok(ImageAsset {
        key: key.to_string(),
        text: text.to_string(),
    })
}

/// `label || url`
fn parse_button(value: &str) -> Result<Button, CommandError> {
    let (label, url) = value.split_once(FIELD_SEPARATOR).unwrap_or((value, ""));
    let url = url.trim();

    if !is_valid_url(url) {
        return Err(CommandError::InvalidButtonUrl(url.to_string()));
    }

    Ok(Button {
        label: label.to_string(),
        url: url.to_string(),
    })
}

/// Help text for one command
#[derive(Debug, Clone, Copy)]
pub struct CommandHelp {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
}

pub const COMMANDS: &[CommandHelp] = &[
    CommandHelp {
        name: "details",
        description: "Set the primary status line.",
        usage: "details:New status message",
    },
    CommandHelp {
        name: "state",
        description: "Set the secondary status line.",
        usage: "state:Having a good time!",
    },
    CommandHelp {
        name: "timestamp",
        description: "Set the start timestamp, in milliseconds since the epoch.",
        usage: "timestamp:1672531200000",
    },
    CommandHelp {
        name: "largeImage",
        description: "Set the large image key and text. The key is an asset key or a direct image link.",
        usage: "largeImage:newImageKey || Large image text\nor\nlargeImage:https://example.com/image.png || Image description",
    },
    CommandHelp {
        name: "smallImage",
        description: "Set the small image key and text. The key is an asset key or a direct image link.",
        usage: "smallImage:newSmallImageKey || Small image text\nor\nsmallImage:https://example.com/image_small.png || Image description",
    },
    CommandHelp {
        name: "addButton",
        description: "Add a button to the presence. At most 2 buttons are allowed.",
        usage: "addButton:Button label || https://example.com",
    },
    CommandHelp {
        name: "clearButtons",
        description: "Remove every button.",
        usage: "clearButtons",
    },
    CommandHelp {
        name: "setStateType",
        description: "Set the activity type (playing, listening, watching, streaming).",
        usage: "setStateType:playing",
    },
    CommandHelp {
        name: "save",
        description: "Save the current presence to a named JSON file. The name is required and existing files are never overwritten.",
        usage: "save:<file.json> (e.g. save:myState.json)",
    },
    CommandHelp {
        name: "load",
        description: "Load a presence from a saved JSON file. The name is required.",
        usage: "load:<file.json> (e.g. load:myState.json)",
    },
    CommandHelp {
        name: "reset",
        description: "Restore the default presence.",
        usage: "reset",
    },
    CommandHelp {
        name: "help",
        description: "Show every command, or the details of one command.",
        usage: "help:<command> or ?:<command>",
    },
    CommandHelp {
        name: "exit",
        description: "Quit the program.",
        usage: "exit",
    },
];

/// Look up help for `name`. `?` is accepted as an alias of `help`.
pub fn help_for(name: &str) -> Option<&'static CommandHelp> {
    let name = if name == "?" { "help" } else { name };
    COMMANDS.iter().find(|help| help.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        Command::parse(line)
    }

    #[test]
    fn argument_keeps_colons_after_the_first() {
        assert_eq!(
            parse("details: Time: 10:30 ").unwrap(),
            Some(Command::Details("Time: 10:30".into()))
        );
    }

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(parse("   ").unwrap(), None);
        assert_eq!(parse("").unwrap(), None);
    }

    #[test]
    fn unknown_command_is_an_error() {
        assert_eq!(parse("foobar:1"), Err(CommandError::Unknown("foobar".into())));
        assert_eq!(parse(":value"), Err(CommandError::Unknown(String::new())));
    }

    #[test]
    fn timestamp_must_be_an_integer() {
        assert_eq!(
            parse("timestamp:1700000000000").unwrap(),
            Some(Command::Timestamp(1_700_000_000_000))
        );
        assert!(matches!(parse("timestamp:abc"), Err(CommandError::InvalidTimestamp(_))));
        assert!(matches!(parse("timestamp:12abc"), Err(CommandError::InvalidTimestamp(_))));
        assert!(matches!(parse("timestamp"), Err(CommandError::InvalidTimestamp(_))));
    }

    #[test]
    fn image_key_may_be_asset_or_image_link() {
        assert_eq!(
            parse("largeImage:logo || My Game").unwrap(),
            Some(Command::LargeImage(ImageAsset {
                key: "logo".into(),
                text: "My Game".into()
            }))
        );
        assert!(parse("largeImage:https://x.com/a.PNG || t").is_ok());
        assert_eq!(
            parse("smallImage:https://x.com/a.bmp || t"),
            Err(CommandError::InvalidImageUrl("https://x.com/a.bmp".into()))
        );
    }

    #[test]
    fn image_without_text_has_empty_text() {
        assert_eq!(
            parse("smallImage:icon").unwrap(),
            Some(Command::SmallImage(ImageAsset {
                key: "icon".into(),
                text: String::new()
            }))
        );
    }

    #[test]
    fn image_text_keeps_further_separators_for_both_sizes() {
        let expected = ImageAsset {
            key: "k".into(),
            text: "a || b".into(),
        };
        assert_eq!(
            parse("largeImage:k || a || b").unwrap(),
            Some(Command::LargeImage(expected.clone()))
        );
        assert_eq!(
            parse("smallImage:k || a || b").unwrap(),
            Some(Command::SmallImage(expected))
        );
    }

    #[test]
    fn button_requires_a_valid_url() {
        assert_eq!(
            parse("addButton:Repo || https://github.com/ ").unwrap(),
            Some(Command::AddButton(Button {
                label: "Repo".into(),
                url: "https://github.com/".into()
            }))
        );
        assert!(matches!(parse("addButton:Repo"), Err(CommandError::InvalidButtonUrl(_))));
        assert!(matches!(
            parse("addButton:Repo || github"),
            Err(CommandError::InvalidButtonUrl(_))
        ));
    }

    #[test]
    fn state_type_is_closed_set() {
        assert_eq!(
            parse("setStateType:listening").unwrap(),
            Some(Command::SetStateType(ActivityKind::Listening))
        );
        assert!(matches!(
            parse("setStateType:dancing"),
            Err(CommandError::InvalidActivityKind(_))
        ));
    }

    #[test]
    fn help_aliases() {
        assert_eq!(parse("help").unwrap(), Some(Command::Help(None)));
        assert_eq!(parse("?").unwrap(), Some(Command::Help(None)));
        assert_eq!(parse("? : save").unwrap(), Some(Command::Help(Some("save".into()))));
        assert_eq!(help_for("?").map(|h| h.name), Some("help"));
        assert!(help_for("nope").is_none());
    }

    #[test]
    fn every_command_has_help() {
        for name in [
            "details", "state", "timestamp", "largeImage", "smallImage", "addButton",
            "clearButtons", "setStateType", "save", "load", "reset", "help", "exit",
        ] {
            assert!(help_for(name).is_some(), "{name}");
        }
    }
}
