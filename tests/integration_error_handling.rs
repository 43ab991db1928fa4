use presence_shell::{CommandError, DiscordIpcError, StartupError, StoreError};
use std::path::PathBuf;

#[test]
fn transport_errors_describe_the_failure() {
    let not_connected = DiscordIpcError::NotConnected;
    assert_eq!(not_connected.to_string(), "RPC client is not logged in");

    let timeout = DiscordIpcError::ResponseTimeout(10_000);
    assert!(timeout.to_string().contains("10000 ms"));

    let io = DiscordIpcError::from(std::io::Error::from(std::io::ErrorKind::ConnectionRefused));
    assert!(matches!(io, DiscordIpcError::ConnectionFailed(_)));
}

#[test]
fn startup_errors_name_the_problem() {
    let created = StartupError::from(StoreError::CredentialsCreated(PathBuf::from("clientIds.json")));
    assert!(created.to_string().contains("clientIds.json"));

    let selection = StartupError::InvalidSelection("7".into());
    assert!(selection.to_string().contains("'7'"));
}

#[test]
fn command_errors_echo_the_input() {
    let err = CommandError::InvalidImageUrl("https://x.com/a.bmp".into());
    assert!(err.to_string().contains("https://x.com/a.bmp"));
    assert!(CommandError::Unknown("foobar".into()).to_string().contains("foobar"));
}
