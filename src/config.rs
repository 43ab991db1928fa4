use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Interactive Discord Rich Presence editor
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Directory holding clientIds.json, history.log and saves/
    #[arg(short, long, env = "PRESENCE_SHELL_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Seconds to wait before each reconnect attempt
    #[arg(long, env = "PRESENCE_SHELL_RETRY_DELAY", default_value_t = 5)]
    pub retry_delay_secs: u64,
}

impl Config {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_current_directory() {
        let config = Config::try_parse_from(["presence-shell"]).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("."));
        assert_eq!(config.retry_delay(), Duration::from_secs(5));
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "presence-shell",
            "--data-dir",
            "/tmp/rpc",
            "--retry-delay-secs",
            "2",
        ])
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/rpc"));
        assert_eq!(config.retry_delay_secs, 2);
    }
}
