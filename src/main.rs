use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;

use presence_shell::config::Config;
use presence_shell::{console, shell};

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if it exists (optional)
    let _ = dotenvy::dotenv();
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let config = Config::parse();

    match shell::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            console::error(err);
            ExitCode::from(1)
        }
    }
}
