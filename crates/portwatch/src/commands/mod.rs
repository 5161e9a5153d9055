//! Command dispatch: bridges CLI args -> core calls -> output formatting.

pub mod config_cmd;
pub mod discover;
pub mod status;
pub mod topology;
pub mod watch;

use portwatch_core::{StatusClient, status_client};

use crate::cli::Command;
use crate::config::Settings;
use crate::error::CliError;

/// Dispatch a service-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, settings: &Settings) -> Result<(), CliError> {
    let client = client(settings)?;

    let result = match cmd {
        Command::Status(args) => status::handle(&client, args, settings).await,
        Command::Watch(args) => watch::handle(client, args, settings).await,
        Command::Discover => discover::handle(&client, settings).await,
        Command::Topology => topology::handle(&client, settings).await,
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "config and completions are handled before dispatch".into(),
        )),
    };

    result.map_err(|e| with_timeout(e, settings))
}

fn client(settings: &Settings) -> Result<StatusClient, CliError> {
    Ok(status_client(&settings.monitor)?)
}

/// Transport timeouts don't carry the configured duration; fill it in.
fn with_timeout(err: CliError, settings: &Settings) -> CliError {
    match err {
        CliError::Timeout { seconds: 0 } => CliError::Timeout {
            seconds: settings.monitor.timeout.as_secs(),
        },
        other => other,
    }
}
