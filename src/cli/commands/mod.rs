//! Command execution functions coordinating all publishing operations.
//!
//! Configuration is validated before any network call; each command then
//! runs against a [`ReleasePublisher`] over the GitHub client.

mod delete;
mod publish;
mod upload;

use crate::cli::{Args, Command, RuntimeConfig};
use crate::config::{PublisherConfig, RetryConfig};
use crate::error::{ReleaseError, Result};
use crate::github::GitHubClient;
use crate::publish::ReleasePublisher;

use delete::execute_delete;
use publish::execute_publish;
use upload::execute_upload;

/// Execute the main command based on parsed arguments.
///
/// Invalid configuration is returned as an error. A command that fails
/// after validation is reported here and yields exit code 1.
pub async fn execute_command(args: Args) -> Result<i32> {
    let runtime = RuntimeConfig::from(&args);

    let config = PublisherConfig::from_settings(args.to_settings(), RetryConfig::from_env())?;

    match dispatch(&args.command, &config, &runtime).await {
        Ok(()) => {
            runtime.success_println(&format!(
                "Command '{}' completed successfully",
                args.command.name()
            ));
            Ok(0)
        }
        Err(e) => {
            report_failure(&runtime, args.command.name(), &e);
            Ok(1)
        }
    }
}

async fn dispatch(
    command: &Command,
    config: &PublisherConfig,
    runtime: &RuntimeConfig,
) -> Result<()> {
    let client = GitHubClient::new(config)?;
    let publisher = ReleasePublisher::new(client, config);

    match command {
        Command::Upload { .. } => execute_upload(&publisher, config, runtime).await,
        Command::Publish => execute_publish(&publisher, runtime).await,
        Command::Delete => execute_delete(&publisher, runtime).await,
    }
}

fn report_failure(runtime: &RuntimeConfig, command: &str, error: &ReleaseError) {
    runtime.error_println(&format!("Command '{}' failed: {}", command, error));

    let suggestions = error.recovery_suggestions();
    if !suggestions.is_empty() {
        runtime.println("\n💡 Recovery suggestions:");
        for suggestion in suggestions {
            runtime.println(&format!("  • {}", suggestion));
        }
    }
}
