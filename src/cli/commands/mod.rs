//! Command execution coordinating the release workflow.

mod release;

use crate::cli::{Args, OutputManager};
use crate::config::EnvConfig;
use crate::error::{ReleaseError, Result};

use release::execute_release;

/// Execute the release command and turn its outcome into an exit code.
///
/// Precondition failures (missing credential, unreadable artifact map) are
/// returned as `Err` for the caller to report; every later failure is reported
/// here and yields exit code 1.
pub async fn execute_command(args: Args, env_config: &EnvConfig) -> Result<i32> {
    let output = OutputManager::new(args.verbose, args.quiet);

    match execute_release(&args, env_config, &output).await {
        Ok(()) => Ok(0),
        Err(e @ ReleaseError::Precondition(_)) => Err(e),
        Err(ReleaseError::Cli(e)) => {
            output.error(&e.to_string());
            Ok(1)
        }
        Err(e) => {
            output.error(&format!("Failed to complete release:\n{e}"));

            if e.may_leave_partial_release() {
                output.error_detail(
                    "The draft release on GitHub is incomplete; inspect or delete it before retrying.",
                );
            }

            for suggestion in e.recovery_suggestions() {
                output.error_detail(&format!("• {suggestion}"));
            }

            Ok(1)
        }
    }
}
