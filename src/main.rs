//! secretshare_release - publish secretshare builds as a draft GitHub release.
//!
//! Exit codes: 0 on success, 1 on any failure (missing `GITHUB_TOKEN`,
//! unreadable artifact map, or a failed publish).

use secretshare_release::cli;
use secretshare_release::cli::OutputManager;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::init();

    match cli::run().await {
        Ok(exit_code) => {
            process::exit(exit_code);
        }
        Err(e) => {
            // Create output manager for error display (never quiet for fatal errors)
            let output = OutputManager::new(false, false);
            output.error(&e.to_string());

            for suggestion in e.recovery_suggestions() {
                output.error_detail(&format!("• {suggestion}"));
            }

            process::exit(1);
        }
    }
}
