//! Release command: bootstrap the GitHub client and run the publisher.

use crate::artifacts::ArtifactMapDocument;
use crate::cli::{Args, OutputManager};
use crate::config::EnvConfig;
use crate::error::{CliError, Result};
use crate::github::{GitHubReleaseConfig, GitHubReleaseManager};
use crate::publish::{PublishConfig, Publisher, ReleaseRequest};

/// Execute release command
pub(super) async fn execute_release(
    args: &Args,
    env_config: &EnvConfig,
    output: &OutputManager,
) -> Result<()> {
    // The token check comes before anything touches the filesystem
    let token = env_config.github_token()?;

    let document = ArtifactMapDocument::load(&args.artifact_map)?;
    log::debug!("loaded artifact map from {}", args.artifact_map.display());

    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let github_config = GitHubReleaseConfig::new(&args.api_url, &args.repo, token)?;
    output.info(&format!(
        "Releasing {} to {}/{}",
        args.version_string, github_config.owner, github_config.repo
    ));
    let github_manager = GitHubReleaseManager::new(github_config)?;

    let publisher = Publisher::new(
        github_manager,
        PublishConfig {
            manifest_dir: args.manifest_dir.clone(),
        },
        output.clone(),
    );

    let request = ReleaseRequest {
        commit_id: args.commit_id.clone(),
        version: args.version_string.clone(),
        prerelease: args.prerelease,
    };

    let summary = publisher.publish(&document, &request).await?;

    output.success(&format!(
        "Release complete: {} asset(s) uploaded",
        summary.assets.len()
    ));
    output.indent(&format!("Draft release: {}", summary.release.html_url));
    output.indent("Review the draft on GitHub and publish it when ready.");

    Ok(())
}
