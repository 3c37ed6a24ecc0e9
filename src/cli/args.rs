//! Command line argument parsing and validation.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::github::{DEFAULT_API_URL, DEFAULT_REPOSITORY};

/// Make a release of secretshare
#[derive(Parser, Debug, Clone)]
#[command(
    name = "secretshare_release",
    version,
    about = "Make a release of secretshare",
    long_about = "Checksum the secretshare binaries listed in an artifact map, create a draft
GitHub release and upload the SHA256SUMS manifests and binaries to it.

Requires a GitHub access token in the GITHUB_TOKEN environment variable.

Usage:
  secretshare_release artifacts.yaml --commit-id 3f2a9c1 --version-string 1.4.0
  secretshare_release artifacts.toml --commit-id 3f2a9c1 --version-string 1.4.1
  secretshare_release artifacts.json --commit-id 3f2a9c1 --version-string 1.5.0-rc1 --prerelease true"
)]
pub struct Args {
    /// YAML file listing release artifacts (.toml and .json files are also accepted)
    #[arg(index = 1, value_name = "ARTIFACT_MAP")]
    pub artifact_map: PathBuf,

    /// Git commit to release
    #[arg(long, value_name = "COMMIT")]
    pub commit_id: String,

    /// secretshare version string, also used as the tag name
    #[arg(long, value_name = "VERSION")]
    pub version_string: String,

    /// Is this a prerelease?
    #[arg(
        long,
        value_name = "BOOL",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true"
    )]
    pub prerelease: bool,

    /// GitHub repository to release to (owner/repo)
    #[arg(long, value_name = "OWNER/REPO", default_value = DEFAULT_REPOSITORY)]
    pub repo: String,

    /// GitHub API base URL
    #[arg(long, value_name = "URL", env = "SECRETSHARE_GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Directory the SHA256SUMS.<platform> files are written to
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub manifest_dir: PathBuf,

    /// Print every computed digest
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if !self.manifest_dir.is_dir() {
            return Err(format!(
                "Manifest directory does not exist: {}",
                self.manifest_dir.display()
            ));
        }

        Ok(())
    }
}
