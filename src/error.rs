//! Error types for secretshare_release operations.
//!
//! This module defines all error types with actionable error messages and recovery suggestions.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for secretshare_release operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type for all secretshare_release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// Fail-fast errors raised before any work starts
    #[error("Precondition failed: {0}")]
    Precondition(#[from] PreconditionError),

    /// Artifact map or release request is incomplete
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// An artifact could not be hashed
    #[error("Checksum error: failed to hash {}: {source}", .path.display())]
    Checksum {
        /// File being hashed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A checksum manifest could not be written
    #[error("Failed to write checksum manifest {}: {source}", .path.display())]
    ManifestWrite {
        /// Manifest path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// An asset payload could not be read for upload
    #[error("Failed to read {} for asset '{asset}': {source}", .path.display())]
    AssetRead {
        /// Asset name on the release
        asset: String,
        /// Local file backing the asset
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Remote hosting service failure
    #[error("Hosting service error while {operation}: {source}")]
    Hosting {
        /// Operation in progress, including the platform/asset
        operation: String,
        /// Classified remote failure
        #[source]
        source: HostingError,
    },

    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),
}

/// Errors that abort the run before any artifact is touched
#[derive(Error, Debug)]
pub enum PreconditionError {
    /// Access token missing from the environment
    #[error("The {variable} environment variable needs to be set.")]
    MissingCredential {
        /// Environment variable name
        variable: String,
    },

    /// Artifact map file could not be read
    #[error("Failed to load artifact map from file {}: {source}", .path.display())]
    UnreadableArtifactMap {
        /// Path to the artifact map
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Artifact map file could not be parsed
    #[error("Failed to parse artifact map from file {}: {reason}", .path.display())]
    MalformedArtifactMap {
        /// Path to the artifact map
        path: PathBuf,
        /// Parser message
        reason: String,
    },
}

/// Artifact map and release request validation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Platform table missing from the artifact map
    #[error("artifact map is missing platform '{platform}'")]
    MissingPlatform {
        /// Platform key
        platform: String,
    },

    /// Platform key not recognized
    #[error("artifact map contains unrecognized platform '{name}'")]
    UnknownPlatform {
        /// Offending key
        name: String,
    },

    /// Artifact kind missing from a platform table
    #[error("platform '{platform}' is missing '{kind}'")]
    MissingArtifact {
        /// Platform key
        platform: String,
        /// Artifact kind key
        kind: String,
    },

    /// Artifact path does not point at a readable file
    #[error("{platform}.{kind} does not exist or is not a file: {}", .path.display())]
    ArtifactNotFound {
        /// Platform key
        platform: String,
        /// Artifact kind key
        kind: String,
        /// Configured path
        path: PathBuf,
    },

    /// Artifact path has no usable file name
    #[error("{platform}.{kind} has no file name: {}", .path.display())]
    InvalidArtifactName {
        /// Platform key
        platform: String,
        /// Artifact kind key
        kind: String,
        /// Configured path
        path: PathBuf,
    },

    /// Two artifacts of one platform would upload under the same name
    #[error("platform '{platform}' has more than one artifact named '{asset_name}'")]
    DuplicateAssetName {
        /// Platform key
        platform: String,
        /// Colliding asset name
        asset_name: String,
    },

    /// A required string field is empty or absent
    #[error("'{field}' must not be empty")]
    EmptyField {
        /// Field name
        field: String,
    },
}

/// Classified failures from the release hosting service
#[derive(Error, Debug)]
pub enum HostingError {
    /// Token rejected
    #[error("authentication failed: {message}")]
    Unauthorized {
        /// Service message
        message: String,
    },

    /// The tag or asset name is already taken
    #[error("already exists: {message}")]
    AlreadyExists {
        /// Service message
        message: String,
    },

    /// API rate limit hit
    #[error("rate limit exceeded{}", .retry_after_seconds.map(|s| format!(", retry after {s}s")).unwrap_or_default())]
    RateLimited {
        /// Seconds until the limit resets, when the service reports it
        retry_after_seconds: Option<u64>,
    },

    /// Any other non-success response
    #[error("HTTP {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Service message
        message: String,
    },

    /// The service response could not be understood
    #[error("unexpected response: {reason}")]
    InvalidResponse {
        /// What was wrong
        reason: String,
    },

    /// Connection, TLS or protocol failure
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

impl ReleaseError {
    /// Wrap a hosting failure with the operation that was in progress
    pub fn hosting(operation: impl Into<String>, source: HostingError) -> Self {
        ReleaseError::Hosting {
            operation: operation.into(),
            source,
        }
    }

    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            ReleaseError::Precondition(PreconditionError::MissingCredential { variable }) => vec![
                format!("Export a GitHub access token: export {variable}=<token>"),
                "The token needs the 'repo' scope (or contents:write for fine-grained tokens)"
                    .to_string(),
            ],
            ReleaseError::Precondition(PreconditionError::MalformedArtifactMap { .. }) => vec![
                "The artifact map needs 'body_text' plus linux/osx/windows tables".to_string(),
                "Each platform table needs binary_cli, binary_gui and binary_server".to_string(),
            ],
            ReleaseError::Validation(_) => vec![
                "Fix the artifact map and re-run; nothing was sent to GitHub".to_string(),
            ],
            ReleaseError::Hosting {
                source: HostingError::AlreadyExists { .. },
                operation,
            } if operation.starts_with("creating") => vec![
                "A release with this tag already exists; choose a different --version-string"
                    .to_string(),
                "Or delete the existing release on GitHub first".to_string(),
            ],
            ReleaseError::Hosting {
                source: HostingError::Unauthorized { .. },
                ..
            } => vec![
                "Verify GITHUB_TOKEN is valid and has write access to the repository".to_string(),
            ],
            ReleaseError::Hosting {
                source: HostingError::RateLimited { retry_after_seconds },
                ..
            } => vec![format!(
                "Wait {} seconds before retrying",
                retry_after_seconds.unwrap_or(60)
            )],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }

    /// Whether the failure may have left a partially populated draft release behind
    pub fn may_leave_partial_release(&self) -> bool {
        match self {
            ReleaseError::Hosting { operation, .. } => operation.starts_with("uploading"),
            ReleaseError::AssetRead { .. } => true,
            _ => false,
        }
    }
}
