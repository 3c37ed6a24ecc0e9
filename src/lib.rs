//! # secretshare_release
//!
//! Release publishing for secretshare.
//!
//! Given an artifact map naming the CLI, GUI and server binaries for Linux,
//! macOS and Windows, this crate:
//!
//! - computes streaming SHA-256 checksums and writes `SHA256SUMS.<platform>`
//!   manifests,
//! - creates a draft GitHub release tagged with the version string,
//! - uploads each platform's manifest followed by its three binaries.
//!
//! The hosting service sits behind the [`ReleaseHost`] trait so the workflow
//! can run against an in-memory fake.
//!
//! ## Usage
//!
//! ```bash
//! GITHUB_TOKEN=... secretshare_release artifacts.yaml --commit-id 3f2a9c1 --version-string 1.4.0
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod artifacts;
pub mod checksum;
pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod publish;

pub use artifacts::{ArtifactKind, ArtifactMap, ArtifactMapDocument, Platform};
pub use checksum::{ChecksumManifest, sha256_file};
pub use cli::Args;
pub use config::EnvConfig;
pub use error::{HostingError, ReleaseError, Result, ValidationError};
pub use github::{GitHubReleaseConfig, GitHubReleaseManager, ReleaseHost};
pub use publish::{PublishConfig, PublishSummary, Publisher, ReleaseRequest};
