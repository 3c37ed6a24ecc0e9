//! The release publishing workflow.
//!
//! Strictly sequential: every platform's manifest is written before the
//! release exists, and assets go up in the same order the manifests list them.
//! The first failure aborts the run and leaves whatever was already created on
//! the hosting service in place.

use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::artifacts::{ArtifactMap, ArtifactMapDocument, Platform};
use crate::checksum::ChecksumManifest;
use crate::cli::OutputManager;
use crate::error::{ReleaseError, Result, ValidationError};
use crate::github::{
    AssetUpload, CONTENT_TYPE_BINARY, CONTENT_TYPE_TEXT, NewRelease, ReleaseHandle, ReleaseHost,
    UploadedAsset,
};

/// Prefix of every release's display name
pub const RELEASE_NAME_PREFIX: &str = "secretshare";

/// Appended to every release body
pub const APT_REPOSITORY_NOTICE: &str = "There is also an APT repository:
```
deb http://apt.waucka.net/secretshare/ stable main
```
The repository key is available at https://apt.waucka.net/apt-key.gpg
";

/// Release notes followed by the APT repository notice
pub fn compose_release_body(body_text: &str) -> String {
    format!("{body_text}\n{APT_REPOSITORY_NOTICE}")
}

/// What to release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRequest {
    /// Commit the release tag points at
    pub commit_id: String,
    /// Version string, used verbatim as the tag
    pub version: String,
    /// Mark the release as a prerelease
    pub prerelease: bool,
}

impl ReleaseRequest {
    fn validate(&self) -> std::result::Result<(), ValidationError> {
        for (field, value) in [("commit_id", &self.commit_id), ("version_string", &self.version)] {
            if value.trim().is_empty() {
                return Err(ValidationError::EmptyField {
                    field: field.to_string(),
                });
            }
        }
        Ok(())
    }

    fn to_new_release(&self, body_text: &str) -> NewRelease {
        NewRelease {
            tag_name: self.version.clone(),
            target_commitish: self.commit_id.clone(),
            name: format!("{RELEASE_NAME_PREFIX} {}", self.version),
            body: compose_release_body(body_text),
            draft: true,
            prerelease: self.prerelease,
        }
    }
}

/// Publisher settings
#[derive(Debug, Clone)]
pub struct PublishConfig {
    /// Where `SHA256SUMS.<platform>` files are written
    pub manifest_dir: PathBuf,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            manifest_dir: PathBuf::from("."),
        }
    }
}

/// Outcome of a successful publish
#[derive(Debug, Clone)]
pub struct PublishSummary {
    /// The draft release
    pub release: ReleaseHandle,
    /// Manifest files written locally, in platform order
    pub manifests: Vec<PathBuf>,
    /// Uploaded assets, in upload order
    pub assets: Vec<UploadedAsset>,
}

/// Publishes an artifact map as a draft release on a [`ReleaseHost`]
pub struct Publisher<H> {
    host: H,
    config: PublishConfig,
    output: OutputManager,
}

impl<H: ReleaseHost> Publisher<H> {
    /// Create a publisher
    pub fn new(host: H, config: PublishConfig, output: OutputManager) -> Self {
        Self {
            host,
            config,
            output,
        }
    }

    /// The hosting client
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Validate the artifact map and request, then publish.
    ///
    /// Validation happens before any file is hashed or any request is sent.
    pub async fn publish(
        &self,
        document: &ArtifactMapDocument,
        request: &ReleaseRequest,
    ) -> Result<PublishSummary> {
        let map = document.validate()?;
        self.publish_map(&map, request).await
    }

    /// Publish an already validated artifact map
    pub async fn publish_map(
        &self,
        map: &ArtifactMap,
        request: &ReleaseRequest,
    ) -> Result<PublishSummary> {
        request.validate()?;

        self.output.section("Checksums");
        let mut manifests = Vec::with_capacity(map.platforms().len());
        for platform in map.platforms() {
            let manifest = ChecksumManifest::compute(platform).await?;
            let target = self
                .config
                .manifest_dir
                .join(ChecksumManifest::file_name(platform.platform()));
            if tokio::fs::try_exists(&target).await.unwrap_or(false) {
                self.output
                    .warn(&format!("Overwriting existing {}", target.display()));
            }
            let path = manifest.write_to(&self.config.manifest_dir).await?;
            if self.output.is_verbose() {
                for entry in manifest.entries() {
                    self.output
                        .verbose(&format!("{}  {}", entry.digest, entry.asset_name));
                }
            }
            self.output.success(&format!("Wrote {}", path.display()));
            manifests.push(path);
        }

        self.output.section("GitHub release");
        let new_release = request.to_new_release(map.body_text());
        self.output
            .progress(&format!("Creating draft release '{}'...", new_release.name));
        let release = self
            .host
            .create_release(&new_release)
            .await
            .map_err(|e| ReleaseError::hosting(format!("creating release {}", request.version), e))?;
        log::info!("created release {} ({})", release.id, release.html_url);
        self.output
            .success(&format!("Created draft release: {}", release.html_url));

        let mut assets = Vec::new();
        for (platform, manifest_path) in map.platforms().iter().zip(&manifests) {
            let platform_id = platform.platform();

            assets.push(
                self.upload(
                    &release,
                    platform_id,
                    &ChecksumManifest::file_name(platform_id),
                    manifest_path,
                    CONTENT_TYPE_TEXT,
                )
                .await?,
            );

            for artifact in platform.artifacts() {
                assets.push(
                    self.upload(
                        &release,
                        platform_id,
                        &artifact.asset_name,
                        &artifact.path,
                        CONTENT_TYPE_BINARY,
                    )
                    .await?,
                );
            }
        }

        Ok(PublishSummary {
            release,
            manifests,
            assets,
        })
    }

    async fn upload(
        &self,
        release: &ReleaseHandle,
        platform: Platform,
        asset_name: &str,
        path: &Path,
        content_type: &'static str,
    ) -> Result<UploadedAsset> {
        self.output.progress(&format!("Uploading {}...", path.display()));

        let content = tokio::fs::read(path)
            .await
            .map_err(|source| ReleaseError::AssetRead {
                asset: asset_name.to_string(),
                path: path.to_path_buf(),
                source,
            })?;

        let asset = self
            .host
            .upload_asset(
                release,
                AssetUpload {
                    name: asset_name.to_string(),
                    content_type,
                    content: Bytes::from(content),
                },
            )
            .await
            .map_err(|e| ReleaseError::hosting(format!("uploading {asset_name} ({platform})"), e))?;

        self.output
            .indent(&format!("✓ Uploaded: {} ({} bytes)", asset.name, asset.size));
        Ok(asset)
    }
}
