//! SHA-256 checksums and the `SHA256SUMS.<platform>` manifests.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tokio::io::AsyncReadExt;

use crate::artifacts::{Platform, PlatformArtifacts};
use crate::error::{ReleaseError, Result};

/// Read block size for streaming hashes
const BLOCK_SIZE: usize = 64 * 1024;

/// Compute the lowercase hex SHA-256 of a file without loading it into memory
pub async fn sha256_file(path: &Path) -> Result<String> {
    let checksum_error = |source| ReleaseError::Checksum {
        path: path.to_path_buf(),
        source,
    };

    let mut file = tokio::fs::File::open(path).await.map_err(checksum_error)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; BLOCK_SIZE];

    loop {
        let n = file.read(&mut buffer).await.map_err(checksum_error)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Hex SHA-256 of an in-memory buffer
pub fn sha256_bytes(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// One manifest line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumEntry {
    /// Release asset name
    pub asset_name: String,
    /// Lowercase hex SHA-256
    pub digest: String,
}

/// Ordered checksums for one platform's artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumManifest {
    platform: Platform,
    entries: Vec<ChecksumEntry>,
}

impl ChecksumManifest {
    /// Hash every artifact of a platform in kind order
    pub async fn compute(artifacts: &PlatformArtifacts) -> Result<Self> {
        let mut entries = Vec::with_capacity(artifacts.artifacts().len());
        for artifact in artifacts.artifacts() {
            let digest = sha256_file(&artifact.path).await?;
            log::debug!("{}  {}", digest, artifact.asset_name);
            entries.push(ChecksumEntry {
                asset_name: artifact.asset_name.clone(),
                digest,
            });
        }
        Ok(Self {
            platform: artifacts.platform(),
            entries,
        })
    }

    /// Manifest file name, also used as its asset name
    pub fn file_name(platform: Platform) -> String {
        format!("SHA256SUMS.{platform}")
    }

    /// Platform this manifest covers
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Entries in enumeration order
    pub fn entries(&self) -> &[ChecksumEntry] {
        &self.entries
    }

    /// Render as `sha256sum` output: `<digest>  <name>` per line
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{}  {}\n", e.digest, e.asset_name))
            .collect()
    }

    /// Write the manifest into `dir`, replacing any previous run's file
    pub async fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(Self::file_name(self.platform));
        tokio::fs::write(&path, self.render())
            .await
            .map_err(|source| ReleaseError::ManifestWrite {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::ArtifactMapDocument;
    use tempfile::TempDir;

    const ABC_SHA256: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[tokio::test]
    async fn test_known_digest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("abc");
        std::fs::write(&path, b"abc").unwrap();
        assert_eq!(sha256_file(&path).await.unwrap(), ABC_SHA256);
        assert_eq!(sha256_bytes(b"abc"), ABC_SHA256);
    }

    #[tokio::test]
    async fn test_streaming_matches_whole_file_across_blocks() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("large");
        let data: Vec<u8> = (0..(BLOCK_SIZE * 3 + 17)).map(|i| (i % 251) as u8).collect();
        std::fs::write(&path, &data).unwrap();

        let first = sha256_file(&path).await.unwrap();
        let second = sha256_file(&path).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first, sha256_bytes(&data));
    }

    #[tokio::test]
    async fn test_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty");
        std::fs::write(&path, b"").unwrap();
        assert_eq!(
            sha256_file(&path).await.unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[tokio::test]
    async fn test_missing_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gone");
        let err = sha256_file(&path).await.unwrap_err();
        assert!(matches!(&err, ReleaseError::Checksum { path: p, .. } if p == &path));
        assert!(err.to_string().contains("gone"));
    }

    #[tokio::test]
    async fn test_manifest_render_and_write() {
        let dir = TempDir::new().unwrap();
        let mut toml = String::from("body_text = \"x\"\n");
        for platform in Platform::ALL {
            toml.push_str(&format!("[{platform}]\n"));
            for name in ["binary_cli", "binary_gui", "binary_server"] {
                let path = dir.path().join(format!("{platform}-{name}.bin"));
                std::fs::write(&path, name).unwrap();
                toml.push_str(&format!("{name} = {:?}\n", path.display().to_string()));
            }
        }
        let map = ArtifactMapDocument::from_toml_str(&toml)
            .unwrap()
            .validate()
            .unwrap();

        let linux = &map.platforms()[0];
        let manifest = ChecksumManifest::compute(linux).await.unwrap();
        let written = manifest.write_to(dir.path()).await.unwrap();

        assert_eq!(written, dir.path().join("SHA256SUMS.linux"));
        let content = std::fs::read_to_string(&written).unwrap();
        let expected = format!(
            "{}  linux-linux-binary_cli.bin\n{}  linux-linux-binary_gui.bin\n{}  linux-linux-binary_server.bin\n",
            sha256_bytes(b"binary_cli"),
            sha256_bytes(b"binary_gui"),
            sha256_bytes(b"binary_server"),
        );
        assert_eq!(content, expected);
    }
}
