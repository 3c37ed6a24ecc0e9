//! Artifact map loading and validation.
//!
//! The artifact map names, for each of the three release platforms, the CLI,
//! GUI and server binaries to publish, plus the release notes text. It is read
//! once as an [`ArtifactMapDocument`] and then validated into an [`ArtifactMap`]
//! whose shape is guaranteed complete.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{PreconditionError, Result, ValidationError};

/// Release target platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Platform {
    /// Linux builds
    Linux,
    /// macOS builds
    Osx,
    /// Windows builds
    Windows,
}

impl Platform {
    /// Every platform, in publish order
    pub const ALL: [Platform; 3] = [Platform::Linux, Platform::Osx, Platform::Windows];

    /// Key used in the artifact map and in asset names
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::Osx => "osx",
            Platform::Windows => "windows",
        }
    }

    /// Parse an artifact map key
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == key)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of binary shipped per platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArtifactKind {
    /// Command-line client
    BinaryCli,
    /// GUI client
    BinaryGui,
    /// Server
    BinaryServer,
}

impl ArtifactKind {
    /// Every kind, in checksum and upload order
    pub const ALL: [ArtifactKind; 3] = [
        ArtifactKind::BinaryCli,
        ArtifactKind::BinaryGui,
        ArtifactKind::BinaryServer,
    ];

    /// Key used in the artifact map
    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactKind::BinaryCli => "binary_cli",
            ArtifactKind::BinaryGui => "binary_gui",
            ArtifactKind::BinaryServer => "binary_server",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Artifact map as written on disk, before validation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtifactMapDocument {
    /// Release notes placed at the top of the release body
    #[serde(default)]
    pub body_text: Option<String>,
    /// Platform tables keyed by platform name
    #[serde(flatten)]
    pub platforms: BTreeMap<String, PlatformArtifactsDocument>,
}

/// One platform table of the artifact map
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformArtifactsDocument {
    /// Command-line client binary
    pub binary_cli: Option<PathBuf>,
    /// GUI client binary
    pub binary_gui: Option<PathBuf>,
    /// Server binary
    pub binary_server: Option<PathBuf>,
}

impl PlatformArtifactsDocument {
    fn get(&self, kind: ArtifactKind) -> Option<&PathBuf> {
        match kind {
            ArtifactKind::BinaryCli => self.binary_cli.as_ref(),
            ArtifactKind::BinaryGui => self.binary_gui.as_ref(),
            ArtifactKind::BinaryServer => self.binary_server.as_ref(),
        }
    }
}

impl ArtifactMapDocument {
    /// Load an artifact map file.
    ///
    /// The format follows the extension: `.toml` is TOML, `.json` is JSON and
    /// anything else (normally `.yaml`/`.yml`) is YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            PreconditionError::UnreadableArtifactMap {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let parsed = match extension.as_deref() {
            Some("toml") => Self::from_toml_str(&content),
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        };

        parsed.map_err(|reason| {
            PreconditionError::MalformedArtifactMap {
                path: path.to_path_buf(),
                reason,
            }
            .into()
        })
    }

    /// Parse a YAML artifact map
    pub fn from_yaml_str(content: &str) -> std::result::Result<Self, String> {
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }

    /// Parse a TOML artifact map
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Parse a JSON artifact map
    pub fn from_json_str(content: &str) -> std::result::Result<Self, String> {
        serde_json::from_str(content).map_err(|e| e.to_string())
    }

    /// Validate into an [`ArtifactMap`], checking that every file exists
    pub fn validate(&self) -> std::result::Result<ArtifactMap, ValidationError> {
        if let Some(name) = self
            .platforms
            .keys()
            .find(|key| Platform::from_key(key).is_none())
        {
            return Err(ValidationError::UnknownPlatform { name: name.clone() });
        }

        let body_text = self
            .body_text
            .as_deref()
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| ValidationError::EmptyField {
                field: "body_text".to_string(),
            })?;

        let mut platforms = Vec::with_capacity(Platform::ALL.len());
        for platform in Platform::ALL {
            let table = self.platforms.get(platform.as_str()).ok_or_else(|| {
                ValidationError::MissingPlatform {
                    platform: platform.to_string(),
                }
            })?;

            let mut artifacts: Vec<Artifact> = Vec::with_capacity(ArtifactKind::ALL.len());
            for kind in ArtifactKind::ALL {
                let path = table
                    .get(kind)
                    .ok_or_else(|| ValidationError::MissingArtifact {
                        platform: platform.to_string(),
                        kind: kind.to_string(),
                    })?;

                if !path.is_file() {
                    return Err(ValidationError::ArtifactNotFound {
                        platform: platform.to_string(),
                        kind: kind.to_string(),
                        path: path.clone(),
                    });
                }

                let asset_name = asset_name(platform, path).ok_or_else(|| {
                    ValidationError::InvalidArtifactName {
                        platform: platform.to_string(),
                        kind: kind.to_string(),
                        path: path.clone(),
                    }
                })?;

                if artifacts.iter().any(|a| a.asset_name == asset_name) {
                    return Err(ValidationError::DuplicateAssetName {
                        platform: platform.to_string(),
                        asset_name,
                    });
                }

                artifacts.push(Artifact {
                    kind,
                    path: path.clone(),
                    asset_name,
                });
            }

            platforms.push(PlatformArtifacts {
                platform,
                artifacts,
            });
        }

        Ok(ArtifactMap {
            body_text: body_text.to_string(),
            platforms,
        })
    }
}

/// Release asset name for an artifact: `<platform>-<basename>`
pub fn asset_name(platform: Platform, path: &Path) -> Option<String> {
    let basename = path.file_name()?.to_str()?;
    Some(format!("{platform}-{basename}"))
}

/// A single validated artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Binary kind
    pub kind: ArtifactKind,
    /// Local file
    pub path: PathBuf,
    /// Name the file is uploaded under
    pub asset_name: String,
}

/// The validated artifacts of one platform, in kind order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformArtifacts {
    platform: Platform,
    artifacts: Vec<Artifact>,
}

impl PlatformArtifacts {
    /// Platform these artifacts belong to
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Artifacts in `binary_cli`, `binary_gui`, `binary_server` order
    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }
}

/// Complete, validated artifact map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactMap {
    body_text: String,
    platforms: Vec<PlatformArtifacts>,
}

impl ArtifactMap {
    /// Release notes supplied by the caller
    pub fn body_text(&self) -> &str {
        &self.body_text
    }

    /// Platforms in `linux`, `osx`, `windows` order
    pub fn platforms(&self) -> &[PlatformArtifacts] {
        &self.platforms
    }
}
