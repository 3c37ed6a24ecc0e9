//! GitHub Releases implementation of [`ReleaseHost`]

use std::sync::OnceLock;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, RETRY_AFTER};
use reqwest::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use super::host::{AssetUpload, NewRelease, ReleaseHandle, ReleaseHost, UploadedAsset};
use crate::error::{CliError, HostingError, ReleaseError, Result};

/// Public GitHub API endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Repository the original release tooling publishes to
pub const DEFAULT_REPOSITORY: &str = "waucka/secretshare";

const GITHUB_API_VERSION: &str = "2022-11-28";

/// Configuration for GitHub releases
#[derive(Clone)]
pub struct GitHubReleaseConfig {
    /// API base URL, always ending in `/`
    pub api_url: Url,
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Access token
    pub token: String,
    releases_url: Url,
}

impl GitHubReleaseConfig {
    /// Build a config from CLI-style values
    ///
    /// `repository` is `owner/name`; `api_url` may omit the trailing slash.
    pub fn new(api_url: &str, repository: &str, token: String) -> Result<Self> {
        let (owner, repo) = parse_repository(repository)?;
        let mut api_url = Url::parse(api_url).map_err(|e| CliError::InvalidArguments {
            reason: format!("Invalid API URL '{api_url}': {e}"),
        })?;
        if !api_url.path().ends_with('/') {
            let path = format!("{}/", api_url.path());
            api_url.set_path(&path);
        }
        let releases_url = api_url
            .join(&format!("repos/{owner}/{repo}/releases"))
            .map_err(|e| CliError::InvalidArguments {
                reason: format!("Cannot build releases URL from '{api_url}': {e}"),
            })?;
        Ok(Self {
            api_url,
            owner,
            repo,
            token,
            releases_url,
        })
    }

    /// Endpoint for creating releases
    pub fn releases_url(&self) -> &Url {
        &self.releases_url
    }
}

impl std::fmt::Debug for GitHubReleaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubReleaseConfig")
            .field("api_url", &self.api_url.as_str())
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Split `owner/repo`
pub fn parse_repository(repository: &str) -> Result<(String, String)> {
    match repository.split('/').collect::<Vec<_>>().as_slice() {
        [owner, repo] if !owner.is_empty() && !repo.is_empty() => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(ReleaseError::Cli(CliError::InvalidArguments {
            reason: format!(
                "Invalid GitHub repository format: '{}'. Expected: owner/repo",
                repository
            ),
        })),
    }
}

/// GitHub release manager
pub struct GitHubReleaseManager {
    /// HTTP client
    http: reqwest::Client,
    /// Configuration
    config: GitHubReleaseConfig,
}

/// One-time initialization guard for rustls crypto provider
static RUSTLS_INITIALIZED: OnceLock<()> = OnceLock::new();

#[derive(Serialize)]
struct CreateReleasePayload<'a> {
    tag_name: &'a str,
    target_commitish: &'a str,
    name: &'a str,
    body: &'a str,
    draft: bool,
    prerelease: bool,
}

#[derive(Deserialize)]
struct ReleaseResponse {
    id: u64,
    html_url: String,
    upload_url: String,
}

#[derive(Deserialize)]
struct AssetResponse {
    name: String,
    size: u64,
    browser_download_url: String,
}

#[derive(Deserialize, Default)]
struct ErrorResponse {
    message: Option<String>,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    code: Option<String>,
    field: Option<String>,
}

impl GitHubReleaseManager {
    /// Create new GitHub release manager
    pub fn new(config: GitHubReleaseConfig) -> Result<Self> {
        RUSTLS_INITIALIZED.get_or_init(|| {
            // Err only means a provider is already installed
            let _ = rustls::crypto::ring::default_provider().install_default();
        });

        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ReleaseError::hosting("initializing the GitHub client", e.into()))?;

        Ok(Self { http, config })
    }

    /// Configuration in use
    pub fn config(&self) -> &GitHubReleaseConfig {
        &self.config
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .bearer_auth(&self.config.token)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
    }
}

impl GitHubReleaseManager {
    /// Build the authenticated `POST .../releases` request
    fn create_release_request(
        &self,
        release: &NewRelease,
    ) -> std::result::Result<Request, HostingError> {
        let payload = CreateReleasePayload {
            tag_name: &release.tag_name,
            target_commitish: &release.target_commitish,
            name: &release.name,
            body: &release.body,
            draft: release.draft,
            prerelease: release.prerelease,
        };

        Ok(self
            .authorized(self.http.post(self.config.releases_url().clone()))
            .json(&payload)
            .build()?)
    }

    /// Build the authenticated asset upload request for `release`
    fn upload_asset_request(
        &self,
        release: &ReleaseHandle,
        asset: AssetUpload,
    ) -> std::result::Result<Request, HostingError> {
        let url = asset_upload_url(&release.upload_url, &asset.name)?;

        Ok(self
            .authorized(self.http.post(url))
            .header(CONTENT_TYPE, asset.content_type)
            .body(asset.content)
            .build()?)
    }
}

impl ReleaseHost for GitHubReleaseManager {
    async fn create_release(
        &self,
        release: &NewRelease,
    ) -> std::result::Result<ReleaseHandle, HostingError> {
        let request = self.create_release_request(release)?;

        log::debug!("POST {} (tag {})", request.url(), release.tag_name);
        let response = self.http.execute(request).await?;
        let created: ReleaseResponse = check_response(response).await?.json().await?;

        Ok(ReleaseHandle {
            id: created.id,
            html_url: created.html_url,
            upload_url: created.upload_url,
        })
    }

    async fn upload_asset(
        &self,
        release: &ReleaseHandle,
        asset: AssetUpload,
    ) -> std::result::Result<UploadedAsset, HostingError> {
        log::debug!(
            "uploading {} ({} bytes, {})",
            asset.name,
            asset.content.len(),
            asset.content_type
        );
        let request = self.upload_asset_request(release, asset)?;

        let response = self.http.execute(request).await?;
        let uploaded: AssetResponse = check_response(response).await?.json().await?;

        Ok(UploadedAsset {
            name: uploaded.name,
            size: uploaded.size,
            browser_download_url: uploaded.browser_download_url,
        })
    }
}

/// Resolve a release's `upload_url` template for a named asset
///
/// GitHub returns e.g. `https://uploads.github.com/repos/o/r/releases/1/assets{?name,label}`.
pub fn asset_upload_url(template: &str, asset_name: &str) -> std::result::Result<Url, HostingError> {
    let base = template.split('{').next().unwrap_or(template);
    let mut url = Url::parse(base).map_err(|e| HostingError::InvalidResponse {
        reason: format!("invalid upload_url '{template}': {e}"),
    })?;
    url.query_pairs_mut().append_pair("name", asset_name);
    Ok(url)
}

async fn check_response(response: Response) -> std::result::Result<Response, HostingError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let rate_limit_exhausted = header_value(response.headers(), "x-ratelimit-remaining")
        .is_some_and(|remaining| remaining == 0);
    let retry_after = header_value(response.headers(), RETRY_AFTER.as_str());
    let body = response.text().await.unwrap_or_default();

    Err(classify_failure(status, rate_limit_exhausted, retry_after, &body))
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}

/// Map a failed GitHub response onto [`HostingError`]
fn classify_failure(
    status: StatusCode,
    rate_limit_exhausted: bool,
    retry_after_seconds: Option<u64>,
    body: &str,
) -> HostingError {
    let parsed: ErrorResponse = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .message
        .clone()
        .filter(|m| !m.is_empty())
        .or_else(|| Some(body.trim().to_string()).filter(|b| !b.is_empty()))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());

    match status {
        StatusCode::TOO_MANY_REQUESTS => HostingError::RateLimited { retry_after_seconds },
        StatusCode::FORBIDDEN if rate_limit_exhausted => {
            HostingError::RateLimited { retry_after_seconds }
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => HostingError::Unauthorized { message },
        StatusCode::UNPROCESSABLE_ENTITY
            if parsed
                .errors
                .iter()
                .any(|e| e.code.as_deref() == Some("already_exists")) =>
        {
            let fields: Vec<&str> = parsed
                .errors
                .iter()
                .filter_map(|e| e.field.as_deref())
                .collect();
            HostingError::AlreadyExists {
                message: if fields.is_empty() {
                    message
                } else {
                    format!("{message} ({} already_exists)", fields.join(", "))
                },
            }
        }
        _ => HostingError::Api {
            status: status.as_u16(),
            message,
        },
    }
}
