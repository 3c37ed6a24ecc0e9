//! GitHub integration for release operations

mod host;
mod release_manager;

pub use host::{
    AssetUpload, CONTENT_TYPE_BINARY, CONTENT_TYPE_TEXT, NewRelease, ReleaseHandle, ReleaseHost,
    UploadedAsset,
};
pub use release_manager::{
    DEFAULT_API_URL, DEFAULT_REPOSITORY, GitHubReleaseConfig, GitHubReleaseManager,
    asset_upload_url, parse_repository,
};
