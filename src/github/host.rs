//! Capability interface for the release hosting service.

use std::future::Future;

use bytes::Bytes;

use crate::error::HostingError;

/// Content type for checksum manifests
pub const CONTENT_TYPE_TEXT: &str = "text/plain";

/// Content type for binaries
pub const CONTENT_TYPE_BINARY: &str = "application/octet-stream";

/// Parameters of a release to create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRelease {
    /// Tag name, created by the service if absent
    pub tag_name: String,
    /// Commit the tag points at
    pub target_commitish: String,
    /// Display name
    pub name: String,
    /// Markdown body
    pub body: String,
    /// Visible to maintainers only
    pub draft: bool,
    /// Marked as not production-ready
    pub prerelease: bool,
}

/// Handle to a created release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseHandle {
    /// Release ID
    pub id: u64,
    /// Release URL
    pub html_url: String,
    /// Asset upload URL, possibly an RFC 6570 template
    pub upload_url: String,
}

/// An asset to attach to a release
#[derive(Debug, Clone)]
pub struct AssetUpload {
    /// Asset file name on the release
    pub name: String,
    /// MIME type sent with the upload
    pub content_type: &'static str,
    /// Asset bytes
    pub content: Bytes,
}

/// Result of an asset upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedAsset {
    /// Asset name as stored by the service
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Download URL
    pub browser_download_url: String,
}

/// Operations the publisher needs from a release hosting service
pub trait ReleaseHost {
    /// Create a release
    fn create_release(
        &self,
        release: &NewRelease,
    ) -> impl Future<Output = Result<ReleaseHandle, HostingError>> + Send;

    /// Attach an asset to a release
    fn upload_asset(
        &self,
        release: &ReleaseHandle,
        asset: AssetUpload,
    ) -> impl Future<Output = Result<UploadedAsset, HostingError>> + Send;
}
