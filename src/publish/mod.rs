//! Release publishing: checksum manifests, draft release creation and asset upload.

mod publisher;

pub use publisher::{
    APT_REPOSITORY_NOTICE, PublishConfig, PublishSummary, Publisher, RELEASE_NAME_PREFIX,
    ReleaseRequest, compose_release_body,
};
