//! Shows the photographic metadata of images attached to forum posts.
//!
//! Attachments come either from a legacy import blob or from uploaded files
//! whose EXIF is read directly. Both are normalized into [`PhotoMetadata`] and
//! rendered by [`Renderer`] into the HTML fragment placed under each post.

pub mod config;
pub mod error;
pub mod exposure;
pub mod metadata;
pub mod processor;
pub mod render;
pub mod store;
pub mod walker;
pub mod web_server;

pub use error::AppError;
pub use exposure::{format_exposure_time, ExposureTime};
pub use metadata::{decode_legacy_blob, LegacyRecord, PhotoMetadata, Provenance};
pub use render::{fix_characters, Renderer};
pub use store::{render_post, AttachmentSource, DirectoryStore};
