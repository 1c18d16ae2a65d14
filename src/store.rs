use crate::config::AppConfig;
use crate::error::AppError;
use crate::metadata::{decode_legacy_blob, PhotoMetadata};
use crate::processor;
use crate::render::Renderer;
use crate::walker;
use std::path::{Component, Path, PathBuf};
use url::Url;

/// Supplies the attachment metadata of a post, already decoded and in
/// display order.
pub trait AttachmentSource: Send + Sync {
    fn attachments(&self, post_id: u64) -> Result<Vec<PhotoMetadata>, AppError>;
}

/// Attachments kept on disk, one directory per post.
///
/// A post directory holding the legacy blob is rendered from that blob alone;
/// otherwise every image file in it is an upload whose EXIF is read directly.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    media_directory: PathBuf,
    media_base_url: Url,
    legacy_blob_name: String,
}

impl DirectoryStore {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        Self::with_paths(
            &config.media_directory,
            &config.media_base_url,
            &config.legacy_blob_name,
        )
    }

    pub fn with_paths(
        media_directory: impl Into<PathBuf>,
        media_base_url: &str,
        legacy_blob_name: &str,
    ) -> Result<Self, AppError> {
        let media_base_url = Url::parse(media_base_url)?;
        let media_directory = media_directory.into();
        log::debug!(
            "Attachment store at {:?}, served from {}",
            media_directory,
            media_base_url
        );

        Ok(Self {
            media_directory,
            media_base_url,
            legacy_blob_name: legacy_blob_name.to_string(),
        })
    }

    pub fn media_directory(&self) -> &Path {
        &self.media_directory
    }

    fn upload_url(&self, post_id: u64, file: &Path) -> Result<String, AppError> {
        let relative = file.strip_prefix(&self.media_directory).unwrap_or(file);
        let segments: Vec<String> = relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part.to_string_lossy().to_string()),
                _ => None,
            })
            .collect();
        log::trace!("Building upload URL for post {} from {:?}", post_id, segments);

        let mut url = self.media_base_url.clone();
        // The base may or may not end in a slash; drop the empty tail segment.
        url.path_segments_mut()
            .map_err(|_| AppError::Generic(format!("{} cannot be a base URL", self.media_base_url)))?
            .pop_if_empty()
            .extend(&segments);
        Ok(url.to_string())
    }
}

impl AttachmentSource for DirectoryStore {
    fn attachments(&self, post_id: u64) -> Result<Vec<PhotoMetadata>, AppError> {
        let post_dir = self.media_directory.join(post_id.to_string());
        if !post_dir.is_dir() {
            log::debug!("No attachment directory for post {}", post_id);
            return Ok(Vec::new());
        }

        let blob_path = post_dir.join(&self.legacy_blob_name);
        if blob_path.is_file() {
            log::debug!("Reading legacy attachment blob {:?}", blob_path);
            let blob = std::fs::read_to_string(&blob_path)?;
            return decode_legacy_blob(&blob);
        }

        let uploads = walker::start_walking(&post_dir)
            .into_iter()
            .map(|path| {
                let url = self.upload_url(post_id, &path)?;
                Ok((path, url))
            })
            .collect::<Result<Vec<_>, AppError>>()?;
        log::debug!("Found {} uploaded attachments for post {}", uploads.len(), post_id);

        Ok(processor::start_processing(uploads))
    }
}

/// Renders a post's attachments. Lookup failures are logged and render as an
/// empty fragment so they never break the surrounding page.
pub fn render_post(source: &dyn AttachmentSource, renderer: &Renderer, post_id: u64) -> String {
    match source.attachments(post_id) {
        Ok(records) => renderer.render(&records),
        Err(e) => {
            log::warn!("Could not load attachments for post {}: {}", post_id, e);
            String::new()
        }
    }
}
