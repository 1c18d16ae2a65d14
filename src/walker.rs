use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Collects every image file under `post_dir`, in file-name order so
/// attachments render in a stable sequence.
pub fn start_walking(post_dir: &Path) -> Vec<PathBuf> {
    log::debug!("Starting attachment discovery in {:?}", post_dir);

    let mut images = Vec::new();

    for entry in WalkDir::new(post_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_file() {
            let path = entry.path();
            log::trace!("Discovered file: {:?}", path);
            if is_image(path) {
                log::trace!("Found image file: {:?}", path);
                images.push(path.to_path_buf());
            } else {
                log::trace!("Skipping non-image file: {:?}", path);
            }
        } else {
            log::trace!("Skipping non-file entry: {:?}", entry.path());
        }
    }

    log::debug!("Found {} images in {:?}", images.len(), post_dir);
    images
}

fn is_image(path: &Path) -> bool {
    mime_guess::from_path(path)
        .first()
        .map(|mime| mime.type_() == mime::IMAGE)
        .unwrap_or(false)
}
