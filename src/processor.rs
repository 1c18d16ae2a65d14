use crate::error::AppError;
use crate::metadata::{PhotoMetadata, Provenance};
use exif::Reader;
use rayon::prelude::*;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Reads EXIF from each uploaded file in parallel. Output order follows
/// `uploads`; files that cannot be opened are skipped.
pub fn start_processing(uploads: Vec<(PathBuf, String)>) -> Vec<PhotoMetadata> {
    log::debug!("Processing {} uploaded attachments", uploads.len());

    let records: Vec<PhotoMetadata> = uploads
        .into_par_iter()
        .filter_map(|(path, image_url)| match process_image(&path, image_url) {
            Ok(metadata) => {
                log::trace!("Extracted metadata for {:?}: {:?}", path, metadata);
                Some(metadata)
            }
            Err(e) => {
                log::warn!("Failed to process attachment {:?}: {}", path, e);
                None
            }
        })
        .collect();

    log::debug!("Processed {} attachments", records.len());
    records
}

fn process_image(path: &Path, image_url: String) -> Result<PhotoMetadata, AppError> {
    log::trace!("Extracting EXIF data for image: {:?}", path);
    let file = File::open(path)?;
    let mut buf_reader = BufReader::new(file);

    match Reader::new().read_from_container(&mut buf_reader) {
        Ok(exif) => Ok(PhotoMetadata::from_exif(&exif, image_url)),
        Err(e) => {
            // Still shown, just without an exif line.
            log::debug!("No EXIF data for {:?}: {}", path, e);
            Ok(PhotoMetadata::new(Provenance::Upload, image_url))
        }
    }
}
