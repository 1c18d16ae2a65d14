// src/metadata.rs

use crate::error::AppError;
use crate::exposure::ExposureTime;
use exif::{Exif, In, Tag, Value};
use serde::Deserialize;
use serde_json::Value as JsonValue;

/// Where an attachment's metadata came from. Controls the crop query on the
/// thumbnail and whether a caption is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Row of a bulk-imported `_bbp_files` blob.
    Legacy,
    /// File uploaded through the forum's media library.
    Upload,
}

/// Display-ready metadata for one attached image.
///
/// Text fields hold the value exactly as it will be shown; absent attributes
/// are `None` and are skipped by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoMetadata {
    pub provenance: Provenance,
    /// Link target and thumbnail source. Empty for a broken import row, which
    /// still renders with an empty link.
    pub image_url: String,
    pub title: Option<String>,
    pub aperture: Option<String>,
    pub camera: Option<String>,
    pub exposure_compensation: Option<String>,
    pub exposure_time: Option<ExposureTime>,
    pub focal_length: Option<String>,
    pub iso: Option<String>,
    pub white_balance: Option<String>,
}

impl PhotoMetadata {
    pub fn new(provenance: Provenance, image_url: impl Into<String>) -> Self {
        Self {
            provenance,
            image_url: image_url.into(),
            title: None,
            aperture: None,
            camera: None,
            exposure_compensation: None,
            exposure_time: None,
            focal_length: None,
            iso: None,
            white_balance: None,
        }
    }

    /// Builds upload metadata from EXIF read out of the attachment file.
    ///
    /// Mirrors what a media library keeps on upload: the model name as the
    /// camera, the f-number rounded to two decimals, and the raw exposure,
    /// focal length and ISO values.
    pub fn from_exif(exif: &Exif, image_url: impl Into<String>) -> Self {
        let mut metadata = Self::new(Provenance::Upload, image_url);

        metadata.camera = ascii_field(exif, Tag::Model);
        metadata.aperture = rational_field(exif, Tag::FNumber)
            .map(|f| (f * 100.0).round() / 100.0)
            .filter(|f| *f != 0.0)
            .map(|f| f.to_string());
        metadata.exposure_time =
            rational_field(exif, Tag::ExposureTime).and_then(ExposureTime::from_seconds);
        metadata.focal_length = rational_field(exif, Tag::FocalLength)
            .filter(|f| *f != 0.0)
            .map(|f| f.to_string());
        metadata.iso = exif
            .get_field(Tag::PhotographicSensitivity, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .filter(|iso| *iso != 0)
            .map(|iso| iso.to_string());

        log::trace!("Normalized upload metadata: {:?}", metadata);
        metadata
    }
}

impl From<LegacyRecord> for PhotoMetadata {
    fn from(record: LegacyRecord) -> Self {
        let image_url = record.path.as_ref().and_then(scalar_text).unwrap_or_default();
        if image_url.is_empty() {
            log::warn!("Legacy attachment row has no image path; rendering an empty link");
        }

        Self {
            provenance: Provenance::Legacy,
            image_url,
            title: record.title.as_ref().and_then(scalar_text),
            aperture: record.fnumber.as_ref().and_then(present_text),
            camera: record.camera.as_ref().and_then(present_text),
            exposure_compensation: record.exp_comp.as_ref().and_then(present_text),
            exposure_time: record.exp_time.as_ref().and_then(present_exposure),
            focal_length: record.focal_length.as_ref().and_then(present_text),
            iso: record.iso.as_ref().and_then(present_text),
            white_balance: record.white_balance.as_ref().and_then(present_text),
        }
    }
}

/// One row of the legacy import blob. The importer wrote numbers and strings
/// interchangeably, so every attribute is kept as raw JSON until normalized.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct LegacyRecord {
    pub path: Option<JsonValue>,
    pub title: Option<JsonValue>,
    pub fnumber: Option<JsonValue>,
    pub camera: Option<JsonValue>,
    pub exp_comp: Option<JsonValue>,
    pub exp_time: Option<JsonValue>,
    pub focal_length: Option<JsonValue>,
    pub iso: Option<JsonValue>,
    pub white_balance: Option<JsonValue>,
}

/// Decodes a legacy `_bbp_files` blob into metadata records, in blob order.
///
/// A `null` blob means the post has no attachments. Rows that are not JSON
/// objects are skipped; a blob that is not an array at all is rejected.
pub fn decode_legacy_blob(blob: &str) -> Result<Vec<PhotoMetadata>, AppError> {
    let rows = match serde_json::from_str::<JsonValue>(blob)? {
        JsonValue::Null => return Ok(Vec::new()),
        JsonValue::Array(rows) => rows,
        other => {
            return Err(AppError::MalformedBlob(format!(
                "expected an array of attachments, found {}",
                json_kind(&other)
            )))
        }
    };

    let mut records = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        match serde_json::from_value::<LegacyRecord>(row) {
            Ok(record) => records.push(PhotoMetadata::from(record)),
            Err(e) => log::warn!("Skipping legacy attachment row {}: {}", index, e),
        }
    }
    log::debug!("Decoded {} legacy attachment records", records.len());
    Ok(records)
}

/// Any scalar as shown text. Only `null` (and nested values) are missing;
/// used for the path and title, which are always printed.
fn scalar_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => None,
        JsonValue::Bool(flag) => Some(if *flag { "1" } else { "" }.to_string()),
        JsonValue::Number(number) => match number.as_f64() {
            Some(n) if number.is_f64() => Some(n.to_string()),
            _ => Some(number.to_string()),
        },
        JsonValue::String(text) => Some(text.clone()),
    }
}

/// Applies the forum's truthiness rule: `null`, `false`, `0`, `""` and `"0"`
/// count as missing. Nested arrays and objects are never shown.
fn present_text(value: &JsonValue) -> Option<String> {
    scalar_text(value).filter(|text| !matches!(text.as_str(), "" | "0" | "-0"))
}

fn present_exposure(value: &JsonValue) -> Option<ExposureTime> {
    let exposure = match value {
        JsonValue::Number(number) => number.as_f64().and_then(ExposureTime::from_seconds),
        JsonValue::String(text) => ExposureTime::parse(text),
        _ => None,
    };
    if exposure.is_none() && present_text(value).is_some() {
        log::debug!("Ignoring unusable exposure time {}", value);
    }
    exposure
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

fn ascii_field(exif: &Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match field.value {
        Value::Ascii(ref vec) => {
            let bytes = vec.first()?;
            let text = String::from_utf8_lossy(bytes);
            let text = text.trim_matches(|c: char| c == '\0' || c.is_whitespace());
            (!text.is_empty()).then(|| text.to_string())
        }
        _ => None,
    }
}

fn rational_field(exif: &Exif, tag: Tag) -> Option<f64> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    let value = match field.value {
        Value::Rational(ref vec) => vec.first()?.to_f64(),
        Value::SRational(ref vec) => vec.first()?.to_f64(),
        _ => return None,
    };
    value.is_finite().then_some(value)
}
