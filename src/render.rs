//! HTML fragment rendering for attached photos.
//!
//! Produces the markup the forum theme styles: one `mdForumAttachment` block
//! per image, followed by an `exif` span when the image has any capture
//! details worth showing.

use crate::metadata::{PhotoMetadata, Provenance};
use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;
use std::fmt::Display;

/// Edge length of the square thumbnail, in pixels.
pub const THUMBNAIL_SIZE: u32 = 124;

const SEPARATOR: &str = " | ";

lazy_static! {
    static ref ESCAPED_CODEPOINT: Regex = Regex::new(r"u([\da-fA-F]{4})").unwrap();
}

/// Rewrites escaped codepoints left behind by the legacy import (`smu00e5`)
/// into HTML character references (`sm&#xe5;`).
pub fn fix_characters(text: &str) -> Cow<'_, str> {
    ESCAPED_CODEPOINT.replace_all(text, "&#x${1};")
}

/// Stateless renderer for attachment metadata. Build one and share it; it
/// holds nothing and never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Renders every record in order. An empty slice renders nothing.
    pub fn render(&self, records: &[PhotoMetadata]) -> String {
        if records.is_empty() {
            return String::new();
        }
        log::debug!("Rendering {} attachment blocks", records.len());

        records.iter().map(|record| self.render_one(record)).collect()
    }

    /// Renders the image block for a single record, plus its exif span if any
    /// attribute is present.
    pub fn render_one(&self, record: &PhotoMetadata) -> String {
        let mut output = image_block(record);

        let exif = self.attribute_line(record);
        if !exif.is_empty() {
            output.push_str(&format!(
                "<span class=\"mdLabel\">exif</span><span class=\"exif\">{}</span>",
                exif
            ));
        }
        output
    }

    /// The ` | `-separated attribute line, in fixed order: aperture, camera,
    /// exposure compensation, exposure time, focal length, ISO, white balance.
    pub fn attribute_line(&self, record: &PhotoMetadata) -> String {
        let mut line = String::new();

        if let Some(aperture) = &record.aperture {
            push_attribute(&mut line, "Aperture", format!("f/{}", aperture));
        }
        if let Some(camera) = &record.camera {
            push_attribute(&mut line, "Camera", camera);
        }
        if let Some(compensation) = &record.exposure_compensation {
            push_attribute(&mut line, "Exposure compensation", compensation);
        }
        if let Some(exposure) = &record.exposure_time {
            push_attribute(&mut line, "Exposure time", exposure);
        }
        if let Some(focal_length) = &record.focal_length {
            push_attribute(&mut line, "Focal length", format!("{} mm", focal_length));
        }
        if let Some(iso) = &record.iso {
            push_attribute(&mut line, "ISO", iso);
        }
        if let Some(white_balance) = &record.white_balance {
            push_attribute(&mut line, "White balance", white_balance);
        }

        line
    }
}

fn push_attribute(line: &mut String, label: &str, value: impl Display) {
    line.push_str(&format!("{}<strong>{}:</strong>&nbsp;{}", SEPARATOR, label, value));
}

fn image_block(record: &PhotoMetadata) -> String {
    let url = &record.image_url;

    match record.provenance {
        Provenance::Legacy => {
            let title = record.title.as_deref().map(fix_characters).unwrap_or_default();
            format!(
                "\n<div class=\"mdForumAttachment\">\n<div class=\"mdImg\">\n\
                 <a rel=\"lightbox\" href=\"{url}\"><img src=\"{url}?w={size}&h={size}&fit=crop\" alt=\"\" title=\"\" width=\"{size}\" height=\"{size}\" /></a></div>\n\
                 <div class=\"mdTxt\">\n<p>{title}</p>\n</div>\n</div>",
                url = url,
                size = THUMBNAIL_SIZE,
                title = title,
            )
        }
        Provenance::Upload => format!(
            "\n<div class=\"mdForumAttachment\">\n<div class=\"mdImg\">\n\
             <a rel=\"lightbox\" href=\"{url}\"><img src=\"{url}\" alt=\"\" title=\"\" width=\"{size}\" height=\"{size}\" /></a></div>\n</div>",
            url = url,
            size = THUMBNAIL_SIZE,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exposure::ExposureTime;

    fn legacy(url: &str) -> PhotoMetadata {
        PhotoMetadata::new(Provenance::Legacy, url)
    }

    #[test]
    fn test_render_empty_is_empty() {
        assert_eq!(Renderer::new().render(&[]), "");
    }

    #[test]
    fn test_fix_characters() {
        assert_eq!(fix_characters("smu00e5"), "sm&#xe5;");
        assert_eq!(fix_characters("Bu00E6r"), "B&#xE6;r");
        assert_eq!(fix_characters("plain title"), "plain title");
        assert_eq!(fix_characters("u12"), "u12");
    }

    #[test]
    fn test_legacy_block_has_crop_query_and_caption() {
        let mut record = legacy("/img/a.jpg");
        record.title = Some("smu00e5 fugle".to_string());

        let expected = "\n<div class=\"mdForumAttachment\">\n<div class=\"mdImg\">\n\
            <a rel=\"lightbox\" href=\"/img/a.jpg\"><img src=\"/img/a.jpg?w=124&h=124&fit=crop\" alt=\"\" title=\"\" width=\"124\" height=\"124\" /></a></div>\n\
            <div class=\"mdTxt\">\n<p>sm&#xe5; fugle</p>\n</div>\n</div>";
        assert_eq!(Renderer::new().render_one(&record), expected);
    }

    #[test]
    fn test_legacy_block_without_title_has_empty_caption() {
        let output = Renderer::new().render_one(&legacy("/a.jpg"));
        assert!(output.contains("<p></p>"));
    }

    #[test]
    fn test_upload_block_has_no_crop_or_caption() {
        let record = PhotoMetadata::new(Provenance::Upload, "http://forum/media/7/a.jpg");
        let output = Renderer::new().render_one(&record);

        assert!(output.contains("<img src=\"http://forum/media/7/a.jpg\" "));
        assert!(!output.contains("fit=crop"));
        assert!(!output.contains("mdTxt"));
        assert!(output.ends_with("</a></div>\n</div>"));
    }

    #[test]
    fn test_upload_block_with_exif_span() {
        let mut record = PhotoMetadata::new(Provenance::Upload, "/media/7/a.jpg");
        record.iso = Some("200".to_string());

        let expected = concat!(
            "\n<div class=\"mdForumAttachment\">\n<div class=\"mdImg\">\n",
            "<a rel=\"lightbox\" href=\"/media/7/a.jpg\"><img src=\"/media/7/a.jpg\" alt=\"\" title=\"\" width=\"124\" height=\"124\" /></a></div>\n</div>",
            "<span class=\"mdLabel\">exif</span><span class=\"exif\"> | <strong>ISO:</strong>&nbsp;200</span>",
        );
        assert_eq!(Renderer::new().render_one(&record), expected);
    }

    #[test]
    fn test_single_camera_attribute() {
        let mut record = legacy("/a.jpg");
        record.camera = Some("Nikon D90".to_string());

        let output = Renderer::new().render(&[record]);
        assert!(output.ends_with(
            "<span class=\"mdLabel\">exif</span><span class=\"exif\"> | <strong>Camera:</strong>&nbsp;Nikon D90</span>"
        ));
        assert_eq!(output.matches(SEPARATOR).count(), 1);
    }

    #[test]
    fn test_attribute_order_and_formatting() {
        let mut record = legacy("/a.jpg");
        record.white_balance = Some("Auto".to_string());
        record.iso = Some("100".to_string());
        record.focal_length = Some("50".to_string());
        record.exposure_time = ExposureTime::from_seconds(0.0666667);
        record.exposure_compensation = Some("+1".to_string());
        record.camera = Some("Canon EOS 5D".to_string());
        record.aperture = Some("2.8".to_string());

        assert_eq!(
            Renderer::new().attribute_line(&record),
            concat!(
                " | <strong>Aperture:</strong>&nbsp;f/2.8",
                " | <strong>Camera:</strong>&nbsp;Canon EOS 5D",
                " | <strong>Exposure compensation:</strong>&nbsp;+1",
                " | <strong>Exposure time:</strong>&nbsp;1/15",
                " | <strong>Focal length:</strong>&nbsp;50 mm",
                " | <strong>ISO:</strong>&nbsp;100",
                " | <strong>White balance:</strong>&nbsp;Auto",
            )
        );
    }

    #[test]
    fn test_no_attributes_means_no_exif_span() {
        let output = Renderer::new().render_one(&legacy("/a.jpg"));
        assert!(!output.contains("exif"));
    }

    #[test]
    fn test_blocks_keep_input_order() {
        let records = vec![legacy("/1.jpg"), legacy("/2.jpg"), legacy("/3.jpg")];
        let output = Renderer::new().render(&records);

        assert_eq!(output.matches("mdForumAttachment").count(), 3);
        let first = output.find("/1.jpg").unwrap();
        let second = output.find("/2.jpg").unwrap();
        let third = output.find("/3.jpg").unwrap();
        assert!(first < second && second < third);
    }
}
