// src/infrastructure/images.rs
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::domain::layout::{
    DeclaredDimensions, ImageDimensions, ImageResolutionError, ImageResolver,
};
use crate::domain::paper::{ImageSource, QuestionImage};

/// Sizes embedded images from their own headers. URL images are not
/// fetched; their declared dimensions are used.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultImageResolver;

impl ImageResolver for DefaultImageResolver {
    fn resolve(&self, image: &QuestionImage) -> Result<ImageDimensions, ImageResolutionError> {
        match &image.source {
            ImageSource::Url(_) => DeclaredDimensions.resolve(image),
            ImageSource::Embedded(data) => {
                let bytes = decode_embedded(data)?;
                let dims = sniff_dimensions(&bytes)?;
                if dims.width == 0 || dims.height == 0 {
                    return Err(ImageResolutionError::Empty);
                }
                Ok(dims)
            }
        }
    }
}

/// Accepts bare base64 or a `data:<mime>;base64,<payload>` URI.
fn decode_embedded(data: &str) -> Result<Vec<u8>, ImageResolutionError> {
    let payload = match data.trim().strip_prefix("data:") {
        Some(uri) => {
            let (meta, body) = uri
                .split_once(',')
                .ok_or_else(|| ImageResolutionError::Decode("data URI has no payload".into()))?;
            if !meta.ends_with(";base64") {
                return Err(ImageResolutionError::Decode(
                    "only base64 data URIs are supported".into(),
                ));
            }
            body
        }
        None => data,
    };
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| ImageResolutionError::Decode(e.to_string()))?;
    if bytes.is_empty() {
        return Err(ImageResolutionError::Empty);
    }
    Ok(bytes)
}

/// Reads the intrinsic size from the image header. Anything `imagesize`
/// recognises is accepted.
pub fn sniff_dimensions(bytes: &[u8]) -> Result<ImageDimensions, ImageResolutionError> {
    let size = imagesize::blob_size(bytes).map_err(|e| match e {
        imagesize::ImageError::NotSupported => ImageResolutionError::UnsupportedFormat,
        other => ImageResolutionError::Decode(other.to_string()),
    })?;
    let clamp = |v: usize| u32::try_from(v).unwrap_or(u32::MAX);
    Ok(ImageDimensions {
        width: clamp(size.width),
        height: clamp(size.height),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
        bytes.extend_from_slice(&13u32.to_be_bytes());
        bytes.extend_from_slice(b"IHDR");
        bytes.extend_from_slice(&width.to_be_bytes());
        bytes.extend_from_slice(&height.to_be_bytes());
        bytes.extend_from_slice(&[8, 6, 0, 0, 0]);
        bytes
    }

    #[test]
    fn embedded_png_is_sized_from_its_header() {
        let encoded = STANDARD.encode(png(640, 480));
        let image = QuestionImage::embedded(format!("data:image/png;base64,{encoded}"));
        let dims = DefaultImageResolver.resolve(&image).unwrap();
        assert_eq!(
            dims,
            ImageDimensions {
                width: 640,
                height: 480
            }
        );
    }

    #[test]
    fn gif_and_jpeg_headers_are_read() {
        // Logical screen descriptor: 32x16, no colour table.
        let gif = [b"GIF89a".as_slice(), &[0x20, 0x00, 0x10, 0x00, 0x00, 0x00, 0x00]].concat();
        assert_eq!(
            sniff_dimensions(&gif),
            Ok(ImageDimensions {
                width: 32,
                height: 16
            })
        );

        let jpeg = [
            0xFF, 0xD8, // SOI
            0xFF, 0xE0, 0x00, 0x04, 0x00, 0x00, // APP0
            0xFF, 0xC0, 0x00, 0x0B, 0x08, 0x00, 0x64, 0x00, 0xC8, 0x03,
        ];
        assert_eq!(
            sniff_dimensions(&jpeg),
            Ok(ImageDimensions {
                width: 200,
                height: 100
            })
        );
    }

    #[test]
    fn garbage_is_reported_not_panicked() {
        let bad = QuestionImage::embedded("!!not base64!!");
        assert!(matches!(
            DefaultImageResolver.resolve(&bad),
            Err(ImageResolutionError::Decode(_))
        ));

        let text = QuestionImage::embedded(STANDARD.encode(b"plain text, not a picture"));
        assert_eq!(
            DefaultImageResolver.resolve(&text),
            Err(ImageResolutionError::UnsupportedFormat)
        );

        let truncated_jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0x00];
        assert!(sniff_dimensions(&truncated_jpeg).is_err());
    }

    #[test]
    fn url_images_use_declared_size() {
        let declared = QuestionImage::url("https://example.org/circuit.png", 300, 150);
        assert_eq!(DefaultImageResolver.resolve(&declared).unwrap().height, 150);

        let unknown = QuestionImage::url("https://example.org/missing.png", 0, 0);
        assert!(matches!(
            DefaultImageResolver.resolve(&unknown),
            Err(ImageResolutionError::Unresolvable(_))
        ));
    }
}
