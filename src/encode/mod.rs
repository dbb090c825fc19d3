//! Encode boundary.
//!
//! Turns a finished [`Surface`] into bytes. Encoding is a blocking call and reports failures in
//! its own [`EncodeError`] domain; [`RasterfitError::Encode`](crate::RasterfitError::Encode)
//! wraps it when it crosses back into the core.

use std::path::Path;

use base64::Engine as _;
use image::ImageEncoder as _;

use crate::render::surface::Surface;

/// Failure inside an encoder.
#[derive(thiserror::Error, Debug)]
pub enum EncodeError {
    /// Encoder parameters are out of range.
    #[error("invalid encoder setting: {0}")]
    InvalidSetting(String),
    /// The codec rejected the image.
    #[error("{format} encoding failed: {source}")]
    Codec {
        /// Output format.
        format: ImageFormat,
        /// Codec error.
        #[source]
        source: image::ImageError,
    },
    /// Writing the encoded bytes failed.
    #[error("write '{path}': {source}")]
    Io {
        /// Destination path.
        path: String,
        /// IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Encoded output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFormat {
    /// Lossless PNG with alpha.
    Png,
    /// Lossy JPEG without alpha.
    Jpeg,
}

impl ImageFormat {
    /// MIME type for data URLs.
    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
        })
    }
}

/// Encoded bytes plus their format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedImage {
    /// Output format.
    pub format: ImageFormat,
    /// Encoded bytes.
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    /// `data:<mime>;base64,<payload>` text form.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime_type(),
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }

    /// Write the bytes to `path`, replacing any existing file.
    pub fn write_to_path(&self, path: impl AsRef<Path>) -> Result<(), EncodeError> {
        let path = path.as_ref();
        std::fs::write(path, &self.bytes).map_err(|source| EncodeError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

/// Surface-to-bytes encoder.
pub trait Encoder {
    /// Format produced by this encoder.
    fn format(&self) -> ImageFormat;

    /// Encode `surface`. Blocks until done.
    fn encode(&self, surface: &Surface) -> Result<EncodedImage, EncodeError>;
}

/// PNG encoder (straight-alpha RGBA8).
#[derive(Clone, Copy, Debug, Default)]
pub struct PngEncoder;

impl Encoder for PngEncoder {
    fn format(&self) -> ImageFormat {
        ImageFormat::Png
    }

    fn encode(&self, surface: &Surface) -> Result<EncodedImage, EncodeError> {
        let rgba = surface.to_straight_rgba8();
        let mut bytes = Vec::new();
        image::codecs::png::PngEncoder::new(&mut bytes)
            .write_image(
                &rgba,
                surface.width(),
                surface.height(),
                image::ExtendedColorType::Rgba8,
            )
            .map_err(|source| EncodeError::Codec {
                format: ImageFormat::Png,
                source,
            })?;
        Ok(EncodedImage {
            format: ImageFormat::Png,
            bytes,
        })
    }
}

/// JPEG encoder. Transparent areas flatten onto black.
#[derive(Clone, Copy, Debug)]
pub struct JpegEncoder {
    quality: u8,
}

impl JpegEncoder {
    /// Encoder with quality in `1..=100`.
    pub fn new(quality: u8) -> Result<Self, EncodeError> {
        if !(1..=100).contains(&quality) {
            return Err(EncodeError::InvalidSetting(format!(
                "jpeg quality must be in 1..=100, got {quality}"
            )));
        }
        Ok(Self { quality })
    }

    /// Configured quality.
    pub fn quality(&self) -> u8 {
        self.quality
    }
}

impl Default for JpegEncoder {
    fn default() -> Self {
        Self { quality: 85 }
    }
}

impl Encoder for JpegEncoder {
    fn format(&self) -> ImageFormat {
        ImageFormat::Jpeg
    }

    fn encode(&self, surface: &Surface) -> Result<EncodedImage, EncodeError> {
        // Premultiplied color is already composited over black.
        let rgb = surface
            .data()
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect::<Vec<u8>>();
        let mut bytes = Vec::new();
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, self.quality)
            .write_image(
                &rgb,
                surface.width(),
                surface.height(),
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|source| EncodeError::Codec {
                format: ImageFormat::Jpeg,
                source,
            })?;
        Ok(EncodedImage {
            format: ImageFormat::Jpeg,
            bytes,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/mod.rs"]
mod tests;
