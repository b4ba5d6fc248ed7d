//! Image decoding, cropping and re-encoding
//!
//! The engine only needs pixel dimensions, a cropped copy of a photo and a
//! JPEG stream for export. [`RasterBackend`] describes that contract so
//! callers can drive the engine with their own image pipeline; [`ImageRaster`]
//! implements it with the `image` crate.

use crate::constants::CROP_JPEG_QUALITY;
use crate::geometry::{OriginalSpace, Rect, Size};
use crate::types::*;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use std::future::Future;
use std::io::Cursor;

/// Integer pixel rectangle inside a source image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRegion {
    /// Truncate a rounded original-space rectangle to pixel units
    pub fn from_rect(rect: &Rect<OriginalSpace>) -> Self {
        Self {
            x: rect.x.max(0.0) as u32,
            y: rect.y.max(0.0) as u32,
            width: rect.width.max(0.0) as u32,
            height: rect.height.max(0.0) as u32,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Result of a raster crop
#[derive(Debug, Clone, PartialEq)]
pub struct CroppedImage {
    /// Source reference for the new image (a `data:` URL for [`ImageRaster`])
    pub src: String,
    pub size: Size<OriginalSpace>,
}

/// Baseline RGB JPEG stream, ready for embedding
#[derive(Debug, Clone, PartialEq)]
pub struct JpegImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// External image collaborator used by the crop engine and PDF export
pub trait RasterBackend: Send + Sync {
    /// Pixel dimensions of the image behind `src`
    fn decode(&self, src: &str) -> impl Future<Output = Result<Size<OriginalSpace>>> + Send;

    /// Copy `region` out of the image behind `src` into a new image.
    /// Callers never pass an empty region.
    fn crop(&self, src: &str, region: PixelRegion)
    -> impl Future<Output = Result<CroppedImage>> + Send;

    /// Re-encode the image behind `src` as JPEG
    fn to_jpeg(&self, src: &str, quality: u8) -> impl Future<Output = Result<JpegImage>> + Send;
}

/// [`RasterBackend`] built on the `image` crate.
///
/// Sources are either `data:` URLs with a base64 payload or filesystem paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageRaster;

impl ImageRaster {
    pub fn new() -> Self {
        Self
    }

    async fn load(&self, src: &str) -> Result<DynamicImage> {
        if src.is_empty() {
            return Err(LayoutError::Decode("empty image source".to_string()));
        }
        let bytes = read_source(src).await?;
        let img = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
            .await?
            .map_err(|e| LayoutError::Decode(e.to_string()))?;
        Ok(img)
    }
}

impl RasterBackend for ImageRaster {
    async fn decode(&self, src: &str) -> Result<Size<OriginalSpace>> {
        let img = self.load(src).await?;
        Ok(Size::new(img.width() as f64, img.height() as f64))
    }

    async fn crop(&self, src: &str, region: PixelRegion) -> Result<CroppedImage> {
        let img = self.load(src).await?;
        let (data, width, height) = tokio::task::spawn_blocking(move || {
            let cropped = img.crop_imm(region.x, region.y, region.width, region.height);
            let (w, h) = (cropped.width(), cropped.height());
            let data = encode_jpeg(&cropped, CROP_JPEG_QUALITY)?;
            Ok::<_, LayoutError>((data, w, h))
        })
        .await??;

        log::debug!(
            "Cropped {}x{}+{}+{} into {} bytes",
            width,
            height,
            region.x,
            region.y,
            data.len()
        );
        Ok(CroppedImage {
            src: format!("data:image/jpeg;base64,{}", BASE64.encode(&data)),
            size: Size::new(width as f64, height as f64),
        })
    }

    async fn to_jpeg(&self, src: &str, quality: u8) -> Result<JpegImage> {
        let img = self.load(src).await?;
        let image = tokio::task::spawn_blocking(move || {
            let data = encode_jpeg(&img, quality)?;
            Ok::<_, LayoutError>(JpegImage {
                data,
                width: img.width(),
                height: img.height(),
            })
        })
        .await??;
        Ok(image)
    }
}

/// Resolve a photo source into raw file bytes
async fn read_source(src: &str) -> Result<Vec<u8>> {
    if let Some(rest) = src.strip_prefix("data:") {
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| LayoutError::Decode("malformed data URL".to_string()))?;
        if !header.ends_with(";base64") {
            return Err(LayoutError::Decode(
                "only base64 data URLs are supported".to_string(),
            ));
        }
        return BASE64
            .decode(payload.trim())
            .map_err(|e| LayoutError::Decode(format!("invalid base64 payload: {}", e)));
    }

    tokio::fs::read(src)
        .await
        .map_err(|e| LayoutError::Decode(format!("{}: {}", src, e)))
}

fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    rgb.write_with_encoder(JpegEncoder::new_with_quality(
        &mut Cursor::new(&mut bytes),
        quality,
    ))?;
    Ok(bytes)
}

/// Wrap raw image bytes into a `data:` URL source
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, BASE64.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_region_from_rect() {
        let region = PixelRegion::from_rect(&Rect::new(10.0, 20.0, 30.0, 0.0));
        assert_eq!(
            region,
            PixelRegion {
                x: 10,
                y: 20,
                width: 30,
                height: 0
            }
        );
        assert!(region.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_data_url() {
        let err = read_source("data:image/png,abc").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);

        let err = read_source("data:nocomma").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }
}
