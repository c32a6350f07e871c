//! Image providers.

use super::{Extraction, FeatureProvider, ImageArtifact, ImageEncoding, OutputKind};
use crate::error::{Result, RevealerError};
use ::image::GrayImage;

/// Integer square root (floor).
pub fn isqrt(n: usize) -> usize {
    if n < 2 {
        return n;
    }
    let mut x = (n as f64).sqrt() as usize;
    while x * x > n {
        x -= 1;
    }
    while (x + 1) * (x + 1) <= n {
        x += 1;
    }
    x
}

/// Renders a sample as a square 8-bit grayscale image, one byte per pixel in
/// row-major order. The side is `isqrt(len)`; trailing bytes that do not fill
/// a full row are dropped.
#[derive(Debug)]
pub struct Grayscale {
    encoding: ImageEncoding,
}

impl Grayscale {
    pub fn new(encoding: ImageEncoding) -> Self {
        Self { encoding }
    }
}

impl FeatureProvider for Grayscale {
    fn name(&self) -> &str {
        "grayscale"
    }

    fn kind(&self) -> OutputKind {
        OutputKind::Image
    }

    fn can_extract(&self, data: &[u8]) -> bool {
        !data.is_empty()
    }

    fn extract(&self, data: &[u8]) -> Result<Extraction> {
        let side = isqrt(data.len());
        let side_px = u32::try_from(side)
            .map_err(|_| RevealerError::extraction(self.name(), "sample too large to render"))?;
        let pixels = data[..side * side].to_vec();
        let image = GrayImage::from_raw(side_px, side_px, pixels).ok_or_else(|| {
            RevealerError::extraction(self.name(), "pixel buffer does not match dimensions")
        })?;
        Ok(Extraction::Image(ImageArtifact::new(image, self.encoding)))
    }
}
