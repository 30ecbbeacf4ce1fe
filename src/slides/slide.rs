use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageFormat};
use thiserror::Error;

use super::source::SourceDocument;
use crate::types::Digest;

#[derive(Debug, Error)]
pub enum SlideError {
    #[error("Image decode/encode error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Slide ordinals are 1-based, got 0")]
    ZeroOrdinal,
    #[error("Renderer failed: {0}")]
    Render(String),
}

/// One rendered page of a deck.
///
/// Immutable once decoded. The digest is computed from the decoded pixel
/// buffer when the slide is built, so it does not depend on how the deck
/// was encoded.
#[derive(Debug, Clone)]
pub struct Slide {
    ordinal: u32,
    image: DynamicImage,
    digest: Digest,
}

impl Slide {
    pub fn new(ordinal: u32, image: DynamicImage) -> Result<Self, SlideError> {
        if ordinal == 0 {
            return Err(SlideError::ZeroOrdinal);
        }
        let digest = Digest::of_pixels(image.as_bytes());
        Ok(Self {
            ordinal,
            image,
            digest,
        })
    }

    /// Decode a slide from an encoded raster (PNG, JPEG, ...).
    pub fn decode(ordinal: u32, encoded: &[u8]) -> Result<Self, SlideError> {
        let image = image::load_from_memory(encoded)?;
        Self::new(ordinal, image)
    }

    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn digest(&self) -> &Digest {
        &self.digest
    }

    /// PNG encoding of the slide, the raster format sent to the collaborator.
    pub fn encode_png(&self) -> Result<Vec<u8>, SlideError> {
        let mut buffer = Cursor::new(Vec::new());
        self.image.write_to(&mut buffer, ImageFormat::Png)?;
        Ok(buffer.into_inner())
    }

    pub fn to_base64_png(&self) -> Result<String, SlideError> {
        Ok(STANDARD.encode(self.encode_png()?))
    }
}

/// Turns a deck's raw bytes into page images.
///
/// Rasterizing PDFs or office formats lives outside this crate; callers
/// inject whatever renderer their environment provides.
pub trait SlideRenderer {
    fn render(&self, source: &SourceDocument) -> Result<Vec<DynamicImage>, SlideError>;
}

/// Render a deck and number its pages from 1.
pub fn render_slides<R>(renderer: &R, source: &SourceDocument) -> Result<Vec<Slide>, SlideError>
where
    R: SlideRenderer + ?Sized,
{
    renderer
        .render(source)?
        .into_iter()
        .zip(1u32..)
        .map(|(image, ordinal)| Slide::new(ordinal, image))
        .collect()
}
