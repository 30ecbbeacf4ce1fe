use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use studyguide_core::cache::ContentCache;
use studyguide_core::slides::{render_slides, Slide, SlideError, SlideRenderer, SourceDocument};
use studyguide_core::types::{Digest, DIGEST_LENGTH};

fn solid(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)))
}

fn png_bytes(image: &DynamicImage) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png).unwrap();
    buffer.into_inner()
}

#[test]
fn document_digest_is_deterministic() {
    let data = b"hello world";
    assert_eq!(Digest::of_bytes(data), Digest::of_bytes(data));
    assert_eq!(ContentCache::document_digest(data), Digest::of_bytes(data));
}

#[test]
fn document_digest_differs_for_distinct_inputs() {
    let samples: [&[u8]; 5] = [b"aaa", b"bbb", b"aab", b"", b"deck v2"];
    for (i, a) in samples.iter().enumerate() {
        for b in &samples[i + 1..] {
            assert_ne!(Digest::of_bytes(a), Digest::of_bytes(b));
        }
    }
}

#[test]
fn digest_is_sixteen_lowercase_hex_chars() {
    let digest = Digest::of_bytes(b"test data");
    assert_eq!(DIGEST_LENGTH, 16);
    assert_eq!(digest.as_str().len(), DIGEST_LENGTH);
    assert!(digest
        .as_str()
        .chars()
        .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn digest_is_sha256_prefix() {
    // sha256("abc") = ba7816bf8f01cfea414140de5dae2223...
    assert_eq!(Digest::of_bytes(b"abc").as_str(), "ba7816bf8f01cfea");
}

#[test]
fn same_pixels_same_slide_digest_regardless_of_source() {
    let red = solid(10, 10, [255, 0, 0]);

    let deck_a = SourceDocument::ingest("a.pdf", b"deck a bytes".to_vec());
    let deck_b = SourceDocument::ingest("b.pdf", b"deck b, re-encoded".to_vec());
    assert_ne!(deck_a.digest, deck_b.digest);

    let from_a = Slide::new(4, red.clone()).unwrap();
    let from_b = Slide::decode(7, &png_bytes(&red)).unwrap();

    assert_eq!(from_a.digest(), from_b.digest());
}

#[test]
fn slide_digest_hashes_pixels_not_encoding() {
    let red = solid(10, 10, [255, 0, 0]);
    let slide = Slide::new(1, red.clone()).unwrap();

    assert_eq!(slide.digest(), &ContentCache::slide_digest(red.as_bytes()));
    assert_ne!(slide.digest(), &Digest::of_bytes(&png_bytes(&red)));
}

#[test]
fn different_fill_color_different_slide_digest() {
    let red = Slide::new(1, solid(10, 10, [255, 0, 0])).unwrap();
    let blue = Slide::new(1, solid(10, 10, [0, 0, 255])).unwrap();
    assert_ne!(red.digest(), blue.digest());
}

#[test]
fn slide_ordinals_are_one_based() {
    let result = Slide::new(0, solid(2, 2, [0, 0, 0]));
    assert!(matches!(result, Err(SlideError::ZeroOrdinal)));
}

#[test]
fn slide_png_roundtrips_pixels() {
    let slide = Slide::new(2, solid(3, 5, [10, 20, 30])).unwrap();
    let decoded = Slide::decode(2, &slide.encode_png().unwrap()).unwrap();
    assert_eq!(decoded.digest(), slide.digest());
    assert!(!slide.to_base64_png().unwrap().is_empty());
}

#[test]
fn garbage_bytes_do_not_decode() {
    let result = Slide::decode(1, b"definitely not an image");
    assert!(matches!(result, Err(SlideError::Image(_))));
}

struct StripRenderer;

impl SlideRenderer for StripRenderer {
    fn render(&self, source: &SourceDocument) -> Result<Vec<DynamicImage>, SlideError> {
        Ok(source.bytes.iter().map(|&b| solid(2, 2, [b, b, b])).collect())
    }
}

#[test]
fn rendered_slides_are_numbered_from_one() {
    let deck = SourceDocument::ingest("strip", vec![10, 20, 10]);
    let slides = render_slides(&StripRenderer, &deck).unwrap();

    let ordinals: Vec<u32> = slides.iter().map(Slide::ordinal).collect();
    assert_eq!(ordinals, vec![1, 2, 3]);
    assert_eq!(slides[0].digest(), slides[2].digest());
    assert_ne!(slides[0].digest(), slides[1].digest());
}
