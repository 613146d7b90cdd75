//! PDF assembly: decode an ordered set of images into one multi-page PDF.
//!
//! ## Why DCT (JPEG) image streams?
//!
//! PDF image XObjects carry their own encoding. Storing raw RGB would bloat
//! a 300-page scan folder into a multi-gigabyte document; the DCT filter
//! keeps documents close to the size of the source images. JPEG sources
//! that already decode to 8-bit RGB are embedded verbatim — no second
//! lossy pass — while PNG/BMP (and exotic JPEGs: grayscale, CMYK) are
//! normalised to RGB and encoded once at the configured quality.
//!
//! ## Why decode everything before creating the document?
//!
//! A decode failure abandons the whole directory — there is no
//! partial-document fallback. Decoding up front means the document is only
//! ever created once every page is known to be good, and the atomic
//! temp-file + rename write means a failed run never leaves a truncated
//! PDF at the final path.

use crate::config::RunConfig;
use crate::error::DirectoryError;
use image::{DynamicImage, GenericImageView, ImageFormat};
use printpdf::{
    ColorBits, ColorSpace, Image, ImageFilter, ImageTransform, ImageXObject, Mm, PdfDocument, Px,
};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const MM_PER_INCH: f32 = 25.4;

/// One decoded, normalised page ready for embedding.
struct PageImage {
    source: PathBuf,
    width_px: u32,
    height_px: u32,
    /// JPEG-compressed RGB pixel data for the DCT image stream.
    jpeg_data: Vec<u8>,
}

/// Assemble `images` (in order) into a single multi-page PDF at
/// `output_path`, overwriting any existing file there.
///
/// Page order equals input order; callers pass the filename-sorted list
/// from [`crate::pipeline::filter::list_images`]. Each page is sized to its
/// source bitmap at `config.dpi`.
///
/// Returns the page count on success. Any failure — decode, encode, or
/// write — abandons the document for this directory; no file is left at
/// `output_path` that was not there before.
///
/// # Panics
///
/// Panics if `images` is empty. Callers must skip directories with zero
/// matches; an empty document is never a valid output.
pub fn assemble(
    images: &[PathBuf],
    output_path: &Path,
    config: &RunConfig,
) -> Result<usize, DirectoryError> {
    assert!(!images.is_empty(), "assemble() requires at least one image");

    let pages = decode_pages(images, config, output_path)?;
    let document = build_document(&pages, output_path, config.dpi);
    write_document(document, output_path)?;

    info!(
        "Wrote {} with {} page(s)",
        output_path.display(),
        pages.len()
    );
    Ok(pages.len())
}

/// Decode and normalise every image, failing the whole set on the first
/// unreadable or corrupt file.
fn decode_pages(
    images: &[PathBuf],
    config: &RunConfig,
    output_path: &Path,
) -> Result<Vec<PageImage>, DirectoryError> {
    let mut pages = Vec::with_capacity(images.len());

    for path in images {
        let reader = image::ImageReader::open(path)
            .map_err(|e| DirectoryError::ImageDecode {
                path: path.clone(),
                detail: e.to_string(),
            })?
            .with_guessed_format()
            .map_err(|e| DirectoryError::ImageDecode {
                path: path.clone(),
                detail: e.to_string(),
            })?;
        let format = reader.format();
        let decoded = reader.decode().map_err(|e| DirectoryError::ImageDecode {
            path: path.clone(),
            detail: e.to_string(),
        })?;

        let (width_px, height_px) = decoded.dimensions();

        // Fast path: an RGB JPEG is already a valid DCT stream — embed the
        // file bytes as-is instead of decoding and re-encoding.
        let jpeg_data = if format == Some(ImageFormat::Jpeg)
            && matches!(decoded, DynamicImage::ImageRgb8(_))
        {
            debug!("{}: embedding JPEG verbatim", path.display());
            fs::read(path).map_err(|e| DirectoryError::ImageDecode {
                path: path.clone(),
                detail: e.to_string(),
            })?
        } else {
            encode_rgb_jpeg(&decoded, config.jpeg_quality).map_err(|e| {
                DirectoryError::DocumentWrite {
                    path: output_path.to_path_buf(),
                    detail: format!("re-encoding '{}': {}", path.display(), e),
                }
            })?
        };

        debug!(
            "{}: decoded {}x{} px",
            path.display(),
            width_px,
            height_px
        );

        pages.push(PageImage {
            source: path.clone(),
            width_px,
            height_px,
            jpeg_data,
        });
    }

    Ok(pages)
}

/// Normalise to 3-channel RGB (drops alpha, expands palettes) and
/// JPEG-encode for the DCT image stream.
fn encode_rgb_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, image::ImageError> {
    let rgb = img.to_rgb8();
    let mut buf = Vec::new();
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality);
    encoder.encode_image(&rgb)?;
    Ok(buf)
}

/// Build the in-memory document: one page per image, each page sized to
/// its bitmap at `dpi` (72 DPI means one pixel per PDF point).
fn build_document(pages: &[PageImage], output_path: &Path, dpi: f32) -> printpdf::PdfDocumentReference {
    let title = output_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());

    let (first_w, first_h) = page_size_mm(&pages[0], dpi);
    let (doc, page1, layer1) = PdfDocument::new(&title, first_w, first_h, "Layer 1");
    let mut layer = doc.get_page(page1).get_layer(layer1);

    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            let (w, h) = page_size_mm(page, dpi);
            let (page_idx, layer_idx) = doc.add_page(w, h, "Layer 1");
            layer = doc.get_page(page_idx).get_layer(layer_idx);
        }

        debug!("Page {}: {}", i + 1, page.source.display());

        let xobject = Image::from(ImageXObject {
            width: Px(page.width_px as usize),
            height: Px(page.height_px as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: true,
            image_data: page.jpeg_data.clone(),
            image_filter: Some(ImageFilter::DCT),
            clipping_bbox: None,
            smask: None,
        });

        xobject.add_to_layer(
            layer.clone(),
            ImageTransform {
                dpi: Some(dpi),
                ..Default::default()
            },
        );
    }

    doc
}

/// Physical page size for a bitmap at the given pixel density.
fn page_size_mm(page: &PageImage, dpi: f32) -> (Mm, Mm) {
    (
        Mm(page.width_px as f32 / dpi * MM_PER_INCH),
        Mm(page.height_px as f32 / dpi * MM_PER_INCH),
    )
}

/// Serialise to a sibling temp file, then rename over the final path.
/// Overwrites an existing document without warning; never leaves a
/// truncated file at `output_path`.
fn write_document(
    doc: printpdf::PdfDocumentReference,
    output_path: &Path,
) -> Result<(), DirectoryError> {
    let write_err = |detail: String| DirectoryError::DocumentWrite {
        path: output_path.to_path_buf(),
        detail,
    };

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
    }

    let tmp_path = output_path.with_extension("pdf.tmp");
    let file = fs::File::create(&tmp_path).map_err(|e| write_err(e.to_string()))?;
    let mut writer = BufWriter::new(file);

    let saved = doc
        .save(&mut writer)
        .map_err(|e| format!("{:?}", e))
        .and_then(|()| writer.flush().map_err(|e| e.to_string()));
    if let Err(detail) = saved {
        let _ = fs::remove_file(&tmp_path);
        return Err(write_err(detail));
    }

    fs::rename(&tmp_path, output_path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        write_err(e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use tempfile::TempDir;

    fn write_png(dir: &Path, name: &str, w: u32, h: u32) -> PathBuf {
        let path = dir.join(name);
        RgbImage::from_pixel(w, h, Rgb([200, 30, 30]))
            .save(&path)
            .unwrap();
        path
    }

    fn write_jpg(dir: &Path, name: &str, w: u32, h: u32) -> PathBuf {
        let path = dir.join(name);
        RgbImage::from_pixel(w, h, Rgb([30, 200, 30]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn assembles_multiple_formats_into_one_document() {
        let tmp = TempDir::new().unwrap();
        let images = vec![
            write_png(tmp.path(), "1.png", 10, 14),
            write_jpg(tmp.path(), "2.jpg", 20, 8),
        ];
        let out = tmp.path().join("out.pdf");

        let pages = assemble(&images, &out, &RunConfig::default()).unwrap();
        assert_eq!(pages, 2);

        let bytes = fs::read(&out).unwrap();
        assert!(bytes.starts_with(b"%PDF"), "output is a PDF");
        assert!(!tmp.path().join("out.pdf.tmp").exists(), "temp file renamed away");
    }

    #[test]
    fn alpha_images_are_normalised_to_rgb() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("alpha.png");
        RgbaImage::from_pixel(6, 6, Rgba([10, 20, 30, 128]))
            .save(&path)
            .unwrap();
        let out = tmp.path().join("alpha.pdf");

        let pages = assemble(&[path], &out, &RunConfig::default()).unwrap();
        assert_eq!(pages, 1);
        assert!(out.exists());
    }

    #[test]
    fn corrupt_image_abandons_the_document() {
        let tmp = TempDir::new().unwrap();
        let good = write_png(tmp.path(), "a.png", 4, 4);
        let bad = tmp.path().join("b.png");
        fs::write(&bad, b"\x89PNG\r\n\x1a\ntruncated").unwrap();
        let out = tmp.path().join("out.pdf");

        let err = assemble(&[good, bad.clone()], &out, &RunConfig::default()).unwrap_err();
        match err {
            DirectoryError::ImageDecode { path, .. } => assert_eq!(path, bad),
            other => panic!("expected ImageDecode, got {other:?}"),
        }
        assert!(!out.exists(), "no partial document is written");
    }

    #[test]
    fn existing_output_is_overwritten() {
        let tmp = TempDir::new().unwrap();
        let img = write_png(tmp.path(), "p.png", 5, 5);
        let out = tmp.path().join("doc.pdf");
        fs::write(&out, b"stale bytes").unwrap();

        assemble(&[img], &out, &RunConfig::default()).unwrap();
        let bytes = fs::read(&out).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    #[should_panic(expected = "at least one image")]
    fn empty_input_is_a_contract_violation() {
        let tmp = TempDir::new().unwrap();
        let _ = assemble(&[], &tmp.path().join("x.pdf"), &RunConfig::default());
    }
}
