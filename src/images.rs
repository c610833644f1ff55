// Copyright (c) 2026 Ronan Le Meillat - SCTG Development
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Licensed under the MIT License or the Apache License, Version 2.0

//! Photo sources and raster preparation.
//!
//! An [`ImageRef`][] names a photo file.  Loading it decodes the file with the [`image`][] crate
//! to learn its pixel dimensions and produces a [`RasterImage`][]: encoded bytes that can be
//! embedded into the PDF document.  Images with an alpha channel are composited over a
//! background color first, since the page is always white behind a photo frame.
//!
//! [`ImageRef`]: struct.ImageRef.html
//! [`RasterImage`]: struct.RasterImage.html
//! [`image`]: https://lib.rs/crates/image

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Context as _, Error, ErrorKind};
use crate::style::Color;
use crate::Size;

/// The file extensions accepted for photos, compared case-insensitively.
pub const PHOTO_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Returns `true` if the path has one of the [`PHOTO_EXTENSIONS`][].
///
/// [`PHOTO_EXTENSIONS`]: constant.PHOTO_EXTENSIONS.html
pub fn has_photo_extension(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            PHOTO_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// A reference to a photo file.
///
/// The file is only read when the page is composed; an `ImageRef` to a missing or corrupt file
/// is a valid value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageRef {
    path: PathBuf,
}

impl ImageRef {
    /// Creates a reference to the photo at the given path.
    pub fn new(path: impl Into<PathBuf>) -> ImageRef {
        ImageRef { path: path.into() }
    }

    /// Returns the path of the photo.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and decodes the photo.
    pub fn load(&self) -> Result<RasterImage, Error> {
        let bytes = fs::read(&self.path)
            .with_context(|| format!("Could not read image from path {}", self.path.display()))?;
        RasterImage::from_bytes(bytes).map_err(|err| {
            Error::new(
                format!("Could not decode image {}: {}", self.path.display(), err),
                err.into_kind(),
            )
        })
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.path.display().fmt(f)
    }
}

impl From<PathBuf> for ImageRef {
    fn from(path: PathBuf) -> ImageRef {
        ImageRef::new(path)
    }
}

impl From<&Path> for ImageRef {
    fn from(path: &Path) -> ImageRef {
        ImageRef::new(path)
    }
}

impl From<&str> for ImageRef {
    fn from(path: &str) -> ImageRef {
        ImageRef::new(path)
    }
}

impl From<String> for ImageRef {
    fn from(path: String) -> ImageRef {
        ImageRef::new(path)
    }
}

/// A decoded raster image, ready to be embedded into a PDF document.
#[derive(Clone, Debug)]
pub struct RasterImage {
    encoded: Vec<u8>,
    width: u32,
    height: u32,
}

impl RasterImage {
    /// Decodes a PNG or JPEG image from memory.
    ///
    /// Opaque images keep their original encoding.  Images with an alpha channel are flattened
    /// over white and re-encoded as PNG.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<RasterImage, Error> {
        let decoded = image::ImageReader::new(io::Cursor::new(&bytes))
            .with_guessed_format()
            .context("Could not detect the image format")?
            .decode()
            .context("Could not decode image data")?;
        if decoded.width() == 0 || decoded.height() == 0 {
            return Err(Error::new(
                "Image has no pixels",
                ErrorKind::ImageError(image::ImageError::Limits(
                    image::error::LimitError::from_kind(
                        image::error::LimitErrorKind::DimensionError,
                    ),
                )),
            ));
        }
        if decoded.color().has_alpha() {
            RasterImage::from_dynamic_image(&flatten_alpha(&decoded, Color::WHITE))
        } else {
            Ok(RasterImage {
                width: decoded.width(),
                height: decoded.height(),
                encoded: bytes,
            })
        }
    }

    /// Encodes the given image as PNG.
    pub fn from_dynamic_image(image: &image::DynamicImage) -> Result<RasterImage, Error> {
        let mut buf = io::Cursor::new(Vec::new());
        image
            .write_to(&mut buf, image::ImageFormat::Png)
            .context("Could not encode image as PNG")?;
        Ok(RasterImage {
            encoded: buf.into_inner(),
            width: image.width(),
            height: image.height(),
        })
    }

    /// The encoded image data (PNG or JPEG).
    pub fn encoded(&self) -> &[u8] {
        &self.encoded
    }

    /// The pixel dimensions of the image.
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The intrinsic size of the image, used for its aspect ratio only.
    ///
    /// One pixel counts as one millimeter; the layout scales the result into its size band.
    pub fn intrinsic_size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Composites an image with an alpha channel over the given background color.
pub fn flatten_alpha(image: &image::DynamicImage, background: Color) -> image::DynamicImage {
    let (bg_r, bg_g, bg_b) = background.rgb();
    let rgba = image.to_rgba8();
    let (w, h) = rgba.dimensions();
    let mut rgb = image::RgbImage::new(w, h);

    for (x, y, px) in rgba.enumerate_pixels() {
        let image::Rgba([sr, sg, sb, sa]) = *px;
        let af = f32::from(sa) / 255.0;
        let blend = |s: u8, bg: u8| (f32::from(s) * af + f32::from(bg) * (1.0 - af)).round() as u8;
        rgb.put_pixel(x, y, image::Rgb([blend(sr, bg_r), blend(sg, bg_g), blend(sb, bg_b)]));
    }

    image::DynamicImage::ImageRgb8(rgb)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(image: &image::DynamicImage, format: image::ImageFormat) -> Vec<u8> {
        let mut buf = io::Cursor::new(Vec::new());
        image.write_to(&mut buf, format).expect("encode");
        buf.into_inner()
    }

    #[test]
    fn test_photo_extensions() {
        assert!(has_photo_extension("a/bench.jpg"));
        assert!(has_photo_extension("bench.JPEG"));
        assert!(has_photo_extension("bench.Png"));
        assert!(!has_photo_extension("bench.gif"));
        assert!(!has_photo_extension("bench"));
        assert!(!has_photo_extension("jpg"));
    }

    #[test]
    fn test_opaque_image_keeps_encoding() {
        let img = image::DynamicImage::new_rgb8(64, 48);
        let bytes = encode(&img, image::ImageFormat::Jpeg);
        let raster = RasterImage::from_bytes(bytes.clone()).expect("decode");
        assert_eq!(raster.pixel_size(), (64, 48));
        assert_eq!(raster.encoded(), bytes.as_slice());
        assert_eq!(raster.intrinsic_size().aspect_ratio(), Some(64.0 / 48.0));
    }

    #[test]
    fn test_alpha_image_is_flattened() {
        let mut rgba = image::RgbaImage::new(4, 2);
        for px in rgba.pixels_mut() {
            *px = image::Rgba([0, 0, 0, 0]);
        }
        let img = image::DynamicImage::ImageRgba8(rgba);
        let raster = RasterImage::from_bytes(encode(&img, image::ImageFormat::Png)).expect("decode");
        assert_eq!(raster.pixel_size(), (4, 2));

        let decoded = image::load_from_memory(raster.encoded()).expect("re-decode");
        assert!(!decoded.color().has_alpha());
        assert_eq!(decoded.to_rgb8().get_pixel(0, 0), &image::Rgb([255, 255, 255]));
    }

    #[test]
    fn test_flatten_alpha_blends_half_transparent() {
        let mut rgba = image::RgbaImage::new(1, 1);
        rgba.put_pixel(0, 0, image::Rgba([0, 0, 0, 128]));
        let flat = flatten_alpha(&image::DynamicImage::ImageRgba8(rgba), Color::WHITE);
        let image::Rgb([r, g, b]) = *flat.to_rgb8().get_pixel(0, 0);
        assert_eq!((r, g, b), (127, 127, 127));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(RasterImage::from_bytes(b"definitely not a photo".to_vec()).is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ImageRef::new("does/not/exist.jpg").load().unwrap_err();
        match err.kind() {
            ErrorKind::IoError(_) => {}
            k => panic!("unexpected kind: {:?}", k),
        }
    }
}
