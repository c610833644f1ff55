// Copyright (c) 2026 Ronan Le Meillat - SCTG Development
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Licensed under the MIT License or the Apache License, Version 2.0

//! QR code generation.
//!
//! The code is rasterized in memory into a grayscale image with square modules and a quiet zone,
//! then handed to the renderer like any photo.  Nothing is written to disk.

use qrcode::{Color as ModuleColor, EcLevel, QrCode};

use crate::error::{Context as _, Error};
use crate::images::RasterImage;

/// Parameters for rasterizing a QR code.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CodeOptions {
    /// The error correction level.
    pub ec_level: EcLevel,
    /// Side length of one module in pixels.
    pub module_px: u32,
    /// Width of the quiet zone around the code, in modules.
    pub quiet_zone: u32,
}

impl Default for CodeOptions {
    fn default() -> CodeOptions {
        CodeOptions {
            ec_level: EcLevel::L,
            module_px: 10,
            quiet_zone: 4,
        }
    }
}

/// Generates a square QR code image for the given payload.
///
/// The version is chosen automatically from the payload length.  Any text is accepted, including
/// the empty string; an error is only returned if the payload does not fit into the largest
/// version.
pub fn generate(payload: &str, options: &CodeOptions) -> Result<RasterImage, Error> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), options.ec_level)
        .with_context(|| {
            format!(
                "Could not generate a QR code for a payload of {} bytes",
                payload.len()
            )
        })?;
    tracing::debug!(
        "Generated QR code version {:?} with {} modules per side",
        code.version(),
        code.width()
    );
    RasterImage::from_dynamic_image(&rasterize(&code, options))
}

fn rasterize(code: &QrCode, options: &CodeOptions) -> image::DynamicImage {
    let modules = code.width() as u32;
    let module_px = options.module_px.max(1);
    let side = (modules + options.quiet_zone * 2) * module_px;
    let colors = code.to_colors();

    let image = image::GrayImage::from_fn(side, side, |x, y| {
        let mx = (x / module_px).checked_sub(options.quiet_zone);
        let my = (y / module_px).checked_sub(options.quiet_zone);
        let dark = match (mx, my) {
            (Some(mx), Some(my)) if mx < modules && my < modules => {
                colors[(my * modules + mx) as usize] == ModuleColor::Dark
            }
            _ => false,
        };
        image::Luma([if dark { 0 } else { 255 }])
    });
    image::DynamicImage::ImageLuma8(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_generates_square_image() {
        let options = CodeOptions::default();
        let raster = generate("https://youtu.be/xxxx", &options).expect("code");
        let (w, h) = raster.pixel_size();
        assert_eq!(w, h);
        // version 2 at level L: 25 modules plus a quiet zone of 4 on both sides
        assert_eq!(w, (25 + 8) * 10);
    }

    #[test]
    fn test_quiet_zone_is_white_and_finder_is_dark() {
        let options = CodeOptions::default();
        let code = QrCode::with_error_correction_level(b"https://example.com", EcLevel::L)
            .expect("code");
        let image = rasterize(&code, &options).to_luma8();
        assert_eq!(image.get_pixel(0, 0), &image::Luma([255]));
        // the top left finder pattern starts right after the quiet zone
        assert_eq!(image.get_pixel(40, 40), &image::Luma([0]));
        assert_eq!(image.get_pixel(45, 45), &image::Luma([0]));
    }

    #[test]
    fn test_accepts_arbitrary_payloads() {
        let options = CodeOptions::default();
        assert!(generate("", &options).is_ok());
        assert!(generate("not a link at all", &options).is_ok());
    }

    #[test]
    fn test_oversized_payload_is_code_error() {
        let payload = "x".repeat(5000);
        let err = generate(&payload, &CodeOptions::default()).unwrap_err();
        match err.kind() {
            ErrorKind::CodeError(_) => {}
            k => panic!("unexpected kind: {:?}", k),
        }
    }
}
