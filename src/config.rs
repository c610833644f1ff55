// Copyright (c) 2026 Ronan Le Meillat - SCTG Development
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Licensed under the MIT License or the Apache License, Version 2.0

//! Layout constants and visual style of a catalog page.
//!
//! [`LayoutConfig`][] gathers every length that the layout rules depend on, so the rules can be
//! audited and tested without rendering.  [`CatalogStyle`][] holds what only affects the looks of
//! the page: colors, font sizes, captions and the font file.
//!
//! [`LayoutConfig`]: struct.LayoutConfig.html
//! [`CatalogStyle`]: struct.CatalogStyle.html

use std::path::PathBuf;

use crate::style::Color;
use crate::{Mm, Size};

/// Fixed geometry of a catalog page, in millimeters.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Page width (A4).
    pub page_width: Mm,
    /// Page height (A4).
    pub page_height: Mm,
    /// Height of the header region at the top of the page.  The photo grid starts right below.
    pub header_height: Mm,
    /// Height of the boxed footer region holding the QR code.
    pub footer_height: Mm,
    /// Space kept free below the footer.
    pub bottom_margin: Mm,
    /// Horizontal margin of the banner and of the footer box.
    pub side_margin: Mm,
    /// Distance from the top of the page to the banner.
    pub banner_top: Mm,
    /// Fixed height of the title banner.
    pub banner_height: Mm,
    /// Distance between the bottom of the banner and the separator line.
    pub separator_gap: Mm,
    /// Vertical gap between two grid rows.
    pub row_gap: Mm,
    /// Width of the white border drawn around every photo.
    pub photo_border: Mm,
    /// Shadow offset for pages with up to two photos.
    pub shadow_offset_large: Mm,
    /// Shadow offset for pages with three or more photos.
    pub shadow_offset_small: Mm,
    /// Error markers for failed photos are only drawn if their slot starts above this offset.
    pub error_label_cutoff: Mm,
    /// Side length of the QR code.
    pub code_size: Mm,
    /// White padding around the QR code.
    pub code_padding: Mm,
    /// Distance from the top of the footer to the QR code.
    pub code_top_gap: Mm,
    /// Distance between the QR code and its caption.
    pub caption_gap: Mm,
}

impl LayoutConfig {
    /// Returns the page size.
    pub fn page_size(&self) -> Size {
        Size::new(self.page_width, self.page_height)
    }

    /// Height that remains for photos between header and footer.
    pub fn available_height(&self) -> Mm {
        self.page_height - self.header_height - self.footer_height - self.bottom_margin
    }

    /// Vertical offset of the first grid row.
    pub fn grid_top(&self) -> Mm {
        self.header_height
    }

    /// Vertical offset of the top edge of the footer band.
    ///
    /// This does not depend on the photos; the footer is always drawn at the same place.
    pub fn footer_top(&self) -> Mm {
        self.page_height - self.footer_height - self.bottom_margin
    }

    /// Vertical offset of the separator line below the banner.
    pub fn separator_y(&self) -> Mm {
        self.banner_top + self.banner_height + self.separator_gap
    }

    /// Shadow offset used for a page with `count` photos.
    pub fn shadow_offset(&self, count: usize) -> Mm {
        if count <= 2 {
            self.shadow_offset_large
        } else {
            self.shadow_offset_small
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> LayoutConfig {
        LayoutConfig {
            page_width: Mm(210.0),
            page_height: Mm(297.0),
            header_height: Mm(60.0),
            footer_height: Mm(60.0),
            bottom_margin: Mm(10.0),
            side_margin: Mm(10.0),
            banner_top: Mm(10.0),
            banner_height: Mm(35.0),
            separator_gap: Mm(5.0),
            row_gap: Mm(8.0),
            photo_border: Mm(1.0),
            shadow_offset_large: Mm(3.0),
            shadow_offset_small: Mm(2.0),
            error_label_cutoff: Mm(220.0),
            code_size: Mm(40.0),
            code_padding: Mm(2.0),
            code_top_gap: Mm(5.0),
            caption_gap: Mm(3.0),
        }
    }
}

/// Colors, fonts and captions of a catalog page.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogStyle {
    /// TrueType font used for all text.  If it cannot be loaded, Helvetica is used instead.
    pub font_path: Option<PathBuf>,
    /// Font size of the title, in points.
    pub title_font_size: u8,
    /// Font size of the secondary header label, in points.
    pub label_font_size: u8,
    /// Font size of the caption below the QR code, in points.
    pub caption_font_size: u8,
    /// Font size of the inline error markers, in points.
    pub marker_font_size: u8,
    /// Color of the title text.
    pub title_color: Color,
    /// Color of the secondary header label.
    pub label_color: Color,
    /// Fill color of the banner.
    pub banner_color: Color,
    /// Color of the separator line below the banner.
    pub separator_color: Color,
    /// Color of the drop shadow behind every photo.
    pub shadow_color: Color,
    /// Fill color of the footer box.
    pub footer_fill: Color,
    /// Outline color of the footer box.
    pub footer_border: Color,
    /// Color of the caption below the QR code.
    pub caption_color: Color,
    /// Color of the inline error markers.
    pub error_color: Color,
    /// Caption printed below the QR code.
    pub code_caption: String,
    /// Caption printed in the footer if the QR code could not be generated.
    pub code_error_caption: String,
}

impl Default for CatalogStyle {
    fn default() -> CatalogStyle {
        CatalogStyle {
            font_path: Some(PathBuf::from("fonts/ipaexg.ttf")),
            title_font_size: 24,
            label_font_size: 10,
            caption_font_size: 12,
            marker_font_size: 10,
            title_color: Color::Rgb(24, 44, 61),
            label_color: Color::Rgb(96, 110, 122),
            banner_color: Color::Rgb(234, 239, 244),
            separator_color: Color::Rgb(24, 44, 61),
            shadow_color: Color::Greyscale(170),
            footer_fill: Color::Rgb(245, 245, 245),
            footer_border: Color::Rgb(190, 190, 190),
            caption_color: Color::Rgb(0, 0, 255),
            error_color: Color::Rgb(255, 0, 0),
            code_caption: String::from("Scan for project details"),
            code_error_caption: String::from("QR code generation failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_regions() {
        let config = LayoutConfig::default();
        assert_eq!(config.available_height(), Mm(167.0));
        assert_eq!(config.footer_top(), Mm(227.0));
        assert_eq!(config.grid_top(), Mm(60.0));
        assert!(config.separator_y() < config.grid_top());
    }

    #[test]
    fn test_shadow_offset_shrinks_with_count() {
        let config = LayoutConfig::default();
        assert_eq!(config.shadow_offset(1), Mm(3.0));
        assert_eq!(config.shadow_offset(2), Mm(3.0));
        assert_eq!(config.shadow_offset(3), Mm(2.0));
        assert_eq!(config.shadow_offset(6), Mm(2.0));
    }

    #[test]
    fn test_code_block_fits_in_footer() {
        let config = LayoutConfig::default();
        let code_bottom = config.code_top_gap + config.code_size + config.code_padding;
        assert!(code_bottom < config.footer_height);
    }
}
