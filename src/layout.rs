// Copyright (c) 2026 Ronan Le Meillat - SCTG Development
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Licensed under the MIT License or the Apache License, Version 2.0

//! Layout arithmetic for the catalog page.
//!
//! Nothing in this module draws anything.  The functions compute where the banner, the photos and
//! the QR code go, based on a [`LayoutConfig`][] and the number of photos.
//!
//! Photos are laid out in a grid whose cell bound (a [`SizeBand`][]) depends on the photo count:
//!
//! | photos | max width | max height                          |
//! |--------|-----------|-------------------------------------|
//! | 1      | 140       | min(140, available − 20)            |
//! | 2      | 75        | min(95, available − 20)             |
//! | 3, 4   | 55        | min(70, (available − 30) / 2)       |
//! | 5, 6   | 55        | min(60, (available − 40) / 3)       |
//!
//! A single photo is centered; two or more photos go into two columns.
//!
//! [`LayoutConfig`]: ../config/struct.LayoutConfig.html
//! [`SizeBand`]: struct.SizeBand.html

use crate::config::LayoutConfig;
use crate::error::{Error, ErrorKind};
use crate::{Mm, Position, Size};

/// The maximum number of photos on a catalog page.
pub const MAX_PHOTOS: usize = 6;

/// An axis-aligned rectangle on the page.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    /// The upper left corner.
    pub origin: Position,
    /// The extent of the rectangle.
    pub size: Size,
}

impl Rect {
    /// Creates a new rectangle.
    pub fn new(origin: impl Into<Position>, size: impl Into<Size>) -> Rect {
        Rect {
            origin: origin.into(),
            size: size.into(),
        }
    }

    /// The horizontal offset of the right edge.
    pub fn right(&self) -> Mm {
        self.origin.x + self.size.width
    }

    /// The vertical offset of the bottom edge.
    pub fn bottom(&self) -> Mm {
        self.origin.y + self.size.height
    }

    /// Returns a copy of this rectangle grown by `amount` on every side.
    pub fn expand(&self, amount: Mm) -> Rect {
        Rect {
            origin: Position::new(self.origin.x - amount, self.origin.y - amount),
            size: Size::new(
                self.size.width + amount * 2.0,
                self.size.height + amount * 2.0,
            ),
        }
    }

    /// Returns a copy of this rectangle moved right and down by `offset`.
    pub fn offset(&self, offset: Mm) -> Rect {
        Rect {
            origin: Position::new(self.origin.x + offset, self.origin.y + offset),
            size: self.size,
        }
    }

    /// Returns `true` if the interiors of the two rectangles overlap.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.origin.x < other.right()
            && other.origin.x < self.right()
            && self.origin.y < other.bottom()
            && other.origin.y < self.bottom()
    }

    /// Returns `true` if `other` lies completely inside this rectangle.
    pub fn contains(&self, other: &Rect) -> bool {
        other.origin.x >= self.origin.x
            && other.origin.y >= self.origin.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// The bound every photo of a page is fitted into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SizeBand {
    /// The maximum rendered width.
    pub max_width: Mm,
    /// The maximum rendered height.
    pub max_height: Mm,
}

/// Selects the size band for a page with `count` photos.
///
/// Returns an error if `count` is not in `1..=6`.
pub fn size_band(config: &LayoutConfig, count: usize) -> Result<SizeBand, Error> {
    let available = config.available_height();
    let (max_width, max_height) = match count {
        1 => (Mm(140.0), Mm(140.0).min(available - Mm(20.0))),
        2 => (Mm(75.0), Mm(95.0).min(available - Mm(20.0))),
        3 | 4 => (Mm(55.0), Mm(70.0).min((available - Mm(30.0)) / 2.0)),
        5 | 6 => (Mm(55.0), Mm(60.0).min((available - Mm(40.0)) / 3.0)),
        _ => {
            return Err(Error::new(
                format!(
                    "A catalog page holds 1 to {} photos, got {}",
                    MAX_PHOTOS, count
                ),
                ErrorKind::InvalidRequest,
            ))
        }
    };
    Ok(SizeBand {
        max_width,
        max_height,
    })
}

/// Scales `intrinsic` into `band` without changing its aspect ratio.
///
/// Landscape images are fitted to the maximum width first and shrunk if they end up too high;
/// portrait and square images are fitted to the maximum height first and shrunk if they end up
/// too wide.  Returns `None` for degenerate images with a zero dimension.
pub fn fit_size(intrinsic: Size, band: SizeBand) -> Option<Size> {
    if intrinsic.width.0 <= 0.0 {
        return None;
    }
    let aspect_ratio = intrinsic.aspect_ratio()?;

    let size = if intrinsic.width > intrinsic.height {
        let height = band.max_width / aspect_ratio;
        if height > band.max_height {
            Size::new(band.max_height * aspect_ratio, band.max_height)
        } else {
            Size::new(band.max_width, height)
        }
    } else {
        let width = band.max_height * aspect_ratio;
        if width > band.max_width {
            Size::new(band.max_width, band.max_width / aspect_ratio)
        } else {
            Size::new(width, band.max_height)
        }
    };
    Some(size)
}

/// A photo with its computed position and rendered size.
///
/// Placed photos only live for one rendering pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedPhoto {
    /// The index of the photo in the request.
    pub index: usize,
    /// The upper left corner of the image.
    pub position: Position,
    /// The rendered size of the image.
    pub size: Size,
}

impl PlacedPhoto {
    /// The rectangle covered by the image itself.
    pub fn rect(&self) -> Rect {
        Rect::new(self.position, self.size)
    }

    /// The white frame drawn behind the image.
    pub fn frame(&self, config: &LayoutConfig) -> Rect {
        self.rect().expand(config.photo_border)
    }

    /// The shadow drawn behind the frame.
    pub fn shadow(&self, config: &LayoutConfig, count: usize) -> Rect {
        self.frame(config).offset(config.shadow_offset(count))
    }
}

/// The photo grid of one page.
#[derive(Clone, Debug)]
pub struct GridLayout<'c> {
    config: &'c LayoutConfig,
    count: usize,
    band: SizeBand,
}

impl<'c> GridLayout<'c> {
    /// Creates the grid for a page with `count` photos.
    pub fn new(config: &'c LayoutConfig, count: usize) -> Result<GridLayout<'c>, Error> {
        let band = size_band(config, count)?;
        Ok(GridLayout {
            config,
            count,
            band,
        })
    }

    /// The number of slots in this grid.
    pub fn count(&self) -> usize {
        self.count
    }

    /// The size band of this grid.
    pub fn band(&self) -> SizeBand {
        self.band
    }

    /// The shadow offset used for the photos of this grid.
    pub fn shadow_offset(&self) -> Mm {
        self.config.shadow_offset(self.count)
    }

    /// Places the photo with the given index and intrinsic size.
    ///
    /// Returns `None` if the intrinsic size is degenerate.
    pub fn place(&self, index: usize, intrinsic: Size) -> Option<PlacedPhoto> {
        let size = fit_size(intrinsic, self.band)?;
        Some(PlacedPhoto {
            index,
            position: self.origin(index, size.width),
            size,
        })
    }

    /// The upper left corner of the slot with the given index, assuming a photo that fills the
    /// full band width.  Used to anchor markers for photos that could not be placed.
    pub fn slot_origin(&self, index: usize) -> Position {
        self.origin(index, self.band.max_width)
    }

    fn origin(&self, index: usize, width: Mm) -> Position {
        let page_width = self.config.page_width;
        let top = self.config.grid_top();
        if self.count == 1 {
            return Position::new((page_width - width) / 2.0, top);
        }

        let column = index % 2;
        let row = index / 2;
        let margin = (page_width - width * 2.0) / 3.0;
        let x = margin + (width + margin) * column as f32;
        let y = top + (self.band.max_height + self.config.row_gap) * row as f32;
        Position::new(x, y)
    }
}

/// The banner at the top of the page.
pub fn banner_rect(config: &LayoutConfig) -> Rect {
    Rect::new(
        (config.side_margin, config.banner_top),
        (
            config.page_width - config.side_margin * 2.0,
            config.banner_height,
        ),
    )
}

/// The boxed footer band.  Its top edge is always [`LayoutConfig::footer_top`][].
///
/// [`LayoutConfig::footer_top`]: ../config/struct.LayoutConfig.html#method.footer_top
pub fn footer_rect(config: &LayoutConfig) -> Rect {
    Rect::new(
        (config.side_margin, config.footer_top()),
        (
            config.page_width - config.side_margin * 2.0,
            config.footer_height,
        ),
    )
}

/// The square covered by the QR code, centered horizontally in the footer.
pub fn code_rect(config: &LayoutConfig) -> Rect {
    Rect::new(
        (
            (config.page_width - config.code_size) / 2.0,
            config.footer_top() + config.code_top_gap + config.code_padding,
        ),
        (config.code_size, config.code_size),
    )
}

/// The vertical offset of the caption below the QR code.
pub fn caption_top(config: &LayoutConfig) -> Mm {
    code_rect(config).expand(config.code_padding).bottom() + config.caption_gap
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    fn page(config: &LayoutConfig) -> Rect {
        Rect::new(Position::default(), config.page_size())
    }

    #[test]
    fn test_size_bands() {
        let config = LayoutConfig::default();
        let band = size_band(&config, 1).unwrap();
        assert_eq!(band.max_width, Mm(140.0));
        assert_eq!(band.max_height, Mm(140.0));

        let band = size_band(&config, 2).unwrap();
        assert_eq!(band.max_width, Mm(75.0));
        assert_eq!(band.max_height, Mm(95.0));

        for count in [3, 4] {
            let band = size_band(&config, count).unwrap();
            assert_eq!(band.max_width, Mm(55.0));
            assert_eq!(band.max_height, Mm(68.5));
        }
        for count in [5, 6] {
            let band = size_band(&config, count).unwrap();
            assert_eq!(band.max_width, Mm(55.0));
            assert!(approx_eq!(f32, band.max_height.0, 127.0 / 3.0, epsilon = 1e-4));
        }
    }

    #[test]
    fn test_size_band_rejects_bad_counts() {
        let config = LayoutConfig::default();
        assert!(size_band(&config, 0).is_err());
        assert!(size_band(&config, 7).is_err());
    }

    #[test]
    fn test_size_band_follows_available_height() {
        let config = LayoutConfig {
            footer_height: Mm(120.0),
            ..LayoutConfig::default()
        };
        // available height: 297 - 60 - 120 - 10 = 107
        assert_eq!(size_band(&config, 1).unwrap().max_height, Mm(87.0));
        assert_eq!(size_band(&config, 2).unwrap().max_height, Mm(87.0));
    }

    #[test]
    fn test_fit_landscape_width_first() {
        let band = SizeBand {
            max_width: Mm(140.0),
            max_height: Mm(140.0),
        };
        let size = fit_size(Size::new(4000, 2000), band).unwrap();
        assert_eq!(size, Size::new(140.0, 70.0));
    }

    #[test]
    fn test_fit_landscape_shrinks_to_height() {
        let band = SizeBand {
            max_width: Mm(75.0),
            max_height: Mm(40.0),
        };
        let size = fit_size(Size::new(1200, 1000), band).unwrap();
        assert!(approx_eq!(f32, size.height.0, 40.0, epsilon = 1e-4));
        assert!(approx_eq!(f32, size.width.0, 48.0, epsilon = 1e-4));
    }

    #[test]
    fn test_fit_portrait_shrinks_to_width() {
        let band = SizeBand {
            max_width: Mm(55.0),
            max_height: Mm(68.5),
        };
        let size = fit_size(Size::new(900, 1000), band).unwrap();
        assert!(approx_eq!(f32, size.width.0, 55.0, epsilon = 1e-4));
        assert!(approx_eq!(f32, size.height.0, 55.0 / 0.9, epsilon = 1e-3));
    }

    #[test]
    fn test_fit_square_uses_height() {
        let band = SizeBand {
            max_width: Mm(75.0),
            max_height: Mm(95.0),
        };
        let size = fit_size(Size::new(10, 10), band).unwrap();
        assert_eq!(size, Size::new(75.0, 75.0));
    }

    #[test]
    fn test_fit_rejects_degenerate() {
        let band = SizeBand {
            max_width: Mm(75.0),
            max_height: Mm(95.0),
        };
        assert!(fit_size(Size::new(0, 10), band).is_none());
        assert!(fit_size(Size::new(10, 0), band).is_none());
    }

    #[test]
    fn test_fit_preserves_aspect_and_bounds() {
        let config = LayoutConfig::default();
        let shapes = [(4032, 3024), (3024, 4032), (1000, 1000), (5000, 500), (300, 3000)];
        for count in 1..=MAX_PHOTOS {
            let band = size_band(&config, count).unwrap();
            for (w, h) in shapes {
                let size = fit_size(Size::new(w, h), band).unwrap();
                let expected = w as f32 / h as f32;
                let actual = size.width.0 / size.height.0;
                assert!(
                    approx_eq!(f32, expected, actual, epsilon = 1e-3 * expected),
                    "aspect {} vs {} for {}x{} in band {:?}",
                    expected,
                    actual,
                    w,
                    h,
                    band
                );
                assert!(size.width.0 <= band.max_width.0 + 1e-4);
                assert!(size.height.0 <= band.max_height.0 + 1e-4);
            }
        }
    }

    #[test]
    fn test_single_photo_is_centered() {
        let config = LayoutConfig::default();
        let grid = GridLayout::new(&config, 1).unwrap();
        let placed = grid.place(0, Size::new(3000, 2000)).unwrap();
        assert_eq!(placed.position.y, config.grid_top());
        let left = placed.position.x;
        let right = config.page_width - placed.rect().right();
        assert!(approx_eq!(f32, left.0, right.0, epsilon = 1e-4));
    }

    #[test]
    fn test_two_columns_margin_equals_gap() {
        let config = LayoutConfig::default();
        let grid = GridLayout::new(&config, 2).unwrap();
        let a = grid.place(0, Size::new(1600, 1200)).unwrap();
        let b = grid.place(1, Size::new(1600, 1200)).unwrap();
        assert_eq!(a.position.y, b.position.y);
        let margin = a.position.x;
        let gap = b.position.x - a.rect().right();
        let right = config.page_width - b.rect().right();
        assert!(approx_eq!(f32, margin.0, gap.0, epsilon = 1e-4));
        assert!(approx_eq!(f32, margin.0, right.0, epsilon = 1e-4));
    }

    #[test]
    fn test_rows_are_separated_by_gap() {
        let config = LayoutConfig::default();
        let grid = GridLayout::new(&config, 6).unwrap();
        let first = grid.slot_origin(0);
        let third = grid.slot_origin(2);
        let fifth = grid.slot_origin(4);
        let pitch = grid.band().max_height + config.row_gap;
        assert!(approx_eq!(f32, (third.y - first.y).0, pitch.0, epsilon = 1e-4));
        assert!(approx_eq!(f32, (fifth.y - third.y).0, pitch.0, epsilon = 1e-4));
        assert_eq!(grid.slot_origin(1).y, first.y);
    }

    #[test]
    fn test_every_count_fits_page_without_overlap() {
        let config = LayoutConfig::default();
        let page = page(&config);
        let shapes = [(4032, 3024), (3024, 4032), (1000, 1000), (5000, 500), (300, 3000), (640, 480)];
        for count in 1..=MAX_PHOTOS {
            let grid = GridLayout::new(&config, count).unwrap();
            let placed: Vec<PlacedPhoto> = (0..count)
                .map(|i| {
                    let (w, h) = shapes[i % shapes.len()];
                    grid.place(i, Size::new(w, h)).unwrap()
                })
                .collect();
            assert_eq!(placed.len(), count);

            for photo in &placed {
                assert!(page.contains(&photo.shadow(&config, count)), "{:?}", photo);
                assert!(photo.shadow(&config, count).bottom() <= config.footer_top());
            }
            for (i, a) in placed.iter().enumerate() {
                for b in placed.iter().skip(i + 1) {
                    assert!(
                        !a.frame(&config).intersects(&b.frame(&config)),
                        "photos {} and {} overlap with {} photos",
                        a.index,
                        b.index,
                        count
                    );
                }
            }
        }
    }

    #[test]
    fn test_footer_and_code_geometry() {
        let config = LayoutConfig::default();
        let footer = footer_rect(&config);
        assert_eq!(footer.origin.y, Mm(227.0));
        assert_eq!(footer.bottom(), config.page_height - config.bottom_margin);

        let code = code_rect(&config);
        assert!(footer.contains(&code.expand(config.code_padding)));
        let left = code.origin.x;
        let right = config.page_width - code.right();
        assert!(approx_eq!(f32, left.0, right.0, epsilon = 1e-4));
        assert!(caption_top(&config) < footer.bottom());
    }

    #[test]
    fn test_banner_inside_header() {
        let config = LayoutConfig::default();
        let banner = banner_rect(&config);
        assert!(banner.bottom() < config.separator_y());
        assert!(config.separator_y() < config.header_height);
    }

    #[test]
    fn test_rect_helpers() {
        let a = Rect::new((0, 0), (10, 10));
        let b = Rect::new((10, 0), (10, 10));
        assert!(!a.intersects(&b));
        assert!(a.intersects(&a.offset(Mm(3.0))));
        assert!(a.expand(Mm(1.0)).contains(&a));
        assert_eq!(a.expand(Mm(1.0)).size, Size::new(12, 12));
    }
}
