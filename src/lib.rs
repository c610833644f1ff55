// Copyright (c) 2026 Ronan Le Meillat - SCTG Development
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Licensed under the MIT License or the Apache License, Version 2.0

//! Single-page catalog documents for DIY projects.
//!
//! A catalog page shows a title banner, one to six photos arranged in a grid and a QR code that
//! links to further detail about the project (typically a build video).  The page is composed by
//! the [`Composer`][], which runs three independent rendering steps (header, photo grid, footer)
//! and then writes an A4 PDF file named after the title.
//!
//! All layout rules live in [`LayoutConfig`][] and are evaluated by the pure functions of the
//! [`layout`][] module, so they can be checked without rendering anything.
//!
//! # Example
//!
//! ```no_run
//! use diy_catalog::CatalogRequest;
//!
//! let request = CatalogRequest::new(
//!     "My Bench",
//!     "https://youtu.be/xxxx",
//!     vec!["bench_front.jpg", "bench_side.jpg"],
//! )
//! .expect("valid request")
//! .with_output_directory("out");
//! let path = diy_catalog::compose(&request).expect("catalog written");
//! assert!(path.ends_with("My_Bench_catalog.pdf"));
//! ```
//!
//! [`Composer`]: composer/struct.Composer.html
//! [`LayoutConfig`]: config/struct.LayoutConfig.html
//! [`layout`]: layout/index.html

#![warn(missing_docs, rust_2018_idioms)]

pub mod composer;
pub mod config;
pub mod error;
pub mod fonts;
pub mod images;
pub mod layout;
pub mod qr;
pub mod render;
pub mod request;
pub mod style;

use std::ops;
use std::path::PathBuf;

pub use crate::composer::{Composer, Composition, Section, StepOutcome};
pub use crate::config::{CatalogStyle, LayoutConfig};
pub use crate::error::{Error, ErrorKind};
pub use crate::images::ImageRef;
pub use crate::request::CatalogRequest;

/// Composes the catalog page for the given request with the default layout and style.
///
/// This is a shortcut for [`Composer::new`][] followed by [`Composer::compose`][].
///
/// [`Composer::new`]: composer/struct.Composer.html#method.new
/// [`Composer::compose`]: composer/struct.Composer.html#method.compose
pub fn compose(request: &CatalogRequest) -> Result<PathBuf, Error> {
    Composer::new().compose(request)
}

/// A length measured in millimeters.
///
/// All page coordinates of this crate are given in millimeters, relative to the upper left
/// corner of the page.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    PartialOrd,
    derive_more::Add,
    derive_more::AddAssign,
    derive_more::Sub,
    derive_more::SubAssign,
    derive_more::Mul,
    derive_more::MulAssign,
    derive_more::Div,
    derive_more::DivAssign,
    derive_more::Sum,
)]
pub struct Mm(pub f32);

impl Mm {
    /// Returns the raw value in millimeters.
    pub fn as_f32(self) -> f32 {
        self.0
    }

    /// Returns the larger of the two lengths.
    pub fn max(self, other: Mm) -> Mm {
        Mm(self.0.max(other.0))
    }

    /// Returns the smaller of the two lengths.
    pub fn min(self, other: Mm) -> Mm {
        Mm(self.0.min(other.0))
    }

    /// Converts this length into PDF points.
    pub fn to_pt(self) -> printpdf::Pt {
        printpdf::Pt(self.0 * 72.0 / 25.4)
    }
}

macro_rules! impl_from_for_mm {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Mm {
                fn from(t: $t) -> Mm {
                    Mm(t as f32)
                }
            }
        )*
    };
}

impl_from_for_mm![i8, i16, i32, u8, u16, u32, f32];

impl From<f64> for Mm {
    fn from(f: f64) -> Mm {
        Mm(f as f32)
    }
}

impl From<Mm> for printpdf::Mm {
    fn from(mm: Mm) -> printpdf::Mm {
        printpdf::Mm(mm.0)
    }
}

impl From<printpdf::Mm> for Mm {
    fn from(mm: printpdf::Mm) -> Mm {
        Mm(mm.0)
    }
}

impl From<Mm> for printpdf::Pt {
    fn from(mm: Mm) -> printpdf::Pt {
        mm.to_pt()
    }
}

impl From<printpdf::Pt> for Mm {
    fn from(pt: printpdf::Pt) -> Mm {
        Mm(pt.0 * 25.4 / 72.0)
    }
}

/// A position on a page, relative to its upper left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Position {
    /// The horizontal offset.
    pub x: Mm,
    /// The vertical offset, growing downwards.
    pub y: Mm,
}

impl Position {
    /// Creates a new position from the given coordinates.
    pub fn new(x: impl Into<Mm>, y: impl Into<Mm>) -> Position {
        Position {
            x: x.into(),
            y: y.into(),
        }
    }
}

impl<X: Into<Mm>, Y: Into<Mm>> From<(X, Y)> for Position {
    fn from(values: (X, Y)) -> Position {
        Position::new(values.0, values.1)
    }
}

impl ops::Add for Position {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

impl ops::AddAssign for Position {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl ops::Sub for Position {
    type Output = Self;

    fn sub(mut self, other: Self) -> Self {
        self.x -= other.x;
        self.y -= other.y;
        self
    }
}

/// The size of a rectangular area.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Size {
    /// The width of the area.
    pub width: Mm,
    /// The height of the area.
    pub height: Mm,
}

impl Size {
    /// Creates a new size from the given width and height.
    pub fn new(width: impl Into<Mm>, height: impl Into<Mm>) -> Size {
        Size {
            width: width.into(),
            height: height.into(),
        }
    }

    /// Returns `width / height`, or `None` if the height is zero.
    pub fn aspect_ratio(&self) -> Option<f32> {
        if self.height.0 > 0.0 {
            Some(self.width.0 / self.height.0)
        } else {
            None
        }
    }
}

impl<W: Into<Mm>, H: Into<Mm>> From<(W, H)> for Size {
    fn from(values: (W, H)) -> Size {
        Size::new(values.0, values.1)
    }
}
