// Copyright (c) 2026 Ronan Le Meillat - SCTG Development
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Licensed under the MIT License or the Apache License, Version 2.0

//! Colors and line styles used when drawing the catalog page.

use crate::Mm;

/// A color, given as 8-bit channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    /// An RGB color.
    Rgb(u8, u8, u8),
    /// A greyscale color.
    Greyscale(u8),
}

impl Color {
    /// Pure white.
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
    /// Pure black.
    pub const BLACK: Color = Color::Rgb(0, 0, 0);

    /// Returns the red, green and blue channels of this color.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Color::Rgb(r, g, b) => (r, g, b),
            Color::Greyscale(v) => (v, v, v),
        }
    }
}

impl From<Color> for printpdf::Color {
    fn from(color: Color) -> printpdf::Color {
        let (r, g, b) = color.rgb();
        printpdf::Color::Rgb(printpdf::Rgb::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            None,
        ))
    }
}

/// The stroke of a line or of a rectangle outline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineStyle {
    thickness: Mm,
    color: Color,
}

impl LineStyle {
    /// Creates a black line style with a thickness of 0.1 mm.
    pub fn new() -> LineStyle {
        LineStyle::default()
    }

    /// Sets the thickness and returns the line style.
    pub fn with_thickness(mut self, thickness: impl Into<Mm>) -> Self {
        self.thickness = thickness.into();
        self
    }

    /// Sets the color and returns the line style.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Returns the thickness of the line.
    pub fn thickness(&self) -> Mm {
        self.thickness
    }

    /// Returns the color of the line.
    pub fn color(&self) -> Color {
        self.color
    }
}

impl Default for LineStyle {
    fn default() -> LineStyle {
        LineStyle {
            thickness: Mm(0.1),
            color: Color::BLACK,
        }
    }
}
