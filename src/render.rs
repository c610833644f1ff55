// Copyright (c) 2026 Ronan Le Meillat - SCTG Development
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Licensed under the MIT License or the Apache License, Version 2.0

//! Low-level PDF rendering utilities.
//!
//! This module provides a thin abstraction over [`printpdf`][]:  A [`Renderer`][] creates a
//! document with a single page and collects the drawing operations for it.  All coordinates passed
//! to the renderer are relative to the upper left corner of the page and given in millimeters;
//! the renderer converts them into PDF user space, which starts at the lower left corner.
//!
//! [`printpdf`]: https://docs.rs/printpdf/latest/printpdf
//! [`Renderer`]: struct.Renderer.html

use std::io::{self, Write as _};
use std::ops;

use crate::error::{Context as _, Error, ErrorKind};
use crate::fonts::PageFont;
use crate::layout::Rect;
use crate::style::{Color, LineStyle};
use crate::{Mm, Position, Size};

/// Compatibility wrapper for a font reference (either builtin or external) to adapt to
/// `printpdf`, which uses `FontId` for external fonts and `BuiltinFont` for builtin ones.
#[derive(Clone, Debug, PartialEq)]
pub enum IndirectFontRef {
    /// One of the 14 standard PDF fonts.
    Builtin(printpdf::BuiltinFont),
    /// A font embedded into the document.
    External(printpdf::FontId),
}

/// A position relative to the top left corner of the page.
struct PagePosition(Position);

/// A position relative to the bottom left corner of the page (“user space” in PDF terms).
struct UserSpacePosition(Position);

impl UserSpacePosition {
    fn from_page(page_size: Size, position: PagePosition) -> Self {
        Self(Position::new(position.0.x, page_size.height - position.0.y))
    }
}

impl From<UserSpacePosition> for printpdf::Point {
    fn from(pos: UserSpacePosition) -> printpdf::Point {
        printpdf::Point::new(pos.0.x.into(), pos.0.y.into())
    }
}

impl ops::Deref for UserSpacePosition {
    type Target = Position;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// An image that has been registered with the document and can be placed on the page.
#[derive(Clone, Debug)]
pub struct ImageHandle {
    id: printpdf::XObjectId,
    pixel_width: u32,
    pixel_height: u32,
}

impl ImageHandle {
    /// Returns the pixel dimensions of the registered image.
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.pixel_width, self.pixel_height)
    }
}

/// The DPI used to place images; the scale factors are computed relative to it.
const IMAGE_DPI: f32 = 300.0;

/// Renders a single-page PDF document.
///
/// This is a wrapper around a [`printpdf::PdfDocument`][] and the operations of its only page.
///
/// [`printpdf::PdfDocument`]: https://docs.rs/printpdf/latest/printpdf/struct.PdfDocument.html
pub struct Renderer {
    doc: printpdf::PdfDocument,
    size: Size,
    layer_id: printpdf::LayerInternalId,
    ops: Vec<printpdf::Op>,
    fill_color: Option<Color>,
    outline_color: Option<Color>,
    outline_thickness: Option<Mm>,
}

impl Renderer {
    /// Creates a new PDF document renderer with one page of the given size and the given title.
    ///
    /// # Example
    /// ```
    /// use diy_catalog::render::Renderer;
    /// use diy_catalog::{Mm, Size};
    ///
    /// let r = Renderer::new(Size::new(210.0, 297.0), "title").expect("renderer");
    /// assert_eq!(r.size().width, Mm(210.0));
    /// assert_eq!(r.op_count(), 0);
    /// ```
    pub fn new(size: impl Into<Size>, title: impl AsRef<str>) -> Result<Renderer, Error> {
        let size = size.into();
        if size.width.0 <= 0.0 || size.height.0 <= 0.0 {
            return Err(Error::new(
                format!("Invalid page size {:?}", size),
                ErrorKind::PdfError("page size must be positive".to_string()),
            ));
        }
        let mut doc = printpdf::PdfDocument::new(title.as_ref());
        let layer = printpdf::Layer::new("Layer 1");
        let layer_id = doc.add_layer(&layer);

        Ok(Renderer {
            doc,
            size,
            layer_id,
            ops: Vec::new(),
            fill_color: None,
            outline_color: None,
            outline_thickness: None,
        })
    }

    /// Returns the size of the page.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Returns the number of drawing operations recorded so far.
    pub fn op_count(&self) -> usize {
        self.ops.len()
    }

    /// Loads an embedded font from the given data and returns a reference to it.
    pub fn add_embedded_font(&mut self, data: &[u8]) -> Result<IndirectFontRef, Error> {
        let mut warnings = Vec::new();
        let parsed = printpdf::ParsedFont::from_bytes(data, 0, &mut warnings)
            .ok_or_else(|| Error::new("Failed to parse font data", ErrorKind::InvalidFont))?;
        let id = self.doc.add_font(&parsed);
        Ok(IndirectFontRef::External(id))
    }

    /// Registers an encoded PNG or JPEG image with the document.
    ///
    /// `pixel_width` and `pixel_height` are the dimensions of the encoded image; they are used to
    /// scale the image to its target size when it is placed.
    pub fn add_image(
        &mut self,
        encoded: &[u8],
        pixel_width: u32,
        pixel_height: u32,
    ) -> Result<ImageHandle, Error> {
        let mut warnings = Vec::new();
        let raw = printpdf::RawImage::decode_from_bytes(encoded, &mut warnings)
            .context("Failed to decode image for embedding")?;
        let id = self.doc.add_image(&raw);
        Ok(ImageHandle {
            id,
            pixel_width,
            pixel_height,
        })
    }

    /// Places a registered image so that it covers the given rectangle.
    pub fn place_image(&mut self, image: &ImageHandle, rect: Rect) {
        let (px_width, px_height) = image.pixel_size();
        // natural size in points at IMAGE_DPI
        let natural_width = px_width.max(1) as f32 * 72.0 / IMAGE_DPI;
        let natural_height = px_height.max(1) as f32 * 72.0 / IMAGE_DPI;

        let bottom_left = self.transform_position(PagePosition(Position::new(
            rect.origin.x,
            rect.bottom(),
        )));
        let transform = printpdf::XObjectTransform {
            translate_x: Some(bottom_left.x.into()),
            translate_y: Some(bottom_left.y.into()),
            scale_x: Some(rect.size.width.to_pt().0 / natural_width),
            scale_y: Some(rect.size.height.to_pt().0 / natural_height),
            dpi: Some(IMAGE_DPI),
            ..Default::default()
        };
        self.ops.push(printpdf::Op::UseXobject {
            id: image.id.clone(),
            transform,
        });
    }

    /// Draws a rectangle, filled with `fill` and outlined with `outline` if given.
    pub fn draw_rect(&mut self, rect: Rect, fill: Option<Color>, outline: Option<LineStyle>) {
        let mode = match (fill.is_some(), outline.is_some()) {
            (true, true) => printpdf::PaintMode::FillStroke,
            (true, false) => printpdf::PaintMode::Fill,
            (false, true) => printpdf::PaintMode::Stroke,
            (false, false) => return,
        };
        if let Some(color) = fill {
            self.set_fill_color(color);
        }
        if let Some(line_style) = outline {
            self.set_outline_thickness(line_style.thickness());
            self.set_outline_color(line_style.color());
        }

        let corners = [
            Position::new(rect.origin.x, rect.origin.y),
            Position::new(rect.right(), rect.origin.y),
            Position::new(rect.right(), rect.bottom()),
            Position::new(rect.origin.x, rect.bottom()),
        ];
        let points = corners
            .iter()
            .map(|pos| printpdf::LinePoint {
                p: self.transform_position(PagePosition(*pos)).into(),
                bezier: false,
            })
            .collect();
        let polygon = printpdf::Polygon {
            rings: vec![printpdf::PolygonRing { points }],
            mode,
            winding_order: printpdf::WindingOrder::NonZero,
        };
        self.ops.push(printpdf::Op::DrawPolygon { polygon });
    }

    /// Draws a line with the given points and the given line style.
    pub fn draw_line<I>(&mut self, points: I, line_style: LineStyle)
    where
        I: IntoIterator<Item = Position>,
    {
        self.set_outline_thickness(line_style.thickness());
        self.set_outline_color(line_style.color());
        let line_points: Vec<_> = points
            .into_iter()
            .map(|pos| printpdf::LinePoint {
                p: self.transform_position(PagePosition(pos)).into(),
                bezier: false,
            })
            .collect();
        let line = printpdf::Line {
            points: line_points,
            is_closed: false,
        };
        self.ops.push(printpdf::Op::DrawLine { line });
    }

    /// Prints a single line of text whose baseline starts at the given position.
    ///
    /// Built-in fonts can only print Windows-1252 characters; for them, the string must have been
    /// checked or converted by the caller (see [`fonts::to_win1252_lossy`][]).
    ///
    /// [`fonts::to_win1252_lossy`]: ../fonts/fn.to_win1252_lossy.html
    pub fn print_str(
        &mut self,
        font: &PageFont,
        font_size: u8,
        color: Color,
        baseline: Position,
        s: &str,
    ) -> Result<(), Error> {
        if font.is_builtin() {
            crate::fonts::encode_win1252(s)?;
        }

        let cursor = self.transform_position(PagePosition(baseline));
        self.ops.push(printpdf::Op::StartTextSection);
        self.ops.push(printpdf::Op::SetTextCursor { pos: cursor.into() });
        self.set_fill_color(color);

        match font.pdf_font() {
            IndirectFontRef::Builtin(builtin) => {
                self.ops.push(printpdf::Op::SetFontSizeBuiltinFont {
                    size: printpdf::Pt(f32::from(font_size)),
                    font: *builtin,
                });
                self.ops.push(printpdf::Op::WriteTextBuiltinFont {
                    items: vec![printpdf::TextItem::Text(s.to_string())],
                    font: *builtin,
                });
            }
            IndirectFontRef::External(id) => {
                let glyph_ids = font
                    .data()
                    .map(|data| data.glyph_ids(s))
                    .unwrap_or_default();
                self.ops.push(printpdf::Op::SetFontSize {
                    size: printpdf::Pt(f32::from(font_size)),
                    font: id.clone(),
                });
                self.ops.push(printpdf::Op::WriteCodepointsWithKerning {
                    font: id.clone(),
                    cpk: glyph_ids
                        .into_iter()
                        .zip(s.chars())
                        .map(|(gid, ch)| (0, gid, ch))
                        .collect(),
                });
            }
        }

        self.ops.push(printpdf::Op::EndTextSection);
        Ok(())
    }

    /// Writes this PDF document to a writer.
    pub fn write(mut self, mut w: impl io::Write) -> Result<(), Error> {
        let mut ops = Vec::with_capacity(self.ops.len() + 2);
        ops.push(printpdf::Op::BeginLayer {
            layer_id: self.layer_id.clone(),
        });
        ops.append(&mut self.ops);
        ops.push(printpdf::Op::EndLayer {
            layer_id: self.layer_id.clone(),
        });
        let page = printpdf::PdfPage::new(self.size.width.into(), self.size.height.into(), ops);
        self.doc.pages.push(page);

        let mut warnings = Vec::new();
        let opts = printpdf::serialize::PdfSaveOptions::default();
        let mut buf = io::BufWriter::new(&mut w);
        self.doc.save_writer(&mut buf, &opts, &mut warnings);
        buf.flush().context("Failed to write the PDF document")?;
        Ok(())
    }

    fn set_fill_color(&mut self, color: Color) {
        if self.fill_color.replace(color) != Some(color) {
            self.ops.push(printpdf::Op::SetFillColor { col: color.into() });
        }
    }

    fn set_outline_thickness(&mut self, thickness: Mm) {
        if self.outline_thickness.replace(thickness) != Some(thickness) {
            self.ops.push(printpdf::Op::SetOutlineThickness {
                pt: printpdf::Pt::from(thickness),
            });
        }
    }

    fn set_outline_color(&mut self, color: Color) {
        if self.outline_color.replace(color) != Some(color) {
            self.ops
                .push(printpdf::Op::SetOutlineColor { col: color.into() });
        }
    }

    /// Transforms the given position that is relative to the upper left corner of the page to a
    /// position that is relative to the lower left corner of the page (as used by `printpdf`).
    fn transform_position(&self, position: PagePosition) -> UserSpacePosition {
        UserSpacePosition::from_page(self.size, position)
    }
}
