// Copyright (c) 2026 Ronan Le Meillat - SCTG Development
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Licensed under the MIT License or the Apache License, Version 2.0

//! The catalog page composer.
//!
//! A page is drawn by a fixed sequence of independent steps: the header, one step per photo and
//! the footer.  Every step reports a [`StepOutcome`][].  A step that fails logs a warning, draws
//! a marker in place of the missing content where possible and lets the next step run, so a
//! broken photo or an unencodable link never prevents the page from being written.  Only
//! creating and writing the output file can make [`Composer::compose`][] fail.
//!
//! The footer is drawn last so that photo content can never cover it.
//!
//! [`StepOutcome`]: enum.StepOutcome.html
//! [`Composer::compose`]: struct.Composer.html#method.compose

use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::{CatalogStyle, LayoutConfig};
use crate::error::{Context as _, Error, ErrorKind};
use crate::fonts::{self, PageFont};
use crate::layout::{self, GridLayout};
use crate::qr::{self, CodeOptions};
use crate::render::Renderer;
use crate::request::CatalogRequest;
use crate::style::{Color, LineStyle};
use crate::{Mm, Position};

/// Smallest font size the title is shrunk to when it does not fit into the banner.
const MIN_TITLE_FONT_SIZE: u8 = 12;
/// Smallest font size the header label is shrunk to while it still fits beside the title.
const MIN_LABEL_FONT_SIZE: u8 = 6;
/// Horizontal padding inside the banner.
const BANNER_PADDING: Mm = Mm(5.0);
/// Distance from the bottom of the banner to the baseline of the secondary label.
const LABEL_BOTTOM_GAP: Mm = Mm(3.0);
/// Thickness of the separator line below the banner.
const SEPARATOR_THICKNESS: Mm = Mm(0.5);
/// Thickness of the footer box outline.
const FOOTER_BORDER_THICKNESS: Mm = Mm(0.3);

/// A section of the catalog page, drawn by one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    /// The title banner, the secondary label and the separator line.
    Header,
    /// The photo with the given index, with its frame and shadow.
    Photo(usize),
    /// The footer box with the QR code and its caption.
    Footer,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Header => f.write_str("header"),
            Section::Photo(index) => write!(f, "photo {}", index + 1),
            Section::Footer => f.write_str("footer"),
        }
    }
}

/// The result of drawing one section.
#[derive(Clone, Debug, PartialEq)]
pub enum StepOutcome {
    /// The section was drawn completely.
    Rendered,
    /// The section could not be drawn completely.
    Degraded {
        /// Description of the failure.
        reason: String,
        /// Whether a visible marker was drawn in place of the missing content.
        marker: bool,
    },
}

impl StepOutcome {
    /// Returns `true` if the section was drawn completely.
    pub fn is_rendered(&self) -> bool {
        matches!(self, StepOutcome::Rendered)
    }
}

/// The result of a successful composition.
#[derive(Clone, Debug)]
pub struct Composition {
    path: PathBuf,
    steps: Vec<(Section, StepOutcome)>,
}

impl Composition {
    /// The path of the written file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The outcome of every step, in drawing order.
    pub fn steps(&self) -> &[(Section, StepOutcome)] {
        &self.steps
    }

    /// Returns the outcome of the step that drew the given section.
    pub fn outcome(&self, section: Section) -> Option<&StepOutcome> {
        self.steps
            .iter()
            .find(|(s, _)| *s == section)
            .map(|(_, outcome)| outcome)
    }

    /// Returns the sections that could not be drawn completely.
    pub fn degraded(&self) -> impl Iterator<Item = Section> + '_ {
        self.steps
            .iter()
            .filter(|(_, outcome)| !outcome.is_rendered())
            .map(|(section, _)| *section)
    }
}

/// Composes catalog pages.
///
/// # Example
///
/// ```no_run
/// use diy_catalog::{CatalogRequest, Composer};
///
/// let request = CatalogRequest::new("My Bench", "https://youtu.be/xxxx", vec!["bench.jpg"])
///     .expect("valid request");
/// let composition = Composer::new().compose_with_report(&request).expect("written");
/// for section in composition.degraded() {
///     eprintln!("{} is incomplete", section);
/// }
/// ```
#[derive(Clone, Debug, Default)]
pub struct Composer {
    layout: LayoutConfig,
    style: CatalogStyle,
    code_options: CodeOptions,
}

/// State shared by the steps of one composition.
struct Page<'a> {
    renderer: Renderer,
    font: PageFont,
    request: &'a CatalogRequest,
}

impl Composer {
    /// Creates a composer with the default A4 layout and style.
    pub fn new() -> Composer {
        Composer::default()
    }

    /// Creates a composer with the given layout and style.
    pub fn with_config(layout: LayoutConfig, style: CatalogStyle) -> Composer {
        Composer {
            layout,
            style,
            code_options: CodeOptions::default(),
        }
    }

    /// Sets the options used to rasterize the QR code.
    pub fn with_code_options(mut self, code_options: CodeOptions) -> Composer {
        self.code_options = code_options;
        self
    }

    /// The layout used by this composer.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// The style used by this composer.
    pub fn style(&self) -> &CatalogStyle {
        &self.style
    }

    /// Composes the page and writes it to the output path of the request.
    ///
    /// Returns the path of the written file: the file name joined with the output directory if
    /// one was given, or the bare file name otherwise.
    pub fn compose(&self, request: &CatalogRequest) -> Result<PathBuf, Error> {
        self.compose_with_report(request)
            .map(|composition| composition.path)
    }

    /// Composes the page like [`compose`][], but also returns the outcome of every step.
    ///
    /// [`compose`]: #method.compose
    pub fn compose_with_report(&self, request: &CatalogRequest) -> Result<Composition, Error> {
        let (renderer, steps) = self.draw(request)?;
        let path = request.prepare_output_path()?;
        write_file(&path, |buf| renderer.write(buf))?;
        tracing::info!("Catalog written to {}", path.display());
        Ok(Composition { path, steps })
    }

    /// Composes the page and writes it to the given writer.
    pub fn render(
        &self,
        request: &CatalogRequest,
        w: impl io::Write,
    ) -> Result<Vec<(Section, StepOutcome)>, Error> {
        let (renderer, steps) = self.draw(request)?;
        renderer.write(w)?;
        Ok(steps)
    }

    fn draw(
        &self,
        request: &CatalogRequest,
    ) -> Result<(Renderer, Vec<(Section, StepOutcome)>), Error> {
        request.validate()?;
        let count = request.photos().len();
        let grid = GridLayout::new(&self.layout, count)?;

        let mut renderer = Renderer::new(self.layout.page_size(), request.title())?;
        let font = PageFont::load_or_builtin(&mut renderer, self.style.font_path.as_deref());
        let mut page = Page {
            renderer,
            font,
            request,
        };

        let mut steps = Vec::with_capacity(count + 2);
        let outcome = self.draw_header(&mut page);
        steps.push(self.finish_step(Section::Header, outcome, false));

        tracing::debug!(
            "Laying out {} photos in bands of {:?}",
            count,
            grid.band()
        );
        for index in 0..count {
            let outcome = self.draw_photo(&mut page, &grid, index);
            let marker = outcome.is_err() && self.draw_photo_marker(&mut page, &grid, index);
            steps.push(self.finish_step(Section::Photo(index), outcome, marker));
        }

        let (outcome, marker) = self.draw_footer(&mut page);
        steps.push(self.finish_step(Section::Footer, outcome, marker));

        Ok((page.renderer, steps))
    }

    fn finish_step(
        &self,
        section: Section,
        result: Result<(), Error>,
        marker: bool,
    ) -> (Section, StepOutcome) {
        let outcome = match result {
            Ok(()) => StepOutcome::Rendered,
            Err(err) => {
                tracing::warn!("Could not draw the {}: {}", section, err);
                StepOutcome::Degraded {
                    reason: err.to_string(),
                    marker,
                }
            }
        };
        (section, outcome)
    }

    fn draw_header(&self, page: &mut Page<'_>) -> Result<(), Error> {
        let request = page.request;
        let banner = layout::banner_rect(&self.layout);
        page.renderer
            .draw_rect(banner, Some(self.style.banner_color), None);

        let title = printable(&page.font, request.title());
        let max_width = banner.size.width - BANNER_PADDING * 2.0;
        let size = page.font.fit_font_size(
            &title,
            self.style.title_font_size,
            MIN_TITLE_FONT_SIZE.min(self.style.title_font_size),
            max_width,
        );
        let ascent = page.font.ascent(size);
        let top = banner.origin.y + (banner.size.height - ascent) / 2.0;
        let center = banner.origin.x + banner.size.width / 2.0;
        print_centered(
            page,
            size,
            self.style.title_color,
            center,
            top,
            &title,
        )?;

        if let Some(label) = request.label() {
            let label = printable(&page.font, label);
            // the label ends at the right padding and must not reach into the centered title
            let title_right = center + page.font.text_width(&title, size) / 2.0;
            let beside_title = banner.right() - BANNER_PADDING - title_right - BANNER_PADDING;
            let size = label_font_size(
                &page.font,
                &label,
                self.style.label_font_size,
                beside_title,
                max_width,
            );
            let width = page.font.text_width(&label, size);
            let baseline = Position::new(
                banner.right() - BANNER_PADDING - width,
                banner.bottom() - LABEL_BOTTOM_GAP,
            );
            page.renderer.print_str(
                &page.font,
                size,
                self.style.label_color,
                baseline,
                &label,
            )?;
        }

        let y = self.layout.separator_y();
        page.renderer.draw_line(
            vec![
                Position::new(self.layout.side_margin, y),
                Position::new(self.layout.page_width - self.layout.side_margin, y),
            ],
            LineStyle::new()
                .with_thickness(SEPARATOR_THICKNESS)
                .with_color(self.style.separator_color),
        );
        Ok(())
    }

    fn draw_photo(
        &self,
        page: &mut Page<'_>,
        grid: &GridLayout<'_>,
        index: usize,
    ) -> Result<(), Error> {
        let request = page.request;
        let photo = &request.photos()[index];
        let raster = photo.load()?;
        let placed = grid.place(index, raster.intrinsic_size()).ok_or_else(|| {
            Error::new(
                format!("Image {} has a degenerate size", photo),
                ErrorKind::InvalidRequest,
            )
        })?;
        let (px_width, px_height) = raster.pixel_size();
        let handle = page
            .renderer
            .add_image(raster.encoded(), px_width, px_height)?;

        tracing::debug!(
            "Placing {} at {:?} with size {:?}",
            photo,
            placed.position,
            placed.size
        );
        page.renderer.draw_rect(
            placed.shadow(&self.layout, grid.count()),
            Some(self.style.shadow_color),
            None,
        );
        page.renderer
            .draw_rect(placed.frame(&self.layout), Some(Color::WHITE), None);
        page.renderer.place_image(&handle, placed.rect());
        Ok(())
    }

    /// Draws the inline error marker for a photo that could not be drawn, if its slot starts
    /// above the cutoff.  Returns whether the marker was drawn.
    fn draw_photo_marker(&self, page: &mut Page<'_>, grid: &GridLayout<'_>, index: usize) -> bool {
        let origin = grid.slot_origin(index);
        if origin.y >= self.layout.error_label_cutoff {
            return false;
        }
        let size = self.style.marker_font_size;
        let text = format!("photo {} error", index + 1);
        let baseline = Position::new(origin.x, origin.y + page.font.ascent(size));
        match page
            .renderer
            .print_str(&page.font, size, self.style.error_color, baseline, &text)
        {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!("Could not draw the error marker for photo {}: {}", index + 1, err);
                false
            }
        }
    }

    fn draw_footer(&self, page: &mut Page<'_>) -> (Result<(), Error>, bool) {
        page.renderer.draw_rect(
            layout::footer_rect(&self.layout),
            Some(self.style.footer_fill),
            Some(
                LineStyle::new()
                    .with_thickness(FOOTER_BORDER_THICKNESS)
                    .with_color(self.style.footer_border),
            ),
        );

        let center = self.layout.page_width / 2.0;
        let caption_top = layout::caption_top(&self.layout);
        match self.draw_code(page) {
            Ok(()) => {
                let caption = printable(&page.font, &self.style.code_caption);
                let result = print_centered(
                    page,
                    self.style.caption_font_size,
                    self.style.caption_color,
                    center,
                    caption_top,
                    &caption,
                );
                (result, false)
            }
            Err(err) => {
                let caption = printable(&page.font, &self.style.code_error_caption);
                let size = self.style.caption_font_size;
                let code = layout::code_rect(&self.layout);
                let top = code.origin.y + (code.size.height - page.font.ascent(size)) / 2.0;
                let marker = match print_centered(
                    page,
                    size,
                    self.style.error_color,
                    center,
                    top,
                    &caption,
                ) {
                    Ok(()) => true,
                    Err(caption_err) => {
                        tracing::warn!("Could not draw the QR code failure caption: {}", caption_err);
                        false
                    }
                };
                (Err(err), marker)
            }
        }
    }

    fn draw_code(&self, page: &mut Page<'_>) -> Result<(), Error> {
        let raster = qr::generate(page.request.link(), &self.code_options)?;
        let (px_width, px_height) = raster.pixel_size();
        let handle = page
            .renderer
            .add_image(raster.encoded(), px_width, px_height)?;

        let code = layout::code_rect(&self.layout);
        page.renderer
            .draw_rect(code.expand(self.layout.code_padding), Some(Color::WHITE), None);
        page.renderer.place_image(&handle, code);
        Ok(())
    }
}

/// Serializes the document into memory and only then writes it to `path`, so a failed
/// serialization never leaves a truncated file behind.
fn write_file(
    path: &Path,
    serialize: impl FnOnce(&mut Vec<u8>) -> Result<(), Error>,
) -> Result<(), Error> {
    let mut buf = Vec::new();
    serialize(&mut buf)?;
    fs::write(path, &buf)
        .with_context(|| format!("Could not write output file {}", path.display()))
}

/// Prints a line of text horizontally centered on `center`, with the top of its tallest glyphs at
/// `top`.
fn print_centered(
    page: &mut Page<'_>,
    font_size: u8,
    color: Color,
    center: Mm,
    top: Mm,
    text: &str,
) -> Result<(), Error> {
    let width = page.font.text_width(text, font_size);
    let baseline = Position::new(center - width / 2.0, top + page.font.ascent(font_size));
    page.renderer
        .print_str(&page.font, font_size, color, baseline, text)
}

/// Picks the font size of the header label: the largest size down to
/// [`MIN_LABEL_FONT_SIZE`][] that fits beside the title, or else the largest that fits into the
/// banner.
///
/// [`MIN_LABEL_FONT_SIZE`]: constant.MIN_LABEL_FONT_SIZE.html
fn label_font_size(
    font: &PageFont,
    label: &str,
    font_size: u8,
    beside_title: Mm,
    banner_width: Mm,
) -> u8 {
    let min_size = MIN_LABEL_FONT_SIZE.min(font_size);
    let size = font.fit_font_size(label, font_size, min_size, beside_title);
    if font.text_width(label, size) <= beside_title {
        size
    } else {
        font.fit_font_size(label, font_size, 1, banner_width)
    }
}

/// Replaces the characters a built-in font cannot print.
fn printable<'s>(font: &PageFont, s: &'s str) -> Cow<'s, str> {
    if !font.is_builtin() {
        return Cow::Borrowed(s);
    }
    let lossy = fonts::to_win1252_lossy(s);
    if lossy == s {
        Cow::Borrowed(s)
    } else {
        tracing::warn!(
            "The built-in font cannot print all characters of {:?}, printing {:?} instead",
            s,
            lossy
        );
        Cow::Owned(lossy)
    }
}
