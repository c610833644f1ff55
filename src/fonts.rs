// Copyright (c) 2026 Ronan Le Meillat - SCTG Development
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Licensed under the MIT License or the Apache License, Version 2.0

//! Fonts for the catalog page.
//!
//! A page uses a single font for all of its text.  If the configured TrueType font can be read
//! and parsed, it is embedded into the document; otherwise the built-in Helvetica font is used.
//! Built-in fonts only support the Windows-1252 character set, so other characters are replaced.

use std::fs;
use std::path::Path;

use crate::error::{Context as _, Error, ErrorKind};
use crate::render::{IndirectFontRef, Renderer};
use crate::Mm;

/// Advance widths of the printable ASCII characters of Helvetica, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

const HELVETICA_DEFAULT_WIDTH: u16 = 556;
const HELVETICA_ASCENT: f32 = 0.718;

/// Raw data of a TrueType font that has been checked to be parseable.
#[derive(Clone, Debug)]
pub struct FontData {
    raw: Vec<u8>,
}

impl FontData {
    /// Wraps the given font data after making sure that it can be parsed.
    pub fn new(raw: Vec<u8>) -> Result<FontData, Error> {
        ttf_parser::Face::parse(&raw, 0).map_err(|err| {
            Error::new(
                format!("Failed to parse font data: {}", err),
                ErrorKind::InvalidFont,
            )
        })?;
        Ok(FontData { raw })
    }

    /// Reads and checks the font file at the given path.
    pub fn load(path: impl AsRef<Path>) -> Result<FontData, Error> {
        let path = path.as_ref();
        let raw = fs::read(path)
            .with_context(|| format!("Failed to read font file {}", path.display()))?;
        FontData::new(raw)
    }

    /// Returns the raw font data.
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    // Parsing is validated in FontData::new, so this only returns None for data that was
    // never checked.
    fn face(&self) -> Option<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.raw, 0).ok()
    }

    fn scale(face: &ttf_parser::Face<'_>, font_size: u8) -> f32 {
        f32::from(font_size) / f32::from(face.units_per_em().max(1))
    }

    /// Returns the glyph IDs for the given characters, using glyph 0 for missing characters.
    pub fn glyph_ids(&self, s: &str) -> Vec<u16> {
        match self.face() {
            Some(face) => s
                .chars()
                .map(|c| face.glyph_index(c).map(|id| id.0).unwrap_or(0))
                .collect(),
            None => vec![0; s.chars().count()],
        }
    }

    fn text_width(&self, s: &str, font_size: u8) -> Mm {
        let face = match self.face() {
            Some(face) => face,
            None => return Mm(0.0),
        };
        let scale = FontData::scale(&face, font_size);
        let units: u32 = s
            .chars()
            .map(|c| {
                face.glyph_index(c)
                    .and_then(|id| face.glyph_hor_advance(id))
                    .map(u32::from)
                    .unwrap_or(0)
            })
            .sum();
        Mm::from(printpdf::Pt(units as f32 * scale))
    }

    fn ascent(&self, font_size: u8) -> Mm {
        match self.face() {
            Some(face) => {
                let scale = FontData::scale(&face, font_size);
                Mm::from(printpdf::Pt(f32::from(face.ascender()) * scale))
            }
            None => Mm(0.0),
        }
    }
}

/// The font used for all text of a page, registered with a renderer.
#[derive(Clone, Debug)]
pub struct PageFont {
    data: Option<FontData>,
    pdf_font: IndirectFontRef,
}

impl PageFont {
    /// Returns the built-in Helvetica font.
    pub fn builtin() -> PageFont {
        PageFont {
            data: None,
            pdf_font: IndirectFontRef::Builtin(printpdf::BuiltinFont::Helvetica),
        }
    }

    /// Embeds the given font into the renderer's document.
    pub fn embed(renderer: &mut Renderer, data: FontData) -> Result<PageFont, Error> {
        let pdf_font = renderer.add_embedded_font(data.as_bytes())?;
        Ok(PageFont {
            data: Some(data),
            pdf_font,
        })
    }

    /// Loads the font at the given path and embeds it, falling back to Helvetica if there is no
    /// path or if the font cannot be loaded.
    ///
    /// A failed load is not an error: it is logged and the built-in font is used instead.
    pub fn load_or_builtin(renderer: &mut Renderer, path: Option<&Path>) -> PageFont {
        let path = match path {
            Some(path) => path,
            None => return PageFont::builtin(),
        };
        match FontData::load(path).and_then(|data| PageFont::embed(renderer, data)) {
            Ok(font) => {
                tracing::debug!("Embedded font {}", path.display());
                font
            }
            Err(err) => {
                tracing::warn!("Could not load font {}: {}", path.display(), err);
                tracing::warn!("Falling back to the built-in Helvetica font");
                PageFont::builtin()
            }
        }
    }

    /// Returns `true` if this is a built-in PDF font.
    pub fn is_builtin(&self) -> bool {
        self.data.is_none()
    }

    /// Returns the PDF font reference.
    pub fn pdf_font(&self) -> &IndirectFontRef {
        &self.pdf_font
    }

    /// Returns the embedded font data, if any.
    pub fn data(&self) -> Option<&FontData> {
        self.data.as_ref()
    }

    /// Returns the width of the given string when printed with the given font size.
    pub fn text_width(&self, s: &str, font_size: u8) -> Mm {
        match &self.data {
            Some(data) => data.text_width(s, font_size),
            None => {
                let units: u32 = s.chars().map(|c| u32::from(helvetica_width(c))).sum();
                Mm::from(printpdf::Pt(units as f32 * f32::from(font_size) / 1000.0))
            }
        }
    }

    /// Returns the distance between the baseline and the top of the tallest glyphs.
    pub fn ascent(&self, font_size: u8) -> Mm {
        match &self.data {
            Some(data) => data.ascent(font_size),
            None => Mm::from(printpdf::Pt(HELVETICA_ASCENT * f32::from(font_size))),
        }
    }

    /// Returns the largest font size not above `font_size` and not below `min_size` for which
    /// `s` fits into `max_width`.
    pub fn fit_font_size(&self, s: &str, font_size: u8, min_size: u8, max_width: Mm) -> u8 {
        let mut size = font_size;
        while size > min_size && self.text_width(s, size) > max_width {
            size -= 1;
        }
        size
    }
}

fn helvetica_width(c: char) -> u16 {
    match c as u32 {
        0x20..=0x7E => HELVETICA_WIDTHS[(c as u32 - 0x20) as usize],
        _ => HELVETICA_DEFAULT_WIDTH,
    }
}

/// Maps a character to its Windows-1252 byte, if there is one.
fn win1252_byte(c: char) -> Option<u8> {
    match c as u32 {
        0x00..=0x7F => Some(c as u8),
        0xA0..=0xFF => Some(c as u8),
        0x20AC => Some(0x80),
        0x201A => Some(0x82),
        0x0192 => Some(0x83),
        0x201E => Some(0x84),
        0x2026 => Some(0x85),
        0x2020 => Some(0x86),
        0x2021 => Some(0x87),
        0x02C6 => Some(0x88),
        0x2030 => Some(0x89),
        0x0160 => Some(0x8A),
        0x2039 => Some(0x8B),
        0x0152 => Some(0x8C),
        0x017D => Some(0x8E),
        0x2018 => Some(0x91),
        0x2019 => Some(0x92),
        0x201C => Some(0x93),
        0x201D => Some(0x94),
        0x2022 => Some(0x95),
        0x2013 => Some(0x96),
        0x2014 => Some(0x97),
        0x02DC => Some(0x98),
        0x2122 => Some(0x99),
        0x0161 => Some(0x9A),
        0x203A => Some(0x9B),
        0x0153 => Some(0x9C),
        0x017E => Some(0x9E),
        0x0178 => Some(0x9F),
        _ => None,
    }
}

/// Encodes the given string using the Windows-1252 encoding for use with built-in PDF fonts,
/// returning an error if it contains unsupported characters.
pub fn encode_win1252(s: &str) -> Result<Vec<u8>, Error> {
    s.chars()
        .map(|c| {
            win1252_byte(c).ok_or_else(|| {
                Error::new(
                    format!(
                        "Tried to print a string with characters that are not supported by the \
                         Windows-1252 encoding with a built-in font: {}",
                        s
                    ),
                    ErrorKind::UnsupportedEncoding,
                )
            })
        })
        .collect()
}

/// Replaces all characters that a built-in font cannot print with `?`.
pub fn to_win1252_lossy(s: &str) -> String {
    s.chars()
        .map(|c| if win1252_byte(c).is_some() { c } else { '?' })
        .collect()
}
