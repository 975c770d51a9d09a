// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Loading of fixed-width TrueType/OpenType fonts.
//!
//! Only what is needed to lay out monospace text is read: the em size from
//! the `head` table and the vertical metrics plus the maximum advance from the
//! `hhea` table. For a monospace font the maximum advance is the advance of
//! every glyph.

use std::fs;
use std::path::{Path, PathBuf};

use crate::binary::{i16_be, u16_be, u32_be};

const SFNT_TRUETYPE: u32 = 0x0001_0000;
const SFNT_OPENTYPE: u32 = u32::from_be_bytes(*b"OTTO");
const SFNT_APPLE: u32 = u32::from_be_bytes(*b"true");
const HEAD_MAGIC: u32 = 0x5F0F_3CF5;

const TABLE_DIRECTORY_OFFSET: usize = 12;
const TABLE_RECORD_SIZE: usize = 16;

/// Errors raised while loading a font.
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    /// The font file could not be read.
    #[error("unable to read font file {path}: {source}")]
    Io {
        /// The offending path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The data does not start with a known sfnt version tag.
    #[error("not a TrueType/OpenType font (version tag {0:#010x})")]
    NotSfnt(u32),
    /// A required table is absent from the table directory.
    #[error("font has no '{0}' table")]
    MissingTable(&'static str),
    /// A structure extends past the end of the data.
    #[error("font data is truncated in {0}")]
    Truncated(&'static str),
    /// The `head` table is malformed.
    #[error("invalid 'head' table: {0}")]
    InvalidHead(&'static str),
}

/// Pixel metrics of a monospace font at a given point size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    /// Horizontal distance between consecutive glyph origins.
    pub advance: f32,
    /// Distance between consecutive baselines.
    pub line_height: f32,
    /// Distance from the top of a line to its baseline.
    pub ascent: f32,
}

impl FontMetrics {
    /// Approximate metrics used when no font could be loaded.
    pub fn fallback(point_size: f32) -> Self {
        Self {
            advance: point_size * 0.6,
            line_height: point_size * 1.2,
            ascent: point_size,
        }
    }

    /// Size of the box covering `text` on a single line.
    pub fn measure(&self, text: &str) -> (f32, f32) {
        (self.advance * text.chars().count() as f32, self.line_height)
    }
}

/// A fixed-width font loaded at one point size.
#[derive(Debug, Clone)]
pub struct MonoFont {
    point_size: f32,
    units_per_em: u16,
    ascender: i16,
    descender: i16,
    line_gap: i16,
    advance_width_max: u16,
}

impl MonoFont {
    /// Reads and parses the font at `path`.
    pub fn load_from_file(path: impl AsRef<Path>, point_size: f32) -> Result<Self, FontError> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let font = Self::from_bytes(&data, point_size)?;
        log::debug!(
            "loaded font {} ({} units/em, advance {:.1}px at {}pt)",
            path.display(),
            font.units_per_em,
            font.metrics().advance,
            point_size
        );
        Ok(font)
    }

    /// Parses an in-memory sfnt font.
    pub fn from_bytes(data: &[u8], point_size: f32) -> Result<Self, FontError> {
        let version = u32_be(data, 0).ok_or(FontError::Truncated("sfnt header"))?;
        if !matches!(version, SFNT_TRUETYPE | SFNT_OPENTYPE | SFNT_APPLE) {
            return Err(FontError::NotSfnt(version));
        }

        let head = find_table(data, b"head")?;
        if u32_be(head, 12) != Some(HEAD_MAGIC) {
            return Err(FontError::InvalidHead("bad magic number"));
        }
        let units_per_em = u16_be(head, 18).ok_or(FontError::Truncated("head"))?;
        // Valid range per the OpenType 'head' definition.
        if !(16..=16384).contains(&units_per_em) {
            return Err(FontError::InvalidHead("unitsPerEm out of range"));
        }

        let hhea = find_table(data, b"hhea")?;
        let truncated = || FontError::Truncated("hhea");
        Ok(Self {
            point_size,
            units_per_em,
            ascender: i16_be(hhea, 4).ok_or_else(truncated)?,
            descender: i16_be(hhea, 6).ok_or_else(truncated)?,
            line_gap: i16_be(hhea, 8).ok_or_else(truncated)?,
            advance_width_max: u16_be(hhea, 10).ok_or_else(truncated)?,
        })
    }

    /// The point size the font was loaded at.
    pub fn point_size(&self) -> f32 {
        self.point_size
    }

    /// Pixel metrics at the loaded point size.
    pub fn metrics(&self) -> FontMetrics {
        let scale = self.point_size / f32::from(self.units_per_em);
        let ascent = f32::from(self.ascender) * scale;
        let descent = f32::from(self.descender) * scale;
        FontMetrics {
            advance: f32::from(self.advance_width_max) * scale,
            line_height: ascent - descent + f32::from(self.line_gap) * scale,
            ascent,
        }
    }
}

/// Returns the bytes of the table tagged `tag`.
fn find_table<'a>(data: &'a [u8], tag: &'static [u8; 4]) -> Result<&'a [u8], FontError> {
    let name = name_for(tag);
    let table_count = u16_be(data, 4).ok_or(FontError::Truncated("sfnt header"))?;

    for index in 0..usize::from(table_count) {
        let record = TABLE_DIRECTORY_OFFSET + index * TABLE_RECORD_SIZE;
        let record_tag = data
            .get(record..record + 4)
            .ok_or(FontError::Truncated("table directory"))?;
        if record_tag != tag {
            continue;
        }
        let offset = u32_be(data, record + 8).ok_or(FontError::Truncated("table directory"))?;
        let length = u32_be(data, record + 12).ok_or(FontError::Truncated("table directory"))?;
        let start = offset as usize;
        let end = start
            .checked_add(length as usize)
            .ok_or(FontError::Truncated(name))?;
        return data.get(start..end).ok_or(FontError::Truncated(name));
    }
    log::trace!("table '{name}' not found among {table_count} tables");
    Err(FontError::MissingTable(name))
}

fn name_for(tag: &[u8; 4]) -> &'static str {
    match tag {
        b"head" => "head",
        b"hhea" => "hhea",
        _ => "table",
    }
}
