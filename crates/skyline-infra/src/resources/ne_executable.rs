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

//! Resource extraction from 16-bit Windows (NE) executables.
//!
//! An NE file starts with a DOS `MZ` stub whose `e_lfanew` field points at the
//! `NE` header. The header locates the resource table, which is a shift count
//! followed by one `TYPEINFO` block per resource type, each listing its
//! resources as `NAMEINFO` entries. Offsets and lengths are expressed in
//! units of `1 << shift` bytes. Type and resource identifiers are integers
//! when their high bit is set, otherwise offsets of length-prefixed names
//! relative to the start of the resource table.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use skyline_core::platform::ResourceArchive;

use crate::binary::{u16_le, u32_le, u8_at};

const MZ_MAGIC: &[u8; 2] = b"MZ";
const NE_MAGIC: &[u8; 2] = b"NE";
const E_LFANEW_OFFSET: usize = 0x3C;
const RESOURCE_TABLE_FIELD: usize = 0x24;
const RESIDENT_NAMES_FIELD: usize = 0x26;
const TYPEINFO_SIZE: usize = 8;
const NAMEINFO_SIZE: usize = 12;
const INTEGER_ID_FLAG: u16 = 0x8000;
const MAX_ALIGNMENT_SHIFT: u16 = 15;
const BITMAP_FILE_HEADER_SIZE: usize = 14;

/// Errors raised while reading an NE executable.
#[derive(Debug, thiserror::Error)]
pub enum NeError {
    /// The file could not be read.
    #[error("unable to read {path}: {source}")]
    Io {
        /// The offending path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The DOS stub signature is missing.
    #[error("missing MZ signature")]
    NotMz,
    /// `e_lfanew` does not point at an `NE` header.
    #[error("no NE header at offset {0:#x}")]
    NotNe(usize),
    /// A structure extends past the end of the file.
    #[error("truncated {0}")]
    Truncated(&'static str),
    /// The resource alignment shift cannot be applied.
    #[error("invalid resource alignment shift {0}")]
    BadAlignment(u16),
}

/// The type of an NE resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceType {
    /// `RT_CURSOR`.
    Cursor,
    /// `RT_BITMAP`.
    Bitmap,
    /// `RT_ICON`.
    Icon,
    /// `RT_MENU`.
    Menu,
    /// `RT_DIALOG`.
    Dialog,
    /// `RT_STRING`.
    StringTable,
    /// `RT_FONTDIR`.
    FontDirectory,
    /// `RT_FONT`.
    Font,
    /// `RT_ACCELERATOR`.
    Accelerator,
    /// `RT_RCDATA`.
    RawData,
    /// `RT_GROUP_CURSOR`.
    CursorGroup,
    /// `RT_GROUP_ICON`.
    IconGroup,
    /// `RT_VERSION`.
    Version,
    /// An application-defined integer type (flag bit stripped).
    Custom(u16),
    /// An application-defined named type.
    Named(String),
}

impl ResourceType {
    /// Maps an integer type identifier (flag bit already stripped).
    pub fn from_id(id: u16) -> Self {
        match id {
            1 => Self::Cursor,
            2 => Self::Bitmap,
            3 => Self::Icon,
            4 => Self::Menu,
            5 => Self::Dialog,
            6 => Self::StringTable,
            7 => Self::FontDirectory,
            8 => Self::Font,
            9 => Self::Accelerator,
            10 => Self::RawData,
            12 => Self::CursorGroup,
            14 => Self::IconGroup,
            16 => Self::Version,
            other => Self::Custom(other),
        }
    }

    /// Name of the directory this type is dumped into.
    pub fn directory_name(&self) -> String {
        match self {
            Self::Cursor => "cursor".into(),
            Self::Bitmap => "bitmap".into(),
            Self::Icon => "icon".into(),
            Self::Menu => "menu".into(),
            Self::Dialog => "dialog".into(),
            Self::StringTable => "string".into(),
            Self::FontDirectory => "fontdir".into(),
            Self::Font => "font".into(),
            Self::Accelerator => "accelerator".into(),
            Self::RawData => "rcdata".into(),
            Self::CursorGroup => "group_cursor".into(),
            Self::IconGroup => "group_icon".into(),
            Self::Version => "version".into(),
            Self::Custom(id) => format!("type_{id:#06x}"),
            Self::Named(name) => sanitize(name),
        }
    }

    /// File extension used when dumping a resource of this type.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Bitmap => "bmp",
            _ => "bin",
        }
    }
}

/// The identifier of a resource within its type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceId {
    /// An integer identifier (flag bit stripped).
    Integer(u16),
    /// A named identifier.
    Name(String),
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Integer(id) => write!(f, "{id}"),
            ResourceId::Name(name) => f.write_str(name),
        }
    }
}

/// One resource entry: where its bytes live in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeResource {
    /// The resource type.
    pub kind: ResourceType,
    /// The resource identifier.
    pub id: ResourceId,
    /// Absolute file offset of the data.
    pub offset: usize,
    /// Length of the data in bytes.
    pub length: usize,
}

/// A parsed NE executable and its resource index.
#[derive(Debug, Default)]
pub struct NeExecutable {
    path: Option<PathBuf>,
    data: Vec<u8>,
    resources: Vec<NeResource>,
}

impl NeExecutable {
    /// Creates an empty, unloaded archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and indexes the executable at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, NeError> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|source| NeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut executable = Self::parse(data)?;
        executable.path = Some(path.to_path_buf());
        Ok(executable)
    }

    /// Indexes an in-memory executable image.
    pub fn parse(data: Vec<u8>) -> Result<Self, NeError> {
        if data.get(..2) != Some(MZ_MAGIC.as_slice()) {
            return Err(NeError::NotMz);
        }
        let ne = u32_le(&data, E_LFANEW_OFFSET).ok_or(NeError::Truncated("MZ header"))? as usize;
        if data.get(ne..ne.saturating_add(2)) != Some(NE_MAGIC.as_slice()) {
            return Err(NeError::NotNe(ne));
        }

        let table_field = u16_le(&data, ne + RESOURCE_TABLE_FIELD).ok_or(NeError::Truncated("NE header"))?;
        let names_field = u16_le(&data, ne + RESIDENT_NAMES_FIELD).ok_or(NeError::Truncated("NE header"))?;
        let resources = if table_field == names_field {
            log::debug!("NE executable has no resource table");
            Vec::new()
        } else {
            parse_resource_table(&data, ne + usize::from(table_field))?
        };

        Ok(Self {
            path: None,
            data,
            resources,
        })
    }

    /// The path this archive was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Every indexed resource, in table order.
    pub fn resources(&self) -> &[NeResource] {
        &self.resources
    }

    /// Looks up a resource by type and identifier.
    pub fn find(&self, kind: &ResourceType, id: &ResourceId) -> Option<&NeResource> {
        self.resources
            .iter()
            .find(|resource| &resource.kind == kind && &resource.id == id)
    }

    /// The raw bytes of `resource`.
    pub fn resource_data(&self, resource: &NeResource) -> &[u8] {
        self.data
            .get(resource.offset..resource.offset + resource.length)
            .unwrap_or_default()
    }

    /// The bytes written when dumping `resource`.
    ///
    /// Bitmaps are stored as bare DIBs; they get a `BITMAPFILEHEADER` so the
    /// result is a valid `.bmp` file.
    pub fn export(&self, resource: &NeResource) -> Vec<u8> {
        let raw = self.resource_data(resource);
        if resource.kind == ResourceType::Bitmap {
            wrap_bitmap(raw)
        } else {
            raw.to_vec()
        }
    }
}

impl ResourceArchive for NeExecutable {
    fn load(&mut self, path: &Path) -> anyhow::Result<()> {
        *self = Self::new();
        *self = Self::open(path)?;
        log::info!(
            "loaded {} resources from {}",
            self.resources.len(),
            path.display()
        );
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.path.is_some()
    }

    fn dump(&self, output_dir: &Path) -> anyhow::Result<usize> {
        anyhow::ensure!(self.is_loaded(), "no executable loaded");
        let mut written = 0;
        for resource in &self.resources {
            let dir = output_dir.join(resource.kind.directory_name());
            fs::create_dir_all(&dir)
                .with_context(|| format!("unable to create {}", dir.display()))?;
            let file = dir.join(format!(
                "{}.{}",
                sanitize(&resource.id.to_string()),
                resource.kind.extension()
            ));
            fs::write(&file, self.export(resource))
                .with_context(|| format!("unable to write {}", file.display()))?;
            log::trace!("dumped {}", file.display());
            written += 1;
        }
        log::info!("dumped {written} resources to {}", output_dir.display());
        Ok(written)
    }
}

fn parse_resource_table(data: &[u8], table: usize) -> Result<Vec<NeResource>, NeError> {
    let shift = u16_le(data, table).ok_or(NeError::Truncated("resource table"))?;
    if shift > MAX_ALIGNMENT_SHIFT {
        return Err(NeError::BadAlignment(shift));
    }

    let mut resources = Vec::new();
    let mut cursor = table + 2;
    loop {
        let type_id = u16_le(data, cursor).ok_or(NeError::Truncated("TYPEINFO"))?;
        if type_id == 0 {
            break;
        }
        let count = u16_le(data, cursor + 2).ok_or(NeError::Truncated("TYPEINFO"))?;
        let kind = if type_id & INTEGER_ID_FLAG != 0 {
            ResourceType::from_id(type_id & !INTEGER_ID_FLAG)
        } else {
            ResourceType::Named(read_name(data, table + usize::from(type_id))?)
        };
        cursor += TYPEINFO_SIZE;

        for _ in 0..count {
            let entry = |field: usize| {
                u16_le(data, cursor + field).ok_or(NeError::Truncated("NAMEINFO"))
            };
            let offset = usize::from(entry(0)?) << shift;
            let length = usize::from(entry(2)?) << shift;
            let raw_id = entry(6)?;
            let id = if raw_id & INTEGER_ID_FLAG != 0 {
                ResourceId::Integer(raw_id & !INTEGER_ID_FLAG)
            } else {
                ResourceId::Name(read_name(data, table + usize::from(raw_id))?)
            };
            cursor += NAMEINFO_SIZE;

            if offset >= data.len() {
                log::warn!("resource {kind:?}/{id} starts past the end of the file; skipped");
                continue;
            }
            // Lengths are rounded up to the alignment, so the last resource
            // may extend past the end of the file.
            let length = length.min(data.len() - offset);
            resources.push(NeResource {
                kind: kind.clone(),
                id,
                offset,
                length,
            });
        }
    }
    Ok(resources)
}

/// Reads a length-prefixed name.
fn read_name(data: &[u8], offset: usize) -> Result<String, NeError> {
    let length = usize::from(u8_at(data, offset).ok_or(NeError::Truncated("resource name"))?);
    let bytes = data
        .get(offset + 1..offset + 1 + length)
        .ok_or(NeError::Truncated("resource name"))?;
    Ok(String::from_utf8_lossy(bytes).into_owned())
}

/// Prefixes a DIB with a `BITMAPFILEHEADER`.
fn wrap_bitmap(dib: &[u8]) -> Vec<u8> {
    let header_size = u32_le(dib, 0).unwrap_or(0) as usize;
    let palette_size = if header_size == 12 {
        // BITMAPCOREHEADER: RGBTRIPLE entries, 2^bpp of them.
        let bit_count = u16_le(dib, 10).unwrap_or(24);
        if bit_count <= 8 {
            3 << bit_count
        } else {
            0
        }
    } else {
        let bit_count = u16_le(dib, 14).unwrap_or(24);
        let used = u32_le(dib, 32).unwrap_or(0) as usize;
        let colors = match (used, bit_count) {
            (0, bits) if bits <= 8 => 1 << bits,
            (used, _) => used,
        };
        colors * 4
    };

    let file_size = BITMAP_FILE_HEADER_SIZE + dib.len();
    let pixel_offset = BITMAP_FILE_HEADER_SIZE + header_size + palette_size;
    let mut out = Vec::with_capacity(file_size);
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&(file_size as u32).to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&(pixel_offset as u32).to_le_bytes());
    out.extend_from_slice(dib);
    out
}

/// Keeps a name usable as a single path component.
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "_".to_string()
    } else {
        cleaned.to_ascii_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_ids_map_to_known_types() {
        assert_eq!(ResourceType::from_id(2), ResourceType::Bitmap);
        assert_eq!(ResourceType::from_id(14), ResourceType::IconGroup);
        assert_eq!(ResourceType::from_id(0x7F01), ResourceType::Custom(0x7F01));
        assert_eq!(ResourceType::Custom(0x7F01).directory_name(), "type_0x7f01");
        assert_eq!(ResourceType::Named("Tower Data".into()).directory_name(), "tower_data");
    }

    #[test]
    fn bitmap_header_accounts_for_palette() {
        // 40-byte info header, 4 bpp, biClrUsed = 0 -> 16 palette entries.
        let mut dib = vec![0u8; 40 + 16 * 4 + 8];
        dib[0..4].copy_from_slice(&40u32.to_le_bytes());
        dib[14..16].copy_from_slice(&4u16.to_le_bytes());
        let file = wrap_bitmap(&dib);
        assert_eq!(&file[0..2], b"BM");
        assert_eq!(u32_le(&file, 2), Some((14 + dib.len()) as u32));
        assert_eq!(u32_le(&file, 10), Some(14 + 40 + 64));
        assert_eq!(&file[14..], dib.as_slice());
    }

    #[test]
    fn non_executables_are_rejected() {
        assert!(matches!(NeExecutable::parse(b"PK\x03\x04".to_vec()), Err(NeError::NotMz)));
        let mut mz = vec![0u8; 0x40];
        mz[0..2].copy_from_slice(MZ_MAGIC);
        mz[0x3C..0x40].copy_from_slice(&0x40u32.to_le_bytes());
        assert!(matches!(NeExecutable::parse(mz), Err(NeError::NotNe(0x40))));
    }

    #[test]
    fn unloaded_archive_refuses_to_dump() {
        let archive = NeExecutable::new();
        assert!(!archive.is_loaded());
        assert!(archive.dump(Path::new("/nonexistent")).is_err());
    }
}
