//! Footage items: media a layer can draw from.

use std::path::{Path, PathBuf};

use crate::ids::ItemId;

#[derive(Clone, Debug, PartialEq)]
pub enum FootageSource {
    /// Backed by a real file on disk.
    File { path: PathBuf },
    /// Generated solid color.
    Solid { color: [f64; 3] },
    /// Stand-in for missing media.
    Placeholder,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Footage {
    pub id: ItemId,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub source: FootageSource,
}

impl Footage {
    pub fn file_path(&self) -> Option<&Path> {
        match &self.source {
            FootageSource::File { path } => Some(path),
            _ => None,
        }
    }

    /// Only file-backed footage counts as an exportable asset.
    pub fn is_file_backed(&self) -> bool {
        matches!(self.source, FootageSource::File { .. })
    }

    pub fn solid_color(&self) -> Option<[f64; 3]> {
        match self.source {
            FootageSource::Solid { color } => Some(color),
            _ => None,
        }
    }
}
