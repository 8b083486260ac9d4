//! The mutation seam import drives. [`crate::Project`] implements it; a
//! scripting bridge to a live application would implement it as well.

use std::path::PathBuf;

use thiserror::Error;

use crate::ids::{ItemId, LayerId};
use crate::layer::{Layer, LayerKind};

#[derive(Debug, Error, PartialEq)]
pub enum HostError {
    #[error("{what} not found: {id}")]
    NotFound { what: &'static str, id: String },
    #[error("host rejected {operation}: {reason}")]
    Rejected { operation: String, reason: String },
    /// The host is in a state where no further construction is safe.
    #[error("critical host failure: {0}")]
    Critical(String),
}

impl HostError {
    pub fn is_critical(&self) -> bool {
        matches!(self, HostError::Critical(_))
    }
}

/// Project-wide settings applied before anything is built.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HostSettings {
    pub bits_per_channel: Option<u8>,
    pub expression_engine: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FootageImport {
    pub path: PathBuf,
    pub name: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CompositionSpec {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
    pub duration: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SolidSpec {
    pub color: [f64; 3],
    pub width: u32,
    pub height: u32,
}

/// What to create for one layer. The source must match the kind: footage for
/// Footage/Audio, a composition for Pre-comp; Solid layers get a fresh solid
/// item from `solid`.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerSpec {
    pub name: String,
    pub kind: LayerKind,
    pub source: Option<ItemId>,
    pub text: Option<String>,
    pub solid: Option<SolidSpec>,
}

impl LayerSpec {
    pub fn new(name: impl Into<String>, kind: LayerKind) -> Self {
        Self {
            name: name.into(),
            kind,
            source: None,
            text: None,
            solid: None,
        }
    }

    pub fn with_source(mut self, source: ItemId) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_solid(mut self, solid: SolidSpec) -> Self {
        self.solid = Some(solid);
        self
    }
}

pub trait DocumentHost {
    fn apply_settings(&mut self, settings: &HostSettings);

    fn import_footage(&mut self, request: FootageImport) -> Result<ItemId, HostError>;

    fn create_composition(&mut self, spec: CompositionSpec) -> Result<ItemId, HostError>;

    /// Create a layer on top of the composition's stack.
    fn add_layer(&mut self, comp: ItemId, spec: LayerSpec) -> Result<LayerId, HostError>;

    fn layer_mut(&mut self, comp: ItemId, layer: LayerId) -> Option<&mut Layer>;

    fn set_parent(
        &mut self,
        comp: ItemId,
        child: LayerId,
        parent: Option<LayerId>,
    ) -> Result<(), HostError>;

    fn add_marker(&mut self, comp: ItemId, comment: &str, time: f64) -> Result<(), HostError>;

    fn begin_undo_group(&mut self, _name: &str) {}

    fn end_undo_group(&mut self) {}
}
