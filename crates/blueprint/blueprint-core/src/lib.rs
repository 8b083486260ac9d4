//! Blueprint Core
//!
//! Converts between an in-memory animation document and the portable
//! "blueprint" JSON interchange format.
//!
//! Export: [`collector::collect`] finds the compositions and file-backed assets
//! a selection depends on, [`assembler::assemble`] serializes them through the
//! property-tree [`serializer`], and [`package::export_to_path`] writes the
//! JSON plus a sibling assets folder.
//!
//! Import: [`reader::read_tolerant`] types the JSON entry by entry, skipping
//! what does not fit, and [`disassembler::Disassembler`] drives any
//! [`blueprint_document_core::DocumentHost`]: settings, assets, then
//! compositions in array order, applying property trees with the [`builder`].
//! Partial failures are reported through [`Diagnostics`] rather than aborting.

pub mod animators;
pub mod assembler;
pub mod builder;
pub mod collector;
pub mod config;
pub mod diagnostics;
pub mod disassembler;
pub mod error;
pub mod outline;
pub mod package;
pub mod reader;
pub mod schema;
pub mod serializer;
pub mod translate;

pub use animators::extract_text_animators;
pub use assembler::{assemble, asset_id, Assembly, PlannedAsset};
pub use builder::{apply, apply_children, BuildContext};
pub use collector::{collect, Closure};
pub use config::{ExportConfig, ImportConfig};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, DiagnosticsCfg, Severity};
pub use disassembler::{
    import_blueprint, parse_blueprint, resolve_asset_path, Disassembler, ImportReport, ImportStage,
};
pub use error::{BlueprintError, BlueprintResult};
pub use outline::render_outline;
pub use package::{export_to_path, import_from_path, read_blueprint, ExportSummary, LoadedBlueprint};
pub use reader::{read_tolerant, read_value};
pub use schema::{Blueprint, LayerEntry, PropertyMap, PropertyNodeJson, TextAnimator};
pub use serializer::{serialize, serialize_group, SerializeContext};
pub use translate::{translate_outline, EffectManifest, EffectSpec};
