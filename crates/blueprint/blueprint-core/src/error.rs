//! Error types for blueprint export/import (thiserror-based).

use blueprint_document_core::HostError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlueprintError {
    /// Unparsable or structurally empty blueprint. Raised before any host mutation.
    #[error("blueprint format error: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("nothing selected for export")]
    EmptySelection,

    #[error("unknown composition: {0}")]
    UnknownComposition(String),

    /// A Pre-comp layer names a composition that has not been built yet.
    #[error("composition '{composition}' references '{reference}' before it is built")]
    ForwardReference {
        composition: String,
        reference: String,
    },

    /// A Pre-comp layer names a composition that failed earlier in the same pass.
    #[error("composition '{composition}' depends on '{dependency}', which failed to build")]
    MissingDependency {
        composition: String,
        dependency: String,
    },

    #[error("layer '{layer}': {reason}")]
    Layer { layer: String, reason: String },

    /// A critical host failure stopped the import.
    #[error("critical build error: {0}")]
    CriticalBuild(String),

    #[error(transparent)]
    Host(#[from] HostError),
}

pub type BlueprintResult<T> = Result<T, BlueprintError>;
