//! Blueprint Document Core
//!
//! Host-agnostic model of an animation project: compositions holding ordered
//! layers, each layer owning a tree of animatable properties. The model doubles
//! as the read-only snapshot consumed by export and as the mutable host driven
//! by import (see [`DocumentHost`]).

pub mod composition;
pub mod footage;
pub mod host;
pub mod ids;
pub mod layer;
pub mod match_names;
pub mod project;
pub mod property;

pub use composition::{Composition, Marker};
pub use footage::{Footage, FootageSource};
pub use host::{
    CompositionSpec, DocumentHost, FootageImport, HostError, HostSettings, LayerSpec, SolidSpec,
};
pub use ids::{IdAllocator, ItemId, LayerId};
pub use layer::{BlendingMode, Layer, LayerAttributes, LayerKind, TrackMatteMode};
pub use project::Project;
pub use property::{Expression, Keyframe, LeafProperty, Property, PropertyGroup};
pub use blueprint_api_core::{PropertyValue, ValueKind};
