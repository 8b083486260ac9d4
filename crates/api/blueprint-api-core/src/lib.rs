//! blueprint-api-core: leaf property values and the JSON value codec (core, host-agnostic)

pub mod json;
pub mod shape;
pub mod text;
pub mod value;

pub use json::CodecError;
pub use shape::ShapeGeometry;
pub use text::{Justification, TextDocument};
pub use value::{PropertyValue, ValueKind};
