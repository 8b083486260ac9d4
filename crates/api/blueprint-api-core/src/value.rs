//! PropertyValue: the values a leaf property can hold.
//! All numeric data uses f64, matching the precision of host scripting numbers.

use crate::shape::ShapeGeometry;
use crate::text::TextDocument;

/// Lightweight kind enum used to steer decoding, since the JSON form of a
/// vector and a color is the same numeric array.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Scalar,
    Vector,
    Color,
    Shape,
    Text,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    /// Single number (opacity, rotation, checkbox state, ...)
    Scalar(f64),

    /// 2D/3D numeric vector (position, scale, anchor point)
    Vector(Vec<f64>),

    /// RGBA color in 0..1
    Color([f64; 4]),

    /// Bezier path geometry
    Shape(ShapeGeometry),

    /// Rich text document
    Text(TextDocument),
}

impl PropertyValue {
    /// Return the coarse kind of this value.
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            PropertyValue::Scalar(_) => ValueKind::Scalar,
            PropertyValue::Vector(_) => ValueKind::Vector,
            PropertyValue::Color(_) => ValueKind::Color,
            PropertyValue::Shape(_) => ValueKind::Shape,
            PropertyValue::Text(_) => ValueKind::Text,
        }
    }

    /// Convenience constructors
    pub fn scalar(v: f64) -> Self {
        PropertyValue::Scalar(v)
    }

    pub fn vec2(x: f64, y: f64) -> Self {
        PropertyValue::Vector(vec![x, y])
    }

    pub fn vec3(x: f64, y: f64, z: f64) -> Self {
        PropertyValue::Vector(vec![x, y, z])
    }

    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        PropertyValue::Color([r, g, b, a])
    }

    pub fn text(doc: TextDocument) -> Self {
        PropertyValue::Text(doc)
    }

    pub fn as_text(&self) -> Option<&TextDocument> {
        match self {
            PropertyValue::Text(doc) => Some(doc),
            _ => None,
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Scalar(v)
    }
}

impl From<ShapeGeometry> for PropertyValue {
    fn from(v: ShapeGeometry) -> Self {
        PropertyValue::Shape(v)
    }
}

impl From<TextDocument> for PropertyValue {
    fn from(v: TextDocument) -> Self {
        PropertyValue::Text(v)
    }
}
