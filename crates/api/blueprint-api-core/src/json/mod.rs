use serde_json::{json, Map, Value as JsonValue};
use thiserror::Error;

use crate::{Justification, PropertyValue, ShapeGeometry, TextDocument, ValueKind};

/// Placeholder written in place of a leaf value the host could not read.
pub const UNREADABLE_VALUE: &str = "Error reading value";

/// Placeholder written in place of a text document the host could not read.
pub const UNREADABLE_TEXT_DOCUMENT: &str = "Could not read TextDocument properties.";

/// Errors produced while decoding interchange JSON back into a [`PropertyValue`].
#[derive(Debug, Error, PartialEq)]
pub enum CodecError {
    #[error("expected {expected:?} value, found {found}")]
    KindMismatch { expected: ValueKind, found: String },
    #[error("value is a diagnostic placeholder: {0}")]
    Placeholder(String),
    #[error("malformed {kind:?} value: {reason}")]
    Malformed { kind: ValueKind, reason: String },
}

/// Encode a leaf value into its JSON-safe form.
///
/// Scalars, vectors and colors pass through as numbers / numeric arrays. Shape
/// geometry becomes `{vertices, inTangents, outTangents, isClosed}` and text
/// documents become `{text, font, fontSize, fillColor, justification}`.
pub fn encode_value(value: &PropertyValue) -> JsonValue {
    match value {
        PropertyValue::Scalar(v) => json!(v),
        PropertyValue::Vector(v) => json!(v),
        PropertyValue::Color(c) => json!(c),
        PropertyValue::Shape(shape) => encode_shape(shape),
        PropertyValue::Text(doc) => encode_text_document(doc),
    }
}

/// Encode a value that may have failed to read on the host side. A missing
/// value becomes a diagnostic string so one unreadable property never fails a
/// whole tree.
pub fn encode_or_placeholder(value: Option<&PropertyValue>, expected: ValueKind) -> JsonValue {
    match value {
        Some(v) => encode_value(v),
        None if expected == ValueKind::Text => JsonValue::String(UNREADABLE_TEXT_DOCUMENT.into()),
        None => JsonValue::String(UNREADABLE_VALUE.into()),
    }
}

pub fn encode_shape(shape: &ShapeGeometry) -> JsonValue {
    json!({
        "vertices": shape.vertices,
        "inTangents": shape.in_tangents,
        "outTangents": shape.out_tangents,
        "isClosed": shape.closed,
    })
}

/// Dense text record used for both static text values and text keyframes.
pub fn encode_text_document(doc: &TextDocument) -> JsonValue {
    json!({
        "text": doc.text,
        "font": doc.font,
        "fontSize": doc.font_size,
        "fillColor": doc.fill_color,
        "justification": doc.justification.as_str(),
    })
}

/// Guess the kind of an encoded value from its JSON shape alone. Numeric arrays
/// are always reported as vectors; callers that know better pass an explicit
/// kind to [`decode_value`].
pub fn infer_kind(value: &JsonValue) -> Option<ValueKind> {
    match value {
        JsonValue::Number(_) | JsonValue::Bool(_) => Some(ValueKind::Scalar),
        JsonValue::Array(arr) if arr.iter().all(|x| x.is_number()) => Some(ValueKind::Vector),
        JsonValue::Object(obj) if obj.contains_key("vertices") => Some(ValueKind::Shape),
        JsonValue::Object(obj) if obj.contains_key("text") => Some(ValueKind::Text),
        _ => None,
    }
}

/// [`infer_kind`] with the property's identifiers as a tiebreaker: a numeric
/// array of three or four entries on a property whose match name or display
/// name mentions a color is a color, not a vector.
pub fn infer_kind_named(match_name: &str, name: &str, value: &JsonValue) -> Option<ValueKind> {
    let kind = infer_kind(value)?;
    let colorish = |s: &str| {
        let s = s.to_ascii_lowercase();
        s.contains("color") || s.contains("colour")
    };
    match value {
        JsonValue::Array(arr)
            if kind == ValueKind::Vector
                && (3..=4).contains(&arr.len())
                && (colorish(match_name) || colorish(name)) =>
        {
            Some(ValueKind::Color)
        }
        _ => Some(kind),
    }
}

/// Decode an encoded value, steering ambiguous shapes with `expected`.
pub fn decode_value(value: &JsonValue, expected: ValueKind) -> Result<PropertyValue, CodecError> {
    if let JsonValue::String(s) = value {
        if s == UNREADABLE_VALUE || s == UNREADABLE_TEXT_DOCUMENT {
            return Err(CodecError::Placeholder(s.clone()));
        }
    }
    match expected {
        ValueKind::Scalar => decode_scalar(value).map(PropertyValue::Scalar),
        ValueKind::Vector => numbers(value, ValueKind::Vector).map(PropertyValue::Vector),
        ValueKind::Color => decode_color(value).map(PropertyValue::Color),
        ValueKind::Shape => decode_shape(value).map(PropertyValue::Shape),
        ValueKind::Text => decode_text_document(value).map(PropertyValue::Text),
    }
}

/// Decode using [`infer_kind`]; used when no live target dictates the kind.
pub fn decode_inferred(value: &JsonValue) -> Result<PropertyValue, CodecError> {
    match infer_kind(value) {
        Some(kind) => decode_value(value, kind),
        None => match value {
            JsonValue::String(s) if s == UNREADABLE_VALUE || s == UNREADABLE_TEXT_DOCUMENT => {
                Err(CodecError::Placeholder(s.clone()))
            }
            other => Err(CodecError::Malformed {
                kind: ValueKind::Scalar,
                reason: format!("cannot infer value kind from {}", describe(other)),
            }),
        },
    }
}

fn decode_scalar(value: &JsonValue) -> Result<f64, CodecError> {
    match value {
        JsonValue::Number(n) => n.as_f64().ok_or_else(|| CodecError::Malformed {
            kind: ValueKind::Scalar,
            reason: format!("number {n} is not representable"),
        }),
        JsonValue::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        // one-element arrays show up for some single-dimension host properties
        JsonValue::Array(arr) if arr.len() == 1 => decode_scalar(&arr[0]),
        other => Err(mismatch(ValueKind::Scalar, other)),
    }
}

fn numbers(value: &JsonValue, kind: ValueKind) -> Result<Vec<f64>, CodecError> {
    let arr = value.as_array().ok_or_else(|| mismatch(kind, value))?;
    arr.iter()
        .map(|x| {
            x.as_f64().ok_or_else(|| CodecError::Malformed {
                kind,
                reason: format!("non-numeric element {}", describe(x)),
            })
        })
        .collect()
}

fn decode_color(value: &JsonValue) -> Result<[f64; 4], CodecError> {
    let comps = numbers(value, ValueKind::Color)?;
    match comps.as_slice() {
        [r, g, b] => Ok([*r, *g, *b, 1.0]),
        [r, g, b, a] => Ok([*r, *g, *b, *a]),
        _ => Err(CodecError::Malformed {
            kind: ValueKind::Color,
            reason: format!("expected 3 or 4 components, found {}", comps.len()),
        }),
    }
}

fn points(obj: &Map<String, JsonValue>, key: &str) -> Result<Vec<[f64; 2]>, CodecError> {
    let Some(raw) = obj.get(key) else {
        return Ok(Vec::new());
    };
    let arr = raw.as_array().ok_or_else(|| CodecError::Malformed {
        kind: ValueKind::Shape,
        reason: format!("'{key}' is not an array"),
    })?;
    arr.iter()
        .map(|p| {
            let xy = numbers(p, ValueKind::Shape)?;
            match xy.as_slice() {
                [x, y, ..] => Ok([*x, *y]),
                _ => Err(CodecError::Malformed {
                    kind: ValueKind::Shape,
                    reason: format!("'{key}' entry needs two coordinates"),
                }),
            }
        })
        .collect()
}

fn decode_shape(value: &JsonValue) -> Result<ShapeGeometry, CodecError> {
    let obj = value
        .as_object()
        .ok_or_else(|| mismatch(ValueKind::Shape, value))?;
    let vertices = points(obj, "vertices")?;
    let mut in_tangents = points(obj, "inTangents")?;
    let mut out_tangents = points(obj, "outTangents")?;
    // missing tangents mean straight segments
    in_tangents.resize(vertices.len(), [0.0, 0.0]);
    out_tangents.resize(vertices.len(), [0.0, 0.0]);
    let closed = obj
        .get("isClosed")
        .or_else(|| obj.get("closed"))
        .and_then(|c| c.as_bool())
        .unwrap_or(true);
    Ok(ShapeGeometry {
        vertices,
        in_tangents,
        out_tangents,
        closed,
    })
}

fn decode_text_document(value: &JsonValue) -> Result<TextDocument, CodecError> {
    // a bare string is accepted as text with default styling
    if let Some(s) = value.as_str() {
        return Ok(TextDocument::new(s));
    }
    let obj = value
        .as_object()
        .ok_or_else(|| mismatch(ValueKind::Text, value))?;
    let text = obj
        .get("text")
        .and_then(|t| t.as_str())
        .ok_or_else(|| CodecError::Malformed {
            kind: ValueKind::Text,
            reason: "missing 'text'".into(),
        })?;
    let mut doc = TextDocument::new(text);
    if let Some(font) = obj.get("font").and_then(|f| f.as_str()) {
        doc.font = font.to_string();
    }
    if let Some(size) = obj.get("fontSize").and_then(|f| f.as_f64()) {
        doc.font_size = size;
    }
    if let Some(fill) = obj.get("fillColor") {
        let comps = numbers(fill, ValueKind::Text)?;
        if let [r, g, b, ..] = comps.as_slice() {
            doc.fill_color = [*r, *g, *b];
        }
    }
    if let Some(j) = obj.get("justification").and_then(|j| j.as_str()) {
        doc.justification = Justification::from_name(j);
    }
    Ok(doc)
}

fn mismatch(expected: ValueKind, found: &JsonValue) -> CodecError {
    CodecError::KindMismatch {
        expected,
        found: describe(found),
    }
}

fn describe(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "null".into(),
        JsonValue::Bool(_) => "bool".into(),
        JsonValue::Number(_) => "number".into(),
        JsonValue::String(s) => format!("string \"{s}\""),
        JsonValue::Array(a) => format!("array of {}", a.len()),
        JsonValue::Object(_) => "object".into(),
    }
}
