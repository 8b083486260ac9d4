use blueprint_api_core::json::{
    decode_inferred, decode_value, encode_or_placeholder, encode_value, infer_kind,
    UNREADABLE_TEXT_DOCUMENT, UNREADABLE_VALUE,
};
use blueprint_api_core::{
    CodecError, Justification, PropertyValue, ShapeGeometry, TextDocument, ValueKind,
};
use serde_json::json;

#[test]
fn scalars_vectors_and_colors_pass_through() {
    assert_eq!(encode_value(&PropertyValue::Scalar(50.0)), json!(50.0));
    assert_eq!(
        encode_value(&PropertyValue::vec3(960.0, 540.0, 0.0)),
        json!([960.0, 540.0, 0.0])
    );
    assert_eq!(
        encode_value(&PropertyValue::rgba(1.0, 0.5, 0.0, 1.0)),
        json!([1.0, 0.5, 0.0, 1.0])
    );
}

#[test]
fn shape_geometry_encodes_four_fields() {
    let shape = ShapeGeometry {
        vertices: vec![[0.0, 0.0], [100.0, 0.0]],
        in_tangents: vec![[0.0, 0.0], [-10.0, 5.0]],
        out_tangents: vec![[10.0, 5.0], [0.0, 0.0]],
        closed: false,
    };
    let encoded = encode_value(&PropertyValue::Shape(shape.clone()));
    assert_eq!(
        encoded,
        json!({
            "vertices": [[0.0, 0.0], [100.0, 0.0]],
            "inTangents": [[0.0, 0.0], [-10.0, 5.0]],
            "outTangents": [[10.0, 5.0], [0.0, 0.0]],
            "isClosed": false
        })
    );
    assert_eq!(infer_kind(&encoded), Some(ValueKind::Shape));
    let back = decode_value(&encoded, ValueKind::Shape).expect("decode shape");
    assert_eq!(back, PropertyValue::Shape(shape));
}

#[test]
fn text_document_uses_dense_record() {
    let doc = TextDocument::new("Hello")
        .with_font("Arial-BoldMT", 72.0)
        .with_fill([1.0, 0.0, 0.0])
        .with_justification(Justification::Center);
    let encoded = encode_value(&PropertyValue::Text(doc.clone()));
    assert_eq!(encoded["text"], json!("Hello"));
    assert_eq!(encoded["font"], json!("Arial-BoldMT"));
    assert_eq!(encoded["fontSize"], json!(72.0));
    assert_eq!(encoded["fillColor"], json!([1.0, 0.0, 0.0]));
    assert_eq!(encoded["justification"], json!("CENTER"));

    let back = decode_inferred(&encoded).expect("decode text");
    assert_eq!(back, PropertyValue::Text(doc));
}

#[test]
fn color_decode_accepts_rgb_and_rgba() {
    assert_eq!(
        decode_value(&json!([0.2, 0.4, 0.6]), ValueKind::Color).unwrap(),
        PropertyValue::Color([0.2, 0.4, 0.6, 1.0])
    );
    assert_eq!(
        decode_value(&json!([0.2, 0.4, 0.6, 0.5]), ValueKind::Color).unwrap(),
        PropertyValue::Color([0.2, 0.4, 0.6, 0.5])
    );
    assert!(matches!(
        decode_value(&json!([0.2, 0.4]), ValueKind::Color),
        Err(CodecError::Malformed { .. })
    ));
}

#[test]
fn expected_kind_disambiguates_numeric_arrays() {
    let raw = json!([1.0, 0.0, 0.0, 1.0]);
    assert_eq!(infer_kind(&raw), Some(ValueKind::Vector));
    assert_eq!(
        decode_value(&raw, ValueKind::Color).unwrap().kind(),
        ValueKind::Color
    );
    assert_eq!(
        decode_value(&raw, ValueKind::Vector).unwrap().kind(),
        ValueKind::Vector
    );
}

#[test]
fn missing_values_become_placeholders() {
    assert_eq!(
        encode_or_placeholder(None, ValueKind::Scalar),
        json!(UNREADABLE_VALUE)
    );
    assert_eq!(
        encode_or_placeholder(None, ValueKind::Text),
        json!(UNREADABLE_TEXT_DOCUMENT)
    );
    assert_eq!(
        encode_or_placeholder(Some(&PropertyValue::Scalar(3.0)), ValueKind::Scalar),
        json!(3.0)
    );
}

#[test]
fn kind_mismatch_is_reported() {
    let err = decode_value(&json!({"a": 1}), ValueKind::Scalar).unwrap_err();
    assert!(matches!(
        err,
        CodecError::KindMismatch {
            expected: ValueKind::Scalar,
            ..
        }
    ));
    assert!(err.to_string().contains("object"));
}
