use blueprint_api_core::{ShapeGeometry, TextDocument};
use blueprint_core::builder::{apply_children, apply_group};
use blueprint_core::{
    serialize_group, BuildContext, DiagnosticKind, Diagnostics, ExportConfig, PropertyNodeJson,
    SerializeContext,
};
use blueprint_document_core::{
    match_names as mn, Keyframe, Layer, LayerId, LayerKind, LeafProperty, PropertyGroup,
    PropertyValue,
};

fn export(group: &PropertyGroup, in_point: f64) -> PropertyNodeJson {
    let cfg = ExportConfig::default();
    let mut diags = Diagnostics::new();
    let mut ctx = SerializeContext::new(&cfg, &mut diags);
    serialize_group(group, in_point, &mut ctx).expect("tree has content")
}

fn import(target: &mut PropertyGroup, node: &PropertyNodeJson, in_point: f64) -> Diagnostics {
    let mut diags = Diagnostics::new();
    {
        let mut ctx = BuildContext::new(&mut diags);
        apply_group(target, node, in_point, &mut ctx);
    }
    diags
}

fn animated_transform(layer: &mut Layer) {
    let transform = layer.transform_mut().expect("transform");
    let position = transform.leaf_mut(mn::POSITION).expect("position");
    position.set_value_at_time(1.0, PropertyValue::vec3(0.0, 540.0, 0.0));
    position.set_value_at_time(3.5, PropertyValue::vec3(1920.0, 540.0, 0.0));
    transform
        .leaf_mut(mn::OPACITY)
        .expect("opacity")
        .set_value(PropertyValue::Scalar(40.0));
    transform
        .leaf_mut(mn::ROTATE_Z)
        .expect("rotation")
        .set_expression("time * 90");
}

fn assert_leaves_match(a: &LeafProperty, b: &LeafProperty) {
    assert_eq!(a.value, b.value, "value of {}", a.name);
    assert_eq!(a.is_animated(), b.is_animated(), "animated flag of {}", a.name);
    assert_eq!(a.keyframes, b.keyframes, "keyframes of {}", a.name);
    assert_eq!(
        a.expression.as_ref().map(|e| &e.text),
        b.expression.as_ref().map(|e| &e.text),
        "expression of {}",
        a.name
    );
}

#[test]
fn transform_round_trips_through_json() {
    let mut source = Layer::new(LayerId(1), "Box", LayerKind::Null, (1920, 1080)).with_timing(0.5, 10.0, 0.0);
    animated_transform(&mut source);
    let node = export(source.transform().expect("transform"), source.in_point);

    let mut rebuilt = Layer::new(LayerId(2), "Box", LayerKind::Null, (1920, 1080));
    let diags = import(rebuilt.transform_mut().expect("transform"), &node, 0.5);
    assert!(diags.is_empty(), "unexpected diagnostics: {:?}", diags.entries());

    let before = source.transform().expect("transform");
    let after = rebuilt.transform().expect("transform");
    for name in [mn::POSITION, mn::OPACITY, mn::ROTATE_Z] {
        assert_leaves_match(
            before.leaf(name).expect("source leaf"),
            after.leaf(name).expect("rebuilt leaf"),
        );
    }
    // untouched leaves keep their defaults
    assert_eq!(before.leaf(mn::SCALE), after.leaf(mn::SCALE));
}

#[test]
fn reimport_at_new_in_point_shifts_keyframes() {
    let mut source = Layer::new(LayerId(1), "Box", LayerKind::Null, (1920, 1080)).with_timing(1.0, 10.0, 0.0);
    animated_transform(&mut source);
    let node = export(source.transform().expect("transform"), source.in_point);

    let exported: Vec<f64> = node
        .child("Position")
        .and_then(|p| p.keyframes.as_ref())
        .expect("position keyframes")
        .iter()
        .map(|k| k.time)
        .collect();
    assert_eq!(exported, vec![0.0, 2.5]);

    let mut rebuilt = Layer::new(LayerId(2), "Box", LayerKind::Null, (1920, 1080));
    import(rebuilt.transform_mut().expect("transform"), &node, 2.0);
    let times: Vec<f64> = rebuilt
        .transform()
        .and_then(|t| t.leaf(mn::POSITION))
        .expect("position")
        .keyframes
        .iter()
        .map(|k| k.time)
        .collect();
    assert_eq!(times, vec![2.0, 4.5]);
}

#[test]
fn text_and_shape_values_round_trip() {
    let mut text = Layer::new(LayerId(1), "Title", LayerKind::Text, (1920, 1080));
    let doc = TextDocument::new("Launch")
        .with_font("Helvetica", 90.0)
        .with_fill([0.0, 0.5, 1.0]);
    let source = text
        .text_properties_mut()
        .and_then(|g| g.leaf_mut(mn::TEXT_DOCUMENT))
        .expect("source text");
    source.set_value(PropertyValue::Text(doc.clone()));
    source.set_value_at_time(0.0, PropertyValue::Text(TextDocument::new("3")));
    source.set_value_at_time(1.0, PropertyValue::Text(TextDocument::new("2")));

    let node = export(text.text_properties().expect("text"), 0.0);
    let mut rebuilt = Layer::new(LayerId(2), "Title", LayerKind::Text, (1920, 1080));
    import(rebuilt.text_properties_mut().expect("text"), &node, 0.0);
    assert_leaves_match(
        text.text_properties().and_then(|g| g.leaf(mn::TEXT_DOCUMENT)).expect("source"),
        rebuilt.text_properties().and_then(|g| g.leaf(mn::TEXT_DOCUMENT)).expect("rebuilt"),
    );

    let mut shape = Layer::new(LayerId(3), "Star", LayerKind::Shape, (1920, 1080));
    let path = LeafProperty::new(
        "ADBE Vector Shape",
        "Path",
        PropertyValue::Shape(ShapeGeometry::default()),
    )
    .with_value(PropertyValue::Shape(ShapeGeometry::polygon(
        vec![[0.0, 0.0], [50.0, 100.0], [100.0, 0.0]],
        true,
    )))
    .with_keyframes(vec![Keyframe {
        time: 0.25,
        value: PropertyValue::Shape(ShapeGeometry::polygon(vec![[0.0, 0.0], [10.0, 10.0]], false)),
    }]);
    shape
        .contents_mut()
        .expect("contents")
        .push(PropertyGroup::indexed("ADBE Vector Shape - Group", "Path 1").with_child(path));

    let node = export(shape.contents().expect("contents"), 0.0);
    let mut rebuilt = Layer::new(LayerId(4), "Star", LayerKind::Shape, (1920, 1080));
    let diags = import(rebuilt.contents_mut().expect("contents"), &node, 0.0);
    assert!(diags.is_empty());
    let get = |layer: &Layer| {
        layer
            .contents()
            .and_then(|c| c.group("ADBE Vector Shape - Group"))
            .and_then(|g| g.leaf("ADBE Vector Shape"))
            .cloned()
            .expect("path leaf")
    };
    assert_leaves_match(&get(&shape), &get(&rebuilt));
}

#[test]
fn schema_drift_is_skipped_with_warning() {
    let mut source = Layer::new(LayerId(1), "Box", LayerKind::Null, (100, 100));
    animated_transform(&mut source);
    let mut node = export(source.transform().expect("transform"), 0.0);
    if let Some(children) = node.properties.as_mut() {
        children.insert(
            "Warp Speed".into(),
            PropertyNodeJson::leaf("ADBE Warp", "Warp Speed", serde_json::json!(9.0)),
        );
    }
    let mut rebuilt = Layer::new(LayerId(2), "Box", LayerKind::Null, (100, 100));
    let diags = import(rebuilt.transform_mut().expect("transform"), &node, 0.0);
    assert_eq!(diags.count(DiagnosticKind::SchemaDrift), 1);
    assert_eq!(
        rebuilt
            .transform()
            .and_then(|t| t.leaf(mn::OPACITY))
            .and_then(|l| l.value.clone()),
        Some(PropertyValue::Scalar(40.0))
    );
}

#[test]
fn duplicate_names_map_back_to_distinct_siblings() {
    let mut group = PropertyGroup::named("G", "G")
        .with_child(LeafProperty::new("ADBE Slider", "Amount", PropertyValue::Scalar(0.0)))
        .with_child(LeafProperty::new("ADBE Slider", "Amount", PropertyValue::Scalar(0.0)));
    if let Some(leaf) = group.children[0].as_leaf_mut() {
        leaf.set_value(PropertyValue::Scalar(1.0));
    }
    if let Some(leaf) = group.children[1].as_leaf_mut() {
        leaf.set_value(PropertyValue::Scalar(2.0));
    }
    let node = export(&group, 0.0);
    assert!(node.child("Amount").is_some() && node.child("Amount_2").is_some());

    let mut target = PropertyGroup::named("G", "G")
        .with_child(LeafProperty::new("ADBE Slider", "Amount", PropertyValue::Scalar(0.0)))
        .with_child(LeafProperty::new("ADBE Slider", "Amount", PropertyValue::Scalar(0.0)));
    let mut diags = Diagnostics::new();
    apply_children(
        &mut target,
        node.properties.as_ref().expect("children"),
        0.0,
        &mut BuildContext::new(&mut diags),
    );
    assert_eq!(target, group);
}

#[test]
fn fixture_transform_applies_cleanly() {
    let node: PropertyNodeJson = blueprint_test_fixtures::property_nodes::load("transform-animated")
        .expect("load transform fixture");
    let mut layer = Layer::new(LayerId(1), "Box", LayerKind::Null, (1920, 1080));
    let diags = import(layer.transform_mut().expect("transform"), &node, 0.25);
    assert!(diags.is_empty(), "unexpected diagnostics: {:?}", diags.entries());

    let transform = layer.transform().expect("transform");
    let times: Vec<f64> = transform
        .leaf(mn::POSITION)
        .expect("position")
        .keyframes
        .iter()
        .map(|k| k.time)
        .collect();
    assert_eq!(times, vec![0.25, 1.75, 3.25]);
    assert!(transform
        .leaf(mn::ROTATE_Z)
        .expect("rotation")
        .has_enabled_expression());

    let again = export(transform, 0.25);
    assert_eq!(
        again.child("Opacity").and_then(|n| n.value.as_ref()).and_then(|v| v.as_f64()),
        Some(40.0)
    );
}

#[test]
fn effect_color_parameter_survives_reimport() {
    let mut source = Layer::new(LayerId(1), "Box", LayerKind::Shape, (640, 360));
    let fill = PropertyGroup::indexed("ADBE Fill", "Fill")
        .with_child(
            LeafProperty::new("ADBE Fill-0002", "Color", PropertyValue::rgba(1.0, 0.0, 0.0, 1.0))
                .with_value(PropertyValue::rgba(0.0, 0.5, 1.0, 1.0)),
        )
        .with_child(
            LeafProperty::new("ADBE Fill-0005", "Opacity", PropertyValue::Scalar(1.0))
                .with_value(PropertyValue::Scalar(0.5)),
        );
    source.effects_mut().expect("effects").push(fill);
    let node = export(source.effects().expect("effects"), 0.0);

    let mut rebuilt = Layer::new(LayerId(2), "Box", LayerKind::Shape, (640, 360));
    let diags = import(rebuilt.effects_mut().expect("effects"), &node, 0.0);
    assert!(diags.is_empty(), "unexpected diagnostics: {:?}", diags.entries());

    let fill = rebuilt
        .effects()
        .and_then(|e| e.group("ADBE Fill"))
        .expect("fill effect created on import");
    assert_eq!(
        fill.leaf("ADBE Fill-0002").and_then(|l| l.value.clone()),
        Some(PropertyValue::rgba(0.0, 0.5, 1.0, 1.0))
    );
    assert_eq!(
        fill.leaf("ADBE Fill-0005").and_then(|l| l.value.clone()),
        Some(PropertyValue::Scalar(0.5))
    );
}
