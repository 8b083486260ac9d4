use std::path::PathBuf;

use blueprint_core::{assemble, asset_id, BlueprintError, DiagnosticKind, ExportConfig};
use blueprint_document_core::{
    match_names as mn, BlendingMode, DocumentHost, FootageSource, ItemId, LayerKind, LayerSpec,
    Project, PropertyValue, SolidSpec,
};
use serde_json::json;

struct Scene {
    project: Project,
    main: ItemId,
    inner: ItemId,
    img: ItemId,
}

/// Main holds (top to bottom) Title, Inner, Plate and Background; Inner holds
/// another use of the same footage.
fn scene() -> Scene {
    let mut project = Project::new();
    project.bits_per_channel = 16;
    let img = project.add_footage(
        "plate.png",
        640,
        480,
        FootageSource::File {
            path: PathBuf::from("/media/shots/plate.png"),
        },
    );
    let inner = project.add_composition("Inner", 800, 600, 30.0, 4.0);
    project
        .add_layer(inner, LayerSpec::new("plate copy", LayerKind::Footage).with_source(img))
        .expect("inner footage");

    let main = project.add_composition("Main", 1920, 1080, 25.0, 12.0);
    project
        .add_layer(
            main,
            LayerSpec::new("Background", LayerKind::Solid).with_solid(SolidSpec {
                color: [0.2, 0.4, 0.6],
                width: 1920,
                height: 1080,
            }),
        )
        .expect("solid");
    let plate = project
        .add_layer(main, LayerSpec::new("Plate", LayerKind::Footage).with_source(img))
        .expect("plate");
    let nested = project
        .add_layer(main, LayerSpec::new("Inner", LayerKind::Precomp).with_source(inner))
        .expect("precomp");
    let title = project
        .add_layer(main, LayerSpec::new("Title", LayerKind::Text).with_text("Ready"))
        .expect("title");
    project.add_marker(main, "start", 1.0).expect("marker");
    project.set_parent(main, plate, Some(nested)).expect("parent");

    let layer = project.layer_mut(main, title).expect("title layer");
    layer.in_point = 2.0;
    layer.attributes.shy = true;
    layer.attributes.blending_mode = BlendingMode::Multiply;
    let opacity = layer
        .transform_mut()
        .and_then(|t| t.leaf_mut(mn::OPACITY))
        .expect("opacity");
    opacity.set_value_at_time(2.0, PropertyValue::Scalar(0.0));
    opacity.set_value_at_time(3.0, PropertyValue::Scalar(100.0));

    Scene {
        project,
        main,
        inner,
        img,
    }
}

#[test]
fn selection_closure_becomes_blueprint() {
    let s = scene();
    let assembly = assemble(&s.project, &[s.main], "spot", &ExportConfig::default())
        .expect("assemble");
    let bp = &assembly.blueprint;

    let settings = &bp.project_settings;
    assert_eq!((settings.width, settings.height), (1920, 1080));
    assert_eq!(settings.frame_rate, 25.0);
    assert_eq!(settings.duration, 12.0);
    assert_eq!(settings.bits_per_channel, Some(16));

    let names: Vec<&str> = bp.compositions.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Inner", "Main"], "nested compositions come first");

    assert_eq!(bp.assets.len(), 1);
    let asset = &bp.assets[0];
    assert_eq!(asset.id, asset_id(s.img));
    assert_eq!(asset.path, "spot/plate.png");
    assert_eq!((asset.width, asset.height), (640, 480));
    assert_eq!(assembly.assets[0].source, PathBuf::from("/media/shots/plate.png"));
    assert!(assembly.diagnostics.errors().next().is_none());
}

#[test]
fn layers_are_listed_bottom_first_with_their_sources() {
    let s = scene();
    let assembly = assemble(&s.project, &[s.main], "spot", &ExportConfig::default())
        .expect("assemble");
    let main = assembly.blueprint.composition("Main").expect("main entry");
    assert_eq!(main.markers.len(), 1);
    assert_eq!(main.markers[0].name, "start");

    let names: Vec<&str> = main.layers.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Background", "Plate", "Inner", "Title"]);
    let indices: Vec<usize> = main.layers.iter().map(|l| l.index).collect();
    assert_eq!(indices, vec![4, 3, 2, 1]);

    let background = &main.layers[0];
    assert_eq!(
        background.source_parameters.as_ref().map(|p| p.color.clone()),
        Some(vec![0.2, 0.4, 0.6])
    );
    let plate = &main.layers[1];
    assert_eq!(plate.asset_id.as_deref(), Some(asset_id(s.img).as_str()));
    assert_eq!(plate.parent.as_deref(), Some("Inner"));
    let nested = &main.layers[2];
    assert_eq!(nested.ref_id.as_deref(), Some("Inner"));
}

#[test]
fn text_layer_carries_source_text_attributes_and_relative_keys() {
    let s = scene();
    let assembly = assemble(&s.project, &[s.main], "spot", &ExportConfig::default())
        .expect("assemble");
    let main = assembly.blueprint.composition("Main").expect("main entry");
    let title = main.layers.iter().find(|l| l.name == "Title").expect("title");

    assert_eq!(title.source_text.as_deref(), Some("Ready"));
    assert!(title.attributes.shy);
    assert_eq!(title.attributes.blending_mode.as_deref(), Some("MULTIPLY"));
    assert!(title.text_animators.is_empty());

    let text = title.properties.get("Text").expect("text group");
    let source = text.child("Source Text").expect("source text leaf");
    assert_eq!(source.value.as_ref().map(|v| v["text"].clone()), Some(json!("Ready")));

    let opacity = title
        .properties
        .get("Transform")
        .and_then(|t| t.child("Opacity"))
        .expect("animated opacity");
    let times: Vec<f64> = opacity
        .keyframes
        .as_ref()
        .expect("keys")
        .iter()
        .map(|k| k.time)
        .collect();
    assert_eq!(times, vec![0.0, 1.0]);
}

#[test]
fn untouched_layers_export_without_properties() {
    let s = scene();
    let assembly = assemble(&s.project, &[s.inner], "spot", &ExportConfig::default())
        .expect("assemble");
    let inner = &assembly.blueprint.compositions[0];
    assert_eq!(inner.layers.len(), 1);
    assert!(inner.layers[0].properties.is_empty());
    assert!(inner.layers[0].effects.is_none());
    assert!(inner.layers[0].masks.is_none());
}

#[test]
fn colliding_asset_file_names_are_prefixed() {
    let mut s = scene();
    let other = s.project.add_footage(
        "plate.png",
        100,
        100,
        FootageSource::File {
            path: PathBuf::from("/media/other/plate.png"),
        },
    );
    s.project
        .add_layer(s.main, LayerSpec::new("Other plate", LayerKind::Footage).with_source(other))
        .expect("second footage");

    let assembly = assemble(&s.project, &[s.main], "spot", &ExportConfig::default())
        .expect("assemble");
    // the topmost use is collected first and keeps the plain name
    let path_of = |id: ItemId| {
        assembly
            .blueprint
            .asset(&asset_id(id))
            .map(|a| a.path.clone())
            .expect("asset entry")
    };
    assert_eq!(path_of(other), "spot/plate.png");
    assert_eq!(path_of(s.img), format!("spot/{}_plate.png", s.img.0));
}

#[test]
fn duplicate_composition_names_are_reported() {
    let mut s = scene();
    let twin = s.project.add_composition("Inner", 10, 10, 30.0, 1.0);
    s.project
        .add_layer(s.main, LayerSpec::new("Twin", LayerKind::Precomp).with_source(twin))
        .expect("twin layer");
    let assembly = assemble(&s.project, &[s.main], "spot", &ExportConfig::default())
        .expect("assemble");
    assert_eq!(assembly.diagnostics.count(DiagnosticKind::Unresolved), 1);
    assert!(assembly.diagnostics.has_errors());
}

#[test]
fn invalid_selections_are_rejected() {
    let s = scene();
    let cfg = ExportConfig::default();
    assert!(matches!(
        assemble(&s.project, &[], "spot", &cfg),
        Err(BlueprintError::EmptySelection)
    ));
    assert!(matches!(
        assemble(&s.project, &[s.img], "spot", &cfg),
        Err(BlueprintError::UnknownComposition(_))
    ));
}
