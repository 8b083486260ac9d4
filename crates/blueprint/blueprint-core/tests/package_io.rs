use std::fs;

use blueprint_core::{
    export_to_path, import_from_path, read_blueprint, render_outline, BlueprintError,
    DiagnosticKind, ExportConfig, ImportConfig,
};
use blueprint_document_core::{
    match_names as mn, DocumentHost, FootageSource, LayerKind, LayerSpec, Project, PropertyValue,
};

#[test]
fn export_copies_assets_and_reimports() {
    let media = tempfile::tempdir().expect("media dir");
    let out = tempfile::tempdir().expect("out dir");
    let plate_src = media.path().join("plate.png");
    fs::write(&plate_src, b"plate bytes").expect("write plate");

    let mut project = Project::new();
    let plate = project.add_footage("plate.png", 320, 240, FootageSource::File { path: plate_src });
    let gone = project.add_footage(
        "gone.mov",
        320,
        240,
        FootageSource::File {
            path: media.path().join("gone.mov"),
        },
    );
    let main = project.add_composition("Main", 320, 240, 30.0, 5.0);
    project
        .add_layer(main, LayerSpec::new("gone", LayerKind::Footage).with_source(gone))
        .expect("gone layer");
    let layer = project
        .add_layer(main, LayerSpec::new("plate", LayerKind::Footage).with_source(plate))
        .expect("plate layer");
    project
        .layer_mut(main, layer)
        .and_then(|l| l.transform_mut())
        .and_then(|t| t.leaf_mut(mn::OPACITY))
        .expect("opacity")
        .set_value(PropertyValue::Scalar(50.0));

    let json_path = out.path().join("spot.json");
    let summary = export_to_path(&project, &[main], &json_path, &ExportConfig::default())
        .expect("export");
    assert!(json_path.is_file());
    assert_eq!(summary.assets_dir, out.path().join("spot"));
    assert_eq!(summary.copied, vec![out.path().join("spot").join("plate.png")]);
    assert_eq!(
        fs::read(out.path().join("spot/plate.png")).expect("copied file"),
        b"plate bytes"
    );
    assert_eq!(summary.blueprint.assets.len(), 1, "missing file is dropped");
    assert_eq!(summary.blueprint.assets[0].path, "spot/plate.png");
    assert_eq!(summary.diagnostics.count(DiagnosticKind::AssetMissing), 1);

    let loaded = read_blueprint(&json_path).expect("read back");
    assert_eq!(loaded.base_dir, out.path());
    assert_eq!(loaded.blueprint, summary.blueprint);
    assert!(render_outline(&loaded.blueprint).contains("\"Transform.Opacity\": { value: 50.0 }"));

    let mut rebuilt = Project::new();
    let report = import_from_path(&mut rebuilt, &json_path, ImportConfig::default())
        .expect("reimport");
    assert_eq!(report.assets_imported, 1);
    // the layer whose asset was dropped cannot be rebuilt
    assert_eq!(report.diagnostics.count(DiagnosticKind::LayerProcessing), 1);

    let comp = rebuilt.composition_by_name("Main").expect("main rebuilt");
    assert_eq!(comp.num_layers(), 1);
    let plate_layer = comp.layer(1).expect("plate layer");
    let footage = plate_layer
        .source
        .and_then(|id| rebuilt.footage(id))
        .expect("plate footage");
    assert_eq!(footage.file_path(), Some(out.path().join("spot/plate.png").as_path()));
    assert_eq!(
        plate_layer
            .transform()
            .and_then(|t| t.leaf(mn::OPACITY))
            .and_then(|l| l.value.clone()),
        Some(PropertyValue::Scalar(50.0))
    );
}

#[test]
fn explicit_assets_folder_and_no_copy() {
    let media = tempfile::tempdir().expect("media dir");
    let out = tempfile::tempdir().expect("out dir");
    let src = media.path().join("clip.mov");
    fs::write(&src, b"clip").expect("write clip");

    let mut project = Project::new();
    let clip = project.add_footage("clip.mov", 10, 10, FootageSource::File { path: src });
    let main = project.add_composition("Main", 10, 10, 30.0, 1.0);
    project
        .add_layer(main, LayerSpec::new("clip", LayerKind::Footage).with_source(clip))
        .expect("clip layer");

    let cfg = ExportConfig {
        assets_dir_name: Some("media".into()),
        copy_assets: false,
        pretty: false,
        ..ExportConfig::default()
    };
    let json_path = out.path().join("scene.json");
    let summary = export_to_path(&project, &[main], &json_path, &cfg).expect("export");
    assert!(summary.copied.is_empty());
    assert!(!out.path().join("media").exists());
    assert_eq!(summary.blueprint.assets[0].path, "media/clip.mov");

    let text = fs::read_to_string(&json_path).expect("json");
    assert_eq!(text.lines().count(), 1, "compact output is a single line");
}

#[test]
fn unreadable_files_are_format_errors() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ \"compositions\": ").expect("write");
    assert!(matches!(read_blueprint(&path), Err(BlueprintError::Format(_))));

    let empty = dir.path().join("empty.json");
    fs::write(&empty, r#"{ "assets": [], "compositions": [] }"#).expect("write");
    assert!(matches!(read_blueprint(&empty), Err(BlueprintError::Format(_))));

    assert!(matches!(
        read_blueprint(&dir.path().join("absent.json")),
        Err(BlueprintError::Io(_))
    ));
}
