use blueprint_core::{parse_blueprint, render_outline, Blueprint, Diagnostics, LayerEntry};
use blueprint_document_core::LayerKind;
use blueprint_test_fixtures::blueprints;

fn outline(name: &str) -> String {
    let json = blueprints::json(name).expect("fixture");
    let mut diagnostics = Diagnostics::new();
    let blueprint = parse_blueprint(&json, &mut diagnostics).expect("parse fixture");
    assert!(diagnostics.is_empty(), "fixture reads cleanly: {:?}", diagnostics.entries());
    render_outline(&blueprint)
}

#[test]
fn text_blueprint_outline() {
    let text = outline("text-title");
    let expected_lines = [
        "projectSettings:",
        "  bitsPerChannel: 8",
        "compositions:",
        "  - name: \"Titles\"",
        "      - name: \"Title\"",
        "        type: \"Text\"",
        "        sourceText: \"Hello\"",
        "        attributes: { shy: true }",
        "          \"Transform.Opacity\": { value: 40 }",
        "          \"Transform.Rotation\":",
        "            value: 0",
        "            expression: \"time * 90\"",
        "          \"Transform.Position\":",
        "            animated: true",
        "              - { time: 1.5, value: [960, 540, 0] }",
        "        textAnimators:",
        "          - name: \"Animator 1\"",
    ];
    for line in expected_lines {
        assert!(
            text.lines().any(|l| l == line),
            "missing line {line:?} in outline:\n{text}"
        );
    }
    assert!(!text.contains("assets:"), "no assets section when there are none");
}

#[test]
fn asset_and_marker_sections() {
    let text = outline("footage-single");
    assert!(text.contains("  - id: \"asset_1\"\n    path: \"img.png\"\n"));
    assert!(text.contains("      - { name: \"intro\", time: 0.5 }"));
    assert!(text.contains("        assetId: \"asset_1\""));
    assert!(text.contains("blendingMode: \"SCREEN\""));
}

#[test]
fn quotes_in_names_are_escaped() {
    let mut blueprint: Blueprint = serde_json::from_str(
        &blueprints::json("text-title").expect("fixture"),
    )
    .expect("typed fixture");
    let comp = &mut blueprint.compositions[0];
    comp.name = r#"The "Big" Open"#.into();
    let mut layer = LayerEntry::new(r"Path\to", 9, LayerKind::Null);
    layer.source_text = Some("line one\nline two".into());
    comp.layers.push(layer);

    let text = render_outline(&blueprint);
    assert!(text.contains(r#"  - name: "The \"Big\" Open""#), "{text}");
    assert!(text.contains(r#"      - name: "Path\\to""#), "{text}");
    assert!(text.contains(r#"        sourceText: "line one\nline two""#), "{text}");
}
