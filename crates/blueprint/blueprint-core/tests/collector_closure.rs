use std::path::PathBuf;

use blueprint_core::collect;
use blueprint_document_core::{
    DocumentHost, FootageSource, ItemId, LayerKind, LayerSpec, Project, SolidSpec,
};

fn footage_layer(project: &mut Project, comp: ItemId, item: ItemId, name: &str) {
    project
        .add_layer(comp, LayerSpec::new(name, LayerKind::Footage).with_source(item))
        .expect("footage layer");
}

fn precomp_layer(project: &mut Project, comp: ItemId, inner: ItemId, name: &str) {
    project
        .add_layer(comp, LayerSpec::new(name, LayerKind::Precomp).with_source(inner))
        .expect("precomp layer");
}

#[test]
fn shared_dependencies_are_listed_once() {
    let mut project = Project::new();
    let img = project.add_footage(
        "img.png",
        100,
        100,
        FootageSource::File {
            path: PathBuf::from("/media/img.png"),
        },
    );
    let inner = project.add_composition("Inner", 100, 100, 30.0, 2.0);
    footage_layer(&mut project, inner, img, "img A");
    footage_layer(&mut project, inner, img, "img B");

    let main = project.add_composition("Main", 1920, 1080, 30.0, 10.0);
    precomp_layer(&mut project, main, inner, "Inner 1");
    precomp_layer(&mut project, main, inner, "Inner 2");
    footage_layer(&mut project, main, img, "img C");

    let closure = collect(&project, &[main, inner]);
    assert_eq!(closure.compositions, vec![main, inner]);
    assert_eq!(closure.assets, vec![img]);
    assert_eq!(closure.build_order, vec![inner, main]);
}

#[test]
fn solids_and_placeholders_are_not_assets() {
    let mut project = Project::new();
    let placeholder = project.add_footage("missing", 10, 10, FootageSource::Placeholder);
    let main = project.add_composition("Main", 640, 360, 24.0, 3.0);
    project
        .add_layer(
            main,
            LayerSpec::new("BG", LayerKind::Solid).with_solid(SolidSpec {
                color: [0.0, 0.0, 0.0],
                width: 640,
                height: 360,
            }),
        )
        .expect("solid");
    footage_layer(&mut project, main, placeholder, "missing");

    let closure = collect(&project, &[main]);
    assert_eq!(closure.compositions, vec![main]);
    assert!(closure.assets.is_empty());
}

#[test]
fn nested_chain_is_collected_depth_first() {
    let mut project = Project::new();
    let leaf = project.add_composition("Leaf", 10, 10, 30.0, 1.0);
    let mid = project.add_composition("Mid", 10, 10, 30.0, 1.0);
    let top = project.add_composition("Top", 10, 10, 30.0, 1.0);
    let other = project.add_composition("Other", 10, 10, 30.0, 1.0);
    precomp_layer(&mut project, mid, leaf, "Leaf");
    precomp_layer(&mut project, top, mid, "Mid");

    let closure = collect(&project, &[top]);
    assert_eq!(closure.compositions, vec![top, mid, leaf]);
    assert_eq!(closure.build_order, vec![leaf, mid, top]);
    assert!(!closure.contains_composition(other));
}

#[test]
fn reference_cycles_terminate() {
    let mut project = Project::new();
    let a = project.add_composition("A", 10, 10, 30.0, 1.0);
    let b = project.add_composition("B", 10, 10, 30.0, 1.0);
    precomp_layer(&mut project, a, b, "B");
    precomp_layer(&mut project, b, a, "A");

    let closure = collect(&project, &[a]);
    assert_eq!(closure.compositions, vec![a, b]);
    assert_eq!(closure.build_order.len(), 2);
}

#[test]
fn non_composition_roots_are_ignored() {
    let mut project = Project::new();
    let img = project.add_footage("img", 1, 1, FootageSource::Placeholder);
    let closure = collect(&project, &[img, ItemId(999)]);
    assert!(closure.compositions.is_empty());
    assert!(closure.assets.is_empty());
}
