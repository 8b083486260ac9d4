//! Blueprint Assembler: turns the dependency closure of a selection into a
//! [`Blueprint`].
//!
//! Pure with respect to the filesystem. Asset paths are planned relative to
//! `assets_dir`; copying (and dropping assets whose file is gone) is left to
//! [`crate::package`].

use std::path::PathBuf;

use hashbrown::HashSet;
use log::{debug, info};

use blueprint_document_core::{
    match_names, Composition, ItemId, Layer, LayerAttributes, LayerKind, Project,
};

use crate::animators::extract_text_animators;
use crate::collector::collect;
use crate::config::ExportConfig;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::{BlueprintError, BlueprintResult};
use crate::schema::{
    blending_mode_name, track_matte_name, AssetEntry, AttributesEntry, Blueprint,
    CompositionEntry, LayerEntry, MarkerEntry, ProjectSettings, SourceParameters,
    TrackMatteEntry,
};
use crate::serializer::{serialize_group, SerializeContext};

/// An asset the blueprint refers to and the file it should be copied from.
#[derive(Clone, Debug, PartialEq)]
pub struct PlannedAsset {
    pub item: ItemId,
    pub source: PathBuf,
    /// File name inside the assets folder.
    pub file_name: String,
    pub entry: AssetEntry,
}

#[derive(Debug)]
pub struct Assembly {
    pub blueprint: Blueprint,
    pub assets: Vec<PlannedAsset>,
    pub diagnostics: Diagnostics,
}

/// Interchange id of a footage item.
pub fn asset_id(item: ItemId) -> String {
    format!("asset_{}", item.0)
}

pub fn assemble(
    project: &Project,
    roots: &[ItemId],
    assets_dir: &str,
    cfg: &ExportConfig,
) -> BlueprintResult<Assembly> {
    let Some(&first) = roots.first() else {
        return Err(BlueprintError::EmptySelection);
    };
    for &root in roots {
        if !project.is_composition(root) {
            return Err(BlueprintError::UnknownComposition(root.to_string()));
        }
    }
    let first = project
        .composition(first)
        .ok_or_else(|| BlueprintError::UnknownComposition(first.to_string()))?;

    let mut diagnostics = Diagnostics::with_cfg(cfg.diagnostics.clone());
    let closure = collect(project, roots);

    let mut names: HashSet<&str> = HashSet::new();
    for &id in &closure.compositions {
        if let Some(comp) = project.composition(id) {
            if !names.insert(comp.name.as_str()) {
                diagnostics.error(
                    DiagnosticKind::Unresolved,
                    format!(
                        "composition name '{}' is used more than once; references to it are ambiguous",
                        comp.name
                    ),
                    comp.name.clone(),
                );
            }
        }
    }

    let assets = plan_assets(project, &closure.assets, assets_dir);

    let mut compositions = Vec::with_capacity(closure.build_order.len());
    for &id in &closure.build_order {
        if let Some(comp) = project.composition(id) {
            compositions.push(export_composition(project, comp, cfg, &mut diagnostics));
        }
    }

    let blueprint = Blueprint {
        project_settings: ProjectSettings {
            bits_per_channel: Some(project.bits_per_channel),
            expression_engine: project.expression_engine.clone(),
            width: first.width,
            height: first.height,
            frame_rate: first.frame_rate,
            duration: first.duration,
        },
        assets: assets.iter().map(|a| a.entry.clone()).collect(),
        compositions,
    };
    info!(
        "assembled blueprint: {} compositions, {} assets",
        blueprint.compositions.len(),
        blueprint.assets.len()
    );
    Ok(Assembly {
        blueprint,
        assets,
        diagnostics,
    })
}

fn plan_assets(project: &Project, items: &[ItemId], assets_dir: &str) -> Vec<PlannedAsset> {
    let mut used: HashSet<String> = HashSet::new();
    let mut planned = Vec::with_capacity(items.len());
    for &item in items {
        let Some(footage) = project.footage(item) else {
            continue;
        };
        let Some(path) = footage.file_path() else {
            continue;
        };
        let base = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| footage.name.clone());
        // two different files sharing a name would overwrite each other
        let file_name = if used.contains(&base) {
            format!("{}_{}", item.0, base)
        } else {
            base
        };
        used.insert(file_name.clone());
        planned.push(PlannedAsset {
            item,
            source: path.to_path_buf(),
            entry: AssetEntry {
                id: asset_id(item),
                name: footage.name.clone(),
                path: format!("{assets_dir}/{file_name}"),
                width: footage.width,
                height: footage.height,
            },
            file_name,
        });
    }
    planned
}

fn export_composition(
    project: &Project,
    comp: &Composition,
    cfg: &ExportConfig,
    diagnostics: &mut Diagnostics,
) -> CompositionEntry {
    let mut layers = Vec::with_capacity(comp.num_layers());
    // bottom of the stack first: rebuilding in array order, each new layer
    // landing on top, reproduces the stack
    for index in (1..=comp.num_layers()).rev() {
        let Some(layer) = comp.layer(index) else {
            continue;
        };
        match export_layer(project, comp, index, layer, cfg, diagnostics) {
            Ok(entry) => layers.push(entry),
            Err(e) => diagnostics.warn(
                DiagnosticKind::LayerProcessing,
                format!("layer skipped: {e}"),
                format!("{} / {}", comp.name, layer.name),
            ),
        }
    }
    debug!("exported composition '{}' ({} layers)", comp.name, layers.len());
    CompositionEntry {
        name: comp.name.clone(),
        width: comp.width,
        height: comp.height,
        frame_rate: comp.frame_rate,
        duration: comp.duration,
        markers: comp
            .markers
            .iter()
            .map(|m| MarkerEntry {
                name: m.comment.clone(),
                time: m.time,
            })
            .collect(),
        layers,
    }
}

pub fn export_attributes(attrs: &LayerAttributes) -> AttributesEntry {
    AttributesEntry {
        three_d: attrs.three_d,
        adjustment_layer: attrs.adjustment_layer,
        locked: attrs.locked,
        shy: attrs.shy,
        solo: attrs.solo,
        blending_mode: (!attrs.blending_mode.is_normal())
            .then(|| blending_mode_name(attrs.blending_mode)),
        track_matte: attrs.track_matte.map(|mode| TrackMatteEntry {
            mode: track_matte_name(mode),
        }),
    }
}

fn layer_error(layer: &Layer, reason: impl Into<String>) -> BlueprintError {
    BlueprintError::Layer {
        layer: layer.name.clone(),
        reason: reason.into(),
    }
}

fn export_layer(
    project: &Project,
    comp: &Composition,
    index: usize,
    layer: &Layer,
    cfg: &ExportConfig,
    diagnostics: &mut Diagnostics,
) -> BlueprintResult<LayerEntry> {
    let mut entry = LayerEntry::new(layer.name.clone(), index, layer.kind);
    entry.in_point = layer.in_point;
    entry.out_point = layer.out_point;
    entry.start_time = layer.start_time;
    entry.attributes = export_attributes(&layer.attributes);
    if let Some(parent) = layer.parent {
        let parent = comp
            .layer_by_id(parent)
            .ok_or_else(|| layer_error(layer, "parent layer is not in this composition"))?;
        entry.parent = Some(parent.name.clone());
    }

    let in_point = layer.in_point;
    let mut ctx = SerializeContext::new(cfg, diagnostics)
        .scoped(format!("{} / {}", comp.name, layer.name));

    match layer.kind {
        LayerKind::Text => {
            entry.source_text = layer.source_text().map(|doc| doc.text.clone());
            if let Some(text) = layer.text_properties() {
                if let Some(node) = serialize_group(text, in_point, &mut ctx) {
                    entry.text_animators = extract_text_animators(&node);
                    entry.properties.insert(text.name.clone(), node);
                }
            }
        }
        LayerKind::Shape => {
            if let Some(contents) = layer.contents() {
                if let Some(node) = serialize_group(contents, in_point, &mut ctx) {
                    entry.properties.insert(contents.name.clone(), node);
                }
            }
        }
        LayerKind::Camera | LayerKind::Light => {
            for options in layer.root.children.iter().filter_map(|c| c.as_group()) {
                let is_options = options.match_name == match_names::CAMERA_OPTIONS
                    || options.match_name == match_names::LIGHT_OPTIONS;
                if is_options {
                    if let Some(node) = serialize_group(options, in_point, &mut ctx) {
                        entry.properties.insert(options.name.clone(), node);
                    }
                }
            }
        }
        LayerKind::Solid => {
            let color = layer
                .source
                .and_then(|id| project.footage(id))
                .and_then(|item| item.solid_color())
                .ok_or_else(|| layer_error(layer, "solid layer has no solid source"))?;
            entry.source_parameters = Some(SourceParameters {
                color: color.to_vec(),
            });
        }
        LayerKind::Footage | LayerKind::Audio => {
            let source = layer
                .source
                .filter(|id| project.footage(*id).is_some())
                .ok_or_else(|| layer_error(layer, "footage source is missing"))?;
            entry.asset_id = Some(asset_id(source));
        }
        LayerKind::Precomp => {
            let source = layer
                .source
                .and_then(|id| project.composition(id))
                .ok_or_else(|| layer_error(layer, "pre-comp source is missing"))?;
            entry.ref_id = Some(source.name.clone());
        }
        LayerKind::Null | LayerKind::Unknown => {}
    }

    if let Some(transform) = layer.transform() {
        if let Some(node) = serialize_group(transform, in_point, &mut ctx) {
            entry.properties.insert(transform.name.clone(), node);
        }
    }
    if let Some(effects) = layer.effects().filter(|g| !g.is_empty()) {
        entry.effects = serialize_group(effects, in_point, &mut ctx);
    }
    if let Some(masks) = layer.masks().filter(|g| !g.is_empty()) {
        entry.masks = serialize_group(masks, in_point, &mut ctx);
    }
    Ok(entry)
}
