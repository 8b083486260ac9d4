//! Blueprint Disassembler: drives a [`DocumentHost`] to rebuild the document
//! a blueprint describes.
//!
//! Stages run `Parse -> ApplySettings -> ImportAssets -> BuildCompositions(i)
//! -> Done`. Only `Parse` can abort, and it does so before touching the host.
//! Later stages skip what they cannot build and record why in the report.
//! A critical host failure stops the build; the undo group is still closed.

use std::path::{Path, PathBuf};

use hashbrown::{HashMap, HashSet};
use log::{debug, info};
use serde::Serialize;

use blueprint_document_core::{
    CompositionSpec, DocumentHost, FootageImport, HostError, HostSettings, ItemId, LayerId,
    LayerKind, LayerSpec, SolidSpec,
};

use crate::builder::{apply_children, apply_group, BuildContext};
use crate::config::ImportConfig;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::{BlueprintError, BlueprintResult};
use crate::reader::read_tolerant;
use crate::schema::{
    parse_blending_mode, parse_track_matte, AssetEntry, Blueprint, CompositionEntry, LayerEntry,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "stage", content = "index", rename_all = "camelCase")]
pub enum ImportStage {
    Parse,
    ApplySettings,
    ImportAssets,
    /// Building the composition at this position of the `compositions` array.
    BuildCompositions(usize),
    Done,
    Aborted,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    /// Last stage reached.
    pub stage: ImportStage,
    pub assets_imported: usize,
    pub compositions_built: Vec<String>,
    pub layers_built: usize,
    /// Set when a critical host failure stopped the build.
    pub critical: Option<String>,
    pub diagnostics: Diagnostics,
}

impl ImportReport {
    fn new(diagnostics: Diagnostics) -> Self {
        Self {
            stage: ImportStage::Parse,
            assets_imported: 0,
            compositions_built: Vec::new(),
            layers_built: 0,
            critical: None,
            diagnostics,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.stage == ImportStage::Done
    }

    /// One-line terminal summary.
    pub fn summary(&self) -> String {
        let warnings = self.diagnostics.warnings().count();
        let errors = self.diagnostics.errors().count();
        let head = match &self.critical {
            Some(reason) => format!("Build stopped: {reason}."),
            None => "Build complete.".to_string(),
        };
        format!(
            "{head} {} compositions, {} layers, {} assets ({} warnings, {} errors)",
            self.compositions_built.len(),
            self.layers_built,
            self.assets_imported,
            warnings,
            errors
        )
    }
}

/// Asset paths containing a drive marker or starting at a root are taken as
/// is; anything else is relative to the blueprint's folder.
pub fn resolve_asset_path(path: &str, base_dir: &Path) -> PathBuf {
    let looks_absolute =
        path.contains(':') || path.starts_with('/') || path.starts_with('\\') || Path::new(path).is_absolute();
    if looks_absolute {
        PathBuf::from(path)
    } else {
        base_dir.join(path)
    }
}

/// Check the top-level shape. Nothing has touched the host yet.
pub fn validate(blueprint: &Blueprint) -> BlueprintResult<()> {
    if blueprint.compositions.is_empty() {
        return Err(BlueprintError::Format(
            "No compositions found in blueprint".into(),
        ));
    }
    Ok(())
}

/// Tolerant parse plus the top-level check. Entries that had to be skipped
/// are recorded in `diagnostics`.
pub fn parse_blueprint(json: &str, diagnostics: &mut Diagnostics) -> BlueprintResult<Blueprint> {
    let blueprint = read_tolerant(json, diagnostics)?;
    validate(&blueprint)?;
    Ok(blueprint)
}

enum Failure {
    /// Abandon this composition, keep going with the next one.
    Composition(BlueprintError),
    /// Stop building altogether. Always `BlueprintError::CriticalBuild`.
    Critical(BlueprintError),
}

impl From<HostError> for Failure {
    fn from(e: HostError) -> Self {
        if e.is_critical() {
            Failure::Critical(BlueprintError::CriticalBuild(e.to_string()))
        } else {
            Failure::Composition(e.into())
        }
    }
}

pub struct Disassembler<'h, H: DocumentHost> {
    host: &'h mut H,
    cfg: ImportConfig,
    base_dir: PathBuf,
    assets: HashMap<String, ItemId>,
    compositions: HashMap<String, ItemId>,
    /// Compositions this pass tried and could not build.
    failed: HashSet<String>,
    report: ImportReport,
}

impl<'h, H: DocumentHost> Disassembler<'h, H> {
    pub fn new(host: &'h mut H, base_dir: impl Into<PathBuf>, cfg: ImportConfig) -> Self {
        let diagnostics = Diagnostics::with_cfg(cfg.diagnostics.clone());
        Self {
            host,
            cfg,
            base_dir: base_dir.into(),
            assets: HashMap::new(),
            compositions: HashMap::new(),
            failed: HashSet::new(),
            report: ImportReport::new(diagnostics),
        }
    }

    /// Parse `json` and build it. Parse failures leave the host untouched.
    pub fn run_str(mut self, json: &str) -> BlueprintResult<ImportReport> {
        let blueprint = parse_blueprint(json, &mut self.report.diagnostics)?;
        self.run(&blueprint)
    }

    /// Carry entries recorded before the build, e.g. while reading the file.
    pub fn with_diagnostics(mut self, earlier: Diagnostics) -> Self {
        self.report.diagnostics.extend(earlier);
        self
    }

    pub fn run(mut self, blueprint: &Blueprint) -> BlueprintResult<ImportReport> {
        validate(blueprint)?;

        self.host.begin_undo_group(&self.cfg.undo_group_name);
        self.build(blueprint);
        self.host.end_undo_group();

        let summary = self.report.summary();
        self.report
            .diagnostics
            .info(DiagnosticKind::Summary, summary.clone(), "");
        info!("{summary}");
        Ok(self.report)
    }

    fn build(&mut self, blueprint: &Blueprint) {
        self.report.stage = ImportStage::ApplySettings;
        if self.cfg.apply_project_settings {
            let settings = &blueprint.project_settings;
            self.host.apply_settings(&HostSettings {
                bits_per_channel: settings.bits_per_channel,
                expression_engine: settings.expression_engine.clone(),
            });
        }

        self.report.stage = ImportStage::ImportAssets;
        for asset in &blueprint.assets {
            if let Err(err) = self.import_asset(asset) {
                self.halt(err);
                return;
            }
        }

        for (i, comp) in blueprint.compositions.iter().enumerate() {
            self.report.stage = ImportStage::BuildCompositions(i);
            match self.build_composition(comp) {
                Ok(id) => {
                    self.compositions.insert(comp.name.clone(), id);
                    self.report.compositions_built.push(comp.name.clone());
                }
                Err(Failure::Composition(e)) => {
                    self.failed.insert(comp.name.clone());
                    let kind = match e {
                        BlueprintError::ForwardReference { .. } => DiagnosticKind::ForwardReference,
                        BlueprintError::MissingDependency { .. } => DiagnosticKind::Unresolved,
                        _ => DiagnosticKind::LayerProcessing,
                    };
                    self.report.diagnostics.error(
                        kind,
                        format!("composition not built: {e}"),
                        comp.name.clone(),
                    );
                }
                Err(Failure::Critical(err)) => {
                    self.halt(err);
                    return;
                }
            }
        }
        self.report.stage = ImportStage::Done;
    }

    fn halt(&mut self, err: BlueprintError) {
        self.report.diagnostics.error(
            DiagnosticKind::CriticalBuild,
            format!("{err}; build stopped"),
            "",
        );
        let reason = match err {
            BlueprintError::CriticalBuild(reason) => reason,
            other => other.to_string(),
        };
        self.report.critical = Some(reason);
    }

    /// `Err` only for a critical host failure.
    fn import_asset(&mut self, asset: &AssetEntry) -> BlueprintResult<()> {
        let path = resolve_asset_path(&asset.path, &self.base_dir);
        if !path.is_file() {
            self.report.diagnostics.warn(
                DiagnosticKind::AssetMissing,
                format!("asset file not found: {}", path.display()),
                asset.id.clone(),
            );
            return Ok(());
        }
        let request = FootageImport {
            path,
            name: asset.name.clone(),
            width: asset.width,
            height: asset.height,
        };
        match self.host.import_footage(request) {
            Ok(item) => {
                debug!("imported asset {} as {item}", asset.id);
                self.assets.insert(asset.id.clone(), item);
                self.report.assets_imported += 1;
                Ok(())
            }
            Err(e) if e.is_critical() => Err(BlueprintError::CriticalBuild(e.to_string())),
            Err(e) => {
                self.report.diagnostics.warn(
                    DiagnosticKind::AssetMissing,
                    format!("asset not imported: {e}"),
                    asset.id.clone(),
                );
                Ok(())
            }
        }
    }

    fn build_composition(&mut self, entry: &CompositionEntry) -> Result<ItemId, Failure> {
        // every Pre-comp reference must name a composition built earlier in
        // this pass; check before creating anything
        for layer in entry.layers.iter().filter(|l| l.kind == LayerKind::Precomp) {
            if let Some(reference) = &layer.ref_id {
                if self.failed.contains(reference) {
                    return Err(Failure::Composition(BlueprintError::MissingDependency {
                        composition: entry.name.clone(),
                        dependency: reference.clone(),
                    }));
                }
                if !self.compositions.contains_key(reference) {
                    return Err(Failure::Composition(BlueprintError::ForwardReference {
                        composition: entry.name.clone(),
                        reference: reference.clone(),
                    }));
                }
            }
        }

        let comp = self.host.create_composition(CompositionSpec {
            name: entry.name.clone(),
            width: entry.width,
            height: entry.height,
            frame_rate: entry.frame_rate,
            duration: entry.duration,
        })?;
        for marker in &entry.markers {
            self.host.add_marker(comp, &marker.name, marker.time)?;
        }

        // phase one: create every layer, bottom of the stack first
        let mut by_name: HashMap<&str, LayerId> = HashMap::new();
        let mut built: Vec<(LayerId, &LayerEntry)> = Vec::with_capacity(entry.layers.len());
        for layer in &entry.layers {
            let context = format!("{} / {}", entry.name, layer.name);
            match self.build_layer(comp, entry, layer) {
                Ok(id) => {
                    by_name.entry(layer.name.as_str()).or_insert(id);
                    built.push((id, layer));
                    self.report.layers_built += 1;
                }
                Err(BlueprintError::Host(e)) if e.is_critical() => {
                    return Err(e.into());
                }
                Err(e) => self.report.diagnostics.warn(
                    DiagnosticKind::LayerProcessing,
                    format!("layer skipped: {e}"),
                    context,
                ),
            }
        }

        // phase two: parents, then locks
        for (id, layer) in &built {
            let context = format!("{} / {}", entry.name, layer.name);
            if let Some(parent_name) = &layer.parent {
                match by_name.get(parent_name.as_str()) {
                    Some(parent) if parent == id => self.report.diagnostics.warn(
                        DiagnosticKind::Unresolved,
                        "layer names itself as parent; ignored",
                        context.clone(),
                    ),
                    Some(parent) => {
                        if let Err(e) = self.host.set_parent(comp, *id, Some(*parent)) {
                            if e.is_critical() {
                                return Err(e.into());
                            }
                            self.report.diagnostics.warn(
                                DiagnosticKind::Unresolved,
                                format!("parent '{parent_name}' not set: {e}"),
                                context.clone(),
                            );
                        }
                    }
                    None => self.report.diagnostics.warn(
                        DiagnosticKind::Unresolved,
                        format!("parent '{parent_name}' not found in composition"),
                        context.clone(),
                    ),
                }
            }
            if layer.attributes.locked {
                if let Some(target) = self.host.layer_mut(comp, *id) {
                    target.attributes.locked = true;
                }
            }
        }
        debug!(
            "built composition '{}' with {} of {} layers",
            entry.name,
            built.len(),
            entry.layers.len()
        );
        Ok(comp)
    }

    fn build_layer(
        &mut self,
        comp: ItemId,
        comp_entry: &CompositionEntry,
        entry: &LayerEntry,
    ) -> BlueprintResult<LayerId> {
        let skip = |reason: String| BlueprintError::Layer {
            layer: entry.name.clone(),
            reason,
        };
        let mut spec = LayerSpec::new(entry.name.clone(), entry.kind);
        match entry.kind {
            LayerKind::Footage | LayerKind::Audio => {
                let id = entry
                    .asset_id
                    .as_deref()
                    .ok_or_else(|| skip("no assetId".into()))?;
                let item = self
                    .assets
                    .get(id)
                    .ok_or_else(|| skip(format!("asset '{id}' was not imported")))?;
                spec = spec.with_source(*item);
            }
            LayerKind::Precomp => {
                let name = entry
                    .ref_id
                    .as_deref()
                    .ok_or_else(|| skip("no refId".into()))?;
                let item = self
                    .compositions
                    .get(name)
                    .ok_or_else(|| skip(format!("composition '{name}' is not built")))?;
                spec = spec.with_source(*item);
            }
            LayerKind::Solid => {
                let color = entry
                    .source_parameters
                    .as_ref()
                    .map(|p| p.rgb())
                    .unwrap_or([0.0, 0.0, 0.0]);
                spec = spec.with_solid(SolidSpec {
                    color,
                    width: comp_entry.width,
                    height: comp_entry.height,
                });
            }
            LayerKind::Text => {
                spec = spec.with_text(entry.source_text.clone().unwrap_or_default());
            }
            LayerKind::Unknown => return Err(skip("unknown layer type".into())),
            LayerKind::Camera | LayerKind::Light | LayerKind::Shape | LayerKind::Null => {}
        }

        let id = self.host.add_layer(comp, spec)?;
        let context = format!("{} / {}", comp_entry.name, entry.name);
        let diagnostics = &mut self.report.diagnostics;
        let layer = self.host.layer_mut(comp, id).ok_or_else(|| {
            skip("host lost the layer it just created".into())
        })?;

        layer.start_time = entry.start_time;
        layer.in_point = entry.in_point;
        if entry.out_point > entry.in_point {
            layer.out_point = entry.out_point;
        }

        let attrs = &entry.attributes;
        layer.attributes.three_d = attrs.three_d;
        layer.attributes.adjustment_layer = attrs.adjustment_layer;
        layer.attributes.shy = attrs.shy;
        layer.attributes.solo = attrs.solo;
        if let Some(name) = &attrs.blending_mode {
            match parse_blending_mode(name) {
                Some(mode) => layer.attributes.blending_mode = mode,
                None => diagnostics.warn(
                    DiagnosticKind::SchemaDrift,
                    format!("unknown blending mode '{name}'"),
                    context.clone(),
                ),
            }
        }
        if let Some(matte) = &attrs.track_matte {
            layer.attributes.track_matte = parse_track_matte(&matte.mode);
        }

        let in_point = entry.in_point;
        let mut ctx = BuildContext::new(diagnostics).scoped(context);
        apply_children(&mut layer.root, &entry.properties, in_point, &mut ctx);
        if let Some(node) = &entry.effects {
            match layer.effects_mut() {
                Some(group) => apply_group(group, node, in_point, &mut ctx),
                None => ctx_warn_missing(&mut ctx, "effects"),
            }
        }
        if let Some(node) = &entry.masks {
            match layer.masks_mut() {
                Some(group) => apply_group(group, node, in_point, &mut ctx),
                None => ctx_warn_missing(&mut ctx, "masks"),
            }
        }
        Ok(id)
    }
}

fn ctx_warn_missing(ctx: &mut BuildContext<'_>, what: &str) {
    ctx.warn(
        DiagnosticKind::SchemaDrift,
        format!("layer type has no {what}; skipped"),
    );
}

/// Build `json` into `host`, resolving relative asset paths against `base_dir`.
pub fn import_blueprint<H: DocumentHost>(
    host: &mut H,
    json: &str,
    base_dir: &Path,
    cfg: ImportConfig,
) -> BlueprintResult<ImportReport> {
    Disassembler::new(host, base_dir, cfg).run_str(json)
}
