//! File-level glue: write a blueprint plus its sibling assets folder, and read
//! one back for import.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use blueprint_document_core::{DocumentHost, ItemId, Project};

use crate::assembler::assemble;
use crate::config::{ExportConfig, ImportConfig};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::disassembler::{validate, Disassembler, ImportReport};
use crate::error::{BlueprintError, BlueprintResult};
use crate::reader::read_tolerant;
use crate::schema::Blueprint;

#[derive(Debug)]
pub struct ExportSummary {
    pub json_path: PathBuf,
    pub assets_dir: PathBuf,
    /// Destination paths of the copied asset files.
    pub copied: Vec<PathBuf>,
    pub blueprint: Blueprint,
    pub diagnostics: Diagnostics,
}

/// A blueprint read from disk together with the folder relative asset paths
/// resolve against.
#[derive(Debug, Clone)]
pub struct LoadedBlueprint {
    pub blueprint: Blueprint,
    pub base_dir: PathBuf,
    /// Entries skipped while reading.
    pub diagnostics: Diagnostics,
}

/// Base name of the output file, used as the assets folder name.
pub fn assets_dir_name(out_path: &Path) -> String {
    out_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "blueprint".to_string())
}

/// Export `roots` and their dependencies to `out_path`.
///
/// Asset files are copied into `<out_dir>/<assets_dir>/`. An asset whose file
/// no longer exists is dropped from the blueprint with an `AssetMissing`
/// warning. Files copied before a later failure are left in place.
pub fn export_to_path(
    project: &Project,
    roots: &[ItemId],
    out_path: &Path,
    cfg: &ExportConfig,
) -> BlueprintResult<ExportSummary> {
    let dir_name = cfg
        .assets_dir_name
        .clone()
        .unwrap_or_else(|| assets_dir_name(out_path));
    let out_dir = out_path.parent().unwrap_or_else(|| Path::new("."));
    let assets_dir = out_dir.join(&dir_name);

    let assembly = assemble(project, roots, &dir_name, cfg)?;
    let mut blueprint = assembly.blueprint;
    let mut diagnostics = assembly.diagnostics;
    let mut copied = Vec::new();
    let mut missing = Vec::new();

    for planned in &assembly.assets {
        if !planned.source.is_file() {
            diagnostics.warn(
                DiagnosticKind::AssetMissing,
                format!("asset file not found: {}", planned.source.display()),
                planned.entry.id.clone(),
            );
            missing.push(planned.entry.id.clone());
            continue;
        }
        if cfg.copy_assets {
            fs::create_dir_all(&assets_dir)?;
            let dest = assets_dir.join(&planned.file_name);
            fs::copy(&planned.source, &dest)?;
            copied.push(dest);
        }
    }
    blueprint.assets.retain(|a| !missing.contains(&a.id));

    let json = blueprint.to_json_string(cfg.pretty)?;
    fs::write(out_path, json)?;
    info!(
        "exported {} compositions and {} assets to {}",
        blueprint.compositions.len(),
        blueprint.assets.len(),
        out_path.display()
    );

    Ok(ExportSummary {
        json_path: out_path.to_path_buf(),
        assets_dir,
        copied,
        blueprint,
        diagnostics,
    })
}

/// Read and validate a blueprint file.
pub fn read_blueprint(path: &Path) -> BlueprintResult<LoadedBlueprint> {
    let text = fs::read_to_string(path)?;
    let mut diagnostics = Diagnostics::new();
    let blueprint = read_tolerant(&text, &mut diagnostics).map_err(|e| match e {
        BlueprintError::Format(reason) => {
            BlueprintError::Format(format!("{}: {reason}", path.display()))
        }
        other => other,
    })?;
    validate(&blueprint)?;
    let base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok(LoadedBlueprint {
        blueprint,
        base_dir,
        diagnostics,
    })
}

/// Read `path` and build it into `host`.
pub fn import_from_path<H: DocumentHost>(
    host: &mut H,
    path: &Path,
    cfg: ImportConfig,
) -> BlueprintResult<ImportReport> {
    let loaded = read_blueprint(path)?;
    Disassembler::new(host, loaded.base_dir, cfg)
        .with_diagnostics(loaded.diagnostics)
        .run(&loaded.blueprint)
}
