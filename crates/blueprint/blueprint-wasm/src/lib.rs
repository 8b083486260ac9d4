//! wasm-bindgen surface for blueprints: build one into an in-memory project,
//! export compositions back out, and inspect blueprint JSON.
//!
//! Blueprint arguments may be a JSON string or a plain JS object. The browser
//! has no filesystem, so asset files never resolve and footage layers are
//! reported in the import diagnostics instead of being built.

use js_sys::JSON;
use serde::Serialize;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use blueprint_core::{
    assemble, extract_text_animators, parse_blueprint, render_outline, translate_outline,
    Diagnostics, Disassembler, EffectManifest, ExportConfig, ImportConfig, PropertyNodeJson,
};
use blueprint_document_core::{ItemId, Project};

const DEFAULT_ASSETS_DIR: &str = "assets";

fn is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn json_text(value: &JsValue, what: &str) -> Result<String, JsError> {
    if is_undefined_or_null(value) {
        return Err(JsError::new(&format!("{what}: value is null/undefined")));
    }
    if let Some(s) = value.as_string() {
        return Ok(s);
    }
    JSON::stringify(value)
        .map_err(|e| JsError::new(&format!("{what}: stringify error: {e:?}")))?
        .as_string()
        .ok_or_else(|| JsError::new(&format!("{what}: stringify produced non-string")))
}

fn config_from<T: Default + serde::de::DeserializeOwned>(
    value: JsValue,
    what: &str,
) -> Result<T, JsError> {
    if is_undefined_or_null(&value) {
        Ok(T::default())
    } else {
        swb::from_value(value).map_err(|e| JsError::new(&format!("{what} error: {e}")))
    }
}

/// Plain objects rather than JS `Map`s for keyed data.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    value
        .serialize(&swb::Serializer::json_compatible())
        .map_err(|e| JsError::new(&format!("serialize error: {e}")))
}

#[derive(Serialize)]
struct ExportResult<'a> {
    blueprint: &'a blueprint_core::Blueprint,
    diagnostics: &'a Diagnostics,
}

#[wasm_bindgen]
pub struct BlueprintWorkspace {
    project: Project,
    base_dir: String,
}

impl Default for BlueprintWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl BlueprintWorkspace {
    /// Empty workspace backed by an in-memory project.
    #[wasm_bindgen(constructor)]
    pub fn new() -> BlueprintWorkspace {
        console_error_panic_hook::set_once();
        BlueprintWorkspace {
            project: Project::new(),
            base_dir: ".".into(),
        }
    }

    /// Folder relative asset paths resolve against.
    #[wasm_bindgen(js_name = set_base_dir)]
    pub fn set_base_dir(&mut self, dir: String) {
        self.base_dir = dir;
    }

    /// Build `blueprint` into the workspace. `config` is optional JSON matching
    /// ImportConfig. Returns the import report.
    #[wasm_bindgen(js_name = import_blueprint)]
    pub fn import_blueprint(&mut self, blueprint: JsValue, config: JsValue) -> Result<JsValue, JsError> {
        let text = json_text(&blueprint, "import_blueprint")?;
        let cfg: ImportConfig = config_from(config, "import config")?;
        let report = Disassembler::new(&mut self.project, self.base_dir.clone(), cfg)
            .run_str(&text)
            .map_err(|e| JsError::new(&e.to_string()))?;
        to_js(&report)
    }

    /// Export the named compositions and their dependencies. Returns
    /// `{ blueprint, diagnostics }`; no files are copied.
    #[wasm_bindgen(js_name = export_blueprint)]
    pub fn export_blueprint(&self, compositions: Vec<String>, config: JsValue) -> Result<JsValue, JsError> {
        let cfg: ExportConfig = config_from(config, "export config")?;
        let roots = compositions
            .iter()
            .map(|name| {
                self.project
                    .composition_by_name(name)
                    .map(|c| c.id)
                    .ok_or_else(|| JsError::new(&format!("unknown composition '{name}'")))
            })
            .collect::<Result<Vec<ItemId>, JsError>>()?;
        let assets_dir = cfg
            .assets_dir_name
            .clone()
            .unwrap_or_else(|| DEFAULT_ASSETS_DIR.to_string());
        let assembly = assemble(&self.project, &roots, &assets_dir, &cfg)
            .map_err(|e| JsError::new(&e.to_string()))?;
        to_js(&ExportResult {
            blueprint: &assembly.blueprint,
            diagnostics: &assembly.diagnostics,
        })
    }

    #[wasm_bindgen(js_name = composition_names)]
    pub fn composition_names(&self) -> Vec<String> {
        self.project.compositions().map(|c| c.name.clone()).collect()
    }
}

#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}

#[derive(Serialize)]
struct NormalizeResult<'a> {
    blueprint: &'a blueprint_core::Blueprint,
    diagnostics: &'a Diagnostics,
}

fn parse(text: &str, diagnostics: &mut Diagnostics) -> Result<blueprint_core::Blueprint, JsError> {
    parse_blueprint(text, diagnostics).map_err(|e| JsError::new(&e.to_string()))
}

/// Parse and validate a blueprint. Returns `{ blueprint, diagnostics }` with
/// defaults filled in and unreadable entries dropped and listed.
#[wasm_bindgen(js_name = normalize_blueprint)]
pub fn normalize_blueprint(blueprint: JsValue) -> Result<JsValue, JsError> {
    let text = json_text(&blueprint, "normalize_blueprint")?;
    let mut diagnostics = Diagnostics::new();
    let parsed = parse(&text, &mut diagnostics)?;
    to_js(&NormalizeResult {
        blueprint: &parsed,
        diagnostics: &diagnostics,
    })
}

#[wasm_bindgen(js_name = blueprint_outline)]
pub fn blueprint_outline(blueprint: JsValue) -> Result<String, JsError> {
    let text = json_text(&blueprint, "blueprint_outline")?;
    let parsed = parse(&text, &mut Diagnostics::new())?;
    Ok(render_outline(&parsed))
}

/// Read outline text back into a blueprint. `manifest` is optional, keyed by
/// effect type. Returns `{ blueprint, diagnostics }`.
#[wasm_bindgen(js_name = outline_to_blueprint)]
pub fn outline_to_blueprint(outline: String, manifest: JsValue) -> Result<JsValue, JsError> {
    let manifest: EffectManifest = config_from(manifest, "effect manifest")?;
    let mut diagnostics = Diagnostics::new();
    let parsed = translate_outline(&outline, &manifest, &mut diagnostics)
        .map_err(|e| JsError::new(&e.to_string()))?;
    to_js(&NormalizeResult {
        blueprint: &parsed,
        diagnostics: &diagnostics,
    })
}

/// Text animators of a serialized `Text` property node.
#[wasm_bindgen(js_name = text_animators)]
pub fn text_animators(text_node: JsValue) -> Result<JsValue, JsError> {
    let text = json_text(&text_node, "text_animators")?;
    let node: PropertyNodeJson = serde_json::from_str(&text)
        .map_err(|e| JsError::new(&format!("text_animators parse error: {e}")))?;
    to_js(&extract_text_animators(&node))
}
