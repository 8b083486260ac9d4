//! Export/import configuration. Plain serde structs so hosts can ship them as
//! JSON next to their scripts.

use serde::{Deserialize, Serialize};

use blueprint_document_core::match_names;

use crate::diagnostics::DiagnosticsCfg;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Leaves exported even when unmodified, unanimated and without expression.
    pub critical_match_names: Vec<String>,
    /// Sibling folder for copied assets; defaults to the output file's base name.
    pub assets_dir_name: Option<String>,
    pub copy_assets: bool,
    pub pretty: bool,
    pub diagnostics: DiagnosticsCfg,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            critical_match_names: vec![match_names::TEXT_DOCUMENT.to_string()],
            assets_dir_name: None,
            copy_assets: true,
            pretty: true,
            diagnostics: DiagnosticsCfg::default(),
        }
    }
}

impl ExportConfig {
    pub fn is_critical(&self, match_name: &str) -> bool {
        self.critical_match_names.iter().any(|m| m == match_name)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub undo_group_name: String,
    pub apply_project_settings: bool,
    pub diagnostics: DiagnosticsCfg,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            undo_group_name: "Blueprint Build".to_string(),
            apply_project_settings: true,
            diagnostics: DiagnosticsCfg::default(),
        }
    }
}
