//! Diagnostics collected while exporting or importing. Operations keep going
//! past per-item failures and hand the collected entries back to the caller.

use log::{error, info, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticsCfg {
    pub enabled: bool,
    /// Also emit every entry through the `log` facade.
    pub echo_to_log: bool,
}

impl Default for DiagnosticsCfg {
    fn default() -> Self {
        DiagnosticsCfg {
            enabled: true,
            echo_to_log: true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticKind {
    Format,
    AssetMissing,
    PropertyRead,
    LayerProcessing,
    CriticalBuild,
    SchemaDrift,
    KeyframeOrder,
    ForwardReference,
    Unresolved,
    Summary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
    /// Where it happened, e.g. `Main / Title / Transform / Opacity`.
    pub context: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    #[serde(skip)]
    cfg: DiagnosticsCfg,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cfg(cfg: DiagnosticsCfg) -> Self {
        Self {
            entries: Vec::new(),
            cfg,
        }
    }

    pub fn push(
        &mut self,
        severity: Severity,
        kind: DiagnosticKind,
        message: impl Into<String>,
        context: impl Into<String>,
    ) {
        if !self.cfg.enabled {
            return;
        }
        let entry = Diagnostic {
            severity,
            kind,
            message: message.into(),
            context: context.into(),
        };
        if self.cfg.echo_to_log {
            match severity {
                Severity::Info => info!("{} [{}]", entry.message, entry.context),
                Severity::Warning => warn!("{} [{}]", entry.message, entry.context),
                Severity::Error => error!("{} [{}]", entry.message, entry.context),
            }
        }
        self.entries.push(entry);
    }

    pub fn info(&mut self, kind: DiagnosticKind, message: impl Into<String>, context: impl Into<String>) {
        self.push(Severity::Info, kind, message, context);
    }

    pub fn warn(&mut self, kind: DiagnosticKind, message: impl Into<String>, context: impl Into<String>) {
        self.push(Severity::Warning, kind, message, context);
    }

    pub fn error(&mut self, kind: DiagnosticKind, message: impl Into<String>, context: impl Into<String>) {
        self.push(Severity::Error, kind, message, context);
    }

    /// Append entries collected elsewhere. They were logged when first recorded.
    pub fn extend(&mut self, other: Diagnostics) {
        if self.cfg.enabled {
            self.entries.extend(other.entries);
        }
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.severity == Severity::Error)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_collector_drops_entries() {
        let mut diags = Diagnostics::with_cfg(DiagnosticsCfg {
            enabled: false,
            echo_to_log: false,
        });
        diags.warn(DiagnosticKind::AssetMissing, "missing", "img.png");
        assert!(diags.is_empty());
    }

    #[test]
    fn counts_by_kind_and_severity() {
        let mut diags = Diagnostics::new();
        diags.warn(DiagnosticKind::AssetMissing, "a", "");
        diags.warn(DiagnosticKind::AssetMissing, "b", "");
        diags.error(DiagnosticKind::ForwardReference, "c", "");
        assert_eq!(diags.count(DiagnosticKind::AssetMissing), 2);
        assert_eq!(diags.warnings().count(), 2);
        assert!(diags.has_errors());
    }
}
