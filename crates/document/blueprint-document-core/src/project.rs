//! Project: arenas of compositions and footage keyed by [`ItemId`].

use indexmap::IndexMap;
use log::debug;

use crate::composition::Composition;
use crate::footage::{Footage, FootageSource};
use crate::host::{
    CompositionSpec, DocumentHost, FootageImport, HostError, HostSettings, LayerSpec,
};
use crate::ids::{IdAllocator, ItemId, LayerId};
use crate::layer::{Layer, LayerKind};
use crate::match_names as mn;

use blueprint_api_core::{PropertyValue, TextDocument};

#[derive(Debug)]
pub struct Project {
    pub bits_per_channel: u8,
    pub expression_engine: Option<String>,
    compositions: IndexMap<ItemId, Composition>,
    footage: IndexMap<ItemId, Footage>,
    ids: IdAllocator,
    open_undo_group: Option<String>,
    closed_undo_groups: Vec<String>,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            bits_per_channel: 8,
            expression_engine: None,
            compositions: IndexMap::new(),
            footage: IndexMap::new(),
            ids: IdAllocator::new(),
            open_undo_group: None,
            closed_undo_groups: Vec::new(),
        }
    }
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn composition(&self, id: ItemId) -> Option<&Composition> {
        self.compositions.get(&id)
    }

    pub fn composition_mut(&mut self, id: ItemId) -> Option<&mut Composition> {
        self.compositions.get_mut(&id)
    }

    /// First composition named `name`, in project order.
    pub fn composition_by_name(&self, name: &str) -> Option<&Composition> {
        self.compositions.values().find(|c| c.name == name)
    }

    /// Compositions in creation order.
    pub fn compositions(&self) -> impl Iterator<Item = &Composition> {
        self.compositions.values()
    }

    pub fn footage(&self, id: ItemId) -> Option<&Footage> {
        self.footage.get(&id)
    }

    pub fn footage_items(&self) -> impl Iterator<Item = &Footage> {
        self.footage.values()
    }

    pub fn is_composition(&self, id: ItemId) -> bool {
        self.compositions.contains_key(&id)
    }

    /// Add an empty composition and return its id.
    pub fn add_composition(
        &mut self,
        name: impl Into<String>,
        width: u32,
        height: u32,
        frame_rate: f64,
        duration: f64,
    ) -> ItemId {
        let id = self.ids.alloc_item();
        let comp = Composition::new(id, name, width, height, frame_rate, duration);
        debug!("project: add composition '{}' ({id})", comp.name);
        self.compositions.insert(id, comp);
        id
    }

    pub fn add_footage(
        &mut self,
        name: impl Into<String>,
        width: u32,
        height: u32,
        source: FootageSource,
    ) -> ItemId {
        let id = self.ids.alloc_item();
        self.footage.insert(
            id,
            Footage {
                id,
                name: name.into(),
                width,
                height,
                source,
            },
        );
        id
    }

    /// Undo group currently open, if any.
    pub fn open_undo_group(&self) -> Option<&str> {
        self.open_undo_group.as_deref()
    }

    /// Names of undo groups that were opened and closed, oldest first.
    pub fn closed_undo_groups(&self) -> &[String] {
        &self.closed_undo_groups
    }

    fn comp_or_err(&mut self, comp: ItemId) -> Result<&mut Composition, HostError> {
        self.compositions
            .get_mut(&comp)
            .ok_or_else(|| HostError::NotFound {
                what: "composition",
                id: comp.to_string(),
            })
    }

    fn check_source(&self, spec: &LayerSpec) -> Result<Option<ItemId>, HostError> {
        let wants_comp = spec.kind == LayerKind::Precomp;
        let wants_footage = matches!(spec.kind, LayerKind::Footage | LayerKind::Audio);
        if !wants_comp && !wants_footage {
            return Ok(None);
        }
        let source = spec.source.ok_or_else(|| HostError::Rejected {
            operation: format!("add {} layer '{}'", spec.kind, spec.name),
            reason: "missing source item".into(),
        })?;
        let found = if wants_comp {
            self.compositions.contains_key(&source)
        } else {
            self.footage.contains_key(&source)
        };
        if !found {
            return Err(HostError::NotFound {
                what: if wants_comp { "composition" } else { "footage" },
                id: source.to_string(),
            });
        }
        Ok(Some(source))
    }
}

impl DocumentHost for Project {
    fn apply_settings(&mut self, settings: &HostSettings) {
        if let Some(bits) = settings.bits_per_channel {
            self.bits_per_channel = bits;
        }
        if let Some(engine) = &settings.expression_engine {
            self.expression_engine = Some(engine.clone());
        }
    }

    fn import_footage(&mut self, request: FootageImport) -> Result<ItemId, HostError> {
        if request.path.as_os_str().is_empty() {
            return Err(HostError::Rejected {
                operation: format!("import '{}'", request.name),
                reason: "empty path".into(),
            });
        }
        Ok(self.add_footage(
            request.name,
            request.width,
            request.height,
            FootageSource::File { path: request.path },
        ))
    }

    fn create_composition(&mut self, spec: CompositionSpec) -> Result<ItemId, HostError> {
        if spec.width == 0 || spec.height == 0 {
            return Err(HostError::Rejected {
                operation: format!("create composition '{}'", spec.name),
                reason: format!("invalid size {}x{}", spec.width, spec.height),
            });
        }
        if !(spec.frame_rate > 0.0) || !(spec.duration > 0.0) {
            return Err(HostError::Rejected {
                operation: format!("create composition '{}'", spec.name),
                reason: "frame rate and duration must be positive".into(),
            });
        }
        Ok(self.add_composition(
            spec.name,
            spec.width,
            spec.height,
            spec.frame_rate,
            spec.duration,
        ))
    }

    fn add_layer(&mut self, comp: ItemId, spec: LayerSpec) -> Result<LayerId, HostError> {
        self.comp_or_err(comp)?;
        let mut source = self.check_source(&spec)?;
        if spec.kind == LayerKind::Solid {
            let solid = spec.solid.clone().ok_or_else(|| HostError::Rejected {
                operation: format!("add solid layer '{}'", spec.name),
                reason: "missing solid parameters".into(),
            })?;
            source = Some(self.add_footage(
                spec.name.clone(),
                solid.width,
                solid.height,
                FootageSource::Solid { color: solid.color },
            ));
        }

        let id = self.ids.alloc_layer();
        let target = self.comp_or_err(comp)?;
        let mut layer = Layer::new(id, spec.name, spec.kind, target.size());
        layer.out_point = target.duration;
        layer.source = source;
        if let Some(text) = spec.text {
            if let Some(leaf) = layer
                .text_properties_mut()
                .and_then(|g| g.leaf_mut(mn::TEXT_DOCUMENT))
            {
                leaf.set_value(PropertyValue::Text(TextDocument::new(text)));
            }
        }
        debug!(
            "project: add {} layer '{}' to composition {comp}",
            layer.kind, layer.name
        );
        target.push_top(layer);
        Ok(id)
    }

    fn layer_mut(&mut self, comp: ItemId, layer: LayerId) -> Option<&mut Layer> {
        self.compositions.get_mut(&comp)?.layer_by_id_mut(layer)
    }

    fn set_parent(
        &mut self,
        comp: ItemId,
        child: LayerId,
        parent: Option<LayerId>,
    ) -> Result<(), HostError> {
        if parent == Some(child) {
            return Err(HostError::Rejected {
                operation: "set parent".into(),
                reason: "a layer cannot parent itself".into(),
            });
        }
        let target = self.comp_or_err(comp)?;
        if let Some(p) = parent {
            if target.layer_by_id(p).is_none() {
                return Err(HostError::NotFound {
                    what: "parent layer",
                    id: p.0.to_string(),
                });
            }
        }
        let layer = target
            .layer_by_id_mut(child)
            .ok_or_else(|| HostError::NotFound {
                what: "layer",
                id: child.0.to_string(),
            })?;
        layer.parent = parent;
        Ok(())
    }

    fn add_marker(&mut self, comp: ItemId, comment: &str, time: f64) -> Result<(), HostError> {
        self.comp_or_err(comp)?.add_marker(comment, time);
        Ok(())
    }

    fn begin_undo_group(&mut self, name: &str) {
        self.open_undo_group = Some(name.to_string());
    }

    fn end_undo_group(&mut self) {
        if let Some(name) = self.open_undo_group.take() {
            self.closed_undo_groups.push(name);
        }
    }
}
