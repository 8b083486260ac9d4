//! Compositions: named canvases holding an ordered layer stack.

use crate::ids::{ItemId, LayerId};
use crate::layer::Layer;

/// Composition marker. The comment doubles as the marker name.
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub comment: String,
    pub time: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Composition {
    pub id: ItemId,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
    pub duration: f64,
    pub markers: Vec<Marker>,
    /// Layer stack, topmost first: `layers[0]` has index 1.
    pub layers: Vec<Layer>,
}

impl Composition {
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        width: u32,
        height: u32,
        frame_rate: f64,
        duration: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            width,
            height,
            frame_rate,
            duration,
            markers: Vec::new(),
            layers: Vec::new(),
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    /// Layer at 1-based `index` (1 = topmost).
    pub fn layer(&self, index: usize) -> Option<&Layer> {
        index.checked_sub(1).and_then(|i| self.layers.get(i))
    }

    /// 1-based index of the layer with `id`.
    pub fn index_of(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id).map(|i| i + 1)
    }

    pub fn layer_by_id(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn layer_by_id_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    /// First layer with `name`, searching top-down.
    pub fn layer_by_name(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Put a layer on top of the stack.
    pub fn push_top(&mut self, layer: Layer) {
        self.layers.insert(0, layer);
    }

    pub fn add_marker(&mut self, comment: impl Into<String>, time: f64) {
        let marker = Marker {
            comment: comment.into(),
            time,
        };
        let pos = self.markers.partition_point(|m| m.time <= time);
        self.markers.insert(pos, marker);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::LayerKind;

    #[test]
    fn push_top_shifts_indices() {
        let mut comp = Composition::new(ItemId(1), "Main", 1920, 1080, 30.0, 10.0);
        comp.push_top(Layer::new(LayerId(1), "Bottom", LayerKind::Null, comp.size()));
        comp.push_top(Layer::new(LayerId(2), "Top", LayerKind::Null, comp.size()));
        assert_eq!(comp.layer(1).map(|l| l.name.as_str()), Some("Top"));
        assert_eq!(comp.index_of(LayerId(1)), Some(2));
        assert!(comp.layer(0).is_none());
    }

    #[test]
    fn markers_are_kept_in_time_order() {
        let mut comp = Composition::new(ItemId(1), "Main", 1920, 1080, 30.0, 10.0);
        comp.add_marker("end", 9.0);
        comp.add_marker("start", 0.5);
        let names: Vec<&str> = comp.markers.iter().map(|m| m.comment.as_str()).collect();
        assert_eq!(names, vec!["start", "end"]);
    }
}
