//! Dependency Collector: the closure of compositions and file-backed footage
//! reachable from a set of root compositions.

use hashbrown::HashSet;
use log::debug;

use blueprint_document_core::{ItemId, Project};

/// Deduplicated closure, in first-seen order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Closure {
    pub compositions: Vec<ItemId>,
    pub assets: Vec<ItemId>,
    /// Same compositions with every nested composition ahead of the ones that
    /// use it, the order an importer can build them in.
    pub build_order: Vec<ItemId>,
}

impl Closure {
    pub fn contains_composition(&self, id: ItemId) -> bool {
        self.compositions.contains(&id)
    }
}

struct Walker<'p> {
    project: &'p Project,
    seen_comps: HashSet<ItemId>,
    seen_assets: HashSet<ItemId>,
    out: Closure,
}

impl Walker<'_> {
    fn visit(&mut self, id: ItemId) {
        if !self.seen_comps.insert(id) {
            return;
        }
        let Some(comp) = self.project.composition(id) else {
            return;
        };
        self.out.compositions.push(id);
        for layer in &comp.layers {
            let Some(source) = layer.source else {
                continue;
            };
            if self.project.is_composition(source) {
                self.visit(source);
            } else if let Some(item) = self.project.footage(source) {
                if item.is_file_backed() && self.seen_assets.insert(source) {
                    self.out.assets.push(source);
                }
            }
        }
        self.out.build_order.push(id);
    }
}

/// Depth-first closure from `roots`. Ids that are not compositions are
/// ignored; revisits are no-ops, so reference cycles terminate.
pub fn collect(project: &Project, roots: &[ItemId]) -> Closure {
    let mut walker = Walker {
        project,
        seen_comps: HashSet::new(),
        seen_assets: HashSet::new(),
        out: Closure::default(),
    };
    for &root in roots {
        walker.visit(root);
    }
    debug!(
        "collector: {} compositions, {} assets from {} roots",
        walker.out.compositions.len(),
        walker.out.assets.len(),
        roots.len()
    );
    walker.out
}
