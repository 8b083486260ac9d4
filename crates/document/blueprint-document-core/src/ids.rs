//! Identifiers and a simple allocator for project entities.

use serde::{Deserialize, Serialize};

/// Project item id. Compositions and footage share one id space, the way a
/// host project lists both as items.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct LayerId(pub u32);

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic allocator for ItemId and LayerId. Ids start at 1 so that the
/// exported `asset_<id>` keys look like host ids.
#[derive(Debug)]
pub struct IdAllocator {
    next_item: u32,
    next_layer: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self {
            next_item: 1,
            next_layer: 1,
        }
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_item(&mut self) -> ItemId {
        let id = ItemId(self.next_item);
        self.next_item = self.next_item.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_layer(&mut self) -> LayerId {
        let id = LayerId(self.next_layer);
        self.next_layer = self.next_layer.wrapping_add(1);
        id
    }
}
