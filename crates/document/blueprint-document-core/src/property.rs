//! Property trees: named, possibly animated attributes of a layer.
//!
//! A tree mixes leaves (value, keyframes, expression) and groups (ordered
//! children). Match names are the stable host identifiers; display names are
//! what users see and may collide among siblings.

use blueprint_api_core::{PropertyValue, ValueKind};

/// A (time, value) sample. Times are absolute composition seconds.
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe {
    pub time: f64,
    pub value: PropertyValue,
}

/// Opaque expression source. The text is never evaluated, only carried.
#[derive(Clone, Debug, PartialEq)]
pub struct Expression {
    pub text: String,
    pub enabled: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LeafProperty {
    pub match_name: String,
    pub name: String,
    pub enabled: bool,
    /// `None` when the host failed to read the value.
    pub value: Option<PropertyValue>,
    /// Host default; a value equal to it counts as unmodified.
    pub default: Option<PropertyValue>,
    /// Kind the host expects for this leaf.
    pub kind: ValueKind,
    /// Ascending by time.
    pub keyframes: Vec<Keyframe>,
    pub expression: Option<Expression>,
    pub can_set_expression: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PropertyGroup {
    pub match_name: String,
    pub name: String,
    pub enabled: bool,
    /// Indexed groups (effects, masks, shape contents, animators) accept new
    /// children by match name. Named groups have a fixed child set.
    pub indexed: bool,
    pub children: Vec<Property>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Property {
    Leaf(LeafProperty),
    Group(PropertyGroup),
}

impl LeafProperty {
    /// Leaf holding its default value.
    pub fn new(
        match_name: impl Into<String>,
        name: impl Into<String>,
        default: PropertyValue,
    ) -> Self {
        Self {
            match_name: match_name.into(),
            name: name.into(),
            enabled: true,
            kind: default.kind(),
            value: Some(default.clone()),
            default: Some(default),
            keyframes: Vec::new(),
            expression: None,
            can_set_expression: true,
        }
    }

    /// Leaf whose value differs from its default.
    pub fn with_value(mut self, value: PropertyValue) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_expression(mut self, text: impl Into<String>) -> Self {
        self.expression = Some(Expression {
            text: text.into(),
            enabled: true,
        });
        self
    }

    pub fn with_keyframes(mut self, keys: Vec<Keyframe>) -> Self {
        for key in keys {
            self.set_value_at_time(key.time, key.value);
        }
        self
    }

    pub fn unreadable(mut self) -> Self {
        self.value = None;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn is_animated(&self) -> bool {
        !self.keyframes.is_empty()
    }

    /// True when the value differs from the host default. An unreadable value
    /// cannot be compared and reports modified, so export keeps the leaf and
    /// writes a placeholder for it.
    pub fn is_modified(&self) -> bool {
        match (&self.value, &self.default) {
            (None, _) => true,
            (Some(_), None) => true,
            (Some(v), Some(d)) => v != d,
        }
    }

    pub fn has_enabled_expression(&self) -> bool {
        self.expression.as_ref().is_some_and(|e| e.enabled)
    }

    pub fn set_value(&mut self, value: PropertyValue) {
        self.value = Some(value);
    }

    /// Insert a keyframe keeping ascending order; a key at an existing time
    /// replaces it.
    pub fn set_value_at_time(&mut self, time: f64, value: PropertyValue) {
        match self
            .keyframes
            .binary_search_by(|k| k.time.total_cmp(&time))
        {
            Ok(i) => self.keyframes[i].value = value,
            Err(i) => self.keyframes.insert(i, Keyframe { time, value }),
        }
    }

    pub fn clear_keyframes(&mut self) {
        self.keyframes.clear();
    }

    pub fn set_expression(&mut self, text: impl Into<String>) {
        self.expression = Some(Expression {
            text: text.into(),
            enabled: true,
        });
    }
}

impl PropertyGroup {
    pub fn named(match_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            match_name: match_name.into(),
            name: name.into(),
            enabled: true,
            indexed: false,
            children: Vec::new(),
        }
    }

    pub fn indexed(match_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            indexed: true,
            ..Self::named(match_name, name)
        }
    }

    pub fn with_child(mut self, child: impl Into<Property>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn push(&mut self, child: impl Into<Property>) -> &mut Property {
        self.children.push(child.into());
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// First child whose match name equals `key`, falling back to display name.
    pub fn child(&self, key: &str) -> Option<&Property> {
        self.children
            .iter()
            .find(|c| c.match_name() == key)
            .or_else(|| self.children.iter().find(|c| c.name() == key))
    }

    pub fn child_mut(&mut self, key: &str) -> Option<&mut Property> {
        let pos = self
            .children
            .iter()
            .position(|c| c.match_name() == key)
            .or_else(|| self.children.iter().position(|c| c.name() == key))?;
        Some(&mut self.children[pos])
    }

    pub fn group(&self, key: &str) -> Option<&PropertyGroup> {
        self.child(key).and_then(Property::as_group)
    }

    pub fn group_mut(&mut self, key: &str) -> Option<&mut PropertyGroup> {
        self.child_mut(key).and_then(Property::as_group_mut)
    }

    pub fn leaf(&self, key: &str) -> Option<&LeafProperty> {
        self.child(key).and_then(Property::as_leaf)
    }

    pub fn leaf_mut(&mut self, key: &str) -> Option<&mut LeafProperty> {
        self.child_mut(key).and_then(Property::as_leaf_mut)
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Depth-first count of leaves.
    pub fn leaf_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| match c {
                Property::Leaf(_) => 1,
                Property::Group(g) => g.leaf_count(),
            })
            .sum()
    }
}

impl Property {
    pub fn match_name(&self) -> &str {
        match self {
            Property::Leaf(l) => &l.match_name,
            Property::Group(g) => &g.match_name,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Property::Leaf(l) => &l.name,
            Property::Group(g) => &g.name,
        }
    }

    pub fn enabled(&self) -> bool {
        match self {
            Property::Leaf(l) => l.enabled,
            Property::Group(g) => g.enabled,
        }
    }

    pub fn as_leaf(&self) -> Option<&LeafProperty> {
        match self {
            Property::Leaf(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_leaf_mut(&mut self) -> Option<&mut LeafProperty> {
        match self {
            Property::Leaf(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&PropertyGroup> {
        match self {
            Property::Group(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut PropertyGroup> {
        match self {
            Property::Group(g) => Some(g),
            _ => None,
        }
    }
}

impl From<LeafProperty> for Property {
    fn from(v: LeafProperty) -> Self {
        Property::Leaf(v)
    }
}

impl From<PropertyGroup> for Property {
    fn from(v: PropertyGroup) -> Self {
        Property::Group(v)
    }
}
