//! Property Tree Serializer: live property trees to [`PropertyNodeJson`].
//!
//! Only leaves that carry information survive: modified from default,
//! keyframed, driven by an enabled expression, or listed as critical in
//! [`ExportConfig`]. Groups survive only if something below them does.
//! Keyframe times are written relative to the owning layer's in point.

use blueprint_api_core::json::{encode_or_placeholder, encode_value};
use blueprint_document_core::{LeafProperty, Property, PropertyGroup};

use crate::config::ExportConfig;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::schema::{KeyframeJson, PropertyMap, PropertyNodeJson};

/// Shared state for one serialization walk.
pub struct SerializeContext<'a> {
    cfg: &'a ExportConfig,
    diagnostics: &'a mut Diagnostics,
    path: Vec<String>,
}

impl<'a> SerializeContext<'a> {
    pub fn new(cfg: &'a ExportConfig, diagnostics: &'a mut Diagnostics) -> Self {
        Self {
            cfg,
            diagnostics,
            path: Vec::new(),
        }
    }

    /// Prefix every diagnostic context with `scope` (e.g. `Main / Title`).
    pub fn scoped(mut self, scope: impl Into<String>) -> Self {
        self.path.push(scope.into());
        self
    }

    fn context(&self, leaf: &str) -> String {
        let mut parts: Vec<&str> = self.path.iter().map(String::as_str).collect();
        parts.push(leaf);
        parts.join(" / ")
    }
}

/// Whether a leaf is worth writing out.
pub fn keep_leaf(leaf: &LeafProperty, cfg: &ExportConfig) -> bool {
    leaf.enabled
        && (leaf.is_modified()
            || leaf.is_animated()
            || leaf.has_enabled_expression()
            || cfg.is_critical(&leaf.match_name))
}

/// Serialize one node. `None` means the node (or everything under it) was
/// filtered out.
pub fn serialize(
    node: &Property,
    layer_in_point: f64,
    ctx: &mut SerializeContext<'_>,
) -> Option<PropertyNodeJson> {
    match node {
        Property::Leaf(leaf) => {
            if keep_leaf(leaf, ctx.cfg) {
                Some(serialize_leaf(leaf, layer_in_point, ctx))
            } else {
                None
            }
        }
        Property::Group(group) => serialize_group(group, layer_in_point, ctx),
    }
}

pub fn serialize_group(
    group: &PropertyGroup,
    layer_in_point: f64,
    ctx: &mut SerializeContext<'_>,
) -> Option<PropertyNodeJson> {
    if !group.enabled {
        return None;
    }
    ctx.path.push(group.name.clone());
    let children = serialize_children(group, layer_in_point, ctx);
    ctx.path.pop();
    if children.is_empty() {
        return None;
    }
    Some(PropertyNodeJson::group(
        group.match_name.clone(),
        group.name.clone(),
        children,
    ))
}

/// Surviving children of `group`, keyed by display name. A name already taken
/// by an earlier sibling gets `_<position>` appended (1-based among siblings).
pub fn serialize_children(
    group: &PropertyGroup,
    layer_in_point: f64,
    ctx: &mut SerializeContext<'_>,
) -> PropertyMap {
    let mut out = PropertyMap::new();
    for (i, child) in group.children.iter().enumerate() {
        if !child.enabled() {
            continue;
        }
        let Some(node) = serialize(child, layer_in_point, ctx) else {
            continue;
        };
        let key = unique_key(&out, child.name(), i + 1);
        out.insert(key, node);
    }
    out
}

fn unique_key(taken: &PropertyMap, name: &str, position: usize) -> String {
    if !taken.contains_key(name) {
        return name.to_string();
    }
    let mut key = format!("{name}_{position}");
    while taken.contains_key(&key) {
        key = format!("{key}_{position}");
    }
    key
}

fn serialize_leaf(
    leaf: &LeafProperty,
    layer_in_point: f64,
    ctx: &mut SerializeContext<'_>,
) -> PropertyNodeJson {
    if leaf.value.is_none() {
        let context = ctx.context(&leaf.name);
        ctx.diagnostics.warn(
            DiagnosticKind::PropertyRead,
            format!("could not read value of '{}'", leaf.match_name),
            context,
        );
    }
    let animated = leaf.is_animated();
    let keyframes = animated.then(|| {
        leaf.keyframes
            .iter()
            .map(|k| KeyframeJson {
                time: k.time - layer_in_point,
                value: encode_value(&k.value),
            })
            .collect()
    });
    PropertyNodeJson {
        match_name: leaf.match_name.clone(),
        name: leaf.name.clone(),
        value: Some(encode_or_placeholder(leaf.value.as_ref(), leaf.kind)),
        animated,
        keyframes,
        expression: leaf
            .expression
            .as_ref()
            .filter(|e| e.enabled)
            .map(|e| e.text.clone()),
        properties: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blueprint_document_core::PropertyValue;

    fn opacity(v: f64) -> LeafProperty {
        LeafProperty::new("ADBE Opacity", "Opacity", PropertyValue::Scalar(100.0))
            .with_value(PropertyValue::Scalar(v))
    }

    #[test]
    fn collision_suffix_uses_sibling_position() {
        let group = PropertyGroup::named("G", "G")
            .with_child(opacity(10.0))
            .with_child(LeafProperty::new("X", "Untouched", PropertyValue::Scalar(0.0)))
            .with_child(opacity(20.0));
        let cfg = ExportConfig::default();
        let mut diags = Diagnostics::new();
        let mut ctx = SerializeContext::new(&cfg, &mut diags);
        let out = serialize_children(&group, 0.0, &mut ctx);
        let keys: Vec<&str> = out.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Opacity", "Opacity_3"]);
    }

    #[test]
    fn disabled_expression_is_not_written() {
        let mut leaf = opacity(50.0).with_expression("wiggle(2, 10)");
        if let Some(e) = leaf.expression.as_mut() {
            e.enabled = false;
        }
        let cfg = ExportConfig::default();
        let mut diags = Diagnostics::new();
        let mut ctx = SerializeContext::new(&cfg, &mut diags);
        let node = serialize(&Property::Leaf(leaf), 0.0, &mut ctx).unwrap();
        assert_eq!(node.expression, None);
    }
}
