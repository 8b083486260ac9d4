//! Property Tree Builder: applies serialized property nodes back onto a live
//! tree.
//!
//! Targets are located by match name, then display name. Entries with no
//! matching target are skipped with a warning unless the group is indexed, in
//! which case the child is created from the entry's shape.

use blueprint_api_core::json::{decode_value, infer_kind_named};
use blueprint_api_core::{CodecError, ValueKind};
use blueprint_document_core::{LeafProperty, Property, PropertyGroup};

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::schema::{PropertyMap, PropertyNodeJson};

pub struct BuildContext<'a> {
    diagnostics: &'a mut Diagnostics,
    path: Vec<String>,
}

impl<'a> BuildContext<'a> {
    pub fn new(diagnostics: &'a mut Diagnostics) -> Self {
        Self {
            diagnostics,
            path: Vec::new(),
        }
    }

    pub fn scoped(mut self, scope: impl Into<String>) -> Self {
        self.path.push(scope.into());
        self
    }

    pub fn warn(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let context = self.path.join(" / ");
        self.diagnostics.warn(kind, message, context);
    }
}

/// Apply `node` onto `target`, recursing into groups.
pub fn apply(
    target: &mut Property,
    node: &PropertyNodeJson,
    layer_in_point: f64,
    ctx: &mut BuildContext<'_>,
) {
    match target {
        Property::Leaf(leaf) => {
            if node.is_group() {
                ctx.warn(
                    DiagnosticKind::SchemaDrift,
                    format!("'{}' is a property, not a group", leaf.name),
                );
                return;
            }
            apply_leaf(leaf, node, layer_in_point, ctx);
        }
        Property::Group(group) => apply_group(group, node, layer_in_point, ctx),
    }
}

pub fn apply_group(
    group: &mut PropertyGroup,
    node: &PropertyNodeJson,
    layer_in_point: f64,
    ctx: &mut BuildContext<'_>,
) {
    match &node.properties {
        Some(children) => apply_children(group, children, layer_in_point, ctx),
        None => ctx.warn(
            DiagnosticKind::SchemaDrift,
            format!("'{}' is a group, not a property", group.name),
        ),
    }
}

/// Apply each entry of `nodes` to the matching child of `group`.
pub fn apply_children(
    group: &mut PropertyGroup,
    nodes: &PropertyMap,
    layer_in_point: f64,
    ctx: &mut BuildContext<'_>,
) {
    // children already claimed by an earlier entry, so duplicate names map
    // onto distinct siblings
    let mut claimed = vec![false; group.children.len()];
    for (key, node) in nodes {
        let pos = match locate(group, node, key, &claimed) {
            Some(pos) => pos,
            None if group.indexed => {
                group.children.push(instantiate(node));
                claimed.push(false);
                group.children.len() - 1
            }
            None => {
                ctx.warn(
                    DiagnosticKind::SchemaDrift,
                    format!(
                        "no property '{}' ({}) under '{}'; skipped",
                        key, node.match_name, group.name
                    ),
                );
                continue;
            }
        };
        claimed[pos] = true;
        ctx.path.push(key.clone());
        apply(&mut group.children[pos], node, layer_in_point, ctx);
        ctx.path.pop();
    }
}

fn locate(group: &PropertyGroup, node: &PropertyNodeJson, key: &str, claimed: &[bool]) -> Option<usize> {
    let free = || {
        group
            .children
            .iter()
            .enumerate()
            .filter(|(i, _)| !claimed[*i])
    };
    free()
        .find(|(_, c)| c.match_name() == node.match_name)
        .or_else(|| free().find(|(_, c)| c.name() == node.name))
        .or_else(|| free().find(|(_, c)| c.name() == key))
        .map(|(i, _)| i)
}

/// Fresh child for an indexed group, shaped after the serialized entry.
fn instantiate(node: &PropertyNodeJson) -> Property {
    if node.is_group() {
        return Property::Group(PropertyGroup::indexed(
            node.match_name.clone(),
            node.name.clone(),
        ));
    }
    let sample = node
        .value
        .iter()
        .chain(node.keyframes.iter().flatten().map(|k| &k.value))
        .find_map(|v| infer_kind_named(&node.match_name, &node.name, v));
    Property::Leaf(LeafProperty {
        match_name: node.match_name.clone(),
        name: node.name.clone(),
        enabled: true,
        value: None,
        default: None,
        kind: sample.unwrap_or(ValueKind::Scalar),
        keyframes: Vec::new(),
        expression: None,
        can_set_expression: true,
    })
}

fn apply_leaf(
    leaf: &mut LeafProperty,
    node: &PropertyNodeJson,
    layer_in_point: f64,
    ctx: &mut BuildContext<'_>,
) {
    if let Some(raw) = &node.value {
        match decode_value(raw, leaf.kind) {
            Ok(value) => leaf.set_value(value),
            Err(CodecError::Placeholder(_)) => ctx.warn(
                DiagnosticKind::PropertyRead,
                format!("'{}' was unreadable when exported; left unchanged", leaf.name),
            ),
            Err(e) => ctx.warn(
                DiagnosticKind::SchemaDrift,
                format!("'{}': {e}", leaf.name),
            ),
        }
    }

    if node.animated {
        leaf.clear_keyframes();
        let mut last: Option<f64> = None;
        for key in node.keyframes.iter().flatten() {
            let time = layer_in_point + key.time;
            if let Some(prev) = last {
                if time <= prev {
                    ctx.warn(
                        DiagnosticKind::KeyframeOrder,
                        format!(
                            "'{}': keyframe at {} does not follow {}; skipped",
                            leaf.name, time, prev
                        ),
                    );
                    continue;
                }
            }
            match decode_value(&key.value, leaf.kind) {
                Ok(value) => {
                    leaf.set_value_at_time(time, value);
                    last = Some(time);
                }
                Err(e) => ctx.warn(
                    DiagnosticKind::SchemaDrift,
                    format!("'{}': keyframe at {}: {e}", leaf.name, time),
                ),
            }
        }
    }

    if let Some(text) = &node.expression {
        if leaf.can_set_expression {
            leaf.set_expression(text.clone());
        } else {
            ctx.warn(
                DiagnosticKind::SchemaDrift,
                format!("'{}' does not accept expressions", leaf.name),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::KeyframeJson;
    use blueprint_document_core::PropertyValue;
    use serde_json::json;

    #[test]
    fn out_of_order_keyframes_are_skipped_with_warning() {
        let mut target = Property::Leaf(LeafProperty::new(
            "ADBE Opacity",
            "Opacity",
            PropertyValue::Scalar(100.0),
        ));
        let mut node = PropertyNodeJson::leaf("ADBE Opacity", "Opacity", json!(100.0));
        node.animated = true;
        node.keyframes = Some(vec![
            KeyframeJson { time: 0.0, value: json!(0.0) },
            KeyframeJson { time: 2.0, value: json!(100.0) },
            KeyframeJson { time: 1.0, value: json!(50.0) },
        ]);
        let mut diags = Diagnostics::new();
        apply(&mut target, &node, 0.0, &mut BuildContext::new(&mut diags));
        let leaf = target.as_leaf().unwrap();
        assert_eq!(leaf.keyframes.len(), 2);
        assert_eq!(diags.count(DiagnosticKind::KeyframeOrder), 1);
    }

    #[test]
    fn indexed_groups_grow_new_children() {
        let mut effects = PropertyGroup::indexed("ADBE Effect Parade", "Effects");
        let mut blur = PropertyMap::new();
        blur.insert(
            "Blurriness".into(),
            PropertyNodeJson::leaf("ADBE Gaussian Blur 2-0001", "Blurriness", json!(12.0)),
        );
        let mut nodes = PropertyMap::new();
        nodes.insert(
            "Gaussian Blur".into(),
            PropertyNodeJson::group("ADBE Gaussian Blur 2", "Gaussian Blur", blur),
        );
        let mut diags = Diagnostics::new();
        apply_children(&mut effects, &nodes, 0.0, &mut BuildContext::new(&mut diags));
        let leaf = effects
            .group("ADBE Gaussian Blur 2")
            .and_then(|g| g.leaf("Blurriness"))
            .unwrap();
        assert_eq!(leaf.value, Some(PropertyValue::Scalar(12.0)));
        assert!(diags.is_empty());
    }
}
