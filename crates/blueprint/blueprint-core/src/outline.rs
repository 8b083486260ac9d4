//! Human-readable outline of a blueprint, for review and hand editing.
//!
//! The output is YAML: the `Transform` group is flattened to
//! `"Transform.<name>"` keys, effects are listed by name and property match
//! names are left out. [`crate::translate`] reads an outline back into a
//! blueprint.

use std::fmt;

use serde_json::Value as JsonValue;

use crate::schema::{Blueprint, LayerEntry, PropertyNodeJson, TextAnimator};

/// Prefix of the flattened transform keys.
pub const TRANSFORM_PREFIX: &str = "Transform.";

/// Render `blueprint` as outline text.
pub fn render_outline(blueprint: &Blueprint) -> String {
    Outline(blueprint).to_string()
}

/// Display adapter; `to_string()` gives the outline.
pub struct Outline<'a>(pub &'a Blueprint);

impl fmt::Display for Outline<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bp = self.0;
        let s = &bp.project_settings;
        writeln!(f, "projectSettings:")?;
        if let Some(bits) = s.bits_per_channel {
            writeln!(f, "  bitsPerChannel: {bits}")?;
        }
        if let Some(engine) = &s.expression_engine {
            writeln!(f, "  expressionEngine: {}", quoted(engine))?;
        }
        writeln!(f, "  width: {}", s.width)?;
        writeln!(f, "  height: {}", s.height)?;
        writeln!(f, "  frameRate: {}", s.frame_rate)?;
        writeln!(f, "  duration: {}", s.duration)?;
        writeln!(f)?;

        if !bp.assets.is_empty() {
            writeln!(f, "assets:")?;
            for a in &bp.assets {
                writeln!(f, "  - id: {}", quoted(&a.id))?;
                writeln!(f, "    path: {}", quoted(&a.path))?;
                writeln!(f, "    width: {}", a.width)?;
                writeln!(f, "    height: {}", a.height)?;
                if !a.name.is_empty() {
                    writeln!(f, "    name: {}", quoted(&a.name))?;
                }
            }
            writeln!(f)?;
        }

        writeln!(f, "compositions:")?;
        for comp in &bp.compositions {
            writeln!(f, "  - name: {}", quoted(&comp.name))?;
            writeln!(f, "    width: {}", comp.width)?;
            writeln!(f, "    height: {}", comp.height)?;
            writeln!(f, "    frameRate: {}", comp.frame_rate)?;
            writeln!(f, "    duration: {}", comp.duration)?;
            if !comp.markers.is_empty() {
                writeln!(f, "    markers:")?;
                for m in &comp.markers {
                    writeln!(f, "      - {{ name: {}, time: {} }}", quoted(&m.name), m.time)?;
                }
            }
            if !comp.layers.is_empty() {
                writeln!(f, "    layers:")?;
                for layer in &comp.layers {
                    write_layer(f, layer)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn write_layer(f: &mut fmt::Formatter<'_>, layer: &LayerEntry) -> fmt::Result {
    writeln!(f, "      - name: {}", quoted(&layer.name))?;
    writeln!(f, "        type: {}", quoted(layer.kind.as_str()))?;
    if let Some(id) = &layer.asset_id {
        writeln!(f, "        assetId: {}", quoted(id))?;
    }
    if let Some(id) = &layer.ref_id {
        writeln!(f, "        refId: {}", quoted(id))?;
    }
    if let Some(parent) = &layer.parent {
        writeln!(f, "        parent: {}", quoted(parent))?;
    }
    if let Some(text) = &layer.source_text {
        writeln!(f, "        sourceText: {}", quoted(text))?;
    }
    if let Some(params) = &layer.source_parameters {
        let color: Vec<JsonValue> = params.color.iter().map(|c| JsonValue::from(*c)).collect();
        writeln!(
            f,
            "        sourceParameters: {{ color: {} }}",
            format_value(&JsonValue::Array(color))
        )?;
    }
    writeln!(f, "        inPoint: {}", layer.in_point)?;
    writeln!(f, "        outPoint: {}", layer.out_point)?;
    writeln!(f, "        startTime: {}", layer.start_time)?;

    let attrs = attribute_list(layer);
    if !attrs.is_empty() {
        writeln!(f, "        attributes: {{ {} }}", attrs.join(", "))?;
    }

    if !layer.properties.is_empty() {
        writeln!(f, "        properties:")?;
        for (key, node) in &layer.properties {
            if key == "Transform" {
                for (sub, child) in node.children() {
                    let flat = quoted(&format!("{TRANSFORM_PREFIX}{sub}"));
                    write_property(f, &flat, child, 5)?;
                }
            } else {
                write_property(f, &yaml_key(key), node, 5)?;
            }
        }
    }

    if let Some(effects) = &layer.effects {
        writeln!(f, "        effects:")?;
        for (name, effect) in effects.children() {
            writeln!(f, "          - type: {}", quoted(name))?;
            writeln!(f, "            matchName: {}", quoted(&effect.match_name))?;
            if effect.is_group() {
                writeln!(f, "            properties:")?;
                for (key, child) in effect.children() {
                    write_property(f, &yaml_key(key), child, 7)?;
                }
            }
        }
    }

    if !layer.text_animators.is_empty() {
        writeln!(f, "        textAnimators:")?;
        for animator in &layer.text_animators {
            write_animator(f, animator)?;
        }
    }
    Ok(())
}

fn attribute_list(layer: &LayerEntry) -> Vec<String> {
    let a = &layer.attributes;
    let mut out = Vec::new();
    for (name, on) in [
        ("threeD", a.three_d),
        ("adjustmentLayer", a.adjustment_layer),
        ("locked", a.locked),
        ("shy", a.shy),
        ("solo", a.solo),
    ] {
        if on {
            out.push(format!("{name}: true"));
        }
    }
    if let Some(mode) = &a.blending_mode {
        out.push(format!("blendingMode: {}", quoted(mode)));
    }
    if let Some(matte) = &a.track_matte {
        out.push(format!("trackMatte: {}", quoted(&matte.mode)));
    }
    out
}

fn write_animator(f: &mut fmt::Formatter<'_>, animator: &TextAnimator) -> fmt::Result {
    writeln!(f, "          - name: {}", quoted(&animator.name))?;
    if !animator.animator_properties.is_empty() {
        writeln!(f, "            animatorProperties:")?;
        for prop in &animator.animator_properties {
            writeln!(f, "              - property: {}", quoted(&prop.property))?;
            write_property(f, "value_data", &prop.value_data, 8)?;
        }
    }
    if !animator.selectors.is_empty() {
        writeln!(f, "            selectors:")?;
        for sel in &animator.selectors {
            writeln!(f, "              - name: {}", quoted(&sel.name))?;
            if let Some(props) = &sel.properties {
                writeln!(f, "                properties:")?;
                for (key, child) in props {
                    write_property(f, &yaml_key(key), child, 9)?;
                }
            }
        }
    }
    Ok(())
}

fn pad(level: usize) -> String {
    "  ".repeat(level)
}

/// `key` must already be a valid YAML key (see [`yaml_key`]).
fn write_property(
    f: &mut fmt::Formatter<'_>,
    key: &str,
    node: &PropertyNodeJson,
    level: usize,
) -> fmt::Result {
    if key.trim().is_empty() {
        return Ok(());
    }
    let p = pad(level);
    if node.is_group() {
        writeln!(f, "{p}{key}:")?;
        for (sub, child) in node.children() {
            write_property(f, &yaml_key(sub), child, level + 1)?;
        }
        return Ok(());
    }
    if node.animated {
        writeln!(f, "{p}{key}:")?;
        writeln!(f, "{p}  animated: true")?;
        if let Some(keys) = &node.keyframes {
            writeln!(f, "{p}  keyframes:")?;
            for k in keys {
                writeln!(
                    f,
                    "{p}    - {{ time: {}, value: {} }}",
                    k.time,
                    format_value(&k.value)
                )?;
            }
        }
    } else {
        match (&node.value, &node.expression) {
            (Some(JsonValue::Object(fields)), _) => {
                writeln!(f, "{p}{key}:")?;
                writeln!(f, "{p}  value:")?;
                for (k, v) in fields {
                    writeln!(f, "{p}    {}: {}", yaml_key(k), format_value(v))?;
                }
            }
            // an expression needs the block form to sit next to the value
            (Some(v), Some(_)) => {
                writeln!(f, "{p}{key}:")?;
                writeln!(f, "{p}  value: {}", format_value(v))?;
            }
            (Some(v), None) => writeln!(f, "{p}{key}: {{ value: {} }}", format_value(v))?,
            (None, Some(_)) => writeln!(f, "{p}{key}:")?,
            (None, None) => writeln!(f, "{p}{key}: {{}}")?,
        }
    }
    if let Some(expr) = &node.expression {
        writeln!(f, "{p}  expression: {}", quoted(expr))?;
    }
    Ok(())
}

/// Double-quoted scalar. JSON string escapes are valid YAML escapes.
fn quoted(s: &str) -> String {
    JsonValue::String(s.to_string()).to_string()
}

/// Plain key when YAML would read it back as the same string, quoted otherwise.
fn yaml_key(key: &str) -> String {
    const RESERVED: [&str; 9] = ["true", "false", "null", "yes", "no", "on", "off", "y", "n"];
    let plain = key.starts_with(|c: char| c.is_ascii_alphabetic())
        && !key.ends_with(' ')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-' | '.' | '(' | ')'))
        && !RESERVED.iter().any(|r| key.eq_ignore_ascii_case(r));
    if plain {
        key.to_string()
    } else {
        quoted(key)
    }
}

/// Compact flow form for scalars and arrays; strings are double-quoted.
fn format_value(v: &JsonValue) -> String {
    let mut out = String::new();
    match v {
        JsonValue::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&format_value(item));
            }
            out.push(']');
        }
        other => out.push_str(&other.to_string()),
    }
    out
}
