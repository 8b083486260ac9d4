//! Outline translator: reads hand-written or [`crate::outline`]-rendered YAML
//! back into a [`Blueprint`].
//!
//! Beyond what the renderer writes, an outline may carry:
//! - a top-level `globals` map; any string `$globals.a.b` elsewhere is
//!   replaced by that entry,
//! - a top-level `components` list of `{ id, properties }` and per-layer
//!   `useComponents: [id, ...]`; component properties are deep-merged in list
//!   order and the layer's own properties are merged last,
//! - effects named by a friendly `type`, mapped to match names through an
//!   [`EffectManifest`]. A type the manifest does not know is taken as the
//!   match name itself.
//!
//! The result is typed through [`crate::reader::read_value`], so anything that
//! does not fit the blueprint model is skipped and reported the same way a
//! JSON blueprint's would be.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};
use serde_yaml::Value as YamlValue;

use blueprint_document_core::match_names;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::{BlueprintError, BlueprintResult};
use crate::outline::TRANSFORM_PREFIX;
use crate::reader::read_value;
use crate::schema::Blueprint;

const GLOBALS_PREFIX: &str = "$globals.";

/// Keys that mark an outline mapping as a single property rather than a group.
const LEAF_KEYS: [&str; 4] = ["value", "animated", "keyframes", "expression"];

type Object = Map<String, JsonValue>;

/// Friendly effect name -> effect description.
pub type EffectManifest = IndexMap<String, EffectSpec>;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectSpec {
    #[serde(rename = "matchName")]
    pub match_name: String,
    /// Friendly parameter name -> parameter match name.
    #[serde(default)]
    pub properties: IndexMap<String, String>,
}

/// Translate outline text into a blueprint. Only unparsable YAML, or YAML
/// whose root is not a mapping, is an error.
pub fn translate_outline(
    text: &str,
    manifest: &EffectManifest,
    diagnostics: &mut Diagnostics,
) -> BlueprintResult<Blueprint> {
    let doc: YamlValue = serde_yaml::from_str(text)
        .map_err(|e| BlueprintError::Format(format!("could not parse outline: {e}")))?;
    let mut root = match yaml_to_json(doc, diagnostics) {
        JsonValue::Object(root) => root,
        _ => return Err(BlueprintError::Format("outline root is not a mapping".into())),
    };

    if let Some(globals) = root.remove("globals") {
        let mut doc = JsonValue::Object(root);
        resolve_globals(&mut doc, &globals, diagnostics);
        root = match doc {
            JsonValue::Object(root) => root,
            _ => Object::new(),
        };
    }

    let components = components_by_id(root.remove("components"), diagnostics);
    let translator = Translator {
        manifest,
        components,
    };

    let mut blueprint = Object::new();
    if let Some(settings) = root.remove("projectSettings") {
        blueprint.insert("projectSettings".into(), settings);
    }
    if let Some(assets) = root.remove("assets") {
        blueprint.insert("assets".into(), assets);
    }
    let compositions = match root.remove("compositions") {
        Some(JsonValue::Array(items)) => JsonValue::Array(
            items
                .into_iter()
                .map(|comp| translator.composition(comp, diagnostics))
                .collect(),
        ),
        Some(other) => other,
        None => JsonValue::Array(Vec::new()),
    };
    blueprint.insert("compositions".into(), compositions);
    read_value(JsonValue::Object(blueprint), diagnostics)
}

struct Translator<'m> {
    manifest: &'m EffectManifest,
    components: IndexMap<String, Object>,
}

impl Translator<'_> {
    fn composition(&self, value: JsonValue, diagnostics: &mut Diagnostics) -> JsonValue {
        let mut comp = match value {
            JsonValue::Object(comp) => comp,
            other => return other,
        };
        let name = string_field(&comp, "name").unwrap_or_default();
        if let Some(JsonValue::Array(layers)) = comp.remove("layers") {
            let count = layers.len();
            let layers = layers
                .into_iter()
                .enumerate()
                .map(|(i, layer)| {
                    // outlines list layers bottom of the stack first
                    self.layer(layer, count - i, &name, diagnostics)
                })
                .collect();
            comp.insert("layers".into(), JsonValue::Array(layers));
        }
        JsonValue::Object(comp)
    }

    fn layer(&self, value: JsonValue, index: usize, comp: &str, diagnostics: &mut Diagnostics) -> JsonValue {
        let mut layer = match value {
            JsonValue::Object(layer) => layer,
            other => return other,
        };
        let context = format!(
            "{comp} / {}",
            string_field(&layer, "name").unwrap_or_else(|| format!("layer {index}"))
        );
        layer.entry("index").or_insert_with(|| JsonValue::from(index));

        let mut properties = Object::new();
        if let Some(JsonValue::Array(ids)) = layer.remove("useComponents") {
            for id in ids {
                let id = match id {
                    JsonValue::String(id) => id,
                    other => other.to_string(),
                };
                match self.components.get(&id) {
                    Some(props) => deep_merge(&mut properties, props.clone()),
                    None => diagnostics.warn(
                        DiagnosticKind::Unresolved,
                        format!("unknown component '{id}'"),
                        context.clone(),
                    ),
                }
            }
        }
        match layer.remove("properties") {
            Some(JsonValue::Object(own)) => deep_merge(&mut properties, own),
            Some(JsonValue::Null) | None => {}
            Some(other) => {
                // let the reader report it
                layer.insert("properties".into(), other);
            }
        }
        if !properties.is_empty() {
            layer.insert("properties".into(), JsonValue::Object(unflatten(properties)));
        }

        if let Some(attrs) = layer.get_mut("attributes").and_then(JsonValue::as_object_mut) {
            if let Some(JsonValue::String(mode)) = attrs.remove("trackMatte") {
                attrs.insert("trackMatte".into(), json!({ "mode": mode }));
            }
        }

        match layer.remove("effects") {
            Some(JsonValue::Array(effects)) => {
                let parade = self.effects(effects, &context, diagnostics);
                layer.insert("effects".into(), parade);
            }
            Some(JsonValue::Null) | None => {}
            Some(other) => {
                layer.insert("effects".into(), other);
            }
        }

        if let Some(JsonValue::Array(animators)) = layer.get_mut("textAnimators") {
            for animator in animators.iter_mut() {
                text_animator(animator);
            }
        }
        JsonValue::Object(layer)
    }

    fn effects(&self, effects: Vec<JsonValue>, context: &str, diagnostics: &mut Diagnostics) -> JsonValue {
        let mut children = Object::new();
        for effect in effects {
            let JsonValue::Object(mut effect) = effect else {
                diagnostics.warn(
                    DiagnosticKind::SchemaDrift,
                    "effect entry is not a mapping; skipped",
                    context,
                );
                continue;
            };
            let Some(kind) = string_field(&effect, "type") else {
                diagnostics.warn(
                    DiagnosticKind::SchemaDrift,
                    "effect without a type; skipped",
                    context,
                );
                continue;
            };
            let spec = self.manifest.get(&kind);
            let match_name = string_field(&effect, "matchName")
                .or_else(|| spec.map(|s| s.match_name.clone()))
                .unwrap_or_else(|| kind.clone());
            let name = string_field(&effect, "name").unwrap_or_else(|| kind.clone());

            let mut params = Object::new();
            if let Some(JsonValue::Object(props)) = effect.remove("properties") {
                for (key, value) in props {
                    let param_match = spec.and_then(|s| s.properties.get(&key)).cloned();
                    params.insert(key.clone(), node(&key, value, param_match));
                }
            }
            let key = unique_key(&children, &name);
            children.insert(
                key,
                json!({ "matchName": match_name, "name": name, "properties": params }),
            );
        }
        json!({
            "matchName": match_names::EFFECT_PARADE,
            "name": "Effects",
            "properties": children,
        })
    }
}

/// `"Transform.<name>"` keys back into one `Transform` group; everything else
/// becomes a property node keyed as written.
fn unflatten(properties: Object) -> Object {
    let mut transform = Object::new();
    let mut out = Object::new();
    for (key, value) in properties {
        match key.strip_prefix(TRANSFORM_PREFIX) {
            Some(sub) => {
                transform.insert(sub.to_string(), node(sub, value, None));
            }
            None => {
                out.insert(key.clone(), node(&key, value, None));
            }
        }
    }
    if !transform.is_empty() {
        let group = out
            .entry("Transform")
            .or_insert_with(|| group_node(match_names::TRANSFORM, "Transform", Object::new()));
        if let Some(JsonValue::Object(children)) = group.get_mut("properties") {
            children.extend(transform);
        }
        if let Some(obj) = group.as_object_mut() {
            obj.insert("matchName".into(), JsonValue::from(match_names::TRANSFORM));
        }
    }
    out
}

/// One outline entry as a blueprint property node. A mapping with any of
/// [`LEAF_KEYS`] is a property, any other mapping a group, and a bare value
/// a property holding it. The key doubles as the match name unless the
/// entry or the caller names one.
fn node(key: &str, value: JsonValue, match_name: Option<String>) -> JsonValue {
    match value {
        JsonValue::Object(mut fields) => {
            let match_name = match fields.remove("matchName") {
                Some(JsonValue::String(m)) => m,
                _ => match_name.unwrap_or_else(|| key.to_string()),
            };
            let is_leaf = fields.is_empty() || LEAF_KEYS.iter().any(|k| fields.contains_key(*k));
            if is_leaf {
                fields.insert("matchName".into(), JsonValue::String(match_name));
                fields.insert("name".into(), JsonValue::from(key));
                fields.entry("animated").or_insert(JsonValue::Bool(false));
                JsonValue::Object(fields)
            } else {
                let children = fields
                    .into_iter()
                    .map(|(k, v)| {
                        let child = node(&k, v, None);
                        (k, child)
                    })
                    .collect();
                group_node(&match_name, key, children)
            }
        }
        JsonValue::Null => json!({
            "matchName": match_name.unwrap_or_else(|| key.to_string()),
            "name": key,
            "animated": false,
        }),
        bare => json!({
            "matchName": match_name.unwrap_or_else(|| key.to_string()),
            "name": key,
            "value": bare,
            "animated": false,
        }),
    }
}

fn group_node(match_name: &str, name: &str, children: Object) -> JsonValue {
    json!({ "matchName": match_name, "name": name, "properties": children })
}

/// Selector properties and `value_data` are property trees in outline form.
fn text_animator(animator: &mut JsonValue) {
    let Some(animator) = animator.as_object_mut() else {
        return;
    };
    if let Some(JsonValue::Array(props)) = animator.get_mut("animatorProperties") {
        for prop in props.iter_mut().filter_map(JsonValue::as_object_mut) {
            let name = string_field(prop, "property").unwrap_or_default();
            if let Some(data) = prop.remove("value_data") {
                prop.insert("value_data".into(), node(&name, data, None));
            }
        }
    }
    if let Some(JsonValue::Array(selectors)) = animator.get_mut("selectors") {
        for selector in selectors.iter_mut().filter_map(JsonValue::as_object_mut) {
            if let Some(JsonValue::Object(props)) = selector.remove("properties") {
                let props: Object = props
                    .into_iter()
                    .map(|(k, v)| {
                        let child = node(&k, v, None);
                        (k, child)
                    })
                    .collect();
                selector.insert("properties".into(), JsonValue::Object(props));
            }
        }
    }
}

fn components_by_id(value: Option<JsonValue>, diagnostics: &mut Diagnostics) -> IndexMap<String, Object> {
    let mut out = IndexMap::new();
    let Some(JsonValue::Array(items)) = value else {
        return out;
    };
    for item in items {
        let JsonValue::Object(mut component) = item else {
            continue;
        };
        let Some(id) = string_field(&component, "id") else {
            diagnostics.warn(
                DiagnosticKind::SchemaDrift,
                "component without an id; skipped",
                "components",
            );
            continue;
        };
        let props = match component.remove("properties") {
            Some(JsonValue::Object(props)) => props,
            _ => Object::new(),
        };
        out.insert(id, props);
    }
    out
}

/// Merge `from` into `into`; nested mappings merge, anything else replaces.
fn deep_merge(into: &mut Object, from: Object) {
    for (key, value) in from {
        match (into.get_mut(&key), value) {
            (Some(JsonValue::Object(existing)), JsonValue::Object(incoming)) => {
                deep_merge(existing, incoming);
            }
            (_, value) => {
                into.insert(key, value);
            }
        }
    }
}

/// Replace every `$globals.<path>` string under `value`. Unknown paths stay
/// as written and are reported.
fn resolve_globals(value: &mut JsonValue, globals: &JsonValue, diagnostics: &mut Diagnostics) {
    match value {
        JsonValue::String(s) => {
            let Some(path) = s.strip_prefix(GLOBALS_PREFIX) else {
                return;
            };
            match lookup(globals, path) {
                Some(found) => *value = found.clone(),
                None => diagnostics.warn(
                    DiagnosticKind::Unresolved,
                    format!("global '{path}' not found"),
                    "globals",
                ),
            }
        }
        JsonValue::Array(items) => {
            for item in items {
                resolve_globals(item, globals, diagnostics);
            }
        }
        JsonValue::Object(fields) => {
            for (_, item) in fields.iter_mut() {
                resolve_globals(item, globals, diagnostics);
            }
        }
        _ => {}
    }
}

fn lookup<'g>(globals: &'g JsonValue, path: &str) -> Option<&'g JsonValue> {
    path.split('.')
        .try_fold(globals, |node, segment| node.as_object()?.get(segment))
}

/// YAML to JSON. Scalar keys become strings; other keys are dropped.
fn yaml_to_json(value: YamlValue, diagnostics: &mut Diagnostics) -> JsonValue {
    match value {
        YamlValue::Null => JsonValue::Null,
        YamlValue::Bool(b) => JsonValue::Bool(b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                JsonValue::from(i)
            } else if let Some(u) = n.as_u64() {
                JsonValue::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(JsonValue::Number)
                    .unwrap_or(JsonValue::Null)
            }
        }
        YamlValue::String(s) => JsonValue::String(s),
        YamlValue::Sequence(items) => JsonValue::Array(
            items
                .into_iter()
                .map(|item| yaml_to_json(item, diagnostics))
                .collect(),
        ),
        YamlValue::Mapping(map) => {
            let mut out = Object::new();
            for (key, item) in map {
                let key = match key {
                    YamlValue::String(s) => s,
                    YamlValue::Number(n) => n.to_string(),
                    YamlValue::Bool(b) => b.to_string(),
                    _ => {
                        diagnostics.warn(
                            DiagnosticKind::SchemaDrift,
                            "mapping key is not a scalar; entry dropped",
                            "outline",
                        );
                        continue;
                    }
                };
                out.insert(key, yaml_to_json(item, diagnostics));
            }
            JsonValue::Object(out)
        }
        YamlValue::Tagged(tagged) => yaml_to_json(tagged.value, diagnostics),
    }
}

fn string_field(object: &Object, key: &str) -> Option<String> {
    object.get(key)?.as_str().map(str::to_string)
}

fn unique_key(taken: &Object, name: &str) -> String {
    if !taken.contains_key(name) {
        return name.to_string();
    }
    (2..)
        .map(|n| format!("{name} {n}"))
        .find(|candidate| !taken.contains_key(candidate))
        .unwrap_or_else(|| name.to_string())
}
