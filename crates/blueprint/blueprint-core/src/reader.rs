//! Tolerant reading of blueprint JSON.
//!
//! The text is parsed into a `serde_json::Value` first and then typed one
//! entry at a time: settings, each asset, each composition, each layer and
//! each property node. An entry that does not fit the model is skipped and
//! reported, so one bad layer costs that layer and nothing else. Only text
//! that is not JSON at all, or a root that is not an object, is fatal.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};

use blueprint_document_core::match_names;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::{BlueprintError, BlueprintResult};
use crate::schema::{
    AssetEntry, Blueprint, CompositionEntry, LayerEntry, PropertyMap, PropertyNodeJson,
    SourceParameters, TextAnimator,
};

/// Solids written by older exporters carry their color under this key of
/// `properties` instead of at layer level.
const SOURCE_PARAMETERS_KEY: &str = "sourceParameters";

type Object = Map<String, JsonValue>;

/// Read `json` into a [`Blueprint`], recording skipped entries in `diagnostics`.
pub fn read_tolerant(json: &str, diagnostics: &mut Diagnostics) -> BlueprintResult<Blueprint> {
    let root: JsonValue = serde_json::from_str(json)
        .map_err(|e| BlueprintError::Format(format!("could not parse blueprint: {e}")))?;
    read_value(root, diagnostics)
}

/// [`read_tolerant`] over an already parsed document.
pub fn read_value(root: JsonValue, diagnostics: &mut Diagnostics) -> BlueprintResult<Blueprint> {
    let mut root = match root {
        JsonValue::Object(root) => root,
        other => {
            return Err(BlueprintError::Format(format!(
                "blueprint root is {}, not an object",
                shape_of(&other)
            )))
        }
    };

    let mut blueprint = Blueprint::default();
    if let Some(settings) = root.remove("projectSettings") {
        match serde_json::from_value(settings) {
            Ok(settings) => blueprint.project_settings = settings,
            Err(e) => diagnostics.warn(
                DiagnosticKind::SchemaDrift,
                format!("projectSettings ignored: {e}"),
                "projectSettings",
            ),
        }
    }

    match take_list(&mut root, "assets") {
        Ok(items) => {
            for (position, item) in items.into_iter().enumerate() {
                match serde_json::from_value::<AssetEntry>(item) {
                    Ok(asset) => blueprint.assets.push(asset),
                    Err(e) => diagnostics.warn(
                        DiagnosticKind::SchemaDrift,
                        format!("asset entry {position} skipped: {e}"),
                        "assets",
                    ),
                }
            }
        }
        Err(found) => diagnostics.warn(
            DiagnosticKind::SchemaDrift,
            format!("assets is {found}, not a list; ignored"),
            "assets",
        ),
    }

    let compositions = take_list(&mut root, "compositions").map_err(|found| {
        BlueprintError::Format(format!("compositions is {found}, not a list"))
    })?;
    for (position, item) in compositions.into_iter().enumerate() {
        if let Some(comp) = read_composition(position, item, diagnostics) {
            blueprint.compositions.push(comp);
        }
    }
    Ok(blueprint)
}

fn read_composition(
    position: usize,
    value: JsonValue,
    diagnostics: &mut Diagnostics,
) -> Option<CompositionEntry> {
    let label = name_of(&value).unwrap_or_else(|| format!("composition {position}"));
    let JsonValue::Object(mut object) = value else {
        diagnostics.error(
            DiagnosticKind::Format,
            "composition entry is not an object; skipped",
            label,
        );
        return None;
    };
    let layers = take_list(&mut object, "layers");
    let mut comp: CompositionEntry = match serde_json::from_value(JsonValue::Object(object)) {
        Ok(comp) => comp,
        Err(e) => {
            diagnostics.error(
                DiagnosticKind::Format,
                format!("composition skipped: {e}"),
                label,
            );
            return None;
        }
    };
    match layers {
        Ok(items) => {
            for (position, item) in items.into_iter().enumerate() {
                if let Some(layer) = read_layer(&comp.name, position, item, diagnostics) {
                    comp.layers.push(layer);
                }
            }
        }
        Err(found) => diagnostics.warn(
            DiagnosticKind::SchemaDrift,
            format!("layers is {found}, not a list; composition has no layers"),
            comp.name.clone(),
        ),
    }
    Some(comp)
}

fn read_layer(
    comp: &str,
    position: usize,
    value: JsonValue,
    diagnostics: &mut Diagnostics,
) -> Option<LayerEntry> {
    let label = name_of(&value).unwrap_or_else(|| format!("layer {position}"));
    let context = format!("{comp} / {label}");
    let JsonValue::Object(mut object) = value else {
        diagnostics.warn(
            DiagnosticKind::LayerProcessing,
            "layer entry is not an object; skipped",
            context,
        );
        return None;
    };

    // nested trees are typed separately so a bad node only costs itself
    let properties = object.remove("properties");
    let effects = object.remove("effects");
    let masks = object.remove("masks");
    let animators = object.remove("textAnimators");

    let mut layer: LayerEntry = match serde_json::from_value(JsonValue::Object(object)) {
        Ok(layer) => layer,
        Err(e) => {
            diagnostics.warn(
                DiagnosticKind::LayerProcessing,
                format!("layer skipped: {e}"),
                context,
            );
            return None;
        }
    };

    match properties {
        None | Some(JsonValue::Null) => {}
        Some(JsonValue::Object(map)) => {
            for (key, node) in map {
                if key == SOURCE_PARAMETERS_KEY && node.get("matchName").is_none() {
                    match serde_json::from_value::<SourceParameters>(node) {
                        Ok(params) => {
                            layer.source_parameters.get_or_insert(params);
                        }
                        Err(e) => diagnostics.warn(
                            DiagnosticKind::SchemaDrift,
                            format!("sourceParameters ignored: {e}"),
                            context.clone(),
                        ),
                    }
                    continue;
                }
                let path = format!("{context} / {key}");
                if let Some(node) = read_property(node, &path, diagnostics) {
                    layer.properties.insert(key, node);
                }
            }
        }
        Some(other) => diagnostics.warn(
            DiagnosticKind::SchemaDrift,
            format!("properties is {}, not an object; ignored", shape_of(&other)),
            context.clone(),
        ),
    }

    layer.effects = effects.and_then(|v| {
        read_parade(v, match_names::EFFECT_PARADE, "Effects", &context, diagnostics)
    });
    layer.masks = masks.and_then(|v| {
        read_parade(v, match_names::MASK_PARADE, "Masks", &context, diagnostics)
    });

    match animators {
        None | Some(JsonValue::Null) => {}
        Some(JsonValue::Array(items)) => {
            layer.text_animators = items
                .into_iter()
                .filter_map(|item| {
                    typed_or_warn::<TextAnimator>(item, "text animator", &context, diagnostics)
                })
                .collect();
        }
        Some(other) => diagnostics.warn(
            DiagnosticKind::SchemaDrift,
            format!("textAnimators is {}, not a list; ignored", shape_of(&other)),
            context.clone(),
        ),
    }
    Some(layer)
}

/// Effects and masks are normally one group node. A plain list of nodes is
/// also accepted and keyed by display name.
fn read_parade(
    value: JsonValue,
    match_name: &str,
    name: &str,
    context: &str,
    diagnostics: &mut Diagnostics,
) -> Option<PropertyNodeJson> {
    let path = format!("{context} / {name}");
    match value {
        JsonValue::Null => None,
        JsonValue::Array(items) => {
            let mut children = PropertyMap::new();
            for item in items {
                if let Some(node) = read_property(item, &path, diagnostics) {
                    children.insert(unique_key(&children, &node.name), node);
                }
            }
            Some(PropertyNodeJson::group(match_name, name, children))
        }
        other => read_property(other, &path, diagnostics),
    }
}

/// Type one property node and, recursively, its children.
pub(crate) fn read_property(
    value: JsonValue,
    context: &str,
    diagnostics: &mut Diagnostics,
) -> Option<PropertyNodeJson> {
    let mut object = match value {
        JsonValue::Object(object) => object,
        other => {
            diagnostics.warn(
                DiagnosticKind::SchemaDrift,
                format!("property entry is {}, not an object; skipped", shape_of(&other)),
                context,
            );
            return None;
        }
    };
    let children = object.remove("properties");
    let mut node: PropertyNodeJson = match serde_json::from_value(JsonValue::Object(object)) {
        Ok(node) => node,
        Err(e) => {
            diagnostics.warn(
                DiagnosticKind::SchemaDrift,
                format!("property skipped: {e}"),
                context,
            );
            return None;
        }
    };
    match children {
        None | Some(JsonValue::Null) => {}
        Some(JsonValue::Object(map)) => {
            let mut out = PropertyMap::new();
            for (key, child) in map {
                let path = format!("{context} / {key}");
                if let Some(child) = read_property(child, &path, diagnostics) {
                    out.insert(key, child);
                }
            }
            node.properties = Some(out);
        }
        Some(JsonValue::Array(items)) if items.is_empty() => {
            node.properties = Some(PropertyMap::new());
        }
        Some(other) => diagnostics.warn(
            DiagnosticKind::SchemaDrift,
            format!("children are {}, not an object; ignored", shape_of(&other)),
            context,
        ),
    }
    Some(node)
}

fn typed_or_warn<T: DeserializeOwned>(
    value: JsonValue,
    what: &str,
    context: &str,
    diagnostics: &mut Diagnostics,
) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(v) => Some(v),
        Err(e) => {
            diagnostics.warn(
                DiagnosticKind::SchemaDrift,
                format!("{what} skipped: {e}"),
                context,
            );
            None
        }
    }
}

/// `Err` carries the shape that was found instead of a list.
fn take_list(object: &mut Object, key: &str) -> Result<Vec<JsonValue>, &'static str> {
    match object.remove(key) {
        None | Some(JsonValue::Null) => Ok(Vec::new()),
        Some(JsonValue::Array(items)) => Ok(items),
        Some(other) => Err(shape_of(&other)),
    }
}

fn name_of(value: &JsonValue) -> Option<String> {
    value.get("name")?.as_str().map(str::to_string)
}

fn unique_key(map: &PropertyMap, name: &str) -> String {
    if !map.contains_key(name) {
        return name.to_string();
    }
    (2..)
        .map(|n| format!("{name} {n}"))
        .find(|candidate| !map.contains_key(candidate))
        .unwrap_or_else(|| name.to_string())
}

fn shape_of(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "a list",
        JsonValue::Object(_) => "an object",
    }
}
