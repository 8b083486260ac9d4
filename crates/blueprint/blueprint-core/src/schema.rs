//! Serde model of the blueprint JSON document.
//!
//! Field names follow the interchange format (camelCase). Optional fields are
//! omitted on write and tolerated when absent on read; unknown fields are
//! ignored so newer writers stay readable.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

use blueprint_document_core::{BlendingMode, LayerKind, TrackMatteMode};

/// Ordered `display-name -> node` map used for property groups.
pub type PropertyMap = IndexMap<String, PropertyNodeJson>;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    #[serde(rename = "projectSettings", default)]
    pub project_settings: ProjectSettings,
    #[serde(default)]
    pub assets: Vec<AssetEntry>,
    #[serde(default)]
    pub compositions: Vec<CompositionEntry>,
}

impl Blueprint {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_string(&self, pretty: bool) -> Result<String, serde_json::Error> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }

    pub fn composition(&self, name: &str) -> Option<&CompositionEntry> {
        self.compositions.iter().find(|c| c.name == name)
    }

    pub fn asset(&self, id: &str) -> Option<&AssetEntry> {
        self.assets.iter().find(|a| a.id == id)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectSettings {
    #[serde(rename = "bitsPerChannel", default, skip_serializing_if = "Option::is_none")]
    pub bits_per_channel: Option<u8>,
    #[serde(rename = "expressionEngine", default, skip_serializing_if = "Option::is_none")]
    pub expression_engine: Option<String>,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(rename = "frameRate", default)]
    pub frame_rate: f64,
    #[serde(default)]
    pub duration: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetEntry {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerEntry {
    pub name: String,
    pub time: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CompositionEntry {
    pub name: String,
    pub width: u32,
    pub height: u32,
    #[serde(rename = "frameRate")]
    pub frame_rate: f64,
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub markers: Vec<MarkerEntry>,
    #[serde(default)]
    pub layers: Vec<LayerEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerEntry {
    pub name: String,
    #[serde(default)]
    pub index: usize,
    #[serde(rename = "type", deserialize_with = "lenient_layer_kind")]
    pub kind: LayerKind,
    #[serde(rename = "inPoint", default)]
    pub in_point: f64,
    #[serde(rename = "outPoint", default)]
    pub out_point: f64,
    #[serde(rename = "startTime", default)]
    pub start_time: f64,
    #[serde(default)]
    pub attributes: AttributesEntry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(rename = "assetId", default, skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    #[serde(rename = "refId", default, skip_serializing_if = "Option::is_none")]
    pub ref_id: Option<String>,
    #[serde(rename = "sourceText", default, skip_serializing_if = "Option::is_none")]
    pub source_text: Option<String>,
    #[serde(rename = "sourceParameters", default, skip_serializing_if = "Option::is_none")]
    pub source_parameters: Option<SourceParameters>,
    #[serde(default)]
    pub properties: PropertyMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<PropertyNodeJson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub masks: Option<PropertyNodeJson>,
    #[serde(rename = "textAnimators", default, skip_serializing_if = "Vec::is_empty")]
    pub text_animators: Vec<TextAnimator>,
}

impl LayerEntry {
    pub fn new(name: impl Into<String>, index: usize, kind: LayerKind) -> Self {
        Self {
            name: name.into(),
            index,
            kind,
            in_point: 0.0,
            out_point: 0.0,
            start_time: 0.0,
            attributes: AttributesEntry::default(),
            parent: None,
            asset_id: None,
            ref_id: None,
            source_text: None,
            source_parameters: None,
            properties: PropertyMap::new(),
            effects: None,
            masks: None,
            text_animators: Vec::new(),
        }
    }
}

fn lenient_layer_kind<'de, D>(deserializer: D) -> Result<LayerKind, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    Ok(LayerKind::from_name(&name))
}

fn is_false(v: &bool) -> bool {
    !*v
}

/// Layer switches. Booleans are written only when set.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributesEntry {
    #[serde(rename = "threeD", default, skip_serializing_if = "is_false")]
    pub three_d: bool,
    #[serde(rename = "adjustmentLayer", default, skip_serializing_if = "is_false")]
    pub adjustment_layer: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub shy: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub solo: bool,
    /// Host constant name, e.g. `MULTIPLY`. Kept as text so an unknown mode
    /// degrades to a warning instead of failing the whole document.
    #[serde(rename = "blendingMode", default, skip_serializing_if = "Option::is_none")]
    pub blending_mode: Option<String>,
    #[serde(rename = "trackMatte", default, skip_serializing_if = "Option::is_none")]
    pub track_matte: Option<TrackMatteEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackMatteEntry {
    pub mode: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceParameters {
    #[serde(default)]
    pub color: Vec<f64>,
}

impl SourceParameters {
    pub fn rgb(&self) -> [f64; 3] {
        match self.color.as_slice() {
            [r, g, b, ..] => [*r, *g, *b],
            _ => [0.0, 0.0, 0.0],
        }
    }
}

/// One serialized property node, leaf or group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertyNodeJson {
    #[serde(rename = "matchName")]
    pub match_name: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<JsonValue>,
    #[serde(default)]
    pub animated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyframes: Option<Vec<KeyframeJson>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertyMap>,
}

impl PropertyNodeJson {
    pub fn leaf(match_name: impl Into<String>, name: impl Into<String>, value: JsonValue) -> Self {
        Self {
            match_name: match_name.into(),
            name: name.into(),
            value: Some(value),
            animated: false,
            keyframes: None,
            expression: None,
            properties: None,
        }
    }

    pub fn group(match_name: impl Into<String>, name: impl Into<String>, children: PropertyMap) -> Self {
        Self {
            match_name: match_name.into(),
            name: name.into(),
            value: None,
            animated: false,
            keyframes: None,
            expression: None,
            properties: Some(children),
        }
    }

    pub fn is_group(&self) -> bool {
        self.properties.is_some()
    }

    /// Child entry by its serialized key.
    pub fn child(&self, key: &str) -> Option<&PropertyNodeJson> {
        self.properties.as_ref()?.get(key)
    }

    pub fn children(&self) -> impl Iterator<Item = (&String, &PropertyNodeJson)> {
        self.properties.iter().flat_map(|m| m.iter())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyframeJson {
    /// Seconds relative to the owning layer's in point.
    pub time: f64,
    pub value: JsonValue,
}

/// Normalized view of a text animator, derived from the `Text` subtree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextAnimator {
    pub name: String,
    #[serde(default)]
    pub selectors: Vec<SelectorEntry>,
    #[serde(rename = "animatorProperties", default)]
    pub animator_properties: Vec<AnimatorPropertyEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectorEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertyMap>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimatorPropertyEntry {
    pub property: String,
    pub value_data: PropertyNodeJson,
}

/// Host constant name of a blending mode (`SCREEN`, `LINEAR_DODGE`, ...).
pub fn blending_mode_name(mode: BlendingMode) -> String {
    match serde_json::to_value(mode) {
        Ok(JsonValue::String(s)) => s,
        _ => "NORMAL".to_string(),
    }
}

pub fn parse_blending_mode(name: &str) -> Option<BlendingMode> {
    serde_json::from_value(JsonValue::String(name.to_string())).ok()
}

pub fn track_matte_name(mode: TrackMatteMode) -> String {
    match serde_json::to_value(mode) {
        Ok(JsonValue::String(s)) => s,
        _ => "None".to_string(),
    }
}

/// `None` for `"None"` and anything unrecognized.
pub fn parse_track_matte(name: &str) -> Option<TrackMatteMode> {
    serde_json::from_value(JsonValue::String(name.to_string())).ok()
}
