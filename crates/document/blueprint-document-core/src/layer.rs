//! Layers: one element of a composition with timing, a closed type tag and a
//! property tree.

use serde::{Deserialize, Serialize};

use blueprint_api_core::{PropertyValue, TextDocument};

use crate::ids::{ItemId, LayerId};
use crate::match_names as mn;
use crate::property::{LeafProperty, PropertyGroup};

/// Closed layer type tag, assigned once when the layer is constructed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerKind {
    Camera,
    Light,
    Text,
    Shape,
    Null,
    Solid,
    Footage,
    Audio,
    #[serde(rename = "Pre-comp")]
    Precomp,
    Unknown,
}

impl LayerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerKind::Camera => "Camera",
            LayerKind::Light => "Light",
            LayerKind::Text => "Text",
            LayerKind::Shape => "Shape",
            LayerKind::Null => "Null",
            LayerKind::Solid => "Solid",
            LayerKind::Footage => "Footage",
            LayerKind::Audio => "Audio",
            LayerKind::Precomp => "Pre-comp",
            LayerKind::Unknown => "Unknown",
        }
    }

    /// Lenient parse of the interchange name; anything unrecognized is `Unknown`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Camera" => LayerKind::Camera,
            "Light" => LayerKind::Light,
            "Text" => LayerKind::Text,
            "Shape" => LayerKind::Shape,
            "Null" => LayerKind::Null,
            "Solid" => LayerKind::Solid,
            "Footage" => LayerKind::Footage,
            "Audio" => LayerKind::Audio,
            "Pre-comp" | "Precomp" => LayerKind::Precomp,
            _ => LayerKind::Unknown,
        }
    }

    /// Layers that sit on a project item (footage, solid or composition).
    pub fn has_source(&self) -> bool {
        matches!(
            self,
            LayerKind::Solid | LayerKind::Footage | LayerKind::Audio | LayerKind::Precomp
        )
    }

    /// Cameras and lights carry no effects or masks.
    pub fn is_visual(&self) -> bool {
        !matches!(self, LayerKind::Camera | LayerKind::Light)
    }
}

impl std::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Layer blending modes, named after the host constants.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlendingMode {
    #[default]
    Normal,
    Dissolve,
    DancingDissolve,
    Darken,
    Multiply,
    ColorBurn,
    ClassicColorBurn,
    LinearBurn,
    DarkerColor,
    Add,
    Lighten,
    Screen,
    ColorDodge,
    ClassicColorDodge,
    LinearDodge,
    LighterColor,
    Overlay,
    SoftLight,
    HardLight,
    LinearLight,
    VividLight,
    PinLight,
    HardMix,
    Difference,
    ClassicDifference,
    Exclusion,
    Subtract,
    Divide,
    Hue,
    Saturation,
    Color,
    Luminosity,
    StencilAlpha,
    StencilLuma,
    SilhouetteAlpha,
    SilhouetteLuma,
    AlphaAdd,
    LuminescentPremul,
}

impl BlendingMode {
    pub fn is_normal(&self) -> bool {
        *self == BlendingMode::Normal
    }
}

/// Track matte relationship with the layer above.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackMatteMode {
    Alpha,
    #[serde(rename = "Alpha Inverted")]
    AlphaInverted,
    Luma,
    #[serde(rename = "Luma Inverted")]
    LumaInverted,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayerAttributes {
    pub three_d: bool,
    pub adjustment_layer: bool,
    pub locked: bool,
    pub shy: bool,
    pub solo: bool,
    pub blending_mode: BlendingMode,
    /// `None` when the layer has no track matte.
    pub track_matte: Option<TrackMatteMode>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub kind: LayerKind,
    pub in_point: f64,
    pub out_point: f64,
    pub start_time: f64,
    pub attributes: LayerAttributes,
    pub parent: Option<LayerId>,
    /// Project item the layer draws from (footage, solid or composition).
    pub source: Option<ItemId>,
    /// Root of the property tree (Transform, Text, Contents, Effects, Masks).
    pub root: PropertyGroup,
}

impl Layer {
    /// New layer of `kind` with the host's default property tree.
    pub fn new(id: LayerId, name: impl Into<String>, kind: LayerKind, comp_size: (u32, u32)) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            in_point: 0.0,
            out_point: 0.0,
            start_time: 0.0,
            attributes: LayerAttributes::default(),
            parent: None,
            source: None,
            root: default_tree(kind, comp_size),
        }
    }

    pub fn with_timing(mut self, in_point: f64, out_point: f64, start_time: f64) -> Self {
        self.in_point = in_point;
        self.out_point = out_point;
        self.start_time = start_time;
        self
    }

    pub fn transform(&self) -> Option<&PropertyGroup> {
        self.root.group(mn::TRANSFORM)
    }

    pub fn transform_mut(&mut self) -> Option<&mut PropertyGroup> {
        self.root.group_mut(mn::TRANSFORM)
    }

    pub fn text_properties(&self) -> Option<&PropertyGroup> {
        self.root.group(mn::TEXT_PROPERTIES)
    }

    pub fn text_properties_mut(&mut self) -> Option<&mut PropertyGroup> {
        self.root.group_mut(mn::TEXT_PROPERTIES)
    }

    pub fn contents(&self) -> Option<&PropertyGroup> {
        self.root.group(mn::ROOT_VECTORS)
    }

    pub fn contents_mut(&mut self) -> Option<&mut PropertyGroup> {
        self.root.group_mut(mn::ROOT_VECTORS)
    }

    pub fn effects(&self) -> Option<&PropertyGroup> {
        self.root.group(mn::EFFECT_PARADE)
    }

    pub fn effects_mut(&mut self) -> Option<&mut PropertyGroup> {
        self.root.group_mut(mn::EFFECT_PARADE)
    }

    pub fn masks(&self) -> Option<&PropertyGroup> {
        self.root.group(mn::MASK_PARADE)
    }

    pub fn masks_mut(&mut self) -> Option<&mut PropertyGroup> {
        self.root.group_mut(mn::MASK_PARADE)
    }

    /// Current source text of a text layer.
    pub fn source_text(&self) -> Option<&TextDocument> {
        self.text_properties()?
            .leaf(mn::TEXT_DOCUMENT)?
            .value
            .as_ref()?
            .as_text()
    }
}

fn transform_group(kind: LayerKind, (width, height): (u32, u32)) -> PropertyGroup {
    let center = PropertyValue::vec3(width as f64 / 2.0, height as f64 / 2.0, 0.0);
    let mut group = PropertyGroup::named(mn::TRANSFORM, "Transform");
    if kind != LayerKind::Camera && kind != LayerKind::Light {
        group.push(LeafProperty::new(
            mn::ANCHOR_POINT,
            "Anchor Point",
            PropertyValue::vec3(0.0, 0.0, 0.0),
        ));
    }
    group.push(LeafProperty::new(mn::POSITION, "Position", center));
    if kind != LayerKind::Camera && kind != LayerKind::Light {
        group.push(LeafProperty::new(
            mn::SCALE,
            "Scale",
            PropertyValue::vec3(100.0, 100.0, 100.0),
        ));
    }
    group
        .with_child(LeafProperty::new(
            mn::ORIENTATION,
            "Orientation",
            PropertyValue::vec3(0.0, 0.0, 0.0),
        ))
        .with_child(LeafProperty::new(mn::ROTATE_X, "X Rotation", PropertyValue::Scalar(0.0)))
        .with_child(LeafProperty::new(mn::ROTATE_Y, "Y Rotation", PropertyValue::Scalar(0.0)))
        .with_child(LeafProperty::new(mn::ROTATE_Z, "Rotation", PropertyValue::Scalar(0.0)))
        .with_child(LeafProperty::new(mn::OPACITY, "Opacity", PropertyValue::Scalar(100.0)))
}

fn default_tree(kind: LayerKind, comp_size: (u32, u32)) -> PropertyGroup {
    let mut root = PropertyGroup::named("ADBE Layer", "Layer");
    match kind {
        LayerKind::Text => {
            let mut source = LeafProperty::new(
                mn::TEXT_DOCUMENT,
                "Source Text",
                PropertyValue::Text(TextDocument::new("")),
            );
            // Text documents have no meaningful default; the source text is
            // always exported regardless.
            source.default = None;
            root.push(
                PropertyGroup::named(mn::TEXT_PROPERTIES, "Text")
                    .with_child(source)
                    .with_child(PropertyGroup::indexed(mn::TEXT_ANIMATORS, "Animators")),
            );
        }
        LayerKind::Shape => {
            root.push(PropertyGroup::indexed(mn::ROOT_VECTORS, "Contents"));
        }
        LayerKind::Camera => {
            root.push(
                PropertyGroup::named(mn::CAMERA_OPTIONS, "Camera Options").with_child(
                    LeafProperty::new(mn::CAMERA_ZOOM, "Zoom", PropertyValue::Scalar(1000.0)),
                ),
            );
        }
        LayerKind::Light => {
            root.push(
                PropertyGroup::named(mn::LIGHT_OPTIONS, "Light Options")
                    .with_child(LeafProperty::new(
                        mn::LIGHT_INTENSITY,
                        "Intensity",
                        PropertyValue::Scalar(100.0),
                    ))
                    .with_child(LeafProperty::new(
                        mn::LIGHT_COLOR,
                        "Color",
                        PropertyValue::rgba(1.0, 1.0, 1.0, 1.0),
                    )),
            );
        }
        _ => {}
    }
    root.push(transform_group(kind, comp_size));
    if kind.is_visual() {
        root.push(PropertyGroup::indexed(mn::MASK_PARADE, "Masks"));
        root.push(PropertyGroup::indexed(mn::EFFECT_PARADE, "Effects"));
    }
    root
}
