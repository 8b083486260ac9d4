//! Stable host identifiers for the property groups and leaves the codec
//! treats specially.

pub const TRANSFORM: &str = "ADBE Transform Group";
pub const ANCHOR_POINT: &str = "ADBE Anchor Point";
pub const POSITION: &str = "ADBE Position";
pub const SCALE: &str = "ADBE Scale";
pub const ORIENTATION: &str = "ADBE Orientation";
pub const ROTATE_X: &str = "ADBE Rotate X";
pub const ROTATE_Y: &str = "ADBE Rotate Y";
pub const ROTATE_Z: &str = "ADBE Rotate Z";
pub const OPACITY: &str = "ADBE Opacity";

pub const TEXT_PROPERTIES: &str = "ADBE Text Properties";
pub const TEXT_DOCUMENT: &str = "ADBE Text Document";
pub const TEXT_ANIMATORS: &str = "ADBE Text Animators";
pub const TEXT_ANIMATOR: &str = "ADBE Text Animator";
pub const TEXT_SELECTORS: &str = "ADBE Text Selectors";
pub const TEXT_ANIMATOR_PROPERTIES: &str = "ADBE Text Animator Properties";

pub const ROOT_VECTORS: &str = "ADBE Root Vectors Group";
pub const EFFECT_PARADE: &str = "ADBE Effect Parade";
pub const MASK_PARADE: &str = "ADBE Mask Parade";

pub const CAMERA_OPTIONS: &str = "ADBE Camera Options Group";
pub const CAMERA_ZOOM: &str = "ADBE Camera Zoom";
pub const LIGHT_OPTIONS: &str = "ADBE Light Options Group";
pub const LIGHT_INTENSITY: &str = "ADBE Light Intensity";
pub const LIGHT_COLOR: &str = "ADBE Light Color";
