//! Rich text document value (the value of a text layer's source text).

use serde::{Deserialize, Serialize};

/// Paragraph justification. Only three entries survive the interchange
/// format; every other host justification collapses to `Left`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Justification {
    #[default]
    #[serde(rename = "LEFT")]
    Left,
    #[serde(rename = "CENTER")]
    Center,
    #[serde(rename = "RIGHT")]
    Right,
}

impl Justification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Justification::Left => "LEFT",
            Justification::Center => "CENTER",
            Justification::Right => "RIGHT",
        }
    }

    /// Lenient parse: unknown names map to `Left`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "CENTER" | "CENTER_JUSTIFY" => Justification::Center,
            "RIGHT" | "RIGHT_JUSTIFY" => Justification::Right,
            _ => Justification::Left,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextDocument {
    pub text: String,
    #[serde(default)]
    pub font: String,
    #[serde(rename = "fontSize", default = "default_font_size")]
    pub font_size: f64,
    #[serde(rename = "fillColor", default = "default_fill")]
    pub fill_color: [f64; 3],
    #[serde(default)]
    pub justification: Justification,
}

fn default_font_size() -> f64 {
    36.0
}

fn default_fill() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

impl TextDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: String::new(),
            font_size: default_font_size(),
            fill_color: default_fill(),
            justification: Justification::Left,
        }
    }

    pub fn with_font(mut self, font: impl Into<String>, size: f64) -> Self {
        self.font = font.into();
        self.font_size = size;
        self
    }

    pub fn with_fill(mut self, fill: [f64; 3]) -> Self {
        self.fill_color = fill;
        self
    }

    pub fn with_justification(mut self, justification: Justification) -> Self {
        self.justification = justification;
        self
    }
}
