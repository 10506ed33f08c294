use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontCategory {
    Serif,
    Sans,
    Script,
    Display,
    Monogram,
}

/// One named style of a font, bound to the family string the renderer loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FontStyle {
    pub label: &'static str,
    pub family: &'static str,
}

impl FontStyle {
    pub const fn new(label: &'static str, family: &'static str) -> Self {
        Self { label, family }
    }
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Font {
    pub name: &'static str,
    pub category: FontCategory,
    /// Ordered; the first entry is the default style.
    pub styles: &'static [FontStyle],
}

impl Font {
    pub fn default_style(&self) -> &'static FontStyle {
        &self.styles[0]
    }

    pub fn style(&self, label: &str) -> Option<&'static FontStyle> {
        self.styles.iter().find(|s| s.label == label)
    }
}

/// A font in the selection together with its active style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedFont {
    pub font: &'static Font,
    pub style: &'static FontStyle,
}

impl SelectedFont {
    pub fn new(font: &'static Font) -> Self {
        Self {
            font,
            style: font.default_style(),
        }
    }

    pub fn label(&self) -> String {
        format!("{} ({})", self.font.name, self.style.label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum FrameStyle {
    Circle,
    Square,
    Diamond,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MonogramMode {
    /// Three glyphs from a regular font, middle one emphasised.
    Font(SelectedFont),
    /// Dedicated circle-monogram face, always framed by a circle.
    Circular,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonogramSpec {
    /// Left, middle, right.
    pub initials: [char; 3],
    pub mode: MonogramMode,
    pub size: f32,
    pub frame: Option<FrameStyle>,
    /// Disables the smaller side glyphs; all three use `size`.
    pub uniform_scale: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetails {
    pub order_number: String,
    pub customer_name: String,
    #[serde(default)]
    pub company: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl StoredObject {
    pub fn content_type_or_default(&self) -> &str {
        self.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE)
    }
}

/// Sidecar metadata persisted next to an object by backends without native headers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub content_type: Option<String>,
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
}

/// Rendered preview, ready to be uploaded as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    pub markup: String,
    pub width: f32,
    pub height: f32,
}

impl SvgDocument {
    pub fn as_str(&self) -> &str {
        &self.markup
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.markup.into_bytes()
    }
}
