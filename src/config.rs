//! Declarative styling for word text and its tooltip.

use gpui::{Hsla, Pixels, Rgba, px, size};
use gpui_word_primitives::words::{WordBoundary, WordStyle};
use serde::{Deserialize, Deserializer, de::Error};

use crate::components::WordTooltipStyle;

/// Errors raised while reading word text styling.
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    /// The config is not valid JSON or has the wrong shape.
    /// Colors must be `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`.
    #[error("invalid word text config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Word boundary rule as written in config files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryConfig {
    /// See [`WordBoundary::Unicode`].
    #[default]
    Unicode,
    /// See [`WordBoundary::Alphanumeric`].
    Alphanumeric,
}

impl From<BoundaryConfig> for WordBoundary {
    fn from(value: BoundaryConfig) -> Self {
        match value {
            BoundaryConfig::Unicode => WordBoundary::Unicode,
            BoundaryConfig::Alphanumeric => WordBoundary::Alphanumeric,
        }
    }
}

/// Styling for selectable words, usually read from JSON:
///
/// ```json
/// {
///     "underline": true,
///     "highlight_background": "#ffe08a",
///     "highlight_text": "#c0392b",
///     "word_boundary": "alphanumeric",
///     "tooltip": { "width": "180px", "height": 28, "background": "#1e1e2e" }
/// }
/// ```
///
/// Every field is optional. Missing fields keep the defaults of
/// [`WordStyle`] and [`WordTooltipStyle`].
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WordTextConfig {
    /// Underline the selected word.
    pub underline: Option<bool>,
    /// Background behind the selected word.
    pub highlight_background: Option<Rgba>,
    /// Text color of the selected word.
    pub highlight_text: Option<Rgba>,
    /// How text is split into words.
    pub word_boundary: BoundaryConfig,
    /// Tooltip bubble overrides.
    pub tooltip: TooltipConfig,
}

/// Tooltip part of a [`WordTextConfig`].
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TooltipConfig {
    #[serde(deserialize_with = "de_opt_pixels")]
    pub width: Option<Pixels>,
    #[serde(deserialize_with = "de_opt_pixels")]
    pub height: Option<Pixels>,
    #[serde(deserialize_with = "de_opt_pixels")]
    pub gap: Option<Pixels>,
    #[serde(deserialize_with = "de_opt_pixels")]
    pub corner_radius: Option<Pixels>,
    pub background: Option<Rgba>,
    pub text_color: Option<Rgba>,
}

impl WordTextConfig {
    /// Reads a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, StyleError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The selection style this config describes.
    pub fn word_style(&self) -> WordStyle {
        let defaults = WordStyle::default();
        WordStyle {
            highlight_background: self
                .highlight_background
                .map_or(defaults.highlight_background, Hsla::from),
            highlight_text: self
                .highlight_text
                .map_or(defaults.highlight_text, Hsla::from),
            underline: self.underline.unwrap_or(defaults.underline),
        }
    }

    /// The word boundary rule this config describes.
    pub fn word_boundary(&self) -> WordBoundary {
        self.word_boundary.into()
    }

    /// The tooltip style this config describes.
    pub fn tooltip_style(&self) -> WordTooltipStyle {
        let defaults = WordTooltipStyle::default();
        let tooltip = &self.tooltip;
        WordTooltipStyle {
            size: size(
                tooltip.width.unwrap_or(defaults.size.width),
                tooltip.height.unwrap_or(defaults.size.height),
            ),
            gap: tooltip.gap.unwrap_or(defaults.gap),
            corner_radius: tooltip.corner_radius.unwrap_or(defaults.corner_radius),
            background: tooltip.background.map_or(defaults.background, Hsla::from),
            text_color: tooltip.text_color.map_or(defaults.text_color, Hsla::from),
        }
    }
}

fn de_opt_pixels<'de, D>(deserializer: D) -> Result<Option<Pixels>, D::Error>
where
    D: Deserializer<'de>,
{
    match StringOrFloat::deserialize(deserializer)? {
        StringOrFloat::String(string) => {
            let string = match string.strip_suffix("px") {
                Some(string) => string,
                None => return Err(D::Error::custom("expected string to end with 'px'")),
            };

            match string.parse::<f32>() {
                Ok(pixels) => Ok(Some(px(pixels))),
                Err(_) => Err(D::Error::custom("could not convert string into pixels")),
            }
        }

        StringOrFloat::Float(pixels) => Ok(Some(px(pixels))),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrFloat {
    String(String),
    Float(f32),
}
