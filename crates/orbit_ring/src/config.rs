//! Progress ring options
//!
//! Options deserialize from camelCase keys (`trackColor`,
//! `startAnimatingFraction`, `animateWhenProgress`, ...) and every field
//! falls back to its default when omitted.

use orbit_paint::Color;
use orbit_platform::parse_declarations;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RingError};

/// Where a block sits around the ring
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockPosition {
    TopLeft,
    TopRight,
    BottomCenter,
}

/// An annotation block revealed once progress reaches its threshold
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockSpec {
    /// Block text; the first newline becomes a line break
    pub message: String,
    pub position: BlockPosition,
    /// Threshold on the 0-100 progress scale
    pub animate_when_progress: f32,
}

impl BlockSpec {
    pub fn new(message: impl Into<String>, position: BlockPosition, threshold: f32) -> Self {
        Self {
            message: message.into(),
            position,
            animate_when_progress: threshold,
        }
    }
}

/// Container max width: a pixel count or a literal CSS size
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MaxWidth {
    Pixels(f32),
    Css(String),
}

impl MaxWidth {
    pub fn to_css(&self) -> String {
        match self {
            MaxWidth::Pixels(px) => format!("{px}px"),
            MaxWidth::Css(value) => value.clone(),
        }
    }
}

impl Default for MaxWidth {
    fn default() -> Self {
        MaxWidth::Css("100%".to_string())
    }
}

/// Raw declarations appended to the built-in rule of each visual slot
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canvas: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
}

impl StyleOverrides {
    /// Present overrides keyed by slot name
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("block", &self.block),
            ("canvas", &self.canvas),
            ("overlay", &self.overlay),
            ("text", &self.text),
            ("container", &self.container),
        ]
        .into_iter()
        .filter_map(|(slot, raw)| raw.as_deref().map(|raw| (slot, raw)))
    }
}

/// Externally supplied class names for each visual slot
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassNames {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canvas: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
}

/// Everything a [`ProgressCanvas`](crate::ProgressCanvas) is built from
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressCanvasOptions {
    /// Canvas width when the component creates the canvas
    pub width: f32,
    /// Canvas height when the component creates the canvas
    pub height: f32,
    /// Progress wedge radius
    pub radius: f32,
    pub max_width: MaxWidth,
    pub track_color: String,
    pub fill_color: String,
    pub border_color: String,
    /// Block number marker color
    pub accent_color: String,
    pub border_width: f32,
    /// Progress starts once the scroll offset passes `offset_top / start`
    pub start_animating_fraction: f32,
    /// Progress completes once the scroll offset reaches `offset_top / end`
    pub end_animating_fraction: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub blocks: Vec<BlockSpec>,
    pub css: StyleOverrides,
    pub class_names: ClassNames,
}

impl Default for ProgressCanvasOptions {
    fn default() -> Self {
        Self {
            width: 200.0,
            height: 200.0,
            radius: 70.0,
            max_width: MaxWidth::default(),
            track_color: "lightgrey".to_string(),
            fill_color: "green".to_string(),
            border_color: "green".to_string(),
            accent_color: "red".to_string(),
            border_width: 2.0,
            start_animating_fraction: 10.0,
            end_animating_fraction: 1.5,
            title: None,
            blocks: Vec::new(),
            css: StyleOverrides::default(),
            class_names: ClassNames::default(),
        }
    }
}

/// Canvas colors resolved from the option strings
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub track: Color,
    pub fill: Color,
    pub border: Color,
}

impl ProgressCanvasOptions {
    /// Check geometry, fractions, thresholds and canvas colors.
    ///
    /// `accent_color` only ever reaches the stylesheet, so it is passed
    /// through as written.
    ///
    /// Zero animating fractions are accepted; the progress model guards the
    /// resulting degenerate range.
    pub fn validate(&self) -> Result<Palette> {
        positive("width", self.width)?;
        positive("height", self.height)?;
        positive("radius", self.radius)?;

        if !self.border_width.is_finite() || self.border_width < 0.0 {
            return Err(invalid("borderWidth", "must be a finite value >= 0"));
        }
        if !self.start_animating_fraction.is_finite() {
            return Err(invalid("startAnimatingFraction", "must be finite"));
        }
        if !self.end_animating_fraction.is_finite() {
            return Err(invalid("endAnimatingFraction", "must be finite"));
        }

        match &self.max_width {
            MaxWidth::Pixels(px) if !px.is_finite() || *px < 0.0 => {
                return Err(invalid("maxWidth", "must be a finite pixel value >= 0"));
            }
            MaxWidth::Css(value) if value.trim().is_empty() => {
                return Err(invalid("maxWidth", "must not be empty"));
            }
            _ => {}
        }

        if let Some(block) = self
            .blocks
            .iter()
            .find(|b| !b.animate_when_progress.is_finite())
        {
            return Err(invalid(
                "blocks",
                format!("threshold of {:?} must be finite", block.message),
            ));
        }

        for (slot, raw) in self.css.iter() {
            parse_declarations(raw).map_err(|err| invalid("css", format!("{slot}: {err}")))?;
        }

        Ok(Palette {
            track: color("trackColor", &self.track_color)?,
            fill: color("fillColor", &self.fill_color)?,
            border: color("borderColor", &self.border_color)?,
        })
    }
}

fn invalid(option: &'static str, reason: impl Into<String>) -> RingError {
    RingError::InvalidOption {
        option,
        reason: reason.into(),
    }
}

fn positive(option: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(option, format!("must be a finite value > 0, got {value}")))
    }
}

fn color(option: &'static str, value: &str) -> Result<Color> {
    Color::parse(value).map_err(|err| invalid(option, err.to_string()))
}
