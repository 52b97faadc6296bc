//! Built-in style rules for the ring's elements
//!
//! Every rule takes the matching override string last, so overrides win.

use orbit_platform::{ElementId, Host, StyleRule};

use crate::config::{BlockPosition, ProgressCanvasOptions};
use crate::error::Result;

/// Register `rule` and attach its scoped class (and the external class name,
/// if any) to `element`. Returns the scoped class.
pub fn apply(
    host: &mut dyn Host,
    element: ElementId,
    rule: StyleRule,
    class_name: Option<&str>,
) -> Result<String> {
    let class = host.stylesheet().insert(rule);
    host.add_class(element, &class)?;
    if let Some(name) = class_name.filter(|n| !n.trim().is_empty()) {
        host.add_class(element, name)?;
    }
    Ok(class)
}

pub fn container(options: &ProgressCanvasOptions) -> Result<StyleRule> {
    Ok(StyleRule::new()
        .set("position", "relative")
        .set("max-width", options.max_width.to_css())
        .set("margin-left", "auto")
        .set("margin-right", "auto")
        .with_overrides(options.css.container.as_deref())?)
}

/// `None` when there is nothing to add to the canvas
pub fn canvas(options: &ProgressCanvasOptions) -> Result<Option<StyleRule>> {
    let rule = StyleRule::new().with_overrides(options.css.canvas.as_deref())?;
    Ok((!rule.is_empty()).then_some(rule))
}

pub fn title(options: &ProgressCanvasOptions) -> Result<StyleRule> {
    Ok(StyleRule::new()
        .set("color", options.fill_color.as_str())
        .set("max-width", format!("{}px", options.radius * 1.5))
        .set("text-align", "center")
        .set("font-size", "24px")
        .set("font-weight", "bold")
        .set("transition", "all ease-in-out 100ms")
        .with_overrides(options.css.text.as_deref())?)
}

pub fn overlay(options: &ProgressCanvasOptions) -> Result<StyleRule> {
    Ok(StyleRule::new()
        .set("position", "absolute")
        .set("left", "0")
        .set("right", "0")
        .set("bottom", "0")
        .set("top", "0")
        .set("display", "flex")
        .set("justify-content", "center")
        .set("align-items", "center")
        .set("height", format!("{}px", options.radius * 2.0))
        .with_overrides(options.css.overlay.as_deref())?)
}

/// Hidden state of the block at `index`, numbered from 1 by its marker
pub fn block(options: &ProgressCanvasOptions, index: usize) -> Result<StyleRule> {
    Ok(StyleRule::new()
        .set("position", "absolute")
        .set("font-size", "1.15rem")
        .set("line-height", "1.5rem")
        .set("font-weight", "600")
        .set("text-align", "left")
        .set("display", "flex")
        .set("flex-direction", "column")
        .set("opacity", "0")
        .set("width", "min-content")
        .set("white-space", "nowrap")
        .set("transition", "all ease-in-out 100ms")
        .set("transform", "translateY(-10px)")
        .before("content", format!("'{}.'", index + 1))
        .before("color", options.accent_color.as_str())
        .before("font-size", "2rem")
        .before("line-height", "2rem")
        .before("font-weight", "bold")
        .before("margin-right", "0.5rem")
        .before("display", "block")
        .with_overrides(options.css.block.as_deref())?)
}

/// Placement around the ring for a block of measured `height`
pub fn block_position(position: BlockPosition, height: f32) -> StyleRule {
    match position {
        BlockPosition::TopLeft => StyleRule::new()
            .set("left", "0")
            .set("top", format!("-{}px", height + 25.0))
            .set("margin-left", "15px")
            .set("text-align", "right"),
        BlockPosition::TopRight => StyleRule::new()
            .set("right", "0")
            .set("top", format!("-{}px", height + 25.0))
            .set("margin-right", "15px"),
        BlockPosition::BottomCenter => StyleRule::new()
            .set("left", "0")
            .set("right", "0")
            .set("margin-left", "auto")
            .set("margin-right", "auto")
            .set("bottom", format!("-{height}px"))
            .set("flex-direction", "row")
            .set("align-self", "center"),
    }
}

/// Revealed state of a block
pub fn active_block() -> StyleRule {
    StyleRule::new()
        .set("opacity", "1")
        .set("transform", "translateY(0)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MaxWidth;

    #[test]
    fn container_uses_max_width() {
        let options = ProgressCanvasOptions {
            max_width: MaxWidth::Pixels(390.0),
            ..Default::default()
        };
        let rule = container(&options).unwrap();
        assert_eq!(rule.value("max-width"), Some("390px"));
        assert_eq!(rule.value("position"), Some("relative"));
    }

    #[test]
    fn title_override_wins() {
        let options = ProgressCanvasOptions {
            css: crate::config::StyleOverrides {
                text: Some("font-size: 30px; color: navy".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let rule = title(&options).unwrap();
        assert_eq!(rule.value("font-size"), Some("30px"));
        assert_eq!(rule.value("color"), Some("navy"));
        assert_eq!(rule.value("max-width"), Some("105px"));
    }

    #[test]
    fn block_marker_is_one_based() {
        let rule = block(&ProgressCanvasOptions::default(), 2).unwrap();
        let content = rule
            .before_declarations()
            .iter()
            .find(|d| d.property == "content")
            .map(|d| d.value.as_str());
        assert_eq!(content, Some("'3.'"));
        assert_eq!(rule.value("opacity"), Some("0"));
    }

    #[test]
    fn positions_offset_by_height() {
        assert_eq!(
            block_position(BlockPosition::TopRight, 48.0).value("top"),
            Some("-73px")
        );
        let bottom = block_position(BlockPosition::BottomCenter, 48.0);
        assert_eq!(bottom.value("bottom"), Some("-48px"));
        assert_eq!(bottom.value("flex-direction"), Some("row"));
    }

    #[test]
    fn empty_canvas_override_adds_no_rule() {
        assert!(canvas(&ProgressCanvasOptions::default()).unwrap().is_none());
        let bad = ProgressCanvasOptions {
            css: crate::config::StyleOverrides {
                canvas: Some("border".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(canvas(&bad).is_err());
    }
}
