//! Title and annotation blocks drawn over the ring

use orbit_platform::{Content, ElementId, Host, PlatformError, Tag};

use crate::config::{BlockSpec, ProgressCanvasOptions};
use crate::error::Result;
use crate::styles;

/// Progress at which the title switches to the contrast color
pub const CONTRAST_THRESHOLD: f32 = 75.0;

/// Title color once the ring is mostly filled
pub const CONTRAST_COLOR: &str = "white";

/// Block message as inline content; only the first newline breaks the line
pub fn block_content(message: &str) -> Content {
    match message.split_once('\n') {
        Some((first, rest)) => {
            let mut content = Content::text(first);
            content.push_break();
            content.push_text(rest);
            content
        }
        None => Content::text(message),
    }
}

#[derive(Debug)]
struct BlockInstance {
    element: ElementId,
    threshold: f32,
    active: bool,
}

/// Elements created over the ring and their last applied state
#[derive(Debug)]
pub struct Overlay {
    overlay: ElementId,
    title: ElementId,
    blocks: Vec<BlockInstance>,
    active_class: String,
    fill_color: String,
    contrast: Option<bool>,
}

impl Overlay {
    /// Create the title, blocks and overlay inside `container`
    pub fn setup(
        host: &mut dyn Host,
        container: ElementId,
        options: &ProgressCanvasOptions,
    ) -> Result<Self> {
        let title = host.create_element(Tag::Paragraph);
        styles::apply(
            host,
            title,
            styles::title(options)?,
            options.class_names.text.as_deref(),
        )?;
        if let Some(text) = &options.title {
            host.set_content(title, Content::text(text.as_str()))?;
        }

        let mut blocks = Vec::with_capacity(options.blocks.len());
        for (index, spec) in options.blocks.iter().enumerate() {
            blocks.push(Self::setup_block(host, container, options, index, spec)?);
        }

        // inserted after the block rules so it overrides their hidden state
        let active_class = host.stylesheet().insert(styles::active_block());

        let overlay = host.create_element(Tag::Div);
        host.append_child(overlay, title)?;
        styles::apply(
            host,
            overlay,
            styles::overlay(options)?,
            options.class_names.overlay.as_deref(),
        )?;
        host.append_child(container, overlay)?;

        tracing::debug!(blocks = blocks.len(), "overlay elements created");
        Ok(Self {
            overlay,
            title,
            blocks,
            active_class,
            fill_color: options.fill_color.clone(),
            contrast: None,
        })
    }

    fn setup_block(
        host: &mut dyn Host,
        container: ElementId,
        options: &ProgressCanvasOptions,
        index: usize,
        spec: &BlockSpec,
    ) -> Result<BlockInstance> {
        let element = host.create_element(Tag::Paragraph);
        host.set_content(element, block_content(&spec.message))?;
        styles::apply(
            host,
            element,
            styles::block(options, index)?,
            options.class_names.block.as_deref(),
        )?;
        host.append_child(container, element)?;

        let height = host
            .bounding_client_rect(element)
            .map(|rect| rect.height)
            .unwrap_or_default();
        styles::apply(
            host,
            element,
            styles::block_position(spec.position, height),
            None,
        )?;

        Ok(BlockInstance {
            element,
            threshold: spec.animate_when_progress,
            active: false,
        })
    }

    /// Reveal or hide blocks and pick the title color for `pct`.
    ///
    /// Every element is brought up to date even when one of them fails; the
    /// first host error is returned afterwards and the failed element is
    /// retried on the next update.
    pub fn update(&mut self, host: &mut dyn Host, pct: f32) -> Result<()> {
        let mut first_error: Option<PlatformError> = None;

        for block in &mut self.blocks {
            let active = pct >= block.threshold;
            if active == block.active {
                continue;
            }
            let applied = if active {
                host.add_class(block.element, &self.active_class)
            } else {
                host.remove_class(block.element, &self.active_class)
            };
            match applied {
                Ok(()) => block.active = active,
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }

        let contrast = pct >= CONTRAST_THRESHOLD;
        if self.contrast != Some(contrast) {
            let color = if contrast {
                CONTRAST_COLOR
            } else {
                self.fill_color.as_str()
            };
            match host.set_style_property(self.title, "color", Some(color)) {
                Ok(()) => self.contrast = Some(contrast),
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }

        match first_error {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    pub fn title(&self) -> ElementId {
        self.title
    }

    pub fn overlay(&self) -> ElementId {
        self.overlay
    }

    pub fn blocks(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.blocks.iter().map(|b| b.element)
    }

    pub fn active_class(&self) -> &str {
        &self.active_class
    }

    /// Remove every created element; the title goes with the overlay
    pub fn remove(&self, host: &mut dyn Host) {
        for element in self.blocks().chain(std::iter::once(self.overlay)) {
            if host.contains(element) {
                if let Err(err) = host.remove_element(element) {
                    tracing::warn!(%err, "failed to remove overlay element");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BlockPosition;
    use orbit_paint::Rect;
    use orbit_platform::{HeadlessHost, Inline};

    fn setup(blocks: Vec<BlockSpec>) -> (HeadlessHost, ElementId, Overlay) {
        let mut host = HeadlessHost::new(800.0, 600.0);
        let body = host.body();
        let container = host
            .insert_element(body, Tag::Div, Rect::new(0.0, 1000.0, 400.0, 400.0))
            .unwrap();
        let options = ProgressCanvasOptions {
            title: Some("Less Sugar".into()),
            blocks,
            ..Default::default()
        };
        let overlay = Overlay::setup(&mut host, container, &options).unwrap();
        (host, container, overlay)
    }

    #[test]
    fn only_first_newline_breaks() {
        let content = block_content("Reduce\n sugar\n cravings");
        assert_eq!(
            content.runs(),
            &[
                Inline::Text("Reduce".into()),
                Inline::LineBreak,
                Inline::Text(" sugar\n cravings".into()),
            ]
        );
        assert_eq!(block_content("single").line_count(), 1);
    }

    #[test]
    fn blocks_precede_overlay() {
        let (host, container, overlay) = setup(vec![
            BlockSpec::new("a\nb", BlockPosition::TopLeft, 10.0),
            BlockSpec::new("c", BlockPosition::BottomCenter, 60.0),
        ]);
        let children = host.children(container);
        assert_eq!(children.len(), 3);
        assert_eq!(children[2], overlay.overlay());
        assert_eq!(host.children(overlay.overlay()), vec![overlay.title()]);

        // two lines at 24px: top = -(48 + 25)
        assert_eq!(
            host.computed_style(children[0], "top").as_deref(),
            Some("-73px")
        );
        assert_eq!(
            host.computed_style(children[1], "bottom").as_deref(),
            Some("-24px")
        );
    }

    #[test]
    fn threshold_is_inclusive() {
        let (mut host, _, mut overlay) =
            setup(vec![BlockSpec::new("half", BlockPosition::TopRight, 50.0)]);
        let block = overlay.blocks().next().unwrap();

        overlay.update(&mut host, 49.0).unwrap();
        assert_eq!(host.computed_style(block, "opacity").as_deref(), Some("0"));
        overlay.update(&mut host, 50.0).unwrap();
        assert_eq!(host.computed_style(block, "opacity").as_deref(), Some("1"));
        overlay.update(&mut host, 100.0).unwrap();
        assert!(host.has_class(block, overlay.active_class()));
        overlay.update(&mut host, 0.0).unwrap();
        assert!(!host.has_class(block, overlay.active_class()));
    }

    #[test]
    fn title_flips_at_75() {
        let (mut host, _, mut overlay) = setup(Vec::new());
        let title = overlay.title();

        overlay.update(&mut host, 74.0).unwrap();
        assert_eq!(host.computed_style(title, "color").as_deref(), Some("green"));
        overlay.update(&mut host, 75.0).unwrap();
        assert_eq!(host.computed_style(title, "color").as_deref(), Some("white"));
    }

    #[test]
    fn failed_block_does_not_stall_the_frame() {
        let (mut host, _, mut overlay) = setup(vec![
            BlockSpec::new("gone", BlockPosition::TopLeft, 10.0),
            BlockSpec::new("kept", BlockPosition::TopRight, 20.0),
        ]);
        let blocks: Vec<ElementId> = overlay.blocks().collect();
        host.remove_element(blocks[0]).unwrap();

        assert!(overlay.update(&mut host, 80.0).is_err());
        assert!(host.has_class(blocks[1], overlay.active_class()));
        assert_eq!(
            host.computed_style(overlay.title(), "color").as_deref(),
            Some("white")
        );

        // the missing block is retried, everything else is already current
        assert!(overlay.update(&mut host, 80.0).is_err());
        assert!(overlay.update(&mut host, 0.0).is_ok());
        assert!(!host.has_class(blocks[1], overlay.active_class()));
    }
}
