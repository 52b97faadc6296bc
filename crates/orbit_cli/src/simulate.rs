//! Replay a scene against a headless host

use anyhow::{bail, Context, Result};
use orbit_paint::Rect;
use orbit_platform::{HeadlessHost, Host, Tag};
use orbit_ring::renderer::progress_end_angle;
use orbit_ring::{mount, MountTarget, ProgressCanvas};
use serde::Serialize;

use crate::config::Scene;

/// State observed after one scroll offset settled
#[derive(Debug, Serialize)]
pub struct Step {
    pub scroll_y: f32,
    pub percentage: f32,
    pub listening: bool,
    pub end_angle: f32,
    pub active_blocks: Vec<usize>,
    pub title_color: Option<String>,
}

pub fn run(scene: &Scene) -> Result<Vec<Step>> {
    let mut host = HeadlessHost::new(scene.viewport.width, scene.viewport.height)
        .with_line_height(scene.viewport.line_height);

    let body = host.body();
    let container = host
        .insert_element(
            body,
            Tag::Div,
            Rect::new(0.0, scene.container.top, scene.viewport.width, scene.container.height),
        )
        .context("Failed to create container")?;

    let selector = scene.container.selector.trim();
    if let Some(id) = selector.strip_prefix('#') {
        host.set_attribute(container, "id", id)?;
    } else if let Some(class) = selector.strip_prefix('.') {
        host.add_class(container, class)?;
    } else {
        bail!("Container selector must be `#id` or `.class`, got {selector:?}");
    }

    let Some(ring) = mount(
        &mut host,
        MountTarget::Selector(selector),
        scene.options.clone(),
    ) else {
        bail!("Progress canvas could not be mounted (run with -v for details)");
    };

    host.settle();
    tracing::info!(
        listening = ring.is_listening(),
        steps = scene.scroll.len(),
        "scene mounted"
    );

    let steps: Vec<Step> = scene
        .scroll
        .iter()
        .map(|&y| {
            host.scroll_and_settle(y);
            observe(&host, &ring)
        })
        .collect();

    ring.dispose(&mut host);
    Ok(steps)
}

fn observe(host: &HeadlessHost, ring: &ProgressCanvas) -> Step {
    let percentage = ring.percentage();
    let active_blocks = ring
        .blocks()
        .into_iter()
        .enumerate()
        .filter(|&(_, block)| host.computed_style(block, "opacity").as_deref() == Some("1"))
        .map(|(index, _)| index + 1)
        .collect();

    Step {
        scroll_y: host.scroll_y(),
        percentage,
        listening: ring.is_listening(),
        end_angle: progress_end_angle(percentage),
        active_blocks,
        title_color: host.computed_style(ring.title(), "color"),
    }
}

/// One line per step
pub fn format_table(steps: &[Step]) -> String {
    let mut out = format!(
        "{:>10}  {:>8}  {:>9}  {:>9}  {}\n",
        "scroll_y", "progress", "listening", "angle", "blocks"
    );
    for step in steps {
        let blocks = step
            .active_blocks
            .iter()
            .map(|b| b.to_string())
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&format!(
            "{:>10.1}  {:>7.1}%  {:>9}  {:>9.4}  {}\n",
            step.scroll_y,
            step.percentage,
            step.listening,
            step.end_angle,
            if blocks.is_empty() { "-" } else { blocks.as_str() }
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replays_scroll_offsets() {
        let scene = Scene::from_toml(
            r#"
            scroll = [390, 1000, 0]

            [options]
            title = "Ring"

            [[options.blocks]]
            message = "half"
            position = "bottom-center"
            animateWhenProgress = 50
            "#,
        )
        .unwrap();

        let steps = run(&scene).unwrap();
        assert_eq!(steps.len(), 3);

        // the listener attaches only after the first scroll settles
        assert_eq!(steps[0].percentage, 0.0);
        assert!(steps[0].listening);

        assert_eq!(steps[1].percentage, 100.0);
        assert_eq!(steps[1].active_blocks, vec![1]);
        assert_eq!(steps[1].title_color.as_deref(), Some("white"));

        assert_eq!(steps[2].percentage, 0.0);
        assert!(!steps[2].listening);
        assert!(steps[2].active_blocks.is_empty());
    }

    #[test]
    fn rejects_tag_selectors() {
        let mut scene = Scene::default();
        scene.container.selector = "div".into();
        assert!(run(&scene).is_err());
    }

    #[test]
    fn table_has_a_row_per_step() {
        let scene = Scene {
            scroll: vec![0.0, 500.0],
            ..Default::default()
        };
        let table = format_table(&run(&scene).unwrap());
        assert_eq!(table.lines().count(), 3);
    }
}
