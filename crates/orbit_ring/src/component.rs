//! The progress canvas component
//!
//! [`ProgressCanvas`] is a cloneable handle to state shared with the host
//! callbacks it registers. Callbacks hold a weak reference, so dropping every
//! handle without calling [`ProgressCanvas::dispose`] leaves only inert
//! callbacks behind.
//!
//! Host methods never call back synchronously, which is what allows the
//! state lock to be held across host calls.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use orbit_paint::Canvas2d;
use orbit_platform::{
    ElementId, FrameId, Host, IntersectionEntry, IntersectionHandler, ScrollHandler, Tag,
};

use crate::config::ProgressCanvasOptions;
use crate::error::{Result, RingError};
use crate::overlay::Overlay;
use crate::progress::{clamp_percentage, ProgressModel};
use crate::renderer::CircularRenderer;
use crate::styles;
use crate::visibility::{any_intersecting, VisibilityGate};

static NEXT_CANVAS_ID: AtomicU64 = AtomicU64::new(1);

struct State {
    container: ElementId,
    canvas: ElementId,
    owns_canvas: bool,
    context: Box<dyn Canvas2d>,
    renderer: CircularRenderer,
    model: ProgressModel,
    overlay: Overlay,
    gate: VisibilityGate,
    container_class: Option<String>,
    percentage: f32,
    pending_frames: Vec<(u64, FrameId)>,
    next_frame: u64,
    disposed: bool,
}

impl State {
    fn render(&mut self, pct: f32) {
        let renderer = self.renderer;
        renderer.render(self.context.as_mut(), pct);
    }
}

/// A circular progress indicator mounted in a host container
#[derive(Clone)]
pub struct ProgressCanvas {
    state: Arc<Mutex<State>>,
}

impl ProgressCanvas {
    /// Build the component inside `container`.
    ///
    /// An existing `<canvas>` below the container is adopted; otherwise one
    /// is created with the configured size. Fails fast when the canvas has
    /// no 2D context.
    pub fn new(
        host: &mut dyn Host,
        container: ElementId,
        options: ProgressCanvasOptions,
    ) -> Result<Self> {
        if !host.contains(container) {
            return Err(RingError::MountTargetMissing(format!("{container:?}")));
        }
        let palette = options.validate()?;

        let (canvas, owns_canvas) = match host.find_descendant(container, Tag::Canvas) {
            Some(canvas) => (canvas, false),
            None => (create_canvas(host, container, &options)?, true),
        };

        let context = match host.context_2d(canvas) {
            Ok(context) => context,
            Err(err) => {
                if owns_canvas {
                    host.remove_element(canvas)?;
                }
                return Err(RingError::MissingRenderContext(err));
            }
        };

        if let Some(name) = options.class_names.canvas.as_deref() {
            host.add_class(canvas, name)?;
        }
        if let Some(rule) = styles::canvas(&options)? {
            styles::apply(host, canvas, rule, None)?;
        }

        let renderer = CircularRenderer {
            radius: options.radius,
            border_width: options.border_width,
            track_color: palette.track,
            fill_color: palette.fill,
            border_color: palette.border,
        };

        let mut state = State {
            container,
            canvas,
            owns_canvas,
            context,
            renderer,
            model: ProgressModel::new(
                options.start_animating_fraction,
                options.end_animating_fraction,
            ),
            overlay: Overlay::setup(host, container, &options)?,
            gate: VisibilityGate::new(),
            container_class: None,
            percentage: 0.0,
            pending_frames: Vec::new(),
            next_frame: 0,
            disposed: false,
        };
        state.render(0.0);

        let component = Self {
            state: Arc::new(Mutex::new(state)),
        };
        component.observe(host, container);

        let class = styles::apply(
            host,
            container,
            styles::container(&options)?,
            options.class_names.container.as_deref(),
        )?;
        component.lock().container_class = Some(class);

        tracing::debug!(?container, ?canvas, owns_canvas, "progress canvas created");
        Ok(component)
    }

    fn observe(&self, host: &mut dyn Host, container: ElementId) {
        let weak = Arc::downgrade(&self.state);
        let on_scroll: Arc<ScrollHandler> = Arc::new(move |host: &mut dyn Host| {
            if let Some(state) = weak.upgrade() {
                ProgressCanvas { state }.on_scroll(host);
            }
        });

        let weak = Arc::downgrade(&self.state);
        let on_intersect: Arc<IntersectionHandler> =
            Arc::new(move |host: &mut dyn Host, entries: &[IntersectionEntry]| {
                if let Some(state) = weak.upgrade() {
                    let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
                    if !state.disposed {
                        state.gate.update(host, any_intersecting(entries));
                    }
                }
            });

        self.lock()
            .gate
            .observe(host, container, on_intersect, on_scroll);
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Scroll handler: sample the progress now and draw it on the next frame
    pub fn on_scroll(&self, host: &mut dyn Host) {
        let mut state = self.lock();
        if state.disposed {
            return;
        }
        let Some(rect) = host.bounding_client_rect(state.container) else {
            tracing::warn!("progress canvas container is gone");
            return;
        };

        let scroll_y = host.scroll_y();
        let pct = state.model.progress(scroll_y, rect.top());
        state.percentage = pct;
        tracing::trace!(scroll_y, pct, "scroll progress");

        let seq = state.next_frame;
        state.next_frame += 1;
        let weak = Arc::downgrade(&self.state);
        let id = host.request_animation_frame(Box::new(move |host: &mut dyn Host| {
            if let Some(state) = weak.upgrade() {
                ProgressCanvas { state }.apply_frame(host, seq, pct);
            }
        }));
        state.pending_frames.push((seq, id));
    }

    fn apply_frame(&self, host: &mut dyn Host, seq: u64, pct: f32) {
        let mut state = self.lock();
        state.pending_frames.retain(|&(s, _)| s != seq);
        if state.disposed {
            return;
        }
        state.render(pct);
        if let Err(err) = state.overlay.update(host, pct) {
            tracing::warn!(%err, "failed to update progress overlay");
        }
    }

    /// Redraw the ring immediately
    pub fn render_progress(&self, pct: f32) {
        let mut state = self.lock();
        if !state.disposed {
            state.render(clamp_percentage(pct));
        }
    }

    /// Last computed percentage
    pub fn percentage(&self) -> f32 {
        self.lock().percentage
    }

    /// Whether the scroll listener is attached
    pub fn is_listening(&self) -> bool {
        self.lock().gate.is_listening()
    }

    pub fn is_disposed(&self) -> bool {
        self.lock().disposed
    }

    pub fn container(&self) -> ElementId {
        self.lock().container
    }

    pub fn canvas(&self) -> ElementId {
        self.lock().canvas
    }

    pub fn title(&self) -> ElementId {
        self.lock().overlay.title()
    }

    pub fn blocks(&self) -> Vec<ElementId> {
        self.lock().overlay.blocks().collect()
    }

    /// Detach from the host and remove every element this instance created.
    /// Calling it again does nothing.
    pub fn dispose(&self, host: &mut dyn Host) {
        let mut state = self.lock();
        if state.disposed {
            return;
        }
        state.disposed = true;

        state.gate.teardown(host);
        for (_, id) in state.pending_frames.drain(..) {
            host.cancel_animation_frame(id);
        }
        state.overlay.remove(host);

        if state.owns_canvas && host.contains(state.canvas) {
            if let Err(err) = host.remove_element(state.canvas) {
                tracing::warn!(%err, "failed to remove progress canvas");
            }
        }
        if let Some(class) = state.container_class.take() {
            if host.contains(state.container) {
                if let Err(err) = host.remove_class(state.container, &class) {
                    tracing::warn!(%err, "failed to unstyle container");
                }
            }
        }

        tracing::debug!(container = ?state.container, "progress canvas disposed");
    }
}

impl fmt::Debug for ProgressCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("ProgressCanvas")
            .field("container", &state.container)
            .field("canvas", &state.canvas)
            .field("percentage", &state.percentage)
            .field("disposed", &state.disposed)
            .finish()
    }
}

fn create_canvas(
    host: &mut dyn Host,
    container: ElementId,
    options: &ProgressCanvasOptions,
) -> Result<ElementId> {
    let canvas = host.create_element(Tag::Canvas);
    host.set_attribute(canvas, "width", &options.width.to_string())?;
    host.set_attribute(canvas, "height", &options.height.to_string())?;
    let n = NEXT_CANVAS_ID.fetch_add(1, Ordering::Relaxed);
    host.set_attribute(canvas, "id", &format!("ProgressCanvas-{n}"))?;
    host.append_child(container, canvas)?;
    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbit_paint::Rect;
    use orbit_platform::HeadlessHost;

    fn host_with_container(top: f32) -> (HeadlessHost, ElementId) {
        let mut host = HeadlessHost::new(800.0, 600.0);
        let body = host.body();
        let container = host
            .insert_element(body, Tag::Div, Rect::new(0.0, top, 400.0, 400.0))
            .unwrap();
        (host, container)
    }

    #[test]
    fn creates_a_sized_canvas() {
        let (mut host, container) = host_with_container(1000.0);
        let ring = ProgressCanvas::new(&mut host, container, Default::default()).unwrap();

        let canvas = ring.canvas();
        assert_eq!(host.tag(canvas), Some(Tag::Canvas));
        assert_eq!(host.attribute(canvas, "width").as_deref(), Some("200"));
        assert!(host
            .attribute(canvas, "id")
            .is_some_and(|id| id.starts_with("ProgressCanvas-")));
        // initial render at 0
        assert_eq!(host.last_paint(canvas).len(), 4);
    }

    #[test]
    fn missing_container_is_an_error() {
        let (mut host, container) = host_with_container(0.0);
        host.remove_element(container).unwrap();
        assert!(matches!(
            ProgressCanvas::new(&mut host, container, Default::default()),
            Err(RingError::MountTargetMissing(_))
        ));
    }

    #[test]
    fn scroll_schedules_a_frame_with_sampled_progress() {
        let (mut host, container) = host_with_container(1000.0);
        let ring = ProgressCanvas::new(&mut host, container, Default::default()).unwrap();

        host.scroll_to(1000.0);
        ring.on_scroll(&mut host);
        assert_eq!(ring.percentage(), 100.0);
        assert_eq!(host.pending_frames(), 1);

        host.run_frame();
        let (_, _, _, end) = host
            .last_paint(ring.canvas())
            .iter()
            .rev()
            .find_map(|cmd| match cmd {
                orbit_paint::PaintCommand::FillPath { path, .. } => path.arc(),
                _ => None,
            })
            .unwrap();
        assert_eq!(end, crate::renderer::progress_end_angle(100.0));
    }

    #[test]
    fn dispose_cancels_pending_frames() {
        let (mut host, container) = host_with_container(1000.0);
        let ring = ProgressCanvas::new(&mut host, container, Default::default()).unwrap();

        host.scroll_to(500.0);
        ring.on_scroll(&mut host);
        ring.dispose(&mut host);

        assert_eq!(host.pending_frames(), 0);
        assert!(!host.contains(ring.canvas()));
        assert!(ring.is_disposed());
    }
}
