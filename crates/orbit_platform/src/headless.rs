//! Deterministic in-memory host.
//!
//! `HeadlessHost` keeps an element tree, a scoped stylesheet, a scroll
//! offset and a viewport. Nothing happens on its own: callers drive it with
//! [`HeadlessHost::scroll_to`] (dispatches scroll listeners) and
//! [`HeadlessHost::run_frame`] (runs queued animation frames, then delivers
//! intersection changes, the order a browser rendering step uses).
//!
//! Layout is intentionally simple. An element with an explicit box
//! ([`HeadlessHost::set_layout`]) uses it; a canvas is sized by its
//! `width`/`height` attributes; any other element sits at its parent's
//! origin, spans its parent's width and is `line_count * line_height` tall.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use orbit_core::{ListenerId, Listeners};
use orbit_paint::{Canvas2d, Color, LineCap, PaintCommand, PaintContext, Path, Rect};
use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::error::{PlatformError, Result};
use crate::frame::{FrameId, FrameScheduler};
use crate::host::{
    Content, ElementId, FrameCallback, Host, IntersectionEntry, IntersectionHandler, ObserverId,
    ObserverOptions, ScrollHandler, Tag,
};
use crate::style::{Declaration, StyleSheet};

const DEFAULT_CANVAS_WIDTH: f32 = 300.0;
const DEFAULT_CANVAS_HEIGHT: f32 = 150.0;

struct Node {
    tag: Tag,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    classes: Vec<String>,
    attributes: FxHashMap<String, String>,
    inline_style: Vec<Declaration>,
    content: Content,
    layout: Option<Rect>,
    canvas: Option<Arc<Mutex<PaintContext>>>,
}

impl Node {
    fn new(tag: Tag) -> Self {
        Self {
            tag,
            parent: None,
            children: Vec::new(),
            classes: Vec::new(),
            attributes: FxHashMap::default(),
            inline_style: Vec::new(),
            content: Content::default(),
            layout: None,
            canvas: None,
        }
    }

    fn matches(&self, selector: &str) -> bool {
        if let Some(id) = selector.strip_prefix('#') {
            self.attributes.get("id").is_some_and(|v| v == id)
        } else if let Some(class) = selector.strip_prefix('.') {
            self.classes.iter().any(|c| c == class)
        } else {
            Tag::from_name(selector) == Some(self.tag)
        }
    }
}

struct Observer {
    target: ElementId,
    options: ObserverOptions,
    handler: Arc<IntersectionHandler>,
    last: Option<bool>,
}

/// A canvas context that draws into a [`PaintContext`] shared with the host
struct SharedCanvas(Arc<Mutex<PaintContext>>);

impl SharedCanvas {
    fn lock(&self) -> MutexGuard<'_, PaintContext> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Canvas2d for SharedCanvas {
    fn width(&self) -> f32 {
        self.lock().width()
    }

    fn height(&self) -> f32 {
        self.lock().height()
    }

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.lock().clear_rect(x, y, width, height);
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.lock().set_line_cap(cap);
    }

    fn fill_path(&mut self, path: &Path, color: Color) {
        self.lock().fill_path(path, color);
    }
}

/// In-memory [`Host`] implementation
pub struct HeadlessHost {
    nodes: SlotMap<ElementId, Node>,
    body: ElementId,
    stylesheet: StyleSheet,
    viewport_width: f32,
    viewport_height: f32,
    scroll_y: f32,
    line_height: f32,
    canvas_support: bool,
    scroll_listeners: Listeners<ScrollHandler>,
    observers: SlotMap<ObserverId, Observer>,
    frames: FrameScheduler<FrameCallback>,
}

impl HeadlessHost {
    /// A host with an empty document and a `width x height` viewport
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        let mut nodes = SlotMap::with_key();
        let body = nodes.insert(Node::new(Tag::Div));
        Self {
            nodes,
            body,
            stylesheet: StyleSheet::new(),
            viewport_width,
            viewport_height,
            scroll_y: 0.0,
            line_height: 24.0,
            canvas_support: true,
            scroll_listeners: Listeners::new(),
            observers: SlotMap::with_key(),
            frames: FrameScheduler::new(),
        }
    }

    /// Height of one rendered text line
    pub fn with_line_height(mut self, line_height: f32) -> Self {
        self.line_height = line_height;
        self
    }

    /// When disabled, `context_2d` fails like a host without canvas support
    pub fn with_canvas_support(mut self, enabled: bool) -> Self {
        self.canvas_support = enabled;
        self
    }

    /// The document root
    pub fn body(&self) -> ElementId {
        self.body
    }

    /// Create an element under `parent` with a fixed document-space box
    pub fn insert_element(&mut self, parent: ElementId, tag: Tag, rect: Rect) -> Result<ElementId> {
        let element = self.create_element(tag);
        self.append_child(parent, element)?;
        self.set_layout(element, rect)?;
        Ok(element)
    }

    /// Pin an element's document-space box
    pub fn set_layout(&mut self, element: ElementId, rect: Rect) -> Result<()> {
        self.node_mut(element)?.layout = Some(rect);
        Ok(())
    }

    pub fn viewport(&self) -> Rect {
        Rect::new(0.0, 0.0, self.viewport_width, self.viewport_height)
    }

    /// Scroll the global surface and dispatch scroll listeners
    pub fn scroll_to(&mut self, y: f32) {
        self.scroll_y = y.max(0.0);
        tracing::trace!(scroll_y = self.scroll_y, "headless scroll");

        for (id, handler) in self.scroll_listeners.snapshot() {
            if self.scroll_listeners.contains(id) {
                handler(&mut *self);
            }
        }
    }

    /// Run the callbacks queued for this frame, then deliver intersection
    /// changes. Returns the number of frame callbacks run.
    pub fn run_frame(&mut self) -> usize {
        let due = self.frames.begin_frame();
        let ran = due.len();
        for callback in due {
            callback(&mut *self);
        }
        self.update_observations();
        ran
    }

    /// Run frames until no callbacks are queued (bounded)
    pub fn settle(&mut self) {
        for _ in 0..32 {
            self.run_frame();
            if self.frames.pending_count() == 0 {
                break;
            }
        }
    }

    /// `scroll_to` followed by `settle`
    pub fn scroll_and_settle(&mut self, y: f32) {
        self.scroll_to(y);
        self.settle();
    }

    /// Deliver an intersection entry for `target` to every observer of it,
    /// even when the state did not change.
    pub fn deliver_intersection(&mut self, target: ElementId, is_intersecting: bool) {
        let rect = self.bounding_client_rect(target).unwrap_or_default();
        let handlers: Vec<(ObserverId, Arc<IntersectionHandler>)> = self
            .observers
            .iter()
            .filter(|(_, o)| o.target == target)
            .map(|(id, o)| (id, Arc::clone(&o.handler)))
            .collect();

        for (id, handler) in handlers {
            let Some(observer) = self.observers.get_mut(id) else {
                continue;
            };
            observer.last = Some(is_intersecting);
            let entry = IntersectionEntry {
                target,
                is_intersecting,
                bounding_rect: rect,
            };
            handler(&mut *self, &[entry]);
        }
    }

    pub fn scroll_listener_count(&self) -> usize {
        self.scroll_listeners.len()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.pending_count()
    }

    pub fn frame_index(&self) -> u64 {
        self.frames.frame_index()
    }

    pub fn children(&self, element: ElementId) -> Vec<ElementId> {
        self.nodes
            .get(element)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    pub fn classes(&self, element: ElementId) -> Vec<String> {
        self.nodes
            .get(element)
            .map(|n| n.classes.clone())
            .unwrap_or_default()
    }

    pub fn content(&self, element: ElementId) -> Option<&Content> {
        self.nodes.get(element).map(|n| &n.content)
    }

    /// Resolve a property from the element's class rules (stylesheet order)
    /// and then its inline style.
    pub fn computed_style(&self, element: ElementId, property: &str) -> Option<String> {
        let node = self.nodes.get(element)?;
        let mut value = None;

        for (class, rule) in self.stylesheet.iter() {
            if node.classes.iter().any(|c| c == class) {
                if let Some(v) = rule.value(property) {
                    value = Some(v.to_string());
                }
            }
        }

        node.inline_style
            .iter()
            .rev()
            .find(|d| d.property == property)
            .map(|d| d.value.clone())
            .or(value)
    }

    /// Every command drawn on a canvas so far
    pub fn paint_commands(&self, canvas: ElementId) -> Vec<PaintCommand> {
        self.with_canvas(canvas, |ctx| ctx.commands().to_vec())
            .unwrap_or_default()
    }

    /// Commands of the most recent full redraw of a canvas
    pub fn last_paint(&self, canvas: ElementId) -> Vec<PaintCommand> {
        self.with_canvas(canvas, |ctx| ctx.last_frame().to_vec())
            .unwrap_or_default()
    }

    fn with_canvas<R>(&self, canvas: ElementId, f: impl FnOnce(&PaintContext) -> R) -> Option<R> {
        let shared = self.nodes.get(canvas)?.canvas.as_ref()?;
        let ctx = shared.lock().unwrap_or_else(PoisonError::into_inner);
        Some(f(&ctx))
    }

    fn node(&self, element: ElementId) -> Result<&Node> {
        self.nodes
            .get(element)
            .ok_or_else(|| PlatformError::ElementNotFound(format!("{element:?}")))
    }

    fn node_mut(&mut self, element: ElementId) -> Result<&mut Node> {
        self.nodes
            .get_mut(element)
            .ok_or_else(|| PlatformError::ElementNotFound(format!("{element:?}")))
    }

    fn numeric_attribute(&self, element: ElementId, name: &str) -> Option<f32> {
        self.attribute(element, name)?.trim().parse().ok()
    }

    fn document_rect(&self, element: ElementId) -> Option<Rect> {
        let node = self.nodes.get(element)?;
        if let Some(rect) = node.layout {
            return Some(rect);
        }

        let parent = node
            .parent
            .and_then(|p| self.document_rect(p))
            .unwrap_or_default();

        let (width, height) = match node.tag {
            Tag::Canvas => (
                self.numeric_attribute(element, "width")
                    .unwrap_or(DEFAULT_CANVAS_WIDTH),
                self.numeric_attribute(element, "height")
                    .unwrap_or(DEFAULT_CANVAS_HEIGHT),
            ),
            _ => (
                parent.width,
                node.content.line_count() as f32 * self.line_height,
            ),
        };

        Some(Rect::new(parent.x, parent.y, width, height))
    }

    fn update_observations(&mut self) {
        let viewport = self.viewport();
        let ids: Vec<ObserverId> = self.observers.keys().collect();

        for id in ids {
            let Some(observer) = self.observers.get(id) else {
                continue;
            };
            let target = observer.target;
            let margin = observer.options.root_margin;
            let last = observer.last;
            let handler = Arc::clone(&observer.handler);

            let rect = self.bounding_client_rect(target);
            let is_intersecting = rect
                .map(|r| viewport.inflate(margin).intersects(&r))
                .unwrap_or(false);
            if last == Some(is_intersecting) {
                continue;
            }

            if let Some(observer) = self.observers.get_mut(id) {
                observer.last = Some(is_intersecting);
            }
            let entry = IntersectionEntry {
                target,
                is_intersecting,
                bounding_rect: rect.unwrap_or_default(),
            };
            handler(&mut *self, &[entry]);
        }
    }

    fn collect_subtree(&self, element: ElementId, out: &mut Vec<ElementId>) {
        out.push(element);
        if let Some(node) = self.nodes.get(element) {
            for &child in &node.children {
                self.collect_subtree(child, out);
            }
        }
    }

    fn find_first(&self, root: ElementId, pred: &dyn Fn(&Node) -> bool) -> Option<ElementId> {
        let node = self.nodes.get(root)?;
        for &child in &node.children {
            if self.nodes.get(child).is_some_and(pred) {
                return Some(child);
            }
            if let Some(found) = self.find_first(child, pred) {
                return Some(found);
            }
        }
        None
    }
}

impl Host for HeadlessHost {
    fn query_selector(&self, selector: &str) -> Option<ElementId> {
        let selector = selector.trim();
        if selector.is_empty() {
            return None;
        }
        self.find_first(self.body, &|node: &Node| node.matches(selector))
    }

    fn contains(&self, element: ElementId) -> bool {
        self.nodes.contains_key(element)
    }

    fn create_element(&mut self, tag: Tag) -> ElementId {
        self.nodes.insert(Node::new(tag))
    }

    fn tag(&self, element: ElementId) -> Option<Tag> {
        self.nodes.get(element).map(|n| n.tag)
    }

    fn append_child(&mut self, parent: ElementId, child: ElementId) -> Result<()> {
        self.node(parent)?;
        let previous = self.node_mut(child)?.parent.replace(parent);
        if let Some(previous) = previous.and_then(|p| self.nodes.get_mut(p)) {
            previous.children.retain(|&c| c != child);
        }
        self.node_mut(parent)?.children.push(child);
        Ok(())
    }

    fn remove_element(&mut self, element: ElementId) -> Result<()> {
        let parent = self.node(element)?.parent;
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(p)) {
            parent.children.retain(|&c| c != element);
        }

        let mut subtree = Vec::new();
        self.collect_subtree(element, &mut subtree);
        for id in subtree {
            self.nodes.remove(id);
        }
        Ok(())
    }

    fn find_descendant(&self, root: ElementId, tag: Tag) -> Option<ElementId> {
        self.find_first(root, &|node: &Node| node.tag == tag)
    }

    fn set_content(&mut self, element: ElementId, content: Content) -> Result<()> {
        self.node_mut(element)?.content = content;
        Ok(())
    }

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) -> Result<()> {
        self.node_mut(element)?
            .attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.nodes.get(element)?.attributes.get(name).cloned()
    }

    fn add_class(&mut self, element: ElementId, class: &str) -> Result<()> {
        let node = self.node_mut(element)?;
        for class in class.split_whitespace() {
            if !node.classes.iter().any(|c| c == class) {
                node.classes.push(class.to_string());
            }
        }
        Ok(())
    }

    fn remove_class(&mut self, element: ElementId, class: &str) -> Result<()> {
        self.node_mut(element)?.classes.retain(|c| c != class);
        Ok(())
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.nodes
            .get(element)
            .is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    fn set_style_property(
        &mut self,
        element: ElementId,
        property: &str,
        value: Option<&str>,
    ) -> Result<()> {
        let node = self.node_mut(element)?;
        node.inline_style.retain(|d| d.property != property);
        if let Some(value) = value {
            node.inline_style.push(Declaration::new(property, value));
        }
        Ok(())
    }

    fn bounding_client_rect(&self, element: ElementId) -> Option<Rect> {
        let rect = self.document_rect(element)?;
        Some(Rect::new(
            rect.x,
            rect.y - self.scroll_y,
            rect.width,
            rect.height,
        ))
    }

    fn stylesheet(&mut self) -> &mut StyleSheet {
        &mut self.stylesheet
    }

    fn context_2d(&mut self, canvas: ElementId) -> Result<Box<dyn Canvas2d>> {
        let node = self.node(canvas)?;
        if node.tag != Tag::Canvas {
            return Err(PlatformError::NotACanvas(node.tag.name().to_string()));
        }
        if !self.canvas_support {
            return Err(PlatformError::ContextUnavailable("2d".to_string()));
        }

        let width = self
            .numeric_attribute(canvas, "width")
            .unwrap_or(DEFAULT_CANVAS_WIDTH);
        let height = self
            .numeric_attribute(canvas, "height")
            .unwrap_or(DEFAULT_CANVAS_HEIGHT);

        let node = self.node_mut(canvas)?;
        let shared = node
            .canvas
            .get_or_insert_with(|| Arc::new(Mutex::new(PaintContext::new(width, height))));
        Ok(Box::new(SharedCanvas(Arc::clone(shared))))
    }

    fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    fn add_scroll_listener(&mut self, handler: Arc<ScrollHandler>) -> ListenerId {
        self.scroll_listeners.add(handler)
    }

    fn remove_scroll_listener(&mut self, id: ListenerId) -> bool {
        self.scroll_listeners.remove(id)
    }

    fn observe_intersection(
        &mut self,
        target: ElementId,
        options: ObserverOptions,
        handler: Arc<IntersectionHandler>,
    ) -> ObserverId {
        self.observers.insert(Observer {
            target,
            options,
            handler,
            last: None,
        })
    }

    fn disconnect_observer(&mut self, id: ObserverId) -> bool {
        self.observers.remove(id).is_some()
    }

    fn request_animation_frame(&mut self, callback: FrameCallback) -> FrameId {
        self.frames.request(callback)
    }

    fn cancel_animation_frame(&mut self, id: FrameId) -> bool {
        self.frames.cancel(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn query_selector_matches_id_class_and_tag() {
        let mut host = HeadlessHost::new(800.0, 600.0);
        let body = host.body();
        let section = host
            .insert_element(body, Tag::Div, Rect::new(0.0, 100.0, 400.0, 300.0))
            .unwrap();
        host.add_class(section, "js-progress-canvas hero").unwrap();
        let canvas = host.create_element(Tag::Canvas);
        host.append_child(section, canvas).unwrap();
        host.set_attribute(canvas, "id", "ring").unwrap();

        assert_eq!(host.query_selector(".hero"), Some(section));
        assert_eq!(host.query_selector("#ring"), Some(canvas));
        assert_eq!(host.query_selector("canvas"), Some(canvas));
        assert_eq!(host.query_selector(".does-not-exist"), None);
        assert_eq!(host.find_descendant(section, Tag::Canvas), Some(canvas));
    }

    #[test]
    fn client_rect_follows_scroll_and_text_lines() {
        let mut host = HeadlessHost::new(800.0, 600.0);
        let body = host.body();
        let section = host
            .insert_element(body, Tag::Div, Rect::new(0.0, 1000.0, 400.0, 300.0))
            .unwrap();
        let p = host.create_element(Tag::Paragraph);
        host.append_child(section, p).unwrap();
        let mut content = Content::text("one");
        content.push_break();
        content.push_text("two");
        host.set_content(p, content).unwrap();

        host.scroll_to(250.0);
        assert_eq!(host.bounding_client_rect(section).unwrap().top(), 750.0);
        assert_eq!(host.bounding_client_rect(p).unwrap().height, 48.0);
    }

    #[test]
    fn observers_report_only_changes_after_frames() {
        let mut host = HeadlessHost::new(800.0, 600.0);
        let body = host.body();
        let section = host
            .insert_element(body, Tag::Div, Rect::new(0.0, 1000.0, 400.0, 300.0))
            .unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        host.observe_intersection(
            section,
            ObserverOptions { root_margin: 20.0 },
            Arc::new(move |_: &mut dyn Host, entries: &[IntersectionEntry]| {
                assert_eq!(entries.len(), 1);
                seen.fetch_add(1, Ordering::SeqCst);
            }),
        );

        host.run_frame();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        host.run_frame();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // 1000 - 390 = 610 is within the 20px margin below a 600px viewport
        host.scroll_to(390.0);
        host.run_frame();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn scroll_listener_can_schedule_frames() {
        let mut host = HeadlessHost::new(800.0, 600.0);
        let frames = Arc::new(AtomicUsize::new(0));
        let counter = frames.clone();
        host.add_scroll_listener(Arc::new(move |host: &mut dyn Host| {
            let counter = counter.clone();
            host.request_animation_frame(Box::new(move |_: &mut dyn Host| {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
        }));

        host.scroll_to(10.0);
        host.scroll_to(20.0);
        assert_eq!(host.pending_frames(), 2);
        assert_eq!(host.run_frame(), 2);
        assert_eq!(frames.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn computed_style_prefers_inline_then_later_rules() {
        let mut host = HeadlessHost::new(800.0, 600.0);
        let p = host.create_element(Tag::Paragraph);
        let base = host
            .stylesheet()
            .insert(crate::StyleRule::new().set("opacity", "0"));
        let active = host
            .stylesheet()
            .insert(crate::StyleRule::new().set("opacity", "1"));

        host.add_class(p, &active).unwrap();
        host.add_class(p, &base).unwrap();
        assert_eq!(host.computed_style(p, "opacity").as_deref(), Some("1"));

        host.set_style_property(p, "opacity", Some("0.5")).unwrap();
        assert_eq!(host.computed_style(p, "opacity").as_deref(), Some("0.5"));
        host.set_style_property(p, "opacity", None).unwrap();
        assert_eq!(host.computed_style(p, "opacity").as_deref(), Some("1"));
    }

    #[test]
    fn context_requires_canvas_support() {
        let mut host = HeadlessHost::new(800.0, 600.0).with_canvas_support(false);
        let canvas = host.create_element(Tag::Canvas);
        let div = host.create_element(Tag::Div);

        assert!(matches!(
            host.context_2d(div),
            Err(PlatformError::NotACanvas(_))
        ));
        assert!(matches!(
            host.context_2d(canvas),
            Err(PlatformError::ContextUnavailable(_))
        ));
    }

    #[test]
    fn remove_element_drops_subtree() {
        let mut host = HeadlessHost::new(800.0, 600.0);
        let body = host.body();
        let outer = host.create_element(Tag::Div);
        let inner = host.create_element(Tag::Paragraph);
        host.append_child(body, outer).unwrap();
        host.append_child(outer, inner).unwrap();

        host.remove_element(outer).unwrap();
        assert!(!host.contains(outer));
        assert!(!host.contains(inner));
        assert!(host.children(body).is_empty());
    }
}
