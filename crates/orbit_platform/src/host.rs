//! The host runtime surface

use std::sync::Arc;

use orbit_core::ListenerId;
use orbit_paint::{Canvas2d, Rect};
use slotmap::new_key_type;

use crate::error::Result;
use crate::frame::FrameId;
use crate::style::StyleSheet;

new_key_type! {
    /// A live element in the host document
    pub struct ElementId;

    /// A registered intersection observer
    pub struct ObserverId;
}

/// Element kinds a component creates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    Div,
    Paragraph,
    Canvas,
}

impl Tag {
    pub fn name(&self) -> &'static str {
        match self {
            Tag::Div => "div",
            Tag::Paragraph => "p",
            Tag::Canvas => "canvas",
        }
    }

    pub fn from_name(name: &str) -> Option<Tag> {
        match name.to_ascii_lowercase().as_str() {
            "div" => Some(Tag::Div),
            "p" => Some(Tag::Paragraph),
            "canvas" => Some(Tag::Canvas),
            _ => None,
        }
    }
}

/// A piece of inline content
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    LineBreak,
}

/// Inline content of a text element
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Content {
    runs: Vec<Inline>,
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            runs: vec![Inline::Text(text.into())],
        }
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        self.runs.push(Inline::Text(text.into()));
    }

    pub fn push_break(&mut self) {
        self.runs.push(Inline::LineBreak);
    }

    pub fn runs(&self) -> &[Inline] {
        &self.runs
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Rendered line count; raw newlines inside text runs do not break lines
    pub fn line_count(&self) -> usize {
        if self.runs.is_empty() {
            return 0;
        }
        1 + self
            .runs
            .iter()
            .filter(|run| matches!(run, Inline::LineBreak))
            .count()
    }

    /// Text with line breaks as `\n`
    pub fn plain_text(&self) -> String {
        self.runs
            .iter()
            .map(|run| match run {
                Inline::Text(text) => text.as_str(),
                Inline::LineBreak => "\n",
            })
            .collect()
    }
}

/// One intersection observation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionEntry {
    pub target: ElementId,
    pub is_intersecting: bool,
    /// Target rect relative to the viewport at observation time
    pub bounding_rect: Rect,
}

/// Intersection observer configuration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObserverOptions {
    /// Pixels added to every side of the viewport before testing
    pub root_margin: f32,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self { root_margin: 0.0 }
    }
}

/// Handler invoked for every scroll of the global scroll surface
pub type ScrollHandler = dyn Fn(&mut dyn Host) + Send + Sync;

/// Handler invoked with a batch of intersection entries
pub type IntersectionHandler = dyn Fn(&mut dyn Host, &[IntersectionEntry]) + Send + Sync;

/// Callback run once on the next animation frame
pub type FrameCallback = Box<dyn FnOnce(&mut dyn Host) + Send>;

/// Page services consumed by a component.
///
/// Every callback receives the host as its first argument so handlers can
/// read geometry and schedule work without holding a host reference.
///
/// Implementations never invoke a registered callback from inside a `Host`
/// method; callbacks only run from the host's own event dispatch.
pub trait Host {
    // === Document ===

    /// First element matching a simple selector (`#id`, `.class` or a tag)
    fn query_selector(&self, selector: &str) -> Option<ElementId>;

    fn contains(&self, element: ElementId) -> bool;

    fn create_element(&mut self, tag: Tag) -> ElementId;

    fn tag(&self, element: ElementId) -> Option<Tag>;

    fn append_child(&mut self, parent: ElementId, child: ElementId) -> Result<()>;

    /// Detach and drop an element and its subtree
    fn remove_element(&mut self, element: ElementId) -> Result<()>;

    /// First descendant (depth-first) with the given tag
    fn find_descendant(&self, root: ElementId, tag: Tag) -> Option<ElementId>;

    fn set_content(&mut self, element: ElementId, content: Content) -> Result<()>;

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) -> Result<()>;

    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    fn add_class(&mut self, element: ElementId, class: &str) -> Result<()>;

    fn remove_class(&mut self, element: ElementId, class: &str) -> Result<()>;

    fn has_class(&self, element: ElementId, class: &str) -> bool;

    /// Set (or with `None`, clear) an inline style property
    fn set_style_property(
        &mut self,
        element: ElementId,
        property: &str,
        value: Option<&str>,
    ) -> Result<()>;

    /// Border box relative to the viewport
    fn bounding_client_rect(&self, element: ElementId) -> Option<Rect>;

    /// Document-wide scoped stylesheet
    fn stylesheet(&mut self) -> &mut StyleSheet;

    /// 2D drawing context of a canvas element
    fn context_2d(&mut self, canvas: ElementId) -> Result<Box<dyn Canvas2d>>;

    // === Window ===

    /// Vertical scroll offset of the global scroll surface
    fn scroll_y(&self) -> f32;

    fn add_scroll_listener(&mut self, handler: Arc<ScrollHandler>) -> ListenerId;

    fn remove_scroll_listener(&mut self, id: ListenerId) -> bool;

    fn observe_intersection(
        &mut self,
        target: ElementId,
        options: ObserverOptions,
        handler: Arc<IntersectionHandler>,
    ) -> ObserverId;

    fn disconnect_observer(&mut self, id: ObserverId) -> bool;

    fn request_animation_frame(&mut self, callback: FrameCallback) -> FrameId;

    fn cancel_animation_frame(&mut self, id: FrameId) -> bool;
}
