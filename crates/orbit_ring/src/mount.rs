//! Forgiving entry point for page scripts

use orbit_platform::{ElementId, Host};

use crate::component::ProgressCanvas;
use crate::config::ProgressCanvasOptions;

/// What to mount into
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MountTarget<'a> {
    /// Simple selector (`#id`, `.class` or a tag name)
    Selector(&'a str),
    Element(ElementId),
}

impl<'a> From<&'a str> for MountTarget<'a> {
    fn from(selector: &'a str) -> Self {
        MountTarget::Selector(selector)
    }
}

impl From<ElementId> for MountTarget<'_> {
    fn from(element: ElementId) -> Self {
        MountTarget::Element(element)
    }
}

/// Mount a progress canvas, logging instead of failing.
///
/// Returns `None` when the target does not resolve to a live element or the
/// component cannot be built.
pub fn mount<'a>(
    host: &mut dyn Host,
    target: impl Into<MountTarget<'a>>,
    options: ProgressCanvasOptions,
) -> Option<ProgressCanvas> {
    let element = match target.into() {
        MountTarget::Selector(selector) => host.query_selector(selector),
        MountTarget::Element(element) => Some(element).filter(|&e| host.contains(e)),
    };

    let Some(element) = element else {
        tracing::warn!("Tried to mount progress canvas without valid element or selector");
        return None;
    };

    match ProgressCanvas::new(host, element, options) {
        Ok(component) => Some(component),
        Err(err) => {
            tracing::warn!(%err, "failed to mount progress canvas");
            None
        }
    }
}
