//! Visibility gate
//!
//! Keeps the scroll listener attached only while the container is near the
//! viewport. The gate is a two-state machine so a repeated intersection
//! report never attaches or detaches twice.

use std::sync::Arc;

use orbit_core::{EventId, ListenerId, StateId, StateMachine};
use orbit_platform::{
    ElementId, Host, IntersectionEntry, IntersectionHandler, ObserverId, ObserverOptions,
    ScrollHandler,
};

/// Margin added around the viewport before testing intersection
pub const ROOT_MARGIN: f32 = 20.0;

const HIDDEN: StateId = 0;
const VISIBLE: StateId = 1;

const ENTER: EventId = 1;
const LEAVE: EventId = 2;

/// True when any entry of a batch intersects
pub fn any_intersecting(entries: &[IntersectionEntry]) -> bool {
    entries.iter().any(|entry| entry.is_intersecting)
}

pub struct VisibilityGate {
    machine: StateMachine,
    on_scroll: Option<Arc<ScrollHandler>>,
    listener: Option<ListenerId>,
    observer: Option<ObserverId>,
}

impl VisibilityGate {
    pub fn new() -> Self {
        Self {
            machine: StateMachine::builder(HIDDEN)
                .on(HIDDEN, ENTER, VISIBLE)
                .on(VISIBLE, LEAVE, HIDDEN)
                .build(),
            on_scroll: None,
            listener: None,
            observer: None,
        }
    }

    /// Start observing `target`. `on_intersect` is expected to forward the
    /// batch to [`VisibilityGate::update`]; `on_scroll` is what gets attached
    /// while the target is visible.
    pub fn observe(
        &mut self,
        host: &mut dyn Host,
        target: ElementId,
        on_intersect: Arc<IntersectionHandler>,
        on_scroll: Arc<ScrollHandler>,
    ) {
        if let Some(previous) = self.observer.take() {
            host.disconnect_observer(previous);
        }
        self.on_scroll = Some(on_scroll);
        self.observer = Some(host.observe_intersection(
            target,
            ObserverOptions {
                root_margin: ROOT_MARGIN,
            },
            on_intersect,
        ));
        tracing::debug!(?target, "intersection observer created");
    }

    /// Apply an intersection report. Returns true when the listener was
    /// attached or detached.
    pub fn update(&mut self, host: &mut dyn Host, visible: bool) -> bool {
        let event = if visible { ENTER } else { LEAVE };
        if self.machine.send(event).is_none() {
            return false;
        }

        if visible {
            if let Some(handler) = &self.on_scroll {
                self.listener = Some(host.add_scroll_listener(Arc::clone(handler)));
                tracing::debug!("scroll listener attached");
            }
        } else if let Some(id) = self.listener.take() {
            host.remove_scroll_listener(id);
            tracing::debug!("scroll listener detached");
        }
        true
    }

    pub fn is_visible(&self) -> bool {
        self.machine.is_in(VISIBLE)
    }

    pub fn is_listening(&self) -> bool {
        self.listener.is_some()
    }

    /// Disconnect the observer and detach the listener
    pub fn teardown(&mut self, host: &mut dyn Host) {
        if let Some(id) = self.listener.take() {
            host.remove_scroll_listener(id);
        }
        if let Some(id) = self.observer.take() {
            host.disconnect_observer(id);
        }
        self.on_scroll = None;
        self.machine.send(LEAVE);
    }
}

impl Default for VisibilityGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbit_platform::HeadlessHost;

    fn gate(host: &mut HeadlessHost) -> VisibilityGate {
        let target = host.create_element(orbit_platform::Tag::Div);
        let mut gate = VisibilityGate::new();
        gate.observe(
            host,
            target,
            Arc::new(|_: &mut dyn Host, _: &[IntersectionEntry]| {}),
            Arc::new(|_: &mut dyn Host| {}),
        );
        gate
    }

    #[test]
    fn toggle_keeps_a_single_listener() {
        let mut host = HeadlessHost::new(800.0, 600.0);
        let mut gate = gate(&mut host);

        assert!(gate.update(&mut host, true));
        assert!(!gate.update(&mut host, true));
        assert_eq!(host.scroll_listener_count(), 1);

        assert!(gate.update(&mut host, false));
        assert!(!gate.update(&mut host, false));
        assert_eq!(host.scroll_listener_count(), 0);

        gate.update(&mut host, true);
        assert_eq!(host.scroll_listener_count(), 1);
        assert!(gate.is_listening());
    }

    #[test]
    fn teardown_releases_everything() {
        let mut host = HeadlessHost::new(800.0, 600.0);
        let mut gate = gate(&mut host);
        gate.update(&mut host, true);

        gate.teardown(&mut host);
        assert_eq!(host.scroll_listener_count(), 0);
        assert_eq!(host.observer_count(), 0);
        assert!(!gate.is_visible());

        // a late report after teardown has nothing to attach
        gate.update(&mut host, true);
        assert_eq!(host.scroll_listener_count(), 0);
    }
}
