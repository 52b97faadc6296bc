//! Orbit Platform Abstraction
//!
//! The [`Host`] trait is everything a scroll-driven component consumes from
//! the page it lives in: element creation and geometry, the global scroll
//! surface, viewport intersection notifications, animation frames and 2D
//! canvas contexts.
//!
//! [`HeadlessHost`] is a deterministic in-memory implementation used by
//! tests and the simulator.

pub mod error;
pub mod frame;
pub mod headless;
pub mod host;
pub mod style;

pub use error::{PlatformError, Result};
pub use frame::{FrameId, FrameScheduler};
pub use headless::HeadlessHost;
pub use host::{
    Content, ElementId, FrameCallback, Host, Inline, IntersectionEntry, IntersectionHandler,
    ObserverId, ObserverOptions, ScrollHandler, Tag,
};
pub use orbit_core::ListenerId;
pub use style::{parse_declarations, Declaration, StyleRule, StyleSheet};
