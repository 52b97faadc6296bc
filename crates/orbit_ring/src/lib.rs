//! orbit_ring
//!
//! A circular progress ring drawn on a canvas inside a host container. The
//! ring fills as the page scrolls the container toward the top of the
//! viewport, and annotation blocks around it fade in as progress crosses
//! their thresholds.
//!
//! Pieces, leaves first:
//! - [`progress`]: scroll offset + container geometry to a 0-100 percentage
//! - [`visibility`]: attaches the scroll listener only while the container
//!   intersects the viewport
//! - [`renderer`]: redraws border, track and progress wedges
//! - [`overlay`]: title text and threshold-driven blocks
//! - [`component`]: [`ProgressCanvas`], which wires the above to a [`Host`]
//!
//! ```rust
//! use orbit_platform::{HeadlessHost, Host, Tag};
//! use orbit_paint::Rect;
//! use orbit_ring::{mount, MountTarget, ProgressCanvasOptions};
//!
//! let mut host = HeadlessHost::new(800.0, 600.0);
//! let body = host.body();
//! let section = host
//!     .insert_element(body, Tag::Div, Rect::new(0.0, 1000.0, 400.0, 400.0))
//!     .unwrap();
//! host.add_class(section, "js-progress-canvas").unwrap();
//!
//! let ring = mount(
//!     &mut host,
//!     MountTarget::Selector(".js-progress-canvas"),
//!     ProgressCanvasOptions::default(),
//! )
//! .expect("container exists");
//! assert_eq!(ring.percentage(), 0.0);
//!
//! assert!(mount(&mut host, MountTarget::Selector(".missing"), Default::default()).is_none());
//! ```
//!
//! [`Host`]: orbit_platform::Host

pub mod component;
pub mod config;
pub mod error;
pub mod mount;
pub mod overlay;
pub mod progress;
pub mod registry;
pub mod renderer;
pub mod styles;
pub mod visibility;

pub use component::ProgressCanvas;
pub use config::{
    BlockPosition, BlockSpec, ClassNames, MaxWidth, Palette, ProgressCanvasOptions, StyleOverrides,
};
pub use error::{Result, RingError};
pub use mount::{mount, MountTarget};
pub use registry::{Factory, Registry};
