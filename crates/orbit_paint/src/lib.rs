//! Orbit Paint API
//!
//! A small 2D drawing surface modelled on the HTML canvas.
//!
//! # Features
//!
//! - Colors parsed from CSS strings (hex, `rgb()`, `rgba()`, named)
//! - Paths built from move/arc/close commands
//! - The [`Canvas2d`] trait every render target implements
//! - [`PaintContext`], a canvas that records what was drawn

pub mod canvas;
pub mod color;
pub mod context;
pub mod path;
pub mod primitives;

pub use canvas::{Canvas2d, LineCap};
pub use color::{Color, ColorParseError};
pub use context::{PaintCommand, PaintContext};
pub use path::{Path, PathBuilder, PathCommand, Point};
pub use primitives::Rect;
