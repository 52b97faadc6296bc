//! Orbit Core Runtime
//!
//! Foundational pieces shared by the Orbit crates:
//!
//! - **Interpolation**: linear range mapping with optional clamping
//! - **State Machines**: flat statecharts for idempotent state toggles
//! - **Listener Registries**: keyed handler sets that can be snapshotted
//!   before dispatch
//!
//! # Example
//!
//! ```rust
//! use orbit_core::interpolate::Interpolator;
//!
//! let progress = Interpolator::new([100.0, 600.0], [0.0, 100.0]).clamped(true);
//!
//! assert_eq!(progress.apply(100.0), 0.0);
//! assert_eq!(progress.apply(350.0), 50.0);
//! assert_eq!(progress.apply(10_000.0), 100.0);
//! ```

pub mod events;
pub mod fsm;
pub mod interpolate;

pub use events::{ListenerId, Listeners};
pub use fsm::{EventId, StateId, StateMachine, Transition};
pub use interpolate::{interpolate, Interpolator};
