//! Layout Engine - chain propagation, baseline snapping, collision guarding
//!
//! This crate derives the geometry of interlinear word chains: every
//! non-root position follows from its root, snapping to baselines is
//! governed by an acquire/release hysteresis band, and constrained drags
//! are checked against the other families on the page.

mod collide;
mod geometry;
mod propagate;
mod provider;
mod snap;

pub use collide::*;
pub use geometry::*;
pub use propagate::*;
pub use provider::*;
pub use snap::*;
