//! Core types for the gridline layout engine.
//!
//! This crate provides the foundational types used by `gridline-layout` and
//! by hosts that consume its output:
//! - Geometry primitives (points, sizes, rectangles, edge insets)
//! - Value types (colors, section indices, index paths, element kinds)
//! - Error types

pub mod errors;
pub mod geometry;
pub mod types;

pub use errors::*;
pub use geometry::*;
pub use types::*;
