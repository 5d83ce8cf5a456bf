// src/gfx/rendering/mod.rs
//! Buffer consolidation and render dispatch
//!
//! Packs built geometries into GPU-ready buffers grouped by material,
//! uploads them, and draws the resulting ranges.

pub mod buffers;
pub mod consolidation;
pub mod dispatch;

// Re-export main types
pub use buffers::ConsolidatedMesh;
pub use consolidation::{consolidate, BufferId, BufferLimits, DrawRange, PackedBufferSet};
pub use dispatch::{DrawConsolidated, MaterialBinder};
