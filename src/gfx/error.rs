//! # Error Types
//!
//! This module defines the error taxonomy for geometry construction and
//! buffer consolidation. All fallible operations in the crate return
//! [`GraphicsError`]; nothing is clamped or silently substituted.

use std::fmt;

use thiserror::Error;

/// The kind of registry resource a lookup failed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// A material registered under a material key.
    Material,
    /// A texture registered under a texture key.
    Texture,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Material => write!(f, "material"),
            ResourceKind::Texture => write!(f, "texture"),
        }
    }
}

/// The kind of packed buffer a capacity check failed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    /// A packed vertex buffer.
    Vertex,
    /// A packed index buffer.
    Index,
}

impl fmt::Display for BufferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferKind::Vertex => write!(f, "vertex"),
            BufferKind::Index => write!(f, "index"),
        }
    }
}

/// Errors produced while building geometry or consolidating buffers.
///
/// Construction failures ([`GraphicsError::Triangulation`]) are kept distinct
/// from argument validation ([`GraphicsError::InvalidArgument`]) so that
/// callers building text geometry can treat the former as non-fatal while the
/// latter always indicates a programming error at the call site.
#[derive(Debug, Error)]
pub enum GraphicsError {
    /// A parameter was outside its documented range. Fails at the call that
    /// received the bad input; values are never clamped.
    #[error("invalid argument `{argument}`: {message}")]
    InvalidArgument {
        /// Name of the offending parameter.
        argument: &'static str,
        /// What was wrong with it.
        message: String,
    },

    /// Ear clipping could not reduce a polygon within its iteration budget,
    /// or the polygon was degenerate.
    #[error("triangulation failed: {0}")]
    Triangulation(String),

    /// A material or texture key was not present in the registry. Lookup
    /// failures propagate; consolidation has no fallback material policy.
    #[error("{kind} `{key}` was not found in the registry")]
    ResourceNotFound {
        /// Which registry the lookup ran against.
        kind: ResourceKind,
        /// The key that missed.
        key: String,
    },

    /// A single geometry or surface is too large to fit any one buffer under
    /// the configured limits and cannot be split.
    #[error("{kind} data ({needed} elements) exceeds the per-buffer limit of {limit}")]
    BufferCapacity {
        /// Which buffer type overflowed.
        kind: BufferKind,
        /// Element count that was requested in one piece.
        needed: usize,
        /// The configured ceiling.
        limit: usize,
    },
}
