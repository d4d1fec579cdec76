//! Renderer-facing pieces of plotaxes.
//!
//! This crate provides everything the axes layer hands to a GPU renderer:
//! - Fixed grid and label geometry templates
//! - Dirty-tracked per-instance attribute buffers
//! - The packed label atlas and its text rasterizer collaborator
//! - The [`Renderer`] collaborator trait and its uniform records
//! - Headless collaborators for running without a GPU

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod atlas;
pub mod attributes;
pub mod geometry;
pub mod headless;
pub mod renderer;

pub use atlas::{Atlas, AtlasColumn, GlyphBitmap, LabelAtlasPacker, TextRasterizer};
pub use attributes::{AttributeManager, InstanceAttribute, INSTANCE_NORMALS, INSTANCE_POSITIONS};
pub use geometry::{axis_normal, grid_template, label_template, DrawMode, Geometry, GRID_VERTEX_COUNT};
pub use headless::{BlockRasterizer, DrawRecord, HeadlessModel, HeadlessRenderer, LabelDrawRecord};
pub use renderer::{
    AxesUniforms, DrawUniforms, LabelUniforms, ModelDescriptor, ModelHandle, ProgramHandle,
    Renderer, TextureHandle,
};
