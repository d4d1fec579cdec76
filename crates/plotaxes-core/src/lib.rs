//! Core types for plotaxes.
//!
//! This crate holds the renderer-independent half of the axes layer:
//! - [`Scale`] collaborator trait and the reference [`LinearScale`] adapter
//! - [`Tick`], [`TickSet`] and [`get_ticks`] for sampling scales into labeled ticks
//! - [`GridBounds`] for the render-space size of the axes box
//! - [`AxesConfig`] / [`AxesProps`] configuration and the [`AxesError`] type

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Tick indices and counts are small; float conversions are intentional
#![allow(clippy::cast_precision_loss)]

pub mod bounds;
pub mod error;
pub mod options;
pub mod scale;
pub mod tick;

pub use bounds::GridBounds;
pub use error::{AxesError, Result};
pub use options::{AxesConfig, AxesProps, BASE_FONT_SIZE};
pub use scale::{LinearScale, Scale, TickStrategy};
pub use tick::{default_format_tick, get_ticks, Axis, AxisScales, AxisTicks, Tick, TickFormatter, TickSet};

// Re-export glam types for convenience
pub use glam::{Vec2, Vec3};
