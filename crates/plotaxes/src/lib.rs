//! plotaxes: labeled coordinate axes around a 3D plotted surface.
//!
//! The axes layer turns three scales (x, y, z) into instanced grid lines,
//! instanced label quads and a packed label atlas, and redraws them every
//! frame through a [`Renderer`] supplied by the host.
//!
//! # Quick Start
//!
//! ```
//! use std::rc::Rc;
//! use plotaxes::*;
//!
//! fn main() -> Result<()> {
//!     let mut renderer = HeadlessRenderer::new();
//!     let mut rasterizer = BlockRasterizer::new(6);
//!     let mut layer = AxesLayerController::new(
//!         "axes",
//!         AxesPrograms { grid: ProgramHandle(1), labels: ProgramHandle(2) },
//!     );
//!
//!     let props = AxesProps::default()
//!         .with_scale(Axis::X, Rc::new(LinearScale::new([0.0, 100.0], [-1.0, 1.0])))
//!         .with_scale(Axis::Y, Rc::new(LinearScale::new([0.0, 10.0], [-1.0, 1.0])))
//!         .with_scale(Axis::Z, Rc::new(LinearScale::new([-5.0, 5.0], [-1.0, 1.0])));
//!
//!     layer.on_props_changed(props, &mut renderer, &mut rasterizer)?;
//!     layer.update(&mut renderer)?;
//!     layer.draw(&mut renderer)?;
//!
//!     assert_eq!(renderer.draws().len(), 2);
//!     layer.dispose(&mut renderer);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`plotaxes_core`] samples scales into a [`TickSet`], stored in (x, z, y) order
//! - [`plotaxes_render`] holds the geometry templates, instance buffers and atlas
//! - [`AxesLayerController`] recomputes on prop changes and issues the draws

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

mod controller;

pub use controller::{AxesLayerController, AxesPrograms, LayerState};

// Re-export core types
pub use plotaxes_core::{
    default_format_tick, get_ticks, Axis, AxisScales, AxisTicks, AxesConfig, AxesError,
    AxesProps, GridBounds, LinearScale, Result, Scale, Tick, TickFormatter, TickSet,
    TickStrategy, Vec2, Vec3, BASE_FONT_SIZE,
};

// Re-export render types
pub use plotaxes_render::{
    Atlas, AtlasColumn, AttributeManager, AxesUniforms, BlockRasterizer, DrawMode, DrawRecord,
    DrawUniforms, Geometry, GlyphBitmap, HeadlessRenderer, InstanceAttribute, LabelUniforms,
    ModelDescriptor, ModelHandle, ProgramHandle, Renderer, TextRasterizer, TextureHandle,
};

/// Installs an `env_logger` logger, configured through `RUST_LOG`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::try_init();
    log::info!("plotaxes {} logging initialized", env!("CARGO_PKG_VERSION"));
}
