//! The renderer collaborator: model creation, instancing, textures and draws.
//!
//! Shader compilation, command submission and camera uniforms belong to the
//! implementor. The axes layer only hands over geometry, instance buffers,
//! the label atlas and a flat uniform record per draw.

use image::GrayImage;
use plotaxes_core::{AxesConfig, GridBounds, Result};

use crate::attributes::InstanceAttribute;
use crate::geometry::Geometry;

/// A compiled shader program owned by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u64);

/// A model (geometry plus program) created by [`Renderer::create_model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelHandle(pub u64);

/// A 2D texture created by [`Renderer::upload_texture`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Everything needed to create one model.
#[derive(Debug, Clone, Copy)]
pub struct ModelDescriptor<'a> {
    /// Debug label.
    pub id: &'a str,
    pub program: ProgramHandle,
    pub geometry: &'a Geometry,
    /// Whether the model is drawn with per-instance attributes.
    pub instanced: bool,
}

/// Uniforms shared by the grid and label draws.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct AxesUniforms {
    pub grid_dims: [f32; 3],
    pub font_size: f32,
    pub grid_center: [f32; 3],
    pub grid_offset: f32,
    /// `[r, g, b, a]` in 0-255, as configured.
    pub stroke_color: [f32; 4],
}

impl Default for AxesUniforms {
    fn default() -> Self {
        Self::new(&GridBounds::default(), &AxesConfig::default())
    }
}

impl AxesUniforms {
    pub fn new(bounds: &GridBounds, config: &AxesConfig) -> Self {
        Self {
            grid_dims: bounds.dims.to_array(),
            font_size: config.font_size,
            grid_center: bounds.center.to_array(),
            grid_offset: config.padding,
            stroke_color: config.color.map(f32::from),
        }
    }
}

/// Atlas metadata for the label draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelUniforms<'a> {
    pub texture: TextureHandle,
    /// Pixel height of every atlas column.
    pub label_height: f32,
    /// Pixel width of each column, one per instance.
    pub label_widths: &'a [f32],
    /// Atlas `[width, height]` in pixels.
    pub label_texture_dim: [f32; 2],
}

/// The flat uniform record for one draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawUniforms<'a> {
    pub base: AxesUniforms,
    pub label: Option<LabelUniforms<'a>>,
}

/// GPU-side collaborator driven by the axes layer.
///
/// Errors are produced by the implementor and forwarded untouched.
pub trait Renderer {
    /// Creates a model from a program and static geometry.
    fn create_model(&mut self, desc: &ModelDescriptor<'_>) -> Result<ModelHandle>;

    /// Sets the instance count and replaces the given instance attributes.
    fn set_instance_attributes(
        &mut self,
        model: ModelHandle,
        instance_count: usize,
        attributes: &[&InstanceAttribute],
    ) -> Result<()>;

    /// Uploads a single-channel 2D texture.
    fn upload_texture(&mut self, image: &GrayImage) -> Result<TextureHandle>;

    /// Frees a texture. Unknown handles are ignored.
    fn release_texture(&mut self, texture: TextureHandle);

    /// Issues one instanced draw of `model`.
    fn draw(&mut self, model: ModelHandle, uniforms: &DrawUniforms<'_>) -> Result<()>;

    /// Frees a model. Unknown handles are ignored.
    fn release_model(&mut self, model: ModelHandle);
}
