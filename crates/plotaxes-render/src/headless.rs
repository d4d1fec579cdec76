//! Headless collaborators.
//!
//! [`HeadlessRenderer`] keeps models and textures in memory and records every
//! draw instead of submitting it to a GPU. [`BlockRasterizer`] "renders" text
//! as solid blocks with a fixed advance per character. Together they let the
//! axes layer run without a window or a font, e.g. in integration tests or
//! when inspecting the data an actual renderer would receive.

use std::collections::HashMap;

use image::{GrayImage, Luma};
use plotaxes_core::{AxesError, Result};

use crate::atlas::{GlyphBitmap, TextRasterizer};
use crate::attributes::InstanceAttribute;
use crate::geometry::Geometry;
use crate::renderer::{
    AxesUniforms, DrawUniforms, ModelDescriptor, ModelHandle, ProgramHandle, Renderer,
    TextureHandle,
};

/// A model held by [`HeadlessRenderer`].
#[derive(Debug, Clone)]
pub struct HeadlessModel {
    pub id: String,
    pub program: ProgramHandle,
    pub geometry: Geometry,
    pub instanced: bool,
    pub instance_count: usize,
    /// Latest data per attribute name.
    pub attributes: HashMap<&'static str, Vec<f32>>,
}

/// Label metadata captured from a draw.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelDrawRecord {
    pub texture: TextureHandle,
    pub label_height: f32,
    pub label_widths: Vec<f32>,
    pub label_texture_dim: [f32; 2],
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    pub model: ModelHandle,
    pub instance_count: usize,
    pub uniforms: AxesUniforms,
    pub label: Option<LabelDrawRecord>,
}

/// In-memory [`Renderer`] that records draws.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    next_id: u64,
    models: HashMap<ModelHandle, HeadlessModel>,
    textures: HashMap<TextureHandle, GrayImage>,
    draws: Vec<DrawRecord>,
    textures_created: usize,
    textures_released: usize,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn model(&self, model: ModelHandle) -> Option<&HeadlessModel> {
        self.models.get(&model)
    }

    pub fn live_models(&self) -> usize {
        self.models.len()
    }

    pub fn texture(&self, texture: TextureHandle) -> Option<&GrayImage> {
        self.textures.get(&texture)
    }

    pub fn has_texture(&self, texture: TextureHandle) -> bool {
        self.textures.contains_key(&texture)
    }

    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    /// Total textures uploaded over the renderer's lifetime.
    pub fn textures_created(&self) -> usize {
        self.textures_created
    }

    /// Total textures released over the renderer's lifetime.
    pub fn textures_released(&self) -> usize {
        self.textures_released
    }

    /// Draws recorded since the last [`take_draws`](Self::take_draws).
    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }

    pub fn take_draws(&mut self) -> Vec<DrawRecord> {
        std::mem::take(&mut self.draws)
    }
}

impl Renderer for HeadlessRenderer {
    fn create_model(&mut self, desc: &ModelDescriptor<'_>) -> Result<ModelHandle> {
        let handle = ModelHandle(self.next_id());
        self.models.insert(
            handle,
            HeadlessModel {
                id: desc.id.to_string(),
                program: desc.program,
                geometry: desc.geometry.clone(),
                instanced: desc.instanced,
                instance_count: 0,
                attributes: HashMap::new(),
            },
        );
        Ok(handle)
    }

    fn set_instance_attributes(
        &mut self,
        model: ModelHandle,
        instance_count: usize,
        attributes: &[&InstanceAttribute],
    ) -> Result<()> {
        let entry = self
            .models
            .get_mut(&model)
            .ok_or(AxesError::UnknownModel(model.0))?;
        if !entry.instanced {
            return Err(AxesError::Render(format!(
                "model '{}' is not instanced",
                entry.id
            )));
        }
        entry.instance_count = instance_count;
        for attribute in attributes {
            entry
                .attributes
                .insert(attribute.name(), attribute.value().to_vec());
        }
        Ok(())
    }

    fn upload_texture(&mut self, image: &GrayImage) -> Result<TextureHandle> {
        if image.width() == 0 || image.height() == 0 {
            return Err(AxesError::Render(format!(
                "cannot upload empty {}x{} texture",
                image.width(),
                image.height()
            )));
        }
        let handle = TextureHandle(self.next_id());
        self.textures.insert(handle, image.clone());
        self.textures_created += 1;
        Ok(handle)
    }

    fn release_texture(&mut self, texture: TextureHandle) {
        if self.textures.remove(&texture).is_some() {
            self.textures_released += 1;
        }
    }

    fn draw(&mut self, model: ModelHandle, uniforms: &DrawUniforms<'_>) -> Result<()> {
        let instance_count = self
            .models
            .get(&model)
            .ok_or(AxesError::UnknownModel(model.0))?
            .instance_count;

        let label = match &uniforms.label {
            Some(label) => {
                if !self.textures.contains_key(&label.texture) {
                    return Err(AxesError::UnknownTexture(label.texture.0));
                }
                Some(LabelDrawRecord {
                    texture: label.texture,
                    label_height: label.label_height,
                    label_widths: label.label_widths.to_vec(),
                    label_texture_dim: label.label_texture_dim,
                })
            }
            None => None,
        };

        self.draws.push(DrawRecord {
            model,
            instance_count,
            uniforms: uniforms.base,
            label,
        });
        Ok(())
    }

    fn release_model(&mut self, model: ModelHandle) {
        self.models.remove(&model);
    }
}

/// A [`TextRasterizer`] drawing each label as a solid block.
///
/// Every character advances `advance` pixels; the block is filled with the
/// label's first byte so tests can tell columns apart.
#[derive(Debug, Clone)]
pub struct BlockRasterizer {
    advance: u32,
    overhang: u32,
    available: bool,
    fail_on: Option<String>,
    calls: usize,
}

impl BlockRasterizer {
    pub fn new(advance: u32) -> Self {
        Self {
            advance,
            overhang: 0,
            available: true,
            fail_on: None,
            calls: 0,
        }
    }

    /// Makes each bitmap `overhang` pixels wider than its measured width.
    #[must_use]
    pub fn with_overhang(mut self, overhang: u32) -> Self {
        self.overhang = overhang;
        self
    }

    /// Reports no drawing context.
    #[must_use]
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Fails when asked to rasterize `text`.
    #[must_use]
    pub fn failing_on(mut self, text: impl Into<String>) -> Self {
        self.fail_on = Some(text.into());
        self
    }

    /// Number of labels rasterized so far.
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl TextRasterizer for BlockRasterizer {
    fn is_available(&self) -> bool {
        self.available
    }

    fn rasterize(&mut self, text: &str, font_size: f32) -> Result<GlyphBitmap> {
        if self.fail_on.as_deref() == Some(text) {
            return Err(AxesError::Rasterize(format!("cannot rasterize '{text}'")));
        }
        self.calls += 1;

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let height = font_size.ceil().max(1.0) as u32;
        let chars = u32::try_from(text.chars().count())
            .map_err(|_| AxesError::Rasterize(format!("label too long: {} bytes", text.len())))?;
        let too_wide = || AxesError::Rasterize(format!("label '{text}' is too wide"));
        let width = chars.checked_mul(self.advance).ok_or_else(too_wide)?;
        let fill = text.bytes().next().unwrap_or(0);

        let image = if width == 0 {
            GrayImage::new(0, 0)
        } else {
            let padded = width.checked_add(self.overhang).ok_or_else(too_wide)?;
            GrayImage::from_pixel(padded, height, Luma([fill]))
        };
        Ok(GlyphBitmap { width, image })
    }
}
