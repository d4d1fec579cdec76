//! Label atlas: every tick label packed side by side into one texture.
//!
//! Column `i` of the atlas holds the label of instance `i`, so the atlas is
//! laid out in the same (x, z, y) order as the instance buffers.

use image::{imageops, GrayImage};
use plotaxes_core::{AxesError, Result, TickSet};

use crate::renderer::{LabelUniforms, Renderer, TextureHandle};

/// A rasterized label and its measured advance width in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphBitmap {
    pub width: u32,
    pub image: GrayImage,
}

/// The text-measurement collaborator.
pub trait TextRasterizer {
    /// Whether a drawing context exists. When `false` no atlas is built.
    fn is_available(&self) -> bool {
        true
    }

    /// Measures and rasterizes `text` at `font_size` pixels.
    fn rasterize(&mut self, text: &str, font_size: f32) -> Result<GlyphBitmap>;
}

/// Horizontal placement of one label in the atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasColumn {
    pub offset: u32,
    pub width: u32,
}

/// An uploaded label atlas.
#[derive(Debug)]
pub struct Atlas {
    texture: TextureHandle,
    image: GrayImage,
    columns: Vec<AtlasColumn>,
    label_widths: Vec<f32>,
}

impl Atlas {
    pub fn texture(&self) -> TextureHandle {
        self.texture
    }

    /// The CPU copy of the uploaded pixels.
    pub fn image(&self) -> &GrayImage {
        &self.image
    }

    pub fn columns(&self) -> &[AtlasColumn] {
        &self.columns
    }

    /// Column widths in pixels, in instance order.
    pub fn column_widths(&self) -> Vec<u32> {
        self.columns.iter().map(|c| c.width).collect()
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Metadata for the label draw.
    #[allow(clippy::cast_precision_loss)]
    pub fn uniforms(&self) -> LabelUniforms<'_> {
        LabelUniforms {
            texture: self.texture,
            label_height: self.height() as f32,
            label_widths: &self.label_widths,
            label_texture_dim: [self.width() as f32, self.height() as f32],
        }
    }
}

/// Builds label atlases and owns the live one.
///
/// At most one atlas texture exists at a time: the previous texture is
/// released before a new one is rasterized.
#[derive(Debug, Default)]
pub struct LabelAtlasPacker {
    current: Option<Atlas>,
}

impl LabelAtlasPacker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The live atlas, if the last pack succeeded.
    pub fn atlas(&self) -> Option<&Atlas> {
        self.current.as_ref()
    }

    /// Releases the previous atlas and packs the labels of `ticks`.
    ///
    /// Returns `Ok(None)` when there is nothing to draw yet: no ticks, every
    /// label measured zero pixels, or the rasterizer has no drawing context.
    /// Collaborator errors are returned as-is and leave no atlas behind.
    pub fn pack<R, T>(
        &mut self,
        ticks: &TickSet,
        font_size: f32,
        rasterizer: &mut T,
        renderer: &mut R,
    ) -> Result<Option<&Atlas>>
    where
        R: Renderer + ?Sized,
        T: TextRasterizer + ?Sized,
    {
        self.release(renderer);

        if ticks.is_empty() {
            log::debug!("no ticks, skipping label atlas");
            return Ok(None);
        }
        if !rasterizer.is_available() {
            log::warn!("text rasterizer unavailable, skipping label atlas");
            return Ok(None);
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let height = font_size.ceil().max(1.0) as u32;

        let mut glyphs = Vec::with_capacity(ticks.len());
        let mut columns = Vec::with_capacity(ticks.len());
        let mut offset = 0u32;
        for tick in ticks.labels() {
            let glyph = rasterizer.rasterize(&tick.text, font_size)?;
            columns.push(AtlasColumn {
                offset,
                width: glyph.width,
            });
            offset = offset.checked_add(glyph.width).ok_or_else(|| {
                AxesError::Rasterize(format!(
                    "label atlas wider than {} px at '{}'",
                    u32::MAX,
                    tick.text
                ))
            })?;
            glyphs.push(glyph);
        }

        if offset == 0 {
            log::debug!("all labels are empty, skipping label atlas");
            return Ok(None);
        }

        let mut image = GrayImage::new(offset, height);
        for (glyph, column) in glyphs.iter().zip(&columns) {
            let clipped = imageops::crop_imm(&glyph.image, 0, 0, column.width, height);
            imageops::replace(&mut image, &*clipped, i64::from(column.offset), 0);
        }

        let texture = renderer.upload_texture(&image)?;
        log::debug!(
            "created label atlas {:?}: {}x{} px, {} columns",
            texture,
            image.width(),
            image.height(),
            columns.len()
        );

        #[allow(clippy::cast_precision_loss)]
        let label_widths = columns.iter().map(|c| c.width as f32).collect();
        self.current = Some(Atlas {
            texture,
            image,
            columns,
            label_widths,
        });
        Ok(self.current.as_ref())
    }

    /// Releases the live atlas, if any.
    pub fn release<R: Renderer + ?Sized>(&mut self, renderer: &mut R) {
        if let Some(old) = self.current.take() {
            log::debug!("releasing label atlas {:?}", old.texture);
            renderer.release_texture(old.texture);
        }
    }
}
