//! Configuration for the axes layer.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::{AxesError, Result};
use crate::scale::Scale;
use crate::tick::{default_format_tick, Axis, AxisScales, TickFormatter};

/// Base label size in CSS pixels, before the device pixel ratio is applied.
pub const BASE_FONT_SIZE: f32 = 12.0;

/// Serializable axes settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxesConfig {
    /// Requested number of ticks per axis (a hint for the scales).
    pub ticks_count: usize,

    /// On-screen label size in device pixels.
    pub font_size: f32,

    /// Device pixel ratio the default font size was derived from.
    pub device_pixel_ratio: f32,

    /// How far to set the grids back from the plot, relative to the box size.
    pub padding: f32,

    /// Grid line color as `[r, g, b, a]`, 0-255.
    pub color: [u8; 4],

    /// Pixel height the label atlas is rasterized at. `None` uses `font_size`.
    pub atlas_font_size: Option<f32>,
}

impl Default for AxesConfig {
    fn default() -> Self {
        Self {
            ticks_count: 6,
            font_size: BASE_FONT_SIZE,
            device_pixel_ratio: 1.0,
            padding: 0.0,
            color: [0, 0, 0, 255],
            atlas_font_size: None,
        }
    }
}

impl AxesConfig {
    /// Default configuration for a display with the given pixel ratio.
    pub fn with_device_pixel_ratio(device_pixel_ratio: f32) -> Self {
        Self {
            font_size: BASE_FONT_SIZE * device_pixel_ratio,
            device_pixel_ratio,
            ..Self::default()
        }
    }

    /// Height of the label atlas in pixels.
    pub fn atlas_font_size(&self) -> f32 {
        self.atlas_font_size.unwrap_or(self.font_size)
    }

    /// Checks that sizes are positive and finite and that padding is finite.
    pub fn validate(&self) -> Result<()> {
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(AxesError::InvalidConfig(format!(
                "font_size must be positive, got {}",
                self.font_size
            )));
        }
        if let Some(size) = self.atlas_font_size {
            if !size.is_finite() || size <= 0.0 {
                return Err(AxesError::InvalidConfig(format!(
                    "atlas_font_size must be positive, got {size}"
                )));
            }
        }
        if !self.device_pixel_ratio.is_finite() || self.device_pixel_ratio <= 0.0 {
            return Err(AxesError::InvalidConfig(format!(
                "device_pixel_ratio must be positive, got {}",
                self.device_pixel_ratio
            )));
        }
        if !self.padding.is_finite() {
            return Err(AxesError::InvalidConfig(format!(
                "padding must be finite, got {}",
                self.padding
            )));
        }
        Ok(())
    }

    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Everything the axes layer reads: settings, formatter and the three scales.
///
/// Scales are compared by identity (`Rc::ptr_eq`), so replacing a scale with
/// an equal-but-new instance still triggers a recompute.
#[derive(Clone)]
pub struct AxesProps {
    pub config: AxesConfig,
    pub format_tick: TickFormatter,
    pub x_scale: Option<Rc<dyn Scale>>,
    pub y_scale: Option<Rc<dyn Scale>>,
    pub z_scale: Option<Rc<dyn Scale>>,
}

impl Default for AxesProps {
    fn default() -> Self {
        Self::new(AxesConfig::default())
    }
}

impl fmt::Debug for AxesProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AxesProps")
            .field("config", &self.config)
            .field("x_scale", &self.x_scale.is_some())
            .field("y_scale", &self.y_scale.is_some())
            .field("z_scale", &self.z_scale.is_some())
            .finish_non_exhaustive()
    }
}

impl AxesProps {
    pub fn new(config: AxesConfig) -> Self {
        Self {
            config,
            format_tick: default_format_tick(),
            x_scale: None,
            y_scale: None,
            z_scale: None,
        }
    }

    /// Sets the scale for `axis`.
    #[must_use]
    pub fn with_scale(mut self, axis: Axis, scale: Rc<dyn Scale>) -> Self {
        match axis {
            Axis::X => self.x_scale = Some(scale),
            Axis::Y => self.y_scale = Some(scale),
            Axis::Z => self.z_scale = Some(scale),
        }
        self
    }

    /// Sets the tick formatter.
    #[must_use]
    pub fn with_format_tick<F>(mut self, format_tick: F) -> Self
    where
        F: Fn(f64, Axis) -> Result<String> + 'static,
    {
        self.format_tick = Rc::new(format_tick);
        self
    }

    #[must_use]
    pub fn with_ticks_count(mut self, ticks_count: usize) -> Self {
        self.config.ticks_count = ticks_count;
        self
    }

    /// Returns all three scales, or `None` while any is missing.
    pub fn scales(&self) -> Option<AxisScales<'_>> {
        Some(AxisScales {
            x: self.x_scale.as_deref()?,
            y: self.y_scale.as_deref()?,
            z: self.z_scale.as_deref()?,
        })
    }

    /// Whether switching from `self` to `other` invalidates derived tick data.
    pub fn ticks_changed(&self, other: &AxesProps) -> bool {
        self.config.ticks_count != other.config.ticks_count
            || !same_scale(self.x_scale.as_ref(), other.x_scale.as_ref())
            || !same_scale(self.y_scale.as_ref(), other.y_scale.as_ref())
            || !same_scale(self.z_scale.as_ref(), other.z_scale.as_ref())
    }
}

fn same_scale(a: Option<&Rc<dyn Scale>>, b: Option<&Rc<dyn Scale>>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        _ => false,
    }
}
