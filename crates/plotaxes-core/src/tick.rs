//! Ticks: discrete labeled positions along each axis.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::scale::Scale;

/// One of the three data axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Axes in the order every derived buffer is laid out.
    ///
    /// z and y are swapped relative to data order: render space is y-up while
    /// the plotted surface is `z = f(x, y)`.
    pub const RENDER_ORDER: [Axis; 3] = [Axis::X, Axis::Z, Axis::Y];

    /// Returns the lowercase axis name handed to tick formatters.
    pub fn as_str(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }

    /// Returns this axis' slot in [`Axis::RENDER_ORDER`].
    pub fn render_slot(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Z => 1,
            Axis::Y => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single tick on one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Domain value.
    pub value: f64,
    /// Range position, `scale.map(value)`.
    pub position: f64,
    /// Label text.
    pub text: String,
}

/// Ticks of one axis, ascending by value.
pub type AxisTicks = Vec<Tick>;

/// Formats a tick value for display. Errors abort the recompute that called it.
pub type TickFormatter = Rc<dyn Fn(f64, Axis) -> Result<String>>;

/// Returns the default formatter: fixed-point with two decimals.
pub fn default_format_tick() -> TickFormatter {
    Rc::new(|value, _axis| Ok(format!("{value:.2}")))
}

/// Samples `scale` for ticks and labels each one.
///
/// The tick count is whatever the scale returns; no correction is applied.
pub fn get_ticks(
    scale: &dyn Scale,
    axis: Axis,
    ticks_count: usize,
    format_tick: &dyn Fn(f64, Axis) -> Result<String>,
) -> Result<AxisTicks> {
    scale
        .ticks(ticks_count)
        .into_iter()
        .map(|value| {
            Ok(Tick {
                value,
                position: scale.map(value),
                text: format_tick(value, axis)?,
            })
        })
        .collect()
}

/// The three scales driving a tick set.
#[derive(Clone, Copy)]
pub struct AxisScales<'a> {
    pub x: &'a dyn Scale,
    pub y: &'a dyn Scale,
    pub z: &'a dyn Scale,
}

impl<'a> AxisScales<'a> {
    /// Returns the scale for `axis`.
    pub fn get(&self, axis: Axis) -> &'a dyn Scale {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }
}

/// Ticks for all three axes, stored in render order (x, z, y).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickSet {
    pub x: AxisTicks,
    pub z: AxisTicks,
    pub y: AxisTicks,
}

impl TickSet {
    /// Computes ticks for x, z and y, in that order.
    ///
    /// Stops at the first formatter error.
    pub fn compute(
        scales: AxisScales<'_>,
        ticks_count: usize,
        format_tick: &dyn Fn(f64, Axis) -> Result<String>,
    ) -> Result<Self> {
        let x = get_ticks(scales.x, Axis::X, ticks_count, format_tick)?;
        let z = get_ticks(scales.z, Axis::Z, ticks_count, format_tick)?;
        let y = get_ticks(scales.y, Axis::Y, ticks_count, format_tick)?;
        log::debug!(
            "computed ticks: x={} z={} y={}",
            x.len(),
            z.len(),
            y.len()
        );
        Ok(Self { x, z, y })
    }

    /// Returns the ticks of `axis`.
    pub fn axis(&self, axis: Axis) -> &AxisTicks {
        match axis {
            Axis::X => &self.x,
            Axis::Z => &self.z,
            Axis::Y => &self.y,
        }
    }

    /// Iterates the axes in render order.
    pub fn iter(&self) -> impl Iterator<Item = (Axis, &AxisTicks)> + '_ {
        Axis::RENDER_ORDER
            .into_iter()
            .map(move |axis| (axis, self.axis(axis)))
    }

    /// Iterates every tick, concatenated in render order.
    pub fn labels(&self) -> impl Iterator<Item = &Tick> + '_ {
        self.x.iter().chain(self.z.iter()).chain(self.y.iter())
    }

    /// Total tick count across the three axes.
    pub fn len(&self) -> usize {
        self.x.len() + self.z.len() + self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
