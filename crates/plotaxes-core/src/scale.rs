//! Scale collaborator trait and a reference linear adapter.
//!
//! A [`Scale`] maps one axis' data domain onto its render-space range and
//! proposes tick values. The axes layer never owns the mapping rule; it only
//! samples it.

use serde::{Deserialize, Serialize};

/// A continuous domain-to-range mapping for one axis.
pub trait Scale {
    /// Returns candidate tick values in ascending order.
    ///
    /// `count` is a hint; implementations may return fewer or more values.
    fn ticks(&self, count: usize) -> Vec<f64>;

    /// Maps a domain value to its range position.
    fn map(&self, value: f64) -> f64;

    /// Returns the `[start, end]` range this scale maps onto.
    fn range(&self) -> [f64; 2];
}

/// How [`LinearScale`] picks tick values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TickStrategy {
    /// Round numbers (multiples of 1, 2 or 5 times a power of ten).
    #[default]
    Nice,
    /// Exactly `count` evenly spaced values from domain start to end.
    Uniform,
}

/// Affine scale from a numeric domain onto a numeric range.
///
/// Values outside the domain are not clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain: [f64; 2],
    range: [f64; 2],
    strategy: TickStrategy,
}

impl LinearScale {
    /// Creates a scale with [`TickStrategy::Nice`] ticks.
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self {
            domain,
            range,
            strategy: TickStrategy::Nice,
        }
    }

    /// Sets the tick strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: TickStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Returns the domain.
    pub fn domain(&self) -> [f64; 2] {
        self.domain
    }

    /// Returns the tick strategy.
    pub fn strategy(&self) -> TickStrategy {
        self.strategy
    }

    fn sorted_domain(&self) -> Option<(f64, f64)> {
        let [a, b] = self.domain;
        if !a.is_finite() || !b.is_finite() || a == b {
            return None;
        }
        Some(if a < b { (a, b) } else { (b, a) })
    }
}

impl Scale for LinearScale {
    fn ticks(&self, count: usize) -> Vec<f64> {
        if count == 0 {
            return Vec::new();
        }
        let Some((lo, hi)) = self.sorted_domain() else {
            return Vec::new();
        };
        match self.strategy {
            TickStrategy::Nice => nice_ticks(lo, hi, count),
            TickStrategy::Uniform => uniform_ticks(lo, hi, count),
        }
    }

    fn map(&self, value: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        if d0 == d1 {
            return (r0 + r1) * 0.5;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    fn range(&self) -> [f64; 2] {
        self.range
    }
}

fn uniform_ticks(lo: f64, hi: f64, count: usize) -> Vec<f64> {
    if count == 1 {
        return vec![lo];
    }
    let step = (hi - lo) / (count - 1) as f64;
    // Index-based to avoid accumulating error; the last value is pinned to `hi`.
    (0..count)
        .map(|i| if i + 1 == count { hi } else { lo + step * i as f64 })
        .collect()
}

/// Largest magnitude at which every integer is exactly representable in f64.
const MAX_TICK_INDEX: f64 = 9_007_199_254_740_992.0;

/// Rounds a scaled domain bound to a tick index.
///
/// `None` when the bound is not finite or too large for neighbouring indices
/// to be distinct in f64.
fn tick_index(scaled: f64) -> Option<i64> {
    let rounded = scaled.round();
    if !rounded.is_finite() || rounded.abs() >= MAX_TICK_INDEX {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    Some(rounded as i64)
}

/// Tick step layout: ticks are `i * inc` (or `i / -inc` when `inc < 0`)
/// for `i` in `i1..=i2`.
///
/// `None` when the span cannot be resolved into distinct steps.
fn tick_step(lo: f64, hi: f64, count: f64) -> Option<(i64, i64, f64)> {
    let e10 = 50f64.sqrt();
    let e5 = 10f64.sqrt();
    let e2 = 2f64.sqrt();

    let step = (hi - lo) / count;
    let power = step.log10().floor();
    if !power.is_finite() {
        return None;
    }
    let error = step / 10f64.powf(power);
    let factor = if error >= e10 {
        10.0
    } else if error >= e5 {
        5.0
    } else if error >= e2 {
        2.0
    } else {
        1.0
    };

    let (i1, i2, inc) = if power < 0.0 {
        let inc = 10f64.powf(-power) / factor;
        let mut i1 = tick_index(lo * inc)?;
        let mut i2 = tick_index(hi * inc)?;
        if (i1 as f64) / inc < lo {
            i1 += 1;
        }
        if (i2 as f64) / inc > hi {
            i2 -= 1;
        }
        (i1, i2, -inc)
    } else {
        let inc = 10f64.powf(power) * factor;
        let mut i1 = tick_index(lo / inc)?;
        let mut i2 = tick_index(hi / inc)?;
        if (i1 as f64) * inc < lo {
            i1 += 1;
        }
        if (i2 as f64) * inc > hi {
            i2 -= 1;
        }
        (i1, i2, inc)
    };
    if !inc.is_finite() || inc == 0.0 {
        return None;
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_step(lo, hi, count * 2.0);
    }
    Some((i1, i2, inc))
}

fn nice_ticks(lo: f64, hi: f64, count: usize) -> Vec<f64> {
    let Some((i1, i2, inc)) = tick_step(lo, hi, count as f64) else {
        return Vec::new();
    };
    if i2 < i1 {
        return Vec::new();
    }
    (i1..=i2)
        .map(|i| {
            if inc < 0.0 {
                i as f64 / -inc
            } else {
                i as f64 * inc
            }
        })
        .collect()
}
