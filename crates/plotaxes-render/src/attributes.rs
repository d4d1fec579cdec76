//! Dirty-tracked per-instance attribute buffers.
//!
//! One instance per tick, laid out in render order (x, z, y). The grid model
//! and the label model both read the same two buffers.

use plotaxes_core::TickSet;

use crate::geometry::axis_normal;

/// Name of the `[position, axis_slot]` buffer.
pub const INSTANCE_POSITIONS: &str = "instancePositions";
/// Name of the `[nx, ny, nz]` buffer.
pub const INSTANCE_NORMALS: &str = "instanceNormals";

/// A flat `f32` instance buffer with change tracking.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceAttribute {
    name: &'static str,
    size: usize,
    value: Vec<f32>,
    dirty: bool,
    changed: bool,
}

impl InstanceAttribute {
    fn new(name: &'static str, size: usize) -> Self {
        Self {
            name,
            size,
            value: Vec::new(),
            dirty: true,
            changed: false,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Floats per instance.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn value(&self) -> &[f32] {
        &self.value
    }

    /// Raw bytes for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.value)
    }

    /// Whether the buffer must be regenerated before use.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether the buffer was regenerated since changes were last cleared.
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    fn set(&mut self, value: Vec<f32>) {
        self.value = value;
        self.dirty = false;
        self.changed = true;
    }
}

/// Owns the instance buffers derived from a [`TickSet`].
#[derive(Debug, Clone)]
pub struct AttributeManager {
    positions: InstanceAttribute,
    normals: InstanceAttribute,
    generation: u64,
}

impl Default for AttributeManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributeManager {
    /// Creates a manager with both buffers dirty and empty.
    pub fn new() -> Self {
        Self {
            positions: InstanceAttribute::new(INSTANCE_POSITIONS, 2),
            normals: InstanceAttribute::new(INSTANCE_NORMALS, 3),
            generation: 0,
        }
    }

    /// Marks both buffers stale.
    pub fn invalidate(&mut self) {
        self.positions.dirty = true;
        self.normals.dirty = true;
    }

    /// Whether any buffer is stale.
    pub fn is_dirty(&self) -> bool {
        self.positions.dirty || self.normals.dirty
    }

    /// Regenerates every dirty buffer from `ticks`.
    ///
    /// Returns `true` if anything was regenerated. Clean buffers are left
    /// untouched, so repeated calls without [`invalidate`](Self::invalidate)
    /// are free and produce identical data.
    pub fn materialize(&mut self, ticks: &TickSet) -> bool {
        let mut regenerated = false;
        if self.positions.dirty {
            self.positions.set(instance_positions(ticks));
            regenerated = true;
        }
        if self.normals.dirty {
            self.normals.set(instance_normals(ticks));
            regenerated = true;
        }
        if regenerated {
            self.generation += 1;
            log::trace!(
                "materialized instance attributes: {} instances (generation {})",
                self.num_instances(),
                self.generation
            );
        }
        regenerated
    }

    /// Buffers regenerated since the last clear, optionally clearing them.
    pub fn changed_attributes(&mut self, clear: bool) -> Vec<&InstanceAttribute> {
        let flags = [self.positions.changed, self.normals.changed];
        if clear {
            self.positions.changed = false;
            self.normals.changed = false;
        }
        [&self.positions, &self.normals]
            .into_iter()
            .zip(flags)
            .filter_map(|(attribute, changed)| changed.then_some(attribute))
            .collect()
    }

    /// Number of instances in the materialized buffers.
    pub fn num_instances(&self) -> usize {
        self.positions.value.len() / self.positions.size
    }

    /// Number of derivation passes run so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn instance_positions(&self) -> &InstanceAttribute {
        &self.positions
    }

    pub fn instance_normals(&self) -> &InstanceAttribute {
        &self.normals
    }
}

/// `[position, axis_slot]` per tick.
#[allow(clippy::cast_possible_truncation)]
fn instance_positions(ticks: &TickSet) -> Vec<f32> {
    let mut value = Vec::with_capacity(ticks.len() * 2);
    for (slot, (_, axis_ticks)) in ticks.iter().enumerate() {
        for tick in axis_ticks {
            value.extend([tick.position as f32, slot as f32]);
        }
    }
    value
}

/// `[nx, ny, nz]` per tick, constant per axis.
fn instance_normals(ticks: &TickSet) -> Vec<f32> {
    let mut value = Vec::with_capacity(ticks.len() * 3);
    for (slot, (_, axis_ticks)) in ticks.iter().enumerate() {
        let normal = axis_normal(slot).to_array();
        for _ in axis_ticks {
            value.extend(normal);
        }
    }
    value
}
