//! Fixed geometry templates for the grid lines and their labels.
//!
//! Both templates are tick-count independent. Every tick on every axis draws
//! the same grid rectangle and the same 8 label quads; the per-instance
//! attributes (see [`crate::attributes`]) tell the vertex stage where along
//! which axis to place them, and which edges are facing the viewer.

use glam::{Vec2, Vec3};

/// Primitive topology of a [`Geometry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    Lines,
    Triangles,
}

/// Vertex data handed to the renderer when a model is created.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub draw_mode: DrawMode,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Option<Vec<u16>>,
    pub tex_coords: Option<Vec<Vec2>>,
}

impl Geometry {
    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Positions flattened to `[x, y, z, x, y, z, ...]`.
    pub fn positions_f32(&self) -> Vec<f32> {
        self.positions.iter().flat_map(|p| p.to_array()).collect()
    }

    /// Normals flattened to `[x, y, z, x, y, z, ...]`.
    pub fn normals_f32(&self) -> Vec<f32> {
        self.normals.iter().flat_map(|n| n.to_array()).collect()
    }
}

/// Number of vertices in the grid rectangle (4 edges drawn as line pairs).
pub const GRID_VERTEX_COUNT: usize = 8;

/// UV corners of one label quad.
///
/// ```text
///   0     2
///    +--.+
///    | / |
///    +'--+
///   1     3
/// ```
const LABEL_QUAD_UVS: [Vec2; 4] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(1.0, 1.0),
];

const LABEL_QUAD_INDICES: [u16; 6] = [0, 1, 2, 2, 1, 3];

/// Builds the grid rectangle: a 2x2 square on the z = 0 plane, rotated into
/// place per instance.
///
/// ```text
/// (-1,1)      (1,1)
///   +-----------+
///   |           |
///   |           |
///   +-----------+
/// (-1,-1)     (1,-1)
/// ```
pub fn grid_template() -> Geometry {
    let corners = [
        Vec3::new(-1.0, -1.0, 0.0),
        Vec3::new(-1.0, 1.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(1.0, -1.0, 0.0),
    ];
    // Outward normal of the edge starting at the matching corner: left, top, right, bottom.
    let edge_normals = [Vec3::NEG_X, Vec3::Y, Vec3::X, Vec3::NEG_Y];

    let mut positions = Vec::with_capacity(GRID_VERTEX_COUNT);
    let mut normals = Vec::with_capacity(GRID_VERTEX_COUNT);
    for (i, normal) in edge_normals.into_iter().enumerate() {
        positions.push(corners[i]);
        positions.push(corners[(i + 1) % corners.len()]);
        normals.push(normal);
        normals.push(normal);
    }

    Geometry {
        draw_mode: DrawMode::Lines,
        positions,
        normals,
        indices: None,
        tex_coords: None,
    }
}

/// Builds one label quad per grid vertex, i.e. one label at each end of
/// every grid edge.
///
/// All four corners of a quad sit on the same grid vertex; the vertex stage
/// expands them using the UVs.
pub fn label_template(grid: &Geometry) -> Geometry {
    let quads = grid.vertex_count();
    let mut positions = Vec::with_capacity(quads * 4);
    let mut normals = Vec::with_capacity(quads * 4);
    let mut tex_coords = Vec::with_capacity(quads * 4);
    let mut indices = Vec::with_capacity(quads * LABEL_QUAD_INDICES.len());

    for (i, (&position, &normal)) in grid.positions.iter().zip(&grid.normals).enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        let base = (i * 4) as u16;
        indices.extend(LABEL_QUAD_INDICES.iter().map(|offset| base + offset));
        tex_coords.extend(LABEL_QUAD_UVS);
        positions.extend([position; 4]);
        normals.extend([normal; 4]);
    }

    Geometry {
        draw_mode: DrawMode::Triangles,
        positions,
        normals,
        indices: Some(indices),
        tex_coords: Some(tex_coords),
    }
}

/// Per-instance normal selecting the axis a tick belongs to, by render slot
/// (x, z, y).
pub fn axis_normal(slot: usize) -> Vec3 {
    match slot {
        0 => Vec3::X,
        1 => Vec3::Y,
        _ => Vec3::Z,
    }
}
