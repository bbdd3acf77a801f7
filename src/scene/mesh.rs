use glam::Vec3;

use crate::math::{TextureMapping, AABB};

/// Indexed triangle list in the owning node's local space.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub bounds: AABB,
}

impl Mesh {
    /// Builds a mesh from positions and a triangle-list index buffer. Trailing indices that do
    /// not make up a full triangle are dropped, as are triangles referencing missing vertices.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        let count = positions.len() as u32;
        let indices: Vec<u32> = indices
            .chunks_exact(3)
            .filter(|tri| tri.iter().all(|&i| i < count))
            .flatten()
            .copied()
            .collect();
        let bounds = AABB::from_points(&positions);
        Self {
            positions,
            indices,
            bounds,
        }
    }

    /// Non-indexed triangle soup.
    pub fn from_triangle_soup(positions: Vec<Vec3>) -> Self {
        let indices = (0..positions.len() as u32).collect();
        Self::new(positions, indices)
    }

    /// Flat `width` x `height` rectangle centered on the origin in the XY plane, facing +Z.
    pub fn plane(width: f32, height: f32) -> Self {
        let (hw, hh) = (width / 2.0, height / 2.0);
        let positions = vec![
            Vec3::new(-hw, hh, 0.0),
            Vec3::new(hw, hh, 0.0),
            Vec3::new(-hw, -hh, 0.0),
            Vec3::new(hw, -hh, 0.0),
        ];
        Self::new(positions, vec![0, 2, 1, 2, 3, 1])
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                self.positions[tri[0] as usize],
                self.positions[tri[1] as usize],
                self.positions[tri[2] as usize],
            ]
        })
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Width over height of the local bounds' XY extent.
    pub fn face_aspect(&self) -> f32 {
        let size = self.bounds.size();
        size.x / size.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureSource {
    /// Image embedded in the model, by glTF texture index.
    Image(usize),
    /// The frames of the scene's video source.
    Video,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureBinding {
    pub source: TextureSource,
    pub mapping: TextureMapping,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub base_color: [f32; 4],
    pub map: Option<TextureBinding>,
    pub env_map_intensity: f32,
    pub double_sided: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0, 1.0],
            map: None,
            env_map_intensity: 1.0,
            double_sided: false,
        }
    }
}
