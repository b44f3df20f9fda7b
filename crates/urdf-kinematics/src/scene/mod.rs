//! Minimal scene graph primitives
//!
//! The kinematic tree composes these: a transform-bearing [`SceneNode`] that may carry
//! a [`Mesh`] (geometry plus material). Rendering and GPU upload belong to the host.

mod material;

use std::sync::Arc;

use glam::{DMat4, DQuat, DVec3};

pub use material::*;

/// Local transform of a node relative to its parent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: DVec3,
    pub rotation: DQuat,
    pub scale: DVec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: DVec3::ZERO,
        rotation: DQuat::IDENTITY,
        scale: DVec3::ONE,
    };

    pub fn from_rotation_translation(rotation: DQuat, position: DVec3) -> Self {
        Self {
            position,
            rotation,
            scale: DVec3::ONE,
        }
    }

    pub fn to_mat4(&self) -> DMat4 {
        DMat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Decompose an affine matrix into position, rotation and scale
    pub fn from_mat4(matrix: &DMat4) -> Self {
        let (scale, rotation, position) = matrix.to_scale_rotation_translation();
        Self {
            position,
            rotation,
            scale,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Unit-size primitive shapes
///
/// Box spans `[-0.5, 0.5]` on every axis, sphere has radius 1, cylinder has radius 1
/// and height 1 along its local Y axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Box,
    Sphere,
    Cylinder,
}

/// Indexed triangle mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<[f32; 3]>,
    /// Triangle normals (one per triangle)
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Axis-aligned bounding box as `(min, max)`
    pub fn bounding_box(&self) -> Option<([f32; 3], [f32; 3])> {
        if self.vertices.is_empty() {
            return None;
        }

        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];

        for v in &self.vertices {
            for i in 0..3 {
                min[i] = min[i].min(v[i]);
                max[i] = max[i].max(v[i]);
            }
        }

        Some((min, max))
    }
}

/// Geometry of a renderable mesh
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Primitive(Primitive),
    Triangles(Arc<MeshData>),
}

/// Geometry plus the material it is drawn with
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub geometry: Geometry,
    pub material: Option<Material>,
}

/// Generic renderable node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneNode {
    pub name: Option<String>,
    pub transform: Transform,
    pub mesh: Option<Mesh>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    /// Empty group node
    pub fn group() -> Self {
        Self::default()
    }

    pub fn with_mesh(geometry: Geometry, material: Option<Material>) -> Self {
        Self {
            mesh: Some(Mesh { geometry, material }),
            ..Self::default()
        }
    }

    pub fn primitive(primitive: Primitive, material: Option<Material>) -> Self {
        Self::with_mesh(Geometry::Primitive(primitive), material)
    }

    pub fn triangles(data: MeshData, material: Option<Material>) -> Self {
        Self::with_mesh(Geometry::Triangles(Arc::new(data)), material)
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn add_child(&mut self, child: SceneNode) {
        self.children.push(child);
    }

    pub fn is_mesh(&self) -> bool {
        self.mesh.is_some()
    }

    /// Replace this node's material if it is a mesh. Returns whether it was applied.
    pub fn set_material(&mut self, material: Material) -> bool {
        match &mut self.mesh {
            Some(mesh) => {
                mesh.material = Some(material);
                true
            }
            None => false,
        }
    }

    /// Count this node and all of its descendants
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::node_count).sum::<usize>()
    }
}
