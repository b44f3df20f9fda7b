//! Links and their visual/collision geometry nodes

use std::sync::Arc;

use crate::scene::{SceneNode, Transform};
use crate::types::Pose;

use super::pending::{MeshSlot, new_slot};

/// Whether a geometry node came from `<visual>` or `<collision>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Visual,
    Collision,
}

/// Location of a geometry node inside its link
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeometryRef {
    pub link: String,
    pub kind: GeometryKind,
    pub index: usize,
}

/// A `<visual>` or `<collision>` node
///
/// Primitive shapes are present as children right after parsing. Mesh geometry arrives
/// later through the mesh slot, once its loader resolves.
#[derive(Debug)]
pub struct GeometryNode {
    pub name: Option<String>,
    pub urdf_name: Option<String>,
    pub kind: GeometryKind,
    /// Declared `<origin>`
    pub origin: Pose,
    /// Local transform: the origin, plus mesh scale when the geometry is a mesh
    pub transform: Transform,
    pub children: Vec<SceneNode>,
    pub(crate) mesh: Arc<MeshSlot>,
}

impl GeometryNode {
    pub(crate) fn new(kind: GeometryKind, name: Option<String>, origin: Pose) -> Self {
        Self {
            urdf_name: name.clone(),
            name,
            kind,
            origin,
            transform: Transform::from_rotation_translation(origin.to_quat(), origin.position()),
            children: Vec::new(),
            mesh: new_slot(),
        }
    }

    /// Mesh attached by a resolved loader, if any
    pub fn mesh(&self) -> Option<SceneNode> {
        self.mesh.lock().clone()
    }

    pub fn has_mesh(&self) -> bool {
        self.mesh.lock().is_some()
    }

    /// Number of geometry children: primitives plus an attached mesh
    pub fn geometry_count(&self) -> usize {
        self.children.len() + usize::from(self.has_mesh())
    }
}

/// A rigid body
#[derive(Debug)]
pub struct Link {
    pub name: String,
    pub urdf_name: String,
    /// Local transform relative to the parent joint (always identity for URDF links)
    pub transform: Transform,
    pub visuals: Vec<GeometryNode>,
    pub collisions: Vec<GeometryNode>,
    /// Joint this link hangs from; `None` for the root link
    pub parent_joint: Option<String>,
    /// Joints attached below this link, in document order
    pub child_joints: Vec<String>,
    pub(crate) source: urdf_rs::Link,
}

impl Link {
    pub(crate) fn new(source: urdf_rs::Link) -> Self {
        Self {
            name: source.name.clone(),
            urdf_name: source.name.clone(),
            transform: Transform::IDENTITY,
            visuals: Vec::new(),
            collisions: Vec::new(),
            parent_joint: None,
            child_joints: Vec::new(),
            source,
        }
    }

    /// The `<link>` element this node was built from
    pub fn source(&self) -> &urdf_rs::Link {
        &self.source
    }

    pub fn is_root(&self) -> bool {
        self.parent_joint.is_none()
    }

    pub fn geometry(&self, kind: GeometryKind, index: usize) -> Option<&GeometryNode> {
        match kind {
            GeometryKind::Visual => self.visuals.get(index),
            GeometryKind::Collision => self.collisions.get(index),
        }
    }
}
