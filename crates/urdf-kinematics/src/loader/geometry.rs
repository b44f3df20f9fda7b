//! Visual and collision geometry

use std::f64::consts::FRAC_PI_2;

use glam::{DQuat, DVec3};

use crate::robot::{GeometryKind, GeometryNode, PendingMesh};
use crate::scene::{Material, Primitive, SceneNode};
use crate::types::Pose;

use super::UrdfLoader;

impl UrdfLoader {
    /// Build a visual/collision node.
    ///
    /// Primitives become a unit-size child scaled to the declared dimensions. Meshes are
    /// handed to the mesh loader and queued on `pending`; an unresolvable package leaves
    /// the node without geometry.
    pub(crate) fn build_geometry(
        &self,
        kind: GeometryKind,
        name: Option<String>,
        origin: Pose,
        geometry: &urdf_rs::Geometry,
        material: Option<Material>,
        pending: &mut Vec<PendingMesh>,
    ) -> GeometryNode {
        let mut node = GeometryNode::new(kind, name, origin);

        match geometry {
            urdf_rs::Geometry::Box { size } => {
                let mut primitive = SceneNode::primitive(Primitive::Box, material);
                primitive.transform.scale = DVec3::from(size.0);
                node.children.push(primitive);
            }

            urdf_rs::Geometry::Sphere { radius } => {
                let mut primitive = SceneNode::primitive(Primitive::Sphere, material);
                primitive.transform.scale = DVec3::splat(*radius);
                node.children.push(primitive);
            }

            urdf_rs::Geometry::Cylinder { radius, length } => {
                node.children.push(cylinder(*radius, *length, material));
            }

            urdf_rs::Geometry::Capsule { radius, length } => {
                tracing::warn!("Capsule geometry is approximated as a cylinder");
                node.children.push(cylinder(*radius, *length, material));
            }

            urdf_rs::Geometry::Mesh { filename, scale } => {
                if let Some(scale) = scale {
                    node.transform.scale = DVec3::from(scale.0);
                }

                match self.resolve_path(filename) {
                    Some(url) => {
                        let future = self.mesh_loader.load(&url);
                        pending.push(PendingMesh::new(url, material, &node.mesh, future));
                    }
                    None => {
                        tracing::warn!("Skipping mesh '{}': unresolved package", filename);
                    }
                }
            }
        }

        node
    }
}

/// Unit cylinders run along Y; URDF cylinders run along Z
fn cylinder(radius: f64, length: f64, material: Option<Material>) -> SceneNode {
    let mut primitive = SceneNode::primitive(Primitive::Cylinder, material);
    primitive.transform.scale = DVec3::new(radius, length, radius);
    primitive.transform.rotation = DQuat::from_rotation_x(FRAC_PI_2);
    primitive
}
