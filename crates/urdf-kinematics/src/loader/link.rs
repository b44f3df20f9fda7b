//! Link construction

use std::collections::HashMap;

use crate::robot::{GeometryKind, Link, PendingMesh};
use crate::scene::Material;
use crate::types::Pose;

use super::UrdfLoader;

impl UrdfLoader {
    /// Build one link with its visual and collision nodes
    pub(crate) fn build_link(
        &self,
        source: &urdf_rs::Link,
        materials: &HashMap<String, Material>,
        pending: &mut Vec<PendingMesh>,
    ) -> Link {
        let mut link = Link::new(source.clone());

        if self.parse_visual {
            for visual in &source.visual {
                let material = self.resolve_material(visual.material.as_ref(), materials);
                let node = self.build_geometry(
                    GeometryKind::Visual,
                    visual.name.clone(),
                    Pose::from(&visual.origin),
                    &visual.geometry,
                    Some(material),
                    pending,
                );
                link.visuals.push(node);
            }
        }

        if self.parse_collision {
            for collision in &source.collision {
                let node = self.build_geometry(
                    GeometryKind::Collision,
                    collision.name.clone(),
                    Pose::from(&collision.origin),
                    &collision.geometry,
                    None,
                    pending,
                );
                link.collisions.push(node);
            }
        }

        tracing::debug!(
            "Built link '{}' ({} visual, {} collision)",
            link.name,
            link.visuals.len(),
            link.collisions.len()
        );
        link
    }
}
