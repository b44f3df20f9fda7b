//! Material resolution
//!
//! A `<visual>` material is either defined inline (`<color>`/`<texture>` children) or
//! refers by name to a `<material>` declared at the top of the document.

use std::collections::HashMap;

use crate::scene::Material;

use super::UrdfLoader;

impl UrdfLoader {
    /// Build a material from a `<material>` element's own children
    pub(crate) fn build_material(&self, material: &urdf_rs::Material) -> Material {
        let color = material
            .color
            .as_ref()
            .map(|c| {
                [
                    c.rgba.0[0] as f32,
                    c.rgba.0[1] as f32,
                    c.rgba.0[2] as f32,
                    c.rgba.0[3] as f32,
                ]
            })
            .unwrap_or(self.default_color);

        let texture = material
            .texture
            .as_ref()
            .and_then(|t| self.resolve_path(&t.filename));

        Material {
            name: material.name.clone(),
            color,
            texture,
        }
    }

    /// Name -> material table for the document-level `<material>` elements
    pub(crate) fn material_table(&self, materials: &[urdf_rs::Material]) -> HashMap<String, Material> {
        materials
            .iter()
            .filter(|m| !m.name.is_empty())
            .map(|m| (m.name.clone(), self.build_material(m)))
            .collect()
    }

    /// Resolve a visual's material: inline first, then by name, then the default
    pub(crate) fn resolve_material(
        &self,
        material: Option<&urdf_rs::Material>,
        table: &HashMap<String, Material>,
    ) -> Material {
        let default = || Material::with_color(self.default_color);

        let Some(material) = material else {
            return default();
        };

        if material.color.is_some() || material.texture.is_some() {
            return self.build_material(material);
        }

        if material.name.is_empty() {
            return default();
        }

        table.get(&material.name).cloned().unwrap_or_else(|| {
            tracing::warn!(
                "Material '{}' not found, using default material",
                material.name
            );
            Material {
                name: material.name.clone(),
                ..default()
            }
        })
    }
}
