//! Deferred mesh attachment

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::mesh::MeshFuture;
use crate::scene::{Material, SceneNode, Transform};

/// Single "attach resolved geometry" slot owned by a visual or collision node
pub(crate) type MeshSlot = Mutex<Option<SceneNode>>;

pub(crate) fn new_slot() -> Arc<MeshSlot> {
    Arc::new(Mutex::new(None))
}

/// A mesh load started by the parser that has not been attached yet
pub struct PendingMesh {
    url: String,
    material: Option<Material>,
    slot: Weak<MeshSlot>,
    future: MeshFuture,
}

impl PendingMesh {
    pub(crate) fn new(
        url: String,
        material: Option<Material>,
        slot: &Arc<MeshSlot>,
        future: MeshFuture,
    ) -> Self {
        Self {
            url,
            material,
            slot: Arc::downgrade(slot),
            future,
        }
    }

    /// Resolved URL passed to the mesh loader
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Wait for the loader and attach the result to its node
    ///
    /// Returns whether geometry was attached. Load failures are logged. A result
    /// arriving after its robot was dropped is discarded.
    pub async fn resolve(self) -> bool {
        let Self {
            url,
            material,
            slot,
            future,
        } = self;

        let mut node = match future.await {
            Ok(node) => node,
            Err(e) => {
                tracing::error!("Failed to load mesh '{}': {}", url, e);
                return false;
            }
        };

        let Some(slot) = slot.upgrade() else {
            tracing::debug!("Mesh '{}' resolved after its node was dropped, ignoring", url);
            return false;
        };

        if let Some(material) = material {
            node.set_material(material);
        }
        node.transform = Transform::IDENTITY;
        *slot.lock() = Some(node);
        true
    }
}

impl fmt::Debug for PendingMesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingMesh")
            .field("url", &self.url)
            .field("material", &self.material)
            .finish_non_exhaustive()
    }
}

/// Resolve a batch of pending meshes, returning how many were attached
pub async fn resolve_all(pending: Vec<PendingMesh>) -> usize {
    let mut attached = 0;
    for mesh in pending {
        if mesh.resolve().await {
            attached += 1;
        }
    }
    attached
}
