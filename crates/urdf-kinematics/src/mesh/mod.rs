//! Mesh loading (injection point plus the filesystem default)
//!
//! The loader never decodes meshes during a parse. Each `<mesh filename>` is handed to
//! a [`MeshLoader`], which returns a future; the robot tree is returned immediately and
//! the geometry is attached when the future resolves.

#[cfg(feature = "collada")]
mod dae;
mod stl;

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use crate::error::MeshError;
use crate::scene::SceneNode;

#[cfg(feature = "collada")]
pub use dae::{load_dae, load_dae_from_str};
pub use stl::{load_stl, load_stl_from_bytes};

/// Future returned by a [`MeshLoader`]
pub type MeshFuture = Pin<Box<dyn Future<Output = Result<SceneNode, MeshError>> + Send>>;

/// Loads a resolved mesh URL into a renderable node
pub trait MeshLoader: Send + Sync {
    fn load(&self, url: &str) -> MeshFuture;
}

impl<F> MeshLoader for F
where
    F: Fn(&str) -> MeshFuture + Send + Sync,
{
    fn load(&self, url: &str) -> MeshFuture {
        self(url)
    }
}

/// Detect mesh format from file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    Stl,
    Dae,
    Unknown,
}

impl MeshFormat {
    /// Detect format from file path
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .as_deref()
        {
            Some("stl") => MeshFormat::Stl,
            Some("dae") => MeshFormat::Dae,
            _ => MeshFormat::Unknown,
        }
    }

    /// Check if the format can be decoded by this build
    pub fn is_supported(&self) -> bool {
        match self {
            MeshFormat::Stl => true,
            MeshFormat::Dae => cfg!(feature = "collada"),
            MeshFormat::Unknown => false,
        }
    }

    /// Get format name
    pub fn name(&self) -> &'static str {
        match self {
            MeshFormat::Stl => "STL",
            MeshFormat::Dae => "DAE (COLLADA)",
            MeshFormat::Unknown => "Unknown",
        }
    }
}

/// Load any supported mesh file from disk into a mesh node
pub fn load_mesh_file(path: impl AsRef<Path>) -> Result<SceneNode, MeshError> {
    let path = path.as_ref();
    let data = match MeshFormat::from_path(path) {
        MeshFormat::Stl => load_stl(path)?,
        #[cfg(feature = "collada")]
        MeshFormat::Dae => load_dae(path)?,
        format => {
            return Err(MeshError::UnsupportedFormat(
                path.extension()
                    .and_then(|e| e.to_str())
                    .map_or_else(|| format.name().to_string(), str::to_string),
            ));
        }
    };

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed");
    Ok(SceneNode::triangles(data, None).named(name))
}

/// Default mesh loader reading from the local filesystem
///
/// `file://` prefixes are stripped; everything else is treated as a path.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileMeshLoader;

impl MeshLoader for FileMeshLoader {
    fn load(&self, url: &str) -> MeshFuture {
        let path = url.strip_prefix("file://").unwrap_or(url).to_string();
        Box::pin(async move { load_mesh_file(&path) })
    }
}
