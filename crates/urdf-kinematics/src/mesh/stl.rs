//! STL mesh decoding

use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use crate::error::MeshError;
use crate::scene::MeshData;

/// Load an STL file (binary or ASCII) as indexed triangles
pub fn load_stl(path: impl AsRef<Path>) -> Result<MeshData, MeshError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            MeshError::NotFound(path.to_string_lossy().to_string())
        } else {
            MeshError::Io(e.to_string())
        }
    })?;
    read_stl(&mut BufReader::new(file))
}

/// Decode an in-memory STL buffer
pub fn load_stl_from_bytes(bytes: &[u8]) -> Result<MeshData, MeshError> {
    read_stl(&mut Cursor::new(bytes))
}

fn read_stl<R: Read + Seek>(reader: &mut R) -> Result<MeshData, MeshError> {
    let mesh = stl_io::read_stl(reader).map_err(|e| MeshError::Parse(e.to_string()))?;
    let data = index_mesh(&mesh);
    if data.is_empty() {
        return Err(MeshError::EmptyMesh);
    }
    Ok(data)
}

/// Flatten stl_io's shared-vertex mesh into vertex, normal and index buffers
fn index_mesh(mesh: &stl_io::IndexedMesh) -> MeshData {
    let vertices = mesh
        .vertices
        .iter()
        .map(|v| [v[0], v[1], v[2]])
        .collect();

    let mut normals = Vec::with_capacity(mesh.faces.len());
    let mut indices = Vec::with_capacity(mesh.faces.len() * 3);
    for face in &mesh.faces {
        normals.push([face.normal[0], face.normal[1], face.normal[2]]);
        indices.extend(face.vertices.iter().map(|&i| i as u32));
    }

    MeshData {
        vertices,
        normals,
        indices,
    }
}
