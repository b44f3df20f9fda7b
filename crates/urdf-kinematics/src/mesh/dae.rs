//! COLLADA (.dae) mesh decoding

use std::path::Path;

use dae_parser::{ArrayElement, Document, Geometry, InputList, Primitive, Semantic, Source};

use crate::error::MeshError;
use crate::scene::MeshData;

/// Load every triangle and polygon list of every geometry in a COLLADA file into one mesh
pub fn load_dae(path: impl AsRef<Path>) -> Result<MeshData, MeshError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(MeshError::NotFound(path.to_string_lossy().to_string()));
    }
    let doc = Document::from_file(path).map_err(|e| MeshError::Parse(format!("{e:?}")))?;
    read_document(&doc)
}

/// Decode an in-memory COLLADA document
pub fn load_dae_from_str(text: &str) -> Result<MeshData, MeshError> {
    let doc: Document = text.parse().map_err(|e| MeshError::Parse(format!("{e:?}")))?;
    read_document(&doc)
}

fn read_document(doc: &Document) -> Result<MeshData, MeshError> {
    let mut data = MeshData::default();
    for geometry in doc.iter::<Geometry>() {
        let Some(mesh) = geometry.element.as_mesh() else {
            continue;
        };
        let Some(positions) = position_array(&mesh.sources) else {
            continue;
        };

        let base = data.vertices.len() as u32;
        let vertex_count = positions.len() / 3;
        data.vertices
            .extend(positions.chunks_exact(3).map(|p| [p[0], p[1], p[2]]));

        for primitive in &mesh.elements {
            let mut corners = match primitive {
                Primitive::Triangles(triangles) => {
                    let Some(prim) = triangles.data.prim.as_deref() else {
                        continue;
                    };
                    vertex_indices(&triangles.inputs, prim)?
                }
                Primitive::PolyList(polygons) => {
                    let corners = vertex_indices(&polygons.inputs, &polygons.data.prim)?;
                    fan_triangulate(&polygons.data.vcount, &corners)?
                }
                _ => continue,
            };
            corners.truncate(corners.len() / 3 * 3);

            for index in corners {
                if index as usize >= vertex_count {
                    return Err(MeshError::Parse(format!(
                        "vertex index {index} out of range for {vertex_count} vertices"
                    )));
                }
                data.indices.push(base + index);
            }
        }
    }

    if data.is_empty() {
        return Err(MeshError::EmptyMesh);
    }
    data.normals = face_normals(&data);
    Ok(data)
}

/// The VERTEX index of each corner in an interleaved `<p>` list
fn vertex_indices(inputs: &InputList, prim: &[u32]) -> Result<Vec<u32>, MeshError> {
    let stride = inputs.stride.max(1);
    let offset = inputs
        .iter()
        .find(|input| input.semantic == Semantic::Vertex)
        .map_or(0, |input| input.offset as usize);
    if offset >= stride {
        return Err(MeshError::Parse(format!(
            "VERTEX offset {offset} outside the input stride {stride}"
        )));
    }

    Ok(prim.chunks_exact(stride).map(|corner| corner[offset]).collect())
}

/// Split each polygon of a `<polylist>` into a triangle fan
fn fan_triangulate(vcount: &[u32], corners: &[u32]) -> Result<Vec<u32>, MeshError> {
    let mut triangles = Vec::with_capacity(corners.len());
    let mut start = 0;
    for &count in vcount {
        let end = start + count as usize;
        let Some(polygon) = corners.get(start..end) else {
            return Err(MeshError::Parse(format!(
                "polygon needs {end} corners, only {} given",
                corners.len()
            )));
        };
        for i in 1..polygon.len().saturating_sub(1) {
            triangles.extend([polygon[0], polygon[i], polygon[i + 1]]);
        }
        start = end;
    }
    Ok(triangles)
}

fn float_values(source: &Source) -> Option<&[f32]> {
    match &source.array {
        Some(ArrayElement::Float(array)) => Some(&*array.val),
        _ => None,
    }
}

/// Pick the float source holding vertex positions
fn position_array(sources: &[Source]) -> Option<&[f32]> {
    sources
        .iter()
        .find(|s| {
            s.id
                .as_deref()
                .is_some_and(|id| id.to_lowercase().contains("position"))
        })
        .and_then(float_values)
        .or_else(|| sources.iter().find_map(float_values))
}

fn face_normals(data: &MeshData) -> Vec<[f32; 3]> {
    data.indices
        .chunks_exact(3)
        .map(|tri| {
            let [a, b, c] = [0, 1, 2].map(|i| glam::Vec3::from(data.vertices[tri[i] as usize]));
            let n = (b - a).cross(c - a).normalize_or_zero();
            [n.x, n.y, n.z]
        })
        .collect()
}
