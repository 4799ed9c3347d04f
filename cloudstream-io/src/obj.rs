//! OBJ format support

use crate::MeshReader;
use cloudstream_core::{Error, Point3f, Result, TriangleMesh};
use log::debug;
use obj::ObjData;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

pub struct ObjReader;

impl MeshReader for ObjReader {
    fn read_mesh<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
        let file = File::open(path.as_ref())?;
        let mesh = parse_obj(BufReader::new(file))?;
        debug!(
            "Read OBJ mesh {} ({} vertices, {} faces)",
            path.as_ref().display(),
            mesh.vertex_count(),
            mesh.face_count()
        );
        Ok(mesh)
    }
}

/// Parse OBJ data into a triangle mesh, flattening all objects and groups
pub fn parse_obj<R: Read>(input: R) -> Result<TriangleMesh> {
    let data = ObjData::load_buf(input)
        .map_err(|e| Error::InvalidData(format!("Failed to parse OBJ: {}", e)))?;

    let vertices: Vec<Point3f> = data
        .position
        .iter()
        .map(|&[x, y, z]| Point3f::new(x, y, z))
        .collect();

    let mut faces = Vec::new();
    let polygons = data
        .objects
        .iter()
        .flat_map(|object| object.groups.iter())
        .flat_map(|group| group.polys.iter());
    for polygon in polygons {
        // Position index only; texture and normal indices are irrelevant here
        let indices: Vec<usize> = polygon.0.iter().map(|tuple| tuple.0).collect();
        for i in 1..indices.len().saturating_sub(1) {
            faces.push([indices[0], indices[i], indices[i + 1]]);
        }
    }

    let mesh = TriangleMesh::from_vertices_and_faces(vertices, faces);
    if !mesh.faces_in_bounds() {
        return Err(Error::InvalidData(
            "OBJ face references a missing vertex".to_string(),
        ));
    }
    Ok(mesh)
}
