//! OFF (Object File Format) mesh support
//!
//! Handles ASCII `OFF` and `COFF` files:
//! - `#` comments and blank lines anywhere
//! - element counts either on the header line or the next line
//! - per-vertex colors for `COFF`, as 0-255 integers or 0.0-1.0 floats
//! - polygons with more than three vertices are fan-triangulated

use crate::MeshReader;
use cloudstream_core::{Error, Point3f, Result, TriangleMesh};
use log::debug;
use std::fs;
use std::path::Path;

pub struct OffReader;

impl MeshReader for OffReader {
    fn read_mesh<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
        let content = fs::read_to_string(path.as_ref())?;
        let mesh = parse_off(&content)?;
        debug!(
            "Read OFF mesh {} ({} vertices, {} faces)",
            path.as_ref().display(),
            mesh.vertex_count(),
            mesh.face_count()
        );
        Ok(mesh)
    }
}

/// Parse OFF text into a triangle mesh
pub fn parse_off(content: &str) -> Result<TriangleMesh> {
    let mut lines = content
        .lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|line| !line.is_empty());

    let header = lines
        .next()
        .ok_or_else(|| Error::InvalidData("Empty OFF file".to_string()))?;
    let mut header_tokens = header.split_whitespace();
    let has_colors = match header_tokens.next() {
        Some("OFF") => false,
        Some("COFF") => true,
        other => {
            return Err(Error::UnsupportedFormat(format!("OFF variant {:?}", other)));
        }
    };

    let rest: Vec<&str> = header_tokens.collect();
    let counts_line: Vec<&str> = if rest.is_empty() {
        lines
            .next()
            .ok_or_else(|| Error::InvalidData("Missing OFF element counts".to_string()))?
            .split_whitespace()
            .collect()
    } else {
        rest
    };
    if counts_line.len() < 2 {
        return Err(Error::InvalidData(format!(
            "Expected vertex and face counts, got '{}'",
            counts_line.join(" ")
        )));
    }
    let vertex_count = parse_usize(counts_line[0])?;
    let face_count = parse_usize(counts_line[1])?;

    // Header counts are untrusted; never reserve more than the file can hold
    let line_budget = content.lines().count();
    let mut vertices = Vec::with_capacity(vertex_count.min(line_budget));
    let mut colors = Vec::with_capacity(if has_colors {
        vertex_count.min(line_budget)
    } else {
        0
    });
    for index in 0..vertex_count {
        let line = lines.next().ok_or_else(|| {
            Error::InvalidData(format!(
                "Expected {} vertices, found {}",
                vertex_count, index
            ))
        })?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 3 {
            return Err(Error::InvalidData(format!(
                "Vertex {} has fewer than 3 coordinates",
                index
            )));
        }
        vertices.push(Point3f::new(
            parse_f32(tokens[0])?,
            parse_f32(tokens[1])?,
            parse_f32(tokens[2])?,
        ));

        if has_colors {
            if tokens.len() < 6 {
                return Err(Error::InvalidData(format!("COFF vertex {} has no color", index)));
            }
            colors.push([
                parse_channel(tokens[3])?,
                parse_channel(tokens[4])?,
                parse_channel(tokens[5])?,
            ]);
        }
    }

    let mut faces = Vec::with_capacity(face_count.min(line_budget));
    for index in 0..face_count {
        let line = lines.next().ok_or_else(|| {
            Error::InvalidData(format!("Expected {} faces, found {}", face_count, index))
        })?;
        let mut tokens = line.split_whitespace();
        let arity = parse_usize(tokens.next().unwrap_or(""))?;
        if arity < 3 {
            return Err(Error::InvalidData(format!(
                "Face {} has only {} vertices",
                index, arity
            )));
        }

        let mut polygon = Vec::new();
        for _ in 0..arity {
            let token = tokens.next().ok_or_else(|| {
                Error::InvalidData(format!("Face {} is missing vertex indices", index))
            })?;
            let vertex = parse_usize(token)?;
            if vertex >= vertex_count {
                return Err(Error::InvalidData(format!(
                    "Face {} references vertex {} of {}",
                    index, vertex, vertex_count
                )));
            }
            polygon.push(vertex);
        }

        for i in 1..arity - 1 {
            faces.push([polygon[0], polygon[i], polygon[i + 1]]);
        }
    }

    let mut mesh = TriangleMesh::from_vertices_and_faces(vertices, faces);
    if has_colors {
        mesh.set_colors(colors);
    }
    Ok(mesh)
}

fn parse_usize(token: &str) -> Result<usize> {
    token
        .parse()
        .map_err(|_| Error::InvalidData(format!("Expected an integer, got '{}'", token)))
}

fn parse_f32(token: &str) -> Result<f32> {
    token
        .parse()
        .map_err(|_| Error::InvalidData(format!("Expected a number, got '{}'", token)))
}

fn parse_channel(token: &str) -> Result<u8> {
    if token.contains('.') {
        let value = parse_f32(token)?;
        Ok((value.clamp(0.0, 1.0) * 255.0).round() as u8)
    } else {
        token
            .parse()
            .map_err(|_| Error::InvalidData(format!("Expected a color channel, got '{}'", token)))
    }
}
