//! OBJ file loader for 3D models
//!
//! Produces de-indexed triangle soup ready for `glDrawArrays`: every face
//! corner becomes its own vertex.

use crate::render::MeshData;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ObjError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error on line {line}: {message}")]
    ParseError { line: usize, message: String },
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Parsing options
#[derive(Debug, Clone, Copy)]
pub struct ObjOptions {
    /// Negate the V texture coordinate. DDS textures are stored top-down, so
    /// this is on by default.
    pub invert_v: bool,
}

impl Default for ObjOptions {
    fn default() -> Self {
        Self { invert_v: true }
    }
}

/// One corner of a face: 0-based indices into the attribute lists
#[derive(Debug, Clone, Copy)]
struct FaceCorner {
    position: usize,
    tex_coord: Option<usize>,
    normal: Option<usize>,
}

pub struct ObjLoader;

impl ObjLoader {
    /// Load an OBJ file with default options
    pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<MeshData, ObjError> {
        Self::load_obj_with(path, ObjOptions::default())
    }

    /// Load an OBJ file
    pub fn load_obj_with<P: AsRef<Path>>(path: P, options: ObjOptions) -> Result<MeshData, ObjError> {
        let path = path.as_ref();
        log::info!("Loading OBJ file {}...", path.display());
        let file = File::open(path)?;
        let mesh = Self::parse(BufReader::new(file), options)?;
        log::debug!("Loaded {} triangles from {}", mesh.vertex_count() / 3, path.display());
        Ok(mesh)
    }

    /// Parse OBJ text from any buffered reader
    pub fn parse<R: BufRead>(reader: R, options: ObjOptions) -> Result<MeshData, ObjError> {
        let mut positions: Vec<[f32; 3]> = Vec::new();
        let mut normals: Vec<[f32; 3]> = Vec::new();
        let mut tex_coords: Vec<[f32; 2]> = Vec::new();
        let mut mesh = MeshData::default();

        for (line_index, line) in reader.lines().enumerate() {
            let line_number = line_index + 1;
            let line = line?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();

            match parts[0] {
                "v" => positions.push(parse_floats::<3>(&parts[1..], line_number, "vertex")?),
                "vn" => normals.push(parse_floats::<3>(&parts[1..], line_number, "normal")?),
                "vt" => {
                    let [u, v] = parse_floats::<2>(&parts[1..], line_number, "texture coordinate")?;
                    tex_coords.push([u, if options.invert_v { -v } else { v }]);
                }
                "f" => {
                    if parts.len() < 4 {
                        return Err(ObjError::ParseError {
                            line: line_number,
                            message: format!("face needs at least 3 vertices, got {}", parts.len() - 1),
                        });
                    }

                    let corners = parts[1..]
                        .iter()
                        .map(|token| {
                            parse_corner(token, line_number, positions.len(), tex_coords.len(), normals.len())
                        })
                        .collect::<Result<Vec<_>, _>>()?;

                    // Fan triangulation; a plain triangle yields exactly one
                    for i in 1..(corners.len() - 1) {
                        let triangle = [corners[0], corners[i], corners[i + 1]];
                        let face_normal = flat_normal(
                            positions[triangle[0].position],
                            positions[triangle[1].position],
                            positions[triangle[2].position],
                        );

                        for corner in triangle {
                            mesh.positions.push(positions[corner.position]);
                            mesh.uvs.push(corner.tex_coord.map_or([0.0, 0.0], |i| tex_coords[i]));
                            mesh.normals.push(corner.normal.map_or(face_normal, |i| normals[i]));
                        }
                    }
                }
                _ => {
                    // Ignore other commands
                }
            }
        }

        if mesh.positions.is_empty() {
            return Err(ObjError::InvalidFormat("No faces found in OBJ file".to_string()));
        }

        Ok(mesh)
    }
}

fn parse_floats<const N: usize>(values: &[&str], line: usize, what: &str) -> Result<[f32; N], ObjError> {
    if values.len() < N {
        return Err(ObjError::ParseError {
            line,
            message: format!("{what} needs {N} components, got {}", values.len()),
        });
    }

    let mut out = [0.0; N];
    for (slot, value) in out.iter_mut().zip(values) {
        *slot = value.parse().map_err(|_| ObjError::ParseError {
            line,
            message: format!("invalid {what} component '{value}'"),
        })?;
    }
    Ok(out)
}

/// Resolve a 1-based (or negative, relative) OBJ index against a list length
fn resolve_index(token: &str, len: usize, line: usize, what: &str) -> Result<usize, ObjError> {
    let raw: i64 = token.parse().map_err(|_| ObjError::ParseError {
        line,
        message: format!("invalid {what} index '{token}'"),
    })?;

    let resolved = match raw {
        0 => None,
        r if r > 0 => usize::try_from(r - 1).ok(),
        r => len.checked_sub(usize::try_from(-r).unwrap_or(usize::MAX)),
    };

    match resolved {
        Some(index) if index < len => Ok(index),
        _ => Err(ObjError::ParseError {
            line,
            message: format!("{what} index {raw} out of range (have {len})"),
        }),
    }
}

fn parse_corner(
    token: &str,
    line: usize,
    position_count: usize,
    tex_coord_count: usize,
    normal_count: usize,
) -> Result<FaceCorner, ObjError> {
    let mut fields = token.split('/');

    let position = resolve_index(fields.next().unwrap_or(""), position_count, line, "position")?;
    let tex_coord = match fields.next() {
        Some(t) if !t.is_empty() => Some(resolve_index(t, tex_coord_count, line, "texture coordinate")?),
        _ => None,
    };
    let normal = match fields.next() {
        Some(n) if !n.is_empty() => Some(resolve_index(n, normal_count, line, "normal")?),
        _ => None,
    };

    Ok(FaceCorner { position, tex_coord, normal })
}

fn flat_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    use crate::foundation::math::Vec3;

    let a = Vec3::from(a);
    let edge1 = Vec3::from(b) - a;
    let edge2 = Vec3::from(c) - a;
    let normal = edge1.cross(&edge2);
    normal
        .try_normalize(f32::EPSILON)
        .map_or([0.0, 0.0, 0.0], |n| [n.x, n.y, n.z])
}
