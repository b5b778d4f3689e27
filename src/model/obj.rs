use glam::{Vec2, Vec3};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::utils::{Mesh, Vertex};

#[derive(Debug)]
pub enum ObjError {
    Io(std::io::Error),
    Parse { line: usize, message: String },
    Empty,
}

impl fmt::Display for ObjError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjError::Io(e) => write!(f, "{e}"),
            ObjError::Parse { line, message } => write!(f, "line {line}: {message}"),
            ObjError::Empty => write!(f, "no faces found"),
        }
    }
}

impl std::error::Error for ObjError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ObjError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ObjError {
    fn from(e: std::io::Error) -> Self {
        ObjError::Io(e)
    }
}

pub fn load_obj(path: &Path) -> Result<Mesh, ObjError> {
    let source = std::fs::read_to_string(path)?;
    let mesh = parse_obj(&source)?;
    tracing::debug!(
        path = %path.display(),
        vertices = mesh.vertices.len(),
        triangles = mesh.triangle_count(),
        "loaded mesh"
    );
    Ok(mesh)
}

/// One `v/t/n` corner of a face, resolved to 0-based indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Corner {
    position: usize,
    uv: Option<usize>,
    normal: Option<usize>,
}

/// Parse Wavefront OBJ text into an indexed triangle mesh.
///
/// Only geometry records are read (`v`, `vt`, `vn`, `f`); everything else is
/// skipped. Polygons are fan-triangulated. Texture V is flipped because wgpu
/// samples with the origin at the top-left. Corners without a normal get the
/// face normal, corners without a UV get (0, 0).
pub fn parse_obj(source: &str) -> Result<Mesh, ObjError> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut uvs: Vec<Vec2> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();

    let mut mesh = Mesh::empty();
    let mut dedup: HashMap<Corner, u32> = HashMap::new();

    for (line_idx, raw) in source.lines().enumerate() {
        let line_no = line_idx + 1;
        let line = raw.split('#').next().unwrap_or("").trim();
        let mut parts = line.split_whitespace();
        let Some(tag) = parts.next() else { continue };

        match tag {
            "v" => positions.push(parse_vec3(parts, line_no)?),
            "vn" => normals.push(parse_vec3(parts, line_no)?),
            "vt" => {
                let u = parse_float(parts.next(), line_no)?;
                // v is optional for 1-D textures
                let v = match parts.next() {
                    Some(token) => parse_float(Some(token), line_no)?,
                    None => 0.0,
                };
                uvs.push(Vec2::new(u, v));
            }
            "f" => {
                let corners = parts
                    .map(|token| parse_corner(token, positions.len(), uvs.len(), normals.len(), line_no))
                    .collect::<Result<Vec<_>, _>>()?;
                if corners.len() < 3 {
                    return Err(parse_error(line_no, "face needs at least three vertices"));
                }

                for k in 1..corners.len() - 1 {
                    let tri = [corners[0], corners[k], corners[k + 1]];
                    let face_normal = {
                        let [a, b, c] = tri.map(|corner| positions[corner.position]);
                        (b - a).cross(c - a).normalize_or_zero()
                    };
                    for corner in tri {
                        // corners with an explicit normal can be shared
                        let shared = match corner.normal {
                            Some(_) => dedup.get(&corner).copied(),
                            None => None,
                        };
                        let index = match shared {
                            Some(index) => index,
                            None => {
                                let index = mesh.vertices.len() as u32;
                                let normal = corner.normal.map(|n| normals[n]).unwrap_or(face_normal);
                                let uv = corner.uv.map(|t| uvs[t]).unwrap_or(Vec2::ZERO);
                                mesh.vertices.push(Vertex {
                                    pos: positions[corner.position].to_array(),
                                    normal: normal.to_array(),
                                    uv: [uv.x, 1.0 - uv.y],
                                });
                                if corner.normal.is_some() {
                                    dedup.insert(corner, index);
                                }
                                index
                            }
                        };
                        mesh.indices.push(index);
                    }
                }
            }
            _ => {}
        }
    }

    if mesh.indices.is_empty() {
        return Err(ObjError::Empty);
    }
    Ok(mesh)
}

fn parse_error(line: usize, message: impl Into<String>) -> ObjError {
    ObjError::Parse { line, message: message.into() }
}

fn parse_float(token: Option<&str>, line: usize) -> Result<f32, ObjError> {
    let token = token.ok_or_else(|| parse_error(line, "missing coordinate"))?;
    token
        .parse::<f32>()
        .map_err(|_| parse_error(line, format!("invalid number '{token}'")))
}

fn parse_vec3<'a>(mut parts: impl Iterator<Item = &'a str>, line: usize) -> Result<Vec3, ObjError> {
    Ok(Vec3::new(
        parse_float(parts.next(), line)?,
        parse_float(parts.next(), line)?,
        parse_float(parts.next(), line)?,
    ))
}

/// OBJ indices are 1-based; negative values count back from the last element
fn resolve_index(raw: &str, len: usize, line: usize) -> Result<usize, ObjError> {
    let i: i64 = raw
        .parse()
        .map_err(|_| parse_error(line, format!("invalid index '{raw}'")))?;
    let resolved = if i > 0 {
        i - 1
    } else if i < 0 {
        len as i64 + i
    } else {
        -1
    };
    if resolved < 0 || resolved >= len as i64 {
        return Err(parse_error(line, format!("index {i} out of range (have {len})")));
    }
    Ok(resolved as usize)
}

fn parse_corner(
    token: &str,
    n_positions: usize,
    n_uvs: usize,
    n_normals: usize,
    line: usize,
) -> Result<Corner, ObjError> {
    let mut fields = token.split('/');
    let position = resolve_index(fields.next().unwrap_or(""), n_positions, line)?;
    let uv = match fields.next() {
        Some("") | None => None,
        Some(raw) => Some(resolve_index(raw, n_uvs, line)?),
    };
    let normal = match fields.next() {
        Some("") | None => None,
        Some(raw) => Some(resolve_index(raw, n_normals, line)?),
    };
    Ok(Corner { position, uv, normal })
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "\
# unit quad in the XZ plane
v -1 0 -1
v 1 0 -1
v 1 0 1
v -1 0 1
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 1 0
f 1/1/1 4/4/1 3/3/1 2/2/1
";

    #[test]
    fn test_quad_is_fan_triangulated() {
        let mesh = parse_obj(QUAD).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        // four unique corners shared between both triangles
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_uv_v_is_flipped() {
        let mesh = parse_obj(QUAD).unwrap();
        assert_eq!(mesh.vertices[0].uv, [0.0, 1.0]);
        assert_eq!(mesh.vertices[2].uv, [1.0, 0.0]);
        assert_eq!(mesh.vertices[0].normal, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_negative_indices() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n";
        let mesh = parse_obj(src).unwrap();
        assert_eq!(mesh.vertices[1].pos, [1.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices[2].pos, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_missing_normals_use_face_normal() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let mesh = parse_obj(src).unwrap();
        for v in &mesh.vertices {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
            assert_eq!(v.uv, [0.0, 1.0]);
        }
    }

    #[test]
    fn test_position_normal_form() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 -1\nf 1//1 2//1 3//1\n";
        let mesh = parse_obj(src).unwrap();
        assert_eq!(mesh.vertices[0].normal, [0.0, 0.0, -1.0]);
    }

    #[test]
    fn test_out_of_range_index_reports_line() {
        let src = "v 0 0 0\nv 1 0 0\n\nf 1 2 3\n";
        match parse_obj(src) {
            Err(ObjError::Parse { line, .. }) => assert_eq!(line, 4),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_bad_number_and_empty_file() {
        assert!(matches!(parse_obj("v 0 zero 0\n"), Err(ObjError::Parse { line: 1, .. })));
        assert!(matches!(parse_obj("# nothing here\nv 0 0 0\n"), Err(ObjError::Empty)));
        assert!(matches!(parse_obj("v 0 0 0\nv 1 0 0\nf 1 2\n"), Err(ObjError::Parse { .. })));
    }

    #[test]
    fn test_load_obj_missing_file() {
        let err = load_obj(Path::new("does/not/exist.obj")).unwrap_err();
        assert!(matches!(err, ObjError::Io(_)));
    }

    #[test]
    fn test_single_component_uv_defaults_v() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0.25\nf 1/1 2/1 3/1\n";
        let mesh = parse_obj(src).unwrap();
        assert_eq!(mesh.vertices[0].uv, [0.25, 1.0]);
    }

    #[test]
    fn test_bundled_meshes_parse() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/objects");
        for name in ["plane.obj", "sphere.obj"] {
            let mesh = load_obj(&root.join(name)).unwrap();
            assert!(mesh.triangle_count() > 0, "{name} has no triangles");
            assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
        }
    }
}
