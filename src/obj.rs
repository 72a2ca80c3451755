//! Wavefront OBJ/MTL export and import for plant meshes.
//!
//! The writer emits faces as a running counter (`f 1 2 3`, `f 4 5 6`, ...)
//! instead of reading the index buffer. That is only correct because
//! [`Mesh`] never shares vertices; see its documentation.

use crate::error::{ObjError, ObjResult};
use crate::geometry::BoundingBox;
use crate::interpreter::PlantModel;
use crate::mesh::{
    DEFAULT_DIFFUSE, DEFAULT_MATERIAL_NAME, Material, Mesh, MeshBuilder, TextureRef,
};
use glam::{Vec2, Vec3};
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

const OBJ_HEADER: &str = "# symbios-flora OBJ File";
const MTL_HEADER: &str = "# symbios-flora MTL File";

// ---------------------------------------------------------------------------
// Naming
// ---------------------------------------------------------------------------

/// Object name used inside the OBJ file: the file stem with spaces replaced.
pub fn object_name(stem: &str) -> String {
    stem.replace(' ', "_")
}

/// Material name for `material` in a file exported as `stem`. Only the
/// default grey keeps the shared default name.
pub fn material_name(material: &Material, stem: &str) -> String {
    if material.is_default() {
        DEFAULT_MATERIAL_NAME.to_string()
    } else {
        format!("{}_mat", object_name(stem))
    }
}

// ---------------------------------------------------------------------------
// OBJ Export
// ---------------------------------------------------------------------------

/// Convert a [`Mesh`] to OBJ text referencing `<stem>.mtl`.
pub fn mesh_to_obj(mesh: &Mesh, material: &Material, stem: &str) -> String {
    let mut obj = String::new();
    let textured = mesh.has_tex_coords();

    obj.push_str(&format!("{OBJ_HEADER}\n\n"));
    obj.push_str(&format!("mtllib {stem}.mtl\n"));
    obj.push_str(&format!("\no {}\n", object_name(stem)));

    for p in &mesh.positions {
        obj.push_str(&format!("v {:.6} {:.6} {:.6}\n", p.x, p.y, p.z));
    }
    obj.push_str(&format!("# {} geometric vertices\n", mesh.positions.len()));

    for t in &mesh.tex_coords {
        obj.push_str(&format!("vt {:.6} {:.6}\n", t.x, t.y));
    }
    obj.push_str(&format!("# {} texture vertices\n", mesh.tex_coords.len()));

    obj.push_str(&format!("usemtl {}\n", material_name(material, stem)));
    obj.push_str("s off\n");

    let faces = mesh.triangle_count();
    let mut index = 1;
    for _ in 0..faces {
        let (a, b, c) = (index, index + 1, index + 2);
        if textured {
            obj.push_str(&format!("f {a}/{a} {b}/{b} {c}/{c}\n"));
        } else {
            obj.push_str(&format!("f {a} {b} {c}\n"));
        }
        index += 3;
    }
    obj.push_str(&format!("# {faces} faces\n"));

    obj
}

/// Convert `material` to MTL text for a file exported as `stem`.
pub fn material_to_mtl(material: &Material, stem: &str) -> String {
    let mut mtl = String::new();
    mtl.push_str(&format!("{MTL_HEADER}\n\n"));
    mtl.push_str(&format!("newmtl {}\n", material_name(material, stem)));
    mtl.push_str("Ns 0\n");

    match material {
        Material::Solid(color) => {
            mtl.push_str("Ka 0.6 0.6 0.6\n");
            mtl.push_str(&format!("Kd {:.6} {:.6} {:.6}\n", color.x, color.y, color.z));
            mtl.push_str("Ks 0.8 0.8 0.8\n");
            mtl.push_str("d 1\n");
            mtl.push_str("illum 2\n");
        }
        Material::Texture(texture) => {
            mtl.push_str("Ka 0.0 0.0 0.0\n");
            let d = DEFAULT_DIFFUSE;
            mtl.push_str(&format!("Kd {:.6} {:.6} {:.6}\n", d.x, d.y, d.z));
            mtl.push_str("Ks 0.8 0.8 0.8\n");
            mtl.push_str("d 1\n");
            mtl.push_str("illum 2\n");
            let path = texture.path.display();
            mtl.push_str(&format!("map_Ka {path}\n"));
            mtl.push_str(&format!("map_Kd {path}\n"));
        }
    }

    mtl
}

/// Writes `<path>` and the companion `.mtl` next to it.
///
/// Returns the path of the material file.
pub fn save_obj(path: &Path, mesh: &Mesh, material: &Material) -> ObjResult<PathBuf> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "plant".to_string());
    let mtl_path = path.with_extension("mtl");

    fs::write(path, mesh_to_obj(mesh, material, &stem))?;
    fs::write(&mtl_path, material_to_mtl(material, &stem))?;

    log::debug!(
        "exported {} vertices / {} faces to {}",
        mesh.vertex_count(),
        mesh.triangle_count(),
        path.display()
    );
    Ok(mtl_path)
}

// ---------------------------------------------------------------------------
// OBJ Import
// ---------------------------------------------------------------------------

/// Raw content of an OBJ file.
///
/// Faces are de-indexed on the way in: every triangle corner gets its own
/// copy of the referenced position (and texture coordinate), so `mesh` keeps
/// the same append-only layout the interpreter produces and can be written
/// back out unchanged.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjDocument {
    pub mesh: Mesh,
    /// Bounds of every `v` line.
    pub bounds: BoundingBox,
    pub mtllib: Option<String>,
    pub usemtl: Option<String>,
}

/// Everything after the keyword, trimmed. Keeps embedded spaces.
fn rest_of_line(line: &str) -> String {
    line.trim()
        .split_once(char::is_whitespace)
        .map(|(_, rest)| rest.trim().to_string())
        .unwrap_or_default()
}

fn parse_float<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    line_no: usize,
    what: &str,
) -> ObjResult<f32> {
    let token = tokens
        .next()
        .ok_or_else(|| ObjError::parse(line_no, format!("missing {what} component")))?;
    token
        .parse::<f32>()
        .map_err(|_| ObjError::parse(line_no, format!("invalid number '{token}'")))
}

/// Maps a 1-based OBJ index to a 0-based one. Negative indices count back
/// from the most recent element; zero is never valid.
fn resolve_index(raw: i64, count: usize) -> Option<usize> {
    let resolved = if raw > 0 { raw - 1 } else { count as i64 + raw };
    (raw != 0 && (0..count as i64).contains(&resolved)).then_some(resolved as usize)
}

fn parse_index(token: &str, line_no: usize) -> ObjResult<i64> {
    token
        .parse()
        .map_err(|_| ObjError::parse(line_no, format!("invalid face index '{token}'")))
}

/// One resolved face corner.
#[derive(Clone, Copy)]
struct Corner {
    position: usize,
    tex_coord: Option<usize>,
}

/// Resolves one face corner (`i`, `i/t`, `i/t/n` or `i//n`). Normals are
/// ignored.
fn parse_corner(
    token: &str,
    line_no: usize,
    positions: usize,
    tex_coords: usize,
) -> ObjResult<Corner> {
    let mut parts = token.split('/');
    let raw = parse_index(parts.next().unwrap_or_default(), line_no)?;
    let position = resolve_index(raw, positions).ok_or(ObjError::InvalidIndex {
        line: line_no,
        index: raw,
        count: positions,
    })?;

    let tex_coord = match parts.next().filter(|t| !t.is_empty()) {
        Some(t) => {
            let raw = parse_index(t, line_no)?;
            let index = resolve_index(raw, tex_coords).ok_or(ObjError::InvalidTexCoordIndex {
                line: line_no,
                index: raw,
                count: tex_coords,
            })?;
            Some(index)
        }
        None => None,
    };

    Ok(Corner {
        position,
        tex_coord,
    })
}

/// Parses OBJ text. Unknown keywords are skipped; polygons with more than
/// three corners are fan-triangulated.
///
/// Texture coordinates are kept only when every face corner references one;
/// otherwise the mesh is imported untextured.
pub fn parse_obj<R: BufRead>(reader: R) -> ObjResult<ObjDocument> {
    let mut doc = ObjDocument::default();
    let mut positions: Vec<Vec3> = Vec::new();
    let mut tex_coords: Vec<Vec2> = Vec::new();
    let mut builder = MeshBuilder::new();
    let mut corner_uvs: Vec<Vec2> = Vec::new();
    let mut fully_textured = true;

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = i + 1;
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };

        match keyword {
            "mtllib" => doc.mtllib = Some(rest_of_line(&line)),
            "usemtl" => doc.usemtl = Some(rest_of_line(&line)),
            "v" => {
                let x = parse_float(&mut tokens, line_no, "x")?;
                let y = parse_float(&mut tokens, line_no, "y")?;
                let z = parse_float(&mut tokens, line_no, "z")?;
                let p = Vec3::new(x, y, z);
                positions.push(p);
                doc.bounds.include(p);
            }
            "vt" => {
                let u = parse_float(&mut tokens, line_no, "u")?;
                let v = parse_float(&mut tokens, line_no, "v")?;
                tex_coords.push(Vec2::new(u, v));
            }
            "f" => {
                let corners = tokens
                    .map(|t| parse_corner(t, line_no, positions.len(), tex_coords.len()))
                    .collect::<ObjResult<Vec<Corner>>>()?;
                if corners.len() < 3 {
                    return Err(ObjError::parse(
                        line_no,
                        format!("face has {} corner(s), need at least 3", corners.len()),
                    ));
                }
                for k in 1..corners.len() - 1 {
                    let tri = [corners[0], corners[k], corners[k + 1]];
                    builder.add_triangle(tri.map(|c| positions[c.position]));
                    for corner in tri {
                        match corner.tex_coord {
                            Some(t) => corner_uvs.push(tex_coords[t]),
                            None => fully_textured = false,
                        }
                    }
                }
            }
            _ => {}
        }
    }

    doc.mesh = builder.build();
    if fully_textured && corner_uvs.len() == doc.mesh.positions.len() {
        doc.mesh.tex_coords = corner_uvs;
    } else if !corner_uvs.is_empty() {
        log::debug!("some face corners lack texture coordinates; importing untextured");
    }

    Ok(doc)
}

/// The parts of one `newmtl` block this crate understands.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MtlEntry {
    /// `Kd` color.
    pub diffuse: Option<Vec3>,
    /// `map_Ka`, falling back to `map_Kd`.
    pub texture: Option<PathBuf>,
}

impl MtlEntry {
    /// The material this entry describes. A texture wins over a color;
    /// relative texture paths resolve against `base_dir`.
    pub fn to_material(&self, base_dir: &Path) -> Material {
        match (&self.texture, self.diffuse) {
            (Some(path), _) => Material::Texture(TextureRef::from_path(base_dir.join(path))),
            (None, Some(color)) => Material::Solid(color),
            (None, None) => Material::default(),
        }
    }
}

/// Reads the `newmtl` block called `material_name` from MTL text.
pub fn parse_mtl<R: BufRead>(reader: R, material_name: &str) -> ObjResult<MtlEntry> {
    let mut current = String::new();
    let mut entry = MtlEntry::default();
    let mut ambient_map = None;
    let mut diffuse_map = None;

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };
        if keyword == "newmtl" {
            current = rest_of_line(&line);
            continue;
        }
        if current != material_name {
            continue;
        }
        match keyword {
            "Kd" => {
                let line_no = i + 1;
                let r = parse_float(&mut tokens, line_no, "red")?;
                let g = parse_float(&mut tokens, line_no, "green")?;
                let b = parse_float(&mut tokens, line_no, "blue")?;
                entry.diffuse = Some(Vec3::new(r, g, b));
            }
            "map_Ka" => ambient_map = Some(PathBuf::from(rest_of_line(&line))),
            "map_Kd" => diffuse_map = Some(PathBuf::from(rest_of_line(&line))),
            _ => {}
        }
    }

    entry.texture = ambient_map.or(diffuse_map);
    Ok(entry)
}

/// Loads an OBJ file and the material it references.
///
/// The companion MTL file is only read when `usemtl` names something other
/// than the default material. Relative `mtllib` and texture paths resolve
/// against the OBJ file's directory. Any failure discards everything read so
/// far.
pub fn load_obj(path: &Path) -> ObjResult<PlantModel> {
    let doc = parse_obj(BufReader::new(File::open(path)?))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));

    let material = match (&doc.mtllib, &doc.usemtl) {
        (Some(lib), Some(used))
            if !lib.is_empty() && !used.is_empty() && used != DEFAULT_MATERIAL_NAME =>
        {
            let mtl_path = base_dir.join(lib);
            parse_mtl(BufReader::new(File::open(&mtl_path)?), used)?.to_material(base_dir)
        }
        _ => Material::default(),
    };

    log::debug!(
        "imported {} vertices / {} faces from {}",
        doc.mesh.vertex_count(),
        doc.mesh.triangle_count(),
        path.display()
    );
    Ok(PlantModel::from_parts(doc.mesh, doc.bounds, material))
}
