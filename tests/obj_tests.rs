use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs;
use std::io::Cursor;
use std::path::PathBuf;
use symbios_flora::obj::{
    MtlEntry, load_obj, material_to_mtl, mesh_to_obj, parse_mtl, parse_obj, save_obj,
};
use symbios_flora::{
    Grammar, Material, Mesh, MeshBuilder, ModelParams, ObjError, PlantInterpreter, PlantModel,
    TextureRef,
};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("symbios_flora_{name}_{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn plant(material: &Material) -> PlantModel {
    let commands = Grammar::new("F", "F:F[+F]F[-F]F", 2).derive();
    let mut rng = StdRng::seed_from_u64(11);
    PlantInterpreter::new(ModelParams::default()).build(&commands, material, &mut rng)
}

fn triangle() -> Mesh {
    let mut builder = MeshBuilder::new();
    builder.add_triangle([Vec3::ZERO, Vec3::X, Vec3::Y]);
    builder.build()
}

#[test]
fn test_obj_layout() {
    let obj = mesh_to_obj(&triangle(), &Material::default(), "my tree");
    let lines: Vec<&str> = obj.lines().collect();

    assert!(lines[0].starts_with('#'));
    assert!(lines.contains(&"mtllib my tree.mtl"));
    assert!(lines.contains(&"o my_tree"));
    assert!(lines.contains(&"v 1.000000 0.000000 0.000000"));
    assert!(lines.contains(&"usemtl default_grey"));
    assert!(lines.contains(&"f 1 2 3"));
    assert!(lines.contains(&"# 3 geometric vertices"));
    assert!(lines.contains(&"# 0 texture vertices"));
    assert!(lines.contains(&"# 1 faces"));
    assert!(!obj.contains("vt "));
}

#[test]
fn test_faces_use_running_counter() {
    let mut builder = MeshBuilder::new();
    builder.add_triangle([Vec3::ZERO, Vec3::X, Vec3::Y]);
    builder.add_triangle([Vec3::Z, Vec3::X, Vec3::Y]);
    let obj = mesh_to_obj(&builder.build(), &Material::default(), "two");

    let faces: Vec<&str> = obj.lines().filter(|l| l.starts_with("f ")).collect();
    assert_eq!(faces, vec!["f 1 2 3", "f 4 5 6"]);
}

#[test]
fn test_textured_faces_reference_tex_coords() {
    let mut builder = MeshBuilder::new();
    builder.add_textured_triangle(
        [Vec3::ZERO, Vec3::X, Vec3::Y],
        [Vec2::ZERO, Vec2::Y, Vec2::X],
    );
    let material = Material::Texture(TextureRef::new("bark", "bark.png"));
    let obj = mesh_to_obj(&builder.build(), &material, "oak");

    assert!(obj.lines().any(|l| l == "vt 0.000000 1.000000"));
    assert!(obj.lines().any(|l| l == "f 1/1 2/2 3/3"));
    assert!(obj.lines().any(|l| l == "usemtl oak_mat"));
}

#[test]
fn test_mtl_content() {
    let solid = material_to_mtl(&Material::default(), "oak");
    assert!(solid.contains("newmtl default_grey"));
    assert!(solid.contains("Kd 0.800000 0.800000 0.800000"));
    assert!(!solid.contains("map_"));

    let textured = material_to_mtl(&Material::Texture(TextureRef::new("bark", "bark.png")), "oak");
    assert!(textured.contains("newmtl oak_mat"));
    assert!(textured.contains("map_Ka bark.png"));
    assert!(textured.contains("map_Kd bark.png"));
}

#[test]
fn test_round_trip_solid() {
    let dir = scratch_dir("solid");
    let path = dir.join("tree.obj");
    let exported = plant(&Material::default());

    let mtl = save_obj(&path, &exported.mesh, &exported.material).unwrap();
    assert_eq!(mtl, dir.join("tree.mtl"));
    assert!(mtl.exists());

    let loaded = load_obj(&path).unwrap();
    assert_eq!(loaded.mesh.vertex_count(), exported.mesh.vertex_count());
    assert_eq!(loaded.mesh.triangle_count(), exported.mesh.triangle_count());
    assert_eq!(loaded.mesh.indices, exported.mesh.indices);
    assert!(loaded.mesh.tex_coords.is_empty());
    assert_eq!(loaded.material, Material::default());

    // Positions survive at the written precision.
    for (a, b) in loaded.mesh.positions.iter().zip(&exported.mesh.positions) {
        assert!(a.abs_diff_eq(*b, 1e-4), "{a} != {b}");
    }

    // Bounds are recomputed from the vertex lines.
    let centered = loaded.centered_bounds();
    assert!(centered.center().abs_diff_eq(Vec3::ZERO, 1e-4));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_round_trip_textured() {
    let dir = scratch_dir("textured");
    let path = dir.join("birch.obj");
    let material = Material::Texture(TextureRef::new("bark", "bark.png"));
    let exported = plant(&material);

    save_obj(&path, &exported.mesh, &exported.material).unwrap();
    let loaded = load_obj(&path).unwrap();

    assert_eq!(loaded.mesh.vertex_count(), exported.mesh.vertex_count());
    assert_eq!(loaded.mesh.tex_coords.len(), exported.mesh.tex_coords.len());
    assert_eq!(loaded.mesh.triangle_count(), exported.mesh.triangle_count());

    let texture = loaded.material.texture().expect("texture material");
    assert_eq!(texture.path, dir.join("bark.png"));
    assert_eq!(texture.name, "bark.png");

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_missing_mtl_aborts_import() {
    let dir = scratch_dir("missing_mtl");
    let path = dir.join("oak.obj");
    let material = Material::Texture(TextureRef::new("bark", "bark.png"));
    save_obj(&path, &triangle(), &material).unwrap();
    fs::remove_file(dir.join("oak.mtl")).unwrap();

    assert!(matches!(load_obj(&path), Err(ObjError::Io(_))));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_default_material_skips_mtl() {
    let dir = scratch_dir("no_mtl");
    let path = dir.join("plain.obj");
    save_obj(&path, &triangle(), &Material::default()).unwrap();
    fs::remove_file(dir.join("plain.mtl")).unwrap();

    let loaded = load_obj(&path).unwrap();
    assert_eq!(loaded.material, Material::default());
    assert_eq!(loaded.mesh.triangle_count(), 1);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_missing_file_is_io_error() {
    let path = std::env::temp_dir().join("symbios_flora_does_not_exist.obj");
    assert!(matches!(load_obj(&path), Err(ObjError::Io(_))));
}

#[test]
fn test_parse_fan_and_negative_indices() {
    let text = "\
# quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vn 0 0 1
f 1//1 2//1 3//1 4//1
f -4 -3 -1
";
    let doc = parse_obj(Cursor::new(text)).unwrap();

    // Every triangle corner gets its own vertex.
    assert_eq!(doc.mesh.triangle_count(), 3);
    assert_eq!(doc.mesh.vertex_count(), 9);
    assert_eq!(doc.mesh.indices, (0..9).collect::<Vec<u32>>());

    let corners = [0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];
    let v = |i: usize| Vec3::new(corners[2 * i], corners[2 * i + 1], 0.0);
    let expected = [v(0), v(1), v(2), v(0), v(2), v(3), v(0), v(1), v(3)];
    assert_eq!(doc.mesh.positions, expected);

    assert!(doc.mesh.tex_coords.is_empty());
    assert_eq!(doc.bounds.min, Vec3::ZERO);
    assert_eq!(doc.bounds.max, Vec3::new(1.0, 1.0, 0.0));
    assert!(doc.mtllib.is_none());
}

#[test]
fn test_shared_vertices_survive_reexport() {
    let text = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
    let first = parse_obj(Cursor::new(text)).unwrap();

    let obj = mesh_to_obj(&first.mesh, &Material::default(), "quad");
    let second = parse_obj(Cursor::new(obj)).unwrap();

    assert_eq!(second.mesh.triangle_count(), 2);
    assert_eq!(second.mesh.vertex_count(), first.mesh.vertex_count());
    assert_eq!(second.mesh.positions, first.mesh.positions);
    assert!(second.mesh.is_valid());
}

#[test]
fn test_face_tex_coords_follow_corners() {
    let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0.25 0.75
vt 0.5 0.5
f 1/2 2/1 3/-1
";
    let doc = parse_obj(Cursor::new(text)).unwrap();
    let (a, b) = (Vec2::new(0.25, 0.75), Vec2::new(0.5, 0.5));
    assert_eq!(doc.mesh.tex_coords, vec![b, a, b]);

    // One UV per vertex, so a textured re-export stays consistent.
    let material = Material::Texture(TextureRef::new("bark", "bark.png"));
    let obj = mesh_to_obj(&doc.mesh, &material, "leaf");
    assert_eq!(obj.lines().filter(|l| l.starts_with("vt ")).count(), 3);
    let again = parse_obj(Cursor::new(obj)).unwrap();
    assert_eq!(again.mesh.tex_coords, doc.mesh.tex_coords);
}

#[test]
fn test_partial_tex_coords_are_dropped() {
    let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
f 1/1 2/1 3/1
f 1 2 3
";
    let doc = parse_obj(Cursor::new(text)).unwrap();
    assert_eq!(doc.mesh.triangle_count(), 2);
    assert!(doc.mesh.tex_coords.is_empty());
}

#[test]
fn test_parse_material_directives() {
    let text = "mtllib my plant.mtl\nusemtl my_plant_mat\nv 0 0 0\n";
    let doc = parse_obj(Cursor::new(text)).unwrap();
    assert_eq!(doc.mtllib.as_deref(), Some("my plant.mtl"));
    assert_eq!(doc.usemtl.as_deref(), Some("my_plant_mat"));
}

#[test]
fn test_parse_errors() {
    let err = parse_obj(Cursor::new("v 0 0 0\nv 1 zero 0\n")).unwrap_err();
    assert!(matches!(err, ObjError::Parse { line: 2, .. }), "{err}");

    let err = parse_obj(Cursor::new("v 0 0\n")).unwrap_err();
    assert!(matches!(err, ObjError::Parse { line: 1, .. }), "{err}");

    let err = parse_obj(Cursor::new("v 0 0 0\nv 1 0 0\nf 1 2\n")).unwrap_err();
    assert!(matches!(err, ObjError::Parse { line: 3, .. }), "{err}");

    let err = parse_obj(Cursor::new("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 4\n")).unwrap_err();
    assert!(
        matches!(
            err,
            ObjError::InvalidIndex {
                line: 4,
                index: 4,
                count: 3
            }
        ),
        "{err}"
    );

    let err = parse_obj(Cursor::new("v 0 0 0\nf 0 1 1\n")).unwrap_err();
    assert!(matches!(err, ObjError::InvalidIndex { index: 0, .. }));

    let err = parse_obj(Cursor::new("v 0 0 0\nf -2 1 1\n")).unwrap_err();
    assert!(matches!(err, ObjError::InvalidIndex { index: -2, .. }));

    let err = parse_obj(Cursor::new("v 0 0 0\nvt 0 0\nf 1/1 1/2 1/1\n")).unwrap_err();
    assert!(
        matches!(
            err,
            ObjError::InvalidTexCoordIndex {
                line: 3,
                index: 2,
                count: 1
            }
        ),
        "{err}"
    );
}

#[test]
fn test_parse_mtl_picks_named_block() {
    let text = "\
newmtl other
map_Ka other.png
Kd 1 0 0
newmtl oak_mat
Ka 0 0 0
Kd 0.1 0.2 0.3
map_Kd diffuse only.png
";
    let entry = parse_mtl(Cursor::new(text), "oak_mat").unwrap();
    assert_eq!(entry.texture, Some(PathBuf::from("diffuse only.png")));
    assert_eq!(entry.diffuse, Some(Vec3::new(0.1, 0.2, 0.3)));

    let text = "newmtl oak_mat\nmap_Kd kd.png\nmap_Ka ka.png\n";
    let entry = parse_mtl(Cursor::new(text), "oak_mat").unwrap();
    assert_eq!(entry.texture, Some(PathBuf::from("ka.png")));
    assert_eq!(entry.diffuse, None);

    assert_eq!(parse_mtl(Cursor::new(text), "missing").unwrap(), MtlEntry::default());

    let err = parse_mtl(Cursor::new("newmtl m\nKd 1 x 0\n"), "m").unwrap_err();
    assert!(matches!(err, ObjError::Parse { line: 2, .. }), "{err}");
}

#[test]
fn test_custom_solid_color_round_trip() {
    let dir = scratch_dir("solid_color");
    let path = dir.join("red maple.obj");
    let material = Material::Solid(Vec3::new(0.5, 0.25, 0.125));

    save_obj(&path, &triangle(), &material).unwrap();
    let obj = fs::read_to_string(&path).unwrap();
    assert!(obj.lines().any(|l| l == "usemtl red_maple_mat"));

    let loaded = load_obj(&path).unwrap();
    assert_eq!(loaded.material, material);

    fs::remove_dir_all(&dir).ok();
}
