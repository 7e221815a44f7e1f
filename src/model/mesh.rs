use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use wavefront_obj::obj::{self, Primitive, VTNIndex};

use crate::config::MeshPaths;
use crate::error::MeshError;

/// Flat, de-indexed triangle list with one position, UV and normal per vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    positions: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    normals: Vec<[f32; 3]>,
}

impl Mesh {
    /// Read and parse an OBJ file.
    pub fn load(path: &Path) -> Result<Self, MeshError> {
        let source = fs::read_to_string(path).map_err(|source| MeshError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mesh = Self::from_obj_str(&source, path)?;
        debug!("Parsed {:?}", path);
        Ok(mesh)
    }

    /// Parse OBJ text. `path` only labels errors.
    ///
    /// Every face corner must carry position, UV and normal indices. Polygons
    /// are fan-triangulated by the parser; points and lines are skipped.
    pub fn from_obj_str(source: &str, path: &Path) -> Result<Self, MeshError> {
        let obj_set = obj::parse(source.to_string()).map_err(|e| MeshError::Parse {
            path: path.to_path_buf(),
            line: e.line_number,
            message: e.message,
        })?;

        let mut mesh = Mesh {
            positions: Vec::new(),
            uvs: Vec::new(),
            normals: Vec::new(),
        };

        for object in &obj_set.objects {
            let corners = DeindexContext { path, object };
            for geometry in &object.geometry {
                for shape in &geometry.shapes {
                    match &shape.primitive {
                        Primitive::Triangle(a, b, c) => {
                            for corner in [*a, *b, *c] {
                                corners.push(&mut mesh, corner)?;
                            }
                        }
                        Primitive::Point(_) | Primitive::Line(_, _) => {
                            debug!("Skipping non-triangle primitive in {:?}", path);
                        }
                    }
                }
            }
        }

        if mesh.positions.is_empty() {
            return Err(MeshError::Empty {
                path: path.to_path_buf(),
            });
        }
        Ok(mesh)
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn uvs(&self) -> &[[f32; 2]] {
        &self.uvs
    }

    pub fn normals(&self) -> &[[f32; 3]] {
        &self.normals
    }

    pub fn vertex_count(&self) -> u32 {
        self.positions.len() as u32
    }
}

struct DeindexContext<'a> {
    path: &'a Path,
    object: &'a obj::Object,
}

impl DeindexContext<'_> {
    fn push(&self, mesh: &mut Mesh, (vi, ti, ni): VTNIndex) -> Result<(), MeshError> {
        let ti = ti.ok_or_else(|| self.missing("texture coordinate"))?;
        let ni = ni.ok_or_else(|| self.missing("normal"))?;

        let v = self.lookup(&self.object.vertices, vi, "vertex")?;
        let t = self.lookup(&self.object.tex_vertices, ti, "texture coordinate")?;
        let n = self.lookup(&self.object.normals, ni, "normal")?;

        mesh.positions.push([v.x as f32, v.y as f32, v.z as f32]);
        mesh.uvs.push([t.u as f32, t.v as f32]);
        mesh.normals.push([n.x as f32, n.y as f32, n.z as f32]);
        Ok(())
    }

    fn lookup<'v, T>(&self, items: &'v [T], index: usize, attribute: &'static str) -> Result<&'v T, MeshError> {
        items.get(index).ok_or_else(|| MeshError::IndexOutOfRange {
            path: self.path.to_path_buf(),
            attribute,
            index,
            len: items.len(),
        })
    }

    fn missing(&self, attribute: &'static str) -> MeshError {
        MeshError::MissingAttribute {
            path: self.path.to_path_buf(),
            attribute,
        }
    }
}

/// The three distinct meshes of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshId {
    Hangar,
    Torpedo,
    Bola,
}

impl MeshId {
    pub const ALL: [MeshId; 3] = [MeshId::Hangar, MeshId::Torpedo, MeshId::Bola];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            MeshId::Hangar => "hangar",
            MeshId::Torpedo => "nave_torpedo",
            MeshId::Bola => "nave_bola",
        }
    }
}

/// Loaded meshes, one per [`MeshId`]. The hangar mesh is shared by both hangars.
#[derive(Debug, Clone)]
pub struct MeshStore {
    meshes: [Mesh; 3],
}

impl MeshStore {
    /// Load all meshes; the first failure aborts startup.
    pub fn load(paths: &MeshPaths) -> Result<Self, MeshError> {
        Ok(Self {
            meshes: [
                Mesh::load(&paths.hangar)?,
                Mesh::load(&paths.torpedo)?,
                Mesh::load(&paths.bola)?,
            ],
        })
    }

    pub fn get(&self, id: MeshId) -> &Mesh {
        &self.meshes[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (MeshId, &Mesh)> {
        MeshId::ALL.into_iter().map(move |id| (id, self.get(id)))
    }
}

/// Resolve the configured mesh paths against a base directory.
pub fn resolve_mesh_paths(paths: &MeshPaths, base: &Path) -> MeshPaths {
    let join = |p: &PathBuf| if p.is_absolute() { p.clone() } else { base.join(p) };
    MeshPaths {
        hangar: join(&paths.hangar),
        torpedo: join(&paths.torpedo),
        bola: join(&paths.bola),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "\
o quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1 4/4/1
";

    #[test]
    fn test_quad_is_deindexed_into_two_triangles() {
        let mesh = Mesh::from_obj_str(QUAD, Path::new("quad.obj")).unwrap();
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.positions().len(), mesh.uvs().len());
        assert_eq!(mesh.positions().len(), mesh.normals().len());
        assert!(mesh.normals().iter().all(|n| *n == [0.0, 0.0, 1.0]));
        // every corner of the fan comes from the quad
        for p in mesh.positions() {
            assert!(p[0] == 0.0 || p[0] == 1.0);
            assert_eq!(p[2], 0.0);
        }
    }

    #[test]
    fn test_corner_attributes_stay_paired() {
        let mesh = Mesh::from_obj_str(QUAD, Path::new("quad.obj")).unwrap();
        for (p, uv) in mesh.positions().iter().zip(mesh.uvs()) {
            assert_eq!([p[0], p[1]], *uv, "uv must follow its position");
        }
    }

    #[test]
    fn test_face_without_normals_is_rejected() {
        let src = "o flat\nv 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nf 1/1 2/1 3/1\n";
        let err = Mesh::from_obj_str(src, Path::new("flat.obj")).unwrap_err();
        assert!(matches!(err, MeshError::MissingAttribute { attribute: "normal", .. }));
    }

    #[test]
    fn test_face_without_uvs_is_rejected() {
        let src = "o bare\nv 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n";
        let err = Mesh::from_obj_str(src, Path::new("bare.obj")).unwrap_err();
        assert!(matches!(
            err,
            MeshError::MissingAttribute { attribute: "texture coordinate", .. }
        ));
    }

    #[test]
    fn test_file_without_faces_is_empty() {
        let err = Mesh::from_obj_str("o dots\nv 0 0 0\n", Path::new("dots.obj")).unwrap_err();
        assert!(matches!(err, MeshError::Empty { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Mesh::load(Path::new("assets/Obj/nope.obj")).unwrap_err();
        assert!(matches!(err, MeshError::Io { .. }));
    }

    #[test]
    fn test_bundled_assets_load() {
        let base = Path::new(env!("CARGO_MANIFEST_DIR"));
        let store = MeshStore::load(&resolve_mesh_paths(&MeshPaths::default(), base)).unwrap();
        for (id, mesh) in store.iter() {
            assert!(mesh.vertex_count() > 0, "{} is empty", id.label());
            assert_eq!(mesh.vertex_count() % 3, 0, "{} is not a triangle list", id.label());
        }
    }

    #[test]
    fn test_resolve_keeps_absolute_paths() {
        let paths = MeshPaths {
            hangar: PathBuf::from("/abs/hangar.obj"),
            ..MeshPaths::default()
        };
        let resolved = resolve_mesh_paths(&paths, Path::new("/base"));
        assert_eq!(resolved.hangar, PathBuf::from("/abs/hangar.obj"));
        assert_eq!(resolved.torpedo, Path::new("/base").join(MeshPaths::default().torpedo));
    }
}
