use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use obj::raw::object::Polygon;
use obj::raw::{parse_obj, RawObj};

use crate::error::{RenderError, RenderResult};
use crate::matrix::Matrix;
use crate::script::Op;
use crate::shapes::add_polygon;

/// Meshes referenced by a script, parsed once and shared by every frame.
#[derive(Debug, Clone, Default)]
pub struct MeshCache {
    meshes: HashMap<PathBuf, Matrix>,
}

impl MeshCache {
    /// Parses every file named by a `mesh` op. The first unreadable file aborts the run.
    pub fn load(ops: &[Op]) -> RenderResult<MeshCache> {
        let mut cache = MeshCache::default();
        for op in ops {
            if let Op::Mesh { file, .. } = op {
                if !cache.meshes.contains_key(file) {
                    let polygons = parse_mesh(file)?;
                    tracing::info!(path = %file.display(), triangles = polygons.lastcol() / 3, "mesh cached");
                    cache.meshes.insert(file.clone(), polygons);
                }
            }
        }
        return Ok(cache);
    }

    pub fn get(&self, path: &Path) -> Option<&Matrix> {
        self.meshes.get(path)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

/// Loads a mesh file into a polygon matrix.
/// An unreadable or malformed file is fatal for the run.
pub fn parse_mesh(path: &Path) -> RenderResult<Matrix> {
    let file = File::open(path)
        .map_err(|e| RenderError::mesh(format!("{}: could not be opened: {e}", path.display())))?;
    return read_mesh(BufReader::new(file))
        .map_err(|e| RenderError::mesh(format!("{}: {e}", path.display())));
}

/// Reads `v x y z` and `f a b c [d]` lines. Every face yields one triangle built from its
/// first three vertices; a fourth index is ignored.
// @TODO quads lose their second half (a, c, d). Fan triangulation would fix it but changes
// the output of existing scenes.
pub fn read_mesh<R: BufRead>(reader: R) -> RenderResult<Matrix> {
    let raw: RawObj = parse_obj(reader).map_err(|e| RenderError::mesh(e.to_string()))?;
    let mut polygons = Matrix::points(raw.polygons.len().max(1) * 3);

    for polygon in &raw.polygons {
        let indices: Vec<usize> = match polygon {
            Polygon::P(v) => v.clone(),
            Polygon::PT(v) => v.iter().map(|(p, _)| *p).collect(),
            Polygon::PN(v) => v.iter().map(|(p, _)| *p).collect(),
            Polygon::PTN(v) => v.iter().map(|(p, _, _)| *p).collect(),
        };
        if indices.len() < 3 {
            continue;
        }

        let mut corners = [[0.0f64; 3]; 3];
        for (corner, index) in corners.iter_mut().zip(&indices[..3]) {
            let (x, y, z, _) = raw
                .positions
                .get(*index)
                .ok_or_else(|| RenderError::mesh(format!("face references missing vertex {}", index + 1)))?;
            *corner = [*x as f64, *y as f64, *z as f64];
        }
        let [a, b, c] = corners;
        add_polygon(&mut polygons, a[0], a[1], a[2], b[0], b[1], b[2], c[0], c[1], c[2]);
    }

    tracing::debug!(vertices = raw.positions.len(), triangles = polygons.lastcol() / 3, "mesh loaded");
    return Ok(polygons);
}
