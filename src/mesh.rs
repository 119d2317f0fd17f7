//! Triangle-soup meshes.
//!
//! A [`Mesh`] stores three positions per triangle with no index buffer, plus
//! a parallel list of texture coordinates. That layout maps one-to-one onto
//! draw jobs: triangle `i` is positions `3i..3i+3`.

use std::path::Path;

use crate::error::{Error, Result};
use crate::math::mat4::Mat4;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;

/// One triangle of a mesh in object space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriangleRef {
    pub positions: [Vec3; 3],
    pub tex_coords: [Vec2; 3],
}

#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    name: String,
    positions: Vec<Vec3>,
    tex_coords: Vec<Vec2>,
    texture_id: usize,
    transform: Mat4,
}

impl Mesh {
    /// Creates a mesh from a triangle soup.
    ///
    /// `positions` and `tex_coords` must have the same length, and that length
    /// must be a multiple of 3.
    pub fn new(
        name: impl Into<String>,
        positions: Vec<Vec3>,
        tex_coords: Vec<Vec2>,
        texture_id: usize,
    ) -> Result<Self> {
        if positions.len() != tex_coords.len() || positions.len() % 3 != 0 {
            return Err(Error::MeshLayout {
                positions: positions.len(),
                tex_coords: tex_coords.len(),
            });
        }
        Ok(Self {
            name: name.into(),
            positions,
            tex_coords,
            texture_id,
            transform: Mat4::identity(),
        })
    }

    /// Load every model in an OBJ file as a separate mesh.
    ///
    /// Faces are triangulated and indices expanded into a triangle soup.
    /// Models without texture coordinates get `(0, 0)` for every vertex.
    pub fn load_obj<P: AsRef<Path>>(path: P, texture_id: usize) -> Result<Vec<Mesh>> {
        let path = path.as_ref();
        let (models, _materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        )?;

        let meshes = models
            .into_iter()
            .map(|model| {
                let mesh = &model.mesh;
                let mut positions = Vec::with_capacity(mesh.indices.len());
                let mut tex_coords = Vec::with_capacity(mesh.indices.len());
                for &index in &mesh.indices {
                    let i = index as usize;
                    positions.push(Vec3::new(
                        mesh.positions[3 * i],
                        mesh.positions[3 * i + 1],
                        mesh.positions[3 * i + 2],
                    ));
                    let uv = if mesh.texcoords.len() >= 2 * i + 2 {
                        Vec2::new(mesh.texcoords[2 * i], mesh.texcoords[2 * i + 1])
                    } else {
                        Vec2::ZERO
                    };
                    tex_coords.push(uv);
                }
                Mesh::new(model.name, positions, tex_coords, texture_id)
            })
            .collect::<Result<Vec<_>>>()?;

        log::info!("loaded {} mesh(es) from {}", meshes.len(), path.display());
        Ok(meshes)
    }

    /// A unit quad in the XY plane facing -Z (toward a camera at the origin
    /// looking down +Z), spanning [-1, 1] on both axes.
    pub fn quad(texture_id: usize) -> Self {
        let (bl, tl, tr, br) = (
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(-1.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
        );
        let (uv_bl, uv_tl, uv_tr, uv_br) = (
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 0.0),
        );
        Self {
            name: "quad".to_string(),
            positions: vec![bl, tl, tr, bl, tr, br],
            tex_coords: vec![uv_bl, uv_tl, uv_tr, uv_bl, uv_tr, uv_br],
            texture_id,
            transform: Mat4::identity(),
        }
    }

    /// A cube spanning [-1, 1] on every axis with outward-facing triangles.
    pub fn cube(texture_id: usize) -> Self {
        const CORNERS: [Vec3; 8] = [
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
            Vec3::new(-1.0, -1.0, 1.0),
        ];
        // Each face as (bottom-left, top-left, top-right, bottom-right) seen
        // from outside.
        const FACES: [[usize; 4]; 6] = [
            [0, 1, 2, 3], // front
            [3, 2, 4, 5], // right
            [5, 4, 6, 7], // back
            [7, 6, 1, 0], // left
            [1, 6, 4, 2], // top
            [5, 7, 0, 3], // bottom
        ];
        let uv = [
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 0.0),
        ];

        let mut positions = Vec::with_capacity(36);
        let mut tex_coords = Vec::with_capacity(36);
        for face in FACES {
            for corner in [0, 1, 2, 0, 2, 3] {
                positions.push(CORNERS[face[corner]]);
                tex_coords.push(uv[corner]);
            }
        }
        Self {
            name: "cube".to_string(),
            positions,
            tex_coords,
            texture_id,
            transform: Mat4::identity(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn tex_coords(&self) -> &[Vec2] {
        &self.tex_coords
    }

    pub fn texture_id(&self) -> usize {
        self.texture_id
    }

    pub fn set_texture_id(&mut self, texture_id: usize) {
        self.texture_id = texture_id;
    }

    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// The model matrix applied to every vertex.
    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
    }

    /// Iterates consecutive, non-overlapping vertex triples.
    pub fn triangles(&self) -> impl Iterator<Item = TriangleRef> + '_ {
        self.positions
            .chunks_exact(3)
            .zip(self.tex_coords.chunks_exact(3))
            .map(|(p, t)| TriangleRef {
                positions: [p[0], p[1], p[2]],
                tex_coords: [t[0], t[1], t[2]],
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outward_normal(t: &TriangleRef) -> Vec3 {
        let [a, b, c] = t.positions;
        (b - a).cross(c - a)
    }

    #[test]
    fn new_rejects_mismatched_layout() {
        let err = Mesh::new("bad", vec![Vec3::ZERO; 3], vec![Vec2::ZERO; 2], 0);
        assert!(matches!(
            err,
            Err(Error::MeshLayout {
                positions: 3,
                tex_coords: 2
            })
        ));
        assert!(Mesh::new("bad", vec![Vec3::ZERO; 4], vec![Vec2::ZERO; 4], 0).is_err());
    }

    #[test]
    fn triangles_are_consecutive_triples() {
        let positions: Vec<Vec3> = (0..6).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();
        let uvs: Vec<Vec2> = (0..6).map(|i| Vec2::new(0.0, i as f32)).collect();
        let mesh = Mesh::new("strip", positions, uvs, 1).unwrap();

        let tris: Vec<_> = mesh.triangles().collect();
        assert_eq!(tris.len(), 2);
        assert_eq!(tris[1].positions[0].x, 3.0);
        assert_eq!(tris[1].positions[2].x, 5.0);
        assert_eq!(tris[1].tex_coords[1].y, 4.0);
    }

    #[test]
    fn quad_faces_negative_z() {
        let quad = Mesh::quad(0);
        assert_eq!(quad.triangle_count(), 2);
        for tri in quad.triangles() {
            assert!(outward_normal(&tri).z < 0.0);
        }
    }

    #[test]
    fn cube_triangles_face_outward() {
        let cube = Mesh::cube(0);
        assert_eq!(cube.triangle_count(), 12);
        for tri in cube.triangles() {
            let [a, b, c] = tri.positions;
            let centroid = (a + b + c) / 3.0;
            assert!(outward_normal(&tri).dot(centroid) > 0.0);
        }
    }

    #[test]
    fn load_obj_expands_indices() {
        let path = std::env::temp_dir().join(format!("trirast-mesh-{}.obj", std::process::id()));
        std::fs::write(
            &path,
            "o square\n\
             v -1 -1 0\nv -1 1 0\nv 1 1 0\nv 1 -1 0\n\
             vt 0 0\nvt 0 1\nvt 1 1\nvt 1 0\n\
             f 1/1 2/2 3/3 4/4\n",
        )
        .unwrap();

        let meshes = Mesh::load_obj(&path, 7);
        let _ = std::fs::remove_file(&path);
        let meshes = meshes.unwrap();

        assert_eq!(meshes.len(), 1);
        let mesh = &meshes[0];
        assert_eq!(mesh.name(), "square");
        assert_eq!(mesh.texture_id(), 7);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.positions()[0], Vec3::new(-1.0, -1.0, 0.0));
        assert_eq!(mesh.tex_coords()[0], Vec2::new(0.0, 0.0));
    }

    #[test]
    fn load_obj_reports_missing_file() {
        assert!(matches!(
            Mesh::load_obj("no/such/mesh.obj", 0),
            Err(Error::ObjLoad(_))
        ));
    }
}
