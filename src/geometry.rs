use asset::obj;
use error::SourceError;
use geom::prelude::*;
use geom::{TupleTriangle, Vec2, Vec3, Vertex};
use scene::Mesh;
use spatial::Octree;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use stl_io;

/// Distance to move past a surface crossing before casting the next ray of
/// a parity test.
const PARITY_STEP: f32 = 0.0001;
/// Upper bound on surface crossings considered in a single parity test.
const MAX_CROSSINGS: usize = 10_000;

/// Triangulated surface of the experimental apparatus.
#[derive(Debug, Clone)]
pub struct Geometry {
    triangles: Vec<TupleTriangle<Vertex>>,
}

impl Geometry {
    pub fn new<I>(triangles: I) -> Self
    where
        I: IntoIterator<Item = TupleTriangle<Vertex>>,
    {
        Geometry {
            triangles: triangles.into_iter().collect(),
        }
    }

    /// Loads all triangles of an STL file, or of all entities in an OBJ file.
    pub fn load(path: &str) -> Result<Self, SourceError> {
        load_triangles(path).map(Geometry::new)
    }

    pub fn triangles(&self) -> &[TupleTriangle<Vertex>] {
        &self.triangles
    }
}

/// Region of space enclosed by a closed triangle mesh.
pub struct Solid {
    octree: Octree<TupleTriangle<Vertex>>,
    min: Vec3,
    max: Vec3,
}

impl Solid {
    /// Builds the spatial index over the given closed mesh.
    ///
    /// Panics if no triangles are given.
    pub fn new<I>(triangles: I) -> Self
    where
        I: IntoIterator<Item = TupleTriangle<Vertex>>,
    {
        let triangles: Vec<_> = triangles.into_iter().collect();
        assert!(!triangles.is_empty(), "Cannot build a solid without triangles");

        let (min, max) = triangles.iter()
            .flat_map(|t| {
                let (a, b, c) = t.positions();
                vec![a, b, c]
            })
            .fold((triangles[0].0.position, triangles[0].0.position), |(min, max), p| (
                Vec3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z)),
                Vec3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z)),
            ));

        Solid {
            octree: triangles.into_iter().collect(),
            min,
            max,
        }
    }

    pub fn load(path: &str) -> Result<Self, SourceError> {
        load_triangles(path).map(Solid::new)
    }

    /// Lower corner of the axis aligned bounding box.
    pub fn min(&self) -> Vec3 {
        self.min
    }

    /// Upper corner of the axis aligned bounding box.
    pub fn max(&self) -> Vec3 {
        self.max
    }

    /// Checks whether the point is enclosed by the mesh by counting the
    /// surface crossings of a ray leaving it.
    pub fn contains(&self, point: Vec3) -> bool {
        if !self.bounds_contain(point) {
            return false;
        }

        let direction = parity_direction();
        let mut from = point;
        let mut crossings = 0;

        for _ in 0..MAX_CROSSINGS {
            match self.octree.ray_intersection_target_and_parameter(from, direction) {
                Some((_, t)) => {
                    crossings += 1;
                    from = from + direction * (t + PARITY_STEP);
                }
                None => break,
            }
        }

        crossings % 2 == 1
    }

    fn bounds_contain(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
            point.y >= self.min.y && point.y <= self.max.y &&
            point.z >= self.min.z && point.z <= self.max.z
    }
}

/// Skewed so that rays rarely graze edges of axis aligned meshes.
fn parity_direction() -> Vec3 {
    Vec3::new(0.31, 0.57, 0.76).normalize()
}

/// Surface area of a triangle.
pub fn triangle_area(triangle: &TupleTriangle<Vertex>) -> f64 {
    let (a, b, c) = triangle.positions();
    0.5 * (b - a).cross(c - a).magnitude() as f64
}

/// Reads STL for the `.stl` extension in any case, OBJ otherwise.
fn load_triangles(path: &str) -> Result<Vec<TupleTriangle<Vertex>>, SourceError> {
    let is_stl = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("stl"));

    let triangles = if is_stl { load_stl(path)? } else { load_obj(path)? };

    if triangles.is_empty() {
        Err(SourceError::EmptyMesh { path: PathBuf::from(path) })
    } else {
        Ok(triangles)
    }
}

fn load_obj(path: &str) -> Result<Vec<TupleTriangle<Vertex>>, SourceError> {
    let entities = match obj::load(path) {
        Ok(entities) => entities,
        Err(_) => return Err(mesh_load_error(path)),
    };

    Ok(entities.iter()
        .flat_map(|e| e.mesh.triangles())
        .collect())
}

/// Vertices of STL facets all carry the facet normal.
fn load_stl(path: &str) -> Result<Vec<TupleTriangle<Vertex>>, SourceError> {
    let file = File::open(path).map_err(|_| mesh_load_error(path))?;
    let stl = stl_io::read_stl(&mut BufReader::new(file)).map_err(|_| mesh_load_error(path))?;

    let triangles = stl.faces.iter()
        .map(|face| {
            let n = face.normal.0;
            let normal = Vec3::new(n[0], n[1], n[2]);
            let vertex = |i: usize| {
                let p = stl.vertices[face.vertices[i]].0;
                Vertex {
                    position: Vec3::new(p[0], p[1], p[2]),
                    normal,
                    texcoords: Vec2::new(0.0, 0.0),
                }
            };
            TupleTriangle(vertex(0), vertex(1), vertex(2))
        })
        .collect();

    Ok(triangles)
}

fn mesh_load_error(path: &str) -> SourceError {
    SourceError::MeshLoad { path: PathBuf::from(path) }
}

#[cfg(test)]
pub mod test {
    use super::*;
    use geom::TupleTriangle as Tri;

    pub fn vtx(x: f32, y: f32, z: f32) -> Vertex {
        Vertex {
            position: Vec3::new(x, y, z),
            normal: Vec3::new(0.0, 0.0, 1.0),
            texcoords: Vec2::new(0.0, 0.0),
        }
    }

    /// Axis aligned box from `min` to `max` with counter clockwise, outward facing triangles.
    pub fn box_mesh(min: Vec3, max: Vec3) -> Vec<Tri<Vertex>> {
        let c = |i: usize| {
            vtx(
                if i & 1 == 0 { min.x } else { max.x },
                if i & 2 == 0 { min.y } else { max.y },
                if i & 4 == 0 { min.z } else { max.z },
            )
        };

        let quads = [
            [0, 2, 3, 1], // bottom, -z
            [4, 5, 7, 6], // top, +z
            [0, 1, 5, 4], // front, -y
            [2, 6, 7, 3], // back, +y
            [0, 4, 6, 2], // left, -x
            [1, 3, 7, 5], // right, +x
        ];

        quads.iter()
            .flat_map(|q| vec![
                Tri(c(q[0]), c(q[1]), c(q[2])),
                Tri(c(q[0]), c(q[2]), c(q[3])),
            ])
            .collect()
    }

    #[test]
    fn test_box_contains() {
        let solid = Solid::new(box_mesh(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 2.0, 3.0)));

        assert!(solid.contains(Vec3::new(0.5, 0.5, 0.5)));
        assert!(solid.contains(Vec3::new(0.9, 1.9, 2.9)));
        assert!(solid.contains(Vec3::new(0.1, 1.3, 0.2)));
        assert!(!solid.contains(Vec3::new(1.5, 0.5, 0.5)));
        assert!(!solid.contains(Vec3::new(-0.1, 0.5, 0.5)));
        assert!(!solid.contains(Vec3::new(0.5, 0.5, 3.5)));
    }

    #[test]
    fn test_bounds() {
        let solid = Solid::new(box_mesh(Vec3::new(-1.0, 0.0, 2.0), Vec3::new(1.0, 2.0, 3.0)));
        assert_relative_eq!(solid.min(), Vec3::new(-1.0, 0.0, 2.0), epsilon = 0.0001);
        assert_relative_eq!(solid.max(), Vec3::new(1.0, 2.0, 3.0), epsilon = 0.0001);
    }

    #[test]
    fn test_box_faces_have_outward_normals() {
        let mesh = box_mesh(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
        let center = Vec3::new(0.5, 0.5, 0.5);
        for tri in &mesh {
            let (a, _, _) = tri.positions();
            assert!(tri.normal().dot(a - center) > 0.0, "Inward facing triangle {:?}", tri);
        }
    }

    #[test]
    fn test_triangle_area() {
        let tri = Tri(vtx(0.0, 0.0, 0.0), vtx(2.0, 0.0, 0.0), vtx(0.0, 3.0, 0.0));
        assert_ulps_eq!(triangle_area(&tri), 3.0);

        let total: f64 = box_mesh(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 2.0, 3.0))
            .iter()
            .map(triangle_area)
            .sum();
        assert!((total - 22.0).abs() < 1e-5);
    }

    fn assert_clip_box(solid: &Solid) {
        assert_relative_eq!(solid.min(), Vec3::new(-1.0, -1.0, -0.5), epsilon = 0.0001);
        assert_relative_eq!(solid.max(), Vec3::new(1.0, 1.0, 0.5), epsilon = 0.0001);
        assert!(solid.contains(Vec3::new(0.0, 0.0, 0.0)));
        assert!(solid.contains(Vec3::new(0.9, -0.9, 0.4)));
        assert!(!solid.contains(Vec3::new(0.0, 0.0, 0.6)));
        assert!(!solid.contains(Vec3::new(1.1, 0.0, 0.0)));
    }

    #[test]
    fn test_load_stl_solid() {
        let solid = Solid::load("test-scenes/clip-box.stl").unwrap();
        assert_clip_box(&solid);
    }

    #[test]
    fn test_load_obj_solid() {
        let solid = Solid::load("test-scenes/clip-box.obj").unwrap();
        assert_clip_box(&solid);
    }

    #[test]
    fn test_stl_facets_keep_winding() {
        let geometry = Geometry::load("test-scenes/clip-box.stl").unwrap();
        assert_eq!(geometry.triangles().len(), 12);

        for tri in geometry.triangles() {
            let (a, _, _) = tri.positions();
            assert!(tri.normal().dot(a) > 0.0, "Inward facing triangle {:?}", tri);
            assert_relative_eq!(tri.normal(), tri.0.normal, epsilon = 0.0001);
        }
    }

    #[test]
    fn test_missing_mesh_file() {
        match Solid::load("definitely/not/here.obj") {
            Err(SourceError::MeshLoad { path }) => assert_eq!(path, PathBuf::from("definitely/not/here.obj")),
            _ => panic!("Expected mesh load error"),
        }

        match Geometry::load("definitely/not/here.STL") {
            Err(SourceError::MeshLoad { .. }) => (),
            _ => panic!("Expected mesh load error"),
        }
    }
}
