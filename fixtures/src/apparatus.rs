use geom::{TupleTriangle, Vec2, Vec3, Vertex};
use source::{Geometry, ParticleSource, SourceConfig, SourceOptions};

/// Closed axis aligned box with outward facing, counter clockwise triangles.
pub fn box_triangles(min: Vec3, max: Vec3) -> Vec<TupleTriangle<Vertex>> {
    let corner = |i: usize| Vertex {
        position: Vec3::new(
            if i & 1 == 0 { min.x } else { max.x },
            if i & 2 == 0 { min.y } else { max.y },
            if i & 4 == 0 { min.z } else { max.z },
        ),
        normal: Vec3::new(0.0, 0.0, 1.0),
        texcoords: Vec2::new(0.0, 0.0),
    };

    let quads = [
        [0, 2, 3, 1],
        [4, 5, 7, 6],
        [0, 1, 5, 4],
        [2, 6, 7, 3],
        [0, 4, 6, 2],
        [1, 3, 7, 5],
    ];

    quads.iter()
        .flat_map(|q| vec![
            TupleTriangle(corner(q[0]), corner(q[1]), corner(q[2])),
            TupleTriangle(corner(q[0]), corner(q[2]), corner(q[3])),
        ])
        .collect()
}

/// A storage bottle: a 1m x 1m x 2m box standing on the origin, centered on the z axis.
pub fn make_geometry() -> Geometry {
    Geometry::new(box_triangles(Vec3::new(-0.5, -0.5, 0.0), Vec3::new(0.5, 0.5, 2.0)))
}

/// Builds the source of a `SOURCE` entry inside the storage bottle.
pub fn make_source(entry: &str) -> ParticleSource {
    let config: SourceConfig = entry.parse()
        .expect("Fixture source entry does not parse");

    ParticleSource::from_config(&config, &make_geometry(), &SourceOptions::default())
        .expect("Fixture source could not be built")
}
