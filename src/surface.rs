use dice::Dice;
use geom::prelude::*;
use geom::{TangentSpace, TupleTriangle, Vec3, Vertex};
use geometry::triangle_area;
use particle::ParticleKind;
use rayon::prelude::*;
use std::f64::consts::{FRAC_PI_2, PI};

/// Distance particles start away from the emitting surface, keeps the
/// transport from immediately hitting the triangle they were spawned on.
const SURFACE_OFFSET: f32 = 0.00001;

/// Something particles can be emitted from, weighted by area.
pub trait SurfaceEmitter {
    fn total_area(&self) -> f64;

    /// Picks a point on the surface, uniformly distributed by area, and
    /// returns it together with the outward unit normal at that point.
    fn sample_point<D: Dice + ?Sized>(&self, dice: &mut D) -> (Vec3, Vec3);
}

#[derive(Debug, Clone)]
pub struct EmittingTriangle {
    triangle: TupleTriangle<Vertex>,
    normal: Vec3,
    area: f64,
}

impl EmittingTriangle {
    pub fn new(triangle: TupleTriangle<Vertex>) -> EmittingTriangle {
        EmittingTriangle {
            normal: triangle.normal(),
            area: triangle_area(&triangle),
            triangle,
        }
    }

    pub fn vertices(&self) -> (Vec3, Vec3, Vec3) {
        self.triangle.positions()
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    /// Direction given by `phi` and `theta` relative to the tangent space of
    /// the triangle, where `theta = 0` points along the normal.
    pub fn to_world(&self, phi: f64, theta: f64) -> Vec3 {
        let local = Vec3::new(
            (phi.cos() * theta.sin()) as f32,
            (phi.sin() * theta.sin()) as f32,
            theta.cos() as f32,
        );
        (self.triangle.tangent_to_world_matrix() * local).normalize()
    }

    /// Point at barycentric parameters `(a, b)`, folded back into the triangle
    /// if they describe a point in the other half of the spanned parallelogram.
    pub fn point_at(&self, a: f64, b: f64) -> Vec3 {
        let (a, b) = if a + b > 1.0 { (1.0 - a, 1.0 - b) } else { (a, b) };
        let (v0, v1, v2) = self.vertices();
        v0 + (v1 - v0) * a as f32 + (v2 - v0) * b as f32
    }
}

/// Triangles particles are emitted from, with their summed area.
#[derive(Debug, Clone)]
pub struct EmittingSurface {
    triangles: Vec<EmittingTriangle>,
    total_area: f64,
}

impl EmittingSurface {
    /// Degenerate triangles without area are left out, they have no normal.
    pub fn new<I>(triangles: I) -> Self
    where
        I: IntoIterator<Item = TupleTriangle<Vertex>>,
    {
        let triangles: Vec<EmittingTriangle> = triangles.into_iter()
            .filter(|t| triangle_area(t) > 0.0)
            .map(EmittingTriangle::new)
            .collect();
        let total_area = triangles.iter().map(EmittingTriangle::area).sum();

        EmittingSurface { triangles, total_area }
    }

    /// Keeps only the triangles whose vertices all lie inside the region
    /// described by `inside`, in their original order.
    pub fn restricted<F>(triangles: &[TupleTriangle<Vertex>], inside: F) -> Self
    where
        F: Fn(Vec3) -> bool + Sync,
    {
        let kept: Vec<TupleTriangle<Vertex>> = triangles.par_iter()
            .filter(|t| {
                let (a, b, c) = t.positions();
                inside(a) && inside(b) && inside(c)
            })
            .cloned()
            .collect();

        Self::new(kept)
    }

    pub fn triangles(&self) -> &[EmittingTriangle] {
        &self.triangles
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Selects the first triangle whose cumulative area reaches `area`.
    ///
    /// Panics on an empty surface.
    pub fn select(&self, area: f64) -> &EmittingTriangle {
        let mut sum = 0.0;
        for tri in &self.triangles {
            sum += tri.area;
            if area <= sum {
                return tri;
            }
        }

        // Rounding can leave the total slightly below the drawn area
        self.triangles.last().expect("Cannot select from an empty emitting surface")
    }

    /// Draws position, kinetic energy and global direction `(phi, theta)` of a
    /// particle leaving the surface diffusely.
    ///
    /// A positive `normal_energy` is added to the kinetic energy component
    /// normal to the surface, as for particles accelerated away from it.
    pub fn emit<D>(&self, kind: ParticleKind, normal_energy: f64, dice: &mut D) -> (Vec3, f64, f64, f64)
    where
        D: Dice + ?Sized,
    {
        let (tri, position) = self.sample_on(dice);

        let energy = dice.spectrum(kind);
        let (phi, theta) = lambert_direction(dice);
        let (energy, theta) = if normal_energy != 0.0 {
            accelerate_normal(energy, theta, normal_energy)
        } else {
            (energy, theta)
        };

        let (phi, theta) = angles_of(tri.to_world(phi, theta));

        (position, energy, phi, theta)
    }

    /// Area weighted triangle and a point on it, lifted off the surface.
    fn sample_on<D: Dice + ?Sized>(&self, dice: &mut D) -> (&EmittingTriangle, Vec3) {
        let tri = self.select(dice.uniform(0.0, self.total_area));

        // see Numerical Recipes 3rd ed., p. 1114
        let a = dice.uniform(0.0, 1.0);
        let b = dice.uniform(0.0, 1.0);
        let position = tri.point_at(a, b) + tri.normal * SURFACE_OFFSET;

        (tri, position)
    }
}

impl SurfaceEmitter for EmittingSurface {
    fn total_area(&self) -> f64 {
        self.total_area
    }

    fn sample_point<D: Dice + ?Sized>(&self, dice: &mut D) -> (Vec3, Vec3) {
        let (tri, position) = self.sample_on(dice);
        (position, tri.normal)
    }
}

/// Diffuse emission into the hemisphere around the local z axis.
pub fn lambert_direction<D: Dice + ?Sized>(dice: &mut D) -> (f64, f64) {
    let phi = dice.uniform(0.0, 2.0 * PI);
    let theta = dice.sin_cos(0.0, FRAC_PI_2);
    (phi, theta)
}

/// Adds `normal_energy` to the normal component of the kinetic energy and
/// returns the new energy and polar angle relative to the normal.
pub fn accelerate_normal(energy: f64, theta: f64, normal_energy: f64) -> (f64, f64) {
    let v_normal = (energy * theta.cos() * theta.cos() + normal_energy).sqrt();
    let v_tangential = energy.sqrt() * theta.sin();
    (
        v_normal * v_normal + v_tangential * v_tangential,
        v_tangential.atan2(v_normal),
    )
}

/// Azimuth and polar angle of a unit vector.
pub fn angles_of(v: Vec3) -> (f64, f64) {
    let (x, y, z) = (v.x as f64, v.y as f64, v.z as f64);
    (y.atan2(x), z.max(-1.0).min(1.0).acos())
}
