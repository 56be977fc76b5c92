use geom::Vec3;
use particle::ParticleKind;

/// Speed of light in m/s
const SPEED_OF_LIGHT: f64 = 299_792_458.0;
/// Standard gravity in m/s²
const STANDARD_GRAVITY: f64 = 9.806_65;

/// Potential energy landscape a particle is spawned into.
///
/// Sources only need to know the potential energy at the spawn point, which
/// together with the kinetic energy makes up the starting total energy of a
/// particle.
pub trait Field {
    /// Potential energy in eV of a particle of the given kind at `position`.
    fn potential(&self, kind: ParticleKind, position: Vec3, time: f64) -> f64;
}

/// Field-free space.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoField;

impl Field for NoField {
    fn potential(&self, _kind: ParticleKind, _position: Vec3, _time: f64) -> f64 {
        0.0
    }
}

/// Homogeneous gravity pointing in negative z direction.
#[derive(Debug, Clone, Copy)]
pub struct Gravity {
    /// Acceleration in m/s²
    pub g: f64,
}

impl Gravity {
    pub fn standard() -> Gravity {
        Gravity { g: STANDARD_GRAVITY }
    }
}

impl Field for Gravity {
    fn potential(&self, kind: ParticleKind, position: Vec3, _time: f64) -> f64 {
        kind.mass() * self.g * position.z as f64 / (SPEED_OF_LIGHT * SPEED_OF_LIGHT)
    }
}

impl<'a, F: Field + ?Sized> Field for &'a F {
    fn potential(&self, kind: ParticleKind, position: Vec3, time: f64) -> f64 {
        (**self).potential(kind, position, time)
    }
}
