use dice::Dice;
use error::SourceError;
use geom::Vec3;
use geometry::Solid;

/// Draws random points that are uniformly distributed inside a volume.
pub trait VolumeSampler {
    fn sample_point<D: Dice + ?Sized>(&self, dice: &mut D) -> Result<Vec3, SourceError>;
}

/// Axis aligned box.
#[derive(Debug, Clone, PartialEq)]
pub struct Cuboid {
    pub x: (f64, f64),
    pub y: (f64, f64),
    pub z: (f64, f64),
}

impl VolumeSampler for Cuboid {
    fn sample_point<D: Dice + ?Sized>(&self, dice: &mut D) -> Result<Vec3, SourceError> {
        let x = dice.uniform(self.x.0, self.x.1);
        let y = dice.uniform(self.y.0, self.y.1);
        let z = dice.uniform(self.z.0, self.z.1);
        Ok(Vec3::new(x as f32, y as f32, z as f32))
    }
}

/// Sector of a hollow cylinder around the z axis, angles in radians.
#[derive(Debug, Clone, PartialEq)]
pub struct CylinderSector {
    pub r: (f64, f64),
    pub phi: (f64, f64),
    pub z: (f64, f64),
}

impl CylinderSector {
    /// Bounds are inclusive, the azimuth of the point is taken in `(-π, π]`.
    pub fn contains(&self, point: Vec3) -> bool {
        let (x, y, z) = (point.x as f64, point.y as f64, point.z as f64);
        let r = (x * x + y * y).sqrt();
        let phi = y.atan2(x);

        r >= self.r.0 && r <= self.r.1 &&
            phi >= self.phi.0 && phi <= self.phi.1 &&
            z >= self.z.0 && z <= self.z.1
    }
}

impl VolumeSampler for CylinderSector {
    fn sample_point<D: Dice + ?Sized>(&self, dice: &mut D) -> Result<Vec3, SourceError> {
        // Volume element grows linearly with r
        let r = dice.linear(self.r.0, self.r.1);
        let phi = dice.uniform(self.phi.0, self.phi.1);
        let z = dice.uniform(self.z.0, self.z.1);
        Ok(Vec3::new((r * phi.cos()) as f32, (r * phi.sin()) as f32, z as f32))
    }
}

/// Volume enclosed by a mesh, sampled by rejection from its bounding box.
pub struct SolidVolume {
    solid: Solid,
    max_trials: u64,
}

impl SolidVolume {
    pub fn new(solid: Solid, max_trials: u64) -> SolidVolume {
        assert!(max_trials > 0, "Need at least one trial to find a point inside a solid");
        SolidVolume { solid, max_trials }
    }

    pub fn solid(&self) -> &Solid {
        &self.solid
    }
}

impl VolumeSampler for SolidVolume {
    fn sample_point<D: Dice + ?Sized>(&self, dice: &mut D) -> Result<Vec3, SourceError> {
        let (min, max) = (self.solid.min(), self.solid.max());

        for _ in 0..self.max_trials {
            let x = dice.uniform(min.x as f64, max.x as f64);
            let y = dice.uniform(min.y as f64, max.y as f64);
            let z = dice.uniform(min.z as f64, max.z as f64);
            let candidate = Vec3::new(x as f32, y as f32, z as f32);

            if self.solid.contains(candidate) {
                return Ok(candidate);
            }
        }

        Err(SourceError::SolidExhausted { trials: self.max_trials })
    }
}

/// Volume a volume source spawns particles in.
pub enum VolumeShape {
    Cuboid(Cuboid),
    Cylinder(CylinderSector),
    Solid(SolidVolume),
}

impl VolumeSampler for VolumeShape {
    fn sample_point<D: Dice + ?Sized>(&self, dice: &mut D) -> Result<Vec3, SourceError> {
        match self {
            &VolumeShape::Cuboid(ref cuboid) => cuboid.sample_point(dice),
            &VolumeShape::Cylinder(ref cylinder) => cylinder.sample_point(dice),
            &VolumeShape::Solid(ref solid) => solid.sample_point(dice),
        }
    }
}
