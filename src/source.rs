use config::{SourceConfig, SourceMode, SourceOptions};
use dice::Dice;
use error::SourceError;
use field::Field;
use geometry::{Geometry, Solid};
use particle::{Particle, ParticleCounter, ParticleKind, ParticleStatus, SpawnState};
use shape::{Cuboid, CylinderSector, SolidVolume, VolumeSampler, VolumeShape};
use surface::{EmittingSurface, SurfaceEmitter};

/// Number of phase space trials between progress messages.
const PROGRESS_INTERVAL: u64 = 100_000;
/// Trials before a phase space search gives up on a particle.
pub const DEFAULT_MAX_TRIALS: u64 = 42_000_000;
/// Trials before rejection sampling inside a solid gives up.
pub const DEFAULT_SOLID_MAX_TRIALS: u64 = 10_000_000;

/// Emission from the triangles of an emitting surface following Lambert's law.
pub struct SurfaceEmission {
    surface: EmittingSurface,
    /// Energy in eV added to the kinetic energy normal to the surface
    normal_energy: f64,
}

/// Emission from inside a volume with the angular distribution of the particle kind.
pub struct VolumeEmission {
    shape: VolumeShape,
    /// Weight the spatial distribution with the kinetic energy available at
    /// a fixed total energy
    phase_space_weighting: bool,
    max_trials: u64,
}

pub enum Emission {
    Surface(SurfaceEmission),
    Volume(VolumeEmission),
}

/// Creates particles of a single kind from a surface or volume.
pub struct ParticleSource {
    kind: ParticleKind,
    /// Particles spawn within `[0, active_time)`
    active_time: f64,
    counter: ParticleCounter,
    emission: Emission,
}

pub struct ParticleSourceBuilder {
    kind: ParticleKind,
    active_time: f64,
    emission: Option<Emission>,
    phase_space_weighting: bool,
    max_trials: u64,
    normal_energy: f64,
}

impl ParticleSource {
    /// Builds the source described by a parsed `SOURCE` entry.
    ///
    /// Surface sources are restricted to the triangles of `geometry`, mesh
    /// files named in the entry are loaded relative to the working directory.
    pub fn from_config(
        config: &SourceConfig,
        geometry: &Geometry,
        options: &SourceOptions,
    ) -> Result<ParticleSource, SourceError> {
        config.validate()?;

        let builder = ParticleSourceBuilder::new(config.particle)
            .max_trials(options.max_trials);

        let builder = match config.mode {
            SourceMode::BoxVolume { x, y, z, active_time, phase_space_weighting } => builder
                .active_time(active_time)
                .phase_space_weighting(phase_space_weighting)
                .cuboid_shaped(Cuboid { x, y, z }),
            SourceMode::CylVolume { r, phi, z, active_time, phase_space_weighting } => builder
                .active_time(active_time)
                .phase_space_weighting(phase_space_weighting)
                .cylinder_shaped(CylinderSector { r, phi, z }),
            SourceMode::StlVolume { ref file, active_time, phase_space_weighting } => builder
                .active_time(active_time)
                .phase_space_weighting(phase_space_weighting)
                .solid_shaped(Solid::load(file)?, options.solid_max_trials),
            SourceMode::CylSurface { r, phi, z, active_time, normal_energy } => {
                let sector = CylinderSector { r, phi, z };
                let surface = EmittingSurface::restricted(geometry.triangles(), |p| sector.contains(p));
                builder
                    .active_time(active_time)
                    .normal_energy(normal_energy)
                    .surface_shaped(checked_area(surface, &config.mode)?)
            },
            SourceMode::StlSurface { ref file, active_time, normal_energy } => {
                let solid = Solid::load(file)?;
                let surface = EmittingSurface::restricted(geometry.triangles(), |p| solid.contains(p));
                builder
                    .active_time(active_time)
                    .normal_energy(normal_energy)
                    .surface_shaped(checked_area(surface, &config.mode)?)
            },
        };

        Ok(builder.build())
    }

    /// Draws the initial state of the next particle.
    ///
    /// A volume source with phase space weighting that cannot find a
    /// compatible spawn point returns the last trial particle marked with
    /// `ParticleStatus::InitialNotFound`.
    pub fn create_particle<D, F>(&mut self, dice: &mut D, field: &F) -> Result<Particle, SourceError>
    where
        D: Dice + ?Sized,
        F: Field + ?Sized,
    {
        let ParticleSource { kind, active_time, ref mut counter, ref emission } = *self;

        match emission {
            &Emission::Surface(ref surface) => {
                Ok(Self::create_on_surface(kind, active_time, counter, surface, dice, field))
            },
            &Emission::Volume(ref volume) => {
                Self::create_in_volume(kind, active_time, counter, volume, dice, field)
            },
        }
    }

    pub fn kind(&self) -> ParticleKind {
        self.kind
    }

    pub fn active_time(&self) -> f64 {
        self.active_time
    }

    /// Amount of particles emitted so far.
    pub fn emitted(&self) -> u64 {
        self.counter.issued()
    }

    /// Total area of the emitting triangles, for surface sources only.
    pub fn emitting_area(&self) -> Option<f64> {
        match self.emission {
            Emission::Surface(ref surface) => Some(surface.surface.total_area()),
            Emission::Volume(_) => None,
        }
    }

    /// Constructs a particle with the next id.
    fn spawn<F>(counter: &mut ParticleCounter, kind: ParticleKind, state: SpawnState, field: &F) -> Particle
    where
        F: Field + ?Sized,
    {
        Particle::new(counter.next(), kind, state, field)
    }

    fn create_on_surface<D, F>(
        kind: ParticleKind,
        active_time: f64,
        counter: &mut ParticleCounter,
        emission: &SurfaceEmission,
        dice: &mut D,
        field: &F,
    ) -> Particle
    where
        D: Dice + ?Sized,
        F: Field + ?Sized,
    {
        let time = dice.uniform(0.0, active_time);
        let (position, energy, phi, theta) = emission.surface.emit(kind, emission.normal_energy, dice);
        let polarisation = dice.polarisation(kind);

        let state = SpawnState { time, position, energy, phi, theta, polarisation };
        Self::spawn(counter, kind, state, field)
    }

    fn create_in_volume<D, F>(
        kind: ParticleKind,
        active_time: f64,
        counter: &mut ParticleCounter,
        emission: &VolumeEmission,
        dice: &mut D,
        field: &F,
    ) -> Result<Particle, SourceError>
    where
        D: Dice + ?Sized,
        F: Field + ?Sized,
    {
        let time = dice.uniform(0.0, active_time);
        let mut energy = dice.spectrum(kind);
        let (phi, theta) = dice.angular(kind);
        let polarisation = dice.polarisation(kind);
        let mut position = emission.shape.sample_point(dice)?;

        if emission.phase_space_weighting {
            // The spectrum determines the total energy, the spatial density
            // is weighted with the kinetic energy left at each position.
            let total_energy = energy;
            info!("Trying to find starting position for {} with total energy = {} neV", kind, total_energy * 1e9);

            let mut trials = 0;
            loop {
                trials += 1;
                if trials % PROGRESS_INTERVAL == 0 {
                    debug!("Phase space search for {}: {} trials", kind, trials);
                }

                // Trial particles only borrow the next id
                let mut candidate = Particle::new(
                    counter.peek_next(),
                    kind,
                    SpawnState { time, position, energy: total_energy, phi, theta, polarisation },
                    field,
                );

                let potential = candidate.start_energy - total_energy;
                if dice.uniform(0.0, 1.0) < ((total_energy - potential) / total_energy).sqrt() {
                    energy = total_energy - potential;
                    if energy > 0.0 {
                        break;
                    }
                }

                if trials >= emission.max_trials {
                    warn!("Failed {} times to find a compatible spot for {}, it will not be simulated", trials, kind);
                    candidate.id = counter.next();
                    candidate.status = ParticleStatus::InitialNotFound;
                    return Ok(candidate);
                }

                position = emission.shape.sample_point(dice)?;
            }
        }

        let state = SpawnState { time, position, energy, phi, theta, polarisation };
        Ok(Self::spawn(counter, kind, state, field))
    }
}

fn checked_area(surface: EmittingSurface, mode: &SourceMode) -> Result<EmittingSurface, SourceError> {
    info!("Source Area: {} m^2", surface.total_area());

    if surface.total_area() > 0.0 {
        Ok(surface)
    } else {
        Err(SourceError::NoEmittingArea { mode: mode.keyword().to_string() })
    }
}

impl ParticleSourceBuilder {
    pub fn new(kind: ParticleKind) -> ParticleSourceBuilder {
        ParticleSourceBuilder {
            kind,
            active_time: 0.0,
            emission: None,
            phase_space_weighting: false,
            max_trials: DEFAULT_MAX_TRIALS,
            normal_energy: 0.0,
        }
    }

    pub fn active_time(mut self, active_time: f64) -> ParticleSourceBuilder {
        self.active_time = active_time;
        self
    }

    pub fn cuboid_shaped(self, cuboid: Cuboid) -> ParticleSourceBuilder {
        self.volume_shaped(VolumeShape::Cuboid(cuboid))
    }

    pub fn cylinder_shaped(self, cylinder: CylinderSector) -> ParticleSourceBuilder {
        self.volume_shaped(VolumeShape::Cylinder(cylinder))
    }

    pub fn solid_shaped(self, solid: Solid, max_trials: u64) -> ParticleSourceBuilder {
        self.volume_shaped(VolumeShape::Solid(SolidVolume::new(solid, max_trials)))
    }

    pub fn volume_shaped(mut self, shape: VolumeShape) -> ParticleSourceBuilder {
        self.emission = Some(Emission::Volume(VolumeEmission {
            shape,
            phase_space_weighting: false,
            max_trials: 0,
        }));
        self
    }

    pub fn surface_shaped(mut self, surface: EmittingSurface) -> ParticleSourceBuilder {
        self.emission = Some(Emission::Surface(SurfaceEmission {
            surface,
            normal_energy: 0.0,
        }));
        self
    }

    /// Only affects volume sources.
    pub fn phase_space_weighting(mut self, phase_space_weighting: bool) -> ParticleSourceBuilder {
        self.phase_space_weighting = phase_space_weighting;
        self
    }

    /// Trials of the phase space search, only affects volume sources.
    pub fn max_trials(mut self, max_trials: u64) -> ParticleSourceBuilder {
        self.max_trials = max_trials;
        self
    }

    /// Energy added normal to the surface, only affects surface sources.
    pub fn normal_energy(mut self, normal_energy: f64) -> ParticleSourceBuilder {
        self.normal_energy = normal_energy;
        self
    }

    pub fn build(self) -> ParticleSource {
        assert!(self.active_time >= 0.0, "Active time must not be negative");
        assert!(self.max_trials > 0, "Phase space search needs at least one trial");

        let emission = match self.emission {
            Some(Emission::Surface(surface)) => {
                assert!(surface.surface.total_area() > 0.0, "Emitting surface has no area");
                assert!(self.normal_energy >= 0.0, "Normal energy must not be negative");
                Emission::Surface(SurfaceEmission { normal_energy: self.normal_energy, ..surface })
            },
            Some(Emission::Volume(volume)) => Emission::Volume(VolumeEmission {
                phase_space_weighting: self.phase_space_weighting,
                max_trials: self.max_trials,
                ..volume
            }),
            None => panic!("Particle source needs a surface or volume to emit from"),
        };

        ParticleSource {
            kind: self.kind,
            active_time: self.active_time,
            counter: ParticleCounter::new(),
            emission,
        }
    }
}
