use error::SourceError;
use field::Field;
use geom::Vec3;
use std::fmt;
use std::str::FromStr;

/// Closed set of particle types a source can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    Neutron,
    Proton,
    Electron,
}

impl ParticleKind {
    pub const ALL: [ParticleKind; 3] = [
        ParticleKind::Neutron,
        ParticleKind::Proton,
        ParticleKind::Electron,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            &ParticleKind::Neutron => "neutron",
            &ParticleKind::Proton => "proton",
            &ParticleKind::Electron => "electron",
        }
    }

    /// Rest mass in eV/c².
    pub fn mass(&self) -> f64 {
        match self {
            &ParticleKind::Neutron => 939.565_420_52e6,
            &ParticleKind::Proton => 938.272_088_16e6,
            &ParticleKind::Electron => 0.510_998_950e6,
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            &ParticleKind::Neutron => 0,
            &ParticleKind::Proton => 1,
            &ParticleKind::Electron => 2,
        }
    }
}

impl FromStr for ParticleKind {
    type Err = SourceError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        ParticleKind::ALL.iter()
            .find(|k| k.name() == name)
            .cloned()
            .ok_or_else(|| SourceError::UnknownParticle(name.to_string()))
    }
}

impl fmt::Display for ParticleKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Initial state of a particle as drawn by a source.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnState {
    /// Spawn time in seconds, within the active time of the source
    pub time: f64,
    pub position: Vec3,
    /// Kinetic energy in eV
    pub energy: f64,
    /// Azimuth of the velocity in the global frame
    pub phi: f64,
    /// Polar angle of the velocity in the global frame, measured from +z
    pub theta: f64,
    pub polarisation: i32,
}

impl SpawnState {
    /// Unit velocity direction in the global frame.
    pub fn direction(&self) -> [f64; 3] {
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        [
            self.phi.cos() * sin_theta,
            self.phi.sin() * sin_theta,
            cos_theta,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleStatus {
    Spawned,
    /// The phase space search ran out of trials, the particle must not be
    /// transported or counted.
    InitialNotFound,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub id: u64,
    pub kind: ParticleKind,
    pub spawn: SpawnState,
    /// Kinetic plus potential energy at the spawn point
    pub start_energy: f64,
    pub status: ParticleStatus,
}

impl Particle {
    /// Evaluates the field at the spawn point to obtain the starting total energy.
    pub fn new<F>(id: u64, kind: ParticleKind, spawn: SpawnState, field: &F) -> Particle
    where
        F: Field + ?Sized,
    {
        let potential = field.potential(kind, spawn.position, spawn.time);
        let start_energy = spawn.energy + potential;

        Particle {
            id,
            kind,
            spawn,
            start_energy,
            status: ParticleStatus::Spawned,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status == ParticleStatus::Spawned
    }
}

/// Hands out strictly increasing particle ids, starting at 1.
#[derive(Debug, Clone, Default)]
pub struct ParticleCounter {
    issued: u64,
}

impl ParticleCounter {
    pub fn new() -> ParticleCounter {
        ParticleCounter { issued: 0 }
    }

    pub fn next(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Id the next call to `next` would return, without consuming it.
    pub fn peek_next(&self) -> u64 {
        self.issued + 1
    }

    pub fn issued(&self) -> u64 {
        self.issued
    }
}
