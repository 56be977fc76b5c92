#[cfg_attr(test, macro_use)]
extern crate aitios_geom as geom;
extern crate aitios_asset as asset;
extern crate aitios_scene as scene;
extern crate aitios_spatial as spatial;
extern crate rand;
extern crate rayon;
extern crate stl_io;
extern crate thiserror;
#[macro_use]
extern crate log;

mod config;
mod dice;
mod error;
mod field;
mod geometry;
mod particle;
mod shape;
mod source;
mod surface;

pub use config::{AngleUnit, ConfigFile, SourceConfig, SourceMode, SourceOptions};
pub use dice::{Dice, MonteCarlo, Spectrum};
pub use error::SourceError;
pub use field::{Field, Gravity, NoField};
pub use geometry::{Geometry, Solid};
pub use particle::{Particle, ParticleCounter, ParticleKind, ParticleStatus, SpawnState};
pub use shape::{Cuboid, CylinderSector, SolidVolume, VolumeSampler, VolumeShape};
pub use source::{
    ParticleSource, ParticleSourceBuilder, DEFAULT_MAX_TRIALS, DEFAULT_SOLID_MAX_TRIALS,
};
pub use surface::{EmittingSurface, EmittingTriangle, SurfaceEmitter};
