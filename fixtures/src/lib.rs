/// Contains functionality to create representative test sources.
///
/// Provides shared functionality for tests and benchmarks.
extern crate aitios_geom as geom;
extern crate particle_source as source;

pub mod apparatus;
