//! Draws spawn descriptors from the source of a geometry configuration.
//!
//! Usage: `spawn <geometry.in> <apparatus.obj> <count> [seed]`
//!
//! Writes one tab separated line per particle to stdout:
//! `id t x y z E phi theta polarisation status`.

#[macro_use]
extern crate anyhow;
extern crate env_logger;
#[macro_use]
extern crate log;
extern crate particle_source;

use anyhow::Context;
use particle_source::{
    AngleUnit, ConfigFile, Geometry, Gravity, MonteCarlo, ParticleSource, SourceConfig, SourceOptions,
};
use std::env;
use std::io::{self, BufWriter, Write};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 3 || args.len() > 4 {
        bail!("Usage: spawn <geometry.in> <apparatus.obj> <count> [seed]");
    }

    let count: u64 = args[2].parse()
        .with_context(|| format!("Invalid particle count \"{}\"", args[2]))?;
    let seed: u32 = match args.get(3) {
        Some(seed) => seed.parse().with_context(|| format!("Invalid seed \"{}\"", seed))?,
        None => 1,
    };

    let config = ConfigFile::load(&args[0])
        .with_context(|| format!("Could not read {}", args[0]))?;
    let source_config = SourceConfig::from_config_file(&config, AngleUnit::Degrees)?;
    let geometry = Geometry::load(&args[1])?;

    let options = SourceOptions::default();
    let mut source = ParticleSource::from_config(&source_config, &geometry, &options)?;
    info!("Emitting {} {}s from {} source", count, source.kind(), source_config.mode.keyword());

    let mut dice = MonteCarlo::seeded(seed);
    let field = Gravity::standard();
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    for _ in 0..count {
        let particle = source.create_particle(&mut dice, &field)?;
        let spawn = &particle.spawn;
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            particle.id,
            spawn.time,
            spawn.position.x,
            spawn.position.y,
            spawn.position.z,
            spawn.energy,
            spawn.phi,
            spawn.theta,
            spawn.polarisation,
            if particle.is_valid() { "ok" } else { "not_found" }
        )?;
    }

    Ok(())
}
