#![feature(test)]

extern crate fixtures;
extern crate particle_source;
extern crate test;

use fixtures::apparatus::make_source;
use particle_source::{Gravity, MonteCarlo, NoField, ParticleKind, Spectrum};

#[bench]
fn emit_from_box_volume(b: &mut test::Bencher) {
    let mut source = make_source("neutron boxvolume -0.5 0.5 -0.5 0.5 0 2 100 0");
    let mut dice = MonteCarlo::seeded(1);

    b.iter(|| source.create_particle(&mut dice, &NoField).unwrap())
}

#[bench]
fn emit_from_box_volume_phase_space_weighted(b: &mut test::Bencher) {
    let mut source = make_source("neutron boxvolume -0.5 0.5 -0.5 0.5 0 2 100 1");
    let mut dice = MonteCarlo::seeded(1)
        .spectrum_of(ParticleKind::Neutron, Spectrum::Uniform { min: 210e-9, max: 300e-9 });
    let gravity = Gravity::standard();

    b.iter(|| source.create_particle(&mut dice, &gravity).unwrap())
}

#[bench]
fn emit_from_cylinder_surface(b: &mut test::Bencher) {
    let mut source = make_source("neutron cylsurface 0 1 -180 180 -0.1 2.1 100 0");
    let mut dice = MonteCarlo::seeded(1);

    b.iter(|| source.create_particle(&mut dice, &NoField).unwrap())
}
