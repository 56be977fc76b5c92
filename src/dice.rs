use particle::ParticleKind;
use rand::{Rng, SeedableRng, XorShiftRng};
use std::f64::consts::PI;

/// Random draws a particle source needs.
///
/// Only `uniform` and the particle specific draws have to be provided, the
/// shaped distributions are derived from `uniform` by inversion so that
/// every derived draw consumes exactly one uniform number.
pub trait Dice {
    /// Uniformly distributed in `[min, max)`.
    fn uniform(&mut self, min: f64, max: f64) -> f64;

    /// Density proportional to the value itself, e.g. radii in polar coordinates.
    fn linear(&mut self, min: f64, max: f64) -> f64 {
        self.uniform(min * min, max * max).sqrt()
    }

    /// Density proportional to `sin(x)cos(x)`, Lambert's law for polar angles
    /// within `[0, π/2]`.
    fn sin_cos(&mut self, min: f64, max: f64) -> f64 {
        let (sin_min, sin_max) = (min.sin(), max.sin());
        self.uniform(sin_min * sin_min, sin_max * sin_max)
            .sqrt()
            .min(1.0)
            .asin()
    }

    /// Density proportional to `sin(x)`, isotropic polar angles.
    fn sin(&mut self, min: f64, max: f64) -> f64 {
        self.uniform(max.cos(), min.cos())
            .max(-1.0)
            .min(1.0)
            .acos()
    }

    /// Kinetic energy in eV drawn from the spectrum of the given particle kind.
    fn spectrum(&mut self, kind: ParticleKind) -> f64;

    /// Velocity direction `(phi, theta)` for volume sources.
    fn angular(&mut self, kind: ParticleKind) -> (f64, f64);

    /// Spin projection, either `1` or `-1`.
    fn polarisation(&mut self, kind: ParticleKind) -> i32;
}

/// Kinetic energy spectrum, energies in eV.
#[derive(Debug, Clone, PartialEq)]
pub enum Spectrum {
    Mono(f64),
    Uniform { min: f64, max: f64 },
    /// Density proportional to energy
    Linear { min: f64, max: f64 },
}

#[derive(Debug, Clone)]
struct Emission {
    spectrum: Spectrum,
    /// Probability of polarisation `1`
    p_up: f64,
}

/// Dice backed by a `rand` generator with a spectrum per particle kind.
pub struct MonteCarlo<R> {
    rng: R,
    emissions: [Emission; 3],
}

impl MonteCarlo<XorShiftRng> {
    /// Reproducible generator, equal seeds give equal sequences of draws.
    pub fn seeded(seed: u32) -> MonteCarlo<XorShiftRng> {
        // XorShift must not be seeded with all zeroes
        MonteCarlo::new(XorShiftRng::from_seed([0x193a_6754, 0xa8a7_d469, 0x9783_0e05, seed]))
    }
}

impl<R: Rng> MonteCarlo<R> {
    pub fn new(rng: R) -> MonteCarlo<R> {
        MonteCarlo {
            rng,
            emissions: [
                Emission { spectrum: Spectrum::Uniform { min: 0.0, max: 300e-9 }, p_up: 0.5 },
                Emission { spectrum: Spectrum::Uniform { min: 0.0, max: 751.0 }, p_up: 0.5 },
                Emission { spectrum: Spectrum::Uniform { min: 0.0, max: 782e3 }, p_up: 0.5 },
            ],
        }
    }

    pub fn spectrum_of(mut self, kind: ParticleKind, spectrum: Spectrum) -> Self {
        self.emissions[kind.index()].spectrum = spectrum;
        self
    }

    /// Sets the probability of drawing polarisation `1` for the given kind.
    pub fn polarisation_of(mut self, kind: ParticleKind, p_up: f64) -> Self {
        assert!(p_up >= 0.0 && p_up <= 1.0, "Polarisation probability must be within [0, 1]");
        self.emissions[kind.index()].p_up = p_up;
        self
    }
}

impl<R: Rng> Dice for MonteCarlo<R> {
    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        let random: f64 = self.rng.gen();
        min + (max - min) * random
    }

    fn spectrum(&mut self, kind: ParticleKind) -> f64 {
        match self.emissions[kind.index()].spectrum.clone() {
            Spectrum::Mono(energy) => energy,
            Spectrum::Uniform { min, max } => self.uniform(min, max),
            Spectrum::Linear { min, max } => self.linear(min, max),
        }
    }

    fn angular(&mut self, _kind: ParticleKind) -> (f64, f64) {
        let phi = self.uniform(0.0, 2.0 * PI);
        let theta = self.sin(0.0, PI);
        (phi, theta)
    }

    fn polarisation(&mut self, kind: ParticleKind) -> i32 {
        let p_up = self.emissions[kind.index()].p_up;
        if self.uniform(0.0, 1.0) < p_up {
            1
        } else {
            -1
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const N: usize = 40_000;

    #[test]
    fn test_uniform_range_and_mean() {
        let mut dice = MonteCarlo::seeded(7);
        let draws: Vec<f64> = (0..N).map(|_| dice.uniform(-2.0, 4.0)).collect();
        assert!(draws.iter().all(|&x| x >= -2.0 && x < 4.0));
        let mean = draws.iter().sum::<f64>() / N as f64;
        assert!((mean - 1.0).abs() < 0.05, "Unexpected mean {}", mean);
    }

    #[test]
    fn test_degenerate_uniform_does_not_panic() {
        let mut dice = MonteCarlo::seeded(1);
        assert_eq!(dice.uniform(3.0, 3.0), 3.0);
    }

    #[test]
    fn test_linear_cdf() {
        let mut dice = MonteCarlo::seeded(11);
        // P(r < 1) = 1/4 for density ∝ r on [0, 2]
        let below = (0..N).filter(|_| dice.linear(0.0, 2.0) < 1.0).count();
        let fraction = below as f64 / N as f64;
        assert!((fraction - 0.25).abs() < 0.01, "Unexpected fraction {}", fraction);
    }

    #[test]
    fn test_sin_cos_mean_cosine() {
        let mut dice = MonteCarlo::seeded(3);
        // E[cos θ] = 2/3 for density ∝ sin θ cos θ on [0, π/2]
        let draws: Vec<f64> = (0..N).map(|_| dice.sin_cos(0.0, FRAC_PI_2)).collect();
        assert!(draws.iter().all(|&t| t >= 0.0 && t <= FRAC_PI_2));
        let mean_cos = draws.iter().map(|t| t.cos()).sum::<f64>() / N as f64;
        assert!((mean_cos - 2.0 / 3.0).abs() < 0.01, "Unexpected mean cosine {}", mean_cos);
    }

    #[test]
    fn test_sin_cos_cdf() {
        let mut dice = MonteCarlo::seeded(17);
        let draws: Vec<f64> = (0..N).map(|_| dice.sin_cos(0.0, FRAC_PI_2)).collect();

        // P(θ < x) = sin²x
        for i in 1..8 {
            let x = i as f64 * FRAC_PI_2 / 8.0;
            let fraction = draws.iter().filter(|&&t| t < x).count() as f64 / N as f64;
            let expected = x.sin() * x.sin();
            assert!((fraction - expected).abs() < 0.01, "P(θ < {}) = {}, expected {}", x, fraction, expected);
        }
    }

    #[test]
    fn test_isotropic_angles() {
        let mut dice = MonteCarlo::seeded(5);
        let mut mean_cos = 0.0;
        for _ in 0..N {
            let (phi, theta) = dice.angular(ParticleKind::Neutron);
            assert!(phi >= 0.0 && phi < 2.0 * PI);
            assert!(theta >= 0.0 && theta <= PI);
            mean_cos += theta.cos();
        }
        mean_cos /= N as f64;
        assert!(mean_cos.abs() < 0.02);
    }

    #[test]
    fn test_spectrum_and_polarisation_per_kind() {
        let mut dice = MonteCarlo::seeded(9)
            .spectrum_of(ParticleKind::Proton, Spectrum::Mono(42.0))
            .polarisation_of(ParticleKind::Proton, 1.0)
            .polarisation_of(ParticleKind::Electron, 0.0);

        assert_eq!(dice.spectrum(ParticleKind::Proton), 42.0);
        assert!((0..100).all(|_| dice.polarisation(ParticleKind::Proton) == 1));
        assert!((0..100).all(|_| dice.polarisation(ParticleKind::Electron) == -1));

        let e = dice.spectrum(ParticleKind::Neutron);
        assert!(e >= 0.0 && e < 300e-9);
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = MonteCarlo::seeded(123);
        let mut b = MonteCarlo::seeded(123);
        for _ in 0..100 {
            assert_eq!(a.uniform(0.0, 1.0), b.uniform(0.0, 1.0));
        }
    }
}
