use config::ConfigFile;
use error::SourceError;
use particle::ParticleKind;
use std::str::{FromStr, SplitWhitespace};

/// Unit of the azimuth bounds of cylindrical sources in the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleUnit {
    Degrees,
    Radians,
}

impl AngleUnit {
    pub fn to_radians(&self, angle: f64) -> f64 {
        match self {
            &AngleUnit::Degrees => angle.to_radians(),
            &AngleUnit::Radians => angle,
        }
    }
}

impl Default for AngleUnit {
    fn default() -> Self {
        AngleUnit::Degrees
    }
}

/// Parsed parameters of a source, lengths in m, angles in radians, times in s
/// and energies in eV.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceMode {
    BoxVolume {
        x: (f64, f64),
        y: (f64, f64),
        z: (f64, f64),
        active_time: f64,
        phase_space_weighting: bool,
    },
    CylVolume {
        r: (f64, f64),
        phi: (f64, f64),
        z: (f64, f64),
        active_time: f64,
        phase_space_weighting: bool,
    },
    StlVolume {
        file: String,
        active_time: f64,
        phase_space_weighting: bool,
    },
    CylSurface {
        r: (f64, f64),
        phi: (f64, f64),
        z: (f64, f64),
        active_time: f64,
        normal_energy: f64,
    },
    StlSurface {
        file: String,
        active_time: f64,
        normal_energy: f64,
    },
}

impl SourceMode {
    pub fn keyword(&self) -> &'static str {
        match self {
            &SourceMode::BoxVolume { .. } => "boxvolume",
            &SourceMode::CylVolume { .. } => "cylvolume",
            &SourceMode::StlVolume { .. } => "STLvolume",
            &SourceMode::CylSurface { .. } => "cylsurface",
            &SourceMode::StlSurface { .. } => "STLsurface",
        }
    }

    fn active_time(&self) -> f64 {
        match self {
            &SourceMode::BoxVolume { active_time, .. } |
            &SourceMode::CylVolume { active_time, .. } |
            &SourceMode::StlVolume { active_time, .. } |
            &SourceMode::CylSurface { active_time, .. } |
            &SourceMode::StlSurface { active_time, .. } => active_time,
        }
    }
}

/// The `SOURCE` entry of a geometry configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceConfig {
    pub particle: ParticleKind,
    pub mode: SourceMode,
}

impl SourceConfig {
    /// Parses an entry of the form `<particle> <mode> <fields...>`.
    pub fn parse(entry: &str, unit: AngleUnit) -> Result<SourceConfig, SourceError> {
        let mut tokens = entry.split_whitespace();
        let particle_name = tokens.next().ok_or(SourceError::MissingSource)?;
        let mode = tokens.next().ok_or_else(|| SourceError::UnknownMode(String::new()))?;

        let mut fields = Fields { mode, tokens };
        let mode = match mode {
            "boxvolume" => SourceMode::BoxVolume {
                x: (fields.number("x_min")?, fields.number("x_max")?),
                y: (fields.number("y_min")?, fields.number("y_max")?),
                z: (fields.number("z_min")?, fields.number("z_max")?),
                active_time: fields.number("active_time")?,
                phase_space_weighting: fields.flag("phase_space_weighting")?,
            },
            "cylvolume" => SourceMode::CylVolume {
                r: (fields.number("r_min")?, fields.number("r_max")?),
                phi: (unit.to_radians(fields.number("phi_min")?), unit.to_radians(fields.number("phi_max")?)),
                z: (fields.number("z_min")?, fields.number("z_max")?),
                active_time: fields.number("active_time")?,
                phase_space_weighting: fields.flag("phase_space_weighting")?,
            },
            "STLvolume" => SourceMode::StlVolume {
                file: fields.word("source_file")?,
                active_time: fields.number("active_time")?,
                phase_space_weighting: fields.flag("phase_space_weighting")?,
            },
            "cylsurface" => SourceMode::CylSurface {
                r: (fields.number("r_min")?, fields.number("r_max")?),
                phi: (unit.to_radians(fields.number("phi_min")?), unit.to_radians(fields.number("phi_max")?)),
                z: (fields.number("z_min")?, fields.number("z_max")?),
                active_time: fields.number("active_time")?,
                normal_energy: fields.number("E_normal")?,
            },
            "STLsurface" => SourceMode::StlSurface {
                file: fields.word("source_file")?,
                active_time: fields.number("active_time")?,
                normal_energy: fields.number("E_normal")?,
            },
            unknown => return Err(SourceError::UnknownMode(unknown.to_string())),
        };
        fields.finish()?;

        Ok(SourceConfig {
            particle: particle_name.parse()?,
            mode,
        })
    }

    /// Reads the first entry of the `[SOURCE]` section, further entries are ignored.
    pub fn from_config_file(
        config: &ConfigFile,
        unit: AngleUnit,
    ) -> Result<SourceConfig, SourceError> {
        let entry = config.section("SOURCE")
            .and_then(|lines| lines.first())
            .ok_or(SourceError::MissingSource)?;

        Self::parse(entry, unit)
    }

    /// Rejects parameters that cannot describe a source.
    pub fn validate(&self) -> Result<(), SourceError> {
        let ranges = match self.mode {
            SourceMode::BoxVolume { x, y, z, .. } => vec![("x", x), ("y", y), ("z", z)],
            SourceMode::CylVolume { r, phi, z, .. } |
            SourceMode::CylSurface { r, phi, z, .. } => {
                if r.0 < 0.0 {
                    return Err(self.invalid("r_min must not be negative"));
                }
                vec![("r", r), ("phi", phi), ("z", z)]
            },
            _ => vec![],
        };

        for (name, (min, max)) in ranges {
            if !(min <= max) {
                return Err(self.invalid(&format!("{}_min {} exceeds {}_max {}", name, min, name, max)));
            }
        }

        if !(self.mode.active_time() >= 0.0) {
            return Err(self.invalid("active_time must not be negative"));
        }

        match self.mode {
            SourceMode::CylSurface { normal_energy, .. } |
            SourceMode::StlSurface { normal_energy, .. } if !(normal_energy >= 0.0) =>
                Err(self.invalid("E_normal must not be negative")),
            _ => Ok(()),
        }
    }

    fn invalid(&self, reason: &str) -> SourceError {
        SourceError::InvalidParameter {
            mode: self.mode.keyword().to_string(),
            reason: reason.to_string(),
        }
    }
}

impl FromStr for SourceConfig {
    type Err = SourceError;

    /// Parses with azimuth bounds in degrees.
    fn from_str(entry: &str) -> Result<Self, Self::Err> {
        SourceConfig::parse(entry, AngleUnit::default())
    }
}

/// Remaining whitespace separated fields of an entry.
struct Fields<'a> {
    mode: &'a str,
    tokens: SplitWhitespace<'a>,
}

impl<'a> Fields<'a> {
    fn word(&mut self, field: &'static str) -> Result<String, SourceError> {
        self.tokens.next()
            .map(str::to_string)
            .ok_or_else(|| SourceError::MissingField {
                mode: self.mode.to_string(),
                field,
            })
    }

    fn number(&mut self, field: &'static str) -> Result<f64, SourceError> {
        let token = self.word(field)?;
        token.parse().map_err(|_| self.invalid(field, token.clone()))
    }

    /// Accepts `0`, `1`, `false` and `true`.
    fn flag(&mut self, field: &'static str) -> Result<bool, SourceError> {
        let token = self.word(field)?;
        match token.as_str() {
            "1" | "true" => Ok(true),
            "0" | "false" => Ok(false),
            _ => Err(self.invalid(field, token.clone())),
        }
    }

    fn finish(self) -> Result<(), SourceError> {
        let rest: Vec<String> = self.tokens.map(str::to_string).collect();
        if rest.is_empty() {
            Ok(())
        } else {
            Err(SourceError::TrailingFields {
                mode: self.mode.to_string(),
                tokens: rest,
            })
        }
    }

    fn invalid(&self, field: &'static str, value: String) -> SourceError {
        SourceError::InvalidField {
            mode: self.mode.to_string(),
            field,
            value,
        }
    }
}
