//! Reading the source description from the geometry configuration.

mod file;
mod entry;

pub use self::file::ConfigFile;
pub use self::entry::{AngleUnit, SourceConfig, SourceMode};

use source::{DEFAULT_MAX_TRIALS, DEFAULT_SOLID_MAX_TRIALS};

/// Limits for the rejection loops of volume sources.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceOptions {
    /// Trials of the phase space search before a particle is given up
    pub max_trials: u64,
    /// Trials to find a point inside a mesh-bounded solid
    pub solid_max_trials: u64,
}

impl Default for SourceOptions {
    fn default() -> Self {
        SourceOptions {
            max_trials: DEFAULT_MAX_TRIALS,
            solid_max_trials: DEFAULT_SOLID_MAX_TRIALS,
        }
    }
}
