use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while building a particle source or
/// drawing a position from it.
///
/// Exhausting the phase space search is not an error, the particle is
/// returned with `ParticleStatus::InitialNotFound` instead.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The configuration has no `[SOURCE]` entry at all.
    #[error("No SOURCE entry found in geometry configuration")]
    MissingSource,
    /// The mode keyword following the particle name is not known.
    #[error("Could not load source \"{0}\"! Did you enter invalid parameters?")]
    UnknownMode(String),
    /// The particle name is not one of neutron, proton or electron.
    #[error("Could not create particle \"{0}\"")]
    UnknownParticle(String),
    #[error("Source \"{mode}\" is missing field {field}")]
    MissingField {
        mode: String,
        field: &'static str,
    },
    #[error("Source \"{mode}\" has invalid value \"{value}\" for field {field}")]
    InvalidField {
        mode: String,
        field: &'static str,
        value: String,
    },
    #[error("Source \"{mode}\" has unexpected trailing fields: {}", .tokens.join(" "))]
    TrailingFields {
        mode: String,
        tokens: Vec<String>,
    },
    /// Parameters parsed fine but describe an impossible source.
    #[error("Source \"{mode}\": {reason}")]
    InvalidParameter {
        mode: String,
        reason: String,
    },
    /// No triangle of the apparatus lies within the configured surface restriction.
    #[error("Source \"{mode}\" has no emitting triangles inside its restriction")]
    NoEmittingArea { mode: String },
    #[error("Could not load mesh {}", .path.display())]
    MeshLoad { path: PathBuf },
    #[error("Mesh {} contains no triangles", .path.display())]
    EmptyMesh { path: PathBuf },
    /// Rejection sampling inside a mesh-bounded solid never hit the solid.
    #[error("Failed {trials} times to find a point inside the source solid")]
    SolidExhausted { trials: u64 },
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_messages_name_offending_token() {
        let msg = SourceError::UnknownMode(String::from("spherevolume")).to_string();
        assert!(msg.contains("spherevolume"));

        let msg = SourceError::UnknownParticle(String::from("muon")).to_string();
        assert!(msg.contains("muon"));

        let msg = SourceError::TrailingFields {
            mode: String::from("boxvolume"),
            tokens: vec![String::from("7"), String::from("8")],
        }.to_string();
        assert_eq!(msg, "Source \"boxvolume\" has unexpected trailing fields: 7 8");
    }

    #[test]
    fn test_io_errors_convert() {
        let err: SourceError = io::Error::new(io::ErrorKind::NotFound, "geometry.in").into();
        match err {
            SourceError::Io(_) => (),
            ref other => panic!("Expected io error, got {:?}", other),
        }
        assert_eq!(err.to_string(), "geometry.in");
    }
}
