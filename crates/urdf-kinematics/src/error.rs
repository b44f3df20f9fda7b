//! Error types for URDF loading and mesh resolution

use std::path::PathBuf;

/// Errors that abort a URDF parse
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("No <robot> element found in URDF document")]
    MissingRobot,

    #[error("Failed to parse URDF: {0}")]
    Parse(String),

    #[error("Failed to read URDF file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown joint type: {0}")]
    UnknownJointType(String),

    #[error("Joint '{joint}' references unknown link '{link}'")]
    LinkNotFound { joint: String, link: String },

    #[error("Link '{link}' is the child of both '{first}' and '{second}'")]
    MultipleParents {
        link: String,
        first: String,
        second: String,
    },

    #[error("Link '{link}' is part of a joint loop that never reaches a root link")]
    KinematicLoop { link: String },

    #[error("Mimic joint cycle detected at joint '{joint}'")]
    MimicCycle { joint: String },

    #[error("No root link: every link is the child of a joint")]
    NoRootLink,
}

/// Errors reported by mesh loaders
///
/// These never abort a parse; the affected visual or collision node is left empty.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MeshError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Mesh file not found: {0}")]
    NotFound(String),
    #[error("Empty mesh: no geometry found")]
    EmptyMesh,
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
