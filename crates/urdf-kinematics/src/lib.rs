//! URDF Kinematic Tree
//!
//! This crate parses URDF documents into a joint-driven kinematic tree:
//! - Loader: URDF text/document to [`Robot`], with package path resolution
//! - Robot: name-addressed links, joints, visual and collision nodes
//! - Joint kinematics: `set_joint_value` for every joint kind, including mimic joints
//! - Mesh loading: injected asynchronous [`MeshLoader`] with a filesystem default

pub mod config;
pub mod error;
pub mod loader;
pub mod mesh;
pub mod package;
pub mod robot;
pub mod scene;
pub mod types;

pub use config::*;
pub use error::*;
pub use loader::UrdfLoader;
pub use mesh::*;
pub use package::*;
pub use robot::*;
pub use scene::*;
pub use types::*;
