//! Joint-related type definitions

use crate::error::LoadError;

/// Joint type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum JointType {
    #[default]
    Fixed,
    Revolute,
    Continuous,
    Prismatic,
    Planar,
    Floating,
}

impl JointType {
    /// Check if this joint type clamps its value into limits
    pub fn has_limits(&self) -> bool {
        matches!(self, JointType::Revolute | JointType::Prismatic)
    }

    /// Number of values a joint of this type stores
    pub fn dof(&self) -> usize {
        match self {
            JointType::Fixed => 0,
            JointType::Revolute | JointType::Continuous | JointType::Prismatic => 1,
            JointType::Planar => 3,
            JointType::Floating => 6,
        }
    }

    /// Get the URDF `type` attribute spelling
    pub fn urdf_name(&self) -> &'static str {
        match self {
            JointType::Fixed => "fixed",
            JointType::Revolute => "revolute",
            JointType::Continuous => "continuous",
            JointType::Prismatic => "prismatic",
            JointType::Planar => "planar",
            JointType::Floating => "floating",
        }
    }

    /// All joint types
    pub fn all() -> &'static [JointType] {
        &[
            JointType::Fixed,
            JointType::Revolute,
            JointType::Continuous,
            JointType::Prismatic,
            JointType::Planar,
            JointType::Floating,
        ]
    }
}

impl std::fmt::Display for JointType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.urdf_name())
    }
}

impl std::str::FromStr for JointType {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JointType::all()
            .iter()
            .copied()
            .find(|t| t.urdf_name() == s)
            .ok_or_else(|| LoadError::UnknownJointType(s.to_string()))
    }
}

impl TryFrom<&urdf_rs::JointType> for JointType {
    type Error = LoadError;

    fn try_from(urdf_type: &urdf_rs::JointType) -> Result<Self, Self::Error> {
        match urdf_type {
            urdf_rs::JointType::Fixed => Ok(JointType::Fixed),
            urdf_rs::JointType::Revolute => Ok(JointType::Revolute),
            urdf_rs::JointType::Continuous => Ok(JointType::Continuous),
            urdf_rs::JointType::Prismatic => Ok(JointType::Prismatic),
            urdf_rs::JointType::Floating => Ok(JointType::Floating),
            urdf_rs::JointType::Planar => Ok(JointType::Planar),
            urdf_rs::JointType::Spherical => Err(LoadError::UnknownJointType("spherical".into())),
        }
    }
}

/// Joint limits
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JointLimits {
    /// Lower position limit (rad or m)
    pub lower: f64,
    /// Upper position limit (rad or m)
    pub upper: f64,
    /// Maximum effort (N or Nm)
    pub effort: f64,
    /// Maximum velocity (rad/s or m/s)
    pub velocity: f64,
}

impl JointLimits {
    /// Create limits with specified range
    pub fn with_range(lower: f64, upper: f64) -> Self {
        Self {
            lower,
            upper,
            ..Self::default()
        }
    }

    /// Clamp a value into `[lower, upper]`
    ///
    /// Applies the upper bound first, then the lower one, so an inverted range
    /// resolves to `lower` instead of panicking like `f64::clamp`.
    pub fn clamp(&self, value: f64) -> f64 {
        value.min(self.upper).max(self.lower)
    }
}

impl From<&urdf_rs::JointLimit> for JointLimits {
    fn from(limit: &urdf_rs::JointLimit) -> Self {
        Self {
            lower: limit.lower,
            upper: limit.upper,
            effort: limit.effort,
            velocity: limit.velocity,
        }
    }
}

/// Joint mimic configuration
/// Makes this joint follow another joint's position: value = multiplier * other_joint + offset
#[derive(Debug, Clone, PartialEq)]
pub struct JointMimic {
    /// Name of the joint to mimic
    pub joint: String,
    /// Multiplier applied to the mimicked joint's position (default: 1.0)
    pub multiplier: f64,
    /// Offset added after multiplication (default: 0.0)
    pub offset: f64,
}

impl JointMimic {
    /// Create a new mimic configuration
    pub fn new(joint: impl Into<String>) -> Self {
        Self {
            joint: joint.into(),
            multiplier: 1.0,
            offset: 0.0,
        }
    }

    /// Create a new mimic configuration with multiplier and offset
    pub fn with_params(joint: impl Into<String>, multiplier: f64, offset: f64) -> Self {
        Self {
            joint: joint.into(),
            multiplier,
            offset,
        }
    }

    /// Calculate the mimic value from the source joint's position
    pub fn calculate(&self, source_position: f64) -> f64 {
        self.multiplier * source_position + self.offset
    }
}

impl From<&urdf_rs::Mimic> for JointMimic {
    fn from(mimic: &urdf_rs::Mimic) -> Self {
        Self {
            joint: mimic.joint.clone(),
            multiplier: mimic.multiplier.unwrap_or(1.0),
            offset: mimic.offset.unwrap_or(0.0),
        }
    }
}
