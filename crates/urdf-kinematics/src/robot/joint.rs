//! Joints and the per-kind forward kinematics

use glam::{DMat4, DQuat, DVec3};

use crate::scene::Transform;
use crate::types::{JointLimits, JointMimic, JointType, Pose};

/// Current joint values, one variant per joint kind
///
/// The number of stored values is fixed by the variant: 0 for fixed, 1 for
/// revolute/continuous/prismatic, 3 for planar `[x, y, theta]` and 6 for floating
/// `[x, y, z, roll, pitch, yaw]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JointState {
    Fixed,
    Revolute { angle: f64 },
    Continuous { angle: f64 },
    Prismatic { displacement: f64 },
    Planar([f64; 3]),
    Floating([f64; 6]),
}

impl JointState {
    /// Zeroed state for a joint type
    pub fn new(joint_type: JointType) -> Self {
        match joint_type {
            JointType::Fixed => JointState::Fixed,
            JointType::Revolute => JointState::Revolute { angle: 0.0 },
            JointType::Continuous => JointState::Continuous { angle: 0.0 },
            JointType::Prismatic => JointState::Prismatic { displacement: 0.0 },
            JointType::Planar => JointState::Planar([0.0; 3]),
            JointType::Floating => JointState::Floating([0.0; 6]),
        }
    }

    pub fn joint_type(&self) -> JointType {
        match self {
            JointState::Fixed => JointType::Fixed,
            JointState::Revolute { .. } => JointType::Revolute,
            JointState::Continuous { .. } => JointType::Continuous,
            JointState::Prismatic { .. } => JointType::Prismatic,
            JointState::Planar(_) => JointType::Planar,
            JointState::Floating(_) => JointType::Floating,
        }
    }

    pub fn values(&self) -> &[f64] {
        match self {
            JointState::Fixed => &[],
            JointState::Revolute { angle } | JointState::Continuous { angle } => {
                std::slice::from_ref(angle)
            }
            JointState::Prismatic { displacement } => std::slice::from_ref(displacement),
            JointState::Planar(values) => values,
            JointState::Floating(values) => values,
        }
    }
}

/// Where a joint's value comes from
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ValueSource {
    /// Set by the caller
    #[default]
    Direct,
    /// Derived from another joint: `multiplier * driving value + offset`
    Mimic(JointMimic),
}

/// Rest-pose transform captured on the first value update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestPose {
    pub position: DVec3,
    pub rotation: DQuat,
}

impl RestPose {
    fn to_mat4(self) -> DMat4 {
        DMat4::from_rotation_translation(self.rotation, self.position)
    }
}

/// A joint connecting a parent link to a child link
#[derive(Debug, Clone)]
pub struct Joint {
    pub name: String,
    pub urdf_name: String,
    /// Declared `<origin>`
    pub origin: Pose,
    /// Normalized motion axis
    pub axis: DVec3,
    pub limit: JointLimits,
    /// Skip clamping for revolute and prismatic joints
    pub ignore_limits: bool,
    pub parent_link: String,
    pub child_link: String,
    pub value_source: ValueSource,
    /// Joints that mimic this one
    pub mimic_joints: Vec<String>,
    pub(crate) transform: Transform,
    state: JointState,
    rest: Option<RestPose>,
    source: Option<urdf_rs::Joint>,
}

impl Joint {
    /// Create a joint at the identity origin, moving about/along +X
    pub fn new(name: impl Into<String>, joint_type: JointType) -> Self {
        let name = name.into();
        Self {
            urdf_name: name.clone(),
            name,
            origin: Pose::default(),
            axis: DVec3::X,
            limit: JointLimits::default(),
            ignore_limits: false,
            parent_link: String::new(),
            child_link: String::new(),
            value_source: ValueSource::Direct,
            mimic_joints: Vec::new(),
            transform: Transform::IDENTITY,
            state: JointState::new(joint_type),
            rest: None,
            source: None,
        }
    }

    /// Set the rest pose from an `<origin>`
    pub fn with_origin(mut self, origin: Pose) -> Self {
        self.origin = origin;
        self.transform = Transform::from_rotation_translation(origin.to_quat(), origin.position());
        self
    }

    /// Set the motion axis; a zero axis falls back to +X
    pub fn with_axis(mut self, axis: DVec3) -> Self {
        self.axis = axis.try_normalize().unwrap_or(DVec3::X);
        self
    }

    pub fn with_limits(mut self, limit: JointLimits) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_mimic(mut self, mimic: JointMimic) -> Self {
        self.value_source = ValueSource::Mimic(mimic);
        self
    }

    pub fn between(mut self, parent: impl Into<String>, child: impl Into<String>) -> Self {
        self.parent_link = parent.into();
        self.child_link = child.into();
        self
    }

    pub(crate) fn with_source(mut self, source: urdf_rs::Joint) -> Self {
        self.source = Some(source);
        self
    }

    /// The `<joint>` element this node was built from
    pub fn source(&self) -> Option<&urdf_rs::Joint> {
        self.source.as_ref()
    }

    pub fn joint_type(&self) -> JointType {
        self.state.joint_type()
    }

    pub fn state(&self) -> &JointState {
        &self.state
    }

    /// Current values; length is fixed by the joint type
    pub fn joint_value(&self) -> &[f64] {
        self.state.values()
    }

    /// Local transform relative to the parent link
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Rest pose, once captured by the first value update
    pub fn rest_pose(&self) -> Option<RestPose> {
        self.rest
    }

    pub fn mimic(&self) -> Option<&JointMimic> {
        match &self.value_source {
            ValueSource::Mimic(mimic) => Some(mimic),
            ValueSource::Direct => None,
        }
    }

    pub fn is_mimic(&self) -> bool {
        self.mimic().is_some()
    }

    /// Apply new values to this joint only, without mimic propagation
    ///
    /// `None` entries keep the current value. Returns whether the stored values (and
    /// so the local transform) changed.
    pub fn apply_values(&mut self, values: &[Option<f64>]) -> bool {
        let rest = *self.rest.get_or_insert(RestPose {
            position: self.transform.position,
            rotation: self.transform.rotation,
        });
        let value = |i: usize| values.get(i).copied().flatten();
        let limit = (self.joint_type().has_limits() && !self.ignore_limits).then_some(self.limit);
        let bounded = |v: f64| limit.map_or(v, |l| l.clamp(v));

        match &mut self.state {
            JointState::Fixed => false,

            JointState::Revolute { angle } | JointState::Continuous { angle } => {
                let Some(requested) = value(0).map(bounded) else {
                    return false;
                };
                if requested == *angle {
                    return false;
                }
                *angle = requested;
                self.transform.rotation = DQuat::from_axis_angle(self.axis, requested) * rest.rotation;
                true
            }

            JointState::Prismatic { displacement } => {
                let Some(requested) = value(0).map(bounded) else {
                    return false;
                };
                if requested == *displacement {
                    return false;
                }
                *displacement = requested;
                // The axis is expressed in the joint's own frame
                let axis = self.transform.rotation * self.axis;
                self.transform.position = rest.position + axis * requested;
                true
            }

            JointState::Planar(current) => {
                if !merge_values(current, value) {
                    return false;
                }
                let [x, y, theta] = *current;
                let motion = DMat4::from_rotation_translation(
                    DQuat::from_axis_angle(self.axis, theta),
                    DVec3::new(x, y, 0.0),
                );
                apply_motion(&mut self.transform, motion, rest);
                true
            }

            JointState::Floating(current) => {
                if !merge_values(current, value) {
                    return false;
                }
                let [x, y, z, roll, pitch, yaw] = *current;
                let rotation = DQuat::from_rotation_x(roll)
                    * DQuat::from_rotation_y(pitch)
                    * DQuat::from_rotation_z(yaw);
                let motion = DMat4::from_rotation_translation(rotation, DVec3::new(x, y, z));
                apply_motion(&mut self.transform, motion, rest);
                true
            }
        }
    }
}

/// Overwrite the slots that have a new value. Returns false if every slot was either
/// `None` or already equal to the stored value.
fn merge_values<const N: usize>(current: &mut [f64; N], value: impl Fn(usize) -> Option<f64>) -> bool {
    let unchanged = current
        .iter()
        .enumerate()
        .all(|(i, stored)| value(i).is_none_or(|v| v == *stored));
    if unchanged {
        return false;
    }

    for (i, stored) in current.iter_mut().enumerate() {
        if let Some(v) = value(i) {
            *stored = v;
        }
    }
    true
}

/// Premultiply the rest pose by a motion matrix and decompose back into the transform
fn apply_motion(transform: &mut Transform, motion: DMat4, rest: RestPose) {
    let moved = Transform::from_mat4(&(motion * rest.to_mat4()));
    transform.position = moved.position;
    transform.rotation = moved.rotation;
}
