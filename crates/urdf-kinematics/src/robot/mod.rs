//! Robot kinematic tree
//!
//! The tree alternates Link -> Joint -> Link from the root link down. Nodes refer to
//! each other by name; the [`Robot`] owns every node and the name lookup tables.

mod joint;
mod link;
mod pending;

use std::collections::HashMap;

use glam::DMat4;

use crate::scene::Transform;

pub use joint::{Joint, JointState, RestPose, ValueSource};
pub use link::{GeometryKind, GeometryNode, GeometryRef, Link};
pub use pending::{PendingMesh, resolve_all};

/// Named entry in the robot's unified lookup table
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Frame {
    Link(String),
    Joint(String),
    Visual(GeometryRef),
    Collision(GeometryRef),
}

/// Borrowed view of a named node
#[derive(Debug, Clone, Copy)]
pub enum FrameNode<'a> {
    Link(&'a Link),
    Joint(&'a Joint),
    Visual(&'a GeometryNode),
    Collision(&'a GeometryNode),
}

impl FrameNode<'_> {
    pub fn name(&self) -> Option<&str> {
        match self {
            FrameNode::Link(link) => Some(&link.name),
            FrameNode::Joint(joint) => Some(&joint.name),
            FrameNode::Visual(node) | FrameNode::Collision(node) => node.name.as_deref(),
        }
    }

    /// Local transform relative to the node's parent
    pub fn transform(&self) -> &Transform {
        match self {
            FrameNode::Link(link) => &link.transform,
            FrameNode::Joint(joint) => joint.transform(),
            FrameNode::Visual(node) | FrameNode::Collision(node) => &node.transform,
        }
    }
}

/// Value for one joint in a bulk update
#[derive(Debug, Clone, PartialEq)]
pub enum JointValue {
    /// Single-DOF joints
    Scalar(f64),
    /// Multi-DOF joints; `None` keeps the current component
    Multi(Vec<Option<f64>>),
}

impl JointValue {
    pub fn to_values(&self) -> Vec<Option<f64>> {
        match self {
            JointValue::Scalar(v) => vec![Some(*v)],
            JointValue::Multi(values) => values.clone(),
        }
    }
}

impl From<f64> for JointValue {
    fn from(value: f64) -> Self {
        JointValue::Scalar(value)
    }
}

impl From<Vec<f64>> for JointValue {
    fn from(values: Vec<f64>) -> Self {
        JointValue::Multi(values.into_iter().map(Some).collect())
    }
}

impl<const N: usize> From<[f64; N]> for JointValue {
    fn from(values: [f64; N]) -> Self {
        JointValue::Multi(values.into_iter().map(Some).collect())
    }
}

impl From<Vec<Option<f64>>> for JointValue {
    fn from(values: Vec<Option<f64>>) -> Self {
        JointValue::Multi(values)
    }
}

/// Root of a parsed URDF
///
/// Structure is fixed at parse time; only joint values change afterwards.
#[derive(Debug)]
pub struct Robot {
    pub name: String,
    pub urdf_name: String,
    /// Transform of the robot node itself; the root link hangs directly below it
    pub transform: Transform,
    root_link: String,
    /// Links in document order
    link_order: Vec<String>,
    links: HashMap<String, Link>,
    joints: HashMap<String, Joint>,
    visual: HashMap<String, GeometryRef>,
    colliders: HashMap<String, GeometryRef>,
    frames: HashMap<String, Frame>,
    pending_meshes: Vec<PendingMesh>,
}

impl Robot {
    /// Assemble a robot from already wired links and joints
    pub(crate) fn new(
        name: String,
        root_link: String,
        link_order: Vec<String>,
        links: HashMap<String, Link>,
        joints: HashMap<String, Joint>,
        pending_meshes: Vec<PendingMesh>,
    ) -> Self {
        let mut visual = HashMap::new();
        let mut colliders = HashMap::new();
        for link in link_order.iter().filter_map(|name| links.get(name)) {
            register_named(&mut visual, link, GeometryKind::Visual, &link.visuals);
            register_named(&mut colliders, link, GeometryKind::Collision, &link.collisions);
        }

        // Later entries win on name collision: colliders < visual < links < joints
        let mut frames = HashMap::new();
        frames.extend(colliders.iter().map(|(n, r)| (n.clone(), Frame::Collision(r.clone()))));
        frames.extend(visual.iter().map(|(n, r)| (n.clone(), Frame::Visual(r.clone()))));
        frames.extend(links.keys().map(|n| (n.clone(), Frame::Link(n.clone()))));
        frames.extend(joints.keys().map(|n| (n.clone(), Frame::Joint(n.clone()))));

        Self {
            urdf_name: name.clone(),
            name,
            transform: Transform::IDENTITY,
            root_link,
            link_order,
            links,
            joints,
            visual,
            colliders,
            frames,
            pending_meshes,
        }
    }

    pub fn root_link(&self) -> &Link {
        &self.links[&self.root_link]
    }

    pub fn link(&self, name: &str) -> Option<&Link> {
        self.links.get(name)
    }

    pub fn joint(&self, name: &str) -> Option<&Joint> {
        self.joints.get(name)
    }

    pub fn links(&self) -> &HashMap<String, Link> {
        &self.links
    }

    pub fn joints(&self) -> &HashMap<String, Joint> {
        &self.joints
    }

    /// Links in document order
    pub fn links_in_order(&self) -> impl Iterator<Item = &Link> {
        self.link_order.iter().filter_map(|name| self.links.get(name))
    }

    /// Named `<visual>` nodes
    pub fn visual(&self) -> &HashMap<String, GeometryRef> {
        &self.visual
    }

    /// Named `<collision>` nodes
    pub fn colliders(&self) -> &HashMap<String, GeometryRef> {
        &self.colliders
    }

    pub fn frames(&self) -> &HashMap<String, Frame> {
        &self.frames
    }

    pub fn geometry(&self, reference: &GeometryRef) -> Option<&GeometryNode> {
        self.links
            .get(&reference.link)?
            .geometry(reference.kind, reference.index)
    }

    /// Look up any named link, joint, visual or collision node
    pub fn get_frame(&self, name: &str) -> Option<FrameNode<'_>> {
        match self.frames.get(name)? {
            Frame::Link(link) => self.links.get(link).map(FrameNode::Link),
            Frame::Joint(joint) => self.joints.get(joint).map(FrameNode::Joint),
            Frame::Visual(r) => self.geometry(r).map(FrameNode::Visual),
            Frame::Collision(r) => self.geometry(r).map(FrameNode::Collision),
        }
    }

    /// World transform of a named frame
    pub fn world_transform(&self, name: &str) -> Option<DMat4> {
        match self.frames.get(name)? {
            Frame::Link(link) => self.link_world_transform(link),
            Frame::Joint(joint) => self.joint_world_transform(joint),
            Frame::Visual(r) | Frame::Collision(r) => {
                let node = self.geometry(r)?;
                Some(self.link_world_transform(&r.link)? * node.transform.to_mat4())
            }
        }
    }

    fn link_world_transform(&self, name: &str) -> Option<DMat4> {
        let link = self.links.get(name)?;
        let parent = match &link.parent_joint {
            Some(joint) => self.joint_world_transform(joint)?,
            None => self.transform.to_mat4(),
        };
        Some(parent * link.transform.to_mat4())
    }

    fn joint_world_transform(&self, name: &str) -> Option<DMat4> {
        let joint = self.joints.get(name)?;
        Some(self.link_world_transform(&joint.parent_link)? * joint.transform().to_mat4())
    }

    /// Set a joint's values and propagate to the joints that mimic it
    ///
    /// Returns whether any joint changed. Unknown names return `false`. Mimic joints are
    /// only driven through their source joint, so setting one directly is ignored.
    pub fn set_joint_value(&mut self, name: &str, values: &[Option<f64>]) -> bool {
        let Some(joint) = self.joints.get(name) else {
            tracing::debug!("set_joint_value: unknown joint '{}'", name);
            return false;
        };
        if let Some(mimic) = joint.mimic() {
            tracing::warn!(
                "Joint '{}' mimics '{}' and cannot be set directly",
                name,
                mimic.joint
            );
            return false;
        }
        self.drive_joint(name, values)
    }

    /// Bulk variant of [`Robot::set_joint_value`]
    pub fn set_joint_values<I, K, V>(&mut self, values: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<JointValue>,
    {
        let mut changed = false;
        for (name, value) in values {
            changed |= self.set_joint_value(name.as_ref(), &value.into().to_values());
        }
        changed
    }

    /// Toggle limit clamping on every joint
    pub fn set_ignore_limits(&mut self, ignore: bool) {
        for joint in self.joints.values_mut() {
            joint.ignore_limits = ignore;
        }
    }

    /// Hand the mesh loads started during parsing to the caller
    pub fn take_pending_meshes(&mut self) -> Vec<PendingMesh> {
        std::mem::take(&mut self.pending_meshes)
    }

    pub fn pending_mesh_count(&self) -> usize {
        self.pending_meshes.len()
    }

    fn drive_joint(&mut self, name: &str, values: &[Option<f64>]) -> bool {
        let Some(joint) = self.joints.get_mut(name) else {
            return false;
        };
        let mut changed = joint.apply_values(values);

        // Mimics follow the freshly stored value; a fixed joint has none, so it
        // forwards what it was given
        let driving: Vec<Option<f64>> = if joint.joint_value().is_empty() {
            values.to_vec()
        } else {
            joint.joint_value().iter().copied().map(Some).collect()
        };
        let mimics = joint.mimic_joints.clone();

        for mimic_name in &mimics {
            let Some(mimic) = self.joints.get(mimic_name).and_then(Joint::mimic) else {
                continue;
            };
            let mapped: Vec<Option<f64>> = driving
                .iter()
                .map(|v| v.map(|v| mimic.calculate(v)))
                .collect();
            changed |= self.drive_joint(mimic_name, &mapped);
        }
        changed
    }
}

fn register_named(
    map: &mut HashMap<String, GeometryRef>,
    link: &Link,
    kind: GeometryKind,
    nodes: &[GeometryNode],
) {
    for (index, node) in nodes.iter().enumerate() {
        if let Some(name) = &node.name {
            map.insert(
                name.clone(),
                GeometryRef {
                    link: link.name.clone(),
                    kind,
                    index,
                },
            );
        }
    }
}
