//! Joint construction, tree wiring and mimic resolution

use std::collections::{HashMap, HashSet};

use glam::DVec3;

use crate::error::LoadError;
use crate::robot::{Joint, Link, ValueSource};
use crate::types::{JointLimits, JointMimic, JointType, Pose};

use super::UrdfLoader;

impl UrdfLoader {
    /// Build a joint from its `<joint>` element
    pub(crate) fn build_joint(&self, source: &urdf_rs::Joint) -> Result<Joint, LoadError> {
        let joint_type = JointType::try_from(&source.joint_type)?;

        let mut joint = Joint::new(&source.name, joint_type)
            .with_origin(Pose::from(&source.origin))
            .with_axis(DVec3::from(source.axis.xyz.0))
            .with_limits(JointLimits::from(&source.limit))
            .between(&source.parent.link, &source.child.link)
            .with_source(source.clone());

        if let Some(mimic) = &source.mimic {
            joint = joint.with_mimic(JointMimic::from(mimic));
        }
        joint.ignore_limits = self.ignore_limits;

        Ok(joint)
    }
}

/// Hang each joint below its parent link and each child link below its joint
///
/// A link can only hang from one joint; a second parent is fatal.
pub(crate) fn wire_joint(links: &mut HashMap<String, Link>, joint: &Joint) -> Result<(), LoadError> {
    for name in [&joint.parent_link, &joint.child_link] {
        if !links.contains_key(name) {
            return Err(LoadError::LinkNotFound {
                joint: joint.name.clone(),
                link: name.clone(),
            });
        }
    }

    if let Some(previous) = links.get(&joint.child_link).and_then(|l| l.parent_joint.as_ref()) {
        return Err(LoadError::MultipleParents {
            link: joint.child_link.clone(),
            first: previous.clone(),
            second: joint.name.clone(),
        });
    }

    if let Some(parent) = links.get_mut(&joint.parent_link) {
        parent.child_joints.push(joint.name.clone());
    }
    if let Some(child) = links.get_mut(&joint.child_link) {
        child.parent_joint = Some(joint.name.clone());
    }
    Ok(())
}

/// Reject links that no root link reaches through the joint tree
///
/// With one parent per link, such links can only sit on a closed joint loop.
pub(crate) fn check_reachable(
    links: &HashMap<String, Link>,
    joints: &HashMap<String, Joint>,
    order: &[String],
) -> Result<(), LoadError> {
    let mut stack: Vec<&str> = order
        .iter()
        .filter(|name| links.get(*name).is_some_and(Link::is_root))
        .map(String::as_str)
        .collect();
    let mut reached = HashSet::new();

    while let Some(name) = stack.pop() {
        if !reached.insert(name) {
            continue;
        }
        let Some(link) = links.get(name) else {
            continue;
        };
        stack.extend(
            link.child_joints
                .iter()
                .filter_map(|joint| joints.get(joint))
                .map(|joint| joint.child_link.as_str()),
        );
    }

    match order.iter().find(|name| !reached.contains(name.as_str())) {
        Some(link) => Err(LoadError::KinematicLoop { link: link.clone() }),
        None => Ok(()),
    }
}

/// Register every mimic joint with the joint it follows, then reject mimic cycles
///
/// `order` is the document order of the joints, so each driver lists its mimics
/// deterministically. A mimic naming an unknown joint is demoted to a direct joint.
pub(crate) fn link_mimic_joints(
    joints: &mut HashMap<String, Joint>,
    order: &[String],
) -> Result<(), LoadError> {
    for name in order {
        let Some(target) = joints.get(name).and_then(Joint::mimic).map(|m| m.joint.clone()) else {
            continue;
        };

        match joints.get_mut(&target) {
            Some(driver) => driver.mimic_joints.push(name.clone()),
            None => {
                tracing::warn!(
                    "Joint '{}' mimics unknown joint '{}', treating it as a direct joint",
                    name,
                    target
                );
                if let Some(joint) = joints.get_mut(name) {
                    joint.value_source = ValueSource::Direct;
                }
            }
        }
    }

    for name in order {
        check_mimic_cycle(joints, name, &mut HashSet::new())?;
    }
    Ok(())
}

fn check_mimic_cycle<'a>(
    joints: &'a HashMap<String, Joint>,
    name: &'a str,
    seen: &mut HashSet<&'a str>,
) -> Result<(), LoadError> {
    if !seen.insert(name) {
        return Err(LoadError::MimicCycle {
            joint: name.to_string(),
        });
    }

    if let Some(joint) = joints.get(name) {
        for mimic in &joint.mimic_joints {
            check_mimic_cycle(joints, mimic, seen)?;
        }
    }
    Ok(())
}
