//! URDF loading
//!
//! Parses URDF text (or an already parsed `urdf_rs::Robot`) into a [`Robot`]:
//! 1. document-level materials into a name table
//! 2. every `<link>` with its visual and collision nodes
//! 3. every `<joint>`, hung between its parent and child links
//! 4. mimic back-references, rejecting mimic cycles
//! 5. the root link: the first link that is no joint's child
//!
//! A link with two parent joints, or a link on a joint loop no root reaches, is fatal.

mod geometry;
mod joint;
mod link;
mod material;
mod normalize;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::config::LoaderConfig;
use crate::error::LoadError;
use crate::mesh::{FileMeshLoader, MeshLoader};
use crate::package::PackageResolver;
use crate::robot::Robot;
use crate::scene::DEFAULT_COLOR;

/// Builds [`Robot`] trees from URDF documents
#[derive(Clone)]
pub struct UrdfLoader {
    working_path: String,
    packages: PackageResolver,
    mesh_loader: Arc<dyn MeshLoader>,
    parse_visual: bool,
    parse_collision: bool,
    ignore_limits: bool,
    default_color: [f32; 4],
}

impl Default for UrdfLoader {
    fn default() -> Self {
        Self {
            working_path: String::new(),
            packages: PackageResolver::default(),
            mesh_loader: Arc::new(FileMeshLoader),
            parse_visual: true,
            parse_collision: true,
            ignore_limits: false,
            default_color: DEFAULT_COLOR,
        }
    }
}

impl std::fmt::Debug for UrdfLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrdfLoader")
            .field("working_path", &self.working_path)
            .field("packages", &self.packages)
            .field("parse_visual", &self.parse_visual)
            .field("parse_collision", &self.parse_collision)
            .field("ignore_limits", &self.ignore_limits)
            .field("default_color", &self.default_color)
            .finish_non_exhaustive()
    }
}

impl UrdfLoader {
    /// Loader with default options and the filesystem mesh loader
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &LoaderConfig) -> Self {
        Self {
            working_path: config.working_path.clone(),
            packages: config.package_resolver(),
            parse_visual: config.parse_visual,
            parse_collision: config.parse_collision,
            ignore_limits: config.ignore_limits,
            default_color: config.default_color,
            ..Self::default()
        }
    }

    /// Replace the mesh loader
    pub fn with_mesh_loader(mut self, loader: impl MeshLoader + 'static) -> Self {
        self.mesh_loader = Arc::new(loader);
        self
    }

    pub fn with_packages(mut self, packages: PackageResolver) -> Self {
        self.packages = packages;
        self
    }

    /// Prefix for filenames that are not `package://` references
    pub fn with_working_path(mut self, working_path: impl Into<String>) -> Self {
        self.working_path = working_path.into();
        self
    }

    pub fn parse_visual(mut self, enabled: bool) -> Self {
        self.parse_visual = enabled;
        self
    }

    pub fn parse_collision(mut self, enabled: bool) -> Self {
        self.parse_collision = enabled;
        self
    }

    pub fn ignore_limits(mut self, ignore: bool) -> Self {
        self.ignore_limits = ignore;
        self
    }

    pub fn working_path(&self) -> &str {
        &self.working_path
    }

    /// Resolve a mesh or texture filename; `None` for an unknown package
    pub fn resolve_path(&self, filename: &str) -> Option<String> {
        self.packages.resolve_path(filename, &self.working_path)
    }

    /// Parse URDF XML text
    pub fn parse(&self, xml: &str) -> Result<Robot, LoadError> {
        let xml = normalize::normalize(xml)?;
        let robot = urdf_rs::read_from_string(&xml).map_err(|e| LoadError::Parse(e.to_string()))?;
        self.parse_robot(&robot)
    }

    /// Read and parse a URDF file
    ///
    /// Without a configured working path, relative mesh paths resolve against the
    /// file's directory.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Robot, LoadError> {
        let path = path.as_ref();
        let xml = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if !self.working_path.is_empty() {
            return self.parse(&xml);
        }

        let base_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| format!("{}/", p.to_string_lossy().trim_end_matches('/')))
            .unwrap_or_default();
        self.clone().with_working_path(base_dir).parse(&xml)
    }

    /// Build the kinematic tree from a parsed document
    pub fn parse_robot(&self, document: &urdf_rs::Robot) -> Result<Robot, LoadError> {
        let materials = self.material_table(&document.materials);
        let mut pending = Vec::new();

        let mut link_order = Vec::with_capacity(document.links.len());
        let mut links = HashMap::with_capacity(document.links.len());
        for source in &document.links {
            let link = self.build_link(source, &materials, &mut pending);
            if links.insert(link.name.clone(), link).is_some() {
                tracing::warn!("Duplicate link '{}', keeping the last definition", source.name);
            } else {
                link_order.push(source.name.clone());
            }
        }

        let mut joint_order = Vec::with_capacity(document.joints.len());
        let mut joints = HashMap::with_capacity(document.joints.len());
        for source in &document.joints {
            let joint = self.build_joint(source)?;
            joint::wire_joint(&mut links, &joint)?;
            if joints.insert(joint.name.clone(), joint).is_some() {
                tracing::warn!("Duplicate joint '{}', keeping the last definition", source.name);
            } else {
                joint_order.push(source.name.clone());
            }
        }

        joint::link_mimic_joints(&mut joints, &joint_order)?;

        let roots: Vec<&String> = link_order
            .iter()
            .filter(|name| links.get(*name).is_some_and(|l| l.is_root()))
            .collect();
        let root_link = roots.first().map(|name| (*name).clone()).ok_or(LoadError::NoRootLink)?;
        if roots.len() > 1 {
            tracing::warn!(
                "Robot '{}' has {} root links, using '{}'",
                document.name,
                roots.len(),
                root_link
            );
        }
        joint::check_reachable(&links, &joints, &link_order)?;

        tracing::debug!(
            "Parsed robot '{}': {} links, {} joints, root '{}', {} pending meshes",
            document.name,
            links.len(),
            joints.len(),
            root_link,
            pending.len()
        );

        Ok(Robot::new(
            document.name.clone(),
            root_link,
            link_order,
            links,
            joints,
            pending,
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use approx::assert_abs_diff_eq;
    use glam::{DMat4, DVec3};

    use super::*;
    use crate::error::MeshError;
    use crate::mesh::MeshFuture;
    use crate::robot::{FrameNode, GeometryKind, JointValue, resolve_all};
    use crate::scene::{MeshData, SceneNode};
    use crate::types::{JointLimits, JointType};

    const ARM: &str = r#"<?xml version="1.0"?>
    <robot name="arm">
      <material name="blue">
        <color rgba="0 0 1 1"/>
      </material>

      <link name="base">
        <visual name="base_shell">
          <geometry><box size="1 1 0.2"/></geometry>
          <material name="blue"/>
        </visual>
        <collision name="base_hull">
          <geometry><cylinder radius="0.5" length="0.2"/></geometry>
        </collision>
      </link>

      <link name="upper">
        <visual>
          <origin xyz="0 0 0.5" rpy="0 0 0"/>
          <geometry><sphere radius="0.1"/></geometry>
          <material name="chrome"/>
        </visual>
      </link>

      <joint name="shoulder" type="revolute">
        <origin xyz="0 0 1" rpy="0 0 0"/>
        <parent link="base"/>
        <child link="upper"/>
        <axis xyz="0 0 1"/>
        <limit lower="-2" upper="2" effort="10" velocity="1"/>
      </joint>
    </robot>
    "#;

    fn gripper_urdf(mimic: &str) -> String {
        format!(
            r#"<robot name="gripper">
      <link name="palm"/>
      <link name="left"/>
      <link name="right"/>
      <joint name="left_finger" type="revolute">
        <parent link="palm"/>
        <child link="left"/>
        <axis xyz="0 1 0"/>
        <limit lower="-1" upper="1" effort="1" velocity="1"/>
      </joint>
      <joint name="right_finger" type="revolute">
        <parent link="palm"/>
        <child link="right"/>
        <axis xyz="0 1 0"/>
        <limit lower="-3" upper="3" effort="1" velocity="1"/>
        {mimic}
      </joint>
    </robot>"#
        )
    }

    fn assert_mat_eq(actual: DMat4, expected: DMat4) {
        for (a, e) in actual.to_cols_array().iter().zip(expected.to_cols_array()) {
            assert_abs_diff_eq!(*a, e, epsilon = 1e-9);
        }
    }

    fn ready_loader(url: &str) -> MeshFuture {
        let node = SceneNode::triangles(MeshData::default(), None).named(url);
        Box::pin(std::future::ready(Ok(node)))
    }

    #[test]
    fn test_parse_two_link_arm() {
        let robot = UrdfLoader::new().parse(ARM).unwrap();

        assert_eq!(robot.name, "arm");
        assert_eq!(robot.root_link().name, "base");
        assert_eq!(robot.links().len(), 2);
        assert_eq!(robot.joints().len(), 1);

        let shoulder = robot.joint("shoulder").unwrap();
        assert_eq!(shoulder.joint_type(), JointType::Revolute);
        assert_eq!(shoulder.parent_link, "base");
        assert_eq!(shoulder.child_link, "upper");
        assert_eq!(shoulder.axis, DVec3::Z);
        assert_eq!(shoulder.limit.lower, -2.0);
        assert_eq!(shoulder.source().unwrap().name, "shoulder");

        assert_eq!(robot.link("base").unwrap().child_joints, vec!["shoulder".to_string()]);
        assert_eq!(robot.link("upper").unwrap().parent_joint.as_deref(), Some("shoulder"));
    }

    #[test]
    fn test_revolute_drives_child_link() {
        let mut robot = UrdfLoader::new().parse(ARM).unwrap();

        assert!(robot.set_joint_value("shoulder", &[Some(FRAC_PI_2)]));

        assert_mat_eq(robot.world_transform("base").unwrap(), DMat4::IDENTITY);

        let upper = robot.world_transform("upper").unwrap();
        let expected = DMat4::from_translation(DVec3::new(0.0, 0.0, 1.0))
            * DMat4::from_rotation_z(FRAC_PI_2);
        assert_mat_eq(upper, expected);

        let x = upper.transform_vector3(DVec3::X);
        assert_abs_diff_eq!(x.y, 1.0, epsilon = 1e-9);

        // Geometry follows the link: the sphere sits 0.5 along the link's Z
        let sphere = robot
            .link("upper")
            .map(|l| upper * l.visuals[0].transform.to_mat4())
            .unwrap();
        assert_abs_diff_eq!(sphere.w_axis.z, 1.5, epsilon = 1e-9);
    }

    #[test]
    fn test_same_value_reports_no_change() {
        let mut robot = UrdfLoader::new().parse(ARM).unwrap();
        assert!(robot.set_joint_value("shoulder", &[Some(0.5)]));
        let before = *robot.joint("shoulder").unwrap().transform();

        assert!(!robot.set_joint_value("shoulder", &[Some(0.5)]));
        assert_eq!(*robot.joint("shoulder").unwrap().transform(), before);
        assert!(!robot.set_joint_value("elbow", &[Some(0.5)]));
    }

    #[test]
    fn test_materials_resolve_by_name() {
        let robot = UrdfLoader::new().parse(ARM).unwrap();

        let base = robot.link("base").unwrap();
        let material = base.visuals[0].children[0].mesh.as_ref().unwrap().material.clone().unwrap();
        assert_eq!(material.name, "blue");
        assert_eq!(material.color, [0.0, 0.0, 1.0, 1.0]);

        // Unknown material reference falls back to the default color
        let upper = robot.link("upper").unwrap();
        let material = upper.visuals[0].children[0].mesh.as_ref().unwrap().material.clone().unwrap();
        assert_eq!(material.color, crate::scene::DEFAULT_COLOR);

        // Collision geometry carries no material
        assert!(base.collisions[0].children[0].mesh.as_ref().unwrap().material.is_none());
    }

    #[test]
    fn test_named_frames() {
        let robot = UrdfLoader::new().parse(ARM).unwrap();

        assert!(matches!(robot.get_frame("base"), Some(FrameNode::Link(_))));
        assert!(matches!(robot.get_frame("shoulder"), Some(FrameNode::Joint(_))));
        assert!(matches!(
            robot.get_frame("base_shell"),
            Some(FrameNode::Visual(node)) if node.kind == GeometryKind::Visual
        ));
        assert!(matches!(robot.get_frame("base_hull"), Some(FrameNode::Collision(_))));
        assert!(robot.get_frame("nothing").is_none());

        assert_eq!(robot.visual().len(), 1);
        assert_eq!(robot.colliders().len(), 1);
        assert_eq!(robot.frames().len(), 5);
    }

    #[test]
    fn test_joint_names_win_frame_collisions() {
        let xml = r#"<robot name="r">
      <link name="a">
        <visual name="j"><geometry><sphere radius="1"/></geometry></visual>
        <collision name="a"><geometry><sphere radius="1"/></geometry></collision>
      </link>
      <link name="b"/>
      <joint name="j" type="fixed"><parent link="a"/><child link="b"/></joint>
    </robot>"#;

        let robot = UrdfLoader::new().parse(xml).unwrap();
        assert!(matches!(robot.get_frame("j"), Some(FrameNode::Joint(_))));
        assert!(matches!(robot.get_frame("a"), Some(FrameNode::Link(_))));
        // Still reachable through their own tables
        assert!(robot.visual().contains_key("j"));
        assert!(robot.colliders().contains_key("a"));
    }

    #[test]
    fn test_parse_collision_disabled() {
        let robot = UrdfLoader::new().parse_collision(false).parse(ARM).unwrap();
        assert!(robot.link("base").unwrap().collisions.is_empty());
        assert!(robot.colliders().is_empty());
        assert_eq!(robot.link("base").unwrap().visuals.len(), 1);
    }

    #[test]
    fn test_mimic_propagation() {
        let xml = gripper_urdf(r#"<mimic joint="left_finger" multiplier="2" offset="0.1"/>"#);
        let mut robot = UrdfLoader::new().parse(&xml).unwrap();

        assert_eq!(
            robot.joint("left_finger").unwrap().mimic_joints,
            vec!["right_finger".to_string()]
        );

        assert!(robot.set_joint_value("left_finger", &[Some(0.3)]));
        assert_eq!(robot.joint("left_finger").unwrap().joint_value(), &[0.3]);
        assert_eq!(robot.joint("right_finger").unwrap().joint_value(), &[0.7]);
    }

    #[test]
    fn test_mimic_uses_clamped_driver_value() {
        let xml = gripper_urdf(r#"<mimic joint="left_finger" multiplier="2" offset="0.1"/>"#);
        let mut robot = UrdfLoader::new().parse(&xml).unwrap();

        robot.set_joint_value("left_finger", &[Some(5.0)]);
        assert_eq!(robot.joint("left_finger").unwrap().joint_value(), &[1.0]);
        assert_abs_diff_eq!(robot.joint("right_finger").unwrap().joint_value()[0], 2.1, epsilon = 1e-12);
    }

    #[test]
    fn test_mimic_cannot_be_set_directly() {
        let xml = gripper_urdf(r#"<mimic joint="left_finger"/>"#);
        let mut robot = UrdfLoader::new().parse(&xml).unwrap();

        assert!(!robot.set_joint_value("right_finger", &[Some(0.5)]));
        assert_eq!(robot.joint("right_finger").unwrap().joint_value(), &[0.0]);
    }

    #[test]
    fn test_mimic_cycle_is_fatal() {
        let xml = r#"<robot name="loop">
      <link name="a"/>
      <link name="b"/>
      <link name="c"/>
      <joint name="x" type="revolute">
        <parent link="a"/><child link="b"/>
        <limit lower="-1" upper="1" effort="1" velocity="1"/>
        <mimic joint="y"/>
      </joint>
      <joint name="y" type="revolute">
        <parent link="b"/><child link="c"/>
        <limit lower="-1" upper="1" effort="1" velocity="1"/>
        <mimic joint="x"/>
      </joint>
    </robot>"#;

        let result = UrdfLoader::new().parse(xml);
        assert!(matches!(result, Err(LoadError::MimicCycle { .. })));
    }

    #[test]
    fn test_fixed_joint_drives_mimic() {
        let xml = r#"<robot name="r">
      <link name="a"/>
      <link name="b"/>
      <link name="c"/>
      <joint name="weld" type="fixed"><parent link="a"/><child link="b"/></joint>
      <joint name="follower" type="continuous">
        <parent link="b"/><child link="c"/>
        <mimic joint="weld" multiplier="-1"/>
      </joint>
    </robot>"#;

        let mut robot = UrdfLoader::new().parse(xml).unwrap();
        assert!(robot.set_joint_value("weld", &[Some(0.25)]));
        assert!(robot.joint("weld").unwrap().joint_value().is_empty());
        assert_eq!(robot.joint("follower").unwrap().joint_value(), &[-0.25]);
    }

    #[test]
    fn test_floating_bulk_and_partial_update() {
        let xml = r#"<robot name="r">
      <link name="world"/>
      <link name="body"/>
      <joint name="free" type="floating"><parent link="world"/><child link="body"/></joint>
    </robot>"#;

        let mut robot = UrdfLoader::new().parse(xml).unwrap();
        assert!(robot.set_joint_values([("free", JointValue::from([1.0, 2.0, 3.0, 0.0, 0.0, 0.0]))]));

        let partial = vec![None, None, Some(5.0), None, None, None];
        assert!(robot.set_joint_values([("free", partial)]));
        assert_eq!(robot.joint("free").unwrap().joint_value(), &[1.0, 2.0, 5.0, 0.0, 0.0, 0.0]);

        let body = robot.world_transform("body").unwrap();
        assert_abs_diff_eq!(body.w_axis.z, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bulk_scalar_values() {
        let mut robot = UrdfLoader::new().parse(ARM).unwrap();
        assert!(robot.set_joint_values([("shoulder", 1.0), ("missing", 2.0)]));
        assert_eq!(robot.joint("shoulder").unwrap().joint_value(), &[1.0]);
        assert!(!robot.set_joint_values([("shoulder", 1.0)]));
    }

    #[test]
    fn test_ignore_limits() {
        let mut robot = UrdfLoader::new().ignore_limits(true).parse(ARM).unwrap();
        robot.set_joint_value("shoulder", &[Some(3.0)]);
        assert_eq!(robot.joint("shoulder").unwrap().joint_value(), &[3.0]);

        robot.set_ignore_limits(false);
        robot.set_joint_value("shoulder", &[Some(4.0)]);
        assert_eq!(robot.joint("shoulder").unwrap().joint_value(), &[2.0]);
    }

    #[test]
    fn test_missing_robot_element() {
        let result = UrdfLoader::new().parse(r#"<model name="x"><link name="a"/></model>"#);
        assert!(matches!(result, Err(LoadError::MissingRobot)));
    }

    #[test]
    fn test_spherical_joint_is_rejected() {
        let xml = r#"<robot name="r">
      <link name="a"/>
      <link name="b"/>
      <joint name="ball" type="spherical"><parent link="a"/><child link="b"/></joint>
    </robot>"#;

        let result = UrdfLoader::new().parse(xml);
        assert!(matches!(result, Err(LoadError::UnknownJointType(_))));
    }

    #[test]
    fn test_joint_to_unknown_link() {
        let xml = r#"<robot name="r">
      <link name="a"/>
      <joint name="j" type="fixed"><parent link="a"/><child link="ghost"/></joint>
    </robot>"#;

        let result = UrdfLoader::new().parse(xml);
        assert!(matches!(
            result,
            Err(LoadError::LinkNotFound { joint, link }) if joint == "j" && link == "ghost"
        ));
    }

    #[test]
    fn test_unknown_package_mesh_is_skipped() {
        let xml = r#"<robot name="r">
      <link name="a">
        <visual><geometry><mesh filename="package://nope/x.stl"/></geometry></visual>
      </link>
    </robot>"#;

        let robot = UrdfLoader::new()
            .with_packages(PackageResolver::map([("arm", "/arm")]))
            .with_mesh_loader(ready_loader)
            .parse(xml)
            .unwrap();

        assert_eq!(robot.pending_mesh_count(), 0);
        let visual = &robot.link("a").unwrap().visuals[0];
        assert_eq!(visual.geometry_count(), 0);
    }

    #[test]
    fn test_meshes_attach_when_resolved() {
        let xml = r#"<robot name="r">
      <material name="red"><color rgba="1 0 0 1"/></material>
      <link name="a">
        <visual name="shell">
          <origin xyz="1 0 0"/>
          <geometry><mesh filename="package://arm/meshes/shell.stl" scale="2 2 2"/></geometry>
          <material name="red"/>
        </visual>
        <collision>
          <geometry><mesh filename="meshes/hull.stl"/></geometry>
        </collision>
      </link>
    </robot>"#;

        let mut robot = UrdfLoader::new()
            .with_packages(PackageResolver::base("/share"))
            .with_working_path("/robot/")
            .with_mesh_loader(ready_loader)
            .parse(xml)
            .unwrap();

        let pending = robot.take_pending_meshes();
        let mut urls: Vec<&str> = pending.iter().map(|p| p.url()).collect();
        urls.sort_unstable();
        assert_eq!(urls, vec!["/robot/meshes/hull.stl", "/share/arm/meshes/shell.stl"]);

        let shell = robot.link("a").unwrap();
        assert_eq!(shell.visuals[0].geometry_count(), 0);

        assert_eq!(pollster::block_on(resolve_all(pending)), 2);

        let visual = robot.link("a").unwrap().visuals[0].mesh().unwrap();
        assert_eq!(visual.name.as_deref(), Some("/share/arm/meshes/shell.stl"));
        assert!(visual.transform.is_identity());
        assert_eq!(visual.mesh.unwrap().material.unwrap().color, [1.0, 0.0, 0.0, 1.0]);

        let shell = robot.link("a").unwrap();
        assert_eq!(shell.visuals[0].transform.scale, DVec3::splat(2.0));
        assert_eq!(shell.visuals[0].transform.position, DVec3::X);
        assert_eq!(shell.collisions[0].geometry_count(), 1);
    }

    #[test]
    fn test_mesh_after_robot_dropped() {
        let xml = r#"<robot name="r">
      <link name="a">
        <visual><geometry><mesh filename="a.stl"/></geometry></visual>
      </link>
    </robot>"#;

        let mut robot = UrdfLoader::new().with_mesh_loader(ready_loader).parse(xml).unwrap();
        let pending = robot.take_pending_meshes();
        drop(robot);

        assert_eq!(pollster::block_on(resolve_all(pending)), 0);
    }

    #[test]
    fn test_failed_mesh_leaves_node_empty() {
        let xml = r#"<robot name="r">
      <link name="a">
        <visual><geometry><mesh filename="a.obj"/></geometry></visual>
      </link>
    </robot>"#;

        let failing = |url: &str| -> MeshFuture {
            Box::pin(std::future::ready(Err(MeshError::UnsupportedFormat(url.to_string()))))
        };
        let mut robot = UrdfLoader::new().with_mesh_loader(failing).parse(xml).unwrap();

        assert_eq!(pollster::block_on(resolve_all(robot.take_pending_meshes())), 0);
        assert_eq!(robot.link("a").unwrap().visuals[0].geometry_count(), 0);
    }

    #[test]
    fn test_load_file_uses_file_directory() {
        let dir = std::env::temp_dir().join(format!("urdf-kinematics-load-{}", std::process::id()));
        std::fs::create_dir_all(dir.join("meshes")).unwrap();
        std::fs::write(
            dir.join("meshes/part.stl"),
            "solid p\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 1 0 0\nvertex 0 1 0\nendloop\nendfacet\nendsolid p\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("robot.urdf"),
            r#"<robot name="disk">
      <link name="a">
        <visual><geometry><mesh filename="meshes/part.stl"/></geometry></visual>
      </link>
    </robot>"#,
        )
        .unwrap();

        let mut robot = UrdfLoader::new().load_file(dir.join("robot.urdf")).unwrap();
        let attached = pollster::block_on(resolve_all(robot.take_pending_meshes()));
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(attached, 1);
        let mesh = robot.link("a").unwrap().visuals[0].mesh().unwrap();
        assert_eq!(mesh.name.as_deref(), Some("part"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = UrdfLoader::new().load_file("/no/such/robot.urdf");
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }

    #[test]
    fn test_from_config() {
        let config = LoaderConfig {
            working_path: "/robots/".into(),
            parse_visual: false,
            ignore_limits: true,
            ..LoaderConfig::default()
        };

        let loader = UrdfLoader::from_config(&config);
        assert_eq!(loader.working_path(), "/robots/");

        let mut robot = loader.parse(ARM).unwrap();
        assert!(robot.link("base").unwrap().visuals.is_empty());
        robot.set_joint_value("shoulder", &[Some(10.0)]);
        assert_eq!(robot.joint("shoulder").unwrap().joint_value(), &[10.0]);
    }

    #[test]
    fn test_mimic_chain_propagates_transitively() {
        let xml = r#"<robot name="chain">
  <link name="l0"/>
  <link name="l1"/>
  <link name="l2"/>
  <link name="l3"/>
  <joint name="a" type="revolute">
    <parent link="l0"/><child link="l1"/>
    <limit lower="-10" upper="10" effort="1" velocity="1"/>
  </joint>
  <joint name="b" type="revolute">
    <parent link="l1"/><child link="l2"/>
    <limit lower="-10" upper="10" effort="1" velocity="1"/>
    <mimic joint="a" multiplier="2"/>
  </joint>
  <joint name="c" type="prismatic">
    <parent link="l2"/><child link="l3"/>
    <limit lower="-10" upper="10" effort="1" velocity="1"/>
    <mimic joint="b" offset="1"/>
  </joint>
</robot>"#;

        let mut robot = UrdfLoader::new().parse(xml).unwrap();
        assert!(robot.set_joint_value("a", &[Some(0.5)]));
        assert_eq!(robot.joint("b").unwrap().joint_value(), &[1.0]);
        assert_eq!(robot.joint("c").unwrap().joint_value(), &[2.0]);
    }

    #[test]
    fn test_mimic_is_clamped_by_its_own_limits() {
        let xml = gripper_urdf(r#"<mimic joint="left_finger" multiplier="5"/>"#);
        let mut robot = UrdfLoader::new().parse(&xml).unwrap();

        robot.set_joint_value("left_finger", &[Some(0.9)]);
        assert_eq!(robot.joint("left_finger").unwrap().joint_value(), &[0.9]);
        assert_eq!(robot.joint("right_finger").unwrap().joint_value(), &[3.0]);
    }

    #[test]
    fn test_link_with_two_parents_is_fatal() {
        let xml = r#"<robot name="r">
  <link name="r0"/>
  <link name="a"/>
  <link name="b"/>
  <joint name="j1" type="fixed"><parent link="r0"/><child link="a"/></joint>
  <joint name="j2" type="fixed"><parent link="a"/><child link="b"/></joint>
  <joint name="j3" type="fixed"><parent link="b"/><child link="a"/></joint>
</robot>"#;

        let result = UrdfLoader::new().parse(xml);
        assert!(matches!(
            result,
            Err(LoadError::MultipleParents { link, first, second })
                if link == "a" && first == "j1" && second == "j3"
        ));
    }

    #[test]
    fn test_detached_joint_loop_is_fatal() {
        let xml = r#"<robot name="r">
  <link name="r0"/>
  <link name="a"/>
  <link name="b"/>
  <joint name="j1" type="fixed"><parent link="a"/><child link="b"/></joint>
  <joint name="j2" type="fixed"><parent link="b"/><child link="a"/></joint>
</robot>"#;

        let result = UrdfLoader::new().parse(xml);
        assert!(matches!(result, Err(LoadError::KinematicLoop { link }) if link == "a"));
    }

    #[test]
    fn test_limit_without_effort_or_velocity() {
        let xml = r#"<robot name="r">
  <link name="a"/>
  <link name="b"/>
  <joint name="j" type="revolute">
    <parent link="a"/><child link="b"/>
    <axis xyz="0 0 1"/>
    <limit lower="-0.5" upper="0.5"/>
  </joint>
</robot>"#;

        let mut robot = UrdfLoader::new().parse(xml).unwrap();
        let joint = robot.joint("j").unwrap();
        assert_eq!(joint.limit, JointLimits { lower: -0.5, upper: 0.5, effort: 0.0, velocity: 0.0 });

        robot.set_joint_value("j", &[Some(2.0)]);
        assert_eq!(robot.joint("j").unwrap().joint_value(), &[0.5]);
    }

    #[test]
    fn test_anonymous_inline_material() {
        let xml = r#"<robot name="r">
  <link name="a">
    <visual>
      <geometry><box size="1 1 1"/></geometry>
      <material><color rgba="0 1 0 1"/></material>
    </visual>
  </link>
</robot>"#;

        let robot = UrdfLoader::new().parse(xml).unwrap();
        let visual = &robot.link("a").unwrap().visuals[0];
        let material = visual.children[0].mesh.as_ref().unwrap().material.clone().unwrap();
        assert_eq!(material.name, "");
        assert_eq!(material.color, [0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_malformed_xml_is_a_parse_error() {
        let result = UrdfLoader::new().parse(r#"<robot name="r"><link name="a"></robot>"#);
        assert!(matches!(result, Err(LoadError::Parse(_))));
    }
}
