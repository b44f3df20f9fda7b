//! URDF inspection tool
//!
//! Loads a URDF, applies joint values and prints the link/joint tree with world poses.

use std::path::PathBuf;

use clap::Parser;
use glam::{DMat4, EulerRot};
use urdf_kinematics::{
    ConfigError, JointType, LoadError, LoaderConfig, PackageConfig, Robot, UrdfLoader,
    resolve_all,
};

#[derive(Parser)]
#[command(name = "urdf-inspect")]
#[command(about = "Load a URDF, drive its joints and print the frame tree", long_about = None)]
#[command(version)]
struct Args {
    /// URDF file to load
    urdf: PathBuf,

    /// Loader configuration (RON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Package location, as `name=path`
    #[arg(long = "package", value_name = "NAME=PATH", value_parser = parse_package)]
    packages: Vec<(String, String)>,

    /// Joint value, as `joint=v` or `joint=v1,v2,...` (empty entries keep the current value)
    #[arg(long = "set", value_name = "JOINT=VALUES", value_parser = parse_joint_value)]
    values: Vec<(String, Vec<Option<f64>>)>,

    /// Do not load mesh files
    #[arg(long)]
    skip_meshes: bool,
}

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Load(#[from] LoadError),
}

fn parse_package(arg: &str) -> Result<(String, String), String> {
    let (name, path) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=PATH, got '{arg}'"))?;
    Ok((name.to_string(), path.to_string()))
}

fn parse_joint_value(arg: &str) -> Result<(String, Vec<Option<f64>>), String> {
    let (name, values) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected JOINT=VALUES, got '{arg}'"))?;

    let values = values
        .split(',')
        .map(|v| match v.trim() {
            "" => Ok(None),
            v => v
                .parse::<f64>()
                .map(Some)
                .map_err(|e| format!("invalid value '{v}' for joint '{name}': {e}")),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok((name.to_string(), values))
}

fn main() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "urdf_inspect=info,urdf_kinematics=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(Args::parse()) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), AppError> {
    let mut config = match &args.config {
        Some(path) => LoaderConfig::load(path)?,
        None => LoaderConfig::default(),
    };

    if !args.packages.is_empty() {
        let mut packages = match config.packages {
            PackageConfig::Map(packages) => packages,
            PackageConfig::Base(base) => {
                tracing::warn!("--package overrides the configured base path '{}'", base);
                Default::default()
            }
        };
        packages.extend(args.packages.iter().cloned());
        config.packages = PackageConfig::Map(packages);
    }

    let mut robot = UrdfLoader::from_config(&config).load_file(&args.urdf)?;
    tracing::info!(
        "Loaded '{}': {} links, {} joints",
        robot.name,
        robot.links().len(),
        robot.joints().len()
    );

    let pending = robot.take_pending_meshes();
    if args.skip_meshes {
        tracing::info!("Skipping {} meshes", pending.len());
    } else {
        let total = pending.len();
        let attached = pollster::block_on(resolve_all(pending));
        tracing::info!("Attached {}/{} meshes", attached, total);
    }

    for (name, values) in &args.values {
        if robot.joint(name).is_none() {
            tracing::warn!("No joint named '{}'", name);
            continue;
        }
        robot.set_joint_value(name, values);
    }

    println!("robot {}", robot.name);
    print_link(&robot, &robot.root_link().name, 1);
    Ok(())
}

fn print_link(robot: &Robot, name: &str, depth: usize) {
    let Some(link) = robot.link(name) else {
        return;
    };
    let geometry: usize = link
        .visuals
        .iter()
        .chain(&link.collisions)
        .map(|node| node.geometry_count())
        .sum();

    println!(
        "{:indent$}link {}  {}  [{} visual, {} collision, {} geometry]",
        "",
        link.name,
        format_pose(robot.world_transform(name)),
        link.visuals.len(),
        link.collisions.len(),
        geometry,
        indent = depth * 2
    );

    for joint_name in &link.child_joints {
        let Some(joint) = robot.joint(joint_name) else {
            continue;
        };

        let mut detail = joint.joint_type().to_string();
        if joint.joint_type() != JointType::Fixed {
            detail.push_str(&format!(" {:?}", joint.joint_value()));
        }
        if let Some(mimic) = joint.mimic() {
            detail.push_str(&format!(" mimics {}", mimic.joint));
        }

        println!(
            "{:indent$}joint {} ({})  {}",
            "",
            joint.name,
            detail,
            format_pose(robot.world_transform(joint_name)),
            indent = (depth + 1) * 2
        );
        print_link(robot, &joint.child_link, depth + 2);
    }
}

fn format_pose(matrix: Option<DMat4>) -> String {
    let Some(matrix) = matrix else {
        return "xyz=? rpy=?".to_string();
    };
    let (_, rotation, position) = matrix.to_scale_rotation_translation();
    let (yaw, pitch, roll) = rotation.to_euler(EulerRot::ZYX);
    format!(
        "xyz=[{:.4}, {:.4}, {:.4}] rpy=[{:.4}, {:.4}, {:.4}]",
        position.x, position.y, position.z, roll, pitch, yaw
    )
}
