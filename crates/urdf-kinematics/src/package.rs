//! `package://` URL resolution
//!
//! Mesh and texture filenames in URDF are either plain paths (relative to the
//! document's working path) or `package://<name>/<relative path>` references that a
//! ROS-style package table maps to a base path.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

const PACKAGE_PREFIX: &str = "package://";

/// Maps package names to base paths
#[derive(Clone)]
pub enum PackageResolver {
    /// One base path applied to every package
    Base(String),
    /// Base path per package name
    Map(HashMap<String, String>),
    /// Caller-supplied lookup; `None` means the package is unknown
    Custom(Arc<dyn Fn(&str) -> Option<String> + Send + Sync>),
}

impl PackageResolver {
    pub fn base(path: impl Into<String>) -> Self {
        PackageResolver::Base(path.into())
    }

    pub fn map<I, K, V>(packages: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        PackageResolver::Map(
            packages
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn custom<F>(resolve: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        PackageResolver::Custom(Arc::new(resolve))
    }

    /// Base path for a package, or `None` if it is unknown
    pub fn package_path(&self, package: &str) -> Option<String> {
        match self {
            PackageResolver::Base(base) => {
                let trimmed = base.trim_end_matches('/');
                // A base whose last component is the package already points into it
                if trimmed.rsplit('/').next() == Some(package) {
                    Some(trimmed.to_string())
                } else {
                    Some(join(base, package))
                }
            }
            PackageResolver::Map(packages) => packages.get(package).cloned(),
            PackageResolver::Custom(resolve) => resolve(package),
        }
    }

    /// Resolve a URDF filename to a loadable URL
    ///
    /// Plain filenames are prefixed with `working_path`. Returns `None` when a
    /// `package://` reference names an unknown package.
    pub fn resolve_path(&self, filename: &str, working_path: &str) -> Option<String> {
        let Some(reference) = filename.strip_prefix(PACKAGE_PREFIX) else {
            return Some(format!("{working_path}{filename}"));
        };

        let (package, relative) = reference.split_once('/').unwrap_or((reference, ""));
        match self.package_path(package) {
            Some(base) => Some(join(&base, relative)),
            None => {
                tracing::warn!("Package '{}' not found while resolving {}", package, filename);
                None
            }
        }
    }
}

impl Default for PackageResolver {
    fn default() -> Self {
        PackageResolver::Map(HashMap::new())
    }
}

impl fmt::Debug for PackageResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageResolver::Base(base) => f.debug_tuple("Base").field(base).finish(),
            PackageResolver::Map(packages) => f.debug_tuple("Map").field(packages).finish(),
            PackageResolver::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

fn join(base: &str, relative: &str) -> String {
    if base.is_empty() {
        relative.to_string()
    } else {
        format!("{}/{}", base.trim_end_matches('/'), relative)
    }
}
