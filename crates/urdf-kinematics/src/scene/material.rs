//! Render material

/// Default material color (RGBA) when a URDF material cannot be resolved
pub const DEFAULT_COLOR: [f32; 4] = [0.7, 0.7, 0.7, 1.0];

/// Surface material attached to a mesh
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    /// Material color (RGBA)
    pub color: [f32; 4],
    /// Resolved texture URL, if any
    pub texture: Option<String>,
}

impl Material {
    pub fn new(name: impl Into<String>, color: [f32; 4]) -> Self {
        Self {
            name: name.into(),
            color,
            texture: None,
        }
    }

    /// Unnamed material with the given color
    pub fn with_color(color: [f32; 4]) -> Self {
        Self::new("", color)
    }

    pub fn transparent(&self) -> bool {
        self.color[3] < 1.0
    }

    pub fn opacity(&self) -> f32 {
        self.color[3]
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::with_color(DEFAULT_COLOR)
    }
}
