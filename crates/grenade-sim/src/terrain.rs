//! Solid-ground queries used for contact detection.

/// Answers whether a world point is solid.
pub trait Terrain: Send + Sync {
    fn is_solid(&self, x: f64, y: f64) -> bool;
}

/// No ground anywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenTerrain;

impl Terrain for OpenTerrain {
    fn is_solid(&self, _x: f64, _y: f64) -> bool {
        false
    }
}

/// Flat ground at `ground_y` with optional vertical walls.
#[derive(Debug, Clone, Copy)]
pub struct FlatTerrain {
    /// Everything at or below this line is solid.
    pub ground_y: f64,
    pub left_wall: Option<f64>,
    pub right_wall: Option<f64>,
}

impl FlatTerrain {
    pub fn new(ground_y: f64) -> Self {
        Self {
            ground_y,
            left_wall: None,
            right_wall: None,
        }
    }

    pub fn with_walls(mut self, left: f64, right: f64) -> Self {
        self.left_wall = Some(left);
        self.right_wall = Some(right);
        self
    }
}

impl Terrain for FlatTerrain {
    fn is_solid(&self, x: f64, y: f64) -> bool {
        y >= self.ground_y
            || self.left_wall.is_some_and(|l| x <= l)
            || self.right_wall.is_some_and(|r| x >= r)
    }
}
