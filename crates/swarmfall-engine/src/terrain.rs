//! Terrain height query.
//!
//! The simulation never owns terrain data; it only asks for the ground
//! height under a planar position when snapping entities vertically.

/// `height(x, z) -> y`. Must be pure.
pub trait TerrainHeight {
    fn height(&self, x: f32, z: f32) -> f32;
}

/// A flat plane at a fixed height.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlatTerrain {
    pub y: f32,
}

impl TerrainHeight for FlatTerrain {
    fn height(&self, _x: f32, _z: f32) -> f32 {
        self.y
    }
}

impl<F> TerrainHeight for F
where
    F: Fn(f32, f32) -> f32,
{
    fn height(&self, x: f32, z: f32) -> f32 {
        self(x, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_terrain() {
        let slope = |x: f32, _z: f32| x * 0.5;
        assert_eq!(slope.height(4.0, 100.0), 2.0);
        assert_eq!(FlatTerrain { y: -1.0 }.height(3.0, 3.0), -1.0);
    }
}
