//! Planar vector helpers.
//!
//! Gameplay happens on the XZ plane with Y up. A [`Vec2`] here always means
//! `(x, z)`; `Vec2::y` is the world Z axis.

use std::f32::consts::{PI, TAU};

use glam::Vec2;

/// Squared distance below which a direction is considered degenerate.
pub const DIR_EPSILON_SQ: f32 = 1.0e-4;

/// Direction substituted when a normalization would divide by ~zero (+Z).
pub const DEFAULT_DIRECTION: Vec2 = Vec2::Y;

/// Normalize `v`, or return `fallback` when `v` is too short.
#[inline]
pub fn normalize_or(v: Vec2, fallback: Vec2) -> Vec2 {
    if v.length_squared() > DIR_EPSILON_SQ {
        v.normalize()
    } else {
        fallback
    }
}

/// Yaw (rotation about Y) that faces along `dir`: `atan2(dx, dz)`.
#[inline]
pub fn yaw_of(dir: Vec2) -> f32 {
    dir.x.atan2(dir.y)
}

/// Unit vector a yaw faces along: `(sin yaw, cos yaw)`.
#[inline]
pub fn yaw_forward(yaw: f32) -> Vec2 {
    Vec2::new(yaw.sin(), yaw.cos())
}

/// Heading of a planar velocity measured from +X: `atan2(vz, vx)`.
#[inline]
pub fn heading_of(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Unit vector for a heading measured from +X.
#[inline]
pub fn from_heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Wrap an angle into `(-π, π]`.
pub fn wrap_angle(angle: f32) -> f32 {
    let mut a = angle % TAU;
    if a > PI {
        a -= TAU;
    } else if a <= -PI {
        a += TAU;
    }
    a
}

/// Rotate `v` counter-clockwise (from +X toward +Z) by `angle`.
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_angle_range() {
        assert!((wrap_angle(2.5 * PI) - 0.5 * PI).abs() < 1e-5);
        assert!((wrap_angle(-PI) - PI).abs() < 1e-5);
        assert!((wrap_angle(0.5) - 0.5).abs() < 1e-6);
        assert!((wrap_angle(-7.0) - (-7.0 + TAU)).abs() < 1e-5);
    }

    #[test]
    fn degenerate_direction_falls_back() {
        assert_eq!(normalize_or(Vec2::new(0.001, 0.0), DEFAULT_DIRECTION), DEFAULT_DIRECTION);
        let d = normalize_or(Vec2::new(3.0, 4.0), DEFAULT_DIRECTION);
        assert!((d.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn yaw_and_forward_agree() {
        let dir = Vec2::new(1.0, 1.0).normalize();
        let back = yaw_forward(yaw_of(dir));
        assert!((back - dir).length() < 1e-5);
    }

    #[test]
    fn heading_roundtrip() {
        let v = Vec2::new(-2.0, 5.0);
        let h = from_heading(heading_of(v));
        assert!((h - v.normalize()).length() < 1e-5);
    }
}
