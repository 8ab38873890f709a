//! Core value types shared by the induction model.
//!
//! All positions and field vectors are `NVec2` (nalgebra `Vector2<f64>`).
//! The helpers here are the few vector operations every component needs:
//! angle, rotation about the origin and magnitude clamping.

use nalgebra::{Rotation2, Vector2};
pub type NVec2 = Vector2<f64>;

/// Angle of `v` measured from +x, in radians
pub fn angle_of(v: &NVec2) -> f64 {
    v.y.atan2(v.x)
}

/// Rotate `v` about the origin by `angle` radians
pub fn rotate(v: &NVec2, angle: f64) -> NVec2 {
    Rotation2::new(angle) * v
}

/// Scale `v` down so its magnitude does not exceed `max`
/// Zero vectors and vectors already within the limit are left untouched
pub fn clamp_magnitude(v: &mut NVec2, max: f64) {
    let magnitude = v.norm();
    if magnitude > max && magnitude > 0.0 {
        *v *= max / magnitude;
    }
}

/// Which side of the coil a piece of wire is drawn on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Foreground,
    Background,
}
