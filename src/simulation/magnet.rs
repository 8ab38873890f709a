//! Magnets as field sources
//!
//! A [`Magnet`] owns the pose and strength shared by every magnet variant and
//! delegates the shape of the field to a [`LocalField`] model evaluated in the
//! magnet's own frame (origin at the magnet center, +x through the north
//! pole). Evaluation is:
//!
//! 1. global point → local frame (translate by −position, rotate by −rotation)
//! 2. local field from the model
//! 3. rotate the field back by +rotation
//! 4. clamp its magnitude to the magnet strength
//!
//! The clamp in step 4 is what guarantees `|B| <= strength` for every point,
//! interpolation and analytic edge cases included.

use std::sync::Arc;

use super::field_grid::BarMagnetGrids;
use super::states::{clamp_magnitude, rotate, NVec2};

/// Field model of one magnet variant, expressed in the magnet's local frame
pub trait LocalField {
    /// Write the field at local point `p` for a magnet of `strength` into `out`
    fn local_field(&self, p: &NVec2, strength: f64, out: &mut NVec2);

    /// Is local point `p` inside the magnet body?
    fn is_inside_local(&self, p: &NVec2) -> bool;

    /// Half width and half height of the magnet body
    fn half_size(&self) -> NVec2;
}

/// Table-driven bar magnet field
pub struct BarMagnetField {
    pub grids: Arc<BarMagnetGrids>,
    pub width: f64,
    pub height: f64,
}

impl BarMagnetField {
    /// Bar magnet sized after the dataset it samples
    pub fn new(grids: Arc<BarMagnetGrids>) -> Self {
        let [width, height] = grids.magnet_size;
        Self { grids, width, height }
    }
}

impl LocalField for BarMagnetField {
    fn local_field(&self, p: &NVec2, strength: f64, out: &mut NVec2) {
        // data covers the first quadrant only
        let (bx, by) = self.grids.lookup(p.x.abs(), p.y.abs());

        // Bx is the same in all quadrants, By flips where x and y differ in sign
        let by = if p.x * p.y < 0.0 { -by } else { by };

        // tables are at reference strength, scale linearly
        out.x = bx * strength / self.grids.reference_strength;
        out.y = by * strength / self.grids.reference_strength;
    }

    fn is_inside_local(&self, p: &NVec2) -> bool {
        p.x.abs() <= self.width / 2.0 && p.y.abs() <= self.height / 2.0
    }

    fn half_size(&self) -> NVec2 {
        NVec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Current loop acting as a magnet (electromagnet, or any coil used as a source)
///
/// Inside the loop's bounding square the field is uniform with magnitude
/// `strength`. Outside it falls off as a dipole whose moment matches the
/// inside field on the loop axis at distance R.
pub struct CoilMagnetField {
    pub loop_radius: f64,
    pub wire_width: f64,
}

impl CoilMagnetField {
    /// Half the side of the square treated as the loop's inside
    pub fn half_extent(&self) -> f64 {
        self.loop_radius + self.wire_width / 4.0
    }
}

impl LocalField for CoilMagnetField {
    fn local_field(&self, p: &NVec2, strength: f64, out: &mut NVec2) {
        if self.is_inside_local(p) {
            out.x = strength;
            out.y = 0.0;
            return;
        }

        let r = p.norm();
        if r == 0.0 {
            out.x = 0.0;
            out.y = 0.0;
            return;
        }

        // moment from B(R, 0) = 2m / R^3 = strength
        let radius = self.loop_radius;
        let m = strength * radius * radius * radius / 2.0;

        let cos_theta = p.x / r;
        let sin_theta = p.y / r;
        let m_over_r3 = m / (r * r * r);

        out.x = m_over_r3 * (3.0 * cos_theta * cos_theta - 1.0);
        out.y = m_over_r3 * (3.0 * cos_theta * sin_theta);
    }

    fn is_inside_local(&self, p: &NVec2) -> bool {
        let half = self.half_extent();
        p.x.abs() <= half && p.y.abs() <= half
    }

    fn half_size(&self) -> NVec2 {
        NVec2::new(self.half_extent(), self.half_extent())
    }
}

/// A magnet: pose, strength and the field model of its variant
pub struct Magnet {
    position: NVec2,
    rotation: f64, // radians, counterclockwise
    strength: f64,
    strength_range: (f64, f64),
    field: Box<dyn LocalField + Send + Sync>,
}

impl Magnet {
    pub fn new<F>(field: F, position: NVec2, rotation: f64, strength: f64, strength_range: (f64, f64)) -> Self
    where
        F: LocalField + Send + Sync + 'static,
    {
        debug_assert!(strength_range.0 <= strength_range.1, "empty strength range");
        Self {
            position,
            rotation,
            strength: strength.clamp(strength_range.0, strength_range.1),
            strength_range,
            field: Box::new(field),
        }
    }

    pub fn position(&self) -> NVec2 {
        self.position
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    pub fn strength_range(&self) -> (f64, f64) {
        self.strength_range
    }

    pub fn set_position(&mut self, position: NVec2) {
        self.position = position;
    }

    pub fn set_rotation(&mut self, rotation: f64) {
        self.rotation = rotation;
    }

    /// Set strength, clamped into the magnet's range
    pub fn set_strength(&mut self, strength: f64) {
        self.strength = strength.clamp(self.strength_range.0, self.strength_range.1);
    }

    /// Global point → magnet frame
    pub fn to_local(&self, point: &NVec2) -> NVec2 {
        rotate(&(point - self.position), -self.rotation)
    }

    /// Field at global `point`, written into `out`
    pub fn field_at(&self, point: &NVec2, out: &mut NVec2) {
        let local = self.to_local(point);
        self.field.local_field(&local, self.strength, out);
        *out = rotate(out, self.rotation);
        clamp_magnitude(out, self.strength);
    }

    /// Allocating convenience wrapper around [`Magnet::field_at`]
    pub fn field(&self, point: &NVec2) -> NVec2 {
        let mut out = NVec2::zeros();
        self.field_at(point, &mut out);
        out
    }

    /// Half extents of the magnet body in its own frame
    pub fn half_size(&self) -> NVec2 {
        self.field.half_size()
    }

    /// Local point → global frame
    pub fn to_global(&self, local: &NVec2) -> NVec2 {
        rotate(local, self.rotation) + self.position
    }

    pub fn is_inside(&self, point: &NVec2) -> bool {
        self.field.is_inside_local(&self.to_local(point))
    }
}
