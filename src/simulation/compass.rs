//! Compass needle dynamics
//!
//! Two behaviors:
//! - `Immediate` – the needle points along the field every tick
//! - `Kinematic` – the needle has inertia: a torque proportional to
//!   `sin(phi) * |B|` and a damping term, integrated with velocity Verlet
//!
//! `phi` is the raw difference between field angle and needle angle. It is
//! not wrapped to the shortest path, so after a sudden polarity flip the
//! needle may spin through more than a half turn before settling.

use super::magnet::Magnet;
use super::params::LOGICAL_DT;
use super::states::{angle_of, NVec2};

/// Torque per unit field and unit sin(phi)
pub const SENSITIVITY: f64 = 0.01;
/// Angular velocity damping
pub const DAMPING: f64 = 0.08;
/// Below this angle difference the needle snaps onto the field (0.2 degrees)
pub const THRESHOLD: f64 = 0.2 * std::f64::consts::PI / 180.0;
/// Angular velocity given to a needle at rest by `kick_start`
pub const WAKE_UP_VELOCITY: f64 = 0.03;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompassBehavior {
    Immediate,
    Kinematic,
}

#[derive(Debug, Clone)]
pub struct Compass {
    pub position: NVec2,
    pub behavior: CompassBehavior,
    angle: f64,
    angular_velocity: f64,
    angular_acceleration: f64,
}

impl Compass {
    pub fn new(position: NVec2, behavior: CompassBehavior) -> Self {
        Self {
            position,
            behavior,
            angle: 0.0,
            angular_velocity: 0.0,
            angular_acceleration: 0.0,
        }
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    pub fn angular_acceleration(&self) -> f64 {
        self.angular_acceleration
    }

    pub fn set_angle(&mut self, angle: f64) {
        self.angle = angle;
        self.angular_velocity = 0.0;
        self.angular_acceleration = 0.0;
    }

    /// Give a resting needle a nudge so it starts following a changed field
    pub fn kick_start(&mut self) {
        if self.behavior == CompassBehavior::Kinematic && self.angular_velocity == 0.0 {
            self.angular_velocity = WAKE_UP_VELOCITY;
        }
    }

    /// One tick against the field of `magnet`
    pub fn step(&mut self, magnet: &Magnet, dt: f64) {
        debug_assert_eq!(dt, LOGICAL_DT, "compass must run with the canonical tick");

        let field = magnet.field(&self.position);
        let inside = magnet.is_inside(&self.position);
        self.update(&field, inside, dt);
    }

    /// Advance the needle given the sampled field at the compass position
    pub fn update(&mut self, field: &NVec2, inside_magnet: bool, dt: f64) {
        let magnitude = field.norm();
        if magnitude == 0.0 {
            // no field, keep pointing where we were
            return;
        }
        let field_angle = angle_of(field);

        match self.behavior {
            CompassBehavior::Immediate => {
                self.angle = field_angle;
            }
            CompassBehavior::Kinematic => {
                let phi = field_angle - self.angle;

                if phi.abs() < THRESHOLD || inside_magnet {
                    self.set_angle(field_angle);
                    return;
                }

                let torque = SENSITIVITY * phi.sin() * magnitude;

                let alpha = torque - DAMPING * self.angular_velocity;
                self.angle += self.angular_velocity * dt + 0.5 * alpha * dt * dt;

                let omega_temp = self.angular_velocity + alpha * dt;
                self.angular_acceleration = torque - DAMPING * omega_temp;
                self.angular_velocity += 0.5 * (alpha + self.angular_acceleration) * dt;
            }
        }
    }
}
