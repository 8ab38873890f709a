//! Readouts attached to the pickup coil or placed in the field

use std::f64::consts::FRAC_PI_2;

use super::magnet::Magnet;
use super::states::{angle_of, NVec2};

/// Currents below this do not light the bulb
pub const LIGHT_BULB_THRESHOLD: f64 = 0.01;
/// Full-scale voltmeter deflection, radians either side of zero
pub const VOLTMETER_MAX_ANGLE: f64 = FRAC_PI_2;

/// Bulb brightness in [0, 1] follows the magnitude of the coil current
#[derive(Debug, Clone, Default)]
pub struct LightBulb {
    brightness: f64,
    previous_current: f64,
    pub off_when_current_changes_direction: bool,
}

impl LightBulb {
    pub fn new(off_when_current_changes_direction: bool) -> Self {
        Self {
            brightness: 0.0,
            previous_current: 0.0,
            off_when_current_changes_direction,
        }
    }

    pub fn brightness(&self) -> f64 {
        self.brightness
    }

    pub fn update(&mut self, current: f64) {
        let flipped = current.signum() != self.previous_current.signum()
            && current != 0.0
            && self.previous_current != 0.0;

        self.brightness = if self.off_when_current_changes_direction && flipped {
            0.0
        } else if current.abs() < LIGHT_BULB_THRESHOLD {
            0.0
        } else {
            current.abs().min(1.0)
        };
        self.previous_current = current;
    }
}

/// Needle voltmeter, deflection proportional to the coil current
#[derive(Debug, Clone, Default)]
pub struct Voltmeter {
    needle_angle: f64,
}

impl Voltmeter {
    pub fn needle_angle(&self) -> f64 {
        self.needle_angle
    }

    pub fn update(&mut self, current: f64) {
        self.needle_angle = current.clamp(-1.0, 1.0) * VOLTMETER_MAX_ANGLE;
    }
}

/// What a field meter at some point shows
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldReading {
    pub bx: f64,
    pub by: f64,
    pub magnitude: f64,
    pub angle: f64,
}

/// Probe reporting the field at its position
#[derive(Debug, Clone)]
pub struct FieldMeter {
    pub position: NVec2,
}

impl FieldMeter {
    pub fn new(position: NVec2) -> Self {
        Self { position }
    }

    pub fn read(&self, magnet: &Magnet) -> FieldReading {
        let field = magnet.field(&self.position);
        FieldReading {
            bx: field.x,
            by: field.y,
            magnitude: field.norm(),
            angle: if field.norm() == 0.0 { 0.0 } else { angle_of(&field) },
        }
    }
}
