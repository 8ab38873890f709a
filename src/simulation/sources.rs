//! What drives the magnet each tick
//!
//! - [`CurrentSource`]: battery (DC) or AC power supply feeding an electromagnet
//! - [`Electromagnet`]: coil magnet whose strength and polarity follow its source
//! - [`Turbine`]: water-driven wheel spinning a bar magnet (generator)

use std::f64::consts::{PI, TAU};

use super::coil::{Coil, MAX_LOOPS};
use super::magnet::Magnet;
use super::params::LOGICAL_DT;

/// AC phase advance per tick at frequency 0 and 1
pub const AC_MIN_STEP_ANGLE: f64 = PI / 100.0;
pub const AC_MAX_STEP_ANGLE: f64 = PI / 10.0;

#[derive(Debug, Clone)]
pub enum CurrentSource {
    /// Battery, voltage in [-max_voltage, max_voltage]
    Battery { voltage: f64, max_voltage: f64 },
    /// Sinusoidal supply, amplitude and frequency both in [0, 1]
    Ac {
        max_amplitude: f64,
        frequency: f64,
        phase: f64,
        amplitude: f64,
    },
}

impl CurrentSource {
    pub fn battery(voltage: f64, max_voltage: f64) -> Self {
        debug_assert!(max_voltage > 0.0, "battery max voltage must be positive");
        CurrentSource::Battery {
            voltage: voltage.clamp(-max_voltage, max_voltage),
            max_voltage,
        }
    }

    pub fn ac(max_amplitude: f64, frequency: f64) -> Self {
        CurrentSource::Ac {
            max_amplitude: max_amplitude.clamp(0.0, 1.0),
            frequency: frequency.clamp(0.0, 1.0),
            phase: 0.0,
            amplitude: 0.0,
        }
    }

    /// Current amplitude in [-1, 1]
    pub fn amplitude(&self) -> f64 {
        match self {
            CurrentSource::Battery { voltage, max_voltage } => voltage / max_voltage,
            CurrentSource::Ac { amplitude, .. } => *amplitude,
        }
    }

    /// Set battery voltage; no effect on an AC supply
    pub fn set_voltage(&mut self, value: f64) {
        if let CurrentSource::Battery { voltage, max_voltage } = self {
            *voltage = value.clamp(-*max_voltage, *max_voltage);
        }
    }

    /// Set AC peak amplitude and frequency; no effect on a battery
    pub fn set_ac(&mut self, amplitude_max: f64, freq: f64) {
        if let CurrentSource::Ac { max_amplitude, frequency, .. } = self {
            *max_amplitude = amplitude_max.clamp(0.0, 1.0);
            *frequency = freq.clamp(0.0, 1.0);
        }
    }

    pub fn step(&mut self, dt: f64) {
        debug_assert_eq!(dt, LOGICAL_DT, "current source must run with the canonical tick");

        if let CurrentSource::Ac { max_amplitude, frequency, phase, amplitude } = self {
            let step = AC_MIN_STEP_ANGLE + *frequency * (AC_MAX_STEP_ANGLE - AC_MIN_STEP_ANGLE);
            *phase = (*phase + dt * step) % TAU;
            *amplitude = *max_amplitude * phase.sin();
        }
    }
}

/// Coil magnet fed by a current source
pub struct Electromagnet {
    pub coil: Coil,
    pub source: CurrentSource,
    pub max_strength: f64,
}

impl Electromagnet {
    pub fn new(coil: Coil, source: CurrentSource, max_strength: f64) -> Self {
        Self {
            coil,
            source,
            max_strength,
        }
    }

    /// Field strength for the present source amplitude
    pub fn strength(&self) -> f64 {
        let loops = self.coil.number_of_loops as f64 / MAX_LOOPS as f64;
        self.source.amplitude().abs() * self.max_strength * loops
    }

    /// Advance the source and push strength and polarity onto `magnet`
    pub fn step(&mut self, magnet: &mut Magnet, dt: f64) {
        self.source.step(dt);
        self.apply(magnet);
    }

    /// Copy the source state into the coil and the magnet
    pub fn apply(&mut self, magnet: &mut Magnet) {
        let amplitude = self.source.amplitude();
        self.coil.set_current_amplitude(amplitude);
        magnet.set_strength(self.strength());
        // field direction follows the current
        magnet.set_rotation(if amplitude < 0.0 { PI } else { 0.0 });
    }
}

/// Water wheel spinning a bar magnet
#[derive(Debug, Clone)]
pub struct Turbine {
    flow_rate: f64, // [0, 1]
    max_rpm: f64,
    ticks_per_second: f64,
}

impl Turbine {
    pub fn new(flow_rate: f64, max_rpm: f64, ticks_per_second: f64) -> Self {
        Self {
            flow_rate: flow_rate.clamp(0.0, 1.0),
            max_rpm,
            ticks_per_second,
        }
    }

    pub fn flow_rate(&self) -> f64 {
        self.flow_rate
    }

    pub fn set_flow_rate(&mut self, flow_rate: f64) {
        self.flow_rate = flow_rate.clamp(0.0, 1.0);
    }

    pub fn rpm(&self) -> f64 {
        self.flow_rate * self.max_rpm
    }

    /// Rotation added per tick, radians
    pub fn delta_angle(&self, dt: f64) -> f64 {
        dt * self.rpm() * TAU / (60.0 * self.ticks_per_second)
    }

    pub fn step(&mut self, magnet: &mut Magnet, dt: f64) {
        debug_assert_eq!(dt, LOGICAL_DT, "turbine must run with the canonical tick");
        let rotation = (magnet.rotation() + self.delta_angle(dt)).rem_euclid(TAU);
        magnet.set_rotation(rotation);
    }
}
