//! Configuration types for loading induction scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`EngineConfig`]      – how the scenario is driven (viewer or headless)
//! - [`ParametersConfig`]  – tick rate, current convention, grid asset
//! - [`MagnetConfig`]      – pose, strength and variant of the field source
//! - [`PickupCoilConfig`]  – optional pickup coil with its calibration
//! - [`CompassConfig`]     – optional compass
//! - [`ScenarioConfig`]    – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! A bar magnet pushed through a two-loop pickup coil:
//!
//! ```yaml
//! engine:
//!   viewer: false           # true -> bevy viewer (needs the `viewer` feature)
//!   ticks: 400              # headless run length
//!   report_every: 10
//!
//! parameters:
//!   ticks_per_second: 25.0
//!   electron_flow: true
//!   field_data: "assets/bar_magnet_grids.json"
//!
//! magnet:
//!   position: [-700.0, 0.0]
//!   rotation: 0.0
//!   strength: 225.0
//!   strength_range: [0.0, 300.0]
//!   velocity: [4.0, 0.0]    # scripted motion per tick
//!   kind:
//!     type: bar
//!
//! pickup_coil:
//!   position: [0.0, 0.0]
//!   number_of_loops: 2
//!   loop_radius: 68.0
//!   min_loop_radius: 68.0
//!   max_emf: 150000.0
//!   transition_smoothing_scale: 0.77
//!   samples:
//!     type: fixed_number
//!     count: 9
//!
//! compass:
//!   position: [0.0, 250.0]
//!   behavior: kinematic
//! ```
//!
//! `Scenario::build_scenario` maps this configuration into runtime types.

use serde::Deserialize;

use crate::error::{Result, SimulationError};
use crate::simulation::charges::{ChargeTransport, DEFAULT_MAX_STEP_FRACTION};
use crate::simulation::coil::{Coil, MAX_LOOPS, MIN_LOOPS};
use crate::simulation::params::TICKS_PER_SECOND;

/// High-level engine configuration
#[derive(Deserialize, Debug, Clone)]
pub struct EngineConfig {
    #[serde(default)]
    pub viewer: bool, // `true` - run in the bevy viewer, `false` - headless
    #[serde(default = "default_ticks")]
    pub ticks: usize, // headless run length in logical ticks
    #[serde(default = "default_report_every")]
    pub report_every: usize, // headless: print every n ticks
}

/// Global numerical parameters
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    #[serde(default = "default_ticks_per_second")]
    pub ticks_per_second: f64, // logical rate, wall seconds are converted with it
    #[serde(default = "default_true")]
    pub electron_flow: bool, // charge markers show electron flow instead of conventional current
    #[serde(default = "default_field_data")]
    pub field_data: String, // grid asset, relative to the crate root
}

/// Where the magnet's field comes from
#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MagnetKindConfig {
    /// Table-driven bar magnet
    Bar,
    /// Bar magnet spun by a water wheel
    Turbine {
        flow_rate: f64, // [0, 1]
        max_rpm: f64,
    },
    /// Coil magnet driven by a current source
    Electromagnet {
        number_of_loops: usize,
        loop_radius: f64,
        #[serde(default = "default_wire_width")]
        wire_width: f64,
        #[serde(default = "default_loop_spacing")]
        loop_spacing: f64,
        max_strength: f64,
        source: CurrentSourceConfig,
    },
}

/// Electromagnet power supply
#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CurrentSourceConfig {
    Battery { voltage: f64, max_voltage: f64 },
    Ac { max_amplitude: f64, frequency: f64 },
}

/// Field source pose and strength
#[derive(Deserialize, Debug, Clone)]
pub struct MagnetConfig {
    pub position: [f64; 2],
    #[serde(default)]
    pub rotation: f64, // radians
    pub strength: f64,
    pub strength_range: [f64; 2],
    pub velocity: Option<[f64; 2]>, // scripted translation per tick
    pub kind: MagnetKindConfig,
}

/// Sample point placement along the pickup coil axis
#[derive(Deserialize, Debug, Clone, Copy)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SamplesConfig {
    FixedNumber { count: usize },
    FixedSpacing { spacing: f64 },
}

/// Pickup coil geometry and calibration
#[derive(Deserialize, Debug, Clone)]
pub struct PickupCoilConfig {
    pub position: [f64; 2],
    pub number_of_loops: usize,
    pub loop_radius: f64,
    pub min_loop_radius: f64, // width of the effective flux area
    #[serde(default = "default_wire_width")]
    pub wire_width: f64,
    #[serde(default = "default_loop_spacing")]
    pub loop_spacing: f64,
    pub max_emf: f64, // hand-calibrated EMF that maps to full current
    pub transition_smoothing_scale: f64, // (0, 1]
    pub samples: SamplesConfig,
    #[serde(default = "default_one")]
    pub electron_speed_scale: f64,
    #[serde(default = "default_particles_per_segment")]
    pub particles_per_segment: usize,
    #[serde(default = "default_true")]
    pub bulb_off_on_reversal: bool,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CompassBehaviorConfig {
    Immediate,
    Kinematic,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CompassConfig {
    pub position: [f64; 2],
    pub behavior: CompassBehaviorConfig,
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub engine: EngineConfig,
    pub parameters: ParametersConfig,
    pub magnet: MagnetConfig,
    pub pickup_coil: Option<PickupCoilConfig>,
    pub compass: Option<CompassConfig>,
    pub field_meter: Option<[f64; 2]>, // probe position
}

impl ScenarioConfig {
    /// Parse a scenario from YAML text and validate it
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let cfg: ScenarioConfig = serde_yaml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the runtime types would otherwise silently clamp or divide by
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(SimulationError::InvalidConfig(msg));

        if !(self.parameters.ticks_per_second > 0.0) {
            return invalid(format!("ticks_per_second must be positive, got {}", self.parameters.ticks_per_second));
        }

        let m = &self.magnet;
        if m.strength_range[0] > m.strength_range[1] || m.strength_range[0] < 0.0 {
            return invalid(format!("bad magnet strength_range {:?}", m.strength_range));
        }
        match &m.kind {
            MagnetKindConfig::Bar => {}
            MagnetKindConfig::Turbine { flow_rate, max_rpm } => {
                if !(0.0..=1.0).contains(flow_rate) || *max_rpm < 0.0 {
                    return invalid(format!("turbine flow_rate {flow_rate} / max_rpm {max_rpm} out of range"));
                }
            }
            MagnetKindConfig::Electromagnet {
                number_of_loops,
                loop_radius,
                wire_width,
                loop_spacing,
                max_strength,
                source,
            } => {
                check_loops(*number_of_loops)?;
                if !(*loop_radius > 0.0) || !(*max_strength > 0.0) {
                    return invalid("electromagnet loop_radius and max_strength must be positive".to_string());
                }
                // electromagnet charges always run at unit speed scale
                let coil = Coil::new(*number_of_loops, *loop_radius, *wire_width, *loop_spacing);
                check_charge_speed(&coil, 1.0)?;
                if let CurrentSourceConfig::Battery { max_voltage, .. } = source {
                    if !(*max_voltage > 0.0) {
                        return invalid(format!("battery max_voltage must be positive, got {max_voltage}"));
                    }
                }
            }
        }

        if let Some(p) = &self.pickup_coil {
            check_loops(p.number_of_loops)?;
            if !(p.loop_radius > 0.0) || !(p.min_loop_radius > 0.0) {
                return invalid("pickup coil radii must be positive".to_string());
            }
            if !(p.max_emf > 0.0) {
                return invalid(format!("max_emf must be positive, got {}", p.max_emf));
            }
            if !(p.transition_smoothing_scale > 0.0 && p.transition_smoothing_scale <= 1.0) {
                return invalid(format!(
                    "transition_smoothing_scale must be in (0, 1], got {}",
                    p.transition_smoothing_scale
                ));
            }
            let coil = Coil::new(p.number_of_loops, p.loop_radius, p.wire_width, p.loop_spacing);
            check_charge_speed(&coil, p.electron_speed_scale)?;

            match p.samples {
                SamplesConfig::FixedNumber { count } if count % 2 == 0 => {
                    return invalid(format!("fixed_number samples must be odd to include the center, got {count}"));
                }
                SamplesConfig::FixedSpacing { spacing } if !(spacing > 0.0) => {
                    return invalid(format!("fixed_spacing must be positive, got {spacing}"));
                }
                _ => {}
            }
        }

        Ok(())
    }
}

fn check_loops(loops: usize) -> Result<()> {
    if (MIN_LOOPS..=MAX_LOOPS).contains(&loops) {
        Ok(())
    } else {
        Err(SimulationError::InvalidConfig(format!(
            "number_of_loops must be in {MIN_LOOPS}..={MAX_LOOPS}, got {loops}"
        )))
    }
}

/// Markers must not lap the whole coil in one tick, or the segment hand-off overruns
fn check_charge_speed(coil: &Coil, speed_scale: f64) -> Result<()> {
    if !(speed_scale > 0.0) {
        return Err(SimulationError::InvalidConfig(format!(
            "electron_speed_scale must be positive, got {speed_scale}"
        )));
    }
    let travel = ChargeTransport::max_travel_per_tick(DEFAULT_MAX_STEP_FRACTION, speed_scale);
    let length = coil.build_path().total_length();
    if travel >= length {
        return Err(SimulationError::InvalidConfig(format!(
            "charges would move {travel:.1} units per tick on a coil only {length:.1} long, lower electron_speed_scale"
        )));
    }
    Ok(())
}

fn default_ticks() -> usize {
    500
}

fn default_report_every() -> usize {
    10
}

fn default_ticks_per_second() -> f64 {
    TICKS_PER_SECOND
}

fn default_field_data() -> String {
    "assets/bar_magnet_grids.json".to_string()
}

fn default_true() -> bool {
    true
}

fn default_one() -> f64 {
    1.0
}

fn default_wire_width() -> f64 {
    16.0
}

fn default_loop_spacing() -> f64 {
    25.0
}

fn default_particles_per_segment() -> usize {
    3
}
