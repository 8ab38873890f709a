//! Build fully-initialized induction scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a runtime `Scenario`
//! containing:
//! - engine settings (`Engine`) and numerical parameters (`Parameters`)
//! - the fixed-step clock
//! - the magnet and whatever drives it (nothing, a turbine, a current source)
//! - an optional pickup coil with its charge markers, bulb and voltmeter
//! - an optional compass and field meter
//!
//! Every logical tick runs the components in a fixed order:
//! magnet driver → scripted motion → induction → indicators → charges → compass.
//! Keeping that order is what makes runs reproducible tick for tick.

use std::sync::Arc;

use tracing::info;

use crate::configuration::config::{
    CompassBehaviorConfig, CurrentSourceConfig, MagnetKindConfig, SamplesConfig, ScenarioConfig,
};
use crate::error::Result;
use crate::simulation::charges::{ChargeTransport, DEFAULT_MAX_STEP_FRACTION};
use crate::simulation::clock::FixedStepClock;
use crate::simulation::coil::{Coil, MAX_LOOPS, MIN_LOOPS};
use crate::simulation::compass::{Compass, CompassBehavior};
use crate::simulation::engine::Engine;
use crate::simulation::field_grid::BarMagnetGrids;
use crate::simulation::indicators::{FieldMeter, FieldReading, LightBulb, Voltmeter};
use crate::simulation::magnet::{BarMagnetField, CoilMagnetField, Magnet};
use crate::simulation::params::{Parameters, LOGICAL_DT};
use crate::simulation::pickup_coil::{PickupCoil, SamplePointsStrategy};
use crate::simulation::sources::{CurrentSource, Electromagnet, Turbine};
use crate::simulation::states::{angle_of, NVec2};

/// Charge markers per segment on an electromagnet's coil
const ELECTROMAGNET_PARTICLES_PER_SEGMENT: usize = 3;

/// What moves or powers the magnet between ticks
pub enum MagnetDriver {
    /// Bar magnet, only moved by the user or scripted motion
    Bar,
    /// Bar magnet on a water wheel
    Turbine(Turbine),
    /// Coil magnet with its power supply and the charges in its wire
    Electromagnet {
        electromagnet: Electromagnet,
        charges: ChargeTransport,
    },
}

/// Pickup coil with everything hanging off its current
pub struct PickupAssembly {
    pub coil: PickupCoil,
    pub charges: ChargeTransport,
    pub light_bulb: LightBulb,
    pub voltmeter: Voltmeter,
}

/// A fully-initialized induction scenario
///
/// Under the `viewer` feature this is a Bevy `Resource` advanced by the
/// viewer's frame system
#[cfg_attr(feature = "viewer", derive(bevy::prelude::Resource))]
pub struct Scenario {
    pub engine: Engine,
    pub parameters: Parameters,
    pub clock: FixedStepClock,
    pub magnet: Magnet,
    pub driver: MagnetDriver,
    pub magnet_velocity: Option<NVec2>, // scripted translation per tick
    pub pickup: Option<PickupAssembly>,
    pub compass: Option<Compass>,
    pub field_meter: Option<FieldMeter>,
}

fn vec2(v: [f64; 2]) -> NVec2 {
    NVec2::new(v[0], v[1])
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig, grids: Arc<BarMagnetGrids>) -> Result<Self> {
        cfg.validate()?;

        // Parameters (runtime) from ParametersConfig
        let p_cfg = &cfg.parameters;
        let parameters = Parameters {
            ticks_per_second: p_cfg.ticks_per_second,
            electron_flow: p_cfg.electron_flow,
        };

        // Engine (runtime) from EngineConfig
        let engine = Engine {
            viewer: cfg.engine.viewer,
            ticks: cfg.engine.ticks,
            report_every: cfg.engine.report_every.max(1),
        };

        // Magnet and its driver
        let m_cfg = &cfg.magnet;
        let position = vec2(m_cfg.position);
        let range = (m_cfg.strength_range[0], m_cfg.strength_range[1]);

        let (magnet, driver) = match &m_cfg.kind {
            MagnetKindConfig::Bar => (
                Magnet::new(BarMagnetField::new(grids.clone()), position, m_cfg.rotation, m_cfg.strength, range),
                MagnetDriver::Bar,
            ),
            MagnetKindConfig::Turbine { flow_rate, max_rpm } => (
                Magnet::new(BarMagnetField::new(grids.clone()), position, m_cfg.rotation, m_cfg.strength, range),
                MagnetDriver::Turbine(Turbine::new(*flow_rate, *max_rpm, parameters.ticks_per_second)),
            ),
            MagnetKindConfig::Electromagnet {
                number_of_loops,
                loop_radius,
                wire_width,
                loop_spacing,
                max_strength,
                source,
            } => {
                let coil = Coil::new(*number_of_loops, *loop_radius, *wire_width, *loop_spacing);
                let source = match source {
                    CurrentSourceConfig::Battery { voltage, max_voltage } => CurrentSource::battery(*voltage, *max_voltage),
                    CurrentSourceConfig::Ac { max_amplitude, frequency } => CurrentSource::ac(*max_amplitude, *frequency),
                };
                let field = CoilMagnetField {
                    loop_radius: *loop_radius,
                    wire_width: *wire_width,
                };

                // strength and polarity are owned by the source
                let mut magnet = Magnet::new(field, position, 0.0, 0.0, (0.0, *max_strength));
                let mut electromagnet = Electromagnet::new(coil, source, *max_strength);
                electromagnet.apply(&mut magnet);

                let charges = ChargeTransport::new(
                    electromagnet.coil.build_path(),
                    position,
                    ELECTROMAGNET_PARTICLES_PER_SEGMENT,
                    DEFAULT_MAX_STEP_FRACTION,
                    1.0,
                    parameters.electron_flow,
                );
                (magnet, MagnetDriver::Electromagnet { electromagnet, charges })
            }
        };

        // Pickup coil, primed so the first tick sees no flux change
        let pickup = cfg.pickup_coil.as_ref().map(|pc| {
            let coil = Coil::new(pc.number_of_loops, pc.loop_radius, pc.wire_width, pc.loop_spacing);
            let strategy = match pc.samples {
                SamplesConfig::FixedNumber { count } => SamplePointsStrategy::FixedNumber(count),
                SamplesConfig::FixedSpacing { spacing } => SamplePointsStrategy::FixedSpacing(spacing),
            };
            let position = vec2(pc.position);
            let charges = ChargeTransport::new(
                coil.build_path(),
                position,
                pc.particles_per_segment,
                DEFAULT_MAX_STEP_FRACTION,
                pc.electron_speed_scale,
                parameters.electron_flow,
            );
            let mut coil = PickupCoil::new(
                position,
                coil,
                pc.min_loop_radius,
                strategy,
                pc.max_emf,
                pc.transition_smoothing_scale,
            );
            coil.prime(&magnet);

            PickupAssembly {
                coil,
                charges,
                light_bulb: LightBulb::new(pc.bulb_off_on_reversal),
                voltmeter: Voltmeter::default(),
            }
        });

        // Compass starts aligned with the field it sits in
        let compass = cfg.compass.as_ref().map(|c| {
            let behavior = match c.behavior {
                CompassBehaviorConfig::Immediate => CompassBehavior::Immediate,
                CompassBehaviorConfig::Kinematic => CompassBehavior::Kinematic,
            };
            let mut compass = Compass::new(vec2(c.position), behavior);
            let field = magnet.field(&compass.position);
            if field.norm() > 0.0 {
                compass.set_angle(angle_of(&field));
            }
            compass
        });

        let field_meter = cfg.field_meter.map(|p| FieldMeter::new(vec2(p)));

        info!(
            magnet_strength = magnet.strength(),
            pickup = pickup.is_some(),
            compass = compass.is_some(),
            ticks_per_second = parameters.ticks_per_second,
            "built scenario"
        );

        Ok(Self {
            clock: FixedStepClock::new(parameters.ticks_per_second),
            engine,
            parameters,
            magnet,
            driver,
            magnet_velocity: m_cfg.velocity.map(vec2),
            pickup,
            compass,
            field_meter,
        })
    }

    /// Feed wall-clock time; runs every logical tick that became due
    /// Returns the number of ticks run
    pub fn advance(&mut self, wall_dt: f64) -> Result<usize> {
        let due = self.clock.advance(wall_dt);
        self.run_ticks(due)?;
        Ok(due)
    }

    /// Run exactly one logical tick, paused or not
    pub fn step_once(&mut self) -> Result<()> {
        let due = self.clock.step_once();
        self.run_ticks(due)
    }

    fn run_ticks(&mut self, due: usize) -> Result<()> {
        let dt = self.clock.logical_dt();
        for _ in 0..due {
            self.tick(dt)?;
        }
        Ok(())
    }

    fn tick(&mut self, dt: f64) -> Result<()> {
        debug_assert_eq!(dt, LOGICAL_DT, "scenario ticks must use the canonical dt");

        // magnet driver
        let rotation_before = self.magnet.rotation();
        match &mut self.driver {
            MagnetDriver::Bar => {}
            MagnetDriver::Turbine(turbine) => turbine.step(&mut self.magnet, dt),
            MagnetDriver::Electromagnet { electromagnet, .. } => {
                electromagnet.step(&mut self.magnet, dt);
                // polarity flip
                if self.magnet.rotation() != rotation_before {
                    if let Some(compass) = &mut self.compass {
                        compass.kick_start();
                    }
                }
            }
        }

        // scripted motion
        if let Some(velocity) = self.magnet_velocity {
            let position = self.magnet.position() + velocity * dt;
            self.move_magnet(position);
        }

        if let MagnetDriver::Electromagnet { electromagnet, charges } = &mut self.driver {
            charges.step(electromagnet.coil.current_amplitude, dt)?;
        }

        // induction, then everything driven by the induced current
        if let Some(pickup) = &mut self.pickup {
            pickup.coil.step(&self.magnet, dt);
            let current = pickup.coil.normalized_current();
            pickup.light_bulb.update(current);
            pickup.voltmeter.update(current);
            pickup.charges.step(current, dt)?;
        }

        if let Some(compass) = &mut self.compass {
            compass.step(&self.magnet, dt);
        }

        Ok(())
    }

    fn move_magnet(&mut self, position: NVec2) {
        self.magnet.set_position(position);
        if let MagnetDriver::Electromagnet { charges, .. } = &mut self.driver {
            charges.set_origin(position);
        }
    }

    // =========================================================================================
    // mutators used by input collaborators
    // =========================================================================================

    pub fn set_magnet_position(&mut self, position: NVec2) {
        self.move_magnet(position);
    }

    pub fn set_magnet_rotation(&mut self, rotation: f64) {
        self.magnet.set_rotation(rotation);
        self.kick_compass();
    }

    /// Electromagnet strength is owned by its source and is overwritten next tick
    pub fn set_magnet_strength(&mut self, strength: f64) {
        self.magnet.set_strength(strength);
        self.kick_compass();
    }

    pub fn set_magnet_velocity(&mut self, velocity: Option<NVec2>) {
        self.magnet_velocity = velocity;
    }

    /// Battery voltage of an electromagnet, ignored for other magnets
    pub fn set_voltage(&mut self, voltage: f64) {
        if let MagnetDriver::Electromagnet { electromagnet, .. } = &mut self.driver {
            electromagnet.source.set_voltage(voltage);
        }
    }

    /// AC supply settings of an electromagnet, ignored for other magnets
    pub fn set_ac(&mut self, max_amplitude: f64, frequency: f64) {
        if let MagnetDriver::Electromagnet { electromagnet, .. } = &mut self.driver {
            electromagnet.source.set_ac(max_amplitude, frequency);
        }
    }

    /// Water flow of a turbine, ignored for other magnets
    pub fn set_flow_rate(&mut self, flow_rate: f64) {
        if let MagnetDriver::Turbine(turbine) = &mut self.driver {
            turbine.set_flow_rate(flow_rate);
        }
    }

    pub fn set_electromagnet_loops(&mut self, loops: usize) {
        if let MagnetDriver::Electromagnet { electromagnet, charges } = &mut self.driver {
            electromagnet.coil.number_of_loops = loops.clamp(MIN_LOOPS, MAX_LOOPS);
            charges.set_path(electromagnet.coil.build_path());
            electromagnet.apply(&mut self.magnet);
        }
    }

    pub fn set_pickup_position(&mut self, position: NVec2) {
        if let Some(pickup) = &mut self.pickup {
            pickup.coil.set_position(position);
            pickup.charges.set_origin(position);
        }
    }

    pub fn set_pickup_number_of_loops(&mut self, loops: usize) {
        if let Some(pickup) = &mut self.pickup {
            pickup.coil.set_number_of_loops(loops);
            pickup.charges.set_path(pickup.coil.coil().build_path());
        }
    }

    pub fn set_pickup_loop_radius(&mut self, loop_radius: f64) {
        if let Some(pickup) = &mut self.pickup {
            pickup.coil.set_loop_radius(loop_radius);
            pickup.charges.set_path(pickup.coil.coil().build_path());
        }
    }

    /// Markers per wire segment on every coil; markers are rebuilt evenly spaced
    pub fn set_particles_per_segment(&mut self, count: usize) {
        if let Some(pickup) = &mut self.pickup {
            pickup.charges.set_particles_per_segment(count);
        }
        if let MagnetDriver::Electromagnet { charges, .. } = &mut self.driver {
            charges.set_particles_per_segment(count);
        }
    }

    pub fn set_compass_position(&mut self, position: NVec2) {
        if let Some(compass) = &mut self.compass {
            compass.position = position;
            compass.kick_start();
        }
    }

    pub fn set_electron_flow(&mut self, electron_flow: bool) {
        self.parameters.electron_flow = electron_flow;
        if let Some(pickup) = &mut self.pickup {
            pickup.charges.set_electron_flow(electron_flow);
        }
        if let MagnetDriver::Electromagnet { charges, .. } = &mut self.driver {
            charges.set_electron_flow(electron_flow);
        }
    }

    fn kick_compass(&mut self) {
        if let Some(compass) = &mut self.compass {
            compass.kick_start();
        }
    }

    // =========================================================================================
    // accessors used by view collaborators
    // =========================================================================================

    /// Field at a global point, written into `out`
    pub fn field_at(&self, point: &NVec2, out: &mut NVec2) {
        self.magnet.field_at(point, out);
    }

    pub fn emf(&self) -> f64 {
        self.pickup.as_ref().map_or(0.0, |p| p.coil.emf())
    }

    pub fn flux(&self) -> f64 {
        self.pickup.as_ref().map_or(0.0, |p| p.coil.flux())
    }

    pub fn delta_flux(&self) -> f64 {
        self.pickup.as_ref().map_or(0.0, |p| p.coil.delta_flux())
    }

    pub fn normalized_current(&self) -> f64 {
        self.pickup.as_ref().map_or(0.0, |p| p.coil.normalized_current())
    }

    pub fn brightness(&self) -> f64 {
        self.pickup.as_ref().map_or(0.0, |p| p.light_bulb.brightness())
    }

    pub fn voltmeter_angle(&self) -> f64 {
        self.pickup.as_ref().map_or(0.0, |p| p.voltmeter.needle_angle())
    }

    pub fn compass_angle(&self) -> Option<f64> {
        self.compass.as_ref().map(|c| c.angle())
    }

    pub fn field_reading(&self) -> Option<FieldReading> {
        self.field_meter.as_ref().map(|m| m.read(&self.magnet))
    }
}
