pub mod error;
pub mod simulation;
pub mod configuration;
#[cfg(feature = "viewer")]
pub mod visualization;
pub mod benchmark;

pub use error::{Result, SimulationError};

pub use simulation::states::{Layer, NVec2};
pub use simulation::clock::FixedStepClock;
pub use simulation::field_grid::{BarMagnetGrids, FieldGrid};
pub use simulation::magnet::{BarMagnetField, CoilMagnetField, LocalField, Magnet};
pub use simulation::coil::{Coil, CoilPath, CoilSegment};
pub use simulation::pickup_coil::{PickupCoil, SamplePointsStrategy};
pub use simulation::charges::{ChargeTransport, ChargedParticle};
pub use simulation::compass::{Compass, CompassBehavior};
pub use simulation::sources::{CurrentSource, Electromagnet, Turbine};
pub use simulation::indicators::{FieldMeter, FieldReading, LightBulb, Voltmeter};
pub use simulation::scenario::{MagnetDriver, PickupAssembly, Scenario};

pub use configuration::config::{
    CompassConfig, EngineConfig, MagnetConfig, MagnetKindConfig, ParametersConfig, PickupCoilConfig, ScenarioConfig,
};

#[cfg(feature = "viewer")]
pub use visualization::viewer::run_2d;

pub use benchmark::benchmark::{bench_field, bench_scenario};
