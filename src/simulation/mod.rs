pub mod states;
pub mod params;
pub mod engine;
pub mod clock;
pub mod field_grid;
pub mod magnet;
pub mod coil;
pub mod pickup_coil;
pub mod charges;
pub mod compass;
pub mod sources;
pub mod indicators;
pub mod scenario;
