//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - logical tick rate (wall seconds are converted into ticks with it),
//! - the current display convention used by the charge markers

/// Canonical logical step. Every physics `step` receives exactly this value.
pub const LOGICAL_DT: f64 = 1.0;

/// Logical ticks per wall-clock second unless a scenario says otherwise
pub const TICKS_PER_SECOND: f64 = 25.0;

#[derive(Debug, Clone)]
pub struct Parameters {
    pub ticks_per_second: f64, // logical rate
    pub electron_flow: bool, // true = charges move as electrons, false = conventional current
}
