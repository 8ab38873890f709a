//! High-level runtime engine settings
//!
//! Selects how a `Scenario` is driven: the Bevy viewer or a headless
//! run of a fixed number of ticks

#[derive(Debug, Clone)]
pub struct Engine {
    pub viewer: bool, // false = headless, true = bevy viewer
    pub ticks: usize, // headless run length in logical ticks
    pub report_every: usize, // headless: print a state line every n ticks
}
