//! Pickup coil: Faraday's Law induction
//!
//! The coil samples the magnet's field at points along its vertical axis,
//! averages the Bx component (the component through the coil's face) and
//! turns the change in flux per tick into an EMF. The EMF is normalized by a
//! hand-calibrated `max_emf` into the coil current that drives the charge
//! markers and the indicators.
//!
//! Two approximations are deliberate and calibrated for visual plausibility,
//! `max_emf` values depend on both staying exactly as they are:
//!
//! - Transition smoothing: a sample reading exactly the magnet strength fell
//!   inside the magnet and gets scaled by `transition_smoothing_scale`, which
//!   softens the jump as the magnet edge crosses a sample point.
//! - Effective loop area: `min_loop_radius * 2 * loop_radius`, a thin
//!   rectangle matching the 1-D sampling, instead of the true circle area.

use tracing::warn;

use super::coil::{Coil, MAX_LOOPS, MIN_LOOPS};
use super::magnet::Magnet;
use super::params::LOGICAL_DT;
use super::states::NVec2;

/// How sample points are placed along the coil's vertical axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SamplePointsStrategy {
    /// `n` points spread evenly from −radius to +radius, n odd
    FixedNumber(usize),
    /// Points every `spacing` units from the center out to the radius
    FixedSpacing(f64),
}

impl SamplePointsStrategy {
    /// Sample offsets from the coil center, bottom to top, always including (0, 0)
    pub fn create_points(&self, loop_radius: f64) -> Vec<NVec2> {
        let points = match *self {
            SamplePointsStrategy::FixedNumber(n) => {
                debug_assert!(n % 2 == 1, "sample count must be odd to include the center");
                if n <= 1 {
                    vec![NVec2::zeros()]
                } else {
                    let half = (n - 1) / 2;
                    let step = loop_radius / half as f64;
                    (0..n)
                        .map(|k| NVec2::new(0.0, (k as f64 - half as f64) * step))
                        .collect()
                }
            }
            SamplePointsStrategy::FixedSpacing(spacing) => {
                debug_assert!(spacing > 0.0, "sample spacing must be positive");
                let half = (loop_radius / spacing).floor() as i64;
                (-half..=half)
                    .map(|k| NVec2::new(0.0, k as f64 * spacing))
                    .collect()
            }
        };
        debug_assert!(points.contains(&NVec2::zeros()), "sample points must include the coil center");
        points
    }
}

pub struct PickupCoil {
    position: NVec2,
    coil: Coil,
    min_loop_radius: f64,
    strategy: SamplePointsStrategy,
    sample_points: Vec<NVec2>,

    flux: f64,
    delta_flux: f64,
    emf: f64,
    max_emf: f64,
    transition_smoothing_scale: f64,
    largest_emf: f64, // largest |emf| seen, for calibrating max_emf
}

impl PickupCoil {
    pub fn new(
        position: NVec2,
        coil: Coil,
        min_loop_radius: f64,
        strategy: SamplePointsStrategy,
        max_emf: f64,
        transition_smoothing_scale: f64,
    ) -> Self {
        debug_assert!(max_emf > 0.0, "max_emf must be positive");
        debug_assert!(
            transition_smoothing_scale > 0.0 && transition_smoothing_scale <= 1.0,
            "transition smoothing scale must be in (0, 1]"
        );
        let sample_points = strategy.create_points(coil.loop_radius);
        Self {
            position,
            coil,
            min_loop_radius,
            strategy,
            sample_points,
            flux: 0.0,
            delta_flux: 0.0,
            emf: 0.0,
            max_emf,
            transition_smoothing_scale,
            largest_emf: 0.0,
        }
    }

    pub fn position(&self) -> NVec2 {
        self.position
    }

    pub fn coil(&self) -> &Coil {
        &self.coil
    }

    pub fn sample_points(&self) -> &[NVec2] {
        &self.sample_points
    }

    pub fn flux(&self) -> f64 {
        self.flux
    }

    pub fn delta_flux(&self) -> f64 {
        self.delta_flux
    }

    pub fn emf(&self) -> f64 {
        self.emf
    }

    pub fn max_emf(&self) -> f64 {
        self.max_emf
    }

    pub fn largest_emf(&self) -> f64 {
        self.largest_emf
    }

    /// Normalized coil current in [-1, 1]
    pub fn normalized_current(&self) -> f64 {
        self.coil.current_amplitude
    }

    pub fn set_position(&mut self, position: NVec2) {
        self.position = position;
    }

    pub fn set_number_of_loops(&mut self, loops: usize) {
        self.coil.number_of_loops = loops.clamp(MIN_LOOPS, MAX_LOOPS);
    }

    /// Resize the loops; sample points follow the new radius
    pub fn set_loop_radius(&mut self, loop_radius: f64) {
        debug_assert!(loop_radius > 0.0, "loop radius must be positive");
        self.coil.loop_radius = loop_radius;
        self.sample_points = self.strategy.create_points(loop_radius);
    }

    /// Area used for flux: a thin rectangle, not the circle area
    pub fn effective_area(&self) -> f64 {
        self.min_loop_radius * (2.0 * self.coil.loop_radius)
    }

    /// Average Bx over the sample points, with transition smoothing applied
    pub fn average_bx(&self, magnet: &Magnet) -> f64 {
        if self.sample_points.is_empty() {
            return 0.0;
        }

        let strength = magnet.strength();
        let mut field = NVec2::zeros();
        let mut sum_bx = 0.0;

        for offset in &self.sample_points {
            let point = self.position + offset;
            magnet.field_at(&point, &mut field);

            let mut bx = field.x;
            if bx.abs() == strength {
                // sample is inside the magnet
                bx *= self.transition_smoothing_scale;
            }
            sum_bx += bx;
        }

        sum_bx / self.sample_points.len() as f64
    }

    fn compute_flux(&self, magnet: &Magnet) -> f64 {
        let loop_flux = self.effective_area() * self.average_bx(magnet);
        self.coil.number_of_loops as f64 * loop_flux
    }

    /// Take the current flux as the baseline without inducing anything
    pub fn prime(&mut self, magnet: &Magnet) {
        self.flux = self.compute_flux(magnet);
        self.delta_flux = 0.0;
        self.emf = 0.0;
        self.coil.set_current_amplitude(0.0);
    }

    /// One tick of Faraday's Law
    pub fn step(&mut self, magnet: &Magnet, dt: f64) {
        debug_assert_eq!(dt, LOGICAL_DT, "induction must run with the canonical tick");

        let flux = self.compute_flux(magnet);
        self.delta_flux = flux - self.flux;
        self.flux = flux;
        self.emf = -self.delta_flux / dt;

        let magnitude = self.emf.abs();
        if magnitude > self.largest_emf {
            self.largest_emf = magnitude;
            if magnitude > self.max_emf {
                warn!(
                    emf = self.emf,
                    max_emf = self.max_emf,
                    "induced EMF exceeds calibrated maximum, current is clipped"
                );
            }
        }

        let amplitude = (self.emf / self.max_emf).clamp(-1.0, 1.0);
        self.coil.set_current_amplitude(amplitude);
    }
}
