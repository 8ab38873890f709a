//! Charge markers moving along a coil's wire
//!
//! Each marker sits on one segment of a [`CoilPath`] at a position in [0, 1]
//! where 1 is the segment start and 0 its end, so forward travel along the
//! path decreases the position. Per tick the position moves by an amount
//! proportional to the coil current; crossing either end hands the remaining
//! distance to the neighboring segment, rescaled by the ratio of the two
//! segments' speed scales.

use tracing::error;

use super::coil::{CoilPath, REFERENCE_SEGMENT_LENGTH};
use super::params::LOGICAL_DT;
use super::states::{Layer, NVec2};
use crate::error::{Result, SimulationError};

/// Currents below this magnitude leave the markers at rest
pub const CURRENT_THRESHOLD: f64 = 0.001;

/// Largest fraction of a segment a marker covers in one tick at full current
pub const DEFAULT_MAX_STEP_FRACTION: f64 = 0.15;

#[derive(Debug, Clone)]
pub struct ChargedParticle {
    pub segment_index: usize,
    pub segment_position: f64, // 1 = segment start, 0 = segment end
    pub position: NVec2, // world position, derived from the two above
}

pub struct ChargeTransport {
    path: CoilPath,
    particles: Vec<ChargedParticle>,
    origin: NVec2, // world position of the coil's local origin
    particles_per_segment: usize,
    max_step_fraction: f64,
    speed_scale: f64, // global multiplier on top of each segment's scale
    electron_flow: bool, // electrons move against conventional current
}

impl ChargeTransport {
    pub fn new(
        path: CoilPath,
        origin: NVec2,
        particles_per_segment: usize,
        max_step_fraction: f64,
        speed_scale: f64,
        electron_flow: bool,
    ) -> Self {
        let mut transport = Self {
            path,
            particles: Vec::new(),
            origin,
            particles_per_segment,
            max_step_fraction,
            speed_scale,
            electron_flow,
        };
        transport.populate();
        transport
    }

    pub fn particles(&self) -> &[ChargedParticle] {
        &self.particles
    }

    pub fn path(&self) -> &CoilPath {
        &self.path
    }

    pub fn origin(&self) -> NVec2 {
        self.origin
    }

    /// Visible markers with the layer they are drawn on
    pub fn markers(&self) -> impl Iterator<Item = (NVec2, Layer)> + '_ {
        self.particles
            .iter()
            .map(|p| (p.position, self.path.segment(p.segment_index).layer))
    }

    /// Replace the wire (coil was reshaped) and redistribute the markers
    pub fn set_path(&mut self, path: CoilPath) {
        self.path = path;
        self.populate();
    }

    /// Move the whole coil; markers keep their place on the wire
    pub fn set_origin(&mut self, origin: NVec2) {
        self.origin = origin;
        for i in 0..self.particles.len() {
            self.update_position(i);
        }
    }

    /// Change how many markers sit on each segment and redistribute them
    pub fn set_particles_per_segment(&mut self, count: usize) {
        self.particles_per_segment = count;
        self.populate();
    }

    pub fn set_electron_flow(&mut self, electron_flow: bool) {
        self.electron_flow = electron_flow;
    }

    /// Spread markers evenly over every segment
    fn populate(&mut self) {
        self.particles.clear();
        let per_segment = self.particles_per_segment;
        for segment_index in 0..self.path.len() {
            for k in 0..per_segment {
                let segment_position = 1.0 - k as f64 / per_segment as f64;
                self.particles.push(ChargedParticle {
                    segment_index,
                    segment_position,
                    position: NVec2::zeros(),
                });
            }
        }
        for i in 0..self.particles.len() {
            self.update_position(i);
        }
    }

    /// World distance a marker covers in one tick at full current
    ///
    /// Segment speed scales are inverse to segment length, so this does not
    /// depend on which segment the marker is on. A path shorter than this
    /// can overrun the bounded segment hand-off.
    pub fn max_travel_per_tick(max_step_fraction: f64, speed_scale: f64) -> f64 {
        LOGICAL_DT * max_step_fraction * speed_scale * REFERENCE_SEGMENT_LENGTH
    }

    /// Signed speed for a coil current in [-1, 1]
    pub fn speed_and_direction(current: f64) -> f64 {
        if current.abs() < CURRENT_THRESHOLD {
            0.0
        } else {
            current.clamp(-1.0, 1.0)
        }
    }

    /// Advance every marker by one step of length `dt` (at most one tick)
    pub fn step(&mut self, current: f64, dt: f64) -> Result<()> {
        debug_assert!(dt > 0.0 && dt <= LOGICAL_DT, "charge step dt must be in (0, 1], got {dt}");

        let speed = Self::speed_and_direction(current);
        if speed == 0.0 || self.path.is_empty() {
            return Ok(());
        }
        let convention = if self.electron_flow { -1.0 } else { 1.0 };

        for i in 0..self.particles.len() {
            let particle = &self.particles[i];
            let segment = self.path.segment(particle.segment_index);

            let delta = convention * dt * self.max_step_fraction * speed * self.speed_scale * segment.speed_scale;
            let new_position = particle.segment_position + delta;

            if new_position > 0.0 && new_position < 1.0 {
                self.particles[i].segment_position = new_position;
            } else {
                self.switch_segment(i, new_position)?;
            }
            self.update_position(i);
        }
        Ok(())
    }

    /// Carry the overshoot of `new_position` into neighboring segments
    /// At most one hop per segment in the path
    fn switch_segment(&mut self, i: usize, new_position: f64) -> Result<()> {
        let segments = self.path.len();
        let mut index = self.particles[i].segment_index;
        let mut position = new_position;

        for _ in 0..segments {
            let previous = index;
            if position <= 0.0 {
                // past the end: continue at the start of the next segment
                index = self.path.next_index(previous);
                let overshoot =
                    (position * self.path.segment(index).speed_scale / self.path.segment(previous).speed_scale).abs();
                position = 1.0 - overshoot;
                if position >= 0.0 {
                    return self.settle(i, index, position);
                }
            } else if position >= 1.0 {
                // past the start: continue at the end of the previous segment
                index = self.path.previous_index(previous);
                let overshoot = ((position - 1.0) * self.path.segment(index).speed_scale
                    / self.path.segment(previous).speed_scale)
                    .abs();
                position = overshoot;
                if position <= 1.0 {
                    return self.settle(i, index, position);
                }
            } else {
                return self.settle(i, index, position);
            }
        }

        error!(segments, index, position, "charge marker overran the coil path");
        Err(SimulationError::SegmentOverrun { segments, index, position })
    }

    fn settle(&mut self, i: usize, index: usize, position: f64) -> Result<()> {
        let particle = &mut self.particles[i];
        particle.segment_index = index;
        particle.segment_position = position;
        Ok(())
    }

    fn update_position(&mut self, i: usize) {
        let particle = &self.particles[i];
        let local = self.path.segment(particle.segment_index).evaluate(1.0 - particle.segment_position);
        self.particles[i].position = self.origin + local;
    }
}
