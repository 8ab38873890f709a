//! Coil geometry and the wire path charges travel along
//!
//! A coil is described by a handful of scalars ([`Coil`]); its wire is laid
//! out as an ordered [`CoilPath`] of quadratic Bezier segments in the coil's
//! local frame (origin at the coil center, loops stacked along x).
//!
//! The path runs: left lead → for each loop (back half, front half) → right
//! lead. Back halves are drawn behind the loops, front halves and leads in
//! front. Every segment carries a speed scale inversely proportional to its
//! length so that charges move at the same visual speed on short and long
//! pieces of wire.

use tracing::debug;

use super::states::{Layer, NVec2};

/// Loops allowed on any coil
pub const MIN_LOOPS: usize = 1;
pub const MAX_LOOPS: usize = 4;

/// Horizontal bulge of a loop half relative to its radius
const LOOP_BULGE: f64 = 0.35;
/// Lead length relative to the loop radius
const LEAD_LENGTH: f64 = 1.2;
/// Segment length that moves at `speed_scale == 1`
pub const REFERENCE_SEGMENT_LENGTH: f64 = 100.0;

/// Physical description of a coil
#[derive(Debug, Clone)]
pub struct Coil {
    pub number_of_loops: usize,
    pub loop_radius: f64,
    pub wire_width: f64,
    pub loop_spacing: f64,
    pub current_amplitude: f64, // [-1, 1]
}

impl Coil {
    pub fn new(number_of_loops: usize, loop_radius: f64, wire_width: f64, loop_spacing: f64) -> Self {
        debug_assert!(loop_radius > 0.0, "loop radius must be positive");
        Self {
            number_of_loops: number_of_loops.clamp(MIN_LOOPS, MAX_LOOPS),
            loop_radius,
            wire_width,
            loop_spacing,
            current_amplitude: 0.0,
        }
    }

    pub fn set_current_amplitude(&mut self, amplitude: f64) {
        self.current_amplitude = amplitude.clamp(-1.0, 1.0);
    }

    /// Lay out the wire of this coil in its local frame
    pub fn build_path(&self) -> CoilPath {
        let radius = self.loop_radius;
        let spacing = self.loop_spacing;
        let loops = self.number_of_loops;
        let bulge = LOOP_BULGE * radius;

        // x of loop i's center, loops centered on the origin
        let center_x = |i: usize| (i as f64 - (loops as f64 - 1.0) / 2.0) * spacing;
        // each loop starts at its bottom-left and ends at the next loop's bottom-left
        let bottom = |i: usize| NVec2::new(center_x(i) - spacing / 2.0, -radius);
        let top = |i: usize| NVec2::new(center_x(i), radius);

        let mut segments = Vec::with_capacity(2 * loops + 2);

        let first = bottom(0);
        let lead_start = NVec2::new(first.x - LEAD_LENGTH * radius, first.y);
        segments.push(CoilSegment::straight(lead_start, first, Layer::Foreground));

        for i in 0..loops {
            let start = bottom(i);
            let peak = top(i);
            let end = bottom(i + 1);

            // back half bulges right, front half bulges left
            let back_control = NVec2::new((start.x + peak.x) / 2.0 + bulge, 0.0);
            let front_control = NVec2::new((peak.x + end.x) / 2.0 - bulge, 0.0);

            segments.push(CoilSegment::new(start, back_control, peak, Layer::Background));
            segments.push(CoilSegment::new(peak, front_control, end, Layer::Foreground));
        }

        let last = bottom(loops);
        let lead_end = NVec2::new(last.x + LEAD_LENGTH * radius, last.y);
        segments.push(CoilSegment::straight(last, lead_end, Layer::Foreground));

        debug!(loops, radius, segments = segments.len(), "built coil path");

        CoilPath::new(segments)
    }
}

/// One quadratic Bezier piece of wire
#[derive(Debug, Clone)]
pub struct CoilSegment {
    pub start: NVec2,
    pub control: NVec2,
    pub end: NVec2,
    pub layer: Layer,
    pub speed_scale: f64,
}

impl CoilSegment {
    /// Curved segment, speed scale derived from its length
    pub fn new(start: NVec2, control: NVec2, end: NVec2, layer: Layer) -> Self {
        let mut segment = Self {
            start,
            control,
            end,
            layer,
            speed_scale: 1.0,
        };
        let length = segment.approximate_length();
        if length > 0.0 {
            segment.speed_scale = REFERENCE_SEGMENT_LENGTH / length;
        }
        segment
    }

    /// Straight segment (control point at the midpoint)
    pub fn straight(start: NVec2, end: NVec2, layer: Layer) -> Self {
        Self::new(start, (start + end) / 2.0, end, layer)
    }

    /// Point on the curve for `t` in [0, 1], 0 = start
    pub fn evaluate(&self, t: f64) -> NVec2 {
        let u = 1.0 - t;
        self.start * (u * u) + self.control * (2.0 * u * t) + self.end * (t * t)
    }

    /// Average of chord and control-polygon length
    pub fn approximate_length(&self) -> f64 {
        let chord = (self.end - self.start).norm();
        let polygon = (self.control - self.start).norm() + (self.end - self.control).norm();
        (chord + polygon) / 2.0
    }
}

/// Ordered wire segments; order defines forward travel
#[derive(Debug, Clone)]
pub struct CoilPath {
    segments: Vec<CoilSegment>,
}

impl CoilPath {
    pub fn new(segments: Vec<CoilSegment>) -> Self {
        debug_assert!(
            segments.iter().all(|s| s.speed_scale > 0.0),
            "segment speed scales must be positive"
        );
        Self { segments }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segment(&self, index: usize) -> &CoilSegment {
        &self.segments[index]
    }

    pub fn segments(&self) -> &[CoilSegment] {
        &self.segments
    }

    /// Length of the whole wire, summed from the segment approximations
    pub fn total_length(&self) -> f64 {
        self.segments.iter().map(CoilSegment::approximate_length).sum()
    }

    /// Index after `index`, wrapping to 0
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.segments.len()
    }

    /// Index before `index`, wrapping to the last segment
    pub fn previous_index(&self, index: usize) -> usize {
        (index + self.segments.len() - 1) % self.segments.len()
    }
}
