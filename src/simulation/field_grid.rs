//! Precomputed bar-magnet field tables
//!
//! The bar magnet's field is not computed at runtime. It is read from a
//! versioned data asset holding three grids of (Bx, By) samples that cover one
//! quadrant of the magnet's local frame:
//!
//! - `internal`      – fine grid over the inside of the magnet
//! - `external_near` – fine grid around the magnet
//! - `external_far`  – coarse grid reaching far from the magnet
//!
//! Each grid's extent contains the previous one. A lookup picks the smallest
//! grid containing the point and interpolates bilinearly inside the enclosing
//! cell. Points beyond the far grid read as exactly zero.
//!
//! The tables were generated at `reference_strength`; callers scale the result
//! linearly to the runtime strength.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::{Result, SimulationError};

/// Asset format version this build understands
pub const GRID_ASSET_VERSION: u32 = 1;

/// One table of field samples, indexed `[column][row]` (x first)
#[derive(Debug, Clone, Deserialize)]
pub struct FieldGrid {
    name: String,
    width: usize,
    height: usize,
    spacing: f64,
    bx: Vec<Vec<f64>>,
    by: Vec<Vec<f64>>,
}

impl FieldGrid {
    /// Build a grid from column-major sample tables
    pub fn new(name: &str, spacing: f64, bx: Vec<Vec<f64>>, by: Vec<Vec<f64>>) -> Result<Self> {
        let width = bx.len();
        let height = bx.first().map_or(0, |column| column.len());
        let grid = Self {
            name: name.to_string(),
            width,
            height,
            spacing,
            bx,
            by,
        };
        grid.validate(f64::INFINITY)?;
        Ok(grid)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Stored sample at grid node (column, row)
    pub fn sample(&self, column: usize, row: usize) -> (f64, f64) {
        (self.bx[column][row], self.by[column][row])
    }

    /// Largest x covered by the grid
    pub fn max_x(&self) -> f64 {
        self.spacing * (self.width - 1) as f64
    }

    /// Largest y covered by the grid
    pub fn max_y(&self) -> f64 {
        self.spacing * (self.height - 1) as f64
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= 0.0 && y >= 0.0 && x <= self.max_x() && y <= self.max_y()
    }

    /// Bilinear interpolation at (x, y), which must lie inside the grid
    pub fn interpolate(&self, x: f64, y: f64) -> (f64, f64) {
        debug_assert!(self.contains(x, y), "({x}, {y}) outside grid {}", self.name);

        // enclosing cell, clamped so cell + 1 stays in bounds
        let column = ((x / self.spacing).floor() as usize).min(self.width - 2);
        let row = ((y / self.spacing).floor() as usize).min(self.height - 2);

        let x0 = column as f64 * self.spacing;
        let y0 = row as f64 * self.spacing;

        // fractional position inside the cell, 0 at the lower corner
        let fx = (x - x0) / self.spacing;
        let fy = (y - y0) / self.spacing;

        let w00 = (1.0 - fx) * (1.0 - fy);
        let w10 = fx * (1.0 - fy);
        let w01 = (1.0 - fx) * fy;
        let w11 = fx * fy;

        let bx = self.bx[column][row] * w00
            + self.bx[column + 1][row] * w10
            + self.bx[column][row + 1] * w01
            + self.bx[column + 1][row + 1] * w11;
        let by = self.by[column][row] * w00
            + self.by[column + 1][row] * w10
            + self.by[column][row + 1] * w01
            + self.by[column + 1][row + 1] * w11;

        (bx, by)
    }

    /// Check table shape and that no sample exceeds `max_magnitude`
    fn validate(&self, max_magnitude: f64) -> Result<()> {
        let invalid = |reason: String| SimulationError::InvalidGrid {
            grid: self.name.clone(),
            reason,
        };

        if self.width < 2 || self.height < 2 {
            return Err(invalid(format!("needs at least 2x2 samples, got {}x{}", self.width, self.height)));
        }
        if !(self.spacing > 0.0) {
            return Err(invalid(format!("spacing must be positive, got {}", self.spacing)));
        }
        if self.bx.len() != self.width || self.by.len() != self.width {
            return Err(invalid("bx/by column count does not match width".to_string()));
        }
        for (column, (cx, cy)) in self.bx.iter().zip(self.by.iter()).enumerate() {
            if cx.len() != self.height || cy.len() != self.height {
                return Err(invalid(format!("column {column} does not match height {}", self.height)));
            }
            for (row, (bx, by)) in cx.iter().zip(cy.iter()).enumerate() {
                let magnitude = bx.hypot(*by);
                if !magnitude.is_finite() || magnitude > max_magnitude {
                    return Err(invalid(format!(
                        "sample ({column}, {row}) has magnitude {magnitude}, limit {max_magnitude}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// On-disk layout of the grid asset
#[derive(Debug, Deserialize)]
struct GridAsset {
    version: u32,
    reference_strength: f64,
    magnet_size: [f64; 2],
    internal: FieldGrid,
    external_near: FieldGrid,
    external_far: FieldGrid,
}

/// The three nested bar-magnet grids plus the strength they were built for
#[derive(Debug, Clone)]
pub struct BarMagnetGrids {
    pub reference_strength: f64,
    pub magnet_size: [f64; 2], // width, height of the magnet the data describes
    internal: FieldGrid,
    external_near: FieldGrid,
    external_far: FieldGrid,
}

impl BarMagnetGrids {
    /// Assemble and validate a grid set
    /// Extents must nest: internal ⊂ external_near ⊂ external_far
    pub fn new(
        reference_strength: f64,
        magnet_size: [f64; 2],
        internal: FieldGrid,
        external_near: FieldGrid,
        external_far: FieldGrid,
    ) -> Result<Self> {
        if !(reference_strength > 0.0) {
            return Err(SimulationError::InvalidConfig(format!(
                "reference strength must be positive, got {reference_strength}"
            )));
        }
        for grid in [&internal, &external_near, &external_far] {
            grid.validate(reference_strength)?;
        }
        for (inner, outer) in [(&internal, &external_near), (&external_near, &external_far)] {
            if inner.max_x() > outer.max_x() || inner.max_y() > outer.max_y() {
                return Err(SimulationError::InvalidGrid {
                    grid: inner.name.clone(),
                    reason: format!("extent is not contained in grid {}", outer.name),
                });
            }
        }

        Ok(Self {
            reference_strength,
            magnet_size,
            internal,
            external_near,
            external_far,
        })
    }

    /// Load the JSON grid asset from `path`
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let asset: GridAsset = serde_json::from_reader(reader)?;

        if asset.version != GRID_ASSET_VERSION {
            return Err(SimulationError::InvalidGrid {
                grid: path.display().to_string(),
                reason: format!("asset version {} but expected {}", asset.version, GRID_ASSET_VERSION),
            });
        }

        let grids = Self::new(
            asset.reference_strength,
            asset.magnet_size,
            asset.internal,
            asset.external_near,
            asset.external_far,
        )?;

        info!(
            path = %path.display(),
            reference_strength = grids.reference_strength,
            far_extent_x = grids.external_far.max_x(),
            far_extent_y = grids.external_far.max_y(),
            "loaded bar magnet field grids"
        );

        Ok(grids)
    }

    pub fn internal(&self) -> &FieldGrid {
        &self.internal
    }

    pub fn external_near(&self) -> &FieldGrid {
        &self.external_near
    }

    pub fn external_far(&self) -> &FieldGrid {
        &self.external_far
    }

    /// Field at a first-quadrant point (x, y >= 0), at reference strength
    /// Returns exactly zero beyond the far grid
    pub fn lookup(&self, x: f64, y: f64) -> (f64, f64) {
        debug_assert!(x >= 0.0 && y >= 0.0, "grid lookup expects the first quadrant, got ({x}, {y})");

        if self.internal.contains(x, y) {
            self.internal.interpolate(x, y)
        } else if self.external_near.contains(x, y) {
            self.external_near.interpolate(x, y)
        } else if self.external_far.contains(x, y) {
            self.external_far.interpolate(x, y)
        } else {
            (0.0, 0.0)
        }
    }
}
