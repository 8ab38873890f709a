use std::sync::Arc;
use std::time::Instant;

use crate::error::Result;
use crate::simulation::field_grid::BarMagnetGrids;
use crate::simulation::magnet::{BarMagnetField, CoilMagnetField, Magnet};
use crate::simulation::states::NVec2;
use crate::configuration::config::ScenarioConfig;
use crate::simulation::scenario::Scenario;

/// Deterministic query points spread over a 2000 x 1000 box around the origin
fn query_points(n: usize) -> Vec<NVec2> {
    (0..n)
        .map(|i| {
            let i_f = i as f64;
            NVec2::new((i_f * 0.37).sin() * 1000.0, (i_f * 0.13).cos() * 500.0)
        })
        .collect()
}

/// Field evaluations per second, grid-backed vs analytic magnet
pub fn bench_field(grids: Arc<BarMagnetGrids>) {
    let ns = [1_000, 10_000, 100_000, 1_000_000];

    let bar = Magnet::new(BarMagnetField::new(grids), NVec2::zeros(), 0.3, 225.0, (0.0, 300.0));
    let coil = Magnet::new(
        CoilMagnetField {
            loop_radius: 50.0,
            wire_width: 16.0,
        },
        NVec2::zeros(),
        0.3,
        225.0,
        (0.0, 300.0),
    );

    println!("N,bar_ms,coil_ms");

    for n in ns {
        let points = query_points(n);
        let mut out = NVec2::zeros();
        let mut checksum = 0.0;

        // Warm up
        bar.field_at(&points[0], &mut out);
        coil.field_at(&points[0], &mut out);

        let t0 = Instant::now();
        for p in &points {
            bar.field_at(p, &mut out);
            checksum += out.x;
        }
        let bar_ms = t0.elapsed().as_secs_f64() * 1000.0;

        let t1 = Instant::now();
        for p in &points {
            coil.field_at(p, &mut out);
            checksum += out.x;
        }
        let coil_ms = t1.elapsed().as_secs_f64() * 1000.0;

        // print the checksum so the loops are not optimized away
        println!("{},{:.6},{:.6},{:.3}", n, bar_ms, coil_ms, checksum);
    }
}

/// Logical ticks per second of a full scenario
pub fn bench_scenario(cfg: ScenarioConfig, grids: Arc<BarMagnetGrids>, ticks: usize) -> Result<()> {
    let mut scenario = Scenario::build_scenario(cfg, grids)?;

    let t0 = Instant::now();
    for _ in 0..ticks {
        scenario.step_once()?;
    }
    let elapsed = t0.elapsed().as_secs_f64();

    println!(
        "ticks = {:6}, total = {:8.6} s, per tick = {:8.3} us, emf = {:.3}",
        ticks,
        elapsed,
        elapsed * 1.0e6 / ticks.max(1) as f64,
        scenario.emf()
    );
    Ok(())
}
