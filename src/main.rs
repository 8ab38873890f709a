use faraday::{bench_field, bench_scenario};
use faraday::{BarMagnetGrids, Scenario, ScenarioConfig};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// Simulated frame time for headless runs
const HEADLESS_FRAME_SECONDS: f64 = 1.0 / 60.0;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file under `scenarios/`
    #[arg(short, long, default_value = "bar_magnet.yaml")]
    file_name: String,

    /// Override the scenario's headless tick count
    #[arg(long)]
    ticks: Option<usize>,

    /// Run the benchmarks instead of the scenario
    #[arg(long)]
    bench: bool,
}

fn manifest_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = manifest_path("scenarios").join(file_name);
    let text = fs::read_to_string(&config_path)
        .with_context(|| format!("reading scenario {}", config_path.display()))?;
    let scenario_cfg = ScenarioConfig::from_yaml_str(&text)
        .with_context(|| format!("parsing scenario {}", config_path.display()))?;
    Ok(scenario_cfg)
}

fn load_grids(relative: &str) -> Result<Arc<BarMagnetGrids>> {
    let path = manifest_path(relative);
    let grids = BarMagnetGrids::load(&path).with_context(|| format!("loading field grids {}", path.display()))?;
    Ok(Arc::new(grids))
}

fn run_headless(mut scenario: Scenario) -> Result<()> {
    let ticks = scenario.engine.ticks as u64;
    let report_every = scenario.engine.report_every as u64;
    let mut last_report = 0;

    println!("tick,magnet_x,magnet_y,rotation,strength,flux,emf,current,brightness,voltmeter,compass");
    while scenario.clock.ticks() < ticks {
        scenario.advance(HEADLESS_FRAME_SECONDS)?;

        let tick = scenario.clock.ticks();
        if tick >= last_report + report_every {
            last_report = tick;
            let p = scenario.magnet.position();
            println!(
                "{},{:.3},{:.3},{:.4},{:.3},{:.3},{:.3},{:.5},{:.4},{:.4},{:.4}",
                tick,
                p.x,
                p.y,
                scenario.magnet.rotation(),
                scenario.magnet.strength(),
                scenario.flux(),
                scenario.emf(),
                scenario.normalized_current(),
                scenario.brightness(),
                scenario.voltmeter_angle(),
                scenario.compass_angle().unwrap_or(0.0),
            );
        }
    }

    if let Some(pickup) = &scenario.pickup {
        info!(
            largest_emf = pickup.coil.largest_emf(),
            max_emf = pickup.coil.max_emf(),
            "headless run finished"
        );
    }
    Ok(())
}

#[cfg(feature = "viewer")]
fn run_viewer(scenario: Scenario) -> Result<()> {
    faraday::run_2d(scenario);
    Ok(())
}

#[cfg(not(feature = "viewer"))]
fn run_viewer(_scenario: Scenario) -> Result<()> {
    anyhow::bail!("this scenario asks for the viewer; rebuild with `--features viewer`")
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    if let Some(ticks) = args.ticks {
        scenario_cfg.engine.ticks = ticks;
    }

    // the viewer brings its own log subscriber
    if !scenario_cfg.engine.viewer {
        tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    }

    let grids = load_grids(&scenario_cfg.parameters.field_data)?;

    if args.bench {
        bench_field(grids.clone());
        let ticks = scenario_cfg.engine.ticks;
        bench_scenario(scenario_cfg, grids, ticks)?;
        return Ok(());
    }

    let scenario = Scenario::build_scenario(scenario_cfg, grids)?;
    if scenario.engine.viewer {
        run_viewer(scenario)
    } else {
        run_headless(scenario)
    }
}
