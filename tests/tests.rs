use std::f64::consts::PI;
use std::path::PathBuf;
use std::sync::Arc;

use approx::assert_relative_eq;

use faraday::simulation::compass::THRESHOLD;
use faraday::simulation::params::TICKS_PER_SECOND;
use faraday::{
    BarMagnetField, BarMagnetGrids, ChargeTransport, Coil, CoilMagnetField, Compass, CompassBehavior, CurrentSource,
    FixedStepClock, Magnet, NVec2, PickupCoil, SamplePointsStrategy, Scenario, ScenarioConfig, SimulationError,
    Turbine,
};

/// Grid asset shipped with the crate
pub fn grids() -> Arc<BarMagnetGrids> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/bar_magnet_grids.json");
    Arc::new(BarMagnetGrids::load(&path).expect("grid asset should load"))
}

/// Bar magnet at the origin, north pole along +x
pub fn bar_magnet(strength: f64, rotation: f64) -> Magnet {
    Magnet::new(BarMagnetField::new(grids()), NVec2::zeros(), rotation, strength, (0.0, 300.0))
}

pub fn coil_magnet(strength: f64, rotation: f64) -> Magnet {
    let field = CoilMagnetField {
        loop_radius: 50.0,
        wire_width: 16.0,
    };
    Magnet::new(field, NVec2::zeros(), rotation, strength, (0.0, 300.0))
}

/// Two-loop pickup coil at the origin with the calibration used by the bar magnet scenario
pub fn pickup_coil() -> PickupCoil {
    PickupCoil::new(
        NVec2::zeros(),
        Coil::new(2, 68.0, 16.0, 25.0),
        68.0,
        SamplePointsStrategy::FixedNumber(9),
        150_000.0,
        0.77,
    )
}

/// Query points spread over a box larger than the far grid, both axes signed
pub fn query_grid() -> Vec<NVec2> {
    let mut points = Vec::new();
    for i in -24..=24 {
        for j in -12..=12 {
            points.push(NVec2::new(i as f64 * 97.3 + 0.4, j as f64 * 91.1 - 0.7));
        }
    }
    points
}

pub fn load_scenario(name: &str) -> ScenarioConfig {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(name);
    let text = std::fs::read_to_string(path).expect("scenario file should exist");
    ScenarioConfig::from_yaml_str(&text).expect("scenario should parse")
}

const MINIMAL_SCENARIO: &str = r#"
engine:
  ticks: 50
parameters:
  ticks_per_second: 25.0
magnet:
  position: [-300.0, 0.0]
  strength: 225.0
  strength_range: [0.0, 300.0]
  kind:
    type: bar
pickup_coil:
  position: [0.0, 0.0]
  number_of_loops: 2
  loop_radius: 68.0
  min_loop_radius: 68.0
  max_emf: 150000.0
  transition_smoothing_scale: 0.77
  samples:
    type: fixed_number
    count: 9
"#;

// ==================================================================================
// Field source tests
// ==================================================================================

#[test]
fn field_magnitude_never_exceeds_strength() {
    for rotation in [0.0, 0.7, PI / 2.0, 2.9] {
        for strength in [0.0, 10.0, 225.0, 300.0] {
            for magnet in [bar_magnet(strength, rotation), coil_magnet(strength, rotation)] {
                for p in query_grid() {
                    let b = magnet.field(&p);
                    assert!(
                        b.norm() <= strength + 1e-9,
                        "|B| = {} above strength {} at {:?}",
                        b.norm(),
                        strength,
                        p
                    );
                }
            }
        }
    }
}

#[test]
fn bar_field_quadrant_symmetry() {
    let magnet = bar_magnet(225.0, 0.0);
    for (x, y) in [(30.0, 10.0), (140.0, 60.0), (390.0, 210.0), (800.0, 450.0)] {
        let b = magnet.field(&NVec2::new(x, y));
        let mirrored_y = magnet.field(&NVec2::new(x, -y));
        let mirrored_x = magnet.field(&NVec2::new(-x, y));
        let opposite = magnet.field(&NVec2::new(-x, -y));

        assert_relative_eq!(mirrored_y.x, b.x, epsilon = 1e-12);
        assert_relative_eq!(mirrored_y.y, -b.y, epsilon = 1e-12);
        assert_relative_eq!(mirrored_x.x, b.x, epsilon = 1e-12);
        assert_relative_eq!(mirrored_x.y, -b.y, epsilon = 1e-12);
        assert_relative_eq!(opposite.x, b.x, epsilon = 1e-12);
        assert_relative_eq!(opposite.y, b.y, epsilon = 1e-12);
    }
}

#[test]
fn bar_field_is_continuous_across_grid_boundaries() {
    let magnet = bar_magnet(225.0, 0.0);
    let eps = 1e-6;

    // internal -> external_near at the magnet's end face
    for y in [0.0, 10.0, 20.0] {
        let inside = magnet.field(&NVec2::new(125.0 - eps, y));
        let outside = magnet.field(&NVec2::new(125.0 + eps, y));
        assert!((inside - outside).norm() < 1e-3, "jump at x = 125, y = {y}");
    }

    // external_near -> external_far
    let inside = magnet.field(&NVec2::new(400.0 - eps, 100.0));
    let outside = magnet.field(&NVec2::new(400.0 + eps, 100.0));
    assert!((inside - outside).norm() < 1e-3);

    let inside = magnet.field(&NVec2::new(300.0, 300.0 - eps));
    let outside = magnet.field(&NVec2::new(300.0, 300.0 + eps));
    assert!((inside - outside).norm() < 1e-3);
}

#[test]
fn bar_field_is_zero_beyond_far_grid() {
    let magnet = bar_magnet(225.0, 0.3);
    for p in [NVec2::new(2500.0, 0.0), NVec2::new(0.0, -1500.0), NVec2::new(-3000.0, 2000.0)] {
        assert_eq!(magnet.field(&p), NVec2::zeros());
    }
}

#[test]
fn bar_field_matches_grid_node_on_axis() {
    let grids = grids();
    let magnet = Magnet::new(BarMagnetField::new(grids.clone()), NVec2::zeros(), 0.0, 225.0, (0.0, 300.0));

    let b = magnet.field(&NVec2::new(10.0, 0.0));
    let (bx, by) = grids.internal().sample(2, 0);

    assert_relative_eq!(b.x, bx, epsilon = 1e-12);
    assert_relative_eq!(b.y, by, epsilon = 1e-12);
    assert_eq!(b.y, 0.0);
}

#[test]
fn bar_field_scales_with_strength() {
    let full = bar_magnet(225.0, 0.0).field(&NVec2::new(300.0, 120.0));
    let half = bar_magnet(112.5, 0.0).field(&NVec2::new(300.0, 120.0));
    assert_relative_eq!(half.x, full.x / 2.0, epsilon = 1e-12);
    assert_relative_eq!(half.y, full.y / 2.0, epsilon = 1e-12);
}

#[test]
fn rotated_magnet_rotates_its_field() {
    let straight = bar_magnet(225.0, 0.0).field(&NVec2::new(300.0, 0.0));
    let turned = bar_magnet(225.0, PI / 2.0).field(&NVec2::new(0.0, 300.0));
    assert_relative_eq!(turned.x, -straight.y, epsilon = 1e-9);
    assert_relative_eq!(turned.y, straight.x, epsilon = 1e-9);
}

#[test]
fn coil_magnet_is_uniform_inside() {
    let magnet = coil_magnet(120.0, 0.0);
    for p in [NVec2::zeros(), NVec2::new(30.0, -40.0), NVec2::new(-53.0, 53.0)] {
        assert_eq!(magnet.field(&p), NVec2::new(120.0, 0.0));
        assert!(magnet.is_inside(&p));
    }
    assert!(!magnet.is_inside(&NVec2::new(60.0, 0.0)));
}

#[test]
fn coil_magnet_is_a_dipole_outside() {
    let magnet = coil_magnet(120.0, 0.0);
    // moment that gives the inside strength on the axis at r = R
    let m = 120.0 * 50.0f64.powi(3) / 2.0;
    let r: f64 = 200.0;

    let on_axis = magnet.field(&NVec2::new(r, 0.0));
    assert_relative_eq!(on_axis.x, 2.0 * m / r.powi(3), max_relative = 1e-12);
    assert_relative_eq!(on_axis.y, 0.0, epsilon = 1e-12);

    let broadside = magnet.field(&NVec2::new(0.0, r));
    assert_relative_eq!(broadside.x, -m / r.powi(3), max_relative = 1e-12);
    assert_relative_eq!(broadside.y, 0.0, epsilon = 1e-12);
}

// ==================================================================================
// Induction tests
// ==================================================================================

/// EMF when the magnet arrives at `x` from `x - velocity`
fn emf_for_motion(x: f64, velocity: f64) -> f64 {
    let mut magnet = bar_magnet(225.0, 0.0);
    let mut coil = pickup_coil();

    magnet.set_position(NVec2::new(x - velocity, 0.0));
    coil.prime(&magnet);
    magnet.set_position(NVec2::new(x, 0.0));
    coil.step(&magnet, 1.0);
    coil.emf()
}

#[test]
fn faraday_sign_flips_with_direction_of_motion() {
    for x in [-300.0, -150.0, 150.0] {
        let approaching = emf_for_motion(x, 4.0);
        let receding = emf_for_motion(x, -4.0);
        assert!(approaching != 0.0 && receding != 0.0);
        assert!(
            approaching.signum() == -receding.signum(),
            "emf {approaching} and {receding} at x = {x} share a sign"
        );
    }
}

#[test]
fn static_magnet_induces_nothing() {
    let magnet = bar_magnet(225.0, 0.0);
    let mut coil = pickup_coil();
    coil.prime(&magnet);
    for _ in 0..5 {
        coil.step(&magnet, 1.0);
        assert_eq!(coil.emf(), 0.0);
        assert_eq!(coil.normalized_current(), 0.0);
    }
}

#[test]
fn current_is_clipped_to_unit_range() {
    let mut magnet = bar_magnet(225.0, 0.0);
    let mut coil = PickupCoil::new(
        NVec2::zeros(),
        Coil::new(4, 68.0, 16.0, 25.0),
        68.0,
        SamplePointsStrategy::FixedNumber(9),
        1.0,
        0.77,
    );

    magnet.set_position(NVec2::new(-300.0, 0.0));
    coil.prime(&magnet);
    magnet.set_position(NVec2::new(-100.0, 0.0));
    coil.step(&magnet, 1.0);

    assert!(coil.emf().abs() > 1.0);
    assert_eq!(coil.normalized_current().abs(), 1.0);
    assert_relative_eq!(coil.largest_emf(), coil.emf().abs());
}

#[test]
fn flux_counts_every_loop() {
    let magnet = Magnet::new(
        BarMagnetField::new(grids()),
        NVec2::new(-200.0, 0.0),
        0.0,
        225.0,
        (0.0, 300.0),
    );
    let mut one = PickupCoil::new(
        NVec2::zeros(),
        Coil::new(1, 68.0, 16.0, 25.0),
        68.0,
        SamplePointsStrategy::FixedNumber(9),
        150_000.0,
        0.77,
    );
    let mut three = PickupCoil::new(
        NVec2::zeros(),
        Coil::new(3, 68.0, 16.0, 25.0),
        68.0,
        SamplePointsStrategy::FixedNumber(9),
        150_000.0,
        0.77,
    );
    one.prime(&magnet);
    three.prime(&magnet);
    assert_relative_eq!(three.flux(), 3.0 * one.flux(), max_relative = 1e-12);
}

fn centered_coil(transition_smoothing_scale: f64) -> PickupCoil {
    PickupCoil::new(
        NVec2::zeros(),
        Coil::new(2, 68.0, 16.0, 25.0),
        68.0,
        SamplePointsStrategy::FixedNumber(9),
        150_000.0,
        transition_smoothing_scale,
    )
}

#[test]
fn transition_smoothing_scales_samples_inside_the_magnet() {
    // magnet centered in the coil: the three middle samples sit inside it
    let magnet = bar_magnet(225.0, 0.0);
    let smoothed = centered_coil(0.5);
    let raw = centered_coil(1.0);

    let inside = raw
        .sample_points()
        .iter()
        .filter(|p| magnet.field(p).x == magnet.strength())
        .count();
    assert_eq!(inside, 3);

    let difference = raw.average_bx(&magnet) - smoothed.average_bx(&magnet);
    assert_relative_eq!(difference, 0.5 * 3.0 * 225.0 / 9.0, max_relative = 1e-12);
}

#[test]
fn flux_uses_thin_rectangle_area() {
    let magnet = Magnet::new(
        BarMagnetField::new(grids()),
        NVec2::new(-200.0, 0.0),
        0.0,
        225.0,
        (0.0, 300.0),
    );
    let mut coil = PickupCoil::new(
        NVec2::zeros(),
        Coil::new(3, 68.0, 16.0, 25.0),
        40.0,
        SamplePointsStrategy::FixedNumber(9),
        150_000.0,
        0.77,
    );
    assert_eq!(coil.effective_area(), 40.0 * 2.0 * 68.0);

    coil.prime(&magnet);
    let average_bx = coil.average_bx(&magnet);
    assert!(average_bx != 0.0);
    assert_relative_eq!(coil.flux(), 3.0 * 40.0 * 136.0 * average_bx, max_relative = 1e-12);
}

// ==================================================================================
// Charge transport tests
// ==================================================================================

#[test]
fn charge_positions_stay_on_the_wire() {
    let path = Coil::new(2, 68.0, 16.0, 25.0).build_path();
    let segments = path.len();

    for current in [-1.0, -0.5, -0.02, 0.02, 0.7, 1.0] {
        for dt in [0.25, 0.5, 1.0] {
            for electron_flow in [true, false] {
                let mut transport =
                    ChargeTransport::new(path.clone(), NVec2::new(10.0, -5.0), 3, 0.15, 1.0, electron_flow);
                for _ in 0..300 {
                    transport.step(current, dt).expect("no overrun at these speeds");
                    for p in transport.particles() {
                        assert!((0.0..=1.0).contains(&p.segment_position), "position {}", p.segment_position);
                        assert!(p.segment_index < segments);
                    }
                }
            }
        }
    }
}

#[test]
fn electron_flow_reverses_marker_direction() {
    let path = Coil::new(1, 68.0, 16.0, 25.0).build_path();
    let mut electrons = ChargeTransport::new(path.clone(), NVec2::zeros(), 2, 0.15, 1.0, true);
    let mut conventional = ChargeTransport::new(path, NVec2::zeros(), 2, 0.15, 1.0, false);

    let start = electrons.particles()[1].segment_position;
    electrons.step(0.2, 1.0).unwrap();
    conventional.step(0.2, 1.0).unwrap();

    let d_electrons = electrons.particles()[1].segment_position - start;
    let d_conventional = conventional.particles()[1].segment_position - start;
    assert_relative_eq!(d_electrons, -d_conventional, epsilon = 1e-12);
}

#[test]
fn lapping_the_coil_in_one_tick_is_an_overrun() {
    let path = Coil::new(1, 68.0, 16.0, 25.0).build_path();
    let mut transport = ChargeTransport::new(path, NVec2::zeros(), 1, 0.15, 100.0, false);

    let err = transport.step(1.0, 1.0).unwrap_err();
    assert!(matches!(err, SimulationError::SegmentOverrun { segments: 4, .. }), "{err}");
}

#[test]
fn speed_just_under_the_coil_length_never_overruns() {
    let path = Coil::new(1, 68.0, 16.0, 25.0).build_path();
    let per_unit_scale = ChargeTransport::max_travel_per_tick(0.15, 1.0);
    let speed_scale = 0.95 * path.total_length() / per_unit_scale;

    for current in [1.0, -1.0] {
        let mut transport = ChargeTransport::new(path.clone(), NVec2::zeros(), 3, 0.15, speed_scale, true);
        for _ in 0..200 {
            transport.step(current, 1.0).expect("travel below the coil length must settle");
        }
    }
}

// ==================================================================================
// Compass tests
// ==================================================================================

#[test]
fn kinematic_compass_settles_on_moderate_field() {
    for target in [0.5_f64, 2.0, 3.0, -2.5] {
        let field = NVec2::new(target.cos(), target.sin()) * 10.0;
        let field_angle = field.y.atan2(field.x);
        let mut compass = Compass::new(NVec2::zeros(), CompassBehavior::Kinematic);

        let mut snapped = None;
        for tick in 0..1000 {
            compass.update(&field, false, 1.0);
            if compass.angle() == field_angle && compass.angular_velocity() == 0.0 {
                snapped = Some(tick);
                break;
            }
        }
        assert!(snapped.is_some(), "needle never settled on {target}, at {}", compass.angle());
    }
}

#[test]
fn kinematic_compass_snaps_inside_threshold() {
    let mut compass = Compass::new(NVec2::zeros(), CompassBehavior::Kinematic);
    compass.set_angle(1.0 + THRESHOLD / 2.0);
    compass.update(&NVec2::new(1.0f64.cos(), 1.0f64.sin()), false, 1.0);
    assert_relative_eq!(compass.angle(), 1.0, epsilon = 1e-12);
    assert_eq!(compass.angular_velocity(), 0.0);
}

#[test]
fn compass_inside_magnet_aligns_at_once() {
    let magnet = bar_magnet(225.0, PI / 3.0);
    let mut compass = Compass::new(NVec2::zeros(), CompassBehavior::Kinematic);
    compass.step(&magnet, 1.0);
    assert_relative_eq!(compass.angle(), PI / 3.0, epsilon = 1e-12);
}

#[test]
fn kick_start_only_wakes_a_resting_kinematic_needle() {
    let mut immediate = Compass::new(NVec2::zeros(), CompassBehavior::Immediate);
    immediate.kick_start();
    assert_eq!(immediate.angular_velocity(), 0.0);

    let mut kinematic = Compass::new(NVec2::zeros(), CompassBehavior::Kinematic);
    kinematic.kick_start();
    assert!(kinematic.angular_velocity() > 0.0);
}

// ==================================================================================
// Clock tests
// ==================================================================================

#[test]
fn clock_counts_ticks_independent_of_frame_split() {
    let mut quarters = FixedStepClock::new(25.0);
    let due: usize = (0..4).map(|_| quarters.advance(0.02)).sum();
    assert_eq!(due, 2);

    let mut uneven = FixedStepClock::new(25.0);
    assert_eq!(uneven.advance(0.06) + uneven.advance(0.02), 2);

    let mut single = FixedStepClock::new(25.0);
    assert_eq!(single.advance(0.08), 2);
    assert_eq!(single.ticks(), 2);
}

#[test]
fn paused_clock_only_steps_manually() {
    let mut clock = FixedStepClock::new(25.0);
    clock.set_paused(true);
    assert_eq!(clock.advance(1.0), 0);
    assert_eq!(clock.step_once(), 1);
    assert_eq!(clock.ticks(), 1);
}

// ==================================================================================
// Sources tests
// ==================================================================================

#[test]
fn ac_source_changes_sign_over_a_period() {
    let mut source = CurrentSource::ac(1.0, 0.5);
    let mut seen_positive = false;
    let mut seen_negative = false;
    for _ in 0..60 {
        source.step(1.0);
        let a = source.amplitude();
        assert!(a.abs() <= 1.0);
        seen_positive |= a > 0.0;
        seen_negative |= a < 0.0;
    }
    assert!(seen_positive && seen_negative);
}

#[test]
fn turbine_turns_magnet_at_rpm() {
    let mut magnet = bar_magnet(225.0, 0.0);
    let mut turbine = Turbine::new(0.5, 100.0, 25.0);
    for _ in 0..10 {
        turbine.step(&mut magnet, 1.0);
    }
    // 50 rpm at 25 ticks/s is 2 pi / 30 per tick
    assert_relative_eq!(magnet.rotation(), 10.0 * 2.0 * PI / 30.0, epsilon = 1e-12);
}

#[test]
fn reversed_current_points_electromagnet_backwards() {
    let mut cfg = load_scenario("electromagnet_ac.yaml");
    cfg.pickup_coil = None;
    let mut scenario = Scenario::build_scenario(cfg, grids()).unwrap();

    let mut flipped = false;
    for _ in 0..60 {
        scenario.step_once().unwrap();
        if let faraday::MagnetDriver::Electromagnet { electromagnet, .. } = &scenario.driver {
            let amplitude = electromagnet.source.amplitude();
            let expected = if amplitude < 0.0 { PI } else { 0.0 };
            assert_eq!(scenario.magnet.rotation(), expected);
            flipped |= amplitude < 0.0;
        }
    }
    assert!(flipped, "AC source never reversed");
}

// ==================================================================================
// Scenario tests
// ==================================================================================

#[test]
fn shipped_scenarios_parse() {
    for name in ["bar_magnet.yaml", "electromagnet_ac.yaml", "electromagnet_battery.yaml", "generator.yaml"] {
        let cfg = load_scenario(name);
        Scenario::build_scenario(cfg, grids()).unwrap_or_else(|e| panic!("{name}: {e}"));
    }
}

#[test]
fn even_sample_count_is_rejected() {
    let text = MINIMAL_SCENARIO.replace("count: 9", "count: 8");
    let err = ScenarioConfig::from_yaml_str(&text).unwrap_err();
    assert!(matches!(err, SimulationError::InvalidConfig(_)), "{err}");
}

#[test]
fn loop_count_out_of_range_is_rejected() {
    let text = MINIMAL_SCENARIO.replace("number_of_loops: 2", "number_of_loops: 7");
    let err = ScenarioConfig::from_yaml_str(&text).unwrap_err();
    assert!(matches!(err, SimulationError::InvalidConfig(_)), "{err}");
}

#[test]
fn malformed_yaml_is_a_yaml_error() {
    let err = ScenarioConfig::from_yaml_str("engine: [").unwrap_err();
    assert!(matches!(err, SimulationError::YamlError(_)));
}

#[test]
fn scenario_runs_are_deterministic() {
    let run = || {
        let mut scenario = Scenario::build_scenario(load_scenario("bar_magnet.yaml"), grids()).unwrap();
        let mut emfs = Vec::new();
        for _ in 0..300 {
            scenario.step_once().unwrap();
            emfs.push(scenario.emf().to_bits());
        }
        (emfs, scenario.compass_angle().map(f64::to_bits))
    };
    assert_eq!(run(), run());
}

#[test]
fn frame_rate_does_not_change_the_outcome() {
    let cfg = ScenarioConfig::from_yaml_str(MINIMAL_SCENARIO).unwrap();

    let mut fine = Scenario::build_scenario(cfg.clone(), grids()).unwrap();
    fine.set_magnet_velocity(Some(NVec2::new(4.0, 0.0)));
    let mut coarse = Scenario::build_scenario(cfg, grids()).unwrap();
    coarse.set_magnet_velocity(Some(NVec2::new(4.0, 0.0)));

    for _ in 0..40 {
        fine.advance(0.01).unwrap();
    }
    for _ in 0..10 {
        coarse.advance(0.04).unwrap();
    }

    assert_eq!(fine.clock.ticks(), 10);
    assert_eq!(coarse.clock.ticks(), 10);
    assert_eq!(fine.emf(), coarse.emf());
    assert_eq!(fine.magnet.position(), coarse.magnet.position());
}

#[test]
fn moving_magnet_lights_the_bulb() {
    let mut scenario = Scenario::build_scenario(load_scenario("bar_magnet.yaml"), grids()).unwrap();
    let mut brightest: f64 = 0.0;
    for _ in 0..400 {
        scenario.step_once().unwrap();
        brightest = brightest.max(scenario.brightness());
        assert!(scenario.voltmeter_angle().abs() <= PI / 2.0);
    }
    assert!(brightest > 0.1, "bulb peaked at {brightest}");
}

#[test]
fn charge_speed_that_laps_the_coil_is_rejected() {
    let text = format!("{MINIMAL_SCENARIO}  electron_speed_scale: 60.0\n");
    let err = ScenarioConfig::from_yaml_str(&text).unwrap_err();
    assert!(matches!(err, SimulationError::InvalidConfig(_)), "{err}");

    let text = format!("{MINIMAL_SCENARIO}  electron_speed_scale: 0.0\n");
    assert!(ScenarioConfig::from_yaml_str(&text).is_err());

    let text = format!("{MINIMAL_SCENARIO}  electron_speed_scale: 2.0\n");
    let cfg = ScenarioConfig::from_yaml_str(&text).unwrap();
    let mut scenario = Scenario::build_scenario(cfg, grids()).unwrap();
    scenario.set_magnet_velocity(Some(NVec2::new(6.0, 0.0)));
    for _ in 0..100 {
        scenario.step_once().unwrap();
    }
}

#[test]
fn tiny_electromagnet_is_rejected() {
    let text = r#"
parameters:
  ticks_per_second: 25.0
engine:
  ticks: 10
magnet:
  position: [0.0, 0.0]
  strength: 0.0
  strength_range: [0.0, 300.0]
  kind:
    type: electromagnet
    number_of_loops: 1
    loop_radius: 1.0
    loop_spacing: 2.0
    max_strength: 300.0
    source:
      type: battery
      voltage: 5.0
      max_voltage: 10.0
"#;
    let err = ScenarioConfig::from_yaml_str(text).unwrap_err();
    assert!(matches!(err, SimulationError::InvalidConfig(_)), "{err}");
}

#[test]
fn omitted_tick_rate_uses_the_default() {
    let text = MINIMAL_SCENARIO.replace("  ticks_per_second: 25.0\n", "  electron_flow: false\n");
    let cfg = ScenarioConfig::from_yaml_str(&text).unwrap();
    assert_eq!(cfg.parameters.ticks_per_second, TICKS_PER_SECOND);

    let scenario = Scenario::build_scenario(cfg, grids()).unwrap();
    assert_eq!(scenario.parameters.ticks_per_second, TICKS_PER_SECOND);
    assert!(!scenario.parameters.electron_flow);
}

#[test]
fn marker_count_follows_particles_per_segment() {
    let mut scenario = Scenario::build_scenario(load_scenario("electromagnet_ac.yaml"), grids()).unwrap();
    scenario.set_particles_per_segment(5);

    let pickup = scenario.pickup.as_ref().unwrap();
    assert_eq!(pickup.charges.particles().len(), 5 * pickup.charges.path().len());
    if let faraday::MagnetDriver::Electromagnet { charges, .. } = &scenario.driver {
        assert_eq!(charges.particles().len(), 5 * charges.path().len());
    }

    scenario.set_particles_per_segment(0);
    assert!(scenario.pickup.as_ref().unwrap().charges.particles().is_empty());
    for _ in 0..10 {
        scenario.step_once().unwrap();
    }
}
