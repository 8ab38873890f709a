use bevy::math::primitives::Rectangle;
use bevy::prelude::*;
use bevy::sprite::{MaterialMesh2dBundle, Mesh2dHandle};

use crate::simulation::coil::CoilPath;
use crate::simulation::scenario::{MagnetDriver, Scenario};
use crate::simulation::states::{Layer, NVec2};

#[derive(Component)]
struct MagnetBody;

const SCALE: f32 = 0.8; // world units are pixel sized, shrink to fit the window
const CURVE_STEPS: usize = 8;
const CHARGE_RADIUS: f32 = 3.0;
const NEEDLE_LENGTH: f32 = 30.0;

fn to_screen(p: &NVec2) -> Vec2 {
    Vec2::new(p.x as f32 * SCALE, p.y as f32 * SCALE)
}

pub fn run_2d(scenario: Scenario) {
    println!(
        "run_2d: starting Bevy 2D viewer at {} ticks per second",
        scenario.parameters.ticks_per_second
    );

    App::new()
        .insert_resource(scenario)
        .add_plugins(DefaultPlugins)
        .add_systems(Startup, setup_scene_system)
        .add_systems(Update, (physics_step_system, sync_magnet_system, draw_gizmos_system).chain())
        .run();
}

fn setup_scene_system(
    mut commands: Commands,
    scenario: Res<Scenario>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    // 2D camera
    commands.spawn(Camera2dBundle::default());

    let half = scenario.magnet.half_size();
    let size = Vec2::new(half.x as f32 * 2.0 * SCALE, half.y as f32 * 2.0 * SCALE);
    let p = to_screen(&scenario.magnet.position());

    commands.spawn((
        MaterialMesh2dBundle {
            mesh: Mesh2dHandle(meshes.add(Rectangle::new(size.x, size.y))),
            material: materials.add(ColorMaterial::from(Color::srgb(0.55, 0.55, 0.6))),
            transform: Transform::from_xyz(p.x, p.y, -1.0)
                .with_rotation(Quat::from_rotation_z(scenario.magnet.rotation() as f32)),
            ..Default::default()
        },
        MagnetBody,
    ));
}

fn physics_step_system(time: Res<Time>, mut scenario: ResMut<Scenario>, mut exit: EventWriter<AppExit>) {
    if let Err(err) = scenario.advance(time.delta_seconds() as f64) {
        error!("stopping viewer: {err}");
        exit.send(AppExit::error());
    }
}

fn sync_magnet_system(scenario: Res<Scenario>, mut query: Query<&mut Transform, With<MagnetBody>>) {
    let p = to_screen(&scenario.magnet.position());
    for mut transform in &mut query {
        transform.translation.x = p.x;
        transform.translation.y = p.y;
        transform.rotation = Quat::from_rotation_z(scenario.magnet.rotation() as f32);
    }
}

fn draw_gizmos_system(scenario: Res<Scenario>, mut gizmos: Gizmos) {
    let magnet = &scenario.magnet;

    // north half of the magnet marked in red
    let half = magnet.half_size();
    let north = [
        NVec2::new(0.0, -half.y),
        NVec2::new(half.x, -half.y),
        NVec2::new(half.x, half.y),
        NVec2::new(0.0, half.y),
    ]
    .map(|c| to_screen(&magnet.to_global(&c)));
    for i in 0..north.len() {
        gizmos.line_2d(north[i], north[(i + 1) % north.len()], Color::srgb(0.9, 0.2, 0.2));
    }

    if let MagnetDriver::Electromagnet { charges, .. } = &scenario.driver {
        draw_path(&mut gizmos, charges.path(), &charges.origin());
        draw_charges(&mut gizmos, charges.markers());
    }

    if let Some(pickup) = &scenario.pickup {
        draw_path(&mut gizmos, pickup.charges.path(), &pickup.charges.origin());
        draw_charges(&mut gizmos, pickup.charges.markers());

        // light bulb above the coil, radius grows with brightness
        let coil = pickup.coil.coil();
        let bulb = pickup.coil.position() + NVec2::new(0.0, coil.loop_radius + 60.0);
        let brightness = pickup.light_bulb.brightness() as f32;
        gizmos.circle_2d(to_screen(&bulb), 8.0 + 20.0 * brightness, Color::srgb(1.0, 0.9, 0.3 * (1.0 - brightness)));
    }

    if let Some(compass) = &scenario.compass {
        let center = to_screen(&compass.position);
        let dir = Vec2::new(compass.angle().cos() as f32, compass.angle().sin() as f32) * NEEDLE_LENGTH;
        gizmos.circle_2d(center, NEEDLE_LENGTH, Color::srgb(0.7, 0.7, 0.7));
        gizmos.line_2d(center, center + dir, Color::srgb(0.9, 0.2, 0.2));
        gizmos.line_2d(center, center - dir, Color::WHITE);
    }

    if let (Some(meter), Some(reading)) = (&scenario.field_meter, scenario.field_reading()) {
        let center = to_screen(&meter.position);
        let dir = Vec2::new(reading.angle.cos() as f32, reading.angle.sin() as f32) * NEEDLE_LENGTH;
        gizmos.circle_2d(center, 4.0, Color::srgb(0.3, 0.8, 0.3));
        if reading.magnitude > 0.0 {
            gizmos.line_2d(center, center + dir, Color::srgb(0.3, 0.8, 0.3));
        }
    }
}

fn layer_color(layer: Layer) -> Color {
    match layer {
        Layer::Foreground => Color::srgb(0.85, 0.55, 0.2),
        Layer::Background => Color::srgb(0.45, 0.3, 0.1),
    }
}

fn draw_path(gizmos: &mut Gizmos, path: &CoilPath, origin: &NVec2) {
    for segment in path.segments() {
        let points: Vec<Vec2> = (0..=CURVE_STEPS)
            .map(|k| to_screen(&(segment.evaluate(k as f64 / CURVE_STEPS as f64) + origin)))
            .collect();
        gizmos.linestrip_2d(points, layer_color(segment.layer));
    }
}

fn draw_charges(gizmos: &mut Gizmos, markers: impl Iterator<Item = (NVec2, Layer)>) {
    for (position, layer) in markers {
        let color = match layer {
            Layer::Foreground => Color::srgb(0.3, 0.6, 1.0),
            Layer::Background => Color::srgb(0.15, 0.3, 0.5),
        };
        gizmos.circle_2d(to_screen(&position), CHARGE_RADIUS, color);
    }
}
