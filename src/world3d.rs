// 3D surface: landmark placeholders, an arcing jetpack flight and a chase camera.
use bevy::prelude::*;

use crate::flight::{
    CameraRig, FlightSystems, GLOBE_PROFILE, TransitionAnimator, approach_angle, facing_yaw,
    world_position,
};
use crate::locations::{LOCATIONS, location};
use crate::progression::ProgressionState;
use crate::surface::Surface;
use flame::{FlameNoise, flame_length};

pub struct GlobePlugin;

impl Plugin for GlobePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FlameNoise>()
            .add_systems(OnEnter(Surface::Globe), (setup_globe, set_sky_background))
            .add_systems(OnExit(Surface::Globe), exit_globe)
            .add_systems(
                Update,
                (
                    (fly_avatar, follow_camera).chain(),
                    emit_trail,
                    fade_trail,
                    flicker_flame,
                )
                    .after(FlightSystems)
                    .run_if(in_state(Surface::Globe).and(resource_exists::<ProgressionState>)),
            );
    }
}

pub const SKY_BLUE: Color = Color::srgb(0.53, 0.81, 0.92);

const RIG: CameraRig = CameraRig {
    offset: Vec3::new(0.0, 9.0, 22.0),
    look_offset: Vec3::new(0.0, 2.0, -6.0),
};

const HOVER_HEIGHT: f32 = 1.5;
const IDLE_BOB_HEIGHT: f32 = 0.25;
const IDLE_BOB_SPEED: f32 = 2.0;
/// Fraction of the remaining heading error closed each frame.
const HEADING_SMOOTHING: f32 = 0.08;
const TRAIL_INTERVAL: f32 = 0.06;
const TRAIL_LIFETIME: f32 = 1.2;

#[derive(Component)]
struct GlobeAvatar;

#[derive(Component)]
struct GlobeCamera;

#[derive(Component)]
struct JetFlame;

/// Smoothed yaw of the avatar in radians.
#[derive(Component, Default)]
struct Heading(f32);

#[derive(Component)]
struct TrailPuff {
    age: f32,
}

#[derive(Resource)]
struct TrailAssets {
    mesh: Handle<Mesh>,
    material: Handle<StandardMaterial>,
    since_last: f32,
}

mod flame {
    use bevy::prelude::{Resource, Vec3};
    use noiz::prelude::{common_noise::*, *};

    const FLAME_BASE: f32 = 0.6;
    const FLAME_FLICKER: f32 = 0.35;
    const FLAME_NOISE_SPEED: f32 = 6.0;

    #[derive(Resource)]
    pub struct FlameNoise(Noise<Fbm<Perlin>>);

    impl Default for FlameNoise {
        fn default() -> FlameNoise {
            let mut noise: Noise<Fbm<Perlin>> = Noise::<Fbm<Perlin>>::default();
            noise.set_seed(17);
            noise.set_frequency(1.0);
            FlameNoise(noise)
        }
    }

    /// Jet flame length multiplier at time `t`.
    pub fn flame_length(noise: &FlameNoise, t: f32) -> f32 {
        let p = Vec3::new(t * FLAME_NOISE_SPEED, 0.0, 0.0);
        (FLAME_BASE + noise.0.sample_for::<f32>(p) * FLAME_FLICKER).max(0.1)
    }
}

fn setup_globe(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    progression: Res<ProgressionState>,
) {
    let style = progression.preset.style();
    let start = location(progression.current_location).world_anchor + Vec3::Y * HOVER_HEIGHT;

    commands.spawn((
        GlobeCamera,
        Camera3d::default(),
        RIG.transform_for(start),
        DespawnOnExit(Surface::Globe),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 10_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -1.0, 0.5, 0.0)),
        DespawnOnExit(Surface::Globe),
    ));

    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(160.0, 300.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.55, 0.3))),
        Transform::from_xyz(0.0, 0.0, -110.0),
        DespawnOnExit(Surface::Globe),
    ));

    // Placeholder landmarks; height grows along the route.
    for (index, stop) in LOCATIONS.iter().enumerate() {
        let height = 4.0 + index as f32 * 2.0;
        let [r, g, b] = stop.sky;
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::new(6.0, height, 6.0))),
            MeshMaterial3d(materials.add(Color::srgb(r * 0.8, g * 0.8, b * 0.8))),
            Transform::from_translation(
                stop.world_anchor - Vec3::new(0.0, 0.0, 8.0) + Vec3::Y * height / 2.0,
            ),
            DespawnOnExit(Surface::Globe),
        ));
    }

    commands
        .spawn((
            GlobeAvatar,
            TransitionAnimator::new(GLOBE_PROFILE),
            Heading::default(),
            Mesh3d(meshes.add(Capsule3d::new(0.5, 1.0))),
            MeshMaterial3d(materials.add(style.suit)),
            Transform::from_translation(start).with_scale(Vec3::splat(style.scale)),
            DespawnOnExit(Surface::Globe),
        ))
        .with_children(|parent| {
            parent.spawn((
                Mesh3d(meshes.add(Cuboid::new(0.7, 0.3, 0.2))),
                MeshMaterial3d(materials.add(style.visor)),
                Transform::from_xyz(0.0, 0.6, -0.45),
            ));
            parent.spawn((
                JetFlame,
                Mesh3d(meshes.add(Cone::new(0.25, 1.0))),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color: style.flame,
                    emissive: style.flame.to_linear() * 6.0,
                    ..default()
                })),
                Transform::from_xyz(0.0, -1.3, 0.45)
                    .with_rotation(Quat::from_rotation_x(std::f32::consts::PI)),
            ));
        });

    commands.insert_resource(TrailAssets {
        mesh: meshes.add(Sphere::new(0.35)),
        material: materials.add(StandardMaterial {
            base_color: Color::srgba(1.0, 1.0, 1.0, 0.6),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        }),
        since_last: 0.0,
    });
}

fn fly_avatar(
    time: Res<Time>,
    progression: Res<ProgressionState>,
    mut avatar: Query<(&TransitionAnimator, &mut Heading, &mut Transform), With<GlobeAvatar>>,
) {
    let Ok((animator, mut heading, mut transform)) = avatar.single_mut() else {
        return;
    };
    let now = time.elapsed_secs();

    match animator.sample(now) {
        Some(frame) => {
            let from = location(frame.source).world_anchor + Vec3::Y * HOVER_HEIGHT;
            let to = location(frame.dest).world_anchor + Vec3::Y * HOVER_HEIGHT;
            transform.translation =
                world_position(from, to, frame.eased_progress, animator.profile().arc_height);
            if let Some(target) = facing_yaw(to - from) {
                heading.0 = approach_angle(heading.0, target, HEADING_SMOOTHING);
            }
        }
        None => {
            let bob = (now * IDLE_BOB_SPEED).sin() * IDLE_BOB_HEIGHT;
            transform.translation = location(progression.current_location).world_anchor
                + Vec3::Y * (HOVER_HEIGHT + bob);
            heading.0 = approach_angle(heading.0, 0.0, HEADING_SMOOTHING);
        }
    }
    transform.rotation = Quat::from_rotation_y(heading.0);
}

fn follow_camera(
    avatar: Query<&Transform, With<GlobeAvatar>>,
    mut camera: Query<&mut Transform, (With<GlobeCamera>, Without<GlobeAvatar>)>,
) {
    let Ok(avatar) = avatar.single() else {
        return;
    };
    let Ok(mut camera) = camera.single_mut() else {
        return;
    };
    *camera = RIG.transform_for(avatar.translation);
}

fn emit_trail(
    mut commands: Commands,
    time: Res<Time>,
    assets: Option<ResMut<TrailAssets>>,
    avatar: Query<(&TransitionAnimator, &Transform), With<GlobeAvatar>>,
) {
    let Some(mut assets) = assets else {
        return;
    };
    let Ok((animator, transform)) = avatar.single() else {
        return;
    };
    if animator.sample(time.elapsed_secs()).is_none() {
        assets.since_last = 0.0;
        return;
    }

    assets.since_last += time.delta_secs();
    if assets.since_last < TRAIL_INTERVAL {
        return;
    }
    assets.since_last = 0.0;

    commands.spawn((
        TrailPuff { age: 0.0 },
        Mesh3d(assets.mesh.clone()),
        MeshMaterial3d(assets.material.clone()),
        Transform::from_translation(transform.translation - Vec3::Y),
        DespawnOnExit(Surface::Globe),
    ));
}

/// Size of a trail puff over its life: full at birth, gone at `TRAIL_LIFETIME`.
fn trail_scale(age: f32) -> f32 {
    (1.0 - age / TRAIL_LIFETIME).clamp(0.0, 1.0)
}

fn fade_trail(
    mut commands: Commands,
    time: Res<Time>,
    mut puffs: Query<(Entity, &mut TrailPuff, &mut Transform)>,
) {
    for (entity, mut puff, mut transform) in &mut puffs {
        puff.age += time.delta_secs();
        if puff.age >= TRAIL_LIFETIME {
            commands.entity(entity).despawn();
            continue;
        }
        transform.scale = Vec3::splat(trail_scale(puff.age));
    }
}

fn flicker_flame(
    time: Res<Time>,
    noise: Res<FlameNoise>,
    mut flames: Query<&mut Transform, With<JetFlame>>,
) {
    let length = flame_length(&noise, time.elapsed_secs());
    for mut transform in &mut flames {
        transform.scale = Vec3::new(1.0, length, 1.0);
    }
}

fn set_sky_background(mut clear_color: ResMut<ClearColor>) {
    clear_color.0 = SKY_BLUE;
}

fn exit_globe(mut commands: Commands) {
    commands.remove_resource::<TrailAssets>();
}
