// 2D map surface: stop markers, the flying avatar, sky blending and a star field.
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::flight::{FlightSystems, MAP_PROFILE, TransitionAnimator, blend_rgb, map_position};
use crate::locations::{LOCATIONS, location};
use crate::pointer::{PointerSample, hit_test};
use crate::progression::ProgressionState;
use crate::starfield::{StarField, twinkle};
use crate::surface::Surface;

pub struct MapPlugin;

impl Plugin for MapPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(Surface::Map), setup_map)
            .add_systems(
                Update,
                (
                    place_avatar,
                    blend_sky,
                    style_markers,
                    refresh_stars,
                    twinkle_stars,
                    hover_label,
                )
                    .after(FlightSystems)
                    .run_if(in_state(Surface::Map).and(resource_exists::<ProgressionState>)),
            );
    }
}

const MARKER_SIZE: f32 = 26.0;
const AVATAR_SIZE: f32 = 30.0;
const ROUTE_DOT_SPACING: f32 = 22.0;
const HOVER_RADIUS: f32 = 30.0;
const STAR_COUNT: usize = 140;
const STAR_SEED: u64 = 7;
const IDLE_BOB_HEIGHT: f32 = 4.0;
const IDLE_BOB_SPEED: f32 = 3.0;

const VISITED: Color = Color::srgb(0.35, 0.8, 0.45);
const CURRENT: Color = Color::srgb(1.0, 0.85, 0.2);
const UPCOMING: Color = Color::srgba(1.0, 1.0, 1.0, 0.55);

#[derive(Component)]
struct MapAvatar;

#[derive(Component)]
struct MapVisor;

#[derive(Component)]
struct MapMarker(usize);

#[derive(Component)]
struct HoverLabel;

#[derive(Component)]
struct StarLayer(StarField);

#[derive(Component)]
struct StarSprite(usize);

fn setup_map(mut commands: Commands, progression: Res<ProgressionState>) {
    commands.spawn((Camera2d, DespawnOnExit(Surface::Map)));

    commands.spawn((
        StarLayer(StarField::new(STAR_SEED)),
        Transform::from_xyz(0.0, 0.0, -10.0),
        Visibility::default(),
        DespawnOnExit(Surface::Map),
    ));

    // Dotted route between consecutive stops.
    for pair in LOCATIONS.windows(2) {
        let (from, to) = (pair[0].map_anchor, pair[1].map_anchor);
        let steps = (from.distance(to) / ROUTE_DOT_SPACING).floor() as usize;
        for step in 1..steps {
            let p = from.lerp(to, step as f32 / steps as f32);
            commands.spawn((
                Sprite::from_color(Color::srgba(1.0, 1.0, 1.0, 0.35), Vec2::splat(4.0)),
                Transform::from_xyz(p.x, p.y, -5.0),
                DespawnOnExit(Surface::Map),
            ));
        }
    }

    for (index, stop) in LOCATIONS.iter().enumerate() {
        commands.spawn((
            MapMarker(index),
            Sprite::from_color(UPCOMING, Vec2::splat(MARKER_SIZE)),
            Transform::from_xyz(stop.map_anchor.x, stop.map_anchor.y, 0.0),
            DespawnOnExit(Surface::Map),
        ));
    }

    let style = progression.preset.style();
    let start = location(progression.current_location).map_anchor;
    commands
        .spawn((
            MapAvatar,
            TransitionAnimator::new(MAP_PROFILE),
            Sprite::from_color(style.suit, Vec2::splat(AVATAR_SIZE)),
            Transform::from_xyz(start.x, start.y, 10.0).with_scale(Vec3::splat(style.scale)),
            DespawnOnExit(Surface::Map),
        ))
        .with_children(|parent| {
            parent.spawn((
                MapVisor,
                Sprite::from_color(
                    style.visor,
                    Vec2::new(AVATAR_SIZE * 0.6, AVATAR_SIZE * 0.25),
                ),
                Transform::from_xyz(0.0, AVATAR_SIZE * 0.15, 0.1),
            ));
        });

    commands.spawn((
        HoverLabel,
        Text2d::new(""),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Transform::from_xyz(0.0, 0.0, 20.0),
        Visibility::Hidden,
        DespawnOnExit(Surface::Map),
    ));
}

fn place_avatar(
    time: Res<Time>,
    progression: Res<ProgressionState>,
    mut avatar: Query<(&TransitionAnimator, &mut Transform, &mut Sprite), With<MapAvatar>>,
    mut visor: Query<&mut Sprite, (With<MapVisor>, Without<MapAvatar>)>,
) {
    let Ok((animator, mut transform, mut sprite)) = avatar.single_mut() else {
        return;
    };
    let now = time.elapsed_secs();

    let position = match animator.sample(now) {
        Some(frame) => map_position(
            location(frame.source).map_anchor,
            location(frame.dest).map_anchor,
            frame.eased_progress,
            animator.profile().arc_height,
        ),
        None => {
            let bob = (now * IDLE_BOB_SPEED).sin() * IDLE_BOB_HEIGHT;
            location(progression.current_location).map_anchor + Vec2::Y * bob
        }
    };
    transform.translation.x = position.x;
    transform.translation.y = position.y;

    if progression.is_changed() {
        let style = progression.preset.style();
        sprite.color = style.suit;
        transform.scale = Vec3::splat(style.scale);
        if let Ok(mut visor) = visor.single_mut() {
            visor.color = style.visor;
        }
    }
}

fn blend_sky(
    time: Res<Time>,
    progression: Res<ProgressionState>,
    avatar: Query<&TransitionAnimator, With<MapAvatar>>,
    mut clear_color: ResMut<ClearColor>,
) {
    let frame = avatar
        .single()
        .ok()
        .and_then(|animator| animator.sample(time.elapsed_secs()));

    clear_color.0 = match frame {
        Some(frame) => blend_rgb(
            location(frame.source).sky,
            location(frame.dest).sky,
            frame.eased_progress,
        ),
        None => {
            let [r, g, b] = location(progression.current_location).sky;
            Color::srgb(r, g, b)
        }
    };
}

fn style_markers(
    progression: Res<ProgressionState>,
    mut markers: Query<(Ref<MapMarker>, &mut Sprite)>,
) {
    for (marker, mut sprite) in &mut markers {
        if !progression.is_changed() && !marker.is_added() {
            continue;
        }
        sprite.color = match marker.0 {
            i if i < progression.current_location => VISITED,
            i if i == progression.current_location => CURRENT,
            _ => UPCOMING,
        };
    }
}

fn refresh_stars(
    mut commands: Commands,
    window: Query<&Window, With<PrimaryWindow>>,
    mut layer: Query<(Entity, &mut StarLayer)>,
) {
    let Ok(window) = window.single() else {
        return;
    };
    let Ok((entity, mut layer)) = layer.single_mut() else {
        return;
    };
    if !layer.0.resize(window.width(), window.height(), STAR_COUNT) {
        return;
    }

    debug!("star field rebuilt with {} stars", layer.0.stars().len());
    commands.entity(entity).despawn_related::<Children>();
    commands.entity(entity).with_children(|parent| {
        for (index, star) in layer.0.stars().iter().enumerate() {
            parent.spawn((
                StarSprite(index),
                Sprite::from_color(Color::WHITE, Vec2::splat(star.size)),
                Transform::from_xyz(star.position[0], star.position[1], 0.0),
            ));
        }
    });
}

fn twinkle_stars(
    time: Res<Time>,
    layer: Query<&StarLayer>,
    mut stars: Query<(&StarSprite, &mut Sprite)>,
) {
    let Ok(layer) = layer.single() else {
        return;
    };
    let t = time.elapsed_secs();
    for (star, mut sprite) in &mut stars {
        if let Some(star) = layer.0.stars().get(star.0) {
            sprite.color = Color::srgba(1.0, 1.0, 1.0, twinkle(star, t));
        }
    }
}

fn hover_label(
    pointer: Res<PointerSample>,
    camera: Query<(&Camera, &GlobalTransform), With<Camera2d>>,
    mut label: Query<(&mut Text2d, &mut Transform, &mut Visibility), With<HoverLabel>>,
) {
    let Ok((mut text, mut transform, mut visibility)) = label.single_mut() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera.single() else {
        return;
    };

    let hovered = pointer
        .0
        .and_then(|cursor| camera.viewport_to_world_2d(camera_transform, cursor).ok())
        .and_then(|world| {
            hit_test(world, LOCATIONS.iter().map(|stop| stop.map_anchor), HOVER_RADIUS)
        });

    match hovered {
        Some(index) => {
            let stop = location(index);
            if text.0 != stop.display_name {
                text.0 = stop.display_name.to_string();
            }
            transform.translation.x = stop.map_anchor.x;
            transform.translation.y = stop.map_anchor.y + MARKER_SIZE;
            *visibility = Visibility::Inherited;
        }
        None => *visibility = Visibility::Hidden,
    }
}
