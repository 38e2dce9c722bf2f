// Full-screen title cards that fade in and out on entering trivia and on each arrival.

use bevy::prelude::*;

use crate::flight::{FlightLanded, FlightSystems};
use crate::locations::location;
use crate::progression::{Phase, ProgressionState};

pub struct TransitionPlugin;

impl Plugin for TransitionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(Phase::Trivia), welcome_card)
            .add_systems(
                Update,
                (arrival_card.after(FlightSystems), fade_card).chain(),
            );
    }
}

const FADE_IN: f32 = 0.1;
const HOLD: f32 = 1.2;
const FADE_OUT: f32 = 0.8;
const TOTAL: f32 = FADE_IN + HOLD + FADE_OUT;
/// Peak background opacity; the route stays visible behind arrival cards.
const CARD_DIM: f32 = 0.6;

#[derive(Resource)]
struct CardTimer(f32);

#[derive(Component)]
struct CardRoot;

#[derive(Component)]
struct CardText;

fn welcome_card(
    mut commands: Commands,
    progression: Res<ProgressionState>,
    existing: Query<Entity, With<CardRoot>>,
) {
    let title = format!(
        "Welcome, {}! First stop: {}",
        progression.player_name,
        location(0).display_name
    );
    spawn_card(&mut commands, &existing, &title);
}

fn arrival_card(
    mut commands: Commands,
    mut landed: MessageReader<FlightLanded>,
    existing: Query<Entity, With<CardRoot>>,
) {
    if let Some(FlightLanded { leg }) = landed.read().last() {
        spawn_card(&mut commands, &existing, location(leg.1).display_name);
    }
}

fn spawn_card(commands: &mut Commands, existing: &Query<Entity, With<CardRoot>>, title: &str) {
    // Despawn any card still fading from a previous arrival.
    for entity in existing {
        commands.entity(entity).despawn();
    }
    commands.insert_resource(CardTimer(0.0));

    commands
        .spawn((
            CardRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                position_type: PositionType::Absolute,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, CARD_DIM)),
            GlobalZIndex(100),
            Pickable::IGNORE,
        ))
        .with_children(|parent| {
            parent.spawn((
                CardText,
                Text::new(title),
                TextFont {
                    font_size: 48.0,
                    ..default()
                },
                TextColor(Color::srgba(1.0, 1.0, 1.0, 0.0)),
            ));
        });
}

/// Text and background alpha `t` seconds into a card.
fn card_alpha(t: f32) -> (f32, f32) {
    if t < FADE_IN {
        (t / FADE_IN, CARD_DIM)
    } else if t < FADE_IN + HOLD {
        (1.0, CARD_DIM)
    } else {
        let fade_t = ((t - FADE_IN - HOLD) / FADE_OUT).min(1.0);
        (1.0 - fade_t, CARD_DIM * (1.0 - fade_t))
    }
}

fn fade_card(
    mut commands: Commands,
    time: Res<Time>,
    mut timer: Option<ResMut<CardTimer>>,
    roots: Query<Entity, With<CardRoot>>,
    mut texts: Query<&mut TextColor, With<CardText>>,
    mut backgrounds: Query<&mut BackgroundColor, With<CardRoot>>,
) {
    let Some(timer) = timer.as_mut() else {
        return;
    };

    timer.0 += time.delta_secs();
    let t = timer.0;

    if t >= TOTAL {
        for entity in &roots {
            commands.entity(entity).despawn();
        }
        commands.remove_resource::<CardTimer>();
        return;
    }

    let (text_alpha, bg_alpha) = card_alpha(t);
    for mut color in &mut texts {
        color.0 = Color::srgba(1.0, 1.0, 1.0, text_alpha);
    }
    for mut bg in &mut backgrounds {
        bg.0 = Color::srgba(0.0, 0.0, 0.0, bg_alpha);
    }
}
