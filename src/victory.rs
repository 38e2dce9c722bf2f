// Victory screen with confetti and a Play Again button.

use bevy::prelude::*;
use rand::Rng;

use crate::creation::{HOVERED_BUTTON, NORMAL_BUTTON, PRESSED_BUTTON, spawn_button};
use crate::flight::Flying;
use crate::locations::{LOCATION_COUNT, location};
use crate::progression::{Phase, ProgressionState};

pub struct VictoryPlugin;

impl Plugin for VictoryPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(Phase::Victory), setup_victory)
            .add_systems(
                Update,
                (reveal_victory, victory_buttons, fall_confetti)
                    .run_if(in_state(Phase::Victory)),
            );
    }
}

const CONFETTI_COUNT: usize = 80;
const CONFETTI_GRAVITY: f32 = 180.0;
const CONFETTI_COLOURS: [Color; 5] = [
    Color::srgb(1.0, 0.3, 0.3),
    Color::srgb(1.0, 0.85, 0.2),
    Color::srgb(0.3, 0.85, 0.45),
    Color::srgb(0.3, 0.6, 1.0),
    Color::srgb(0.8, 0.4, 1.0),
];

#[derive(Component)]
struct VictoryOverlay;

#[derive(Component)]
struct PlayAgain;

#[derive(Component)]
struct Confetti {
    velocity: Vec2,
    position: Vec2,
}

fn setup_victory(mut commands: Commands, progression: Res<ProgressionState>) {
    let summit = location(LOCATION_COUNT - 1);

    commands
        .spawn((
            VictoryOverlay,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(16.0),
                position_type: PositionType::Absolute,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
            GlobalZIndex(50),
            Visibility::Hidden,
            DespawnOnExit(Phase::Victory),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(format!("Congratulations, {}!", progression.player_name)),
                TextFont {
                    font_size: 44.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            parent.spawn((
                Text::new(format!(
                    "You reached {} and finished onboarding.",
                    summit.display_name
                )),
                TextFont {
                    font_size: 22.0,
                    ..default()
                },
                TextColor(Color::srgba(0.9, 0.9, 0.9, 1.0)),
            ));
            spawn_button(parent, "Play Again", PlayAgain, None);
        });

    let mut rng = rand::rng();
    for i in 0..CONFETTI_COUNT {
        let position = Vec2::new(
            rng.random_range(0.0..1280.0),
            rng.random_range(-400.0..0.0),
        );
        let velocity = Vec2::new(rng.random_range(-60.0..60.0), rng.random_range(0.0..80.0));
        commands.spawn((
            Confetti { velocity, position },
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(position.x),
                top: Val::Px(position.y),
                width: Val::Px(8.0),
                height: Val::Px(12.0),
                ..default()
            },
            BackgroundColor(CONFETTI_COLOURS[i % CONFETTI_COLOURS.len()]),
            GlobalZIndex(60),
            Visibility::Hidden,
            DespawnOnExit(Phase::Victory),
        ));
    }
}

/// Holds the screen back until the final flight has landed.
fn reveal_victory(
    flying: Res<Flying>,
    mut overlay: Query<&mut Visibility, Or<(With<VictoryOverlay>, With<Confetti>)>>,
) {
    if flying.0 {
        return;
    }
    for mut visibility in &mut overlay {
        if *visibility == Visibility::Hidden {
            *visibility = Visibility::Inherited;
        }
    }
}

fn fall_confetti(
    time: Res<Time>,
    flying: Res<Flying>,
    window: Query<&Window>,
    mut confetti: Query<(&mut Confetti, &mut Node)>,
) {
    if flying.0 {
        return;
    }
    let floor = window.single().map(|w| w.height()).unwrap_or(720.0);
    let dt = time.delta_secs();
    for (mut piece, mut node) in &mut confetti {
        piece.velocity.y += CONFETTI_GRAVITY * dt;
        let step = piece.velocity * dt;
        piece.position += step;
        if piece.position.y > floor {
            piece.position.y = -20.0;
            piece.velocity.y = 0.0;
        }
        node.left = Val::Px(piece.position.x);
        node.top = Val::Px(piece.position.y);
    }
}

fn victory_buttons(
    mut query: Query<
        (&Interaction, &mut BackgroundColor),
        (Changed<Interaction>, With<PlayAgain>),
    >,
    mut commands: Commands,
    progression: Res<ProgressionState>,
) {
    for (interaction, mut bg) in &mut query {
        match *interaction {
            Interaction::Pressed => {
                *bg = PRESSED_BUTTON.into();
                play_again(&mut commands, &progression.player_name);
            }
            Interaction::Hovered => *bg = HOVERED_BUTTON.into(),
            Interaction::None => *bg = NORMAL_BUTTON.into(),
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn play_again(_commands: &mut Commands, _player_name: &str) {
    info!("reloading for another run");
    let reloaded = web_sys::window().map(|window| window.location().reload());
    if !matches!(reloaded, Some(Ok(()))) {
        warn!("page reload failed: {reloaded:?}");
    }
}

/// No page to reload natively, so start over from a fresh state.
#[cfg(not(target_arch = "wasm32"))]
fn play_again(commands: &mut Commands, player_name: &str) {
    info!("starting another run for {player_name}");
    commands.insert_resource(Flying(false));
    commands.insert_resource(ProgressionState::new(player_name));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trivia::QuestionId;

    fn finished() -> ProgressionState {
        ProgressionState {
            phase: Phase::Victory,
            current_location: LOCATION_COUNT - 1,
            previous_location: LOCATION_COUNT - 2,
            answered: (1..LOCATION_COUNT as u32).map(QuestionId).collect(),
            is_transitioning: true,
            ..ProgressionState::new("Ada")
        }
    }

    fn victory_app(flying: bool) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, bevy::state::app::StatesPlugin))
            .init_state::<Phase>()
            .add_plugins(VictoryPlugin)
            .insert_resource(Flying(flying))
            .insert_resource(finished());
        app.world_mut()
            .resource_mut::<NextState<Phase>>()
            .set(Phase::Victory);
        app
    }

    fn hidden_count(app: &mut App) -> (usize, usize) {
        let mut query = app
            .world_mut()
            .query_filtered::<&Visibility, Or<(With<VictoryOverlay>, With<Confetti>)>>();
        let all: Vec<Visibility> = query.iter(app.world()).copied().collect();
        let hidden = all.iter().filter(|v| **v == Visibility::Hidden).count();
        (hidden, all.len())
    }

    #[test]
    fn celebration_waits_for_the_final_landing() {
        let mut app = victory_app(true);
        app.update();
        app.update();

        let (hidden, total) = hidden_count(&mut app);
        assert_eq!(total, CONFETTI_COUNT + 1);
        assert_eq!(hidden, total);

        app.insert_resource(Flying(false));
        app.update();

        let (hidden, total) = hidden_count(&mut app);
        assert_eq!(total, CONFETTI_COUNT + 1);
        assert_eq!(hidden, 0);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn play_again_starts_a_fresh_run() {
        let mut app = victory_app(false);
        app.update();
        app.world_mut().spawn((
            PlayAgain,
            Interaction::Pressed,
            BackgroundColor(NORMAL_BUTTON),
        ));
        app.update();

        assert!(!app.world().resource::<Flying>().0);
        let progression = app.world().resource::<ProgressionState>();
        assert_eq!(progression, &ProgressionState::new("Ada"));
        assert_eq!(progression.phase, Phase::CharacterCreation);
        assert_eq!(progression.current_location, 0);
        assert!(progression.answered.is_empty());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn play_again_returns_to_character_creation() {
        let mut app = App::new();
        app.add_plugins((
            MinimalPlugins,
            bevy::state::app::StatesPlugin,
            crate::progression::ProgressionPlugin,
            VictoryPlugin,
        ))
        .insert_resource(Flying(false))
        .insert_resource(finished());
        app.update();
        app.update();
        assert_eq!(**app.world().resource::<State<Phase>>(), Phase::Victory);

        app.world_mut().spawn((
            PlayAgain,
            Interaction::Pressed,
            BackgroundColor(NORMAL_BUTTON),
        ));
        app.update();
        app.update();
        app.update();

        assert_eq!(
            **app.world().resource::<State<Phase>>(),
            Phase::CharacterCreation
        );
        let (_, total) = hidden_count(&mut app);
        assert_eq!(total, 0);
    }
}
