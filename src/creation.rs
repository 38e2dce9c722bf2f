// Character creation screen: pick a preset, then start the route.

use bevy::prelude::*;

use crate::flight::FlightSystems;
use crate::presets::CharacterPreset;
use crate::progression::{Phase, ProgressionState};

pub struct CreationPlugin;

impl Plugin for CreationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SelectedPreset>()
            .add_systems(OnEnter(Phase::CharacterCreation), setup_creation)
            .add_systems(
                Update,
                (button_visuals, button_actions)
                    .before(FlightSystems)
                    .run_if(in_state(Phase::CharacterCreation)),
            );
    }
}

pub const NORMAL_BUTTON: Color = Color::srgb(0.15, 0.15, 0.15);
pub const HOVERED_BUTTON: Color = Color::srgb(0.25, 0.25, 0.25);
pub const PRESSED_BUTTON: Color = Color::srgb(0.35, 0.35, 0.35);
const SELECTED_BORDER: Color = Color::srgb(1.0, 0.85, 0.2);
const IDLE_BORDER: Color = Color::srgba(1.0, 1.0, 1.0, 0.3);
const SWATCH_SIZE: f32 = 24.0;

#[derive(Resource, Default)]
struct SelectedPreset(CharacterPreset);

#[derive(Component, Clone, Copy)]
enum CreationButton {
    Preset(CharacterPreset),
    Start,
}

fn setup_creation(mut commands: Commands, progression: Res<ProgressionState>) {
    let name = &progression.player_name;

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(24.0),
                ..default()
            },
            DespawnOnExit(Phase::CharacterCreation),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(format!("Welcome aboard, {name}")),
                TextFont {
                    font_size: 42.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            parent.spawn((
                Text::new("Choose your explorer"),
                TextFont {
                    font_size: 22.0,
                    ..default()
                },
                TextColor(Color::srgba(0.9, 0.9, 0.9, 1.0)),
            ));

            parent
                .spawn(Node {
                    flex_direction: FlexDirection::Row,
                    column_gap: Val::Px(16.0),
                    ..default()
                })
                .with_children(|row| {
                    for preset in CharacterPreset::all() {
                        spawn_button(
                            row,
                            &preset.to_string(),
                            CreationButton::Preset(preset),
                            Some(preset),
                        );
                    }
                });

            spawn_button(parent, "Start", CreationButton::Start, None);
        });
}

/// Suit and visor preview shown on a preset button.
#[derive(Component)]
struct PresetSwatch(CharacterPreset);

/// A labelled button, optionally led by a swatch in the colours of `preset`.
pub fn spawn_button<M: Component>(
    parent: &mut ChildSpawnerCommands,
    label: &str,
    marker: M,
    preset: Option<CharacterPreset>,
) {
    parent
        .spawn((
            marker,
            Button,
            Node {
                width: Val::Px(200.0),
                height: Val::Px(50.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                column_gap: Val::Px(10.0),
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BorderColor::all(IDLE_BORDER),
            BackgroundColor(NORMAL_BUTTON),
        ))
        .with_children(|btn| {
            if let Some(preset) = preset {
                let style = preset.style();
                let size = SWATCH_SIZE * style.scale;
                btn.spawn((
                    PresetSwatch(preset),
                    Node {
                        width: Val::Px(size),
                        height: Val::Px(size),
                        justify_content: JustifyContent::Center,
                        padding: UiRect::top(Val::Px(size * 0.2)),
                        ..default()
                    },
                    BackgroundColor(style.suit),
                ))
                .with_child((
                    Node {
                        width: Val::Px(size * 0.6),
                        height: Val::Px(size * 0.25),
                        ..default()
                    },
                    BackgroundColor(style.visor),
                ));
            }
            btn.spawn((
                Text::new(label),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

fn button_visuals(
    selected: Res<SelectedPreset>,
    mut query: Query<(
        &Interaction,
        &CreationButton,
        &mut BackgroundColor,
        &mut BorderColor,
    )>,
) {
    for (interaction, button, mut bg, mut border) in &mut query {
        let chosen = matches!(button, CreationButton::Preset(p) if *p == selected.0);
        *bg = match *interaction {
            Interaction::Pressed => PRESSED_BUTTON.into(),
            Interaction::Hovered => HOVERED_BUTTON.into(),
            Interaction::None => NORMAL_BUTTON.into(),
        };
        *border = if chosen {
            BorderColor::all(SELECTED_BORDER)
        } else if *interaction == Interaction::None {
            BorderColor::all(IDLE_BORDER)
        } else {
            BorderColor::all(Color::WHITE)
        };
    }
}

fn button_actions(
    query: Query<(&Interaction, &CreationButton), Changed<Interaction>>,
    mut selected: ResMut<SelectedPreset>,
    mut progression: ResMut<ProgressionState>,
) {
    for (interaction, button) in &query {
        if *interaction != Interaction::Pressed {
            continue;
        }
        match *button {
            CreationButton::Preset(preset) => {
                debug!("selected preset {preset}");
                selected.0 = preset;
            }
            CreationButton::Start => match progression.start_game(selected.0) {
                Ok(next) => {
                    info!("{} starts as {}", next.player_name, next.preset);
                    *progression = next;
                }
                Err(err) => warn!("start ignored: {err}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_button_commits_selected_preset() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, bevy::state::app::StatesPlugin))
            .init_state::<Phase>()
            .add_plugins(CreationPlugin)
            .insert_resource(ProgressionState::new("Ada"))
            .insert_resource(SelectedPreset(CharacterPreset::Designer));
        app.world_mut()
            .spawn((CreationButton::Start, Interaction::Pressed));

        app.update();

        let progression = app.world().resource::<ProgressionState>();
        assert_eq!(progression.phase, Phase::Trivia);
        assert_eq!(progression.preset, CharacterPreset::Designer);
    }

    #[test]
    fn preset_buttons_preview_their_suit() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, bevy::state::app::StatesPlugin))
            .init_state::<Phase>()
            .add_plugins(CreationPlugin)
            .insert_resource(ProgressionState::new("Ada"));
        app.update();

        let mut swatches = app
            .world_mut()
            .query::<(&PresetSwatch, &BackgroundColor)>();
        let mut seen = 0;
        for (swatch, background) in swatches.iter(app.world()) {
            assert_eq!(background.0, swatch.0.style().suit);
            seen += 1;
        }
        assert_eq!(seen, CharacterPreset::all().count());
    }
}
