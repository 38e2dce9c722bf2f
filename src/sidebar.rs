// Progress sidebar listing every stop on the route.

use bevy::prelude::*;

use crate::locations::LOCATIONS;
use crate::progression::{Phase, ProgressionState};

pub struct SidebarPlugin;

impl Plugin for SidebarPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnExit(Phase::CharacterCreation), setup_sidebar)
            .add_systems(
                Update,
                update_rows.run_if(resource_exists_and_changed::<ProgressionState>),
            );
    }
}

const VISITED_TEXT: Color = Color::srgb(0.55, 0.9, 0.6);
const CURRENT_TEXT: Color = Color::srgb(1.0, 0.85, 0.2);
const UPCOMING_TEXT: Color = Color::srgba(1.0, 1.0, 1.0, 0.6);

#[derive(Component)]
struct SidebarRow(usize);

#[derive(Debug, PartialEq, Eq)]
enum RowStatus {
    Visited,
    Current,
    Upcoming,
}

fn row_status(index: usize, current: usize) -> RowStatus {
    match index {
        i if i < current => RowStatus::Visited,
        i if i == current => RowStatus::Current,
        _ => RowStatus::Upcoming,
    }
}

fn row_label(index: usize, status: &RowStatus) -> String {
    let mark = match status {
        RowStatus::Visited => "[x]",
        RowStatus::Current => "[>]",
        RowStatus::Upcoming => "[ ]",
    };
    format!("{mark} {}", LOCATIONS[index].display_name)
}

fn row_colour(status: &RowStatus) -> Color {
    match status {
        RowStatus::Visited => VISITED_TEXT,
        RowStatus::Current => CURRENT_TEXT,
        RowStatus::Upcoming => UPCOMING_TEXT,
    }
}

fn setup_sidebar(mut commands: Commands, progression: Res<ProgressionState>) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(16.0),
                left: Val::Px(16.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(6.0),
                padding: UiRect::all(Val::Px(12.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.55)),
            DespawnOnEnter(Phase::CharacterCreation),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Route"),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            for index in 0..LOCATIONS.len() {
                let status = row_status(index, progression.current_location);
                parent.spawn((
                    SidebarRow(index),
                    Text::new(row_label(index, &status)),
                    TextFont {
                        font_size: 16.0,
                        ..default()
                    },
                    TextColor(row_colour(&status)),
                ));
            }
        });
}

fn update_rows(
    progression: Res<ProgressionState>,
    mut rows: Query<(&SidebarRow, &mut Text, &mut TextColor)>,
) {
    for (row, mut text, mut color) in &mut rows {
        let status = row_status(row.0, progression.current_location);
        color.0 = row_colour(&status);
        **text = row_label(row.0, &status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::CharacterPreset;
    use crate::progression::ProgressionPlugin;

    #[test]
    fn rows_split_around_current_stop() {
        assert_eq!(row_status(0, 2), RowStatus::Visited);
        assert_eq!(row_status(2, 2), RowStatus::Current);
        assert_eq!(row_status(4, 2), RowStatus::Upcoming);
        assert_eq!(row_label(0, &RowStatus::Visited), "[x] Headquarters");
    }

    #[test]
    fn first_stop_is_current_once_the_route_appears() {
        let mut app = App::new();
        app.add_plugins((
            MinimalPlugins,
            bevy::state::app::StatesPlugin,
            ProgressionPlugin,
            SidebarPlugin,
        ))
        .insert_resource(ProgressionState::new("Ada"));
        app.update();

        let started = app
            .world()
            .resource::<ProgressionState>()
            .start_game(CharacterPreset::Explorer)
            .unwrap();
        app.insert_resource(started);
        app.update();
        app.update();
        app.update();

        let mut rows = app.world_mut().query::<(&SidebarRow, &TextColor)>();
        let colours: Vec<(usize, Color)> = rows
            .iter(app.world())
            .map(|(row, colour)| (row.0, colour.0))
            .collect();
        assert_eq!(colours.len(), LOCATIONS.len());
        for (index, colour) in colours {
            let expected = if index == 0 { CURRENT_TEXT } else { UPCOMING_TEXT };
            assert_eq!(colour, expected, "row {index}");
        }
    }
}
