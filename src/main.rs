// Main
mod creation;
mod flight;
mod launch;
mod locations;
mod map2d;
mod pointer;
mod presets;
mod progression;
mod quiz;
mod sidebar;
mod starfield;
mod surface;
mod transition;
mod trivia;
mod victory;
mod world3d;

use bevy::prelude::*;
use creation::CreationPlugin;
use flight::FlightPlugin;
use launch::LaunchPlugin;
use map2d::MapPlugin;
use pointer::PointerPlugin;
use progression::ProgressionPlugin;
use quiz::QuizPlugin;
use sidebar::SidebarPlugin;
use surface::SurfacePlugin;
use transition::TransitionPlugin;
use trivia::TriviaPlugin;
use victory::VictoryPlugin;
use world3d::GlobePlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Wayfarer".into(),
                fit_canvas_to_parent: true,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(world3d::SKY_BLUE))
        .add_plugins((
            LaunchPlugin,
            ProgressionPlugin,
            TriviaPlugin,
            FlightPlugin,
            PointerPlugin,
            SurfacePlugin,
            MapPlugin,
            GlobePlugin,
            CreationPlugin,
            QuizPlugin,
            SidebarPlugin,
            VictoryPlugin,
            TransitionPlugin,
        ))
        .run();
}
