// Which render surface is drawing the route.
use bevy::prelude::*;

pub struct SurfacePlugin;

impl Plugin for SurfacePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<Surface>()
            .add_systems(Update, toggle_surface);
    }
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum Surface {
    /// Stylised 2D map.
    #[default]
    Map,
    /// Landmarks in 3D.
    Globe,
}

impl Surface {
    pub fn other(self) -> Self {
        match self {
            Surface::Map => Surface::Globe,
            Surface::Globe => Surface::Map,
        }
    }
}

fn toggle_surface(
    keyboard: Res<ButtonInput<KeyCode>>,
    surface: Res<State<Surface>>,
    mut next_surface: ResMut<NextState<Surface>>,
) {
    if keyboard.just_pressed(KeyCode::Tab) {
        let next = surface.other();
        debug!("switching surface to {next:?}");
        next_surface.set(next);
    }
}
