// Pointer sampling for hover effects. Read once per frame, never feeds progression.
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

pub struct PointerPlugin;

impl Plugin for PointerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerSample>()
            .add_systems(PreUpdate, sample_pointer);
    }
}

/// Latest cursor position in window coordinates, if the cursor is over the window.
#[derive(Resource, Default, Debug, PartialEq)]
pub struct PointerSample(pub Option<Vec2>);

fn sample_pointer(
    mut sample: ResMut<PointerSample>,
    window: Query<&Window, With<PrimaryWindow>>,
) {
    let Ok(window) = window.single() else {
        return;
    };
    sample.set_if_neq(PointerSample(window.cursor_position()));
}

/// Index of the nearest anchor within `radius` of `point`.
pub fn hit_test(
    point: Vec2,
    anchors: impl IntoIterator<Item = Vec2>,
    radius: f32,
) -> Option<usize> {
    anchors
        .into_iter()
        .enumerate()
        .map(|(i, anchor)| (i, anchor.distance_squared(point)))
        .filter(|&(_, d2)| d2 <= radius * radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_nearest_anchor_in_range() {
        let anchors = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(100.0, 0.0)];
        assert_eq!(hit_test(Vec2::new(7.0, 0.0), anchors, 20.0), Some(1));
        assert_eq!(hit_test(Vec2::new(2.0, 1.0), anchors, 20.0), Some(0));
        assert_eq!(hit_test(Vec2::new(50.0, 50.0), anchors, 20.0), None);
    }
}
