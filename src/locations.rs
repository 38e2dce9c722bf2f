// Fixed route of stops. The last entry is the terminal victory stop.
use bevy::prelude::*;

pub struct LocationDescriptor {
    pub id: &'static str,
    pub display_name: &'static str,
    /// Screen-space anchor on the 2D map, origin at the window centre.
    pub map_anchor: Vec2,
    /// World-space anchor of the landmark on the 3D globe surface.
    pub world_anchor: Vec3,
    /// Background sky colour, sRGB.
    pub sky: [f32; 3],
}

pub const LOCATIONS: [LocationDescriptor; 6] = [
    LocationDescriptor {
        id: "hq",
        display_name: "Headquarters",
        map_anchor: Vec2::new(-420.0, -120.0),
        world_anchor: Vec3::new(0.0, 0.0, 0.0),
        sky: [0.53, 0.81, 0.92],
    },
    LocationDescriptor {
        id: "harbour",
        display_name: "Harbour Office",
        map_anchor: Vec2::new(-250.0, 40.0),
        world_anchor: Vec3::new(-30.0, 0.0, -40.0),
        sky: [0.98, 0.72, 0.45],
    },
    LocationDescriptor {
        id: "foundry",
        display_name: "Foundry Lab",
        map_anchor: Vec2::new(-70.0, -60.0),
        world_anchor: Vec3::new(25.0, 0.0, -85.0),
        sky: [0.62, 0.55, 0.85],
    },
    LocationDescriptor {
        id: "observatory",
        display_name: "Observatory",
        map_anchor: Vec2::new(110.0, 90.0),
        world_anchor: Vec3::new(-15.0, 0.0, -130.0),
        sky: [0.16, 0.18, 0.38],
    },
    LocationDescriptor {
        id: "campus",
        display_name: "North Campus",
        map_anchor: Vec2::new(280.0, -30.0),
        world_anchor: Vec3::new(35.0, 0.0, -175.0),
        sky: [0.45, 0.78, 0.62],
    },
    LocationDescriptor {
        id: "summit",
        display_name: "The Summit",
        map_anchor: Vec2::new(430.0, 130.0),
        world_anchor: Vec3::new(0.0, 8.0, -220.0),
        sky: [0.99, 0.86, 0.42],
    },
];

pub const LOCATION_COUNT: usize = LOCATIONS.len();

/// Number of stops that are reached by answering a question.
pub const WAYPOINT_COUNT: usize = LOCATION_COUNT - 1;

pub fn location(index: usize) -> &'static LocationDescriptor {
    &LOCATIONS[index.min(LOCATION_COUNT - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        for (i, a) in LOCATIONS.iter().enumerate() {
            for b in &LOCATIONS[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn out_of_range_index_clamps_to_final_stop() {
        assert_eq!(location(LOCATION_COUNT + 3).id, "summit");
    }
}
