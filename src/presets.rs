// Avatar presets and the visual parameters each one maps to.
use bevy::prelude::*;
use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumIter, EnumCount)]
pub enum CharacterPreset {
    #[default]
    Explorer,
    Engineer,
    Designer,
    Analyst,
}

/// Static rendering parameters for one preset.
pub struct PresetStyle {
    pub suit: Color,
    pub visor: Color,
    pub flame: Color,
    /// Avatar size multiplier on both surfaces.
    pub scale: f32,
}

const STYLES: [PresetStyle; CharacterPreset::COUNT] = [
    PresetStyle {
        suit: Color::srgb(0.85, 0.35, 0.2),
        visor: Color::srgb(0.2, 0.6, 0.9),
        flame: Color::srgb(1.0, 0.6, 0.1),
        scale: 1.0,
    },
    PresetStyle {
        suit: Color::srgb(0.95, 0.75, 0.15),
        visor: Color::srgb(0.1, 0.1, 0.15),
        flame: Color::srgb(1.0, 0.45, 0.05),
        scale: 1.1,
    },
    PresetStyle {
        suit: Color::srgb(0.6, 0.3, 0.8),
        visor: Color::srgb(0.95, 0.95, 1.0),
        flame: Color::srgb(0.9, 0.4, 1.0),
        scale: 0.9,
    },
    PresetStyle {
        suit: Color::srgb(0.2, 0.7, 0.5),
        visor: Color::srgb(0.9, 0.8, 0.3),
        flame: Color::srgb(0.4, 0.9, 1.0),
        scale: 1.0,
    },
];

impl CharacterPreset {
    pub fn style(self) -> &'static PresetStyle {
        &STYLES[self as usize]
    }

    pub fn all() -> impl Iterator<Item = CharacterPreset> {
        CharacterPreset::iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_preset_has_a_style() {
        assert_eq!(CharacterPreset::all().count(), STYLES.len());
        for preset in CharacterPreset::all() {
            assert!(preset.style().scale > 0.0);
        }
    }
}
