//! Player progression: phase, current stop and answered questions.
use std::collections::HashSet;

use bevy::prelude::*;
use thiserror::Error;

use crate::locations::LOCATION_COUNT;
use crate::presets::CharacterPreset;
use crate::trivia::{QuestionId, TriviaQuestion};

pub struct ProgressionPlugin;

impl Plugin for ProgressionPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<Phase>().add_systems(
            Update,
            sync_phase.run_if(resource_exists_and_changed::<ProgressionState>),
        );
    }
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum Phase {
    #[default]
    CharacterCreation,
    Trivia,
    Victory,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProgressionError {
    #[error("expected phase {expected:?}, but the game is in {actual:?}")]
    WrongPhase { expected: Phase, actual: Phase },

    #[error("question {0:?} was already answered")]
    AlreadyAnswered(QuestionId),
}

/// Committed game state. Never edited in place: every commit returns a new value.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ProgressionState {
    pub phase: Phase,
    pub player_name: String,
    pub current_location: usize,
    /// The stop the last commit moved away from. Equal to `current_location` before any move.
    pub previous_location: usize,
    pub preset: CharacterPreset,
    pub answered: HashSet<QuestionId>,
    pub is_transitioning: bool,
}

impl ProgressionState {
    pub fn new(player_name: impl Into<String>) -> Self {
        Self {
            phase: Phase::CharacterCreation,
            player_name: player_name.into(),
            current_location: 0,
            previous_location: 0,
            preset: CharacterPreset::default(),
            answered: HashSet::new(),
            is_transitioning: false,
        }
    }

    /// The `(from, to)` pair of the latest commit.
    pub fn leg(&self) -> (usize, usize) {
        (self.previous_location, self.current_location)
    }

    pub fn start_game(&self, preset: CharacterPreset) -> Result<Self, ProgressionError> {
        self.expect_phase(Phase::CharacterCreation)?;
        Ok(Self {
            phase: Phase::Trivia,
            current_location: 0,
            previous_location: 0,
            preset,
            is_transitioning: false,
            ..self.clone()
        })
    }

    /// Moves one stop forward. Reaching the final stop ends the game in the same commit.
    pub fn advance_to_next_location(&self) -> Result<Self, ProgressionError> {
        self.expect_phase(Phase::Trivia)?;

        let last = LOCATION_COUNT - 1;
        let next = self.current_location + 1;
        let (current_location, phase) = if next >= last {
            (last, Phase::Victory)
        } else {
            (next, Phase::Trivia)
        };
        let moved = current_location != self.current_location;

        Ok(Self {
            phase,
            current_location,
            previous_location: self.current_location,
            is_transitioning: self.is_transitioning || moved,
            ..self.clone()
        })
    }

    /// Records a correct answer and advances. The shell validates the answer first.
    pub fn answer_correctly(&self, question: &TriviaQuestion) -> Result<Self, ProgressionError> {
        self.expect_phase(Phase::Trivia)?;
        if self.answered.contains(&question.id) {
            return Err(ProgressionError::AlreadyAnswered(question.id));
        }

        let mut answered = self.answered.clone();
        answered.insert(question.id);
        Self {
            answered,
            ..self.clone()
        }
        .advance_to_next_location()
    }

    /// Clears the in-flight flag once the animator lands. Location fields are untouched.
    pub fn land(&self) -> Self {
        Self {
            is_transitioning: false,
            ..self.clone()
        }
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), ProgressionError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(ProgressionError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }
}

fn sync_phase(
    progression: Res<ProgressionState>,
    phase: Res<State<Phase>>,
    mut next_phase: ResMut<NextState<Phase>>,
) {
    if **phase != progression.phase {
        info!("phase {:?} -> {:?}", **phase, progression.phase);
        next_phase.set(progression.phase);
    }
}
