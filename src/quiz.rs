// Question panel: draws a trivia question, validates answers and commits progress.

use bevy::prelude::*;

use crate::creation::{HOVERED_BUTTON, NORMAL_BUTTON, PRESSED_BUTTON};
use crate::flight::{FlightSystems, Flying};
use crate::progression::{Phase, ProgressionError, ProgressionState};
use crate::trivia::{TriviaQuestion, random_question};

pub struct QuizPlugin;

impl Plugin for QuizPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<QuizState>()
            .add_systems(OnEnter(Phase::Trivia), setup_quiz)
            .add_systems(OnExit(Phase::Trivia), |mut quiz: ResMut<QuizState>| {
                *quiz = QuizState::default();
            })
            .add_systems(
                Update,
                (
                    (draw_question, answer_actions).chain().before(FlightSystems),
                    (show_question, shake_panel, answer_visuals).after(FlightSystems),
                )
                    .run_if(in_state(Phase::Trivia)),
            )
            .add_systems(
                Update,
                skip_flight
                    .before(FlightSystems)
                    .run_if(resource_exists::<ProgressionState>),
            );
    }
}

/// Wrong-answer feedback length in seconds.
const SHAKE_DURATION: f32 = 0.4;
const SHAKE_AMPLITUDE: f32 = 10.0;
const SHAKE_FREQUENCY: f32 = 50.0;
const PANEL_WIDTH: f32 = 640.0;

#[derive(Resource, Default)]
pub struct QuizState {
    pub question: Option<&'static TriviaQuestion>,
    pub exhausted: bool,
}

#[derive(Component)]
struct QuizPanel {
    shake: f32,
}

#[derive(Component)]
struct QuestionPrompt;

#[derive(Component, Clone, Copy)]
struct AnswerButton(usize);

#[derive(Component)]
struct AnswerLabel(usize);

#[derive(Debug, PartialEq)]
pub enum AnswerOutcome {
    Correct(ProgressionState),
    Wrong,
    Rejected(ProgressionError),
}

/// Validates `choice` against `question` and commits on success. Wrong answers change nothing.
pub fn submit_answer(
    progression: &ProgressionState,
    question: &TriviaQuestion,
    choice: usize,
) -> AnswerOutcome {
    if !question.is_correct(choice) {
        return AnswerOutcome::Wrong;
    }
    match progression.answer_correctly(question) {
        Ok(next) => AnswerOutcome::Correct(next),
        Err(err) => AnswerOutcome::Rejected(err),
    }
}

/// Horizontal panel offset with `remaining` seconds of shake left. Decays to zero.
pub fn shake_offset(remaining: f32) -> f32 {
    if remaining <= 0.0 {
        return 0.0;
    }
    let envelope = (remaining / SHAKE_DURATION).min(1.0);
    (remaining * SHAKE_FREQUENCY).sin() * SHAKE_AMPLITUDE * envelope
}

fn setup_quiz(mut commands: Commands) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::FlexEnd,
                align_items: AlignItems::Center,
                padding: UiRect::bottom(Val::Px(32.0)),
                position_type: PositionType::Absolute,
                ..default()
            },
            Pickable::IGNORE,
            DespawnOnExit(Phase::Trivia),
        ))
        .with_children(|root| {
            root.spawn((
                QuizPanel { shake: 0.0 },
                Node {
                    width: Val::Px(PANEL_WIDTH),
                    flex_direction: FlexDirection::Column,
                    align_items: AlignItems::Center,
                    row_gap: Val::Px(12.0),
                    padding: UiRect::all(Val::Px(20.0)),
                    left: Val::Px(0.0),
                    border: UiRect::all(Val::Px(2.0)),
                    ..default()
                },
                BorderColor::all(Color::srgba(1.0, 1.0, 1.0, 0.3)),
                BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.75)),
                Visibility::Hidden,
            ))
            .with_children(|panel| {
                panel.spawn((
                    QuestionPrompt,
                    Text::new(""),
                    TextFont {
                        font_size: 26.0,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                ));
                for index in 0..4 {
                    panel
                        .spawn((
                            AnswerButton(index),
                            Button,
                            Node {
                                width: Val::Percent(100.0),
                                height: Val::Px(44.0),
                                justify_content: JustifyContent::Center,
                                align_items: AlignItems::Center,
                                ..default()
                            },
                            BackgroundColor(NORMAL_BUTTON),
                        ))
                        .with_children(|btn| {
                            btn.spawn((
                                AnswerLabel(index),
                                Text::new(""),
                                TextFont {
                                    font_size: 20.0,
                                    ..default()
                                },
                                TextColor(Color::WHITE),
                            ));
                        });
                }
            });
        });
}

fn draw_question(
    mut quiz: ResMut<QuizState>,
    flying: Res<Flying>,
    progression: Res<ProgressionState>,
) {
    let idle = quiz.question.is_none() && !quiz.exhausted && !flying.0;
    if !idle || progression.phase != Phase::Trivia {
        return;
    }

    match random_question(&progression.answered, &mut rand::rng()) {
        Some(question) => {
            debug!("drew question {:?}", question.id);
            quiz.question = Some(question);
        }
        None => {
            warn!(
                "no unanswered questions left at stop {}",
                progression.current_location
            );
            quiz.exhausted = true;
        }
    }
}

fn answer_actions(
    query: Query<(&Interaction, &AnswerButton), Changed<Interaction>>,
    mut quiz: ResMut<QuizState>,
    mut flying: ResMut<Flying>,
    mut progression: ResMut<ProgressionState>,
    mut panel: Query<&mut QuizPanel>,
) {
    if flying.0 {
        return;
    }
    let Some(question) = quiz.question else {
        return;
    };

    for (interaction, button) in &query {
        if *interaction != Interaction::Pressed {
            continue;
        }
        match submit_answer(&progression, question, button.0) {
            AnswerOutcome::Correct(next) => {
                info!(
                    "correct answer to {:?}, flying to stop {}",
                    question.id, next.current_location
                );
                flying.0 = next.is_transitioning;
                *progression = next;
                quiz.question = None;
                return;
            }
            AnswerOutcome::Wrong => {
                debug!("wrong answer {} to {:?}", button.0, question.id);
                if let Ok(mut panel) = panel.single_mut() {
                    panel.shake = SHAKE_DURATION;
                }
            }
            AnswerOutcome::Rejected(err) => {
                warn!("answer not committed: {err}");
                quiz.question = None;
            }
        }
    }
}

/// Space cuts a flight short. The animator resets instead of resuming later.
fn skip_flight(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut flying: ResMut<Flying>,
    mut progression: ResMut<ProgressionState>,
) {
    if flying.0 && keyboard.just_pressed(KeyCode::Space) {
        info!("flight to stop {} skipped", progression.current_location);
        flying.0 = false;
        *progression = progression.land();
    }
}

fn show_question(
    quiz: Res<QuizState>,
    flying: Res<Flying>,
    mut panel: Query<&mut Visibility, With<QuizPanel>>,
    mut prompt: Query<&mut Text, (With<QuestionPrompt>, Without<AnswerLabel>)>,
    mut labels: Query<(&AnswerLabel, &mut Text), Without<QuestionPrompt>>,
) {
    if let Ok(mut visibility) = panel.single_mut() {
        *visibility = if quiz.question.is_some() && !flying.0 {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }

    if !quiz.is_changed() {
        return;
    }
    let Some(question) = quiz.question else {
        return;
    };
    if let Ok(mut text) = prompt.single_mut() {
        **text = question.prompt.to_string();
    }
    for (label, mut text) in &mut labels {
        **text = question.options[label.0].to_string();
    }
}

fn shake_panel(time: Res<Time>, mut panel: Query<(&mut QuizPanel, &mut Node)>) {
    let Ok((mut panel, mut node)) = panel.single_mut() else {
        return;
    };
    if panel.shake <= 0.0 {
        return;
    }
    panel.shake = (panel.shake - time.delta_secs()).max(0.0);
    node.left = Val::Px(shake_offset(panel.shake));
}

fn answer_visuals(
    mut query: Query<
        (&Interaction, &mut BackgroundColor),
        (Changed<Interaction>, With<AnswerButton>),
    >,
) {
    for (interaction, mut bg) in &mut query {
        *bg = match *interaction {
            Interaction::Pressed => PRESSED_BUTTON.into(),
            Interaction::Hovered => HOVERED_BUTTON.into(),
            Interaction::None => NORMAL_BUTTON.into(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::CharacterPreset;
    use crate::trivia::{CATALOG, QuestionId};

    fn in_trivia() -> ProgressionState {
        ProgressionState::new("Ada")
            .start_game(CharacterPreset::Engineer)
            .unwrap()
    }

    #[test]
    fn wrong_answer_leaves_state_alone() {
        let state = in_trivia();
        let question = &CATALOG[0];
        let wrong = (question.correct + 1) % 4;
        assert_eq!(submit_answer(&state, question, wrong), AnswerOutcome::Wrong);
    }

    #[test]
    fn correct_answer_commits_one_stop() {
        let state = in_trivia();
        let question = CATALOG.iter().find(|q| q.id == QuestionId(7)).unwrap();
        let outcome = submit_answer(&state, question, question.correct);
        let AnswerOutcome::Correct(next) = outcome else {
            panic!("expected a commit, got {outcome:?}");
        };
        assert_eq!(next.current_location, 1);
        assert!(next.answered.contains(&QuestionId(7)));
    }

    #[test]
    fn answering_outside_trivia_is_rejected() {
        let state = ProgressionState::new("Ada");
        let question = &CATALOG[4];
        assert!(matches!(
            submit_answer(&state, question, question.correct),
            AnswerOutcome::Rejected(ProgressionError::WrongPhase { .. })
        ));
    }

    #[test]
    fn shake_decays_to_rest() {
        assert_eq!(shake_offset(0.0), 0.0);
        assert_eq!(shake_offset(-1.0), 0.0);
        for i in 1..=40 {
            assert!(shake_offset(i as f32 * 0.01).abs() <= SHAKE_AMPLITUDE);
        }
    }

    fn quiz_app(state: ProgressionState) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, bevy::state::app::StatesPlugin))
            .init_state::<Phase>()
            .init_resource::<Flying>()
            .init_resource::<ButtonInput<KeyCode>>()
            .add_plugins(QuizPlugin)
            .insert_resource(state);
        app
    }

    #[test]
    fn draws_a_question_when_idle() {
        let mut app = quiz_app(in_trivia());
        app.world_mut()
            .resource_mut::<NextState<Phase>>()
            .set(Phase::Trivia);
        app.update();
        app.update();

        let quiz = app.world().resource::<QuizState>();
        assert!(quiz.question.is_some());
        assert!(!quiz.exhausted);
    }

    #[test]
    fn exhaustion_is_flagged_not_fatal() {
        let mut state = in_trivia();
        state.answered = CATALOG.iter().map(|q| q.id).collect();
        let mut app = quiz_app(state);
        app.world_mut()
            .resource_mut::<NextState<Phase>>()
            .set(Phase::Trivia);
        app.update();
        app.update();

        let quiz = app.world().resource::<QuizState>();
        assert!(quiz.question.is_none());
        assert!(quiz.exhausted);
    }

    #[test]
    fn space_cancels_flight() {
        let question = &CATALOG[1];
        let state = in_trivia().answer_correctly(question).unwrap();
        let mut app = quiz_app(state);
        app.insert_resource(Flying(true));
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::Space);
        app.update();

        assert!(!app.world().resource::<Flying>().0);
        let progression = app.world().resource::<ProgressionState>();
        assert!(!progression.is_transitioning);
        assert_eq!(progression.current_location, 1);
    }
}
