//! Onboarding trivia catalog and question selection.
use std::collections::HashSet;

use bevy::prelude::*;
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::locations::WAYPOINT_COUNT;

pub struct TriviaPlugin;

impl Plugin for TriviaPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, check_catalog);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuestionId(pub u32);

#[derive(Debug)]
pub struct TriviaQuestion {
    pub id: QuestionId,
    pub prompt: &'static str,
    pub options: [&'static str; 4],
    pub correct: usize,
}

impl TriviaQuestion {
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct
    }
}

macro_rules! question {
    ($id:literal, $prompt:literal, [$($opt:literal),* $(,)?], $correct:literal) => {
        TriviaQuestion {
            id: QuestionId($id),
            prompt: $prompt,
            options: [$($opt),*],
            correct: $correct,
        }
    };
}

pub const CATALOG: [TriviaQuestion; 20] = [
    question!(
        1,
        "Where do you find the team handbook?",
        ["The wiki", "A filing cabinet", "The breakroom", "Nowhere"],
        0
    ),
    question!(
        2,
        "Who should you ask first when you get stuck?",
        ["Nobody", "Your onboarding buddy", "The CEO", "A search engine"],
        1
    ),
    question!(
        3,
        "How often does the whole company meet?",
        ["Daily", "Yearly", "Monthly", "Never"],
        2
    ),
    question!(
        4,
        "What is the first thing to do on day one?",
        ["Ship to production", "Book a holiday", "Rewrite the build", "Set up your laptop"],
        3
    ),
    question!(
        5,
        "Where are security incidents reported?",
        ["The security channel", "Social media", "A sticky note", "Your diary"],
        0
    ),
    question!(
        6,
        "What does a code review check for?",
        ["Font choices", "Correctness and clarity", "Line count", "Author seniority"],
        1
    ),
    question!(
        7,
        "Which office opened first?",
        ["North Campus", "The Summit", "Headquarters", "Harbour Office"],
        2
    ),
    question!(
        8,
        "What should every pull request include?",
        ["Emoji", "A haiku", "A gif", "A description of the change"],
        3
    ),
    question!(
        9,
        "When is the best time to ask a question?",
        ["As soon as you have it", "Never", "After a month", "At midnight"],
        0
    ),
    question!(
        10,
        "Where are holidays requested?",
        ["By email to everyone", "The HR portal", "On the whiteboard", "By fax"],
        1
    ),
    question!(
        11,
        "What is the Foundry Lab known for?",
        ["Catering", "Parking", "Prototyping", "Archives"],
        2
    ),
    question!(
        12,
        "How should passwords be stored?",
        ["In a text file", "On a monitor", "In chat", "In the password manager"],
        3
    ),
    question!(
        13,
        "Who can suggest an improvement to a process?",
        ["Anyone", "Managers only", "Nobody", "Interns only"],
        0
    ),
    question!(
        14,
        "What is the purpose of a retrospective?",
        ["Assign blame", "Learn and improve", "Plan parties", "Skip work"],
        1
    ),
    question!(
        15,
        "Which stop has the big telescope?",
        ["Headquarters", "Foundry Lab", "Observatory", "Harbour Office"],
        2
    ),
    question!(
        16,
        "What do you do with visitor badges at the end of the day?",
        ["Keep them", "Throw them away", "Trade them", "Return them to reception"],
        3
    ),
    question!(
        17,
        "How are on-call rotations scheduled?",
        ["In the shared calendar", "By coin toss", "By seniority", "They are not"],
        0
    ),
    question!(
        18,
        "What does the Harbour Office mostly handle?",
        ["Payroll", "Shipping and logistics", "Legal", "Catering"],
        1
    ),
    question!(
        19,
        "Where can you find upcoming training sessions?",
        ["The lobby TV", "Nowhere", "The learning portal", "The car park"],
        2
    ),
    question!(
        20,
        "What is celebrated at The Summit?",
        ["Nothing", "Tax day", "Server outages", "Finishing onboarding"],
        3
    ),
];

/// Picks an unanswered question uniformly at random. `None` means the catalog is exhausted.
pub fn random_question(
    answered: &HashSet<QuestionId>,
    rng: &mut impl Rng,
) -> Option<&'static TriviaQuestion> {
    let eligible: Vec<&'static TriviaQuestion> = CATALOG
        .iter()
        .filter(|q| !answered.contains(&q.id))
        .collect();
    eligible.choose(rng).copied()
}

fn check_catalog() {
    if CATALOG.len() < WAYPOINT_COUNT {
        error!(
            "trivia catalog has {} questions but the route needs {}",
            CATALOG.len(),
            WAYPOINT_COUNT
        );
    }
}
