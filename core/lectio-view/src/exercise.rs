use std::collections::BTreeMap;
use std::fmt;

use lectio_protocol::{AnswerRecord, Exercise, ExerciseId, OptionMarks};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExerciseError {
    #[error("Select an answer first!")]
    NoSelection,
    #[error("Exercise {0} is already checked")]
    Locked(ExerciseId),
    #[error("Exercise {0} does not exist")]
    NoSuchExercise(ExerciseId),
    #[error("Option {option} does not exist in exercise {exercise}")]
    NoSuchOption { exercise: ExerciseId, option: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Correct,
    Incorrect { correct: usize },
}

impl Verdict {
    pub fn is_correct(self) -> bool {
        self == Verdict::Correct
    }
}

/// Stateless evaluation of one answer.
pub fn check_answer(selected: usize, correct: usize) -> Verdict {
    if selected == correct {
        Verdict::Correct
    } else {
        Verdict::Incorrect { correct }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseState {
    correct: usize,
    selected: Option<usize>,
    marks: Vec<OptionMarks>,
    verdict: Option<Verdict>,
}

impl ExerciseState {
    fn new(exercise: &Exercise) -> Self {
        Self {
            correct: exercise.correct_index(),
            selected: None,
            marks: vec![OptionMarks::empty(); exercise.options.len()],
            verdict: None,
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn marks(&self) -> &[OptionMarks] {
        &self.marks
    }

    pub fn verdict(&self) -> Option<Verdict> {
        self.verdict
    }

    /// Checked exercises accept no further selection until reset.
    pub fn is_locked(&self) -> bool {
        self.verdict.is_some()
    }
}

/// Outcome of a stored check, as persisted in progress records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredResult {
    pub selected: usize,
    pub correct: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Score {
    pub correct: usize,
    pub checked: usize,
    pub total: usize,
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.correct, self.total)
    }
}

/// Selection and check state for every exercise of a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseBoard {
    states: Vec<ExerciseState>,
}

impl ExerciseBoard {
    pub fn new(exercises: &[Exercise]) -> Self {
        Self {
            states: exercises.iter().map(ExerciseState::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn state(&self, id: ExerciseId) -> Option<&ExerciseState> {
        self.states.get(id.0 as usize)
    }

    fn state_mut(&mut self, id: ExerciseId) -> Result<&mut ExerciseState, ExerciseError> {
        self.states
            .get_mut(id.0 as usize)
            .ok_or(ExerciseError::NoSuchExercise(id))
    }

    /// Selecting an option clears the previous selection.
    pub fn select(&mut self, id: ExerciseId, option: usize) -> Result<(), ExerciseError> {
        let state = self.state_mut(id)?;
        if state.is_locked() {
            return Err(ExerciseError::Locked(id));
        }
        if option >= state.marks.len() {
            return Err(ExerciseError::NoSuchOption { exercise: id, option });
        }
        for mark in state.marks.iter_mut() {
            mark.remove(OptionMarks::SELECTED);
        }
        state.marks[option].insert(OptionMarks::SELECTED);
        state.selected = Some(option);
        Ok(())
    }

    /// Evaluates the selection and locks the exercise.
    pub fn check(&mut self, id: ExerciseId) -> Result<Verdict, ExerciseError> {
        let state = self.state_mut(id)?;
        if state.is_locked() {
            return Err(ExerciseError::Locked(id));
        }
        let selected = state.selected.ok_or(ExerciseError::NoSelection)?;

        let verdict = check_answer(selected, state.correct);
        match verdict {
            Verdict::Correct => state.marks[selected].insert(OptionMarks::CORRECT),
            Verdict::Incorrect { correct } => {
                state.marks[selected].insert(OptionMarks::INCORRECT);
                // A correct index outside the options has nothing to reveal
                if let Some(mark) = state.marks.get_mut(correct) {
                    mark.insert(OptionMarks::CORRECT);
                }
            }
        }
        state.verdict = Some(verdict);
        debug!(exercise = id.0, ?verdict, "exercise checked");
        Ok(verdict)
    }

    /// Explicit unlock: clears selection, marks and verdict.
    pub fn reset(&mut self, id: ExerciseId) -> Result<(), ExerciseError> {
        let state = self.state_mut(id)?;
        state.selected = None;
        state.verdict = None;
        for mark in state.marks.iter_mut() {
            *mark = OptionMarks::empty();
        }
        Ok(())
    }

    pub fn score(&self) -> Score {
        let checked = self.states.iter().filter(|s| s.is_locked()).count();
        let correct = self
            .states
            .iter()
            .filter(|s| s.verdict.is_some_and(Verdict::is_correct))
            .count();
        Score {
            correct,
            checked,
            total: self.states.len(),
        }
    }

    /// Checked exercises keyed by index, for progress persistence.
    pub fn results(&self) -> BTreeMap<String, StoredResult> {
        self.states
            .iter()
            .enumerate()
            .filter_map(|(i, s)| {
                let verdict = s.verdict?;
                let selected = s.selected?;
                Some((
                    i.to_string(),
                    StoredResult {
                        selected,
                        correct: verdict.is_correct(),
                    },
                ))
            })
            .collect()
    }

    /// Replays stored checks. Entries that no longer fit the unit are skipped.
    pub fn restore(&mut self, results: &BTreeMap<String, StoredResult>) {
        for (key, result) in results {
            let Ok(index) = key.parse::<u32>() else { continue };
            let id = ExerciseId(index);
            if self.select(id, result.selected).is_ok() {
                let _ = self.check(id);
            }
        }
    }

    pub fn answers(&self, exercises: &[Exercise]) -> Vec<AnswerRecord> {
        self.states
            .iter()
            .zip(exercises)
            .enumerate()
            .map(|(i, (state, exercise))| AnswerRecord {
                exercise: ExerciseId(i as u32),
                question: exercise.question.clone(),
                selected: state.selected.map(|s| s as u32),
                correct: state.verdict.is_some_and(Verdict::is_correct),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ten_twelve() -> Vec<Exercise> {
        vec![Exercise {
            question: "How many?".to_string(),
            options: vec!["Ten".to_string(), "Twelve".to_string()],
            correct: 1,
        }]
    }

    #[test]
    fn test_wrong_answer_reveals_correct_option() {
        let mut board = ExerciseBoard::new(&ten_twelve());
        let id = ExerciseId(0);
        board.select(id, 0).unwrap();

        assert_eq!(board.check(id), Ok(Verdict::Incorrect { correct: 1 }));
        let marks = board.state(id).unwrap().marks();
        assert!(marks[0].contains(OptionMarks::SELECTED | OptionMarks::INCORRECT));
        assert!(marks[1].contains(OptionMarks::CORRECT));
    }

    #[test]
    fn test_right_answer() {
        let mut board = ExerciseBoard::new(&ten_twelve());
        let id = ExerciseId(0);
        board.select(id, 1).unwrap();

        assert_eq!(board.check(id), Ok(Verdict::Correct));
        assert_eq!(board.score().to_string(), "1/1");
    }

    #[test]
    fn test_selection_replaces_previous_one() {
        let mut board = ExerciseBoard::new(&ten_twelve());
        let id = ExerciseId(0);
        board.select(id, 0).unwrap();
        board.select(id, 1).unwrap();

        let marks = board.state(id).unwrap().marks();
        assert!(!marks[0].contains(OptionMarks::SELECTED));
        assert!(marks[1].contains(OptionMarks::SELECTED));
    }

    #[test]
    fn test_check_without_selection_changes_nothing() {
        let mut board = ExerciseBoard::new(&ten_twelve());
        let before = board.clone();

        assert_eq!(board.check(ExerciseId(0)), Err(ExerciseError::NoSelection));
        assert_eq!(board, before);
    }

    #[test]
    fn test_locked_until_reset() {
        let mut board = ExerciseBoard::new(&ten_twelve());
        let id = ExerciseId(0);
        board.select(id, 0).unwrap();
        board.check(id).unwrap();

        assert_eq!(board.select(id, 1), Err(ExerciseError::Locked(id)));
        assert_eq!(board.check(id), Err(ExerciseError::Locked(id)));

        board.reset(id).unwrap();
        board.select(id, 1).unwrap();
        assert_eq!(board.check(id), Ok(Verdict::Correct));
    }

    #[test]
    fn test_bad_indices_are_rejected() {
        let mut board = ExerciseBoard::new(&ten_twelve());
        assert!(matches!(board.select(ExerciseId(0), 2), Err(ExerciseError::NoSuchOption { .. })));
        assert_eq!(board.select(ExerciseId(3), 0), Err(ExerciseError::NoSuchExercise(ExerciseId(3))));
    }

    #[test]
    fn test_results_restore_into_a_fresh_board() {
        let exercises = ten_twelve();
        let mut board = ExerciseBoard::new(&exercises);
        board.select(ExerciseId(0), 0).unwrap();
        board.check(ExerciseId(0)).unwrap();

        let mut fresh = ExerciseBoard::new(&exercises);
        fresh.restore(&board.results());
        assert_eq!(fresh, board);

        let answers = fresh.answers(&exercises);
        assert_eq!(answers[0].selected, Some(0));
        assert!(!answers[0].correct);
    }
}
