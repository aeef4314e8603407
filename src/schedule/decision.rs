use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::ScheduleError;

/// Answers "who would you like to meet with?" when a chooser has several options.
///
/// Answers outside `candidates` are rejected by the matcher and the source is
/// asked again, so an implementation must eventually return a valid name.
pub trait DecisionSource {
    fn choose(&mut self, chooser: &str, candidates: &[String]) -> String;

    /// Called with an `InvalidChoice` error before the source is asked again
    fn rejected(&mut self, _error: &ScheduleError) {}
}

/// Takes the chooser's highest-ranked remaining choice
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstCandidate;

impl DecisionSource for FirstCandidate {
    fn choose(&mut self, _chooser: &str, candidates: &[String]) -> String {
        candidates[0].clone()
    }
}

/// Picks any candidate uniformly at random
#[derive(Debug, Clone)]
pub struct RandomCandidate<R: Rng = StdRng> {
    rng: R,
}

impl<R: Rng> RandomCandidate<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomCandidate<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> DecisionSource for RandomCandidate<R> {
    fn choose(&mut self, _chooser: &str, candidates: &[String]) -> String {
        candidates
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_default()
    }
}

/// Replays a fixed list of answers, then falls back to the first candidate
#[derive(Debug, Clone, Default)]
pub struct ScriptedDecisions {
    answers: VecDeque<String>,
    rejections: Vec<ScheduleError>,
}

impl ScriptedDecisions {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            rejections: Vec::new(),
        }
    }

    /// Answers that were never consumed
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    /// Every `InvalidChoice` raised against this script
    pub fn rejections(&self) -> &[ScheduleError] {
        &self.rejections
    }
}

impl DecisionSource for ScriptedDecisions {
    fn choose(&mut self, _chooser: &str, candidates: &[String]) -> String {
        self.answers
            .pop_front()
            .unwrap_or_else(|| candidates[0].clone())
    }

    fn rejected(&mut self, error: &ScheduleError) {
        self.rejections.push(error.clone());
    }
}

impl<T: DecisionSource + ?Sized> DecisionSource for &mut T {
    fn choose(&mut self, chooser: &str, candidates: &[String]) -> String {
        (**self).choose(chooser, candidates)
    }

    fn rejected(&mut self, error: &ScheduleError) {
        (**self).rejected(error)
    }
}

impl<T: DecisionSource + ?Sized> DecisionSource for Box<T> {
    fn choose(&mut self, chooser: &str, candidates: &[String]) -> String {
        (**self).choose(chooser, candidates)
    }

    fn rejected(&mut self, error: &ScheduleError) {
        (**self).rejected(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<String> {
        vec!["B".to_string(), "C".to_string()]
    }

    #[test]
    fn test_first_candidate() {
        assert_eq!(FirstCandidate.choose("A", &candidates()), "B");
    }

    #[test]
    fn test_random_candidate_is_a_candidate() {
        let mut source = RandomCandidate::seeded(3);
        for _ in 0..20 {
            assert!(candidates().contains(&source.choose("A", &candidates())));
        }
    }

    #[test]
    fn test_script_then_fallback() {
        let mut source = ScriptedDecisions::new(["C"]);
        assert_eq!(source.choose("A", &candidates()), "C");
        assert_eq!(source.remaining(), 0);
        assert_eq!(source.choose("A", &candidates()), "B");
    }
}
