use tracing::{debug, info, warn};

use crate::error::ScheduleError;
use super::decision::DecisionSource;
use super::directory::PlayerDirectory;
use super::tie_break::TieBreaker;
use super::types::{Group, MeetingSlot};

/// Players in `pool` that still have a remaining choice inside `pool`
pub fn eligible_choosers(directory: &PlayerDirectory, pool: &[String]) -> Vec<String> {
    pool.iter()
        .filter(|name| {
            directory
                .get(name)
                .map_or(false, |player| player.has_choice_within(pool))
        })
        .cloned()
        .collect()
}

/// Narrows choosers to those most in need of a pick.
///
/// Fewest times chosen, intersected with fewest cities. When nobody is in
/// both sets the fewest-times-chosen set wins on its own.
pub fn neediest_choosers(directory: &PlayerDirectory, choosers: &[String]) -> Vec<String> {
    let players: Vec<_> = choosers
        .iter()
        .filter_map(|name| directory.get(name))
        .collect();

    let (Some(min_chosen), Some(min_cities)) = (
        players.iter().map(|p| p.times_chosen).min(),
        players.iter().map(|p| p.num_cities).min(),
    ) else {
        return Vec::new();
    };

    let fewest_chosen: Vec<String> = players
        .iter()
        .filter(|p| p.times_chosen == min_chosen)
        .map(|p| p.name.clone())
        .collect();

    let fewest_both: Vec<String> = players
        .iter()
        .filter(|p| p.times_chosen == min_chosen && p.num_cities == min_cities)
        .map(|p| p.name.clone())
        .collect();

    if fewest_both.is_empty() {
        fewest_chosen
    } else {
        fewest_both
    }
}

/// Pairs players for a single meeting slot
#[derive(Debug, Clone)]
pub struct RoundMatcher<D, T> {
    decisions: D,
    tie_break: T,
    max_group_size: usize,
}

impl<D: DecisionSource, T: TieBreaker> RoundMatcher<D, T> {
    pub fn new(decisions: D, tie_break: T, max_group_size: usize) -> Self {
        Self {
            decisions,
            tie_break,
            max_group_size,
        }
    }

    pub fn max_group_size(&self) -> usize {
        self.max_group_size
    }

    pub fn decisions(&self) -> &D {
        &self.decisions
    }

    pub fn into_parts(self) -> (D, T) {
        (self.decisions, self.tie_break)
    }

    /// Fills one meeting slot from `pool`.
    ///
    /// Pairs are formed until at most `max_group_size` players are left; those
    /// become the last group. If nobody left can pick a partner, everyone
    /// remaining is put in one escape group regardless of its size.
    pub fn match_round(&mut self, directory: &mut PlayerDirectory, pool: &[String]) -> MeetingSlot {
        let mut slot = MeetingSlot::new();
        let mut unbooked: Vec<String> = pool.to_vec();

        while unbooked.len() > self.max_group_size {
            match self.next_match(directory, &unbooked) {
                Some(group) => {
                    unbooked.retain(|name| !group.contains(name));
                    slot.add_group(group);
                }
                None => {
                    warn!(players = ?unbooked, "Guess no one wanted to meet, grouping everyone left");
                    slot.stranded = unbooked
                        .iter()
                        .filter_map(|name| directory.get(name))
                        .cloned()
                        .collect();
                    for player in &slot.stranded {
                        info!(player = %player.name, choices = ?player.choices, "Remaining choices");
                    }
                    slot.add_group(Group::escape(unbooked));
                    return slot;
                }
            }
        }

        if !unbooked.is_empty() {
            info!(players = ?unbooked, "Remaining players are grouped together");
            slot.add_group(Group::leftover(unbooked));
        }

        slot
    }

    /// Picks the neediest chooser and pairs them with one of their remaining
    /// choices. `None` when no one in `pool` can make a choice.
    pub fn next_match(&mut self, directory: &mut PlayerDirectory, pool: &[String]) -> Option<Group> {
        let eligible = eligible_choosers(directory, pool);
        if eligible.is_empty() {
            return None;
        }
        debug!(?eligible, "Players who can make a choice");

        let tied = if eligible.len() > 1 {
            neediest_choosers(directory, &eligible)
        } else {
            eligible
        };
        debug!(?tied, "Players most in need of a choice");

        let chooser = if tied.len() > 1 {
            let index = self.tie_break.pick(&tied);
            tied.get(index).or_else(|| tied.first())?.clone()
        } else {
            tied.into_iter().next()?
        };

        let player = directory.get_mut(&chooser)?;
        player.times_chosen += 1;
        let candidates: Vec<String> = player.choices_within(pool).cloned().collect();

        let partner = match candidates.len() {
            0 => return None,
            1 => {
                info!("{} chooses {} automatically", chooser, candidates[0]);
                candidates[0].clone()
            }
            _ => self.ask(&chooser, &candidates),
        };

        directory.consume_pair(&chooser, &partner);
        Some(Group::pair(chooser, partner))
    }

    /// Asks the decision source until it names one of `candidates`
    fn ask(&mut self, chooser: &str, candidates: &[String]) -> String {
        loop {
            let answer = self.decisions.choose(chooser, candidates);
            if candidates.contains(&answer) {
                info!("{} chooses {}", chooser, answer);
                return answer;
            }

            let error = ScheduleError::InvalidChoice {
                chooser: chooser.to_string(),
                answer,
                candidates: candidates.to_vec(),
            };
            warn!(%error, "Choice rejected, asking again");
            self.decisions.rejected(&error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::decision::{FirstCandidate, ScriptedDecisions};
    use crate::schedule::tie_break::FirstTied;
    use crate::schedule::types::Player;

    fn player(name: &str, num_cities: u32, choices: &[&str]) -> Player {
        Player::new(name, num_cities, choices.iter().map(|c| c.to_string()).collect())
    }

    fn names(directory: &PlayerDirectory) -> Vec<String> {
        directory.names()
    }

    fn matcher() -> RoundMatcher<FirstCandidate, FirstTied> {
        RoundMatcher::new(FirstCandidate, FirstTied, 3)
    }

    #[test]
    fn test_player_without_choices_is_never_eligible() {
        let directory = PlayerDirectory::from_players(vec![
            player("A", 0, &["B"]),
            player("B", 0, &["A"]),
            player("C", 0, &[]),
        ]);
        assert_eq!(eligible_choosers(&directory, &names(&directory)), vec!["A", "B"]);
    }

    #[test]
    fn test_choices_outside_pool_do_not_count() {
        let directory = PlayerDirectory::from_players(vec![
            player("A", 0, &["B"]),
            player("B", 0, &["A"]),
            player("C", 0, &["D"]),
            player("D", 0, &["C"]),
        ]);
        let pool = vec!["A".to_string(), "C".to_string()];
        assert!(eligible_choosers(&directory, &pool).is_empty());
    }

    #[test]
    fn test_fewer_times_chosen_wins_over_cities() {
        let mut directory = PlayerDirectory::from_players(vec![
            player("A", 0, &["B"]),
            player("B", 9, &["A"]),
        ]);
        directory.get_mut("A").unwrap().times_chosen = 1;
        let eligible = names(&directory);
        assert_eq!(neediest_choosers(&directory, &eligible), vec!["B"]);
    }

    #[test]
    fn test_fewest_cities_breaks_tie() {
        let directory = PlayerDirectory::from_players(vec![
            player("A", 4, &["B"]),
            player("B", 2, &["A", "C"]),
            player("C", 2, &["B"]),
        ]);
        let eligible = names(&directory);
        assert_eq!(neediest_choosers(&directory, &eligible), vec!["B", "C"]);
    }

    #[test]
    fn test_disjoint_need_sets_fall_back_to_times_chosen() {
        let mut directory = PlayerDirectory::from_players(vec![
            player("A", 5, &["C"]),
            player("B", 3, &["C"]),
            player("C", 1, &["A", "B"]),
        ]);
        directory.get_mut("C").unwrap().times_chosen = 1;
        let eligible = names(&directory);
        assert_eq!(neediest_choosers(&directory, &eligible), vec!["A", "B"]);
    }

    #[test]
    fn test_next_match_consumes_choices_and_counts_chooser() {
        let mut directory = PlayerDirectory::from_players(vec![
            player("A", 0, &["B"]),
            player("B", 1, &["A"]),
            player("C", 1, &[]),
            player("D", 1, &[]),
        ]);
        let pool = names(&directory);

        let group = matcher().next_match(&mut directory, &pool).unwrap();

        assert_eq!(group, Group::pair("A", "B"));
        assert_eq!(directory.get("A").unwrap().times_chosen, 1);
        assert_eq!(directory.get("B").unwrap().times_chosen, 0);
        assert!(directory.get("A").unwrap().choices.is_empty());
        assert!(directory.get("B").unwrap().choices.is_empty());
    }

    #[test]
    fn test_invalid_answers_are_rejected_until_valid() {
        let mut directory = PlayerDirectory::from_players(vec![
            player("A", 0, &["B", "C"]),
            player("B", 5, &["A"]),
            player("C", 5, &["A"]),
            player("D", 5, &[]),
        ]);
        let pool = names(&directory);
        let mut script = ScriptedDecisions::new(["D", "Zed", "C"]);

        let group = RoundMatcher::new(&mut script, FirstTied, 3)
            .next_match(&mut directory, &pool)
            .unwrap();

        assert_eq!(group, Group::pair("A", "C"));
        assert_eq!(script.rejections().len(), 2);
        assert!(matches!(
            &script.rejections()[0],
            ScheduleError::InvalidChoice { answer, .. } if answer == "D"
        ));
        assert_eq!(directory.get("A").unwrap().choices, vec!["B"]);
    }

    #[test]
    fn test_empty_pool_gives_empty_round() {
        let mut directory = PlayerDirectory::default();
        let slot = matcher().match_round(&mut directory, &[]);
        assert!(slot.groups.is_empty());
    }

    #[test]
    fn test_single_player_is_a_leftover_group() {
        let mut directory = PlayerDirectory::from_players(vec![player("A", 0, &[])]);
        let pool = names(&directory);
        let slot = matcher().match_round(&mut directory, &pool);
        assert_eq!(slot.groups, vec![Group::leftover(vec!["A".to_string()])]);
    }

    #[test]
    fn test_no_choices_left_forms_escape_group() {
        let mut directory = PlayerDirectory::from_players(vec![
            player("A", 0, &[]),
            player("B", 0, &[]),
            player("C", 0, &[]),
            player("D", 0, &[]),
            player("E", 0, &[]),
        ]);
        let pool = names(&directory);
        let slot = matcher().match_round(&mut directory, &pool);

        assert_eq!(slot.groups.len(), 1);
        assert!(slot.groups[0].escape);
        assert_eq!(slot.groups[0].len(), 5);
        assert_eq!(slot.stranded.len(), 5);
    }

    #[test]
    fn test_escape_records_choices_outside_pool() {
        let mut directory = PlayerDirectory::from_players(vec![
            player("A", 0, &["B"]),
            player("B", 0, &["A", "C"]),
            player("C", 0, &["B"]),
            player("D", 0, &[]),
            player("E", 0, &[]),
            player("F", 0, &[]),
        ]);
        let pool = names(&directory);
        let slot = matcher().match_round(&mut directory, &pool);

        assert_eq!(slot.groups[0], Group::pair("A", "B"));
        assert!(slot.groups[1].escape);
        let stranded: Vec<&str> = slot.stranded.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(stranded, vec!["C", "D", "E", "F"]);
        assert_eq!(slot.stranded[0].choices, vec!["B"]);
    }

    #[test]
    fn test_round_pairs_until_group_size_reached() {
        let mut directory = PlayerDirectory::from_players(vec![
            player("A", 0, &["B"]),
            player("B", 0, &["A"]),
            player("C", 0, &["D"]),
            player("D", 0, &["C"]),
            player("E", 0, &["F"]),
            player("F", 0, &["E"]),
            player("G", 0, &[]),
        ]);
        let pool = names(&directory);
        let slot = matcher().match_round(&mut directory, &pool);

        assert_eq!(
            slot.groups,
            vec![
                Group::pair("A", "B"),
                Group::pair("C", "D"),
                Group::leftover(vec!["E".to_string(), "F".to_string(), "G".to_string()]),
            ]
        );
    }
}
