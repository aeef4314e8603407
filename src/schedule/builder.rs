use std::collections::HashSet;

use tracing::info;

use crate::config::{MeetingSettings, RosterSettings};
use crate::error::ScheduleError;
use super::decision::DecisionSource;
use super::directory::{PlayerDirectory, PlayerInput};
use super::matcher::RoundMatcher;
use super::tie_break::TieBreaker;
use super::types::{MeetingSlot, Schedule};

/// Runs the round matcher once per meeting slot over the whole roster
#[derive(Debug, Clone)]
pub struct ScheduleBuilder<D, T> {
    matcher: RoundMatcher<D, T>,
}

impl<D: DecisionSource, T: TieBreaker> ScheduleBuilder<D, T> {
    pub fn new(matcher: RoundMatcher<D, T>) -> Self {
        Self { matcher }
    }

    pub fn into_matcher(self) -> RoundMatcher<D, T> {
        self.matcher
    }

    /// Builds `num_meetings` slots. Every slot starts from the full roster;
    /// only consumed choices and times-chosen counts carry over between slots.
    pub fn build_schedule(
        &mut self,
        directory: &mut PlayerDirectory,
        num_meetings: usize,
    ) -> Result<Schedule, ScheduleError> {
        let roster = directory.names();
        let mut schedule = Schedule::default();

        for index in 0..num_meetings {
            let slot_number = index + 1;
            info!("Calculating meeting slot {}...", slot_number);

            let slot = self.matcher.match_round(directory, &roster);
            check_partition(slot_number, &slot, &roster)?;

            info!(groups = slot.groups.len(), "Meeting slot {} done", slot_number);
            schedule.slots.push(slot);
        }

        Ok(schedule)
    }
}

/// Result of a full planning run
#[derive(Debug, Clone)]
pub struct MeetingPlan {
    /// Directory right after narrowing, before any choice was consumed
    pub narrowed: PlayerDirectory,
    /// Directory after scheduling, with consumed choices and chooser counts
    pub remaining: PlayerDirectory,
    pub schedule: Schedule,
}

/// Validates the players, narrows their choices and builds the schedule
pub fn plan_meetings<D: DecisionSource, T: TieBreaker>(
    inputs: Vec<PlayerInput>,
    roster: &RosterSettings,
    meetings: &MeetingSettings,
    decisions: D,
    tie_break: T,
) -> Result<MeetingPlan, ScheduleError> {
    let mut directory = PlayerDirectory::build(inputs, roster)?;
    directory.narrow_to_mutual();
    let narrowed = directory.clone();

    let matcher = RoundMatcher::new(decisions, tie_break, meetings.max_group_size);
    let schedule = ScheduleBuilder::new(matcher).build_schedule(&mut directory, meetings.count)?;

    Ok(MeetingPlan {
        narrowed,
        remaining: directory,
        schedule,
    })
}

/// Every roster member must appear in exactly one group of the slot
pub fn check_partition(slot_number: usize, slot: &MeetingSlot, roster: &[String]) -> Result<(), ScheduleError> {
    let incomplete = |reason: String| ScheduleError::ScheduleIncomplete {
        round: slot_number,
        reason,
    };

    let mut seen = HashSet::new();
    for name in slot.booked_players() {
        if !roster.iter().any(|r| r == name) {
            return Err(incomplete(format!("{} is not on the roster", name)));
        }
        if !seen.insert(name) {
            return Err(incomplete(format!("{} is booked twice", name)));
        }
    }

    if let Some(missing) = roster.iter().find(|r| !seen.contains(r.as_str())) {
        return Err(incomplete(format!("{} is not booked", missing)));
    }

    if slot.groups.iter().any(|g| g.is_empty()) {
        return Err(incomplete("slot contains an empty group".to_string()));
    }

    Ok(())
}
