pub mod types;
pub mod directory;
pub mod decision;
pub mod tie_break;
pub mod matcher;
pub mod builder;

pub use types::{Group, MeetingSlot, Player, Schedule};
pub use directory::{PlayerDirectory, PlayerInput, RawCities};
pub use decision::{DecisionSource, FirstCandidate, RandomCandidate, ScriptedDecisions};
pub use tie_break::{FirstTied, RandomTieBreak, TieBreaker};
pub use matcher::RoundMatcher;
pub use builder::{check_partition, plan_meetings, MeetingPlan, ScheduleBuilder};
