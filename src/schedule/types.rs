use serde::{Deserialize, Serialize};

/// One player in the directory, with their still-unused mutual choices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub num_cities: u32,
    /// Preferred partners in the order they were entered
    pub choices: Vec<String>,
    /// Number of rounds in which this player picked a partner
    pub times_chosen: u32,
}

impl Player {
    pub fn new(name: impl Into<String>, num_cities: u32, choices: Vec<String>) -> Self {
        Self {
            name: name.into(),
            num_cities,
            choices,
            times_chosen: 0,
        }
    }

    /// Choices that are still present in `pool`, in choice order
    pub fn choices_within<'a>(&'a self, pool: &'a [String]) -> impl Iterator<Item = &'a String> + 'a {
        self.choices.iter().filter(move |choice| pool.contains(choice))
    }

    pub fn has_choice_within(&self, pool: &[String]) -> bool {
        self.choices_within(pool).next().is_some()
    }
}

/// Players meeting together in one slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub players: Vec<String>,
    /// Set when the group absorbed everyone left after pairing broke down
    #[serde(default)]
    pub escape: bool,
}

impl Group {
    pub fn pair(chooser: impl Into<String>, partner: impl Into<String>) -> Self {
        Self {
            players: vec![chooser.into(), partner.into()],
            escape: false,
        }
    }

    pub fn leftover(players: Vec<String>) -> Self {
        Self { players, escape: false }
    }

    pub fn escape(players: Vec<String>) -> Self {
        Self { players, escape: true }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.players.iter().any(|p| p == name)
    }
}

/// One meeting round: groups that together cover every player once
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingSlot {
    pub groups: Vec<Group>,
    /// Escape group members with their choices as they stood when the group formed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stranded: Vec<Player>,
}

impl MeetingSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_group(&mut self, group: Group) {
        self.groups.push(group);
    }

    /// Every player already placed in a group, in group order
    pub fn booked_players(&self) -> Vec<&str> {
        self.groups
            .iter()
            .flat_map(|g| g.players.iter().map(String::as_str))
            .collect()
    }

    pub fn is_booked(&self, name: &str) -> bool {
        self.groups.iter().any(|g| g.contains(name))
    }
}

/// The full schedule, one entry per meeting slot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub slots: Vec<MeetingSlot>,
}

impl Schedule {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MeetingSlot> {
        self.slots.iter()
    }

    /// Group membership as plain name lists, for serialization
    pub fn as_name_lists(&self) -> Vec<Vec<Vec<String>>> {
        self.slots
            .iter()
            .map(|slot| slot.groups.iter().map(|g| g.players.clone()).collect())
            .collect()
    }
}
