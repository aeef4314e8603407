// Roster files through to a finished schedule

use std::path::PathBuf;

use diplomacy_meetings::config::{MeetingSettings, RosterSettings};
use diplomacy_meetings::error::AppError;
use diplomacy_meetings::export::export_schedule_to_csv;
use diplomacy_meetings::parser::{load_roster_csv, load_roster_json, parse_roster_json};
use diplomacy_meetings::schedule::{plan_meetings, FirstCandidate, FirstTied, PlayerDirectory, RandomTieBreak};
use diplomacy_meetings::{PreferenceRule, ScheduleError};

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("diplomacy-{}-{}", std::process::id(), name));
    std::fs::write(&path, contents).unwrap();
    path
}

const SEVEN_PLAYERS: &str = r#"{
    "England": {"choices": ["France", "Germany"], "num_cities": 3},
    "France": {"choices": ["England", "Italy", "Germany"], "num_cities": 3},
    "Germany": {"choices": ["France", "Russia"], "num_cities": 3},
    "Italy": {"choices": ["Austria", "France"], "num_cities": 3},
    "Austria": {"choices": ["Italy", "Turkey"], "num_cities": 3},
    "Russia": {"choices": ["Turkey", "Germany"], "num_cities": 4},
    "Turkey": {"choices": ["Russia"], "num_cities": "3"}
}"#;

#[test]
fn test_json_file_to_schedule() {
    let path = temp_file("seven.json", SEVEN_PLAYERS);
    let inputs = load_roster_json(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let plan = plan_meetings(
        inputs,
        &RosterSettings::default(),
        &MeetingSettings::default(),
        FirstCandidate,
        RandomTieBreak::seeded(1),
    )
    .unwrap();

    assert_eq!(plan.narrowed.names()[0], "England");
    assert_eq!(plan.narrowed.get("England").unwrap().choices, vec!["France"]);
    assert_eq!(plan.narrowed.get("Turkey").unwrap().num_cities, 3);
    assert_eq!(plan.schedule.len(), 3);
    for slot in plan.schedule.iter() {
        assert_eq!(slot.booked_players().len(), 7);
    }
}

#[test]
fn test_json_with_wrong_player_count() {
    let inputs = parse_roster_json(
        r#"{"A": {"choices": [], "num_cities": 1}, "B": {"choices": [], "num_cities": 1}}"#,
    )
    .unwrap();
    let err = PlayerDirectory::build(inputs, &RosterSettings::default()).unwrap_err();
    assert_eq!(err, ScheduleError::InvalidParticipantCount { count: 2, min: 5, max: 7 });
    assert_eq!(err.to_string(), "must enter between 5 and 7 players, got 2");
}

#[test]
fn test_json_with_unknown_choice() {
    let text = SEVEN_PLAYERS.replace(r#"["Russia"]"#, r#"["Prussia"]"#);
    let inputs = parse_roster_json(&text).unwrap();
    let err = PlayerDirectory::build(inputs, &RosterSettings::default()).unwrap_err();
    assert_eq!(
        err,
        ScheduleError::InvalidPreference {
            player: "Turkey".to_string(),
            rule: PreferenceRule::UnknownPlayer("Prussia".to_string()),
        }
    );
}

#[test]
fn test_json_with_text_city_count() {
    let text = SEVEN_PLAYERS.replace(r#""num_cities": "3""#, r#""num_cities": "three""#);
    let inputs = parse_roster_json(&text).unwrap();
    let err = PlayerDirectory::build(inputs, &RosterSettings::default()).unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidResourceCount { ref player, .. } if player == "Turkey"));
}

#[test]
fn test_json_with_non_number_city_count() {
    for value in ["true", "null", "[3]"] {
        let text = SEVEN_PLAYERS.replace(r#""num_cities": "3""#, &format!(r#""num_cities": {}"#, value));
        let inputs = parse_roster_json(&text).unwrap();
        match PlayerDirectory::build(inputs, &RosterSettings::default()) {
            Err(ScheduleError::InvalidResourceCount { player, reason, .. }) => {
                assert_eq!(player, "Turkey");
                assert_eq!(reason, "integer not entered");
            }
            other => panic!("expected a city count error for {}, got {:?}", value, other),
        }
    }
}

#[test]
fn test_json_with_choices_not_a_list() {
    let text = SEVEN_PLAYERS.replace(r#"["Russia"]"#, r#""Russia""#);
    match parse_roster_json(&text) {
        Err(AppError::Schedule(ScheduleError::InvalidPreference { player, rule })) => {
            assert_eq!(player, "Turkey");
            assert_eq!(rule, PreferenceRule::NotAList);
        }
        other => panic!("expected a preference error, got {:?}", other),
    }
}

#[test]
fn test_missing_file_is_io_error() {
    let err = load_roster_json("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, AppError::Io(_)));
}

#[test]
fn test_csv_file_to_schedule_and_export() {
    let roster = temp_file(
        "roster.csv",
        "name,num_cities,choices\nAnna,2,Bob;Cara\nBob,3,Anna\nCara,1,Anna;Dan\nDan,4,Cara\nEve,5,\n",
    );
    let inputs = load_roster_csv(&roster).unwrap();
    std::fs::remove_file(&roster).ok();

    let plan = plan_meetings(
        inputs,
        &RosterSettings::default(),
        &MeetingSettings { count: 2, max_group_size: 3 },
        FirstCandidate,
        FirstTied,
    )
    .unwrap();

    // Cara has the fewest cities and picks first
    assert_eq!(plan.schedule.slots[0].groups[0].players, vec!["Cara", "Anna"]);

    let exported = std::env::temp_dir().join(format!("diplomacy-{}-export.csv", std::process::id()));
    export_schedule_to_csv(&plan.schedule, &exported).unwrap();
    let text = std::fs::read_to_string(&exported).unwrap();
    std::fs::remove_file(&exported).ok();

    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("slot,group,escape,players"));
    assert_eq!(lines.next(), Some("1,1,no,Cara;Anna"));
    assert_eq!(text.lines().filter(|l| l.starts_with("2,")).count(), plan.schedule.slots[1].groups.len());
}
