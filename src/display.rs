use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use chrono::Local;

use crate::schedule::{Group, MeetingSlot, Player, PlayerDirectory, Schedule};

/// Formats a group as `[Anna, Bob]`
pub fn format_group(group: &Group) -> String {
    format!("[{}]", group.players.join(", "))
}

/// Writes each player's choices and number of cities
pub fn write_players<W: Write>(out: &mut W, players: &[Player]) -> io::Result<()> {
    for player in players {
        writeln!(out, "{}:", player.name)?;
        writeln!(out, "\tchoices = [{}]", player.choices.join(", "))?;
        writeln!(out, "\tnumber of cities: {}", player.num_cities)?;
    }
    Ok(())
}

/// Prints the player directory to stdout
pub fn print_player_directory(directory: &PlayerDirectory) -> io::Result<()> {
    let stdout = io::stdout();
    write_players(&mut stdout.lock(), directory.players())
}

/// Prints the players left in a slot's escape group, as they were at the time
pub fn print_stranded(slot_number: usize, slot: &MeetingSlot) -> io::Result<()> {
    if slot.stranded.is_empty() {
        return Ok(());
    }
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "Meeting Slot {}: no one else wanted to meet. Remaining choices:", slot_number)?;
    write_players(&mut out, &slot.stranded)
}

/// Writes every meeting slot with its numbered groups
pub fn write_schedule<W: Write>(out: &mut W, schedule: &Schedule) -> io::Result<()> {
    for (i, slot) in schedule.iter().enumerate() {
        writeln!(out, "Meeting Slot {}:", i + 1)?;
        for (j, group) in slot.groups.iter().enumerate() {
            if group.escape {
                writeln!(out, "\tGroup {}: {} (no one else wanted to meet)", j + 1, format_group(group))?;
            } else {
                writeln!(out, "\tGroup {}: {}", j + 1, format_group(group))?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Prints the meeting schedule in a readable format
pub fn print_schedule(schedule: &Schedule) -> io::Result<()> {
    println!("\n\nMeeting schedule:\n");
    let stdout = io::stdout();
    write_schedule(&mut stdout.lock(), schedule)
}

/// Writes the schedule to a text file with a generated-at header
pub fn write_schedule_to_file<P: AsRef<Path>>(schedule: &Schedule, filename: P) -> io::Result<()> {
    let mut file = File::create(filename)?;

    writeln!(file, "** Meeting schedule **")?;
    writeln!(file, "Generated {}", Local::now().format("%Y-%m-%d %H:%M"))?;
    writeln!(file)?;
    write_schedule(&mut file, schedule)?;

    Ok(())
}
