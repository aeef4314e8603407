use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;

use crate::error::Result;
use crate::schedule::Schedule;

/// Writes one CSV row per group: `slot,group,escape,players`
pub fn write_schedule_csv<W: Write>(writer: W, schedule: &Schedule) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(true).from_writer(writer);

    wtr.write_record(["slot", "group", "escape", "players"])?;
    for (i, slot) in schedule.iter().enumerate() {
        for (j, group) in slot.groups.iter().enumerate() {
            let slot_number = (i + 1).to_string();
            let group_number = (j + 1).to_string();
            let escape = if group.escape { "yes" } else { "no" };
            let players = group.players.join(";");
            wtr.write_record([slot_number.as_str(), group_number.as_str(), escape, players.as_str()])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

/// Exports the schedule to a CSV file, replacing any existing file
pub fn export_schedule_to_csv<P: AsRef<Path>>(schedule: &Schedule, csv_path: P) -> Result<()> {
    let file = std::fs::File::create(csv_path)?;
    write_schedule_csv(file, schedule)
}
