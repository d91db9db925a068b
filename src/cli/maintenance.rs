//! Maintenance schedule command

use chrono::Local;
use colored::Colorize;

use crate::cli::OutputFormat;
use crate::client::MaintenanceSchedule;
use crate::error::Result;
use crate::models::MaintenanceDisplay;
use crate::output::Formattable;

/// Print the weekly schedule, marking the window in effect now
pub fn run(format: OutputFormat) -> Result<()> {
    let schedule = MaintenanceSchedule::klereo();
    let now = Local::now();
    let rows = MaintenanceDisplay::rows(&schedule, &now);

    rows.print(format)?;

    if format == OutputFormat::Table {
        let label = MaintenanceDisplay::now_label(&now);
        if schedule.active_at(&now).is_some() {
            println!("\n{} Maintenance ongoing ({})", "⚠".yellow(), label);
        } else {
            println!("\n{} No maintenance right now ({})", "✓".green(), label);
        }
    }

    Ok(())
}
