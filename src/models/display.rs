//! Display model implementations for table and JSON output
//!
//! Display models turn client and bridge types into CLI-friendly rows with
//! column names and serialization.

use chrono::{Datelike, DateTime, TimeZone};
use serde::Serialize;
use tabled::Tabled;

use crate::bridge::SyncReport;
use crate::bridge::mapping::entity_id;
use crate::client::Probe;
use crate::client::maintenance::{DAY_NAMES, MaintenanceSchedule, hhmm, sunday_based_day};

/// Pool display model for table/JSON output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct PoolDisplay {
    #[tabled(rename = "POOL ID")]
    pub id: String,

    #[tabled(rename = "NAME")]
    pub name: String,
}

impl From<(String, String)> for PoolDisplay {
    fn from((id, name): (String, String)) -> Self {
        Self { id, name }
    }
}

/// Probe display model for table/JSON output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct ProbeDisplay {
    #[tabled(rename = "ID")]
    pub logical_id: String,

    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "VALUE")]
    pub value: String,

    #[tabled(rename = "UNIT")]
    pub unit: String,

    /// Home Assistant entity the probe publishes to
    #[tabled(rename = "ENTITY")]
    pub entity_id: String,
}

impl ProbeDisplay {
    pub fn new(pool_id: &str, probe: &Probe) -> Self {
        let name = probe.name.clone().unwrap_or_default();
        let entity_id = if name.is_empty() {
            "--".to_string()
        } else {
            entity_id(pool_id, &name)
        };

        Self {
            logical_id: probe.logical_id.clone().unwrap_or_else(|| "--".to_string()),
            value: probe.value_display(),
            unit: probe.unit.clone().unwrap_or_default(),
            name: if name.is_empty() { "--".to_string() } else { name },
            entity_id,
        }
    }
}

/// One weekday of the maintenance schedule.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct MaintenanceDisplay {
    #[tabled(rename = "DAY")]
    pub day: String,

    /// Window as `HH:MM-HH:MM`, or `--` when the day has none
    #[tabled(rename = "WINDOW")]
    pub window: String,

    #[tabled(rename = "NOW")]
    #[serde(rename = "active_now")]
    pub active: String,
}

impl MaintenanceDisplay {
    /// Rows for the whole week, flagging the window covering `now`
    pub fn rows<Tz: TimeZone>(schedule: &MaintenanceSchedule, now: &DateTime<Tz>) -> Vec<Self> {
        let today = sunday_based_day(now.weekday().num_days_from_monday());
        let active = schedule.active_at(now);

        schedule
            .iter()
            .map(|(day, window)| {
                let is_active = day == today && active.is_some();
                Self {
                    day: DAY_NAMES[usize::from(day)].to_string(),
                    window: window
                        .map(|w| format!("{}-{}", clock_time(w.from), clock_time(w.to)))
                        .unwrap_or_else(|| "--".to_string()),
                    active: if is_active { "\u{2713}".to_string() } else { String::new() },
                }
            })
            .collect()
    }

    /// Current time in the same encoding the schedule uses
    pub fn now_label<Tz: TimeZone>(now: &DateTime<Tz>) -> String {
        let day = sunday_based_day(now.weekday().num_days_from_monday());
        format!("{} {}", DAY_NAMES[usize::from(day)], clock_time(hhmm(now)))
    }
}

fn clock_time(hhmm: u16) -> String {
    format!("{:02}:{:02}", hhmm / 100, hhmm % 100)
}

/// Sync report display model.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct SyncDisplay {
    #[tabled(rename = "POOLS")]
    pub pools_seen: usize,

    #[tabled(rename = "NEW DEVICES")]
    pub pools_registered: usize,

    #[tabled(rename = "NEW SENSORS")]
    pub sensors_registered: usize,

    #[tabled(rename = "STATES")]
    pub states_updated: usize,

    #[tabled(rename = "FAILURES")]
    pub failures: usize,
}

impl From<&SyncReport> for SyncDisplay {
    fn from(r: &SyncReport) -> Self {
        Self {
            pools_seen: r.pools_seen,
            pools_registered: r.pools_registered,
            sensors_registered: r.sensors_registered,
            states_updated: r.states_updated,
            failures: r.failures,
        }
    }
}
