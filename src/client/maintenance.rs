//! Klereo server maintenance windows
//!
//! The Klereo backend goes down on a fixed weekly schedule. Requests issued
//! inside a window are skipped without touching the network.

use chrono::{DateTime, Datelike, TimeZone, Timelike};

/// Days of the week in Klereo's numbering (0 = Sunday).
pub const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// A daily downtime window, bounds encoded as `hour * 100 + minute` and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaintenanceWindow {
    pub from: u16,
    pub to: u16,
}

impl MaintenanceWindow {
    pub const fn new(from: u16, to: u16) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, hhmm: u16) -> bool {
        self.from <= hhmm && hhmm <= self.to
    }
}

/// One optional window per weekday, indexed Sunday-first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaintenanceSchedule {
    windows: [Option<MaintenanceWindow>; 7],
}

impl Default for MaintenanceSchedule {
    fn default() -> Self {
        Self::klereo()
    }
}

impl MaintenanceSchedule {
    /// The published Klereo schedule. Monday has no window.
    pub const fn klereo() -> Self {
        Self {
            windows: [
                Some(MaintenanceWindow::new(145, 445)),
                None,
                Some(MaintenanceWindow::new(130, 135)),
                Some(MaintenanceWindow::new(130, 135)),
                Some(MaintenanceWindow::new(130, 135)),
                Some(MaintenanceWindow::new(130, 135)),
                Some(MaintenanceWindow::new(130, 135)),
            ],
        }
    }

    /// Schedule with no windows at all.
    pub const fn none() -> Self {
        Self { windows: [None; 7] }
    }

    pub fn window_for(&self, day: u8) -> Option<MaintenanceWindow> {
        self.windows.get(usize::from(day)).copied().flatten()
    }

    /// Window covering `hhmm` on Sunday-based `day`, if any.
    pub fn active_window(&self, day: u8, hhmm: u16) -> Option<MaintenanceWindow> {
        self.window_for(day).filter(|w| w.contains(hhmm))
    }

    /// Window covering the given wall-clock time, if any.
    pub fn active_at<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> Option<MaintenanceWindow> {
        let day = sunday_based_day(at.weekday().num_days_from_monday());
        self.active_window(day, hhmm(at))
    }

    /// Iterate `(day, window)` pairs in Sunday-first order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, Option<MaintenanceWindow>)> + '_ {
        (0u8..).zip(self.windows.iter().copied())
    }
}

/// Reindex a Monday-based weekday (0 = Monday) to Klereo's Sunday-based one.
///
/// The window table is keyed on this exact mapping.
pub fn sunday_based_day(monday_based: u32) -> u8 {
    if monday_based == 6 {
        0
    } else {
        (monday_based + 1) as u8
    }
}

/// Encode a time of day as `hour * 100 + minute`, e.g. 14:05 -> 1405.
pub fn hhmm<T: Timelike>(at: &T) -> u16 {
    (at.hour() * 100 + at.minute()) as u16
}
