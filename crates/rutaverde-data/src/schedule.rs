//! Weekday expansion and estimated collection windows.
//!
//! The zone survey only carries a frequency pattern and a shift; exact
//! hours per day are not published, so windows derived here are flagged
//! as estimates.

use rutaverde_core::catalog::{normalize_locality, Frequency};
use rutaverde_core::models::{DayPeriod, Shift};
use serde::Serialize;

pub const WEEKDAYS: [&str; 7] = ["Lunes", "Martes", "Miércoles", "Jueves", "Viernes", "Sábado", "Domingo"];

/// Collection kind attached to every estimated window
pub const ORDINARY_COLLECTION: &str = "ordinarios";

fn weekday(abbreviation: &str) -> Option<&'static str> {
    let index = match normalize_locality(abbreviation).as_str() {
        "LUN" => 0,
        "MAR" => 1,
        "MIE" => 2,
        "JUE" => 3,
        "VIE" => 4,
        "SAB" => 5,
        "DOM" => 6,
        _ => return None,
    };
    Some(WEEKDAYS[index])
}

/// Expand a frequency label such as `Lun - Mié - Vie` into weekday names.
///
/// Matching ignores case and accents. `Diario` gives the whole week and
/// unrecognized parts are skipped.
pub fn frequency_days(label: &str) -> Vec<&'static str> {
    if normalize_locality(label) == "DIARIO" {
        return WEEKDAYS.to_vec();
    }
    label.split('-').filter_map(weekday).collect()
}

/// One day of collection service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionWindow {
    pub day: &'static str,
    pub start: &'static str,
    pub end: &'static str,
    #[serde(rename = "tipo")]
    pub kind: &'static str,
    pub estimated: bool,
}

/// Service hours assumed for a shift
pub fn estimated_hours(shift: Shift) -> (&'static str, &'static str) {
    match (shift.period, shift.night_extension) {
        (DayPeriod::Noche, _) => ("18:00", "22:00"),
        (_, true) => ("06:00", "22:00"),
        (_, false) => ("06:00", "14:00"),
    }
}

/// Estimated windows for every collection day of a zone.
///
/// An unavailable frequency yields no windows.
pub fn estimated_windows(frequency: Frequency, shift: Shift) -> Vec<CollectionWindow> {
    if frequency == Frequency::Unavailable {
        return Vec::new();
    }
    let (start, end) = estimated_hours(shift);
    frequency_days(frequency.label())
        .into_iter()
        .map(|day| CollectionWindow { day, start, end, kind: ORDINARY_COLLECTION, estimated: true })
        .collect()
}
