use super::feature::{Processed, RawProperties};
use crate::catalog::{Frequency, Operator};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Part of the day a collection round starts in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayPeriod {
    Madrugada,
    Manana,
    Tarde,
    Noche,
}

impl DayPeriod {
    /// Classify an `HHMM`-encoded start time.
    pub fn from_hhmm(start: u32) -> DayPeriod {
        match start {
            0..=599 => DayPeriod::Madrugada,
            600..=1199 => DayPeriod::Manana,
            1200..=1799 => DayPeriod::Tarde,
            _ => DayPeriod::Noche,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DayPeriod::Madrugada => "Madrugada",
            DayPeriod::Manana => "Mañana",
            DayPeriod::Tarde => "Tarde",
            DayPeriod::Noche => "Noche",
        }
    }
}

/// End times after this run into the night
pub const NIGHT_EXTENSION_AFTER: u32 = 2000;

/// Collection shift: the start period, optionally extended into the night
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shift {
    pub period: DayPeriod,
    pub night_extension: bool,
}

impl Shift {
    pub fn from_hours(start: u32, end: u32) -> Shift {
        Shift {
            period: DayPeriod::from_hhmm(start),
            night_extension: end > NIGHT_EXTENSION_AFTER,
        }
    }

    /// Whether any part of the round runs at night
    pub fn is_nocturnal(&self) -> bool {
        self.night_extension || self.period == DayPeriod::Noche
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.period.label())?;
        if self.night_extension {
            f.write_str("-Noche")?;
        }
        Ok(())
    }
}

impl FromStr for Shift {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (base, night_extension) = match s.strip_suffix("-Noche") {
            Some(base) => (base, true),
            None => (s, false),
        };
        let period = match base {
            "Madrugada" => DayPeriod::Madrugada,
            "Mañana" => DayPeriod::Manana,
            "Tarde" => DayPeriod::Tarde,
            "Noche" => DayPeriod::Noche,
            other => return Err(format!("unknown shift '{}'", other)),
        };
        Ok(Shift { period, night_extension })
    }
}

impl Serialize for Shift {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Shift {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?.parse().map_err(serde::de::Error::custom)
    }
}

/// Format an `HHMM`-encoded time as `H:MM`.
pub fn format_hhmm(value: u32) -> String {
    format!("{}:{:02}", value / 100, value % 100)
}

/// `H:MM - H:MM` label for a collection round
pub fn schedule_label(start: u32, end: u32) -> String {
    format!("{} - {}", format_hhmm(start), format_hhmm(end))
}

/// Canonical properties of a collection zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneProperties {
    pub localidad: String,
    pub localidad_norm: String,
    pub locality_id: String,
    pub frequency_id: String,
    pub operator_id: Operator,
    pub frequency: Frequency,
    pub shift: Shift,
    pub schedule_label: String,
    pub start_time: u32,
    pub end_time: u32,
    /// Position of the feature in its source document
    pub feature_index: usize,
    #[serde(rename = "_processed")]
    pub processed: Processed,
    /// Remaining source properties, passed through untouched
    #[serde(flatten)]
    pub source: RawProperties,
}

impl ZoneProperties {
    /// Keys written by preprocessing; never duplicated in `source`
    pub const CANONICAL_KEYS: [&'static str; 12] = [
        "localidad",
        "localidad_norm",
        "locality_id",
        "frequency_id",
        "operator_id",
        "frequency",
        "shift",
        "schedule_label",
        "start_time",
        "end_time",
        "feature_index",
        "_processed",
    ];
}

/// A zone feature's properties after preprocessing.
///
/// Features whose preprocessing failed are kept in place with their source
/// properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ZoneRecord {
    Processed(ZoneProperties),
    Unprocessed(RawProperties),
}

impl ZoneRecord {
    pub fn as_processed(&self) -> Option<&ZoneProperties> {
        match self {
            ZoneRecord::Processed(props) => Some(props),
            ZoneRecord::Unprocessed(_) => None,
        }
    }

    pub fn is_processed(&self) -> bool {
        matches!(self, ZoneRecord::Processed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_periods() {
        assert_eq!(Shift::from_hours(530, 1400).to_string(), "Madrugada");
        assert_eq!(Shift::from_hours(900, 1600).to_string(), "Mañana");
        assert_eq!(Shift::from_hours(1500, 1900).to_string(), "Tarde");
        assert_eq!(Shift::from_hours(1900, 2100).to_string(), "Noche-Noche");
        assert_eq!(Shift::from_hours(600, 2000).to_string(), "Mañana");
        assert_eq!(Shift::from_hours(600, 2001).to_string(), "Mañana-Noche");
    }

    #[test]
    fn test_shift_boundaries() {
        assert_eq!(DayPeriod::from_hhmm(559), DayPeriod::Madrugada);
        assert_eq!(DayPeriod::from_hhmm(600), DayPeriod::Manana);
        assert_eq!(DayPeriod::from_hhmm(1159), DayPeriod::Manana);
        assert_eq!(DayPeriod::from_hhmm(1200), DayPeriod::Tarde);
        assert_eq!(DayPeriod::from_hhmm(1800), DayPeriod::Noche);
    }

    #[test]
    fn test_shift_parse() {
        let shift: Shift = "Mañana-Noche".parse().unwrap();
        assert_eq!(shift, Shift { period: DayPeriod::Manana, night_extension: true });
        assert!(shift.is_nocturnal());
        assert!("Siesta".parse::<Shift>().is_err());
    }

    #[test]
    fn test_schedule_label() {
        assert_eq!(schedule_label(630, 1630), "6:30 - 16:30");
        assert_eq!(schedule_label(0, 2359), "0:00 - 23:59");
    }

    #[test]
    fn test_zone_record_untagged() {
        let raw: ZoneRecord = serde_json::from_value(serde_json::json!({"IDLOCALID_": "13"})).unwrap();
        assert!(!raw.is_processed());

        let processed: ZoneRecord = serde_json::from_value(serde_json::json!({
            "localidad": "TEUSAQUILLO",
            "localidad_norm": "TEUSAQUILLO",
            "locality_id": "13",
            "frequency_id": "1",
            "operator_id": "ciudad_limpia",
            "frequency": "Lun - Mié - Vie",
            "shift": "Mañana",
            "schedule_label": "6:00 - 16:00",
            "start_time": 600,
            "end_time": 1600,
            "feature_index": 0,
            "_processed": true,
            "IDLOCALID_": "13"
        }))
        .unwrap();
        let props = processed.as_processed().unwrap();
        assert_eq!(props.operator_id, Operator::CiudadLimpia);
        assert_eq!(props.source.get("IDLOCALID_").unwrap(), "13");
    }
}
