//! Fixed lookup tables for Bogotá: administrative localities, collection
//! operators and frequency patterns.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Data provenance reported with every zone resolution
pub const ZONE_DATA_SOURCE: &str = "macrobarr.geojson";

/// Approximate bounding box of the Bogotá urban area
pub const BOGOTA_NORTH: f64 = 4.9;
pub const BOGOTA_SOUTH: f64 = 4.4;
pub const BOGOTA_EAST: f64 = -73.8;
pub const BOGOTA_WEST: f64 = -74.3;

/// Date the zone survey was last updated
pub fn zone_data_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 11, 30).unwrap_or_default()
}

/// Localities by administrative id (POT Bogotá)
const LOCALITIES: [(&str, &str); 20] = [
    ("1", "USAQUÉN"),
    ("2", "CHAPINERO"),
    ("3", "SANTA FE"),
    ("4", "SAN CRISTÓBAL"),
    ("5", "USME"),
    ("6", "TUNJUELITO"),
    ("7", "BOSA"),
    ("8", "KENNEDY"),
    ("9", "FONTIBÓN"),
    ("10", "ENGATIVÁ"),
    ("11", "SUBA"),
    ("12", "BARRIOS UNIDOS"),
    ("13", "TEUSAQUILLO"),
    ("14", "LOS MÁRTIRES"),
    ("15", "ANTONIO NARIÑO"),
    ("16", "PUENTE ARANDA"),
    ("17", "LA CANDELARIA"),
    ("18", "RAFAEL URIBE URIBE"),
    ("19", "CIUDAD BOLÍVAR"),
    ("20", "SUMAPAZ"),
];

/// Operators keyed by normalized locality name
const OPERATORS_BY_LOCALITY: [(&str, Operator); 20] = [
    ("CHAPINERO", Operator::AreaLimpia),
    ("USAQUEN", Operator::AreaLimpia),
    ("SANTA FE", Operator::AreaLimpia),
    ("LA CANDELARIA", Operator::AreaLimpia),
    ("SAN CRISTOBAL", Operator::AreaLimpia),
    ("SUMAPAZ", Operator::AreaLimpia),
    ("USME", Operator::AreaLimpia),
    ("CIUDAD BOLIVAR", Operator::CiudadLimpia),
    ("BOSA", Operator::CiudadLimpia),
    ("TUNJUELITO", Operator::CiudadLimpia),
    ("ANTONIO NARINO", Operator::CiudadLimpia),
    ("PUENTE ARANDA", Operator::CiudadLimpia),
    ("LOS MARTIRES", Operator::CiudadLimpia),
    ("TEUSAQUILLO", Operator::CiudadLimpia),
    ("RAFAEL URIBE URIBE", Operator::CiudadLimpia),
    ("KENNEDY", Operator::Lime),
    ("FONTIBON", Operator::Lime),
    ("ENGATIVA", Operator::BogotaLimpia),
    ("BARRIOS UNIDOS", Operator::BogotaLimpia),
    ("SUBA", Operator::Promoambiental),
];

/// Look up the display name of a locality id.
pub fn locality_name(id: &str) -> Option<&'static str> {
    LOCALITIES.iter().find(|(key, _)| *key == id.trim()).map(|(_, name)| *name)
}

/// Locality display name, or the synthesized `Zone {id}` label for ids
/// outside the table.
pub fn locality_name_or_default(id: &str) -> String {
    locality_name(id)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Zone {}", id).trim_end().to_string())
}

/// Reverse lookup: locality id from a (possibly accented) name.
pub fn locality_id(name: &str) -> Option<&'static str> {
    let normalized = normalize_locality(name);
    LOCALITIES
        .iter()
        .find(|(_, locality)| normalize_locality(locality) == normalized)
        .map(|(id, _)| *id)
}

/// Waste-collection operator concessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "Area_Limpia")]
    AreaLimpia,
    #[serde(rename = "ciudad_limpia")]
    CiudadLimpia,
    #[serde(rename = "Lime")]
    Lime,
    #[serde(rename = "bogota_limpia")]
    BogotaLimpia,
    #[serde(rename = "pro_ambiental")]
    Promoambiental,
    #[serde(rename = "unknown")]
    Unknown,
}

impl Operator {
    /// Resolve the operator serving a normalized locality name.
    pub fn for_locality(normalized: &str) -> Operator {
        OPERATORS_BY_LOCALITY
            .iter()
            .find(|(locality, _)| *locality == normalized)
            .map(|(_, operator)| *operator)
            .unwrap_or(Operator::Unknown)
    }

    /// Stable identifier used in serialized data
    pub fn id(&self) -> &'static str {
        match self {
            Operator::AreaLimpia => "Area_Limpia",
            Operator::CiudadLimpia => "ciudad_limpia",
            Operator::Lime => "Lime",
            Operator::BogotaLimpia => "bogota_limpia",
            Operator::Promoambiental => "pro_ambiental",
            Operator::Unknown => "unknown",
        }
    }

    /// Name shown to residents
    pub fn display_name(&self) -> &'static str {
        match self {
            Operator::AreaLimpia => "Área Limpia",
            Operator::CiudadLimpia => "Ciudad Limpia",
            Operator::Lime => "LIME",
            Operator::BogotaLimpia => "Bogotá Limpia",
            Operator::Promoambiental => "Promoambiental",
            Operator::Unknown => "Operador No Identificado",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Operator::Unknown)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Weekly collection pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    MonWedFri,
    TueThuSat,
    MonWedFriSun,
    Daily,
    Unavailable,
}

impl Frequency {
    const ALL: [Frequency; 5] = [
        Frequency::MonWedFri,
        Frequency::TueThuSat,
        Frequency::MonWedFriSun,
        Frequency::Daily,
        Frequency::Unavailable,
    ];

    /// Resolve a survey frequency id (`"1"`..`"4"`).
    pub fn from_id(id: &str) -> Frequency {
        match id.trim() {
            "1" => Frequency::MonWedFri,
            "2" => Frequency::TueThuSat,
            "3" => Frequency::MonWedFriSun,
            "4" => Frequency::Daily,
            _ => Frequency::Unavailable,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Frequency::MonWedFri => "Lun - Mié - Vie",
            Frequency::TueThuSat => "Mar - Jue - Sáb",
            Frequency::MonWedFriSun => "Lun - Mié - Vie - Dom",
            Frequency::Daily => "Diario",
            Frequency::Unavailable => "unavailable",
        }
    }

    pub fn from_label(label: &str) -> Option<Frequency> {
        Frequency::ALL.into_iter().find(|f| f.label() == label)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Frequency {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Frequency {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Frequency::from_label(&label)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown frequency '{}'", label)))
    }
}

/// Normalize a locality name into its lookup key: uppercase, trimmed,
/// diacritics removed, internal whitespace collapsed.
pub fn normalize_locality(name: &str) -> String {
    let folded: String = name.trim().chars().filter_map(fold_diacritic).collect();
    folded.to_uppercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip the diacritic from a precomposed Latin letter; drop combining marks.
fn fold_diacritic(c: char) -> Option<char> {
    let folded = match c {
        '\u{0300}'..='\u{036f}' => return None,
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'È' | 'É' | 'Ê' | 'Ë' => 'E',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'Ì' | 'Í' | 'Î' | 'Ï' => 'I',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'Ù' | 'Ú' | 'Û' | 'Ü' => 'U',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'Ñ' => 'N',
        'ñ' => 'n',
        'Ç' => 'C',
        'ç' => 'c',
        'Ý' => 'Y',
        'ý' | 'ÿ' => 'y',
        other => other,
    };
    Some(folded)
}

/// Whether a point falls inside the Bogotá bounding box.
pub fn is_in_bogota(lat: f64, lng: f64) -> bool {
    (BOGOTA_SOUTH..=BOGOTA_NORTH).contains(&lat) && (BOGOTA_WEST..=BOGOTA_EAST).contains(&lng)
}

/// Whether a pair of numbers is a usable WGS84 latitude/longitude.
pub fn validate_coordinates(lat: f64, lng: f64) -> bool {
    lat.is_finite() && lng.is_finite() && (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_accents_and_spaces() {
        assert_eq!(normalize_locality("  Usaquén "), "USAQUEN");
        assert_eq!(normalize_locality("ANTONIO NARIÑO"), "ANTONIO NARINO");
        assert_eq!(normalize_locality("ciudad   bolívar"), "CIUDAD BOLIVAR");
        // decomposed form: E + combining acute accent
        assert_eq!(normalize_locality("ENGATIVE\u{0301}"), "ENGATIVE");
    }

    #[test]
    fn test_every_locality_has_an_operator() {
        for (id, name) in LOCALITIES {
            let operator = Operator::for_locality(&normalize_locality(name));
            assert!(operator.is_known(), "locality {} ({}) has no operator", id, name);
        }
    }

    #[test]
    fn test_normalized_localities_are_distinct() {
        let mut keys: Vec<String> = LOCALITIES.iter().map(|(_, n)| normalize_locality(n)).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), LOCALITIES.len());
    }

    #[test]
    fn test_locality_lookup() {
        assert_eq!(locality_name("13"), Some("TEUSAQUILLO"));
        assert_eq!(locality_name_or_default("99"), "Zone 99");
        assert_eq!(locality_id("Fontibón"), Some("9"));
        assert_eq!(locality_id("Atlantis"), None);
    }

    #[test]
    fn test_operator_lookup() {
        assert_eq!(Operator::for_locality("TEUSAQUILLO"), Operator::CiudadLimpia);
        assert_eq!(Operator::for_locality("SUBA").display_name(), "Promoambiental");
        assert_eq!(Operator::for_locality("ZONE 99"), Operator::Unknown);
        assert_eq!(serde_json::to_string(&Operator::Lime).unwrap(), "\"Lime\"");
    }

    #[test]
    fn test_frequency_lookup() {
        assert_eq!(Frequency::from_id("1").label(), "Lun - Mié - Vie");
        assert_eq!(Frequency::from_id("4"), Frequency::Daily);
        assert_eq!(Frequency::from_id("7"), Frequency::Unavailable);
        assert_eq!(Frequency::from_label("Mar - Jue - Sáb"), Some(Frequency::TueThuSat));
    }

    #[test]
    fn test_bogota_bounds() {
        assert!(is_in_bogota(4.62, -74.07));
        assert!(!is_in_bogota(4.95, -74.07));
        assert!(validate_coordinates(4.62, -74.07));
        assert!(!validate_coordinates(f64::NAN, -74.07));
        assert!(!validate_coordinates(91.0, 0.0));
    }

    #[test]
    fn test_zone_data_date() {
        assert_eq!(zone_data_date().to_string(), "2021-11-30");
    }
}
