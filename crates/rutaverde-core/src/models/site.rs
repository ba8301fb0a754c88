use super::feature::{Processed, RawProperties};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Category of a recycling drop-off point
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum SiteType {
    /// Estación de Clasificación y Aprovechamiento
    Eca,
    PuntoVerde,
    #[default]
    PuntoReciclaje,
    /// Any other label used by the surveys
    Other(String),
}

impl SiteType {
    pub fn from_label(label: &str) -> SiteType {
        match label.trim() {
            "ECA" => SiteType::Eca,
            "Punto Verde" => SiteType::PuntoVerde,
            "Punto de Reciclaje" => SiteType::PuntoReciclaje,
            other => SiteType::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            SiteType::Eca => "ECA",
            SiteType::PuntoVerde => "Punto Verde",
            SiteType::PuntoReciclaje => "Punto de Reciclaje",
            SiteType::Other(label) => label,
        }
    }
}

impl fmt::Display for SiteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for SiteType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for SiteType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(SiteType::from_label(&String::deserialize(deserializer)?))
    }
}

/// Default site name when the survey has none
pub const UNNAMED_SITE: &str = "Sin nombre";

/// Canonical properties of a recycling site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteProperties {
    pub name: String,
    pub site_type: SiteType,
    /// Accepted material tags, in survey order
    pub materials: Vec<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub locality: Option<String>,
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "_processed")]
    pub processed: Processed,
    #[serde(flatten)]
    pub source: RawProperties,
}

impl SiteProperties {
    pub const CANONICAL_KEYS: [&'static str; 8] =
        ["name", "site_type", "materials", "address", "locality", "lat", "lng", "_processed"];

    /// Case-insensitive substring match against the material tags
    pub fn accepts_material(&self, material: &str) -> bool {
        let needle = material.trim().to_lowercase();
        self.materials.iter().any(|m| m.to_lowercase().contains(&needle))
    }
}
