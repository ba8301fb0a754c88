//! Source property aliases.
//!
//! The surveys spell the same field several ways (`tipo`/`TIPO`,
//! `IDLOCALID_`/`idlocalid_`). Everything downstream works on the typed
//! inputs built here and never looks at source keys again.

use rutaverde_core::models::{RawProperties, SiteType, UNNAMED_SITE};
use serde_json::Value;

pub const LOCALITY_ID: &[&str] = &["IDLOCALID_", "idlocalid_"];
pub const FREQUENCY_ID: &[&str] = &["IDFRECUE_", "idfrecue_"];
pub const START_HOUR: &[&str] = &["HORAINICIO", "horainicio"];
pub const END_HOUR: &[&str] = &["HORAFIN", "horafin"];
pub const SITE_NAME: &[&str] = &["nombre", "NOMBRE"];
pub const SITE_TYPE: &[&str] = &["tipo", "TIPO"];
pub const MATERIALS: &[&str] = &["materiales", "MATERIALES", "materiales_array"];
pub const ADDRESS: &[&str] = &["direccion", "DIRECCION"];
pub const LOCALITY: &[&str] = &["localidad", "LOCALIDAD"];

pub const DEFAULT_FREQUENCY_ID: &str = "1";
pub const DEFAULT_START: u32 = 600;
pub const DEFAULT_END: u32 = 1600;

/// Whether a source value counts as set. The surveys use `null`, `""`,
/// `false` and `0` as placeholders.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.trim().is_empty(),
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// First present value among `keys`, in priority order
pub fn lookup<'a>(properties: &'a RawProperties, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().filter_map(|key| properties.get(*key)).find(|value| is_present(value))
}

/// Scalar value as trimmed text. Integral numbers print without a fraction.
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Some(i.to_string()),
            (None, Some(f)) if f.fract() == 0.0 => Some(format!("{}", f as i64)),
            _ => Some(n.to_string()),
        },
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// `HHMM`-encoded time from a number or numeric string.
pub fn as_hhmm(value: &Value) -> Result<u32, String> {
    let parsed = match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| format!("expected a non-negative HHMM time, found {}", value))
}

/// Zone source fields after alias resolution
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneInput {
    pub locality_id: String,
    pub frequency_id: String,
    pub start: u32,
    pub end: u32,
}

impl ZoneInput {
    pub fn from_properties(properties: &RawProperties) -> Result<Self, String> {
        // a missing id resolves like an unknown one
        let locality_id = lookup(properties, LOCALITY_ID).and_then(as_text).unwrap_or_default();
        let frequency_id = lookup(properties, FREQUENCY_ID)
            .and_then(as_text)
            .unwrap_or_else(|| DEFAULT_FREQUENCY_ID.to_string());
        let start = lookup(properties, START_HOUR).map(as_hhmm).transpose()?.unwrap_or(DEFAULT_START);
        let end = lookup(properties, END_HOUR).map(as_hhmm).transpose()?.unwrap_or(DEFAULT_END);

        Ok(Self { locality_id, frequency_id, start, end })
    }
}

/// Site source fields after alias resolution
#[derive(Debug, Clone, PartialEq)]
pub struct SiteInput {
    pub name: String,
    pub site_type: SiteType,
    pub materials: Vec<String>,
    pub address: Option<String>,
    pub locality: Option<String>,
}

impl SiteInput {
    pub fn from_properties(properties: &RawProperties) -> Self {
        let text = |keys: &[&str]| lookup(properties, keys).and_then(as_text);

        Self {
            name: text(SITE_NAME).unwrap_or_else(|| UNNAMED_SITE.to_string()),
            site_type: text(SITE_TYPE).map(|t| SiteType::from_label(&t)).unwrap_or_default(),
            materials: lookup(properties, MATERIALS).map(parse_materials).unwrap_or_default(),
            address: text(ADDRESS),
            locality: text(LOCALITY),
        }
    }
}

/// Material tags from a list or a comma separated string, trimmed, blanks
/// dropped, order kept.
pub fn parse_materials(value: &Value) -> Vec<String> {
    let tags: Vec<String> = match value {
        Value::Array(items) => items.iter().filter_map(as_text).collect(),
        Value::String(s) => s.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    };
    tags.into_iter().map(|t| t.trim().to_string()).filter(|t| !t.is_empty()).collect()
}
