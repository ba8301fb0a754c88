use crate::output::{Human, OutputWriter, Report};
use anyhow::Result;
use rutaverde_core::config::{ConfigSource, LayeredConfig};
use serde::Serialize;
use std::collections::BTreeMap;
use tabled::Tabled;

#[derive(Debug, Serialize)]
struct ConfigEntry {
    value: String,
    source: ConfigSource,
}

/// Effective configuration keyed by setting name
#[derive(Debug, Serialize)]
#[serde(transparent)]
struct ConfigOutput(BTreeMap<String, ConfigEntry>);

#[derive(Tabled)]
struct ConfigRow<'a> {
    #[tabled(rename = "Key")]
    key: &'a str,
    #[tabled(rename = "Value")]
    value: &'a str,
    #[tabled(rename = "Source")]
    source: String,
}

impl Report for ConfigOutput {
    fn render(&self, out: &mut Human) {
        out.heading("Configuration").table(self.0.iter().map(|(key, entry)| ConfigRow {
            key,
            value: &entry.value,
            source: format!("{:?}", entry.source),
        }));
    }
}

pub fn execute(config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let entries = config
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| (key, ConfigEntry { value, source }))
        .collect();
    output.emit(&ConfigOutput(entries))
}
