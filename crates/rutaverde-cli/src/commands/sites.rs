//! Sites command implementation

use super::check_coordinates;
use crate::cli::SitesArgs;
use crate::output::{Human, OutputWriter, Report};
use anyhow::{Context, Result};
use rutaverde_core::config::{parse_radius, CliConfigOverrides, LayeredConfig};
use rutaverde_data::{filter_by_material, nearest_sites, Loader};
use serde::Serialize;
use tabled::Tabled;

#[derive(Debug, Serialize)]
struct SiteEntry {
    index: usize,
    name: String,
    site_type: String,
    distance_km: f64,
    materials: Vec<String>,
    address: Option<String>,
    lat: f64,
    lng: f64,
}

#[derive(Debug, Serialize)]
struct SitesOutput {
    lat: f64,
    lng: f64,
    radius_km: f64,
    material: Option<String>,
    count: usize,
    sites: Vec<SiteEntry>,
}

#[derive(Tabled)]
struct SiteRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    site_type: String,
    #[tabled(rename = "Distance (km)")]
    distance: String,
    #[tabled(rename = "Materials")]
    materials: String,
    #[tabled(rename = "Address")]
    address: String,
}

impl Report for SitesOutput {
    fn render(&self, out: &mut Human) {
        if self.sites.is_empty() {
            out.note(format!("No recycling sites within {} km", self.radius_km));
            return;
        }

        out.heading(format!("Recycling sites within {} km", self.radius_km))
            .table(self.sites.iter().map(|site| SiteRow {
                name: site.name.clone(),
                site_type: site.site_type.clone(),
                distance: format!("{:.2}", site.distance_km),
                materials: site.materials.join(", "),
                address: site.address.clone().unwrap_or_default(),
            }));
    }
}

pub async fn execute(args: SitesArgs, mut config: LayeredConfig, output: &OutputWriter) -> Result<()> {
    check_coordinates(args.lat, args.lng)?;
    let radius = args.radius.map(parse_radius).transpose()?;
    config.update_from_cli(CliConfigOverrides {
        search_radius_km: radius,
        max_results: args.limit,
        ..Default::default()
    });
    let radius_km = config.search_radius_km.value;
    let limit = config.max_results.value;

    let loader = Loader::from_config(&config);
    let sites = loader
        .load_sites()
        .await
        .with_context(|| format!("Failed to load sites from {}", config.data_url.value))?;

    let mut found = nearest_sites(&sites.collection, args.lat, args.lng, radius_km, None);
    if let Some(material) = &args.material {
        found = filter_by_material(found, material);
    }
    found.truncate(limit);

    let entries: Vec<SiteEntry> = found
        .into_iter()
        .map(|nearby| SiteEntry {
            index: nearby.index,
            name: nearby.site.name.clone(),
            site_type: nearby.site.site_type.to_string(),
            distance_km: nearby.distance_km,
            materials: nearby.site.materials.clone(),
            address: nearby.site.address.clone(),
            lat: nearby.site.lat,
            lng: nearby.site.lng,
        })
        .collect();

    output.emit(&SitesOutput {
        lat: args.lat,
        lng: args.lng,
        radius_km,
        material: args.material,
        count: entries.len(),
        sites: entries,
    })
}
