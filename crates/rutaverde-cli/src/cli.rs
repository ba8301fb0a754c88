use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// RutaVerde - waste-collection zones and recycling sites in Bogotá
#[derive(Parser, Debug)]
#[command(name = "rutaverde")]
#[command(about = "Waste-collection zone lookup and recycling-site search for Bogotá", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// TOML configuration file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Base URL or directory holding the zone and site documents
    #[arg(long, global = true, value_name = "URL|DIR")]
    pub data: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report the projection, contents and extent of a GeoJSON document
    Inspect(InspectArgs),

    /// Find the collection zone containing a point
    Zone(ZoneArgs),

    /// List recycling sites near a point
    Sites(SitesArgs),

    /// Show the effective configuration and where each value came from
    Config,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Path to the GeoJSON document
    pub path: PathBuf,
}

#[derive(Parser, Debug)]
#[command(allow_negative_numbers = true)]
pub struct ZoneArgs {
    /// Latitude in degrees
    pub lat: f64,

    /// Longitude in degrees
    pub lng: f64,

    /// Scan every zone instead of using the spatial index
    #[arg(long)]
    pub linear: bool,
}

#[derive(Parser, Debug)]
#[command(allow_negative_numbers = true)]
pub struct SitesArgs {
    /// Latitude in degrees
    pub lat: f64,

    /// Longitude in degrees
    pub lng: f64,

    /// Search radius in kilometres
    #[arg(long, value_name = "KM")]
    pub radius: Option<f64>,

    /// Only sites accepting this material (e.g. "PET", "vidrio")
    #[arg(long, value_name = "TAG")]
    pub material: Option<String>,

    /// Maximum number of sites to list
    #[arg(long, short = 'n', value_name = "N")]
    pub limit: Option<usize>,
}
