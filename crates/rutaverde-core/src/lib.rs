//! RutaVerde Core - canonical data model, catalogs and configuration
//!
//! This crate contains the domain types shared by the geospatial, data and
//! CLI crates of the RutaVerde system.

pub mod catalog;
pub mod config;
pub mod document;
pub mod error;
pub mod models;

pub use error::{Result, RutaverdeError};
