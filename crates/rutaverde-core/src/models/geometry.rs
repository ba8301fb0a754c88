//! Canonical geometry types used across all rutaverde crates.
//!
//! Only the three geometry kinds the collection and site datasets use are
//! modelled. Positions are always `[x, y]`; after normalization that means
//! `[lng, lat]` in WGS84 degrees.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single `[x, y]` vertex.
pub type Position = [f64; 2];

/// Coordinate reference systems the source datasets are published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Crs {
    /// WGS 84 geographic degrees (EPSG:4326)
    #[default]
    Wgs84,
    /// Spherical Web Mercator metres (EPSG:3857)
    WebMercator,
    /// MAGNA-SIRGAS / Origen-Nacional transverse Mercator metres (EPSG:9377)
    LocalTransverseMercator,
}

impl Crs {
    pub const ALL: [Crs; 3] = [Crs::WebMercator, Crs::Wgs84, Crs::LocalTransverseMercator];

    /// EPSG code of the system
    pub fn epsg(&self) -> u32 {
        match self {
            Crs::Wgs84 => 4326,
            Crs::WebMercator => 3857,
            Crs::LocalTransverseMercator => 9377,
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Crs::Wgs84 => "WGS 84",
            Crs::WebMercator => "Web Mercator",
            Crs::LocalTransverseMercator => "MAGNA-SIRGAS Origen-Nacional",
        }
    }

    /// OGC URN as written into GeoJSON `crs.properties.name`
    pub fn urn(&self) -> String {
        format!("urn:ogc:def:crs:EPSG::{}", self.epsg())
    }

    /// Identify a system from a free-form CRS name such as `EPSG:3857` or
    /// `urn:ogc:def:crs:EPSG::9377`.
    pub fn from_crs_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        Crs::ALL.into_iter().find(|crs| name.contains(&crs.epsg().to_string()))
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{} ({})", self.epsg(), self.name())
    }
}

/// Geometry type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryType {
    Point,
    Polygon,
    MultiPolygon,
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GeometryType::Point => "Point",
            GeometryType::Polygon => "Polygon",
            GeometryType::MultiPolygon => "MultiPolygon",
        };
        f.write_str(name)
    }
}

/// GeoJSON-compatible geometry representation
///
/// Serializes exactly like a GeoJSON geometry object, so canonical collections
/// can be written back out as plain GeoJSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Position },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
}

impl Geometry {
    /// Create a Point geometry
    pub fn point(x: f64, y: f64) -> Self {
        Geometry::Point { coordinates: [x, y] }
    }

    /// Create a Polygon geometry
    pub fn polygon(rings: Vec<Vec<Position>>) -> Self {
        Geometry::Polygon { coordinates: rings }
    }

    /// Create a MultiPolygon geometry
    pub fn multi_polygon(polygons: Vec<Vec<Vec<Position>>>) -> Self {
        Geometry::MultiPolygon { coordinates: polygons }
    }

    /// Axis-aligned rectangle as a closed single-ring polygon
    pub fn rectangle(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Geometry::polygon(vec![vec![
            [min_x, min_y],
            [max_x, min_y],
            [max_x, max_y],
            [min_x, max_y],
            [min_x, min_y],
        ]])
    }

    /// Get the geometry type
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point { .. } => GeometryType::Point,
            Geometry::Polygon { .. } => GeometryType::Polygon,
            Geometry::MultiPolygon { .. } => GeometryType::MultiPolygon,
        }
    }

    /// First vertex, whatever the nesting depth of the geometry kind.
    pub fn first_position(&self) -> Option<Position> {
        match self {
            Geometry::Point { coordinates } => Some(*coordinates),
            Geometry::Polygon { coordinates } => {
                coordinates.first().and_then(|ring| ring.first()).copied()
            }
            Geometry::MultiPolygon { coordinates } => coordinates
                .first()
                .and_then(|polygon| polygon.first())
                .and_then(|ring| ring.first())
                .copied(),
        }
    }

    /// Iterate every vertex in document order.
    pub fn positions(&self) -> Box<dyn Iterator<Item = &Position> + '_> {
        match self {
            Geometry::Point { coordinates } => Box::new(std::iter::once(coordinates)),
            Geometry::Polygon { coordinates } => Box::new(coordinates.iter().flatten()),
            Geometry::MultiPolygon { coordinates } => {
                Box::new(coordinates.iter().flatten().flatten())
            }
        }
    }

    /// Build a new geometry of the same shape with every vertex mapped.
    pub fn map_positions<F>(&self, mut f: F) -> Geometry
    where
        F: FnMut(Position) -> Position,
    {
        match self {
            Geometry::Point { coordinates } => Geometry::Point { coordinates: f(*coordinates) },
            Geometry::Polygon { coordinates } => Geometry::Polygon {
                coordinates: coordinates.iter().map(|ring| map_ring(ring, &mut f)).collect(),
            },
            Geometry::MultiPolygon { coordinates } => Geometry::MultiPolygon {
                coordinates: coordinates
                    .iter()
                    .map(|polygon| polygon.iter().map(|ring| map_ring(ring, &mut f)).collect())
                    .collect(),
            },
        }
    }

    /// Convert a parsed GeoJSON geometry value.
    ///
    /// Positions keep their first two ordinates. Geometry kinds other than
    /// Point/Polygon/MultiPolygon and positions with fewer than two ordinates
    /// are rejected with a reason.
    pub fn from_geojson_value(value: &geojson::Value) -> Result<Self, String> {
        match value {
            geojson::Value::Point(position) => {
                Ok(Geometry::Point { coordinates: to_position(position)? })
            }
            geojson::Value::Polygon(rings) => {
                Ok(Geometry::Polygon { coordinates: to_rings(rings)? })
            }
            geojson::Value::MultiPolygon(polygons) => Ok(Geometry::MultiPolygon {
                coordinates: polygons.iter().map(|rings| to_rings(rings)).collect::<Result<_, _>>()?,
            }),
            geojson::Value::LineString(_) => Err(unsupported("LineString")),
            geojson::Value::MultiPoint(_) => Err(unsupported("MultiPoint")),
            geojson::Value::MultiLineString(_) => Err(unsupported("MultiLineString")),
            geojson::Value::GeometryCollection(_) => Err(unsupported("GeometryCollection")),
        }
    }
}

fn map_ring<F>(ring: &[Position], f: &mut F) -> Vec<Position>
where
    F: FnMut(Position) -> Position,
{
    ring.iter().map(|p| f(*p)).collect()
}

fn unsupported(kind: &str) -> String {
    format!("unsupported geometry type {}", kind)
}

fn to_position(position: &[f64]) -> Result<Position, String> {
    match position {
        [x, y, ..] => Ok([*x, *y]),
        _ => Err(format!("position needs at least 2 ordinates, found {}", position.len())),
    }
}

fn to_rings(rings: &[Vec<Vec<f64>>]) -> Result<Vec<Vec<Position>>, String> {
    rings
        .iter()
        .map(|ring| ring.iter().map(|p| to_position(p)).collect())
        .collect()
}

/// Axis-aligned bounding box in the units of the geometry (degrees after
/// normalization).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    /// Inclusive containment test on both axes
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Smallest box covering both boxes
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}
