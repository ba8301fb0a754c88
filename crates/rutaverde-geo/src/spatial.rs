//! Bridges from the canonical geometry model to the `geo` crate:
//! bounding boxes, point-in-polygon and great-circle distance.

use geo::algorithm::bounding_rect::BoundingRect;
use geo::algorithm::intersects::Intersects;
use geo::{Coord, Distance, Haversine, LineString, MultiPolygon, Point, Polygon};
use rutaverde_core::models::{BoundingBox, Geometry, Position};

fn to_line_string(ring: &[Position]) -> LineString<f64> {
    LineString::new(ring.iter().map(|[x, y]| Coord { x: *x, y: *y }).collect())
}

fn to_polygon(rings: &[Vec<Position>]) -> Polygon<f64> {
    match rings.split_first() {
        Some((exterior, interiors)) => Polygon::new(
            to_line_string(exterior),
            interiors.iter().map(|ring| to_line_string(ring)).collect(),
        ),
        None => Polygon::new(LineString::new(vec![]), vec![]),
    }
}

/// Convert a canonical geometry to a `geo::Geometry`
pub fn to_geo_geometry(geometry: &Geometry) -> geo::Geometry<f64> {
    match geometry {
        Geometry::Point { coordinates: [x, y] } => geo::Geometry::Point(Point::new(*x, *y)),
        Geometry::Polygon { coordinates } => geo::Geometry::Polygon(to_polygon(coordinates)),
        Geometry::MultiPolygon { coordinates } => geo::Geometry::MultiPolygon(MultiPolygon::new(
            coordinates.iter().map(|rings| to_polygon(rings)).collect(),
        )),
    }
}

/// Axis-aligned bounding box of a geometry.
///
/// `None` for empty geometries or when any vertex is not finite.
pub fn bounding_box(geometry: &Geometry) -> Option<BoundingBox> {
    if geometry.positions().any(|p| !p[0].is_finite() || !p[1].is_finite()) {
        return None;
    }
    let rect = to_geo_geometry(geometry).bounding_rect()?;
    let (min, max) = (rect.min(), rect.max());
    Some(BoundingBox::new(min.x, min.y, max.x, max.y))
}

/// Exact point-in-polygon test. Points on a ring boundary count as inside.
///
/// Point geometries contain only their own location.
pub fn contains_point(geometry: &Geometry, lng: f64, lat: f64) -> bool {
    let point = Coord { x: lng, y: lat };
    match geometry {
        Geometry::Point { coordinates: [x, y] } => *x == lng && *y == lat,
        Geometry::Polygon { coordinates } => to_polygon(coordinates).intersects(&point),
        Geometry::MultiPolygon { coordinates } => {
            coordinates.iter().any(|rings| to_polygon(rings).intersects(&point))
        }
    }
}

/// Great-circle distance between two WGS84 locations, in kilometres
pub fn haversine_km(from_lat: f64, from_lng: f64, to_lat: f64, to_lng: f64) -> f64 {
    Haversine.distance(Point::new(from_lng, from_lat), Point::new(to_lng, to_lat)) / 1000.0
}
