use crate::resolver::ZoneResolution;
use crate::store::DataStore;
use serde::Serialize;

/// How the user supplied a location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationOrigin {
    ManualPin,
    Search,
    Gps,
}

/// Where a user session stands with respect to zone lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LocationState {
    NoLocation,
    /// A location was chosen and is being resolved
    Pending { origin: LocationOrigin, lat: f64, lng: f64 },
    ZoneResolved { origin: LocationOrigin, lat: f64, lng: f64, zone: ZoneResolution },
    /// The location is outside every zone, or zones are not loaded
    OutOfCoverage { origin: LocationOrigin, lat: f64, lng: f64 },
}

impl LocationState {
    pub fn zone(&self) -> Option<&ZoneResolution> {
        match self {
            LocationState::ZoneResolved { zone, .. } => Some(zone),
            _ => None,
        }
    }

    /// The coordinates currently held, if any
    pub fn location(&self) -> Option<(f64, f64)> {
        match *self {
            LocationState::NoLocation => None,
            LocationState::Pending { lat, lng, .. }
            | LocationState::ZoneResolved { lat, lng, .. }
            | LocationState::OutOfCoverage { lat, lng, .. } => Some((lat, lng)),
        }
    }
}

/// Per-user location state. Sessions are independent of each other and only
/// share the read-only data store.
#[derive(Debug, Clone)]
pub struct UserSession {
    state: LocationState,
}

impl Default for UserSession {
    fn default() -> Self {
        Self { state: LocationState::NoLocation }
    }
}

impl UserSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LocationState {
        &self.state
    }

    /// Record a new location. The session stays `Pending` until
    /// [`Self::resolve_pending`] runs.
    pub fn begin_location(&mut self, origin: LocationOrigin, lat: f64, lng: f64) -> &LocationState {
        tracing::debug!(?origin, lat, lng, "Location set");
        self.state = LocationState::Pending { origin, lat, lng };
        &self.state
    }

    /// Resolve a pending location against `store`. Any other state is left
    /// as it is.
    pub fn resolve_pending(&mut self, store: &DataStore) -> &LocationState {
        if let LocationState::Pending { origin, lat, lng } = self.state {
            self.state = match store.resolve_zone(lat, lng) {
                Some(zone) => LocationState::ZoneResolved { origin, lat, lng, zone },
                None => LocationState::OutOfCoverage { origin, lat, lng },
            };
        }
        &self.state
    }

    /// Move to a new location and resolve its zone against `store`.
    pub fn set_location(
        &mut self,
        origin: LocationOrigin,
        lat: f64,
        lng: f64,
        store: &DataStore,
    ) -> &LocationState {
        self.begin_location(origin, lat, lng);
        self.resolve_pending(store)
    }

    pub fn clear(&mut self) {
        self.state = LocationState::NoLocation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ZoneResolver;
    use rutaverde_core::models::{Feature, FeatureCollection, Geometry, ZoneRecord};

    fn store() -> DataStore {
        let store = DataStore::new();
        store.replace_zones(ZoneResolver::indexed(FeatureCollection::new(
            None,
            vec![Feature::new(
                Some(Geometry::rectangle(-74.10, 4.60, -74.05, 4.65)),
                ZoneRecord::Unprocessed(Default::default()),
            )],
        )));
        store
    }

    #[test]
    fn test_session_transitions() {
        let store = store();
        let mut session = UserSession::new();
        assert_eq!(session.state(), &LocationState::NoLocation);

        let state = session.set_location(LocationOrigin::ManualPin, 4.62, -74.07, &store);
        assert_eq!(state.zone().unwrap().locality, "Unknown zone");

        let state = session.set_location(LocationOrigin::Gps, 4.95, -74.07, &store);
        assert!(matches!(state, LocationState::OutOfCoverage { origin: LocationOrigin::Gps, .. }));
        assert_eq!(state.location(), Some((4.95, -74.07)));

        session.clear();
        assert_eq!(session.state().location(), None);
    }

    #[test]
    fn test_pending_until_resolved() {
        let store = store();
        let mut session = UserSession::new();
        assert_eq!(session.resolve_pending(&store), &LocationState::NoLocation);

        let state = session.begin_location(LocationOrigin::Search, 4.62, -74.07);
        assert_eq!(state, &LocationState::Pending { origin: LocationOrigin::Search, lat: 4.62, lng: -74.07 });
        assert_eq!(session.state().location(), Some((4.62, -74.07)));
        assert!(session.state().zone().is_none());

        assert!(session.resolve_pending(&store).zone().is_some());
        // already resolved, nothing pending
        let state = session.resolve_pending(&DataStore::new());
        assert!(matches!(state, LocationState::ZoneResolved { origin: LocationOrigin::Search, .. }));
    }

    #[test]
    fn test_unloaded_store_is_out_of_coverage() {
        let mut session = UserSession::new();
        let state = session.set_location(LocationOrigin::Search, 4.62, -74.07, &DataStore::new());
        assert!(matches!(state, LocationState::OutOfCoverage { .. }));
    }

    #[test]
    fn test_sessions_are_independent() {
        let store = store();
        let mut a = UserSession::new();
        let mut b = UserSession::new();
        a.set_location(LocationOrigin::Gps, 4.62, -74.07, &store);
        b.set_location(LocationOrigin::Gps, 4.95, -74.07, &store);
        assert!(a.state().zone().is_some());
        assert!(b.state().zone().is_none());
    }
}
