use crate::spatial::{bounding_box, contains_point};
use rstar::{RTree, RTreeObject, AABB};
use rutaverde_core::models::{BoundingBox, Geometry, HasGeometry};

/// Bounding box of one feature, keyed by its position in the collection
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    /// Ordinal of the feature in the collection the index was built from
    pub index: usize,
    pub bbox: BoundingBox,
    envelope: AABB<[f64; 2]>,
}

impl IndexEntry {
    pub fn new(index: usize, bbox: BoundingBox) -> Self {
        let envelope = AABB::from_corners([bbox.min_x, bbox.min_y], [bbox.max_x, bbox.max_y]);
        Self { index, bbox, envelope }
    }
}

impl RTreeObject for IndexEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Broad-phase index over feature bounding boxes.
///
/// Built once from a collection and never mutated; a changed collection
/// needs a new index. Candidate lists are returned in collection order so
/// the first exact match is the same one a linear scan would find.
#[derive(Debug)]
pub struct SpatialIndex {
    tree: RTree<IndexEntry>,
    /// Length of the collection the index was built from
    source_len: usize,
}

impl SpatialIndex {
    /// Build an index from a collection. Features without a geometry or
    /// without a computable bounding box are skipped.
    pub fn build<T: HasGeometry>(features: &[T]) -> Self {
        let mut entries = Vec::with_capacity(features.len());
        let mut skipped = 0usize;

        for (index, feature) in features.iter().enumerate() {
            let Some(geometry) = feature.geometry() else {
                tracing::warn!(feature = index, "Skipping feature without geometry");
                skipped += 1;
                continue;
            };
            match bounding_box(geometry) {
                Some(bbox) => entries.push(IndexEntry::new(index, bbox)),
                None => {
                    tracing::warn!(feature = index, "Skipping feature without a bounding box");
                    skipped += 1;
                }
            }
        }

        tracing::debug!(indexed = entries.len(), skipped, "Spatial index built");
        Self { tree: RTree::bulk_load(entries), source_len: features.len() }
    }

    /// Number of indexed features
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Length of the collection this index was built from
    pub fn source_len(&self) -> usize {
        self.source_len
    }

    /// Ordinals of every feature whose bounding box contains the point,
    /// bounds inclusive, in ascending order.
    pub fn find_candidates(&self, lng: f64, lat: f64) -> Vec<usize> {
        let query = AABB::from_point([lng, lat]);
        let mut candidates: Vec<usize> =
            self.tree.locate_in_envelope_intersecting(&query).map(|entry| entry.index).collect();
        candidates.sort_unstable();
        candidates
    }

    /// First feature, in collection order, that contains the point.
    pub fn find_containing_feature<'a, T: HasGeometry>(
        &self,
        features: &'a [T],
        lng: f64,
        lat: f64,
    ) -> Option<(usize, &'a T)> {
        self.find_containing_with(features, lng, lat, contains_point)
    }

    /// Like [`find_containing_feature`](Self::find_containing_feature) with a
    /// caller supplied exact test. The test only runs on broad-phase
    /// candidates.
    pub fn find_containing_with<'a, T, F>(
        &self,
        features: &'a [T],
        lng: f64,
        lat: f64,
        mut contains: F,
    ) -> Option<(usize, &'a T)>
    where
        T: HasGeometry,
        F: FnMut(&Geometry, f64, f64) -> bool,
    {
        if features.len() != self.source_len {
            tracing::warn!(
                indexed = self.source_len,
                given = features.len(),
                "Spatial index queried against a different collection"
            );
        }

        self.find_candidates(lng, lat).into_iter().find_map(|index| {
            let feature = features.get(index)?;
            let geometry = feature.geometry()?;
            contains(geometry, lng, lat).then_some((index, feature))
        })
    }
}
