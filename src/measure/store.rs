//! The measurement table kept in sync with the committed polygons.

use super::polygon::{PolygonId, PolygonProperties, RoofPolygon};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Changes smaller than this (in m² or m) do not count as an update.
pub const DEFAULT_MEASUREMENT_EPSILON: f64 = 0.001;

/// One row of the measurement table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub id: PolygonId,
    /// Square meters
    pub area: f64,
    /// Meters
    pub perimeter: f64,
}

impl Measurement {
    fn new(id: PolygonId, properties: PolygonProperties) -> Self {
        Self {
            id,
            area: properties.area,
            perimeter: properties.perimeter,
        }
    }

    pub fn properties(&self) -> PolygonProperties {
        PolygonProperties {
            area: self.area,
            perimeter: self.perimeter,
        }
    }
}

/// Measurements keyed by polygon id, in polygon order.
#[derive(Debug, Clone)]
pub struct MeasurementStore {
    entries: Vec<Measurement>,
    epsilon: f64,
}

impl Default for MeasurementStore {
    fn default() -> Self {
        Self::new(DEFAULT_MEASUREMENT_EPSILON)
    }
}

impl MeasurementStore {
    pub fn new(epsilon: f64) -> Self {
        Self {
            entries: Vec::new(),
            epsilon,
        }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon;
    }

    /// Brings the table in line with `polygons`.
    ///
    /// Afterwards there is exactly one entry per measurable polygon, in the
    /// order of `polygons`. Entries for vanished polygons are dropped, and
    /// degenerate polygons are skipped. Existing values are only replaced when
    /// they drift by more than the epsilon. Calling this twice with the same
    /// input leaves the table unchanged.
    pub fn reconcile(&mut self, polygons: &[RoofPolygon]) -> &[Measurement] {
        let mut seen = HashSet::new();
        let mut current = Vec::with_capacity(polygons.len());
        for polygon in polygons {
            if !seen.insert(polygon.id().clone()) {
                log::warn!("Duplicate polygon id {} ignored", polygon.id());
                continue;
            }
            match PolygonProperties::measure(polygon.ring().positions()) {
                Ok(properties) => current.push((polygon.id().clone(), properties)),
                Err(e) => log::warn!("Skipping polygon {}: {}", polygon.id(), e),
            }
        }

        let mut previous: HashMap<PolygonId, Measurement> = self
            .entries
            .drain(..)
            .map(|m| (m.id.clone(), m))
            .collect();

        let mut inserted = 0;
        let mut updated = 0;
        for (id, properties) in current {
            let entry = match previous.remove(&id) {
                Some(mut existing) => {
                    if existing.properties().differs_from(&properties, self.epsilon) {
                        existing.area = properties.area;
                        existing.perimeter = properties.perimeter;
                        updated += 1;
                    }
                    existing
                }
                None => {
                    inserted += 1;
                    Measurement::new(id, properties)
                }
            };
            self.entries.push(entry);
        }
        let removed = previous.len();

        if inserted + updated + removed > 0 {
            log::debug!(
                "Measurements reconciled: {} inserted, {} updated, {} removed",
                inserted,
                updated,
                removed
            );
        }

        &self.entries
    }

    /// Inserts or refreshes the entry for one polygon.
    ///
    /// Returns true if the table changed.
    pub fn upsert(&mut self, id: &PolygonId, properties: PolygonProperties) -> bool {
        match self.entries.iter_mut().find(|m| &m.id == id) {
            Some(existing) => {
                if existing.properties().differs_from(&properties, self.epsilon) {
                    existing.area = properties.area;
                    existing.perimeter = properties.perimeter;
                    true
                } else {
                    false
                }
            }
            None => {
                self.entries.push(Measurement::new(id.clone(), properties));
                true
            }
        }
    }

    pub fn remove(&mut self, id: &PolygonId) -> Option<Measurement> {
        let index = self.entries.iter().position(|m| &m.id == id)?;
        Some(self.entries.remove(index))
    }

    pub fn get(&self, id: &PolygonId) -> Option<&Measurement> {
        self.entries.iter().find(|m| &m.id == id)
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Sum of all areas in square meters.
    pub fn total_area(&self) -> f64 {
        self.entries.iter().map(|m| m.area).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{close_ring, position, Ring};

    fn rect(id: &str, lon: f64, lat: f64, width: f64) -> RoofPolygon {
        let ring = close_ring(&[
            position(lon, lat),
            position(lon + width, lat),
            position(lon + width, lat + 0.0001),
            position(lon, lat + 0.0001),
        ])
        .unwrap();
        RoofPolygon::new(PolygonId::new(id), ring).unwrap()
    }

    fn degenerate(id: &str) -> RoofPolygon {
        let ring = Ring::close(&[
            position(7.0, 51.0),
            position(7.0001, 51.0),
            position(7.0001, 51.0),
        ])
        .unwrap();
        RoofPolygon::from_parts(PolygonId::new(id), ring, PolygonProperties::default())
    }

    #[test]
    fn test_reconcile_one_entry_per_valid_polygon() {
        let mut store = MeasurementStore::default();
        let polygons = vec![
            rect("a", 7.0, 51.0, 0.0002),
            degenerate("broken"),
            rect("b", 7.001, 51.0, 0.0003),
        ];

        let ids: Vec<&str> = store
            .reconcile(&polygons)
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);

        let a = store.get(&PolygonId::new("a")).unwrap();
        assert_eq!(a.properties(), polygons[0].properties());
    }

    #[test]
    fn test_reconcile_drops_orphans() {
        let mut store = MeasurementStore::default();
        let mut polygons = vec![rect("a", 7.0, 51.0, 0.0002), rect("b", 7.001, 51.0, 0.0002)];
        store.reconcile(&polygons);
        assert_eq!(store.len(), 2);

        polygons.remove(0);
        store.reconcile(&polygons);
        assert_eq!(store.len(), 1);
        assert!(store.get(&PolygonId::new("a")).is_none());

        store.reconcile(&[]);
        assert!(store.is_empty());
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut store = MeasurementStore::default();
        let polygons = vec![rect("a", 7.0, 51.0, 0.0002), rect("b", 7.001, 51.0, 0.0003)];
        let first = store.reconcile(&polygons).to_vec();
        let second = store.reconcile(&polygons).to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn test_reconcile_follows_polygon_order() {
        let mut store = MeasurementStore::default();
        let a = rect("a", 7.0, 51.0, 0.0002);
        let b = rect("b", 7.001, 51.0, 0.0002);
        store.reconcile(&[a.clone(), b.clone()]);

        let ids: Vec<String> = store
            .reconcile(&[b, a])
            .iter()
            .map(|m| m.id.to_string())
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_reconcile_ignores_changes_below_epsilon() {
        let mut store = MeasurementStore::default();
        let polygon = rect("a", 7.0, 51.0, 0.0002);
        store.reconcile(std::slice::from_ref(&polygon));

        let nudged = PolygonProperties {
            area: polygon.properties().area + 0.0004,
            perimeter: polygon.properties().perimeter,
        };
        assert!(!store.upsert(polygon.id(), nudged));
        assert_eq!(
            store.get(polygon.id()).unwrap().properties(),
            polygon.properties()
        );

        let moved = PolygonProperties {
            area: polygon.properties().area + 1.0,
            perimeter: polygon.properties().perimeter,
        };
        assert!(store.upsert(polygon.id(), moved));
        assert_eq!(store.get(polygon.id()).unwrap().properties(), moved);

        // Reconciling against the polygon restores its real values
        store.reconcile(std::slice::from_ref(&polygon));
        assert_eq!(
            store.get(polygon.id()).unwrap().properties(),
            polygon.properties()
        );
    }

    #[test]
    fn test_upsert_inserts_missing_entry() {
        let mut store = MeasurementStore::default();
        let polygon = rect("a", 7.0, 51.0, 0.0002);
        assert!(store.upsert(polygon.id(), polygon.properties()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_and_total() {
        let mut store = MeasurementStore::default();
        let a = rect("a", 7.0, 51.0, 0.0002);
        let b = rect("b", 7.001, 51.0, 0.0002);
        store.reconcile(&[a.clone(), b.clone()]);

        let total = a.properties().area + b.properties().area;
        assert!((store.total_area() - total).abs() < 1e-9);

        assert!(store.remove(a.id()).is_some());
        assert!(store.remove(a.id()).is_none());
        assert_eq!(store.len(), 1);
    }
}
