//! Metric catalog — the fixed, ordered list of channels on the dashboard.
//!
//! Built once at startup and never mutated. Catalog order is grid order:
//! entry `i` occupies card cell `i`.

use std::collections::HashSet;

use crate::error::CatalogError;
use crate::types::MetricDescriptor;

/// Immutable ordered list of metric descriptors with unique ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricCatalog {
    entries: Vec<MetricDescriptor>,
}

impl MetricCatalog {
    /// Build a catalog, rejecting empty and duplicate ids.
    pub fn new(entries: Vec<MetricDescriptor>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if entry.id.trim().is_empty() {
                return Err(CatalogError::EmptyId);
            }
            if !seen.insert(entry.id.as_str()) {
                return Err(CatalogError::DuplicateId(entry.id.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// The built-in 20-channel vehicle telemetry catalog.
    pub fn builtin() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|(id, label, unit)| MetricDescriptor::new(id, label, unit))
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[MetricDescriptor] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&MetricDescriptor> {
        self.entries.iter().find(|d| d.id == id)
    }

    /// Grid index of a metric id.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|d| d.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricDescriptor> {
        self.entries.iter()
    }
}

impl Default for MetricCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

const BUILTIN: [(&str, &str, &str); 20] = [
    ("speed", "Speed", "km/h"),
    ("rpm", "Engine RPM", "rpm"),
    ("throttle", "Throttle", "%"),
    ("brake", "Brake Pressure", "bar"),
    ("gear", "Gear", ""),
    ("coolant_temp", "Coolant Temp", "°C"),
    ("oil_temp", "Oil Temp", "°C"),
    ("oil_pressure", "Oil Pressure", "bar"),
    ("fuel_level", "Fuel Level", "%"),
    ("fuel_rate", "Fuel Rate", "L/h"),
    ("battery_voltage", "Battery", "V"),
    ("boost", "Boost", "bar"),
    ("intake_temp", "Intake Temp", "°C"),
    ("lambda", "Lambda", "λ"),
    ("steering_angle", "Steering", "°"),
    ("lateral_g", "Lateral G", "g"),
    ("longitudinal_g", "Longitudinal G", "g"),
    ("tyre_temp_fl", "Tyre Temp FL", "°C"),
    ("tyre_temp_fr", "Tyre Temp FR", "°C"),
    ("lap_delta", "Lap Delta", "s"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_twenty_unique_entries() {
        let catalog = MetricCatalog::builtin();
        assert_eq!(catalog.len(), 20);
        // Re-validating the built-in list must succeed.
        assert!(MetricCatalog::new(catalog.entries().to_vec()).is_ok());
    }

    #[test]
    fn position_follows_declaration_order() {
        let catalog = MetricCatalog::builtin();
        assert_eq!(catalog.position("speed"), Some(0));
        assert_eq!(catalog.position("oil_temp"), Some(6));
        assert_eq!(catalog.position("unknown"), None);
    }

    #[test]
    fn duplicate_ids_rejected() {
        let result = MetricCatalog::new(vec![
            MetricDescriptor::new("speed", "Speed", "km/h"),
            MetricDescriptor::new("speed", "Speed again", "mph"),
        ]);
        assert!(matches!(result, Err(CatalogError::DuplicateId(id)) if id == "speed"));
    }

    #[test]
    fn empty_id_rejected() {
        let result = MetricCatalog::new(vec![MetricDescriptor::new(" ", "Blank", "")]);
        assert!(matches!(result, Err(CatalogError::EmptyId)));
    }
}
