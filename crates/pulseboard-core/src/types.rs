//! Shared types used across Pulseboard crates.
//!
//! These types describe metrics, the payloads a producer delivers for them,
//! the engine-side render state, and the per-frame debug statistics. All
//! of them are plain values so they can be moved across the ingest/render
//! thread boundary without sharing.

use serde::{Deserialize, Serialize};

/// Stable identifier of a metric channel (e.g. `"speed"`).
pub type MetricId = String;

// ── Catalog ────────────────────────────────────────────────────────

/// Static description of one metric channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MetricDescriptor {
    pub id: MetricId,
    /// Human-readable label painted on the card.
    pub label: String,
    /// Unit string painted next to the value.
    pub unit: String,
}

impl MetricDescriptor {
    pub fn new(id: &str, label: &str, unit: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            unit: unit.to_string(),
        }
    }
}

// ── Payload ────────────────────────────────────────────────────────

/// A single decoded metric update as delivered by the producer.
///
/// Wire shape: `{"metric", "label", "unit", "value", "timestamp"}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricPayload {
    pub metric: MetricId,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub unit: String,
    pub value: f64,
    /// Producer clock, milliseconds since the unix epoch.
    pub timestamp: i64,
}

impl MetricPayload {
    pub fn new(metric: &str, value: f64, timestamp: i64) -> Self {
        Self {
            metric: metric.to_string(),
            label: String::new(),
            unit: String::new(),
            value,
            timestamp,
        }
    }

    /// Build a descriptor from the payload's own label and unit.
    ///
    /// Used for ids the catalog does not know about; an empty label falls
    /// back to the id.
    pub fn descriptor(&self) -> MetricDescriptor {
        let label = if self.label.is_empty() {
            self.metric.clone()
        } else {
            self.label.clone()
        };
        MetricDescriptor {
            id: self.metric.clone(),
            label,
            unit: self.unit.clone(),
        }
    }
}

// ── Render state ───────────────────────────────────────────────────

/// Last-known value of a metric as held by the render engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricRenderState {
    pub descriptor: MetricDescriptor,
    pub value: f64,
    pub timestamp: i64,
}

impl MetricRenderState {
    /// Value shown before the first update arrives.
    pub const SENTINEL_VALUE: f64 = 0.0;

    /// Seed state for a catalog entry that has not been updated yet.
    pub fn seeded(descriptor: MetricDescriptor) -> Self {
        Self {
            descriptor,
            value: Self::SENTINEL_VALUE,
            timestamp: 0,
        }
    }

    pub fn from_payload(payload: &MetricPayload) -> Self {
        Self {
            descriptor: payload.descriptor(),
            value: payload.value,
            timestamp: payload.timestamp,
        }
    }

    pub fn id(&self) -> &str {
        &self.descriptor.id
    }
}

// ── Debug statistics ───────────────────────────────────────────────

/// Per-frame diagnostics reported by the render thread.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct DebugStats {
    /// Instantaneous frames per second.
    pub fps: f64,
    /// Wall time of the last render pass in milliseconds.
    pub render_ms: f64,
    /// Median publish-to-render latency in milliseconds.
    pub latency_p50: f64,
    /// 95th percentile publish-to-render latency in milliseconds.
    pub latency_p95: f64,
}

impl DebugStats {
    /// Overwrite every field from `other`.
    pub fn update_from(&mut self, other: &DebugStats) {
        self.fps = other.fps;
        self.render_ms = other.render_ms;
        self.latency_p50 = other.latency_p50;
        self.latency_p95 = other.latency_p95;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_decodes_wire_shape() {
        let raw = r#"{"metric":"speed","label":"Speed","unit":"km/h","value":87,"timestamp":1700000000000}"#;
        let payload: MetricPayload = serde_json::from_str(raw).unwrap();
        assert_eq!(payload.metric, "speed");
        assert_eq!(payload.label, "Speed");
        assert_eq!(payload.value, 87.0);
        assert_eq!(payload.timestamp, 1_700_000_000_000);
    }

    #[test]
    fn payload_label_and_unit_are_optional() {
        let raw = r#"{"metric":"rpm","value":3000.5,"timestamp":1}"#;
        let payload: MetricPayload = serde_json::from_str(raw).unwrap();
        assert!(payload.label.is_empty());
        assert!(payload.unit.is_empty());
    }

    #[test]
    fn descriptor_falls_back_to_id() {
        let payload = MetricPayload::new("boost", 1.2, 0);
        let descriptor = payload.descriptor();
        assert_eq!(descriptor.label, "boost");
    }

    #[test]
    fn seeded_state_uses_sentinel() {
        let state = MetricRenderState::seeded(MetricDescriptor::new("speed", "Speed", "km/h"));
        assert_eq!(state.value, MetricRenderState::SENTINEL_VALUE);
        assert_eq!(state.timestamp, 0);
        assert_eq!(state.id(), "speed");
    }

    #[test]
    fn debug_stats_update_copies_every_field() {
        let mut stats = DebugStats::default();
        let next = DebugStats {
            fps: 60.0,
            render_ms: 0.5,
            latency_p50: 12.0,
            latency_p95: 40.0,
        };
        stats.update_from(&next);
        assert_eq!(stats, next);
    }
}
