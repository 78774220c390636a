//! Metric buffer — absorbs producer updates between display frames.
//!
//! Two views over the same pending data:
//! - a keyed map holding the latest payload per metric (last write wins),
//! - an append-only queue preserving arrival order for batch delivery.
//!
//! `drain_all()` empties both under one lock, so a drain never observes a
//! half-applied `add()`.

use std::collections::HashMap;
use std::mem;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pulseboard_core::{MetricId, MetricPayload};

#[derive(Debug, Default)]
struct Pending {
    latest: HashMap<MetricId, MetricPayload>,
    queue: Vec<MetricPayload>,
}

/// Shared handle to the pending-update buffer.
///
/// Cloning is cheap; every clone points at the same buffer, so the producer
/// task and the frame task can each hold one.
#[derive(Debug, Clone, Default)]
pub struct MetricBuffer {
    inner: Arc<Mutex<Pending>>,
}

impl MetricBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Pending> {
        // A panicking producer must not take the frame loop down with it.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a payload as the latest value for its metric and queue it.
    pub fn add(&self, payload: MetricPayload) {
        let mut pending = self.lock();
        pending
            .latest
            .insert(payload.metric.clone(), payload.clone());
        pending.queue.push(payload);
    }

    /// Take every payload added since the previous drain, in arrival order.
    pub fn drain_all(&self) -> Vec<MetricPayload> {
        let mut pending = self.lock();
        pending.latest.clear();
        mem::take(&mut pending.queue)
    }

    /// Latest pending payload for a metric, if any arrived since the last drain.
    pub fn latest(&self, metric: &str) -> Option<MetricPayload> {
        self.lock().latest.get(metric).cloned()
    }

    /// Number of queued payloads.
    pub fn pending_len(&self) -> usize {
        self.lock().queue.len()
    }

    /// Number of distinct metrics with a pending payload.
    pub fn pending_metrics(&self) -> usize {
        self.lock().latest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(metric: &str, value: f64, ts: i64) -> MetricPayload {
        MetricPayload::new(metric, value, ts)
    }

    #[test]
    fn drain_empty_returns_nothing() {
        let buffer = MetricBuffer::new();
        assert!(buffer.drain_all().is_empty());
    }

    #[test]
    fn drain_preserves_arrival_order() {
        let buffer = MetricBuffer::new();
        buffer.add(payload("speed", 1.0, 1));
        buffer.add(payload("rpm", 2.0, 2));
        buffer.add(payload("speed", 3.0, 3));

        let drained = buffer.drain_all();
        let order: Vec<(&str, f64)> = drained
            .iter()
            .map(|p| (p.metric.as_str(), p.value))
            .collect();
        assert_eq!(order, vec![("speed", 1.0), ("rpm", 2.0), ("speed", 3.0)]);
    }

    #[test]
    fn second_drain_is_empty() {
        let buffer = MetricBuffer::new();
        buffer.add(payload("speed", 1.0, 1));
        assert_eq!(buffer.drain_all().len(), 1);
        assert!(buffer.drain_all().is_empty());
    }

    #[test]
    fn keyed_view_is_last_write_wins() {
        let buffer = MetricBuffer::new();
        buffer.add(payload("speed", 1.0, 1));
        buffer.add(payload("speed", 2.0, 2));

        assert_eq!(buffer.latest("speed").map(|p| p.value), Some(2.0));
        assert_eq!(buffer.pending_metrics(), 1);
        assert_eq!(buffer.pending_len(), 2);
    }

    #[test]
    fn drain_clears_keyed_view() {
        let buffer = MetricBuffer::new();
        buffer.add(payload("speed", 1.0, 1));
        buffer.drain_all();
        assert!(buffer.latest("speed").is_none());
        assert!(buffer.is_empty());
    }

    #[test]
    fn interleaved_adds_and_drains_deliver_each_payload_once() {
        let buffer = MetricBuffer::new();
        let mut delivered = Vec::new();

        for round in 0..5i64 {
            for i in 0..round {
                buffer.add(payload("m", (round * 10 + i) as f64, round * 10 + i));
            }
            delivered.extend(buffer.drain_all());
        }

        let timestamps: Vec<i64> = delivered.iter().map(|p| p.timestamp).collect();
        let mut expected = Vec::new();
        for round in 0..5i64 {
            for i in 0..round {
                expected.push(round * 10 + i);
            }
        }
        assert_eq!(timestamps, expected);
    }

    #[test]
    fn concurrent_producers_lose_nothing() {
        use std::thread;

        let buffer = MetricBuffer::new();
        let mut handles = vec![];

        for t in 0..4 {
            let buffer = buffer.clone();
            handles.push(thread::spawn(move || {
                for i in 0..250 {
                    buffer.add(payload(&format!("m{t}"), i as f64, i));
                }
            }));
        }

        let mut drained = Vec::new();
        for h in handles {
            h.join().unwrap();
            drained.extend(buffer.drain_all());
        }
        drained.extend(buffer.drain_all());

        assert_eq!(drained.len(), 1000);
        // Per-producer order survives interleaving.
        for t in 0..4 {
            let id = format!("m{t}");
            let seq: Vec<i64> = drained
                .iter()
                .filter(|p| p.metric == id)
                .map(|p| p.timestamp)
                .collect();
            assert_eq!(seq, (0..250).collect::<Vec<_>>());
        }
    }
}
