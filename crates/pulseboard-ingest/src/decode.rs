//! Producer boundary — decode and validate wire payloads.
//!
//! The transport client only has to hand over raw bytes. Anything that does
//! not decode into a well-formed [`MetricPayload`] is logged and dropped
//! here and never reaches the [`MetricBuffer`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use pulseboard_core::MetricPayload;
use tracing::{trace, warn};

use crate::buffer::MetricBuffer;
use crate::error::{DecodeError, DecodeResult};

/// Decode one JSON payload `{metric, label, unit, value, timestamp}`.
pub fn decode_payload(raw: &[u8]) -> DecodeResult<MetricPayload> {
    let payload: MetricPayload = serde_json::from_slice(raw)?;
    validate_payload(&payload)?;
    Ok(payload)
}

/// Checks every payload must pass before it is buffered.
pub fn validate_payload(payload: &MetricPayload) -> DecodeResult<()> {
    if payload.metric.trim().is_empty() {
        return Err(DecodeError::EmptyMetric);
    }
    if !payload.value.is_finite() {
        return Err(DecodeError::NonFiniteValue {
            metric: payload.metric.clone(),
        });
    }
    Ok(())
}

#[derive(Debug, Default)]
struct Counters {
    accepted: AtomicU64,
    dropped: AtomicU64,
}

/// Feeds decoded payloads into a [`MetricBuffer`].
///
/// This is the callback the transport client invokes per message.
#[derive(Debug, Clone)]
pub struct Ingestor {
    buffer: MetricBuffer,
    counters: Arc<Counters>,
}

impl Ingestor {
    pub fn new(buffer: MetricBuffer) -> Self {
        Self {
            buffer,
            counters: Arc::new(Counters::default()),
        }
    }

    /// Decode `raw` and buffer it. Returns whether the payload was accepted.
    pub fn ingest(&self, raw: &[u8]) -> bool {
        self.accept(decode_payload(raw))
    }

    /// Buffer a payload a transport already decoded, after the same checks
    /// raw payloads go through.
    pub fn ingest_payload(&self, payload: MetricPayload) -> bool {
        self.accept(validate_payload(&payload).map(|()| payload))
    }

    fn accept(&self, decoded: DecodeResult<MetricPayload>) -> bool {
        match decoded {
            Ok(payload) => {
                trace!(metric = %payload.metric, value = payload.value, "payload buffered");
                self.buffer.add(payload);
                self.counters.accepted.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(e) => {
                let dropped = self.counters.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                warn!(error = %e, dropped, "dropping malformed payload");
                false
            }
        }
    }

    pub fn accepted(&self) -> u64 {
        self.counters.accepted.load(Ordering::Relaxed)
    }

    pub fn dropped(&self) -> u64 {
        self.counters.dropped.load(Ordering::Relaxed)
    }

    pub fn buffer(&self) -> &MetricBuffer {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_full_payload() {
        let raw = br#"{"metric":"speed","label":"Speed","unit":"km/h","value":87,"timestamp":1000}"#;
        let payload = decode_payload(raw).unwrap();
        assert_eq!(payload.metric, "speed");
        assert_eq!(payload.value, 87.0);
        assert_eq!(payload.timestamp, 1000);
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(decode_payload(b"{not json"), Err(DecodeError::Json(_))));
    }

    #[test]
    fn rejects_missing_value() {
        let raw = br#"{"metric":"speed","timestamp":1000}"#;
        assert!(matches!(decode_payload(raw), Err(DecodeError::Json(_))));
    }

    #[test]
    fn rejects_string_value() {
        let raw = br#"{"metric":"speed","value":"fast","timestamp":1000}"#;
        assert!(matches!(decode_payload(raw), Err(DecodeError::Json(_))));
    }

    #[test]
    fn rejects_empty_metric() {
        let raw = br#"{"metric":"  ","value":1,"timestamp":1000}"#;
        assert!(matches!(decode_payload(raw), Err(DecodeError::EmptyMetric)));
    }

    #[test]
    fn malformed_payloads_never_reach_buffer() {
        let buffer = MetricBuffer::new();
        let ingestor = Ingestor::new(buffer.clone());

        assert!(!ingestor.ingest(b"garbage"));
        assert!(!ingestor.ingest(br#"{"metric":"","value":1,"timestamp":1}"#));
        assert!(ingestor.ingest(br#"{"metric":"rpm","value":3000,"timestamp":1}"#));

        let drained = buffer.drain_all();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].metric, "rpm");
        assert_eq!(ingestor.accepted(), 1);
        assert_eq!(ingestor.dropped(), 2);
    }

    #[test]
    fn decoded_payloads_are_validated_too() {
        let buffer = MetricBuffer::new();
        let ingestor = Ingestor::new(buffer.clone());

        assert!(!ingestor.ingest_payload(MetricPayload::new("speed", f64::NAN, 1)));
        assert!(!ingestor.ingest_payload(MetricPayload::new(" ", 1.0, 1)));
        assert!(ingestor.ingest_payload(MetricPayload::new("speed", 42.0, 1)));

        let drained = buffer.drain_all();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].value, 42.0);
        assert_eq!(ingestor.accepted(), 1);
        assert_eq!(ingestor.dropped(), 2);
    }

    #[test]
    fn rejects_infinite_value() {
        let payload = MetricPayload::new("rpm", f64::INFINITY, 1);
        assert!(matches!(
            validate_payload(&payload),
            Err(DecodeError::NonFiniteValue { metric }) if metric == "rpm"
        ));
    }

    #[test]
    fn clones_share_counters() {
        let ingestor = Ingestor::new(MetricBuffer::new());
        let other = ingestor.clone();
        other.ingest(br#"{"metric":"rpm","value":1,"timestamp":1}"#);
        assert_eq!(ingestor.accepted(), 1);
        assert_eq!(ingestor.buffer().pending_len(), 1);
    }
}
