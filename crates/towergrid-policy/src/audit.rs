//! Audit sinks.
//!
//! Reporting is fire-and-forget: a sink must never block or fail the
//! decision that produced the record.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::decision::Decision;
use crate::snapshot::RadioKpis;

/// A decision plus the radio context it was made in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    #[serde(flatten)]
    pub decision: Decision,
    pub radio: RadioKpis,
}

pub trait AuditSink: Send + Sync {
    fn record(&self, record: &AuditRecord);
}

/// Emits every record as a structured `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, record: &AuditRecord) {
        let d = &record.decision;
        info!(
            target: "towergrid::audit",
            tower = %d.tower_id,
            decision = %d.decision,
            previous = %d.previous,
            load_pct = d.load_percentage,
            failure_rate = d.failure_rate,
            rollback = d.rollback,
            reason = d.rollback_reason.as_deref().unwrap_or(""),
            downlink_mbps = ?record.radio.downlink_mbps,
            uplink_mbps = ?record.radio.uplink_mbps,
            rssi_dbm = ?record.radio.rssi_dbm,
            sinr_db = ?record.radio.sinr_db,
            "policy decision"
        );
    }
}

/// Forwards records into a bounded channel. When the channel is full
/// or its receiver is gone the record is dropped.
#[derive(Debug, Clone)]
pub struct ChannelAuditSink {
    tx: mpsc::Sender<AuditRecord>,
}

impl ChannelAuditSink {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<AuditRecord>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }
}

impl AuditSink for ChannelAuditSink {
    fn record(&self, record: &AuditRecord) {
        if let Err(e) = self.tx.try_send(record.clone()) {
            let reason = match e {
                mpsc::error::TrySendError::Full(_) => "full",
                mpsc::error::TrySendError::Closed(_) => "closed",
            };
            debug!(tower = %record.decision.tower_id, reason, "audit record dropped");
        }
    }
}
