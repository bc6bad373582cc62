//! Play-session counters, snapshotted periodically into the structured log.

use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct GameMetrics {
    selections: u64,
    comparisons: u64,
    matches: u64,
    mismatches: u64,
    drains: u64,
    layout_solves: u64,
    resets: u64,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_selection(&mut self) {
        self.selections = self.selections.saturating_add(1);
    }

    pub fn record_match(&mut self) {
        self.comparisons = self.comparisons.saturating_add(1);
        self.matches = self.matches.saturating_add(1);
    }

    pub fn record_mismatch(&mut self) {
        self.comparisons = self.comparisons.saturating_add(1);
        self.mismatches = self.mismatches.saturating_add(1);
    }

    pub fn record_drain(&mut self) {
        self.drains = self.drains.saturating_add(1);
    }

    pub fn record_layout_solve(&mut self) {
        self.layout_solves = self.layout_solves.saturating_add(1);
    }

    pub fn record_reset(&mut self) {
        self.resets = self.resets.saturating_add(1);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            selections: self.selections,
            comparisons: self.comparisons,
            matches: self.matches,
            mismatches: self.mismatches,
            drains: self.drains,
            layout_solves: self.layout_solves,
            resets: self.resets,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub selections: u64,
    pub comparisons: u64,
    pub matches: u64,
    pub mismatches: u64,
    pub drains: u64,
    pub layout_solves: u64,
    pub resets: u64,
}

impl MetricSnapshot {
    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("selections".to_string(), json!(self.selections));
        map.insert("comparisons".to_string(), json!(self.comparisons));
        map.insert("matches".to_string(), json!(self.matches));
        map.insert("mismatches".to_string(), json!(self.mismatches));
        map.insert("drains".to_string(), json!(self.drains));
        map.insert("layout_solves".to_string(), json!(self.layout_solves));
        map.insert("resets".to_string(), json!(self.resets));
        map
    }

    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "game_metrics", self.as_fields())
    }
}
