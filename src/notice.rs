//! Purpose: Define a stable, structured schema for non-fatal stderr notices.
//! Exports: `Notice`, `notice_json`.
//! Role: Shared contract helper for CLI diagnostics (non-error events).
//! Invariants: Notices are non-fatal and never alter stdout payloads.
//! Invariants: JSON schema is additive-only.
use serde_json::{Map, Value, json};

use crate::api::LoadOutcome;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: String,
    pub time: String,
    pub cmd: String,
    pub catalog: String,
    pub message: String,
    pub details: Map<String, Value>,
}

impl Notice {
    /// Notice for a load that discarded an unreadable catalog; `None` for clean loads.
    pub fn from_load_outcome(
        outcome: &LoadOutcome,
        cmd: &str,
        catalog: &str,
        time: String,
    ) -> Option<Self> {
        let LoadOutcome::Reset { reason } = outcome else {
            return None;
        };
        let mut details = Map::new();
        details.insert("reason".to_string(), json!(reason));
        Some(Self {
            kind: "reset".to_string(),
            time,
            cmd: cmd.to_string(),
            catalog: catalog.to_string(),
            message: "catalog file was unreadable; starting with an empty catalog".to_string(),
            details,
        })
    }
}

pub fn notice_json(notice: &Notice) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(notice.kind));
    inner.insert("time".to_string(), json!(notice.time));
    inner.insert("cmd".to_string(), json!(notice.cmd));
    inner.insert("catalog".to_string(), json!(notice.catalog));
    inner.insert("message".to_string(), json!(notice.message));
    inner.insert("details".to_string(), Value::Object(notice.details.clone()));

    let mut outer = Map::new();
    outer.insert("notice".to_string(), Value::Object(inner));
    Value::Object(outer)
}
