#![forbid(unsafe_code)]

//! JSONL transcript of a fixture run.
//!
//! Every dispatch and timer wake-up appends one line with the virtual time,
//! what happened, and the document checksum afterwards. Two runs of the same
//! script must produce byte-identical transcripts.
//!
//! ```json
//! {"seq":0,"kind":"init","t_ms":0,"ops":14,"checksum":"blake3:..."}
//! {"seq":1,"kind":"dispatch","event":"menu_button","t_ms":0,"ops":5,"prevent_default":false,"checksum":"blake3:..."}
//! {"seq":2,"kind":"advance","t_ms":10,"ops":1,"checksum":"blake3:..."}
//! ```

use std::time::Duration;

use serde_json::{Value, json};

/// Ordered run log.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    lines: Vec<Value>,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, mut line: Value) {
        if let Some(obj) = line.as_object_mut() {
            obj.insert("seq".into(), json!(self.lines.len()));
        }
        self.lines.push(line);
    }

    pub fn record_init(&mut self, now: Duration, ops: usize, checksum: String) {
        self.push(json!({
            "kind": "init",
            "t_ms": now.as_millis() as u64,
            "ops": ops,
            "checksum": checksum,
        }));
    }

    pub fn record_dispatch(
        &mut self,
        now: Duration,
        event: &str,
        ops: usize,
        prevent_default: bool,
        checksum: String,
    ) {
        self.push(json!({
            "kind": "dispatch",
            "event": event,
            "t_ms": now.as_millis() as u64,
            "ops": ops,
            "prevent_default": prevent_default,
            "checksum": checksum,
        }));
    }

    pub fn record_advance(&mut self, now: Duration, ops: usize, checksum: String) {
        self.push(json!({
            "kind": "advance",
            "t_ms": now.as_millis() as u64,
            "ops": ops,
            "checksum": checksum,
        }));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn lines(&self) -> &[Value] {
        &self.lines
    }

    /// One JSON object per line.
    #[must_use]
    pub fn to_jsonl(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.to_string());
            out.push('\n');
        }
        out
    }
}
