//! The user-visible event log attached to a compiled plan.
//!
//! Graph inconsistencies (door/lift identity mismatches, anomalous lift
//! translations, unterminated sessions) and schedule conflicts are surfaced
//! here so operators can see *why* a plan compiled the way it did.  Entries
//! never abort compilation; hard failures travel through error returns
//! instead.
//!
//! Every entry is mirrored to the `tracing` subscriber at the matching
//! level so fleet logs capture the same diagnostics.

// ── Severity ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    Warning,
    Error,
}

// ── LogEntry ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogEntry {
    pub severity: Severity,
    pub message: String,
}

// ── EventLog ──────────────────────────────────────────────────────────────────

/// An append-only list of user-visible diagnostics.
#[derive(Debug, Default)]
pub struct EventLog {
    entries: Vec<LogEntry>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(target: "fleetplan", "{message}");
        self.entries.push(LogEntry {
            severity: Severity::Warning,
            message,
        });
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::error!(target: "fleetplan", "{message}");
        self.entries.push(LogEntry {
            severity: Severity::Error,
            message,
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Messages of all entries at `severity`, in insertion order.
    pub fn messages_at(&self, severity: Severity) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(move |e| e.severity == severity)
            .map(|e| e.message.as_str())
    }
}
