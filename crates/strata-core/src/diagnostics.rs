//! Conversion diagnostics
//!
//! Legacy data that can still be converted (job-id-only edits, the old
//! `job_ids` list) is reported here instead of failing. The caller owns the
//! collector and decides whether to log, keep or drop what it gathered.
//! Every diagnostic is also emitted as a WARN event at the moment it is
//! recorded.

/// What a diagnostic reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A deprecated field was read or synthesized; `suggest` replaces it
    Deprecated {
        field: &'static str,
        suggest: &'static str,
    },
}

/// One non-fatal finding raised during conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub entity_id: String,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn deprecated(
        entity_id: impl Into<String>,
        field: &'static str,
        suggest: &'static str,
    ) -> Self {
        Self {
            entity_id: entity_id.into(),
            kind: DiagnosticKind::Deprecated { field, suggest },
            message: format!("'{}' is deprecated, use '{}' instead", field, suggest),
        }
    }

    pub fn is_deprecation(&self) -> bool {
        matches!(self.kind, DiagnosticKind::Deprecated { .. })
    }
}

/// Ordered collector of diagnostics
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and emit it as a WARN event
    pub fn push(&mut self, diagnostic: Diagnostic) {
        match &diagnostic.kind {
            DiagnosticKind::Deprecated { field, suggest } => {
                crate::log_deprecation!(
                    diagnostic.entity_id.as_str(),
                    *field,
                    *suggest,
                    "{}",
                    diagnostic.message
                );
            }
        }
        self.items.push(diagnostic);
    }

    /// Move every diagnostic of `other` into `self` without re-emitting
    pub fn append(&mut self, other: &mut Diagnostics) {
        self.items.append(&mut other.items);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn deprecation_count(&self) -> usize {
        self.items.iter().filter(|d| d.is_deprecation()).count()
    }

    /// Keep only the `limit` most recent diagnostics, returning how many
    /// older ones were dropped
    pub fn retain_latest(&mut self, limit: usize) -> usize {
        let excess = self.items.len().saturating_sub(limit);
        self.items.drain(..excess);
        excess
    }

    /// Take everything collected so far, leaving the collector empty
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.items)
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging_facility::init_test_capture;
    use strata_core_types::schema::{EVENT_DEPRECATION, FIELD_DEPRECATED_FIELD};

    #[test]
    fn test_push_records_and_emits_warning() {
        let capture = init_test_capture();
        let mut diagnostics = Diagnostics::new();

        diagnostics.push(Diagnostic::deprecated("diag-unit-dn", "job_ids", "edits"));

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.deprecation_count(), 1);

        let events = capture.events_for_entity("diag-unit-dn");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event.as_deref(), Some(EVENT_DEPRECATION));
        assert_eq!(
            events[0].fields.get(FIELD_DEPRECATED_FIELD).map(String::as_str),
            Some("job_ids")
        );
    }

    #[test]
    fn test_take_empties_collector() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Diagnostic::deprecated("dn-1", "job_ids", "edits"));

        let taken = diagnostics.take();
        assert_eq!(taken.len(), 1);
        assert!(diagnostics.is_empty());
        assert!(taken[0].message.contains("job_ids"));
    }

    #[test]
    fn test_retain_latest_drops_oldest() {
        let mut diagnostics = Diagnostics::new();
        for id in ["dn-a", "dn-b", "dn-c"] {
            diagnostics.push(Diagnostic::deprecated(id, "job_ids", "edits"));
        }

        assert_eq!(diagnostics.retain_latest(2), 1);
        let ids: Vec<_> = diagnostics.iter().map(|d| d.entity_id.as_str()).collect();
        assert_eq!(ids, vec!["dn-b", "dn-c"]);
        assert_eq!(diagnostics.retain_latest(5), 0);
    }

    #[test]
    fn test_append_moves_items() {
        let mut a = Diagnostics::new();
        let mut b = Diagnostics::new();
        b.push(Diagnostic::deprecated("dn-2", "job_ids", "edits"));

        a.append(&mut b);
        assert_eq!(a.len(), 1);
        assert!(b.is_empty());
    }
}
