/// How one invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Every reference reached a terminal state (some writes may have failed).
    Completed,
    /// The event carried no findings; neither service was called.
    NoFindings,
    /// The scanning service reported per-item errors; the batch was dropped
    /// before any aggregator call. Recovery is the scheduler's redelivery.
    SourceError,
}

/// Terminal state of a single reference: fetched, compared, then one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceOutcome {
    /// Stored fields already matched the derived set; write skipped.
    Skipped,
    /// The aggregator confirmed the update.
    Written,
    /// The aggregator left the update unprocessed or confirmed nothing.
    WriteFailed,
    /// Dry-run: the fields differ and a write would have been issued.
    WouldWrite,
}

/// ReconcileReport - Summary of one invocation, logged by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub outcome: ReconcileOutcome,
    /// References extracted from the event.
    pub references: usize,
    /// Confirmed updates (dry-run: updates that would have been issued).
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ReconcileReport {
    pub(crate) fn no_findings() -> Self {
        Self {
            outcome: ReconcileOutcome::NoFindings,
            references: 0,
            written: 0,
            skipped: 0,
            failed: 0,
        }
    }

    pub(crate) fn source_error(references: usize) -> Self {
        Self {
            outcome: ReconcileOutcome::SourceError,
            references,
            written: 0,
            skipped: 0,
            failed: 0,
        }
    }

    pub(crate) fn completed(outcomes: &[ReferenceOutcome]) -> Self {
        let count = |wanted: ReferenceOutcome| outcomes.iter().filter(|o| **o == wanted).count();
        Self {
            outcome: ReconcileOutcome::Completed,
            references: outcomes.len(),
            written: count(ReferenceOutcome::Written) + count(ReferenceOutcome::WouldWrite),
            skipped: count(ReferenceOutcome::Skipped),
            failed: count(ReferenceOutcome::WriteFailed),
        }
    }
}
