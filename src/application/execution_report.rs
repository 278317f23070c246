//! Ordered outcome accumulator for a batch.
//!
//! Every count is derived from the outcome sequence; there is no other state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::ports::forecast_source::PickScope;
use crate::domain::values::execution::{ExecutionMode, ExecutionOutcome};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionReport {
    outcomes: Vec<ExecutionOutcome>,
}

/// Counts and hedged symbols, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total: usize,
    pub submitted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub hedged: Vec<String>,
}

impl ExecutionReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_outcomes(outcomes: Vec<ExecutionOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn push(&mut self, outcome: ExecutionOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[ExecutionOutcome] {
        &self.outcomes
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn submitted_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_submitted()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ExecutionOutcome::Skipped { .. }))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ExecutionOutcome::Failed { .. }))
            .count()
    }

    /// Symbols successfully submitted, in processing order.
    pub fn hedged_symbols(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.is_submitted())
            .map(|o| o.symbol())
            .collect()
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            total: self.total(),
            submitted: self.submitted_count(),
            skipped: self.skipped_count(),
            failed: self.failed_count(),
            hedged: self.hedged_symbols().into_iter().map(String::from).collect(),
        }
    }
}

/// A dated batch run as printed by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRun {
    pub as_of: NaiveDate,
    pub scope: PickScope,
    pub mode: ExecutionMode,
    pub picks_received: usize,
    pub picks_eligible: usize,
    pub summary: ReportSummary,
    pub report: ExecutionReport,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::values::execution::SkipReason;

    #[test]
    fn test_empty_report() {
        let report = ExecutionReport::new();
        assert_eq!(report.total(), 0);
        assert!(report.hedged_symbols().is_empty());
    }

    #[test]
    fn test_counts_and_hedged_order() {
        let mut report = ExecutionReport::new();
        report.push(ExecutionOutcome::submitted("o-2", "NFLX"));
        report.push(ExecutionOutcome::skipped("V", SkipReason::PriceAlreadyMoved));
        report.push(ExecutionOutcome::failed("TSLA", "timeout"));
        report.push(ExecutionOutcome::submitted("o-1", "LYFT"));

        assert_eq!(report.total(), 4);
        assert_eq!(report.submitted_count(), 2);
        assert_eq!(report.skipped_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.hedged_symbols(), vec!["NFLX", "LYFT"]);
        assert_eq!(
            report.submitted_count() + report.skipped_count() + report.failed_count(),
            report.total()
        );
    }

    #[test]
    fn test_summary_matches_outcomes() {
        let report = ExecutionReport::from_outcomes(vec![
            ExecutionOutcome::skipped("AMD", SkipReason::InsufficientBudget),
            ExecutionOutcome::submitted("o-9", "LYFT"),
        ]);
        let summary = report.summary();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.submitted, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.hedged, vec!["LYFT".to_string()]);
    }
}
